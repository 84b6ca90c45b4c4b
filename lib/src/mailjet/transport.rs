use std::time::Duration;

use base64::Engine;

use super::api;
use super::client::ReqwestClient;

use crate::client::{HttpClient, Request};
use crate::config::Config;
use crate::email::{Mailbox, Message};
use crate::Error;

/// Delivers `Message`s through the Mailjet v3 send API.
///
/// Each `send` issues exactly one POST through the wrapped client; there is
/// no retry and no queueing.
pub struct MailjetTransport<C> {
    public_key: String,
    private_key: String,
    endpoint: String,
    client: C,
}

impl MailjetTransport<ReqwestClient> {
    /// Build a transport with a reqwest client using the configured endpoint
    /// and timeout.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let client = ReqwestClient::with_timeout(Duration::from_secs(config.timeout))?;

        Ok(
            Self::new(&config.public_key, &config.private_key, client)
                .with_endpoint(&config.endpoint),
        )
    }
}

impl<C: HttpClient> MailjetTransport<C> {
    pub fn new(public_key: &str, private_key: &str, client: C) -> Self {
        Self {
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
            endpoint: api::MAILJET_SEND_ENDPOINT.to_string(),
            client,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn set_public_key(&mut self, public_key: &str) {
        self.public_key = public_key.to_string();
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn set_private_key(&mut self, private_key: &str) {
        self.private_key = private_key.to_string();
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request body for `message`.
    ///
    /// The Bcc list of `message` is cleared in place. Bcc recipients are
    /// still part of the returned recipient list, which is captured first.
    /// The clearing happens even when the message has no sender.
    pub fn payload(&self, message: &mut Message) -> Result<api::Payload, Error> {
        // To, then Cc, then Bcc. Duplicates are kept.
        let recipients: Vec<api::Recipient> = message
            .to
            .iter()
            .chain(message.cc.iter())
            .chain(message.bcc.iter())
            .map(recipient)
            .collect();

        message.bcc.clear();

        let sender = message.sender.clone().ok_or(Error::MissingSender)?;

        let headers = message.reply_to.as_ref().map(|reply_to| api::Headers {
            reply_to: reply_to.to_header_value(),
        });

        let attachments = if message.attachments.is_empty() {
            None
        } else {
            Some(
                message
                    .attachments
                    .iter()
                    .map(|a| api::Attachment {
                        content_type: a.content_type.clone(),
                        filename: a.filename.clone(),
                        content: base64::engine::general_purpose::STANDARD.encode(&a.data),
                    })
                    .collect(),
            )
        };

        Ok(api::Payload {
            from_email: sender.email,
            from_name: sender.name,
            subject: message.subject.clone(),
            text_part: message.to_plain_text(),
            html_part: message.html.clone().unwrap_or_default(),
            recipients,
            headers,
            attachments,
        })
    }

    /// Send `message` with a single POST to the Mailjet endpoint.
    ///
    /// Returns `Ok(true)` once Mailjet accepts the message. Errors from the
    /// HTTP client are returned unchanged. The message's Bcc list is empty
    /// afterwards whatever the outcome.
    pub async fn send(&self, message: &mut Message) -> Result<bool, Error> {
        let payload = self.payload(message)?;

        log::debug!(
            "Sending \"{}\" from {} to {} recipients with {} attachments",
            payload.subject,
            payload.from_email,
            payload.recipients.len(),
            payload.attachments.as_ref().map_or(0, Vec::len)
        );

        let request = Request {
            url: self.endpoint.clone(),
            username: self.public_key.clone(),
            password: self.private_key.clone(),
            body: serde_json::to_value(&payload)?,
        };

        let response = self.client.post(request).await?;

        // Clients are expected to fail on non-2xx already
        if !response.is_success() {
            return Err(api::status_error(response.status, &response.text()));
        }

        match serde_json::from_slice::<api::SendResult>(&response.body) {
            Ok(result) => {
                for sent in result.sent {
                    log::info!("Mailjet accepted message {} for {}", sent.message_id, sent.email);
                }
            }
            Err(_) => log::info!("Mailjet accepted message \"{}\"", payload.subject),
        }

        Ok(true)
    }
}

fn recipient(mailbox: &Mailbox) -> api::Recipient {
    api::Recipient {
        email: mailbox.email.clone(),
        name: mailbox.name.clone(),
    }
}
