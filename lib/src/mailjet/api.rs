use serde::{Deserialize, Serialize};

use crate::Error;

pub const MAILJET_SEND_ENDPOINT: &str = "https://api.mailjet.com/v3/send";
pub const REPLY_TO_HEADER: &str = "Reply-To";

// Request timeout, in seconds
pub(crate) const MAILJET_REQUEST_TIMEOUT: u64 = 30;

/// Body of a v3 send request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "FromEmail")]
    pub from_email: String,
    #[serde(rename = "FromName")]
    pub from_name: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Text-part")]
    pub text_part: String,
    #[serde(rename = "Html-part")]
    pub html_part: String,
    #[serde(rename = "Recipients")]
    pub recipients: Vec<Recipient>,
    #[serde(rename = "Headers", default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    #[serde(rename = "Attachments", default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    #[serde(rename = "Reply-To")]
    pub reply_to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "Content-type")]
    pub content_type: String,
    #[serde(rename = "Filename")]
    pub filename: String,
    /// Base64 of the raw attachment bytes
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendResult {
    #[serde(rename = "Sent", default)]
    pub sent: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SentMessage {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "MessageID")]
    pub message_id: u64,
}

/// Map a non-2xx Mailjet status to an error
pub fn status_error(code: u16, body: &str) -> Error {
    let msg = if body.is_empty() {
        format!("HTTP {}", code)
    } else {
        format!("HTTP {}: {}", code, body)
    };

    match code {
        400 => Error::BadRequest(msg),
        401 | 403 => Error::Unauthorized(msg),
        429 => Error::RateLimited(msg),
        _ => Error::Status { code, msg },
    }
}

/// Map possible Mailjet API errors to the crate error, keeping the
/// response body for context.
pub async fn map_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();

    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();

    Err(status_error(status.as_u16(), &body))
}
