use mailparse::{DispositionType, MailAddr, MailHeaderMap, ParsedMail};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A single address with its display name.
///
/// The name may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl Mailbox {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Parse a single `Name <email>` or bare `email` string.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let list = mailparse::addrparse(s)?;

        match list.extract_single_info() {
            Some(info) => Ok(Mailbox {
                email: info.addr,
                name: info.display_name.unwrap_or_default(),
            }),
            None => Err(Error::Parse(format!("Not a single mailbox: {}", s))),
        }
    }

    /// Formats the mailbox as `Name <email>`, or `<email>` when unnamed.
    pub fn to_header_value(&self) -> String {
        if self.name.is_empty() {
            format!("<{}>", self.email)
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME type of attachment (e.g., text/plain)
    pub content_type: String,

    /// Attachment filename
    pub filename: String,

    /// Raw attachment bytes
    pub data: Vec<u8>,
}

/// A fully assembled email, ready to be handed to a transport.
///
/// Reply-To is a single optional mailbox: multi-address reply-to is not
/// supported.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Option<Mailbox>,

    #[serde(default)]
    pub to: Vec<Mailbox>,
    #[serde(default)]
    pub cc: Vec<Mailbox>,
    #[serde(default)]
    pub bcc: Vec<Mailbox>,

    #[serde(default)]
    pub subject: String,

    /// Plaintext body
    pub text: Option<String>,

    /// HTML body, if any
    pub html: Option<String>,

    pub reply_to: Option<Mailbox>,

    /// List of attachments, if any
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Extra headers, rendered as-is into the plain-text form
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl Message {
    pub fn new() -> Message {
        Default::default()
    }

    pub fn with_sender(mut self, sender: Mailbox) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_recipients(mut self, recipients: Vec<Mailbox>) -> Self {
        self.to = recipients;
        self
    }

    /// Renders the whole message as plain text: headers, a blank line,
    /// then the plaintext body.
    ///
    /// Only the addressing headers, Subject and `headers` are written; no
    /// Date or MIME-Version is generated. The HTML body and attachments are
    /// not part of the output, they are sent as their own payload fields.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();

        if let Some(sender) = &self.sender {
            push_header(&mut out, "From", &sender.to_header_value());
        }

        if let Some(reply_to) = &self.reply_to {
            push_header(&mut out, "Reply-To", &reply_to.to_header_value());
        }

        push_address_list(&mut out, "To", &self.to);
        push_address_list(&mut out, "Cc", &self.cc);
        push_address_list(&mut out, "Bcc", &self.bcc);

        push_header(&mut out, "Subject", &self.subject);

        for (key, value) in &self.headers {
            push_header(&mut out, key, value);
        }

        out.push_str("\r\n");

        if let Some(text) = &self.text {
            out.push_str(text);
        }

        out
    }

    /// Recursively walk the MIME parts and extract the following:
    ///
    /// 1. Body (text and/or html)
    /// 2. Attachments, inline or regular
    ///
    fn parse_recursive(&mut self, part: &ParsedMail) -> Result<(), Error> {
        let mimetype = &part.ctype.mimetype;

        // If this is an attachment, append to Vec and return
        if let Some(attachment) = Attachment::from_mime(part)? {
            self.attachments.push(attachment);
            return Ok(());
        }

        if mimetype.starts_with("multipart/") {
            for subpart in part.subparts.iter() {
                self.parse_recursive(subpart)?;
            }
        } else if mimetype == "text/html" {
            // Keep the first body of each kind (multipart/alternative order)
            if self.html.is_none() {
                self.html = Some(part.get_body()?);
            }
        } else if mimetype.starts_with("text/") && self.text.is_none() {
            self.text = Some(part.get_body()?);
        }

        Ok(())
    }

    /// Convert a raw MIME email into structured format
    pub fn from_mime(mime_content: &[u8]) -> Result<Message, Error> {
        let parsed = mailparse::parse_mail(mime_content)?;

        let mut message = Message::new();

        message.sender = parse_addresses(&parsed, "From")?.into_iter().next();
        message.reply_to = parse_addresses(&parsed, "Reply-To")?.into_iter().next();
        message.to = parse_addresses(&parsed, "To")?;
        message.cc = parse_addresses(&parsed, "Cc")?;
        message.bcc = parse_addresses(&parsed, "Bcc")?;
        message.subject = parsed
            .headers
            .get_first_value("Subject")
            .unwrap_or_default();

        message.parse_recursive(&parsed)?;

        Ok(message)
    }
}

impl Attachment {
    pub fn new(
        content_type: impl Into<String>,
        filename: impl Into<String>,
        data: Vec<u8>,
    ) -> Attachment {
        Attachment {
            content_type: content_type.into(),
            filename: filename.into(),
            data,
        }
    }

    /// Inspect part headers to determine if this is an attachment.
    /// If it is, build the Attachment and return it.
    fn from_mime(part: &ParsedMail) -> Result<Option<Attachment>, Error> {
        let mimetype = &part.ctype.mimetype;
        let disposition = part.get_content_disposition();

        match disposition.disposition {
            DispositionType::Attachment => (),
            // Inline text is body content, not an attachment
            DispositionType::Inline
                if !mimetype.starts_with("text/")
                    && !mimetype.starts_with("multipart/")
                    && part.headers.get_first_value("Content-Disposition").is_some() => {}
            _ => return Ok(None),
        }

        let filename = disposition
            .params
            .get("filename")
            .or_else(|| part.ctype.params.get("name"))
            .cloned()
            .unwrap_or_default();

        Ok(Some(Attachment {
            content_type: mimetype.to_string(),
            filename,
            data: part.get_body_raw()?,
        }))
    }
}

fn push_header(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(value);
    out.push_str("\r\n");
}

fn push_address_list(out: &mut String, key: &str, mailboxes: &[Mailbox]) {
    if mailboxes.is_empty() {
        return;
    }

    let value = mailboxes
        .iter()
        .map(Mailbox::to_header_value)
        .collect::<Vec<_>>()
        .join(", ");

    push_header(out, key, &value);
}

/// Parse every mailbox in the named address header. Groups are flattened.
fn parse_addresses(part: &ParsedMail, key: &str) -> Result<Vec<Mailbox>, Error> {
    let header = match part.headers.get_first_header(key) {
        Some(h) => h,
        None => return Ok(Vec::new()),
    };

    let mut mailboxes = Vec::new();

    for addr in mailparse::addrparse_header(header)?.iter() {
        match addr {
            MailAddr::Single(info) => mailboxes.push(Mailbox {
                email: info.addr.clone(),
                name: info.display_name.clone().unwrap_or_default(),
            }),
            MailAddr::Group(group) => {
                mailboxes.extend(group.addrs.iter().map(|info| Mailbox {
                    email: info.addr.clone(),
                    name: info.display_name.clone().unwrap_or_default(),
                }));
            }
        }
    }

    Ok(mailboxes)
}
