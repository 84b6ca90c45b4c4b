//! Send fully assembled emails through the Mailjet v3 send API.
//!
//! A [`MailjetTransport`] turns a [`email::Message`] into one JSON POST with
//! basic auth:
//!
//! ```no_run
//! # async fn run() -> Result<(), mailjet_transport::Error> {
//! use mailjet_transport::email::{Mailbox, Message};
//! use mailjet_transport::{MailjetTransport, ReqwestClient};
//!
//! let transport = MailjetTransport::new("public-key", "private-key", ReqwestClient::new()?);
//!
//! let mut message = Message::new()
//!     .with_sender(Mailbox::new("bob@x.com", "Bob"))
//!     .with_recipients(vec![Mailbox::new("alice@y.com", "Alice")]);
//! message.subject = "Hi".to_string();
//! message.text = Some("Hello".to_string());
//!
//! transport.send(&mut message).await?;
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod config;
pub mod email;
mod error;
pub mod mailjet;

pub use client::HttpClient;
pub use error::Error;
pub use mailjet::{MailjetTransport, ReqwestClient};
