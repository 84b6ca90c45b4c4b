pub mod api;
mod client;
mod transport;

pub use client::ReqwestClient;
pub use transport::MailjetTransport;
