use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use structopt::StructOpt;

use mailjet_transport::config;
use mailjet_transport::email::{Mailbox, Message};
use mailjet_transport::MailjetTransport;

mod error;

use error::Error;

#[derive(Debug, PartialEq)]
enum Format {
    Mime,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mime" => Ok(Format::Mime),
            "json" => Ok(Format::Json),
            _ => Err(format!("Unknown format: {} (expected mime or json)", s)),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mailjet-send",
    about = "Send a message read from stdin through the Mailjet send API."
)]
struct Opt {
    /// Config file (TOML), merged with MAILJET_* environment variables
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Input format: mime or json
    #[structopt(short, long, default_value = "mime")]
    format: Format,

    /// Override the message sender
    #[structopt(short, long, parse(try_from_str = Mailbox::parse))]
    sender: Option<Mailbox>,

    /// Replace the To recipients
    #[structopt(short, long, parse(try_from_str = Mailbox::parse))]
    recipients: Vec<Mailbox>,

    #[structopt(long)]
    public_key: Option<String>,

    #[structopt(long)]
    private_key: Option<String>,

    /// Print the request body instead of sending it
    #[structopt(long)]
    dry_run: bool,
}

fn read_message(input: &[u8], format: &Format) -> Result<Message, Error> {
    let message = match format {
        Format::Mime => Message::from_mime(input)?,
        Format::Json => serde_json::from_slice(input)?,
    };

    Ok(message)
}

fn apply_overrides(mut message: Message, opt: &Opt) -> Message {
    if let Some(sender) = &opt.sender {
        message = message.with_sender(sender.clone());
    }

    if !opt.recipients.is_empty() {
        message = message.with_recipients(opt.recipients.clone());
    }

    message
}

async fn process(opt: &Opt, mut message: Message) -> Result<(), Error> {
    let path = opt.config.as_ref().and_then(|p| p.to_str());
    let mut settings = config::load_config(path)?;

    if let Some(key) = &opt.public_key {
        settings.public_key = key.clone();
    }

    if let Some(key) = &opt.private_key {
        settings.private_key = key.clone();
    }

    let transport = MailjetTransport::from_config(&settings)?;

    if opt.dry_run {
        let payload = transport.payload(&mut message)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    transport.send(&mut message).await?;

    log::info!("Sent \"{}\" via {}", message.subject, transport.endpoint());

    Ok(())
}

async fn run(opt: Opt) -> Result<(), Error> {
    // Get message from stdin
    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input)?;

    let message = apply_overrides(read_message(&input, &opt.format)?, &opt);

    process(&opt, message).await
}

#[tokio::main]
async fn main() {
    // Init logger
    env_logger::builder().format_timestamp_micros().init();

    let opt = Opt::from_args();

    if let Err(e) = run(opt).await {
        log::error!("Failed to send message: {}", e);
        std::process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args() {
        let opt = Opt::from_iter(&[
            "mailjet-send",
            "--format",
            "json",
            "--sender",
            "Bob <bob@x.com>",
            "-r",
            "alice@y.com",
            "-r",
            "Carol <carol@y.com>",
            "--dry-run",
        ]);

        assert_eq!(opt.format, Format::Json);
        assert_eq!(opt.sender, Some(Mailbox::new("bob@x.com", "Bob")));
        assert_eq!(
            opt.recipients,
            vec![
                Mailbox::new("alice@y.com", ""),
                Mailbox::new("carol@y.com", "Carol"),
            ]
        );
        assert!(opt.dry_run);
    }

    #[test]
    fn unknown_format_rejected() {
        let result = Opt::from_iter_safe(&["mailjet-send", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_replace_sender_and_to() {
        let opt = Opt::from_iter(&[
            "mailjet-send",
            "--sender",
            "bob@x.com",
            "--recipients",
            "alice@y.com",
        ]);

        let input = b"From: someone@else.com\r\nTo: other@else.com\r\nCc: carol@y.com\r\nSubject: Hi\r\n\r\nHello";
        let message = apply_overrides(read_message(input, &opt.format).unwrap(), &opt);

        assert_eq!(message.sender, Some(Mailbox::new("bob@x.com", "")));
        assert_eq!(message.to, vec![Mailbox::new("alice@y.com", "")]);
        assert_eq!(message.cc, vec![Mailbox::new("carol@y.com", "")]);
        assert_eq!(message.subject, "Hi");
    }

    #[test]
    fn bad_json_is_input_error() {
        let result = read_message(b"{not json", &Format::Json);
        assert!(matches!(result, Err(Error::Input(_))));
    }
}
