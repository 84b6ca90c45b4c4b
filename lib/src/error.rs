use std::error;
use std::fmt;

/// All possible mailjet-transport errors.
///
/// Transport variants carry the message reported by the HTTP client so the
/// caller sees the provider's own explanation.
#[derive(Debug)]
pub enum Error {
    MissingSender,
    UrlParse(String),
    RequestTimeout,
    Request(String),
    BadRequest(String),
    Unauthorized(String),
    RateLimited(String),
    Status { code: u16, msg: String },
    Json(String),
    Config(String),
    Parse(String),
}

impl Error {
    /// True for failures a later attempt may get past (timeouts, throttling).
    pub fn is_temporary(&self) -> bool {
        matches!(*self, Error::RequestTimeout | Error::RateLimited(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MissingSender => f.write_str("Message has no sender"),
            Error::UrlParse(ref msg) => write!(f, "UrlParse: {}", msg),
            Error::RequestTimeout => f.write_str("RequestTimeout"),
            Error::Request(ref msg) => write!(f, "Request: {}", msg),
            Error::BadRequest(ref msg) => write!(f, "BadRequest: {}", msg),
            Error::Unauthorized(ref msg) => write!(f, "Unauthorized: {}", msg),
            Error::RateLimited(ref msg) => write!(f, "RateLimited: {}", msg),
            Error::Status { code, ref msg } => write!(f, "Status {}: {}", code, msg),
            Error::Json(ref msg) => write!(f, "Json: {}", msg),
            Error::Config(ref msg) => write!(f, "Config: {}", msg),
            Error::Parse(ref msg) => write!(f, "Parse: {}", msg),
        }
    }
}

impl error::Error for Error {}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::UrlParse(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::RequestTimeout
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(err: serde_json::error::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<mailparse::MailParseError> for Error {
    fn from(err: mailparse::MailParseError) -> Self {
        Self::Parse(err.to_string())
    }
}
