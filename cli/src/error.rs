// Exit codes understood by MTAs piping mail into this command (sysexits.h)
pub const UNAVAILABLE: i32 = 69;
pub const TEMPFAIL: i32 = 75;

#[derive(Debug)]
pub enum Error {
    Transport(mailjet_transport::Error),
    Input(String),
}

impl Error {
    /// Exit code for this failure. Timeouts and throttling ask the caller
    /// to retry delivery later.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Error::Transport(ref e) if e.is_temporary() => TEMPFAIL,
            _ => UNAVAILABLE,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Transport(ref e) => write!(f, "{}", e),
            Error::Input(ref msg) => write!(f, "Input: {}", msg),
        }
    }
}

impl From<mailjet_transport::Error> for Error {
    fn from(err: mailjet_transport::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Input(err.to_string())
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(err: serde_json::error::Error) -> Self {
        Self::Input(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let timeout = Error::Transport(mailjet_transport::Error::RequestTimeout);
        assert_eq!(timeout.exit_code(), TEMPFAIL);

        let denied = Error::Transport(mailjet_transport::Error::Unauthorized("401".to_string()));
        assert_eq!(denied.exit_code(), UNAVAILABLE);

        let input = Error::Input("bad json".to_string());
        assert_eq!(input.exit_code(), UNAVAILABLE);
    }
}
