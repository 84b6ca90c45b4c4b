use std::future::Future;
use std::pin::Pin;

use crate::Error;

// Definition of future types for async use
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// A single authenticated JSON POST.
#[derive(Clone, Debug)]
pub struct Request {
    pub url: String,
    pub username: String,
    pub password: String,
    pub body: serde_json::Value,
}

#[derive(Clone, Debug, Default)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The HTTP capability a transport sends through.
///
/// Implementations perform exactly one request per call and return `Err`
/// for network failures and for any non-2xx status.
pub trait HttpClient {
    fn post(&self, request: Request) -> ClientFuture<'_, Response>;
}

impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn post(&self, request: Request) -> ClientFuture<'_, Response> {
        (**self).post(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        let mut resp = Response {
            status: 200,
            body: Vec::new(),
        };
        assert!(resp.is_success());

        resp.status = 299;
        assert!(resp.is_success());

        resp.status = 301;
        assert!(!resp.is_success());

        resp.status = 401;
        assert!(!resp.is_success());
    }
}
