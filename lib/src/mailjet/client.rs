use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use super::api;

use crate::client::{ClientFuture, HttpClient, Request, Response};
use crate::Error;

/// `HttpClient` backed by a pooled reqwest client.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(Duration::from_secs(api::MAILJET_REQUEST_TIMEOUT))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post(&self, request: Request) -> ClientFuture<'_, Response> {
        Box::pin(async move {
            let body = serde_json::to_vec(&request.body)?;

            let req = self
                .client
                .post(reqwest::Url::parse(&request.url)?)
                .basic_auth(&request.username, Some(&request.password))
                .header(CONTENT_TYPE, "application/json")
                .body(body);

            // Map response into an error if applicable
            let resp = api::map_status(req.send().await?).await?;
            let status = resp.status().as_u16();

            Ok(Response {
                status,
                body: resp.bytes().await?.to_vec(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use base64::Engine;
    use warp::http::StatusCode;
    use warp::Filter;

    type Captured = Arc<Mutex<Option<(String, serde_json::Value)>>>;

    /// Serve /v3/send on an ephemeral port, replying with `status`.
    fn spawn_server(status: StatusCode, captured: Captured) -> SocketAddr {
        let route = warp::post()
            .and(warp::path!("v3" / "send"))
            .and(warp::header::<String>("authorization"))
            .and(warp::body::json())
            .map(move |auth: String, body: serde_json::Value| {
                *captured.lock().unwrap() = Some((auth, body));

                let reply = if status.is_success() {
                    serde_json::json!({"Sent": [{"Email": "alice@y.com", "MessageID": 42}]})
                } else {
                    serde_json::json!({"ErrorMessage": "API key authentication/authorization failure"})
                };

                warp::reply::with_status(warp::reply::json(&reply), status)
            });

        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        addr
    }

    fn request(addr: SocketAddr) -> Request {
        Request {
            url: format!("http://{}/v3/send", addr),
            username: "public".to_string(),
            password: "private".to_string(),
            body: serde_json::json!({"Subject": "Hi"}),
        }
    }

    #[tokio::test]
    async fn post_sends_basic_auth_and_json() {
        let captured = Captured::default();
        let addr = spawn_server(StatusCode::OK, captured.clone());
        let client = ReqwestClient::new().unwrap();

        let resp = client.post(request(addr)).await.unwrap();

        assert_eq!(resp.status, 200);
        assert!(resp.text().contains("\"MessageID\":42"));

        let (auth, body) = captured.lock().unwrap().take().unwrap();
        let expected = base64::engine::general_purpose::STANDARD.encode("public:private");
        assert_eq!(auth, format!("Basic {}", expected));
        assert_eq!(body, serde_json::json!({"Subject": "Hi"}));
    }

    #[tokio::test]
    async fn unauthorized_is_an_error() {
        let addr = spawn_server(StatusCode::UNAUTHORIZED, Captured::default());
        let client = ReqwestClient::new().unwrap();

        let result = client.post(request(addr)).await;

        match result {
            Err(Error::Unauthorized(msg)) => assert!(msg.contains("authorization failure")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn server_error_keeps_status() {
        let addr = spawn_server(StatusCode::SERVICE_UNAVAILABLE, Captured::default());
        let client = ReqwestClient::new().unwrap();

        let result = client.post(request(addr)).await;

        assert!(matches!(result, Err(Error::Status { code: 503, .. })));
    }

    #[tokio::test]
    async fn bad_url_is_an_error() {
        let client = ReqwestClient::new().unwrap();
        let mut req = request(([127, 0, 0, 1], 1).into());
        req.url = "not a url".to_string();

        let result = client.post(req).await;

        assert!(matches!(result, Err(Error::UrlParse(_))));
    }
}
