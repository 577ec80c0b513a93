use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

/// A fully materialized HTTP response: status, headers, body bytes.
///
/// The engine needs the complete body in hand to cache it, so the transport
/// contract is "collect, then return" rather than a streaming handle.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The capability the cache engine decorates.
///
/// Implementations own everything below the cache: connections, TLS,
/// redirects, timeouts. The engine only sends request descriptors and
/// observes materialized responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: Request<Bytes>) -> Result<HttpResponse, TransportError>;
}

pub type HyperClient = Client<HttpConnector, Full<Bytes>>;

/// Default transport backed by the hyper legacy client.
pub struct HyperTransport {
    client: HyperClient,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, req: Request<Bytes>) -> Result<HttpResponse, TransportError> {
        let (parts, body) = req.into_parts();
        let req = Request::from_parts(parts, Full::new(body));

        let response = self.client.request(req).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await?.to_bytes();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
