use crate::error::FetchError;
use std::future::Future;

/// Status and body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Issues a single GET. No retries, no auth.
pub trait Transport {
    fn get(&self, url: &str) -> impl Future<Output = Result<RawResponse, FetchError>> + Send;
}

/// `reqwest`-backed transport. Build once and reuse for a batch so the
/// connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        let transport_err = |source| FetchError::Transport { url: url.to_string(), source };

        let response = self.client.get(url).send().await.map_err(transport_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_err)?;

        Ok(RawResponse { status, body })
    }
}
