use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{NewParty, Party, PartyId, PartyPatch},
    error::ApiError,
    protocol::DeleteAck,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {error}")]
    Api { status: StatusCode, error: ApiError },
    #[error("server answered {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, .. } | Self::UnexpectedStatus { status, .. } => {
                *status == StatusCode::NOT_FOUND
            }
            _ => false,
        }
    }
}

/// HTTP client for the party endpoints.
#[derive(Debug, Clone)]
pub struct PartyClient {
    http: Client,
    base_url: Url,
}

impl PartyClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_http(server_url, Client::new())
    }

    pub fn with_http(server_url: &str, http: Client) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(server_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list(&self) -> Result<Vec<Party>, ClientError> {
        let url = self.base_url.join("parties")?;
        self.send(self.http.get(url)).await
    }

    pub async fn get(&self, id: PartyId) -> Result<Party, ClientError> {
        let url = self.party_url(id)?;
        self.send(self.http.get(url)).await
    }

    pub async fn create(&self, fields: &NewParty) -> Result<Party, ClientError> {
        let url = self.base_url.join("parties")?;
        self.send(self.http.post(url).json(fields)).await
    }

    pub async fn update(&self, id: PartyId, patch: &PartyPatch) -> Result<Party, ClientError> {
        let url = self.party_url(id)?;
        self.send(self.http.put(url).json(patch)).await
    }

    pub async fn delete(&self, id: PartyId) -> Result<DeleteAck, ClientError> {
        let url = self.party_url(id)?;
        self.send(self.http.delete(url)).await
    }

    fn party_url(&self, id: PartyId) -> Result<Url, ClientError> {
        Ok(self.base_url.join(&format!("parties/{id}"))?)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await?;
    debug!(%status, %body, "party request rejected");
    match serde_json::from_str::<ApiError>(&body) {
        Ok(error) => Err(ClientError::Api { status, error }),
        Err(_) => Err(ClientError::UnexpectedStatus { status, body }),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
