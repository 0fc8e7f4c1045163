use gloo_net::http::{Request, RequestBuilder, Response};
use models::{
    endpoints, ErrorBody, LoginRequest, ModelError, ReadingData, ReadingsQuery, RefreshRequest,
    Session, StationData, TokenResponse,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::log_fn;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Not signed in or the session has expired")]
    Unauthorized,
    #[error("Server responded with status {0}: {1}")]
    Status(u16, String),
    #[error("Network request failed: {0}")]
    Network(String),
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(err) => ApiError::Decode(err.to_string()),
            err => ApiError::Network(err.to_string()),
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    match response.status() {
        200..=299 => Ok(response.json::<T>().await?),
        401 => Err(ApiError::Unauthorized),
        status => {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|error| error.message)
                .unwrap_or(body);
            Err(ApiError::Status(status, message))
        }
    }
}

/// REST client for the weather backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        endpoints::join(&self.base_url, path)
    }

    fn authorized(&self, path: &str, session: &Session) -> RequestBuilder {
        Request::get(&self.url(path)).header("Authorization", &session.authorization())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
    ) -> Result<T, ApiError> {
        log_fn!(format!("GET {path}"), {
            let response = self.authorized(path, session).send().await?;
            decode(response).await
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        log_fn!("login", {
            let request = Request::post(&self.url(endpoints::LOGIN)).json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })?;
            decode(request.send().await?).await
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        log_fn!("refresh", {
            let request = Request::post(&self.url(endpoints::REFRESH)).json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })?;
            decode(request.send().await?).await
        })
    }

    pub async fn stations(&self, session: &Session) -> Result<Vec<StationData>, ApiError> {
        self.get_json(endpoints::STATIONS, session).await
    }

    pub async fn station(
        &self,
        session: &Session,
        station_id: &str,
    ) -> Result<StationData, ApiError> {
        self.get_json(&endpoints::station(station_id), session).await
    }

    /// Readings of one station. Readings of sensors the station does not
    /// declare are rejected.
    pub async fn readings(
        &self,
        session: &Session,
        station: &StationData,
        query: &ReadingsQuery,
    ) -> Result<Vec<ReadingData>, ApiError> {
        let readings: Vec<ReadingData> = self
            .get_json(&endpoints::readings(&station.id, query), session)
            .await?;
        station.validate_readings(&readings)?;
        Ok(readings)
    }

    pub async fn latest_readings(
        &self,
        session: &Session,
        station: &StationData,
    ) -> Result<Vec<ReadingData>, ApiError> {
        let readings: Vec<ReadingData> = self
            .get_json(&endpoints::latest_readings(&station.id), session)
            .await?;
        station.validate_readings(&readings)?;
        Ok(readings)
    }
}
