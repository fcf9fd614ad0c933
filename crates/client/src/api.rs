//! REST client for the console API.
//!
//! [`StationApi`] implements the station directory, photo service and
//! address authority traits over [`reqwest`]. Every JSON response is
//! wrapped in `{ "isSuccess", "message", "data" }`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use stationdesk_core::address::{AddressComponent, AddressLevel};
use stationdesk_core::error::ServiceError;
use stationdesk_core::images::{LocalFile, PhotoRef};
use stationdesk_core::services::{AddressAuthority, PhotoService, StationDirectory};
use stationdesk_core::station::{ServerPayload, StationFilter, StationRecord};
use stationdesk_core::types::DbId;

use crate::config::ClientConfig;

/// Errors from the HTTP layer, before they are folded into [`ServiceError`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The envelope reported `isSuccess: false`.
    #[error("API reported failure: {0}")]
    Unsuccessful(String),

    /// The envelope was successful but carried no `data`.
    #[error("API response has no data")]
    MissingData,
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) if e.is_decode() => ServiceError::Decode(e.to_string()),
            ClientError::Request(e) => ServiceError::Transport(e.to_string()),
            ClientError::Api { status, body } => ServiceError::Rejected {
                status,
                message: body,
            },
            ClientError::Unsuccessful(message) => ServiceError::Rejected {
                status: 200,
                message,
            },
            err @ ClientError::MissingData => ServiceError::Decode(err.to_string()),
        }
    }
}

/// Standard response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub is_success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, ClientError> {
        if !self.is_success {
            return Err(ClientError::Unsuccessful(
                self.message.unwrap_or_else(|| "no message".to_string()),
            ));
        }
        self.data.ok_or(ClientError::MissingData)
    }
}

#[derive(Debug, Deserialize)]
struct StationData {
    station: StationRecord,
}

#[derive(Debug, Deserialize)]
struct ListData<T> {
    list: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoData {
    photo_info: PhotoRef,
}

/// HTTP client for the station console API.
pub struct StationApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl StationApi {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ---- station directory ----

    pub async fn get_station(&self, id: DbId) -> Result<StationRecord, ClientError> {
        let response = self
            .authorize(self.client.get(self.url(&format!("station/{id}"))))
            .send()
            .await?;
        let data: StationData = Self::parse_envelope(response).await?;
        Ok(data.station)
    }

    pub async fn list_stations(
        &self,
        filter: &StationFilter,
    ) -> Result<Vec<StationRecord>, ClientError> {
        let response = self
            .authorize(self.client.get(self.url("station")))
            .query(&[("query", filter.query.as_str())])
            .send()
            .await?;
        let data: ListData<StationRecord> = Self::parse_envelope(response).await?;
        Ok(data.list)
    }

    pub async fn create_station(
        &self,
        payload: &ServerPayload,
    ) -> Result<StationRecord, ClientError> {
        let response = self
            .authorize(self.client.post(self.url("station")))
            .json(payload)
            .send()
            .await?;
        let data: StationData = Self::parse_envelope(response).await?;
        Ok(data.station)
    }

    pub async fn update_station(
        &self,
        payload: &ServerPayload,
    ) -> Result<StationRecord, ClientError> {
        let response = self
            .authorize(self.client.put(self.url("station")))
            .json(payload)
            .send()
            .await?;
        let data: StationData = Self::parse_envelope(response).await?;
        Ok(data.station)
    }

    // ---- photos ----

    pub async fn get_photo(&self, id: DbId) -> Result<Vec<u8>, ClientError> {
        let response = self
            .authorize(self.client.get(self.url(&format!("photo/{id}"))))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Upload `file` as the multipart field `image`.
    pub async fn upload_photo(&self, file: &LocalFile) -> Result<PhotoRef, ClientError> {
        let mut part = reqwest::multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .authorize(self.client.post(self.url("photo")))
            .multipart(form)
            .send()
            .await?;
        let data: PhotoData = Self::parse_envelope(response).await?;
        Ok(data.photo_info)
    }

    // ---- address authority ----

    pub async fn address_choices(
        &self,
        level: AddressLevel,
        parent_id: Option<DbId>,
    ) -> Result<Vec<AddressComponent>, ClientError> {
        let mut request = self.client.get(self.url(&format!("address/{level}")));
        if let Some(parent_id) = parent_id {
            request = request.query(&[("parentId", parent_id)]);
        }
        let response = self.authorize(request).send().await?;
        let data: ListData<AddressComponent> = Self::parse_envelope(response).await?;
        Ok(data.list)
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, or an
    /// [`ClientError::Api`] with the status and body text otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %response.url(), "API request failed");
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_data()
    }
}

/// Map a 404 from a by-id lookup to [`ServiceError::NotFound`].
fn by_id(err: ClientError, entity: &'static str, id: DbId) -> ServiceError {
    match err {
        ClientError::Api { status: 404, .. } => ServiceError::NotFound { entity, id },
        other => other.into(),
    }
}

#[async_trait]
impl StationDirectory for StationApi {
    async fn get(&self, id: DbId) -> Result<StationRecord, ServiceError> {
        self.get_station(id)
            .await
            .map_err(|e| by_id(e, "Station", id))
    }

    async fn list(&self, filter: &StationFilter) -> Result<Vec<StationRecord>, ServiceError> {
        Ok(self.list_stations(filter).await?)
    }

    async fn create(&self, payload: &ServerPayload) -> Result<StationRecord, ServiceError> {
        Ok(self.create_station(payload).await?)
    }

    async fn update(&self, payload: &ServerPayload) -> Result<StationRecord, ServiceError> {
        Ok(self.update_station(payload).await?)
    }
}

#[async_trait]
impl PhotoService for StationApi {
    async fn get(&self, id: DbId) -> Result<Vec<u8>, ServiceError> {
        self.get_photo(id).await.map_err(|e| by_id(e, "Photo", id))
    }

    async fn upload(&self, file: &LocalFile) -> Result<PhotoRef, ServiceError> {
        Ok(self.upload_photo(file).await?)
    }
}

#[async_trait]
impl AddressAuthority for StationApi {
    async fn choices(
        &self,
        level: AddressLevel,
        parent_id: Option<DbId>,
    ) -> Result<Vec<AddressComponent>, ServiceError> {
        Ok(self.address_choices(level, parent_id).await?)
    }
}
