//! Remote itinerary API.
//!
//! [`ItineraryApi`] is the seam between the cache and the server: the cache
//! only ever talks to the network through it, which lets tests substitute a
//! scripted implementation. [`HttpApi`] is the production implementation on
//! top of reqwest.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::{
    config::CacheConfig,
    error::{Result, WayfarerError},
    models::{Itinerary, Pagination},
    params::ListItineraries,
};

const ITINERARIES_PATH: &str = "/itineraries";

/// Network operations the cache depends on.
#[async_trait]
pub trait ItineraryApi: Send + Sync {
    /// Succeeds when the backend health endpoint answers with 2xx.
    async fn health(&self) -> Result<()>;

    /// Raw body of the list endpoint: a bare array or an envelope object.
    async fn list_itineraries(&self, params: &ListItineraries) -> Result<Value>;

    async fn create_itinerary(&self, payload: &Value) -> Result<Itinerary>;

    async fn update_itinerary(&self, id: &str, payload: &Value) -> Result<Itinerary>;

    async fn delete_itinerary(&self, id: &str) -> Result<()>;
}

/// One page of itineraries after response normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryPage {
    pub itineraries: Vec<Itinerary>,
    pub pagination: Option<Pagination>,
}

/// Normalizes the two shapes the list endpoint may return.
///
/// A bare array is taken as is; an object carrying an `itineraries` field is
/// unwrapped, keeping its pagination metadata when it is readable. Any other
/// shape yields an empty page. Elements that are not JSON objects are
/// skipped; records themselves are never rejected.
pub fn normalize_list_response(body: Value) -> ItineraryPage {
    match body {
        Value::Array(list) => ItineraryPage {
            itineraries: records(list),
            pagination: None,
        },
        Value::Object(mut envelope) => {
            let Some(Value::Array(list)) = envelope.remove("itineraries") else {
                return ItineraryPage::default();
            };
            let pagination = match envelope.remove("pagination") {
                Some(value) if !value.is_null() => serde_json::from_value(value)
                    .map_err(|e| warn!("Ignoring unreadable pagination: {e}"))
                    .ok(),
                _ => None,
            };
            ItineraryPage {
                itineraries: records(list),
                pagination,
            }
        }
        _ => ItineraryPage::default(),
    }
}

fn records(list: Vec<Value>) -> Vec<Itinerary> {
    let total = list.len();
    let records: Vec<Itinerary> = list.into_iter().filter_map(Itinerary::from_value).collect();
    if records.len() != total {
        warn!("Skipped {} list elements that are not records", total - records.len());
    }
    records
}

/// Extracts the record from a mutation response, which is either wrapped as
/// `{ "itinerary": { .. } }` or the bare record.
fn unwrap_itinerary(body: Value) -> Result<Itinerary> {
    match body {
        Value::Object(mut map) if map.contains_key("itinerary") => {
            let record = map.remove("itinerary").unwrap_or(Value::Null);
            Ok(serde_json::from_value(record)?)
        }
        other => Ok(serde_json::from_value(other)?),
    }
}

/// reqwest-based implementation of [`ItineraryApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    health_url: String,
    auth_token: Option<String>,
}

impl HttpApi {
    /// Builds a client using the URLs, token and request timeout of `config`.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base().to_string(),
            health_url: config.health_url(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Maps non-success statuses to errors, passing 2xx responses through.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(WayfarerError::Unauthorized);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(WayfarerError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ItineraryApi for HttpApi {
    async fn health(&self) -> Result<()> {
        let response = self.client.get(&self.health_url).send().await?;
        Self::check(response).await.map(|_| ())
    }

    async fn list_itineraries(&self, params: &ListItineraries) -> Result<Value> {
        let url = self.url(ITINERARIES_PATH);
        debug!("GET {url} {:?}", params);

        let request = self.client.get(&url).query(&params.query_pairs());
        let response = self.authorized(request).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_itinerary(&self, payload: &Value) -> Result<Itinerary> {
        let url = self.url(ITINERARIES_PATH);
        debug!("POST {url}");

        let request = self.client.post(&url).json(payload);
        let response = self.authorized(request).send().await?;
        unwrap_itinerary(Self::check(response).await?.json().await?)
    }

    async fn update_itinerary(&self, id: &str, payload: &Value) -> Result<Itinerary> {
        let url = self.url(&format!("{ITINERARIES_PATH}/{id}"));
        debug!("PUT {url}");

        let request = self.client.put(&url).json(payload);
        let response = self.authorized(request).send().await?;
        unwrap_itinerary(Self::check(response).await?.json().await?)
    }

    async fn delete_itinerary(&self, id: &str) -> Result<()> {
        let url = self.url(&format!("{ITINERARIES_PATH}/{id}"));
        debug!("DELETE {url}");

        let request = self.client.delete(&url);
        let response = self.authorized(request).send().await?;
        Self::check(response).await.map(|_| ())
    }
}
