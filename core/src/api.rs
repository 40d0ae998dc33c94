//! Stateless HTTP request builders and response parsers.
//!
//! # Design
//! `ControllerApi` (index management) and `DataPlaneApi` (vector operations)
//! hold only a base URL and the API key. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. Nothing here touches the network.
//!
//! `build_*` methods expect params that already passed the matching
//! `validate` function; the dispatchers guarantee that ordering.
//!
//! `parse_*` methods classify the response purely by status: 2xx is success,
//! 404 on a call addressing a named index is `NotFound`, everything else is
//! `RequestFailed` with the full body.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{PineconeError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::payload::{
    endpoint, fetch_url, to_json_body, ConfigureIndexBody, CreateIndexBody, DeleteBody,
    DescribeIndexStatsBody, QueryBody, UpdateBody, UpsertBody,
};
use crate::types::{
    ConfigureIndexParams, CreateIndexParams, DeleteVectorsParams, DescribeIndexStatsParams,
    FetchVectorsParams, FetchVectorsResponse, IndexDescription, IndexStats, QueryParams,
    QueryResponse, UpdateVectorParams, UpsertVectorsParams, UpsertVectorsResponse,
};

/// Request builder and response parser for the controller (`/databases`).
#[derive(Clone)]
pub struct ControllerApi {
    base_url: String,
    api_key: String,
}

impl ControllerApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.controller_url(),
            api_key: config.api_key().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: HttpMethod, segments: &[&str]) -> Result<HttpRequest> {
        let url = endpoint(&self.base_url, segments)?;
        Ok(HttpRequest::new(method, url.into(), &self.api_key))
    }

    pub fn build_list_indexes(&self) -> Result<HttpRequest> {
        self.request(HttpMethod::Get, &["databases"])
    }

    pub fn build_create_index(&self, params: &CreateIndexParams) -> Result<HttpRequest> {
        let body = to_json_body(&CreateIndexBody::from(params))?;
        Ok(self
            .request(HttpMethod::Post, &["databases"])?
            .with_json(body))
    }

    pub fn build_describe_index(&self, name: &str) -> Result<HttpRequest> {
        self.request(HttpMethod::Get, &["databases", name])
    }

    pub fn build_delete_index(&self, name: &str) -> Result<HttpRequest> {
        self.request(HttpMethod::Delete, &["databases", name])
    }

    pub fn build_configure_index(&self, params: &ConfigureIndexParams) -> Result<HttpRequest> {
        let body = to_json_body(&ConfigureIndexBody::from(params))?;
        Ok(self
            .request(HttpMethod::Patch, &["databases", &params.index_name])?
            .with_json(body))
    }

    pub fn parse_list_indexes(&self, response: HttpResponse) -> Result<Vec<String>> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_create_index(&self, response: HttpResponse) -> Result<()> {
        check_status(&response)
    }

    pub fn parse_describe_index(&self, response: HttpResponse) -> Result<IndexDescription> {
        check_index_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_delete_index(&self, response: HttpResponse) -> Result<()> {
        check_index_status(&response)
    }

    pub fn parse_configure_index(&self, response: HttpResponse) -> Result<()> {
        check_index_status(&response)
    }
}

/// Request builder and response parser for one index's data plane.
#[derive(Clone)]
pub struct DataPlaneApi {
    base_url: String,
    api_key: String,
}

impl DataPlaneApi {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, segments: &[&str], body: String) -> Result<HttpRequest> {
        let url = endpoint(&self.base_url, segments)?;
        Ok(HttpRequest::new(HttpMethod::Post, url.into(), &self.api_key).with_json(body))
    }

    pub fn build_upsert(&self, params: &UpsertVectorsParams) -> Result<HttpRequest> {
        self.post(&["vectors", "upsert"], to_json_body(&UpsertBody::from(params))?)
    }

    pub fn build_query(&self, params: &QueryParams) -> Result<HttpRequest> {
        self.post(&["query"], to_json_body(&QueryBody::from(params))?)
    }

    pub fn build_fetch(&self, params: &FetchVectorsParams) -> Result<HttpRequest> {
        let url = fetch_url(&self.base_url, params)?;
        Ok(HttpRequest::new(HttpMethod::Get, url.into(), &self.api_key))
    }

    pub fn build_update(&self, params: &UpdateVectorParams) -> Result<HttpRequest> {
        self.post(&["vectors", "update"], to_json_body(&UpdateBody::from(params))?)
    }

    pub fn build_delete(&self, params: &DeleteVectorsParams) -> Result<HttpRequest> {
        self.post(&["vectors", "delete"], to_json_body(&DeleteBody::from(params))?)
    }

    pub fn build_describe_index_stats(
        &self,
        params: &DescribeIndexStatsParams,
    ) -> Result<HttpRequest> {
        self.post(
            &["describe_index_stats"],
            to_json_body(&DescribeIndexStatsBody::from(params))?,
        )
    }

    pub fn parse_upsert(&self, response: HttpResponse) -> Result<UpsertVectorsResponse> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_query(&self, response: HttpResponse) -> Result<QueryResponse> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_fetch(&self, response: HttpResponse) -> Result<FetchVectorsResponse> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<()> {
        check_status(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<()> {
        check_status(&response)
    }

    pub fn parse_describe_index_stats(&self, response: HttpResponse) -> Result<IndexStats> {
        check_status(&response)?;
        parse_json(&response)
    }
}

impl fmt::Debug for ControllerApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerApi")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for DataPlaneApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataPlaneApi")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_str(&response.body).map_err(|e| PineconeError::Deserialization(e.to_string()))
}

/// Map any non-2xx status to `RequestFailed`.
pub fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(PineconeError::RequestFailed {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Like `check_status`, but 404 means the addressed index does not exist.
pub fn check_index_status(response: &HttpResponse) -> Result<()> {
    if response.status == 404 {
        return Err(PineconeError::NotFound);
    }
    check_status(response)
}
