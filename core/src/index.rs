//! Data-plane dispatcher for a single index.
//!
//! # Design
//! `Index` owns the validate-then-dispatch pipeline for vector operations and
//! is generic over a `VectorBackend`. Two backends exist: `RestBackend`
//! (JSON over any `Transport`) and `grpc::GrpcBackend` (protobuf over a
//! tonic channel). Invalid params are rejected in `Index` and never reach
//! either backend.

use async_trait::async_trait;
use tracing::debug;

use crate::api::DataPlaneApi;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::{
    DeleteVectorsParams, DescribeIndexStatsParams, FetchVectorsParams, FetchVectorsResponse,
    IndexStats, QueryParams, QueryResponse, UpdateVectorParams, UpsertVectorsParams,
    UpsertVectorsResponse,
};
use crate::validate;

/// One remote call per vector operation. Implementations may assume their
/// input has been validated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorBackend: Send + Sync {
    async fn upsert(&self, params: &UpsertVectorsParams) -> Result<UpsertVectorsResponse>;
    async fn query(&self, params: &QueryParams) -> Result<QueryResponse>;
    async fn fetch(&self, params: &FetchVectorsParams) -> Result<FetchVectorsResponse>;
    async fn update(&self, params: &UpdateVectorParams) -> Result<()>;
    async fn delete(&self, params: &DeleteVectorsParams) -> Result<()>;
    async fn describe_index_stats(&self, params: &DescribeIndexStatsParams) -> Result<IndexStats>;
}

/// `VectorBackend` speaking the REST data-plane API through a `Transport`.
#[derive(Debug, Clone)]
pub struct RestBackend<T> {
    api: DataPlaneApi,
    transport: T,
}

impl<T: Transport> RestBackend<T> {
    pub fn new(api: DataPlaneApi, transport: T) -> Self {
        Self { api, transport }
    }

    pub fn api(&self) -> &DataPlaneApi {
        &self.api
    }
}

#[async_trait]
impl<T: Transport> VectorBackend for RestBackend<T> {
    async fn upsert(&self, params: &UpsertVectorsParams) -> Result<UpsertVectorsResponse> {
        let req = self.api.build_upsert(params)?;
        self.api.parse_upsert(self.transport.send(req).await?)
    }

    async fn query(&self, params: &QueryParams) -> Result<QueryResponse> {
        let req = self.api.build_query(params)?;
        self.api.parse_query(self.transport.send(req).await?)
    }

    async fn fetch(&self, params: &FetchVectorsParams) -> Result<FetchVectorsResponse> {
        let req = self.api.build_fetch(params)?;
        self.api.parse_fetch(self.transport.send(req).await?)
    }

    async fn update(&self, params: &UpdateVectorParams) -> Result<()> {
        let req = self.api.build_update(params)?;
        self.api.parse_update(self.transport.send(req).await?)
    }

    async fn delete(&self, params: &DeleteVectorsParams) -> Result<()> {
        let req = self.api.build_delete(params)?;
        self.api.parse_delete(self.transport.send(req).await?)
    }

    async fn describe_index_stats(&self, params: &DescribeIndexStatsParams) -> Result<IndexStats> {
        let req = self.api.build_describe_index_stats(params)?;
        self.api
            .parse_describe_index_stats(self.transport.send(req).await?)
    }
}

/// Vector operations against one index.
#[derive(Debug)]
pub struct Index<B> {
    name: String,
    backend: B,
}

impl<B: VectorBackend> Index<B> {
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub async fn upsert(&self, params: &UpsertVectorsParams) -> Result<UpsertVectorsResponse> {
        validate::validate_upsert_vectors(params)?;
        debug!(
            index = %self.name,
            namespace = %params.namespace,
            count = params.vectors.len(),
            "upsert vectors"
        );
        self.backend.upsert(params).await
    }

    pub async fn query(&self, params: &QueryParams) -> Result<QueryResponse> {
        validate::validate_query(params)?;
        debug!(index = %self.name, namespace = %params.namespace, top_k = params.top_k, "query");
        self.backend.query(params).await
    }

    pub async fn fetch(&self, params: &FetchVectorsParams) -> Result<FetchVectorsResponse> {
        validate::validate_fetch_vectors(params)?;
        debug!(
            index = %self.name,
            namespace = %params.namespace,
            count = params.ids.len(),
            "fetch vectors"
        );
        self.backend.fetch(params).await
    }

    pub async fn update(&self, params: &UpdateVectorParams) -> Result<()> {
        validate::validate_update_vector(params)?;
        debug!(index = %self.name, namespace = %params.namespace, id = %params.id, "update vector");
        self.backend.update(params).await
    }

    pub async fn delete(&self, params: &DeleteVectorsParams) -> Result<()> {
        validate::validate_delete_vectors(params)?;
        debug!(
            index = %self.name,
            namespace = %params.namespace,
            count = params.ids.len(),
            delete_all = params.delete_all,
            "delete vectors"
        );
        self.backend.delete(params).await
    }

    pub async fn describe_index_stats(
        &self,
        params: &DescribeIndexStatsParams,
    ) -> Result<IndexStats> {
        debug!(index = %self.name, filtered = params.filter.is_some(), "describe index stats");
        self.backend.describe_index_stats(params).await
    }
}
