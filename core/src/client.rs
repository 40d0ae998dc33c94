//! Control-plane dispatcher and entry point.
//!
//! # Design
//! `Pinecone` pairs the sans-IO `ControllerApi` with a `Transport`. Every
//! method runs the same pipeline: validate, build, send, parse. The
//! configuration is immutable and shared through an `Arc`, so a `Pinecone`
//! can be cloned into concurrent tasks without any coordination.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{ControllerApi, DataPlaneApi};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::grpc::GrpcBackend;
use crate::index::{Index, RestBackend};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{ConfigureIndexParams, CreateIndexParams, IndexDescription};
use crate::validate;

#[derive(Debug, Clone)]
pub struct Pinecone<T = ReqwestTransport> {
    config: Arc<ClientConfig>,
    api: ControllerApi,
    transport: T,
}

impl Pinecone<ReqwestTransport> {
    /// Client using the default reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Pinecone<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let api = ControllerApi::new(&config);
        Self {
            config: Arc::new(config),
            api,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Names of every index in the project.
    pub async fn list_indexes(&self) -> Result<Vec<String>> {
        let req = self.api.build_list_indexes()?;
        let names = self.api.parse_list_indexes(self.transport.send(req).await?)?;
        debug!(count = names.len(), "listed indexes");
        Ok(names)
    }

    pub async fn create_index(&self, params: &CreateIndexParams) -> Result<()> {
        validate::validate_create_index(params)?;
        let req = self.api.build_create_index(params)?;
        self.api
            .parse_create_index(self.transport.send(req).await?)?;
        info!(index = %params.name, dimension = params.dimension, "created index");
        Ok(())
    }

    /// Fails with `NotFound` when no index has this name.
    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        validate::validate_index_name(name)?;
        let req = self.api.build_describe_index(name)?;
        self.api
            .parse_describe_index(self.transport.send(req).await?)
    }

    /// Fails with `NotFound` when no index has this name.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        validate::validate_index_name(name)?;
        let req = self.api.build_delete_index(name)?;
        self.api
            .parse_delete_index(self.transport.send(req).await?)?;
        info!(index = %name, "deleted index");
        Ok(())
    }

    /// Change replicas and/or pod type of an existing index.
    pub async fn configure_index(&self, params: &ConfigureIndexParams) -> Result<()> {
        validate::validate_configure_index(params)?;
        let req = self.api.build_configure_index(params)?;
        self.api
            .parse_configure_index(self.transport.send(req).await?)?;
        info!(
            index = %params.index_name,
            replicas = ?params.replicas,
            pod_type = ?params.pod_type,
            pod_size = ?params.pod_size,
            "configured index"
        );
        Ok(())
    }
}

impl<T: Transport + Clone> Pinecone<T> {
    /// REST data-plane handle for `name`, addressed through the project's
    /// service host.
    pub fn index(&self, name: &str) -> Result<Index<RestBackend<T>>> {
        validate::validate_index_name(name)?;
        let url = self.config.index_url(name)?;
        Ok(self.index_at(name, &url))
    }

    /// REST data-plane handle for an index served at an explicit base URL.
    pub fn index_at(&self, name: &str, base_url: &str) -> Index<RestBackend<T>> {
        let api = DataPlaneApi::new(base_url, self.config.api_key());
        Index::new(name, RestBackend::new(api, self.transport.clone()))
    }
}

impl<T> Pinecone<T> {
    /// gRPC data-plane handle for `name`. The connection is closed when the
    /// returned `Index` (or its backend) is dropped.
    pub async fn grpc_index(&self, name: &str) -> Result<Index<GrpcBackend>> {
        validate::validate_index_name(name)?;
        let backend = GrpcBackend::connect(&self.config, name).await?;
        Ok(Index::new(name, backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PineconeError;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::transport::MockTransport;
    use crate::types::{PodSize, PodType};

    fn config() -> ClientConfig {
        ClientConfig::new("test-key", "env")
            .with_project_name("proj")
            .with_controller_url("http://localhost:3000")
    }

    #[tokio::test]
    async fn describe_missing_index_is_not_found() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method == HttpMethod::Get && req.url.ends_with("/databases/ghost"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(404, "")));
        let client = Pinecone::with_transport(config(), transport);

        let err = client.describe_index("ghost").await.unwrap_err();
        assert!(matches!(err, PineconeError::NotFound));
    }

    #[tokio::test]
    async fn half_pod_spec_is_rejected_locally() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(0);
        let client = Pinecone::with_transport(config(), transport);

        let params = CreateIndexParams {
            pod_type: Some(PodType::P1),
            ..CreateIndexParams::new("movies", 8)
        };
        let err = client.create_index(&params).await.unwrap_err();
        assert!(matches!(err, PineconeError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn create_index_sends_composite_pod_type() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                let body: serde_json::Value =
                    serde_json::from_str(req.body.as_deref().unwrap_or("{}")).unwrap();
                req.method == HttpMethod::Post && body["pod_type"] == "s1.4"
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(201, "")));
        let client = Pinecone::with_transport(config(), transport);

        let params = CreateIndexParams {
            pod_type: Some(PodType::S1),
            pod_size: Some(PodSize::X4),
            ..CreateIndexParams::new("movies", 8)
        };
        client.create_index(&params).await.unwrap();
    }

    #[tokio::test]
    async fn unauthorized_list_is_request_failed() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, "API key is missing or invalid")));
        let client = Pinecone::with_transport(config(), transport);

        let err = client.list_indexes().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "request failed: API key is missing or invalid, status code: 401"
        );
    }

    #[tokio::test]
    async fn configure_without_changes_is_rejected_locally() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(0);
        let client = Pinecone::with_transport(config(), transport);

        let err = client
            .configure_index(&ConfigureIndexParams {
                index_name: "movies".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PineconeError::InvalidParameters(_)));
    }

    #[test]
    fn index_handle_targets_service_host() {
        let transport = ReqwestTransport::with_client(Default::default(), false);
        let client = Pinecone::with_transport(config(), transport);
        let index = client.index("movies").unwrap();
        assert_eq!(index.name(), "movies");
        assert_eq!(
            index.backend().api().base_url(),
            "https://movies-proj.svc.env.pinecone.io"
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = ClientConfig::new("super-secret", "env").with_project_name("p");
        let transport = ReqwestTransport::with_client(Default::default(), false);
        let client = Pinecone::with_transport(config, transport);

        let rendered = format!("{client:?}");
        assert!(!rendered.contains("super-secret"), "client Debug leaks key: {rendered}");

        let index = client.index("movies").unwrap();
        let rendered = format!("{index:?}");
        assert!(!rendered.contains("super-secret"), "index Debug leaks key: {rendered}");
        assert!(rendered.contains("movies-p.svc.env.pinecone.io"));
    }
}
