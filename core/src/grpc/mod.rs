//! gRPC data-plane backend.
//!
//! # Design
//! `GrpcBackend` owns one tonic channel to one index. Tonic clients need
//! `&mut self`, so each call clones the client, which only clones the
//! channel handle. The channel is released when the last clone is dropped;
//! `close` makes that explicit at the call site.

pub mod convert;
pub mod proto;

use async_trait::async_trait;
use tonic::metadata::{AsciiMetadataValue, MetadataValue};
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Code, Request, Status};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{PineconeError, Result};
use crate::index::VectorBackend;
use crate::types::{
    DeleteVectorsParams, DescribeIndexStatsParams, FetchVectorsParams, FetchVectorsResponse,
    IndexStats, QueryParams, QueryResponse, UpdateVectorParams, UpsertVectorsParams,
    UpsertVectorsResponse,
};
use proto::vector_service_client::VectorServiceClient;

pub const API_KEY_METADATA: &str = "api-key";

/// Attaches the project API key to every outgoing call.
#[derive(Clone, Debug)]
pub struct ApiKeyInterceptor {
    value: AsciiMetadataValue,
}

impl ApiKeyInterceptor {
    pub fn new(api_key: &str) -> Result<Self> {
        let mut value: AsciiMetadataValue = MetadataValue::try_from(api_key).map_err(|_| {
            PineconeError::Config("api key is not valid ASCII metadata".to_string())
        })?;
        value.set_sensitive(true);
        Ok(Self { value })
    }
}

impl tonic::service::Interceptor for ApiKeyInterceptor {
    fn call(&mut self, mut request: Request<()>) -> std::result::Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert(API_KEY_METADATA, self.value.clone());
        Ok(request)
    }
}

type Client = VectorServiceClient<InterceptedService<Channel, ApiKeyInterceptor>>;

#[derive(Debug, Clone)]
pub struct GrpcBackend {
    client: Client,
}

impl GrpcBackend {
    /// Dial `<index>-<project>.svc.<environment>.pinecone.io:443` over TLS.
    pub async fn connect(config: &ClientConfig, index_name: &str) -> Result<Self> {
        let host = config.index_host(index_name)?;
        let tls = ClientTlsConfig::new()
            .with_webpki_roots()
            .domain_name(host.clone());
        let mut endpoint = Endpoint::from_shared(format!("https://{host}:443"))
            .map_err(PineconeError::transport)?
            .tls_config(tls)
            .map_err(PineconeError::transport)?;
        if let Some(timeout) = config.timeout() {
            endpoint = endpoint.timeout(timeout).connect_timeout(timeout);
        }

        debug!(%host, "connecting gRPC channel");
        let channel = endpoint.connect().await.map_err(PineconeError::transport)?;
        Self::from_channel(channel, config.api_key())
    }

    /// Dial an explicit endpoint such as `http://127.0.0.1:5081`.
    pub async fn connect_to(endpoint: &str, api_key: &str) -> Result<Self> {
        let channel = Endpoint::from_shared(endpoint.to_string())
            .map_err(PineconeError::transport)?
            .connect()
            .await
            .map_err(PineconeError::transport)?;
        Self::from_channel(channel, api_key)
    }

    pub fn from_channel(channel: Channel, api_key: &str) -> Result<Self> {
        let interceptor = ApiKeyInterceptor::new(api_key)?;
        Ok(Self {
            client: VectorServiceClient::new(InterceptedService::new(channel, interceptor)),
        })
    }

    /// Drop the channel now instead of at end of scope.
    pub fn close(self) {
        debug!("closing gRPC channel");
    }
}

/// Map a gRPC status onto the crate's error taxonomy.
pub fn status_to_error(status: Status) -> PineconeError {
    match status.code() {
        Code::NotFound => PineconeError::NotFound,
        Code::Unavailable | Code::Cancelled | Code::DeadlineExceeded => {
            PineconeError::transport(status)
        }
        code => PineconeError::RequestFailed {
            status: http_status(code),
            body: status.message().to_string(),
        },
    }
}

/// HTTP status conventionally paired with a gRPC code.
fn http_status(code: Code) -> u16 {
    match code {
        Code::Ok => 200,
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => 400,
        Code::Unauthenticated => 401,
        Code::PermissionDenied => 403,
        Code::NotFound => 404,
        Code::AlreadyExists | Code::Aborted => 409,
        Code::ResourceExhausted => 429,
        Code::Cancelled => 499,
        Code::Unimplemented => 501,
        Code::Unavailable => 503,
        Code::DeadlineExceeded => 504,
        _ => 500,
    }
}

#[async_trait]
impl VectorBackend for GrpcBackend {
    async fn upsert(&self, params: &UpsertVectorsParams) -> Result<UpsertVectorsResponse> {
        let mut client = self.client.clone();
        let resp = client
            .upsert(proto::UpsertRequest::from(params))
            .await
            .map_err(status_to_error)?;
        Ok(resp.into_inner().into())
    }

    async fn query(&self, params: &QueryParams) -> Result<QueryResponse> {
        let mut client = self.client.clone();
        let resp = client
            .query(proto::QueryRequest::from(params))
            .await
            .map_err(status_to_error)?;
        Ok(resp.into_inner().into())
    }

    async fn fetch(&self, params: &FetchVectorsParams) -> Result<FetchVectorsResponse> {
        let mut client = self.client.clone();
        let resp = client
            .fetch(proto::FetchRequest::from(params))
            .await
            .map_err(status_to_error)?;
        Ok(resp.into_inner().into())
    }

    async fn update(&self, params: &UpdateVectorParams) -> Result<()> {
        let mut client = self.client.clone();
        client
            .update(proto::UpdateRequest::from(params))
            .await
            .map_err(status_to_error)?;
        Ok(())
    }

    async fn delete(&self, params: &DeleteVectorsParams) -> Result<()> {
        let mut client = self.client.clone();
        client
            .delete(proto::DeleteRequest::from(params))
            .await
            .map_err(status_to_error)?;
        Ok(())
    }

    async fn describe_index_stats(&self, params: &DescribeIndexStatsParams) -> Result<IndexStats> {
        let mut client = self.client.clone();
        let resp = client
            .describe_index_stats(proto::DescribeIndexStatsRequest::from(params))
            .await
            .map_err(status_to_error)?;
        Ok(resp.into_inner().into())
    }
}
