//! Client library for the Pinecone managed vector database.
//!
//! # Overview
//! Index management (`Pinecone`) and vector operations (`Index`) are thin
//! pipelines over a sans-IO core: params are validated, turned into an
//! `HttpRequest` (or a protobuf message for gRPC), sent through a
//! transport, and the outcome is classified into `PineconeError`.
//!
//! # Design
//! - `validate` and `payload` are pure; invalid params never reach a
//!   transport.
//! - `api` builds and parses plain-data HTTP values, so request shapes are
//!   testable without a server.
//! - `Transport` and `VectorBackend` are the I/O seams. The REST and gRPC
//!   backends are interchangeable behind `Index`.
//! - `ClientConfig` is immutable once a client is built.
//! - No retries, caching or rate limiting: callers own those policies.
//!   Cancellation is dropping the future; deadlines come from
//!   `ClientConfig::with_timeout` or the caller's own `timeout`.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod grpc;
pub mod http;
pub mod index;
pub mod payload;
pub mod transport;
pub mod types;
pub mod validate;

pub use api::{ControllerApi, DataPlaneApi};
pub use client::Pinecone;
pub use config::ClientConfig;
pub use error::{PineconeError, Result};
pub use grpc::GrpcBackend;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use index::{Index, RestBackend, VectorBackend};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    ConfigureIndexParams, CreateIndexParams, Database, DeleteVectorsParams,
    DescribeIndexStatsParams, FetchVectorsParams, FetchVectorsResponse, IndexDescription,
    IndexStats, IndexStatus, Metadata, MetadataConfig, Metric, NamespaceSummary, PodSize, PodType,
    QueryParams, QueryResponse, ScoredVector, SparseValues, UpdateVectorParams,
    UpsertVectorsParams, UpsertVectorsResponse, Vector,
};
