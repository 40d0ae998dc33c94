//! Protobuf messages and unary client for the `VectorService` data plane.
//!
//! Field numbers follow the service's `vector_service.proto`. Deprecated
//! batch-query fields are not modelled.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SparseValues {
    #[prost(uint32, repeated, tag = "1")]
    pub indices: ::prost::alloc::vec::Vec<u32>,
    #[prost(float, repeated, tag = "2")]
    pub values: ::prost::alloc::vec::Vec<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Vector {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(float, repeated, tag = "2")]
    pub values: ::prost::alloc::vec::Vec<f32>,
    #[prost(message, optional, tag = "4")]
    pub sparse_values: ::core::option::Option<SparseValues>,
    #[prost(message, optional, tag = "3")]
    pub metadata: ::core::option::Option<::prost_types::Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ScoredVector {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(float, tag = "2")]
    pub score: f32,
    #[prost(float, repeated, tag = "3")]
    pub values: ::prost::alloc::vec::Vec<f32>,
    #[prost(message, optional, tag = "5")]
    pub sparse_values: ::core::option::Option<SparseValues>,
    #[prost(message, optional, tag = "4")]
    pub metadata: ::core::option::Option<::prost_types::Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpsertRequest {
    #[prost(message, repeated, tag = "1")]
    pub vectors: ::prost::alloc::vec::Vec<Vector>,
    #[prost(string, tag = "2")]
    pub namespace: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct UpsertResponse {
    #[prost(uint32, tag = "1")]
    pub upserted_count: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteRequest {
    #[prost(string, repeated, tag = "1")]
    pub ids: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(bool, tag = "2")]
    pub delete_all: bool,
    #[prost(string, tag = "3")]
    pub namespace: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "4")]
    pub filter: ::core::option::Option<::prost_types::Struct>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct DeleteResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FetchRequest {
    #[prost(string, repeated, tag = "1")]
    pub ids: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, tag = "2")]
    pub namespace: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FetchResponse {
    #[prost(map = "string, message", tag = "1")]
    pub vectors: ::std::collections::HashMap<::prost::alloc::string::String, Vector>,
    #[prost(string, tag = "2")]
    pub namespace: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryRequest {
    #[prost(string, tag = "1")]
    pub namespace: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub top_k: u32,
    #[prost(message, optional, tag = "3")]
    pub filter: ::core::option::Option<::prost_types::Struct>,
    #[prost(bool, tag = "4")]
    pub include_values: bool,
    #[prost(bool, tag = "5")]
    pub include_metadata: bool,
    #[prost(float, repeated, tag = "7")]
    pub vector: ::prost::alloc::vec::Vec<f32>,
    #[prost(message, optional, tag = "9")]
    pub sparse_vector: ::core::option::Option<SparseValues>,
    #[prost(string, tag = "8")]
    pub id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryResponse {
    #[prost(message, repeated, tag = "2")]
    pub matches: ::prost::alloc::vec::Vec<ScoredVector>,
    #[prost(string, tag = "3")]
    pub namespace: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateRequest {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(float, repeated, tag = "2")]
    pub values: ::prost::alloc::vec::Vec<f32>,
    #[prost(message, optional, tag = "5")]
    pub sparse_values: ::core::option::Option<SparseValues>,
    #[prost(message, optional, tag = "3")]
    pub set_metadata: ::core::option::Option<::prost_types::Struct>,
    #[prost(string, tag = "4")]
    pub namespace: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct UpdateResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DescribeIndexStatsRequest {
    #[prost(message, optional, tag = "1")]
    pub filter: ::core::option::Option<::prost_types::Struct>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct NamespaceSummary {
    #[prost(uint32, tag = "1")]
    pub vector_count: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DescribeIndexStatsResponse {
    #[prost(map = "string, message", tag = "1")]
    pub namespaces: ::std::collections::HashMap<::prost::alloc::string::String, NamespaceSummary>,
    #[prost(uint32, tag = "2")]
    pub dimension: u32,
    #[prost(float, tag = "3")]
    pub index_fullness: f32,
    #[prost(uint32, tag = "4")]
    pub total_vector_count: u32,
}

/// Unary client for `VectorService`.
pub mod vector_service_client {
    #![allow(unused_variables, dead_code, missing_docs, clippy::wildcard_imports)]
    use tonic::codegen::http::Uri;
    use tonic::codegen::*;

    const SERVICE: &str = "VectorService";

    #[derive(Debug, Clone)]
    pub struct VectorServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> VectorServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::Body>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }

        async fn unary<Req, Resp>(
            &mut self,
            request: impl tonic::IntoRequest<Req>,
            method: &'static str,
            path: &'static str,
        ) -> std::result::Result<tonic::Response<Resp>, tonic::Status>
        where
            Req: ::prost::Message + Send + Sync + 'static,
            Resp: ::prost::Message + Default + Send + Sync + 'static,
        {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic_prost::ProstCodec::<Req, Resp>::default();
            let path = http::uri::PathAndQuery::from_static(path);
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new(SERVICE, method));
            self.inner.unary(req, path, codec).await
        }

        pub async fn upsert(
            &mut self,
            request: impl tonic::IntoRequest<super::UpsertRequest>,
        ) -> std::result::Result<tonic::Response<super::UpsertResponse>, tonic::Status> {
            self.unary(request, "Upsert", "/VectorService/Upsert").await
        }

        pub async fn delete(
            &mut self,
            request: impl tonic::IntoRequest<super::DeleteRequest>,
        ) -> std::result::Result<tonic::Response<super::DeleteResponse>, tonic::Status> {
            self.unary(request, "Delete", "/VectorService/Delete").await
        }

        pub async fn fetch(
            &mut self,
            request: impl tonic::IntoRequest<super::FetchRequest>,
        ) -> std::result::Result<tonic::Response<super::FetchResponse>, tonic::Status> {
            self.unary(request, "Fetch", "/VectorService/Fetch").await
        }

        pub async fn query(
            &mut self,
            request: impl tonic::IntoRequest<super::QueryRequest>,
        ) -> std::result::Result<tonic::Response<super::QueryResponse>, tonic::Status> {
            self.unary(request, "Query", "/VectorService/Query").await
        }

        pub async fn update(
            &mut self,
            request: impl tonic::IntoRequest<super::UpdateRequest>,
        ) -> std::result::Result<tonic::Response<super::UpdateResponse>, tonic::Status> {
            self.unary(request, "Update", "/VectorService/Update").await
        }

        pub async fn describe_index_stats(
            &mut self,
            request: impl tonic::IntoRequest<super::DescribeIndexStatsRequest>,
        ) -> std::result::Result<
            tonic::Response<super::DescribeIndexStatsResponse>,
            tonic::Status,
        > {
            self.unary(
                request,
                "DescribeIndexStats",
                "/VectorService/DescribeIndexStats",
            )
            .await
        }
    }
}
