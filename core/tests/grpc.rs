//! gRPC backend against an in-process `VectorService`.
//!
//! # Design
//! A small tonic service is served on a random port and reached through
//! `GrpcBackend::connect_to`, so the client's method paths, message tags,
//! the api-key interceptor and status mapping all run over a real HTTP/2
//! connection. The service keeps vectors in memory and records the api keys
//! and filters it receives.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use pinecone_core::grpc::{convert, proto};
use pinecone_core::{
    DeleteVectorsParams, DescribeIndexStatsParams, FetchVectorsParams, GrpcBackend, Index,
    Metadata, PineconeError, QueryParams, SparseValues, UpdateVectorParams, UpsertVectorsParams,
    Vector,
};
use serde_json::json;
use tonic::body::Body;
use tonic::codegen::{http, BoxFuture, Service};
use tonic::server::{NamedService, UnaryService};
use tonic::{Request, Response, Status};

const API_KEY: &str = "grpc-key";

// ---------------------------------------------------------------------------
// In-process service
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Store {
    keys: Vec<String>,
    filters: Vec<Option<prost_types::Struct>>,
    /// (namespace, id) -> vector
    vectors: HashMap<(String, String), proto::Vector>,
}

#[derive(Clone, Default)]
struct InMemoryVectorService {
    store: Arc<Mutex<Store>>,
}

type GrpcResult<T> = Result<Response<T>, Status>;

impl InMemoryVectorService {
    fn keys(&self) -> Vec<String> {
        self.store.lock().unwrap().keys.clone()
    }

    fn filters(&self) -> Vec<Option<prost_types::Struct>> {
        self.store.lock().unwrap().filters.clone()
    }

    fn authorize<T>(&self, request: &Request<T>) -> Result<(), Status> {
        let key = request
            .metadata()
            .get("api-key")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let authorized = key == API_KEY;
        self.store.lock().unwrap().keys.push(key);
        if authorized {
            Ok(())
        } else {
            Err(Status::unauthenticated("API key is missing or invalid"))
        }
    }

    fn upsert(&self, request: Request<proto::UpsertRequest>) -> GrpcResult<proto::UpsertResponse> {
        self.authorize(&request)?;
        let req = request.into_inner();
        let mut store = self.store.lock().unwrap();
        let upserted_count = req.vectors.len() as u32;
        for v in req.vectors {
            store.vectors.insert((req.namespace.clone(), v.id.clone()), v);
        }
        Ok(Response::new(proto::UpsertResponse { upserted_count }))
    }

    fn fetch(&self, request: Request<proto::FetchRequest>) -> GrpcResult<proto::FetchResponse> {
        self.authorize(&request)?;
        let req = request.into_inner();
        let store = self.store.lock().unwrap();
        let vectors = req
            .ids
            .iter()
            .filter_map(|id| {
                store
                    .vectors
                    .get(&(req.namespace.clone(), id.clone()))
                    .map(|v| (id.clone(), v.clone()))
            })
            .collect();
        Ok(Response::new(proto::FetchResponse {
            vectors,
            namespace: req.namespace,
        }))
    }

    fn query(&self, request: Request<proto::QueryRequest>) -> GrpcResult<proto::QueryResponse> {
        self.authorize(&request)?;
        let req = request.into_inner();
        let mut store = self.store.lock().unwrap();
        store.filters.push(req.filter.clone());

        let anchor = if req.id.is_empty() {
            req.vector.clone()
        } else {
            store
                .vectors
                .get(&(req.namespace.clone(), req.id.clone()))
                .map(|v| v.values.clone())
                .ok_or_else(|| Status::not_found(format!("vector {} not found", req.id)))?
        };

        let mut matches: Vec<proto::ScoredVector> = store
            .vectors
            .iter()
            .filter(|((ns, _), _)| *ns == req.namespace)
            .map(|(_, v)| proto::ScoredVector {
                id: v.id.clone(),
                score: anchor.iter().zip(&v.values).map(|(a, b)| a * b).sum(),
                values: if req.include_values {
                    v.values.clone()
                } else {
                    Vec::new()
                },
                sparse_values: None,
                metadata: if req.include_metadata {
                    v.metadata.clone()
                } else {
                    None
                },
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(req.top_k as usize);
        Ok(Response::new(proto::QueryResponse {
            matches,
            namespace: req.namespace,
        }))
    }

    fn update(&self, request: Request<proto::UpdateRequest>) -> GrpcResult<proto::UpdateResponse> {
        self.authorize(&request)?;
        let req = request.into_inner();
        let mut store = self.store.lock().unwrap();
        let v = store
            .vectors
            .get_mut(&(req.namespace.clone(), req.id.clone()))
            .ok_or_else(|| Status::not_found(format!("vector {} not found", req.id)))?;
        if !req.values.is_empty() {
            v.values = req.values;
        }
        if let Some(set) = req.set_metadata {
            v.metadata.get_or_insert_with(Default::default).fields.extend(set.fields);
        }
        Ok(Response::new(proto::UpdateResponse {}))
    }

    fn delete(&self, request: Request<proto::DeleteRequest>) -> GrpcResult<proto::DeleteResponse> {
        self.authorize(&request)?;
        let req = request.into_inner();
        let mut store = self.store.lock().unwrap();
        store.vectors.retain(|(ns, id), _| {
            *ns != req.namespace || !(req.delete_all || req.ids.contains(id))
        });
        Ok(Response::new(proto::DeleteResponse {}))
    }

    fn describe_index_stats(
        &self,
        request: Request<proto::DescribeIndexStatsRequest>,
    ) -> GrpcResult<proto::DescribeIndexStatsResponse> {
        self.authorize(&request)?;
        let store = self.store.lock().unwrap();
        let mut namespaces: HashMap<String, proto::NamespaceSummary> = HashMap::new();
        let mut dimension = 0;
        for ((ns, _), v) in &store.vectors {
            namespaces.entry(ns.clone()).or_default().vector_count += 1;
            dimension = v.values.len() as u32;
        }
        Ok(Response::new(proto::DescribeIndexStatsResponse {
            namespaces,
            dimension,
            index_fullness: 0.0,
            total_vector_count: store.vectors.len() as u32,
        }))
    }
}

struct Unary<F>(F);

impl<Req, Resp, F> UnaryService<Req> for Unary<F>
where
    F: FnMut(Request<Req>) -> GrpcResult<Resp>,
{
    type Response = Resp;
    type Future = std::future::Ready<GrpcResult<Resp>>;

    fn call(&mut self, request: Request<Req>) -> Self::Future {
        std::future::ready((self.0)(request))
    }
}

fn unary<Req, Resp, F>(
    req: http::Request<Body>,
    handler: F,
) -> BoxFuture<http::Response<Body>, Infallible>
where
    Req: prost::Message + Default + Send + 'static,
    Resp: prost::Message + Send + 'static,
    F: FnMut(Request<Req>) -> GrpcResult<Resp> + Send + 'static,
{
    Box::pin(async move {
        let codec = tonic_prost::ProstCodec::<Resp, Req>::default();
        let mut grpc = tonic::server::Grpc::new(codec);
        Ok(grpc.unary(Unary(handler), req).await)
    })
}

impl Service<http::Request<Body>> for InMemoryVectorService {
    type Response = http::Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<Body>) -> Self::Future {
        let svc = self.clone();
        let path = req.uri().path().to_string();
        match path.as_str() {
            "/VectorService/Upsert" => unary(req, move |r| svc.upsert(r)),
            "/VectorService/Fetch" => unary(req, move |r| svc.fetch(r)),
            "/VectorService/Query" => unary(req, move |r| svc.query(r)),
            "/VectorService/Update" => unary(req, move |r| svc.update(r)),
            "/VectorService/Delete" => unary(req, move |r| svc.delete(r)),
            "/VectorService/DescribeIndexStats" => {
                unary(req, move |r| svc.describe_index_stats(r))
            }
            _ => Box::pin(async { Ok(Status::unimplemented("unknown method").into_http()) }),
        }
    }
}

impl NamedService for InMemoryVectorService {
    const NAME: &'static str = "VectorService";
}

async fn start_server(service: InMemoryVectorService) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(service)
            .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
            .await
            .unwrap();
    });
    format!("http://{addr}")
}

async fn connect(endpoint: &str, api_key: &str) -> Index<GrpcBackend> {
    let backend = GrpcBackend::connect_to(endpoint, api_key).await.unwrap();
    Index::new("movies", backend)
}

fn metadata(value: serde_json::Value) -> Metadata {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn seed_vectors() -> UpsertVectorsParams {
    let mut drama = Vector::new("a", vec![1.0, 0.0]);
    drama.metadata = Some(metadata(json!({"genre": "drama", "year": 2019.0})));
    let mut sparse = Vector::new("b", vec![0.0, 1.0]);
    sparse.sparse_values = Some(SparseValues::new(vec![4, 9], vec![0.25, 0.5]));
    UpsertVectorsParams {
        vectors: vec![drama, sparse],
        namespace: "ns".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn upsert_fetch_query_round_trip() {
    let service = InMemoryVectorService::default();
    let endpoint = start_server(service.clone()).await;
    let index = connect(&endpoint, API_KEY).await;
    let seed = seed_vectors();

    let upserted = index.upsert(&seed).await.unwrap();
    assert_eq!(upserted.upserted_count, 2);

    let fetched = index
        .fetch(&FetchVectorsParams {
            ids: vec!["a".to_string(), "b".to_string(), "missing".to_string()],
            namespace: "ns".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(fetched.namespace, "ns");
    assert_eq!(fetched.vectors.len(), 2);
    assert_eq!(fetched.vectors["a"], seed.vectors[0]);
    assert_eq!(fetched.vectors["b"], seed.vectors[1]);

    let filter = metadata(json!({"genre": {"$eq": "drama"}}));
    let result = index
        .query(&QueryParams {
            namespace: "ns".to_string(),
            top_k: 1,
            vector: Some(vec![1.0, 0.0]),
            filter: Some(filter.clone()),
            include_metadata: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].id, "a");
    assert_eq!(result.matches[0].score, 1.0);
    assert!(result.matches[0].values.is_empty());
    assert_eq!(result.matches[0].metadata, seed.vectors[0].metadata);

    let filters = service.filters();
    assert_eq!(filters.len(), 1);
    let sent = filters[0].clone().expect("filter should be sent");
    assert_eq!(convert::struct_to_metadata(sent), filter);

    let keys = service.keys();
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().all(|k| k == API_KEY), "unexpected keys: {keys:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn query_by_id_returns_stored_values() {
    let service = InMemoryVectorService::default();
    let endpoint = start_server(service.clone()).await;
    let index = connect(&endpoint, API_KEY).await;
    index.upsert(&seed_vectors()).await.unwrap();

    let result = index
        .query(&QueryParams {
            namespace: "ns".to_string(),
            top_k: 2,
            id: Some("b".to_string()),
            include_values: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result.matches[0].id, "b");
    assert_eq!(result.matches[0].values, vec![0.0, 1.0]);
    assert!(result.matches[0].metadata.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn not_found_status_maps_to_not_found() {
    let service = InMemoryVectorService::default();
    let endpoint = start_server(service.clone()).await;
    let index = connect(&endpoint, API_KEY).await;

    let err = index
        .query(&QueryParams {
            namespace: "ns".to_string(),
            top_k: 1,
            id: Some("ghost".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PineconeError::NotFound), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_api_key_is_request_failed() {
    let service = InMemoryVectorService::default();
    let endpoint = start_server(service.clone()).await;
    let index = connect(&endpoint, "wrong-key").await;

    let err = index.upsert(&seed_vectors()).await.unwrap_err();
    let PineconeError::RequestFailed { status, body } = err else {
        panic!("expected request failure, got {err:?}");
    };
    assert_eq!(status, 401);
    assert_eq!(body, "API key is missing or invalid");
    assert_eq!(service.keys(), vec!["wrong-key".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_delete_and_stats() {
    let service = InMemoryVectorService::default();
    let endpoint = start_server(service.clone()).await;
    let index = connect(&endpoint, API_KEY).await;
    index.upsert(&seed_vectors()).await.unwrap();

    index
        .update(&UpdateVectorParams {
            id: "a".to_string(),
            namespace: "ns".to_string(),
            values: vec![3.0, 4.0],
            set_metadata: Some(metadata(json!({"year": 2020.0}))),
            ..Default::default()
        })
        .await
        .unwrap();
    let fetched = index
        .fetch(&FetchVectorsParams {
            ids: vec!["a".to_string()],
            namespace: "ns".to_string(),
        })
        .await
        .unwrap();
    let a = &fetched.vectors["a"];
    assert_eq!(a.values, vec![3.0, 4.0]);
    assert_eq!(
        a.metadata,
        Some(metadata(json!({"genre": "drama", "year": 2020.0})))
    );

    let stats = index
        .describe_index_stats(&DescribeIndexStatsParams::default())
        .await
        .unwrap();
    assert_eq!(stats.total_vector_count, 2);
    assert_eq!(stats.dimension, 2);
    assert_eq!(stats.namespaces["ns"].vector_count, 2);

    index
        .delete(&DeleteVectorsParams {
            ids: vec!["b".to_string()],
            namespace: "ns".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let stats = index
        .describe_index_stats(&DescribeIndexStatsParams::default())
        .await
        .unwrap();
    assert_eq!(stats.total_vector_count, 1);

    index
        .delete(&DeleteVectorsParams {
            delete_all: true,
            namespace: "ns".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let stats = index
        .describe_index_stats(&DescribeIndexStatsParams::default())
        .await
        .unwrap();
    assert_eq!(stats.total_vector_count, 0);
    assert!(stats.namespaces.is_empty());

    index.into_backend().close();
}

#[tokio::test(flavor = "multi_thread")]
async fn update_missing_vector_is_not_found() {
    let service = InMemoryVectorService::default();
    let endpoint = start_server(service.clone()).await;
    let index = connect(&endpoint, API_KEY).await;

    let err = index
        .update(&UpdateVectorParams {
            id: "ghost".to_string(),
            namespace: "ns".to_string(),
            values: vec![1.0],
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
