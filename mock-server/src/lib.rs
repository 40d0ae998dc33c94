//! In-memory imitation of the Pinecone controller and data-plane REST APIs.
//!
//! One router serves both planes, and all vector routes act on a single
//! shared vector store regardless of which index is addressed. Every request
//! must carry the configured `Api-Key` header. Query filters are accepted
//! but not evaluated; scores are dot products.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, RawQuery, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const DEFAULT_API_KEY: &str = "test-key";
pub const UNAUTHORIZED_BODY: &str = "API key is missing or invalid";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Database {
    pub name: String,
    pub metric: String,
    pub dimension: u32,
    pub replicas: u32,
    pub shards: u32,
    pub pods: u32,
    pub pod_type: String,
}

#[derive(Deserialize)]
pub struct CreateIndex {
    pub name: String,
    pub dimension: u32,
    pub metric: Option<String>,
    pub pods: Option<u32>,
    pub replicas: Option<u32>,
    pub pod_type: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfigureIndex {
    pub replicas: Option<u32>,
    pub pod_type: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredVector {
    pub id: String,
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_values: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub struct Upsert {
    pub vectors: Vec<StoredVector>,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub namespace: String,
    pub top_k: usize,
    pub vector: Option<Vec<f32>>,
    pub id: Option<String>,
    #[serde(default)]
    pub include_values: bool,
    #[serde(default)]
    pub include_metadata: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: String,
    #[serde(default)]
    pub namespace: String,
    pub values: Option<Vec<f32>>,
    pub sparse_values: Option<Value>,
    pub set_metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delete {
    pub ids: Option<Vec<String>>,
    #[serde(default)]
    pub delete_all: bool,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Default)]
pub struct Store {
    pub indexes: HashMap<String, Database>,
    /// namespace -> id -> vector
    pub vectors: HashMap<String, HashMap<String, StoredVector>>,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    store: Arc<RwLock<Store>>,
}

pub fn app() -> Router {
    app_with_key(DEFAULT_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        store: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route("/databases", get(list_indexes).post(create_index))
        .route(
            "/databases/{name}",
            get(describe_index)
                .delete(delete_index)
                .patch(configure_index),
        )
        .route("/vectors/upsert", post(upsert))
        .route("/vectors/fetch", get(fetch))
        .route("/vectors/update", post(update))
        .route("/vectors/delete", post(delete))
        .route("/query", post(query))
        .route("/describe_index_stats", post(describe_index_stats))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| key == &*state.api_key);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, UNAUTHORIZED_BODY).into_response();
    }
    next.run(request).await
}

// --- controller ---

async fn list_indexes(State(state): State<AppState>) -> Json<Vec<String>> {
    let store = state.store.read().await;
    let mut names: Vec<String> = store.indexes.keys().cloned().collect();
    names.sort();
    Json(names)
}

async fn create_index(
    State(state): State<AppState>,
    Json(input): Json<CreateIndex>,
) -> (StatusCode, String) {
    if input.dimension == 0 {
        return (StatusCode::BAD_REQUEST, "dimension must be positive".to_string());
    }
    let mut store = state.store.write().await;
    if store.indexes.contains_key(&input.name) {
        return (
            StatusCode::CONFLICT,
            format!("index {} already exists", input.name),
        );
    }
    info!(index = %input.name, "create index");
    let db = Database {
        name: input.name.clone(),
        metric: input.metric.unwrap_or_else(|| "cosine".to_string()),
        dimension: input.dimension,
        replicas: input.replicas.unwrap_or(1),
        shards: 1,
        pods: input.pods.unwrap_or(1),
        pod_type: input.pod_type.unwrap_or_else(|| "p1.1".to_string()),
    };
    store.indexes.insert(input.name, db);
    (StatusCode::CREATED, String::new())
}

async fn describe_index(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let store = state.store.read().await;
    let db = store.indexes.get(&name).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({
        "database": db,
        "status": {
            "waiting": [],
            "crashed": [],
            "host": format!("{name}-mock.svc.local.pinecone.io"),
            "port": 433,
            "state": "Ready",
            "ready": true
        }
    })))
}

async fn delete_index(State(state): State<AppState>, Path(name): Path<String>) -> StatusCode {
    let mut store = state.store.write().await;
    match store.indexes.remove(&name) {
        Some(_) => StatusCode::ACCEPTED,
        None => StatusCode::NOT_FOUND,
    }
}

async fn configure_index(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<ConfigureIndex>,
) -> StatusCode {
    let mut store = state.store.write().await;
    let Some(db) = store.indexes.get_mut(&name) else {
        return StatusCode::NOT_FOUND;
    };
    if let Some(replicas) = input.replicas {
        db.replicas = replicas;
    }
    if let Some(pod_type) = input.pod_type {
        db.pod_type = pod_type;
    }
    StatusCode::ACCEPTED
}

// --- data plane ---

async fn upsert(State(state): State<AppState>, Json(input): Json<Upsert>) -> Json<Value> {
    let mut store = state.store.write().await;
    let ns = store.vectors.entry(input.namespace).or_default();
    let count = input.vectors.len();
    for v in input.vectors {
        ns.insert(v.id.clone(), v);
    }
    Json(json!({ "upsertedCount": count }))
}

async fn fetch(State(state): State<AppState>, RawQuery(query): RawQuery) -> Json<Value> {
    let mut ids = Vec::new();
    let mut namespace = String::new();
    for (k, v) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match k.as_ref() {
            "ids" => ids.push(v.into_owned()),
            "namespace" => namespace = v.into_owned(),
            _ => {}
        }
    }

    let store = state.store.read().await;
    let mut found = Map::new();
    if let Some(ns) = store.vectors.get(&namespace) {
        for id in ids {
            if let Some(v) = ns.get(&id) {
                found.insert(id, json!(v));
            }
        }
    }
    Json(json!({ "vectors": found, "namespace": namespace }))
}

async fn query(
    State(state): State<AppState>,
    Json(input): Json<Query>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let store = state.store.read().await;
    let empty = HashMap::new();
    let ns = store.vectors.get(&input.namespace).unwrap_or(&empty);

    let anchor = match (input.vector, input.id) {
        (Some(v), None) => v,
        (None, Some(id)) => match ns.get(&id) {
            Some(v) => v.values.clone(),
            None => return Ok(Json(json!({ "matches": [], "namespace": input.namespace }))),
        },
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "exactly one of vector or id is required".to_string(),
            ))
        }
    };

    let mut scored: Vec<(f32, &StoredVector)> = ns
        .values()
        .map(|v| (dot(&anchor, &v.values), v))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

    let matches: Vec<Value> = scored
        .into_iter()
        .take(input.top_k)
        .map(|(score, v)| {
            let mut m = json!({ "id": v.id, "score": score });
            if input.include_values {
                m["values"] = json!(v.values);
            }
            if input.include_metadata {
                if let Some(meta) = &v.metadata {
                    m["metadata"] = Value::Object(meta.clone());
                }
            }
            m
        })
        .collect();
    Ok(Json(json!({ "matches": matches, "namespace": input.namespace })))
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

async fn update(
    State(state): State<AppState>,
    Json(input): Json<Update>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut store = state.store.write().await;
    let v = store
        .vectors
        .get_mut(&input.namespace)
        .and_then(|ns| ns.get_mut(&input.id))
        .ok_or((StatusCode::NOT_FOUND, format!("vector {} not found", input.id)))?;
    if let Some(values) = input.values {
        v.values = values;
    }
    if let Some(sparse) = input.sparse_values {
        v.sparse_values = Some(sparse);
    }
    if let Some(set) = input.set_metadata {
        v.metadata.get_or_insert_with(Map::new).extend(set);
    }
    Ok(Json(json!({})))
}

async fn delete(
    State(state): State<AppState>,
    Json(input): Json<Delete>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let mut store = state.store.write().await;
    match (input.ids, input.delete_all) {
        (None, true) => {
            store.vectors.remove(&input.namespace);
        }
        (Some(ids), false) => {
            if let Some(ns) = store.vectors.get_mut(&input.namespace) {
                for id in ids {
                    ns.remove(&id);
                }
            }
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "exactly one of ids or deleteAll is required".to_string(),
            ))
        }
    }
    Ok(Json(json!({})))
}

async fn describe_index_stats(State(state): State<AppState>) -> Json<Value> {
    let store = state.store.read().await;
    let mut namespaces = Map::new();
    let mut total = 0;
    let mut dimension = 0;
    for (name, ns) in &store.vectors {
        if ns.is_empty() {
            continue;
        }
        total += ns.len();
        if let Some(v) = ns.values().next() {
            dimension = v.values.len();
        }
        namespaces.insert(name.clone(), json!({ "vectorCount": ns.len() }));
    }
    Json(json!({
        "namespaces": namespaces,
        "dimension": dimension,
        "indexFullness": 0.0,
        "totalVectorCount": total
    }))
}
