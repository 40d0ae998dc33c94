//! Wire payload construction.
//!
//! # Design
//! Body structs here mirror the service schema field for field and borrow
//! from the caller's params. Absent optional fields are serialized as `null`
//! and then stripped in one place (`to_json_body`), so no individual field
//! has to remember to skip itself: the service treats "missing" and "null"
//! differently and only "missing" is ever sent.
//!
//! URLs are assembled with `url::Url` so path segments and query values are
//! percent-encoded instead of concatenated.

use serde::Serialize;
use url::Url;

use crate::error::{PineconeError, Result};
use crate::types::{
    ConfigureIndexParams, CreateIndexParams, DeleteVectorsParams, DescribeIndexStatsParams,
    FetchVectorsParams, Metadata, MetadataConfig, Metric, PodSize, PodType, QueryParams,
    SparseValues, UpdateVectorParams, UpsertVectorsParams, Vector,
};
use crate::validate::{has_query_id, has_query_vector};

/// Combine a pod type and size into the `"<type>.<size>"` token the service
/// expects. Returns `None` unless both halves are present.
pub fn pod_token(pod_type: Option<PodType>, pod_size: Option<PodSize>) -> Option<String> {
    match (pod_type, pod_size) {
        (Some(t), Some(s)) => Some(format!("{t}.{s}")),
        _ => None,
    }
}

/// Serialize `body` and drop every top-level `null`.
pub fn to_json_body<T: Serialize>(body: &T) -> Result<String> {
    let mut value =
        serde_json::to_value(body).map_err(|e| PineconeError::Serialization(e.to_string()))?;
    if let serde_json::Value::Object(map) = &mut value {
        map.retain(|_, v| !v.is_null());
    }
    serde_json::to_string(&value).map_err(|e| PineconeError::Serialization(e.to_string()))
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Append `segments` to `base`, percent-encoding each one.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| PineconeError::Config(format!("invalid base url `{base}`: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| PineconeError::Config(format!("base url `{base}` cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `/vectors/fetch?ids=..&ids=..&namespace=..`, one `ids` pair per id in
/// caller order.
pub fn fetch_url(base: &str, params: &FetchVectorsParams) -> Result<Url> {
    let mut url = endpoint(base, &["vectors", "fetch"])?;
    {
        let mut query = url.query_pairs_mut();
        for id in &params.ids {
            query.append_pair("ids", id);
        }
        if let Some(ns) = non_empty(&params.namespace) {
            query.append_pair("namespace", ns);
        }
    }
    Ok(url)
}

// ---------------------------------------------------------------------------
// Controller bodies (snake_case)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CreateIndexBody<'a> {
    name: &'a str,
    dimension: u32,
    metric: Option<Metric>,
    pods: Option<u32>,
    replicas: Option<u32>,
    pod_type: Option<String>,
    metadata_config: Option<&'a MetadataConfig>,
    source_collection: Option<&'a str>,
}

impl<'a> From<&'a CreateIndexParams> for CreateIndexBody<'a> {
    fn from(params: &'a CreateIndexParams) -> Self {
        Self {
            name: &params.name,
            dimension: params.dimension,
            metric: params.metric,
            pods: params.pods,
            replicas: params.replicas,
            pod_type: pod_token(params.pod_type, params.pod_size),
            metadata_config: params.metadata_config.as_ref(),
            source_collection: params.source_collection.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigureIndexBody {
    replicas: Option<u32>,
    pod_type: Option<String>,
}

impl From<&ConfigureIndexParams> for ConfigureIndexBody {
    fn from(params: &ConfigureIndexParams) -> Self {
        Self {
            replicas: params.replicas,
            pod_type: pod_token(params.pod_type, params.pod_size),
        }
    }
}

// ---------------------------------------------------------------------------
// Data-plane bodies (camelCase)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UpsertBody<'a> {
    vectors: &'a [Vector],
    namespace: Option<&'a str>,
}

impl<'a> From<&'a UpsertVectorsParams> for UpsertBody<'a> {
    fn from(params: &'a UpsertVectorsParams) -> Self {
        Self {
            vectors: &params.vectors,
            namespace: non_empty(&params.namespace),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody<'a> {
    namespace: Option<&'a str>,
    top_k: u32,
    vector: Option<&'a [f32]>,
    id: Option<&'a str>,
    sparse_vector: Option<&'a SparseValues>,
    filter: Option<&'a Metadata>,
    include_values: bool,
    include_metadata: bool,
}

impl<'a> From<&'a QueryParams> for QueryBody<'a> {
    fn from(params: &'a QueryParams) -> Self {
        Self {
            namespace: non_empty(&params.namespace),
            top_k: params.top_k,
            vector: params
                .vector
                .as_deref()
                .filter(|_| has_query_vector(params)),
            id: params.id.as_deref().filter(|_| has_query_id(params)),
            sparse_vector: params.sparse_vector.as_ref(),
            filter: params.filter.as_ref(),
            include_values: params.include_values,
            include_metadata: params.include_metadata,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody<'a> {
    id: &'a str,
    namespace: Option<&'a str>,
    values: Option<&'a [f32]>,
    sparse_values: Option<&'a SparseValues>,
    set_metadata: Option<&'a Metadata>,
}

impl<'a> From<&'a UpdateVectorParams> for UpdateBody<'a> {
    fn from(params: &'a UpdateVectorParams) -> Self {
        Self {
            id: &params.id,
            namespace: non_empty(&params.namespace),
            values: (!params.values.is_empty()).then_some(params.values.as_slice()),
            sparse_values: params.sparse_values.as_ref(),
            set_metadata: params.set_metadata.as_ref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBody<'a> {
    ids: Option<&'a [String]>,
    delete_all: Option<bool>,
    namespace: Option<&'a str>,
}

impl<'a> From<&'a DeleteVectorsParams> for DeleteBody<'a> {
    fn from(params: &'a DeleteVectorsParams) -> Self {
        Self {
            ids: (!params.ids.is_empty()).then_some(params.ids.as_slice()),
            delete_all: params.delete_all.then_some(true),
            namespace: non_empty(&params.namespace),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DescribeIndexStatsBody<'a> {
    filter: Option<&'a Metadata>,
}

impl<'a> From<&'a DescribeIndexStatsParams> for DescribeIndexStatsBody<'a> {
    fn from(params: &'a DescribeIndexStatsParams) -> Self {
        Self {
            filter: params.filter.as_ref(),
        }
    }
}
