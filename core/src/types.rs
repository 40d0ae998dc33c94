//! Parameter and response value objects.
//!
//! # Design
//! `*Params` structs are what callers fill in; they carry optional fields as
//! `Option` and never decide how those are spelled on the wire. The `payload`
//! module owns that mapping. Types that appear verbatim in data-plane bodies
//! (`Vector`, `SparseValues`, responses) derive the camelCase wire schema
//! directly.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Arbitrary JSON object attached to a vector, or used as a filter.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Similarity metric of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Euclidean,
    Cosine,
    #[serde(rename = "dotproduct")]
    DotProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodType {
    S1,
    P1,
    P2,
}

impl fmt::Display for PodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PodType::S1 => "s1",
            PodType::P1 => "p1",
            PodType::P2 => "p2",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodSize {
    #[serde(rename = "1")]
    X1,
    #[serde(rename = "2")]
    X2,
    #[serde(rename = "4")]
    X4,
    #[serde(rename = "8")]
    X8,
}

impl fmt::Display for PodSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PodSize::X1 => "1",
            PodSize::X2 => "2",
            PodSize::X4 => "4",
            PodSize::X8 => "8",
        })
    }
}

/// Restricts metadata indexing to the listed fields. Serializes as
/// `{"indexed": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub indexed: Vec<String>,
}

// ---------------------------------------------------------------------------
// Index management
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateIndexParams {
    /// At most 45 characters.
    pub name: String,
    pub dimension: u32,
    pub metric: Option<Metric>,
    /// Total pods, replicas included.
    pub pods: Option<u32>,
    pub replicas: Option<u32>,
    /// Must be set together with `pod_size`.
    pub pod_type: Option<PodType>,
    pub pod_size: Option<PodSize>,
    pub metadata_config: Option<MetadataConfig>,
    /// Collection to clone the index from.
    pub source_collection: Option<String>,
}

impl CreateIndexParams {
    pub fn new(name: impl Into<String>, dimension: u32) -> Self {
        Self {
            name: name.into(),
            dimension,
            ..Default::default()
        }
    }
}

/// Changes to apply to an existing index. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigureIndexParams {
    pub index_name: String,
    pub replicas: Option<u32>,
    pub pod_type: Option<PodType>,
    pub pod_size: Option<PodSize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDescription {
    pub database: Database,
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub name: String,
    pub metric: String,
    pub dimension: u32,
    pub replicas: u32,
    pub shards: u32,
    pub pods: u32,
    pub pod_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatus {
    pub waiting: Vec<serde_json::Value>,
    pub crashed: Vec<serde_json::Value>,
    pub host: String,
    pub port: u16,
    pub state: String,
    pub ready: bool,
}

// ---------------------------------------------------------------------------
// Vectors
// ---------------------------------------------------------------------------

/// Sparse representation: `indices[i]` carries `values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseValues {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseValues {
    pub fn new(indices: Vec<u32>, values: Vec<f32>) -> Self {
        Self { indices, values }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vector {
    pub id: String,
    #[serde(default)]
    pub values: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sparse_values: Option<SparseValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Vector {
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpsertVectorsParams {
    pub vectors: Vec<Vector>,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpsertVectorsResponse {
    pub upserted_count: u32,
}

/// A similarity query. Exactly one of `vector` and `id` anchors it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub namespace: String,
    pub top_k: u32,
    pub vector: Option<Vec<f32>>,
    pub id: Option<String>,
    pub sparse_vector: Option<SparseValues>,
    pub filter: Option<Metadata>,
    pub include_values: bool,
    pub include_metadata: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoredVector {
    pub id: String,
    pub score: f32,
    pub values: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_values: Option<SparseValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryResponse {
    pub matches: Vec<ScoredVector>,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchVectorsParams {
    pub ids: Vec<String>,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchVectorsResponse {
    pub vectors: HashMap<String, Vector>,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpdateVectorParams {
    pub id: String,
    pub namespace: String,
    pub values: Vec<f32>,
    pub sparse_values: Option<SparseValues>,
    pub set_metadata: Option<Metadata>,
}

/// Deletes either the listed ids or every vector in the namespace.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeleteVectorsParams {
    pub ids: Vec<String>,
    pub delete_all: bool,
    /// Empty means the default namespace.
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DescribeIndexStatsParams {
    pub filter: Option<Metadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexStats {
    pub namespaces: HashMap<String, NamespaceSummary>,
    pub dimension: u32,
    pub index_fullness: f32,
    pub total_vector_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamespaceSummary {
    pub vector_count: u64,
}
