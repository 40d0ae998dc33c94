//! Conversions between the crate's value objects and protobuf messages.
//!
//! JSON metadata and filters travel as `google.protobuf.Struct`. Numbers are
//! doubles on the protobuf side; non-finite doubles come back as `null`.

use prost_types::value::Kind;
use prost_types::{ListValue, Struct, Value};
use serde_json::Value as Json;

use super::proto;
use crate::types::{
    DeleteVectorsParams, DescribeIndexStatsParams, FetchVectorsParams, FetchVectorsResponse,
    IndexStats, Metadata, NamespaceSummary, QueryParams, QueryResponse, ScoredVector,
    SparseValues, UpdateVectorParams, UpsertVectorsParams, UpsertVectorsResponse, Vector,
};
use crate::validate::{has_query_id, has_query_vector};

// ===== Struct <-> JSON =====

pub fn json_to_value(json: &Json) -> Value {
    let kind = match json {
        Json::Null => Kind::NullValue(0),
        Json::Bool(b) => Kind::BoolValue(*b),
        Json::Number(n) => Kind::NumberValue(n.as_f64().unwrap_or_default()),
        Json::String(s) => Kind::StringValue(s.clone()),
        Json::Array(items) => Kind::ListValue(ListValue {
            values: items.iter().map(json_to_value).collect(),
        }),
        Json::Object(map) => Kind::StructValue(metadata_to_struct(map)),
    };
    Value { kind: Some(kind) }
}

pub fn value_to_json(value: Value) -> Json {
    match value.kind {
        None | Some(Kind::NullValue(_)) => Json::Null,
        Some(Kind::BoolValue(b)) => Json::Bool(b),
        Some(Kind::NumberValue(n)) => serde_json::Number::from_f64(n)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Some(Kind::StringValue(s)) => Json::String(s),
        Some(Kind::ListValue(list)) => {
            Json::Array(list.values.into_iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(s)) => Json::Object(struct_to_metadata(s)),
    }
}

pub fn metadata_to_struct(map: &Metadata) -> Struct {
    Struct {
        fields: map
            .iter()
            .map(|(k, v)| (k.clone(), json_to_value(v)))
            .collect(),
    }
}

pub fn struct_to_metadata(s: Struct) -> Metadata {
    s.fields
        .into_iter()
        .map(|(k, v)| (k, value_to_json(v)))
        .collect()
}

// ===== Vectors =====

impl From<&SparseValues> for proto::SparseValues {
    fn from(s: &SparseValues) -> Self {
        proto::SparseValues {
            indices: s.indices.clone(),
            values: s.values.clone(),
        }
    }
}

impl From<proto::SparseValues> for SparseValues {
    fn from(s: proto::SparseValues) -> Self {
        SparseValues {
            indices: s.indices,
            values: s.values,
        }
    }
}

impl From<&Vector> for proto::Vector {
    fn from(v: &Vector) -> Self {
        proto::Vector {
            id: v.id.clone(),
            values: v.values.clone(),
            sparse_values: v.sparse_values.as_ref().map(Into::into),
            metadata: v.metadata.as_ref().map(metadata_to_struct),
        }
    }
}

impl From<proto::Vector> for Vector {
    fn from(v: proto::Vector) -> Self {
        Vector {
            id: v.id,
            values: v.values,
            sparse_values: v.sparse_values.map(Into::into),
            metadata: v.metadata.map(struct_to_metadata),
        }
    }
}

impl From<proto::ScoredVector> for ScoredVector {
    fn from(v: proto::ScoredVector) -> Self {
        ScoredVector {
            id: v.id,
            score: v.score,
            values: v.values,
            sparse_values: v.sparse_values.map(Into::into),
            metadata: v.metadata.map(struct_to_metadata),
        }
    }
}

// ===== Requests =====

impl From<&UpsertVectorsParams> for proto::UpsertRequest {
    fn from(p: &UpsertVectorsParams) -> Self {
        proto::UpsertRequest {
            vectors: p.vectors.iter().map(Into::into).collect(),
            namespace: p.namespace.clone(),
        }
    }
}

impl From<&QueryParams> for proto::QueryRequest {
    fn from(p: &QueryParams) -> Self {
        proto::QueryRequest {
            namespace: p.namespace.clone(),
            top_k: p.top_k,
            filter: p.filter.as_ref().map(metadata_to_struct),
            include_values: p.include_values,
            include_metadata: p.include_metadata,
            vector: match &p.vector {
                Some(v) if has_query_vector(p) => v.clone(),
                _ => Vec::new(),
            },
            sparse_vector: p.sparse_vector.as_ref().map(Into::into),
            id: match &p.id {
                Some(id) if has_query_id(p) => id.clone(),
                _ => String::new(),
            },
        }
    }
}

impl From<&FetchVectorsParams> for proto::FetchRequest {
    fn from(p: &FetchVectorsParams) -> Self {
        proto::FetchRequest {
            ids: p.ids.clone(),
            namespace: p.namespace.clone(),
        }
    }
}

impl From<&UpdateVectorParams> for proto::UpdateRequest {
    fn from(p: &UpdateVectorParams) -> Self {
        proto::UpdateRequest {
            id: p.id.clone(),
            values: p.values.clone(),
            sparse_values: p.sparse_values.as_ref().map(Into::into),
            set_metadata: p.set_metadata.as_ref().map(metadata_to_struct),
            namespace: p.namespace.clone(),
        }
    }
}

impl From<&DeleteVectorsParams> for proto::DeleteRequest {
    fn from(p: &DeleteVectorsParams) -> Self {
        proto::DeleteRequest {
            ids: p.ids.clone(),
            delete_all: p.delete_all,
            namespace: p.namespace.clone(),
            filter: None,
        }
    }
}

impl From<&DescribeIndexStatsParams> for proto::DescribeIndexStatsRequest {
    fn from(p: &DescribeIndexStatsParams) -> Self {
        proto::DescribeIndexStatsRequest {
            filter: p.filter.as_ref().map(metadata_to_struct),
        }
    }
}

// ===== Responses =====

impl From<proto::UpsertResponse> for UpsertVectorsResponse {
    fn from(r: proto::UpsertResponse) -> Self {
        UpsertVectorsResponse {
            upserted_count: r.upserted_count,
        }
    }
}

impl From<proto::QueryResponse> for QueryResponse {
    fn from(r: proto::QueryResponse) -> Self {
        QueryResponse {
            matches: r.matches.into_iter().map(Into::into).collect(),
            namespace: r.namespace,
        }
    }
}

impl From<proto::FetchResponse> for FetchVectorsResponse {
    fn from(r: proto::FetchResponse) -> Self {
        FetchVectorsResponse {
            vectors: r
                .vectors
                .into_iter()
                .map(|(id, v)| (id, v.into()))
                .collect(),
            namespace: r.namespace,
        }
    }
}

impl From<proto::DescribeIndexStatsResponse> for IndexStats {
    fn from(r: proto::DescribeIndexStatsResponse) -> Self {
        IndexStats {
            namespaces: r
                .namespaces
                .into_iter()
                .map(|(ns, summary)| {
                    (
                        ns,
                        NamespaceSummary {
                            vector_count: u64::from(summary.vector_count),
                        },
                    )
                })
                .collect(),
            dimension: r.dimension,
            index_fullness: r.index_fullness,
            total_vector_count: u64::from(r.total_vector_count),
        }
    }
}
