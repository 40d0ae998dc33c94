//! Pre-flight checks, one per operation.
//!
//! Every function here is pure: it inspects a params value and either
//! accepts it or names the first violated rule. Dispatchers run these before
//! a request is built, so a failure here never reaches a transport.

use crate::error::{PineconeError, Result};
use crate::types::{
    ConfigureIndexParams, CreateIndexParams, DeleteVectorsParams, FetchVectorsParams, PodSize,
    PodType, QueryParams, SparseValues, UpdateVectorParams, UpsertVectorsParams,
};

pub const MAX_INDEX_NAME_LEN: usize = 45;

pub fn validate_index_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PineconeError::invalid("index name is required"));
    }
    if name.chars().count() > MAX_INDEX_NAME_LEN {
        return Err(PineconeError::invalid(format!(
            "index name must be at most {MAX_INDEX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_pod_pair(pod_type: Option<PodType>, pod_size: Option<PodSize>) -> Result<()> {
    match (pod_type, pod_size) {
        (None, Some(_)) => Err(PineconeError::invalid(
            "pod_type is required when pod_size is specified",
        )),
        (Some(_), None) => Err(PineconeError::invalid(
            "pod_size is required when pod_type is specified",
        )),
        _ => Ok(()),
    }
}

fn validate_sparse(sparse: Option<&SparseValues>) -> Result<()> {
    match sparse {
        Some(s) if s.indices.len() != s.values.len() => Err(PineconeError::invalid(
            "sparse vector values and indices must be the same length",
        )),
        _ => Ok(()),
    }
}

fn require_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(PineconeError::invalid("namespace is required"));
    }
    Ok(())
}

pub fn validate_create_index(params: &CreateIndexParams) -> Result<()> {
    validate_index_name(&params.name)?;
    if params.dimension == 0 {
        return Err(PineconeError::invalid(
            "dimension is required and must be greater than 0",
        ));
    }
    validate_pod_pair(params.pod_type, params.pod_size)
}

pub fn validate_configure_index(params: &ConfigureIndexParams) -> Result<()> {
    validate_index_name(&params.index_name)?;
    if params.replicas.is_none() && params.pod_type.is_none() && params.pod_size.is_none() {
        return Err(PineconeError::invalid(
            "at least one of replicas, pod_type or pod_size is required",
        ));
    }
    validate_pod_pair(params.pod_type, params.pod_size)
}

pub fn validate_query(params: &QueryParams) -> Result<()> {
    require_namespace(&params.namespace)?;
    if params.top_k < 1 {
        return Err(PineconeError::invalid(
            "top k is required and must be greater than 0",
        ));
    }
    match (has_query_vector(params), has_query_id(params)) {
        (false, false) => return Err(PineconeError::invalid("vector or id is required")),
        (true, true) => return Err(PineconeError::invalid("cannot specify both vector and id")),
        _ => {}
    }
    validate_sparse(params.sparse_vector.as_ref())
}

/// An empty vector counts as absent.
pub(crate) fn has_query_vector(params: &QueryParams) -> bool {
    params.vector.as_ref().is_some_and(|v| !v.is_empty())
}

/// An empty id counts as absent.
pub(crate) fn has_query_id(params: &QueryParams) -> bool {
    params.id.as_ref().is_some_and(|id| !id.is_empty())
}

pub fn validate_delete_vectors(params: &DeleteVectorsParams) -> Result<()> {
    match (!params.ids.is_empty(), params.delete_all) {
        (false, false) => Err(PineconeError::invalid("ids or deleteAll is required")),
        (true, true) => Err(PineconeError::invalid(
            "cannot specify both ids and deleteAll",
        )),
        _ => Ok(()),
    }
}

pub fn validate_fetch_vectors(params: &FetchVectorsParams) -> Result<()> {
    require_namespace(&params.namespace)?;
    if params.ids.is_empty() {
        return Err(PineconeError::invalid("ids is required"));
    }
    Ok(())
}

pub fn validate_update_vector(params: &UpdateVectorParams) -> Result<()> {
    if params.id.is_empty() {
        return Err(PineconeError::invalid("id is required"));
    }
    require_namespace(&params.namespace)?;
    validate_sparse(params.sparse_values.as_ref())?;

    let has_sparse = params
        .sparse_values
        .as_ref()
        .is_some_and(|s| !s.indices.is_empty());
    if params.values.is_empty() && !has_sparse {
        return Err(PineconeError::invalid("values or sparse values are required"));
    }
    Ok(())
}

pub fn validate_upsert_vectors(params: &UpsertVectorsParams) -> Result<()> {
    if params.vectors.is_empty() {
        return Err(PineconeError::invalid("vectors is required"));
    }
    require_namespace(&params.namespace)?;
    for vector in &params.vectors {
        if vector.id.is_empty() {
            return Err(PineconeError::invalid("every vector needs an id"));
        }
        validate_sparse(vector.sparse_values.as_ref())?;
    }
    Ok(())
}
