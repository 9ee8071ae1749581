//! Numeric id resolution from record URIs.
//!
//! Several ArchivesSpace endpoints return records whose body carries a `uri`
//! (for example `/repositories/2/accessions/5`) but no numeric `id` field.
//! The id is, by API contract, the trailing path segment of that URI.

use crate::error::ApiError;

/// Parse the trailing path segment of `uri` as the record's numeric id.
///
/// Trailing slashes are ignored, so `/repositories/3` and `/repositories/3/`
/// resolve identically. A URI whose last segment is not a non-negative
/// integer is an [`ApiError::IdResolve`].
pub fn resolve_id(uri: &str) -> Result<u64, ApiError> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<u64>().ok())
        .ok_or_else(|| ApiError::IdResolve(uri.to_string()))
}
