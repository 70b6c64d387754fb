//! Descriptor fetching: GET-and-parse operations over a [`Transport`].

use crate::descriptor::{self, Descriptor};
use crate::error::FetchError;
use crate::metadata::{self, GroupMetadata, VersionMetadata};
use crate::transport::Transport;

/// A fetched descriptor: the parsed model plus the raw bytes, so the caller
/// can persist the document exactly as retrieved.
#[derive(Debug, Clone)]
pub struct FetchedDescriptor {
    pub descriptor: Descriptor,
    pub raw: Vec<u8>,
}

/// Fetch and parse an artifact-directory `maven-metadata.xml`.
///
/// Absent on 404; connectivity problems and malformed XML surface as typed
/// failures.
pub async fn get_group_metadata(
    transport: &dyn Transport,
    url: &str,
) -> Result<Option<GroupMetadata>, FetchError> {
    let Some(bytes) = transport.get(url).await? else {
        return Ok(None);
    };
    let xml = String::from_utf8_lossy(&bytes);
    let meta =
        metadata::parse_group_metadata(&xml).map_err(|e| FetchError::parse(url, e))?;
    Ok(Some(meta))
}

/// Fetch and parse a version-directory `maven-metadata.xml`.
pub async fn get_version_metadata(
    transport: &dyn Transport,
    url: &str,
) -> Result<Option<VersionMetadata>, FetchError> {
    let Some(bytes) = transport.get(url).await? else {
        return Ok(None);
    };
    let xml = String::from_utf8_lossy(&bytes);
    let meta =
        metadata::parse_version_metadata(&xml).map_err(|e| FetchError::parse(url, e))?;
    Ok(Some(meta))
}

/// Fetch and parse a project descriptor.
pub async fn get_descriptor(
    transport: &dyn Transport,
    url: &str,
) -> Result<Option<FetchedDescriptor>, FetchError> {
    let Some(raw) = transport.get(url).await? else {
        return Ok(None);
    };
    let xml = String::from_utf8_lossy(&raw);
    let parsed =
        descriptor::parse_descriptor(&xml).map_err(|e| FetchError::parse(url, e))?;
    Ok(Some(FetchedDescriptor {
        descriptor: parsed,
        raw,
    }))
}
