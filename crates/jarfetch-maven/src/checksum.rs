//! Artifact checksum computation, verification, and sidecar retrieval.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::error::TransportError;
use crate::transport::Transport;

/// A digest algorithm the downloader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algo {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

/// Sidecar algorithms probed for artifacts without pinned checksums,
/// strongest first.
pub const REMOTE_ALGOS: [Algo; 4] = [Algo::Sha512, Algo::Sha256, Algo::Sha1, Algo::Md5];

impl Algo {
    /// Sidecar file extension: lowercase name with dashes removed.
    pub fn extension(&self) -> &'static str {
        match self {
            Algo::Md5 => "md5",
            Algo::Sha1 => "sha1",
            Algo::Sha256 => "sha256",
            Algo::Sha512 => "sha512",
        }
    }

    /// Human-readable algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            Algo::Md5 => "MD5",
            Algo::Sha1 => "SHA-1",
            Algo::Sha256 => "SHA-256",
            Algo::Sha512 => "SHA-512",
        }
    }

    /// Compute the digest of `data`, returning lowercase hex.
    pub fn compute(&self, data: &[u8]) -> String {
        match self {
            Algo::Md5 => {
                let mut hasher = Md5::new();
                hasher.update(data);
                format!("{:x}", hasher.finalize())
            }
            Algo::Sha1 => {
                let mut hasher = Sha1::new();
                hasher.update(data);
                format!("{:x}", hasher.finalize())
            }
            Algo::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(data);
                format!("{:x}", hasher.finalize())
            }
            Algo::Sha512 => {
                let mut hasher = Sha512::new();
                hasher.update(data);
                format!("{:x}", hasher.finalize())
            }
        }
    }

    /// Verify `data` against an expected digest, tolerating case differences
    /// and `hash  filename` sidecar bodies.
    pub fn verify(&self, expected: &str, data: &[u8]) -> bool {
        self.compute(data)
            .eq_ignore_ascii_case(extract_hash(expected))
    }
}

impl std::fmt::Display for Algo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A failed verification, carried into the task's failure result.
#[derive(Debug, Clone)]
pub struct Mismatch {
    pub algo: Algo,
    pub expected: String,
    pub actual: String,
}

/// Outcome of the remote sidecar verification pass.
#[derive(Debug, Clone)]
pub enum RemoteVerification {
    /// At least one sidecar digest matched and none disagreed.
    Verified(Algo),
    /// No sidecar files were published for this artifact.
    Unverified,
    /// A sidecar digest disagreed with the downloaded bytes.
    Failed(Mismatch),
}

/// Extract the hex digest from a sidecar body.
///
/// Maven checksum files may contain just the hash, or `hash  filename`,
/// with optional trailing whitespace.
fn extract_hash(content: &str) -> &str {
    content.split_whitespace().next().unwrap_or("")
}

/// Fetch the sidecar digest for `artifact_url` under `algo`.
///
/// Absent on 404; connectivity and other transport failures propagate.
pub async fn fetch_remote(
    transport: &dyn Transport,
    artifact_url: &str,
    algo: Algo,
) -> Result<Option<String>, TransportError> {
    let url = format!("{artifact_url}.{}", algo.extension());
    match transport.get(&url).await? {
        Some(bytes) => {
            let body = String::from_utf8_lossy(&bytes);
            Ok(Some(extract_hash(&body).to_string()))
        }
        None => Ok(None),
    }
}

/// Verify `data` against every pinned checksum; all must match.
pub fn verify_declared(declared: &[(Algo, String)], data: &[u8]) -> Result<(), Mismatch> {
    for (algo, expected) in declared {
        if !algo.verify(expected, data) {
            return Err(Mismatch {
                algo: *algo,
                expected: extract_hash(expected).to_string(),
                actual: algo.compute(data),
            });
        }
    }
    Ok(())
}

/// Probe all sidecar algorithms concurrently and verify `data` against every
/// digest that exists.
///
/// Any retrieved digest that disagrees fails the artifact; one agreeing
/// digest verifies it; a repository publishing no sidecars at all leaves the
/// artifact unverified, which the caller accepts.
pub async fn verify_remote(
    transport: &dyn Transport,
    artifact_url: &str,
    data: &[u8],
) -> Result<RemoteVerification, TransportError> {
    let fetches = REMOTE_ALGOS
        .iter()
        .map(|algo| fetch_remote(transport, artifact_url, *algo));
    let digests = futures::future::join_all(fetches).await;

    let mut verified_by = None;
    for (algo, fetched) in REMOTE_ALGOS.iter().zip(digests) {
        let Some(expected) = fetched? else { continue };
        let actual = algo.compute(data);
        if actual.eq_ignore_ascii_case(&expected) {
            verified_by.get_or_insert(*algo);
        } else {
            return Ok(RemoteVerification::Failed(Mismatch {
                algo: *algo,
                expected,
                actual,
            }));
        }
    }

    Ok(match verified_by {
        Some(algo) => RemoteVerification::Verified(algo),
        None => RemoteVerification::Unverified,
    })
}
