//! End-to-end download scenarios: single artifacts, checksums, repository
//! fallback, snapshot resolution, and cache behavior.

mod support;

use std::sync::Arc;

use jarfetch_maven::checksum::Algo;
use jarfetch_maven::coordinate::{Coordinate, Dependency};
use jarfetch_maven::repository::direct_url;
use jarfetch_maven::store::LocalStore;
use jarfetch_resolver::{DownloadError, Resolver};
use support::MemoryTransport;
use tempfile::TempDir;

const R1: &str = "https://r1.example.com/maven";
const R2: &str = "https://r2.example.com/maven";

fn repos(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

#[tokio::test]
async fn simple_download_single_repo_no_checksums() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "lib", "1.0");
    let jar_body = vec![0xABu8; 100];
    transport.serve(&direct_url(R1, &coord, "jar"), jar_body.clone());

    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver
        .resolve(vec![Dependency::new(coord.clone(), true)], &repos(&[R1]))
        .await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.is_success(), "unexpected error: {:?}", result.error);
    assert!(result.transitive.is_empty());

    let store = LocalStore::new(root.path());
    assert_eq!(std::fs::read(store.jar_path(&coord)).unwrap(), jar_body);
    assert_eq!(result.local_path, store.jar_path(&coord));
}

#[tokio::test]
async fn declared_checksum_mismatch_fails_and_installs_nothing() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "lib", "1.0");
    transport.serve(&direct_url(R1, &coord, "jar"), b"tampered bytes".to_vec());

    let dep = Dependency::new(coord.clone(), false)
        .with_checksum(Algo::Sha1, "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver.resolve(vec![dep], &repos(&[R1])).await;

    let result = &results[0];
    assert!(matches!(
        result.error,
        Some(DownloadError::Checksum { algo: Algo::Sha1, .. })
    ));

    let store = LocalStore::new(root.path());
    assert!(!store.jar_path(&coord).exists());
}

#[tokio::test]
async fn declared_checksum_match_succeeds() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "lib", "1.0");
    let body = b"genuine bytes".to_vec();
    transport.serve(&direct_url(R1, &coord, "jar"), body.clone());

    let dep = Dependency::new(coord.clone(), false)
        .with_checksum(Algo::Sha256, Algo::Sha256.compute(&body));
    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver.resolve(vec![dep], &repos(&[R1])).await;

    assert!(results[0].is_success());
    // pinned checksums skip the sidecar probe entirely
    let sidecar = format!("{}.sha256", direct_url(R1, &coord, "jar"));
    assert!(!transport.requested(&sidecar));
}

#[tokio::test]
async fn remote_sidecar_mismatch_fails() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "lib", "1.0");
    let jar_url = direct_url(R1, &coord, "jar");
    transport.serve(&jar_url, b"body".to_vec());
    transport.serve(&format!("{jar_url}.sha1"), "0000000000000000000000000000000000000000");

    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver
        .resolve(vec![Dependency::new(coord.clone(), false)], &repos(&[R1]))
        .await;

    assert!(matches!(
        results[0].error,
        Some(DownloadError::Checksum { .. })
    ));
    assert!(!LocalStore::new(root.path()).jar_path(&coord).exists());
}

#[tokio::test]
async fn fallback_to_second_repository() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    // r1 has nothing; r2 serves the jar with a matching SHA-256 sidecar.
    let coord = Coordinate::new("org.example", "lib", "2.0");
    let body = b"from r2".to_vec();
    let jar_url = direct_url(R2, &coord, "jar");
    transport.serve(&jar_url, body.clone());
    transport.serve(&format!("{jar_url}.sha256"), Algo::Sha256.compute(&body));

    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver
        .resolve(vec![Dependency::new(coord.clone(), false)], &repos(&[R1, R2]))
        .await;

    assert!(results[0].is_success());
    // r1 was probed first
    assert!(transport.requested(&direct_url(R1, &coord, "jar")));
    assert_eq!(
        std::fs::read(LocalStore::new(root.path()).jar_path(&coord)).unwrap(),
        body
    );
}

#[tokio::test]
async fn unreachable_repository_is_skipped() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    transport.mark_unreachable(R1);
    let coord = Coordinate::new("org.example", "lib", "1.0");
    transport.serve(&direct_url(R2, &coord, "jar"), b"ok".to_vec());

    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver
        .resolve(vec![Dependency::new(coord, false)], &repos(&[R1, R2]))
        .await;

    assert!(results[0].is_success());
}

#[tokio::test]
async fn missing_everywhere_is_exhausted() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "ghost", "1.0");
    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver
        .resolve(vec![Dependency::new(coord, false)], &repos(&[R1, R2]))
        .await;

    assert!(matches!(
        results[0].error,
        Some(DownloadError::Exhausted { .. })
    ));
}

#[tokio::test]
async fn snapshot_resolves_through_metadata() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "lib", "1.0-SNAPSHOT");

    transport.serve(
        "https://r1.example.com/maven/org/example/lib/maven-metadata.xml",
        r#"<metadata>
             <groupId>org.example</groupId>
             <artifactId>lib</artifactId>
             <versioning>
               <versions><version>1.0-SNAPSHOT</version></versions>
             </versioning>
           </metadata>"#,
    );
    transport.serve(
        "https://r1.example.com/maven/org/example/lib/1.0-SNAPSHOT/maven-metadata.xml",
        r#"<metadata>
             <version>1.0-SNAPSHOT</version>
             <versioning>
               <snapshot>
                 <timestamp>20240101.120000</timestamp>
                 <buildNumber>3</buildNumber>
               </snapshot>
             </versioning>
           </metadata>"#,
    );
    let timestamped_jar = "https://r1.example.com/maven/org/example/lib/1.0-SNAPSHOT/lib-1.0-20240101.120000-3.jar";
    transport.serve(timestamped_jar, b"snapshot build".to_vec());

    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver
        .resolve(vec![Dependency::new(coord.clone(), false)], &repos(&[R1]))
        .await;

    assert!(results[0].is_success(), "{:?}", results[0].error);
    // the direct (non-timestamped) URL is never probed for snapshots
    assert!(!transport.requested(&direct_url(R1, &coord, "jar")));
    assert!(transport.requested(timestamped_jar));

    // on disk the version stays 1.0-SNAPSHOT
    let local = LocalStore::new(root.path()).jar_path(&coord);
    assert!(local.ends_with("org/example/lib/1.0-SNAPSHOT/lib-1.0-SNAPSHOT.jar"));
    assert_eq!(std::fs::read(local).unwrap(), b"snapshot build");
}

#[tokio::test]
async fn cached_artifact_skips_the_network() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "lib", "1.0");
    let store = LocalStore::new(root.path());
    store
        .install(&store.jar_path(&coord), b"already here")
        .unwrap();

    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver
        .resolve(vec![Dependency::new(coord.clone(), true)], &repos(&[R1]))
        .await;

    assert!(results[0].is_success());
    assert!(transport.requests().is_empty(), "{:?}", transport.requests());
}

#[tokio::test]
async fn second_resolve_is_idempotent_and_offline() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "lib", "1.0");
    let jar_url = direct_url(R1, &coord, "jar");
    transport.serve(&jar_url, b"payload".to_vec());

    let resolver = Resolver::new(transport.clone(), root.path());
    let first = resolver
        .resolve(vec![Dependency::new(coord.clone(), true)], &repos(&[R1]))
        .await;
    assert!(first[0].is_success());
    assert!(transport.requested(&jar_url));

    transport.clear_log();
    let second = resolver
        .resolve(vec![Dependency::new(coord.clone(), true)], &repos(&[R1]))
        .await;
    assert!(second[0].is_success());
    assert!(!transport.requested(&jar_url));
}

#[tokio::test]
async fn duplicate_roots_both_succeed() {
    let transport = Arc::new(MemoryTransport::new());
    let root = TempDir::new().unwrap();

    let coord = Coordinate::new("org.example", "lib", "1.0");
    transport.serve(&direct_url(R1, &coord, "jar"), b"payload".to_vec());

    let resolver = Resolver::new(transport.clone(), root.path());
    let results = resolver
        .resolve(
            vec![
                Dependency::new(coord.clone(), false),
                Dependency::new(coord.clone(), false),
            ],
            &repos(&[R1]),
        )
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_success()));
}
