//! jarfetch CLI binary.
//!
//! This is the entry point for the `jarfetch` command-line tool. It
//! initializes logging via `tracing`, parses arguments with `clap`, runs one
//! resolve, and reports per-artifact outcomes.

mod cli;

use std::sync::Arc;

use jarfetch_maven::coordinate::{Coordinate, Dependency};
use jarfetch_maven::transport::HttpTransport;
use jarfetch_resolver::{DownloadResult, Resolver};
use jarfetch_util::errors::JarfetchError;
use jarfetch_util::progress;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = cli::parse();

    let mut roots = Vec::with_capacity(args.coordinates.len());
    for raw in &args.coordinates {
        let coordinate = Coordinate::parse(raw).ok_or_else(|| JarfetchError::Input {
            message: format!("unparseable coordinate {raw:?}"),
        })?;
        roots.push(Dependency::new(coordinate, !args.no_transitive));
    }

    let transport = Arc::new(HttpTransport::new()?);
    let resolver =
        Resolver::new(transport, args.output.clone()).with_concurrency(args.concurrency);

    let spinner = progress::spinner(&format!("Resolving {} artifact(s)", roots.len()));
    let results = resolver.resolve(roots, &args.repos).await;
    spinner.finish_and_clear();

    let mut failed = 0usize;
    for result in &results {
        report(result, args.verbose, &mut failed);
    }

    if failed > 0 {
        return Err(JarfetchError::Generic {
            message: format!("{failed} artifact(s) failed to download"),
        }
        .into());
    }

    progress::status(
        "Finished",
        &format!("{} artifact(s) in {}", results.len(), args.output.display()),
    );
    Ok(())
}

/// Print the outcome of one result subtree and count its failures.
fn report(result: &DownloadResult, verbose: bool, failed: &mut usize) {
    match &result.error {
        None => {
            if verbose {
                progress::status(
                    "Installed",
                    &format!(
                        "{} -> {}",
                        result.dependency.coordinate,
                        result.local_path.display()
                    ),
                );
            }
        }
        Some(error) => {
            *failed += 1;
            progress::status_error(
                "Failed",
                &format!("{}: {error}", result.dependency.coordinate),
            );
        }
    }
    for child in &result.transitive {
        report(child, verbose, failed);
    }
}
