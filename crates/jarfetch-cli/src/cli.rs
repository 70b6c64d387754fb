//! CLI argument definitions for jarfetch.
//!
//! Uses `clap` derive macros. One flat command: coordinates in, artifacts
//! out.

use std::path::PathBuf;

use clap::Parser;
use jarfetch_maven::repository::MAVEN_CENTRAL_URL;
use jarfetch_resolver::resolver::DEFAULT_CONCURRENCY;

#[derive(Parser, Debug)]
#[command(
    name = "jarfetch",
    version,
    about = "A lightweight resolver and downloader for Maven-style repositories",
    long_about = "jarfetch locates artifacts across Maven-style repositories, downloads and \
                  checksum-verifies them together with their transitive dependencies, and \
                  installs everything into a local directory tree mirroring the repository \
                  layout."
)]
pub struct Cli {
    /// Artifact coordinates to resolve: group:artifact:version[:classifier]
    #[arg(required = true)]
    pub coordinates: Vec<String>,

    /// Repository base URL to probe (repeatable, probed in order)
    #[arg(short, long = "repo", default_value = MAVEN_CENTRAL_URL)]
    pub repos: Vec<String>,

    /// Directory artifacts are installed into
    #[arg(short, long, default_value = "jarfetch-out")]
    pub output: PathBuf,

    /// Skip transitive dependency expansion
    #[arg(long)]
    pub no_transitive: bool,

    /// Maximum concurrent downloads
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
