use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for jarfetch operations that surface to the caller.
///
/// Per-artifact download failures never unwind through this type; they are
/// encoded into each artifact's result by the resolver. This enum covers
/// setup and input problems: bad coordinates, unusable repository URLs,
/// client construction, local I/O outside a download task.
#[derive(Debug, Error, Diagnostic)]
pub enum JarfetchError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid user input (coordinate shorthand, repository URL).
    #[error("Invalid input: {message}")]
    #[diagnostic(help("Coordinates take the form group:artifact:version[:classifier]"))]
    Input { message: String },

    /// Network client setup or request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type JarfetchResult<T> = miette::Result<T>;
