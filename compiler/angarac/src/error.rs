//! Driver-level infrastructure failures: not source diagnostics, which stay
//! in `angara_diagnostic::DiagnosticQueue`.

use angara_diagnostic::ErrorCode;
use angara_native_abi::AbiError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read `{path}`: {source}")]
    ReadSource { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not write `{path}`: {source}")]
    WriteGenerated { path: PathBuf, #[source] source: std::io::Error },

    #[error("could not remove `{path}`: {source}")]
    RemoveGenerated { path: PathBuf, #[source] source: std::io::Error },

    #[error(transparent)]
    NativeAbi(#[from] AbiError),

    #[error("no module name could be derived from `{path}`")]
    UnresolvableModuleName { path: PathBuf },

    #[error("compilation of `{path}` failed; see diagnostics above")]
    CompilationFailed { path: PathBuf },

    #[error("the root module `{path}` does not export a conformant `main`")]
    InvalidMain { path: PathBuf },

    #[error("could not spawn system C compiler `{cc}`: {source}")]
    SpawnCompiler { cc: String, source: std::io::Error },

    #[error("`{cc}` exited with status {status}; see {log_path}")]
    CompilerFailed { cc: String, status: i32, log_path: PathBuf },

    #[error(
        "no parser implementation is linked into this build; `angarac` only drives an \
         externally supplied `SourceParser`"
    )]
    ParserUnavailable,
}

impl DriverError {
    /// The error-kind taxonomy this failure falls under (§7 "Backend/link").
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DriverError::ReadSource { .. }
            | DriverError::WriteGenerated { .. }
            | DriverError::RemoveGenerated { .. } => ErrorCode::E5001FilesystemFailure,
            DriverError::NativeAbi(_) => ErrorCode::E9001Internal,
            DriverError::UnresolvableModuleName { .. } => ErrorCode::E9001Internal,
            DriverError::CompilationFailed { .. } => ErrorCode::E9001Internal,
            DriverError::InvalidMain { .. } => ErrorCode::E4005MissingOrIllTypedMain,
            DriverError::SpawnCompiler { .. } | DriverError::CompilerFailed { .. } => {
                ErrorCode::E5002ChildCompilerNonZeroExit
            }
            DriverError::ParserUnavailable => ErrorCode::E9001Internal,
        }
    }
}
