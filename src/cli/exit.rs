use crate::api::ApiError;
use crate::error::{ErrorKind, TranslateError};

/// Conventional status for a run interrupted by Ctrl+C.
pub const INTERRUPTED: exitcode::ExitCode = 130;

/// Picks the process exit status for a failed command.
pub fn exit_code(err: &anyhow::Error) -> exitcode::ExitCode {
    let kind = err
        .downcast_ref::<ApiError>()
        .map(|e| e.kind)
        .or_else(|| err.downcast_ref::<TranslateError>().map(TranslateError::kind));

    match kind {
        Some(ErrorKind::Validation) => exitcode::USAGE,
        Some(ErrorKind::BackendUnavailable | ErrorKind::ModelNotFound) => exitcode::UNAVAILABLE,
        Some(ErrorKind::Network | ErrorKind::Busy) => exitcode::TEMPFAIL,
        Some(ErrorKind::Cancelled) => INTERRUPTED,
        Some(ErrorKind::Generic) | None => exitcode::SOFTWARE,
    }
}
