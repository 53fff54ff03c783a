// src/aws/error.rs

//! AWS error classification.
//!
//! Uses the error code from `ProvideErrorMetadata` rather than matching on
//! formatted messages.

use aws_sdk_rds::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::backup::ClientError;

/// Error codes for rate limiting.
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
];

/// Error codes for service-side trouble worth retrying.
const UNAVAILABLE_CODES: &[&str] = &["InternalFailure", "InternalError", "ServiceUnavailable"];

/// Error codes for missing clusters or snapshots.
const NOT_FOUND_CODES: &[&str] = &["DBClusterNotFoundFault", "DBClusterSnapshotNotFoundFault"];

/// Classify an error by its AWS error code.
pub fn classify_code(code: Option<&str>, message: &str) -> ClientError {
    let message = message.to_string();
    match code {
        Some(c) if THROTTLING_CODES.contains(&c) => ClientError::Throttled(message),
        Some(c) if UNAVAILABLE_CODES.contains(&c) => ClientError::Unavailable(message),
        Some(c) if NOT_FOUND_CODES.contains(&c) => ClientError::NotFound(message),
        _ => ClientError::Service {
            code: code.map(str::to_string),
            message,
        },
    }
}

/// Classify an SDK error. Timeouts and dispatch failures never reached the
/// service and are always retryable.
pub fn classify_sdk_error<E, R>(err: &SdkError<E, R>) -> ClientError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let detail = DisplayErrorContext(err).to_string();
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            ClientError::Unavailable(detail)
        }
        _ => classify_code(err.code(), err.message().unwrap_or(&detail)),
    }
}
