//! Engine error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Errors raised by the normalization engine.
///
/// `MalformedInterval` and `NoTranscriptsRemain` abort the whole gene with no
/// partial output. `CdsBoundaryMismatch` is fatal for one transcript only:
/// the pipeline catches it at the transcript boundary and records a
/// filtered-with-error decision while sibling transcripts continue.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed interval in {context}: {detail}")]
    MalformedInterval { context: String, detail: String },

    #[error("no transcripts of gene {gene} remain after filtering")]
    NoTranscriptsRemain { gene: String },

    #[error("CDS boundary mismatch in transcript {transcript}: {detail}")]
    CdsBoundaryMismatch { transcript: String, detail: String },
}

impl NormalizeError {
    pub(crate) fn malformed(context: impl Into<String>, detail: impl Into<String>) -> Self {
        NormalizeError::MalformedInterval {
            context: context.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn cds_mismatch(transcript: impl Into<String>, detail: impl Into<String>) -> Self {
        NormalizeError::CdsBoundaryMismatch {
            transcript: transcript.into(),
            detail: detail.into(),
        }
    }
}
