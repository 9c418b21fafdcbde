use relearn_abstraction::{format_failed_response, HttpResponse, TransportError};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub type RetrainResult<T> = std::result::Result<T, RetrainError>;

/// The remote call a non-success response came back from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Submit,
    Start,
    Status,
    Score,
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Submit => "submit",
            Self::Start => "start",
            Self::Status => "status",
            Self::Score => "score",
        })
    }
}

#[derive(Debug, Error)]
pub enum RetrainError {
    /// The service answered with a non-success status. `message` is the formatted diagnostic.
    #[error("{message}")]
    Http { stage: RequestStage, status: u16, message: String },

    #[error("Job {job_id} failed!\nError details: {details}")]
    JobFailed { job_id: String, details: String },

    #[error("Job {job_id} cancelled!")]
    JobCancelled { job_id: String },

    #[error("Timeout reached! Job deleted")]
    TimedOut { job_id: String, elapsed: Duration },

    #[error("Failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl RetrainError {
    pub(crate) fn http(stage: RequestStage, response: &HttpResponse) -> Self {
        Self::Http { stage, status: response.status, message: format_failed_response(response) }
    }

    pub(crate) fn decode(what: &'static str, err: &TransportError) -> Self {
        Self::Decode { what, message: err.to_string() }
    }

    /// Job identifier the failure concerns, when one had been assigned.
    pub fn job_id(&self) -> Option<&str> {
        match self {
            Self::JobFailed { job_id, .. }
            | Self::JobCancelled { job_id }
            | Self::TimedOut { job_id, .. } => Some(job_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_messages() {
        let failed = RetrainError::JobFailed { job_id: "j1".into(), details: "bad input".into() };
        assert_eq!(failed.to_string(), "Job j1 failed!\nError details: bad input");

        let cancelled = RetrainError::JobCancelled { job_id: "j2".into() };
        assert_eq!(cancelled.to_string(), "Job j2 cancelled!");

        let timed_out = RetrainError::TimedOut { job_id: "j3".into(), elapsed: Duration::from_secs(121) };
        assert_eq!(timed_out.to_string(), "Timeout reached! Job deleted");
        assert_eq!(timed_out.job_id(), Some("j3"));
    }

    #[test]
    fn test_http_carries_formatted_diagnostic() {
        let response = HttpResponse::new(400, "missing input").with_header("X-Err", "bad");
        let err = RetrainError::http(RequestStage::Submit, &response);
        assert!(matches!(err, RetrainError::Http { stage: RequestStage::Submit, status: 400, .. }));
        assert_eq!(err.to_string(), format_failed_response(&response));
        assert_eq!(err.job_id(), None);
    }
}
