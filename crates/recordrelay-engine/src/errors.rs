//! Run-level error envelope.

use recordrelay_types::FlowError;

/// Single enclosing failure surfaced to the caller when any stage of a run
/// fails. Raised exactly once per run, terminal: by the time this exists,
/// the original payload has already been attached as a diagnostic artifact.
#[derive(Debug, thiserror::Error)]
#[error("flow run failed: {cause}")]
pub struct RunError {
    #[source]
    cause: FlowError,
}

impl RunError {
    /// Wrap the causing stage error.
    #[must_use]
    pub fn new(cause: FlowError) -> Self {
        Self { cause }
    }

    /// The typed causing error, for callers that branch on the taxonomy.
    #[must_use]
    pub fn cause(&self) -> &FlowError {
        &self.cause
    }
}

impl From<FlowError> for RunError {
    fn from(cause: FlowError) -> Self {
        Self::new(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_embeds_the_causing_error() {
        let err = RunError::new(FlowError::RemoteDelivery {
            key: "CP1".to_string(),
            status: 500,
            body: String::new(),
        });
        let msg = err.to_string();
        assert!(msg.starts_with("flow run failed:"), "got: {msg}");
        assert!(msg.contains("CP1"), "got: {msg}");
    }

    #[test]
    fn cause_is_reachable_for_branching() {
        let err: RunError = FlowError::EmptyInput("blank".to_string()).into();
        assert!(matches!(err.cause(), FlowError::EmptyInput(_)));
    }
}
