use std::error::Error as StdError;
use tracing::error;
use tracing_error::SpanTrace;

/// Error raised by actor methods, carries the span trace of where it was created.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    kind: ErrorKind,
    span_trace: SpanTrace,
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Node {0} is already registered")]
    DuplicateNode(String),
    #[error(transparent)]
    Fatal(anyhow::Error),
    #[error(transparent)]
    NonFatal(#[from] anyhow::Error),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::Fatal(_))
    }
}

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(source: E) -> Self {
        Self {
            kind: ErrorKind::from(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

/// Logs an actor error, returns whether the actor has to stop.
pub fn handle_error(error: Box<dyn StdError + Send + Sync>) -> bool {
    let (stop_actor, span_trace) = match error.downcast_ref::<Error>() {
        Some(e) => (e.is_fatal(), Some(e.span_trace.to_string())),
        None => (false, None),
    };

    error!(
        %stop_actor,
        span_trace = span_trace.as_deref().unwrap_or("None"),
        "ActorError: {}",
        error
    );

    stop_actor
}
