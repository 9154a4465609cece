use crate::events::{Notice, NoticeKind};

/// Failures the orchestrator hands back to its caller.
///
/// Degraded boundary data and counter failures never show up here: the
/// former is a flag on the boundary store, the latter is logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Recoverable and meant for the user. The same notice is also queued as
    /// an [`crate::EngineEvent::Notice`].
    UserNotice(Notice),
}

impl EngineError {
    pub fn notice(kind: NoticeKind, message: impl Into<String>) -> Self {
        EngineError::UserNotice(Notice::new(kind, message))
    }

    pub fn kind(&self) -> NoticeKind {
        match self {
            EngineError::UserNotice(n) => n.kind,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::UserNotice(n) => write!(f, "{}", n.message),
        }
    }
}

impl std::error::Error for EngineError {}
