//! Common error infrastructure for agent-core.
//!
//! Domain errors (e.g. [`CodecError`](crate::channel::CodecError)) live next to
//! the code that produces them. This module only provides the shared
//! classification used by every crate in the workspace.
//!
//! Nothing in the decision core is fatal: the worst outcome of any error is a
//! wasted tick. Severity exists so the runtime can decide whether to fall
//! through to the next action or to log a warning.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: capability gate closed or cell occupied, retry next tick
/// - **Validation**: value outside the encodable range, caller must clamp
/// - **Internal**: a slot table or state inconsistency worth investigating
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug rather than a game condition.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all agent errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Return a stable SCREAMING_SNAKE code from `error_code` for tests and logs
pub trait AgentError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
