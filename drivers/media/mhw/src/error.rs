//! # MHW Error Handling
//!
//! Error types for command population and emission.
//!
//! Every failure in this layer reflects a programming or configuration defect
//! (malformed parameters, undersized buffer), never a transient condition.
//! Errors propagate immediately to the direct caller of `add_cmd`; nothing is
//! retried.
//!
//! ```text
//!   set_cmd ──▶ InvalidParameter / NotSupported      (population, nothing appended)
//!   append  ──▶ Append(..) / NullTarget              (emission, nothing appended)
//!   payload ──▶ PayloadAppend(..)                    (primary committed, payload not)
//! ```

use core::fmt;

use crate::feature::FeatureId;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// MHW Result type alias
pub type MhwResult<T> = core::result::Result<T, MhwError>;

// =============================================================================
// APPEND ERROR
// =============================================================================

/// Status returned by an output target that rejected an append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendError {
    /// Not enough room left in the target
    NoSpace {
        /// Dword-aligned size of the rejected append
        requested: usize,
        /// Bytes still available in the target
        remaining: usize,
    },
    /// The target has no CPU mapping (batch buffer not locked)
    NotLocked,
}

impl fmt::Display for AppendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpace {
                requested,
                remaining,
            } => write!(
                f,
                "no space: {} bytes requested, {} remaining",
                requested, remaining
            ),
            Self::NotLocked => write!(f, "target not locked"),
        }
    }
}

// =============================================================================
// MHW ERROR
// =============================================================================

/// Unified error type of the command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum MhwError {
    // =========================================================================
    // Population Errors
    // =========================================================================
    /// Parameter record cannot be encoded
    InvalidParameter,
    /// Command or parameter combination not supported by this generation
    NotSupported,

    // =========================================================================
    // Emission Errors
    // =========================================================================
    /// Neither a command buffer nor a batch buffer was supplied
    NullTarget,
    /// The target rejected the command encoding; nothing was appended
    Append(AppendError),
    /// The command encoding was appended but the trailing payload was rejected
    PayloadAppend(AppendError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A contributor with this id is already part of the chain
    DuplicateFeature(FeatureId),
}

/// Coarse classification of [`MhwError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The set step could not produce an encoding
    Population,
    /// The output target rejected the encoding
    Emission,
    /// Encoding committed, payload rejected
    PartialEmission,
    /// Pipeline set-up error
    Configuration,
}

impl MhwError {
    /// Get the error category
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidParameter | Self::NotSupported => ErrorCategory::Population,
            Self::NullTarget | Self::Append(_) => ErrorCategory::Emission,
            Self::PayloadAppend(_) => ErrorCategory::PartialEmission,
            Self::DuplicateFeature(_) => ErrorCategory::Configuration,
        }
    }

    /// True if bytes from the failing call were left in the target
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::PayloadAppend(_))
    }
}

impl fmt::Display for MhwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid command parameter"),
            Self::NotSupported => write!(f, "command not supported"),
            Self::NullTarget => write!(f, "no command or batch buffer supplied"),
            Self::Append(e) => write!(f, "command append failed: {}", e),
            Self::PayloadAppend(e) => {
                write!(f, "command committed but payload append failed: {}", e)
            }
            Self::DuplicateFeature(id) => write!(f, "feature {:?} already registered", id),
        }
    }
}

impl From<AppendError> for MhwError {
    fn from(e: AppendError) -> Self {
        MhwError::Append(e)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            MhwError::InvalidParameter.category(),
            ErrorCategory::Population
        );
        assert_eq!(MhwError::NullTarget.category(), ErrorCategory::Emission);
        assert_eq!(
            MhwError::Append(AppendError::NotLocked).category(),
            ErrorCategory::Emission
        );
        assert_eq!(
            MhwError::PayloadAppend(AppendError::NotLocked).category(),
            ErrorCategory::PartialEmission
        );
        assert_eq!(
            MhwError::DuplicateFeature(FeatureId(3)).category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_only_payload_failure_is_partial() {
        let no_space = AppendError::NoSpace {
            requested: 8,
            remaining: 4,
        };
        assert!(MhwError::PayloadAppend(no_space).is_partial());
        assert!(!MhwError::Append(no_space).is_partial());
        assert!(!MhwError::InvalidParameter.is_partial());
    }

    #[test]
    fn test_display() {
        let e: MhwError = AppendError::NoSpace {
            requested: 16,
            remaining: 12,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "command append failed: no space: 16 bytes requested, 12 remaining"
        );
    }
}
