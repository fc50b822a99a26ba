//! Recoverable status codes and fatal contract violations
//!
//! Two disjoint classes. [`DrawError`] is returned from operations that can
//! legitimately fail at runtime and callers branch on it. [`ContractViolation`]
//! is a caller bug: [`violation`] logs the reason and panics, and every
//! operation validates its arguments before touching the pixel buffer.

use thiserror::Error;

/// Runtime failures a caller is expected to check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Feature, mode or orientation not available on this device
    #[error("operation not supported by this device")]
    NotSupported,

    /// Pixel or scan-line storage could not be allocated
    #[error("not enough memory for pixel storage")]
    NoMemory,

    /// Argument combination rejected (size, stride, scale factor, ...)
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// Device configuration could not be read or written
    #[error("configuration error: {0}")]
    Config(String),

    /// The display behind a screen device failed
    #[error("screen error: {0}")]
    Screen(String),
}

/// Reason codes for misuse of a draw device
///
/// Discriminants are stable and reported in the panic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ContractViolation {
    #[error("no device present")]
    NoDevicePresent = 1,
    #[error("invalid parameter")]
    InvalidParameter,
    #[error("invalid display mode")]
    InvalidDisplayMode,
    #[error("invalid window handle")]
    InvalidWindowHandle,
    #[error("out of bounds")]
    OutOfBounds,
    #[error("zero length")]
    ZeroLength,
    #[error("null pointer")]
    NullPointer,
    #[error("invalid pointer")]
    InvalidPointer,
    #[error("alpha blend invariant broken")]
    AlphaBlendInvariant,
    #[error("invalid method call")]
    InvalidMethodCall,
    #[error("invalid size")]
    InvalidSize,
    #[error("incompatible previous device")]
    IncompatiblePreviousDevice = 14,
}

impl ContractViolation {
    /// Numeric reason code
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Abort the calling operation
#[cold]
#[track_caller]
pub fn violation(reason: ContractViolation) -> ! {
    log::error!(
        "draw device contract violation: {} (code {})",
        reason,
        reason.code()
    );
    panic!(
        "draw device contract violation: {} (code {})",
        reason,
        reason.code()
    );
}

/// Abort with `reason` unless `cond` holds
#[inline]
#[track_caller]
pub(crate) fn ensure(cond: bool, reason: ContractViolation) {
    if !cond {
        violation(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ContractViolation::NoDevicePresent.code(), 1);
        assert_eq!(ContractViolation::OutOfBounds.code(), 5);
        assert_eq!(ContractViolation::ZeroLength.code(), 6);
        assert_eq!(ContractViolation::NullPointer.code(), 7);
        assert_eq!(ContractViolation::IncompatiblePreviousDevice.code(), 14);
    }

    #[test]
    #[should_panic(expected = "out of bounds (code 5)")]
    fn test_violation_panics_with_reason() {
        violation(ContractViolation::OutOfBounds);
    }

    #[test]
    fn test_ensure_passes_when_true() {
        ensure(true, ContractViolation::ZeroLength);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DrawError::BadArgument("stride".into()).to_string(),
            "bad argument: stride"
        );
        assert_eq!(
            DrawError::NotSupported.to_string(),
            "operation not supported by this device"
        );
    }
}
