//! Errors raised while assembling a keyboard.
//!
//! Scanning itself never fails: slot exhaustion and queue overflow are
//! handled by policy, not reported as errors.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Matrix or button tables do not match the pin lists.
    KeymapShape,
    /// The matrix has more cells than one scan pass can sample.
    MatrixTooLarge { cells: usize },
    /// More buttons than a scan pass can track.
    TooManyButtons { buttons: usize },
    /// A listener registry is full.
    ListenerCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeymapShape => write!(f, "keymap tables do not match the pin lists"),
            Self::MatrixTooLarge { cells } => write!(
                f,
                "matrix has {cells} cells, at most {} are supported",
                crate::keymap::MAX_MATRIX_CELLS
            ),
            Self::TooManyButtons { buttons } => write!(
                f,
                "keymap has {buttons} buttons, at most {} are supported",
                crate::keymap::MAX_BUTTONS
            ),
            Self::ListenerCapacity => write!(f, "listener registry is full"),
        }
    }
}

impl core::error::Error for Error {}
