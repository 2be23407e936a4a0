//! Body identifiers shared between the core and its host.
//!
//! The core never owns physical bodies. It refers to them through a
//! [`Handle`] handed out by the host's lifecycle, and classifies them with a
//! [`BodyTag`] so area queries can be filtered.
//!
//! # Example
//!
//! ```
//! use flipstrike_core::entity::{BodyTag, Handle};
//!
//! let a = Handle::new(1);
//! let b = Handle::new(2);
//!
//! assert!(a < b);
//! assert_eq!(a.as_u64(), 1);
//! assert_eq!(BodyTag::Adversary.to_string(), "Adversary");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a body living in the host.
///
/// `Handle` is a newtype around `u64`. Handles are ordered by their numeric
/// value, which the core relies on to visit bodies in a deterministic order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(u64);

impl Handle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this handle.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Handle {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// Classification of a body, used as the filter of area queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    /// The player-controlled runner.
    Player,
    /// Any hostile body (Basic, Medium or Unexpected).
    Adversary,
}

impl fmt::Display for BodyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Adversary => write!(f, "Adversary"),
        }
    }
}
