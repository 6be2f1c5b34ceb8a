//! Lifecycle of the user's own position

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Where the user's position lookup currently stands
///
/// ```text
/// Idle ──request──▶ Locating ──resolved──▶ Resolved
///                      │  ├──denied─────▶ Denied
///                      │  └──unavailable▶ Unavailable
/// Denied / Unavailable / Resolved ──request──▶ Locating
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationState {
    /// No position has been requested yet
    #[default]
    Idle,
    /// A position request is in flight
    Locating,
    /// A position is known
    Resolved,
    /// The user refused the permission prompt
    Denied,
    /// The platform cannot provide a position
    Unavailable,
}

/// Inputs that drive [`LocationState`] transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationEvent {
    /// The user (or the app) asked for the current position
    Request,
    /// The platform returned a position
    Resolved,
    /// Permission was denied
    PermissionDenied,
    /// The platform has no positioning capability or timed out
    PlatformUnavailable,
}

impl LocationState {
    /// Apply an event, returning the next state
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] when the event is not
    /// accepted in the current state; the caller keeps the old state.
    pub fn apply(self, event: LocationEvent) -> Result<Self, DomainError> {
        match (self, event) {
            (Self::Idle | Self::Resolved | Self::Denied | Self::Unavailable, LocationEvent::Request) => {
                Ok(Self::Locating)
            },
            (Self::Locating, LocationEvent::Resolved) => Ok(Self::Resolved),
            (Self::Locating, LocationEvent::PermissionDenied) => Ok(Self::Denied),
            (Self::Locating, LocationEvent::PlatformUnavailable) => Ok(Self::Unavailable),
            (from, event) => Err(DomainError::InvalidTransition {
                from: from.to_string(),
                event: event.to_string(),
            }),
        }
    }

    /// Whether a position request is currently in flight
    #[must_use]
    pub const fn is_locating(&self) -> bool {
        matches!(self, Self::Locating)
    }

    /// Whether the last lookup ended in a failure the user should see
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Denied | Self::Unavailable)
    }
}

impl fmt::Display for LocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Locating => "locating",
            Self::Resolved => "resolved",
            Self::Denied => "denied",
            Self::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

impl fmt::Display for LocationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Request => "request",
            Self::Resolved => "resolved",
            Self::PermissionDenied => "permission_denied",
            Self::PlatformUnavailable => "platform_unavailable",
        };
        f.write_str(s)
    }
}
