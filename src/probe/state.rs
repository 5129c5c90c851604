// src/probe/state.rs
use std::fmt;

/// Display status of the backend connection.
///
/// Starts at `Loading` and transitions exactly once, to `Connected` or
/// `Disconnected`. There is no way back to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityState {
    Loading,
    Connected,
    Disconnected,
}

impl ConnectivityState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConnectivityState::Loading)
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectivityState::Loading => "loading",
            ConnectivityState::Connected => "connected",
            ConnectivityState::Disconnected => "disconnected",
        };
        f.write_str(s)
    }
}
