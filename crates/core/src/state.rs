//! Load state published by a screen.

use serde::Serialize;

/// Progress of one screen's data, as seen by its subscribers.
///
/// `Loading` and `Error` may carry the data of the previous successful load
/// so a view can keep showing it while refreshing or after a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState<T> {
    Loading { data: Option<T> },
    Success { data: T },
    Error { message: String, data: Option<T> },
}

impl<T> LoadState<T> {
    pub fn loading() -> Self {
        LoadState::Loading { data: None }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loading { data } | LoadState::Error { data, .. } => data.as_ref(),
            LoadState::Success { data } => Some(data),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            LoadState::Loading { data } | LoadState::Error { data, .. } => data,
            LoadState::Success { data } => Some(data),
        }
    }

    /// Error message, only present in the `Error` state.
    pub fn message(&self) -> Option<&str> {
        match self {
            LoadState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoadState::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Loading { data } => LoadState::Loading { data: data.map(f) },
            LoadState::Success { data } => LoadState::Success { data: f(data) },
            LoadState::Error { message, data } => LoadState::Error { message, data: data.map(f) },
        }
    }
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::loading()
    }
}
