use std::io;

use thiserror::Error;

use super::locator::ImageLocator;
use super::scheduler::ScheduleError;
use crate::state::{GateState, StateError};

pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Why a selection produced no raster. Logged, never shown to the user.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("resource unreadable {locator}: {source}")]
    ResourceUnreadable {
        locator: String,
        #[source]
        source: io::Error,
    },

    #[error("decode failure {locator}: {reason}")]
    DecodeFailure { locator: String, reason: String },
}

impl LoadError {
    pub(crate) fn unreadable(locator: &ImageLocator, source: io::Error) -> Self {
        Self::ResourceUnreadable {
            locator: locator.to_string(),
            source,
        }
    }

    pub(crate) fn decode(locator: &ImageLocator, reason: impl Into<String>) -> Self {
        Self::DecodeFailure {
            locator: locator.to_string(),
            reason: reason.into(),
        }
    }
}

/// Why a selection could not be scheduled at all.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("selection gate is closed (state={state:?})")]
    GateClosed {
        state: GateState,
        #[source]
        source: StateError,
    },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}
