//! Music playback capability.
//!
//! The dashboard only talks to playback through [`Playback`]. No provider is
//! bundled, so the default is [`Unconfigured`], which never connects and
//! never fires its callbacks.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackState {
    pub track: String,
    pub artist: String,
}

pub type StateHandler = Box<dyn FnMut(&TrackState) + Send>;
pub type ReadyHandler = Box<dyn FnMut(&str) + Send>;

#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("playback is not configured")]
    NotConfigured,

    /// A provider was configured but could not reach its player.
    #[error("playback connection failed: {0}")]
    Connect(String),
}

pub trait Playback: Send {
    fn connect(&mut self) -> Result<(), PlaybackError>;

    fn on_state_change(&mut self, handler: StateHandler);

    /// Called with the device id once the player can accept commands.
    fn on_ready(&mut self, handler: ReadyHandler);
}

#[derive(Debug, Default)]
pub struct Unconfigured;

impl Playback for Unconfigured {
    fn connect(&mut self) -> Result<(), PlaybackError> {
        Err(PlaybackError::NotConfigured)
    }

    fn on_state_change(&mut self, _handler: StateHandler) {}

    fn on_ready(&mut self, _handler: ReadyHandler) {}
}

/// What the dashboard shows for playback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Disconnected,
    NotConfigured,
    Ready {
        device_id: String,
    },
    Playing(TrackState),
}

impl PlaybackStatus {
    pub fn describe(&self) -> String {
        match self {
            Self::Disconnected => "Not connected".to_string(),
            Self::NotConfigured => {
                "No playback provider configured; the rest of the dashboard works without one"
                    .to_string()
            }
            Self::Ready { device_id } => format!("Ready on device {}", device_id),
            Self::Playing(state) => format!("♪ {} · {}", state.track, state.artist),
        }
    }
}
