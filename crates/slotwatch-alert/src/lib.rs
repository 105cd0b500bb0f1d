//! # slotwatch Alert
//!
//! Plays a sound after a confirmed booking so the operator notices.
//!
//! The sound file is handed to the first system player found on `PATH`:
//! `afplay` (macOS), `play` (SoX) or `aplay` (ALSA). Without a sound file
//! or player the terminal bell is rung instead.

mod playback;
mod sound;

pub use playback::{detect_playback_backend, PlaybackBackend};
pub use sound::SoundAlert;
