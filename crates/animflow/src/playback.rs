//! Playback: a transport state machine over a compiled timeline that keeps
//! pace with an external narration engine.
//!
//! The [`PlaybackController`] is single-writer. Hosts that tick from one
//! thread and receive narration callbacks on another wrap it in a
//! [`SharedPlayer`].

mod controller;
mod narration;
mod renderer;
mod shared;

pub use controller::{PlaybackController, PlaybackEvent, TransportState};
pub use narration::{Narrator, SimulatedNarrator, UtteranceToken};
pub use renderer::{HeadlessRenderer, Renderer};
pub use shared::SharedPlayer;
