//! Semantic diagram model types.
//!
//! This module contains the in-memory representation of an Animflow document
//! after parsing. The model is immutable once built; the timeline compiler
//! derives a fresh program from it whenever it changes.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ sectioner
//! Diagram / @animation / @style / @narration / @config blocks
//!     ↓ block parsers
//! Semantic Model (these types)
//!     ↓ layout oracle
//! Positioned Diagram
//!     ↓ timeline compiler
//! Compiled Timeline + Step Boundaries
//! ```
//!
//! # Organization
//!
//! - [`diagram`] - The root [`Diagram`] and its layout [`Direction`]
//! - [`element`] - Structural entities: [`Node`] and [`Edge`]
//! - [`step`] - Animation steps, targets and their typed property bag
//! - [`effect`] - Named entrance, exit and flow effects
//! - [`style`] - Per-node visual overrides
//! - [`narration`] - Per-step captions
//! - [`config`] - Document level playback options
//! - [`layout`] - Positions produced by a layout engine

pub mod config;
pub mod diagram;
pub mod effect;
pub mod element;
pub mod layout;
pub mod narration;
pub mod step;
pub mod style;

pub use config::*;
pub use diagram::*;
pub use effect::*;
pub use element::*;
pub use layout::*;
pub use narration::*;
pub use step::*;
pub use style::*;
