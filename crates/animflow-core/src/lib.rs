//! Animflow Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Animflow parser,
//! timeline compiler and playback controller. It includes:
//!
//! - **Identifiers**: Efficient string-interned entity identifiers ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Semantic**: The parsed diagram model ([`semantic`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod semantic;
