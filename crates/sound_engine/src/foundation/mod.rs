//! Foundation module - Core utilities shared by the audio and event layers
//!
//! - Logging utilities

pub mod logging;
