//! Ganesha voice assistant core.
//!
//! Audio or text comes in, a language is resolved for it, a reply is
//! generated in that language and spoken back with a voice chosen from the
//! reply's own language.

pub mod config;
pub mod detect;
pub mod error;
pub mod generation;
pub mod i18n;
pub mod pipeline;
pub mod server;
pub mod synthesis;
pub mod transcription;
pub mod worker_pool;
