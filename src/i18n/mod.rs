//! Supported languages and their per-language data.
//!
//! # Architecture
//!
//! - `language`: the closed `Language` enumeration every resolution produces
//! - `registry`: one `LanguageProfile` per language (names, script, voice, strings)
//! - `strings`: prompt templates and fallback replies
//!
//! # Example
//!
//! ```rust
//! use ganesha_voice::i18n::{Language, LanguageRegistry};
//!
//! let tamil = Language::from_code("ta").unwrap();
//! assert_eq!(tamil.voice(), "ta-IN-ValluvarNeural");
//! assert_eq!(LanguageRegistry::get().default_language(), Language::English);
//! ```

mod language;
mod registry;
pub mod strings;

pub use language::Language;
pub use registry::{LanguageProfile, LanguageRegistry, DEFAULT_VOICE};
pub use strings::{LanguageStrings, PERSONA_CONTEXT};
