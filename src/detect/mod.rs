//! Language identification.
//!
//! Three detectors with different failure modes feed one resolution policy:
//!
//! - `script`: Unicode-block classification with marker-word tie-breaking
//! - `transliterate`: rescue of romanised (Latin-script) Indic input
//! - `statistical`: trigram classifier constrained to the supported languages
//! - `resolver`: the precedence chain that turns their votes into one `Language`

pub mod resolver;
pub mod script;
pub mod statistical;
pub mod transliterate;

use crate::i18n::Language;

pub use resolver::{LanguageResolver, Resolution, ResolutionSource};
pub use script::{classify_script, disambiguate, Script};
pub use statistical::{DetectionError, LanguageDetector, WhatlangDetector};
pub use transliterate::{normalize, Normalized};

/// One detector's opinion about a text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionVote {
    pub language: Language,

    /// Detector confidence in `[0, 1]`, or `None` for detectors that only
    /// signal presence (script classification).
    pub confidence: Option<f64>,
}

impl DetectionVote {
    pub fn presence(language: Language) -> Self {
        Self {
            language,
            confidence: None,
        }
    }

    pub fn scored(language: Language, confidence: f64) -> Self {
        Self {
            language,
            confidence: Some(confidence),
        }
    }
}

/// Text to be resolved, plus the language some upstream component claims it
/// is in. The hint is raw: it may name an unsupported language or be wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    text: String,
    hint: Option<String>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_optional_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
}
