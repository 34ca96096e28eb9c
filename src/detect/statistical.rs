//! Statistical language detection.
//!
//! Uses the whatlang trigram detector. The allowlist is an argument of every
//! call and a fresh `Detector` is built from it, so no configuration outlives
//! the call or leaks between concurrent exchanges.

use crate::detect::DetectionVote;
use crate::i18n::Language;
use thiserror::Error;
use whatlang::{Detector, Lang};

/// Fewest alphabetic characters worth classifying.
pub const MIN_ALPHABETIC_CHARS: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("text too short to classify ({0} alphabetic characters)")]
    TooShort(usize),

    #[error("allowlist contains no language the detector knows")]
    NoAllowedLanguage,

    #[error("detector could not determine a language")]
    Undetermined,

    #[error("detector returned '{0}', which is outside the allowlist")]
    OutsideAllowlist(String),
}

/// A text classifier constrained, per call, to a set of languages.
pub trait LanguageDetector: Send + Sync {
    /// Classify `text` as one of `allowlist`, or fail without guessing.
    fn detect(&self, text: &str, allowlist: &[Language]) -> Result<DetectionVote, DetectionError>;
}

/// Trigram detector backed by the `whatlang` crate. Deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str, allowlist: &[Language]) -> Result<DetectionVote, DetectionError> {
        let alphabetic = text.chars().filter(|c| c.is_alphabetic()).count();
        if alphabetic < MIN_ALPHABETIC_CHARS {
            return Err(DetectionError::TooShort(alphabetic));
        }

        let allowed: Vec<Lang> = allowlist.iter().filter_map(|l| to_whatlang(*l)).collect();
        if allowed.is_empty() {
            return Err(DetectionError::NoAllowedLanguage);
        }

        let info = Detector::with_allowlist(allowed)
            .detect(text)
            .ok_or(DetectionError::Undetermined)?;

        let language = from_whatlang(info.lang())
            .filter(|l| allowlist.contains(l))
            .ok_or_else(|| DetectionError::OutsideAllowlist(info.lang().code().to_string()))?;

        Ok(DetectionVote::scored(language, info.confidence()))
    }
}

/// Whatlang has no model for Assamese; it is only reachable through script
/// classification.
fn to_whatlang(language: Language) -> Option<Lang> {
    match language {
        Language::English => Some(Lang::Eng),
        Language::Hindi => Some(Lang::Hin),
        Language::Tamil => Some(Lang::Tam),
        Language::Telugu => Some(Lang::Tel),
        Language::Kannada => Some(Lang::Kan),
        Language::Malayalam => Some(Lang::Mal),
        Language::Bengali => Some(Lang::Ben),
        Language::Marathi => Some(Lang::Mar),
        Language::Gujarati => Some(Lang::Guj),
        Language::Punjabi => Some(Lang::Pan),
        Language::Odia => Some(Lang::Ori),
        Language::Urdu => Some(Lang::Urd),
        Language::Assamese => None,
    }
}

fn from_whatlang(lang: Lang) -> Option<Language> {
    Language::ALL
        .into_iter()
        .find(|l| to_whatlang(*l) == Some(lang))
}
