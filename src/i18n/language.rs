//! Language type: the closed set of languages the assistant understands.
//!
//! Every language decision made anywhere in the pipeline is a `Language`
//! value, so an unsupported code is not representable past the point where
//! raw strings are parsed.

use crate::detect::Script;
use crate::i18n::{LanguageProfile, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Language {
    English,
    Hindi,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Bengali,
    Marathi,
    Gujarati,
    Punjabi,
    Odia,
    Assamese,
    Urdu,
}

impl Language {
    /// All supported languages, in registry order.
    pub const ALL: [Language; 13] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Malayalam,
        Language::Bengali,
        Language::Marathi,
        Language::Gujarati,
        Language::Punjabi,
        Language::Odia,
        Language::Assamese,
        Language::Urdu,
    ];

    /// ISO 639-1 code (e.g. "en", "hi").
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Bengali => "bn",
            Language::Marathi => "mr",
            Language::Gujarati => "gu",
            Language::Punjabi => "pa",
            Language::Odia => "or",
            Language::Assamese => "as",
            Language::Urdu => "ur",
        }
    }

    /// Parse a language from an ISO 639-1 code or an English language name.
    ///
    /// Transcription services disagree on whether they report `"hi"` or
    /// `"hindi"`, so both forms are accepted, case-insensitively.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code or name belongs to a supported language
    /// * `Err` otherwise
    pub fn from_code(code: &str) -> Result<Language> {
        let needle = code.trim().to_ascii_lowercase();
        if needle.is_empty() {
            bail!("Empty language code");
        }

        match Language::ALL
            .into_iter()
            .find(|lang| lang.code() == needle || lang.name().eq_ignore_ascii_case(&needle))
        {
            Some(lang) => Ok(lang),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// The language every failed resolution falls back to.
    pub fn fallback() -> Language {
        LanguageRegistry::get().default_language()
    }

    /// The full profile record for this language.
    pub fn profile(self) -> &'static LanguageProfile {
        LanguageRegistry::get().profile(self)
    }

    /// English name of the language (e.g. "Tamil").
    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Name of the language in its own script.
    pub fn native_name(self) -> &'static str {
        self.profile().native_name
    }

    /// Writing system the language is normally written in.
    pub fn script(self) -> Script {
        self.profile().script
    }

    /// Synthesis voice for this language, or the default voice when unmapped.
    pub fn voice(self) -> &'static str {
        LanguageRegistry::get().voice_for(self)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<Language> for &'static str {
    fn from(lang: Language) -> Self {
        lang.code()
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Language::from_code(&value).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_iso() {
        assert_eq!(Language::from_code("hi").unwrap(), Language::Hindi);
        assert_eq!(Language::from_code("ur").unwrap(), Language::Urdu);
        assert_eq!(Language::from_code("as").unwrap(), Language::Assamese);
    }

    #[test]
    fn test_from_code_is_case_insensitive() {
        assert_eq!(Language::from_code("TA").unwrap(), Language::Tamil);
        assert_eq!(Language::from_code(" En ").unwrap(), Language::English);
    }

    #[test]
    fn test_from_code_accepts_english_name() {
        assert_eq!(Language::from_code("hindi").unwrap(), Language::Hindi);
        assert_eq!(Language::from_code("Malayalam").unwrap(), Language::Malayalam);
    }

    #[test]
    fn test_from_code_invalid() {
        let result = Language::from_code("fr");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown"));
    }

    #[test]
    fn test_from_code_empty() {
        assert!(Language::from_code("").is_err());
        assert!(Language::from_code("   ").is_err());
    }

    #[test]
    fn test_every_code_round_trips() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()).unwrap(), lang);
        }
    }

    // ==================== Profile Access Tests ====================

    #[test]
    fn test_fallback_is_english() {
        assert_eq!(Language::fallback(), Language::English);
    }

    #[test]
    fn test_names() {
        assert_eq!(Language::Odia.name(), "Odia");
        assert_eq!(Language::Hindi.native_name(), "हिन्दी");
    }

    #[test]
    fn test_script_assignment() {
        assert_eq!(Language::Hindi.script(), Script::Devanagari);
        assert_eq!(Language::Marathi.script(), Script::Devanagari);
        assert_eq!(Language::Assamese.script(), Script::Bengali);
        assert_eq!(Language::Urdu.script(), Script::Arabic);
        assert_eq!(Language::English.script(), Script::Latin);
    }

    #[test]
    fn test_voice_lookup() {
        assert_eq!(Language::Tamil.voice(), "ta-IN-ValluvarNeural");
        assert_eq!(Language::Urdu.voice(), "ur-IN-SalmanNeural");
    }

    #[test]
    fn test_unmapped_voice_falls_back_to_default() {
        assert_eq!(Language::Odia.voice(), "en-IN-PrabhatNeural");
        assert_eq!(Language::Assamese.voice(), "en-IN-PrabhatNeural");
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::Gujarati.to_string(), "gu");
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&Language::Punjabi).unwrap();
        assert_eq!(json, "\"pa\"");

        let parsed: Language = serde_json::from_str("\"kn\"").unwrap();
        assert_eq!(parsed, Language::Kannada);

        assert!(serde_json::from_str::<Language>("\"xx\"").is_err());
    }
}
