//! Language registry: single source of truth for all supported languages.
//!
//! Each language maps to one `LanguageProfile` carrying everything the
//! pipeline needs to know about it (names, script, synthesis voice and the
//! localized strings used for prompting and fallbacks). The registry is built
//! once on first access and is read-only afterwards, so any number of
//! concurrent exchanges can consult it without synchronization.

use crate::detect::Script;
use crate::i18n::strings::{self, LanguageStrings};
use crate::i18n::Language;
use std::sync::OnceLock;

/// Voice used when a language has no dedicated synthesis voice.
pub const DEFAULT_VOICE: &str = "en-IN-PrabhatNeural";

/// Everything the pipeline knows about one supported language.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub language: Language,

    /// English name of the language (e.g., "Hindi")
    pub name: &'static str,

    /// Name of the language in its own script (e.g., "हिन्दी")
    pub native_name: &'static str,

    /// Writing system used for this language
    pub script: Script,

    /// BCP 47 locale used by the synthesis service (e.g., "hi-IN")
    pub locale: &'static str,

    /// Dedicated synthesis voice, if the synthesis service has one
    pub voice: Option<&'static str>,

    /// Prompt template and fallback message
    pub strings: &'static LanguageStrings,

    /// Whether this is the fallback language (exactly one should be true)
    pub is_default: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    profiles: Vec<LanguageProfile>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            profiles: default_profiles(),
        })
    }

    /// Profile for a language.
    ///
    /// # Panics
    /// Panics if the registry has no entry for `language`, which means the
    /// profile table and the `Language` enum have drifted apart.
    pub fn profile(&self, language: Language) -> &LanguageProfile {
        self.profiles
            .iter()
            .find(|p| p.language == language)
            .expect("every Language variant has a registry profile")
    }

    /// Look up a profile by ISO 639-1 code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageProfile> {
        self.profiles.iter().find(|p| p.language.code() == code)
    }

    /// All profiles, in registry order.
    pub fn list_all(&self) -> Vec<&LanguageProfile> {
        self.profiles.iter().collect()
    }

    /// The supported-language allowlist handed to detectors.
    pub fn allowlist(&self) -> Vec<Language> {
        self.profiles.iter().map(|p| p.language).collect()
    }

    /// The fallback language.
    ///
    /// # Panics
    /// Panics if the table does not define exactly one default language.
    pub fn default_language(&self) -> Language {
        let defaults: Vec<_> = self.profiles.iter().filter(|p| p.is_default).collect();

        match defaults.len() {
            0 => panic!("No default language found in registry"),
            1 => defaults[0].language,
            _ => panic!("Multiple default languages found in registry"),
        }
    }

    /// Synthesis voice for a language, falling back to `DEFAULT_VOICE`.
    pub fn voice_for(&self, language: Language) -> &'static str {
        self.profile(language).voice.unwrap_or(DEFAULT_VOICE)
    }
}

fn default_profiles() -> Vec<LanguageProfile> {
    vec![
        LanguageProfile {
            language: Language::English,
            name: "English",
            native_name: "English",
            script: Script::Latin,
            locale: "en-IN",
            voice: Some(DEFAULT_VOICE),
            strings: &strings::ENGLISH_STRINGS,
            is_default: true,
        },
        LanguageProfile {
            language: Language::Hindi,
            name: "Hindi",
            native_name: "हिन्दी",
            script: Script::Devanagari,
            locale: "hi-IN",
            voice: Some("hi-IN-MadhurNeural"),
            strings: &strings::HINDI_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Tamil,
            name: "Tamil",
            native_name: "தமிழ்",
            script: Script::Tamil,
            locale: "ta-IN",
            voice: Some("ta-IN-ValluvarNeural"),
            strings: &strings::TAMIL_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Telugu,
            name: "Telugu",
            native_name: "తెలుగు",
            script: Script::Telugu,
            locale: "te-IN",
            voice: Some("te-IN-MohanNeural"),
            strings: &strings::TELUGU_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Kannada,
            name: "Kannada",
            native_name: "ಕನ್ನಡ",
            script: Script::Kannada,
            locale: "kn-IN",
            voice: Some("kn-IN-GaganNeural"),
            strings: &strings::KANNADA_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Malayalam,
            name: "Malayalam",
            native_name: "മലയാളം",
            script: Script::Malayalam,
            locale: "ml-IN",
            voice: Some("ml-IN-MidhunNeural"),
            strings: &strings::MALAYALAM_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Bengali,
            name: "Bengali",
            native_name: "বাংলা",
            script: Script::Bengali,
            locale: "bn-IN",
            voice: Some("bn-IN-BashkarNeural"),
            strings: &strings::BENGALI_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Marathi,
            name: "Marathi",
            native_name: "मराठी",
            script: Script::Devanagari,
            locale: "mr-IN",
            voice: Some("mr-IN-ManoharNeural"),
            strings: &strings::MARATHI_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Gujarati,
            name: "Gujarati",
            native_name: "ગુજરાતી",
            script: Script::Gujarati,
            locale: "gu-IN",
            voice: Some("gu-IN-NiranjanNeural"),
            strings: &strings::ENGLISH_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Punjabi,
            name: "Punjabi",
            native_name: "ਪੰਜਾਬੀ",
            script: Script::Gurmukhi,
            locale: "pa-IN",
            voice: Some("pa-IN-GurpreetNeural"),
            strings: &strings::ENGLISH_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Odia,
            name: "Odia",
            native_name: "ଓଡ଼ିଆ",
            script: Script::Oriya,
            locale: "or-IN",
            voice: None,
            strings: &strings::ENGLISH_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Assamese,
            name: "Assamese",
            native_name: "অসমীয়া",
            script: Script::Bengali,
            locale: "as-IN",
            voice: None,
            strings: &strings::ENGLISH_STRINGS,
            is_default: false,
        },
        LanguageProfile {
            language: Language::Urdu,
            name: "Urdu",
            native_name: "اردو",
            script: Script::Arabic,
            locale: "ur-IN",
            voice: Some("ur-IN-SalmanNeural"),
            strings: &strings::ENGLISH_STRINGS,
            is_default: false,
        },
    ]
}
