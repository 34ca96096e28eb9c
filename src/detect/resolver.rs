//! Language resolution policy.
//!
//! Combines the recognizer's hint, script classification, transliteration and
//! statistical detection into exactly one supported `Language`:
//!
//! 1. Script override: a native-script match decides, even against a hint,
//!    unless the script is shared and the hint names one of its languages
//! 2. Hint, when it names a supported language
//! 3. Script classification (when there was no hint to override)
//! 4. Transliteration followed by statistical detection
//! 5. The registry's default language
//!
//! No step can fail the resolution; every abstention falls through to the
//! next one and the chain always ends at the default.

use crate::detect::script::{classify_script, disambiguate};
use crate::detect::statistical::LanguageDetector;
use crate::detect::transliterate::normalize;
use crate::detect::Utterance;
use crate::i18n::{Language, LanguageRegistry};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Which step of the policy produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Native script contradicted the hint and won
    ScriptOverride,
    Hint,
    Script,
    Statistical,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub language: Language,
    pub source: ResolutionSource,
}

impl Resolution {
    fn new(language: Language, source: ResolutionSource) -> Self {
        Self { language, source }
    }
}

/// Stateless resolver; cheap to clone and safe to share across exchanges.
#[derive(Clone)]
pub struct LanguageResolver {
    detector: Arc<dyn LanguageDetector>,
    allowlist: Vec<Language>,
    default: Language,
}

impl LanguageResolver {
    /// Resolver over every registered language.
    pub fn new(detector: Arc<dyn LanguageDetector>) -> Self {
        let registry = LanguageRegistry::get();
        Self {
            detector,
            allowlist: registry.allowlist(),
            default: registry.default_language(),
        }
    }

    /// Restrict resolution to a subset of the registered languages. The
    /// default language is always kept.
    pub fn with_allowlist(mut self, allowlist: impl IntoIterator<Item = Language>) -> Self {
        let mut allowlist: Vec<Language> = allowlist.into_iter().collect();
        if !allowlist.contains(&self.default) {
            allowlist.push(self.default);
        }
        self.allowlist = allowlist;
        self
    }

    pub fn allowlist(&self) -> &[Language] {
        &self.allowlist
    }

    /// Resolve an utterance to one supported language.
    pub fn resolve(&self, utterance: &Utterance) -> Resolution {
        let resolution = self.resolve_inner(utterance.text(), utterance.hint());
        debug!(
            "Resolved language {} via {:?} (hint: {:?})",
            resolution.language,
            resolution.source,
            utterance.hint()
        );
        resolution
    }

    /// Shorthand for resolving bare text.
    pub fn resolve_text(&self, text: &str) -> Resolution {
        self.resolve(&Utterance::new(text))
    }

    fn resolve_inner(&self, text: &str, raw_hint: Option<&str>) -> Resolution {
        let hint = raw_hint
            .and_then(|h| Language::from_code(h).ok())
            .filter(|l| self.is_allowed(*l));

        if raw_hint.is_some() && hint.is_none() {
            debug!("Ignoring unsupported language hint {:?}", raw_hint);
        }

        if let Some(script) = classify_script(text) {
            match hint {
                Some(h) if script.languages().contains(&h) => {
                    return Resolution::new(h, ResolutionSource::Hint);
                }
                _ => {
                    let language = disambiguate(script, text);
                    if self.is_allowed(language) {
                        let source = if hint.is_some() {
                            ResolutionSource::ScriptOverride
                        } else {
                            ResolutionSource::Script
                        };
                        return Resolution::new(language, source);
                    }
                    debug!("Script {:?} maps to {} outside the allowlist", script, language);
                }
            }
        }

        if let Some(h) = hint {
            return Resolution::new(h, ResolutionSource::Hint);
        }

        let normalized = normalize(text);
        match self.detector.detect(normalized.text(), &self.allowlist) {
            Ok(vote) if self.is_allowed(vote.language) => {
                debug!(
                    "Statistical vote {} (confidence {:?}, transliterated: {})",
                    vote.language,
                    vote.confidence,
                    normalized.is_transliterated()
                );
                return Resolution::new(vote.language, ResolutionSource::Statistical);
            }
            Ok(vote) => debug!("Discarding statistical vote {} outside the allowlist", vote.language),
            Err(e) => debug!("Statistical detection failed: {}", e),
        }

        Resolution::new(self.default, ResolutionSource::Default)
    }

    fn is_allowed(&self, language: Language) -> bool {
        self.allowlist.contains(&language)
    }
}

impl std::fmt::Debug for LanguageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageResolver")
            .field("allowlist", &self.allowlist)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::statistical::{DetectionError, WhatlangDetector};
    use crate::detect::DetectionVote;
    use proptest::prelude::*;
    use std::sync::Mutex;

    // ==================== Test Detectors ====================

    /// Always fails, like a classifier handed degenerate text.
    struct FailingDetector;

    impl LanguageDetector for FailingDetector {
        fn detect(&self, _: &str, _: &[Language]) -> Result<DetectionVote, DetectionError> {
            Err(DetectionError::Undetermined)
        }
    }

    /// Returns a fixed vote and records the text it was asked about.
    struct ScriptedDetector {
        vote: Language,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedDetector {
        fn new(vote: Language) -> Self {
            Self {
                vote,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl LanguageDetector for ScriptedDetector {
        fn detect(&self, text: &str, _: &[Language]) -> Result<DetectionVote, DetectionError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(DetectionVote::scored(self.vote, 0.9))
        }
    }

    fn resolver() -> LanguageResolver {
        LanguageResolver::new(Arc::new(WhatlangDetector::new()))
    }

    fn failing_resolver() -> LanguageResolver {
        LanguageResolver::new(Arc::new(FailingDetector))
    }

    // ==================== Script Override Tests ====================

    #[test]
    fn test_arabic_script_overrides_hindi_hint() {
        let resolution = resolver().resolve(&Utterance::new("آپ کیسے ہیں").with_hint("hi"));
        assert_eq!(resolution.language, Language::Urdu);
        assert_eq!(resolution.source, ResolutionSource::ScriptOverride);
    }

    #[test]
    fn test_devanagari_overrides_urdu_hint() {
        let resolution = resolver().resolve(&Utterance::new("भगवान गणेश कौन है?").with_hint("ur"));
        assert_eq!(resolution.language, Language::Hindi);
        assert_eq!(resolution.source, ResolutionSource::ScriptOverride);
    }

    #[test]
    fn test_distinct_script_overrides_any_hint() {
        let resolution = resolver().resolve(&Utterance::new("வணக்கம்").with_hint("en"));
        assert_eq!(resolution.language, Language::Tamil);
        assert_eq!(resolution.source, ResolutionSource::ScriptOverride);
    }

    #[test]
    fn test_shared_script_trusts_member_hint() {
        // no Marathi markers, but the recognizer said Marathi and the script agrees
        let resolution = resolver().resolve(&Utterance::new("नमस्कार").with_hint("mr"));
        assert_eq!(resolution.language, Language::Marathi);
        assert_eq!(resolution.source, ResolutionSource::Hint);
    }

    #[test]
    fn test_agreeing_hint_is_reported_as_hint() {
        let resolution = resolver().resolve(&Utterance::new("నమస్కారం").with_hint("te"));
        assert_eq!(resolution.language, Language::Telugu);
        assert_eq!(resolution.source, ResolutionSource::Hint);
    }

    // ==================== Hint Tests ====================

    #[test]
    fn test_hint_used_for_latin_text() {
        let resolution = resolver().resolve(&Utterance::new("Om gam ganapataye").with_hint("hi"));
        assert_eq!(resolution.language, Language::Hindi);
        assert_eq!(resolution.source, ResolutionSource::Hint);
    }

    #[test]
    fn test_hint_by_name() {
        let resolution = resolver().resolve(&Utterance::new("Tell me a story").with_hint("kannada"));
        assert_eq!(resolution.language, Language::Kannada);
    }

    #[test]
    fn test_unsupported_hint_ignored() {
        let resolution = failing_resolver().resolve(&Utterance::new("Bonjour").with_hint("fr"));
        assert_eq!(resolution.language, Language::English);
        assert_eq!(resolution.source, ResolutionSource::Default);
    }

    #[test]
    fn test_hint_outside_custom_allowlist_ignored() {
        let resolver = failing_resolver().with_allowlist([Language::Hindi]);
        let resolution = resolver.resolve(&Utterance::new("some words").with_hint("ta"));
        assert_eq!(resolution.source, ResolutionSource::Default);
        assert_eq!(resolution.language, Language::English);
    }

    // ==================== Script Classification Tests ====================

    #[test]
    fn test_script_without_hint() {
        let resolution = resolver().resolve_text("ಹೇಗಿದ್ದೀರಾ");
        assert_eq!(resolution.language, Language::Kannada);
        assert_eq!(resolution.source, ResolutionSource::Script);
    }

    #[test]
    fn test_marathi_keywords_without_hint() {
        let resolution = resolver().resolve_text("गणपती बाप्पा, तुम्ही कसे आहात?");
        assert_eq!(resolution.language, Language::Marathi);
    }

    #[test]
    fn test_danda_terminated_text_keeps_its_script() {
        let resolution = resolver().resolve_text("আমি ভালো আছি।");
        assert_eq!(resolution.language, Language::Bengali);
        assert_eq!(resolution.source, ResolutionSource::Script);

        assert_eq!(resolver().resolve_text("ਸਤ ਸ੍ਰੀ ਅਕਾਲ ਜੀ।").language, Language::Punjabi);
    }

    #[test]
    fn test_fallback_messages_resolve_to_their_own_language() {
        for language in [
            Language::English,
            Language::Hindi,
            Language::Tamil,
            Language::Telugu,
            Language::Kannada,
            Language::Malayalam,
            Language::Bengali,
            Language::Marathi,
        ] {
            let fallback = language.profile().strings.fallback_message;
            let resolution = resolver().resolve_text(fallback);
            assert_eq!(resolution.language, language, "fallback: {}", fallback);
            assert_eq!(resolution.language.voice(), language.voice());
        }
    }

    #[test]
    fn test_script_outside_allowlist_falls_through() {
        let resolver = LanguageResolver::new(Arc::new(FailingDetector))
            .with_allowlist([Language::Hindi, Language::English]);
        let resolution = resolver.resolve_text("வணக்கம்");
        assert_eq!(resolution.language, Language::English);
        assert_eq!(resolution.source, ResolutionSource::Default);
    }

    // ==================== Statistical Tests ====================

    #[test]
    fn test_romanized_text_reaches_detector_in_native_script() {
        let detector = Arc::new(ScriptedDetector::new(Language::Hindi));
        let resolver = LanguageResolver::new(detector.clone());

        let resolution = resolver.resolve_text("aap kaise hain");
        assert_eq!(resolution.language, Language::Hindi);
        assert_eq!(resolution.source, ResolutionSource::Statistical);

        let seen = detector.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("आप"));
    }

    #[test]
    fn test_english_text_reaches_detector_unchanged() {
        let detector = Arc::new(ScriptedDetector::new(Language::English));
        let resolver = LanguageResolver::new(detector.clone());

        resolver.resolve_text("Hello, how are you?");
        assert_eq!(detector.seen.lock().unwrap()[0], "Hello, how are you?");
    }

    #[test]
    fn test_english_with_borrowed_word_stays_english() {
        let text = "Can I offer naan and sweets to Ganesha today?";

        let detector = Arc::new(ScriptedDetector::new(Language::English));
        LanguageResolver::new(detector.clone()).resolve_text(text);
        assert_eq!(detector.seen.lock().unwrap()[0], text);

        assert_eq!(resolver().resolve_text(text).language, Language::English);
    }

    #[test]
    fn test_vote_outside_allowlist_discarded() {
        let resolver = LanguageResolver::new(Arc::new(ScriptedDetector::new(Language::Tamil)))
            .with_allowlist([Language::Hindi]);
        let resolution = resolver.resolve_text("plain words here");
        assert_eq!(resolution.source, ResolutionSource::Default);
    }

    #[test]
    fn test_hello_resolves_to_english() {
        let resolution = resolver().resolve_text("Hello, how are you?");
        assert_eq!(resolution.language, Language::English);
    }

    // ==================== Fallback Tests ====================

    #[test]
    fn test_no_script_and_failing_detector_defaults() {
        let resolution = failing_resolver().resolve_text("Hello, how are you?");
        assert_eq!(resolution.language, Language::English);
        assert_eq!(resolution.source, ResolutionSource::Default);
    }

    #[test]
    fn test_empty_text_defaults() {
        let resolution = resolver().resolve_text("");
        assert_eq!(resolution.language, Language::English);
        assert_eq!(resolution.source, ResolutionSource::Default);
    }

    #[test]
    fn test_custom_allowlist_keeps_default() {
        let resolver = failing_resolver().with_allowlist([Language::Tamil]);
        assert!(resolver.allowlist().contains(&Language::English));
    }

    // ==================== Properties ====================

    proptest! {
        #[test]
        fn prop_resolution_is_always_supported(text in "\\PC{0,40}", hint in proptest::option::of("[a-z]{0,8}")) {
            let utterance = Utterance::new(text).with_optional_hint(hint);
            let resolution = resolver().resolve(&utterance);
            prop_assert!(Language::ALL.contains(&resolution.language));
        }

        #[test]
        fn prop_resolution_is_deterministic(text in "\\PC{0,40}", hint in proptest::option::of("(en|hi|ur|ta|mr|xx)")) {
            let resolver = resolver();
            let utterance = Utterance::new(text).with_optional_hint(hint);
            let first = resolver.resolve(&utterance);
            prop_assert_eq!(resolver.resolve(&utterance), first);
            prop_assert_eq!(resolver.resolve(&utterance), first);
        }

        #[test]
        fn prop_distinct_script_beats_any_hint(word in "[\u{0B85}-\u{0BB9}]{1,12}", hint in "(en|hi|ur|te|mr)") {
            let resolution = resolver().resolve(&Utterance::new(word).with_hint(hint));
            prop_assert_eq!(resolution.language, Language::Tamil);
        }
    }
}
