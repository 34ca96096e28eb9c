//! Script classification by Unicode block.
//!
//! Each non-Latin script the assistant supports occupies its own block, so a
//! single character inside a block is enough to name the script. Two scripts
//! are shared by a pair of languages (Devanagari: Hindi/Marathi, Bengali:
//! Bengali/Assamese); for those, marker words pick between the pair.

use crate::detect::DetectionVote;
use crate::i18n::Language;
use std::ops::RangeInclusive;

/// Writing systems known to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Arabic,
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
}

/// Order in which blocks are tested. Arabic comes first: recognizers
/// routinely report Hindi for Urdu speech, and an Arabic-script transcript is
/// the one signal that settles it.
pub const SCRIPT_PRIORITY: [Script; 10] = [
    Script::Arabic,
    Script::Devanagari,
    Script::Bengali,
    Script::Gurmukhi,
    Script::Gujarati,
    Script::Oriya,
    Script::Tamil,
    Script::Telugu,
    Script::Kannada,
    Script::Malayalam,
];

const ARABIC_RANGES: &[RangeInclusive<u32>] = &[0x0600..=0x06FF, 0x0750..=0x077F, 0x08A0..=0x08FF];
const DEVANAGARI_RANGES: &[RangeInclusive<u32>] = &[0x0900..=0x097F];
const BENGALI_RANGES: &[RangeInclusive<u32>] = &[0x0980..=0x09FF];
const GURMUKHI_RANGES: &[RangeInclusive<u32>] = &[0x0A00..=0x0A7F];
const GUJARATI_RANGES: &[RangeInclusive<u32>] = &[0x0A80..=0x0AFF];
const ORIYA_RANGES: &[RangeInclusive<u32>] = &[0x0B00..=0x0B7F];
const TAMIL_RANGES: &[RangeInclusive<u32>] = &[0x0B80..=0x0BFF];
const TELUGU_RANGES: &[RangeInclusive<u32>] = &[0x0C00..=0x0C7F];
const KANNADA_RANGES: &[RangeInclusive<u32>] = &[0x0C80..=0x0CFF];
const MALAYALAM_RANGES: &[RangeInclusive<u32>] = &[0x0D00..=0x0D7F];

/// Encoded in the Devanagari block but written with Bengali, Gurmukhi and
/// Oriya too, so they say nothing about the script.
const SCRIPT_NEUTRAL: [char; 2] = ['\u{0964}', '\u{0965}'];

impl Script {
    /// Code-point ranges of the script's block. Latin has none: it is what
    /// text is assumed to be when no block matches.
    pub fn ranges(self) -> &'static [RangeInclusive<u32>] {
        match self {
            Script::Latin => &[],
            Script::Arabic => ARABIC_RANGES,
            Script::Devanagari => DEVANAGARI_RANGES,
            Script::Bengali => BENGALI_RANGES,
            Script::Gurmukhi => GURMUKHI_RANGES,
            Script::Gujarati => GUJARATI_RANGES,
            Script::Oriya => ORIYA_RANGES,
            Script::Tamil => TAMIL_RANGES,
            Script::Telugu => TELUGU_RANGES,
            Script::Kannada => KANNADA_RANGES,
            Script::Malayalam => MALAYALAM_RANGES,
        }
    }

    /// Languages written in this script. The first entry is the one chosen
    /// when marker words cannot tell the languages apart.
    pub fn languages(self) -> &'static [Language] {
        match self {
            Script::Latin => &[Language::English],
            Script::Arabic => &[Language::Urdu],
            Script::Devanagari => &[Language::Hindi, Language::Marathi],
            Script::Bengali => &[Language::Bengali, Language::Assamese],
            Script::Gurmukhi => &[Language::Punjabi],
            Script::Gujarati => &[Language::Gujarati],
            Script::Oriya => &[Language::Odia],
            Script::Tamil => &[Language::Tamil],
            Script::Telugu => &[Language::Telugu],
            Script::Kannada => &[Language::Kannada],
            Script::Malayalam => &[Language::Malayalam],
        }
    }

    /// First code point of the block (Latin has none).
    pub fn block_start(self) -> Option<u32> {
        self.ranges().first().map(|r| *r.start())
    }

    /// Whether `c` identifies this script. The dandas (। ॥) never do.
    pub fn contains(self, c: char) -> bool {
        if SCRIPT_NEUTRAL.contains(&c) {
            return false;
        }
        let cp = c as u32;
        self.ranges().iter().any(|r| r.contains(&cp))
    }

    /// Whether more than one supported language uses this script.
    pub fn is_shared(self) -> bool {
        self.languages().len() > 1
    }

    pub fn primary_language(self) -> Language {
        self.languages()[0]
    }
}

/// Return the first script, in `SCRIPT_PRIORITY` order, that any character of
/// `text` belongs to. `None` means Latin or an unhandled script.
pub fn classify_script(text: &str) -> Option<Script> {
    SCRIPT_PRIORITY
        .into_iter()
        .find(|script| text.chars().any(|c| script.contains(c)))
}

/// Pick a language for text already known to be in `script`.
///
/// For shared scripts, each candidate language scores one point per marker
/// word (and per marker letter); the highest score wins and ties go to the
/// script's primary language.
pub fn disambiguate(script: Script, text: &str) -> Language {
    let candidates = script.languages();
    if candidates.len() == 1 {
        return candidates[0];
    }

    let tokens: Vec<&str> = tokenize(text).collect();
    let mut best = candidates[0];
    let mut best_hits = marker_hits(best, &tokens, text);

    for &candidate in &candidates[1..] {
        let hits = marker_hits(candidate, &tokens, text);
        if hits > best_hits {
            best = candidate;
            best_hits = hits;
        }
    }

    best
}

/// Script classification followed by marker-word disambiguation.
///
/// Script presence carries no confidence value, so the vote has none.
pub fn classify(text: &str) -> Option<DetectionVote> {
    classify_script(text).map(|script| DetectionVote::presence(disambiguate(script, text)))
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || matches!(c, '।' | '॥'))
        .filter(|t| !t.is_empty())
}

fn marker_hits(language: Language, tokens: &[&str], text: &str) -> usize {
    let words = marker_words(language);
    let word_hits = tokens.iter().filter(|t| words.contains(t)).count();
    let letter_hits = text
        .chars()
        .filter(|c| marker_letters(language).contains(c))
        .count();
    word_hits + letter_hits
}

fn marker_words(language: Language) -> &'static [&'static str] {
    match language {
        Language::Hindi => &[
            "है", "हैं", "का", "की", "को", "में", "से", "भगवान", "गणेश", "क्या", "नहीं", "मैं",
            "मुझे", "आप", "हूँ", "था",
        ],
        Language::Marathi => &[
            "आहे", "आहेत", "चा", "ची", "च्या", "गणपती", "मी", "तुम्ही", "नाही", "काय", "आणि",
            "बाप्पा", "मला",
        ],
        Language::Bengali => &[
            "আমি", "আমার", "আপনি", "কেমন", "এবং", "কী", "করুন", "হবে", "তুমি",
        ],
        Language::Assamese => &[
            "মই", "মোৰ", "আপুনি", "কেনে", "আৰু", "নাই", "তুমি", "কৰক",
        ],
        _ => &[],
    }
}

/// Letters used by only one language of a shared script.
fn marker_letters(language: Language) -> &'static [char] {
    match language {
        // ৰ and ৱ do not occur in Bengali orthography
        Language::Assamese => &['\u{09F0}', '\u{09F1}'],
        _ => &[],
    }
}
