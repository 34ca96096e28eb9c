//! Transliteration of romanised Indic text back into native scripts.
//!
//! Speakers often type (and recognizers often emit) Hindi, Marathi and friends
//! in Latin letters: "aap kaise hain". Script classification sees only Latin
//! there, so this module converts such text into native script candidates and
//! keeps the best one for the statistical detector.
//!
//! Conversion goes through Devanagari with a small phonetic parser and is then
//! projected onto the other Brahmic blocks, which share Devanagari's layout at
//! a fixed offset. A projection fails when the target block has no letter at
//! that position (Tamil, for instance, has no aspirated or voiced stops).

use crate::detect::Script;
use thiserror::Error;
use tracing::debug;

/// Minimum non-ASCII fraction for a conversion to be trusted.
pub const CONFIDENCE_THRESHOLD: f64 = 0.20;

/// Scripts a romanised text may be converted into, in preference order.
pub const TRANSLITERATION_TARGETS: [Script; 9] = [
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

const DEVANAGARI_BLOCK: std::ops::RangeInclusive<u32> = 0x0900..=0x097F;
const DEVANAGARI_START: u32 = 0x0900;
const VIRAMA: char = '\u{094D}';

/// Romanised function words that mark text as transliterated Indic rather
/// than English. Deity names and words English has borrowed (naan, tum) are
/// absent.
const ROMANIZED_MARKERS: &[&str] = &[
    "hai", "hain", "nahi", "nahin", "kya", "kyun", "kyon", "aap", "aapka", "aapki", "mera",
    "meri", "mujhe", "tumhara", "kaise", "kaisa", "kaisi", "kahan", "namaste", "namaskar",
    "haan", "accha", "acha", "theek", "bahut", "dhanyavad", "shukriya", "vanakkam", "eppadi",
    "epdi", "nenu", "meeru", "unnaru", "hegiddira", "sukhamano", "tumi", "kemon", "aahe",
    "aahes", "majha", "tusi", "kiddan",
];

/// A lone marker must make up at least this share of the words.
const MIN_MARKER_SHARE: f64 = 1.0 / 3.0;

/// (romanisation, independent vowel, dependent sign), longest first
const VOWELS: &[(&str, char, Option<char>)] = &[
    ("aa", 'आ', Some('ा')),
    ("ai", 'ऐ', Some('ै')),
    ("au", 'औ', Some('ौ')),
    ("ee", 'ई', Some('ी')),
    ("ii", 'ई', Some('ी')),
    ("oo", 'ऊ', Some('ू')),
    ("uu", 'ऊ', Some('ू')),
    ("a", 'अ', None),
    ("i", 'इ', Some('ि')),
    ("u", 'उ', Some('ु')),
    ("e", 'ए', Some('े')),
    ("o", 'ओ', Some('ो')),
];

/// (romanisation, consonant), longest first
const CONSONANTS: &[(&str, &str)] = &[
    ("chh", "छ"),
    ("kh", "ख"),
    ("gh", "घ"),
    ("ch", "च"),
    ("jh", "झ"),
    ("th", "थ"),
    ("dh", "ध"),
    ("ph", "फ"),
    ("bh", "भ"),
    ("sh", "श"),
    ("k", "क"),
    ("g", "ग"),
    ("c", "क"),
    ("j", "ज"),
    ("t", "त"),
    ("d", "द"),
    ("n", "न"),
    ("p", "प"),
    ("f", "फ"),
    ("b", "ब"),
    ("m", "म"),
    ("y", "य"),
    ("r", "र"),
    ("l", "ल"),
    ("v", "व"),
    ("w", "व"),
    ("s", "स"),
    ("h", "ह"),
    ("q", "क"),
    ("z", "ज"),
    ("x", "क्ष"),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransliterationError {
    #[error("text is not plain Latin")]
    NotLatin,

    #[error("{0:?} is not a transliteration target")]
    UnsupportedScript(Script),

    #[error("'{ch}' has no {script:?} equivalent")]
    Unmappable { script: Script, ch: char },
}

/// Outcome of `normalize`.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<'a> {
    /// A conversion cleared the confidence threshold.
    Transliterated {
        text: String,
        script: Script,
        score: f64,
    },
    /// No confident transliteration; the input is passed through.
    Unchanged(&'a str),
}

impl Normalized<'_> {
    pub fn text(&self) -> &str {
        match self {
            Normalized::Transliterated { text, .. } => text,
            Normalized::Unchanged(text) => text,
        }
    }

    pub fn is_transliterated(&self) -> bool {
        matches!(self, Normalized::Transliterated { .. })
    }
}

/// Best-effort conversion of romanised Indic text into native script.
///
/// Text that is not plain ASCII, or that `looks_romanized` rejects, is
/// returned unchanged. Otherwise every target script is tried and the
/// conversion with the highest non-ASCII fraction wins if it exceeds
/// `CONFIDENCE_THRESHOLD`. Failed conversions are skipped.
pub fn normalize(text: &str) -> Normalized<'_> {
    if !text.is_ascii() || !looks_romanized(text) {
        return Normalized::Unchanged(text);
    }

    let mut best: Option<(String, Script, f64)> = None;

    for script in TRANSLITERATION_TARGETS {
        match transliterate(text, script) {
            Ok(converted) => {
                let score = non_ascii_fraction(&converted);
                if best.as_ref().map_or(true, |(_, _, top)| score > *top) {
                    best = Some((converted, script, score));
                }
            }
            Err(e) => debug!("Transliteration to {:?} skipped: {}", script, e),
        }
    }

    match best {
        Some((text, script, score)) if score > CONFIDENCE_THRESHOLD => {
            debug!("Transliterated input into {:?} (score {:.2})", script, score);
            Normalized::Transliterated {
                text,
                script,
                score,
            }
        }
        _ => Normalized::Unchanged(text),
    }
}

/// Convert Latin-script text into `script`.
pub fn transliterate(text: &str, script: Script) -> Result<String, TransliterationError> {
    if !text.is_ascii() {
        return Err(TransliterationError::NotLatin);
    }

    let base = match script.block_start() {
        Some(start) if TRANSLITERATION_TARGETS.contains(&script) => start,
        _ => return Err(TransliterationError::UnsupportedScript(script)),
    };

    let devanagari = to_devanagari(text);
    if script == Script::Devanagari {
        return Ok(devanagari);
    }

    devanagari
        .chars()
        .map(|c| project(c, base, script))
        .collect()
}

/// Whether the text reads as romanised Indic: two or more marker words, or a
/// single marker in a short phrase such as "namaste ji".
pub fn looks_romanized(text: &str) -> bool {
    let (words, markers) = text
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
        .fold((0usize, 0usize), |(words, markers), t| {
            let hit = ROMANIZED_MARKERS.contains(&t.to_ascii_lowercase().as_str());
            (words + 1, markers + usize::from(hit))
        });

    markers >= 2 || (markers == 1 && markers as f64 / words as f64 >= MIN_MARKER_SHARE)
}

/// Fraction of non-whitespace characters that lie outside ASCII.
pub fn non_ascii_fraction(text: &str) -> f64 {
    let (total, non_ascii) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(total, non_ascii), c| {
            (total + 1, non_ascii + usize::from(!c.is_ascii()))
        });

    if total == 0 {
        0.0
    } else {
        non_ascii as f64 / total as f64
    }
}

fn project(c: char, base: u32, script: Script) -> Result<char, TransliterationError> {
    let cp = c as u32;
    if !DEVANAGARI_BLOCK.contains(&cp) {
        return Ok(c);
    }

    let target = char::from_u32(cp - DEVANAGARI_START + base);
    match target {
        Some(t) if c == VIRAMA || t.is_alphabetic() => Ok(t),
        _ => Err(TransliterationError::Unmappable { script, ch: c }),
    }
}

fn to_devanagari(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    let mut word = String::new();

    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            word.push(c.to_ascii_lowercase());
            continue;
        }
        if !word.is_empty() {
            out.push_str(&word_to_devanagari(&word));
            word.clear();
        }
        out.push(c);
    }
    if !word.is_empty() {
        out.push_str(&word_to_devanagari(&word));
    }

    out
}

fn word_to_devanagari(word: &str) -> String {
    let mut out = String::with_capacity(word.len() * 3);
    let mut after_consonant = false;
    let mut i = 0;

    while i < word.len() {
        let rest = &word[i..];

        if let Some(&(roman, independent, sign)) = VOWELS.iter().find(|(r, _, _)| rest.starts_with(r)) {
            if after_consonant {
                // bare "a" is the consonant's inherent vowel
                if let Some(sign) = sign {
                    out.push(sign);
                }
            } else {
                out.push(independent);
            }
            after_consonant = false;
            i += roman.len();
            continue;
        }

        if let Some(&(roman, consonant)) = CONSONANTS.iter().find(|(r, _)| rest.starts_with(r)) {
            if after_consonant {
                out.push(VIRAMA);
            }
            out.push_str(consonant);
            after_consonant = true;
            i += roman.len();
            continue;
        }

        // every ASCII letter is covered above; keep anything else verbatim
        let ch_len = rest.chars().next().map_or(1, char::len_utf8);
        out.push_str(&rest[..ch_len]);
        after_consonant = false;
        i += ch_len;
    }

    out
}
