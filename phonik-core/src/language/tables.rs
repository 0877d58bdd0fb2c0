//! Character-class tables
//!
//! All classes the pipeline consults, compiled once per engine and
//! immutable after construction.

use crate::domain::stress::VOWELS;
use std::collections::{HashMap, HashSet};

/// Consonant-class phoneme characters
const CONSONANTS: &str = "bdfhjklmnpstvwzðŋɡɹɾʃʒʤʧθ";
/// Diphthongs and affricates weigh double in stress balancing
const DIPHTHONGS: &str = "AIOQWYʤʧ";
/// Punctuation characters that survive into phoneme output
const PUNCTUATION: &str = ";:,.!?—…\"“”";
/// Junk separator characters inside sub-token runs
const SUBTOKEN_JUNK: &str = "',-._‘’/";
/// Vowels eligible to precede an American tapped "t"
const US_TAUS: &str = "AIOWYiuæɑəɛɪɹʊʌ";
/// Phoneme alphabet, American English
const US_VOCAB: &str = "AIOWYbdfhijklmnpstuvwzæðŋɑɔəɛɜɡɪɹɾʃʊʌʒʤʧˈˌθᵊᵻʔ";
/// Phoneme alphabet, British English
const GB_VOCAB: &str = "AIQWYabdfhijklmnpstuvwzðŋɑɒɔəɛɜɡɪɹʃʊʌʒʤʧˈˌːθᵊ";

/// Precompiled character classes and symbol maps
#[derive(Debug)]
pub struct CharTables {
    vowels: HashSet<char>,
    consonants: HashSet<char>,
    diphthongs: HashSet<char>,
    punctuation: HashSet<char>,
    non_quote_punctuation: HashSet<char>,
    junk: HashSet<char>,
    us_taus: HashSet<char>,
    vocab: HashSet<char>,
    /// Punctuation-tag surface forms with fixed phonemes
    pub punct_tag_phonemes: HashMap<&'static str, &'static str>,
    /// Standalone symbols read as words
    pub symbols: HashMap<&'static str, &'static str>,
    /// Punctuation surface forms looked up as words with reduced stress
    pub add_symbols: HashMap<&'static str, &'static str>,
    /// Currency symbol → (major unit, minor unit)
    pub currencies: HashMap<&'static str, (&'static str, &'static str)>,
    /// Recognized ordinal suffixes
    pub ordinals: [&'static str; 4],
}

impl CharTables {
    /// Build the tables for one locale.
    pub fn new(british: bool) -> Self {
        let punctuation: HashSet<char> = PUNCTUATION.chars().collect();
        let non_quote_punctuation = punctuation
            .iter()
            .copied()
            .filter(|c| !"\"“”".contains(*c))
            .collect();

        let mut punct_tag_phonemes = HashMap::new();
        punct_tag_phonemes.insert("``", "\u{201C}");
        punct_tag_phonemes.insert("\"\"", "\u{201D}");
        punct_tag_phonemes.insert("''", "\u{201D}");

        let mut symbols = HashMap::new();
        symbols.insert("%", "percent");
        symbols.insert("&", "and");
        symbols.insert("+", "plus");
        symbols.insert("@", "at");

        let mut add_symbols = HashMap::new();
        add_symbols.insert(".", "dot");
        add_symbols.insert("/", "slash");

        let mut currencies = HashMap::new();
        currencies.insert("$", ("dollar", "cent"));
        currencies.insert("£", ("pound", "pence"));
        currencies.insert("€", ("euro", "cent"));

        CharTables {
            vowels: VOWELS.chars().collect(),
            consonants: CONSONANTS.chars().collect(),
            diphthongs: DIPHTHONGS.chars().collect(),
            punctuation,
            non_quote_punctuation,
            junk: SUBTOKEN_JUNK.chars().collect(),
            us_taus: US_TAUS.chars().collect(),
            vocab: if british { GB_VOCAB } else { US_VOCAB }.chars().collect(),
            punct_tag_phonemes,
            symbols,
            add_symbols,
            currencies,
            ordinals: ["st", "nd", "rd", "th"],
        }
    }

    /// Vowel-class phoneme character.
    #[inline]
    pub fn is_vowel(&self, c: char) -> bool {
        self.vowels.contains(&c)
    }

    /// Consonant-class phoneme character.
    #[inline]
    pub fn is_consonant(&self, c: char) -> bool {
        self.consonants.contains(&c)
    }

    /// Double-weight character for stress balancing.
    #[inline]
    pub fn is_diphthong(&self, c: char) -> bool {
        self.diphthongs.contains(&c)
    }

    /// Output-surviving punctuation character.
    #[inline]
    pub fn is_punctuation(&self, c: char) -> bool {
        self.punctuation.contains(&c)
    }

    /// Punctuation excluding quote marks; resets the vowel lookahead.
    #[inline]
    pub fn is_non_quote_punctuation(&self, c: char) -> bool {
        self.non_quote_punctuation.contains(&c)
    }

    /// Junk separator inside sub-token runs.
    #[inline]
    pub fn is_junk(&self, c: char) -> bool {
        self.junk.contains(&c)
    }

    /// Vowel eligible to precede an American tapped "t".
    #[inline]
    pub fn is_us_tau(&self, c: char) -> bool {
        self.us_taus.contains(&c)
    }

    /// Character of the locale's phoneme alphabet.
    #[inline]
    pub fn in_vocab(&self, c: char) -> bool {
        self.vocab.contains(&c)
    }

    /// Character allowed in a lexicon lookup key: ASCII letters,
    /// apostrophe, hyphen.
    #[inline]
    pub fn in_lexicon_alphabet(&self, c: char) -> bool {
        c.is_ascii_alphabetic() || c == '\'' || c == '-'
    }

    /// Stress-balancing weight of a phoneme string.
    pub fn stress_weight(&self, phonemes: &str) -> usize {
        phonemes
            .chars()
            .map(|c| if self.is_diphthong(c) { 2 } else { 1 })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_marks_are_not_non_quote_punctuation() {
        let t = CharTables::new(false);
        assert!(t.is_punctuation('"'));
        assert!(!t.is_non_quote_punctuation('"'));
        assert!(t.is_non_quote_punctuation('.'));
        assert!(t.is_non_quote_punctuation('—'));
    }

    #[test]
    fn stress_weight_doubles_diphthongs() {
        let t = CharTables::new(false);
        assert_eq!(t.stress_weight("kˈæt"), 4);
        assert_eq!(t.stress_weight("ʧA"), 4);
    }

    #[test]
    fn locale_selects_vocab() {
        let us = CharTables::new(false);
        let gb = CharTables::new(true);
        assert!(us.in_vocab('ɾ'));
        assert!(!gb.in_vocab('ɾ'));
        assert!(gb.in_vocab('ː'));
    }
}
