//! Part-of-speech tagging seam
//!
//! The engine only needs word spans with a coarse grammatical category and
//! trailing whitespace; any tagger satisfying that contract is
//! interchangeable. A heuristic implementation ships with the crate so the
//! engine works standalone; a platform tagger can be injected through the
//! same trait.

use crate::domain::token::WordClass;
use std::ops::Range;

/// One tagger-yielded unit: a word span, its coarse category, and the
/// whitespace that follows it
#[derive(Debug, Clone)]
pub struct TaggedWord {
    /// Byte span into the tagged text
    pub range: Range<usize>,
    /// Coarse grammatical category
    pub class: WordClass,
    /// Trailing whitespace, possibly empty
    pub whitespace: String,
}

/// Part-of-speech tagger contract
///
/// Implementations must cover the whole input with word spans; whitespace
/// is attached to the preceding word, not emitted as a unit.
pub trait Tagger: Send + Sync {
    /// Segment and tag `text`.
    fn tag(&self, text: &str) -> Vec<TaggedWord>;
}

const WH_DETERMINERS: [&str; 3] = ["which", "whatever", "whichever"];
const WH_PRONOUNS: [&str; 9] = [
    "who", "whom", "whose", "whoever", "whomever", "what", "whatever", "which", "whichever",
];
const WH_ADVERBS: [&str; 4] = ["when", "where", "why", "how"];
const POSSESSIVE_PRONOUNS: [&str; 7] = ["my", "your", "his", "her", "its", "our", "their"];
const AUX_BE: [&str; 8] = ["am", "is", "are", "was", "were", "be", "been", "being"];
const AUX_DO: [&str; 3] = ["do", "does", "did"];
const AUX_HAVE: [&str; 3] = ["have", "has", "had"];
const SUBORDINATING: [&str; 15] = [
    "because", "although", "though", "if", "while", "when", "whenever", "before", "after",
    "since", "unless", "until", "that", "whether", "as",
];

/// Map a coarse category to a Penn Treebank tag string, with surface-form
/// heuristics where the category alone is ambiguous.
pub fn penn_tag(class: WordClass, token: Option<&str>) -> &'static str {
    let t = token.unwrap_or("").trim();
    let lower = t.to_lowercase();
    let lower = lower.as_str();

    if matches!(
        class,
        WordClass::Punctuation | WordClass::SentenceTerminator | WordClass::OtherPunctuation
    ) {
        match t {
            "," => return ",",
            "." | "!" | "?" => return ".",
            ":" | ";" => return ":",
            "``" | "\u{201C}" | "\u{201E}" | "\"" => return "``",
            "''" | "\u{201D}" => return "''",
            "(" | "[" | "{" => return "(",
            ")" | "]" | "}" => return ")",
            "$" => return "$",
            "#" => return "#",
            "-" | "–" | "—" => return ":",
            _ => {}
        }
    }

    match class {
        WordClass::OpenQuote => "``",
        WordClass::CloseQuote => "''",
        WordClass::OpenParen => "(",
        WordClass::CloseParen => ")",
        WordClass::Noun => {
            let capitalized = t.chars().next().map_or(false, char::is_uppercase);
            let plural = looks_plural(lower);
            if !t.is_empty() {
                if capitalized && !plural {
                    return "NNP";
                }
                if capitalized && plural {
                    return "NNPS";
                }
                if plural {
                    return "NNS";
                }
            }
            "NN"
        }
        WordClass::Verb => {
            if AUX_BE.contains(&lower) {
                return if lower == "being" {
                    "VBG"
                } else if lower == "been" {
                    "VBN"
                } else {
                    "VB"
                };
            }
            if AUX_DO.contains(&lower) {
                return if lower == "does" {
                    "VBZ"
                } else if lower == "did" {
                    "VBD"
                } else {
                    "VB"
                };
            }
            if AUX_HAVE.contains(&lower) {
                return if lower == "has" {
                    "VBZ"
                } else if lower == "had" {
                    "VBD"
                } else {
                    "VB"
                };
            }
            if lower.ends_with("ing") {
                return "VBG";
            }
            if lower.ends_with("ed") {
                return "VBD";
            }
            if lower.ends_with("en") {
                return "VBN";
            }
            if lower.ends_with('s') {
                return "VBZ";
            }
            "VB"
        }
        WordClass::Adjective => {
            if lower.ends_with("er") {
                "JJR"
            } else if lower.ends_with("est") {
                "JJS"
            } else {
                "JJ"
            }
        }
        WordClass::Adverb => {
            if WH_ADVERBS.contains(&lower) {
                "WRB"
            } else if lower.ends_with("er") {
                "RBR"
            } else if lower.ends_with("est") {
                "RBS"
            } else {
                "RB"
            }
        }
        WordClass::Pronoun => {
            if lower == "'s" || lower == "\u{2019}s" {
                return "POS";
            }
            if WH_PRONOUNS.contains(&lower) {
                if lower == "whose" {
                    return "WP$";
                }
                return "WP";
            }
            if POSSESSIVE_PRONOUNS.contains(&lower) {
                return "PRP$";
            }
            "PRP"
        }
        WordClass::Determiner => {
            if WH_DETERMINERS.contains(&lower) {
                "WDT"
            } else {
                "DT"
            }
        }
        WordClass::Preposition => {
            if lower == "to" {
                "TO"
            } else {
                "IN"
            }
        }
        WordClass::Conjunction => {
            if SUBORDINATING.contains(&lower) {
                "IN"
            } else {
                "CC"
            }
        }
        WordClass::Number => "CD",
        WordClass::Interjection => "UH",
        WordClass::Particle => {
            if lower == "to" {
                "TO"
            } else {
                "RP"
            }
        }
        WordClass::OtherWord => "FW",
        WordClass::Punctuation | WordClass::SentenceTerminator | WordClass::OtherPunctuation => ".",
        WordClass::Whitespace => "XX",
        WordClass::PersonalName | WordClass::OrganizationName | WordClass::PlaceName => "NNP",
        WordClass::Dash => "FW",
    }
}

/// Collapse a fine tag into a coarse parent category used by
/// tag-conditioned dictionary entries.
pub fn parent_tag(class: Option<WordClass>, token: Option<&str>) -> &'static str {
    let Some(class) = class else { return "XX" };
    let penn = penn_tag(class, token);
    if penn.starts_with("VB") {
        "VERB"
    } else if penn.starts_with("NN") {
        "NOUN"
    } else if penn.starts_with("ADV") || penn.starts_with("RB") {
        "ADV"
    } else if penn.starts_with("ADJ") || penn.starts_with("JJ") {
        "ADJ"
    } else {
        "XX"
    }
}

fn looks_plural(lower: &str) -> bool {
    if lower.chars().count() <= 2 {
        return false;
    }
    if lower.ends_with("ss") || lower.ends_with("'s") || lower.ends_with("\u{2019}s") {
        return false;
    }
    lower.ends_with('s')
}

// ---- Built-in heuristic tagger ----

const DETERMINERS: [&str; 13] = [
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "which",
];
const PRONOUNS: [&str; 24] = [
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their", "who", "whom", "whose", "what", "mine", "yours",
];
const PREPOSITIONS: [&str; 22] = [
    "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "over", "under", "about",
    "after", "before", "between", "through", "during", "against", "versus", "vs", "vs.",
];
const CONJUNCTIONS: [&str; 13] = [
    "and", "or", "but", "nor", "yet", "so", "because", "although", "though", "while", "unless",
    "until", "whether",
];
const AUX_VERBS: [&str; 20] = [
    "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "have", "has",
    "had", "can", "could", "will", "would", "shall", "should",
];
const ADVERBS: [&str; 16] = [
    "not", "very", "really", "too", "also", "now", "then", "here", "there", "when", "where",
    "why", "how", "never", "always", "often",
];
const INTERJECTIONS: [&str; 4] = ["oh", "hey", "wow", "ouch"];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '-' | '_')
}

/// Wordlist-and-suffix tagger
///
/// Splits on whitespace and standalone punctuation, keeping hyphenated and
/// digit-bridged runs together, then classifies each unit with small
/// wordlists and suffix heuristics.
#[derive(Debug, Default)]
pub struct HeuristicTagger;

impl HeuristicTagger {
    /// Create a tagger.
    pub fn new() -> Self {
        HeuristicTagger
    }

    fn classify(unit: &str) -> WordClass {
        let first = unit.chars().next().expect("non-empty unit");

        if unit.chars().all(|c| matches!(c, '-' | '–' | '—' | '_')) {
            return WordClass::Dash;
        }

        // Digits with optional separators, optionally signed
        let body: &str = unit.strip_prefix('-').unwrap_or(unit);
        if !body.is_empty()
            && body.chars().any(|c| c.is_ascii_digit())
            && body.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
        {
            return WordClass::Number;
        }

        if !unit.chars().any(char::is_alphanumeric) {
            return match first {
                '.' | '!' | '?' | '…' => WordClass::SentenceTerminator,
                ',' | ';' | ':' => WordClass::Punctuation,
                '\u{201C}' => WordClass::OpenQuote,
                '\u{201D}' => WordClass::CloseQuote,
                '(' | '[' | '{' => WordClass::OpenParen,
                ')' | ']' | '}' => WordClass::CloseParen,
                '$' | '£' | '€' | '%' | '&' | '+' | '@' | '#' | '=' | '*' => WordClass::OtherWord,
                _ => WordClass::OtherPunctuation,
            };
        }

        let lower = unit.to_lowercase();
        let lower = lower.as_str();
        if DETERMINERS.contains(&lower) {
            return WordClass::Determiner;
        }
        if PRONOUNS.contains(&lower) {
            return WordClass::Pronoun;
        }
        if PREPOSITIONS.contains(&lower) {
            return WordClass::Preposition;
        }
        if CONJUNCTIONS.contains(&lower) {
            return WordClass::Conjunction;
        }
        if AUX_VERBS.contains(&lower) {
            return WordClass::Verb;
        }
        if ADVERBS.contains(&lower) {
            return WordClass::Adverb;
        }
        if INTERJECTIONS.contains(&lower) {
            return WordClass::Interjection;
        }
        let len = lower.chars().count();
        if lower.ends_with("ly") && len > 3 {
            return WordClass::Adverb;
        }
        if lower.ends_with("ing") && len >= 6 {
            return WordClass::Verb;
        }
        if lower.ends_with("ed") && len >= 5 {
            return WordClass::Verb;
        }
        WordClass::Noun
    }
}

impl Tagger for HeuristicTagger {
    fn tag(&self, text: &str) -> Vec<TaggedWord> {
        let cs: Vec<(usize, char)> = text.char_indices().collect();
        let n = cs.len();
        let mut units: Vec<TaggedWord> = Vec::new();
        let mut i = 0;

        while i < n {
            let (start, c) = cs[i];

            if c.is_whitespace() {
                let mut j = i;
                while j < n && cs[j].1.is_whitespace() {
                    j += 1;
                }
                let end = if j < n { cs[j].0 } else { text.len() };
                if let Some(last) = units.last_mut() {
                    last.whitespace.push_str(&text[start..end]);
                }
                i = j;
                continue;
            }

            let end;
            if is_word_char(c) {
                // A word unit: letters, digits, apostrophes, hyphens, and
                // periods/commas bridging alphanumerics ("3.14", "U.S.A",
                // "2-for-1")
                let mut j = i + 1;
                while j < n {
                    let ch = cs[j].1;
                    if is_word_char(ch) {
                        j += 1;
                    } else if (ch == '.' || ch == ',')
                        && cs[j - 1].1.is_alphanumeric()
                        && cs.get(j + 1).map_or(false, |(_, x)| x.is_alphanumeric())
                    {
                        j += 2;
                    } else {
                        break;
                    }
                }
                end = if j < n { cs[j].0 } else { text.len() };
                i = j;
            } else {
                // Punctuation: runs of the same character stay together
                // ("...", "--")
                let mut j = i + 1;
                while j < n && cs[j].1 == c {
                    j += 1;
                }
                end = if j < n { cs[j].0 } else { text.len() };
                i = j;
            }

            let unit = &text[start..end];
            units.push(TaggedWord {
                range: start..end,
                class: Self::classify(unit),
                whitespace: String::new(),
            });
        }

        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<(String, WordClass)> {
        HeuristicTagger::new()
            .tag(text)
            .into_iter()
            .map(|u| (text[u.range].to_string(), u.class))
            .collect()
    }

    #[test]
    fn splits_words_and_attaches_whitespace() {
        let tagger = HeuristicTagger::new();
        let units = tagger.tag("the cat sat.");
        assert_eq!(units.len(), 4);
        assert_eq!(units[0].whitespace, " ");
        assert_eq!(units[2].whitespace, "");
        assert_eq!(units[3].class, WordClass::SentenceTerminator);
    }

    #[test]
    fn digit_bridges_stay_together() {
        let units = texts("it costs 3.14 now");
        assert!(units.iter().any(|(t, c)| t == "3.14" && *c == WordClass::Number));
    }

    #[test]
    fn currency_symbols_are_other_words() {
        let units = texts("100€ here");
        assert_eq!(units[0], ("100".to_string(), WordClass::Number));
        assert_eq!(units[1], ("€".to_string(), WordClass::OtherWord));
    }

    #[test]
    fn dashes_classify_as_dash() {
        let units = texts("a – b");
        assert!(units.iter().any(|(t, c)| t == "–" && *c == WordClass::Dash));
    }

    #[test]
    fn hyphenated_run_is_one_unit() {
        let units = texts("a 2-for-1 deal");
        assert!(units.iter().any(|(t, c)| t == "2-for-1" && *c == WordClass::Noun));
    }

    #[test]
    fn penn_tags_refine_classes() {
        assert_eq!(penn_tag(WordClass::Preposition, Some("to")), "TO");
        assert_eq!(penn_tag(WordClass::Noun, Some("Cats")), "NNPS");
        assert_eq!(penn_tag(WordClass::Verb, Some("walked")), "VBD");
        assert_eq!(penn_tag(WordClass::Pronoun, Some("I")), "PRP");
        assert_eq!(parent_tag(Some(WordClass::Verb), Some("walked")), "VERB");
        assert_eq!(parent_tag(None, None), "XX");
    }
}
