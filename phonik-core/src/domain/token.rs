//! Token and word-item value types
//!
//! Tokens are owned values in indexed sequences; every pipeline pass
//! produces a new sequence (or mutates through an index) rather than
//! sharing aliasable token objects.

use serde::Serialize;
use std::ops::Range;

/// Coarse grammatical category assigned by the tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WordClass {
    /// Common or proper noun
    Noun,
    /// Verb, including auxiliaries
    Verb,
    /// Adjective
    Adjective,
    /// Adverb
    Adverb,
    /// Pronoun, personal or possessive
    Pronoun,
    /// Determiner
    Determiner,
    /// Preposition
    Preposition,
    /// Conjunction, coordinating or subordinating
    Conjunction,
    /// Numeric token
    Number,
    /// Particle ("to" as infinitive marker, phrasal particles)
    Particle,
    /// Interjection
    Interjection,
    /// Generic punctuation mark
    Punctuation,
    /// Sentence-final punctuation
    SentenceTerminator,
    /// Opening quotation mark
    OpenQuote,
    /// Closing quotation mark
    CloseQuote,
    /// Opening parenthesis/bracket
    OpenParen,
    /// Closing parenthesis/bracket
    CloseParen,
    /// Punctuation not covered by a subclass
    OtherPunctuation,
    /// Dash or dash run
    Dash,
    /// Whitespace unit (taggers normally attach these, never emit them)
    Whitespace,
    /// Personal name
    PersonalName,
    /// Place name
    PlaceName,
    /// Organization name
    OrganizationName,
    /// Anything else word-like (symbols, foreign material)
    OtherWord,
}

impl WordClass {
    /// Name-type categories count as proper nouns.
    pub fn is_proper_noun(self) -> bool {
        matches!(
            self,
            WordClass::PersonalName | WordClass::PlaceName | WordClass::OrganizationName
        )
    }

    /// Membership in the punctuation family of tags.
    pub fn is_punctuation_family(self) -> bool {
        matches!(
            self,
            WordClass::OpenQuote
                | WordClass::CloseQuote
                | WordClass::OpenParen
                | WordClass::CloseParen
                | WordClass::Punctuation
                | WordClass::SentenceTerminator
                | WordClass::OtherPunctuation
        )
    }
}

/// One surface token with its annotations
///
/// `phonemes == None` means unresolved; `Some("")` means resolved to
/// silence. `rating` is an integer confidence where lower is less certain
/// and `None` is worse than any integer.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Coarse category from the tagger
    pub tag: Option<WordClass>,
    /// Trailing whitespace, possibly empty
    pub whitespace: String,
    /// Resolved phoneme string, if any
    pub phonemes: Option<String>,
    /// Byte span into the normalized input text
    pub span: Range<usize>,
    /// A head token starts a new lookup unit; non-heads fold into the
    /// previous token
    pub is_head: bool,
    /// Override surface form used only for lookup
    pub alias: Option<String>,
    /// Numeric stress directive
    pub stress: Option<f64>,
    /// Currency symbol attached to a numeral
    pub currency: Option<String>,
    /// Flag characters altering numeral phrasing ("a", "&", "n")
    pub num_flags: String,
    /// Whether a space must be re-inserted before this token's phoneme
    /// when merging
    pub prespace: bool,
    /// Confidence rating for the resolved phoneme
    pub rating: Option<i32>,
}

impl Token {
    /// Create an unresolved head token.
    pub fn new(text: String, span: Range<usize>, tag: Option<WordClass>, whitespace: String) -> Self {
        Token {
            text,
            tag,
            whitespace,
            phonemes: None,
            span,
            is_head: true,
            alias: None,
            stress: None,
            currency: None,
            num_flags: String::new(),
            prespace: false,
            rating: None,
        }
    }
}

/// One lookup unit: a token resolvable alone, or an ordered run of
/// sub-pieces of a single orthographic word
///
/// Invariant: only a group's last element may carry non-empty trailing
/// whitespace.
#[derive(Debug, Clone)]
pub enum WordItem {
    /// Already resolvable alone
    Single(Token),
    /// Ordered, whitespace-free run of sub-pieces
    Group(Vec<Token>),
}

/// Lookahead state threaded right-to-left through the word sequence
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Context {
    /// Whether the next resolved word (to the right) starts with a vowel;
    /// `None` when unknown
    pub future_vowel: Option<bool>,
    /// Whether the next word is "to"
    pub future_to: bool,
}

/// Sum of per-character casing scores: uppercase counts double.
fn casing_score(text: &str) -> usize {
    text.chars().map(|c| if c.is_uppercase() { 2 } else { 1 }).sum()
}

/// Merge a run of tokens into one.
///
/// Text and whitespace concatenate; the tag comes from the piece with the
/// highest casing score; stress survives only when unanimous; currency is
/// the greatest non-null value; rating is the minimum unless any piece has
/// none. When `unk` is given, phonemes join with a space wherever a piece
/// asks for one, and unresolved pieces contribute the unknown marker.
pub fn merge_tokens(tokens: &[Token], unk: Option<&str>) -> Token {
    debug_assert!(!tokens.is_empty());

    let phonemes = unk.map(|unk| {
        let mut out = String::new();
        for tk in tokens {
            if tk.prespace
                && !out.is_empty()
                && !out.ends_with(char::is_whitespace)
                && tk.phonemes.is_some()
            {
                out.push(' ');
            }
            out.push_str(tk.phonemes.as_deref().unwrap_or(unk));
        }
        out
    });

    let mut text = String::new();
    for tk in &tokens[..tokens.len() - 1] {
        text.push_str(&tk.text);
        text.push_str(&tk.whitespace);
    }
    text.push_str(&tokens[tokens.len() - 1].text);

    let tag_source = tokens
        .iter()
        .max_by_key(|t| casing_score(&t.text))
        .expect("non-empty token run");

    let stresses: Vec<f64> = tokens.iter().filter_map(|t| t.stress).collect();
    let stress = match stresses.split_first() {
        Some((first, rest)) if rest.iter().all(|s| s == first) => Some(*first),
        _ => None,
    };

    let currency = tokens.iter().filter_map(|t| t.currency.clone()).max();

    let rating = if tokens.iter().any(|t| t.rating.is_none()) {
        None
    } else {
        tokens.iter().filter_map(|t| t.rating).min()
    };

    let mut flags: Vec<char> = tokens.iter().flat_map(|t| t.num_flags.chars()).collect();
    flags.sort_unstable();
    flags.dedup();

    Token {
        text,
        tag: tag_source.tag,
        whitespace: tokens.last().map(|t| t.whitespace.clone()).unwrap_or_default(),
        phonemes,
        span: tokens[0].span.start..tokens[tokens.len() - 1].span.end,
        is_head: tokens[0].is_head,
        alias: None,
        stress,
        currency,
        num_flags: flags.into_iter().collect(),
        prespace: tokens[0].prespace,
        rating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tk(text: &str, ws: &str) -> Token {
        Token::new(text.to_string(), 0..text.len(), Some(WordClass::Noun), ws.to_string())
    }

    #[test]
    fn merge_concatenates_text_and_keeps_last_whitespace() {
        let a = tk("foo", " ");
        let b = tk("bar", "  ");
        let merged = merge_tokens(&[a, b], None);
        assert_eq!(merged.text, "foo bar");
        assert_eq!(merged.whitespace, "  ");
    }

    #[test]
    fn merge_rating_is_none_when_any_piece_lacks_one() {
        let mut a = tk("a", "");
        let b = tk("b", "");
        a.rating = Some(4);
        assert_eq!(merge_tokens(&[a.clone(), b], None).rating, None);

        let mut c = tk("c", "");
        c.rating = Some(2);
        assert_eq!(merge_tokens(&[a, c], None).rating, Some(2));
    }

    #[test]
    fn merge_stress_survives_only_when_unanimous() {
        let mut a = tk("a", "");
        let mut b = tk("b", "");
        a.stress = Some(0.5);
        b.stress = Some(0.5);
        assert_eq!(merge_tokens(&[a.clone(), b.clone()], None).stress, Some(0.5));
        b.stress = Some(1.0);
        assert_eq!(merge_tokens(&[a, b], None).stress, None);
    }

    #[test]
    fn merge_inserts_space_for_prespace_pieces() {
        let mut a = tk("a", "");
        let mut b = tk("b", "");
        a.phonemes = Some("ˈA".into());
        b.phonemes = Some("bˈi".into());
        b.prespace = true;
        let merged = merge_tokens(&[a, b], Some("?"));
        assert_eq!(merged.phonemes.as_deref(), Some("ˈA bˈi"));
    }

    #[test]
    fn merge_tag_prefers_highest_casing_score() {
        let mut a = tk("abc", "");
        a.tag = Some(WordClass::Verb);
        let mut b = tk("AB", "");
        b.tag = Some(WordClass::Noun);
        // "AB" scores 4, "abc" scores 3
        assert_eq!(merge_tokens(&[a, b], None).tag, Some(WordClass::Noun));
    }
}
