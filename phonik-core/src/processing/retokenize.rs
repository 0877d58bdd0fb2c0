//! Regrouping raw tokens into lookup units
//!
//! Unresolved tokens split into sub-pieces along a fixed, ordered set of
//! character-class boundaries (quote runs, camelCase seams, digit runs,
//! separator runs); the pieces then pass through a small rule table
//! (currency symbols, dashes, punctuation, digit-as-"to") and group into
//! whitespace-free runs.

use crate::domain::token::{Token, WordClass, WordItem};
use crate::language::tables::CharTables;

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}')
}

/// Split one surface word into sub-pieces.
///
/// The rules apply in order at each scan position; characters no rule
/// claims are dropped.
pub fn subtokenize(word: &str) -> Vec<String> {
    let cs: Vec<char> = word.chars().collect();
    let n = cs.len();
    let at = |k: usize| cs.get(k).copied();
    let mut out: Vec<String> = Vec::new();
    let mut i = 0;

    while i < n {
        let c = cs[i];

        // Leading quote run
        if i == 0 && is_quote(c) {
            let mut j = i + 1;
            while j < n && is_quote(cs[j]) {
                j += 1;
            }
            out.push(cs[i..j].iter().collect());
            i = j;
            continue;
        }

        // Uppercase letter right before an Upper+lower seam ("ABc" → "A")
        if c.is_uppercase()
            && at(i + 1).map_or(false, char::is_uppercase)
            && at(i + 2).map_or(false, char::is_lowercase)
        {
            out.push(c.to_string());
            i += 1;
            continue;
        }

        // Digit run, single comma/period bridges allowed; a leading minus
        // only at the very start of the word
        let digit_start = c.is_ascii_digit()
            || ((c == ',' || c == '.') && at(i + 1).map_or(false, |d| d.is_ascii_digit()))
            || (i == 0
                && c == '-'
                && (at(i + 1).map_or(false, |d| d.is_ascii_digit())
                    || (at(i + 1).map_or(false, |d| d == ',' || d == '.')
                        && at(i + 2).map_or(false, |d| d.is_ascii_digit()))));
        if digit_start {
            let mut j = i;
            if cs[j] == '-' {
                j += 1;
            }
            loop {
                if j < n && cs[j].is_ascii_digit() {
                    j += 1;
                } else if j < n
                    && (cs[j] == ',' || cs[j] == '.')
                    && at(j + 1).map_or(false, |d| d.is_ascii_digit())
                {
                    j += 2;
                } else {
                    break;
                }
            }
            out.push(cs[i..j].iter().collect());
            i = j;
            continue;
        }

        // Hyphen/underscore run
        if c == '-' || c == '_' {
            let mut j = i + 1;
            while j < n && (cs[j] == '-' || cs[j] == '_') {
                j += 1;
            }
            out.push(cs[i..j].iter().collect());
            i = j;
            continue;
        }

        // Quote run of length two or more
        if is_quote(c) && at(i + 1).map_or(false, is_quote) {
            let mut j = i + 1;
            while j < n && is_quote(cs[j]) {
                j += 1;
            }
            out.push(cs[i..j].iter().collect());
            i = j;
            continue;
        }

        // Letter run with apostrophe bridges, stopping after a lowercase
        // letter that sits before an uppercase one (camelCase seam)
        if c.is_alphabetic() {
            let mut j = i;
            let mut stopped = false;
            while j < n && cs[j].is_alphabetic() {
                j += 1;
                if cs[j - 1].is_lowercase() && at(j).map_or(false, char::is_uppercase) {
                    stopped = true;
                    break;
                }
            }
            if !stopped {
                while j < n
                    && is_quote(cs[j])
                    && at(j + 1).map_or(false, |x| x.is_alphabetic())
                {
                    j += 2;
                    if cs[j - 1].is_lowercase() && at(j).map_or(false, char::is_uppercase) {
                        break;
                    }
                }
            }
            out.push(cs[i..j].iter().collect());
            i = j;
            continue;
        }

        // Any other single character, quotes excluded
        if !c.is_ascii_digit() && !is_quote(c) {
            out.push(c.to_string());
            i += 1;
            continue;
        }

        // Trailing quote run
        if is_quote(c) && cs[i..].iter().all(|x| is_quote(*x)) {
            out.push(cs[i..].iter().collect());
            break;
        }

        // Unclaimed character (a stray quote mid-word)
        i += 1;
    }

    out
}

/// Compute sub-piece byte spans by walking the original text in order.
fn piece_spans(text: &str, base: usize, pieces: &[String]) -> Vec<std::ops::Range<usize>> {
    let mut spans = Vec::with_capacity(pieces.len());
    let mut cursor = 0;
    for piece in pieces {
        let found = text[cursor..].find(piece.as_str()).map(|p| cursor + p).unwrap_or(cursor);
        spans.push(base + found..base + found + piece.len());
        cursor = found + piece.len();
    }
    spans
}

fn attach_currency_backward(words: &mut [WordItem], symbol: &str) {
    let Some(last) = words.last_mut() else { return };
    let target = match last {
        WordItem::Single(t) => t,
        WordItem::Group(g) => match g.last_mut() {
            Some(t) => t,
            None => return,
        },
    };
    if target.tag == Some(WordClass::Number)
        && target.phonemes.is_none()
        && target.alias.is_none()
        && target.currency.is_none()
        && target.whitespace.is_empty()
    {
        target.currency = Some(symbol.to_string());
    }
}

/// Regroup a folded token stream into lookup units.
pub fn retokenize(tables: &CharTables, tokens: Vec<Token>) -> Vec<WordItem> {
    let mut words: Vec<WordItem> = Vec::new();
    let mut currency: Option<String> = None;
    let outer_len = tokens.len();
    let outer_tags: Vec<Option<WordClass>> = tokens.iter().map(|t| t.tag).collect();

    for (i, token) in tokens.into_iter().enumerate() {
        let needs_split = token.alias.is_none() && token.phonemes.is_none();

        let mut pieces: Vec<Token> = if needs_split {
            let parts = subtokenize(&token.text);
            let spans = piece_spans(&token.text, token.span.start, &parts);
            parts
                .into_iter()
                .zip(spans)
                .map(|(part, span)| {
                    let mut piece = token.clone();
                    piece.text = part;
                    piece.span = span;
                    piece.whitespace = String::new();
                    piece.is_head = true;
                    piece.prespace = false;
                    piece
                })
                .collect()
        } else {
            vec![token.clone()]
        };

        if pieces.is_empty() {
            continue;
        }
        pieces
            .last_mut()
            .expect("checked non-empty")
            .whitespace = token.whitespace.clone();

        let piece_texts: Vec<String> = pieces.iter().map(|p| p.text.clone()).collect();
        let pieces_len = pieces.len();

        for (j, mut piece) in pieces.into_iter().enumerate() {
            if piece.alias.is_some() || piece.phonemes.is_some() {
                // Already pinned by an override; leave untouched
            } else if piece.tag == Some(WordClass::OtherWord)
                && tables.currencies.contains_key(piece.text.as_str())
            {
                // A symbol after the amount ("100€") reaches back to the
                // numeral it follows; a symbol before it ("€100") stays
                // pending until the numeral arrives
                attach_currency_backward(&mut words, &piece.text);
                currency = Some(piece.text.clone());
                piece.phonemes = Some(String::new());
                piece.rating = Some(4);
            } else if piece.tag == Some(WordClass::Dash)
                || (piece.tag == Some(WordClass::Punctuation) && piece.text == "–")
            {
                piece.phonemes = Some("—".to_string());
                piece.rating = Some(3);
            } else if piece.tag.map_or(false, WordClass::is_punctuation_family)
                && !piece.text.to_lowercase().chars().all(|c| c.is_ascii_lowercase())
            {
                let ps = match tables.punct_tag_phonemes.get(piece.text.as_str()) {
                    Some(v) => (*v).to_string(),
                    None => piece.text.chars().filter(|c| tables.is_punctuation(*c)).collect(),
                };
                piece.phonemes = Some(ps);
                piece.rating = Some(4);
            } else if currency.is_some() {
                if piece.tag != Some(WordClass::Number) {
                    currency = None;
                } else if j + 1 == pieces_len
                    && (i + 1 == outer_len || outer_tags[i + 1] != Some(WordClass::Number))
                {
                    piece.currency = currency.clone();
                }
            } else if j > 0 && j + 1 < pieces_len && piece.text == "2" {
                let prev = &piece_texts[j - 1];
                let next = &piece_texts[j + 1];
                let prev_last = prev.chars().last();
                let next_first = next.chars().next();
                let letters = prev_last.map_or(false, char::is_alphabetic)
                    && next_first.map_or(false, char::is_alphabetic);
                if letters || (prev == "-" && next == "-") {
                    piece.alias = Some("to".to_string());
                }
            }

            let joins_open_group = matches!(
                words.last(),
                Some(WordItem::Group(g)) if g.last().map_or(false, |t| t.whitespace.is_empty())
            );

            if piece.alias.is_some() || piece.phonemes.is_some() {
                words.push(WordItem::Single(piece));
            } else if joins_open_group {
                piece.is_head = false;
                if let Some(WordItem::Group(group)) = words.last_mut() {
                    group.push(piece);
                }
            } else if piece.whitespace.is_empty() {
                words.push(WordItem::Group(vec![piece]));
            } else {
                words.push(WordItem::Single(piece));
            }
        }
    }

    // A group of one is just a word
    words
        .into_iter()
        .map(|item| match item {
            WordItem::Group(mut g) if g.len() == 1 => {
                WordItem::Single(g.pop().expect("length checked"))
            }
            other => other,
        })
        .collect()
}
