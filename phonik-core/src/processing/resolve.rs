//! Right-to-left resolution
//!
//! Walks the word sequence backward threading the lookahead context,
//! resolves singles through the lexicon-then-fallback chain, runs the
//! greedy right-anchored span search over groups, rebalances stress so a
//! merged word carries at most one primary marker, and flattens the result
//! back into tokens.

use tracing::trace;

use crate::domain::stress::{apply_stress, PRIMARY_STRESS};
use crate::domain::token::{merge_tokens, Context, Token, WordItem};
use crate::language::fallback::FallbackModel;
use crate::language::lexicon::Lexicon;
use crate::language::tables::CharTables;

/// Fold one resolved word into the lookahead context.
///
/// The first phoneme character decides: non-quote punctuation resets the
/// vowel lookahead, a vowel or consonant pins it, anything else leaves it
/// alone.
pub fn advance_context(
    tables: &CharTables,
    ctx: Context,
    phonemes: Option<&str>,
    token: &Token,
) -> Context {
    let mut vowel = ctx.future_vowel;

    if let Some(ps) = phonemes {
        for c in ps.chars() {
            if tables.is_non_quote_punctuation(c) {
                vowel = None;
                break;
            }
            if tables.is_vowel(c) {
                vowel = Some(true);
                break;
            }
            if tables.is_consonant(c) {
                vowel = Some(false);
                break;
            }
        }
    }

    let future_to = token.text == "to"
        || token.text == "To"
        || (token.text == "TO"
            && matches!(
                token.tag,
                Some(crate::domain::token::WordClass::Particle)
                    | Some(crate::domain::token::WordClass::Preposition)
            ));

    Context { future_vowel: vowel, future_to }
}

/// Resolve every word item in place, right to left.
pub fn resolve(
    words: &mut [WordItem],
    lexicon: &Lexicon,
    fallback: &dyn FallbackModel,
    tables: &CharTables,
) {
    let mut ctx = Context::default();

    for item in words.iter_mut().rev() {
        match item {
            WordItem::Single(token) => {
                if token.phonemes.is_none() {
                    let (ps, rating) = lexicon.transcribe(token, ctx);
                    token.phonemes = ps;
                    token.rating = rating;

                    if token.phonemes.is_none() {
                        trace!(word = %token.text, "lexicon miss, using fallback");
                        let (ps, rating) = fallback.transliterate(token);
                        token.phonemes = Some(ps);
                        token.rating = Some(rating);
                    }
                }
                ctx = advance_context(tables, ctx, token.phonemes.as_deref(), token);
            }
            WordItem::Group(pieces) => {
                ctx = resolve_group(pieces, ctx, lexicon, fallback, tables);
            }
        }
    }
}

/// Greedy right-anchored span search over one group.
fn resolve_group(
    pieces: &mut Vec<Token>,
    mut ctx: Context,
    lexicon: &Lexicon,
    fallback: &dyn FallbackModel,
    tables: &CharTables,
) -> Context {
    let mut left = 0;
    let mut right = pieces.len();
    let mut needs_fallback = false;

    while left < right {
        // A span holding an already-pinned piece cannot be merged
        let has_fixed = pieces[left..right]
            .iter()
            .any(|t| t.alias.is_some() || t.phonemes.is_some());

        let probe = if has_fixed {
            None
        } else {
            Some(merge_tokens(&pieces[left..right], None))
        };
        let resolved = probe.as_ref().and_then(|p| {
            let (ps, rating) = lexicon.transcribe(p, ctx);
            ps.map(|ps| (ps, rating))
        });

        if let Some((ps, rating)) = resolved {
            pieces[left].phonemes = Some(ps.clone());
            pieces[left].rating = rating;
            for piece in &mut pieces[left + 1..right] {
                piece.phonemes = Some(String::new());
                piece.rating = rating;
            }
            ctx = advance_context(tables, ctx, Some(&ps), probe.as_ref().expect("probed"));
            // Restart over the earlier remainder
            right = left;
            left = 0;
        } else if left + 1 < right {
            left += 1;
        } else {
            right -= 1;
            if pieces[right].phonemes.is_none() {
                if pieces[right].text.chars().all(|c| tables.is_junk(c)) {
                    pieces[right].phonemes = Some(String::new());
                    pieces[right].rating = Some(3);
                } else {
                    needs_fallback = true;
                    break;
                }
            }
            left = 0;
        }
    }

    if needs_fallback {
        let merged = merge_tokens(pieces, None);
        trace!(word = %merged.text, "group unresolvable, using fallback");
        let (ps, rating) = fallback.transliterate(&merged);
        pieces[0].phonemes = Some(ps);
        pieces[0].rating = Some(rating);
        for piece in &mut pieces[1..] {
            piece.phonemes = Some(String::new());
            piece.rating = Some(rating);
        }
    } else {
        rebalance_stress(tables, pieces);
    }

    ctx
}

/// Enforce "one primary stress per resolved word" over a group's pieces.
pub fn rebalance_stress(tables: &CharTables, pieces: &mut [Token]) {
    let mut text = String::new();
    for piece in pieces.iter().take(pieces.len().saturating_sub(1)) {
        text.push_str(&piece.text);
        text.push_str(&piece.whitespace);
    }
    if let Some(last) = pieces.last() {
        text.push_str(&last.text);
    }

    let mut classes = std::collections::HashSet::new();
    for c in text.chars() {
        if tables.is_junk(c) {
            continue;
        }
        classes.insert(if c.is_alphabetic() {
            0u8
        } else if c.is_numeric() {
            1
        } else {
            2
        });
    }
    let prespace = text.contains(' ') || text.contains('/') || classes.len() > 1;

    let n = pieces.len();
    for i in 0..n {
        if pieces[i].phonemes.is_none() {
            let last_char = pieces[i].text.chars().last();
            if i == n - 1 && last_char.map_or(false, |c| tables.is_non_quote_punctuation(c)) {
                pieces[i].phonemes = Some(pieces[i].text.clone());
                pieces[i].rating = Some(3);
            } else if pieces[i].text.chars().all(|c| tables.is_junk(c)) {
                pieces[i].phonemes = None;
                pieces[i].rating = Some(3);
            }
        } else if i > 0 {
            pieces[i].prespace = prespace;
        }
    }

    if prespace {
        // Pieces render as separate space-joined units; each keeps its own
        // stress
        return;
    }

    let mut stressed: Vec<(bool, usize, usize)> = Vec::new();
    for (i, piece) in pieces.iter().enumerate() {
        if let Some(ps) = &piece.phonemes {
            if !ps.is_empty() {
                stressed.push((ps.contains(PRIMARY_STRESS), tables.stress_weight(ps), i));
            }
        }
    }

    if stressed.len() == 2 && pieces[stressed[0].2].text.chars().count() == 1 {
        let i = stressed[1].2;
        demote(&mut pieces[i]);
        return;
    }

    let primaries = stressed.iter().filter(|x| x.0).count();
    if stressed.len() < 2 || primaries <= (stressed.len() + 1) / 2 {
        return;
    }

    stressed.sort_by_key(|x| (x.0, x.1));
    let cut = stressed.len() / 2;
    for x in &stressed[..cut] {
        demote(&mut pieces[x.2]);
    }
}

fn demote(piece: &mut Token) {
    if let Some(ps) = &piece.phonemes {
        piece.phonemes = Some(apply_stress(ps, Some(-0.5)));
    }
}

/// Flatten resolved word items into final tokens and the output string.
pub fn finalize(words: Vec<WordItem>, unk: &str) -> (String, Vec<Token>) {
    let mut tokens: Vec<Token> = words
        .into_iter()
        .map(|item| match item {
            WordItem::Single(t) => t,
            WordItem::Group(g) => merge_tokens(&g, Some(unk)),
        })
        .collect();

    // Allophone normalization for the downstream synthesizer's grapheme set
    for token in &mut tokens {
        if let Some(ps) = &token.phonemes {
            if !ps.is_empty() {
                token.phonemes = Some(ps.replace('ɾ', "T").replace('ʔ', "t"));
            }
        }
    }

    let mut result = String::new();
    for token in &tokens {
        result.push_str(token.phonemes.as_deref().unwrap_or(unk));
        result.push_str(&token.whitespace);
    }

    (result, tokens)
}
