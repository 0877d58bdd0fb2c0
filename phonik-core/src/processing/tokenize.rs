//! Token stream construction
//!
//! Adapts the tagger's units into tokens, aligns preprocessor features
//! onto them, and folds non-head tokens into their head.

use crate::domain::token::{merge_tokens, Token, WordClass};
use crate::language::tagger::Tagger;
use crate::processing::preprocess::{Feature, FeatureValue};
use std::ops::Range;

fn contains(outer: &Range<usize>, inner: &Range<usize>) -> bool {
    outer.start <= inner.start && outer.end >= inner.end
}

/// Build the token stream for `text` and apply override features.
///
/// Feature alignment is approximate by design: a token receives a feature
/// when either span contains the other, so an override spanning two tokens
/// applies to both.
pub fn tokenize(tagger: &dyn Tagger, text: &str, features: &[Feature]) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for unit in tagger.tag(text) {
        if unit.class == WordClass::Whitespace {
            // Defensive: contract says whitespace is attached, not emitted
            if let Some(last) = tokens.last_mut() {
                last.whitespace.push_str(&text[unit.range.clone()]);
            }
            continue;
        }
        tokens.push(Token::new(
            text[unit.range.clone()].to_string(),
            unit.range,
            Some(unit.class),
            unit.whitespace,
        ));
    }

    for feature in features {
        for token in &mut tokens {
            if contains(&token.span, &feature.range) || contains(&feature.range, &token.span) {
                match &feature.value {
                    FeatureValue::Stress(s) => token.stress = Some(*s),
                    FeatureValue::Phonemes(p) => {
                        token.is_head = true;
                        token.phonemes = Some(p.clone());
                        token.rating = Some(5);
                    }
                    FeatureValue::NumFlags(f) => token.num_flags = f.clone(),
                }
            }
        }
    }

    tokens
}

/// Fold every non-head token into the token before it.
pub fn fold_heads(tokens: Vec<Token>, unk: &str) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::new();
    for token in tokens {
        if !token.is_head && !result.is_empty() {
            let prev = result.pop().expect("checked non-empty");
            result.push(merge_tokens(&[prev, token], Some(unk)));
        } else {
            result.push(token);
        }
    }
    result
}
