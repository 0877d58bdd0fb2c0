//! End-to-end pipeline tests

use phonik_core::{Phonemizer, WordClass, PRIMARY_STRESS};

#[test]
fn inline_override_forces_phonemes() {
    let engine = Phonemizer::new().unwrap();
    let (output, tokens) =
        engine.phonemize("[Misaki](/misˈɑki/) is a G2P engine designed for models.");

    let misaki = &tokens[0];
    assert_eq!(misaki.text, "Misaki");
    assert_eq!(misaki.phonemes.as_deref(), Some("misˈɑki"));
    assert_eq!(misaki.rating, Some(5));
    assert!(output.starts_with("misˈɑki "));
}

#[test]
fn digit_two_inside_a_word_reads_as_to() {
    let engine = Phonemizer::new().unwrap();
    let (output, tokens) = engine.phonemize("a G2P engine");

    // "G" and "P" spell out around a reduced "to"
    let two = tokens.iter().find(|t| t.text == "2").expect("digit token");
    assert_eq!(two.phonemes.as_deref(), Some("tə"));
    assert!(output.contains("tə"));
}

#[test]
fn currency_scenario_end_to_end() {
    let engine = Phonemizer::new().unwrap();
    let (output, tokens) = engine.phonemize("This costs 100€ – and it is not cheap.");

    // One token per word, plus the symbol, dash, and terminal period
    let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["This", "costs", "100", "€", "–", "and", "it", "is", "not", "cheap", "."]
    );

    let amount = tokens.iter().find(|t| t.text == "100").unwrap();
    assert_eq!(amount.currency.as_deref(), Some("€"));
    assert_eq!(amount.phonemes.as_deref(), Some("wˈʌn hˈʌndɹəd jˈʊɹOz"));

    let symbol = tokens.iter().find(|t| t.text == "€").unwrap();
    assert_eq!(symbol.phonemes.as_deref(), Some(""));

    let dash = tokens.iter().find(|t| t.text == "–").unwrap();
    assert_eq!(dash.phonemes.as_deref(), Some("—"));
    assert_eq!(dash.rating, Some(3));

    let period = tokens.last().unwrap();
    assert_eq!(period.phonemes.as_deref(), Some("."));

    assert!(output.contains("jˈʊɹOz"));
    assert!(output.ends_with('.'));
}

#[test]
fn fallback_guarantees_non_null_phonemes() {
    let engine = Phonemizer::new().unwrap();
    let (_, tokens) = engine.phonemize("zyxqor");

    assert_eq!(tokens.len(), 1);
    let token = &tokens[0];
    assert!(token.phonemes.is_some());
    assert!(!token.phonemes.as_deref().unwrap().is_empty());
    assert_eq!(token.rating, Some(1));
}

#[test]
fn multi_piece_groups_carry_one_primary_stress() {
    let engine = Phonemizer::new().unwrap();
    let (_, tokens) = engine.phonemize("the cat-dog ran");

    let merged = tokens.iter().find(|t| t.text == "cat-dog").expect("merged group");
    let ps = merged.phonemes.as_deref().unwrap();
    assert!(!merged.prespace);
    assert_eq!(ps.matches(PRIMARY_STRESS).count(), 1);
}

#[test]
fn lookahead_reduces_the_and_to() {
    let engine = Phonemizer::new().unwrap();

    // "the" before a vowel-initial word
    let (output, _) = engine.phonemize("the engine");
    assert!(output.starts_with("ði "));

    // "the" before a consonant-initial word
    let (output, _) = engine.phonemize("the cat");
    assert!(output.starts_with("ðə "));
}

#[test]
fn stemmed_plurals_resolve_through_the_lexicon() {
    let engine = Phonemizer::new().unwrap();
    let (_, tokens) = engine.phonemize("cats");
    assert_eq!(tokens[0].phonemes.as_deref(), Some("kˈæts"));
    assert_eq!(tokens[0].rating, Some(4));
}

#[test]
fn years_and_ordinals_verbalize() {
    let engine = Phonemizer::new().unwrap();

    let (output, _) = engine.phonemize("1984");
    assert_eq!(output, "nIntˈin ˈAti fˈɔɹ");

    // The consumed "st" piece renders silent but keeps its prespace slot
    let (output, _) = engine.phonemize("21st");
    assert_eq!(output.trim_end(), "twˈɛnti fˈɜɹst");
}

#[test]
fn skipping_preprocess_keeps_override_syntax_visible() {
    let engine = Phonemizer::new().unwrap();
    let (_, tokens) = engine.phonemize_with("[Misaki](/misˈɑki/)", false);

    // No token gets the forced phonemes; the brackets surface as tokens
    assert!(tokens.iter().all(|t| t.rating != Some(5)));
}

#[test]
fn out_of_alphabet_singles_still_reach_the_fallback() {
    let engine = Phonemizer::builder().unk("?").build().unwrap();
    let (_, tokens) = engine.phonemize("Ω");
    assert_eq!(tokens[0].rating, Some(1));
    assert!(tokens[0].phonemes.is_some());
}

#[test]
fn british_locale_swaps_dictionaries() {
    let engine = Phonemizer::builder().british(true).build().unwrap();
    let (output, _) = engine.phonemize("the cat");
    assert!(output.starts_with("ðə "));

    let (output, _) = engine.phonemize("not");
    assert_eq!(output, "nˈɒt");
}

#[test]
fn acronyms_spell_out_in_context() {
    let engine = Phonemizer::new().unwrap();
    let (_, tokens) = engine.phonemize("the USA won");
    let usa = tokens.iter().find(|t| t.text == "USA").unwrap();
    let ps = usa.phonemes.as_deref().unwrap();
    assert_eq!(usa.rating, Some(3));
    assert!(ps.ends_with("ˈA"));
}

#[test]
fn tagger_and_fallback_are_injectable() {
    use phonik_core::{FallbackModel, Token};
    use std::sync::Arc;

    struct Fixed;
    impl FallbackModel for Fixed {
        fn transliterate(&self, _token: &Token) -> (String, i32) {
            ("ə".to_string(), 1)
        }
    }

    let engine = Phonemizer::builder().fallback(Arc::new(Fixed)).build().unwrap();
    let (output, _) = engine.phonemize("zyxqor");
    assert_eq!(output, "ə");
}

#[test]
fn stress_override_strips_markers() {
    let engine = Phonemizer::new().unwrap();
    let (output, _) = engine.phonemize("[cat](-2)");
    assert_eq!(output, "kæt");
}

#[test]
fn numeral_flags_shape_the_phrasing() {
    let engine = Phonemizer::new().unwrap();

    // "and" is elided from spelled cardinals unless the "&" flag keeps it
    let (output, _) = engine.phonemize("[150](#&#)");
    assert_eq!(output, "wˈʌn hˈʌndɹəd ənd fˈɪfti");
    let (output, _) = engine.phonemize("150");
    assert_eq!(output, "wˈʌn hˈʌndɹəd fˈɪfti");

    // "n" contracts the "and" into the previous word
    let (output, _) = engine.phonemize("[150](#n#)");
    assert_eq!(output, "wˈʌn hˈʌndɹədən fˈɪfti");

    // "a" turns a leading "one" into the indefinite article
    let (output, _) = engine.phonemize("[1000](#a#)");
    assert_eq!(output, "ə θˈWzənd");
}

#[test]
fn all_caps_words_fold_to_known_lowercase_forms() {
    let engine = Phonemizer::new().unwrap();
    let (_, tokens) = engine.phonemize("CATS");
    assert_eq!(tokens[0].phonemes.as_deref(), Some("kˈæts"));
}

#[test]
fn tokens_expose_word_classes() {
    let engine = Phonemizer::new().unwrap();
    let (_, tokens) = engine.phonemize("the cat.");
    assert_eq!(tokens[0].tag, Some(WordClass::Determiner));
    assert_eq!(tokens[2].tag, Some(WordClass::SentenceTerminator));
}
