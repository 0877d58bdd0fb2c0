//! Inline pronunciation overrides
//!
//! Scans for Markdown-link-shaped `[surface](override)` patterns, rewrites
//! the text to just the surface form, and records what the override asked
//! for at the span the surface now occupies.

use regex::Regex;
use std::ops::Range;

/// A parsed override value
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// Numeric stress directive
    Stress(f64),
    /// Forced phoneme string; skips every lookup
    Phonemes(String),
    /// Flag characters altering numeral phrasing
    NumFlags(String),
}

/// An override plus the byte span of its surface text in the rewritten
/// input
#[derive(Debug, Clone)]
pub struct Feature {
    /// What the override asked for
    pub value: FeatureValue,
    /// Where the surface form landed in the rewritten text
    pub range: Range<usize>,
}

/// Rewrite `text`, dropping override syntax and collecting features.
///
/// Unrecognized override bodies are dropped; the surface text is kept
/// either way.
pub fn preprocess(link_regex: &Regex, text: &str) -> (String, Vec<Feature>) {
    let input = text.trim();
    let mut result = String::new();
    let mut features = Vec::new();
    let mut last_end = 0;

    for caps in link_regex.captures_iter(input) {
        let whole = caps.get(0).expect("match");
        let surface = caps.get(1).expect("surface group").as_str();
        let body = caps.get(2).expect("override group").as_str();

        result.push_str(&input[last_end..whole.start()]);
        let start = result.len();
        result.push_str(surface);
        let range = start..result.len();

        if let Some(value) = parse_override(body) {
            features.push(Feature { value, range });
        }

        last_end = whole.end();
    }
    result.push_str(&input[last_end..]);

    (result, features)
}

fn parse_override(body: &str) -> Option<FeatureValue> {
    if let Ok(i) = body.parse::<i64>() {
        return Some(FeatureValue::Stress(i as f64));
    }
    if body == "0.5" || body == "+0.5" {
        return Some(FeatureValue::Stress(0.5));
    }
    if body == "-0.5" {
        return Some(FeatureValue::Stress(-0.5));
    }
    if body.chars().count() > 1 {
        if let Some(inner) = body.strip_prefix('/').and_then(|b| b.strip_suffix('/')) {
            return Some(FeatureValue::Phonemes(inner.to_string()));
        }
        if let Some(inner) = body.strip_prefix('#').and_then(|b| b.strip_suffix('#')) {
            return Some(FeatureValue::NumFlags(inner.to_string()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> (String, Vec<Feature>) {
        let re = Regex::new(r"\[([^\]]+)\]\(([^\)]*)\)").unwrap();
        preprocess(&re, text)
    }

    #[test]
    fn forced_phonemes_are_recorded_at_the_surface_span() {
        let (text, features) = run("[Misaki](/misˈɑki/) is here");
        assert_eq!(text, "Misaki is here");
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].range, 0..6);
        assert_eq!(features[0].value, FeatureValue::Phonemes("misˈɑki".to_string()));
    }

    #[test]
    fn stress_directives_parse() {
        let (_, features) = run("[word](2) [word](-0.5) [word](+0.5)");
        let values: Vec<_> = features.iter().map(|f| f.value.clone()).collect();
        assert_eq!(
            values,
            vec![
                FeatureValue::Stress(2.0),
                FeatureValue::Stress(-0.5),
                FeatureValue::Stress(0.5)
            ]
        );
    }

    #[test]
    fn num_flags_parse() {
        let (_, features) = run("[1,000](#a&#)");
        assert_eq!(features[0].value, FeatureValue::NumFlags("a&".to_string()));
    }

    #[test]
    fn malformed_overrides_keep_surface_and_drop_body() {
        let (text, features) = run("[word](nonsense) stays");
        assert_eq!(text, "word stays");
        assert!(features.is_empty());
    }

    #[test]
    fn input_is_trimmed() {
        let (text, _) = run("  hello  ");
        assert_eq!(text, "hello");
    }
}
