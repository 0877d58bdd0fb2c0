//! Dictionary resources
//!
//! Gold (high confidence) and silver (lower confidence) pronunciation
//! dictionaries per locale. Entries are either a bare phoneme string or a
//! map keyed by fine-grained grammatical tag with a `DEFAULT` key and a
//! reserved `"None"` key consulted only when the vowel lookahead is
//! unknown. Both dictionaries are case-expanded at load time and never
//! mutated afterwards, so one parsed copy is shared by every engine.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::Result;

/// One dictionary entry
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DictEntry {
    /// Direct phoneme string
    Phoneme(String),
    /// Tag-conditioned phonemes; a present key with a null value resolves
    /// to nothing rather than falling through
    Tagged(HashMap<String, Option<String>>),
}

/// A loaded, case-expanded dictionary
pub type Dict = HashMap<String, DictEntry>;

static US_DICTS: OnceLock<(Dict, Dict)> = OnceLock::new();
static GB_DICTS: OnceLock<(Dict, Dict)> = OnceLock::new();

/// Embedded gold and silver dictionaries for a locale, parsed and grown on
/// first access.
pub fn embedded(british: bool) -> &'static (Dict, Dict) {
    let cell = if british { &GB_DICTS } else { &US_DICTS };
    cell.get_or_init(|| {
        let (gold_src, silver_src) = if british {
            (
                include_str!("../../data/gb_gold.json"),
                include_str!("../../data/gb_silver.json"),
            )
        } else {
            (
                include_str!("../../data/us_gold.json"),
                include_str!("../../data/us_silver.json"),
            )
        };
        (load_or_empty(gold_src, "gold"), load_or_empty(silver_src, "silver"))
    })
}

/// Parse a dictionary from JSON and apply case expansion.
pub fn parse(json: &str) -> Result<Dict> {
    let raw: HashMap<String, DictEntry> = serde_json::from_str(json)?;
    Ok(grow(raw))
}

fn load_or_empty(json: &str, tier: &str) -> Dict {
    match parse(json) {
        Ok(dict) => {
            debug!(tier, entries = dict.len(), "loaded dictionary");
            dict
        }
        Err(e) => {
            // A malformed resource degrades to an empty dictionary; every
            // lookup then misses and the fallback chain proceeds.
            warn!(tier, error = %e, "dictionary failed to parse, continuing empty");
            Dict::new()
        }
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

/// Add capitalized variants of all-lowercase keys and lowercase variants
/// of capitalized keys, without overwriting existing entries. Keys shorter
/// than two characters are left alone.
fn grow(dict: Dict) -> Dict {
    let mut extra: Dict = HashMap::new();

    for (k, v) in &dict {
        if k.chars().count() < 2 {
            continue;
        }

        if *k == k.to_lowercase() {
            let cap = capitalized(k);
            if cap != *k {
                extra.insert(cap, v.clone());
            }
        } else if *k == capitalized(&k.to_lowercase()) {
            extra.insert(k.to_lowercase(), v.clone());
        }
    }

    let mut merged = extra;
    // Original entries win over generated variants
    merged.extend(dict);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_adds_capitalized_variant() {
        let dict = parse(r#"{"cat": "kˈæt"}"#).unwrap();
        assert!(dict.contains_key("cat"));
        assert!(dict.contains_key("Cat"));
    }

    #[test]
    fn grow_adds_lowercase_variant() {
        let dict = parse(r#"{"June": "ʤˈun"}"#).unwrap();
        assert!(dict.contains_key("june"));
    }

    #[test]
    fn grow_never_overwrites() {
        let dict = parse(r#"{"polish": "pˈɑlɪʃ", "Polish": "pˈOlɪʃ"}"#).unwrap();
        match &dict["Polish"] {
            DictEntry::Phoneme(p) => assert_eq!(p, "pˈOlɪʃ"),
            _ => panic!("expected direct entry"),
        }
    }

    #[test]
    fn grow_skips_single_letters() {
        let dict = parse(r#"{"A": "ˈA"}"#).unwrap();
        assert_eq!(dict.len(), 1);
        assert!(!dict.contains_key("a"));
    }

    #[test]
    fn tagged_entries_parse_with_null_values() {
        let dict = parse(r#"{"read": {"DEFAULT": "ɹˈid", "VBD": "ɹˈɛd", "VBN": null}}"#).unwrap();
        match &dict["read"] {
            DictEntry::Tagged(m) => {
                assert_eq!(m["VBD"].as_deref(), Some("ɹˈɛd"));
                assert!(m["VBN"].is_none());
            }
            _ => panic!("expected tagged entry"),
        }
    }

    #[test]
    fn embedded_dictionaries_are_nonempty() {
        let (gold, silver) = embedded(false);
        assert!(gold.len() > 100);
        assert!(!silver.is_empty());
        let (gb_gold, _) = embedded(true);
        assert!(gb_gold.contains_key("Z"));
    }
}
