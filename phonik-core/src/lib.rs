//! English grapheme-to-phoneme conversion for speech synthesis frontends
//!
//! The engine turns written text into an IPA-like phoneme sequence through
//! a multi-pass pipeline: inline override preprocessing, tagging and token
//! folding, regrouping into lookup units, a layered
//! dictionary/morphology/numeral lookup chain, a greedy span search for
//! compound surface words, and a stress-rebalancing pass that keeps one
//! primary stress per resolved word. The lookahead context threads
//! right-to-left so function words ("the", "to", "a") pick their reduced
//! or full forms from what follows them.
//!
//! # Example
//!
//! ```rust
//! use phonik_core::Phonemizer;
//!
//! let engine = Phonemizer::new().unwrap();
//! let (phonemes, tokens) = engine.phonemize("[Misaki](/misˈɑki/) is a cat.");
//! assert!(phonemes.starts_with("misˈɑki"));
//! assert_eq!(tokens.first().unwrap().rating, Some(5));
//! ```
//!
//! Dictionaries and compiled tables are built once at construction and are
//! read-only afterwards; a single engine can be shared across threads.

#![warn(missing_docs)]

pub mod api;
pub mod domain;
pub mod error;
pub mod language;

mod processing;

pub use api::{phonemize, Phonemizer, PhonemizerBuilder, DEFAULT_UNK};
pub use domain::numbers::NumberVerbalizer;
pub use domain::stress::{apply_stress, PRIMARY_STRESS, SECONDARY_STRESS};
pub use domain::token::{Context, Token, WordClass, WordItem};
pub use error::{CoreError, Result};
pub use language::fallback::{FallbackModel, LetterRuleFallback};
pub use language::tagger::{HeuristicTagger, TaggedWord, Tagger};
