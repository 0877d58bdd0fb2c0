//! Locale-dependent resources and collaborator seams

pub mod dictionary;
pub mod fallback;
pub mod lexicon;
pub mod tables;
pub mod tagger;

pub use dictionary::{Dict, DictEntry};
pub use fallback::{FallbackModel, LetterRuleFallback};
pub use lexicon::Lexicon;
pub use tables::CharTables;
pub use tagger::{HeuristicTagger, TaggedWord, Tagger};
