//! Value types and pure functions of the G2P engine

pub mod numbers;
pub mod stress;
pub mod token;

pub use numbers::NumberVerbalizer;
pub use stress::{apply_stress, PRIMARY_STRESS, SECONDARY_STRESS};
pub use token::{merge_tokens, Context, Token, WordClass, WordItem};
