//! The multi-pass phonemization pipeline

pub mod preprocess;
pub mod resolve;
pub mod retokenize;
pub mod tokenize;
