//! Public engine surface
//!
//! `Phonemizer` owns the dictionaries, precompiled tables and patterns,
//! and the tagger/fallback collaborators. All of that state is immutable
//! after construction, so one engine can serve concurrent callers; each
//! `phonemize` call works on its own token buffers.

use regex::Regex;
use std::sync::Arc;

use crate::domain::token::Token;
use crate::error::Result;
use crate::language::dictionary::{self, Dict};
use crate::language::fallback::{FallbackModel, LetterRuleFallback};
use crate::language::lexicon::Lexicon;
use crate::language::tables::CharTables;
use crate::language::tagger::{HeuristicTagger, Tagger};
use crate::processing::{preprocess, resolve, retokenize, tokenize};

/// Default marker emitted for tokens nothing could resolve
pub const DEFAULT_UNK: &str = "\u{2753}";

/// English grapheme-to-phoneme engine
pub struct Phonemizer {
    unk: String,
    tables: Arc<CharTables>,
    lexicon: Lexicon,
    tagger: Arc<dyn Tagger>,
    fallback: Arc<dyn FallbackModel>,
    link_regex: Regex,
}

impl Phonemizer {
    /// American English engine with the built-in collaborators.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring an engine.
    pub fn builder() -> PhonemizerBuilder {
        PhonemizerBuilder::new()
    }

    /// Convert text to a phoneme string plus the resolved token list.
    pub fn phonemize(&self, text: &str) -> (String, Vec<Token>) {
        self.phonemize_with(text, true)
    }

    /// Like [`phonemize`](Self::phonemize), optionally skipping the inline
    /// override scan. The tagger runs either way.
    pub fn phonemize_with(&self, text: &str, preprocess_overrides: bool) -> (String, Vec<Token>) {
        let (normalized, features) = if preprocess_overrides {
            preprocess::preprocess(&self.link_regex, text)
        } else {
            (text.to_string(), Vec::new())
        };

        let tokens = tokenize::tokenize(self.tagger.as_ref(), &normalized, &features);
        let tokens = tokenize::fold_heads(tokens, &self.unk);
        let mut words = retokenize::retokenize(&self.tables, tokens);
        resolve::resolve(&mut words, &self.lexicon, self.fallback.as_ref(), &self.tables);
        resolve::finalize(words, &self.unk)
    }
}

/// Fluent configuration for [`Phonemizer`]
pub struct PhonemizerBuilder {
    british: bool,
    unk: String,
    tagger: Option<Arc<dyn Tagger>>,
    fallback: Option<Arc<dyn FallbackModel>>,
    dictionaries: Option<(String, String)>,
}

impl Default for PhonemizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PhonemizerBuilder {
    /// Start from the defaults: American English, `❓` marker, built-in
    /// tagger and fallback, embedded dictionaries.
    pub fn new() -> Self {
        PhonemizerBuilder {
            british: false,
            unk: DEFAULT_UNK.to_string(),
            tagger: None,
            fallback: None,
            dictionaries: None,
        }
    }

    /// Select the British English dictionaries and allomorph rules.
    pub fn british(mut self, british: bool) -> Self {
        self.british = british;
        self
    }

    /// Set the unknown-token marker.
    pub fn unk<S: Into<String>>(mut self, unk: S) -> Self {
        self.unk = unk.into();
        self
    }

    /// Inject a part-of-speech tagger.
    pub fn tagger(mut self, tagger: Arc<dyn Tagger>) -> Self {
        self.tagger = Some(tagger);
        self
    }

    /// Inject an out-of-vocabulary fallback model.
    pub fn fallback(mut self, fallback: Arc<dyn FallbackModel>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Replace the embedded dictionaries with gold/silver JSON resources.
    pub fn dictionaries<S: Into<String>>(mut self, gold_json: S, silver_json: S) -> Self {
        self.dictionaries = Some((gold_json.into(), silver_json.into()));
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<Phonemizer> {
        let tables = Arc::new(CharTables::new(self.british));

        let (golds, silvers): (Dict, Dict) = match &self.dictionaries {
            Some((gold, silver)) => (dictionary::parse(gold)?, dictionary::parse(silver)?),
            None => dictionary::embedded(self.british).clone(),
        };

        let lexicon = Lexicon::new(self.british, golds, silvers, Arc::clone(&tables));

        Ok(Phonemizer {
            unk: self.unk,
            tables,
            lexicon,
            tagger: self.tagger.unwrap_or_else(|| Arc::new(HeuristicTagger::new())),
            fallback: self
                .fallback
                .unwrap_or_else(|| Arc::new(LetterRuleFallback::new(self.british))),
            link_regex: Regex::new(r"\[([^\]]+)\]\(([^\)]*)\)").expect("static pattern"),
        })
    }
}

/// Phonemize with a default American English engine.
pub fn phonemize(text: &str) -> Result<(String, Vec<Token>)> {
    let engine = Phonemizer::new()?;
    Ok(engine.phonemize(text))
}
