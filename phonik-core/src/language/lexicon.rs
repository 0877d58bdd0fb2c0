//! Layered pronunciation lookup
//!
//! Resolution order for one word: special cases, direct dictionary lookup
//! (with case normalization and tag-conditioned entries), possessive
//! unwrap, suffix stemming with allomorph re-application, then the numeral
//! bridge. Failure is silent; the resolver proceeds to the fallback model.

use regex::Regex;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

use crate::domain::numbers::NumberVerbalizer;
use crate::domain::stress::{apply_stress, PRIMARY_STRESS, SECONDARY_STRESS};
use crate::domain::token::{Context, Token, WordClass};
use crate::language::dictionary::{Dict, DictEntry};
use crate::language::tables::CharTables;
use crate::language::tagger::{parent_tag, penn_tag};

/// Capitalization-derived stress directives: (mixed case, all uppercase)
const CAP_STRESSES: (f64, f64) = (0.5, 2.0);

/// Dictionary-backed word resolver for one locale
pub struct Lexicon {
    british: bool,
    golds: Dict,
    silvers: Dict,
    tables: Arc<CharTables>,
    verbalizer: NumberVerbalizer,
    vs_regex: Regex,
    num_suffix_regex: Regex,
}

impl Lexicon {
    /// Build a lexicon over already-loaded dictionaries.
    pub fn new(british: bool, golds: Dict, silvers: Dict, tables: Arc<CharTables>) -> Self {
        Lexicon {
            british,
            golds,
            silvers,
            tables,
            verbalizer: NumberVerbalizer::new(),
            vs_regex: Regex::new(r"(?i)vs\.?$").expect("static pattern"),
            num_suffix_regex: Regex::new(r"[a-z']+$").expect("static pattern"),
        }
    }

    /// Resolve one token to phonemes, or fail silently.
    ///
    /// `(None, None)` means the caller should continue down the fallback
    /// chain.
    pub fn transcribe(&self, token: &Token, ctx: Context) -> (Option<String>, Option<i32>) {
        let mut word = token.alias.clone().unwrap_or_else(|| token.text.clone());
        word = word.replace('\u{2018}', "'").replace('\u{2019}', "'");
        word = word.nfkc().collect();
        word = word
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) if !c.is_ascii_digit() => char::from_digit(d, 10).unwrap_or(c),
                _ => c,
            })
            .collect();

        let stress = if word == word.to_lowercase() {
            None
        } else if word == word.to_uppercase() {
            Some(CAP_STRESSES.1)
        } else {
            Some(CAP_STRESSES.0)
        };

        if let Some((ps, rating)) = self.get_word(&word, token.tag, stress, ctx) {
            let ps = self.append_currency(&ps, token.currency.as_deref());
            return (Some(apply_stress(&ps, token.stress)), Some(rating));
        }

        if self.is_number(&word, token.is_head) {
            let (num, rating) =
                self.get_number(&word, token.currency.as_deref(), token.is_head, &token.num_flags);
            return (num.map(|n| apply_stress(&n, token.stress)), rating);
        }

        (None, None)
    }

    // ---- word path ----

    fn get_word(
        &self,
        word: &str,
        tag: Option<WordClass>,
        stress: Option<f64>,
        ctx: Context,
    ) -> Option<(String, i32)> {
        if let Some(sc) = self.special_case(word, tag, stress, ctx) {
            return Some(sc);
        }

        let mut candidate = word.to_string();
        let wl = word.to_lowercase();

        // Mixed-case words unknown to both dictionaries fold down to their
        // lowercase form when that form is resolvable; short proper nouns
        // keep their casing for the acronym heuristics.
        let tail: String = word.chars().skip(1).collect();
        if word.chars().count() > 1
            && word.replace('\'', "").chars().all(char::is_alphabetic)
            && word != wl
            && (!tag.map_or(false, WordClass::is_proper_noun) || word.chars().count() > 7)
            && !self.golds.contains_key(word)
            && !self.silvers.contains_key(word)
            && (word == word.to_uppercase() || tail == tail.to_lowercase())
            && (self.golds.contains_key(&wl)
                || self.silvers.contains_key(&wl)
                || self.stem_s(&wl, tag, stress, Some(ctx)).is_some()
                || self.stem_ed(&wl, tag, stress, Some(ctx)).is_some()
                || self.stem_ing(&wl, tag, stress, Some(ctx)).is_some())
        {
            candidate = wl;
        }

        if self.is_known(&candidate) {
            return self.lookup(&candidate, tag, stress, Some(ctx));
        }
        if candidate.ends_with("s'") {
            let base = format!("{}'s", drop_last(&candidate, 2));
            if self.is_known(&base) {
                return self.lookup(&base, tag, stress, Some(ctx));
            }
        }
        if candidate.ends_with('\'') {
            let base = drop_last(&candidate, 1);
            if self.is_known(&base) {
                return self.lookup(&base, tag, stress, Some(ctx));
            }
        }

        if let Some(r) = self.stem_s(&candidate, tag, stress, Some(ctx)) {
            return Some(r);
        }
        if let Some(r) = self.stem_ed(&candidate, tag, stress, Some(ctx)) {
            return Some(r);
        }
        if let Some(r) = self.stem_ing(&candidate, tag, stress.or(Some(0.5)), Some(ctx)) {
            return Some(r);
        }

        None
    }

    fn special_case(
        &self,
        word: &str,
        tag: Option<WordClass>,
        stress: Option<f64>,
        ctx: Context,
    ) -> Option<(String, i32)> {
        let tables = &self.tables;

        if tag == Some(WordClass::Punctuation) {
            if let Some(target) = tables.add_symbols.get(word) {
                return self.lookup(target, None, Some(-0.5), Some(ctx));
            }
        }
        if let Some(sym) = tables.symbols.get(word) {
            return self.lookup(sym, None, None, Some(ctx));
        }

        if word.trim_matches('.').contains('.') {
            // Dotted short runs spell out as acronyms ("U.S.A"); anything
            // with a longer part falls out of the special cases entirely
            let max_part = word.split('.').map(|p| p.chars().count()).max().unwrap_or(0);
            if max_part < 3 {
                return self.spell_out(word);
            }
            return None;
        }

        match word {
            "a" | "A" => {
                if tag == Some(WordClass::Determiner) {
                    return Some(("ɐ".to_string(), 4));
                }
                return Some(("ˈA".to_string(), 4));
            }
            "am" | "Am" | "AM" => {
                if let Some(t) = tag {
                    if penn_tag(t, Some(word)).starts_with("NN") {
                        return self.spell_out(word);
                    }
                }
                if ctx.future_vowel.is_none() || word != "am" || stress.map_or(false, |s| s > 0.0) {
                    if let Some(DictEntry::Phoneme(v)) = self.golds.get("am") {
                        return Some((v.clone(), 4));
                    }
                }
                return Some(("ɐm".to_string(), 4));
            }
            "an" | "An" | "AN" => {
                if word == "AN" {
                    if let Some(t) = tag {
                        if penn_tag(t, Some(word)).starts_with("NN") {
                            return self.spell_out(word);
                        }
                    }
                }
                return Some(("ɐn".to_string(), 4));
            }
            "I" => {
                if tag.map_or(false, |t| penn_tag(t, Some(word)) == "PRP") {
                    return Some((format!("{SECONDARY_STRESS}I"), 4));
                }
            }
            "by" | "By" | "BY" => {
                if parent_tag(tag, Some(word)) == "ADV" {
                    return Some(("bˈI".to_string(), 4));
                }
            }
            "to" | "To" => return Some((self.to_form(ctx), 4)),
            "TO" => {
                if tag == Some(WordClass::Preposition) {
                    return Some((self.to_form(ctx), 4));
                }
            }
            "in" | "In" => return Some((self.in_form(tag, ctx), 4)),
            "IN" => {
                if !tag.map_or(false, WordClass::is_proper_noun) {
                    return Some((self.in_form(tag, ctx), 4));
                }
            }
            "the" | "The" => return Some((self.the_form(ctx), 4)),
            "THE" => {
                if tag == Some(WordClass::Determiner) {
                    return Some((self.the_form(ctx), 4));
                }
            }
            "used" | "Used" | "USED" => {
                if let Some(DictEntry::Tagged(m)) = self.golds.get("used") {
                    if matches!(tag, Some(WordClass::Verb) | Some(WordClass::Adjective))
                        && ctx.future_to
                    {
                        if let Some(Some(v)) = m.get("VBD") {
                            return Some((v.clone(), 4));
                        }
                    }
                    if let Some(Some(v)) = m.get("DEFAULT") {
                        return Some((v.clone(), 4));
                    }
                }
                return None;
            }
            _ => {}
        }

        if tag == Some(WordClass::Preposition) && self.vs_regex.is_match(word) {
            return self.lookup("versus", None, None, Some(ctx));
        }

        None
    }

    fn to_form(&self, ctx: Context) -> String {
        match ctx.future_vowel {
            None => match self.golds.get("to") {
                Some(DictEntry::Phoneme(v)) => v.clone(),
                _ => "to".to_string(),
            },
            Some(false) => "tə".to_string(),
            Some(true) => "tʊ".to_string(),
        }
    }

    fn in_form(&self, tag: Option<WordClass>, ctx: Context) -> String {
        let stressed = ctx.future_vowel.is_none() || tag != Some(WordClass::Preposition);
        if stressed {
            format!("{PRIMARY_STRESS}ɪn")
        } else {
            "ɪn".to_string()
        }
    }

    fn the_form(&self, ctx: Context) -> String {
        if ctx.future_vowel == Some(true) {
            "ði".to_string()
        } else {
            "ðə".to_string()
        }
    }

    fn lookup(
        &self,
        w: &str,
        tag: Option<WordClass>,
        stress: Option<f64>,
        ctx: Option<Context>,
    ) -> Option<(String, i32)> {
        let mut word = w.to_string();
        let mut is_nnp: Option<bool> = None;

        if word == word.to_uppercase() && !self.golds.contains_key(&word) {
            word = word.to_lowercase();
            is_nnp = Some(tag.map_or(false, WordClass::is_proper_noun));
        }

        let mut rating = 4;
        let mut entry = self.golds.get(&word);
        if entry.is_none() && is_nnp != Some(true) {
            entry = self.silvers.get(&word);
            rating = 3;
        }

        let ps: Option<String> = entry.and_then(|e| match e {
            DictEntry::Phoneme(s) => Some(s.clone()),
            DictEntry::Tagged(m) => {
                // Fine tag first, then parent category, then DEFAULT; the
                // unknown-lookahead key wins when the context is open. A
                // present key with a null value resolves to nothing.
                if ctx.map_or(false, |c| c.future_vowel.is_none()) && m.contains_key("None") {
                    return m.get("None").cloned().flatten();
                }
                if let Some(t) = tag {
                    if let Some(v) = m.get(penn_tag(t, Some(w))) {
                        return v.clone();
                    }
                }
                if let Some(v) = m.get(parent_tag(tag, Some(w))) {
                    return v.clone();
                }
                m.get("DEFAULT").cloned().flatten()
            }
        });

        let needs_spelling = match &ps {
            None => true,
            Some(p) => is_nnp == Some(true) && !p.contains(PRIMARY_STRESS),
        };
        if needs_spelling {
            if let Some(nn) = self.spell_out(&word) {
                return Some(nn);
            }
        }

        let ps = ps?;
        Some((apply_stress(&ps, stress), rating))
    }

    /// Spell a word letter-by-letter from the gold dictionary; acronyms
    /// carry final emphasis.
    fn spell_out(&self, word: &str) -> Option<(String, i32)> {
        let mut parts: Vec<String> = Vec::new();
        for ch in word.chars().filter(|c| c.is_alphabetic()) {
            let upper: String = ch.to_uppercase().collect();
            match self.golds.get(&upper) {
                Some(DictEntry::Phoneme(p)) => parts.push(p.clone()),
                _ => return None,
            }
        }

        let joined = apply_stress(&parts.concat(), Some(0.0));
        Some((replace_last(&joined, SECONDARY_STRESS, PRIMARY_STRESS), 3))
    }

    fn is_known(&self, word: &str) -> bool {
        if self.golds.contains_key(word)
            || self.tables.symbols.contains_key(word)
            || self.silvers.contains_key(word)
        {
            return true;
        }
        if !word.chars().all(|c| self.tables.in_lexicon_alphabet(c)) {
            return false;
        }
        if word.chars().count() == 1 {
            return true;
        }
        if word == word.to_uppercase() && self.golds.contains_key(&word.to_lowercase()) {
            return true;
        }
        let tail: String = word.chars().skip(1).collect();
        tail == tail.to_uppercase()
    }

    // ---- morphology ----

    fn stem_s(
        &self,
        word: &str,
        tag: Option<WordClass>,
        stress: Option<f64>,
        ctx: Option<Context>,
    ) -> Option<(String, i32)> {
        let len = word.chars().count();
        if len < 3 || !word.ends_with('s') {
            return None;
        }

        let stem = if !word.ends_with("ss") && self.is_known(&drop_last(word, 1)) {
            drop_last(word, 1)
        } else if (word.ends_with("'s") || (len > 4 && word.ends_with("es") && !word.ends_with("ies")))
            && self.is_known(&drop_last(word, 2))
        {
            drop_last(word, 2)
        } else if len > 4 && word.ends_with("ies") && self.is_known(&format!("{}y", drop_last(word, 3)))
        {
            format!("{}y", drop_last(word, 3))
        } else {
            return None;
        };

        let (ps, rating) = self.lookup(&stem, tag, stress, ctx)?;
        Some((self.pluralize(&ps)?, rating))
    }

    fn pluralize(&self, stem: &str) -> Option<String> {
        let last = stem.chars().last()?;
        if "ptkfθ".contains(last) {
            return Some(format!("{stem}s"));
        }
        if "szʃʒʧʤ".contains(last) {
            let vowel = if self.british { 'ɪ' } else { 'ᵻ' };
            return Some(format!("{stem}{vowel}z"));
        }
        Some(format!("{stem}z"))
    }

    fn past_ed(&self, stem: &str) -> Option<String> {
        let last = stem.chars().last()?;
        if "pkfθʃsʧ".contains(last) {
            return Some(format!("{stem}t"));
        }
        if stem.ends_with('d') {
            let vowel = if self.british { 'ɪ' } else { 'ᵻ' };
            return Some(format!("{stem}{vowel}d"));
        }
        if !stem.ends_with('t') {
            return Some(format!("{stem}d"));
        }
        if self.british || stem.chars().count() < 2 {
            return Some(format!("{stem}ɪd"));
        }
        let penult = drop_last(stem, 1).chars().last();
        if penult.map_or(false, |c| self.tables.is_us_tau(c)) {
            return Some(format!("{}ɾᵻd", drop_last(stem, 1)));
        }
        Some(format!("{stem}ᵻd"))
    }

    fn prog_ing(&self, stem: &str) -> Option<String> {
        if stem.is_empty() {
            return None;
        }
        if self.british {
            // Schwa-final stems cannot take -ing in the British rendering
            if stem.chars().last().map_or(false, |c| "əː".contains(c)) {
                return None;
            }
        } else if stem.chars().count() > 1 && stem.ends_with('t') {
            let penult = drop_last(stem, 1).chars().last();
            if penult.map_or(false, |c| self.tables.is_us_tau(c)) {
                return Some(format!("{}ɾɪŋ", drop_last(stem, 1)));
            }
        }
        Some(format!("{stem}ɪŋ"))
    }

    fn stem_ed(
        &self,
        word: &str,
        tag: Option<WordClass>,
        stress: Option<f64>,
        ctx: Option<Context>,
    ) -> Option<(String, i32)> {
        let len = word.chars().count();
        if len < 4 || !word.ends_with('d') {
            return None;
        }

        let stem = if !word.ends_with("dd") && self.is_known(&drop_last(word, 1)) {
            drop_last(word, 1)
        } else if len > 4
            && word.ends_with("ed")
            && !word.ends_with("eed")
            && self.is_known(&drop_last(word, 2))
        {
            drop_last(word, 2)
        } else {
            return None;
        };

        let (ps, rating) = self.lookup(&stem, tag, stress, ctx)?;
        Some((self.past_ed(&ps)?, rating))
    }

    fn stem_ing(
        &self,
        word: &str,
        tag: Option<WordClass>,
        stress: Option<f64>,
        ctx: Option<Context>,
    ) -> Option<(String, i32)> {
        let len = word.chars().count();
        if len < 5 || !word.ends_with("ing") {
            return None;
        }

        let stem = if len > 5 && self.is_known(&drop_last(word, 3)) {
            drop_last(word, 3)
        } else if self.is_known(&format!("{}e", drop_last(word, 3))) {
            format!("{}e", drop_last(word, 3))
        } else if len > 5 && has_doubled_consonant(word) && self.is_known(&drop_last(word, 4)) {
            drop_last(word, 4)
        } else {
            return None;
        };

        let (ps, rating) = self.lookup(&stem, tag, stress, ctx)?;
        Some((self.prog_ing(&ps)?, rating))
    }

    // ---- numeral bridge ----

    fn is_number(&self, word: &str, is_head: bool) -> bool {
        if !word.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }

        let suffixes = ["ing", "'d", "ed", "'s", "st", "nd", "rd", "th", "s"];
        let mut core = word;
        for s in suffixes {
            if let Some(stripped) = core.strip_suffix(s) {
                core = stripped;
                break;
            }
        }

        core.chars().enumerate().all(|(i, c)| {
            c.is_ascii_digit() || c == ',' || c == '.' || (is_head && i == 0 && c == '-')
        })
    }

    fn is_currency_shape(&self, word: &str) -> bool {
        if !word.contains('.') {
            return true;
        }
        if word.matches('.').count() > 1 {
            return false;
        }
        match word.split('.').next_back() {
            Some(cents) => cents.chars().count() < 3 || cents.chars().all(|c| c == '0'),
            None => false,
        }
    }

    fn append_currency(&self, phonemes: &str, currency: Option<&str>) -> String {
        if let Some(c) = currency {
            if let Some((major, _)) = self.tables.currencies.get(c) {
                if let Some((plural, _)) = self.stem_s(&format!("{major}s"), None, None, None) {
                    return format!("{phonemes} {plural}");
                }
            }
        }
        phonemes.to_string()
    }

    fn append_lookup(&self, word: &str, stress: Option<f64>, out: &mut Vec<(String, i32)>) {
        if let Some((ps, rating)) = self.lookup(word, None, stress, None) {
            out.push((ps, rating));
        }
    }

    /// Spell a digit string into dictionary words when it parses cleanly.
    fn spell_number(&self, num: &str) -> Option<String> {
        if let Ok(n) = num.parse::<i128>() {
            return Some(self.verbalizer.cardinal(n));
        }
        let (int, frac) = num.split_once('.')?;
        if int.chars().all(|c| c.is_ascii_digit()) && frac.chars().all(|c| c.is_ascii_digit()) {
            return Some(self.verbalizer.decimal(int.parse().ok()?, frac));
        }
        None
    }

    fn extend_num(
        &self,
        num: &str,
        first: bool,
        escape: bool,
        num_flags: &str,
        out: &mut Vec<(String, i32)>,
    ) {
        let splits: Vec<String> = if escape {
            split_non_letters(num)
        } else if let Some(spelled) = self.spell_number(num) {
            spelled.split(' ').map(String::from).collect()
        } else {
            split_non_letters(num)
        };

        for (i, w) in splits.iter().enumerate() {
            if w != "and" || num_flags.contains('&') {
                if first && i == 0 && splits.len() > 1 && w == "one" && num_flags.contains('a') {
                    out.push(("ə".to_string(), 4));
                } else {
                    let s = if w == "point" { Some(-2.0) } else { None };
                    self.append_lookup(w, s, out);
                }
            } else if w == "and" && num_flags.contains('n') && !out.is_empty() {
                let (last, rating) = out.pop().expect("checked non-empty");
                out.push((format!("{last}ən"), rating));
            }
        }
    }

    fn get_number(
        &self,
        input: &str,
        currency: Option<&str>,
        is_head: bool,
        num_flags: &str,
    ) -> (Option<String>, Option<i32>) {
        let mut out: Vec<(String, i32)> = Vec::new();
        let mut word = input.to_string();

        let matched = self
            .num_suffix_regex
            .find(&word)
            .map(|m| (m.as_str().to_string(), m.start()));
        let suffix: Option<String> = matched.map(|(s, start)| {
            word.truncate(start);
            s
        });

        if let Some(rest) = word.strip_prefix('-') {
            self.append_lookup("minus", None, &mut out);
            word = rest.to_string();
        }

        let is_ordinal_suffix =
            suffix.as_deref().map_or(false, |s| self.tables.ordinals.contains(&s));
        let currency_known = currency.map_or(false, |c| self.tables.currencies.contains_key(c));

        if is_plain_digits(&word) && is_ordinal_suffix {
            if let Ok(n) = word.parse::<i128>() {
                let spelled = self.verbalizer.ordinal(n);
                self.extend_num(&spelled, true, true, num_flags, &mut out);
            }
        } else if out.is_empty()
            && word.chars().count() == 4
            && !currency_known
            && is_plain_digits(&word)
        {
            if let Ok(n) = word.parse::<i128>() {
                let spelled = self.verbalizer.year(n);
                self.extend_num(&spelled, true, true, num_flags, &mut out);
            }
        } else if !is_head && !word.contains('.') {
            // Serial-style digit runs read digit by digit, with the
            // three-digit "five oh one" shape as the exception
            let num = word.replace(',', "");
            let digits: Vec<char> = num.chars().collect();
            if num.starts_with('0') || digits.len() > 3 {
                for c in &digits {
                    self.extend_num(&c.to_string(), false, false, num_flags, &mut out);
                }
            } else if digits.len() == 3 && !num.ends_with("00") {
                self.extend_num(&digits[0].to_string(), true, false, num_flags, &mut out);
                if digits[1] == '0' {
                    if let Some((ps, rating)) = self.lookup("O", None, Some(-2.0), None) {
                        out.push((ps, rating));
                    }
                    self.extend_num(&digits[2].to_string(), false, false, num_flags, &mut out);
                } else {
                    let tens: String = digits[1..].iter().collect();
                    self.extend_num(&tens, false, false, num_flags, &mut out);
                }
            } else {
                self.extend_num(&num, true, false, num_flags, &mut out);
            }
        } else if word.matches('.').count() > 1 || !is_head {
            // Versions and dotted serials, each segment on its own
            let mut first = true;
            for num in word.replace(',', "").split('.') {
                if num.is_empty() {
                } else if num.starts_with('0')
                    || (num.chars().count() != 2 && num.chars().skip(1).any(|c| c != '0'))
                {
                    for c in num.chars() {
                        self.extend_num(&c.to_string(), false, false, num_flags, &mut out);
                    }
                } else {
                    self.extend_num(num, first, false, num_flags, &mut out);
                }
                first = false;
            }
        } else if currency_known && self.is_currency_shape(&word) {
            let units = self.tables.currencies[currency.expect("currency_known")];
            let cleaned = word.replace(',', "");
            let mut parts = cleaned.split('.');
            let major: i128 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
            let minor: i128 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

            let mut pairs = vec![(major, units.0), (minor, units.1)];
            if pairs[1].0 == 0 {
                pairs.truncate(1);
            } else if pairs[0].0 == 0 {
                pairs.remove(0);
            }

            for (i, &(num, unit)) in pairs.iter().enumerate() {
                if i > 0 {
                    self.append_lookup("and", None, &mut out);
                }
                self.extend_num(&num.to_string(), i == 0, false, num_flags, &mut out);
                if num.abs() != 1 && unit != "pence" {
                    if let Some((ps, _)) = self.stem_s(&format!("{unit}s"), None, None, None) {
                        out.push((ps, 4));
                    }
                } else {
                    self.append_lookup(unit, None, &mut out);
                }
            }
        } else {
            if is_plain_digits(&word) {
                if let Ok(n) = word.parse::<i128>() {
                    word = self.verbalizer.cardinal(n);
                }
            } else if !word.contains('.') {
                let num = word.replace(',', "");
                if let Ok(n) = num.parse::<i128>() {
                    word = if is_ordinal_suffix {
                        self.verbalizer.ordinal(n)
                    } else {
                        self.verbalizer.cardinal(n)
                    };
                }
            } else {
                let num = word.replace(',', "");
                if let Some(tail) = num.strip_prefix('.') {
                    let spoken: Vec<String> = tail
                        .chars()
                        .filter_map(|c| c.to_digit(10))
                        .map(|d| self.verbalizer.cardinal(d as i128))
                        .collect();
                    word = format!("point {}", spoken.join(" "));
                } else if let Some((int, frac)) = num.split_once('.') {
                    if let Ok(n) = int.parse::<i128>() {
                        word = self.verbalizer.decimal(n, frac);
                    }
                }
            }
            let spelled = word.clone();
            self.extend_num(&spelled, true, true, num_flags, &mut out);
        }

        if out.is_empty() {
            return (None, None);
        }

        let mut text = out.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>().join(" ");
        let rating = out.iter().map(|(_, r)| *r).min().unwrap_or(4);

        match suffix.as_deref() {
            Some("s") | Some("'s") => {
                if let Some(p) = self.pluralize(&text) {
                    text = p;
                }
            }
            Some("ed") | Some("'d") => {
                if let Some(p) = self.past_ed(&text) {
                    text = p;
                }
            }
            Some("ing") => {
                if let Some(p) = self.prog_ing(&text) {
                    text = p;
                }
            }
            _ => {}
        }

        (Some(text), Some(rating))
    }
}

// ---- helpers ----

fn drop_last(word: &str, n: usize) -> String {
    let count = word.chars().count();
    word.chars().take(count.saturating_sub(n)).collect()
}

fn replace_last(s: &str, target: char, replacement: char) -> String {
    match s.rfind(target) {
        Some(pos) => {
            let mut out = String::with_capacity(s.len());
            out.push_str(&s[..pos]);
            out.push(replacement);
            out.push_str(&s[pos + target.len_utf8()..]);
            out
        }
        None => s.to_string(),
    }
}

fn is_plain_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn split_non_letters(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphabetic())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn has_doubled_consonant(word: &str) -> bool {
    let cs: Vec<char> = word.chars().collect();
    let n = cs.len();
    if n < 5 {
        return false;
    }
    (cs[n - 4] == cs[n - 5] && "bcdgklmnprstvxz".contains(cs[n - 4]))
        || (cs[n - 5] == 'c' && cs[n - 4] == 'k')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::dictionary;

    fn lexicon(british: bool) -> Lexicon {
        let (gold, silver) = dictionary::embedded(british).clone();
        Lexicon::new(british, gold, silver, Arc::new(CharTables::new(british)))
    }

    fn tk(text: &str, tag: WordClass) -> Token {
        Token::new(text.to_string(), 0..text.len(), Some(tag), String::new())
    }

    #[test]
    fn direct_lookup_hits_gold() {
        let lex = lexicon(false);
        let (ps, rating) = lex.transcribe(&tk("cat", WordClass::Noun), Context::default());
        assert_eq!(ps.as_deref(), Some("kˈæt"));
        assert_eq!(rating, Some(4));
    }

    #[test]
    fn silver_lookup_rates_lower() {
        let lex = lexicon(false);
        let (ps, rating) = lex.transcribe(&tk("phoneme", WordClass::Noun), Context::default());
        assert!(ps.is_some());
        assert_eq!(rating, Some(3));
    }

    #[test]
    fn plural_allomorphs_follow_the_stem() {
        let lex = lexicon(false);
        // cat ends in an unvoiced obstruent: plain +s
        let (ps, _) = lex.transcribe(&tk("cats", WordClass::Noun), Context::default());
        assert_eq!(ps.as_deref(), Some("kˈæts"));
        // bus ends in a sibilant: epenthetic vowel + z
        let (ps, _) = lex.transcribe(&tk("buses", WordClass::Noun), Context::default());
        assert_eq!(ps.as_deref(), Some("bˈʌsᵻz"));
        // dog ends voiced: +z
        let (ps, _) = lex.transcribe(&tk("dogs", WordClass::Noun), Context::default());
        assert_eq!(ps.as_deref(), Some("dˈɔɡz"));
    }

    #[test]
    fn past_allomorphs_follow_the_stem() {
        let lex = lexicon(false);
        let (ps, _) = lex.transcribe(&tk("walked", WordClass::Verb), Context::default());
        assert_eq!(ps.as_deref(), Some("wˈɔkt"));
        let (ps, _) = lex.transcribe(&tk("designed", WordClass::Verb), Context::default());
        assert_eq!(ps.as_deref(), Some("dɪzˈInd"));
        // American flap: heat + ed drops the t for a tap
        let (ps, _) = lex.transcribe(&tk("heated", WordClass::Verb), Context::default());
        assert_eq!(ps.as_deref(), Some("hˈiɾᵻd"));
    }

    #[test]
    fn progressive_allomorphs() {
        let lex = lexicon(false);
        let (ps, _) = lex.transcribe(&tk("walking", WordClass::Verb), Context::default());
        assert_eq!(ps.as_deref(), Some("wˈɔkɪŋ"));
        // doubled consonant: running → run + ing
        let (ps, _) = lex.transcribe(&tk("running", WordClass::Verb), Context::default());
        assert_eq!(ps.as_deref(), Some("ɹˈʌnɪŋ"));
        // American flap for t-final stems
        let (ps, _) = lex.transcribe(&tk("heating", WordClass::Verb), Context::default());
        assert_eq!(ps.as_deref(), Some("hˈiɾɪŋ"));
    }

    #[test]
    fn acronyms_spell_out_with_final_emphasis() {
        let lex = lexicon(false);
        let (ps, rating) = lex.transcribe(&tk("USA", WordClass::Noun), Context::default());
        let ps = ps.unwrap();
        assert_eq!(rating, Some(3));
        assert_eq!(ps.matches(PRIMARY_STRESS).count(), 1);
        assert!(ps.ends_with("ˈA"));
    }

    #[test]
    fn dotted_acronyms_spell_out() {
        let lex = lexicon(false);
        let (ps, rating) = lex.transcribe(&tk("U.S", WordClass::Noun), Context::default());
        assert!(ps.is_some());
        assert_eq!(rating, Some(3));
    }

    #[test]
    fn the_depends_on_lookahead() {
        let lex = lexicon(false);
        let vowel_next = Context { future_vowel: Some(true), future_to: false };
        let consonant_next = Context { future_vowel: Some(false), future_to: false };
        let (ps, _) = lex.transcribe(&tk("the", WordClass::Determiner), vowel_next);
        assert_eq!(ps.as_deref(), Some("ði"));
        let (ps, _) = lex.transcribe(&tk("the", WordClass::Determiner), consonant_next);
        assert_eq!(ps.as_deref(), Some("ðə"));
    }

    #[test]
    fn to_depends_on_lookahead() {
        let lex = lexicon(false);
        let (ps, _) = lex.transcribe(
            &tk("to", WordClass::Preposition),
            Context { future_vowel: Some(false), future_to: false },
        );
        assert_eq!(ps.as_deref(), Some("tə"));
        let (ps, _) = lex.transcribe(
            &tk("to", WordClass::Preposition),
            Context { future_vowel: Some(true), future_to: false },
        );
        assert_eq!(ps.as_deref(), Some("tʊ"));
    }

    #[test]
    fn determiner_a_reduces() {
        let lex = lexicon(false);
        let (ps, _) = lex.transcribe(&tk("a", WordClass::Determiner), Context::default());
        assert_eq!(ps.as_deref(), Some("ɐ"));
        let (ps, _) = lex.transcribe(&tk("a", WordClass::Noun), Context::default());
        assert_eq!(ps.as_deref(), Some("ˈA"));
    }

    #[test]
    fn used_to_picks_past_form() {
        let lex = lexicon(false);
        let (ps, _) = lex.transcribe(
            &tk("used", WordClass::Verb),
            Context { future_vowel: Some(false), future_to: true },
        );
        assert_eq!(ps.as_deref(), Some("jˈust"));
        let (ps, _) = lex.transcribe(&tk("used", WordClass::Verb), Context::default());
        assert_eq!(ps.as_deref(), Some("jˈuzd"));
    }

    #[test]
    fn numbers_verbalize() {
        let lex = lexicon(false);
        let (ps, _) = lex.transcribe(&tk("100", WordClass::Number), Context::default());
        assert_eq!(ps.as_deref(), Some("wˈʌn hˈʌndɹəd"));
    }

    #[test]
    fn four_digit_numbers_read_as_years() {
        let lex = lexicon(false);
        let (ps, _) = lex.transcribe(&tk("1984", WordClass::Number), Context::default());
        // nineteen eighty-four
        assert_eq!(ps.as_deref(), Some("nIntˈin ˈAti fˈɔɹ"));
    }

    #[test]
    fn ordinal_numerals_use_ordinal_words() {
        let lex = lexicon(false);
        let (ps, _) = lex.transcribe(&tk("21st", WordClass::Number), Context::default());
        assert_eq!(ps.as_deref(), Some("twˈɛnti fˈɜɹst"));
    }

    #[test]
    fn currency_attaches_pluralized_units() {
        let lex = lexicon(false);
        let mut token = tk("100", WordClass::Number);
        token.currency = Some("€".to_string());
        let (ps, _) = lex.transcribe(&token, Context::default());
        assert_eq!(ps.as_deref(), Some("wˈʌn hˈʌndɹəd jˈʊɹOz"));

        let mut token = tk("1.50", WordClass::Number);
        token.currency = Some("$".to_string());
        let (ps, _) = lex.transcribe(&token, Context::default());
        let ps = ps.unwrap();
        assert!(ps.contains("dˈɑləɹ"));
        assert!(ps.contains("ənd"));
        assert!(ps.ends_with("sˈɛnts"));
    }

    #[test]
    fn possessive_unwrap() {
        let lex = lexicon(false);
        // cats' → cat's → cat + s
        let (ps, _) = lex.transcribe(&tk("dogs'", WordClass::Noun), Context::default());
        assert_eq!(ps.as_deref(), Some("dˈɔɡz"));
    }

    #[test]
    fn unknown_alphabet_fails_silently() {
        let lex = lexicon(false);
        let (ps, rating) = lex.transcribe(&tk("Ω", WordClass::Noun), Context::default());
        assert_eq!(ps, None);
        assert_eq!(rating, None);
    }

    #[test]
    fn gb_allomorphs_use_the_british_vowel() {
        let lex = lexicon(true);
        let (ps, _) = lex.transcribe(&tk("buses", WordClass::Noun), Context::default());
        assert_eq!(ps.as_deref(), Some("bˈʌsɪz"));
    }
}
