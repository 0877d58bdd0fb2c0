//! Stress marker editing
//!
//! Pure functions that relocate, insert, or strip stress markers in a
//! phoneme string according to a numeric directive.

/// IPA primary stress marker
pub const PRIMARY_STRESS: char = 'ˈ';
/// IPA secondary stress marker
pub const SECONDARY_STRESS: char = 'ˌ';

/// Vowel-class phoneme characters (shared with the lookahead tracker)
pub const VOWELS: &str = "AIOQWYaiuæɑɒɔəɛɜɪʊʌᵻ";

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

fn is_stress_marker(c: char) -> bool {
    c == PRIMARY_STRESS || c == SECONDARY_STRESS
}

/// Apply a stress directive to a phoneme string.
///
/// * `< -1` strips every marker.
/// * `-1`, or `0`/`-0.5` with an existing primary, demotes to a single
///   weak stress.
/// * `0`/`0.5`/`1` with no marker prepends a secondary marker and
///   relocates it before the first vowel.
/// * `>= 1` promotes a lone secondary to primary; `> 1` with no marker
///   prepends a primary instead.
///
/// Everything else is returned unchanged, including strings without any
/// vowel to carry a new marker.
pub fn apply_stress(phonemes: &str, stress: Option<f64>) -> String {
    let stress = match stress {
        Some(s) => s,
        None => return phonemes.to_string(),
    };

    let has_primary = phonemes.contains(PRIMARY_STRESS);
    let has_secondary = phonemes.contains(SECONDARY_STRESS);
    let has_any = has_primary || has_secondary;

    if stress < -1.0 {
        phonemes.chars().filter(|c| !is_stress_marker(*c)).collect()
    } else if stress == -1.0 || ((stress == 0.0 || stress == -0.5) && has_primary) {
        phonemes
            .chars()
            .filter(|c| *c != SECONDARY_STRESS)
            .map(|c| if c == PRIMARY_STRESS { SECONDARY_STRESS } else { c })
            .collect()
    } else if (stress == 0.0 || stress == 0.5 || stress == 1.0) && !has_any {
        if !phonemes.chars().any(is_vowel) {
            return phonemes.to_string();
        }
        restress(&format!("{SECONDARY_STRESS}{phonemes}"))
    } else if stress >= 1.0 && !has_primary && has_secondary {
        phonemes
            .chars()
            .map(|c| if c == SECONDARY_STRESS { PRIMARY_STRESS } else { c })
            .collect()
    } else if stress > 1.0 && !has_any {
        if !phonemes.chars().any(is_vowel) {
            return phonemes.to_string();
        }
        restress(&format!("{PRIMARY_STRESS}{phonemes}"))
    } else {
        phonemes.to_string()
    }
}

/// Move each stress marker to sit immediately before its following vowel.
///
/// Non-marker characters keep their integer positions; a marker takes a
/// fractional position just before the next vowel, then the string is
/// re-emitted in position order. A marker with no following vowel stays
/// where it is.
fn restress(phonemes: &str) -> String {
    let chars: Vec<char> = phonemes.chars().collect();
    let mut positions: Vec<(f64, char)> =
        chars.iter().enumerate().map(|(i, c)| (i as f64, *c)).collect();

    for (i, c) in chars.iter().enumerate() {
        if is_stress_marker(*c) {
            if let Some(j) = chars[i + 1..].iter().position(|x| is_vowel(*x)) {
                positions[i].0 = (i + 1 + j) as f64 - 0.5;
            }
        }
    }

    positions.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("finite positions"));
    positions.into_iter().map(|(_, c)| c).collect()
}
