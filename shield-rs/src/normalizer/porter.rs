//! Porter suffix-stripping stemmer
//!
//! Martin Porter's 1980 algorithm with the NLTK extensions, which is what
//! the fitted vocabularies were built with:
//!
//! - a small pool of irregular forms (`dying` -> `die`, `skies` -> `sky`, ...)
//! - words of two characters or less are returned unchanged
//! - four-letter `-ies` / `-ied` words keep their `ie`
//! - `alli` is rewritten before the `bli` rule, plus `fulli` and `logi` rules
//! - a two-letter vowel-consonant stem counts as `*o` (cvc)
//!
//! Characters are processed as Unicode scalar values. Anything that is not
//! one of `a e i o u` (or a vowel-position `y`) is treated as a consonant.

use std::collections::HashMap;

const IRREGULAR_FORMS: &[(&str, &[&str])] = &[
    ("sky", &["sky", "skies"]),
    ("die", &["dying"]),
    ("lie", &["lying"]),
    ("tie", &["tying"]),
    ("news", &["news"]),
    ("inning", &["innings", "inning"]),
    ("outing", &["outings", "outing"]),
    ("canning", &["cannings", "canning"]),
    ("howe", &["howe"]),
    ("proceed", &["proceed"]),
    ("exceed", &["exceed"]),
    ("succeed", &["succeed"]),
];

type Condition<'a> = &'a dyn Fn(&[char]) -> bool;

/// Suffix rewrite applied when `condition` holds for the remaining stem
struct Rule<'a> {
    suffix: &'static str,
    replacement: &'static str,
    condition: Condition<'a>,
}

fn rule<'a>(suffix: &'static str, replacement: &'static str, condition: Condition<'a>) -> Rule<'a> {
    Rule {
        suffix,
        replacement,
        condition,
    }
}

/// Porter stemmer (NLTK extensions mode)
#[derive(Debug, Clone)]
pub struct PorterStemmer {
    pool: HashMap<&'static str, &'static str>,
}

impl PorterStemmer {
    pub fn new() -> Self {
        let pool = IRREGULAR_FORMS
            .iter()
            .flat_map(|(stem, forms)| forms.iter().map(move |form| (*form, *stem)))
            .collect();

        Self { pool }
    }

    /// Reduce a word to its stem. The word is lowercased first.
    pub fn stem(&self, word: &str) -> String {
        let lowered = word.to_lowercase();

        if let Some(stem) = self.pool.get(word) {
            return (*stem).to_string();
        }

        if word.chars().count() <= 2 {
            return lowered;
        }

        let mut chars: Vec<char> = lowered.chars().collect();
        chars = step1a(chars);
        chars = step1b(chars);
        chars = step1c(chars);
        chars = step2(chars);
        chars = step3(chars);
        chars = step4(chars);
        chars = step5a(chars);
        chars = step5b(chars);

        chars.into_iter().collect()
    }
}

impl Default for PorterStemmer {
    fn default() -> Self {
        Self::new()
    }
}

/// Consonant flag per character, in one left-to-right pass. A `y` is a
/// consonant at the start of the word or after a vowel.
fn consonant_mask(word: &[char]) -> Vec<bool> {
    let mut mask: Vec<bool> = Vec::with_capacity(word.len());

    for (i, c) in word.iter().enumerate() {
        let consonant = match c {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !mask[i - 1],
            _ => true,
        };
        mask.push(consonant);
    }

    mask
}

/// Whether the last character is a consonant
fn ends_consonant(word: &[char]) -> bool {
    consonant_mask(word).last().copied().unwrap_or(false)
}

/// Number of vowel-sequence to consonant-sequence transitions, `m` in [C](VC){m}[V]
fn measure(stem: &[char]) -> usize {
    let mut m = 0;
    let mut previous_is_vowel = false;

    for consonant in consonant_mask(stem) {
        if consonant && previous_is_vowel {
            m += 1;
        }
        previous_is_vowel = !consonant;
    }

    m
}

fn has_positive_measure(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn measure_above_one(stem: &[char]) -> bool {
    measure(stem) > 1
}

fn contains_vowel(stem: &[char]) -> bool {
    consonant_mask(stem).contains(&false)
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && ends_consonant(word)
}

fn ends_cvc(word: &[char]) -> bool {
    let mask = consonant_mask(word);

    match (word, mask.as_slice()) {
        ([.., last], [.., true, false, true]) => !matches!(last, 'w' | 'x' | 'y'),
        (_, [false, true]) => true,
        _ => false,
    }
}

fn ends_with(word: &[char], suffix: &str) -> bool {
    let n = suffix.chars().count();
    word.len() >= n && word[word.len() - n..].iter().copied().eq(suffix.chars())
}

fn replace_suffix(word: &[char], suffix: &str, replacement: &str) -> Vec<char> {
    let keep = word.len() - suffix.chars().count();
    word[..keep].iter().copied().chain(replacement.chars()).collect()
}

/// Apply the first rule whose suffix matches. A matching rule whose
/// condition fails stops the search and leaves the word unchanged.
fn apply_rules(word: Vec<char>, rules: &[Rule<'_>]) -> Vec<char> {
    for rule in rules {
        if ends_with(&word, rule.suffix) {
            let stem = &word[..word.len() - rule.suffix.chars().count()];
            if (rule.condition)(stem) {
                return replace_suffix(&word, rule.suffix, rule.replacement);
            }
            return word;
        }
    }

    word
}

fn always(_: &[char]) -> bool {
    true
}

fn step1a(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "ies") && word.len() == 4 {
        return replace_suffix(&word, "ies", "ie");
    }

    apply_rules(
        word,
        &[
            rule("sses", "ss", &always),
            rule("ies", "i", &always),
            rule("ss", "ss", &always),
            rule("s", "", &always),
        ],
    )
}

fn step1b(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        return replace_suffix(&word, "ied", replacement);
    }

    if ends_with(&word, "eed") {
        let stem = &word[..word.len() - 3];
        if measure(stem) > 0 {
            return replace_suffix(&word, "eed", "ee");
        }
        return word;
    }

    let mut stem = None;
    for suffix in ["ed", "ing"] {
        if ends_with(&word, suffix) {
            let candidate = replace_suffix(&word, suffix, "");
            if contains_vowel(&candidate) {
                stem = Some(candidate);
                break;
            }
        }
    }

    let Some(mut stem) = stem else {
        return word;
    };

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if ends_with(&stem, suffix) {
            return replace_suffix(&stem, suffix, replacement);
        }
    }

    if ends_double_consonant(&stem) {
        if !matches!(stem[stem.len() - 1], 'l' | 's' | 'z') {
            stem.pop();
        }
        return stem;
    }

    if measure(&stem) == 1 && ends_cvc(&stem) {
        stem.push('e');
    }

    stem
}

fn step1c(word: Vec<char>) -> Vec<char> {
    let preceded_by_consonant =
        |stem: &[char]| stem.len() > 1 && ends_consonant(stem);

    apply_rules(word, &[rule("y", "i", &preceded_by_consonant)])
}

fn step2(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "alli") && has_positive_measure(&word[..word.len() - 4]) {
        return step2(replace_suffix(&word, "alli", "al"));
    }

    // the 'l' of 'logi' stays with the stem so short stems like 'geo' qualify
    let logi_stem = word[..word.len().saturating_sub(3)].to_vec();
    let logi_condition = move |_: &[char]| has_positive_measure(&logi_stem);

    apply_rules(
        word,
        &[
            rule("ational", "ate", &has_positive_measure),
            rule("tional", "tion", &has_positive_measure),
            rule("enci", "ence", &has_positive_measure),
            rule("anci", "ance", &has_positive_measure),
            rule("izer", "ize", &has_positive_measure),
            rule("bli", "ble", &has_positive_measure),
            rule("alli", "al", &has_positive_measure),
            rule("entli", "ent", &has_positive_measure),
            rule("eli", "e", &has_positive_measure),
            rule("ousli", "ous", &has_positive_measure),
            rule("ization", "ize", &has_positive_measure),
            rule("ation", "ate", &has_positive_measure),
            rule("ator", "ate", &has_positive_measure),
            rule("alism", "al", &has_positive_measure),
            rule("iveness", "ive", &has_positive_measure),
            rule("fulness", "ful", &has_positive_measure),
            rule("ousness", "ous", &has_positive_measure),
            rule("aliti", "al", &has_positive_measure),
            rule("iviti", "ive", &has_positive_measure),
            rule("biliti", "ble", &has_positive_measure),
            rule("fulli", "ful", &has_positive_measure),
            rule("logi", "log", &logi_condition),
        ],
    )
}

fn step3(word: Vec<char>) -> Vec<char> {
    apply_rules(
        word,
        &[
            rule("icate", "ic", &has_positive_measure),
            rule("ative", "", &has_positive_measure),
            rule("alize", "al", &has_positive_measure),
            rule("iciti", "ic", &has_positive_measure),
            rule("ical", "ic", &has_positive_measure),
            rule("ful", "", &has_positive_measure),
            rule("ness", "", &has_positive_measure),
        ],
    )
}

fn step4(word: Vec<char>) -> Vec<char> {
    let ion_condition = |stem: &[char]| {
        measure(stem) > 1 && matches!(stem.last(), Some('s') | Some('t'))
    };

    apply_rules(
        word,
        &[
            rule("al", "", &measure_above_one),
            rule("ance", "", &measure_above_one),
            rule("ence", "", &measure_above_one),
            rule("er", "", &measure_above_one),
            rule("ic", "", &measure_above_one),
            rule("able", "", &measure_above_one),
            rule("ible", "", &measure_above_one),
            rule("ant", "", &measure_above_one),
            rule("ement", "", &measure_above_one),
            rule("ment", "", &measure_above_one),
            rule("ent", "", &measure_above_one),
            rule("ion", "", &ion_condition),
            rule("ou", "", &measure_above_one),
            rule("ism", "", &measure_above_one),
            rule("ate", "", &measure_above_one),
            rule("iti", "", &measure_above_one),
            rule("ous", "", &measure_above_one),
            rule("ive", "", &measure_above_one),
            rule("ize", "", &measure_above_one),
        ],
    )
}

fn step5a(word: Vec<char>) -> Vec<char> {
    if word.last() == Some(&'e') {
        let stem = &word[..word.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_vec();
        }
    }

    word
}

fn step5b(word: Vec<char>) -> Vec<char> {
    let long_enough = measure(&word[..word.len().saturating_sub(1)]) > 1;
    let condition = move |_: &[char]| long_enough;

    apply_rules(word, &[rule("ll", "l", &condition)])
}
