//! Treebank-style English word tokenizer
//!
//! Text is first split into sentences, then each sentence goes through the
//! Penn Treebank rewrite rules (as extended by NLTK): quotes, punctuation,
//! brackets and dashes are padded with spaces, clitics such as `n't` and `'s`
//! are detached and a handful of fused contractions (`cannot`, `gonna`, ...)
//! are split. The padded sentence is finally split on whitespace.
//!
//! Every rule is compiled once when the tokenizer is built.

use regex::{Captures, Regex};
use std::fmt;

use crate::error::{Result, StartupError};

/// Words that take a period without ending a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "ft", "vs", "etc", "e.g",
    "i.e", "cf", "inc", "ltd", "co", "corp", "dept", "univ", "est", "approx", "jan",
    "feb", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "u.s",
    "u.k", "a.m", "p.m",
];

/// Opening quotes and brackets stripped before the abbreviation lookup
const OPENERS: &[char] = &['"', '\'', '(', '[', '{', '<', '`', '“', '‘', '«'];

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            replacement,
        })
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| StartupError::Resource(format!("tokenizer rule '{}': {}", pattern, e)))
}

/// Language-aware word segmentation for English
pub struct WordTokenizer {
    sentence_end: Regex,
    starting_quotes: Vec<Rule>,
    lone_apostrophe: Regex,
    punctuation: Vec<Rule>,
    brackets: Rule,
    double_dashes: Rule,
    ending_quotes: Vec<Rule>,
    contractions: Vec<Rule>,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            sentence_end: compile(r#"([.?!]+["'”’)\]]*)\s+"#)?,
            starting_quotes: vec![
                Rule::new(r"([«“‘„]|`+)", " ${1} ")?,
                Rule::new(r#"^""#, "``")?,
                Rule::new(r"(``)", " ${1} ")?,
                Rule::new(r#"([ (\[{<])("|'')"#, "${1} `` ")?,
            ],
            lone_apostrophe: compile(r"'(\w)\b")?,
            punctuation: vec![
                Rule::new(r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2} ${3} ")?,
                Rule::new(r"([:,])([^\d])", " ${1} ${2}")?,
                Rule::new(r"([:,])$", " ${1} ")?,
                Rule::new(r"\.{2,}", " ${0} ")?,
                Rule::new(r"[;@#$%&]", " ${0} ")?,
                Rule::new(r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2}${3} ")?,
                Rule::new(r"[?!]", " ${0} ")?,
                Rule::new(r"([^'])' ", "${1} ' ")?,
                Rule::new(r"[*]", " ${0} ")?,
            ],
            brackets: Rule::new(r"[\]\[(){}<>]", " ${0} ")?,
            double_dashes: Rule::new(r"--", " -- ")?,
            ending_quotes: vec![
                Rule::new(r"([»”’])", " ${1} ")?,
                Rule::new(r"''", " '' ")?,
                Rule::new(r#"""#, " '' ")?,
                Rule::new(r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} ")?,
                Rule::new(r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} ")?,
            ],
            contractions: vec![
                Rule::new(r"(?i)\b(can)(not)\b", " ${1} ${2} ")?,
                Rule::new(r"(?i)\b(d)('ye)\b", " ${1} ${2} ")?,
                Rule::new(r"(?i)\b(gim)(me)\b", " ${1} ${2} ")?,
                Rule::new(r"(?i)\b(gon)(na)\b", " ${1} ${2} ")?,
                Rule::new(r"(?i)\b(got)(ta)\b", " ${1} ${2} ")?,
                Rule::new(r"(?i)\b(lem)(me)\b", " ${1} ${2} ")?,
                Rule::new(r"(?i)\b(more)('n)\b", " ${1} ${2} ")?,
                Rule::new(r"(?i)\b(wan)(na)(\s)", " ${1} ${2} ${3}")?,
                Rule::new(r"(?i) ('t)(is)\b", " ${1} ${2} ")?,
                Rule::new(r"(?i) ('t)(was)\b", " ${1} ${2} ")?,
            ],
        })
    }

    /// Split text into word tokens, sentence by sentence
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.sentences(text)
            .into_iter()
            .flat_map(|sentence| self.tokenize_sentence(sentence))
            .collect()
    }

    /// Split text into trimmed, non-empty sentences
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for caps in self.sentence_end.captures_iter(text) {
            let (Some(whole), Some(terminator)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            if terminator.as_str().starts_with('.')
                && !terminator.as_str().starts_with("..")
                && takes_period(&text[start..terminator.start()])
            {
                continue;
            }

            push_trimmed(&mut sentences, &text[start..terminator.end()]);
            start = whole.end();
        }

        push_trimmed(&mut sentences, &text[start..]);
        sentences
    }

    fn tokenize_sentence(&self, sentence: &str) -> Vec<String> {
        let mut text = sentence.to_string();

        for rule in &self.starting_quotes {
            text = rule.apply(&text);
        }
        text = self.split_lone_apostrophes(&text);

        for rule in &self.punctuation {
            text = rule.apply(&text);
        }

        text = self.brackets.apply(&text);
        text = self.double_dashes.apply(&text);

        let mut text = format!(" {} ", text);

        for rule in &self.ending_quotes {
            text = rule.apply(&text);
        }
        for rule in &self.contractions {
            text = rule.apply(&text);
        }

        text.split_whitespace().map(str::to_string).collect()
    }

    /// `'x` where x is a single word character other than a clitic letter
    fn split_lone_apostrophes(&self, text: &str) -> String {
        self.lone_apostrophe
            .replace_all(text, |caps: &Captures| {
                let letter = &caps[1];
                if matches!(
                    letter,
                    "m" | "t" | "s" | "d" | "n" | "M" | "T" | "S" | "D" | "N"
                ) {
                    caps[0].to_string()
                } else {
                    format!("' {}", letter)
                }
            })
            .into_owned()
    }
}

impl fmt::Debug for WordTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WordTokenizer")
    }
}

/// Whether the word right before a period is an abbreviation or an initial
fn takes_period(preceding: &str) -> bool {
    let word = preceding
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(OPENERS)
        .to_lowercase();

    let mut chars = word.chars();
    let is_initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic());

    is_initial || ABBREVIATIONS.contains(&word.as_str())
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, sentence: &'a str) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}
