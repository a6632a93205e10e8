//! Keyword extraction.
//!
//! Keeps dense-script runs (Hangul, kana, CJK ideographs) of at least 2
//! characters and ASCII Latin runs of at least 3 letters, lowercased. Digits,
//! punctuation and whitespace separate runs. Stop words are discarded.

use std::collections::BTreeSet;

/// Particles, pronouns and auxiliaries that carry no topic.
pub const STOP_WORDS: &[&str] = &[
    "은", "는", "이", "가", "을", "를", "에", "의", "와", "과", "도", "로", "으로", "에서", "에게",
    "께", "한테", "더", "또", "그", "저", "그것", "저것", "오늘", "너무", "the", "a", "an", "is", "are", "was",
    "were", "be", "been", "have", "has", "had",
];

const MIN_DENSE_RUN: usize = 2;
const MIN_LATIN_RUN: usize = 3;
const MIN_KEYWORD_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Dense,
    Latin,
    Other,
}

/// True for characters that cost roughly one token or more each (Hangul, kana, CJK ideographs).
pub fn is_dense_char(c: char) -> bool {
    matches!(c,
        '\u{AC00}'..='\u{D7A3}'
        | '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{4E00}'..='\u{9FFF}')
}

fn script_of(c: char) -> Script {
    if is_dense_char(c) {
        Script::Dense
    } else if c.is_ascii_alphabetic() {
        Script::Latin
    } else {
        Script::Other
    }
}

fn flush(run: &mut String, script: Script, out: &mut BTreeSet<String>) {
    let len = run.chars().count();
    let keyword = match script {
        Script::Dense if len >= MIN_DENSE_RUN => Some(run.clone()),
        Script::Latin if len >= MIN_LATIN_RUN => Some(run.to_ascii_lowercase()),
        _ => None,
    };
    run.clear();
    if let Some(keyword) = keyword {
        if keyword.chars().count() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(&keyword.as_str()) {
            out.insert(keyword);
        }
    }
}

/// Extracts the normalized keyword set of `text`.
///
/// The result is a set: repeated words appear once and word order does not matter.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();
    let mut run = String::new();
    let mut run_script = Script::Other;

    for c in text.chars() {
        let script = script_of(c);
        if script != run_script {
            flush(&mut run, run_script, &mut keywords);
            run_script = script;
        }
        if script != Script::Other {
            run.push(c);
        }
    }
    flush(&mut run, run_script, &mut keywords);

    keywords
}
