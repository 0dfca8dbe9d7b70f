//! Answer grading.
//!
//! Decides whether a learner's free-text response counts as correct before the
//! outcome reaches the scheduler. Comparison is lenient on accents, casing,
//! punctuation and whitespace, but not on the words themselves.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::Question;

/// Normalize a string for answer comparison.
///
/// Works on the NFD decomposition of the lowercased input, one character at a time:
/// - combining marks are dropped, so `"Perché"` matches `"perche"`
/// - apostrophes are dropped, so the elided `"l'offerta"` matches `"lofferta"`
///   whether it was typed with `'` or `’`
/// - ligatures are expanded (`ß` -> `ss`, `æ` -> `ae`, `œ` -> `oe`)
/// - any other non-alphanumeric character separates words
///
/// Words are then joined by single spaces. `"costo"` and `"costi"` still differ.
pub fn normalize_for_comparison(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for c in s.to_lowercase().nfd() {
        match c {
            '\'' | '\u{2019}' | '`' => {}
            'ß' => folded.push_str("ss"),
            'æ' => folded.push_str("ae"),
            'œ' => folded.push_str("oe"),
            c if is_combining_mark(c) => {}
            c if c.is_alphanumeric() => folded.push(c),
            _ => folded.push(' '),
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `response` answers `question` correctly.
///
/// A response is correct when it matches the question's expected answer, or
/// when it names a correct option either by option id or by option text.
/// Empty responses are never correct.
pub fn is_correct(question: &Question, response: &str) -> bool {
    let response = normalize_for_comparison(response);
    if response.is_empty() {
        return false;
    }

    if response == normalize_for_comparison(&question.correct_answer) {
        return true;
    }

    question.options.iter().filter(|o| o.is_correct).any(|option| {
        response == normalize_for_comparison(&option.id)
            || response == normalize_for_comparison(&option.text)
    })
}
