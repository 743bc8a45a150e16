//! Hand-written forward single-pass scanner.
//!
//! A hand-written state machine avoids engine-specific backtracking quirks
//! and makes the longest-operator-match rule explicit. Classification of
//! identifiers (step 5) happens inline, since it needs only a one-token
//! lookahead and a two-token lookback.

use std::collections::VecDeque;

use crate::config::SensitivityProfile;

use super::keywords::{self, TYPE_CONTEXT_KEYWORDS};

/// Scan already-preprocessed source text into a classified token list.
pub fn scan(code: &str, profile: &SensitivityProfile) -> Vec<String> {
    let chars: Vec<char> = code.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut recent_words: VecDeque<String> = VecDeque::with_capacity(2);
    let mut i = 0usize;

    while i < len {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if let Some(op) = keywords::match_operator(&chars, i) {
            tokens.push(op.to_string());
            i += op.chars().count();
            continue;
        }

        if c.is_ascii_digit() {
            let (text, next_i) = scan_number(&chars, i);
            if profile.ignore_numeric_literals {
                tokens.push("NUM".to_string());
            } else {
                tokens.push(text);
            }
            i = next_i;
            continue;
        }

        if c == '"' || c == '\'' {
            let (text, next_i) = scan_literal(&chars, i, c);
            let ignore = if c == '"' {
                profile.ignore_string_literals
            } else {
                profile.ignore_string_literals
            };
            if ignore {
                tokens.push("STR".to_string());
            } else {
                tokens.push(text);
            }
            i = next_i;
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let (word, next_i) = scan_identifier(&chars, i);
            let lower = word.to_lowercase();

            if keywords::is_keyword(&word) {
                tokens.push(word.to_uppercase());
                push_recent(&mut recent_words, lower);
            } else {
                let next_non_space = peek_next_non_space(&chars, next_i);
                let is_function = next_non_space == Some('(');
                let is_type = !is_function
                    && recent_words
                        .iter()
                        .any(|w| TYPE_CONTEXT_KEYWORDS.contains(&w.as_str()));

                let should_normalize = if is_function {
                    profile.ignore_function_names
                } else if is_type {
                    profile.ignore_type_names
                } else {
                    profile.ignore_variable_names
                };

                if should_normalize {
                    tokens.push("ID".to_string());
                } else {
                    tokens.push(word);
                }
                push_recent(&mut recent_words, lower);
            }
            i = next_i;
            continue;
        }

        // Unrecognized byte — skip, robust to stray punctuation.
        i += 1;
    }

    tokens
}

fn push_recent(recent: &mut VecDeque<String>, word: String) {
    if recent.len() == 2 {
        recent.pop_front();
    }
    recent.push_back(word);
}

fn peek_next_non_space(chars: &[char], mut i: usize) -> Option<char> {
    while i < chars.len() {
        if !chars[i].is_whitespace() {
            return Some(chars[i]);
        }
        i += 1;
    }
    None
}

fn scan_identifier(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

/// Hex, octal, decimal, and float-with-exponent number literals.
fn scan_number(chars: &[char], start: usize) -> (String, usize) {
    let mut i = start;

    if chars[i] == '0' && i + 1 < chars.len() && (chars[i + 1] == 'x' || chars[i + 1] == 'X') {
        i += 2;
        while i < chars.len() && chars[i].is_ascii_hexdigit() {
            i += 1;
        }
        return (chars[start..i].iter().collect(), i);
    }

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }

    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    (chars[start..i].iter().collect(), i)
}

/// String or character literal with escaped-quote handling.
fn scan_literal(chars: &[char], start: usize, quote: char) -> (String, usize) {
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == '\\' && i + 1 < chars.len() {
            i += 2;
            continue;
        }
        if chars[i] == quote {
            i += 1;
            break;
        }
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}
