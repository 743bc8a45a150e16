//! C tokenizer: strip comments/preprocessor lines, normalize whitespace, then
//! scan into a classified token stream. Template subtraction operates on the
//! resulting `Vec<String>` directly — never on a joined string, so matches
//! can never straddle a token boundary.

mod keywords;
mod lexer;

use regex::Regex;
use std::sync::LazyLock;

use crate::config::SensitivityProfile;
use crate::types::TokenStream;

static PREPROCESSOR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#[ \t]*(?:include|define|ifdef|ifndef|endif|undef|if|else|elif|pragma)\b.*$").unwrap()
});
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Tokenize C source text under the given sensitivity profile.
pub fn tokenize(source: &str, profile: &SensitivityProfile) -> TokenStream {
    let mut text = source.to_string();

    if profile.remove_comments {
        text = strip_comments(&text);
    }
    if profile.remove_preprocessor {
        text = PREPROCESSOR_LINE.replace_all(&text, "").to_string();
    }
    if profile.normalize_whitespace {
        text = WHITESPACE_RUN.replace_all(&text, " ").to_string();
        text = BLANK_LINES.replace_all(&text, "\n").to_string();
    }

    TokenStream::new(lexer::scan(&text, profile))
}

/// Strip `//` and `/* ... */` comments, string/char literal aware so a
/// comment marker inside a literal is left untouched.
fn strip_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(len);
    let mut i = 0usize;

    while i < len {
        let c = chars[i];

        if c == '"' || c == '\'' {
            let quote = c;
            out.push(c);
            i += 1;
            while i < len {
                out.push(chars[i]);
                if chars[i] == '\\' && i + 1 < len {
                    i += 1;
                    out.push(chars[i]);
                    i += 1;
                    continue;
                }
                if chars[i] == quote {
                    i += 1;
                    break;
                }
                i += 1;
            }
            continue;
        }

        if c == '/' && i + 1 < len && chars[i + 1] == '/' {
            while i < len && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }

        if c == '/' && i + 1 < len && chars[i + 1] == '*' {
            i += 2;
            while i + 1 < len && !(chars[i] == '*' && chars[i + 1] == '/') {
                if chars[i] == '\n' {
                    out.push('\n');
                }
                i += 1;
            }
            i = (i + 2).min(len);
            continue;
        }

        out.push(c);
        i += 1;
    }

    out
}

/// Remove the first contiguous occurrence of `template`'s tokens from
/// `student`'s tokens. Returns `student` unchanged if `template` does not
/// occur, or is empty.
pub fn subtract_template(student: &TokenStream, template: &TokenStream) -> TokenStream {
    let s = student.as_slice();
    let t = template.as_slice();

    if t.is_empty() || t.len() > s.len() {
        return student.clone();
    }

    for start in 0..=(s.len() - t.len()) {
        if s[start..start + t.len()] == *t {
            let mut spliced = Vec::with_capacity(s.len() - t.len());
            spliced.extend_from_slice(&s[..start]);
            spliced.extend_from_slice(&s[start + t.len()..]);
            return TokenStream::new(spliced);
        }
    }

    student.clone()
}

#[cfg(test)]
#[path = "tokenizer_tests.rs"]
mod tests;
