//! Token substitution for literal section bodies.
//!
//! `{{TOKEN}}` is replaced with the token's value; whitespace inside the braces
//! is ignored. Placeholders that cannot be resolved (unknown name, or a known
//! token whose field is absent) stay in the text verbatim and are reported.
//! `\{{` emits a literal `{{`. An unclosed `{{` is emitted as-is.

use crate::models::locality::LocalityDataset;
use crate::models::subject::SubjectProfile;
use crate::render::tokens::Token;

/// Borrowed view of everything a token can resolve against.
#[derive(Debug, Clone, Copy)]
pub struct TokenContext<'a> {
    pub subject: &'a SubjectProfile,
    pub locality: &'a LocalityDataset,
    pub base_url: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    /// Unresolved token names, first-seen order, no duplicates.
    pub missing_tokens: Vec<String>,
}

pub fn substitute(text: &str, ctx: &TokenContext<'_>) -> Substitution {
    let mut out = String::with_capacity(text.len());
    let mut missing_tokens: Vec<String> = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'{') {
            chars.next();
            if chars.peek() == Some(&'{') {
                chars.next();
                out.push_str("{{");
            } else {
                out.push_str("\\{");
            }
            continue;
        }

        if c != '{' || chars.peek() != Some(&'{') {
            out.push(c);
            continue;
        }
        chars.next();

        let mut raw_name = String::new();
        let mut closed = false;
        while let Some(ch) = chars.next() {
            if ch == '}' && chars.peek() == Some(&'}') {
                chars.next();
                closed = true;
                break;
            }
            raw_name.push(ch);
        }

        if !closed {
            out.push_str("{{");
            out.push_str(&raw_name);
            break;
        }

        let name = raw_name.trim();
        let value = Token::from_name(name)
            .and_then(|token| token.value(ctx.subject, ctx.locality, ctx.base_url));

        match value {
            Some(v) => out.push_str(&v),
            None => {
                out.push_str("{{");
                out.push_str(name);
                out.push_str("}}");
                if !missing_tokens.iter().any(|m| m == name) {
                    missing_tokens.push(name.to_string());
                }
            }
        }
    }

    Substitution {
        text: out,
        missing_tokens,
    }
}
