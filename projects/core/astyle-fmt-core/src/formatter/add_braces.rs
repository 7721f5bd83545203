//! Brace insertion for single-line header bodies (`add-braces`).
//!
//! Runs on the token stream before reformatting: a body such as `if (x) y;` gets a synthetic
//! `{` in front of it and a synthetic `}` on the next line, and is then formatted like any
//! other block.

use super::keywords::is_header;
use crate::lexer::{Token, TokenKind};
use alloc::vec::Vec;

fn next_code(tokens: &[Token], index: usize) -> Option<usize> {
    (index + 1..tokens.len()).find(|&i| !tokens[i].is_trivia())
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.is("(") {
            depth += 1;
        } else if token.is(")") {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// Index of the last token of a braceless body starting at `body`, if it is a single
/// statement on one line.
fn single_line_body(tokens: &[Token], body: usize) -> Option<usize> {
    let first = &tokens[body];
    if first.is("{")
        || first.is(";")
        || (first.kind == TokenKind::Word && is_header(first.text))
    {
        return None;
    }

    let mut depth = 0usize;
    let mut end = None;
    for (index, token) in tokens.iter().enumerate().skip(body) {
        if index > body && token.newlines_before > 0 {
            return None;
        }
        match token.kind {
            TokenKind::Preprocessor => return None,
            TokenKind::Punct => match token.text {
                "(" | "[" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                "{" | "}" if depth == 0 => return None,
                ";" if depth == 0 => {
                    end = Some(index);
                    break;
                }
                _ => {}
            },
            _ => {}
        }
    }

    // A comment trailing the statement stays inside the new block.
    let end = end?;
    match tokens.get(end + 1) {
        Some(next) if next.kind == TokenKind::LineComment && next.newlines_before == 0 => {
            Some(end + 1)
        }
        _ => Some(end),
    }
}

pub(super) fn add_braces(tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    let mut opens = Vec::new();
    let mut closes = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::Word {
            continue;
        }
        let body = match token.text {
            "if" | "for" | "while" | "foreach" => next_code(&tokens, index)
                .filter(|&open| tokens[open].is("("))
                .and_then(|open| matching_paren(&tokens, open))
                .and_then(|close| next_code(&tokens, close)),
            "else" => next_code(&tokens, index).filter(|&next| !tokens[next].is_word("if")),
            _ => None,
        };
        if let Some((body, end)) = body.and_then(|body| Some((body, single_line_body(&tokens, body)?))) {
            opens.push(body);
            closes.push(end);
        }
    }
    if opens.is_empty() {
        return tokens;
    }
    closes.sort_unstable();
    tracing::debug!(blocks = opens.len(), "adding braces");

    let mut out = Vec::with_capacity(tokens.len() + opens.len() * 2);
    let mut opens = opens.into_iter().peekable();
    let mut closes = closes.into_iter().peekable();
    for (index, token) in tokens.into_iter().enumerate() {
        while opens.next_if_eq(&index).is_some() {
            out.push(Token::synthetic("{", 0));
        }
        out.push(token);
        while closes.next_if_eq(&index).is_some() {
            out.push(Token::synthetic("}", 1));
        }
    }
    out
}
