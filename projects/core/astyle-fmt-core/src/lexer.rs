//! Tokenizer for C-family sources
//!
//! The tokenizer never fails. Bytes it does not understand become single character
//! [`TokenKind::Punct`] tokens and unterminated literals or comments simply run to the end
//! of the input.
//!
//! Each token remembers the whitespace in front of it on its own line and how many line
//! breaks separate it from the previous token, which is all the reformatter needs to
//! preserve spacing it has no reason to change.

use crate::options::{LineEnd, SourceMode};
use alloc::vec::Vec;

/// What a [`Token`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Word,
    /// Numeric literal.
    Number,
    /// String literal, including raw and verbatim strings with their prefix.
    Str,
    /// Character literal.
    Char,
    /// `// ...` up to, not including, the line break.
    LineComment,
    /// `/* ... */`, possibly spanning lines.
    BlockComment,
    /// A whole preprocessor line, with any `\` continuations.
    Preprocessor,
    /// Operator or punctuation.
    Punct,
}

/// A token and the whitespace that preceded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// What the token is.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: &'a str,
    /// Line breaks between the previous token and this one.
    pub newlines_before: usize,
    /// Whitespace between this token and the previous token or the start of its line.
    pub space_before: &'a str,
    /// Visual column the token started at in the input.
    pub column: usize,
    /// Inserted by the reformatter rather than read from the input.
    pub synthetic: bool,
}

impl<'a> Token<'a> {
    pub(crate) fn synthetic(text: &'static str, newlines_before: usize) -> Self {
        Token {
            kind: TokenKind::Punct,
            text,
            newlines_before,
            space_before: " ",
            column: 0,
            synthetic: true,
        }
    }

    /// Whether this token is the punctuation `text`.
    #[inline]
    pub fn is(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    /// Whether this token is the identifier or keyword `word`.
    #[inline]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text == word
    }

    /// Comments and preprocessor lines, which do not take part in statements.
    #[inline]
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Preprocessor
        )
    }
}

/// Result of tokenizing a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed<'a> {
    /// The tokens in input order.
    pub tokens: Vec<Token<'a>>,
    /// Line breaks after the last token.
    pub trailing_newlines: usize,
    /// The first line ending found in the input.
    pub line_end: Option<LineEnd>,
}

const MULTI_CHAR_PUNCT: &[&str] = &[
    "<<=", ">>=", "->*", "...", "<=>", "::", "->", "++", "--", "<<", ">>", "<=", ">=", "==",
    "!=", "&&", "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", ".*",
];

const RAW_STRING_PREFIXES: &[&str] = &["R", "LR", "uR", "UR", "u8R"];

/// Splits `source` into tokens.
///
/// `tab_width` is used to compute visual columns.
pub fn tokenize(source: &str, mode: SourceMode, tab_width: usize) -> Lexed<'_> {
    Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        mode,
        tab_width: tab_width.max(1),
        line_start: 0,
        at_line_start: true,
        line_end: None,
    }
    .run()
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    mode: SourceMode,
    tab_width: usize,
    line_start: usize,
    at_line_start: bool,
    line_end: Option<LineEnd>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Lexed<'a> {
        let mut tokens = Vec::new();
        loop {
            let (newlines, space_start) = self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                return Lexed {
                    tokens,
                    trailing_newlines: newlines,
                    line_end: self.line_end,
                };
            }

            let start = self.pos;
            // Taken before scanning: a token may span lines and move `line_start`.
            let column = visual_width(&self.source[self.line_start..start], self.tab_width);
            let kind = self.scan_token();
            tokens.push(Token {
                kind,
                text: &self.source[start..self.pos],
                newlines_before: newlines,
                space_before: &self.source[space_start..start],
                column,
                synthetic: false,
            });
            self.at_line_start = false;
        }
    }

    #[inline]
    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Consumes a line break at the current position, if any.
    fn eat_newline(&mut self) -> bool {
        let ending = match (self.peek(0), self.peek(1)) {
            (Some(b'\r'), Some(b'\n')) => LineEnd::Windows,
            (Some(b'\n'), _) => LineEnd::Linux,
            (Some(b'\r'), _) => LineEnd::MacOld,
            _ => return false,
        };
        self.pos += ending.as_str().len();
        self.line_end.get_or_insert(ending);
        self.line_start = self.pos;
        self.at_line_start = true;
        true
    }

    /// Returns the line breaks skipped and where the last line's whitespace starts.
    fn skip_whitespace(&mut self) -> (usize, usize) {
        let mut newlines = 0;
        let mut space_start = self.pos;
        while self.pos < self.bytes.len() {
            if self.eat_newline() {
                newlines += 1;
                space_start = self.pos;
                continue;
            }
            match self.bytes[self.pos] {
                b' ' | b'\t' | 0x0b | 0x0c => self.pos += 1,
                _ => break,
            }
        }
        (newlines, space_start)
    }

    fn scan_token(&mut self) -> TokenKind {
        let c = self.bytes[self.pos];
        match c {
            b'#' if self.at_line_start && self.mode.has_preprocessor() => {
                self.scan_preprocessor();
                TokenKind::Preprocessor
            }
            b'/' if self.peek(1) == Some(b'/') => {
                self.skip_to_line_end();
                TokenKind::LineComment
            }
            b'/' if self.peek(1) == Some(b'*') => {
                self.pos += 2;
                self.skip_block_comment();
                TokenKind::BlockComment
            }
            b'"' => {
                self.pos += 1;
                self.skip_quoted(b'"');
                TokenKind::Str
            }
            b'\'' => {
                self.pos += 1;
                self.skip_quoted(b'\'');
                TokenKind::Char
            }
            b'@' if self.peek(1) == Some(b'"') && self.mode == SourceMode::CSharp => {
                self.pos += 2;
                self.skip_verbatim_string();
                TokenKind::Str
            }
            b'0'..=b'9' => {
                self.scan_number();
                TokenKind::Number
            }
            b'.' if self.peek(1).is_some_and(|d| d.is_ascii_digit()) => {
                self.scan_number();
                TokenKind::Number
            }
            c if is_word_start(c) => self.scan_word(),
            _ => {
                self.scan_punct();
                TokenKind::Punct
            }
        }
    }

    fn skip_to_line_end(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == b'\n' || c == b'\r' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            if !self.eat_newline() {
                self.pos += 1;
            }
        }
    }

    fn scan_preprocessor(&mut self) {
        while let Some(c) = self.peek(0) {
            match c {
                b'\n' | b'\r' => {
                    if !self.continues_line() {
                        return;
                    }
                    self.eat_newline();
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    self.pos += 2;
                    self.skip_block_comment();
                }
                b'/' if self.peek(1) == Some(b'/') => self.skip_to_line_end(),
                _ => self.pos += 1,
            }
        }
    }

    /// Whether the text before the line break at `pos` ends in a `\` continuation.
    fn continues_line(&self) -> bool {
        self.source[self.line_start..self.pos]
            .trim_end_matches([' ', '\t'])
            .ends_with('\\')
    }

    fn skip_quoted(&mut self, quote: u8) {
        while let Some(c) = self.peek(0) {
            match c {
                b'\\' => {
                    self.pos += 1;
                    if !self.eat_newline() && self.pos < self.bytes.len() {
                        self.pos += 1;
                    }
                }
                b'\n' | b'\r' => return,
                c if c == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_verbatim_string(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == b'"' {
                if self.peek(1) == Some(b'"') {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
                return;
            }
            if !self.eat_newline() {
                self.pos += 1;
            }
        }
    }

    /// Raw string body after the opening quote: `delim( ... )delim"`.
    fn skip_raw_string(&mut self) {
        let delimiter_start = self.pos;
        while let Some(c) = self.peek(0) {
            if c == b'(' {
                break;
            }
            if c == b'"' || c == b'\n' || c == b'\\' || c == b' ' {
                // Not a raw string after all, lex the rest as an ordinary literal.
                self.skip_quoted(b'"');
                return;
            }
            self.pos += 1;
        }
        let delimiter = &self.source[delimiter_start..self.pos];
        while self.pos < self.bytes.len() {
            let rest = &self.source[self.pos..];
            if rest.starts_with(')')
                && rest[1..].starts_with(delimiter)
                && rest[1 + delimiter.len()..].starts_with('"')
            {
                self.pos += delimiter.len() + 2;
                return;
            }
            if !self.eat_newline() {
                self.pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    fn scan_number(&mut self) {
        let start = self.pos;
        let hex = self.source[start..].starts_with("0x") || self.source[start..].starts_with("0X");
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            let previous = self.bytes[self.pos - 1];
            let exponent = if hex {
                matches!(previous, b'p' | b'P')
            } else {
                matches!(previous, b'e' | b'E' | b'p' | b'P')
            };
            match c {
                b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'.' => self.pos += 1,
                b'+' | b'-' if exponent => self.pos += 1,
                b'\'' if previous.is_ascii_alphanumeric()
                    && self.peek(1).is_some_and(|d| d.is_ascii_alphanumeric()) =>
                {
                    self.pos += 1
                }
                _ => break,
            }
        }
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_word_continue(self.bytes[self.pos]) {
            self.pos += 1;
        }
        let word = &self.source[start..self.pos];
        if self.peek(0) == Some(b'"') && self.mode == SourceMode::C {
            if RAW_STRING_PREFIXES.contains(&word) {
                self.pos += 1;
                self.skip_raw_string();
                return TokenKind::Str;
            }
        }
        TokenKind::Word
    }

    fn scan_punct(&mut self) {
        let rest = &self.source[self.pos..];
        if let Some(punct) = MULTI_CHAR_PUNCT.iter().find(|p| rest.starts_with(**p)) {
            self.pos += punct.len();
            return;
        }
        self.pos += rest.chars().next().map_or(1, char::len_utf8);
    }
}

#[inline]
fn is_word_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$' || c >= 0x80
}

#[inline]
fn is_word_continue(c: u8) -> bool {
    is_word_start(c) || c.is_ascii_digit()
}

/// Width of `text` in columns when tabs advance to the next multiple of `tab_width`.
pub(crate) fn visual_width(text: &str, tab_width: usize) -> usize {
    advance_column(0, text, tab_width)
}

/// Column reached after writing `text` starting at `column`.
pub(crate) fn advance_column(column: usize, text: &str, tab_width: usize) -> usize {
    text.chars().fold(column, |column, c| match c {
        '\t' => (column / tab_width + 1) * tab_width,
        _ => column + 1,
    })
}
