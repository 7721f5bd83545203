//! Output line buffer.
//!
//! Lines are kept as indentation plus text until [`LineWriter::finish`], so the reformatter
//! can keep appending to the last line and ask what it ends with.

use super::state::Indent;
use crate::lexer::{advance_column, visual_width, TokenKind};
use crate::options::{IndentKind, LineEnd};
use alloc::string::String;
use alloc::vec::Vec;

#[derive(Debug, Default)]
struct Line {
    indent: Indent,
    text: String,
    /// Trailing whitespace may be removed.
    trim: bool,
    has_code: bool,
    line_comment: bool,
    preprocessor: bool,
}

impl Line {
    fn new(indent: Indent) -> Self {
        Line {
            indent,
            trim: true,
            ..Line::default()
        }
    }
}

pub(crate) struct LineWriter {
    lines: Vec<Line>,
    kind: IndentKind,
    width: usize,
}

impl LineWriter {
    pub fn new(kind: IndentKind, width: usize) -> Self {
        LineWriter {
            lines: Vec::new(),
            kind,
            width,
        }
    }

    /// Nothing written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn new_line(&mut self, indent: Indent, blank_lines: usize) {
        for _ in 0..blank_lines {
            self.lines.push(Line::new(Indent::ZERO));
        }
        self.lines.push(Line::new(indent));
    }

    fn current(&mut self) -> &mut Line {
        if self.lines.is_empty() {
            self.lines.push(Line::new(Indent::ZERO));
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn current_indent(&self) -> Indent {
        self.lines.last().map_or(Indent::ZERO, |line| line.indent)
    }

    /// Visual column at the end of the current line.
    pub fn column(&self) -> usize {
        self.lines.last().map_or(0, |line| {
            advance_column(line.indent.columns(self.width), &line.text, self.width)
        })
    }

    /// Whether code may be appended to the current line.
    pub fn can_join(&self) -> bool {
        self.lines
            .last()
            .is_some_and(|line| line.has_code && !line.line_comment && !line.preprocessor)
    }

    /// The current line holds only comments.
    pub fn comment_only(&self) -> bool {
        self.lines
            .last()
            .is_some_and(|line| !line.has_code && !line.text.is_empty())
    }

    pub fn space(&mut self, gap: &str) {
        self.current().text.push_str(gap);
    }

    /// Appends `gap` with its tabs replaced by the spaces they stood for.
    pub fn space_expanded(&mut self, gap: &str) {
        let width = self.width;
        let mut column = self.column();
        let line = self.current();
        for c in gap.chars() {
            if c == '\t' {
                let next = (column / width + 1) * width;
                for _ in column..next {
                    line.text.push(' ');
                }
                column = next;
            } else {
                line.text.push(c);
                column += 1;
            }
        }
    }

    /// Appends a token's text. Text spanning lines continues on new output lines:
    /// block comments shifted by `comment_shift` columns, everything else verbatim.
    pub fn push(&mut self, text: &str, kind: TokenKind, comment_shift: isize) {
        let width = self.width;
        let mut pieces = split_lines(text);
        let first = pieces.next().unwrap_or_default();
        self.current().text.push_str(first);

        for piece in pieces {
            let line = match kind {
                TokenKind::BlockComment => {
                    let content = piece.trim_start_matches([' ', '\t']);
                    let old = visual_width(&piece[..piece.len() - content.len()], width);
                    let shifted = (old as isize + comment_shift).max(0) as usize;
                    Line {
                        text: String::from(content),
                        ..Line::new(Indent::spaces(shifted))
                    }
                }
                TokenKind::Preprocessor => Line {
                    text: String::from(piece),
                    preprocessor: true,
                    ..Line::new(Indent::ZERO)
                },
                _ => {
                    self.current().trim = false;
                    Line {
                        text: String::from(piece),
                        trim: false,
                        ..Line::new(Indent::ZERO)
                    }
                }
            };
            self.lines.push(line);
        }

        let line = self.current();
        match kind {
            TokenKind::LineComment => line.line_comment = true,
            TokenKind::BlockComment => {}
            TokenKind::Preprocessor => line.preprocessor = true,
            _ => line.has_code = true,
        }
    }

    /// Joins the lines into the final text.
    pub fn finish(self, line_end: LineEnd, trailing_newlines: usize) -> String {
        let line_end = line_end.as_str();
        let mut out = String::new();
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                out.push_str(line_end);
            }
            let text = if line.trim {
                line.text.trim_end_matches([' ', '\t'])
            } else {
                line.text.as_str()
            };
            if !text.is_empty() {
                self.render_indent(line.indent, &mut out);
            }
            out.push_str(text);
        }
        for _ in 0..trailing_newlines {
            out.push_str(line_end);
        }
        out
    }

    fn render_indent(&self, indent: Indent, out: &mut String) {
        let (tabs, spaces) = match self.kind {
            IndentKind::Spaces => (0, indent.columns(self.width)),
            IndentKind::Tab => (indent.levels, indent.spaces),
            IndentKind::ForceTab => {
                let columns = indent.columns(self.width);
                (columns / self.width, columns % self.width)
            }
        };
        out.extend(core::iter::repeat('\t').take(tabs));
        out.extend(core::iter::repeat(' ').take(spaces));
    }
}

/// Splits on `\r\n`, `\n` and `\r`.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    core::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(at) => {
                let skip = if current[at..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[at + skip..]);
                Some(&current[..at])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}
