//! The reformatter
//!
//! Formatting is a single pass over the token stream produced by [`crate::lexer`]. For each
//! token the reformatter decides whether it starts a new line (and with which indentation)
//! or continues the current one (and with how much space before it), then updates a small
//! amount of state:
//!
//! - a stack of open braces, each classified as a [`BraceKind`], which drives brace
//!   placement and block indentation;
//! - the statement being formatted in the innermost block, with its open parentheses,
//!   pending header (`if (...)` without a body yet) and the extra indentation owed to
//!   single-statement header bodies;
//! - a snapshot stack for `#if`/`#else`/`#endif`, so both branches of a conditional start
//!   from the same state.
//!
//! Output is collected line by line in a [`writer::LineWriter`].

mod add_braces;
mod braces;
mod indent;
mod keywords;
mod spacing;
mod state;
mod writer;

use crate::lexer::{tokenize, Lexed, Token, TokenKind};
use crate::options::{BraceKind, FormatOptions};
use alloc::string::String;
use alloc::vec::Vec;
use keywords::*;
use spacing::{OpRole, Spacing};
use state::{ClosedBrace, Conditional, Indent, OpenParen, State};
use writer::LineWriter;

/// Formats `source` according to `options`.
///
/// Formatting cannot fail: anything the reformatter does not understand keeps its original
/// spacing. The output ends with a line break only if the input did.
pub fn format_source(source: &str, options: &FormatOptions) -> String {
    let Lexed {
        tokens,
        trailing_newlines,
        line_end,
    } = tokenize(source, options.mode, options.indent_width);
    let line_end = options.line_end.or(line_end).unwrap_or_default();
    let tokens = if options.add_braces {
        add_braces::add_braces(tokens)
    } else {
        tokens
    };

    tracing::debug!(
        bytes = source.len(),
        tokens = tokens.len(),
        "formatting source"
    );
    let mut formatter = Formatter::new(options, &tokens);
    formatter.run();
    formatter.out.finish(line_end, trailing_newlines)
}

/// Where a token goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    NewLine { indent: Indent, blank_lines: usize },
    SameLine(Spacing),
}

struct Formatter<'f, 'a> {
    options: &'f FormatOptions,
    tokens: &'f [Token<'a>],
    /// Index of the matching `}` for each `{`.
    matching: Vec<Option<usize>>,
    state: State,
    conditionals: Vec<Conditional>,
    out: LineWriter,
}

impl<'f, 'a> Formatter<'f, 'a> {
    fn new(options: &'f FormatOptions, tokens: &'f [Token<'a>]) -> Self {
        Formatter {
            options,
            tokens,
            matching: braces::match_braces(tokens),
            state: State::default(),
            conditionals: Vec::new(),
            out: LineWriter::new(options.indent_kind, options.indent_width),
        }
    }

    fn run(&mut self) {
        for index in 0..self.tokens.len() {
            let token = self.tokens[index];
            match token.kind {
                TokenKind::Preprocessor => self.preprocessor(index),
                TokenKind::LineComment | TokenKind::BlockComment => self.comment(index),
                TokenKind::Punct if token.text == "{" => self.open_brace(index),
                TokenKind::Punct if token.text == "}" => self.close_brace(index),
                _ => self.code(index),
            }
        }
    }

    fn next_code(&self, index: usize) -> Option<usize> {
        (index + 1..self.tokens.len()).find(|&i| !self.tokens[i].is_trivia())
    }

    fn prev_code(&self, index: usize) -> Option<usize> {
        (0..index).rev().find(|&i| !self.tokens[i].is_trivia())
    }

    fn next_code_is(&self, index: usize, test: impl Fn(&Token) -> bool) -> bool {
        self.next_code(index)
            .is_some_and(|next| test(&self.tokens[next]))
    }

    /// Code tokens of the current statement before `end`.
    fn statement_code(&self, end: usize) -> impl Iterator<Item = &Token<'a>> + '_ {
        let start = self.state.stmt.start.min(end);
        self.tokens[start..end].iter().filter(|t| !t.is_trivia())
    }

    fn in_function(&self) -> bool {
        self.state
            .braces
            .iter()
            .any(|brace| brace.kind == BraceKind::Function)
    }

    /// Inside a block holding statements rather than declarations.
    fn in_code_scope(&self) -> bool {
        self.state.braces.last().is_some_and(|brace| {
            !matches!(
                brace.kind,
                BraceKind::Namespace | BraceKind::Class | BraceKind::Extern | BraceKind::Enum
            )
        })
    }

    /// Inside an enum or initializer list, outside any parentheses.
    fn in_list_block(&self) -> bool {
        self.state.stmt.parens.is_empty()
            && self
                .state
                .braces
                .last()
                .is_some_and(|brace| matches!(brace.kind, BraceKind::Enum | BraceKind::Initializer))
    }

    fn in_kept_line(&self) -> bool {
        self.state.braces.iter().any(|brace| brace.keep_one_line)
    }

    fn place(&mut self, index: usize, layout: Layout) {
        let token = self.tokens[index];
        match layout {
            Layout::NewLine {
                indent,
                blank_lines,
            } => {
                self.out.new_line(indent, blank_lines);
                self.state.force_break = false;
                self.state.blank_after_block = false;
                self.state.pad_next = false;
                self.state.pointer_after = None;
                if let Some(paren) = self.state.stmt.parens.last_mut() {
                    paren.pending_align = false;
                }
            }
            Layout::SameLine(spacing) => {
                self.write_spacing(&token, spacing);
                if !token.is_trivia() {
                    if let Some(paren) = self.state.stmt.parens.last_mut() {
                        if paren.pending_align {
                            paren.pending_align = false;
                            paren.align = Some(self.out.column());
                        }
                    }
                }
            }
        }

        let shift = match token.kind {
            TokenKind::BlockComment => self.out.column() as isize - token.column as isize,
            _ => 0,
        };
        self.out.push(token.text, token.kind, shift);
        if !token.is_trivia() {
            self.state.force_break = false;
        }
        self.state.last_on_line = Some(index);
    }

    fn write_spacing(&mut self, token: &Token, spacing: Spacing) {
        let original = token.space_before;
        match spacing {
            Spacing::None => {}
            Spacing::One => self.out.space(" "),
            Spacing::AtLeastOne if original.is_empty() || token.newlines_before > 0 => {
                self.out.space(" ")
            }
            Spacing::AtLeastOne | Spacing::Original if self.options.convert_tabs => {
                self.out.space_expanded(original)
            }
            Spacing::AtLeastOne | Spacing::Original => self.out.space(original),
        }
    }

    /// Empty lines to keep before a token that starts a line.
    fn blank_lines(&self, index: usize, starts_statement: bool, after_do: bool) -> usize {
        let token = self.tokens[index];
        if token.synthetic {
            return 0;
        }
        if self.out.is_empty() {
            return token.newlines_before;
        }

        let mut blank = token.newlines_before.saturating_sub(1);
        if self.options.delete_empty_lines && self.in_function() {
            blank = 0;
        }
        if self.options.break_blocks {
            if self.state.blank_after_block && !token.is("}") {
                blank = blank.max(1);
            } else if starts_statement
                && token.kind == TokenKind::Word
                && BLOCK_HEADERS.contains(&token.text)
                && !(after_do && token.text == "while")
                && !self.state.after_open_brace
                && !self.state.stmt.after_label
                && !self.out.comment_only()
            {
                blank = blank.max(1);
            }
        }
        blank
    }

    fn code(&mut self, index: usize) {
        let token = self.tokens[index];
        let semicolon = token.is(";");
        let stmt = &mut self.state.stmt;
        let starts = !stmt.active && !semicolon;
        if stmt.header_body_pending && (starts || semicolon) {
            stmt.header_body_pending = false;
            if starts {
                stmt.header_extra += 1;
            }
        }

        let role = self.operator_role(index);
        let after_close = self.state.after_close.take();
        let new_line = if self.out.is_empty() {
            true
        } else if let Some(closed) = after_close {
            self.breaks_after_close(index, closed)
        } else {
            self.state.force_break || token.newlines_before > 0
        };

        let layout = if new_line {
            let after_do = after_close.is_some_and(|closed| closed.is_do);
            Layout::NewLine {
                indent: self.line_indent(index),
                blank_lines: self.blank_lines(index, starts, after_do),
            }
        } else {
            Layout::SameLine(self.spacing(index, role))
        };
        self.place(index, layout);

        if starts {
            self.begin_statement(index, new_line);
        }
        self.after_code(index, role);
    }

    fn is_closing_header(&self, index: usize, closed: ClosedBrace) -> bool {
        let token = self.tokens[index];
        token.kind == TokenKind::Word
            && match token.text {
                "else" | "catch" | "finally" => true,
                "while" => closed.is_do,
                _ => false,
            }
    }

    fn breaks_after_close(&self, index: usize, closed: ClosedBrace) -> bool {
        let token = self.tokens[index];
        if !self.out.can_join() {
            return true;
        }
        if [";", ",", ")", "]"].iter().any(|p| token.is(p)) {
            return false;
        }
        if self.is_closing_header(index, closed) {
            return self
                .options
                .break_closing_headers()
                .unwrap_or(token.newlines_before > 0);
        }
        if closed.expression {
            return token.newlines_before > 0;
        }
        !(matches!(closed.kind, BraceKind::Class | BraceKind::Enum) && token.newlines_before == 0)
    }

    fn begin_statement(&mut self, index: usize, new_line: bool) {
        let indent = if new_line {
            self.out.current_indent()
        } else {
            self.statement_indent(index)
        };
        let stmt = &mut self.state.stmt;
        stmt.active = true;
        stmt.start = index;
        stmt.indent = indent;
        stmt.ternary = 0;
        stmt.after_label = false;
        stmt.parens.clear();
    }

    fn after_code(&mut self, index: usize, role: OpRole) {
        let token = self.tokens[index];
        let options = self.options;
        self.state.after_open_brace = false;
        self.state.pad_next = (role == OpRole::Binary && options.pad_oper)
            || (token.is(",") && options.pads_commas());
        self.state.pointer_run = role == OpRole::Pointer;
        self.state.pointer_after = match role {
            OpRole::Pointer => options.align_pointer,
            _ => None,
        };

        match token.kind {
            TokenKind::Word => self.header_keyword(index),
            TokenKind::Punct => match token.text {
                "(" | "[" => self.open_paren(index),
                ")" | "]" => {
                    if let Some(paren) = self.state.stmt.parens.pop() {
                        if paren.header && self.state.stmt.parens.is_empty() {
                            self.complete_header();
                        }
                    }
                }
                ";" => {
                    let in_initializer = self
                        .state
                        .braces
                        .last()
                        .is_some_and(|brace| brace.kind == BraceKind::Initializer);
                    if self.state.stmt.parens.is_empty() && !in_initializer {
                        self.end_statement(index);
                    }
                }
                "?" => self.state.stmt.ternary += 1,
                ":" => {
                    if self.state.stmt.ternary > 0 {
                        self.state.stmt.ternary -= 1;
                    } else if self.state.stmt.parens.is_empty() && self.is_label_end(index) {
                        self.state.stmt.active = false;
                        self.state.stmt.after_label = true;
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn header_keyword(&mut self, index: usize) {
        let token = self.tokens[index];
        let at_start = self.state.stmt.start == index
            || self
                .prev_code(index)
                .is_some_and(|prev| self.tokens[prev].is_word("else"));
        if !at_start {
            return;
        }

        let paren_next = self.next_code_is(index, |t| t.is("("));
        match token.text {
            "if" if paren_next => {
                let stmt = &mut self.state.stmt;
                stmt.if_levels.push(stmt.header_extra);
                stmt.header_paren_pending = true;
            }
            word if paren_next && PAREN_HEADERS.contains(&word) => {
                self.state.stmt.header_paren_pending = true;
            }
            "else" => {
                if !self.next_code_is(index, |t| t.is_word("if")) {
                    self.complete_header();
                }
            }
            "do" | "try" | "finally" => self.complete_header(),
            _ => {}
        }
    }

    fn open_paren(&mut self, index: usize) {
        let token = self.tokens[index];
        let header = token.is("(") && self.state.stmt.header_paren_pending;
        let declaration = !header
            && !self.in_code_scope()
            && self.prev_code(index).is_some_and(|prev| {
                let prev = self.tokens[prev];
                prev.kind == TokenKind::Word && !NON_OPERANDS.contains(&prev.text)
            });
        let line_indent = self.out.current_indent();

        let stmt = &mut self.state.stmt;
        if header {
            stmt.header_paren_pending = false;
        }
        stmt.parens.push(OpenParen {
            start: index,
            line_indent,
            align: None,
            pending_align: true,
            header,
            declaration,
        });
    }

    fn complete_header(&mut self) {
        let stmt = &mut self.state.stmt;
        stmt.active = false;
        stmt.header_paren_pending = false;
        stmt.header_body_pending = true;
    }

    fn end_statement(&mut self, index: usize) {
        let before_else = self.next_code_is(index, |t| t.is_word("else"));
        let keep = self.options.keep_one_line_statements || self.in_kept_line();

        let stmt = &mut self.state.stmt;
        stmt.active = false;
        stmt.header_paren_pending = false;
        stmt.header_body_pending = false;
        stmt.ternary = 0;
        match stmt.if_levels.pop() {
            Some(level) if before_else => stmt.header_extra = level,
            _ => {
                stmt.header_extra = 0;
                stmt.if_levels.clear();
            }
        }
        if !keep {
            self.state.force_break = true;
        }
    }

    /// Whether the `:` at `index` ends a `case`, access modifier or goto label.
    fn is_label_end(&self, index: usize) -> bool {
        let Some(brace) = self.state.braces.last() else {
            return false;
        };
        let mut code = self.statement_code(index);
        let Some(first) = code.next() else {
            return false;
        };

        match brace.kind {
            BraceKind::Switch if first.is_word("case") || first.is_word("default") => true,
            BraceKind::Class => {
                (ACCESS_MODIFIERS.contains(&first.text) || QT_SECTIONS.contains(&first.text))
                    && code.all(|t| QT_SECTIONS.contains(&t.text))
            }
            BraceKind::Enum | BraceKind::Initializer => false,
            _ => {
                first.kind == TokenKind::Word
                    && code.next().is_none()
                    && !NON_OPERANDS.contains(&first.text)
                    && !is_header(first.text)
            }
        }
    }

    fn comment(&mut self, index: usize) {
        let token = self.tokens[index];
        let layout = if self.out.is_empty() || token.newlines_before > 0 {
            let indent = if token.kind == TokenKind::LineComment && token.column == 0 {
                Indent::ZERO
            } else if self.state.stmt.header_body_pending {
                self.line_indent(index).deeper(1)
            } else {
                self.line_indent(index)
            };
            Layout::NewLine {
                indent,
                blank_lines: self.blank_lines(index, false, false),
            }
        } else {
            Layout::SameLine(Spacing::Original)
        };
        self.place(index, layout);
    }

    fn preprocessor(&mut self, index: usize) {
        let token = self.tokens[index];
        let blank_lines = self.blank_lines(index, false, false);
        self.conditional(token.text);
        self.place(
            index,
            Layout::NewLine {
                indent: Indent::ZERO,
                blank_lines,
            },
        );
    }

    fn conditional(&mut self, directive: &str) {
        let name = directive
            .trim_start_matches('#')
            .trim_start()
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();

        match name {
            "if" | "ifdef" | "ifndef" => self.conditionals.push(Conditional {
                at_if: self.state.clone(),
                after_first_branch: None,
            }),
            "elif" | "else" => {
                if let Some(conditional) = self.conditionals.last_mut() {
                    if conditional.after_first_branch.is_none() {
                        conditional.after_first_branch = Some(self.state.clone());
                    }
                    self.state = conditional.at_if.clone();
                }
            }
            "endif" => {
                if let Some(first) = self
                    .conditionals
                    .pop()
                    .and_then(|conditional| conditional.after_first_branch)
                {
                    self.state = first;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests;
