//! Opening and closing braces: classification, placement and block indentation.

use super::keywords::*;
use super::spacing::Spacing;
use super::state::{ClosedBrace, Indent, OpenBrace};
use super::{Formatter, Layout};
use crate::lexer::{Token, TokenKind};
use crate::options::{BraceKind, BracePlacement};
use alloc::vec;
use alloc::vec::Vec;

/// Finds the matching `}` of every `{`.
pub(super) fn match_braces(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut matching = vec![None; tokens.len()];
    let mut open = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if token.is("{") {
            open.push(index);
        } else if token.is("}") {
            if let Some(start) = open.pop() {
                matching[start] = Some(index);
            }
        }
    }
    matching
}

/// What the words of a statement say about the block it opens.
#[derive(Debug, Default)]
struct Head<'a> {
    first: Option<&'a str>,
    namespace: bool,
    class: bool,
    enumeration: bool,
    extern_string: bool,
    paren: bool,
    assign: bool,
    bracket: bool,
}

impl<'a> Formatter<'_, 'a> {
    /// Reads the current statement up to its first `(`, skipping template parameter lists.
    fn statement_head(&self, end: usize) -> Head<'a> {
        let mut head = Head::default();
        let mut template = false;
        let mut angles = 0usize;
        for token in self.statement_code(end) {
            if head.first.is_none() {
                head.first = Some(token.text);
            }
            if template {
                match token.text {
                    "<" => angles += 1,
                    ">" => angles = angles.saturating_sub(1),
                    ">>" => angles = angles.saturating_sub(2),
                    _ => {}
                }
                template = angles > 0 || token.is_word("template");
                continue;
            }
            match token.kind {
                TokenKind::Word => match token.text {
                    "template" => template = true,
                    "namespace" => head.namespace = true,
                    "enum" => head.enumeration = true,
                    "extern" => head.extern_string = true,
                    word if CLASS_WORDS.contains(&word) => head.class = true,
                    _ => {}
                },
                TokenKind::Str => {}
                TokenKind::Punct => match token.text {
                    "(" => {
                        head.paren = true;
                        break;
                    }
                    "=" => head.assign = true,
                    "[" => head.bracket = true,
                    _ => {}
                },
                _ => {}
            }
        }
        head
    }

    /// Decides what the `{` at `index` opens and whether it is part of an expression.
    fn classify_brace(&self, index: usize) -> (BraceKind, bool) {
        let stmt = &self.state.stmt;
        if self
            .state
            .braces
            .last()
            .is_some_and(|brace| brace.kind == BraceKind::Initializer)
        {
            return (BraceKind::Initializer, true);
        }
        if !(stmt.active || stmt.header_body_pending) {
            return (BraceKind::Block, false);
        }

        let prev = self.prev_code(index).map(|prev| self.tokens[prev]);
        let closes_declarator = prev.is_some_and(|prev| {
            prev.is(")") || prev.is("]") || DECLARATOR_SUFFIXES.contains(&prev.text)
        }) || self.after_trailing_return(index);

        if !stmt.parens.is_empty() {
            return match closes_declarator {
                true => (BraceKind::Block, true),
                false => (BraceKind::Initializer, true),
            };
        }
        if stmt.header_body_pending {
            return match self.tokens[stmt.start].is_word("switch") {
                true => (BraceKind::Switch, false),
                false => (BraceKind::Control, false),
            };
        }
        if prev.is_some_and(|prev| {
            prev.is_word("return")
                || (prev.kind == TokenKind::Punct
                    && matches!(prev.text, "=" | "," | "(" | "[" | "{" | "?" | ":" | "<<"))
        }) {
            return (BraceKind::Initializer, true);
        }

        let head = self.statement_head(index);
        if head.namespace {
            return (BraceKind::Namespace, false);
        }
        if head.extern_string && !head.paren && !head.class && !head.enumeration {
            return (BraceKind::Extern, false);
        }
        if head.enumeration && !head.paren {
            return (BraceKind::Enum, false);
        }
        if head.class && !head.paren {
            return (BraceKind::Class, false);
        }
        if let Some(first) = head.first.filter(|first| is_header(first)) {
            return match first {
                "switch" => (BraceKind::Switch, false),
                _ => (BraceKind::Control, false),
            };
        }
        if head.bracket && (head.assign || head.first == Some("return")) && closes_declarator {
            return (BraceKind::Block, true);
        }

        let after_name = prev.is_some_and(|prev| {
            prev.is(">")
                || (prev.kind == TokenKind::Word
                    && !NON_OPERANDS.contains(&prev.text)
                    && !DECLARATOR_SUFFIXES.contains(&prev.text)
                    && !is_header(prev.text))
        });
        let ends_expression = self.matching[index]
            .and_then(|close| self.next_code(close))
            .is_some_and(|next| self.tokens[next].is(";") || self.tokens[next].is(","));
        if after_name && ends_expression && (!head.paren || head.assign) {
            return (BraceKind::Initializer, true);
        }

        if head.paren && !self.in_code_scope() {
            return (BraceKind::Function, false);
        }
        (BraceKind::Block, false)
    }

    /// `-> Type {`
    fn after_trailing_return(&self, index: usize) -> bool {
        self.prev_code(index)
            .filter(|&prev| self.tokens[prev].kind == TokenKind::Word)
            .and_then(|prev| self.prev_code(prev))
            .is_some_and(|arrow| self.tokens[arrow].is("->"))
    }

    /// Indentation of an expression `{` that starts a line.
    fn expression_brace_indent(&self, index: usize) -> Indent {
        let stmt = &self.state.stmt;
        match stmt.active && stmt.parens.is_empty() && !self.in_list_block() {
            true => stmt.indent,
            false => self.line_indent(index),
        }
    }

    pub(super) fn open_brace(&mut self, index: usize) {
        let token = self.tokens[index];
        let options = self.options;
        let (kind, expression) = self.classify_brace(index);

        let stmt = &self.state.stmt;
        let owned = stmt.active || stmt.header_body_pending;
        let is_do = owned && self.tokens[stmt.start].is_word("do");
        let outer_indent = stmt.indent;
        let switch = self
            .state
            .braces
            .last()
            .filter(|brace| brace.kind == BraceKind::Switch);
        let case_block = !owned && kind == BraceKind::Block && stmt.after_label && switch.is_some();

        let one_line = self.matching[index].is_some_and(|close| {
            self.tokens[index + 1..=close]
                .iter()
                .all(|t| t.newlines_before == 0)
        });
        let empty = one_line && self.matching[index] == Some(index + 1);
        let in_kept_line = self.in_kept_line();
        let keep_one_line = one_line
            && !empty
            && kind != BraceKind::Initializer
            && (options.keep_one_line_blocks || in_kept_line || expression);

        let placement = match keep_one_line || in_kept_line || case_block || expression {
            true => BracePlacement::Keep,
            false => options.placement(kind),
        };
        let base = if let Some(switch) = switch.filter(|_| case_block) {
            switch.case_indent.deeper(usize::from(options.indent_cases))
        } else if owned {
            outer_indent
        } else {
            self.statement_indent(index)
        };
        let body = match kind {
            BraceKind::Namespace => base.deeper(usize::from(options.indent_namespaces)),
            BraceKind::Class => base.deeper(1 + usize::from(options.indent_classes)),
            BraceKind::Switch => base.deeper(1 + usize::from(options.indent_switches)),
            _ => base.deeper(1),
        };
        let shifted = body != base;

        let new_line = self.out.is_empty()
            || self.state.force_break
            || match placement {
                BracePlacement::Keep => token.newlines_before > 0,
                BracePlacement::Break => true,
                BracePlacement::Attach if owned => !self.out.can_join(),
                BracePlacement::Attach => token.newlines_before > 0,
            };
        let layout = if new_line {
            let indent = if expression {
                self.expression_brace_indent(index)
            } else if options.indented_braces() && shifted {
                base.deeper(1)
            } else {
                base
            };
            let blank_lines = match token.newlines_before {
                0 => 0,
                _ => self.blank_lines(index, false, false),
            };
            Layout::NewLine {
                indent,
                blank_lines,
            }
        } else {
            Layout::SameLine(match placement {
                BracePlacement::Attach => Spacing::One,
                _ if token.newlines_before > 0 => Spacing::One,
                _ if self.state.pad_next => Spacing::AtLeastOne,
                _ => Spacing::Original,
            })
        };
        self.state.after_close = None;
        self.place(index, layout);

        let (open_indent, body, close_indent) = if expression {
            let line = self.out.current_indent();
            (line, line.deeper(1), line)
        } else if options.indented_closing_braces() && shifted {
            (base, body, base.deeper(1))
        } else {
            (base, body, base)
        };
        let case_indent = base.deeper(usize::from(options.indent_switches));
        let mut modifier_indent = base.deeper(usize::from(options.indent_classes));
        if options.indent_modifiers {
            modifier_indent = modifier_indent.plus_spaces(options.indent_width / 2);
        }

        tracing::trace!(index, ?kind, expression, keep_one_line, "open brace");
        let outer = core::mem::take(&mut self.state.stmt);
        self.state.braces.push(OpenBrace {
            kind,
            expression,
            is_do,
            keep_one_line,
            empty,
            open_indent,
            body,
            close_indent,
            case_indent,
            modifier_indent,
            outer,
        });
        self.state.force_break =
            !(keep_one_line || in_kept_line || empty || kind == BraceKind::Initializer);
        self.state.after_open_brace = true;
        self.state.pad_next = false;
        self.state.pointer_after = None;
        self.state.pointer_run = false;
    }

    pub(super) fn close_brace(&mut self, index: usize) {
        let token = self.tokens[index];
        self.state.after_close = None;
        let Some(brace) = self.state.braces.pop() else {
            // Unbalanced input: keep going at the outermost level.
            let layout = match self.out.is_empty() || token.newlines_before > 0 {
                true => Layout::NewLine {
                    indent: Indent::ZERO,
                    blank_lines: self.blank_lines(index, false, false),
                },
                false => Layout::SameLine(Spacing::Original),
            };
            self.place(index, layout);
            return;
        };

        let kept = brace.keep_one_line || brace.empty || self.in_kept_line();
        let new_line = self.out.is_empty()
            || match kept || brace.kind == BraceKind::Initializer {
                true => token.newlines_before > 0,
                false => true,
            };
        let layout = if new_line {
            let indent = match brace.expression {
                true => brace.open_indent,
                false => brace.close_indent,
            };
            Layout::NewLine {
                indent,
                blank_lines: self.blank_lines(index, false, false),
            }
        } else {
            Layout::SameLine(match token.newlines_before {
                0 => Spacing::Original,
                _ => Spacing::One,
            })
        };
        self.place(index, layout);
        tracing::trace!(index, kind = ?brace.kind, "close brace");

        let closed = ClosedBrace {
            kind: brace.kind,
            is_do: brace.is_do,
            expression: brace.expression,
        };
        self.state.stmt = brace.outer;
        self.state.after_close = Some(closed);
        self.state.after_open_brace = false;
        self.state.pad_next = false;
        self.state.pointer_after = None;
        self.state.pointer_run = false;
        if brace.expression {
            return;
        }
        self.finish_block(index, closed);
    }

    /// Ends the statement that owned a block once its `}` is written.
    fn finish_block(&mut self, index: usize, closed: ClosedBrace) {
        let next = self.next_code(index).map(|next| self.tokens[next]);
        let before_else = next.is_some_and(|next| next.is_word("else"));
        let closing_header = next.is_some_and(|next| {
            next.kind == TokenKind::Word
                && match next.text {
                    "else" | "catch" | "finally" => true,
                    "while" => closed.is_do,
                    _ => false,
                }
        });

        let stmt = &mut self.state.stmt;
        stmt.active = false;
        stmt.header_paren_pending = false;
        stmt.header_body_pending = false;
        stmt.ternary = 0;
        stmt.parens.clear();
        if before_else {
            if let Some(level) = stmt.if_levels.pop() {
                stmt.header_extra = level;
            }
        } else if !closing_header {
            stmt.header_extra = 0;
            stmt.if_levels.clear();
        }

        let kept = self.in_kept_line() || self.options.keep_one_line_statements;
        self.state.force_break = !kept;
        if self.options.break_blocks
            && matches!(closed.kind, BraceKind::Control | BraceKind::Switch)
            && !closing_header
            && !next.is_some_and(|next| next.is("}"))
        {
            self.state.blank_after_block = true;
        }
    }
}
