//! Indentation of lines that start with a given token.

use super::keywords::{ACCESS_MODIFIERS, QT_SECTIONS};
use super::state::Indent;
use super::Formatter;
use crate::lexer::TokenKind;
use crate::options::BraceKind;

impl Formatter<'_, '_> {
    /// Indentation for a line starting with the token at `index`.
    pub(super) fn line_indent(&self, index: usize) -> Indent {
        let token = self.tokens[index];
        let stmt = &self.state.stmt;
        if let Some(paren) = stmt.parens.last() {
            return match paren.align {
                Some(column) => paren.line_indent.aligned_to(column, self.options.indent_width),
                None if token.is(")") || token.is("]") => paren.line_indent,
                None => paren.line_indent.deeper(1),
            };
        }
        if self.in_list_block() {
            return self.block_body();
        }
        if stmt.active {
            return stmt.indent.deeper(1);
        }
        self.statement_indent(index)
    }

    /// Indentation of a statement starting with the token at `index`.
    pub(super) fn statement_indent(&self, index: usize) -> Indent {
        let extra = self.state.stmt.header_extra;
        let Some(brace) = self.state.braces.last() else {
            return Indent::ZERO.deeper(extra);
        };
        let base = match brace.kind {
            BraceKind::Switch if self.is_case_label(index) => brace.case_indent,
            BraceKind::Class if self.is_access_modifier(index) => brace.modifier_indent,
            _ => brace.body,
        };
        base.deeper(extra)
    }

    fn block_body(&self) -> Indent {
        self.state
            .braces
            .last()
            .map_or(Indent::ZERO, |brace| brace.body)
    }

    fn is_case_label(&self, index: usize) -> bool {
        let token = self.tokens[index];
        token.is_word("case")
            || (token.is_word("default") && self.next_code_is(index, |t| t.is(":")))
    }

    /// `public:`, `private slots:`, `signals:` and the like.
    fn is_access_modifier(&self, index: usize) -> bool {
        let token = self.tokens[index];
        if token.kind != TokenKind::Word
            || !(ACCESS_MODIFIERS.contains(&token.text) || QT_SECTIONS.contains(&token.text))
        {
            return false;
        }
        let Some(next) = self.next_code(index) else {
            return false;
        };
        let next_token = self.tokens[next];
        next_token.is(":")
            || (QT_SECTIONS.contains(&next_token.text) && self.next_code_is(next, |t| t.is(":")))
    }
}
