//! Spacing between tokens on the same line: operator padding, parenthesis padding and
//! pointer alignment.

use super::keywords::{NON_OPERANDS, TYPE_WORDS};
use super::Formatter;
use crate::lexer::{Token, TokenKind};
use crate::options::PointerAlign;

/// Space to put before a token that continues the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Spacing {
    /// Whatever was there in the input.
    Original,
    None,
    One,
    /// The input's spacing, or a single space if there was none.
    AtLeastOne,
}

impl Spacing {
    #[inline]
    fn at_least_one(self) -> Self {
        match self {
            Spacing::Original => Spacing::AtLeastOne,
            Spacing::None => Spacing::One,
            other => other,
        }
    }
}

/// How an operator token is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpRole {
    NotOperator,
    Unary,
    Binary,
    /// `*`, `&` or `&&` in a declarator.
    Pointer,
    /// Could be either a declarator or a binary operator; left alone.
    Ambiguous,
}

/// Tokens that end an expression operand.
fn is_operand_end(token: &Token) -> bool {
    match token.kind {
        TokenKind::Word => !NON_OPERANDS.contains(&token.text),
        TokenKind::Number | TokenKind::Str | TokenKind::Char => true,
        TokenKind::Punct => token.text == ")" || token.text == "]",
        _ => false,
    }
}

/// Tokens that attach to whatever precedes them.
fn is_tight(token: &Token) -> bool {
    token.kind == TokenKind::Punct
        && matches!(token.text, ";" | "," | ")" | "]" | "." | "->" | "::")
}

fn closes_declarator(token: &Token) -> bool {
    token.kind == TokenKind::Punct && matches!(token.text, ")" | "," | ">" | ">>" | "]" | ";")
}

fn is_pointer_token(token: &Token) -> bool {
    token.is("*") || token.is("&") || token.is("&&")
}

impl Formatter<'_, '_> {
    pub(super) fn operator_role(&self, index: usize) -> OpRole {
        let token = self.tokens[index];
        if token.kind != TokenKind::Punct {
            return OpRole::NotOperator;
        }
        let prev = match self.state.stmt.active {
            true => self.prev_code(index).map(|prev| self.tokens[prev]),
            false => None,
        };
        let next = self.next_code(index).map(|next| self.tokens[next]);
        let operand = prev.as_ref().is_some_and(is_operand_end);
        let binary_if = |test: bool| match test {
            true => OpRole::Binary,
            false => OpRole::NotOperator,
        };

        match token.text {
            "*" | "&" | "&&" => self.pointer_role(index, prev, next),
            "+" | "-" | "<<" => match operand {
                true => OpRole::Binary,
                false => OpRole::Unary,
            },
            "?" => binary_if(
                operand
                    && !next.is_some_and(|next| {
                        next.kind == TokenKind::Punct
                            && matches!(next.text, "." | "[" | "?" | ")" | "," | ">" | ";")
                    }),
            ),
            "<" | ">" => binary_if(operand && self.is_comparison(index, next)),
            ">>" => binary_if(
                operand
                    && (next.is_some_and(|next| next.kind == TokenKind::Number)
                        || (!token.space_before.is_empty() && token.newlines_before == 0)),
            ),
            ":" => binary_if(self.state.stmt.ternary > 0),
            "=" | "==" | "!=" | "<=" | ">=" | "<=>" | "||" | "/" | "%" | "|" | "^" | "+="
            | "-=" | "*=" | "/=" | "%=" | "&=" | "|=" | "^=" | "<<=" | ">>=" => binary_if(
                operand
                    && !next.is_some_and(|next| next.is("]") || next.is(")") || next.is(",")),
            ),
            _ => OpRole::NotOperator,
        }
    }

    /// Whether a `<` or `>` after an operand compares rather than brackets template arguments.
    fn is_comparison(&self, index: usize, next: Option<Token>) -> bool {
        let token = self.tokens[index];
        let Some(next) = next else {
            return false;
        };
        if matches!(
            next.kind,
            TokenKind::Number | TokenKind::Char | TokenKind::Str
        ) || next.is("-")
        {
            return true;
        }

        // Anywhere else templates are too likely; only conditions are inspected further.
        let Some(paren) = self.state.stmt.parens.last() else {
            return false;
        };
        if !paren.header || next.kind != TokenKind::Word {
            return false;
        }
        let start = paren.start + 1;
        let in_for = self
            .prev_code(paren.start)
            .is_some_and(|head| self.tokens[head].is_word("for"));
        let condition = match in_for {
            true => match self.tokens[start..index].iter().position(|t| t.is(";")) {
                Some(at) => start + at + 1,
                None => return false,
            },
            false => start,
        };
        let segment = self.tokens[condition..index]
            .rsplit(|t| t.is("&&") || t.is("||") || t.is(",") || t.is(";"))
            .next()
            .unwrap_or_default();

        if token.text == ">" {
            return !segment.iter().any(|t| t.is("<"));
        }
        if segment
            .iter()
            .rev()
            .find(|t| !t.is_trivia())
            .is_some_and(|t| t.text.ends_with("_cast"))
        {
            return false;
        }

        let mut depth = 0usize;
        for t in self.tokens[index + 1..].iter() {
            if t.kind != TokenKind::Punct {
                continue;
            }
            match t.text {
                "(" | "[" => depth += 1,
                ")" | "]" if depth == 0 => return true,
                ")" | "]" => depth -= 1,
                ">" | ">>" if depth == 0 => return false,
                ";" | "{" | "}" | "&&" | "||" | "?" => return true,
                _ => {}
            }
        }
        true
    }

    fn pointer_role(&self, index: usize, prev: Option<Token>, next: Option<Token>) -> OpRole {
        let Some(prev) = prev else {
            return OpRole::Unary;
        };
        if is_pointer_token(&prev) {
            return match self.state.pointer_run {
                true => OpRole::Pointer,
                false => OpRole::Unary,
            };
        }
        match prev.kind {
            TokenKind::Number | TokenKind::Str | TokenKind::Char => return OpRole::Binary,
            TokenKind::Punct if prev.is(")") || prev.is("]") => return OpRole::Binary,
            TokenKind::Punct if !prev.is(">") => return OpRole::Unary,
            TokenKind::Word if NON_OPERANDS.contains(&prev.text) => return OpRole::Unary,
            _ => {}
        }
        if next.is_some_and(|next| next.kind == TokenKind::Number)
            || !self.options.mode.has_pointers()
        {
            return OpRole::Binary;
        }

        match self.pointer_context(index) {
            OpRole::Ambiguous if self.tokens[index].text == "&&" => OpRole::Binary,
            role => role,
        }
    }

    /// Looks back over the current expression segment to tell a declarator from an operator.
    fn pointer_context(&self, index: usize) -> OpRole {
        let stmt = &self.state.stmt;
        let mut words = 0usize;
        let mut first_word = None;
        let mut angles = 0usize;
        let mut boundary = None;

        let segment = &self.tokens[stmt.start.min(index)..index];
        for token in segment.iter().rev().filter(|t| !t.is_trivia()) {
            match token.kind {
                TokenKind::Word if NON_OPERANDS.contains(&token.text) => return OpRole::Binary,
                TokenKind::Word => {
                    words += 1;
                    first_word = Some(token.text);
                }
                TokenKind::Punct => match token.text {
                    "::" | "*" | "&" => {}
                    ">" => angles += 1,
                    ">>" => angles += 2,
                    "<" if angles > 0 => angles -= 1,
                    "<" | "(" | "," | ";" | "{" | "}" => {
                        boundary = Some(token.text);
                        break;
                    }
                    _ => return OpRole::Binary,
                },
                _ => return OpRole::Binary,
            }
        }

        let type_word = first_word.is_some_and(|word| TYPE_WORDS.contains(&word));
        match boundary {
            Some("<") if type_word || words >= 2 => OpRole::Pointer,
            Some("<") => OpRole::Ambiguous,
            _ if stmt.parens.is_empty() && words > 0 => OpRole::Pointer,
            _ if stmt.parens.is_empty() => OpRole::Ambiguous,
            _ => {
                let declaration = stmt.parens.last().is_some_and(|paren| paren.declaration);
                match declaration || type_word || words >= 2 {
                    true => OpRole::Pointer,
                    false => OpRole::Ambiguous,
                }
            }
        }
    }

    /// Spacing before the token at `index`, which continues the current line.
    pub(super) fn spacing(&self, index: usize, role: OpRole) -> Spacing {
        let token = self.tokens[index];
        let options = self.options;
        let Some(prev) = self.state.last_on_line.map(|prev| self.tokens[prev]) else {
            return Spacing::None;
        };
        let mut spacing = match token.newlines_before {
            0 => Spacing::Original,
            _ if is_tight(&token) => Spacing::None,
            _ => Spacing::One,
        };
        if prev.is_trivia() {
            return spacing;
        }

        if let (OpRole::Pointer, Some(align)) = (role, options.align_pointer) {
            return match (self.state.pointer_run, align) {
                (true, _) | (false, PointerAlign::Type) => Spacing::None,
                (false, PointerAlign::Middle | PointerAlign::Name) => Spacing::One,
            };
        }
        if let Some(align) = self.state.pointer_after {
            return match align == PointerAlign::Name || closes_declarator(&token) {
                true => Spacing::None,
                false => Spacing::One,
            };
        }

        let header_paren = token.is("(") && self.state.stmt.header_paren_pending;
        if options.unpad_paren {
            let unpads_before = match prev.kind {
                TokenKind::Word if header_paren => !options.pad_header,
                TokenKind::Word => !NON_OPERANDS.contains(&prev.text),
                _ => prev.is(")") || prev.is("]"),
            };
            if (token.is("(") && unpads_before) || prev.is("(") || token.is(")") {
                spacing = Spacing::None;
            }
        }
        if options.pad_header && header_paren {
            spacing = spacing.at_least_one();
        }
        if options.pad_paren_out {
            let tight_before = prev.kind == TokenKind::Punct
                && matches!(prev.text, "(" | "[" | "!" | "~" | "::" | "." | "->");
            let tight_after = token.kind == TokenKind::Punct
                && matches!(
                    token.text,
                    ")" | "]" | ";" | "," | "." | "->" | "[" | "++" | "--"
                );
            if (token.is("(") && !tight_before) || (prev.is(")") && !tight_after) {
                spacing = spacing.at_least_one();
            }
        }
        if options.pad_paren_in
            && ((prev.is("(") && !token.is(")")) || (token.is(")") && !prev.is("(")))
        {
            spacing = spacing.at_least_one();
        }
        if self.state.pad_next && !is_tight(&token) {
            spacing = spacing.at_least_one();
        }
        if options.pad_oper && role == OpRole::Binary {
            spacing = spacing.at_least_one();
        }
        spacing
    }
}
