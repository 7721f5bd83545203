//! Reformatter state carried between tokens.

use crate::options::{BraceKind, PointerAlign};
use alloc::vec::Vec;

/// Indentation of a line: whole levels plus alignment spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Indent {
    pub levels: usize,
    pub spaces: usize,
}

impl Indent {
    pub const ZERO: Indent = Indent {
        levels: 0,
        spaces: 0,
    };

    #[inline]
    pub fn spaces(spaces: usize) -> Self {
        Indent { levels: 0, spaces }
    }

    #[inline]
    pub fn deeper(self, levels: usize) -> Self {
        Indent {
            levels: self.levels + levels,
            spaces: self.spaces,
        }
    }

    #[inline]
    pub fn plus_spaces(self, spaces: usize) -> Self {
        Indent {
            levels: self.levels,
            spaces: self.spaces + spaces,
        }
    }

    #[inline]
    pub fn columns(self, width: usize) -> usize {
        self.levels * width + self.spaces
    }

    /// Same levels as `self`, padded with spaces up to `column`.
    pub fn aligned_to(self, column: usize, width: usize) -> Self {
        let base = self.levels * width;
        if column >= base {
            Indent {
                levels: self.levels,
                spaces: column - base,
            }
        } else {
            Indent::spaces(column)
        }
    }
}

/// An open `(` or `[`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenParen {
    /// Token index of the paren.
    pub start: usize,
    /// Indentation of the line the paren was opened on.
    pub line_indent: Indent,
    /// Column continuation lines align to, when the paren was followed by code on its line.
    pub align: Option<usize>,
    /// Waiting for the token after the paren to fix `align`.
    pub pending_align: bool,
    /// Condition of a header such as `if (...)`.
    pub header: bool,
    /// Parameter list of a declaration outside any function body.
    pub declaration: bool,
}

/// The statement being formatted in the innermost block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Statement {
    /// A statement has started and not yet ended.
    pub active: bool,
    /// Token index the statement started at.
    pub start: usize,
    /// Indentation of the statement's first line.
    pub indent: Indent,
    pub parens: Vec<OpenParen>,
    /// Extra levels from enclosing single-statement header bodies.
    pub header_extra: usize,
    /// `header_extra` of each `if` still waiting for a possible `else`.
    pub if_levels: Vec<usize>,
    /// A header keyword was seen and its `(` has not opened yet.
    pub header_paren_pending: bool,
    /// A header is complete and its body has not started yet.
    pub header_body_pending: bool,
    /// Open `?` without their `:`.
    pub ternary: usize,
    /// The previous statement was a `case`, access modifier or goto label.
    pub after_label: bool,
}

/// An open `{`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenBrace {
    pub kind: BraceKind,
    /// Part of an expression (initializer, lambda); the statement goes on after the `}`.
    pub expression: bool,
    /// Opened the body of a `do` loop.
    pub is_do: bool,
    /// The whole block stays on the line it was written on.
    pub keep_one_line: bool,
    /// Nothing between `{` and `}`.
    pub empty: bool,
    /// Indentation of the line owning the block.
    pub open_indent: Indent,
    /// Indentation of statements in the block.
    pub body: Indent,
    /// Indentation of the `}` line.
    pub close_indent: Indent,
    /// Indentation of `case` labels of a switch.
    pub case_indent: Indent,
    /// Indentation of access modifiers of a class.
    pub modifier_indent: Indent,
    /// Statement state outside the block, restored on `}`.
    pub outer: Statement,
}

/// What the last `}` closed, for deciding where the next token goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClosedBrace {
    pub kind: BraceKind,
    pub is_do: bool,
    pub expression: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct State {
    pub braces: Vec<OpenBrace>,
    pub stmt: Statement,
    /// The next code token must start a new line.
    pub force_break: bool,
    pub after_close: Option<ClosedBrace>,
    /// The next token on this line gets at least one space (after a padded operator or comma).
    pub pad_next: bool,
    /// Spacing owed after a run of aligned `*` or `&`.
    pub pointer_after: Option<PointerAlign>,
    /// The previous token was a `*` or `&` of a declarator.
    pub pointer_run: bool,
    /// An empty line is owed before the next line (`break-blocks`).
    pub blank_after_block: bool,
    /// The last code token was a `{`.
    pub after_open_brace: bool,
    /// Last token written on the current output line.
    pub last_on_line: Option<usize>,
}

/// State saved at `#if` so the `#else` branch starts from the same place.
#[derive(Debug, Clone)]
pub(crate) struct Conditional {
    pub at_if: State,
    pub after_first_branch: Option<State>,
}
