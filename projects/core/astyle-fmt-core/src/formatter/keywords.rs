//! Keyword tables.

/// Headers followed by a parenthesised condition.
pub(crate) const PAREN_HEADERS: &[&str] = &[
    "if",
    "for",
    "while",
    "switch",
    "catch",
    "foreach",
    "lock",
    "synchronized",
    "fixed",
    "using",
];

/// Headers whose body follows the keyword directly.
pub(crate) const PLAIN_HEADERS: &[&str] = &["else", "do", "try", "finally"];

/// Headers that open a block `break-blocks` separates from its surroundings.
pub(crate) const BLOCK_HEADERS: &[&str] = &[
    "if",
    "for",
    "while",
    "do",
    "switch",
    "try",
    "foreach",
    "lock",
    "synchronized",
];

/// Words after which an operator cannot be binary.
pub(crate) const NON_OPERANDS: &[&str] = &[
    "return", "case", "throw", "new", "delete", "sizeof", "alignof", "typeof", "goto", "else",
    "do", "operator", "co_return", "co_yield", "co_await", "await", "yield", "in", "is", "as",
    "and", "or", "not", "if", "while", "for", "switch", "catch",
];

/// Words that only appear in declarations.
pub(crate) const TYPE_WORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "bool",
    "const", "volatile", "struct", "enum", "union", "class", "typename", "auto", "size_t",
    "wchar_t", "char8_t", "char16_t", "char32_t",
];

/// Words after a `)` that still belong to a function declarator.
pub(crate) const DECLARATOR_SUFFIXES: &[&str] =
    &["const", "override", "final", "noexcept", "volatile", "mutable"];

pub(crate) const CLASS_WORDS: &[&str] = &["class", "struct", "union", "interface"];

pub(crate) const ACCESS_MODIFIERS: &[&str] = &["public", "protected", "private"];

/// Qt section names that may follow an access modifier.
pub(crate) const QT_SECTIONS: &[&str] = &["slots", "signals", "Q_SLOTS", "Q_SIGNALS"];

#[inline]
pub(crate) fn is_header(word: &str) -> bool {
    PAREN_HEADERS.contains(&word) || PLAIN_HEADERS.contains(&word)
}
