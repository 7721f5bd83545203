//! Formatting options
//!
//! [`FormatOptions`] is the parsed form of an Artistic Style options string. It is produced by
//! [`parse_options`] and consumed by [`crate::format_source`].
//!
//! Brace styles are presets. Selecting one sets how opening braces are placed for each
//! kind of block (see [`BraceKind`]) and, for a few styles, turns on extra options such as
//! `add-braces` for `1tbs` or `indent-modifiers` for `google`.

mod parse;

pub use parse::*;

use derive_enum_all_values::AllValues;

/// Brace style preset selected with `--style=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AllValues)]
pub enum BraceStyle {
    /// No style requested. Opening braces are left where they are.
    #[default]
    Unchanged,
    /// Braces broken from everything.
    Allman,
    /// Braces attached to everything.
    Java,
    /// Broken from namespaces, classes and functions.
    KernighanRitchie,
    /// Broken from functions only; closing headers start a new line.
    Stroustrup,
    /// Broken and indented with the block they open.
    Whitesmith,
    /// Attached, closing brace indented with the block.
    Ratliff,
    /// Same placement as [`BraceStyle::KernighanRitchie`].
    Linux,
    /// Linux braces plus braces added around single-line bodies.
    OneTrueBrace,
    /// Attached, with access modifiers indented half a level.
    Google,
    /// Broken from classes, structs, enums and functions.
    Mozilla,
    /// Broken from functions only.
    Webkit,
}

impl BraceStyle {
    /// Name accepted by `--style=` for this preset. [`BraceStyle::Unchanged`] has none.
    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            BraceStyle::Unchanged => return None,
            BraceStyle::Allman => "allman",
            BraceStyle::Java => "java",
            BraceStyle::KernighanRitchie => "kr",
            BraceStyle::Stroustrup => "stroustrup",
            BraceStyle::Whitesmith => "whitesmith",
            BraceStyle::Ratliff => "ratliff",
            BraceStyle::Linux => "linux",
            BraceStyle::OneTrueBrace => "1tbs",
            BraceStyle::Google => "google",
            BraceStyle::Mozilla => "mozilla",
            BraceStyle::Webkit => "webkit",
        })
    }

    /// Number used by the short form `-A<n>`.
    pub fn short_number(self) -> Option<u32> {
        Some(match self {
            BraceStyle::Unchanged => return None,
            BraceStyle::Allman => 1,
            BraceStyle::Java => 2,
            BraceStyle::KernighanRitchie => 3,
            BraceStyle::Stroustrup => 4,
            BraceStyle::Whitesmith => 5,
            BraceStyle::Ratliff => 6,
            BraceStyle::Linux => 8,
            BraceStyle::OneTrueBrace => 10,
            BraceStyle::Google => 14,
            BraceStyle::Mozilla => 16,
            BraceStyle::Webkit => 17,
        })
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "allman" | "bsd" | "break" => BraceStyle::Allman,
            "java" | "attach" => BraceStyle::Java,
            "kr" | "k&r" | "k/r" => BraceStyle::KernighanRitchie,
            "stroustrup" => BraceStyle::Stroustrup,
            "whitesmith" => BraceStyle::Whitesmith,
            "ratliff" | "banner" => BraceStyle::Ratliff,
            "linux" | "knf" => BraceStyle::Linux,
            "1tbs" | "otbs" => BraceStyle::OneTrueBrace,
            "google" => BraceStyle::Google,
            "mozilla" => BraceStyle::Mozilla,
            "webkit" => BraceStyle::Webkit,
            _ => return None,
        })
    }

    pub(crate) fn from_short_number(number: u32) -> Option<Self> {
        BraceStyle::all_values()
            .iter()
            .copied()
            .find(|style| style.short_number() == Some(number))
    }
}

/// Kind of block an opening brace starts, as seen by the reformatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BraceKind {
    /// `namespace x {`
    Namespace,
    /// `class`, `struct`, `union` and `interface` bodies.
    Class,
    /// `enum` bodies.
    Enum,
    /// Function and method bodies.
    Function,
    /// Bodies of `if`, `for`, `while`, `do`, `try` and friends.
    Control,
    /// `switch` bodies.
    Switch,
    /// `extern "C" {`
    Extern,
    /// Array and aggregate initializers. Never moved.
    Initializer,
    /// Anything else: bare blocks, lambda bodies, properties.
    Block,
}

/// Where an opening brace goes relative to the code that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracePlacement {
    /// Leave the brace where it is.
    Keep,
    /// Move the brace to the end of the owning line.
    Attach,
    /// Move the brace onto its own line.
    Break,
}

/// Characters used for indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndentKind {
    /// Spaces only.
    #[default]
    Spaces,
    /// Tabs for indentation levels, spaces for alignment.
    Tab,
    /// Tabs wherever a whole tab fits, including alignment.
    ForceTab,
}

/// Placement of `*` and `&` in declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAlign {
    /// `char* p`
    Type,
    /// `char * p`
    Middle,
    /// `char *p`
    Name,
}

/// Line ending written to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineEnd {
    /// `\r\n`
    Windows,
    /// `\n`
    #[default]
    Linux,
    /// `\r`
    MacOld,
}

impl LineEnd {
    /// The characters of this line ending.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnd::Windows => "\r\n",
            LineEnd::Linux => "\n",
            LineEnd::MacOld => "\r",
        }
    }
}

/// Source language the input is treated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceMode {
    /// C and C++. Preprocessor lines and pointer alignment are handled.
    #[default]
    C,
    /// Java. No preprocessor, `*` and `&` are always operators.
    Java,
    /// C#. Preprocessor lines are handled, `*` and `&` are always operators.
    CSharp,
}

impl SourceMode {
    pub(crate) fn has_preprocessor(self) -> bool {
        !matches!(self, SourceMode::Java)
    }

    pub(crate) fn has_pointers(self) -> bool {
        matches!(self, SourceMode::C)
    }
}

/// Default indentation width, in columns.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Smallest indentation width accepted by `indent=`.
pub const MIN_INDENT_WIDTH: usize = 2;

/// Largest indentation width accepted by `indent=`.
pub const MAX_INDENT_WIDTH: usize = 20;

/// Parsed formatting options.
///
/// The [`Default`] value formats with four spaces per level and leaves brace placement,
/// padding and line breaks inside statements alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatOptions {
    /// Language mode.
    pub mode: SourceMode,
    /// Brace style preset.
    pub brace_style: BraceStyle,
    /// Indentation characters.
    pub indent_kind: IndentKind,
    /// Columns per indentation level.
    pub indent_width: usize,
    /// Indent class bodies (and access modifiers) one extra level.
    pub indent_classes: bool,
    /// Indent access modifiers half a level.
    pub indent_modifiers: bool,
    /// Indent `case` labels inside `switch`.
    pub indent_switches: bool,
    /// Indent blocks following `case` labels.
    pub indent_cases: bool,
    /// Indent namespace bodies.
    pub indent_namespaces: bool,
    /// Attach namespace braces regardless of style.
    pub attach_namespaces: bool,
    /// Attach class braces regardless of style.
    pub attach_classes: bool,
    /// Start `else`, `catch`, `finally` and do-`while` on a new line.
    pub break_closing_braces: bool,
    /// Empty lines around header blocks.
    pub break_blocks: bool,
    /// Remove empty lines inside functions.
    pub delete_empty_lines: bool,
    /// Pad binary operators and commas.
    pub pad_oper: bool,
    /// Pad commas.
    pub pad_comma: bool,
    /// Pad the outside of parentheses.
    pub pad_paren_out: bool,
    /// Pad the inside of parentheses.
    pub pad_paren_in: bool,
    /// Pad between a header keyword and its parenthesis.
    pub pad_header: bool,
    /// Remove parenthesis padding not requested by other options.
    pub unpad_paren: bool,
    /// Pointer and reference alignment, if requested.
    pub align_pointer: Option<PointerAlign>,
    /// Add braces around single-line header bodies.
    pub add_braces: bool,
    /// Keep `{ ... }` blocks written on one line.
    pub keep_one_line_blocks: bool,
    /// Keep several statements written on one line.
    pub keep_one_line_statements: bool,
    /// Convert tabs between tokens to spaces.
    pub convert_tabs: bool,
    /// Requested line ending. [`None`] keeps the input's.
    pub line_end: Option<LineEnd>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            mode: SourceMode::C,
            brace_style: BraceStyle::Unchanged,
            indent_kind: IndentKind::Spaces,
            indent_width: DEFAULT_INDENT_WIDTH,
            indent_classes: false,
            indent_modifiers: false,
            indent_switches: false,
            indent_cases: false,
            indent_namespaces: false,
            attach_namespaces: false,
            attach_classes: false,
            break_closing_braces: false,
            break_blocks: false,
            delete_empty_lines: false,
            pad_oper: false,
            pad_comma: false,
            pad_paren_out: false,
            pad_paren_in: false,
            pad_header: false,
            unpad_paren: false,
            align_pointer: None,
            add_braces: false,
            keep_one_line_blocks: false,
            keep_one_line_statements: false,
            convert_tabs: false,
            line_end: None,
        }
    }
}

impl FormatOptions {
    /// Selects a brace style together with the options the preset implies.
    pub fn set_brace_style(&mut self, style: BraceStyle) {
        self.brace_style = style;
        match style {
            BraceStyle::OneTrueBrace => self.add_braces = true,
            BraceStyle::Google => self.indent_modifiers = true,
            _ => {}
        }
    }

    /// Placement of the opening brace of a block of the given kind.
    pub fn placement(&self, kind: BraceKind) -> BracePlacement {
        use BraceKind::*;
        use BracePlacement::*;

        if kind == Initializer {
            return Keep;
        }
        if kind == Namespace && self.attach_namespaces {
            return Attach;
        }
        if kind == Class && self.attach_classes {
            return Attach;
        }

        let broken = match self.brace_style {
            BraceStyle::Unchanged => return Keep,
            BraceStyle::Allman | BraceStyle::Whitesmith => true,
            BraceStyle::Java | BraceStyle::Ratliff | BraceStyle::Google => false,
            BraceStyle::KernighanRitchie | BraceStyle::Linux | BraceStyle::OneTrueBrace => {
                matches!(kind, Namespace | Class | Function | Extern)
            }
            BraceStyle::Stroustrup | BraceStyle::Webkit => kind == Function,
            BraceStyle::Mozilla => matches!(kind, Class | Enum | Function),
        };

        if broken {
            Break
        } else {
            Attach
        }
    }

    /// Whether `else`, `catch`, `finally` and the `while` of a `do` loop start a new line
    /// after a closing brace. [`None`] leaves them where they are.
    pub fn break_closing_headers(&self) -> Option<bool> {
        if self.break_closing_braces {
            return Some(true);
        }
        match self.brace_style {
            BraceStyle::Unchanged => None,
            BraceStyle::Allman | BraceStyle::Whitesmith | BraceStyle::Stroustrup => Some(true),
            _ => Some(false),
        }
    }

    /// Whether block braces sit one level in, with the block's contents.
    pub(crate) fn indented_braces(&self) -> bool {
        self.brace_style == BraceStyle::Whitesmith
    }

    /// Whether closing braces sit one level in, with the block's contents.
    pub(crate) fn indented_closing_braces(&self) -> bool {
        matches!(
            self.brace_style,
            BraceStyle::Whitesmith | BraceStyle::Ratliff
        )
    }

    pub(crate) fn pads_commas(&self) -> bool {
        self.pad_comma || self.pad_oper
    }
}
