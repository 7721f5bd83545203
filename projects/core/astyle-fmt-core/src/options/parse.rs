//! Options text parsing
//!
//! The text is split into directives on whitespace and commas, with `#` starting a comment
//! that runs to the end of the line. Each directive is one of:
//!
//! - a long option, `--pad-oper` or `--indent=spaces=2`
//! - a group of short options, `-p`, `-s2` or `-pUxg`
//! - a bare long option name as written in options files, `pad-oper`
//!
//! Parsing never stops at the first bad directive. All of them are collected into a single
//! [`OptionsError`].

use super::*;
use crate::error::OptionsError;
use alloc::string::String;
use alloc::vec::Vec;
use core::str::FromStr;

/// Parses an options string into [`FormatOptions`].
///
/// An empty string yields [`FormatOptions::default`].
///
/// # Errors
///
/// Returns an [`OptionsError`] listing every directive that was not understood. Long
/// options are listed without their `--` prefix, short option groups as written.
pub fn parse_options(text: &str) -> Result<FormatOptions, OptionsError> {
    let mut options = FormatOptions::default();
    let mut rejected = Vec::new();
    let mut count = 0usize;

    for directive in directives(text) {
        count += 1;
        if let Some(long) = directive.strip_prefix("--") {
            if !apply_long(&mut options, long) {
                rejected.push(String::from(long));
            }
        } else if let Some(short) = directive.strip_prefix('-') {
            if !apply_short(&mut options, short) {
                rejected.push(String::from(directive));
            }
        } else if !apply_long(&mut options, directive) {
            rejected.push(String::from(directive));
        }
    }

    if !rejected.is_empty() {
        tracing::debug!(count, rejected = rejected.len(), "rejected formatting options");
        return Err(OptionsError { rejected });
    }

    tracing::trace!(count, ?options, "parsed formatting options");
    Ok(options)
}

impl FromStr for FormatOptions {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_options(s)
    }
}

fn directives(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(|line| match line.find('#') {
            Some(comment) => &line[..comment],
            None => line,
        })
        .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == ','))
        .filter(|directive| !directive.is_empty())
}

fn apply_long(options: &mut FormatOptions, option: &str) -> bool {
    let (name, value) = match option.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (option, None),
    };

    match (name, value) {
        ("style", Some(value)) => match BraceStyle::from_name(value) {
            Some(style) => {
                options.set_brace_style(style);
                true
            }
            None => false,
        },
        ("indent", Some(value)) => {
            let (kind, width) = match value.split_once('=') {
                Some((kind, width)) => (kind, Some(width)),
                None => (value, None),
            };
            let kind = match kind {
                "spaces" => IndentKind::Spaces,
                "tab" => IndentKind::Tab,
                "force-tab" => IndentKind::ForceTab,
                _ => return false,
            };
            let width = match width {
                Some(width) => match width.parse::<usize>() {
                    Ok(width) => Some(width),
                    Err(_) => return false,
                },
                None => None,
            };
            set_indent(options, kind, width)
        }
        ("align-pointer", Some(value)) => {
            options.align_pointer = Some(match value {
                "type" => PointerAlign::Type,
                "middle" => PointerAlign::Middle,
                "name" => PointerAlign::Name,
                _ => return false,
            });
            true
        }
        ("lineend", Some(value)) => {
            options.line_end = Some(match value {
                "windows" => LineEnd::Windows,
                "linux" => LineEnd::Linux,
                "macold" => LineEnd::MacOld,
                _ => return false,
            });
            true
        }
        ("mode", Some(value)) => {
            options.mode = match value {
                "c" => SourceMode::C,
                "java" => SourceMode::Java,
                "cs" => SourceMode::CSharp,
                _ => return false,
            };
            true
        }
        ("pad-paren", None) => {
            options.pad_paren_out = true;
            options.pad_paren_in = true;
            true
        }
        (name, None) => match long_flag(options, name) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn long_flag<'a>(options: &'a mut FormatOptions, name: &str) -> Option<&'a mut bool> {
    Some(match name {
        "indent-classes" => &mut options.indent_classes,
        "indent-modifiers" => &mut options.indent_modifiers,
        "indent-switches" => &mut options.indent_switches,
        "indent-cases" => &mut options.indent_cases,
        "indent-namespaces" => &mut options.indent_namespaces,
        "attach-namespaces" => &mut options.attach_namespaces,
        "attach-classes" => &mut options.attach_classes,
        "break-closing-braces" => &mut options.break_closing_braces,
        "break-blocks" => &mut options.break_blocks,
        "delete-empty-lines" => &mut options.delete_empty_lines,
        "pad-oper" => &mut options.pad_oper,
        "pad-comma" => &mut options.pad_comma,
        "pad-paren-out" => &mut options.pad_paren_out,
        "pad-paren-in" => &mut options.pad_paren_in,
        "pad-header" => &mut options.pad_header,
        "unpad-paren" => &mut options.unpad_paren,
        "add-braces" => &mut options.add_braces,
        "keep-one-line-blocks" => &mut options.keep_one_line_blocks,
        "keep-one-line-statements" => &mut options.keep_one_line_statements,
        "convert-tabs" => &mut options.convert_tabs,
        _ => return None,
    })
}

fn set_indent(options: &mut FormatOptions, kind: IndentKind, width: Option<usize>) -> bool {
    let width = width.unwrap_or(DEFAULT_INDENT_WIDTH);
    if !(MIN_INDENT_WIDTH..=MAX_INDENT_WIDTH).contains(&width) {
        return false;
    }
    options.indent_kind = kind;
    options.indent_width = width;
    true
}

/// Applies a group of short options such as `pUxg` or `s2`.
fn apply_short(options: &mut FormatOptions, group: &str) -> bool {
    let mut chars = group.chars().peekable();
    if chars.peek().is_none() {
        return false;
    }

    while let Some(letter) = chars.next() {
        let (extended, letter) = match letter {
            'x' => match chars.next() {
                Some(letter) => (true, letter),
                None => return false,
            },
            letter => (false, letter),
        };

        let mut number: Option<u32> = None;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            chars.next();
            number = match number.unwrap_or(0).checked_mul(10) {
                Some(value) => value.checked_add(digit),
                None => None,
            };
            if number.is_none() {
                return false;
            }
        }

        if !apply_short_option(options, extended, letter, number) {
            return false;
        }
    }
    true
}

fn apply_short_option(
    options: &mut FormatOptions,
    extended: bool,
    letter: char,
    number: Option<u32>,
) -> bool {
    let width = number.map(|n| n as usize);
    let flag = match (extended, letter, number) {
        (false, 'A', Some(number)) => {
            return match BraceStyle::from_short_number(number) {
                Some(style) => {
                    options.set_brace_style(style);
                    true
                }
                None => false,
            }
        }
        (false, 's', _) => return set_indent(options, IndentKind::Spaces, width),
        (false, 't', _) => return set_indent(options, IndentKind::Tab, width),
        (false, 'T', _) => return set_indent(options, IndentKind::ForceTab, width),
        (false, 'k', Some(number)) => {
            options.align_pointer = Some(match number {
                1 => PointerAlign::Type,
                2 => PointerAlign::Middle,
                3 => PointerAlign::Name,
                _ => return false,
            });
            return true;
        }
        (false, 'z', Some(number)) => {
            options.line_end = Some(match number {
                1 => LineEnd::Windows,
                2 => LineEnd::Linux,
                3 => LineEnd::MacOld,
                _ => return false,
            });
            return true;
        }
        (false, 'P', None) => {
            options.pad_paren_out = true;
            options.pad_paren_in = true;
            return true;
        }
        (false, 'C', None) => &mut options.indent_classes,
        (false, 'S', None) => &mut options.indent_switches,
        (false, 'K', None) => &mut options.indent_cases,
        (false, 'N', None) => &mut options.indent_namespaces,
        (false, 'y', None) => &mut options.break_closing_braces,
        (false, 'f', None) => &mut options.break_blocks,
        (false, 'p', None) => &mut options.pad_oper,
        (false, 'd', None) => &mut options.pad_paren_out,
        (false, 'D', None) => &mut options.pad_paren_in,
        (false, 'H', None) => &mut options.pad_header,
        (false, 'U', None) => &mut options.unpad_paren,
        (false, 'j', None) => &mut options.add_braces,
        (false, 'O', None) => &mut options.keep_one_line_blocks,
        (false, 'o', None) => &mut options.keep_one_line_statements,
        (false, 'c', None) => &mut options.convert_tabs,
        (true, 'n', None) => &mut options.attach_namespaces,
        (true, 'c', None) => &mut options.attach_classes,
        (true, 'G', None) => &mut options.indent_modifiers,
        (true, 'e', None) => &mut options.delete_empty_lines,
        (true, 'g', None) => &mut options.pad_comma,
        _ => return false,
    };
    *flag = true;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use rstest::rstest;

    #[rstest]
    fn empty_text_gives_defaults() {
        assert_eq!(parse_options("").unwrap(), FormatOptions::default());
        assert_eq!(parse_options("  \n\t ,, ").unwrap(), FormatOptions::default());
    }

    #[rstest]
    #[case::long("--style=mozilla")]
    #[case::bare("style=mozilla")]
    #[case::short("-A16")]
    fn style_forms_are_equivalent(#[case] text: &str) {
        let options = parse_options(text).unwrap();
        assert_eq!(options.brace_style, BraceStyle::Mozilla);
    }

    #[rstest]
    #[case::k_and_r("--style=k&r", BraceStyle::KernighanRitchie)]
    #[case::otbs("--style=otbs", BraceStyle::OneTrueBrace)]
    #[case::banner("--style=banner", BraceStyle::Ratliff)]
    #[case::bsd("--style=bsd", BraceStyle::Allman)]
    fn style_aliases(#[case] text: &str, #[case] expected: BraceStyle) {
        assert_eq!(parse_options(text).unwrap().brace_style, expected);
    }

    #[rstest]
    #[case::spaces_default("--indent=spaces", IndentKind::Spaces, 4)]
    #[case::spaces_width("--indent=spaces=2", IndentKind::Spaces, 2)]
    #[case::tab("--indent=tab=8", IndentKind::Tab, 8)]
    #[case::force_tab("--indent=force-tab", IndentKind::ForceTab, 4)]
    #[case::short_spaces("-s3", IndentKind::Spaces, 3)]
    #[case::short_tab("-t", IndentKind::Tab, 4)]
    #[case::short_force_tab("-T6", IndentKind::ForceTab, 6)]
    fn indentation(#[case] text: &str, #[case] kind: IndentKind, #[case] width: usize) {
        let options = parse_options(text).unwrap();
        assert_eq!(options.indent_kind, kind);
        assert_eq!(options.indent_width, width);
    }

    #[rstest]
    fn combined_short_options() {
        let options = parse_options("-pUxgk3").unwrap();
        assert!(options.pad_oper);
        assert!(options.unpad_paren);
        assert!(options.pad_comma);
        assert_eq!(options.align_pointer, Some(PointerAlign::Name));
    }

    #[rstest]
    fn comments_and_commas_separate_directives() {
        let text = "# project style\n--style=java,--pad-oper # trailing\nindent-switches\n";
        let options = parse_options(text).unwrap();
        assert_eq!(options.brace_style, BraceStyle::Java);
        assert!(options.pad_oper);
        assert!(options.indent_switches);
    }

    #[rstest]
    fn pad_paren_sets_both_sides() {
        let options = parse_options("--pad-paren").unwrap();
        assert!(options.pad_paren_in && options.pad_paren_out);
    }

    #[rstest]
    #[case::unknown("--unknown-flag", vec!["unknown-flag"])]
    #[case::bad_style("--style=gnu", vec!["style=gnu"])]
    #[case::width_too_small("--indent=spaces=1", vec!["indent=spaces=1"])]
    #[case::width_too_large("-s21", vec!["-s21"])]
    #[case::flag_with_value("--pad-oper=yes", vec!["pad-oper=yes"])]
    #[case::missing_value("--style", vec!["style"])]
    #[case::bare_dash("-", vec!["-"])]
    #[case::several("--nope -q pad-oper --style=lisp", vec!["nope", "-q", "style=lisp"])]
    fn rejected_directives_are_collected(#[case] text: &str, #[case] expected: Vec<&str>) {
        let error = parse_options(text).unwrap_err();
        assert_eq!(error.rejected, expected);
    }

    #[rstest]
    fn error_message_matches_astyle() {
        let error = parse_options("--unknown-flag").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid Artistic Style options:\n\tunknown-flag"
        );
    }

    #[rstest]
    fn from_str_parses() {
        let options: FormatOptions = "--mode=java --lineend=windows".parse().unwrap();
        assert_eq!(options.mode, SourceMode::Java);
        assert_eq!(options.line_end, Some(LineEnd::Windows));
    }
}
