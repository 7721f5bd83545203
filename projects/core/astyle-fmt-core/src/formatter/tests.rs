use super::format_source;
use crate::options::parse_options;
use alloc::string::String;
use rstest::rstest;

fn format(source: &str, options: &str) -> String {
    let options = parse_options(options).unwrap();
    format_source(source, &options)
}

const NESTED: &str = "\
int main() {
    if (x) {
        y();
    } else {
        z();
    }
}";

const NESTED_ALLMAN: &str = "\
int main()
{
    if (x)
    {
        y();
    }
    else
    {
        z();
    }
}";

#[rstest]
#[case::allman("--style=allman", NESTED, NESTED_ALLMAN)]
#[case::java("--style=java", NESTED_ALLMAN, NESTED)]
#[case::stroustrup(
    "--style=stroustrup",
    NESTED,
    "int main()\n{\n    if (x) {\n        y();\n    }\n    else {\n        z();\n    }\n}"
)]
#[case::kr(
    "--style=kr",
    NESTED_ALLMAN,
    "int main()\n{\n    if (x) {\n        y();\n    } else {\n        z();\n    }\n}"
)]
#[case::whitesmith(
    "--style=whitesmith",
    "void f()\n{\nx();\n}",
    "void f()\n    {\n    x();\n    }"
)]
#[case::ratliff(
    "--style=ratliff",
    "void f()\n{\nx();\n}",
    "void f() {\n    x();\n    }"
)]
fn brace_styles(#[case] options: &str, #[case] source: &str, #[case] expected: &str) {
    assert_eq!(format(source, options), expected);
}

#[rstest]
fn mozilla_breaks_functions_only() {
    let source = "\
int main(int argc, char** argv) {
  if (argc == 0) {
    return 1;
  }
  return 0;
}";
    let expected = "\
int main(int argc, char** argv)
{
    if (argc == 0) {
        return 1;
    }
    return 0;
}";
    assert_eq!(format(source, "--style=mozilla --mode=c"), expected);
}

#[rstest]
#[case::one_line("int main() { foo(); }\n")]
#[case::already_formatted("int main()\n{\n    foo();\n}\n")]
fn otbs_formats_functions(#[case] source: &str) {
    assert_eq!(format(source, "--style=otbs"), "int main()\n{\n    foo();\n}\n");
}

#[rstest]
#[case::statement("int x=1;")]
#[case::empty("")]
#[case::only_newlines("\n\n")]
#[case::preprocessor_and_comments(
    "#include <stdio.h>\nint main()\n{\n#ifdef A\n    a();\n#else\n    b();\n#endif\n    // done\n    return 0;\n}\n"
)]
#[case::lambda("auto f = [](int x) { return x; };")]
#[case::multi_line_lambda(
    "std::sort(v.begin(), v.end(), [](int a, int b) {\n    return a < b;\n});"
)]
#[case::else_if_chain("if (a)\n    x();\nelse if (b)\n    y();\nelse\n    z();\n")]
#[case::blank_lines("a;\n\n\nb;\n")]
#[case::leading_blank_lines("\n\na;")]
#[case::multi_line_comment("/* a\n b */\nint x;")]
#[case::continued_define("#define A \\\n  1\nint x;")]
fn default_options_keep_formatted_code(#[case] source: &str) {
    assert_eq!(format(source, ""), source);
}

#[rstest]
fn trailing_whitespace_is_removed() {
    assert_eq!(format("int a;   \nint b;\t\n", ""), "int a;\nint b;\n");
}

#[rstest]
#[case::split("a(); b();", "", "a();\nb();")]
#[case::kept("a(); b();", "--keep-one-line-statements", "a(); b();")]
fn one_statement_per_line(#[case] source: &str, #[case] options: &str, #[case] expected: &str) {
    assert_eq!(format(source, options), expected);
}

#[rstest]
#[case::kept("--style=allman --keep-one-line-blocks", "void f() { return; }")]
#[case::broken("--style=allman", "void f()\n{\n    return;\n}")]
fn one_line_blocks(#[case] options: &str, #[case] expected: &str) {
    assert_eq!(format("void f() { return; }", options), expected);
}

#[rstest]
fn header_body_on_next_line_is_indented() {
    assert_eq!(format("if (x)\ny();\nz();", ""), "if (x)\n    y();\nz();");
}

#[rstest]
#[case::operators("int x=a+b*c;\n", "int x = a + b * c;\n")]
#[case::unary_after_comma("f(a,-b);", "f(a, -b);")]
#[case::compound("x+=1;", "x += 1;")]
#[case::ternary("y=a?b:c;", "y = a ? b : c;")]
#[case::for_condition("for (i=0; i<n; i++) {}", "for (i = 0; i < n; i++) {}")]
#[case::template_left_alone("std::vector<int> v;", "std::vector<int> v;")]
#[case::dereference_left_alone("x=*p;", "x = *p;")]
fn pad_oper(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(format(source, "--pad-oper"), expected);
}

#[rstest]
fn pad_comma_only_pads_commas() {
    assert_eq!(format("f(a,b+c);", "--pad-comma"), "f(a, b+c);");
}

#[rstest]
#[case::pad_paren("f(a);", "--pad-paren", "f ( a );")]
#[case::pad_paren_in("f(a);", "--pad-paren-in", "f( a );")]
#[case::pad_paren_out("f(a);", "--pad-paren-out", "f (a);")]
#[case::pad_header("if(x) f(y);", "--pad-header", "if (x) f(y);")]
#[case::unpad("if ( x ) f ( y );", "--unpad-paren", "if(x) f(y);")]
#[case::unpad_keeps_header("if ( x ) f ( y );", "--unpad-paren --pad-header", "if (x) f(y);")]
fn paren_padding(#[case] source: &str, #[case] options: &str, #[case] expected: &str) {
    assert_eq!(format(source, options), expected);
}

#[rstest]
#[case::type_("char *p;", "--align-pointer=type", "char* p;")]
#[case::middle("char*p;", "--align-pointer=middle", "char * p;")]
#[case::name("char* p;", "--align-pointer=name", "char *p;")]
#[case::double("char **argv;", "-k1", "char** argv;")]
#[case::parameter("void f(char *s);", "-k1", "void f(char* s);")]
#[case::reference(
    "void f(const std::string &name);",
    "-k1",
    "void f(const std::string& name);"
)]
#[case::cast_closes("x = (char *)y;", "-k1", "x = (char*)y;")]
#[case::multiplication("x = a * b;", "-k1", "x = a * b;")]
#[case::java_has_no_pointers("int a = b * c;", "--mode=java -k1", "int a = b * c;")]
fn pointer_alignment(#[case] source: &str, #[case] options: &str, #[case] expected: &str) {
    assert_eq!(format(source, options), expected);
}

const SWITCH: &str = "\
switch (x) {
case 1:
    a();
    break;
default:
    b();
}";

#[rstest]
fn switch_labels_stay_at_switch_level_by_default() {
    assert_eq!(format(SWITCH, "--style=java"), SWITCH);
}

#[rstest]
fn indent_switches_indents_labels() {
    let expected = "\
switch (x) {
    case 1:
        a();
        break;
    default:
        b();
}";
    assert_eq!(format(SWITCH, "--style=java --indent-switches"), expected);
}

#[rstest]
fn indent_cases_indents_case_blocks() {
    let source = "switch (x)\n{\ncase 1:\n{\na();\n}\n}";
    let expected = "switch (x)\n{\ncase 1:\n    {\n        a();\n    }\n}";
    assert_eq!(format(source, "--style=allman --indent-cases"), expected);
}

const CLASS: &str = "class A {\npublic:\n    int x;\n};";

#[rstest]
#[case::default("--style=java", CLASS)]
#[case::indent_classes("--style=java -C", "class A {\n    public:\n        int x;\n};")]
#[case::indent_modifiers("--style=java -xG", "class A {\n  public:\n    int x;\n};")]
#[case::mozilla("--style=mozilla", "class A\n{\npublic:\n    int x;\n};")]
fn class_bodies(#[case] options: &str, #[case] expected: &str) {
    assert_eq!(format(CLASS, options), expected);
}

#[rstest]
#[case::default("--style=java", "namespace n {\nint a;\n}")]
#[case::indented("--style=java -N", "namespace n {\n    int a;\n}")]
#[case::kr("--style=kr", "namespace n\n{\nint a;\n}")]
#[case::attach_override("--style=kr -xn", "namespace n {\nint a;\n}")]
fn namespaces(#[case] options: &str, #[case] expected: &str) {
    assert_eq!(format("namespace n {\nint a;\n}", options), expected);
}

#[rstest]
#[case::java("--style=java", "enum E {\n    A,\n    B\n};")]
#[case::mozilla("--style=mozilla", "enum E\n{\n    A,\n    B\n};")]
fn enum_members_are_list_items(#[case] options: &str, #[case] expected: &str) {
    assert_eq!(format("enum E {\nA,\nB\n};", options), expected);
}

#[rstest]
fn initializers_keep_their_lines() {
    let source = "int a[] = {\n1, 2,\n3\n};";
    let expected = "int a[] = {\n    1, 2,\n    3\n};";
    assert_eq!(format(source, "--style=allman"), expected);
}

#[rstest]
#[case::aligned_to_paren("int x = foo(a,\nb);", "int x = foo(a,\n            b);")]
#[case::paren_at_line_end("foo(\na, b);", "foo(\n    a, b);")]
#[case::no_paren("int x = a +\nb;", "int x = a +\n    b;")]
fn continuation_lines(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(format(source, ""), expected);
}

#[rstest]
fn block_comments_move_with_their_first_line() {
    let source = "void f()\n{\n        /* a\n         * b\n         */\n        x();\n}";
    let expected = "void f()\n{\n    /* a\n     * b\n     */\n    x();\n}";
    assert_eq!(format(source, ""), expected);
}

#[rstest]
fn column_zero_line_comments_stay_put() {
    let source = "void f()\n{\n// off\n    x();\n}";
    assert_eq!(format(source, ""), source);
}

#[rstest]
fn break_blocks_surrounds_header_blocks() {
    let source = "void f()\n{\n    a();\n    if (x)\n    {\n        b();\n    }\n    c();\n}";
    let expected =
        "void f()\n{\n    a();\n\n    if (x)\n    {\n        b();\n    }\n\n    c();\n}";
    assert_eq!(format(source, "--style=allman --break-blocks"), expected);
}

#[rstest]
fn delete_empty_lines_inside_functions() {
    let source = "int a;\n\nvoid f()\n{\n    a();\n\n    b();\n}";
    let expected = "int a;\n\nvoid f()\n{\n    a();\n    b();\n}";
    assert_eq!(format(source, "--delete-empty-lines"), expected);
}

#[rstest]
#[case::attached("if (x) y();\n", "--style=java --add-braces", "if (x) {\n    y();\n}\n")]
#[case::otbs_else(
    "if (a) x(); else y();\n",
    "--style=1tbs",
    "if (a) {\n    x();\n} else {\n    y();\n}\n"
)]
#[case::broken(
    "while (x)\n    y();",
    "--style=allman -j",
    "while (x)\n{\n    y();\n}"
)]
fn add_braces(#[case] source: &str, #[case] options: &str, #[case] expected: &str) {
    assert_eq!(format(source, options), expected);
}

#[rstest]
fn break_closing_braces_moves_else() {
    let source = "if (a) {\n    x();\n} else {\n    y();\n}";
    let expected = "if (a) {\n    x();\n}\nelse {\n    y();\n}";
    assert_eq!(format(source, "--style=java --break-closing-braces"), expected);
}

#[rstest]
fn do_while_keeps_while_on_the_closing_line() {
    let source = "do\n{\n    x();\n}\nwhile (y);";
    assert_eq!(format(source, "--style=java"), "do {\n    x();\n} while (y);");
}

#[rstest]
#[case::tab("--indent=tab", "void f()\n{\n\tx();\n}")]
#[case::two_spaces("-s2", "void f()\n{\n  x();\n}")]
fn indentation_characters(#[case] options: &str, #[case] expected: &str) {
    assert_eq!(format("void f()\n{\nx();\n}", options), expected);
}

#[rstest]
fn convert_tabs_expands_tabs_between_tokens() {
    assert_eq!(format("int\ta;", "--convert-tabs"), "int a;");
}

#[rstest]
#[case::detected("a;\r\nb;\r\n", "", "a;\r\nb;\r\n")]
#[case::requested("a;\r\nb;\r\n", "--lineend=linux", "a;\nb;\n")]
#[case::old_mac("a;\nb;", "-z3", "a;\rb;")]
fn line_endings(#[case] source: &str, #[case] options: &str, #[case] expected: &str) {
    assert_eq!(format(source, options), expected);
}

#[rstest]
fn conditional_branches_start_from_the_same_state() {
    let source = "\
#if A
void f(int a) {
#else
void f() {
#endif
    x();
}
";
    assert_eq!(format(source, "--style=java"), source);
}

#[rstest]
fn unbalanced_braces_do_not_panic() {
    let output = format("}}\nint a;\n{{", "--style=allman");
    assert!(output.contains("int a;"));
}

#[rstest]
fn formatting_is_stable() {
    let once = format(NESTED, "--style=allman --pad-oper --indent-switches");
    let twice = format(&once, "--style=allman --pad-oper --indent-switches");
    assert_eq!(once, twice);
}
