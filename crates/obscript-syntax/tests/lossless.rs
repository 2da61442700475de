mod common;
use common::*;

use obscript_syntax::algo::text_of;

const CORPUS: &[&str] = &[
    "",
    "\n\n\n",
    "scn",
    "scn T",
    "scn T\nbegin",
    "scn T\nbegin GameMode\nif\nelseif\nelse\n",
    "scn T\nset to to to\n",
    "scn T\n)))(((\n",
    "scn T\nlet f := (begin Function {\nreturn\n",
    "scn T\nforeach <- <- loop loop\n",
    "scn T\n\"unterminated\nstring\nend",
    "scn T\n@ # $ % ^ & * ( ) [ ] { }\n",
    "scn T\nbegin A\nbegin B\nbegin C\nend\nend\nend\nend\nend\n",
    "endif endif endif\nscn T\nscn U\n",
    "scn T\r\nset x to 1 ; trailing\r\n  \t\r\n",
    "scn T\nset a.b[c].d->e to (1 + (2 * (3 ^ 4)))\n",
    "scn T\n\u{e9}\u{1f600} \u{0}\n",
    "1 + * / 2",
];

#[test]
fn test_script_parse_is_lossless() {
    for source in CORPUS {
        let parsed = parse(source);
        assert_eq!(&text_of(&parsed.syntax()), source);
        assert_eq!(u32::from(parsed.syntax().text_range().len()) as usize, source.len());
    }
}

#[test]
fn test_expr_parse_is_lossless() {
    for source in CORPUS {
        let parsed = parse_expr(source);
        assert_eq!(&text_of(&parsed.syntax()), source);
    }
}

#[test]
fn test_error_ranges_are_in_bounds() {
    for source in CORPUS {
        let parsed = parse(source);
        for error in parsed.errors() {
            assert!(
                usize::from(error.range.end()) <= source.len(),
                "{error} out of bounds in {source:?}"
            );
        }
    }
}
