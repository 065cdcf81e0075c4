//! Static scan for interactive stdin reads in C/C++ source.
//!
//! When a compiled program is run with an empty input buffer and the source
//! reads from `cin`, the process would block until the deadline kills it.
//! This scan lets the orchestrator fail fast with a useful message instead.
//! Best-effort by design: false negatives are acceptable, false positives
//! are not - hence the comment/string stripping pass.

use regex::Regex;
use std::sync::OnceLock;

fn cin_read_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Word boundary keeps identifiers like `my_cin` from matching; the
    // optional std:: qualifier is covered because `std::cin` still contains
    // a boundary before `cin`.
    PATTERN.get_or_init(|| Regex::new(r"\bcin\s*>>").expect("literal pattern"))
}

/// True when the source extracts from `cin` (optionally `std::cin`) outside
/// comments and string/char literals.
pub fn uses_interactive_read(source: &str) -> bool {
    let stripped = strip_comments_and_literals(source);
    cin_read_pattern().is_match(&stripped)
}

#[derive(Clone, Copy, PartialEq)]
enum ScanState {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
    CharLiteral,
}

/// Replace comments and string/char literal contents with single spaces.
/// Spaces (rather than plain removal) keep surrounding tokens separated, so
/// stripping can never splice a new `cin >>` into existence.
fn strip_comments_and_literals(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut state = ScanState::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            ScanState::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = ScanState::LineComment;
                    out.push(' ');
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = ScanState::BlockComment;
                    out.push(' ');
                }
                '"' => {
                    state = ScanState::StringLiteral;
                    out.push(' ');
                }
                '\'' => {
                    state = ScanState::CharLiteral;
                    out.push(' ');
                }
                _ => out.push(c),
            },
            ScanState::LineComment => {
                if c == '\n' {
                    state = ScanState::Code;
                    out.push('\n');
                }
            }
            ScanState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = ScanState::Code;
                }
            }
            ScanState::StringLiteral => match c {
                '\\' => {
                    chars.next();
                }
                '"' => state = ScanState::Code,
                _ => {}
            },
            ScanState::CharLiteral => match c {
                '\\' => {
                    chars.next();
                }
                '\'' => state = ScanState::Code,
                _ => {}
            },
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_cin_read() {
        assert!(uses_interactive_read("int n; cin >> n;"));
    }

    #[test]
    fn test_qualified_cin_read() {
        assert!(uses_interactive_read("int n; std::cin >> n;"));
        assert!(uses_interactive_read("std :: cin>>n;"));
    }

    #[test]
    fn test_whitespace_between_cin_and_operator() {
        assert!(uses_interactive_read("cin\n    >> value;"));
    }

    #[test]
    fn test_line_comment_is_not_a_read() {
        assert!(!uses_interactive_read("// cin >> n;\nint main() { return 0; }"));
    }

    #[test]
    fn test_block_comment_is_not_a_read() {
        assert!(!uses_interactive_read("/* cin >> n; */ int main() {}"));
    }

    #[test]
    fn test_string_literal_is_not_a_read() {
        assert!(!uses_interactive_read(r#"cout << "usage: cin >> n";"#));
    }

    #[test]
    fn test_escaped_quote_does_not_desync_scanner() {
        assert!(!uses_interactive_read(r#"cout << "say \"cin >> n\"";"#));
        assert!(uses_interactive_read(
            r#"cout << "say \"hi\""; cin >> n;"#
        ));
    }

    #[test]
    fn test_identifier_containing_cin_is_not_a_read() {
        assert!(!uses_interactive_read("int my_cin = 0; stream_cin >> x;"));
    }

    #[test]
    fn test_comment_inside_real_read_still_matches() {
        assert!(uses_interactive_read("std::cin /* count */ >> n;"));
    }

    #[test]
    fn test_output_only_program() {
        let source = r#"
#include <iostream>
int main() {
    std::cout << "hello" << std::endl;
    return 0;
}
"#;
        assert!(!uses_interactive_read(source));
    }
}
