//! Split a call's argument text into its top-level argument expressions.

/// Parse the argument list of a call.
///
/// `text` starts at (or before) the call's opening parenthesis, e.g.
/// `(a, bar(b, c)) + rest`. Text before the first `(` is kept as part of
/// the first argument, so callers normally pass text that starts with it.
/// Scanning stops at the parenthesis that closes the call.
///
/// Only parentheses count for nesting. Commas inside string literals,
/// brackets or braces are separators like any other, so `f("x,y")` yields
/// two arguments, `"x` and `y"`. Callers depend on that behavior.
#[must_use]
pub fn parse_arg_list(text: &str) -> Vec<String> {
    // -1 until the call's own opening parenthesis has been consumed.
    let mut nest_level: i32 = -1;
    let mut args = vec![String::new()];

    for ch in text.chars() {
        match ch {
            '(' => {
                nest_level += 1;
                if nest_level == 0 {
                    continue;
                }
            }
            ')' => {
                nest_level -= 1;
                if nest_level < 0 {
                    break;
                }
            }
            ',' if nest_level == 0 => {
                args.push(String::new());
                continue;
            }
            _ => {}
        }
        if let Some(current) = args.last_mut() {
            current.push(ch);
        }
    }

    args.into_iter().map(|arg| arg.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str) -> Vec<String> {
        parse_arg_list(text)
    }

    #[test]
    fn simple_args() {
        assert_eq!(args("(a, b, c)"), vec!["a", "b", "c"]);
    }

    #[test]
    fn nested_call_is_one_argument() {
        assert_eq!(args("(a, bar(b, c))"), vec!["a", "bar(b, c)"]);
    }

    #[test]
    fn string_literal_commas_split() {
        assert_eq!(
            args(r#"(a, bar(b, c), "x,y")"#),
            vec!["a", "bar(b, c)", "\"x", "y\""]
        );
    }

    #[test]
    fn brackets_do_not_nest() {
        assert_eq!(args("(v[0], [1, 2])"), vec!["v[0]", "[1", "2]"]);
    }

    #[test]
    fn trailing_text_after_close_is_ignored() {
        assert_eq!(args("(x, 5); other(y)"), vec!["x", "5"]);
    }

    #[test]
    fn empty_call_has_one_empty_argument() {
        assert_eq!(args("()"), vec![""]);
    }

    #[test]
    fn trailing_comma_yields_empty_last_argument() {
        assert_eq!(args("(x,"), vec!["x", ""]);
    }

    #[test]
    fn unclosed_call_keeps_everything() {
        assert_eq!(args("(a, f(b"), vec!["a", "f(b"]);
    }
}
