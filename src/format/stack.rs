//! Call stack trace rendering.
//!
//! ```text
//! --------------------------------------------------------------------------------
//! Call stack
//!
//! Line # Function name and arguments
//! ------ -------------------------------------------------------------------------
//!     31 func1 (last_name = "walsh", first_name = "mikey")
//!     59 demo --flag
//! --------------------------------------------------------------------------------
//! ```

use super::text::{sindent, sprint_dashes};
use crate::stack::StackFrame;

/// Function name shown for a frame whose name is unknown.
pub const NO_FUNCTION: &str = "(none)";

/// Trace of `frames` (innermost first), starting at `start_ix`.
///
/// Each row shows the line number of the next outer frame, i.e. the line
/// where the row's function was called from; the outermost row has none.
pub fn sprint_call_stack(frames: &[StackFrame], indent: usize, start_ix: usize) -> String {
    let mut out = String::new();
    out.push_str(&sprint_dashes(indent, 80, true, '-'));
    out.push_str(&sindent("Call stack\n\n", indent));
    out.push_str(&sindent("Line # Function name and arguments\n", indent));
    out.push_str(&sprint_dashes(indent, 6, false, '-'));
    out.push(' ');
    out.push_str(&sprint_dashes(0, 73, true, '-'));

    for (ix, frame) in frames.iter().enumerate().skip(start_ix) {
        let line = frames
            .get(ix + 1)
            .map(|outer| outer.line.to_string())
            .unwrap_or_default();
        out.push_str(&sindent(&format!("{:>6} {}\n", line, func_and_args(frame)), indent));
    }

    out.push_str(&sprint_dashes(indent, 80, true, '-'));
    out
}

/// `name (p = repr, ...)`, or the invocation text for the module frame.
pub fn func_and_args(frame: &StackFrame) -> String {
    if frame.is_module() {
        return frame.invocation.clone().unwrap_or_default();
    }
    let name = if frame.function.is_empty() {
        NO_FUNCTION
    } else {
        &frame.function
    };
    let params = frame
        .params
        .iter()
        .map(|(p, repr)| format!("{} = {}", p, repr))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} ({})", name, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames() -> Vec<StackFrame> {
        vec![
            StackFrame::synthetic("print_call_stack"),
            StackFrame::function("func1", "scr.rs", 20)
                .at(31)
                .with_params(vec![
                    ("last_name".into(), "\"walsh\"".into()),
                    ("first_name".into(), "\"mikey\"".into()),
                ]),
            StackFrame::module("scr.rs", 59, "scr", "scr --flag"),
        ]
    }

    #[test]
    fn rows_use_the_outer_frame_line() {
        let text = sprint_call_stack(&frames(), 0, 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "-".repeat(80));
        assert_eq!(lines[1], "Call stack");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Line # Function name and arguments");
        assert_eq!(lines[4], format!("{} {}", "-".repeat(6), "-".repeat(73)));
        assert_eq!(
            lines[5],
            "    59 func1 (last_name = \"walsh\", first_name = \"mikey\")"
        );
        assert_eq!(lines[6], "       scr --flag");
        assert_eq!(lines[7], "-".repeat(80));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn indent_applies_to_every_line() {
        let text = sprint_call_stack(&frames(), 2, 0);
        assert!(text.lines().all(|l| l.is_empty() || l.starts_with("  ")));
        assert!(text.contains("      31 print_call_stack ()\n"));
    }

    #[test]
    fn unnamed_function() {
        let frame = StackFrame::synthetic("");
        assert_eq!(func_and_args(&frame), "(none) ()");
    }
}
