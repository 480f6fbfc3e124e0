//! Small text helpers shared by the reports.

/// `indent` spaces, then `ch` repeated `width` times, optionally newline-terminated.
pub fn sprint_dashes(indent: usize, width: usize, line_feed: bool, ch: char) -> String {
    let mut out = " ".repeat(indent);
    out.extend(std::iter::repeat_n(ch, width));
    if line_feed {
        out.push('\n');
    }
    out
}

pub fn sindent(text: &str, indent: usize) -> String {
    format!("{}{}", " ".repeat(indent), text)
}

pub fn sprint(buffer: &str) -> String {
    buffer.to_string()
}

pub fn sprintn(buffer: &str) -> String {
    format!("{}\n", buffer)
}
