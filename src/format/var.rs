//! Render name/value pairs as aligned, indented text blocks.
//!
//! Scalars take one line: the `name:` label padded to the column width,
//! then the value. Composite values (maps, sequences, records) print a
//! `name:` header and recurse into their children two columns deeper.
//! Only the last child line of a composite carries the caller's trailing
//! character; every other line ends in `\n`.

use std::fmt::Write;

use crate::value::Value;

/// Name this formatter reports in placeholders for unsupported values.
pub const FORMATTER_NAME: &str = "sprint_varx";

/// Stand-in for an empty string when show-blanks is on.
pub const BLANK: &str = "<blank>";

/// Render `value` labelled `name`.
///
/// `hex` is overloaded by value shape: integers print as `0x%08x`, empty
/// strings print as `<blank>`, and maps switch to terse labels (the key
/// alone) with hex turned off for their integer values.
#[must_use]
pub fn sprint_varx(
    name: &str,
    value: &Value,
    hex: bool,
    indent: usize,
    width: usize,
    trailing: &str,
) -> String {
    let mut block = Block {
        out: String::new(),
        width,
    };
    block.var(name, value, hex, indent, trailing);
    block.out
}

/// Output buffer plus the column width shared by every line of one dump.
struct Block {
    out: String,
    width: usize,
}

impl Block {
    fn var(&mut self, name: &str, value: &Value, hex: bool, indent: usize, trailing: &str) {
        match value {
            Value::Type(type_name) => self.scalar(name, type_name, indent, trailing),
            Value::Map(pairs) => {
                self.header(name, indent);
                let last = pairs.len();
                for (ix, (key, child)) in pairs.iter().enumerate() {
                    let end = if ix + 1 == last { trailing } else { "\n" };
                    if hex {
                        // Terse: the key is the whole label, and integer
                        // values are data rather than hex candidates.
                        let child_hex = !matches!(child, Value::Int(_));
                        self.var(key, child, child_hex, indent + 2, end);
                    } else {
                        let label = format!("{}[{}]", name, key);
                        self.var(&label, child, hex, indent + 2, end);
                    }
                }
            }
            Value::Seq { items, .. } => {
                self.header(name, indent);
                let last = items.len();
                for (ix, child) in items.iter().enumerate() {
                    let end = if ix + 1 == last { trailing } else { "\n" };
                    let label = format!("{}[{}]", name, ix);
                    self.var(&label, child, hex, indent + 2, end);
                }
            }
            Value::Record { fields, .. } => {
                self.header(name, indent);
                let last = fields.len();
                for (ix, (field, child)) in fields.iter().enumerate() {
                    let end = if ix + 1 == last { trailing } else { "\n" };
                    let label = format!("{}.{}", name, field);
                    self.var(&label, child, hex, indent + 2, end);
                }
            }
            Value::Unsupported(type_name) => {
                let text = format!("<{} type not supported by {}()>", type_name, FORMATTER_NAME);
                self.scalar(name, &text, indent, trailing);
            }
            scalar => {
                let text = scalar_text(scalar, hex);
                self.scalar(name, &text, indent, trailing);
            }
        }
    }

    fn header(&mut self, name: &str, indent: usize) {
        let _ = writeln!(self.out, "{:indent$}{}:", "", name, indent = indent);
    }

    fn scalar(&mut self, name: &str, text: &str, indent: usize, trailing: &str) {
        let label = format!("{}:", name);
        let col = self.width.saturating_sub(indent);
        let _ = write!(
            self.out,
            "{:indent$}{:<col$}{}{}",
            "",
            label,
            text,
            trailing,
            indent = indent,
            col = col
        );
    }
}

/// Text for a scalar value under the given hex/show-blanks flag.
#[must_use]
pub fn scalar_text(value: &Value, hex: bool) -> String {
    match value {
        Value::Int(n) if hex => hex_text(*n),
        Value::Int(n) => n.to_string(),
        Value::Str(s) if hex && s.is_empty() => BLANK.to_string(),
        Value::Str(s) => s.clone(),
        Value::Float(f) => float_text(*f),
        Value::Bool(b) => b.to_string(),
        Value::None => "None".to_string(),
        Value::Type(name) | Value::Unsupported(name) => name.clone(),
        other => other.kind_name().to_string(),
    }
}

/// `0x` plus eight zero-padded lowercase hex digits. Negative numbers keep
/// their sign inside the padded field, as printf's `%08x` does for them.
fn hex_text(n: i64) -> String {
    if n < 0 {
        format!("0x-{:07x}", n.unsigned_abs())
    } else {
        format!("0x{:08x}", n)
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        exponent_with_sign(format!("{:?}", f))
    }
}

/// `1e20` → `1e+20`, `1.5e-7` → `1.5e-07`: a signed exponent of at least
/// two digits.
fn exponent_with_sign(text: String) -> String {
    let Some((mantissa, exp)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exp),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}
