//! Read JSON text into a [`Value`] so it can be dumped.
//!
//! Object member order is kept. Numbers without a fraction or exponent
//! become `Int` when they fit; everything else numeric is `Float`.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{GpError, Result};
use crate::value::Value;

pub fn parse(text: &str) -> Result<Value> {
    let mut reader = Reader {
        chars: text.char_indices().peekable(),
        len: text.len(),
    };
    let value = reader.value()?;
    reader.skip_ws();
    match reader.chars.peek() {
        None => Ok(value),
        Some(&(offset, _)) => Err(invalid(offset, "trailing characters")),
    }
}

struct Reader<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl Reader<'_> {
    fn value(&mut self) -> Result<Value> {
        self.skip_ws();
        match self.peek()? {
            '"' => self.string().map(Value::Str),
            '{' => self.object(),
            '[' => self.array(),
            't' | 'f' | 'n' => self.word(),
            _ => self.number(),
        }
    }

    fn string(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut s = String::new();
        loop {
            match self.next()? {
                '"' => return Ok(s),
                '\\' => match self.next()? {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    '/' => s.push('/'),
                    'b' => s.push('\u{8}'),
                    'f' => s.push('\u{c}'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    'r' => s.push('\r'),
                    'u' => {
                        let offset = self.offset();
                        let mut hex = String::new();
                        for _ in 0..4 {
                            hex.push(self.next()?);
                        }
                        let ch = u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| invalid(offset, "bad unicode escape"))?;
                        s.push(ch);
                    }
                    _ => return Err(invalid(self.offset(), "bad escape")),
                },
                ch => s.push(ch),
            }
        }
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.offset();
        let mut buf = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            let sign_ok = buf.is_empty() || buf.ends_with(['e', 'E']);
            if ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E') || (matches!(ch, '-' | '+') && sign_ok) {
                buf.push(ch);
                self.chars.next();
            } else {
                break;
            }
        }
        if !buf.contains(['.', 'e', 'E'])
            && let Ok(n) = buf.parse::<i64>()
        {
            return Ok(Value::Int(n));
        }
        buf.parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid(start, "expected a value"))
    }

    fn object(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut pairs = Vec::new();
        self.skip_ws();
        if self.peek()? == '}' {
            self.chars.next();
            return Ok(Value::Map(pairs));
        }
        loop {
            self.skip_ws();
            let key = self.string()?;
            self.skip_ws();
            self.expect(':')?;
            pairs.push((key, self.value()?));
            self.skip_ws();
            match self.next()? {
                ',' => {}
                '}' => return Ok(Value::Map(pairs)),
                _ => return Err(invalid(self.offset(), "expected ',' or '}'")),
            }
        }
    }

    fn array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek()? == ']' {
            self.chars.next();
            return Ok(Value::list(items));
        }
        loop {
            items.push(self.value()?);
            self.skip_ws();
            match self.next()? {
                ',' => {}
                ']' => return Ok(Value::list(items)),
                _ => return Err(invalid(self.offset(), "expected ',' or ']'")),
            }
        }
    }

    fn word(&mut self) -> Result<Value> {
        let start = self.offset();
        let mut word = String::new();
        while let Some(&(_, ch)) = self.chars.peek() {
            if !ch.is_ascii_alphabetic() {
                break;
            }
            word.push(ch);
            self.chars.next();
        }
        match word.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::None),
            _ => Err(invalid(start, "expected a value")),
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|&(_, ch)| ch.is_ascii_whitespace()).is_some() {}
    }

    fn expect(&mut self, want: char) -> Result<()> {
        let offset = self.offset();
        if self.next()? == want {
            Ok(())
        } else {
            Err(invalid(offset, &format!("expected '{}'", want)))
        }
    }

    fn peek(&mut self) -> Result<char> {
        match self.chars.peek() {
            Some(&(_, ch)) => Ok(ch),
            None => Err(invalid(self.len, "unexpected end of input")),
        }
    }

    fn next(&mut self) -> Result<char> {
        match self.chars.next() {
            Some((_, ch)) => Ok(ch),
            None => Err(invalid(self.len, "unexpected end of input")),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.len, |&(offset, _)| offset)
    }
}

fn invalid(offset: usize, message: &str) -> GpError {
    GpError::Json {
        offset,
        message: message.to_string(),
    }
}
