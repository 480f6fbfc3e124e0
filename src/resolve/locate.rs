//! Find the source text of the call a frame is executing.

use std::cell::RefCell;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{GpError, Result};
use crate::source::{SourceProvider, function_scope, indent_of, module_scope};
use crate::stack::{FrameSource, Scope, StackFrame};

use super::alias::{AliasSet, alternation};

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(//|#)").expect("comment pattern is valid")
});

/// The logical statement of one call, joined from its physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSiteRecord {
    /// Trimmed lines from start to end, concatenated.
    pub statement: String,
    /// Index of the first line, relative to the scope.
    pub start_ix: usize,
    /// Index of the last line, relative to the scope.
    pub end_ix: usize,
    /// Leading spaces of the first line.
    pub indent: usize,
    /// 1-based file line of scope index 0.
    pub first_line: usize,
    /// `(` followed by everything after the callee name's parenthesis.
    pub arg_text: String,
}

impl CallSiteRecord {
    /// 1-based file lines the statement spans.
    pub fn line_range(&self) -> (usize, usize) {
        (self.first_line + self.start_ix, self.first_line + self.end_ix)
    }
}

/// Pattern matching a line that calls any of `aliases`: everything up to
/// and including the last `alias(` on the line.
pub fn call_pattern(aliases: &AliasSet) -> String {
    format!(r"^.*({})[ ]*\(", alternation(aliases))
}

/// Compiled call patterns, keyed by pattern text.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: RefCell<FxHashMap<String, Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The call regex for `aliases`, compiled on first use.
    pub fn call_regex(&self, aliases: &AliasSet) -> std::result::Result<Regex, regex::Error> {
        let pattern = call_pattern(aliases);
        if let Some(re) = self.compiled.borrow().get(&pattern) {
            return Ok(re.clone());
        }
        let re = Regex::new(&pattern)?;
        self.compiled.borrow_mut().insert(pattern, re.clone());
        Ok(re)
    }

    pub fn len(&self) -> usize {
        self.compiled.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locate the call to `called` (under any of its `aliases`) that `frame`
/// is executing.
///
/// Scans backward from the frame's line for the start of the call, then
/// forward for the first line indented no deeper than the start line; the
/// call ends just before it. This follows indentation, not syntax, so
/// unusually formatted calls can be mis-located.
///
/// A frame positioned in another file than its own (a call made by code
/// that never entered the stack) is searched in that file, as a whole.
pub fn locate(
    frame: &StackFrame,
    called: &str,
    aliases: &AliasSet,
    sources: &dyn SourceProvider,
) -> Result<CallSiteRecord> {
    locate_cached(frame, called, aliases, sources, &PatternCache::new())
}

/// [`locate`], reusing compiled patterns from `patterns`.
pub fn locate_cached(
    frame: &StackFrame,
    called: &str,
    aliases: &AliasSet,
    sources: &dyn SourceProvider,
    patterns: &PatternCache,
) -> Result<CallSiteRecord> {
    let unavailable = || GpError::SourceUnavailable {
        function: frame.function.clone(),
        origin: frame.origin(),
    };
    let not_found = || GpError::CallSiteNotFound {
        function: called.to_string(),
    };

    let (path, scope) = match (&frame.source, &frame.call_file) {
        (FrameSource::Synthetic, _) => return Err(unavailable()),
        (FrameSource::File(own), Some(file)) if own != file => (file, Scope::Module),
        (FrameSource::File(own), _) => (own, frame.scope),
    };
    let file_lines = sources.lines(path).ok_or_else(unavailable)?;
    let (lines, first_line) = match scope {
        Scope::Module => module_scope(&file_lines),
        Scope::Function { start_line } => {
            function_scope(&file_lines, start_line).ok_or_else(not_found)?
        }
    };

    let line_ix = frame
        .line
        .checked_sub(first_line)
        .filter(|ix| *ix < lines.len())
        .ok_or_else(not_found)?;

    let func_re = patterns.call_regex(aliases).map_err(|_| not_found())?;

    let start_ix = (0..=line_ix)
        .rev()
        .filter(|&ix| !COMMENT_LINE.is_match(&lines[ix]))
        .find(|&ix| func_re.is_match(&lines[ix]))
        .ok_or_else(not_found)?;

    let indent = indent_of(&lines[start_ix]);
    let mut end_ix = line_ix;
    for ix in line_ix + 1..lines.len() {
        end_ix = ix;
        if lines[ix].trim().is_empty() {
            continue;
        }
        if indent_of(&lines[ix]) <= indent {
            end_ix = ix - 1;
            break;
        }
    }

    let statement: String = lines[start_ix..=end_ix].iter().map(|l| l.trim()).collect();
    let arg_text = format!("({}", func_re.replace(&statement, ""));

    tracing::debug!(
        function = %frame.function,
        file = %path,
        line = frame.line,
        start_ix,
        end_ix,
        statement = %statement,
        arg_text = %arg_text,
        "located call site"
    );

    Ok(CallSiteRecord {
        statement,
        start_ix,
        end_ix,
        indent,
        first_line,
        arg_text,
    })
}
