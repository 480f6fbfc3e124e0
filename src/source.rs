//! Source text retrieval for stack frames.
//!
//! A frame's code is found either on disk ([`FileSource`]) or in text
//! registered up front ([`MemorySource`]). Scope extraction then narrows a
//! file down to what the frame is executing: the whole file for module-level
//! code, or one function body.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{GpError, Result};

/// Lines of one source file, without their line terminators.
pub type Lines = Rc<[String]>;

/// Something that can hand out the text of a source file.
pub trait SourceProvider {
    /// All lines of `path`, or `None` when there is no text for it.
    fn lines(&self, path: &str) -> Option<Lines>;
}

/// Reads source files from disk, relative to a root, caching each file.
#[derive(Debug, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
    cache: RefCell<FxHashMap<String, Option<Lines>>>,
}

impl FileSource {
    pub fn new() -> Self {
        FileSource::default()
    }

    /// Resolve relative paths against `root` (e.g. the crate directory that
    /// `file!()` paths are relative to).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        FileSource {
            root: Some(root.into()),
            cache: RefCell::default(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        match &self.root {
            Some(root) if p.is_relative() => root.join(p),
            _ => p.to_path_buf(),
        }
    }

    /// Read a file, reporting I/O failures instead of hiding them.
    pub fn read(&self, path: &str) -> Result<Lines> {
        let full = self.full_path(path);
        let text = fs::read_to_string(&full).map_err(|source| GpError::Io {
            path: full.display().to_string(),
            source,
        })?;
        Ok(split_lines(&text))
    }
}

impl SourceProvider for FileSource {
    fn lines(&self, path: &str) -> Option<Lines> {
        if let Some(hit) = self.cache.borrow().get(path) {
            return hit.clone();
        }
        let loaded = match self.read(path) {
            Ok(lines) => Some(lines),
            Err(e) => {
                tracing::debug!(error = %e, "source file unavailable");
                None
            }
        };
        self.cache.borrow_mut().insert(path.to_string(), loaded.clone());
        loaded
    }
}

/// Source text registered by name. Used for embedded scripts and tests.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: FxHashMap<String, Lines>,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, text: &str) {
        self.files.insert(path.into(), split_lines(text));
    }

    #[must_use]
    pub fn with(mut self, path: impl Into<String>, text: &str) -> Self {
        self.insert(path, text);
        self
    }
}

impl SourceProvider for MemorySource {
    fn lines(&self, path: &str) -> Option<Lines> {
        self.files.get(path).cloned()
    }
}

/// Tries each provider in turn.
pub struct ChainSource {
    providers: Vec<Box<dyn SourceProvider>>,
}

impl ChainSource {
    pub fn new(providers: Vec<Box<dyn SourceProvider>>) -> Self {
        ChainSource { providers }
    }
}

impl SourceProvider for ChainSource {
    fn lines(&self, path: &str) -> Option<Lines> {
        self.providers.iter().find_map(|p| p.lines(path))
    }
}

fn split_lines(text: &str) -> Lines {
    text.lines().map(str::to_string).collect::<Vec<_>>().into()
}

/// Number of leading spaces.
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// The lines of a module scope: the whole file, starting at line 1.
pub fn module_scope(lines: &Lines) -> (Vec<String>, usize) {
    (lines.to_vec(), 1)
}

/// The body block that starts at 1-based `start_line`.
///
/// The block runs while lines are blank or indented at least as deep as
/// its first line; the first line further left (the closing brace of the
/// function) ends it and is not included. Returns `None` if `start_line`
/// is past the end.
pub fn function_scope(lines: &Lines, start_line: usize) -> Option<(Vec<String>, usize)> {
    let first = start_line.checked_sub(1)?;
    let head = lines.get(first)?;
    let base = indent_of(head);
    let mut block = vec![head.clone()];
    for line in &lines[first + 1..] {
        if !line.trim().is_empty() && indent_of(line) < base {
            break;
        }
        block.push(line.clone());
    }
    // Trailing blank lines belong to whatever follows.
    while block.len() > 1 && block.last().is_some_and(|l| l.trim().is_empty()) {
        block.pop();
    }
    Some((block, start_line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEXT: &str = "fn outer() {\n    let a = 1;\n\n    inner(a);\n}\n\nfn next() {}\n";

    #[test]
    fn function_scope_stops_at_closing_brace() {
        let lines = split_lines(TEXT);
        let (block, first) = function_scope(&lines, 2).expect("block");
        assert_eq!(first, 2);
        assert_eq!(block, vec!["    let a = 1;", "", "    inner(a);"]);
    }

    #[test]
    fn function_scope_past_end_is_none() {
        let lines = split_lines(TEXT);
        assert!(function_scope(&lines, 99).is_none());
        assert!(function_scope(&lines, 0).is_none());
    }

    #[test]
    fn module_scope_is_whole_file() {
        let lines = split_lines(TEXT);
        let (all, first) = module_scope(&lines);
        assert_eq!(first, 1);
        assert_eq!(all.len(), 7);
    }

    #[test]
    fn file_source_reads_and_caches() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("demo.rs");
        let mut f = fs::File::create(&path).expect("create");
        writeln!(f, "line one\nline two").expect("write");

        let src = FileSource::with_root(dir.path());
        let lines = src.lines("demo.rs").expect("lines");
        assert_eq!(&lines[..], ["line one", "line two"]);

        fs::remove_file(&path).expect("remove");
        assert!(src.lines("demo.rs").is_some(), "second read comes from cache");
        assert!(src.lines("missing.rs").is_none());
    }

    #[test]
    fn chain_source_falls_through() {
        let a = MemorySource::new().with("a.rs", "alpha");
        let b = MemorySource::new().with("b.rs", "beta");
        let chain = ChainSource::new(vec![Box::new(a), Box::new(b)]);
        assert_eq!(&chain.lines("b.rs").expect("b")[..], ["beta"]);
        assert!(chain.lines("c.rs").is_none());
    }
}
