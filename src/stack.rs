//! An explicit model of the execution stack.
//!
//! Rust cannot inspect its own frames, so instrumented code keeps a
//! [`CallStack`] up to date: each function pushes a [`StackFrame`] through
//! [`CallStack::enter`] (popped again when the returned guard drops), and
//! `#[track_caller]` entry points record the line each frame is currently
//! executing. Index 0 of a snapshot is the innermost frame.

use std::cell::{Cell, RefCell};
use std::panic::Location;

/// Function name given to module-level (top-level) code.
pub const MODULE_FUNCTION: &str = "<module>";

/// Where a frame's code lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSource {
    File(String),
    /// Generated or wrapper code with no backing text.
    Synthetic,
}

/// How much of the file a frame's code spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Top-level code: the whole file.
    Module,
    /// A function body starting at this 1-based line.
    Function { start_line: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    pub function: String,
    pub source: FrameSource,
    /// 1-based line the frame is executing.
    pub line: usize,
    /// File of `line` when it was recorded from a call location outside
    /// this frame's own file, as happens for calls made by functions that
    /// never entered the stack.
    pub call_file: Option<String>,
    pub scope: Scope,
    /// Key of the namespace the frame's names are bound in.
    pub module: String,
    /// Parameter names with their debug representations.
    pub params: Vec<(String, String)>,
    /// Command line, for the module frame.
    pub invocation: Option<String>,
}

impl StackFrame {
    /// The outermost frame of a program.
    pub fn module(
        file: impl Into<String>,
        line: usize,
        module: impl Into<String>,
        invocation: impl Into<String>,
    ) -> Self {
        StackFrame {
            function: MODULE_FUNCTION.to_string(),
            source: FrameSource::File(file.into()),
            line,
            call_file: None,
            scope: Scope::Module,
            module: module.into(),
            params: Vec::new(),
            invocation: Some(invocation.into()),
        }
    }

    /// A function frame whose body starts at `start_line` of `file`.
    pub fn function(name: impl Into<String>, file: impl Into<String>, start_line: usize) -> Self {
        StackFrame {
            function: name.into(),
            source: FrameSource::File(file.into()),
            line: start_line,
            call_file: None,
            scope: Scope::Function { start_line },
            module: String::new(),
            params: Vec::new(),
            invocation: None,
        }
    }

    /// A frame with no source text, such as a library wrapper.
    pub fn synthetic(name: impl Into<String>) -> Self {
        StackFrame {
            function: name.into(),
            source: FrameSource::Synthetic,
            line: 0,
            call_file: None,
            scope: Scope::Module,
            module: String::new(),
            params: Vec::new(),
            invocation: None,
        }
    }

    #[must_use]
    pub fn at(mut self, line: usize) -> Self {
        self.line = line;
        self.call_file = None;
        self
    }

    /// Position the frame at `line` of `file`, which may be another file
    /// than the frame's own.
    #[must_use]
    pub fn called_from(mut self, file: impl Into<String>, line: usize) -> Self {
        self.line = line;
        self.call_file = Some(file.into());
        self
    }

    #[must_use]
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn is_module(&self) -> bool {
        self.function == MODULE_FUNCTION
    }

    /// Short description of where the frame's code lives.
    pub fn origin(&self) -> String {
        match &self.source {
            FrameSource::File(path) => {
                format!("{}:{}", self.call_file.as_deref().unwrap_or(path), self.line)
            }
            FrameSource::Synthetic => "<synthetic>".to_string(),
        }
    }
}

#[derive(Debug)]
struct Entry {
    id: u64,
    frame: StackFrame,
}

/// The frames of one logical thread, outermost first.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
}

impl CallStack {
    pub fn new(module_frame: StackFrame) -> Self {
        CallStack::from_frames(vec![module_frame])
    }

    /// A stack whose module frame is the caller's location.
    #[track_caller]
    pub fn main(module: &str, invocation: impl Into<String>) -> Self {
        let loc = Location::caller();
        CallStack::new(StackFrame::module(
            loc.file(),
            loc.line() as usize,
            module,
            invocation,
        ))
    }

    /// Build a stack from frames listed innermost first.
    pub fn from_frames(innermost_first: Vec<StackFrame>) -> Self {
        let stack = CallStack::default();
        stack.frames.replace(
            innermost_first
                .into_iter()
                .rev()
                .map(|frame| Entry {
                    id: stack.fresh_id(),
                    frame,
                })
                .collect(),
        );
        stack
    }

    /// Push a frame for the calling function. The frame's body is taken to
    /// start at the line of this call, which should be the first statement
    /// of the function.
    #[track_caller]
    pub fn enter(&self, function: &str, params: Vec<(String, String)>) -> FrameGuard<'_> {
        let loc = Location::caller();
        let line = loc.line() as usize;
        let module = self.innermost_module();
        self.push(
            StackFrame::function(function, loc.file(), line)
                .in_module(module)
                .with_params(params),
        )
    }

    /// Push an already built frame.
    pub fn push(&self, mut frame: StackFrame) -> FrameGuard<'_> {
        if frame.module.is_empty() {
            frame.module = self.innermost_module();
        }
        let id = self.fresh_id();
        self.frames.borrow_mut().push(Entry { id, frame });
        FrameGuard { stack: self, id }
    }

    /// Push a frame for library code that has no source of interest.
    pub fn push_synthetic(&self, function: &str) -> FrameGuard<'_> {
        self.push(StackFrame::synthetic(function))
    }

    /// Record that the innermost frame is executing the caller's line.
    #[track_caller]
    pub fn mark(&self) {
        self.mark_at(Location::caller());
    }

    /// Record `loc`, file and line, as the innermost frame's position.
    pub fn mark_at(&self, loc: &Location<'_>) {
        if let Some(top) = self.frames.borrow_mut().last_mut() {
            top.frame.line = loc.line() as usize;
            top.frame.call_file = Some(loc.file().to_string());
        }
    }

    /// Move the innermost frame to `line` of its own file.
    pub fn set_line(&self, line: usize) {
        if let Some(top) = self.frames.borrow_mut().last_mut() {
            top.frame.line = line;
            top.frame.call_file = None;
        }
    }

    /// Run `f` with the innermost frame positioned at the caller's line, so
    /// frames `f` pushes see the right call site.
    #[track_caller]
    pub fn call<R>(&self, f: impl FnOnce() -> R) -> R {
        self.mark_at(Location::caller());
        f()
    }

    /// Copy of the frames, innermost first.
    pub fn snapshot(&self) -> Vec<StackFrame> {
        self.frames
            .borrow()
            .iter()
            .rev()
            .map(|e| e.frame.clone())
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    fn innermost_module(&self) -> String {
        self.frames
            .borrow()
            .last()
            .map(|e| e.frame.module.clone())
            .unwrap_or_default()
    }

    fn fresh_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

/// Pops its frame (and anything pushed after it) when dropped. A guard
/// whose frame is already gone leaves the stack alone.
#[must_use = "the frame is popped as soon as the guard is dropped"]
pub struct FrameGuard<'a> {
    stack: &'a CallStack,
    id: u64,
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        let mut frames = self.stack.frames.borrow_mut();
        if let Some(ix) = frames.iter().rposition(|e| e.id == self.id) {
            frames.truncate(ix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(stack: &CallStack) -> Vec<String> {
        stack.snapshot().into_iter().map(|f| f.function).collect()
    }

    #[test]
    fn guards_pop_frames() {
        let stack = CallStack::main("demo", "demo --flag");
        {
            let _outer = stack.enter("outer", Vec::new());
            {
                let _inner = stack.enter("inner", Vec::new());
                assert_eq!(names(&stack), vec!["inner", "outer", MODULE_FUNCTION]);
            }
            assert_eq!(names(&stack), vec!["outer", MODULE_FUNCTION]);
        }
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn enter_records_location_and_inherits_module() {
        let stack = CallStack::main("demo", "demo");
        let line = line!() + 1;
        let _f = stack.enter("f", vec![("x".into(), "1".into())]);
        let top = &stack.snapshot()[0];
        assert_eq!(top.source, FrameSource::File(file!().to_string()));
        assert_eq!(top.line, line as usize);
        assert_eq!(top.scope, Scope::Function { start_line: line as usize });
        assert_eq!(top.module, "demo");
        assert_eq!(top.params, vec![("x".to_string(), "1".to_string())]);
    }

    #[test]
    fn call_marks_the_caller_line() {
        let stack = CallStack::main("demo", "demo");
        let line = line!() + 1;
        let seen = stack.call(|| stack.snapshot()[0].line);
        assert_eq!(seen, line as usize);
    }

    #[test]
    fn from_frames_keeps_innermost_first() {
        let stack = CallStack::from_frames(vec![
            StackFrame::synthetic("inner"),
            StackFrame::module("m.rs", 3, "m", "m"),
        ]);
        assert_eq!(names(&stack), vec!["inner", MODULE_FUNCTION]);
    }

    #[test]
    fn dropping_an_outer_guard_discards_inner_frames() {
        let stack = CallStack::main("demo", "demo");
        let outer = stack.enter("outer", Vec::new());
        let inner = stack.enter("inner", Vec::new());
        drop(outer);
        assert_eq!(stack.depth(), 1);
        drop(inner);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn stale_guard_leaves_later_frames_alone() {
        let stack = CallStack::main("demo", "demo");
        let outer = stack.enter("outer", Vec::new());
        let inner = stack.enter("inner", Vec::new());
        drop(outer);
        let _a = stack.enter("a", Vec::new());
        let _b = stack.enter("b", Vec::new());
        drop(inner);
        assert_eq!(names(&stack), vec!["b", "a", MODULE_FUNCTION]);
    }

    #[test]
    fn mark_records_file_and_line() {
        let stack = CallStack::from_frames(vec![StackFrame::function("f", "lib/other.rs", 10)]);
        let line = line!() + 1;
        stack.mark();
        let top = &stack.snapshot()[0];
        assert_eq!(top.line, line as usize);
        assert_eq!(top.call_file.as_deref(), Some(file!()));

        stack.set_line(12);
        let top = &stack.snapshot()[0];
        assert_eq!((top.line, top.call_file.clone()), (12, None));
    }
}
