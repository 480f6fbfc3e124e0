//! Recover the literal text a caller passed as an argument.
//!
//! Given a snapshot of the call stack, the resolver reads the source of the
//! frame at `depth`, finds its call to the function of frame `depth - 1`
//! (under any alias), and splits that call's argument list. This lets a
//! one-argument print call label its output with the caller's expression.

pub mod alias;
pub mod args;
pub mod locate;

use crate::error::{GpError, Result};
use crate::format::sprint_varx;
use crate::settings::DEFAULT_COL1_WIDTH;
use crate::source::SourceProvider;
use crate::stack::StackFrame;
use crate::value::Dump;

pub use self::alias::{AliasSet, CallableId, Namespace, Registry, aliases};
pub use self::args::parse_arg_list;
pub use self::locate::{CallSiteRecord, PatternCache, locate, locate_cached};

/// Frames to try in total when a frame has no source text. Wrapper frames
/// without source usually sit directly below the real call.
const SOURCE_ATTEMPTS: usize = 2;

pub struct ArgNameResolver<'a> {
    frames: &'a [StackFrame],
    sources: &'a dyn SourceProvider,
    registry: &'a Registry,
    patterns: Option<&'a PatternCache>,
    width: usize,
}

impl<'a> ArgNameResolver<'a> {
    /// `frames` is a stack snapshot, innermost first.
    pub fn new(
        frames: &'a [StackFrame],
        sources: &'a dyn SourceProvider,
        registry: &'a Registry,
    ) -> Self {
        ArgNameResolver {
            frames,
            sources,
            registry,
            patterns: None,
            width: DEFAULT_COL1_WIDTH,
        }
    }

    /// Column width used when an error lists the parsed arguments.
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Reuse call patterns compiled by earlier resolutions.
    #[must_use]
    pub fn patterns(mut self, patterns: &'a PatternCache) -> Self {
        self.patterns = Some(patterns);
        self
    }

    /// Text of argument `position` (1-based) of the call made by the frame
    /// at `depth` (1 or more) to the function of frame `depth - 1`.
    ///
    /// The text is returned as written, whether it is a variable name, a
    /// literal or an arbitrary expression; it is never evaluated.
    pub fn resolve(&self, position: usize, depth: usize) -> Result<String> {
        if position < 1 {
            return Err(GpError::InvalidArgument {
                name: "arg_num",
                value: position,
                requirement: "greater than 0",
            });
        }
        let args = self.arguments(depth)?;
        match args.get(position - 1) {
            Some(arg) => {
                tracing::debug!(position, argument = %arg, "resolved argument");
                Ok(arg.clone())
            }
            None => Err(GpError::ArgumentCountMismatch {
                requested: position,
                listing: sprint_varx("args_list", &args.to_value(), false, 0, self.width, "\n"),
                args,
            }),
        }
    }

    /// Every argument of the call made by the frame at `depth`.
    pub fn arguments(&self, depth: usize) -> Result<Vec<String>> {
        let record = self.call_site(depth)?;
        let args = parse_arg_list(&record.arg_text);
        tracing::debug!(?args, "parsed argument list");
        Ok(args)
    }

    /// The call made by the frame at `depth`, stepping outward past frames
    /// that have no source.
    pub fn call_site(&self, depth: usize) -> Result<CallSiteRecord> {
        if depth < 1 {
            return Err(GpError::InvalidArgument {
                name: "stack_frame_ix",
                value: depth,
                requirement: "greater than or equal to 1",
            });
        }

        let mut depth = depth;
        let mut called = String::new();
        for _ in 0..SOURCE_ATTEMPTS {
            let frame = self.frame(depth)?;
            called = self.frames[depth - 1].function.clone();
            let alias_set = aliases(self.registry.get(&frame.module), &called);
            tracing::debug!(
                depth,
                function = %frame.function,
                called = %called,
                aliases = ?alias_set,
                "locating call site"
            );
            let located = match self.patterns {
                Some(patterns) => locate_cached(frame, &called, &alias_set, self.sources, patterns),
                None => locate(frame, &called, &alias_set, self.sources),
            };
            match located {
                Err(GpError::SourceUnavailable { origin, .. }) => {
                    tracing::debug!(depth, origin = %origin, "no source for frame; stepping outward");
                    depth += 1;
                }
                other => return other,
            }
        }
        Err(GpError::CallSiteNotFound { function: called })
    }

    fn frame(&self, depth: usize) -> Result<&'a StackFrame> {
        self.frames.get(depth).ok_or(GpError::StackIndexOutOfRange {
            index: depth,
            depth: self.frames.len(),
        })
    }
}
