//! The print context: settings, clock, masking and the call stack in one
//! place, with every `sprint_*` operation and its printing variants.
//!
//! A [`Printer`] is owned by one logical thread. Its `sprint_*` methods
//! return text; its `print_*` methods (and those of the [`Emitter`] views
//! returned by [`Printer::quiet`], [`Printer::debug`] and [`Printer::log`])
//! write it out after masking registered passwords.

use std::cell::RefCell;
use std::io::{self, Write};
use std::panic::Location;

use crate::clock::Clock;
use crate::error::Result;
use crate::format;
use crate::mask::PasswordMask;
use crate::program::ProgramInfo;
use crate::resolve::{ArgNameResolver, PatternCache, Registry};
use crate::settings::Settings;
use crate::source::{FileSource, SourceProvider};
use crate::stack::{CallStack, FrameGuard};
use crate::value::Dump;
use crate::variant::{self, Sink, Variant};

type Output = RefCell<Box<dyn Write>>;

/// Width of the `=` rules around a long error report.
const REPORT_RULE_WIDTH: usize = 120;

/// Default indent of an error report's call stack and header.
pub const REPORT_INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Just the `**ERROR**` line.
    Short,
    /// Error line, call stack and program header between `=` rules.
    Long,
}

pub struct Printer {
    settings: Settings,
    clock: Clock,
    mask: RefCell<PasswordMask>,
    stack: CallStack,
    sources: Box<dyn SourceProvider>,
    registry: Registry,
    patterns: PatternCache,
    program: ProgramInfo,
    stdout: Output,
    stderr: Output,
}

impl Printer {
    /// A printer configured from the environment, reading source files from
    /// the working directory. The library's names are bound in the module
    /// of `stack`'s outermost frame.
    pub fn new(stack: CallStack) -> Self {
        let mut registry = Registry::new();
        if let Some(outer) = stack.snapshot().last() {
            registry.insert(outer.module.clone(), variant::gen_print_namespace());
        }
        Printer {
            settings: Settings::from_env(),
            clock: Clock::new(),
            mask: RefCell::new(PasswordMask::new()),
            stack,
            sources: Box::new(FileSource::new()),
            registry,
            patterns: PatternCache::new(),
            program: ProgramInfo::current(),
            stdout: RefCell::new(Box::new(io::stdout())),
            stderr: RefCell::new(Box::new(io::stderr())),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_sources(mut self, sources: impl SourceProvider + 'static) -> Self {
        self.sources = Box::new(sources);
        self
    }

    #[must_use]
    pub fn with_program(mut self, program: ProgramInfo) -> Self {
        self.program = program;
        self
    }

    /// Redirect output, e.g. into buffers in tests.
    #[must_use]
    pub fn with_output(
        mut self,
        stdout: impl Write + 'static,
        stderr: impl Write + 'static,
    ) -> Self {
        self.stdout = RefCell::new(Box::new(stdout));
        self.stderr = RefCell::new(Box::new(stderr));
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub fn program(&self) -> &ProgramInfo {
        &self.program
    }

    /// Namespaces used to find aliases of the print functions. Bind your
    /// own names here, e.g. `registry_mut().get_mut("app")`.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn register_passwords(&self, passwords: &[&str]) {
        self.mask.borrow_mut().register(passwords);
    }

    /// `text` as it would be printed: passwords masked unless
    /// `DEBUG_SHOW_PASSWORDS` is set.
    pub fn replace_passwords(&self, text: &str) -> String {
        if self.settings.show_passwords {
            return text.to_string();
        }
        self.mask.borrow().replace(text)
    }

    // ── Text ──────────────────────────────────────────────────────────

    /// `#(zone) date time[.micros][ - elapsed] - {buffer}`.
    pub fn sprint_time(&self, buffer: &str) -> String {
        let stamp = self
            .clock
            .stamp(self.settings.nanoseconds, self.settings.show_elapsed_time);
        format!("{} - {}", stamp, buffer)
    }

    pub fn sprint_timen(&self, buffer: &str) -> String {
        self.sprint_time(&format!("{}\n", buffer))
    }

    pub fn sprint_error(&self, buffer: &str) -> String {
        format!("{}**ERROR** {}", self.sprint_time(""), buffer)
    }

    /// Variable dump with an explicit label.
    pub fn sprint_varx<T: Dump + ?Sized>(
        &self,
        name: &str,
        value: &T,
        hex: bool,
        indent: usize,
        width: usize,
    ) -> String {
        format::sprint_varx(name, &value.to_value(), hex, indent, width, "\n")
    }

    /// Variable dump labelled with the text the caller passed as `value`.
    ///
    /// A resolution failure is also reported as an `**ERROR**` line on
    /// stderr.
    #[track_caller]
    pub fn sprint_var<T: Dump + ?Sized>(&self, value: &T) -> Result<String> {
        let layout = self.default_layout();
        self.var_as("sprint_var", Location::caller(), value, layout)
    }

    /// [`Printer::sprint_var`] with explicit layout: hex/show-blanks (and
    /// terse map labels), indent and label column width.
    #[track_caller]
    pub fn sprint_var_with<T: Dump + ?Sized>(
        &self,
        value: &T,
        hex: bool,
        indent: usize,
        width: usize,
    ) -> Result<String> {
        let layout = VarLayout { hex, indent, width };
        self.var_as("sprint_var_with", Location::caller(), value, layout)
    }

    /// Dump several labelled values with shared layout options.
    pub fn sprint_vars(
        &self,
        vars: &[(&str, &dyn Dump)],
        indent: usize,
        width: usize,
        hex: bool,
    ) -> String {
        vars.iter()
            .map(|(name, value)| self.sprint_varx(name, *value, hex, indent, width))
            .collect()
    }

    /// Name of frame `ix`, where 0 is this call and 1 its caller.
    #[track_caller]
    pub fn sprint_func_name(&self, ix: usize) -> String {
        let _frame = self.frame("sprint_func_name", Location::caller());
        self.stack
            .snapshot()
            .get(ix)
            .map(|f| f.function.clone())
            .unwrap_or_default()
    }

    /// Call stack trace from frame `start_ix` outward; frame 0 is this call.
    #[track_caller]
    pub fn sprint_call_stack(&self, indent: usize, start_ix: usize) -> String {
        let _frame = self.frame("sprint_call_stack", Location::caller());
        format::sprint_call_stack(&self.stack.snapshot(), indent, start_ix)
    }

    /// `{time}Executing: {function and parameters}` for frame `ix`, where 1
    /// is the caller.
    #[track_caller]
    pub fn sprint_executing(&self, ix: usize) -> String {
        let _frame = self.frame("sprint_executing", Location::caller());
        self.executing(ix)
    }

    fn executing(&self, ix: usize) -> String {
        let func_and_args = self
            .stack
            .snapshot()
            .get(ix)
            .map(format::func_and_args)
            .unwrap_or_else(|| format::NO_FUNCTION.to_string());
        format!("{}Executing: {}\n", self.sprint_time(""), func_and_args)
    }

    pub fn sprint_issuing(&self, cmd: &str, test_mode: bool) -> String {
        let mut out = self.sprint_time("");
        if test_mode {
            out.push_str("(test_mode) ");
        }
        out.push_str("Issuing: ");
        out.push_str(cmd);
        out.push('\n');
        out
    }

    /// Standard start-of-run banner: program facts then `parms`.
    pub fn sprint_pgm_header(
        &self,
        indent: usize,
        linefeed: bool,
        parms: &[(&str, &dyn Dump)],
    ) -> String {
        let width = self.settings.col1_width + indent;
        let mut out = String::new();
        if linefeed {
            out.push('\n');
        }
        out.push_str(&format::sindent(
            &self.sprint_time(&format!("Running {}.\n", self.program.name)),
            indent,
        ));
        out.push_str(&format::sindent(
            &self.sprint_time("Program parameter values, etc.:\n\n"),
            indent,
        ));
        for (name, value) in self.program.header_vars() {
            out.push_str(&format::sprint_varx(&name, &value, false, indent, width, "\n"));
        }
        for (name, value) in parms {
            out.push_str(&self.sprint_varx(name, *value, false, indent, width));
        }
        if linefeed {
            out.push('\n');
        }
        out
    }

    /// Standard end-of-run banner with the total run time.
    pub fn sprint_pgm_footer(&self) -> String {
        let mut out = format!(
            "\n{}",
            self.sprint_time(&format!("Finished running {}.\n\n", self.program.name))
        );
        let runtime = format!("{:0.6}", self.clock.runtime());
        out.push_str(&self.sprint_varx(
            &format!("{}_runtime", self.program.var_name()),
            &runtime,
            false,
            self.settings.col1_indent,
            self.settings.col1_width,
        ));
        out.push('\n');
        out
    }

    /// Error line, plus (long format) the caller's call stack and the
    /// program header between `=` rules.
    #[track_caller]
    pub fn sprint_error_report(&self, text: &str, indent: usize, style: ReportFormat) -> String {
        let _frame = self.frame("sprint_error_report", Location::caller());
        self.error_report(text, indent, style)
    }

    fn error_report(&self, text: &str, indent: usize, style: ReportFormat) -> String {
        let text = format!("{}\n", text.trim_end_matches('\n'));
        if style == ReportFormat::Short {
            return self.sprint_error(&text);
        }
        let rule = format::sprint_dashes(self.settings.col1_indent, REPORT_RULE_WIDTH, true, '=');
        let mut out = rule.clone();
        out.push_str(&self.sprint_error(&text));
        out.push('\n');
        // Frame 0 is the report itself.
        out.push_str(&format::sprint_call_stack(&self.stack.snapshot(), indent, 1));
        out.push_str(&self.sprint_pgm_header(indent, true, &[]));
        out.push_str(&rule);
        out
    }

    // ── Printing ──────────────────────────────────────────────────────

    /// Write `render()` to the variant's sink if its guard allows, masking
    /// passwords. `render` is not called when the variant is disabled.
    pub fn emit(&self, variant: Variant, primitive: &str, render: impl FnOnce() -> String) {
        if !variant::enabled(variant, &self.settings) {
            return;
        }
        let text = self.replace_passwords(&render());
        match variant::sink(variant, primitive) {
            Sink::Stdout => write_out(&self.stdout, &text),
            Sink::Stderr => write_out(&self.stderr, &text),
            Sink::Log => tracing::info!(target: "genprint", "{}", text.trim_end_matches('\n')),
        }
    }

    pub fn plain(&self) -> Emitter<'_> {
        Emitter {
            printer: self,
            variant: Variant::Plain,
        }
    }

    /// Printing that is skipped when `QUIET` is set.
    pub fn quiet(&self) -> Emitter<'_> {
        Emitter {
            printer: self,
            variant: Variant::Quiet,
        }
    }

    /// Printing that only happens when `DEBUG` is set.
    pub fn debug(&self) -> Emitter<'_> {
        Emitter {
            printer: self,
            variant: Variant::Debug,
        }
    }

    /// Printing into the `tracing` log at INFO level.
    pub fn log(&self) -> Emitter<'_> {
        Emitter {
            printer: self,
            variant: Variant::Log,
        }
    }

    pub fn print_time(&self, buffer: &str) {
        self.plain().print_time(buffer);
    }

    pub fn print_timen(&self, buffer: &str) {
        self.plain().print_timen(buffer);
    }

    pub fn print_error(&self, buffer: &str) {
        self.plain().print_error(buffer);
    }

    pub fn print_varx<T: Dump + ?Sized>(&self, name: &str, value: &T) {
        self.plain().print_varx(name, value);
    }

    #[track_caller]
    pub fn print_var<T: Dump + ?Sized>(&self, value: &T) -> Result<()> {
        let layout = self.default_layout();
        self.plain().var_as("print_var", Location::caller(), value, layout)
    }

    #[track_caller]
    pub fn print_var_with<T: Dump + ?Sized>(
        &self,
        value: &T,
        hex: bool,
        indent: usize,
        width: usize,
    ) -> Result<()> {
        let layout = VarLayout { hex, indent, width };
        self.plain().var_as("print_var_with", Location::caller(), value, layout)
    }

    /// Short form of [`Printer::print_var`].
    #[track_caller]
    pub fn pvar<T: Dump + ?Sized>(&self, value: &T) -> Result<()> {
        let layout = self.default_layout();
        self.plain().var_as("pvar", Location::caller(), value, layout)
    }

    pub fn print_vars(&self, vars: &[(&str, &dyn Dump)]) {
        self.plain().print_vars(vars);
    }

    /// `sprint_varx` sent to the log.
    pub fn lprint_varx<T: Dump + ?Sized>(&self, name: &str, value: &T) {
        self.log().print_varx(name, value);
    }

    #[track_caller]
    pub fn print_call_stack(&self) {
        self.plain().print_call_stack();
    }

    #[track_caller]
    pub fn print_executing(&self) {
        self.plain().print_executing();
    }

    pub fn print_issuing(&self, cmd: &str) {
        self.plain().print_issuing(cmd, false);
    }

    pub fn print_pgm_header(&self) {
        self.plain().print_pgm_header(&[]);
    }

    pub fn print_pgm_footer(&self) {
        self.plain().print_pgm_footer();
    }

    #[track_caller]
    pub fn print_error_report(&self, text: &str) {
        self.plain().print_error_report(text, ReportFormat::Long);
    }

    // ── Internals ─────────────────────────────────────────────────────

    /// Point the caller's frame at `loc` and push a frame for `function`.
    fn frame(&self, function: &str, loc: &Location<'_>) -> FrameGuard<'_> {
        self.stack.mark_at(loc);
        self.stack.push_synthetic(function)
    }

    fn default_layout(&self) -> VarLayout {
        VarLayout {
            hex: false,
            indent: self.settings.col1_indent,
            width: self.settings.col1_width,
        }
    }

    fn var_as<T: Dump + ?Sized>(
        &self,
        function: &str,
        loc: &Location<'_>,
        value: &T,
        layout: VarLayout,
    ) -> Result<String> {
        let name = {
            let _frame = self.frame(function, loc);
            self.arg_name()
        };
        match name {
            Ok(name) => Ok(self.sprint_varx(
                label(&name),
                value,
                layout.hex,
                layout.indent,
                layout.width,
            )),
            Err(err) => {
                let report = self.sprint_error(&err.report_text());
                write_out(&self.stderr, &self.replace_passwords(&report));
                Err(err)
            }
        }
    }

    /// Text of the first argument the caller passed to frame 0.
    fn arg_name(&self) -> Result<String> {
        let frames = self.stack.snapshot();
        ArgNameResolver::new(&frames, self.sources.as_ref(), &self.registry)
            .width(self.settings.col1_width)
            .patterns(&self.patterns)
            .resolve(1, 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct VarLayout {
    hex: bool,
    indent: usize,
    width: usize,
}

/// Printing view of a [`Printer`] for one variant.
pub struct Emitter<'a> {
    printer: &'a Printer,
    variant: Variant,
}

impl Emitter<'_> {
    pub fn print_time(&self, buffer: &str) {
        self.emit("print_time", || self.printer.sprint_time(buffer));
    }

    pub fn print_timen(&self, buffer: &str) {
        self.emit("print_timen", || self.printer.sprint_timen(buffer));
    }

    pub fn print_error(&self, buffer: &str) {
        self.emit("print_error", || self.printer.sprint_error(buffer));
    }

    /// Dump with the printer's default indent and width.
    pub fn print_varx<T: Dump + ?Sized>(&self, name: &str, value: &T) {
        let settings = &self.printer.settings;
        self.emit("print_varx", || {
            self.printer
                .sprint_varx(name, value, false, settings.col1_indent, settings.col1_width)
        });
    }

    #[track_caller]
    pub fn print_var<T: Dump + ?Sized>(&self, value: &T) -> Result<()> {
        let layout = self.printer.default_layout();
        self.var_as("print_var", Location::caller(), value, layout)
    }

    #[track_caller]
    pub fn print_var_with<T: Dump + ?Sized>(
        &self,
        value: &T,
        hex: bool,
        indent: usize,
        width: usize,
    ) -> Result<()> {
        let layout = VarLayout { hex, indent, width };
        self.var_as("print_var_with", Location::caller(), value, layout)
    }

    #[track_caller]
    pub fn pvar<T: Dump + ?Sized>(&self, value: &T) -> Result<()> {
        let layout = self.printer.default_layout();
        self.var_as("pvar", Location::caller(), value, layout)
    }

    pub fn print_vars(&self, vars: &[(&str, &dyn Dump)]) {
        let settings = &self.printer.settings;
        self.emit("print_vars", || {
            self.printer
                .sprint_vars(vars, settings.col1_indent, settings.col1_width, false)
        });
    }

    pub fn print_dashes(&self, width: usize) {
        self.emit("print_dashes", || {
            format::sprint_dashes(self.printer.settings.col1_indent, width, true, '-')
        });
    }

    pub fn indent(&self, text: &str, indent: usize) {
        self.emit("indent", || format::sindent(text, indent));
    }

    #[track_caller]
    pub fn print_call_stack(&self) {
        let loc = Location::caller();
        self.emit("print_call_stack", || {
            let _frame = self.printer.frame("print_call_stack", loc);
            format::sprint_call_stack(&self.printer.stack.snapshot(), 0, 0)
        });
    }

    /// Name of the function calling this.
    #[track_caller]
    pub fn print_func_name(&self) {
        let loc = Location::caller();
        self.emit("print_func_name", || {
            let _frame = self.printer.frame("print_func_name", loc);
            let name = self
                .printer
                .stack
                .snapshot()
                .get(1)
                .map(|f| f.function.clone())
                .unwrap_or_default();
            format::sprintn(&name)
        });
    }

    /// `Executing:` line for the function calling this.
    #[track_caller]
    pub fn print_executing(&self) {
        let loc = Location::caller();
        self.emit("print_executing", || {
            let _frame = self.printer.frame("print_executing", loc);
            self.printer.executing(1)
        });
    }

    pub fn print_pgm_header(&self, parms: &[(&str, &dyn Dump)]) {
        self.emit("print_pgm_header", || self.printer.sprint_pgm_header(0, true, parms));
    }

    pub fn print_issuing(&self, cmd: &str, test_mode: bool) {
        self.emit("print_issuing", || self.printer.sprint_issuing(cmd, test_mode));
    }

    pub fn print_pgm_footer(&self) {
        self.emit("print_pgm_footer", || self.printer.sprint_pgm_footer());
    }

    #[track_caller]
    pub fn print_error_report(&self, text: &str, style: ReportFormat) {
        let loc = Location::caller();
        self.emit("print_error_report", || {
            let _frame = self.printer.frame("print_error_report", loc);
            self.printer.error_report(text, REPORT_INDENT, style)
        });
    }

    pub fn print(&self, buffer: &str) {
        self.emit("print", || format::sprint(buffer));
    }

    pub fn printn(&self, buffer: &str) {
        self.emit("printn", || format::sprintn(buffer));
    }

    fn emit(&self, primitive: &str, render: impl FnOnce() -> String) {
        self.printer.emit(self.variant, primitive, render);
    }

    /// A disabled variant returns before any name inference, so it never
    /// reads source files, the clock or reports errors.
    fn var_as<T: Dump + ?Sized>(
        &self,
        function: &str,
        loc: &Location<'_>,
        value: &T,
        layout: VarLayout,
    ) -> Result<()> {
        if !variant::enabled(self.variant, &self.printer.settings) {
            return Ok(());
        }
        let text = self.printer.var_as(function, loc, value, layout)?;
        self.emit("print_var", || text);
        Ok(())
    }
}

fn write_out(out: &Output, text: &str) {
    let mut out = out.borrow_mut();
    if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        tracing::warn!(%err, "failed to write output");
    }
}

/// A resolved argument used as a label, without the borrow that passing
/// by reference adds: `&total` labels as `total`.
fn label(arg: &str) -> &str {
    arg.strip_prefix("&mut ")
        .or_else(|| arg.strip_prefix('&'))
        .unwrap_or(arg)
        .trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_drop_reference_sigils() {
        assert_eq!(label("&total"), "total");
        assert_eq!(label("&mut buf"), "buf");
        assert_eq!(label("count"), "count");
        assert_eq!(label("& x"), "x");
    }
}
