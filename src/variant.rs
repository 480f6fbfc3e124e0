//! Quiet, debug and log variants of the print primitives.
//!
//! Every `sprint_*` primitive returns text. Its printing variants differ
//! only in a guard (should anything be written?) and a destination, so they
//! are described by one table and dispatched by [`crate::Printer::emit`].

use crate::resolve::Namespace;
use crate::settings::Settings;

/// Where a variant's text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    Stderr,
    /// A `tracing` event at INFO level.
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `print_*`: always written.
    Plain,
    /// `qprint_*`: written unless quiet.
    Quiet,
    /// `dprint_*`: written only when debugging.
    Debug,
    /// `lprint_*`: sent to the log.
    Log,
}

pub struct VariantSpec {
    pub variant: Variant,
    pub prefix: &'static str,
    pub guard: fn(&Settings) -> bool,
}

pub const VARIANTS: &[VariantSpec] = &[
    VariantSpec {
        variant: Variant::Plain,
        prefix: "",
        guard: |_| true,
    },
    VariantSpec {
        variant: Variant::Quiet,
        prefix: "q",
        guard: |s| !s.quiet,
    },
    VariantSpec {
        variant: Variant::Debug,
        prefix: "d",
        guard: |s| s.debug,
    },
    VariantSpec {
        variant: Variant::Log,
        prefix: "l",
        guard: |_| true,
    },
];

/// Print primitives, by the name of their printing form.
pub const PRIMITIVES: &[&str] = &[
    "print_time",
    "print_timen",
    "print_error",
    "print_varx",
    "print_var",
    "print_vars",
    "print_dashes",
    "indent",
    "print_call_stack",
    "print_func_name",
    "print_executing",
    "print_pgm_header",
    "print_issuing",
    "print_pgm_footer",
    "print_error_report",
    "print",
    "printn",
];

/// Primitives whose plain, quiet and debug forms write to stderr.
const STDERR_PRIMITIVES: &[&str] = &["print_error", "print_error_report"];

pub fn spec(variant: Variant) -> &'static VariantSpec {
    VARIANTS
        .iter()
        .find(|s| s.variant == variant)
        .unwrap_or(&VARIANTS[0])
}

/// Should `variant` write anything under `settings`?
pub fn enabled(variant: Variant, settings: &Settings) -> bool {
    (spec(variant).guard)(settings)
}

pub fn sink(variant: Variant, primitive: &str) -> Sink {
    match variant {
        Variant::Log => Sink::Log,
        _ if STDERR_PRIMITIVES.contains(&primitive) => Sink::Stderr,
        _ => Sink::Stdout,
    }
}

/// Short form of a primitive name: `print_var` → `pvar`.
pub fn abbreviation(primitive: &str) -> Option<String> {
    if primitive == "print" || primitive == "printn" {
        return None;
    }
    let short = primitive.replace("print_", "p");
    (short != primitive).then_some(short)
}

/// The library's own namespace: every primitive under each prefix, plus
/// the abbreviated names bound to the same callables.
pub fn gen_print_namespace() -> Namespace {
    let mut ns = Namespace::new();
    for primitive in PRIMITIVES {
        ns.define(&format!("s{}", primitive));
        for spec in VARIANTS {
            // A plain `print` would shadow the language's own.
            if spec.variant == Variant::Plain && *primitive == "print" {
                continue;
            }
            ns.define(&format!("{}{}", spec.prefix, primitive));
        }
        if let Some(short) = abbreviation(primitive) {
            for prefix in ["", "s", "q", "d", "l"] {
                ns.alias(&format!("{}{}", prefix, short), &format!("{}{}", prefix, primitive));
            }
        }
    }
    ns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::aliases;

    #[test]
    fn guards_follow_settings() {
        let quiet = Settings {
            quiet: true,
            ..Settings::default()
        };
        assert!(!enabled(Variant::Quiet, &quiet));
        assert!(enabled(Variant::Plain, &quiet));
        assert!(!enabled(Variant::Debug, &quiet));

        let debug = Settings {
            debug: true,
            ..Settings::default()
        };
        assert!(enabled(Variant::Debug, &debug));
        assert!(enabled(Variant::Quiet, &debug));
    }

    #[test]
    fn errors_go_to_stderr_except_when_logged() {
        assert_eq!(sink(Variant::Plain, "print_error"), Sink::Stderr);
        assert_eq!(sink(Variant::Quiet, "print_error_report"), Sink::Stderr);
        assert_eq!(sink(Variant::Plain, "print_var"), Sink::Stdout);
        assert_eq!(sink(Variant::Log, "print_error"), Sink::Log);
    }

    #[test]
    fn abbreviations() {
        assert_eq!(abbreviation("print_var").as_deref(), Some("pvar"));
        assert_eq!(abbreviation("print_call_stack").as_deref(), Some("pcall_stack"));
        assert_eq!(abbreviation("indent"), None);
        assert_eq!(abbreviation("printn"), None);
    }

    #[test]
    fn namespace_groups_prefixed_aliases() {
        let ns = gen_print_namespace();
        let set = aliases(Some(&ns), "sprint_var");
        assert!(set.contains("spvar"));
        assert!(!set.contains("print_var"));
        let set = aliases(Some(&ns), "qpvar");
        assert!(set.contains("qprint_var"));
        assert!(ns.get("print").is_none());
        assert!(ns.get("lprint").is_some());
    }
}
