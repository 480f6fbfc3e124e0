//! Process-wide formatting defaults, read once from the environment.

/// Label column width before timestamp adjustments.
pub const BASE_COL1_WIDTH: usize = 29;

/// Label column width with microsecond timestamps and elapsed time shown,
/// which is what an empty environment gives.
pub const DEFAULT_COL1_WIDTH: usize = BASE_COL1_WIDTH + 7 + 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Default indent of variable dumps.
    pub col1_indent: usize,
    /// Default label column width; lines values up with timestamped text.
    pub col1_width: usize,
    /// Timestamps carry microseconds (`NANOSECONDS`).
    pub nanoseconds: bool,
    /// Timestamps carry the time since the previous one (`SHOW_ELAPSED_TIME`).
    pub show_elapsed_time: bool,
    /// Suppresses the `q` print variants (`QUIET`).
    pub quiet: bool,
    /// Enables the `d` print variants (`DEBUG`).
    pub debug: bool,
    /// Disables password masking (`DEBUG_SHOW_PASSWORDS`).
    pub show_passwords: bool,
    /// Debug tracing for the argument-name resolver (`GET_ARG_NAME_DEBUG`).
    pub debug_resolver: bool,
    /// Debug tracing for the rest of the library (`GEN_PRINT_DEBUG`).
    pub debug_library: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from_lookup(|_| None)
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let exactly_one = |key: &str| lookup(key).unwrap_or_else(|| "1".to_string()) == "1";
        let nonzero = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .is_some_and(|n| n != 0)
        };

        let nanoseconds = exactly_one("NANOSECONDS");
        let show_elapsed_time = exactly_one("SHOW_ELAPSED_TIME");

        Settings {
            col1_indent: 0,
            col1_width: col1_width(nanoseconds, show_elapsed_time),
            nanoseconds,
            show_elapsed_time,
            quiet: nonzero("QUIET"),
            debug: nonzero("DEBUG"),
            show_passwords: nonzero("DEBUG_SHOW_PASSWORDS"),
            debug_resolver: nonzero("GET_ARG_NAME_DEBUG"),
            debug_library: nonzero("GEN_PRINT_DEBUG"),
        }
    }
}

/// Label width that lines values up with `sprint_time` output.
pub fn col1_width(nanoseconds: bool, show_elapsed_time: bool) -> usize {
    let mut width = BASE_COL1_WIDTH;
    if nanoseconds {
        width += 7;
    }
    if show_elapsed_time {
        width += if nanoseconds { 14 } else { 7 };
    }
    width
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let env: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn empty_environment_defaults() {
        let s = settings(&[]);
        assert!(s.nanoseconds);
        assert!(s.show_elapsed_time);
        assert_eq!(s.col1_width, DEFAULT_COL1_WIDTH);
        assert_eq!(s.col1_width, 50);
        assert!(!s.quiet && !s.debug && !s.show_passwords);
    }

    #[test]
    fn width_tracks_timestamp_precision() {
        assert_eq!(settings(&[("NANOSECONDS", "0")]).col1_width, 36);
        assert_eq!(
            settings(&[("NANOSECONDS", "0"), ("SHOW_ELAPSED_TIME", "0")]).col1_width,
            29
        );
        assert_eq!(settings(&[("SHOW_ELAPSED_TIME", "0")]).col1_width, 36);
    }

    #[test]
    fn numeric_flags() {
        let s = settings(&[("QUIET", "1"), ("DEBUG", "2"), ("DEBUG_SHOW_PASSWORDS", "x")]);
        assert!(s.quiet);
        assert!(s.debug);
        assert!(!s.show_passwords);
    }
}
