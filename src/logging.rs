//! Subscriber setup for binaries. The library itself only emits events.

use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Environment variable holding an explicit filter, e.g. `genprint=debug`.
pub const LOG_ENV: &str = "GENPRINT_LOG";

/// Filter directives implied by `settings` when `GENPRINT_LOG` is unset:
/// INFO for everything (the `l` print variants log there), DEBUG for the
/// resolver with `GET_ARG_NAME_DEBUG` and for the whole library with
/// `GEN_PRINT_DEBUG`.
pub fn default_directives(settings: &Settings) -> String {
    let mut directives = vec!["info".to_string()];
    if settings.debug_library {
        directives.push("genprint=debug".to_string());
    } else if settings.debug_resolver {
        directives.push("genprint::resolve=debug".to_string());
    }
    directives.join(",")
}

/// Install a stderr `fmt` subscriber. Calling it twice is harmless.
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(settings)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_follow_debug_flags() {
        let mut s = Settings::default();
        assert_eq!(default_directives(&s), "info");
        s.debug_resolver = true;
        assert_eq!(default_directives(&s), "info,genprint::resolve=debug");
        s.debug_library = true;
        assert_eq!(default_directives(&s), "info,genprint=debug");
    }
}
