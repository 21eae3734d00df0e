//! Browser console logging through the `log` facade.

use log::Level;

/// Parse a configured level name, case-insensitively; unknown names give `Info`.
#[must_use]
pub fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::Info)
}

/// Route `log` records to the browser console.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init(level: Level) {
    if console_log::init_with_level(level).is_err() {
        log::set_max_level(level.to_level_filter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level("debug"), Level::Debug);
        assert_eq!(parse_level(" WARN "), Level::Warn);
        assert_eq!(parse_level("trace"), Level::Trace);
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        assert_eq!(parse_level("chatty"), Level::Info);
        assert_eq!(parse_level(""), Level::Info);
    }
}
