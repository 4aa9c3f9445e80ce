use log::LevelFilter;
use std::time::Duration;

/// Set up logging to stderr, more verbose with every `-v`
pub fn init_logging(verbosity: usize) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = colog::default_builder();
    builder.filter(None, level);
    builder.init();
}

/// Format a time in milliseconds for humans, e.g. `1m 45s 501ms`
pub fn format_ms(ms: u64) -> String {
    humantime::format_duration(Duration::from_millis(ms)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format() {
        assert_eq!(format_ms(0), "0s");
        assert_eq!(format_ms(60000), "1m");
        assert_eq!(format_ms(105501), "1m 45s 501ms");
    }
}
