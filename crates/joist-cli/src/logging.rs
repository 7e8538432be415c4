//! Tracing subscriber setup.
//!
//! Logging is off unless `JOIST_LOG` or `RUST_LOG` is set, or `-v` is given.
//! `JOIST_LOG` wins over `RUST_LOG`; both use the `RUST_LOG` filter syntax.
//! Everything goes to stderr so stdout stays clean for `dump`.

use tracing_subscriber::EnvFilter;

pub fn init(verbose: u8) {
    let Some(filter) = build_filter(verbose) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_filter(verbose: u8) -> Option<EnvFilter> {
    if let Ok(val) = std::env::var("JOIST_LOG") {
        return Some(EnvFilter::builder().parse_lossy(val));
    }
    if std::env::var("RUST_LOG").is_ok() {
        return Some(EnvFilter::from_default_env());
    }
    verbose_directive(verbose).map(EnvFilter::new)
}

/// `-v` is debug, `-vv` and more is trace, scoped to the joist crates.
fn verbose_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("joist_compiler=debug,joist=debug"),
        _ => Some("joist_compiler=trace,joist=trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::verbose_directive;

    #[test]
    fn verbosity_levels() {
        assert_eq!(verbose_directive(0), None);
        assert_eq!(verbose_directive(1), Some("joist_compiler=debug,joist=debug"));
        assert_eq!(verbose_directive(3), Some("joist_compiler=trace,joist=trace"));
    }
}
