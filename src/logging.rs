use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise the level follows the `-v` count
/// (warn, info, debug, then trace). Stdout is left to report output.
/// Calling this again after a subscriber is installed is a no-op.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing(0);
        init_tracing(3);
    }
}
