//! Log output for applications embedding strata.
//!
//! Resolution failures are reported at `warn` with one event per attempt
//! reason; per-source lookups are traced at `trace`.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Install a global subscriber writing compact logs to stdout.
///
/// Log level comes from `RUST_LOG`, defaulting to "info". Fails if a global
/// subscriber is already installed.
pub fn init() -> Result<(), InitError> {
    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(strata_layer(std::io::stdout))
        .try_init()?;

    Ok(())
}

fn env_filter() -> Result<EnvFilter, InitError> {
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?)
}

/// The formatting layer used by [`init`], writing to `writer`.
pub fn strata_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, ConfigOption, EnvironmentSource};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_failed_lookup_warns_each_attempt() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("warn"))
            .with(strata_layer(captured.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let config = Config::named("logged");
            config.add_source(EnvironmentSource::from_vars("APP_", [("OTHER", "1")]));
            config.add_option(ConfigOption::new("missing")).unwrap();
            assert!(config.value("missing").is_err());
        });

        let text = captured.text();
        assert!(text.contains("WARN"), "got: {text}");
        assert!(text.contains("APP_MISSING"), "got: {text}");
        assert!(text.contains("Option lookup failed"), "got: {text}");
    }

    #[test]
    fn test_successful_lookup_is_quiet_at_warn() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("warn"))
            .with(strata_layer(captured.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let config = Config::named("quiet");
            config.add_option(ConfigOption::with_default("present", 1)).unwrap();
            assert!(config.value("present").is_ok());
        });

        assert_eq!(captured.text(), "");
    }

    #[test]
    fn test_init_installs_once() {
        // Only one global subscriber per process.
        let _ = init();
        assert!(init().is_err());
    }
}
