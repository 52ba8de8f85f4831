// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod appender;
mod error;
mod layers;

use crate::error::Result;
use layers::TracingLayers;
use std::path::PathBuf;
use tracing::info;
use tracing_core::dispatcher::DefaultGuard;
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt};

pub use error::Error;
pub use layers::ReloadHandle;
pub use tracing_appender::non_blocking::WorkerGuard;

// re-exporting the tracing crate's Level as it is used in our public API
pub use tracing_core::Level;

/// Env var holding the logging targets, e.g. `SN_LOG=sn_airgap=debug,airgap=trace` or `SN_LOG=all`.
pub const LOG_ENV_VAR: &str = "SN_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutputDest {
    Stderr,
    Stdout,
    Path(PathBuf),
}

impl LogOutputDest {
    /// `stdout`, `stderr`, `data-dir` (a timestamped dir under the user's data dir), or a directory path.
    pub fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "stdout" => Ok(LogOutputDest::Stdout),
            "stderr" => Ok(LogOutputDest::Stderr),
            "data-dir" => {
                let dir = timestamped_log_dir().ok_or_else(|| {
                    Error::LoggingConfiguration("could not obtain data directory path".to_string())
                })?;
                Ok(LogOutputDest::Path(dir))
            }
            // The path should be a directory, but we can't use something like `is_dir` to check
            // because the path doesn't need to exist. We can create it for the user.
            value => Ok(LogOutputDest::Path(PathBuf::from(value))),
        }
    }
}

impl std::fmt::Display for LogOutputDest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogOutputDest::Stderr => write!(f, "stderr"),
            LogOutputDest::Stdout => write!(f, "stdout"),
            LogOutputDest::Path(p) => write!(f, "{}", p.to_string_lossy()),
        }
    }
}

/// `<data dir>/safe/airgap/logs/log_<timestamp>`
fn timestamped_log_dir() -> Option<PathBuf> {
    // Get the current timestamp and format it to be human readable
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    dirs_next::data_dir().map(|dir| {
        dir.join("safe")
            .join("airgap")
            .join("logs")
            .join(format!("log_{timestamp}"))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Default,
    Json,
}

impl LogFormat {
    pub fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            _ => Err(Error::LoggingConfiguration(
                "The only valid values for this argument are \"default\" or \"json\"".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Default => "default",
            LogFormat::Json => "json",
        }
    }
}

pub struct LogBuilder {
    default_logging_targets: Vec<(String, Level)>,
    output_dest: LogOutputDest,
    format: LogFormat,
    max_log_files: Option<usize>,
    max_archived_log_files: Option<usize>,
    /// Setting this would print the sn_logging related updates to stdout.
    print_updates_to_stdout: bool,
}

impl LogBuilder {
    /// Create a new builder
    /// Provide the default_logging_targets that are used if the `SN_LOG` env variable is not set.
    ///
    /// By default, we log to stderr with the default format, leaving stdout to the command output.
    pub fn new(default_logging_targets: Vec<(String, Level)>) -> Self {
        Self {
            default_logging_targets,
            output_dest: LogOutputDest::Stderr,
            format: LogFormat::Default,
            max_log_files: None,
            max_archived_log_files: None,
            print_updates_to_stdout: true,
        }
    }

    /// Set the logging output destination
    pub fn output_dest(&mut self, output_dest: LogOutputDest) {
        self.output_dest = output_dest;
    }

    /// Set the logging format
    pub fn format(&mut self, format: LogFormat) {
        self.format = format
    }

    /// The max number of uncompressed log files to store
    pub fn max_log_files(&mut self, files: usize) {
        self.max_log_files = Some(files);
    }

    /// The max number of compressed files to store
    pub fn max_archived_log_files(&mut self, files: usize) {
        self.max_archived_log_files = Some(files);
    }

    /// Setting this to false would prevent sn_logging from printing things to stdout.
    pub fn print_updates_to_stdout(&mut self, print: bool) {
        self.print_updates_to_stdout = print;
    }

    /// Inits logging, returning the NonBlocking guard if present.
    /// This guard should be held for the life of the program.
    ///
    /// Logging should be instantiated only once.
    pub fn initialize(self) -> Result<(ReloadHandle, Option<WorkerGuard>)> {
        let mut layers = TracingLayers::default();

        let reload_handle = layers.fmt_layer(
            self.default_logging_targets,
            &self.output_dest,
            self.format,
            self.max_log_files,
            self.max_archived_log_files,
            self.print_updates_to_stdout,
        )?;

        if tracing_subscriber::registry()
            .with(layers.layers)
            .try_init()
            .is_err()
        {
            eprintln!("Tried to initialize and set global default subscriber more than once");
        }

        Ok((reload_handle, layers.log_appender_guard))
    }

    /// Logs to the data_dir for the current thread only.
    /// Provide the test file name to capture tracings from the test.
    ///
    /// `set_default` is used so that every test thread gets its own subscriber, and the returned
    /// guards must be held for the duration of the test.
    pub fn init_single_threaded_test(test_file_name: &str) -> (Option<WorkerGuard>, DefaultGuard) {
        let layers = Self::get_test_layers(test_file_name);
        let log_guard = tracing_subscriber::registry()
            .with(layers.layers)
            .set_default();
        // this is the test_name and not the test_file_name
        if let Some(test_name) = std::thread::current().name() {
            info!("Running test: {test_name}");
        }
        (layers.log_appender_guard, log_guard)
    }

    /// Initialize just the fmt_layer for testing purposes.
    ///
    /// Logs everything from our crates plus the test file itself. `SN_LOG` is ignored here,
    /// the env is left untouched so parallel tests do not race on it.
    fn get_test_layers(test_file_name: &str) -> TracingLayers {
        let output_dest = match timestamped_log_dir() {
            Some(dir) => LogOutputDest::Path(dir),
            None => LogOutputDest::Stdout,
        };

        println!("Logging test at {test_file_name:?} to {output_dest}");

        let mut targets = layers::get_logging_targets("all").unwrap_or_default();
        targets.push((test_file_name.to_string(), Level::TRACE));

        let mut layers = TracingLayers::default();
        if let Err(err) = layers.fmt_layer_with_targets(
            targets,
            &output_dest,
            LogFormat::Default,
            None,
            None,
            false,
        ) {
            eprintln!("Could not set up test logging to {output_dest}: {err}");
        }
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LogFormatter;
    use color_eyre::Result;
    use tracing::{trace, warn};
    use tracing_subscriber::{
        filter::Targets,
        fmt as tracing_fmt,
        layer::{Filter, SubscriberExt},
        reload, Layer, Registry,
    };
    use tracing_test::internal::global_buf;

    #[test]
    fn output_dest_parses_keywords_and_paths() -> Result<()> {
        assert_eq!(LogOutputDest::parse_from_str("stdout")?, LogOutputDest::Stdout);
        assert_eq!(LogOutputDest::parse_from_str("stderr")?, LogOutputDest::Stderr);
        assert_eq!(
            LogOutputDest::parse_from_str("/tmp/airgap-logs")?,
            LogOutputDest::Path(PathBuf::from("/tmp/airgap-logs"))
        );
        assert!(LogFormat::parse_from_str("yaml").is_err());
        assert_eq!(LogFormat::parse_from_str("json")?.as_str(), "json");
        Ok(())
    }

    #[test]
    fn reload_handle_should_change_log_levels() -> Result<()> {
        // A mock write that collects events to a global buffer. We can later read from this buffer.
        let mock_writer = tracing_test::internal::MockWriter::new(global_buf());

        // Constructing the fmt layer manually.
        let layer = tracing_fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .event_format(LogFormatter)
            .with_writer(mock_writer)
            .boxed();

        let test_target = "sn_logging::tests".to_string();
        // to enable logs just for the test.
        let target_filters: Box<dyn Filter<Registry> + Send + Sync> =
            Box::new(Targets::new().with_targets(vec![(test_target.clone(), Level::TRACE)]));

        // add the reload layer
        let (filter, handle) = reload::Layer::new(target_filters);
        let reload_handle = ReloadHandle(handle);
        let layer = layer.with_filter(filter);
        let _guard = tracing_subscriber::registry().with(layer).set_default();

        trace!("First trace event");

        {
            let buf = global_buf().lock().unwrap();

            let events: Vec<&str> = std::str::from_utf8(&buf)
                .expect("Logs contain invalid UTF8")
                .lines()
                .collect();
            assert_eq!(events.len(), 1);
            assert!(events[0].contains("First trace event"));
        }

        reload_handle.modify_log_level("sn_logging::tests=WARN")?;

        // trace should not be logged now.
        trace!("Second trace event");
        warn!("First warn event");

        {
            let buf = global_buf().lock().unwrap();

            let events: Vec<&str> = std::str::from_utf8(&buf)
                .expect("Logs contain invalid UTF8")
                .lines()
                .collect();

            assert_eq!(events.len(), 2);
            assert!(events[0].contains("First trace event"));
            assert!(events[1].contains("First warn event"));
        }

        Ok(())
    }
}
