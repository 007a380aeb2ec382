//! The global sink to which statistics are written, one `PREFIX name=value` line per statistic.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;
use std::io::stdout;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;

/// Where and how statistics are written; set once through [`configure_statistic_logging`].
pub struct StatisticOptions {
    /// Written in front of every statistic
    prefix: &'static str,
    /// A line written once all statistics of a report have been written
    closing_line: Option<&'static str>,
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl StatisticOptions {
    fn write_statistic(&mut self, name: impl Display, value: impl Display) {
        let name = match self.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };
        let _ = writeln!(self.writer, "{} {name}={value}", self.prefix);
    }

    fn write_closing_line(&mut self) {
        if let Some(closing_line) = self.closing_line {
            let _ = writeln!(self.writer, "{closing_line}");
        }
    }
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("closing_line", &self.closing_line)
            .field("casing", &self.casing)
            .finish_non_exhaustive()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

fn with_options(action: impl FnOnce(&mut StatisticOptions)) {
    if let Some(options) = STATISTIC_OPTIONS.get() {
        // A poisoned sink is skipped
        if let Ok(mut options) = options.lock() {
            action(&mut options);
        }
    }
}

/// Enables the logging of statistics.
///
/// Every statistic is written as `{prefix} {name}={value}`, with the name converted to `casing`
/// if one is given, followed by `closing_line` at the end of a report. Statistics go to stdout
/// unless another writer is given. Only the first call has an effect; before it, nothing is
/// written.
pub fn configure_statistic_logging(
    prefix: &'static str,
    closing_line: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        Mutex::new(StatisticOptions {
            prefix,
            closing_line,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

pub fn log_statistic(name: impl Display, value: impl Display) {
    with_options(|options| options.write_statistic(name, value));
}

/// Writes the closing line of a report, if one was configured.
pub fn log_statistic_postfix() {
    with_options(StatisticOptions::write_closing_line);
}

pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Debug, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("not poisoned").write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn statistics_are_written_with_prefix_and_casing() {
        let buffer = SharedBuffer::default();
        let mut options = StatisticOptions {
            prefix: "%%",
            closing_line: Some("=="),
            casing: Some(Case::Camel),
            writer: Box::new(buffer.clone()),
        };
        options.write_statistic("solver_num_moves", 3);
        options.write_closing_line();

        let written = String::from_utf8(buffer.0.lock().expect("not poisoned").clone())
            .expect("valid utf-8");
        assert_eq!(written, "%% solverNumMoves=3\n==\n");
    }
}
