//! Diagnostic sinks.
//!
//! The evaluators never print directly; every line goes through a
//! [`Reporter`] so the algorithms stay testable.

use tracing::Level;

/// Receiver of line-oriented diagnostics.
///
/// `INFO` carries summaries, training lines, mismatches and divergences.
/// `DEBUG` carries per-sample explanations and `TRACE` full statistics dumps.
pub trait Reporter {
    fn report(&mut self, level: Level, message: &str);
}

/// Prints every line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, _level: Level, message: &str) {
        println!("{message}");
    }
}

/// Forwards lines to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!("{message}");
        } else if level == Level::WARN {
            tracing::warn!("{message}");
        } else if level == Level::INFO {
            tracing::info!("{message}");
        } else if level == Level::DEBUG {
            tracing::debug!("{message}");
        } else {
            tracing::trace!("{message}");
        }
    }
}

/// Keeps every reported line in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub lines: Vec<(Level, String)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.lines.iter().map(|(_, m)| m.as_str()).collect()
    }

    pub fn at(&self, level: Level) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, m)| m.contains(needle))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, level: Level, message: &str) {
        self.lines.push((level, message.to_string()));
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _level: Level, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_filters_by_level() {
        let mut reporter = RecordingReporter::new();
        reporter.report(Level::INFO, "summary");
        reporter.report(Level::DEBUG, "detail");
        assert_eq!(reporter.messages(), vec!["summary", "detail"]);
        assert_eq!(reporter.at(Level::DEBUG), vec!["detail"]);
        assert!(reporter.contains("summ"));
    }

    #[test]
    fn test_sinks_accept_every_level() {
        let levels = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];
        let mut sinks: Vec<Box<dyn Reporter>> = vec![Box::new(TracingReporter), Box::new(NullReporter)];
        for sink in &mut sinks {
            for level in levels {
                sink.report(level, "line");
            }
        }
    }
}
