//! Operator output.
//!
//! The runner never touches the process's standard streams directly; it
//! writes through an `OutputSink`. The sink also decides how a child's
//! output reaches it: the console sink hands the real streams to the child,
//! a capture sink has the child's output copied in after it exits.

use std::io::{self, Write};

/// How a launched process's stdout/stderr are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// The child writes straight to this process's stdout/stderr
    Inherit,
    /// The child's output is collected and written into the sink
    Capture,
}

/// Destination for announcements, error lines and (in capture mode) child output
pub trait OutputSink {
    fn stream_mode(&self) -> StreamMode;
    fn stdout(&mut self) -> &mut dyn Write;
    fn stderr(&mut self) -> &mut dyn Write;
}

/// The process's real stdout and stderr
#[derive(Debug)]
pub struct ConsoleSink {
    out: io::Stdout,
    err: io::Stderr,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            err: io::stderr(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for ConsoleSink {
    fn stream_mode(&self) -> StreamMode {
        StreamMode::Inherit
    }

    fn stdout(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn stderr(&mut self) -> &mut dyn Write {
        &mut self.err
    }
}

/// In-memory sink for tests and embedding
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    out: Vec<u8>,
    err: Vec<u8>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written to the output stream so far
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.out).into_owned()
    }

    /// Everything written to the error stream so far
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.err).into_owned()
    }
}

impl OutputSink for CaptureSink {
    fn stream_mode(&self) -> StreamMode {
        StreamMode::Capture
    }

    fn stdout(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    fn stderr(&mut self) -> &mut dyn Write {
        &mut self.err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sink_keeps_streams_apart() {
        let mut sink = CaptureSink::new();
        writeln!(sink.stdout(), "Running: true").unwrap();
        writeln!(sink.stderr(), "warning").unwrap();

        assert_eq!(sink.stdout_text(), "Running: true\n");
        assert_eq!(sink.stderr_text(), "warning\n");
        assert_eq!(sink.stream_mode(), StreamMode::Capture);
    }

    #[test]
    fn test_console_sink_inherits() {
        assert_eq!(ConsoleSink::new().stream_mode(), StreamMode::Inherit);
    }
}
