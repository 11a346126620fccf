//! Destinations for human-readable conversion diagnostics.
//!
//! These messages are meant for the person running the conversion (failed
//! transactions, summaries, the name of the written file), unlike the
//! `log` records, which trace the converter itself.

use log::warn;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Accepts diagnostic messages.
pub trait LogSink {
    fn write(&mut self, message: &str);
}

/// Collects messages in memory.
impl LogSink for Vec<String> {
    fn write(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn write(&mut self, message: &str) {
        (**self).write(message);
    }
}

/// Prints messages to standard error.
#[derive(Debug, Default)]
pub struct Console;

impl LogSink for Console {
    fn write(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Writes each message followed by a blank line.
///
/// The writer is flushed after every message so the log survives an aborted
/// run.
#[derive(Debug)]
pub struct LogFile<W: Write> {
    writer: W,
}

impl LogFile<BufWriter<File>> {
    /// Creates or truncates the log file at `path`.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(LogFile::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> LogFile<W> {
    pub fn new(writer: W) -> Self {
        LogFile { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LogSink for LogFile<W> {
    fn write(&mut self, message: &str) {
        let result = write!(self.writer, "{}\n\n", message).and_then(|()| self.writer.flush());
        if let Err(e) = result {
            warn!("Could not write to log file: {}", e);
        }
    }
}

/// Forwards every message to each of its sinks, in order.
#[derive(Default)]
pub struct FanOut<'a> {
    sinks: Vec<&'a mut dyn LogSink>,
}

impl<'a> FanOut<'a> {
    /// Adds a sink; it receives messages after the ones already added.
    pub fn push(&mut self, sink: &'a mut dyn LogSink) {
        self.sinks.push(sink);
    }
}

impl LogSink for FanOut<'_> {
    fn write(&mut self, message: &str) {
        for sink in self.sinks.iter_mut() {
            sink.write(message);
        }
    }
}
