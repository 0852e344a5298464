//! Plain-text test log.
//!
//! Every entry goes to three places: a line in the append-only log file,
//! a `[LEVEL] message` line on standard output, and the `log` facade.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use log::Level;

/// Name of the log file written next to the working directory.
pub const DEFAULT_LOG_FILE: &str = "test_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

type Sink = Mutex<Box<dyn Write + Send>>;

pub struct TestLogger {
    file: Sink,
    stdout: Sink,
}

impl TestLogger {
    /// Open `path` for appending, creating it if needed. Existing content is kept.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file: File = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_writers(Box::new(file), Box::new(io::stdout())))
    }

    pub fn with_writers(file: Box<dyn Write + Send>, stdout: Box<dyn Write + Send>) -> Self {
        TestLogger {
            file: Mutex::new(file),
            stdout: Mutex::new(stdout),
        }
    }

    pub fn log(&self, level: Level, message: &str) -> io::Result<()> {
        log::log!(target: "formcheck", level, "{}", message);

        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let name = level_name(level);
        write_line(&self.file, format_args!("{} - {} - {}", timestamp, name, message))?;
        write_line(&self.stdout, format_args!("[{}] {}", name, message))
    }

    pub fn info(&self, message: &str) -> io::Result<()> {
        self.log(Level::Info, message)
    }

    pub fn warning(&self, message: &str) -> io::Result<()> {
        self.log(Level::Warn, message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        self.log(Level::Error, message)
    }

    /// Print a bare result marker such as `TEST PASSED` to standard output only.
    pub fn marker(&self, text: &str) -> io::Result<()> {
        write_line(&self.stdout, format_args!("{}", text))
    }
}

impl std::fmt::Debug for TestLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestLogger").finish_non_exhaustive()
    }
}

fn write_line(sink: &Sink, line: std::fmt::Arguments<'_>) -> io::Result<()> {
    // A poisoned sink still holds a usable writer.
    let mut w = sink.lock().unwrap_or_else(|e| e.into_inner());
    writeln!(w, "{}", line)?;
    w.flush()
}

pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
