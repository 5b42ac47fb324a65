//! Structured logging routed to the browser console.

use std::io;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: if cfg!(debug_assertions) {
                Level::DEBUG
            } else {
                Level::INFO
            },
            include_target: true,
        }
    }
}

pub fn init_logging() {
    init_logging_with_config(LoggingConfig::default());
}

/// Installs the console subscriber. A second call is a no-op.
pub fn init_logging_with_config(config: LoggingConfig) {
    // No timestamps: there is no system clock on wasm32-unknown-unknown,
    // and the console stamps lines itself.
    let _ = tracing_subscriber::fmt()
        .with_max_level(config.level)
        .with_target(config.include_target)
        .with_ansi(false)
        .without_time()
        .with_writer(ConsoleMakeWriter)
        .try_init();
}

#[derive(Clone, Copy, Debug, Default)]
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::default()
    }
}

/// Buffers one formatted event and hands it to `console.log` on flush/drop.
#[derive(Default)]
struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(line) = take_line(&mut self.buf) {
            web_sys::console::log_1(&line.into());
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    let line = String::from_utf8_lossy(buf).trim_end().to_string();
    buf.clear();
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}
