//! Routes `tracing` output to the browser console.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Buffers one formatted event and hands it to the console method matching
/// its level when dropped.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    fn line(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.buffer);
        let text = text.trim_end();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let Some(line) = self.line() else {
            return;
        };
        let value = JsValue::from_str(&line);
        match self.level {
            Level::ERROR => console::error_1(&value),
            Level::WARN => console::warn_1(&value),
            Level::INFO => console::info_1(&value),
            _ => console::debug_1(&value),
        }
    }
}

pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Installs the global subscriber. `CRM_LOG` at build time picks the level.
pub fn init() {
    let level = option_env!("CRM_LOG")
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        console::warn_1(&JsValue::from_str("tracing subscriber already installed"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_writer_collects_one_line() {
        let mut writer = ConsoleMakeWriter.make_writer();
        write!(writer, "INFO crm: loaded clients ").unwrap();
        writer.write_all(b"count=3\n").unwrap();
        assert_eq!(writer.line().as_deref(), Some("INFO crm: loaded clients count=3"));
    }

    #[wasm_bindgen_test]
    fn test_blank_output_is_skipped() {
        let mut writer = ConsoleWriter::new(Level::WARN);
        writer.write_all(b"  \n").unwrap();
        assert_eq!(writer.line(), None);
    }
}
