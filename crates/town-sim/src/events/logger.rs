//! Frame Logger
//!
//! Append-only JSONL log: one session header, then tick frames and events.

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use town_events::{SessionHeader, SimEvent, TickFrame};

use crate::error::OutputError;

/// One line of the log
#[derive(Debug, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Record<'a> {
    Session(&'a SessionHeader),
    Frame(&'a TickFrame),
    Event(&'a SimEvent),
}

pub struct FrameLogger {
    writer: Option<BufWriter<File>>,
    frame_count: u64,
    event_count: u64,
}

impl FrameLogger {
    /// Create a new logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            frame_count: 0,
            event_count: 0,
        })
    }

    /// Create a logger that discards everything
    pub fn null() -> Self {
        Self {
            writer: None,
            frame_count: 0,
            event_count: 0,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn log_session(&mut self, header: &SessionHeader) -> Result<(), OutputError> {
        self.write(&Record::Session(header))
    }

    pub fn log_frame(&mut self, frame: &TickFrame) -> Result<(), OutputError> {
        self.frame_count += 1;
        self.write(&Record::Frame(frame))
    }

    pub fn log_events(&mut self, events: &[SimEvent]) -> Result<(), OutputError> {
        for event in events {
            self.event_count += 1;
            self.write(&Record::Event(event))?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn write(&mut self, record: &Record<'_>) -> Result<(), OutputError> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }
}

impl Drop for FrameLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush frame logger: {}", e);
        }
    }
}
