use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;

use crate::odds::types::FormattedTotalsOdds;

/// Where rendered messages go. Delivery (SMS or otherwise) happens outside
/// this process.
pub enum Outbox {
    Stdout,
    /// Append to a file, one block per message.
    File(String),
}

impl Outbox {
    pub fn from_path(path: Option<&str>) -> Self {
        match path {
            Some(path) => Outbox::File(path.to_string()),
            None => Outbox::Stdout,
        }
    }

    pub fn deliver(&self, sport: &str, message: &str) -> Result<()> {
        match self {
            Outbox::Stdout => {
                println!("{}\n", message);
                Ok(())
            }
            Outbox::File(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open outbox: {}", path))?;

                writeln!(file, "--- {} {}", Utc::now().to_rfc3339(), sport)?;
                writeln!(file, "{}", message)?;

                Ok(())
            }
        }
    }
}

/// Write the latest formatted odds as pretty JSON, replacing any older file.
pub fn write_summary(path: &str, summaries: &[FormattedTotalsOdds]) -> Result<()> {
    let json = serde_json::to_string_pretty(summaries)?;
    fs::write(path, json).with_context(|| format!("Failed to write summary: {}", path))?;
    Ok(())
}
