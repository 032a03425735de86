//! Progress scraping of the FFmpeg diagnostic stream.
//!
//! FFmpeg writes its progress to stderr as human-readable text. Two
//! independent patterns feed a small state machine: the first
//! `Duration: HH:MM:SS.ff` line anchors the total length, and every later
//! `time=HH:MM:SS.ff` field yields a completion percentage against that
//! anchor. Lines matching neither pattern are ignored; this is best-effort
//! parsing and never fails.

use regex::Regex;

const DURATION_PATTERN: &str = r"Duration:\s*(\d+):(\d+):(\d+(?:\.\d+)?)";
const POSITION_PATTERN: &str = r"time=\s*(\d+):(\d+):(\d+(?:\.\d+)?)";

/// Incremental progress parser for one command's diagnostic output.
///
/// One parser instance is used per command: the duration anchor and the
/// monotonicity floor both reset between commands.
pub struct ProgressParser {
    duration_pattern: Regex,
    position_pattern: Regex,
    duration_secs: Option<f64>,
    last_percent: f64,
}

impl ProgressParser {
    pub fn new() -> Self {
        Self {
            duration_pattern: Regex::new(DURATION_PATTERN).expect("valid duration pattern"),
            position_pattern: Regex::new(POSITION_PATTERN).expect("valid position pattern"),
            duration_secs: None,
            last_percent: 0.0,
        }
    }

    /// Feeds one diagnostic line, returning a completion percentage when the
    /// line advances the estimate. Without a duration anchor no percentage
    /// is ever produced.
    pub fn feed(&mut self, line: &str) -> Option<f64> {
        match self.duration_secs {
            None => {
                if let Some(captures) = self.duration_pattern.captures(line) {
                    // The first matching line wins the anchor, even when it
                    // parses to zero seconds; a zero-length anchor just
                    // means no percentages for this command.
                    self.duration_secs = Some(captures_to_seconds(&captures));
                }
                None
            }
            Some(duration_secs) => {
                if duration_secs <= 0.0 {
                    return None;
                }
                let captures = self.position_pattern.captures(line)?;
                let current_secs = captures_to_seconds(&captures);
                let percent = (current_secs / duration_secs * 100.0).clamp(0.0, 100.0);
                // Never report backwards movement within one command
                self.last_percent = percent.max(self.last_percent);
                Some(self.last_percent)
            }
        }
    }

    /// Forces the estimate to completion. Called when a command exits
    /// successfully so the observer always sees closure, whatever the last
    /// parsed value was.
    pub fn finish(&mut self) -> f64 {
        self.last_percent = 100.0;
        self.last_percent
    }
}

impl Default for ProgressParser {
    fn default() -> Self {
        Self::new()
    }
}

fn captures_to_seconds(captures: &regex::Captures<'_>) -> f64 {
    let field = |index: usize| {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    field(1) * 3600.0 + field(2) * 60.0 + field(3)
}
