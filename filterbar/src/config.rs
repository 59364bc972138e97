//! Widget configuration.
//!
//! All fields have defaults, so an empty JSON object is a valid config.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default delay between initialization attempts when polling for layout.
/// Largest padding or handle width a breakpoint may declare.
pub const MAX_EXTENT: i32 = 1 << 20;

pub const DEFAULT_RETRY_DELAY_MS: u64 = 100;

/// One row of the breakpoint table.
///
/// The row applies while the viewport is narrower than `below`. A row with
/// `below: None` is the open-ended fallback and must come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub below: Option<u32>,
    pub padding: i32,
    pub handle_width: i32,
}

impl Breakpoint {
    pub const fn below(threshold: u32, padding: i32, handle_width: i32) -> Self {
        Self {
            below: Some(threshold),
            padding,
            handle_width,
        }
    }

    pub const fn otherwise(padding: i32, handle_width: i32) -> Self {
        Self {
            below: None,
            padding,
            handle_width,
        }
    }

    fn applies_to(&self, viewport_width: u32) -> bool {
        match self.below {
            Some(threshold) => viewport_width < threshold,
            None => true,
        }
    }
}

/// Padding and handle width picked for a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub padding: i32,
    pub handle_width: i32,
}

/// Ordered list of breakpoints, validated on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct BreakpointTable {
    entries: Vec<Breakpoint>,
}

impl BreakpointTable {
    /// Build a table, checking ordering and the fallback row.
    pub fn new(entries: Vec<Breakpoint>) -> Result<Self, ConfigError> {
        let Some((last, bounded)) = entries.split_last() else {
            return Err(ConfigError::InvalidBreakpoints(
                "table must contain at least one entry".into(),
            ));
        };

        if last.below.is_some() {
            return Err(ConfigError::InvalidBreakpoints(
                "last entry must not have a threshold".into(),
            ));
        }

        let mut previous: Option<u32> = None;
        for (index, entry) in bounded.iter().enumerate() {
            let Some(threshold) = entry.below else {
                return Err(ConfigError::InvalidBreakpoints(format!(
                    "entry {index} has no threshold but is not last"
                )));
            };
            if previous.is_some_and(|p| threshold <= p) {
                return Err(ConfigError::InvalidBreakpoints(format!(
                    "threshold {threshold} at entry {index} is not ascending"
                )));
            }
            previous = Some(threshold);
        }

        for (index, entry) in entries.iter().enumerate() {
            if entry.padding < 0 || entry.handle_width <= 0 {
                return Err(ConfigError::InvalidBreakpoints(format!(
                    "entry {index} needs a non-negative padding and a positive handle width"
                )));
            }
            if entry.padding > MAX_EXTENT || entry.handle_width > MAX_EXTENT {
                return Err(ConfigError::InvalidBreakpoints(format!(
                    "entry {index} exceeds the maximum extent of {MAX_EXTENT}"
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Terminal-cell table used by the bundled terminal host.
    pub fn terminal() -> Self {
        Self {
            entries: vec![Breakpoint::below(100, 2, 12), Breakpoint::otherwise(4, 24)],
        }
    }

    /// Pick the first entry whose threshold the viewport falls under.
    pub fn select(&self, viewport_width: u32) -> Preset {
        // Validation guarantees an open-ended last entry.
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.applies_to(viewport_width))
            .unwrap_or(&self.entries[self.entries.len() - 1]);

        Preset {
            padding: entry.padding,
            handle_width: entry.handle_width,
        }
    }

    pub fn entries(&self) -> &[Breakpoint] {
        &self.entries
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self {
            entries: vec![Breakpoint::below(700, 20, 100), Breakpoint::otherwise(40, 200)],
        }
    }
}

impl TryFrom<Vec<Breakpoint>> for BreakpointTable {
    type Error = ConfigError;

    fn try_from(entries: Vec<Breakpoint>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<BreakpointTable> for Vec<Breakpoint> {
    fn from(table: BreakpointTable) -> Self {
        table.entries
    }
}

/// How the initialization gate waits for measurable anchors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    /// Wait for a layout-ready signal from the host.
    #[default]
    Notify,
    /// Re-check after a fixed delay.
    Poll,
}

/// Configuration for a `FilterScroller`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub breakpoints: BreakpointTable,
    pub retry_delay_ms: u64,
    pub readiness: Readiness,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breakpoints: BreakpointTable::default(),
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            readiness: Readiness::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn with_breakpoints(mut self, breakpoints: BreakpointTable) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
