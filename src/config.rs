//! Command-line configuration values.
//!
//! Port ranges are written `START-END` (inclusive) and key/value batches as a
//! comma-separated list of `KEY->VALUE` items, e.g. `"1->A,2->B,3->C"`.

use crate::error::ConfigError;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// An inclusive range of TCP ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub fn ports(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        self.ports().count()
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Base URLs of the shard servers listening on this range of `host`.
    pub fn node_urls(&self, host: &str) -> Vec<String> {
        self.ports()
            .map(|port| format!("http://{}:{}", host, port))
            .collect()
    }
}

impl FromStr for PortRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::PortRange(s.to_string());

        let (start, end) = s.trim().split_once('-').ok_or_else(invalid)?;
        let start: u16 = start.trim().parse().map_err(|_| invalid())?;
        let end: u16 = end.trim().parse().map_err(|_| invalid())?;

        if start > end {
            return Err(ConfigError::EmptyPortRange { start, end });
        }
        Ok(Self { start, end })
    }
}

impl std::fmt::Display for PortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Parses `"1->A,2->B"` into `[("1", "A"), ("2", "B")]`.
///
/// Blank items are skipped. An item needs exactly one `->` and a non-empty key.
pub fn parse_assignments(input: &str) -> Result<Vec<(String, String)>, ConfigError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let (key, value) = item
                .split_once("->")
                .ok_or_else(|| ConfigError::Assignment(item.to_string()))?;
            let key = key.trim();
            if key.is_empty() || value.contains("->") {
                return Err(ConfigError::Assignment(item.to_string()));
            }
            Ok((key.to_string(), value.trim().to_string()))
        })
        .collect()
}
