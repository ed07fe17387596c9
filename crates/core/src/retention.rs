// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot retention policy parsing and argument rendering

use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

/// Errors from retention policy parsing
#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("retention policy must have 8 or 9 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid {field} count '{value}' in retention policy")]
    InvalidCount { field: &'static str, value: String },

    #[error("invalid prune flag '{0}' in retention policy (expected true or false)")]
    InvalidPrune(String),
}

/// How many snapshots `restic forget` keeps, and whether to prune afterwards.
///
/// Parsed from a single configuration string of 8 or 9 whitespace-separated
/// fields: `HOURLY DAILY WEEKLY MONTHLY YEARLY WITHIN LAST PRUNE [TAG,TAG,...]`,
/// e.g. `24 7 4 12 2 30d 10 true db,media`. Parsing is all-or-nothing; a bad
/// field yields an error and no policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub hourly: u32,
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
    pub yearly: u32,
    pub within: String,
    pub last: u32,
    pub prune: bool,
    pub tags: BTreeSet<String>,
}

impl RetentionPolicy {
    pub fn parse(s: &str) -> Result<Self, RetentionError> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if !(8..=9).contains(&fields.len()) {
            return Err(RetentionError::FieldCount(fields.len()));
        }

        let count = |field: &'static str, value: &str| -> Result<u32, RetentionError> {
            value.parse().map_err(|_| RetentionError::InvalidCount {
                field,
                value: value.to_string(),
            })
        };

        let prune = fields[7]
            .parse::<bool>()
            .map_err(|_| RetentionError::InvalidPrune(fields[7].to_string()))?;

        let tags = fields
            .get(8)
            .map(|list| {
                list.split(',')
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            hourly: count("hourly", fields[0])?,
            daily: count("daily", fields[1])?,
            weekly: count("weekly", fields[2])?,
            monthly: count("monthly", fields[3])?,
            yearly: count("yearly", fields[4])?,
            within: fields[5].to_string(),
            last: count("last", fields[6])?,
            prune,
            tags,
        })
    }

    /// Render the policy as arguments for `restic forget`.
    ///
    /// The order is fixed: the five keep counts, keep-within, keep-last,
    /// `--prune` when enabled, then one `--keep-tag` per tag in sorted order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--keep-hourly={}", self.hourly),
            format!("--keep-daily={}", self.daily),
            format!("--keep-weekly={}", self.weekly),
            format!("--keep-monthly={}", self.monthly),
            format!("--keep-yearly={}", self.yearly),
            format!("--keep-within={}", self.within),
            format!("--keep-last={}", self.last),
        ];

        if self.prune {
            args.push("--prune".to_string());
        }

        for tag in &self.tags {
            args.push(format!("--keep-tag={tag}"));
        }

        args
    }
}

impl FromStr for RetentionPolicy {
    type Err = RetentionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
