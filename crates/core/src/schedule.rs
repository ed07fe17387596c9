// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron schedule evaluation for service backup labels

use chrono::{DateTime, Utc};
use cron::Schedule;
use thiserror::Error;

/// Errors from schedule evaluation
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid cron expression '{expr}': {reason}")]
    Invalid { expr: String, reason: String },

    #[error("cron expression '{0}' has no upcoming run")]
    NoUpcomingRun(String),
}

/// Compute the next run strictly after `after` for a 5-field cron expression
/// (minute, hour, day-of-month, month, day-of-week).
pub fn next_run(expr: &str, after: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    // The `cron` crate also accepts 6- and 7-field forms, which would let a
    // truncated label slip through as an every-minute schedule once padded.
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let &[minute, hour, dom, month, dow] = fields.as_slice() else {
        return Err(ScheduleError::Invalid {
            expr: expr.to_string(),
            reason: format!("expected 5 fields, got {}", fields.len()),
        });
    };

    // The `cron` crate wants 7 fields (sec min hour dom month dow year);
    // backup labels carry the standard 5. Pin seconds to 0 and year to any.
    let dow = remap_days_of_week(dow);
    let padded = format!("0 {minute} {hour} {dom} {month} {dow} *");
    let schedule: Schedule = padded.parse().map_err(|e: cron::error::Error| {
        ScheduleError::Invalid {
            expr: expr.to_string(),
            reason: e.to_string(),
        }
    })?;

    schedule
        .after(&after)
        .next()
        .ok_or_else(|| ScheduleError::NoUpcomingRun(expr.to_string()))
}

/// Rewrite numeric day-of-week tokens from crontab numbering (0-7, where both
/// 0 and 7 mean Sunday) to the Sunday-first 1-7 numbering the `cron` crate
/// uses. Named days mean the same thing in both forms, and out-of-range
/// numbers are left for the parser to reject.
fn remap_days_of_week(field: &str) -> String {
    fn token(tok: &str) -> String {
        match tok.parse::<u32>() {
            Ok(n) if n <= 7 => ((n % 7) + 1).to_string(),
            _ => tok.to_string(),
        }
    }

    field
        .split(',')
        .map(|part| {
            let (range, step) = match part.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (part, None),
            };
            let range = range.split('-').map(token).collect::<Vec<_>>().join("-");
            match step {
                Some(step) => format!("{range}/{step}"),
                None => range,
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
