use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::date::is_next_day;
use crate::error::{Error, Result};

/// One day of contribution activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub count: u32,
}

/// A run of consecutive active days.
///
/// For runs of length >= 1, `end - start + 1 == length` in days. A run of
/// length 0 keeps `start == end` pointing at its reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: u32,
}

impl Streak {
    fn empty(reference: NaiveDate) -> Self {
        Self {
            start: reference,
            end: reference,
            length: 0,
        }
    }

    fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
            length: 1,
        }
    }
}

/// Computed streak statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_contributions: u64,
    pub first_contribution: NaiveDate,
    pub longest_streak: Streak,
    pub current_streak: Streak,
}

/// Derive streak statistics from per-day activity records.
///
/// Pure with respect to wall-clock time: `today` is the day the computation
/// is evaluated and is injected by the caller. Input order is irrelevant,
/// records are sorted by date before the pass. The only failure mode is an
/// empty input.
pub fn compute_stats(records: &[ActivityRecord], today: NaiveDate) -> Result<Stats> {
    if records.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mut records = records.to_vec();
    records.sort_by_key(|r| r.date);

    let total_contributions: u64 = records.iter().map(|r| u64::from(r.count)).sum();
    let first_contribution = records
        .iter()
        .find(|r| r.count > 0)
        .map(|r| r.date)
        .unwrap_or(records[0].date);

    let longest_streak = longest_streak(&records);
    let current_streak = current_streak(&records, today);

    debug!(
        "Computed stats: total {}, longest {} days, current {} days",
        total_contributions, longest_streak.length, current_streak.length
    );

    Ok(Stats {
        total_contributions,
        first_contribution,
        longest_streak,
        current_streak,
    })
}

/// Single forward pass over the active days. A run extends only when the
/// current active day is exactly one calendar day after the previous active
/// day; ties keep the first-seen maximal run (strict `>` on replacement).
fn longest_streak(records: &[ActivityRecord]) -> Streak {
    let mut longest = Streak::empty(records[0].date);
    let mut run = Streak::empty(records[0].date);
    let mut prev_active: Option<NaiveDate> = None;

    for record in records.iter().filter(|r| r.count > 0) {
        match prev_active {
            Some(prev) if is_next_day(prev, record.date) => {
                run.end = record.date;
                run.length += 1;
            }
            _ => run = Streak::single(record.date),
        }
        if run.length > longest.length {
            longest = run;
        }
        prev_active = Some(record.date);
    }

    longest
}

/// Walk backward from the most recent record.
///
/// An inactive most-recent day counts as "not yet breaking" the streak only
/// when it is exactly `today` and the calendar day before today is an active
/// record; activity for today may simply not have reached the data source
/// yet. Any other gap ends the run.
fn current_streak(records: &[ActivityRecord], today: NaiveDate) -> Streak {
    let last = records[records.len() - 1];

    let anchor = if last.count > 0 {
        Some(records.len() - 1)
    } else if last.date == today && records.len() > 1 {
        let prev = records[records.len() - 2];
        (prev.count > 0 && is_next_day(prev.date, today)).then(|| records.len() - 2)
    } else {
        None
    };

    let Some(anchor) = anchor else {
        return Streak::empty(last.date);
    };

    let mut streak = Streak::single(records[anchor].date);
    for record in records[..anchor].iter().rev() {
        if record.count > 0 && is_next_day(record.date, streak.start) {
            streak.start = record.date;
            streak.length += 1;
        } else {
            break;
        }
    }
    streak
}
