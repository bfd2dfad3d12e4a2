//! Session clock — enumerates trading sessions between two dates.
//!
//! Calendar rules live behind the `Calendar` trait; the engine never embeds
//! market-specific holiday logic. The clock itself is a lazy, finite,
//! restartable iterator of strictly increasing session dates.

use crate::error::EngineError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// External calendar capability: decides which days trade.
pub trait Calendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool;

    /// All trading sessions in `[start, end]`, in order.
    fn sessions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, EngineError> {
        Ok(SessionClock::new(start, end, self)?.collect())
    }
}

/// Weekday calendar: Monday through Friday, no holidays. The simplest
/// provider; real holiday calendars plug in through the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct Weekdays;

impl Calendar for Weekdays {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Calendar backed by an explicit session-date set, typically the date axis
/// of an already-aligned dataset.
#[derive(Debug, Clone, Default)]
pub struct ExplicitCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl ExplicitCalendar {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }
}

impl Calendar for ExplicitCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

/// Iterator over the trading sessions of a date range, materialized at
/// construction so the session count is known up front.
///
/// Strictly increasing; excludes non-trading days per the calendar's
/// predicate. `Clone` makes it restartable.
#[derive(Debug, Clone)]
pub struct SessionClock {
    sessions: Vec<NaiveDate>,
    cursor: usize,
}

impl SessionClock {
    pub fn new<C: Calendar + ?Sized>(
        start: NaiveDate,
        end: NaiveDate,
        calendar: &C,
    ) -> Result<Self, EngineError> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        let mut sessions = Vec::new();
        let mut day = start;
        while day <= end {
            if calendar.is_trading_day(day) {
                sessions.push(day);
            }
            day += Duration::days(1);
        }
        Ok(Self { sessions, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.sessions
    }
}

impl Iterator for SessionClock {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let date = self.sessions.get(self.cursor).copied();
        if date.is_some() {
            self.cursor += 1;
        }
        date
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sessions.len() - self.cursor;
        (remaining, Some(remaining))
    }
}
