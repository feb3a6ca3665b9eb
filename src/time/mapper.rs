use chrono::{DateTime, NaiveDate, TimeZone, Timelike};

use crate::foundation::core::{DayFraction, DayOffset, Instant};
use crate::foundation::error::{PlotError, PlotResult};

/// Position of an instant on the dial: which day ring, and where on it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DayPosition {
    /// Calendar days since the reference date.
    pub day: DayOffset,
    /// Local time-of-day.
    pub fraction: DayFraction,
    /// Local time-of-day in whole seconds since midnight.
    pub second_of_day: u32,
}

/// Maps absolute instants to `(day offset, day fraction)` relative to a reference instant in one
/// local zone.
///
/// Day offsets are calendar-date differences, not elapsed-seconds / 86400, so a DST shift never
/// moves an instant onto a neighbouring ring.
#[derive(Clone, Debug)]
pub struct TemporalMapper<Tz: TimeZone> {
    zone: Tz,
    zero: Instant,
    zero_date: NaiveDate,
}

impl<Tz: TimeZone> TemporalMapper<Tz> {
    /// Build a mapper around `zero`, interpreted in `zone`.
    pub fn new(zero: Instant, zone: Tz) -> PlotResult<Self> {
        let zero_date = to_local(&zone, zero)?.date_naive();
        Ok(Self {
            zone,
            zero,
            zero_date,
        })
    }

    /// Reference instant (day 0, dial centre).
    pub fn zero(&self) -> Instant {
        self.zero
    }

    /// Local wall-clock time of `instant`.
    pub fn local(&self, instant: Instant) -> PlotResult<DateTime<Tz>> {
        to_local(&self.zone, instant)
    }

    /// Calendar days between the reference date and the local date of `instant`.
    pub fn day_offset(&self, instant: Instant) -> PlotResult<DayOffset> {
        Ok(self.map(instant)?.day)
    }

    /// Local time-of-day of `instant` as a fraction of 24 hours.
    pub fn day_fraction(&self, instant: Instant) -> PlotResult<DayFraction> {
        Ok(self.map(instant)?.fraction)
    }

    /// Full dial position of `instant`.
    pub fn map(&self, instant: Instant) -> PlotResult<DayPosition> {
        let local = self.local(instant)?;
        let day = calendar_day_diff(self.zero_date, local.date_naive()).ok_or(
            PlotError::OutOfOrderInstant {
                index: None,
                instant,
                zero: self.zero,
            },
        )?;
        Ok(DayPosition {
            day,
            fraction: DayFraction::from_hms(local.hour(), local.minute(), local.second()),
            second_of_day: local.num_seconds_from_midnight(),
        })
    }
}

/// Whole calendar days from `start` to `end`; `Some(0)` when both are the same date.
///
/// Returns `None` when `end` is an earlier date than `start`.
pub fn calendar_day_diff(start: NaiveDate, end: NaiveDate) -> Option<DayOffset> {
    if end < start {
        return None;
    }
    // Both dates anchored at UTC midnight, so the difference is an exact multiple of a day.
    let s0 = start.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
    let e0 = end.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
    Some((e0 - s0) / 86_400)
}

/// Instant of local midnight starting `date` in `zone`.
///
/// Where a DST transition skips midnight, the first valid instant of that date is used.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, zone: &Tz) -> PlotResult<Instant> {
    let mut probe = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| PlotError::validation(format!("no midnight for date {date}")))?;
    // Transitions are at most a couple of hours long; step forward until one resolves.
    for _ in 0..=24 * 4 {
        if let Some(dt) = zone.from_local_datetime(&probe).earliest() {
            return Ok(Instant::from_datetime(&dt));
        }
        probe += chrono::Duration::minutes(15);
    }
    Err(PlotError::validation(format!(
        "date {date} has no representable local midnight"
    )))
}

fn to_local<Tz: TimeZone>(zone: &Tz, instant: Instant) -> PlotResult<DateTime<Tz>> {
    zone.timestamp_opt(instant.unix(), 0).single().ok_or_else(|| {
        PlotError::validation(format!(
            "instant {} is outside the representable time range",
            instant.unix()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/time/mapper.rs"]
mod tests;
