use chrono::TimeZone;

use crate::foundation::core::{DayOffset, Segment};
use crate::foundation::error::PlotResult;
use crate::time::mapper::{DayPosition, TemporalMapper};

/// A segment mapped onto the dial, with its end fraction unwrapped across midnight.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ArcSpan {
    /// Day ring of the segment start.
    pub start_day: DayOffset,
    /// Day ring of the segment end.
    pub end_day: DayOffset,
    /// Raw start fraction in `[0, 1)`.
    pub start_frac: f64,
    /// Raw end fraction in `[0, 1)`.
    pub end_frac: f64,
    /// End fraction after midnight unwrapping; never below `start_frac` for ordered input.
    pub adjusted_end_frac: f64,
    /// Wall-clock duration in whole seconds, from the day offsets and seconds of day.
    pub duration_secs: i64,
}

impl ArcSpan {
    /// Build a span from the mapped endpoints of a segment.
    pub fn from_positions(start: DayPosition, end: DayPosition) -> Self {
        let start_frac = start.fraction.get();
        let end_frac = end.fraction.get();
        let duration_secs = (end.day - start.day) * 86_400 + i64::from(end.second_of_day)
            - i64::from(start.second_of_day);
        Self {
            start_day: start.day,
            end_day: end.day,
            start_frac,
            end_frac,
            adjusted_end_frac: resolve_end_fraction(start.day, start_frac, end.day, end_frac),
            duration_secs,
        }
    }

    /// Map both ends of `segment` and unwrap the end fraction.
    pub fn map_segment<Tz: TimeZone>(
        mapper: &TemporalMapper<Tz>,
        segment: &Segment,
    ) -> PlotResult<Self> {
        let start = mapper.map(segment.start)?;
        let end = mapper.map(segment.end)?;
        Ok(Self::from_positions(start, end))
    }

    /// Number of calendar-day boundaries crossed.
    pub fn days_spanned(&self) -> DayOffset {
        self.end_day - self.start_day
    }

    /// Whether the segment starts and ends on different calendar dates.
    pub fn crosses_midnight(&self) -> bool {
        self.start_day != self.end_day
    }

    /// Wall-clock duration in hours.
    pub fn duration_hours(&self) -> f64 {
        self.duration_secs as f64 / 3600.0
    }
}

/// Unwrap `end_frac` so that interpolating linearly from `start_frac` never jumps back across the
/// top of the dial.
///
/// A segment whose end fraction is below its start fraction crossed midnight; the end fraction is
/// lifted by the number of days spanned. Multi-day segments are swept over the whole range in one
/// interpolation rather than one lap per day.
///
/// A segment that ends at an earlier wall-clock time on the same date (a DST fall-back night, e.g.
/// 01:30 EDT to 01:10 EST) is left as is: nothing is lifted, the arc runs counter-clockwise and its
/// wall-clock duration is negative.
pub fn resolve_end_fraction(
    start_day: DayOffset,
    start_frac: f64,
    end_day: DayOffset,
    end_frac: f64,
) -> f64 {
    if end_frac < start_frac {
        end_frac + (end_day - start_day) as f64
    } else {
        end_frac
    }
}

#[cfg(test)]
#[path = "../../tests/unit/time/midnight.rs"]
mod tests;
