use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgba8;
use crate::foundation::error::PlotError;
use crate::time::midnight::ArcSpan;

/// Event category a plot is drawn for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// Sleep intervals.
    Sleep,
    /// Feeding sessions.
    Feed,
}

impl PlotKind {
    /// All supported kinds, in rendering order.
    pub const ALL: [PlotKind; 2] = [PlotKind::Sleep, PlotKind::Feed];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            PlotKind::Sleep => "sleep",
            PlotKind::Feed => "feed",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sleep" => Ok(PlotKind::Sleep),
            "feed" => Ok(PlotKind::Feed),
            other => Err(PlotError::validation(format!("unknown plot type \"{other}\""))),
        }
    }
}

/// Sleep at least this long is drawn blue.
pub const SLEEP_LONG_HOURS: f64 = 5.0;
/// Sleep at least this long (and shorter than [`SLEEP_LONG_HOURS`]) is drawn green.
pub const SLEEP_MEDIUM_HOURS: f64 = 1.5;

/// Strategy choosing the color of one arc from its mapped span.
///
/// Each band's lower bound is inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPolicy {
    /// Blue for long sleeps, green for medium, red for short naps.
    Sleep,
    /// Blue for feeds within one calendar day, red for feeds spanning midnight.
    Feed,
}

impl ColorPolicy {
    /// Policy used for a given plot kind.
    pub fn for_kind(kind: PlotKind) -> Self {
        match kind {
            PlotKind::Sleep => ColorPolicy::Sleep,
            PlotKind::Feed => ColorPolicy::Feed,
        }
    }

    /// Color for one segment.
    pub fn classify(self, span: &ArcSpan) -> Rgba8 {
        match self {
            ColorPolicy::Sleep => sleep_color(span.duration_secs),
            ColorPolicy::Feed => feed_color(span.start_day, span.end_day),
        }
    }

    /// Color from raw day offsets and unadjusted fractions.
    ///
    /// The sleep duration is rounded to whole seconds before banding.
    pub fn classify_raw(
        self,
        start_day: i64,
        end_day: i64,
        start_frac: f64,
        end_frac: f64,
    ) -> Rgba8 {
        match self {
            ColorPolicy::Sleep => {
                let days = (end_day - start_day) as f64;
                let secs = ((end_frac - start_frac + days) * 86_400.0).round() as i64;
                sleep_color(secs)
            }
            ColorPolicy::Feed => feed_color(start_day, end_day),
        }
    }
}

fn sleep_color(duration_secs: i64) -> Rgba8 {
    let secs = duration_secs as f64;
    if secs >= SLEEP_LONG_HOURS * 3600.0 {
        Rgba8::BLUE
    } else if secs >= SLEEP_MEDIUM_HOURS * 3600.0 {
        Rgba8::GREEN
    } else {
        Rgba8::RED
    }
}

fn feed_color(start_day: i64, end_day: i64) -> Rgba8 {
    if start_day == end_day {
        Rgba8::BLUE
    } else {
        Rgba8::RED
    }
}

#[cfg(test)]
#[path = "../../tests/unit/classify/policy.rs"]
mod tests;
