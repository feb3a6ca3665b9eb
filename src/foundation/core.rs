use std::fmt;

use crate::foundation::error::{PlotError, PlotResult};

pub use kurbo::{Point, Vec2};

/// Absolute point in time, whole seconds since the Unix epoch.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Instant(pub i64);

impl Instant {
    /// Build an instant from Unix seconds.
    pub fn from_unix(secs: i64) -> Self {
        Self(secs)
    }

    /// Unix seconds of this instant.
    pub fn unix(self) -> i64 {
        self.0
    }

    /// Convert to a `chrono::DateTime<Utc>`.
    ///
    /// Returns `None` if the value falls outside chrono's representable range.
    pub fn to_utc(self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::<chrono::Utc>::from_timestamp(self.0, 0)
    }

    /// Build an instant from any zoned `chrono::DateTime`, dropping sub-second precision.
    pub fn from_datetime<Tz: chrono::TimeZone>(dt: &chrono::DateTime<Tz>) -> Self {
        Self(dt.timestamp())
    }

    /// Shift by a signed number of seconds, saturating at the representable range.
    pub fn offset_secs(self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
            None => write!(f, "@{}", self.0),
        }
    }
}

/// One recorded event's duration, `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Event start.
    pub start: Instant,
    /// Event end (inclusive).
    pub end: Instant,
}

impl Segment {
    /// Build a segment, rejecting `end < start`.
    pub fn new(start: Instant, end: Instant) -> PlotResult<Self> {
        let seg = Self { start, end };
        seg.validate(0)?;
        Ok(seg)
    }

    /// Check ordering, reporting `index` as the segment position on failure.
    pub fn validate(&self, index: usize) -> PlotResult<()> {
        if self.end < self.start {
            return Err(PlotError::InvalidSegment {
                index,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Count of local calendar-day boundaries between the reference date and an instant's date.
pub type DayOffset = i64;

/// Local time-of-day normalised by 24 hours, in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DayFraction(pub f64);

impl DayFraction {
    /// Build from wall-clock hour, minute and second.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Self {
        Self((f64::from(hour) + f64::from(minute) / 60.0 + f64::from(second) / 3600.0) / 24.0)
    }

    /// Raw fraction value.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Angle in radians, `0` at the top of the dial and increasing clockwise.
    pub fn angle_rad(self) -> f64 {
        self.0 * std::f64::consts::TAU
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque pure red.
    pub const RED: Self = Self::opaque(255, 0, 0);
    /// Opaque pure green.
    pub const GREEN: Self = Self::opaque(0, 255, 0);
    /// Opaque pure blue.
    pub const BLUE: Self = Self::opaque(0, 0, 255);

    /// Build an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channels in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from channels in RGBA order.
    pub fn from_array(px: [u8; 4]) -> Self {
        Self {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }
}

/// Output raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Geometric centre of the canvas.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Half of the shorter side, the largest radius that fits on the canvas.
    pub fn half_extent(self) -> f64 {
        f64::from(self.width.min(self.height)) / 2.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
