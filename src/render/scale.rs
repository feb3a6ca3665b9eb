use chrono::TimeZone;

use crate::foundation::core::{Canvas, DayOffset, Segment};
use crate::foundation::error::{PlotError, PlotResult};
use crate::time::mapper::TemporalMapper;

/// Share of the canvas half-extent used by the outermost day ring.
pub const RADIAL_FILL: f64 = 0.9;

/// Pixels per day ring so that the outermost segment end lands at [`RADIAL_FILL`] of the canvas
/// half-extent.
///
/// Segments are expected in ascending start order with the last one ending furthest out. The
/// maximum is still taken over every segment end, so unsorted input is drawn in full rather than
/// clipped.
pub fn radial_scale<Tz: TimeZone>(
    segments: &[Segment],
    mapper: &TemporalMapper<Tz>,
    canvas: Canvas,
) -> PlotResult<f64> {
    let Some(last) = segments.last() else {
        return Err(PlotError::EmptyInput);
    };
    let last_index = segments.len() - 1;
    let last_day = mapper
        .day_offset(last.end)
        .map_err(|e| e.at_segment(last_index))?;

    let mut max_day = last_day;
    for (index, seg) in segments.iter().enumerate() {
        let day = mapper.day_offset(seg.end).map_err(|e| e.at_segment(index))?;
        max_day = max_day.max(day);
    }
    if max_day != last_day {
        tracing::warn!(
            last_day,
            max_day,
            "segments are not ordered by end day; scaling to the furthest segment"
        );
    }

    scale_for_max_day(max_day, canvas)
}

/// Radial scale for a known maximum day offset.
pub fn scale_for_max_day(max_day: DayOffset, canvas: Canvas) -> PlotResult<f64> {
    if max_day <= 0 {
        return Err(PlotError::DegenerateScale { max_day });
    }
    Ok(canvas.half_extent() * RADIAL_FILL / max_day as f64)
}

#[cfg(test)]
#[path = "../../tests/unit/render/scale.rs"]
mod tests;
