//! daywheel renders event intervals as a polar plot.
//!
//! Angle encodes local time-of-day (midnight at the top, clockwise) and radius encodes calendar
//! days since a reference instant, usually a birth date at local midnight. Each recorded event
//! becomes one arc, colored by a per-category policy.
//!
//! # Pipeline overview
//!
//! 1. **Map**: `Instant -> (day offset, day fraction)` in one local zone ([`TemporalMapper`])
//! 2. **Unwrap**: lift end fractions past midnight so arcs never jump back ([`ArcSpan`])
//! 3. **Scale**: fit the outermost day ring into 90% of the canvas half-extent ([`radial_scale`])
//! 4. **Rasterize**: sample every arc onto an owned RGBA8 [`Raster`] ([`ArcRasterizer`])
//! 5. **Title** (best effort) and **Encode** to PNG ([`PngEncoder`])
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: a fixed sample count per arc gives stable pixel output.
//! - **No shared state**: each render owns its raster and hands it to the encoder by value.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod classify;
mod encode;
mod foundation;
mod render;
mod source;
mod time;

pub use classify::policy::{ColorPolicy, PlotKind, SLEEP_LONG_HOURS, SLEEP_MEDIUM_HOURS};
pub use encode::png::{PngEncoder, RasterEncoder, ensure_parent_dir, write_image_file};
pub use foundation::core::{Canvas, DayFraction, DayOffset, Instant, Point, Rgba8, Segment, Vec2};
pub use foundation::error::{PlotError, PlotResult};
pub use render::plot::{PlotConfig, PlotRenderer, PlotRequest, PlotStats, RenderStage};
pub use render::raster::{
    ArcRasterizer, DEFAULT_SAMPLES_PER_SEGMENT, Raster, polar_to_canvas, to_pixel,
};
pub use render::scale::{RADIAL_FILL, radial_scale, scale_for_max_day};
pub use render::title::{NoTitle, SvgTitleOverlay, TitleOverlay, TitleSpec};
pub use source::log::{EventLog, FeedEntry, SleepEntry, Subject};
pub use time::mapper::{DayPosition, TemporalMapper, calendar_day_diff, local_midnight};
pub use time::midnight::{ArcSpan, resolve_end_fraction};
