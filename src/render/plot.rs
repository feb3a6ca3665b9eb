use chrono::TimeZone;

use crate::classify::policy::ColorPolicy;
use crate::encode::png::{PngEncoder, RasterEncoder};
use crate::foundation::core::{Canvas, Instant, Point, Rgba8, Segment};
use crate::foundation::error::{PlotError, PlotResult};
use crate::render::raster::{ArcRasterizer, DEFAULT_SAMPLES_PER_SEGMENT, Raster};
use crate::render::scale::radial_scale;
use crate::render::title::{SvgTitleOverlay, TitleOverlay, TitleSpec};
use crate::time::mapper::TemporalMapper;
use crate::time::midnight::ArcSpan;

/// Fixed rendering parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Title font size in points.
    pub title_size: f32,
    /// Left end of the title baseline.
    pub title_origin: Point,
    /// Title text color.
    pub title_color: Rgba8,
    /// Canvas fill before drawing.
    pub background: Rgba8,
    /// Sampling steps per segment arc.
    pub samples_per_segment: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title_size: 16.0,
            title_origin: default_title_origin(16.0),
            title_color: Rgba8::BLACK,
            background: Rgba8::WHITE,
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
        }
    }
}

impl PlotConfig {
    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Change the title size. A title origin still at the default for the old size moves with it
    /// so the text keeps its margin; a custom origin is kept.
    pub fn set_title_size(&mut self, size: f32) {
        if self.title_origin == default_title_origin(self.title_size) {
            self.title_origin = default_title_origin(size);
        }
        self.title_size = size;
    }

    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> PlotResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_segment == 0 {
            return Err(PlotError::validation("samples_per_segment must be > 0"));
        }
        if !self.title_size.is_finite() || self.title_size <= 0.0 {
            return Err(PlotError::validation(format!(
                "title_size must be a positive number, got {}",
                self.title_size
            )));
        }
        Ok(())
    }
}

fn default_title_origin(size: f32) -> Point {
    Point::new(5.0, 5.0 + f64::from(size))
}

/// Everything needed for one render. Consumed by [`PlotRenderer::render`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlotRequest {
    /// Segments in ascending start order.
    pub segments: Vec<Segment>,
    /// Title drawn at the top-left corner.
    pub title: String,
    /// Reference instant: day 0 and dial centre.
    pub zero: Instant,
    /// Color strategy for this plot's event category.
    pub policy: ColorPolicy,
}

impl PlotRequest {
    /// Check that there is something to draw and that every segment is ordered.
    pub fn validate(&self) -> PlotResult<()> {
        if self.segments.is_empty() {
            return Err(PlotError::EmptyInput);
        }
        for (index, seg) in self.segments.iter().enumerate() {
            seg.validate(index)?;
        }
        Ok(())
    }
}

/// Counters collected while rasterizing one request.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlotStats {
    /// Segments drawn.
    pub segments: usize,
    /// Outermost day ring.
    pub max_day: i64,
    /// Pixels per day ring.
    pub radial_scale: f64,
    /// Samples written onto the raster.
    pub samples_drawn: u64,
    /// Samples that fell outside the raster.
    pub samples_dropped: u64,
    /// Whether the title overlay succeeded.
    pub title_drawn: bool,
}

/// Progress of one render. Transitions are linear and stop at the first failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStage {
    /// Request accepted.
    Init,
    /// Radial scale derived from the data.
    ScaleComputed,
    /// All segments drawn.
    SegmentsRasterized,
    /// Title stamped (or skipped after a logged failure).
    TitleOverlaid,
    /// Image bytes produced.
    Encoded,
}

/// Turns segment lists into polar plots: angle is time-of-day, radius is days since the reference
/// instant.
///
/// The renderer holds only immutable configuration and collaborators; each call allocates its own
/// raster, so one renderer can be shared across threads.
#[derive(Clone, Debug)]
pub struct PlotRenderer<Tz: TimeZone, O = SvgTitleOverlay, E = PngEncoder> {
    config: PlotConfig,
    zone: Tz,
    overlay: O,
    encoder: E,
}

impl<Tz: TimeZone> PlotRenderer<Tz> {
    /// Renderer with the system-font title overlay and the PNG encoder.
    pub fn new(config: PlotConfig, zone: Tz) -> PlotResult<Self> {
        Self::with_collaborators(config, zone, SvgTitleOverlay::system(), PngEncoder::default())
    }
}

impl<Tz, O, E> PlotRenderer<Tz, O, E>
where
    Tz: TimeZone,
    O: TitleOverlay,
    E: RasterEncoder,
{
    /// Renderer with explicit title and encoder collaborators.
    pub fn with_collaborators(
        config: PlotConfig,
        zone: Tz,
        overlay: O,
        encoder: E,
    ) -> PlotResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            zone,
            overlay,
            encoder,
        })
    }

    /// Rendering configuration.
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Render `request` and encode the result.
    #[tracing::instrument(skip_all, fields(title = %request.title, segments = request.segments.len()))]
    pub fn render(&self, request: PlotRequest) -> PlotResult<Vec<u8>> {
        let (raster, stats) = self.rasterize_with_stats(&request)?;
        drop(request);

        let bytes = self.encoder.encode(raster)?;
        tracing::debug!(stage = ?RenderStage::Encoded, bytes = bytes.len(), ?stats);
        Ok(bytes)
    }

    /// Render `request` to a raster without encoding.
    pub fn rasterize(&self, request: &PlotRequest) -> PlotResult<Raster> {
        Ok(self.rasterize_with_stats(request)?.0)
    }

    /// Render `request` to a raster and report drawing counters.
    pub fn rasterize_with_stats(&self, request: &PlotRequest) -> PlotResult<(Raster, PlotStats)> {
        tracing::debug!(stage = ?RenderStage::Init, zero = %request.zero);
        request.validate()?;

        let canvas = self.config.canvas();
        let mapper = TemporalMapper::new(request.zero, self.zone.clone())?;
        let scale = radial_scale(&request.segments, &mapper, canvas)?;
        let mut stats = PlotStats {
            segments: request.segments.len(),
            radial_scale: scale,
            ..PlotStats::default()
        };
        tracing::debug!(stage = ?RenderStage::ScaleComputed, scale);

        let mut raster = Raster::filled(canvas, self.config.background)?;
        let arc = ArcRasterizer {
            scale,
            samples: self.config.samples_per_segment,
        };
        let samples_per_arc = u64::from(arc.samples) + 1;
        for (index, seg) in request.segments.iter().enumerate() {
            let span = ArcSpan::map_segment(&mapper, seg).map_err(|e| e.at_segment(index))?;
            let color = request.policy.classify(&span);
            let drawn = arc.draw(&mut raster, &span, color) as u64;
            stats.max_day = stats.max_day.max(span.end_day);
            stats.samples_drawn += drawn;
            stats.samples_dropped += samples_per_arc - drawn;
        }
        tracing::debug!(
            stage = ?RenderStage::SegmentsRasterized,
            drawn = stats.samples_drawn,
            dropped = stats.samples_dropped
        );

        let title = TitleSpec {
            text: &request.title,
            origin: self.config.title_origin,
            size_pt: self.config.title_size,
            color: self.config.title_color,
        };
        match self.overlay.draw_title(&mut raster, &title) {
            Ok(()) => stats.title_drawn = true,
            Err(err) => tracing::warn!(%err, "writing plot title failed; continuing without it"),
        }
        tracing::debug!(stage = ?RenderStage::TitleOverlaid, title_drawn = stats.title_drawn);

        Ok((raster, stats))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plot.rs"]
mod tests;
