use crate::foundation::core::{Canvas, DayFraction, Point, Rgba8, Vec2};
use crate::foundation::error::{PlotError, PlotResult};
use crate::time::midnight::ArcSpan;

/// Default number of sampling steps per segment; `steps + 1` points are plotted.
///
/// Dense enough to leave no visible gaps on a 1024x768 canvas.
pub const DEFAULT_SAMPLES_PER_SEGMENT: u32 = 10_000;

/// An owned RGBA8 pixel buffer, straight alpha, tightly packed, row-major.
///
/// Each render allocates its own raster and hands it to the encoder by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Allocate a raster filled with `fill`.
    pub fn filled(canvas: Canvas, fill: Rgba8) -> PlotResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(PlotError::validation(format!(
                "raster size must be non-zero, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        let len = (canvas.width as usize)
            .checked_mul(canvas.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| PlotError::validation("raster size overflows memory"))?;

        let px = fill.to_array();
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            data.extend_from_slice(&px);
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Borrow the raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrow the raw RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the raster and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: i64, y: i64) -> Option<Rgba8> {
        let i = self.offset(x, y)?;
        let px = &self.data[i..i + 4];
        Some(Rgba8::from_array([px[0], px[1], px[2], px[3]]))
    }

    /// Overwrite the pixel at `(x, y)`. Returns `false` (and draws nothing) outside the raster.
    pub fn put(&mut self, x: i64, y: i64, color: Rgba8) -> bool {
        let Some(i) = self.offset(x, y) else {
            return false;
        };
        self.data[i..i + 4].copy_from_slice(&color.to_array());
        true
    }

    /// Count pixels equal to `color`.
    pub fn count(&self, color: Rgba8) -> usize {
        let px = color.to_array();
        self.data.chunks_exact(4).filter(|c| *c == &px[..]).count()
    }
}

/// Continuous canvas position of a point on the dial.
///
/// Angle `0` is the top of the dial and increases clockwise; `radius` is in pixels.
pub fn polar_to_canvas(center: Point, radius: f64, theta: f64) -> Point {
    center + Vec2::new(radius * theta.sin(), -radius * theta.cos())
}

/// Integer pixel for a continuous canvas position (truncation toward zero).
pub fn to_pixel(p: Point) -> (i64, i64) {
    (p.x as i64, p.y as i64)
}

/// Samples one segment's arc onto a raster with fixed-step interpolation.
#[derive(Clone, Copy, Debug)]
pub struct ArcRasterizer {
    /// Pixels per day ring.
    pub scale: f64,
    /// Sampling steps per segment.
    pub samples: u32,
}

impl ArcRasterizer {
    /// Dial position (day ring, unwrapped fraction) at interpolation parameter `t` in `[0, 1]`.
    pub fn interpolate(span: &ArcSpan, t: f64) -> (f64, f64) {
        let day = span.start_day as f64 + (span.days_spanned() as f64) * t;
        let frac = span.start_frac + (span.adjusted_end_frac - span.start_frac) * t;
        (day, frac)
    }

    /// Canvas position at interpolation parameter `t`.
    pub fn point_at(&self, center: Point, span: &ArcSpan, t: f64) -> Point {
        let (day, frac) = Self::interpolate(span, t);
        polar_to_canvas(center, self.scale * day, DayFraction(frac).angle_rad())
    }

    /// Draw `span` in `color`, overwriting existing pixels. Off-raster samples are dropped.
    ///
    /// Returns the number of samples that landed on the raster.
    pub fn draw(&self, raster: &mut Raster, span: &ArcSpan, color: Rgba8) -> usize {
        let center = raster.canvas().center();
        let steps = self.samples.max(1);
        let mut drawn = 0usize;
        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            let (x, y) = to_pixel(self.point_at(center, span, t));
            if raster.put(x, y, color) {
                drawn += 1;
            }
        }
        drawn
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
