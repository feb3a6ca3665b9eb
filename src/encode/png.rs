use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use image::ImageEncoder as _;
use image::codecs::png::{CompressionType, FilterType, PngEncoder as ImagePngEncoder};

use crate::foundation::error::{PlotError, PlotResult};
use crate::render::raster::Raster;

/// Image-encoder collaborator. Takes ownership of the finished raster.
pub trait RasterEncoder {
    /// Encode `raster` into a complete image file.
    fn encode(&self, raster: Raster) -> PlotResult<Vec<u8>>;
}

/// Lossless PNG encoder.
#[derive(Clone, Copy, Debug)]
pub struct PngEncoder {
    /// zlib compression effort.
    pub compression: CompressionType,
}

impl Default for PngEncoder {
    fn default() -> Self {
        Self {
            compression: CompressionType::Best,
        }
    }
}

impl RasterEncoder for PngEncoder {
    #[tracing::instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
    fn encode(&self, raster: Raster) -> PlotResult<Vec<u8>> {
        let (width, height) = (raster.width(), raster.height());
        let pixels = raster.into_raw();

        let mut buf = Vec::new();
        ImagePngEncoder::new_with_quality(
            Cursor::new(&mut buf),
            self.compression,
            FilterType::Adaptive,
        )
        .write_image(&pixels, width, height, image::ExtendedColorType::Rgba8)
        .context("encode png")
        .map_err(PlotError::encoding)?;

        tracing::debug!(bytes = buf.len(), "encoded png");
        Ok(buf)
    }
}

/// Create `path`'s parent directory if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> PlotResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write encoded bytes to `path`, creating parent directories as needed.
pub fn write_image_file(path: &Path, bytes: &[u8]) -> PlotResult<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
