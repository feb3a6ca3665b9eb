use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{PlotError, PlotResult};
use crate::render::raster::Raster;

/// What to draw as a plot title.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleSpec<'a> {
    /// Title text.
    pub text: &'a str,
    /// Left end of the text baseline, in pixels.
    pub origin: Point,
    /// Font size in points (1pt = 1px at 72 DPI).
    pub size_pt: f32,
    /// Text color.
    pub color: Rgba8,
}

/// Text-rendering collaborator that stamps a title onto a finished raster.
///
/// Failures are reported but never abort a render.
pub trait TitleOverlay {
    /// Draw `title` onto `raster`.
    fn draw_title(&self, raster: &mut Raster, title: &TitleSpec<'_>) -> PlotResult<()>;
}

/// Overlay that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTitle;

impl TitleOverlay for NoTitle {
    fn draw_title(&self, _raster: &mut Raster, _title: &TitleSpec<'_>) -> PlotResult<()> {
        Ok(())
    }
}

/// Title overlay that lays text out through `usvg` and rasterizes it with `resvg`.
#[derive(Clone)]
pub struct SvgTitleOverlay {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgTitleOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgTitleOverlay")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl Default for SvgTitleOverlay {
    fn default() -> Self {
        Self::system()
    }
}

impl SvgTitleOverlay {
    /// Overlay backed by the fonts installed on this system.
    pub fn system() -> Self {
        Self::with_font_dirs(std::iter::empty::<PathBuf>())
    }

    /// Overlay backed by system fonts plus every font file found in `dirs`.
    pub fn with_font_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir.as_ref());
        }
        Self::from_fontdb(db)
    }

    /// Overlay backed by an explicit font database.
    pub fn from_fontdb(db: usvg::fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Number of font faces available for layout.
    pub fn face_count(&self) -> usize {
        self.fontdb.faces().count()
    }

    fn title_svg(width: u32, height: u32, title: &TitleSpec<'_>) -> String {
        let c = title.color;
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#,
                r#"<text x="{x}" y="{y}" font-family="sans-serif" font-size="{size}" "#,
                r#"fill="rgb({r},{g},{b})" fill-opacity="{a}">{text}</text></svg>"#
            ),
            w = width,
            h = height,
            x = title.origin.x,
            y = title.origin.y,
            size = title.size_pt,
            r = c.r,
            g = c.g,
            b = c.b,
            a = f32::from(c.a) / 255.0,
            text = escape_xml(title.text),
        )
    }
}

impl TitleOverlay for SvgTitleOverlay {
    fn draw_title(&self, raster: &mut Raster, title: &TitleSpec<'_>) -> PlotResult<()> {
        if title.text.trim().is_empty() {
            return Ok(());
        }
        if self.face_count() == 0 {
            return Err(PlotError::title_overlay("no fonts available"));
        }
        if !title.size_pt.is_finite() || title.size_pt <= 0.0 {
            return Err(PlotError::title_overlay(format!(
                "invalid title size {}",
                title.size_pt
            )));
        }

        let svg = Self::title_svg(raster.width(), raster.height(), title);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: any_face_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| PlotError::title_overlay(format!("lay out title: {e}")))?;
        // Text without a usable face is dropped during layout.
        if tree.root().children().is_empty() {
            return Err(PlotError::title_overlay("no font face could render the title"));
        }

        let mut pixmap = resvg::tiny_skia::Pixmap::new(raster.width(), raster.height())
            .ok_or_else(|| PlotError::title_overlay("failed to allocate title pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        composite_premul_over(raster.data_mut(), pixmap.data());
        Ok(())
    }
}

/// Source-over composite of premultiplied `src` onto straight-alpha `dst`, both RGBA8.
fn composite_premul_over(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u32::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255 - sa;
        let da = u32::from(d[3]);
        let out_a = sa + (da * inv + 127) / 255;
        for ch in 0..3 {
            let dc_premul = (u32::from(d[ch]) * da + 127) / 255;
            let out_premul = u32::from(s[ch]) + (dc_premul * inv + 127) / 255;
            d[ch] = if out_a == 0 {
                0
            } else {
                ((out_premul * 255 + out_a / 2) / out_a).min(255) as u8
            };
        }
        d[3] = out_a.min(255) as u8;
    }
}

/// Resolve the requested family when installed, otherwise fall back to any face at all.
fn any_face_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), %err, "skipping unreadable font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/title.rs"]
mod tests;
