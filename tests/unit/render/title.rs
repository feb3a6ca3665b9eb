use super::*;
use crate::foundation::core::Canvas;

fn canvas() -> Canvas {
    Canvas {
        width: 160,
        height: 40,
    }
}

fn spec(text: &str) -> TitleSpec<'_> {
    TitleSpec {
        text,
        origin: Point::new(5.0, 21.0),
        size_pt: 16.0,
        color: Rgba8::BLACK,
    }
}

#[test]
fn no_title_leaves_raster_untouched() {
    let mut r = Raster::filled(canvas(), Rgba8::WHITE).unwrap();
    NoTitle.draw_title(&mut r, &spec("hello")).unwrap();
    assert_eq!(r.count(Rgba8::WHITE), 160 * 40);
}

#[test]
fn empty_font_database_is_an_overlay_error() {
    let overlay = SvgTitleOverlay::from_fontdb(usvg::fontdb::Database::new());
    assert_eq!(overlay.face_count(), 0);

    let mut r = Raster::filled(canvas(), Rgba8::WHITE).unwrap();
    let err = overlay.draw_title(&mut r, &spec("hello")).unwrap_err();
    assert!(matches!(err, PlotError::TitleOverlay(_)));
    assert_eq!(r.count(Rgba8::WHITE), 160 * 40);
}

#[test]
fn blank_title_is_skipped() {
    let overlay = SvgTitleOverlay::from_fontdb(usvg::fontdb::Database::new());
    let mut r = Raster::filled(canvas(), Rgba8::WHITE).unwrap();
    overlay.draw_title(&mut r, &spec("  ")).unwrap();
}

#[test]
fn title_svg_escapes_markup() {
    let svg = SvgTitleOverlay::title_svg(160, 40, &spec("Feeds for <Ann> & \"Bo\""));
    assert!(svg.contains("Feeds for &lt;Ann&gt; &amp; &quot;Bo&quot;"));
    assert!(svg.contains(r#"font-size="16""#));
    assert!(svg.contains(r#"width="160""#));
    assert!(svg.contains(r#"x="5" y="21""#));
}

#[test]
fn premultiplied_source_over_straight_destination() {
    let mut dst = vec![255u8, 255, 255, 255, 255, 255, 255, 255, 10, 20, 30, 255];
    let src = vec![0u8, 0, 0, 255, 64, 0, 0, 128, 0, 0, 0, 0];
    composite_premul_over(&mut dst, &src);
    assert_eq!(&dst[0..4], &[0, 0, 0, 255]);
    assert_eq!(&dst[4..8], &[191, 127, 127, 255]);
    assert_eq!(&dst[8..12], &[10, 20, 30, 255]);
}

#[test]
fn system_fonts_draw_something_when_available() {
    let overlay = SvgTitleOverlay::system();
    if overlay.face_count() == 0 {
        return;
    }
    let mut r = Raster::filled(canvas(), Rgba8::WHITE).unwrap();
    overlay.draw_title(&mut r, &spec("Sleep")).unwrap();
    assert!(r.count(Rgba8::WHITE) < 160 * 40);
}
