use chrono::FixedOffset;

use super::*;
use crate::render::raster::to_pixel;
use crate::render::title::NoTitle;

fn zone() -> FixedOffset {
    FixedOffset::east_opt(-5 * 3600).unwrap()
}

fn at(d: u32, h: u32, m: u32) -> Instant {
    Instant::from_datetime(&zone().with_ymd_and_hms(2022, 1, d, h, m, 0).unwrap())
}

fn renderer() -> PlotRenderer<FixedOffset, NoTitle, PngEncoder> {
    PlotRenderer::with_collaborators(PlotConfig::default(), zone(), NoTitle, PngEncoder::default())
        .unwrap()
}

fn sleep_request(segments: Vec<Segment>) -> PlotRequest {
    PlotRequest {
        segments,
        title: "Sleep segments for Ada Lovelace (born 2022-01-01)".to_string(),
        zero: at(1, 0, 0),
        policy: ColorPolicy::Sleep,
    }
}

struct BrokenTitle;

impl TitleOverlay for BrokenTitle {
    fn draw_title(&self, _raster: &mut Raster, _title: &TitleSpec<'_>) -> PlotResult<()> {
        Err(PlotError::title_overlay("loading font file: not found"))
    }
}

struct BrokenEncoder;

impl RasterEncoder for BrokenEncoder {
    fn encode(&self, _raster: Raster) -> PlotResult<Vec<u8>> {
        Err(PlotError::encoding(anyhow::anyhow!("encoder exploded")))
    }
}

#[test]
fn midnight_sleep_scenario_end_to_end() {
    let r = renderer();
    let seg = Segment::new(at(2, 22, 0), at(3, 2, 0)).unwrap();
    let req = sleep_request(vec![seg]);

    let mapper = TemporalMapper::new(req.zero, zone()).unwrap();
    let span = ArcSpan::map_segment(&mapper, &seg).unwrap();
    assert_eq!((span.start_day, span.end_day), (1, 2));
    assert!((span.start_frac - 22.0 / 24.0).abs() < 1e-12);
    assert!((span.adjusted_end_frac - 26.0 / 24.0).abs() < 1e-12);
    assert_eq!(req.policy.classify(&span), Rgba8::GREEN);

    let (raster, stats) = r.rasterize_with_stats(&req).unwrap();
    assert_eq!(stats.segments, 1);
    assert_eq!(stats.max_day, 2);
    assert!((stats.radial_scale - 384.0 * 0.9 / 2.0).abs() < 1e-9);
    assert_eq!(stats.samples_dropped, 0);
    assert_eq!(stats.samples_drawn, 10_001);
    assert!(stats.title_drawn);

    let arc = ArcRasterizer {
        scale: stats.radial_scale,
        samples: 10_000,
    };
    let center = raster.canvas().center();
    let start = arc.point_at(center, &span, 0.0);
    let end = arc.point_at(center, &span, 1.0);
    assert!((start.distance(center) - stats.radial_scale).abs() < 1e-9);
    assert!((end.distance(center) - 2.0 * stats.radial_scale).abs() < 1e-9);
    // 330 degrees: left of centre, above it. 30 degrees: right of centre, above it.
    assert!(start.x < center.x && start.y < center.y);
    assert!(end.x > center.x && end.y < center.y);

    for p in [start, end] {
        let (x, y) = to_pixel(p);
        assert_eq!(raster.get(x, y), Some(Rgba8::GREEN));
    }
    let green = raster.count(Rgba8::GREEN);
    let white = raster.count(Rgba8::WHITE);
    assert!(green > 0);
    assert_eq!(green + white, 1024 * 768);
}

#[test]
fn outermost_end_stays_inside_ninety_percent() {
    let r = renderer();
    let req = sleep_request(vec![
        Segment::new(at(2, 1, 0), at(2, 7, 0)).unwrap(),
        Segment::new(at(9, 13, 0), at(9, 14, 0)).unwrap(),
        Segment::new(at(20, 23, 0), at(21, 6, 30)).unwrap(),
    ]);
    let (_, stats) = r.rasterize_with_stats(&req).unwrap();
    assert_eq!(stats.max_day, 20);
    assert!(stats.radial_scale * 20.0 <= 0.9 * 384.0 + 1e-9);
    assert_eq!(stats.samples_dropped, 0);
}

#[test]
fn empty_request_fails_before_drawing() {
    let err = renderer().rasterize(&sleep_request(vec![])).unwrap_err();
    assert!(matches!(err, PlotError::EmptyInput));
}

#[test]
fn reversed_segment_reports_its_index() {
    let req = sleep_request(vec![
        Segment::new(at(2, 1, 0), at(2, 2, 0)).unwrap(),
        Segment {
            start: at(3, 5, 0),
            end: at(3, 4, 0),
        },
    ]);
    let err = renderer().rasterize(&req).unwrap_err();
    assert!(matches!(err, PlotError::InvalidSegment { index: 1, .. }));
}

#[test]
fn segment_before_reference_date_is_out_of_order() {
    let early = Instant::from_datetime(&zone().with_ymd_and_hms(2021, 12, 31, 8, 0, 0).unwrap());
    let mut req = sleep_request(vec![Segment::new(at(2, 1, 0), at(4, 2, 0)).unwrap()]);
    req.segments.insert(0, Segment::new(early, at(2, 0, 0)).unwrap());
    let err = renderer().rasterize(&req).unwrap_err();
    assert!(err.to_string().contains("segment #0"), "{err}");
    match err {
        PlotError::OutOfOrderInstant { index, instant, zero } => {
            assert_eq!(index, Some(0));
            assert_eq!(instant, early);
            assert_eq!(zero, req.zero);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn single_day_data_is_degenerate() {
    let req = sleep_request(vec![Segment::new(at(1, 1, 0), at(1, 3, 0)).unwrap()]);
    let err = renderer().rasterize(&req).unwrap_err();
    assert!(matches!(err, PlotError::DegenerateScale { max_day: 0 }));
}

#[test]
fn zero_duration_segment_is_a_single_point() {
    let req = PlotRequest {
        policy: ColorPolicy::Feed,
        ..sleep_request(vec![
            Segment::new(at(3, 6, 0), at(3, 6, 0)).unwrap(),
            Segment::new(at(5, 12, 0), at(5, 12, 0)).unwrap(),
        ])
    };
    let (raster, stats) = renderer().rasterize_with_stats(&req).unwrap();
    assert_eq!(stats.samples_drawn, 2 * 10_001);
    assert_eq!(raster.count(Rgba8::BLUE), 2);
}

#[test]
fn title_failure_does_not_abort_render() {
    let r = PlotRenderer::with_collaborators(
        PlotConfig::default(),
        zone(),
        BrokenTitle,
        PngEncoder::default(),
    )
    .unwrap();
    let req = sleep_request(vec![Segment::new(at(2, 22, 0), at(3, 2, 0)).unwrap()]);

    let (_, stats) = r.rasterize_with_stats(&req).unwrap();
    assert!(!stats.title_drawn);
    let bytes = r.render(req).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn encoder_failure_is_fatal() {
    let r = PlotRenderer::with_collaborators(PlotConfig::default(), zone(), NoTitle, BrokenEncoder)
        .unwrap();
    let req = sleep_request(vec![Segment::new(at(2, 22, 0), at(3, 2, 0)).unwrap()]);
    let err = r.render(req).unwrap_err();
    assert!(matches!(err, PlotError::Encoding(_)));
    assert!(err.to_string().contains("encoder exploded"));
}

#[test]
fn rendering_is_deterministic_and_thread_safe() {
    let r = renderer();
    let req = sleep_request(vec![
        Segment::new(at(2, 21, 0), at(3, 4, 0)).unwrap(),
        Segment::new(at(6, 9, 0), at(6, 10, 0)).unwrap(),
    ]);
    let expected = r.rasterize(&req).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..3).map(|_| s.spawn(|| r.rasterize(&req).unwrap())).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn config_defaults_and_validation() {
    let c = PlotConfig::default();
    assert_eq!((c.width, c.height), (1024, 768));
    assert_eq!(c.title_size, 16.0);
    assert_eq!(c.title_origin, Point::new(5.0, 21.0));
    assert_eq!(c.samples_per_segment, 10_000);
    c.validate().unwrap();

    let partial: PlotConfig = serde_json::from_str(r#"{ "width": 640 }"#).unwrap();
    assert_eq!((partial.width, partial.height), (640, 768));

    for bad in [
        PlotConfig {
            height: 0,
            ..PlotConfig::default()
        },
        PlotConfig {
            samples_per_segment: 0,
            ..PlotConfig::default()
        },
        PlotConfig {
            title_size: f32::NAN,
            ..PlotConfig::default()
        },
    ] {
        assert!(matches!(bad.validate(), Err(PlotError::Validation(_))));
        assert!(
            PlotRenderer::with_collaborators(bad, zone(), NoTitle, PngEncoder::default()).is_err()
        );
    }
}

#[test]
fn title_size_moves_only_the_default_origin() {
    let mut c = PlotConfig::default();
    c.set_title_size(30.0);
    assert_eq!(c.title_size, 30.0);
    assert_eq!(c.title_origin, Point::new(5.0, 35.0));

    let mut c: PlotConfig =
        serde_json::from_str(r#"{ "title_origin": { "x": 40.0, "y": 60.0 } }"#).unwrap();
    c.set_title_size(30.0);
    assert_eq!(c.title_size, 30.0);
    assert_eq!(c.title_origin, Point::new(40.0, 60.0));
}
