use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(PlotError::EmptyInput.to_string().contains("empty input:"));
    assert!(
        PlotError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PlotError::title_overlay("x")
            .to_string()
            .contains("title overlay error:")
    );
    assert!(
        PlotError::DegenerateScale { max_day: 0 }
            .to_string()
            .contains("degenerate scale:")
    );
}

#[test]
fn segment_and_instant_errors_name_the_culprit() {
    let err = PlotError::InvalidSegment {
        index: 3,
        start: Instant(86_400),
        end: Instant(0),
    };
    let msg = err.to_string();
    assert!(msg.contains("#3"), "{msg}");
    assert!(msg.contains("1970-01-02T00:00:00Z"), "{msg}");
    assert!(msg.contains("1970-01-01T00:00:00Z"), "{msg}");

    let err = PlotError::OutOfOrderInstant {
        index: None,
        instant: Instant(0),
        zero: Instant(86_400),
    };
    assert!(err.to_string().starts_with("out-of-order instant:"));

    let msg = err.at_segment(7).to_string();
    assert!(msg.starts_with("out-of-order instant in segment #7:"), "{msg}");
    assert!(msg.contains("1970-01-01T00:00:00Z"), "{msg}");
}

#[test]
fn at_segment_keeps_first_index_and_ignores_other_errors() {
    let err = PlotError::OutOfOrderInstant {
        index: Some(2),
        instant: Instant(0),
        zero: Instant(86_400),
    };
    assert!(matches!(
        err.at_segment(5),
        PlotError::OutOfOrderInstant { index: Some(2), .. }
    ));
    assert!(matches!(PlotError::EmptyInput.at_segment(1), PlotError::EmptyInput));
}

#[test]
fn encoding_and_other_preserve_source() {
    let base = std::io::Error::other("boom");
    let err = PlotError::encoding(base);
    assert!(err.to_string().contains("encoding error:"));
    assert!(err.to_string().contains("boom"));

    let err = PlotError::Other(anyhow::Error::new(std::io::Error::other("bang")));
    assert!(err.to_string().contains("bang"));
}
