use super::*;
use crate::foundation::core::{Canvas, Rgba8};

struct FailingEncoder;

impl RasterEncoder for FailingEncoder {
    fn encode(&self, _raster: Raster) -> PlotResult<Vec<u8>> {
        Err(PlotError::encoding(anyhow::anyhow!("disk full")))
    }
}

#[test]
fn png_output_decodes_to_same_pixels() {
    let mut raster = Raster::filled(
        Canvas {
            width: 5,
            height: 3,
        },
        Rgba8::WHITE,
    )
    .unwrap();
    raster.put(4, 2, Rgba8::BLUE);
    raster.put(0, 0, Rgba8::RED);
    let expected = raster.data().to_vec();

    let bytes = PngEncoder::default().encode(raster).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (5, 3));
    assert_eq!(decoded.into_raw(), expected);
}

#[test]
fn encoder_failure_surfaces_as_encoding_error() {
    let raster = Raster::filled(
        Canvas {
            width: 1,
            height: 1,
        },
        Rgba8::WHITE,
    )
    .unwrap();
    let err = FailingEncoder.encode(raster).unwrap_err();
    assert!(matches!(err, PlotError::Encoding(_)));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn write_image_file_creates_parent_dirs() {
    let dir = std::env::temp_dir().join(format!("daywheel-png-{}", std::process::id()));
    let path = dir.join("nested").join("plot.png");
    let _ = std::fs::remove_dir_all(&dir);

    write_image_file(&path, b"not really a png").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"not really a png");
    std::fs::remove_dir_all(&dir).unwrap();
}
