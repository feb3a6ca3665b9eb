//! Image encoders consuming finished rasters.

pub(crate) mod png;
