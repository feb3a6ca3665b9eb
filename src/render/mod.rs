//! Scale, rasterization, title overlay and the plot renderer that ties them together.

pub(crate) mod plot;
pub(crate) mod raster;
pub(crate) mod scale;
pub(crate) mod title;
