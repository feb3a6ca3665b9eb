use crate::foundation::core::Instant;

/// Convenience result type used across daywheel.
pub type PlotResult<T> = Result<T, PlotError>;

/// Top-level error taxonomy used by plotting APIs.
#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    /// The request carried no segments to draw.
    #[error("empty input: no segments to plot")]
    EmptyInput,

    /// A segment ends before it starts.
    #[error("invalid segment #{index}: end {end} precedes start {start}")]
    InvalidSegment {
        /// Position of the segment in the request.
        index: usize,
        /// Segment start.
        start: Instant,
        /// Segment end.
        end: Instant,
    },

    /// An instant falls on a calendar date before the reference date.
    #[error(
        "out-of-order instant{}: {instant} precedes reference date of {zero}",
        segment_label(.index)
    )]
    OutOfOrderInstant {
        /// Position of the segment in the request, once known.
        index: Option<usize>,
        /// Offending instant.
        instant: Instant,
        /// Reference instant of the plot.
        zero: Instant,
    },

    /// The data spans no calendar days, so no radial scale exists.
    #[error("degenerate scale: maximum day offset is {max_day}")]
    DegenerateScale {
        /// Maximum day offset found in the data.
        max_day: i64,
    },

    /// The image encoder rejected the raster.
    #[error("encoding error: {0:#}")]
    Encoding(anyhow::Error),

    /// The text-rendering collaborator could not draw the title.
    #[error("title overlay error: {0}")]
    TitleOverlay(String),

    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlotError {
    /// Build a [`PlotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlotError::TitleOverlay`] value.
    pub fn title_overlay(msg: impl Into<String>) -> Self {
        Self::TitleOverlay(msg.into())
    }

    /// Build a [`PlotError::Encoding`] value from any encoder error.
    pub fn encoding(err: impl Into<anyhow::Error>) -> Self {
        Self::Encoding(err.into())
    }

    /// Attach the position of the segment being processed to an instant-level error.
    pub fn at_segment(self, index: usize) -> Self {
        match self {
            Self::OutOfOrderInstant {
                index: None,
                instant,
                zero,
            } => Self::OutOfOrderInstant {
                index: Some(index),
                instant,
                zero,
            },
            other => other,
        }
    }
}

fn segment_label(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" in segment #{i}"),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
