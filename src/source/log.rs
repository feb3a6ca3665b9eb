use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, TimeZone};

use crate::classify::policy::{ColorPolicy, PlotKind};
use crate::foundation::core::{Instant, Segment};
use crate::foundation::error::{PlotError, PlotResult};
use crate::render::plot::PlotRequest;
use crate::time::mapper::local_midnight;

/// Person the events were recorded for.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Subject {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub birthday: String,
}

impl Subject {
    /// Parsed date of birth.
    pub fn birth_date(&self) -> PlotResult<NaiveDate> {
        NaiveDate::parse_from_str(&self.birthday, "%Y-%m-%d").map_err(|e| {
            PlotError::validation(format!("parsing birthday \"{}\": {e}", self.birthday))
        })
    }

    /// `"<first> <last>"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One sleep interval. Entries still in progress have no end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SleepEntry {
    /// Start, Unix seconds.
    pub start: i64,
    /// End, Unix seconds.
    #[serde(default)]
    pub end: Option<i64>,
}

/// One breast-feeding session; only its start and per-side durations are recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeedEntry {
    /// Start, Unix seconds.
    pub start: i64,
    /// Seconds on the left side.
    #[serde(default)]
    pub breast_left: i64,
    /// Seconds on the right side.
    #[serde(default)]
    pub breast_right: i64,
}

impl FeedEntry {
    /// Feed interval, ending after both sides' durations.
    pub fn segment(&self) -> Segment {
        let start = Instant::from_unix(self.start);
        Segment {
            start,
            end: start.offset_secs(self.breast_left.saturating_add(self.breast_right)),
        }
    }
}

/// Exported event log for one subject.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventLog {
    /// Whose events these are.
    pub subject: Subject,
    /// Sleep intervals.
    #[serde(default)]
    pub sleep: Vec<SleepEntry>,
    /// Feeding sessions.
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

impl EventLog {
    /// Parse a log from JSON.
    pub fn from_json(s: &str) -> PlotResult<Self> {
        serde_json::from_str::<Self>(s)
            .context("parse event log json")
            .map_err(PlotError::from)
    }

    /// Read and parse a JSON log file.
    pub fn from_path(path: &Path) -> PlotResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read event log '{}'", path.display()))?;
        Self::from_json(&s)
    }

    /// Segments for `kind`, sorted by start.
    pub fn segments(&self, kind: PlotKind) -> Vec<Segment> {
        let mut out: Vec<Segment> = match kind {
            PlotKind::Sleep => self
                .sleep
                .iter()
                .filter_map(|e| {
                    e.end.map(|end| Segment {
                        start: Instant::from_unix(e.start),
                        end: Instant::from_unix(end),
                    })
                })
                .collect(),
            PlotKind::Feed => self.feeds.iter().map(FeedEntry::segment).collect(),
        };
        out.sort_by_key(|s| (s.start, s.end));
        out
    }

    /// Plot title for `kind`.
    pub fn title(&self, kind: PlotKind) -> String {
        let what = match kind {
            PlotKind::Sleep => "Sleep segments",
            PlotKind::Feed => "Feeds",
        };
        format!(
            "{what} for {} (born {})",
            self.subject.full_name(),
            self.subject.birthday
        )
    }

    /// Build a render request for `kind`, centred on the subject's birth at local midnight.
    pub fn plot_request<Tz: TimeZone>(
        &self,
        kind: PlotKind,
        zone: &Tz,
    ) -> PlotResult<PlotRequest> {
        let born = self.subject.birth_date()?;
        let segments = self.segments(kind);
        tracing::info!(
            subject = %self.subject.full_name(),
            %born,
            %kind,
            count = segments.len(),
            "loaded segments"
        );
        if segments.is_empty() {
            return Err(PlotError::EmptyInput);
        }

        Ok(PlotRequest {
            segments,
            title: self.title(kind),
            zero: local_midnight(born, zone)?,
            policy: ColorPolicy::for_kind(kind),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/log.rs"]
mod tests;
