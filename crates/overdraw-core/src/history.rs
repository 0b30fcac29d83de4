//! Append-only version history.

use crate::stroke::StrokeSet;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Opacity added to every overlay hint so the oldest version stays visible.
pub const OVERLAY_BASE_OPACITY: f64 = 0.3;

/// History errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Version {requested} is out of range (history has {len} versions)")]
    OutOfRange { requested: usize, len: usize },
    #[error("History is empty")]
    Empty,
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// A committed snapshot of a stroke set.
///
/// Only built by [`VersionHistory::commit`]; serialized for hosts that publish history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Version {
    pub id: Uuid,
    pub name: String,
    strokes: StrokeSet,
}

impl Version {
    fn new(number: usize, strokes: StrokeSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("Version {number}"),
            strokes,
        }
    }

    pub fn strokes(&self) -> &StrokeSet {
        &self.strokes
    }
}

/// What a successful recall did.
#[derive(Debug, Clone, PartialEq)]
pub enum Recall {
    /// The requested version was already current.
    Unchanged,
    /// The live buffer must be replaced with this stroke set.
    Replaced(StrokeSet),
}

/// Ordered list of committed versions plus the current-version pointer.
#[derive(Debug, Clone, Serialize)]
pub struct VersionHistory {
    versions: Vec<Version>,
    /// 1-based; `len + 1` while editing a new, uncommitted version.
    current: usize,
    overlay_all: bool,
}

impl Default for VersionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionHistory {
    pub fn new() -> Self {
        Self {
            versions: Vec::new(),
            current: 1,
            overlay_all: false,
        }
    }

    /// Append `strokes` as the newest version and point past it.
    /// Returns the 1-based number of the new version.
    pub fn commit(&mut self, strokes: StrokeSet) -> usize {
        let number = self.versions.len() + 1;
        log::debug!("Committing version {} ({} strokes)", number, strokes.len());
        self.versions.push(Version::new(number, strokes));
        self.current = self.versions.len() + 1;
        number
    }

    /// Look up version `n` for the live buffer.
    ///
    /// The returned set shares storage with history; the first edit of the live
    /// copy detaches it, so the stored version is never modified.
    pub fn recall(&mut self, n: usize) -> HistoryResult<Recall> {
        let len = self.versions.len();
        if len == 0 {
            log::warn!("Recall of version {} rejected: history is empty", n);
            return Err(HistoryError::Empty);
        }
        if n == 0 || n > len {
            log::warn!("Recall of version {} rejected: {} versions", n, len);
            return Err(HistoryError::OutOfRange { requested: n, len });
        }
        if n == self.current {
            return Ok(Recall::Unchanged);
        }
        log::debug!("Recalling version {}", n);
        self.current = n;
        Ok(Recall::Replaced(self.versions[n - 1].strokes.clone()))
    }

    /// Clamp a slider value into `[1, len]`. `None` when there is nothing to select.
    pub fn clamp_index(&self, n: usize) -> Option<usize> {
        match self.versions.len() {
            0 => None,
            len => Some(n.clamp(1, len)),
        }
    }

    pub fn toggle_overlay_all(&mut self) -> bool {
        self.overlay_all = !self.overlay_all;
        self.overlay_all
    }

    pub fn overlay_all(&self) -> bool {
        self.overlay_all
    }

    /// Every committed version with its opacity hint, oldest first.
    ///
    /// The hint for zero-based index `i` is `i / len + 0.3`, which exceeds 1.0 for
    /// the newest versions of long histories; callers clamp.
    pub fn all_versions_for_overlay(&self) -> impl Iterator<Item = (&StrokeSet, f64)> + '_ {
        let len = self.versions.len();
        self.versions
            .iter()
            .enumerate()
            .map(move |(i, v)| (&v.strokes, opacity_hint(i, len)))
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Version `n` (1-based).
    pub fn get(&self, n: usize) -> Option<&Version> {
        n.checked_sub(1).and_then(|i| self.versions.get(i))
    }

    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }

    pub fn current_version(&self) -> usize {
        self.current
    }

    /// True while the live buffer is a new, uncommitted version.
    pub fn is_editing_new(&self) -> bool {
        self.current == self.versions.len() + 1
    }
}

/// Opacity hint for the zero-based version index `i` in a history of `len`.
pub fn opacity_hint(i: usize, len: usize) -> f64 {
    if len == 0 {
        return OVERLAY_BASE_OPACITY;
    }
    i as f64 / len as f64 + OVERLAY_BASE_OPACITY
}
