use crate::error::CoreError;
use chrono::{DateTime, Utc};
use std::ops::Range;

/// Width of one reservation slot, in minutes.
pub const SLOT_MINUTES: i64 = 15;

const HOURS_IN_DAY: usize = 24;
const DAYS_IN_YEAR: usize = 365;
const SLOTS_IN_YEAR: usize = DAYS_IN_YEAR * HOURS_IN_DAY * 60 / SLOT_MINUTES as usize;

/// Discretized reservation table covering one year from a fixed origin.
///
/// Scheduled tasks and subtasks claim every slot their `[start, start+duration)`
/// window touches; epics never reserve slots. Any slot outside the tracked
/// year counts as unavailable.
#[derive(Debug)]
pub struct SchedulingGrid {
    origin: DateTime<Utc>,
    occupied: Vec<bool>,
}

impl SchedulingGrid {
    pub fn new(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            occupied: vec![false; SLOTS_IN_YEAR],
        }
    }

    /// Slot indices the window covers, or `None` when any part of it falls
    /// outside the tracked year (including windows before the origin).
    fn span(&self, start: DateTime<Utc>, duration: i64) -> Option<Range<usize>> {
        let offset = (start - self.origin).num_minutes();
        if offset < 0 {
            return None;
        }
        let first = (offset / SLOT_MINUTES) as usize;
        let count = (duration.max(0) as usize)
            .div_ceil(SLOT_MINUTES as usize)
            .max(1);
        let end = first.checked_add(count)?;
        if end > self.occupied.len() {
            return None;
        }
        Some(first..end)
    }

    /// Claims every slot in the window, or fails with [`CoreError::SlotConflict`]
    /// leaving the grid untouched. An unscheduled item (`start` of `None`)
    /// succeeds trivially.
    pub fn reserve(
        &mut self,
        start: Option<DateTime<Utc>>,
        duration: i64,
    ) -> Result<(), CoreError> {
        let Some(start) = start else { return Ok(()) };
        let span = self
            .span(start, duration)
            .ok_or(CoreError::SlotConflict { start, duration })?;
        if self.occupied[span.clone()].iter().any(|taken| *taken) {
            return Err(CoreError::SlotConflict { start, duration });
        }
        for slot in &mut self.occupied[span] {
            *slot = true;
        }
        Ok(())
    }

    /// Marks the window free again. A `None` start or an out-of-window span
    /// is a no-op.
    pub fn release(&mut self, start: Option<DateTime<Utc>>, duration: i64) {
        let Some(start) = start else { return };
        if let Some(span) = self.span(start, duration) {
            for slot in &mut self.occupied[span] {
                *slot = false;
            }
        }
    }

    /// Marks the window occupied without checking for collisions. Used when
    /// replaying previously validated state, which is trusted as-is.
    pub fn occupy(&mut self, start: Option<DateTime<Utc>>, duration: i64) {
        let Some(start) = start else { return };
        if let Some(span) = self.span(start, duration) {
            for slot in &mut self.occupied[span] {
                *slot = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn origin() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn disjoint_windows_both_reserve() {
        let mut grid = SchedulingGrid::new(origin());
        grid.reserve(Some(origin()), 30).unwrap();
        grid.reserve(Some(origin() + Duration::minutes(30)), 30).unwrap();
    }

    #[test]
    fn overlapping_window_is_rejected_without_mutation() {
        let mut grid = SchedulingGrid::new(origin());
        grid.reserve(Some(origin()), 60).unwrap();
        // Overlaps the last slot of the first window.
        let err = grid.reserve(Some(origin() + Duration::minutes(45)), 30);
        assert!(err.is_err());
        // The non-overlapping tail slot must still be free.
        grid.reserve(Some(origin() + Duration::minutes(60)), 15).unwrap();
    }

    #[test]
    fn zero_duration_still_claims_one_slot() {
        let mut grid = SchedulingGrid::new(origin());
        grid.reserve(Some(origin()), 0).unwrap();
        assert!(grid.reserve(Some(origin() + Duration::minutes(5)), 0).is_err());
    }

    #[test]
    fn unscheduled_items_never_conflict() {
        let mut grid = SchedulingGrid::new(origin());
        grid.reserve(None, 30).unwrap();
        grid.reserve(None, 30).unwrap();
    }

    #[test]
    fn windows_outside_the_year_are_unavailable() {
        let mut grid = SchedulingGrid::new(origin());
        assert!(grid.reserve(Some(origin() - Duration::minutes(15)), 15).is_err());
        assert!(grid.reserve(Some(origin() + Duration::days(365)), 15).is_err());
        // A window straddling the far edge fails whole.
        assert!(grid
            .reserve(Some(origin() + Duration::days(365) - Duration::minutes(15)), 30)
            .is_err());
    }

    #[test]
    fn release_frees_the_window_for_reuse() {
        let mut grid = SchedulingGrid::new(origin());
        grid.reserve(Some(origin()), 45).unwrap();
        grid.release(Some(origin()), 45);
        grid.reserve(Some(origin()), 45).unwrap();
    }

    #[test]
    fn occupy_skips_collision_checks() {
        let mut grid = SchedulingGrid::new(origin());
        grid.reserve(Some(origin()), 30).unwrap();
        grid.occupy(Some(origin()), 30);
        // Still occupied afterwards.
        assert!(grid.reserve(Some(origin()), 15).is_err());
    }
}
