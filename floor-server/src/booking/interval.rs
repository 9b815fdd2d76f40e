//! Half-open time intervals
//!
//! 预订窗口一律是 `[start, end)`：两个窗口重叠当且仅当
//! `s1 < e2 AND s2 < e1`。背靠背的 14:00–15:30 与 15:30–17:00 不算重叠。

/// Reservation window `[start, end)` in Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: i64,
    pub end: i64,
}

impl TimeSlot {
    pub fn new(start: i64, end: i64) -> Self {
        debug_assert!(end > start, "time slot must have positive length");
        Self { start, end }
    }

    /// Window starting at `start` lasting `minutes`
    pub fn from_start(start: i64, minutes: i64) -> Self {
        Self::new(start, start + minutes * 60_000)
    }

    /// Half-open overlap test
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Is the instant inside the window?
    pub fn contains(&self, instant: i64) -> bool {
        self.start <= instant && instant < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    fn slot(start_min: i64, end_min: i64) -> TimeSlot {
        TimeSlot::new(start_min * MIN, end_min * MIN)
    }

    #[test]
    fn overlapping_windows() {
        assert!(slot(0, 90).overlaps(&slot(30, 120)));
        assert!(slot(30, 120).overlaps(&slot(0, 90)));
        // containment
        assert!(slot(0, 180).overlaps(&slot(30, 60)));
        // identical
        assert!(slot(0, 90).overlaps(&slot(0, 90)));
    }

    #[test]
    fn back_to_back_is_not_overlap() {
        assert!(!slot(0, 90).overlaps(&slot(90, 180)));
        assert!(!slot(90, 180).overlaps(&slot(0, 90)));
    }

    #[test]
    fn disjoint_windows() {
        assert!(!slot(0, 60).overlaps(&slot(120, 180)));
    }

    #[test]
    fn contains_is_half_open() {
        let s = slot(10, 20);
        assert!(s.contains(10 * MIN));
        assert!(s.contains(15 * MIN));
        assert!(!s.contains(20 * MIN));
        assert!(!s.contains(9 * MIN));
    }

    #[test]
    fn from_start_computes_end() {
        let s = TimeSlot::from_start(0, 90);
        assert_eq!(s.end, 90 * MIN);
    }
}
