//! Per-day density levels for the planner calendar.

/// Map a day's item count to a density level 0..=4.
///
/// The scale is absolute, not relative to the busiest day in view, so a day
/// keeps its color when the window scrolls.
pub fn density_level(count: usize) -> u8 {
    match count {
        0 => 0,
        1 => 1,
        2..=3 => 2,
        4..=6 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::density_level;

    #[test]
    fn levels_follow_the_absolute_scale() {
        assert_eq!(density_level(0), 0);
        assert_eq!(density_level(1), 1);
        assert_eq!(density_level(3), 2);
        assert_eq!(density_level(5), 3);
        assert_eq!(density_level(9), 4);
    }

    #[test]
    fn levels_are_monotonic_and_capped() {
        let mut last = 0;
        for count in 0..100 {
            let level = density_level(count);
            assert!(level >= last);
            assert!(level <= 4);
            last = level;
        }
    }
}
