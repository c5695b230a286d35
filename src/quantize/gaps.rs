// Typical inter-onset gap estimation

use super::onset::OnsetGroup;

/// Median of the positive gaps between consecutive group starts, in ticks.
///
/// With fewer than two positive gaps the median says nothing about the
/// rhythm, so a sixteenth note (`ticks_per_quarter / 4`) is used instead.
/// The result is never below 1.
pub fn typical_gap_ticks(groups: &[OnsetGroup], ticks_per_quarter: u32) -> u64 {
    let mut gaps: Vec<u64> = groups
        .windows(2)
        .map(|w| w[1].start_tick.saturating_sub(w[0].start_tick))
        .filter(|&g| g > 0)
        .collect();

    let typical = if gaps.len() < 2 {
        ticks_per_quarter as u64 / 4
    } else {
        median(&mut gaps)
    };

    typical.max(1)
}

/// Conventional median; the mean of the two middle values for even counts.
/// `values` must be non-empty.
fn median(values: &mut [u64]) -> u64 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        let (lo, hi) = (values[mid - 1], values[mid]);
        lo + (hi - lo) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteEvent;

    fn groups_at(ticks: &[u64]) -> Vec<OnsetGroup> {
        ticks
            .iter()
            .map(|&t| OnsetGroup {
                start_tick: t,
                events: vec![NoteEvent::new(t, 60)],
            })
            .collect()
    }

    #[test]
    fn odd_count_takes_middle_gap() {
        // gaps: 480, 480, 1440
        let groups = groups_at(&[0, 480, 960, 2400]);
        assert_eq!(typical_gap_ticks(&groups, 480), 480);
    }

    #[test]
    fn even_count_averages_middle_gaps() {
        // gaps: 100, 200, 300, 1000
        let groups = groups_at(&[0, 100, 300, 600, 1600]);
        assert_eq!(typical_gap_ticks(&groups, 480), 250);
    }

    #[test]
    fn too_few_gaps_fall_back_to_sixteenth() {
        assert_eq!(typical_gap_ticks(&[], 480), 120);
        assert_eq!(typical_gap_ticks(&groups_at(&[0]), 480), 120);
        assert_eq!(typical_gap_ticks(&groups_at(&[0, 960]), 480), 120);
        assert_eq!(typical_gap_ticks(&groups_at(&[0, 960]), 96), 24);
    }

    #[test]
    fn coincident_groups_do_not_count_as_gaps() {
        let groups = groups_at(&[0, 0, 0, 240]);
        assert_eq!(typical_gap_ticks(&groups, 480), 120);
    }

    #[test]
    fn result_is_at_least_one_tick() {
        assert_eq!(typical_gap_ticks(&[], 2), 1);
    }
}
