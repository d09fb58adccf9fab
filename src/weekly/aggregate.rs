//! Phase 1: bucket observations by weekday and sum them.

use crate::domain::{DAYS, Observation, Weekday};

/// Per-weekday sums before any gap filling.
///
/// `sums[i]` is `None` until the first observation for weekday `i` arrives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeekTotals {
    pub sums: [Option<f64>; DAYS],
    pub counts: [usize; DAYS],
}

impl WeekTotals {
    pub fn add(&mut self, day: Weekday, value: f64) {
        let idx = day.index();
        self.sums[idx] = Some(match self.sums[idx] {
            None => value,
            Some(acc) => acc + value,
        });
        self.counts[idx] += 1;
    }

    pub fn get(&self, day: Weekday) -> Option<f64> {
        self.sums[day.index()]
    }

    pub fn anchor_count(&self) -> usize {
        self.sums.iter().filter(|s| s.is_some()).count()
    }
}

/// Sum all observations that fall on the same weekday (no averaging).
pub fn aggregate(observations: &[Observation]) -> WeekTotals {
    let mut totals = WeekTotals::default();
    for obs in observations {
        totals.add(obs.weekday(), obs.value);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(y: i32, m: u32, d: u32, value: f64) -> Observation {
        Observation::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), value)
    }

    #[test]
    fn same_weekday_values_are_summed() {
        // Two Mondays and two Tuesdays from different weeks.
        let totals = aggregate(&[
            obs(2020, 1, 6, 5.0),
            obs(2020, 1, 13, 10.0),
            obs(2020, 1, 7, 3.0),
            obs(2020, 1, 14, 7.0),
        ]);
        assert_eq!(totals.get(Weekday::Mon), Some(15.0));
        assert_eq!(totals.get(Weekday::Tue), Some(10.0));
        assert_eq!(totals.counts[Weekday::Mon.index()], 2);
        assert_eq!(totals.anchor_count(), 2);
    }

    #[test]
    fn summation_is_order_independent() {
        let mut input = vec![
            obs(2020, 1, 1, 4.0),
            obs(2020, 1, 8, -2.0),
            obs(2020, 1, 15, 0.5),
        ];
        let forward = aggregate(&input);
        input.reverse();
        let backward = aggregate(&input);
        assert_eq!(forward.get(Weekday::Wed), Some(2.5));
        assert_eq!(forward, backward);
    }

    #[test]
    fn zero_sum_is_still_an_anchor() {
        let totals = aggregate(&[obs(2020, 1, 1, 4.0), obs(2020, 1, 8, -4.0)]);
        assert_eq!(totals.get(Weekday::Wed), Some(0.0));
    }

    #[test]
    fn empty_input_leaves_every_day_unset() {
        let totals = aggregate(&[]);
        assert_eq!(totals.anchor_count(), 0);
        assert!(totals.sums.iter().all(Option::is_none));
    }
}
