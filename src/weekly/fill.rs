//! Phase 2: circular linear interpolation over the canonical week.
//!
//! Each anchor looks forward (Mon → Sun → Mon ...) for the next anchor, at most
//! six steps away, and fills the unset days in between on a straight line:
//!
//! ```text
//! step  = (end - start) / (gap + 1)
//! day_i = start + step * i        for i in 1..=gap
//! ```
//!
//! Only aggregated sums act as anchors. A lone anchor has no partner within six
//! steps, so nothing is interpolated from it.

use crate::domain::{DAYS, DayValue};
use crate::weekly::aggregate::WeekTotals;

/// Fill every gap between consecutive anchors, wrapping Sun → Mon.
pub fn fill_gaps(totals: &WeekTotals) -> [DayValue; DAYS] {
    let mut days = [DayValue::Missing; DAYS];
    for (slot, sum) in days.iter_mut().zip(totals.sums) {
        if let Some(v) = sum {
            *slot = DayValue::Observed(v);
        }
    }

    for start in 0..DAYS {
        let Some(start_value) = totals.sums[start] else {
            continue;
        };
        let Some(next) = next_anchor(&totals.sums, start) else {
            continue;
        };
        if next.gap == 0 {
            continue;
        }

        let step = (next.value - start_value) / (next.gap + 1) as f64;
        for i in 1..=next.gap {
            days[(start + i) % DAYS] = DayValue::Interpolated(start_value + step * i as f64);
        }
    }

    days
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NextAnchor {
    gap: usize,
    value: f64,
}

/// Next set day strictly after `start`, searching at most six steps ahead.
fn next_anchor(sums: &[Option<f64>; DAYS], start: usize) -> Option<NextAnchor> {
    (1..DAYS).find_map(|offset| {
        sums[(start + offset) % DAYS].map(|value| NextAnchor {
            gap: offset - 1,
            value,
        })
    })
}
