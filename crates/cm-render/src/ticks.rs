//! Integer tick positions for the colour bar.

/// Most intervals a colour bar axis may be split into.
pub const MAX_INTERVALS: u64 = 8;

const STEP_MANTISSAS: [u64; 3] = [1, 2, 5];

/// The value span shown on the colour bar.
///
/// A flat grid still needs a visible span, so `min == max` widens to
/// `min..=min + 1`.
#[must_use]
pub fn colorbar_span((min, max): (u64, u64)) -> (u64, u64) {
    if max > min { (min, max) } else { (min, min.saturating_add(1)) }
}

/// Evenly spaced integer ticks inside `min..=max`.
///
/// The step is the smallest of 1, 2, 5 × 10^k that leaves at most
/// [`MAX_INTERVALS`] intervals between the ticks that fall inside the range.
/// Ticks are multiples of the step.
#[must_use]
pub fn integer_ticks(min: u64, max: u64) -> Vec<u64> {
    if max <= min {
        return vec![min];
    }
    let step = nice_step(min, max);
    let Some(mut value) = min.div_ceil(step).checked_mul(step) else {
        return vec![min];
    };
    let mut ticks = Vec::new();
    while value <= max {
        ticks.push(value);
        match value.checked_add(step) {
            Some(next) => value = next,
            None => break,
        }
    }
    ticks
}

fn nice_step(min: u64, max: u64) -> u64 {
    let mut magnitude = 1u64;
    loop {
        for mantissa in STEP_MANTISSAS {
            let Some(step) = mantissa.checked_mul(magnitude) else {
                return u64::MAX;
            };
            let count = (max / step).saturating_add(1).saturating_sub(min.div_ceil(step));
            if count <= MAX_INTERVALS + 1 {
                return step;
            }
        }
        magnitude = match magnitude.checked_mul(10) {
            Some(next) => next,
            None => return u64::MAX,
        };
    }
}
