//! Fixed-point tone discriminator
//!
//! Correlates one baud of samples against quadrature references of both
//! tones. The references are cos/sin of each tone at 9600 Hz scaled by 64
//! and rounded, so the whole computation stays in integer arithmetic.

use crate::config::{Tone, SAMPLES_PER_BIT};
use dasp::Sample;

/// Samples examined per decision
pub const WINDOW: usize = SAMPLES_PER_BIT;

const LOW_I: [i32; WINDOW] = [64, 45, 0, -45, -64, -45, 0, 45];
const LOW_Q: [i32; WINDOW] = [0, 45, 64, 45, 0, -45, -64, -45];
const HIGH_I: [i32; WINDOW] = [64, 8, -62, -24, 55, 39, -45, -51];
const HIGH_Q: [i32; WINDOW] = [0, 63, 17, -59, -32, 51, 45, -39];

/// Energy difference between the high and low tone over one window
///
/// Positive means the high tone dominates. Only the first [`WINDOW`]
/// samples are used; a shorter slice is treated as padded with silence.
pub fn discriminate(samples: &[u8]) -> i64 {
    let mut low = (0i64, 0i64);
    let mut high = (0i64, 0i64);

    for (k, &sample) in samples.iter().take(WINDOW).enumerate() {
        let x = i64::from(sample.to_sample::<i8>());
        low.0 += x * i64::from(LOW_I[k]);
        low.1 += x * i64::from(LOW_Q[k]);
        high.0 += x * i64::from(HIGH_I[k]);
        high.1 += x * i64::from(HIGH_Q[k]);
    }

    (high.0 * high.0 + high.1 * high.1) - (low.0 * low.0 + low.1 * low.1)
}

/// Discriminate the window starting at `offset`, if a full window is available
pub fn discriminate_at(samples: &[u8], offset: usize) -> Option<i64> {
    let end = offset.checked_add(WINDOW)?;
    samples.get(offset..end).map(discriminate)
}

/// Tone selected by a discriminator score; ties go to the low tone
pub fn dominant_tone(score: i64) -> Tone {
    if score > 0 {
        Tone::High
    } else {
        Tone::Low
    }
}
