//! Shared single-cycle waveform table

use std::f64::consts::PI;
use std::sync::OnceLock;

/// Entries per cycle
///
/// 9600 Hz / 480 gives a 20 Hz phase step, which divides both AFSK tones.
pub const TABLE_SIZE: usize = 480;

/// One cycle of a waveform in `[-1.0, 1.0]`, sampled at [`TABLE_SIZE`] points
#[derive(Debug)]
pub struct WaveformTable {
    samples: [f64; TABLE_SIZE],
}

static SINE: OnceLock<WaveformTable> = OnceLock::new();

impl WaveformTable {
    /// The process-wide sine table, built on first use
    pub fn sine() -> &'static WaveformTable {
        SINE.get_or_init(|| {
            tracing::trace!(size = TABLE_SIZE, "building sine table");
            WaveformTable {
                samples: std::array::from_fn(|i| (2.0 * PI * i as f64 / TABLE_SIZE as f64).sin()),
            }
        })
    }

    /// Value at `index`, wrapping around the cycle
    pub fn at(&self, index: usize) -> f64 {
        self.samples[index % TABLE_SIZE]
    }
}
