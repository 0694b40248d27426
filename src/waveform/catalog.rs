//! The four reference waveforms streamed by the Launchpad demo

use static_assertions::const_assert_eq;

use super::{IndicatorCode, Waveform, WaveformTable};

/// Rising ramp, 75 samples
pub const SAWTOOTH: Waveform = Waveform::new("sawtooth", IndicatorCode::RED, &SAWTOOTH_SAMPLES);

/// Decaying standing wave, 100 samples
pub const STATIONARY: Waveform =
    Waveform::new("stationary", IndicatorCode::BLUE, &STATIONARY_SAMPLES);

/// Half-wave rectified sine, 50 samples
pub const RECTIFIED: Waveform =
    Waveform::new("rectified", IndicatorCode::GREEN, &RECTIFIED_SAMPLES);

/// Modulated gaussian pulse, 100 samples
pub const GAUSSIAN: Waveform = Waveform::new("gaussian", IndicatorCode::VIOLET, &GAUSSIAN_SAMPLES);

/// Reference catalog, in mode-change order
pub static REFERENCE_WAVEFORMS: [Waveform; 4] = [SAWTOOTH, STATIONARY, RECTIFIED, GAUSSIAN];

/// Catalog view over [`REFERENCE_WAVEFORMS`]
pub fn reference() -> WaveformTable<'static> {
    WaveformTable::new(&REFERENCE_WAVEFORMS)
}

const_assert_eq!(SAWTOOTH.sample_count(), 75);
const_assert_eq!(STATIONARY.sample_count(), 100);
const_assert_eq!(RECTIFIED.sample_count(), 50);
const_assert_eq!(GAUSSIAN.sample_count(), 100);

#[rustfmt::skip]
const SAWTOOTH_SAMPLES: [u8; 75] = [
    0, 3, 6, 10, 13, 17, 20, 24, 27, 31, 34, 38, 41, 44, 48, 51,
    55, 58, 62, 65, 69, 72, 76, 79, 83, 86, 89, 93, 96, 100, 103, 107,
    110, 114, 117, 121, 124, 128, 131, 134, 138, 141, 145, 148, 152, 155, 159, 162,
    166, 169, 172, 176, 179, 183, 186, 190, 193, 197, 200, 204, 207, 211, 214, 217,
    221, 224, 228, 231, 235, 238, 242, 245, 249, 252, 0,
];

#[rustfmt::skip]
const STATIONARY_SAMPLES: [u8; 100] = [
    192, 210, 225, 233, 235, 229, 215, 194, 167, 136, 105, 74, 46, 24, 9, 2,
    4, 14, 31, 55, 81, 109, 137, 161, 181, 194, 202, 202, 197, 188, 175, 161,
    148, 136, 128, 123, 123, 127, 134, 142, 151, 158, 163, 163, 159, 149, 135, 116,
    95, 74, 54, 37, 25, 20, 22, 32, 50, 74, 103, 134, 166, 196, 221, 240,
    251, 253, 247, 233, 213, 187, 160, 132, 106, 84, 67, 56, 52, 54, 62, 73,
    87, 101, 113, 124, 130, 132, 130, 125, 117, 109, 100, 94, 92, 94, 101, 113,
    129, 149, 170, 191,
];

#[rustfmt::skip]
const RECTIFIED_SAMPLES: [u8; 50] = [
    0, 16, 32, 48, 64, 80, 96, 111, 125, 139, 153, 165, 178, 189, 200, 209,
    218, 226, 234, 240, 245, 249, 252, 254, 255, 255, 254, 252, 249, 245, 240, 234,
    226, 218, 209, 200, 189, 178, 165, 153, 139, 125, 111, 96, 80, 64, 48, 32,
    16, 0,
];

#[rustfmt::skip]
const GAUSSIAN_SAMPLES: [u8; 100] = [
    128, 128, 129, 130, 131, 131, 131, 129, 126, 123, 120, 118, 116, 117, 120, 126,
    133, 141, 149, 153, 154, 149, 139, 125, 108, 92, 80, 75, 78, 92, 115, 143,
    172, 197, 212, 213, 198, 170, 131, 88, 49, 22, 11, 21, 49, 93, 143, 193,
    231, 253, 253, 231, 193, 143, 93, 49, 21, 11, 22, 49, 88, 131, 170, 198,
    213, 212, 197, 172, 143, 115, 92, 78, 75, 80, 92, 108, 125, 139, 149, 154,
    153, 149, 141, 133, 126, 120, 117, 116, 118, 120, 123, 126, 129, 131, 131, 131,
    130, 129, 128, 128,
];
