//! On-die temperature sensor readings.
//!
//! The ADC samples the sensor against the internal 3.3 V reference; the
//! datasheet's transfer function is
//! `TEMP = 147.5 - (75 * VREF * CODE) / 4096` in degrees C.

/// ADC result register width mask (12-bit conversions)
pub const CODE_MASK: u16 = 0x0fff;

/// Convert a raw 12-bit sensor conversion to millidegrees Celsius.
/// Bits above the conversion width are ignored.
pub fn millicelsius(code: u16) -> i32 {
    let code = i32::from(code & CODE_MASK);
    147_500 - 247_500 * code / 4096
}

/// Most recent conversion and how many have completed
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reading {
    /// Raw conversion result
    pub code: u16,
    /// Conversions completed since start-up. Wraps.
    pub conversions: u32,
}

impl Reading {
    /// Fold in a new conversion
    pub fn update(self, code: u16) -> Self {
        Reading {
            code: code & CODE_MASK,
            conversions: self.conversions.wrapping_add(1),
        }
    }

    /// Temperature of the latest conversion in millidegrees Celsius
    pub fn millicelsius(&self) -> i32 {
        millicelsius(self.code)
    }
}
