//! Fixed sample tables and the catalog the sequencer plays them from

pub mod catalog;

use modular_bitfield::prelude::*;
use static_assertions::const_assert;
use ufmt::derive::uDebug;

/// Storage capacity of one waveform, in samples
pub const WAVEFORM_CAPACITY: usize = 100;

// Sample count is stored in a byte
const_assert!(WAVEFORM_CAPACITY <= u8::MAX as usize);

/// Indicator LED register layout (GPIO port F data bits)
#[bitfield(bits = 8)]
#[derive(Clone, Copy, Eq, PartialEq)]
#[allow(missing_docs)]
struct IndicatorBitfield {
    #[skip]
    __: B1,
    pub red: B1,
    pub blue: B1,
    pub green: B1,
    #[skip]
    __: B4,
}

/// Bit pattern identifying a waveform on the status LEDs.
///
/// Laid out like the Launchpad's port F data register: bit 1 red, bit 2 blue,
/// bit 3 green, so the raw value can also be written straight to the port.
#[derive(Clone, Copy, Debug, uDebug, Default, Eq, PartialEq)]
pub struct IndicatorCode(pub u8);

impl IndicatorCode {
    /// Red LED only
    pub const RED: Self = Self(0x02);
    /// Blue LED only
    pub const BLUE: Self = Self(0x04);
    /// Green LED only
    pub const GREEN: Self = Self(0x08);
    /// Red and blue together
    pub const VIOLET: Self = Self(0x06);

    /// Split the pattern into individual LED states
    pub fn leds(self) -> Leds {
        let b = IndicatorBitfield::from_bytes([self.0]);
        Leds {
            red: b.red() != 0,
            blue: b.blue() != 0,
            green: b.green() != 0,
        }
    }
}

/// Decoded indicator pattern
#[derive(Clone, Copy, Debug, uDebug, Default, Eq, PartialEq)]
#[allow(missing_docs)]
pub struct Leds {
    pub red: bool,
    pub blue: bool,
    pub green: bool,
}

/// One periodic signal, stored as up to [`WAVEFORM_CAPACITY`] 8-bit samples.
///
/// Only the first `sample_count()` entries are played; the rest of the
/// buffer is zero padding. Built in const context, so a table that is empty
/// or too long fails the build instead of failing at runtime.
#[derive(Clone, Copy, Debug)]
pub struct Waveform {
    name: &'static str,
    indicator: IndicatorCode,
    len: u8,
    samples: [u8; WAVEFORM_CAPACITY],
}

impl Waveform {
    /// Copy `table` into a fixed-capacity waveform
    pub const fn new(name: &'static str, indicator: IndicatorCode, table: &[u8]) -> Self {
        assert!(!table.is_empty(), "waveform must have at least one sample");
        assert!(
            table.len() <= WAVEFORM_CAPACITY,
            "waveform exceeds sample capacity"
        );

        let mut samples = [0_u8; WAVEFORM_CAPACITY];
        let mut i = 0;
        while i < table.len() {
            samples[i] = table[i];
            i += 1;
        }

        Waveform {
            name,
            indicator,
            len: table.len() as u8,
            samples,
        }
    }

    /// Short label for diagnostics
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// LED pattern shown while this waveform is active
    pub const fn indicator(&self) -> IndicatorCode {
        self.indicator
    }

    /// Number of valid samples, always in `1..=WAVEFORM_CAPACITY`
    pub const fn sample_count(&self) -> usize {
        self.len as usize
    }

    /// The valid samples, in playback order
    pub fn samples(&self) -> &[u8] {
        self.samples.get(..self.sample_count()).unwrap_or(&[])
    }

    /// Sample at `index`, or 0 past the end of the table
    pub fn sample(&self, index: usize) -> u8 {
        self.samples().get(index).copied().unwrap_or_default()
    }
}

/// Read-only, non-empty catalog of waveforms indexed `0..count()`
#[derive(Clone, Copy, Debug)]
pub struct WaveformTable<'a> {
    waveforms: &'a [Waveform],
    first: &'a Waveform,
}

impl<'a> WaveformTable<'a> {
    /// Wrap a list of waveforms. The list must not be empty.
    pub const fn new(waveforms: &'a [Waveform]) -> Self {
        let first = match waveforms.first() {
            Some(first) => first,
            None => panic!("catalog must hold at least one waveform"),
        };
        WaveformTable { waveforms, first }
    }

    /// Number of waveforms
    pub const fn count(&self) -> usize {
        self.waveforms.len()
    }

    /// Look up a waveform. Indices wrap, so every index maps to a waveform.
    pub fn get(&self, index: usize) -> &'a Waveform {
        // No panicking paths here; release builds link panic-never
        index
            .checked_rem(self.waveforms.len())
            .and_then(|i| self.waveforms.get(i))
            .unwrap_or(self.first)
    }

    /// Index that follows `index` in the mode-change cycle
    pub fn next_index(&self, index: usize) -> usize {
        index
            .wrapping_add(1)
            .checked_rem(self.waveforms.len())
            .unwrap_or_default()
    }

    /// Iterate over the catalog in index order
    pub fn iter(&self) -> impl Iterator<Item = &'a Waveform> {
        self.waveforms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Waveform = Waveform::new("short", IndicatorCode::GREEN, &[1, 2, 3]);
    const FULL: Waveform = Waveform::new("full", IndicatorCode::RED, &[7; WAVEFORM_CAPACITY]);

    #[test]
    fn waveform_keeps_only_the_given_samples() {
        assert_eq!(SHORT.sample_count(), 3);
        assert_eq!(SHORT.samples(), &[1, 2, 3]);
        assert_eq!(SHORT.name(), "short");
        assert_eq!(SHORT.indicator(), IndicatorCode::GREEN);
    }

    #[test]
    fn padding_is_not_exposed() {
        assert_eq!(SHORT.sample(2), 3);
        assert_eq!(SHORT.sample(3), 0);
        assert_eq!(SHORT.sample(WAVEFORM_CAPACITY + 5), 0);
    }

    #[test]
    fn a_table_can_fill_the_whole_capacity() {
        assert_eq!(FULL.sample_count(), WAVEFORM_CAPACITY);
        assert!(FULL.samples().iter().all(|&s| s == 7));
    }

    #[test]
    #[should_panic]
    fn oversized_table_is_rejected() {
        let table = [0_u8; WAVEFORM_CAPACITY + 1];
        let _ = Waveform::new("too long", IndicatorCode::RED, &table);
    }

    #[test]
    #[should_panic]
    fn empty_catalog_is_rejected() {
        let _ = WaveformTable::new(&[]);
    }

    #[test]
    fn table_lookup_wraps() {
        let waveforms = [SHORT, FULL];
        let table = WaveformTable::new(&waveforms);
        assert_eq!(table.count(), 2);
        assert_eq!(table.get(0).name(), "short");
        assert_eq!(table.get(1).name(), "full");
        assert_eq!(table.get(2).name(), "short");
        assert_eq!(table.next_index(0), 1);
        assert_eq!(table.next_index(1), 0);
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    fn indicator_codes_decode_to_leds() {
        assert_eq!(
            IndicatorCode::RED.leds(),
            Leds { red: true, blue: false, green: false }
        );
        assert_eq!(
            IndicatorCode::GREEN.leds(),
            Leds { red: false, blue: false, green: true }
        );
        assert_eq!(
            IndicatorCode::VIOLET.leds(),
            Leds { red: true, blue: true, green: false }
        );
        // Bits outside the LED pins are ignored
        assert_eq!(IndicatorCode(0xF1).leds(), Leds::default());
    }

    #[test]
    fn unused_port_bits_never_mask_the_leds() {
        let all = Leds { red: true, blue: true, green: true };
        assert_eq!(IndicatorCode(0xFF).leds(), all);
        assert_eq!(IndicatorCode(0x0E).leds(), all);
        assert_eq!(IndicatorCode(0xF3).leds(), IndicatorCode::RED.leds());
    }
}
