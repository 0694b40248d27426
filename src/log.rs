//! Diagnostic event log, written as text lines to a spare serial port.
//!
//! The sample stream owns UART0 byte-for-byte, so diagnostics go to a
//! separate writer. With the `log` feature disabled, [`record`] compiles to
//! nothing.

use core::convert::Infallible;
use core::fmt;

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

/// Adapter from a `core::fmt` serial port to `ufmt`.
///
/// Write errors are discarded; a lost log line is not worth stalling for.
pub struct SerialLog<W>(pub W);

impl<W: fmt::Write> uWrite for SerialLog<W> {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        let _ = self.0.write_str(s);
        Ok(())
    }
}

/// Things worth reporting
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event<'a> {
    /// Streaming is about to start
    Boot {
        /// Catalog size
        waveforms: usize,
        /// Sample period [us]
        tick_us: u32,
    },
    /// A confirmed press switched the active waveform
    WaveformSelected {
        /// New catalog index
        index: usize,
        /// New waveform's name
        name: &'a str,
    },
    /// An edge settled back to "released"
    BounceRejected {
        /// Rejections so far
        total: u32,
    },
    /// The sample sink has refused samples since the last report
    SamplesDropped {
        /// Drops so far
        total: u32,
    },
    /// Confirmed presses counted on an input
    EdgeCount {
        /// Presses so far
        count: u32,
    },
    /// Latest on-die temperature conversion
    Temperature {
        /// Temperature [millidegrees C]
        millicelsius: i32,
        /// Conversions so far
        conversions: u32,
    },
    /// Servo pulse width changed
    ServoPulse {
        /// Pulse width [PWM clock counts]
        counts: u16,
    },
}

impl uDisplay for Event<'_> {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match *self {
            Event::Boot { waveforms, tick_us } => {
                uwrite!(f, "boot: {} waveforms, {} us tick", waveforms, tick_us)
            }
            Event::WaveformSelected { index, name } => {
                uwrite!(f, "waveform {}: {}", index, name)
            }
            Event::BounceRejected { total } => uwrite!(f, "bounce rejected ({} total)", total),
            Event::SamplesDropped { total } => uwrite!(f, "sink busy, {} samples dropped", total),
            Event::EdgeCount { count } => uwrite!(f, "falling edges: {}", count),
            Event::Temperature {
                millicelsius,
                conversions,
            } => {
                let sign = if millicelsius < 0 { "-" } else { "" };
                let abs = millicelsius.unsigned_abs();
                let (whole, frac) = (abs / 1000, abs % 1000);
                // ufmt has no zero padding
                let pad = match frac {
                    0..=9 => "00",
                    10..=99 => "0",
                    _ => "",
                };
                uwrite!(
                    f,
                    "temperature: {}{}.{}{} C ({} conversions)",
                    sign,
                    whole,
                    pad,
                    frac,
                    conversions
                )
            }
            Event::ServoPulse { counts } => uwrite!(f, "servo pulse: {} counts", counts),
        }
    }
}

/// Write one event as a line
#[cfg(feature = "log")]
pub fn record<W: uWrite>(w: &mut W, event: &Event<'_>) {
    let _ = ufmt::uwriteln!(w, "{}", event);
}

/// Logging disabled
#[cfg(not(feature = "log"))]
pub fn record<W: uWrite>(_w: &mut W, _event: &Event<'_>) {}

#[cfg(all(test, feature = "log"))]
mod tests {
    extern crate std;

    use super::*;
    use std::string::String;

    #[test]
    fn events_are_written_one_per_line() {
        let mut out = String::new();
        record(&mut out, &Event::Boot { waveforms: 4, tick_us: 5000 });
        record(&mut out, &Event::WaveformSelected { index: 1, name: "stationary" });
        record(&mut out, &Event::BounceRejected { total: 3 });
        assert_eq!(
            out,
            "boot: 4 waveforms, 5000 us tick\nwaveform 1: stationary\nbounce rejected (3 total)\n"
        );
    }

    #[test]
    fn serial_log_forwards_text() {
        let mut log = SerialLog(String::new());
        record(&mut log, &Event::EdgeCount { count: 12 });
        record(&mut log, &Event::SamplesDropped { total: 2 });
        assert_eq!(log.0, "falling edges: 12\nsink busy, 2 samples dropped\n");
    }

    #[test]
    fn temperatures_print_with_three_decimals() {
        let mut out = String::new();
        record(&mut out, &Event::Temperature { millicelsius: 23_750, conversions: 4 });
        record(&mut out, &Event::Temperature { millicelsius: 25_005, conversions: 5 });
        record(&mut out, &Event::Temperature { millicelsius: -540, conversions: 6 });
        record(&mut out, &Event::ServoPulse { counts: 4250 });
        assert_eq!(
            out,
            "temperature: 23.750 C (4 conversions)\n\
             temperature: 25.005 C (5 conversions)\n\
             temperature: -0.540 C (6 conversions)\n\
             servo pulse: 4250 counts\n"
        );
    }
}
