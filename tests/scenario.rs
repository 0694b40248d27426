//! End-to-end runs of the streaming core against fake hardware

use std::cell::Cell;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use embedded_hal::digital::v2::InputPin;
use embedded_hal::serial;

use tm4c123_wavegen::debounce::{Debouncer, EdgeAction, Polarity, Settled};
use tm4c123_wavegen::sequencer::{Cursor, Emission, Indicator, Sequencer, SharedSequencer};
use tm4c123_wavegen::waveform::{catalog, IndicatorCode};

/// Serial port that accepts everything
#[derive(Default)]
struct Wire(Vec<u8>);

impl serial::Write<u8> for Wire {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        self.0.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

#[derive(Default)]
struct Led(Vec<IndicatorCode>);

impl Indicator for Led {
    fn show(&mut self, code: IndicatorCode) {
        self.0.push(code);
    }
}

/// Active-low push button
struct Button(Cell<bool>);

impl Button {
    fn released() -> Self {
        Button(Cell::new(true))
    }

    fn press(&self) {
        self.0.set(false);
    }

    fn release(&self) {
        self.0.set(true);
    }
}

impl InputPin for Button {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

#[test]
fn sawtooth_wraps_then_press_switches_to_stationary() {
    let mut seq = Sequencer::new(catalog::reference(), Wire::default(), Led::default());

    // One full sawtooth period, then the first sample again
    for _ in 0..75 {
        seq.on_tick();
    }
    assert_eq!(seq.cursor(), Cursor { waveform: 0, sample: 0 });
    assert_eq!(seq.on_tick(), Emission::Sent(0));
    assert_eq!(seq.on_tick(), Emission::Sent(3));

    // Press mid-period: stationary starts from its first sample
    assert_eq!(seq.on_mode_change(), Cursor { waveform: 1, sample: 0 });
    assert_eq!(seq.on_tick(), Emission::Sent(192));
    assert_eq!(seq.on_tick(), Emission::Sent(210));

    let (wire, led) = seq.release();
    assert_eq!(&wire.0[..75], catalog::SAWTOOTH.samples());
    assert_eq!(&wire.0[75..], [0, 3, 192, 210]);
    assert_eq!(led.0, [IndicatorCode::RED, IndicatorCode::BLUE]);
}

#[test]
fn every_waveform_replays_exactly() {
    let table = catalog::reference();
    let mut seq = Sequencer::new(table, Wire::default(), Led::default());

    let mut expected = Vec::new();
    for (i, waveform) in table.iter().enumerate() {
        if i > 0 {
            seq.on_mode_change();
        }
        // Two periods each
        for _ in 0..2 * waveform.sample_count() {
            seq.on_tick();
        }
        expected.extend_from_slice(waveform.samples());
        expected.extend_from_slice(waveform.samples());
    }

    // And back around to sawtooth
    assert_eq!(seq.on_mode_change(), Cursor::default());

    let (wire, led) = seq.release();
    assert_eq!(wire.0, expected);
    assert_eq!(
        led.0,
        [
            IndicatorCode::RED,
            IndicatorCode::BLUE,
            IndicatorCode::GREEN,
            IndicatorCode::VIOLET,
            IndicatorCode::RED,
        ]
    );
}

#[test]
fn bouncing_press_changes_mode_once() {
    let shared = SharedSequencer::new(Sequencer::new(
        catalog::reference(),
        Wire::default(),
        Led::default(),
    ));
    let button = Button::released();
    let mut debouncer = Debouncer::new(Polarity::ActiveLow);

    // Contacts chatter for a while, settle closed, timer expires
    let mut armed = 0;
    for level in [false, true, false, true, false] {
        button.0.set(level);
        if debouncer.on_edge() == EdgeAction::Arm {
            armed += 1;
        }
        shared.tick();
    }
    assert_eq!(armed, 1);
    assert_eq!(debouncer.on_settled(&button), Settled::Confirmed);
    shared.mode_change();
    assert_eq!(shared.cursor(), Cursor { waveform: 1, sample: 0 });

    // Release bounce: the pin is high again by the time the timer expires
    button.press();
    assert_eq!(debouncer.on_edge(), EdgeAction::Arm);
    button.release();
    assert_eq!(debouncer.on_settled(&button), Settled::Rejected);
    assert_eq!(shared.cursor().waveform, 1);

    assert_eq!(debouncer.confirmed(), 1);
    assert_eq!(debouncer.rejected(), 1);
}

#[test]
fn concurrent_ticks_and_presses_never_tear_the_cursor() {
    const TICKS: u32 = 20_000;
    const PRESSES: usize = 500;

    let table = catalog::reference();
    let shared = SharedSequencer::new(Sequencer::new(table, Wire::default(), Led::default()));
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let ticker = s.spawn(|| {
            for _ in 0..TICKS {
                shared.tick();
            }
        });
        let presser = s.spawn(|| {
            for _ in 0..PRESSES {
                let cursor = shared.mode_change();
                assert_eq!(cursor.sample, 0);
                thread::yield_now();
            }
        });
        s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                let cursor = shared.cursor();
                assert!(cursor.waveform < table.count());
                assert!(cursor.sample < table.get(cursor.waveform).sample_count());
            }
        });

        let drivers = [ticker.join(), presser.join()];
        done.store(true, Ordering::Relaxed);
        for result in drivers {
            if let Err(panic) = result {
                std::panic::resume_unwind(panic);
            }
        }
    });

    let seq = shared.into_inner();
    assert_eq!(seq.stats().sent, TICKS);
    assert_eq!(seq.cursor().waveform, PRESSES % table.count());

    let (wire, led) = seq.release();
    assert_eq!(wire.0.len(), TICKS as usize);
    assert_eq!(led.0.len(), 1 + PRESSES);
}
