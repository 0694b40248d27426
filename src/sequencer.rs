//! Sample sequencer: steps through the active waveform on every tick and
//! switches waveforms on a confirmed button press.
//!
//! [`Sequencer`] holds the cursor and does the work. [`SharedSequencer`] puts
//! it behind a critical section so the tick interrupt and the mode-change
//! interrupt can both drive it without ever seeing a half-updated cursor.

use core::cell::{Cell, RefCell};

use critical_section::{CriticalSection, Mutex};
use embedded_hal::serial;
use ufmt::derive::uDebug;

use crate::waveform::{IndicatorCode, Waveform, WaveformTable};

/// Destination for the active waveform's indicator pattern
pub trait Indicator {
    /// Display `code`. Fire-and-forget.
    fn show(&mut self, code: IndicatorCode);
}

/// Position of the sequencer: which waveform, and which sample is next.
///
/// Always replaced as a whole, so `sample` is in range for `waveform`
/// whenever it is observed.
#[derive(Clone, Copy, Debug, uDebug, Default, Eq, PartialEq)]
pub struct Cursor {
    /// Index of the active waveform in the catalog
    pub waveform: usize,
    /// Index of the next sample to emit
    pub sample: usize,
}

/// Outcome of one tick
#[derive(Clone, Copy, Debug, uDebug, Eq, PartialEq)]
pub enum Emission {
    /// The sink accepted the sample
    Sent(u8),
    /// The sink was busy; the sample is gone
    Dropped(u8),
}

/// Running totals of tick outcomes. Both counters wrap.
#[derive(Clone, Copy, Debug, uDebug, Default, Eq, PartialEq)]
pub struct TickStats {
    /// Samples accepted by the sink
    pub sent: u32,
    /// Samples dropped because the sink was busy
    pub dropped: u32,
}

/// Replays waveforms from a catalog into a byte sink
pub struct Sequencer<'a, S, I> {
    table: WaveformTable<'a>,
    cursor: Cursor,
    stats: TickStats,
    sink: S,
    indicator: I,
}

impl<'a, S, I> Sequencer<'a, S, I>
where
    S: serial::Write<u8>,
    I: Indicator,
{
    /// Start at waveform 0, sample 0, and show waveform 0 on the indicator
    pub fn new(table: WaveformTable<'a>, sink: S, mut indicator: I) -> Self {
        indicator.show(table.get(0).indicator());
        Sequencer {
            table,
            cursor: Cursor::default(),
            stats: TickStats::default(),
            sink,
            indicator,
        }
    }

    /// Emit the current sample and advance to the next one.
    ///
    /// The sink is written without blocking; if it is busy the sample is
    /// dropped and the cursor still advances.
    pub fn on_tick(&mut self) -> Emission {
        let waveform = self.table.get(self.cursor.waveform);
        let sample = waveform.sample(self.cursor.sample);

        let emission = match self.sink.write(sample) {
            Ok(()) => {
                self.stats.sent = self.stats.sent.wrapping_add(1);
                Emission::Sent(sample)
            }
            Err(_) => {
                self.stats.dropped = self.stats.dropped.wrapping_add(1);
                Emission::Dropped(sample)
            }
        };

        self.cursor = Cursor {
            waveform: self.cursor.waveform,
            sample: (self.cursor.sample + 1)
                .checked_rem(waveform.sample_count())
                .unwrap_or_default(),
        };

        emission
    }

    /// Switch to the next waveform, restarting it from its first sample
    pub fn on_mode_change(&mut self) -> Cursor {
        let next = self.table.next_index(self.cursor.waveform);
        self.cursor = Cursor {
            waveform: next,
            sample: 0,
        };
        self.indicator.show(self.table.get(next).indicator());
        self.cursor
    }

    /// Current position
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Waveform currently being played
    pub fn active(&self) -> &'a Waveform {
        self.table.get(self.cursor.waveform)
    }

    /// Catalog being played from
    pub fn table(&self) -> WaveformTable<'a> {
        self.table
    }

    /// Tick outcome totals since construction
    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Give back the sink and indicator
    pub fn release(self) -> (S, I) {
        (self.sink, self.indicator)
    }
}

/// A [`Sequencer`] that can be driven from more than one interrupt.
///
/// Every access runs inside a critical section, so a tick can never run
/// in the middle of a mode change (or the other way round).
///
/// A call that finds the sequencer already borrowed (a handler re-entered
/// from inside its own critical section) does not touch it: a tick reports
/// the current sample as [`Emission::Dropped`], a mode change reports the
/// current cursor, and the snapshots come from the last completed call.
/// None of these paths can panic.
pub struct SharedSequencer<'a, S, I> {
    inner: Mutex<RefCell<Sequencer<'a, S, I>>>,
    // Cursor and totals as of the last completed call
    published: Mutex<Cell<(Cursor, TickStats)>>,
    table: WaveformTable<'a>,
}

impl<'a, S, I> SharedSequencer<'a, S, I>
where
    S: serial::Write<u8>,
    I: Indicator,
{
    /// Take ownership of a sequencer
    pub fn new(sequencer: Sequencer<'a, S, I>) -> Self {
        SharedSequencer {
            published: Mutex::new(Cell::new((sequencer.cursor(), sequencer.stats()))),
            table: sequencer.table(),
            inner: Mutex::new(RefCell::new(sequencer)),
        }
    }

    /// Run `f` on the sequencer and publish the result, or return `None`
    /// if it is already borrowed
    fn with_sequencer<R>(
        &self,
        cs: CriticalSection<'_>,
        f: impl FnOnce(&mut Sequencer<'a, S, I>) -> R,
    ) -> Option<R> {
        let mut sequencer = self.inner.borrow(cs).try_borrow_mut().ok()?;
        let out = f(&mut *sequencer);
        self.published
            .borrow(cs)
            .set((sequencer.cursor(), sequencer.stats()));
        Some(out)
    }

    fn snapshot(&self, cs: CriticalSection<'_>) -> (Cursor, TickStats) {
        self.published.borrow(cs).get()
    }

    /// Tick handler body
    pub fn tick(&self) -> Emission {
        critical_section::with(|cs| {
            self.with_sequencer(cs, |seq| seq.on_tick())
                .unwrap_or_else(|| {
                    let (cursor, _) = self.snapshot(cs);
                    Emission::Dropped(self.table.get(cursor.waveform).sample(cursor.sample))
                })
        })
    }

    /// Confirmed mode-change handler body
    pub fn mode_change(&self) -> Cursor {
        critical_section::with(|cs| {
            self.with_sequencer(cs, |seq| seq.on_mode_change())
                .unwrap_or_else(|| self.snapshot(cs).0)
        })
    }

    /// Snapshot of the cursor
    pub fn cursor(&self) -> Cursor {
        critical_section::with(|cs| self.snapshot(cs).0)
    }

    /// Snapshot of the tick totals
    pub fn stats(&self) -> TickStats {
        critical_section::with(|cs| self.snapshot(cs).1)
    }

    /// Name of the waveform currently being played
    pub fn active_name(&self) -> &'a str {
        let cursor = self.cursor();
        self.table.get(cursor.waveform).name()
    }

    /// Unwrap the sequencer
    pub fn into_inner(self) -> Sequencer<'a, S, I> {
        self.inner.into_inner().into_inner()
    }
}
