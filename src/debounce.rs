//! Deferred-confirmation button debouncing.
//!
//! A raw edge does not change anything by itself. It arms a one-shot settle
//! timer; when that timer expires the input is sampled once, and only an
//! input that still reads "pressed" is reported. Nothing blocks while the
//! contacts settle, and edges that arrive during the settle window are
//! ignored rather than queued.

use embedded_hal::digital::v2::InputPin;
use ufmt::derive::uDebug;

/// Electrical level that means "pressed"
#[derive(Clone, Copy, Debug, uDebug, Eq, PartialEq)]
pub enum Polarity {
    /// Button pulls the pin low (pull-up input)
    ActiveLow,
    /// Button pulls the pin high (pull-down input)
    ActiveHigh,
}

/// What the edge handler should do about a raw edge
#[derive(Clone, Copy, Debug, uDebug, Eq, PartialEq)]
pub enum EdgeAction {
    /// Start the settle timer
    Arm,
    /// A settle is already pending; do nothing
    Ignore,
}

/// Decision made when the settle timer expires
#[derive(Clone, Copy, Debug, uDebug, Eq, PartialEq)]
pub enum Settled {
    /// Input still pressed; fire the confirmed event
    Confirmed,
    /// Input bounced back to released; no event
    Rejected,
    /// Timer expired with no settle pending
    Spurious,
}

/// Debounce state for one input
#[derive(Clone, Copy, Debug, uDebug, Eq, PartialEq)]
pub struct Debouncer {
    polarity: Polarity,
    pending: bool,
    confirmed: u32,
    rejected: u32,
}

impl Debouncer {
    /// Idle debouncer for an input with the given polarity
    pub const fn new(polarity: Polarity) -> Self {
        Debouncer {
            polarity,
            pending: false,
            confirmed: 0,
            rejected: 0,
        }
    }

    /// Raw edge seen on the input
    pub fn on_edge(&mut self) -> EdgeAction {
        if self.pending {
            EdgeAction::Ignore
        } else {
            self.pending = true;
            EdgeAction::Arm
        }
    }

    /// Settle timer expired; sample `pin` and decide.
    ///
    /// A pin that cannot be read counts as released.
    pub fn on_settled<P: InputPin>(&mut self, pin: &P) -> Settled {
        if !self.pending {
            return Settled::Spurious;
        }
        self.pending = false;

        let pressed = match self.polarity {
            Polarity::ActiveLow => pin.is_low().unwrap_or_default(),
            Polarity::ActiveHigh => pin.is_high().unwrap_or_default(),
        };

        if pressed {
            self.confirmed = self.confirmed.wrapping_add(1);
            Settled::Confirmed
        } else {
            self.rejected = self.rejected.wrapping_add(1);
            Settled::Rejected
        }
    }

    /// Whether a settle is in progress
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of confirmed presses (wraps)
    pub fn confirmed(&self) -> u32 {
        self.confirmed
    }

    /// Number of edges rejected as bounce (wraps)
    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;

    /// Pin whose level the test sets directly
    struct FakePin(Cell<bool>);

    impl InputPin for FakePin {
        type Error = Infallible;

        fn is_high(&self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    /// Pin that always fails to read
    struct BrokenPin;

    impl InputPin for BrokenPin {
        type Error = ();

        fn is_high(&self) -> Result<bool, ()> {
            Err(())
        }

        fn is_low(&self) -> Result<bool, ()> {
            Err(())
        }
    }

    #[test]
    fn press_that_holds_is_confirmed_once() {
        let pin = FakePin(Cell::new(false)); // pulled low = pressed
        let mut d = Debouncer::new(Polarity::ActiveLow);

        assert_eq!(d.on_edge(), EdgeAction::Arm);
        assert!(d.is_pending());
        assert_eq!(d.on_settled(&pin), Settled::Confirmed);
        assert!(!d.is_pending());
        assert_eq!(d.confirmed(), 1);

        // A second expiry without a new edge does nothing
        assert_eq!(d.on_settled(&pin), Settled::Spurious);
        assert_eq!(d.confirmed(), 1);
    }

    #[test]
    fn bounce_that_releases_is_rejected() {
        let pin = FakePin(Cell::new(false));
        let mut d = Debouncer::new(Polarity::ActiveLow);

        assert_eq!(d.on_edge(), EdgeAction::Arm);
        pin.0.set(true); // contacts open again before the timer expires
        assert_eq!(d.on_settled(&pin), Settled::Rejected);
        assert_eq!(d.confirmed(), 0);
        assert_eq!(d.rejected(), 1);
    }

    #[test]
    fn edges_during_settle_are_not_queued() {
        let pin = FakePin(Cell::new(false));
        let mut d = Debouncer::new(Polarity::ActiveLow);

        assert_eq!(d.on_edge(), EdgeAction::Arm);
        assert_eq!(d.on_edge(), EdgeAction::Ignore);
        assert_eq!(d.on_edge(), EdgeAction::Ignore);
        assert_eq!(d.on_settled(&pin), Settled::Confirmed);
        assert_eq!(d.on_settled(&pin), Settled::Spurious);
        assert_eq!(d.confirmed(), 1);

        // Re-armed by the next edge after the decision
        assert_eq!(d.on_edge(), EdgeAction::Arm);
    }

    #[test]
    fn active_high_polarity() {
        let pin = FakePin(Cell::new(true));
        let mut d = Debouncer::new(Polarity::ActiveHigh);
        d.on_edge();
        assert_eq!(d.on_settled(&pin), Settled::Confirmed);

        pin.0.set(false);
        d.on_edge();
        assert_eq!(d.on_settled(&pin), Settled::Rejected);
    }

    #[test]
    fn unreadable_pin_counts_as_released() {
        let mut d = Debouncer::new(Polarity::ActiveLow);
        d.on_edge();
        assert_eq!(d.on_settled(&BrokenPin), Settled::Rejected);
    }
}
