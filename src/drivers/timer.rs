//! General-purpose timer driver, used as the sample clock, the debounce
//! settle timer and the ADC trigger.
//!
//! Runs timer A of a GPTM block as one concatenated 32-bit down-counter.

use core::ops::Deref;

use tm4c123x_hal::sysctl::{control_power, reset, Domain, PowerControl, PowerState, RunMode};
use tm4c123x_hal::tm4c123x::timer0::RegisterBlock;

/// What happens when the counter reaches zero
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reload and keep counting
    Periodic,
    /// Stop until re-armed
    OneShot,
}

/// A GPTM block configured as a 32-bit timer
pub struct Timer<T> {
    registers: T,
    mode: Mode,
}

impl<T> Timer<T>
where
    T: Deref<Target = RegisterBlock>,
{
    /// Power on and configure the timer. It does not start counting until
    /// [`Timer::start`] or [`Timer::arm`].
    pub fn new(
        registers: T,
        domain: Domain,
        power_control: &PowerControl,
        mode: Mode,
        reload: u32,
    ) -> Self {
        //
        // 1. Power on and reset the peripheral
        //
        control_power(power_control, domain, RunMode::Run, PowerState::On);
        reset(power_control, domain);

        //
        // 2. Configure (timer must be disabled while configuring)
        //
        registers.ctl.modify(|_, w| w.taen().clear_bit());
        registers.cfg.write(|w| w.cfg()._32_bit_timer());
        registers.tamr.write(|w| {
            // Counts down unless TACDIR is set
            let w = w.tacdir().clear_bit();
            match mode {
                Mode::Periodic => w.tamr().period(),
                Mode::OneShot => w.tamr()._1_shot(),
            }
        });
        registers.tailr.write(|w| unsafe { w.bits(reload) });

        //
        // 3. Clear anything stale
        //
        registers.icr.write(|w| w.tatocint().set_bit());

        Timer { registers, mode }
    }

    /// Enable the timeout interrupt
    pub fn listen(&mut self) {
        self.registers.imr.modify(|_, w| w.tatoim().set_bit());
    }

    /// Start an ADC conversion on every timeout (GPTMCTL.TAOTE). The ADC
    /// sequencer must have its trigger set to "timer".
    pub fn trigger_adc(&mut self) {
        self.registers.ctl.modify(|_, w| w.taote().set_bit());
    }

    /// Acknowledge a timeout. Must be called from the interrupt handler or
    /// the interrupt fires again immediately.
    pub fn clear_timeout(&mut self) {
        self.registers.icr.write(|w| w.tatocint().set_bit());
    }

    /// Start counting from the reload value
    pub fn start(&mut self) {
        self.registers.ctl.modify(|_, w| w.taen().set_bit());
    }

    /// Stop counting
    pub fn stop(&mut self) {
        self.registers.ctl.modify(|_, w| w.taen().clear_bit());
    }

    /// Restart a one-shot timer from its full reload value.
    /// On a periodic timer this just makes sure it is running.
    pub fn arm(&mut self) {
        if self.mode == Mode::OneShot {
            // Enabling a one-shot timer reloads it from GPTMTAILR
            self.stop();
        }
        self.start();
    }
}
