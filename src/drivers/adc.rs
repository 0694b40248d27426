//! ADC0 sample sequencer 3 wired to the on-die temperature sensor.
//!
//! One conversion per trigger, started by a GPTM timeout (see
//! [`Timer::trigger_adc`](crate::drivers::timer::Timer::trigger_adc)), with
//! the ADC0SS3 interrupt raised when it completes.

use tm4c123x_hal::sysctl::{control_power, reset, Domain, PowerControl, PowerState, RunMode};
use tm4c123x_hal::tm4c123x::ADC0;

/// Timer-triggered temperature conversions on ADC0 SS3
pub struct TemperatureSensor {
    registers: ADC0,
}

impl TemperatureSensor {
    /// Power on ADC0 and set up SS3. Conversions start with the first
    /// trigger from the timer.
    pub fn new(registers: ADC0, power_control: &PowerControl) -> Self {
        //
        // 1. Power on the ADC peripheral
        //
        control_power(power_control, Domain::Adc0, RunMode::Run, PowerState::On);
        reset(power_control, Domain::Adc0);

        //
        // 2. Configure SS3 (must be disabled while configuring)
        //
        registers.actss.modify(|_, w| w.asen3().clear_bit());
        registers.pc.write(|w| w.sr()._125k());
        registers.emux.modify(|_, w| w.em3().timer());
        // Single step: temperature sensor, interrupt, end of sequence
        registers
            .ssctl3
            .write(|w| w.ts0().set_bit().ie0().set_bit().end0().set_bit());

        //
        // 3. Interrupt on completion, then enable
        //
        registers.isc.write(|w| w.in3().set_bit());
        registers.im.modify(|_, w| w.mask3().set_bit());
        registers.actss.modify(|_, w| w.asen3().set_bit());

        TemperatureSensor { registers }
    }

    /// Acknowledge the completion interrupt and pop the result, if any
    pub fn take(&mut self) -> Option<u16> {
        self.registers.isc.write(|w| w.in3().set_bit());
        if self.registers.ssfstat3.read().empty().bit_is_set() {
            None
        } else {
            Some(self.registers.ssfifo3.read().data().bits())
        }
    }
}
