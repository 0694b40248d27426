//! Motion-control PWM module 1, generator 0, output A (M1PWM0 on PD0).
//!
//! The HAL only offers PWM on the GPTM capture pins, which at 80 MHz cannot
//! stretch to a 50 Hz frame. This drives the dedicated PWM module from a
//! divided system clock instead.

use embedded_hal::PwmPin;
use tm4c123x_hal::gpio::{gpiod::PD0, AlternateFunction, PushPull, AF5};
use tm4c123x_hal::sysctl::{control_power, reset, Domain, PowerControl, PowerState, RunMode};
use tm4c123x_hal::tm4c123x::{PWM1, SYSCTL};

/// Generator 0 of PWM1 in count-down mode. The output goes low when the
/// counter reloads and high when it passes the compare value, so the duty
/// is the number of counts spent high.
pub struct Generator0 {
    registers: PWM1,
    _pin: PD0<AlternateFunction<AF5, PushPull>>,
    period: u16,
}

impl Generator0 {
    /// Set the PWM clock to sysclk / 32 (2.5 MHz at 80 MHz) and start the
    /// generator with `period` counts per frame. The output stays off
    /// until [`PwmPin::enable`].
    pub fn new(
        registers: PWM1,
        pin: PD0<AlternateFunction<AF5, PushPull>>,
        power_control: &PowerControl,
        period: u16,
    ) -> Self {
        //
        // 1. PWM clock divider. SYSCTL belongs to the HAL by now, but it
        // never touches the PWM divider bits.
        //
        let sysctl = unsafe { &*SYSCTL::ptr() };
        sysctl
            .rcc
            .modify(|_, w| w.usepwmdiv().set_bit().pwmdiv()._32());

        //
        // 2. Power on and reset the peripheral
        //
        control_power(power_control, Domain::Pwm1, RunMode::Run, PowerState::On);
        reset(power_control, Domain::Pwm1);

        //
        // 3. Configure the generator while it is stopped
        //
        registers._0_ctl.reset();
        registers
            ._0_gena
            .write(|w| w.actcmpad().one().actload().zero());
        registers
            ._0_load
            .write(|w| unsafe { w.load().bits(period.saturating_sub(1)) });
        registers._0_cmpa.write(|w| unsafe { w.cmpa().bits(0) });

        //
        // 4. Start counting
        //
        registers._0_ctl.modify(|_, w| w.enable().set_bit());

        Generator0 {
            registers,
            _pin: pin,
            period,
        }
    }
}

impl PwmPin for Generator0 {
    type Duty = u16;

    fn disable(&mut self) {
        self.registers.enable.modify(|_, w| w.pwm0en().clear_bit());
    }

    fn enable(&mut self) {
        self.registers.enable.modify(|_, w| w.pwm0en().set_bit());
    }

    fn get_duty(&self) -> u16 {
        self.registers._0_cmpa.read().cmpa().bits().saturating_add(1)
    }

    fn get_max_duty(&self) -> u16 {
        self.period
    }

    /// Takes effect at the next reload
    fn set_duty(&mut self, duty: u16) {
        let compare = duty.min(self.period).saturating_sub(1);
        self.registers
            ._0_cmpa
            .write(|w| unsafe { w.cmpa().bits(compare) });
    }
}
