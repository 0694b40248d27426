//! Hobby-servo position control over a PWM output.
//!
//! Pulse widths are in PWM clock counts. With a 2.5 MHz PWM clock a
//! 50 000-count period is the usual 20 ms (50 Hz) servo frame, and the
//! 1 ms to 2.4 ms pulse range is 2 500 to 6 000 counts.

use embedded_hal::PwmPin;

/// PWM counter clock the constants below assume [Hz]
pub const PWM_CLOCK_HZ: u32 = 2_500_000;
/// Frame length: 20 ms
pub const PERIOD: u16 = 50_000;
/// Shortest pulse: 1 ms
pub const MIN_PULSE: u16 = 2_500;
/// Centre position
pub const MID_PULSE: u16 = 4_250;
/// Longest pulse
pub const MAX_PULSE: u16 = 6_000;
/// Change per button poll
pub const STEP: u16 = 400;

/// What the two buttons ask for on one poll
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Neither button is down
    Hold,
    /// Shorten the pulse by one step
    Lower,
    /// Lengthen the pulse by one step
    Raise,
    /// Both buttons: run through min, centre, max and back
    Sweep,
}

impl Command {
    /// Map button states (true = pressed) to a command
    pub fn from_buttons(lower: bool, raise: bool) -> Self {
        match (lower, raise) {
            (false, false) => Command::Hold,
            (true, false) => Command::Lower,
            (false, true) => Command::Raise,
            (true, true) => Command::Sweep,
        }
    }
}

/// A servo on one PWM channel, with its pulse clamped to
/// [`MIN_PULSE`]..=[`MAX_PULSE`]
pub struct Servo<P> {
    output: P,
    pulse: u16,
}

impl<P> Servo<P>
where
    P: PwmPin<Duty = u16>,
{
    /// Centre the servo and enable the output
    pub fn new(mut output: P) -> Self {
        output.set_duty(MID_PULSE);
        output.enable();
        Servo {
            output,
            pulse: MID_PULSE,
        }
    }

    /// Current pulse width [counts]
    pub fn pulse(&self) -> u16 {
        self.pulse
    }

    /// Step the position for `Lower` / `Raise`. `Hold` and `Sweep` leave it
    /// where it is. Returns the pulse now being output.
    pub fn apply(&mut self, command: Command) -> u16 {
        let pulse = match command {
            Command::Lower => self.pulse.saturating_sub(STEP).max(MIN_PULSE),
            Command::Raise => self.pulse.saturating_add(STEP).min(MAX_PULSE),
            Command::Hold | Command::Sweep => return self.pulse,
        };
        self.pulse = pulse;
        self.output.set_duty(pulse);
        pulse
    }

    /// Pulses of the demonstration sweep, ending back at the current one
    pub fn sweep(&self) -> [u16; 4] {
        [MIN_PULSE, MID_PULSE, MAX_PULSE, self.pulse]
    }

    /// Output `pulse` (clamped) without changing the stored position
    pub fn show(&mut self, pulse: u16) {
        self.output.set_duty(pulse.max(MIN_PULSE).min(MAX_PULSE));
    }

    /// Disable the output and give it back
    pub fn release(mut self) -> P {
        self.output.disable();
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Channel {
        duty: u16,
        enabled: bool,
        writes: usize,
    }

    impl PwmPin for Channel {
        type Duty = u16;

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn enable(&mut self) {
            self.enabled = true;
        }

        fn get_duty(&self) -> u16 {
            self.duty
        }

        fn get_max_duty(&self) -> u16 {
            PERIOD
        }

        fn set_duty(&mut self, duty: u16) {
            self.duty = duty;
            self.writes += 1;
        }
    }

    #[test]
    fn frame_is_twenty_milliseconds() {
        assert_eq!(u32::from(PERIOD) * 1000 / PWM_CLOCK_HZ, 20);
        assert_eq!(u32::from(MIN_PULSE) * 1_000_000 / PWM_CLOCK_HZ, 1_000);
    }

    #[test]
    fn starts_centred_and_release_disables() {
        let servo = Servo::new(Channel::default());
        assert_eq!(servo.pulse(), MID_PULSE);
        let channel = servo.release();
        assert_eq!(channel.duty, MID_PULSE);
        assert!(!channel.enabled);
    }

    #[test]
    fn buttons_map_to_commands() {
        assert_eq!(Command::from_buttons(false, false), Command::Hold);
        assert_eq!(Command::from_buttons(true, false), Command::Lower);
        assert_eq!(Command::from_buttons(false, true), Command::Raise);
        assert_eq!(Command::from_buttons(true, true), Command::Sweep);
    }

    #[test]
    fn steps_are_clamped_at_both_ends() {
        let mut servo = Servo::new(Channel::default());
        assert_eq!(servo.apply(Command::Lower), 3_850);
        for _ in 0..10 {
            servo.apply(Command::Lower);
        }
        assert_eq!(servo.pulse(), MIN_PULSE);

        for _ in 0..20 {
            servo.apply(Command::Raise);
        }
        assert_eq!(servo.pulse(), MAX_PULSE);
        assert_eq!(servo.release().duty, MAX_PULSE);
    }

    #[test]
    fn hold_and_sweep_leave_the_output_alone() {
        let mut servo = Servo::new(Channel::default());
        servo.apply(Command::Raise);
        assert_eq!(servo.apply(Command::Hold), 4_650);
        assert_eq!(servo.apply(Command::Sweep), 4_650);
        assert_eq!(servo.sweep(), [MIN_PULSE, MID_PULSE, MAX_PULSE, 4_650]);

        // One write at start-up, one for the step
        assert_eq!(servo.release().writes, 2);
    }

    #[test]
    fn showing_a_pulse_keeps_the_position() {
        let mut servo = Servo::new(Channel::default());
        servo.show(MAX_PULSE + 1_000);
        assert_eq!(servo.pulse(), MID_PULSE);
        assert_eq!(servo.release().duty, MAX_PULSE);
    }
}
