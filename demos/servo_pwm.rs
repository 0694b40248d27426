//! Positions a hobby servo on PD0 (M1PWM0) with the two buttons.
//!
//! 50 Hz frame, 1 ms to 2.4 ms pulses. SW1 (PF4) steps the pulse shorter,
//! SW2 (PF0) longer; holding both runs a min / centre / max sweep. The
//! buttons are polled every 40 ms and new positions are printed on UART1.

#![no_std]
#![no_main]

extern crate embedded_hal;
extern crate tm4c123_wavegen;
extern crate tm4c123x_hal;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::InputPin;

use tm4c123x_hal::delay::Delay;
use tm4c123x_hal::gpio::{GpioExt, AF1, AF5};
use tm4c123x_hal::serial::{self, NewlineMode};
use tm4c123x_hal::time::Bps;

use tm4c123_wavegen::board::{clocks, Board};
use tm4c123_wavegen::config::StreamConfig;
use tm4c123_wavegen::drivers::pwm::Generator0;
use tm4c123_wavegen::log::{record, Event, SerialLog};
use tm4c123_wavegen::servo::{Command, Servo, PERIOD};

/// Button poll interval [ms]
const POLL_MS: u32 = 40;
/// Time spent at each point of the sweep [ms]
const SWEEP_DWELL_MS: u32 = 1_000;

#[no_mangle]
pub fn stellaris_main(board: Board) -> ! {
    let config = StreamConfig::DEFAULT;

    let mut pins_b = board.GPIO_PORTB.split(&board.power_control);
    let uart = serial::Serial::uart1(
        board.UART1,
        pins_b.pb1.into_af_push_pull::<AF1>(&mut pins_b.control),
        pins_b.pb0.into_af_push_pull::<AF1>(&mut pins_b.control),
        (),
        (),
        Bps(config.log_baud),
        NewlineMode::SwapLFtoCRLF,
        clocks(),
        &board.power_control,
    );
    let mut log = SerialLog(uart);

    let mut pins_d = board.GPIO_PORTD.split(&board.power_control);
    let output = Generator0::new(
        board.PWM1,
        pins_d.pd0.into_af_push_pull::<AF5>(&mut pins_d.control),
        &board.power_control,
        PERIOD,
    );
    let mut servo = Servo::new(output);
    record(&mut log, &Event::ServoPulse { counts: servo.pulse() });

    let mut delay = Delay::new(board.core_peripherals.SYST, clocks());
    let lower = board.button0;
    let raise = board.button1;

    loop {
        let command = Command::from_buttons(
            lower.is_low().unwrap_or_default(),
            raise.is_low().unwrap_or_default(),
        );
        match command {
            Command::Hold => {}
            Command::Lower | Command::Raise => {
                let before = servo.pulse();
                let pulse = servo.apply(command);
                if pulse != before {
                    record(&mut log, &Event::ServoPulse { counts: pulse });
                }
            }
            Command::Sweep => {
                for pulse in servo.sweep() {
                    servo.show(pulse);
                    delay.delay_ms(SWEEP_DWELL_MS);
                }
            }
        }
        delay.delay_ms(POLL_MS);
    }
}
