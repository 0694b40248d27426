//! Samples the on-die temperature sensor twice a second and prints it on
//! UART1 (PB1, 115200).
//!
//! TIMER0A's timeout both triggers the ADC0 SS3 conversion and toggles the
//! green LED; ADC0SS3 collects the result.

#![no_std]
#![no_main]

extern crate embedded_hal;
extern crate tm4c123_wavegen;
extern crate tm4c123x_hal;

use core::cell::Cell;

use critical_section::Mutex;

use tm4c123x_hal::gpio::{GpioExt, AF1};
use tm4c123x_hal::serial::{self, NewlineMode};
use tm4c123x_hal::sysctl::Domain;
use tm4c123x_hal::time::Bps;
use tm4c123x_hal::tm4c123x;

use tm4c123_wavegen::board::{clocks, enable_interrupt, safe, Board};
use tm4c123_wavegen::config::{timer_reload, StreamConfig};
use tm4c123_wavegen::drivers::adc::TemperatureSensor;
use tm4c123_wavegen::drivers::timer::{Mode, Timer};
use tm4c123_wavegen::log::{record, Event, SerialLog};
use tm4c123_wavegen::sequencer::Indicator;
use tm4c123_wavegen::startup::Interrupt;
use tm4c123_wavegen::temperature::Reading;
use tm4c123_wavegen::waveform::IndicatorCode;

use irq::{handler, scope};

/// Conversion trigger period [us]
const SAMPLE_PERIOD_US: u32 = 500_000;
/// NVIC level for both the trigger timer and the conversion
const SAMPLE_PRIORITY: u8 = 2;

#[no_mangle]
pub fn stellaris_main(mut board: Board) -> ! {
    let config = StreamConfig::DEFAULT;
    let reload = match timer_reload(clocks().sysclk.0, SAMPLE_PERIOD_US) {
        Ok(reload) => reload,
        Err(_) => safe(),
    };

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

    let mut sensor = TemperatureSensor::new(board.ADC0, &board.power_control);
    let reading = Mutex::new(Cell::new(Reading::default()));

    let mut trigger = Timer::new(
        board.TIMER0,
        Domain::Timer0,
        &board.power_control,
        Mode::Periodic,
        reload,
    );
    trigger.trigger_adc();
    trigger.listen();
    trigger.start();

    let mut led = board.led;
    led.off();
    let mut lit = false;

    handler!(
        trigger_handler = || {
            trigger.clear_timeout();
            lit = !lit;
            led.show(if lit {
                IndicatorCode::GREEN
            } else {
                IndicatorCode(0)
            });
        }
    );

    handler!(
        conversion_handler = || {
            if let Some(code) = sensor.take() {
                critical_section::with(|cs| {
                    let cell = reading.borrow(cs);
                    cell.set(cell.get().update(code));
                });
            }
        }
    );

    scope(|s| {
        s.register(Interrupt::TIMER0A, trigger_handler);
        s.register(Interrupt::ADC0SS3, conversion_handler);

        let nvic = &mut board.core_peripherals.NVIC;
        let enabled = enable_interrupt(nvic, tm4c123x::Interrupt::ADC0SS3, SAMPLE_PRIORITY)
            .and_then(|_| enable_interrupt(nvic, tm4c123x::Interrupt::TIMER0A, SAMPLE_PRIORITY));
        if enabled.is_err() {
            safe();
        }

        let mut reported = 0;
        loop {
            cortex_m::asm::wfi();

            let latest = critical_section::with(|cs| reading.borrow(cs).get());
            if latest.conversions != reported {
                reported = latest.conversions;
                record(
                    &mut log,
                    &Event::Temperature {
                        millicelsius: latest.millicelsius(),
                        conversions: latest.conversions,
                    },
                );
            }
        }
    });

    // Main must not return
    loop {}
}
