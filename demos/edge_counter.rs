//! Counts debounced presses of SW1 (PF4) and prints the running total on UART1
//!
//! Each falling edge arms a 1 ms one-shot on TIMER1; the press only counts
//! if the pin still reads low when it expires. The blue LED toggles on every
//! counted press.

#![no_std]
#![no_main]

extern crate embedded_hal;
extern crate tm4c123_wavegen;
extern crate tm4c123x_hal;

use core::cell::RefCell;

use critical_section::Mutex;

use tm4c123x_hal::gpio::{gpiof::PF4, GpioExt, Input, InterruptMode, PullUp, AF1};
use tm4c123x_hal::tm4c123x;
use tm4c123x_hal::serial::{self, NewlineMode};
use tm4c123x_hal::sysctl::Domain;
use tm4c123x_hal::time::Bps;

use tm4c123_wavegen::board::{clocks, enable_interrupt, safe, Board};
use tm4c123_wavegen::config::StreamConfig;
use tm4c123_wavegen::debounce::{Debouncer, EdgeAction, Polarity, Settled};
use tm4c123_wavegen::drivers::timer::{Mode, Timer};
use tm4c123_wavegen::log::{record, Event, SerialLog};
use tm4c123_wavegen::sequencer::Indicator;
use tm4c123_wavegen::startup::Interrupt;
use tm4c123_wavegen::waveform::IndicatorCode;

use irq::{handler, scope};

struct CountedButton {
    pin: PF4<Input<PullUp>>,
    debouncer: Debouncer,
    settle: Timer<tm4c123x::TIMER1>,
}

#[no_mangle]
pub fn stellaris_main(mut board: Board) -> ! {
    let config = StreamConfig {
        settle_us: 1_000,
        ..StreamConfig::DEFAULT
    };
    let settle_reload = match config.settle_reload(clocks().sysclk.0) {
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

    let mut settle = Timer::new(
        board.TIMER1,
        Domain::Timer1,
        &board.power_control,
        Mode::OneShot,
        settle_reload,
    );
    settle.listen();

    let mut pin = board.button0;
    pin.set_interrupt_mode(InterruptMode::EdgeFalling);
    let button = Mutex::new(RefCell::new(CountedButton {
        pin,
        debouncer: Debouncer::new(Polarity::ActiveLow),
        settle,
    }));

    let mut led = board.led;
    led.off();
    let mut count: u32 = 0;

    handler!(
        edge_handler = || {
            critical_section::with(|cs| {
                if let Ok(mut button) = button.borrow(cs).try_borrow_mut() {
                    button.pin.clear_interrupt();
                    if button.debouncer.on_edge() == EdgeAction::Arm {
                        button.settle.arm();
                    }
                }
            });
        }
    );

    handler!(
        settle_handler = || {
            let outcome = critical_section::with(|cs| {
                let mut guard = button.borrow(cs).try_borrow_mut().ok()?;
                let button = &mut *guard;
                button.settle.clear_timeout();
                Some(button.debouncer.on_settled(&button.pin))
            });
            if outcome == Some(Settled::Confirmed) {
                count = count.wrapping_add(1);
                let code = if count % 2 == 1 {
                    IndicatorCode::BLUE
                } else {
                    IndicatorCode(0)
                };
                led.show(code);
                record(&mut log, &Event::EdgeCount { count });
            }
        }
    );

    scope(|s| {
        s.register(Interrupt::GPIOF, edge_handler);
        s.register(Interrupt::TIMER1A, settle_handler);

        let nvic = &mut board.core_peripherals.NVIC;
        let enabled = enable_interrupt(nvic, tm4c123x::Interrupt::GPIOF, config.edge_priority)
            .and_then(|_| enable_interrupt(nvic, tm4c123x::Interrupt::TIMER1A, config.edge_priority));
        if enabled.is_err() {
            safe();
        }

        loop {
            cortex_m::asm::wfi();
        }
    });

    // Main must not return
    loop {}
}
