//! Streams the reference waveforms out of UART0, one raw byte every 5 ms.
//!
//! SW2 (PF0) steps sawtooth -> stationary -> rectified -> gaussian and back;
//! the RGB LED shows which one is playing (red, blue, green, violet).
//! Diagnostics are printed on UART1 (PB1) at 115200 baud.

#![no_std]
#![no_main]

extern crate embedded_hal;
extern crate tm4c123_wavegen;
extern crate tm4c123x_hal;

use core::cell::RefCell;

use critical_section::Mutex;
use ufmt::uWrite;

use tm4c123x_hal::gpio::{gpiof::PF0, GpioExt, Input, InterruptMode, PullUp, AF1};
use tm4c123x_hal::tm4c123x;
use tm4c123x_hal::serial::{self, NewlineMode};
use tm4c123x_hal::sysctl::Domain;
use tm4c123x_hal::time::Bps;

use tm4c123_wavegen::board::{clocks, enable_interrupt, safe, Board};
use tm4c123_wavegen::config::StreamConfig;
use tm4c123_wavegen::debounce::{Debouncer, EdgeAction, Polarity, Settled};
use tm4c123_wavegen::drivers::timer::{Mode, Timer};
use tm4c123_wavegen::log::{record, Event, SerialLog};
use tm4c123_wavegen::sequencer::{Sequencer, SharedSequencer};
use tm4c123_wavegen::startup::Interrupt;
use tm4c123_wavegen::waveform::catalog;

use irq::{handler, scope};

/// Everything the button's two interrupts (edge and settle) share
struct ModeButton {
    pin: PF0<Input<PullUp>>,
    debouncer: Debouncer,
    settle: Timer<tm4c123x::TIMER1>,
}

/// Skipped if the port is already in use further down the stack
fn log_event<W: uWrite>(diag: &Mutex<RefCell<W>>, event: Event<'_>) {
    critical_section::with(|cs| {
        if let Ok(mut port) = diag.borrow(cs).try_borrow_mut() {
            record(&mut *port, &event);
        }
    });
}

#[no_mangle]
pub fn stellaris_main(mut board: Board) -> ! {
    let config = StreamConfig::DEFAULT;
    let sysclk = clocks().sysclk.0;
    let (tick_reload, settle_reload) = match (
        config.validate(),
        config.tick_reload(sysclk),
        config.settle_reload(sysclk),
    ) {
        (Ok(()), Ok(tick), Ok(settle)) => (tick, settle),
        _ => safe(),
    };

    // Sample stream: UART0, raw bytes, no newline translation
    let mut pins_a = board.GPIO_PORTA.split(&board.power_control);
    let stream_uart = serial::Serial::uart0(
        board.UART0,
        pins_a.pa1.into_af_push_pull::<AF1>(&mut pins_a.control),
        pins_a.pa0.into_af_push_pull::<AF1>(&mut pins_a.control),
        (),
        (),
        Bps(config.baud),
        NewlineMode::Binary,
        clocks(),
        &board.power_control,
    );
    let (sample_tx, _sample_rx) = stream_uart.split();

    // Diagnostics: UART1
    let mut pins_b = board.GPIO_PORTB.split(&board.power_control);
    let log_uart = serial::Serial::uart1(
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
    let diag = Mutex::new(RefCell::new(SerialLog(log_uart)));

    let table = catalog::reference();
    log_event(
        &diag,
        Event::Boot {
            waveforms: table.count(),
            tick_us: config.tick_period_us,
        },
    );

    // Lights the LED for waveform 0
    let sequencer = SharedSequencer::new(Sequencer::new(table, sample_tx, board.led));

    // Sample clock
    let mut tick_timer = Timer::new(
        board.TIMER0,
        Domain::Timer0,
        &board.power_control,
        Mode::Periodic,
        tick_reload,
    );
    tick_timer.listen();
    tick_timer.start();

    // Debounce settle timer, armed by button edges
    let mut settle = Timer::new(
        board.TIMER1,
        Domain::Timer1,
        &board.power_control,
        Mode::OneShot,
        settle_reload,
    );
    settle.listen();

    let mut pin = board.button1;
    pin.set_interrupt_mode(InterruptMode::EdgeFalling);
    let mode_button = Mutex::new(RefCell::new(ModeButton {
        pin,
        debouncer: Debouncer::new(Polarity::ActiveLow),
        settle,
    }));

    handler!(
        tick_handler = || {
            tick_timer.clear_timeout();
            sequencer.tick();
        }
    );

    handler!(
        edge_handler = || {
            critical_section::with(|cs| {
                if let Ok(mut button) = mode_button.borrow(cs).try_borrow_mut() {
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
            let settled = critical_section::with(|cs| {
                let mut guard = mode_button.borrow(cs).try_borrow_mut().ok()?;
                let button = &mut *guard;
                button.settle.clear_timeout();
                let outcome = button.debouncer.on_settled(&button.pin);
                Some((outcome, button.debouncer.rejected()))
            });
            let Some((outcome, rejected)) = settled else {
                return;
            };

            match outcome {
                Settled::Confirmed => {
                    let cursor = sequencer.mode_change();
                    log_event(
                        &diag,
                        Event::WaveformSelected {
                            index: cursor.waveform,
                            name: table.get(cursor.waveform).name(),
                        },
                    );
                }
                Settled::Rejected => log_event(&diag, Event::BounceRejected { total: rejected }),
                Settled::Spurious => {}
            }
        }
    );

    scope(|s| {
        s.register(Interrupt::TIMER0A, tick_handler);
        s.register(Interrupt::TIMER1A, settle_handler);
        s.register(Interrupt::GPIOF, edge_handler);

        // The button path runs above the sample clock
        let nvic = &mut board.core_peripherals.NVIC;
        let enabled = enable_interrupt(nvic, tm4c123x::Interrupt::TIMER0A, config.tick_priority)
            .and_then(|_| enable_interrupt(nvic, tm4c123x::Interrupt::GPIOF, config.edge_priority))
            .and_then(|_| enable_interrupt(nvic, tm4c123x::Interrupt::TIMER1A, config.edge_priority));
        if enabled.is_err() {
            safe();
        }

        let mut reported_drops = 0;
        loop {
            cortex_m::asm::wfi();

            let dropped = sequencer.stats().dropped;
            if dropped != reported_drops {
                reported_drops = dropped;
                log_event(&diag, Event::SamplesDropped { total: dropped });
            }
        }
    });

    // Main must not return
    loop {}
}
