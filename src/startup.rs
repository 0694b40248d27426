//! Handles board-specific CPU startup

use cortex_m;
use cortex_m_rt::{entry, exception, ExceptionFrame};

use super::board::{clocks, safe, Board};
use crate::config::StreamConfig;
use tm4c123x_hal::interrupt;
use tm4c123x_hal::{
    gpio::{GpioExt, AF1},
    serial,
    sysctl::SysctlExt,
    time::Bps,
};

use irq::scoped_interrupts;

use core::fmt::Write;

// This function must be implemented by the application that uses the crate
// and is the entry-point for that application after board initialization
extern "Rust" {
    fn stellaris_main(board: Board);
}

/// Performs what you might otherwise call 'C Startup'.
/// This routine is specified at the reset vector in the ISR vector table.
///
/// Copies global .data init from flash to SRAM and then
/// zeros the bss segment.
#[entry]
unsafe fn call_main() -> ! {
    let board = Board::new();
    stellaris_main(board);

    loop {
        cortex_m::asm::wfi();
    }
}

/// Bring up UART1 from scratch and hand it to `f` for a last report.
///
/// Used from fault and panic context, where the board's own handles may be
/// borrowed or half-initialised. UART0 is left alone since it carries raw
/// samples.
pub(crate) fn report_fault<F: FnOnce(&mut dyn Write)>(f: F) {
    let peripherals = unsafe { tm4c123x_hal::tm4c123x::Peripherals::steal() };
    let sysctl = peripherals.SYSCTL.constrain();
    let mut pins = peripherals.GPIO_PORTB.split(&sysctl.power_control);
    let mut uart = serial::Serial::uart1(
        peripherals.UART1,
        pins.pb1.into_af_push_pull::<AF1>(&mut pins.control),
        pins.pb0.into_af_push_pull::<AF1>(&mut pins.control),
        (),
        (),
        Bps(StreamConfig::DEFAULT.log_baud),
        serial::NewlineMode::SwapLFtoCRLF,
        clocks(),
        &sysctl.power_control,
    );
    f(&mut uart);
}

/// A HardFault is an exception that occurs because of an error during
/// exception processing, or because an exception cannot be managed by any
/// other exception mechanism. HardFaults have a fixed priority of -1, meaning
/// they have higher priority than any exception with configurable priority.
#[exception]
unsafe fn HardFault(_sf: &ExceptionFrame) -> ! {
    // Debug formatter can panic, so this can't be run with panic_never
    #[cfg(debug_assertions)]
    report_fault(|port| {
        let _ = writeln!(port, "SF: {:?}", _sf);
    });

    safe();
}

/// A Non Maskable Interrupt (NMI) can be signalled by a peripheral or
/// triggered by software. This is the highest priority exception other than
/// reset. It is permanently enabled and has a fixed priority of -2.
#[exception]
unsafe fn NonMaskableInt() {
    safe();
}

/// A MemManage fault is an exception that occurs because of a memory
/// protection related fault.
#[exception]
fn MemoryManagement() {
    safe();
}

/// A BusFault is an exception that occurs because of a memory related fault
/// for an instruction or data memory transaction. Touching a peripheral whose
/// clock is still gated off ends up here.
#[exception]
fn BusFault() {
    safe();
}

/// A UsageFault is an exception that occurs because of a fault related to instruction execution. This includes:
/// * an undefined instruction
/// * an illegal unaligned access
/// * invalid state on instruction execution
/// * an error on exception return.
#[exception]
fn UsageFault() {
    safe();
}

/// A place-holder ISR used when we have nothing better to use.
#[exception]
unsafe fn DefaultHandler(_irq_number: i16) -> () {
    // Nothing
}

scoped_interrupts! {
    /// Device interrupts that the application registers handlers for at runtime
    ///
    /// TIMER0A is the periodic sample clock (and the ADC trigger).
    ///
    /// TIMER1A is the one-shot debounce settle timer.
    ///
    /// GPIOF fires on button edges (SW1 on PF4, SW2 on PF0).
    ///
    /// ADC0SS3 signals a finished temperature conversion.
    ///
    /// Any of these left unregistered inside a scope falls through to a no-op.
    #[allow(missing_docs)]
    pub enum Interrupt {
        TIMER0A,
        TIMER1A,
        GPIOF,
        ADC0SS3
    }

    use #[interrupt];
}
