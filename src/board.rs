//! Hardware definitions capturing the configuration of the board
use embedded_hal::digital::v2::OutputPin;
use tm4c123x_hal::gpio::{gpiof::*, GpioExt, Input, Output, PullUp, PushPull};
use tm4c123x_hal::tm4c123x::{self, NVIC};
use tm4c123x_hal::sysctl::{
    Clocks, CrystalFrequency, Oscillator, PllOutputFrequency, PowerControl, SysctlExt,
    SystemClock,
};
use tm4c123x_hal::time::Hertz;

use crate::config::{nvic_priority, ConfigError};
use crate::sequencer::Indicator;
use crate::waveform::IndicatorCode;

/// The RGB LED on PF1 (red), PF2 (blue) and PF3 (green)
pub struct RgbLed {
    /// Red channel
    pub red: PF1<Output<PushPull>>,
    /// Blue channel
    pub blue: PF2<Output<PushPull>>,
    /// Green channel
    pub green: PF3<Output<PushPull>>,
}

impl RgbLed {
    /// Turn all three channels off
    pub fn off(&mut self) {
        self.show(IndicatorCode(0));
    }
}

impl Indicator for RgbLed {
    fn show(&mut self, code: IndicatorCode) {
        let leds = code.leds();
        set_pin(&mut self.red, leds.red);
        set_pin(&mut self.blue, leds.blue);
        set_pin(&mut self.green, leds.green);
    }
}

fn set_pin<P: OutputPin>(pin: &mut P, on: bool) {
    if on {
        let _ = pin.set_high();
    } else {
        let _ = pin.set_low();
    }
}

/// Hardware definitions for the TM4C123 (EK-TM4C123GXL / EK-LM4F120XL) Launchpad
#[allow(non_snake_case)]
pub struct Board {
    /// The core peripherals on the TM4C123
    pub core_peripherals: tm4c123x::CorePeripherals,
    /// Power gating for peripherals in the TM4C123
    pub power_control: PowerControl,

    /// RGB status LED
    pub led: RgbLed,

    /// Button SW1
    pub button0: PF4<Input<PullUp>>,
    /// Button SW2
    pub button1: PF0<Input<PullUp>>,

    /// GPIO control for GPIO port F
    pub portf_control: tm4c123x_hal::gpio::gpiof::GpioControl,

    #[doc = "GPIO_PORTA (UART0 pins)"]
    pub GPIO_PORTA: tm4c123x::GPIO_PORTA,
    #[doc = "GPIO_PORTB (UART1 pins)"]
    pub GPIO_PORTB: tm4c123x::GPIO_PORTB,
    #[doc = "GPIO_PORTD (PD0 is M1PWM0)"]
    pub GPIO_PORTD: tm4c123x::GPIO_PORTD,

    #[doc = "UART0, wired to the debug probe's virtual COM port"]
    pub UART0: tm4c123x::UART0,
    #[doc = "UART1"]
    pub UART1: tm4c123x::UART1,

    #[doc = "TIMER0"]
    pub TIMER0: tm4c123x::TIMER0,
    #[doc = "TIMER1"]
    pub TIMER1: tm4c123x::TIMER1,

    #[doc = "ADC0"]
    pub ADC0: tm4c123x::ADC0,
    #[doc = "PWM1"]
    pub PWM1: tm4c123x::PWM1,
}

/// Clock speed defaults
static mut CLOCKS: Clocks = Clocks {
    osc: Hertz(16_000_000),
    sysclk: Hertz(80_000_000),
};

/// Get the current clock rate of the CPU
pub fn clocks() -> &'static Clocks {
    unsafe { &*core::ptr::addr_of!(CLOCKS) }
}

impl Board {
    // Initialize peripherals
    pub(crate) fn new() -> Board {
        let core_peripherals = match tm4c123x::CorePeripherals::take() {
            Some(x) => x,
            None => loop {}, // This error occurs before the panic handler could even work
        };
        let peripherals = match tm4c123x::Peripherals::take() {
            Some(x) => x,
            None => loop {}, // This error occurs before the panic handler could even work
        };

        let mut sysctl = peripherals.SYSCTL.constrain();

        // Clocks
        sysctl.clock_setup.oscillator = Oscillator::Main(
            CrystalFrequency::_16mhz,
            SystemClock::UsePll(PllOutputFrequency::_80_00mhz),
        );
        unsafe {
            CLOCKS = sysctl.clock_setup.freeze();
        }

        // GPIO (LED and buttons)
        let mut pins_gpiof = peripherals.GPIO_PORTF.split(&sysctl.power_control);
        let mut led = RgbLed {
            red: pins_gpiof.pf1.into_push_pull_output(),
            blue: pins_gpiof.pf2.into_push_pull_output(),
            green: pins_gpiof.pf3.into_push_pull_output(),
        };
        led.off();

        let button0 = pins_gpiof.pf4.into_pull_up_input();
        let button1 = pins_gpiof
            .pf0
            .unlock(&mut pins_gpiof.control)
            .into_pull_up_input(); // PF0 doubles as NMI, so it ships locked

        Board {
            core_peripherals,
            power_control: sysctl.power_control,

            led,
            button0,
            button1,
            portf_control: pins_gpiof.control,

            GPIO_PORTA: peripherals.GPIO_PORTA,
            GPIO_PORTB: peripherals.GPIO_PORTB,
            GPIO_PORTD: peripherals.GPIO_PORTD,
            UART0: peripherals.UART0,
            UART1: peripherals.UART1,
            TIMER0: peripherals.TIMER0,
            TIMER1: peripherals.TIMER1,
            ADC0: peripherals.ADC0,
            PWM1: peripherals.PWM1,
        }
    }
}

/// Set an interrupt's priority level (0 = most urgent ..= 7) and unmask it
pub fn enable_interrupt(
    nvic: &mut NVIC,
    interrupt: tm4c123x::Interrupt,
    level: u8,
) -> Result<(), ConfigError> {
    let priority = nvic_priority(level)?;
    unsafe {
        nvic.set_priority(interrupt, priority);
        NVIC::unmask(interrupt);
    }
    Ok(())
}

/// Unrecoverable error; blink the red LED until reset
pub fn safe() -> ! {
    use embedded_hal::blocking::delay::DelayMs;
    let core_peripherals = unsafe { tm4c123x::CorePeripherals::steal() };
    let p = unsafe { tm4c123x::Peripherals::steal() };
    let pins = p.GPIO_PORTF.split(&p.SYSCTL.constrain().power_control);

    let mut delay = tm4c123x_hal::delay::Delay::new(core_peripherals.SYST, clocks());
    let mut red = pins.pf1.into_push_pull_output();
    loop {
        let _ = red.set_high().unwrap_or_default();
        delay.delay_ms(200u32);
        let _ = red.set_low().unwrap_or_default();
        delay.delay_ms(200u32);
    }
}
