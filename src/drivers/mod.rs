//! Peripheral drivers not covered by the HAL

pub mod adc;
pub mod pwm;
pub mod timer;
