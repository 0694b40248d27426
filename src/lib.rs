//! Table-driven 8-bit waveform streamer for the TM4C123 Launchpad.
//!
//! A periodic timer emits one sample of the active waveform per tick to a
//! byte sink (the Launchpad's virtual COM port); a debounced button press
//! moves to the next waveform in the catalog and restarts it.
//!
//! The streaming core (`waveform`, `sequencer`, `debounce`, `config`, `log`)
//! only depends on `embedded-hal` traits and builds anywhere. Board support
//! (`board`, `startup`, `drivers`) sits behind the `board` feature and
//! targets `thumbv7em-none-eabihf`.
//!
//! `temperature` and `servo` hold the board-independent parts of the ADC and
//! PWM demos.

#![cfg_attr(not(test), no_std)]
#![warn(dead_code)]
#![deny(missing_docs)]

// In release mode, cause linker error if panic is possible
// Developing with panic-never can be difficult because it does not indicate *where*
// a panicking branch exists
#[cfg(all(feature = "board", not(debug_assertions)))]
extern crate panic_never;

pub mod config;
pub mod debounce;
pub mod log;
pub mod sequencer;
pub mod servo;
pub mod temperature;
pub mod waveform;

#[cfg(feature = "board")]
pub mod board;
#[cfg(feature = "board")]
pub mod builtins;
#[cfg(feature = "board")]
pub mod drivers;
#[cfg(feature = "board")]
pub mod startup;
