// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Board Support
//!
//! STM32F7 wrappers that expose the HAL peripherals through the `embedded-hal` 1.0 traits the
//! rest of the crate is written against.
//!
//! | Module | Purpose |
//! | ------ | ------- |
//! | [`pins`] | Pin map shared by the robot and the controller |
//! | [`spi`] | SPI bus for the radio |
//! | [`gpio`] | Push-pull output lines and the radio IRQ line |
//! | [`clock`] | DWT cycle counter as monotonic clock and busy-wait delay |
//! | [`servo_pwm`] | 50 Hz timer channels for the servos |
//! | [`usart`] | Debug terminal serial port |
//! | [`led`] | Status LEDs |
//! | [`adc`] | Joystick sampling |

pub mod adc;
pub mod clock;
pub mod gpio;
pub mod led;
pub mod pins;
pub mod servo_pwm;
pub mod spi;
pub mod usart;

pub use adc::Joystick;
pub use clock::{DwtClock, DwtDelay};
pub use gpio::{IrqLine, OutputLine};
pub use led::Led;
pub use pins::BoardPins;
pub use servo_pwm::ServoChannel;
pub use spi::SpiBus;
pub use usart::Usart;
