// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin map for the STM32F767 board.
//!
//! The robot and the handheld controller run on the same board. The robot uses the servo and
//! LED pins, the controller the joystick pins; both share the radio and the debug port.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpioc, gpiod, gpioe, Alternate, Analog, Input, PinState, PullUp},
    pac,
    prelude::*,
};

use crate::hw::gpio::{IrqLine, OutputLine};

/// All board pins. Construct this once at startup:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub radio: RadioPins,
    pub servos: ServoPins,
    pub joystick: JoystickPins,
}

/// One LED per leg, A to D (active-low).
pub struct LedPins {
    pub a: OutputLine<'D', 8>,
    pub b: OutputLine<'D', 9>,
    pub c: OutputLine<'D', 10>,
    pub d: OutputLine<'D', 11>,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// nRF24L01+ on SPI4.
pub struct RadioPins {
    pub sck: gpioe::PE12<Alternate<5>>,
    pub miso: gpioe::PE13<Alternate<5>>,
    pub mosi: gpioe::PE14<Alternate<5>>,
    pub csn: OutputLine<'E', 4>,
    pub ce: OutputLine<'E', 11>,
    /// Active-low IRQ on EXTI9_5.
    pub irq: IrqLine<'E', 9>,
}

/// Servo PWM, grouped by timer. Legs A to D, joints theta, phi, psi in order.
pub struct ServoPins {
    pub tim2: (
        gpioa::PA0<Alternate<1>>,
        gpioa::PA1<Alternate<1>>,
        gpioa::PA2<Alternate<1>>,
        gpioa::PA3<Alternate<1>>,
    ),
    pub tim3: (
        gpioa::PA6<Alternate<2>>,
        gpioa::PA7<Alternate<2>>,
        gpiob::PB0<Alternate<2>>,
        gpiob::PB1<Alternate<2>>,
    ),
    pub tim4: (
        gpiod::PD12<Alternate<2>>,
        gpiod::PD13<Alternate<2>>,
        gpiod::PD14<Alternate<2>>,
        gpiod::PD15<Alternate<2>>,
    ),
}

/// Joystick axes and button on the controller.
pub struct JoystickPins {
    pub x: gpioc::PC0<Analog>,    // ADC1_IN10
    pub y: gpioc::PC1<Analog>,    // ADC1_IN11
    pub turn: gpioc::PC2<Analog>, // ADC1_IN12
    pub button: gpioc::PC13<Input<PullUp>>,
}

/// ADC1 channels of [`JoystickPins`], `[x, y, turn]`.
pub const JOYSTICK_CHANNELS: [u8; 3] = [10, 11, 12];

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(
        gpioa: pac::GPIOA,
        gpiob: pac::GPIOB,
        gpioc: pac::GPIOC,
        gpiod: pac::GPIOD,
        gpioe: pac::GPIOE,
    ) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: LedPins {
                a: OutputLine::new(gpiod.pd8, PinState::High),
                b: OutputLine::new(gpiod.pd9, PinState::High),
                c: OutputLine::new(gpiod.pd10, PinState::High),
                d: OutputLine::new(gpiod.pd11, PinState::High),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            radio: RadioPins {
                sck: gpioe.pe12.into_alternate::<5>(),
                miso: gpioe.pe13.into_alternate::<5>(),
                mosi: gpioe.pe14.into_alternate::<5>(),
                csn: OutputLine::new(gpioe.pe4, PinState::High),
                ce: OutputLine::new(gpioe.pe11, PinState::Low),
                irq: IrqLine::new(gpioe.pe9),
            },

            servos: ServoPins {
                tim2: (
                    gpioa.pa0.into_alternate::<1>(),
                    gpioa.pa1.into_alternate::<1>(),
                    gpioa.pa2.into_alternate::<1>(),
                    gpioa.pa3.into_alternate::<1>(),
                ),
                tim3: (
                    gpioa.pa6.into_alternate::<2>(),
                    gpioa.pa7.into_alternate::<2>(),
                    gpiob.pb0.into_alternate::<2>(),
                    gpiob.pb1.into_alternate::<2>(),
                ),
                tim4: (
                    gpiod.pd12.into_alternate::<2>(),
                    gpiod.pd13.into_alternate::<2>(),
                    gpiod.pd14.into_alternate::<2>(),
                    gpiod.pd15.into_alternate::<2>(),
                ),
            },

            joystick: JoystickPins {
                x: gpioc.pc0.into_analog(),
                y: gpioc.pc1.into_analog(),
                turn: gpioc.pc2.into_analog(),
                button: gpioc.pc13.into_pull_up_input(),
            },
        }
    }
}
