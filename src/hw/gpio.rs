// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! GPIO lines.
//!
//! - `OutputLine` is a push-pull output implementing [`embedded_hal::digital::OutputPin`], used
//!   for the radio CSN/CE lines and the LEDs.
//! - `IrqLine` routes a falling edge on one pin to its EXTI interrupt (radio IRQ is active-low).

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use stm32f7xx_hal::{
    gpio::{self, Input, Output, PinState, PullUp, PushPull},
    pac,
};

pub struct OutputLine<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> OutputLine<P, N> {
    /// Take over `pin` as a push-pull output at `initial`.
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>, initial: PinState) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_state(initial);
        Self { pin }
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> ErrorType for OutputLine<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> OutputPin for OutputLine<P, N> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.pin.set_low();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.pin.set_high();
        Ok(())
    }
}

/// Falling-edge interrupt source on pin `N` of port `P`.
pub struct IrqLine<const P: char, const N: u8> {
    _pin: gpio::Pin<P, N, Input<PullUp>>,
}

impl<const P: char, const N: u8> IrqLine<P, N> {
    /// Route the pin to EXTI line `N` and unmask its falling edge.
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let pin = pin.into_pull_up_input();
        let port = (P as u8 - b'A') as u32;
        let shift = 4 * (N as u32 % 4);

        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.syscfgen().set_bit());

        let syscfg = unsafe { &*pac::SYSCFG::ptr() };
        let route = |bits: u32| (bits & !(0xF << shift)) | (port << shift);
        match N / 4 {
            0 => syscfg.exticr1.modify(|r, w| unsafe { w.bits(route(r.bits())) }),
            1 => syscfg.exticr2.modify(|r, w| unsafe { w.bits(route(r.bits())) }),
            2 => syscfg.exticr3.modify(|r, w| unsafe { w.bits(route(r.bits())) }),
            _ => syscfg.exticr4.modify(|r, w| unsafe { w.bits(route(r.bits())) }),
        }

        let exti = unsafe { &*pac::EXTI::ptr() };
        exti.ftsr.modify(|r, w| unsafe { w.bits(r.bits() | 1 << N) });
        exti.rtsr.modify(|r, w| unsafe { w.bits(r.bits() & !(1 << N)) });
        exti.imr.modify(|r, w| unsafe { w.bits(r.bits() | 1 << N) });

        Self { _pin: pin }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        let exti = unsafe { &*pac::EXTI::ptr() };
        exti.pr.read().bits() & (1 << N) != 0
    }

    /// Acknowledge the edge. Must be called from the handler.
    #[inline]
    pub fn clear(&self) {
        let exti = unsafe { &*pac::EXTI::ptr() };
        exti.pr.write(|w| unsafe { w.bits(1 << N) });
    }
}
