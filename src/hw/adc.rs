// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Joystick sampling on ADC1 using direct PAC register access.
//!
//! Blocking single conversions, 12-bit right-aligned, software triggered. Three channels carry
//! the stick axes: x, y and turn.

use stm32f7xx_hal::pac;

/// Longest sample time; the stick potentiometers have a high source impedance.
const SAMPLE_TIME: u32 = 0b111;

pub struct Joystick {
    adc: pac::ADC1,
    channels: [u8; 3],
}

impl Joystick {
    /// Power up ADC1 and sample `channels` (x, y, turn).
    pub fn new(adc: pac::ADC1, channels: [u8; 3]) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        // ADC prescaler: PCLK2 / 4
        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        common.ccr.modify(|_, w| w.adcpre().div4());

        adc.cr2.modify(|_, w| w.adon().clear_bit());
        adc.cr1.modify(|_, w| w.res().bits(0b00));
        adc.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        for &ch in channels.iter() {
            let ch = u32::from(ch);
            if ch <= 9 {
                adc.smpr2
                    .modify(|r, w| unsafe { w.bits(r.bits() | SAMPLE_TIME << (3 * ch)) });
            } else {
                adc.smpr1
                    .modify(|r, w| unsafe { w.bits(r.bits() | SAMPLE_TIME << (3 * (ch - 10))) });
            }
        }

        adc.sqr1.modify(|_, w| w.l().bits(0));
        adc.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc, channels }
    }

    /// Convert one channel.
    pub fn read_channel(&mut self, channel: u8) -> u16 {
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
        while self.adc.sr.read().eoc().bit_is_clear() {}
        self.adc.dr.read().data().bits()
    }

    /// Raw `[x, y, turn]` readings, 0..=4095, centered near 2048.
    pub fn read(&mut self) -> [u16; 3] {
        let channels = self.channels;
        channels.map(|ch| self.read_channel(ch))
    }

    pub fn free(self) -> pac::ADC1 {
        self.adc
    }
}
