// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Handheld controller firmware.
//!
//! Samples the joystick and the reset button every 20 ms and sends one command word to the
//! robot listening on [`config::CONTROLLER_ID`].

#![no_main]
#![no_std]

use cortex_m_rt::entry;
#[cfg(feature = "defmt")]
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
    spi::{Mode, Phase, Polarity, Spi},
};
use stm32f7xx_hal as hal;

use walkbot::config;
use walkbot::drivers::Nrf24;
use walkbot::hw::{self, pins::JOYSTICK_CHANNELS, BoardPins, DwtClock, DwtDelay, Joystick, Led, SpiBus, Usart};
use walkbot::protocol::{command::axis_from_adc, Buttons, CommandWord};
use walkbot::radio::RadioTransmitter;
use walkbot::time::Monotonic;

const SYSCLK_HZ: u32 = 216_000_000;

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(SYSCLK_HZ.Hz()).freeze();
    let mut apb2 = rcc.apb2;
    hw::clock::start(&mut cp.DCB, &mut cp.DWT);
    let clock = DwtClock::new(SYSCLK_HZ);

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);
    let mut heartbeat = Led::active_low(pins.leds.a);

    // USART1 (DBG)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
    let mut usart = Usart::new(serial);
    usart.println("controller up");

    // SPI4 (radio)
    let spi_mode = Mode {
        polarity: Polarity::IdleLow,
        phase: Phase::CaptureOnFirstTransition,
    };
    let spi4 = Spi::new(dp.SPI4, (pins.radio.sck, pins.radio.miso, pins.radio.mosi))
        .enable::<u8>(spi_mode, 4.MHz(), &clocks, &mut apb2);

    let Ok(nrf) = Nrf24::new(SpiBus::new(spi4), pins.radio.csn, pins.radio.ce, DwtDelay::new(SYSCLK_HZ))
    else {
        usart.println("radio bus failed");
        loop {
            cortex_m::asm::nop();
        }
    };
    let mut radio = RadioTransmitter::new(nrf, config::CONTROLLER_ID);
    if radio.reset().is_err() {
        usart.println("radio init failed");
    }

    let mut joystick = Joystick::new(dp.ADC1, JOYSTICK_CHANNELS);
    let button = pins.joystick.button;

    let mut next = clock.now();
    let mut sent: u32 = 0;

    loop {
        let [x, y, turn] = joystick.read();
        let buttons = if button.is_low() { Buttons::RESET } else { Buttons::NONE };
        let word = CommandWord::new(axis_from_adc(x), axis_from_adc(y), axis_from_adc(turn), buttons);

        if radio.transmit(word).is_err() {
            usart.println("radio error");
        }

        sent = sent.wrapping_add(1);
        if sent % 25 == 0 {
            heartbeat.toggle();
        }

        next = next + config::CONTROLLER_PERIOD;
        while clock.now() < next {}
    }
}
