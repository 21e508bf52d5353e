// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Robot firmware.
//!
//! Bring-up parks the feet, enables the servos one joint group at a time, and starts concurrent
//! homing. After that the main loop runs the gait every 5 ms on the latest radio command, while
//! the radio IRQ fills the mailbox in the background.

#![no_main]
#![no_std]

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m_rt::entry;
use critical_section::Mutex;
#[cfg(feature = "defmt")]
use defmt_rtt as _;
use embedded_hal::delay::DelayNs;
use panic_halt as _;

use hal::{
    gpio::{gpioe, Alternate},
    pac::{self, interrupt},
    prelude::*,
    serial::{self, Config, Serial},
    spi::{Mode, Phase, Polarity, Spi},
};
use stm32f7xx_hal as hal;

use walkbot::config;
use walkbot::control::{GaitScheduler, Joint};
use walkbot::diag::{DataLog, Terminal};
use walkbot::drivers::Nrf24;
use walkbot::hw::{self, BoardPins, DwtClock, DwtDelay, IrqLine, Led, OutputLine, SpiBus, Usart};
use walkbot::radio::{Mailbox, RadioLink};
use walkbot::time::Monotonic;

const SYSCLK_HZ: u32 = 216_000_000;

type RadioSpi = SpiBus<
    pac::SPI4,
    (
        gpioe::PE12<Alternate<5>>,
        gpioe::PE13<Alternate<5>>,
        gpioe::PE14<Alternate<5>>,
    ),
>;
type Radio = RadioLink<RadioSpi, OutputLine<'E', 4>, OutputLine<'E', 11>, DwtDelay>;

static CLOCK: DwtClock = DwtClock::new(SYSCLK_HZ);
static MAILBOX: Mailbox = Mailbox::new(config::LINK_WATCHDOG);
static RADIO: Mutex<RefCell<Option<Radio>>> = Mutex::new(RefCell::new(None));
static RADIO_IRQ: Mutex<RefCell<Option<IrqLine<'E', 9>>>> = Mutex::new(RefCell::new(None));
static RADIO_ERRORS: AtomicU32 = AtomicU32::new(0);

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(SYSCLK_HZ.Hz()).freeze();
    let mut apb2 = rcc.apb2;
    hw::clock::start(&mut cp.DCB, &mut cp.DWT);
    let mut delay = DwtDelay::new(SYSCLK_HZ);

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);

    // LEDs, one per leg
    let mut led_a = Led::active_low(pins.leds.a);
    let mut led_b = Led::active_low(pins.leds.b);
    let mut led_c = Led::active_low(pins.leds.c);
    let mut led_d = Led::active_low(pins.leds.d);

    // USART1 (DBG)
    let usart_cfg = Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
    let mut usart = Usart::new(serial);
    usart.println("walkbot up");

    // SPI4 (radio)
    let spi_mode = Mode {
        polarity: Polarity::IdleLow,
        phase: Phase::CaptureOnFirstTransition,
    };
    let spi4 = Spi::new(dp.SPI4, (pins.radio.sck, pins.radio.miso, pins.radio.mosi))
        .enable::<u8>(spi_mode, 4.MHz(), &clocks, &mut apb2);

    let Ok(nrf) = Nrf24::new(SpiBus::new(spi4), pins.radio.csn, pins.radio.ce, delay) else {
        halt(&mut usart, "radio bus failed");
    };
    let mut radio = RadioLink::new(nrf, config::CONTROLLER_ID);
    if radio.reset().is_err() {
        halt(&mut usart, "radio init failed");
    }
    critical_section::with(|cs| {
        RADIO.borrow_ref_mut(cs).replace(radio);
        RADIO_IRQ.borrow_ref_mut(cs).replace(pins.radio.irq);
    });
    unsafe { cortex_m::peripheral::NVIC::unmask(pac::Interrupt::EXTI9_5) };

    // Servos and gait
    let [a0, a1, a2, b0, b1, b2, c0, c1, c2, d0, d1, d2] =
        hw::servo_pwm::start(clocks.timclk1().raw());
    let _servo_pins = pins.servos;
    let legs = config::legs([[a0, a1, a2], [b0, b1, b2], [c0, c1, c2], [d0, d1, d2]]);
    let mut gait = GaitScheduler::new(legs, config::mounts(), config::GAIT);

    if gait.park().is_err() {
        halt(&mut usart, "initial pose unreachable");
    }
    for joint in Joint::ALL {
        for leg in gait.legs_mut() {
            if leg.enable_joint(joint).is_err() {
                usart.println("servo enable failed");
            }
        }
        delay.delay_ms(100);
    }
    gait.home_all(CLOCK.now());

    let mut log = DataLog::new();
    let mut terminal = Terminal::new();
    let mut radio_errors = 0;
    let mut next = CLOCK.now();

    loop {
        let start = CLOCK.now();
        gait.cycle(MAILBOX.command(start), start);

        let [a, b, c, d] = gait.stable();
        led_a.set(a);
        led_b.set(b);
        led_c.set(c);
        led_d.set(d);

        while let Some(byte) = usart.poll_byte() {
            let _ = terminal.push_byte(byte, &gait, &log, &mut usart);
        }

        let errors = RADIO_ERRORS.load(Ordering::Relaxed);
        if errors != radio_errors {
            radio_errors = errors;
            usart.println("radio error");
        }

        log.push(CLOCK.now().saturating_duration_since(start).as_secs_f32());

        next = next + config::PERIOD;
        if CLOCK.now() >= next {
            next = CLOCK.now();
        }
        while CLOCK.now() < next {}
    }
}

fn halt<U: serial::Instance>(usart: &mut Usart<U>, msg: &str) -> ! {
    usart.println(msg);
    loop {
        cortex_m::asm::nop();
    }
}

#[interrupt]
fn EXTI9_5() {
    critical_section::with(|cs| {
        if let Some(irq) = RADIO_IRQ.borrow_ref(cs).as_ref() {
            irq.clear();
        }
        if let Some(radio) = RADIO.borrow_ref_mut(cs).as_mut() {
            if radio.receive(&MAILBOX, CLOCK.now()).is_err() {
                RADIO_ERRORS.fetch_add(1, Ordering::Relaxed);
            }
        }
    });
}
