// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servo outputs on general-purpose timers using direct register access.
//!
//! TIM2, TIM3 and TIM4 each run at 50 Hz with a 1 µs tick and drive four servos in PWM mode 1,
//! so a compare value is the pulse width in µs. All twelve outputs share one [`ServoChannel`]
//! type, which is what lets every leg use the same servo type.

use core::convert::Infallible;
use core::ptr;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use stm32f7xx_hal::pac;

use crate::motors::servo::PERIOD_US;

const CR1: usize = 0x00;
const EGR: usize = 0x14;
const CCMR1: usize = 0x18;
const CCMR2: usize = 0x1C;
const CCER: usize = 0x20;
const PSC: usize = 0x28;
const ARR: usize = 0x2C;
const CCR1: usize = 0x34;

/// OCxM = PWM mode 1, OCxPE, for both channels of a CCMR register.
const CCMR_PWM1: u32 = 0x6868;
/// CC1E..CC4E.
const CCER_ALL: u32 = 0x1111;
const CR1_ARPE_CEN: u32 = 0x81;
const EGR_UG: u32 = 0x01;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Timer {
    Tim2,
    Tim3,
    Tim4,
}

impl Timer {
    fn base(self) -> usize {
        match self {
            Timer::Tim2 => pac::TIM2::ptr() as usize,
            Timer::Tim3 => pac::TIM3::ptr() as usize,
            Timer::Tim4 => pac::TIM4::ptr() as usize,
        }
    }

    fn write(self, offset: usize, value: u32) {
        unsafe { ptr::write_volatile((self.base() + offset) as *mut u32, value) }
    }
}

/// Start all three timers. `timer_clk_hz` is the APB1 timer clock.
///
/// Returns the channels in order TIM2 CH1..CH4, TIM3 CH1..CH4, TIM4 CH1..CH4, all off.
pub fn start(timer_clk_hz: u32) -> [ServoChannel; 12] {
    let rcc = unsafe { &*pac::RCC::ptr() };
    rcc.apb1enr
        .modify(|_, w| w.tim2en().set_bit().tim3en().set_bit().tim4en().set_bit());

    let prescaler = timer_clk_hz / 1_000_000 - 1;
    for timer in [Timer::Tim2, Timer::Tim3, Timer::Tim4] {
        timer.write(CR1, 0);
        timer.write(PSC, prescaler);
        timer.write(ARR, PERIOD_US - 1);
        for ch in 0..4 {
            timer.write(CCR1 + 4 * ch, 0);
        }
        timer.write(CCMR1, CCMR_PWM1);
        timer.write(CCMR2, CCMR_PWM1);
        timer.write(CCER, CCER_ALL);
        timer.write(EGR, EGR_UG);
        timer.write(CR1, CR1_ARPE_CEN);
    }

    core::array::from_fn(|i| ServoChannel {
        timer: [Timer::Tim2, Timer::Tim3, Timer::Tim4][i / 4],
        channel: (i % 4) as u8,
    })
}

/// One timer compare output.
#[derive(Debug)]
pub struct ServoChannel {
    timer: Timer,
    channel: u8,
}

impl ServoChannel {
    pub fn timer(&self) -> Timer {
        self.timer
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }
}

impl ErrorType for ServoChannel {
    type Error = Infallible;
}

impl SetDutyCycle for ServoChannel {
    fn max_duty_cycle(&self) -> u16 {
        PERIOD_US as u16
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.timer
            .write(CCR1 + 4 * usize::from(self.channel), u32::from(duty));
        Ok(())
    }
}
