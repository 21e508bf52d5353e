// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Time base from the Cortex-M7 DWT cycle counter.
//!
//! The 32-bit counter wraps every few seconds at full core clock. `DwtClock` extends it to 64
//! bits, which holds as long as `now()` is called at least once per wrap (the control loop does).

use core::cell::RefCell;

use cortex_m::peripheral::{DCB, DWT};
use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::time::{Instant, Monotonic};

/// Start the cycle counter. Call once before using either type.
pub fn start(dcb: &mut DCB, dwt: &mut DWT) {
    dcb.enable_trace();
    DWT::unlock();
    dwt.enable_cycle_counter();
}

struct Extended {
    last: u32,
    high: u64,
}

pub struct DwtClock {
    cycles_per_us: u32,
    state: Mutex<RefCell<Extended>>,
}

impl DwtClock {
    pub const fn new(sysclk_hz: u32) -> Self {
        Self {
            cycles_per_us: sysclk_hz / 1_000_000,
            state: Mutex::new(RefCell::new(Extended { last: 0, high: 0 })),
        }
    }
}

impl Monotonic for DwtClock {
    fn now(&self) -> Instant {
        critical_section::with(|cs| {
            let cycles = DWT::cycle_count();
            let mut s = self.state.borrow_ref_mut(cs);
            if cycles < s.last {
                s.high += 1 << 32;
            }
            s.last = cycles;
            Instant::from_micros((s.high | u64::from(cycles)) / u64::from(self.cycles_per_us))
        })
    }
}

/// Busy-wait delay on the cycle counter.
#[derive(Copy, Clone)]
pub struct DwtDelay {
    cycles_per_us: u32,
}

impl DwtDelay {
    pub const fn new(sysclk_hz: u32) -> Self {
        Self {
            cycles_per_us: sysclk_hz / 1_000_000,
        }
    }
}

impl DelayNs for DwtDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (u64::from(ns) * u64::from(self.cycles_per_us)).div_ceil(1000);
        let start = DWT::cycle_count();
        while u64::from(DWT::cycle_count().wrapping_sub(start)) < cycles {}
    }
}
