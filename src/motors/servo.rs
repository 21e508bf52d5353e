// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hobby servo on a 50 Hz PWM channel.
//!
//! Angles are in degrees. The pulse width is a linear function of angle fixed by two
//! calibration points (raw pulse in µs at a known angle), so each servo can absorb its own horn
//! offset and direction. Setting an angle and enabling the output are separate calls.

use embedded_hal::pwm::SetDutyCycle;

#[allow(unused_imports)]
use micromath::F32Ext;

/// PWM frame length.
pub const PERIOD_US: u32 = 20_000;

/// Two-point linear calibration, raw pulse width (µs) at an angle (degrees).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Calibration {
    pub raw_a: u16,
    pub angle_a: f32,
    pub raw_b: u16,
    pub angle_b: f32,
}

impl Calibration {
    pub const fn new(raw_a: u16, angle_a: f32, raw_b: u16, angle_b: f32) -> Self {
        Self {
            raw_a,
            angle_a,
            raw_b,
            angle_b,
        }
    }

    /// Pulse width in µs for `angle`.
    pub fn raw_for(&self, angle: f32) -> f32 {
        let slope = (f32::from(self.raw_b) - f32::from(self.raw_a)) / (self.angle_b - self.angle_a);
        f32::from(self.raw_a) + (angle - self.angle_a) * slope
    }

    /// Angle in degrees for a pulse width in µs.
    pub fn angle_for(&self, raw: f32) -> f32 {
        let slope = (self.angle_b - self.angle_a) / (f32::from(self.raw_b) - f32::from(self.raw_a));
        self.angle_a + (raw - f32::from(self.raw_a)) * slope
    }

    /// `(lower, upper)` angles spanned by the two calibration points.
    pub fn span(&self) -> (f32, f32) {
        if self.angle_a <= self.angle_b {
            (self.angle_a, self.angle_b)
        } else {
            (self.angle_b, self.angle_a)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ServoError {
    /// Requested angle outside `[lower, upper]`.
    OutOfRange { angle: f32 },
    /// PWM output rejected the duty cycle.
    Output,
}

pub struct Servo<P> {
    pwm: P,
    calibration: Calibration,
    lower: f32,
    upper: f32,
    angle: f32,
    enabled: bool,
}

impl<P: SetDutyCycle> Servo<P> {
    /// Create a disabled servo with bounds equal to the calibration span.
    pub fn new(mut pwm: P, calibration: Calibration) -> Self {
        pwm.set_duty_cycle_fully_off().ok();
        let (lower, upper) = calibration.span();
        Self {
            pwm,
            calibration,
            lower,
            upper,
            angle: 0.0,
            enabled: false,
        }
    }

    /// Override the angle bounds.
    pub fn with_limits(mut self, lower: f32, upper: f32) -> Self {
        self.lower = lower.min(upper);
        self.upper = lower.max(upper);
        self
    }

    #[inline]
    pub fn lower(&self) -> f32 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f32 {
        self.upper
    }

    #[inline]
    pub fn contains(&self, angle: f32) -> bool {
        angle >= self.lower && angle <= self.upper
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn output(&self) -> &P {
        &self.pwm
    }

    /// Pulse width in µs for the current angle.
    pub fn pulse_us(&self) -> u16 {
        self.calibration.raw_for(self.angle).round().clamp(0.0, PERIOD_US as f32) as u16
    }

    /// Store a new angle. The output only follows while enabled.
    pub fn set_angle(&mut self, angle: f32) -> Result<(), ServoError> {
        if !self.contains(angle) {
            return Err(ServoError::OutOfRange { angle });
        }
        self.angle = angle;
        if self.enabled {
            self.write()?;
        }
        Ok(())
    }

    /// Start driving pulses for the stored angle.
    pub fn enable(&mut self) -> Result<(), ServoError> {
        self.enabled = true;
        self.write()
    }

    /// Stop driving pulses (servo goes limp).
    pub fn disable(&mut self) -> Result<(), ServoError> {
        self.enabled = false;
        self.pwm.set_duty_cycle_fully_off().map_err(|_| ServoError::Output)
    }

    fn write(&mut self) -> Result<(), ServoError> {
        let max = u32::from(self.pwm.max_duty_cycle());
        let duty = u32::from(self.pulse_us()) * max / PERIOD_US;
        self.pwm.set_duty_cycle(duty as u16).map_err(|_| ServoError::Output)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use core::convert::Infallible;
    use embedded_hal::pwm::{ErrorType, SetDutyCycle};

    /// PWM channel with a 1 µs tick that remembers what was written.
    #[derive(Default)]
    pub struct RecordingPwm {
        pub duty: u16,
        pub writes: usize,
    }

    impl ErrorType for RecordingPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for RecordingPwm {
        fn max_duty_cycle(&self) -> u16 {
            super::PERIOD_US as u16
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
            self.duty = duty;
            self.writes += 1;
            Ok(())
        }
    }
}
