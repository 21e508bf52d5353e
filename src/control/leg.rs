// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-leg inverse kinematics and step state machine.
//!
//! A leg has three joints: a yaw joint `theta` at the hip and two pitch joints `phi` and `psi`
//! forming a planar two-link arm (lengths `a`, `b`). The arm plane is offset sideways from the hip
//! axis by `c` and starts `d` out from it.
//!
//! Positions are in the leg frame (metres), angles at the servos in degrees.
//!
//! Every control cycle the scheduler calls [`LegController::update`] and then
//! [`LegController::apply`]:
//!
//! ```ignore
//! let free = leg.update(&delta, now);
//! // ... decide whether this leg (or another) steps ...
//! leg.apply()?;
//! ```
//!
//! While [`LegState::Neutral`] the foot tracks the body motion. While [`LegState::Stepping`] it
//! follows a fixed swing trajectory and ignores the body motion until the step finishes.

use core::f32::consts::{FRAC_PI_2, PI};
use core::time::Duration;

use embedded_hal::pwm::SetDutyCycle;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::math::{Transform4, Vector3};
use crate::motors::{Servo, ServoError};
use crate::time::Instant;

/// Horizontal travel below which the stored direction of travel is kept.
const DIRECTION_EPS: f32 = 1e-5;

const RAD_TO_DEG: f32 = 180.0 / PI;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Joint {
    Theta,
    Phi,
    Psi,
}

impl Joint {
    pub const ALL: [Joint; 3] = [Joint::Theta, Joint::Phi, Joint::Psi];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Link lengths and offsets (m).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegGeometry {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

/// Joint zero offsets (rad).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AngleOffsets {
    pub theta: f32,
    pub phi: f32,
    pub psi: f32,
}

/// Horizontal workspace the foot may drag through before it has to step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepCircle {
    pub center: Vector3,
    pub radius: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepProfile {
    pub duration: Duration,
    /// Peak lift above the straight line between start and end (m).
    pub height: f32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegConfig {
    pub geometry: LegGeometry,
    pub offsets: AngleOffsets,
    pub circle: StepCircle,
    pub profile: StepProfile,
}

/// Solved joint angles (degrees).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JointAngles {
    pub theta: f32,
    pub phi: f32,
    pub psi: f32,
}

impl JointAngles {
    #[inline]
    pub fn get(&self, joint: Joint) -> f32 {
        match joint {
            Joint::Theta => self.theta,
            Joint::Phi => self.phi,
            Joint::Psi => self.psi,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LegState {
    /// Foot planted, tracking body motion.
    Neutral,
    /// Foot swinging from `start` to `end`.
    Stepping {
        start: Vector3,
        end: Vector3,
        started: Instant,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveError {
    /// No real solution: the target is outside the reachable envelope.
    Unreachable,
    /// A solved angle lies outside its joint's calibrated bounds.
    OutOfRange { joint: Joint, angle: f32 },
    /// The joint's servo output failed.
    Actuator(Joint),
}

pub struct LegController<P> {
    config: LegConfig,
    servos: [Servo<P>; 3],
    state: LegState,
    position: Vector3,
    candidate: Vector3,
    direction: Vector3,
    angles: JointAngles,
}

impl<P: SetDutyCycle> LegController<P> {
    /// Servos in `theta`, `phi`, `psi` order. The foot is assumed at the step circle center until
    /// the first successful move.
    pub fn new(config: LegConfig, servos: [Servo<P>; 3]) -> Self {
        let center = config.circle.center;
        Self {
            config,
            servos,
            state: LegState::Neutral,
            position: center,
            candidate: center,
            direction: Vector3::ZERO,
            angles: JointAngles::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &LegConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> LegState {
        self.state
    }

    #[inline]
    pub fn is_stepping(&self) -> bool {
        matches!(self.state, LegState::Stepping { .. })
    }

    /// Last committed foot position.
    #[inline]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// Where the foot is headed: the step end while stepping, the current position otherwise.
    pub fn target(&self) -> Vector3 {
        match self.state {
            LegState::Stepping { end, .. } => end,
            LegState::Neutral => self.position,
        }
    }

    #[inline]
    pub fn angles(&self) -> JointAngles {
        self.angles
    }

    /// Unit horizontal direction of body travel as seen from this leg.
    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// Seed the direction of travel (only its horizontal direction is kept).
    pub fn set_direction(&mut self, direction: Vector3) {
        self.direction = direction.horizontal().unit();
    }

    pub fn servo(&self, joint: Joint) -> &Servo<P> {
        &self.servos[joint.index()]
    }

    pub fn enable_joint(&mut self, joint: Joint) -> Result<(), ServoError> {
        self.servos[joint.index()].enable()
    }

    pub fn disable(&mut self) -> Result<(), ServoError> {
        self.servos.iter_mut().try_for_each(Servo::disable)
    }

    /// Closed-form inverse kinematics. Bounds are not checked here.
    pub fn solve(&self, target: Vector3) -> Result<JointAngles, MoveError> {
        let LegGeometry { a, b, c, d } = self.config.geometry;
        let o = self.config.offsets;
        let Vector3 { x, y, z } = target;

        let planar = x * x + y * y - c * c;
        if planar < 0.0 {
            return Err(MoveError::Unreachable);
        }
        let r = planar.sqrt();
        let l = r - d;

        let theta = (r * y - c * x).atan2(r * x + c * y) - o.theta;

        let reach_sq = l * l + z * z;
        let reach = reach_sq.sqrt();
        let elbow = (a * a + reach_sq - b * b) / (2.0 * a * reach);
        let knee = (a * a + b * b - reach_sq) / (2.0 * a * b);
        if !(-1.0..=1.0).contains(&elbow) || !(-1.0..=1.0).contains(&knee) {
            return Err(MoveError::Unreachable);
        }

        let phi = z.atan2(l) + elbow.acos() - o.phi;
        let psi = knee.acos() - o.psi - FRAC_PI_2;

        let angles = JointAngles {
            theta: theta * RAD_TO_DEG,
            phi: phi * RAD_TO_DEG,
            psi: psi * RAD_TO_DEG,
        };
        if !(angles.theta.is_finite() && angles.phi.is_finite() && angles.psi.is_finite()) {
            return Err(MoveError::Unreachable);
        }
        Ok(angles)
    }

    /// Move the foot to `target`. Either all three joints and the stored position change, or
    /// nothing does.
    pub fn move_to(&mut self, target: Vector3) -> Result<(), MoveError> {
        let angles = self.solve(target)?;

        for joint in Joint::ALL {
            let angle = angles.get(joint);
            if !self.servos[joint.index()].contains(angle) {
                return Err(MoveError::OutOfRange { joint, angle });
            }
        }

        for joint in Joint::ALL {
            self.servos[joint.index()]
                .set_angle(angles.get(joint))
                .map_err(|_| MoveError::Actuator(joint))?;
        }
        self.angles = angles;
        self.position = target;
        Ok(())
    }

    /// Advance one cycle under body-motion `delta` (leg frame).
    ///
    /// Neutral: computes the pending position and returns whether it stays strictly inside the
    /// step circle. Stepping: advances and commits the swing trajectory and always returns `true`.
    pub fn update(&mut self, delta: &Transform4, now: Instant) -> bool {
        match self.state {
            LegState::Neutral => {
                self.candidate = *delta * self.position;

                let travel = (self.position - self.candidate).horizontal();
                if travel.norm() > DIRECTION_EPS {
                    self.direction = travel.unit();
                }

                let circle = self.config.circle;
                (self.candidate - circle.center).horizontal().norm() < circle.radius
            }
            LegState::Stepping {
                start,
                end,
                started,
            } => {
                let t = now.saturating_duration_since(started);
                let next = if t < self.config.profile.duration {
                    self.swing(start, end, t.as_secs_f32())
                } else {
                    self.state = LegState::Neutral;
                    end
                };

                self.candidate = next;
                if let Err(e) = self.move_to(next) {
                    trace!("swing point rejected: {}", e);
                }
                true
            }
        }
    }

    fn swing(&self, start: Vector3, end: Vector3, t: f32) -> Vector3 {
        let duration = self.config.profile.duration.as_secs_f32();
        let w = PI / duration;
        let s = 0.5 * (1.0 - (w * t).cos());
        let lift = self.config.profile.height * (w * t).sin();

        Vector3::new(
            start.x + (end.x - start.x) * s,
            start.y + (end.y - start.y) * s,
            start.z + (end.z - start.z) * (t / duration) + lift,
        )
    }

    /// Commit the position computed by the last [`update`](Self::update). No-op while stepping.
    pub fn apply(&mut self) -> Result<(), MoveError> {
        match self.state {
            LegState::Neutral => self.move_to(self.candidate),
            LegState::Stepping { .. } => Ok(()),
        }
    }

    /// Start a swing from the current position to `dest`.
    pub fn step(&mut self, dest: Vector3, now: Instant) {
        self.state = LegState::Stepping {
            start: self.position,
            end: dest,
            started: now,
        };
    }

    /// Step to the point `f × radius` from the circle center along the direction of travel.
    /// Returns the direction used.
    pub fn reset(&mut self, f: f32, now: Instant) -> Vector3 {
        let circle = self.config.circle;
        let dest = circle.center + self.direction * (circle.radius * f);
        self.step(dest, now);
        self.direction
    }

    /// Distance the foot can still drag, along its current path, before leaving the step circle.
    pub fn step_distance(&self) -> f32 {
        let circle = self.config.circle;
        let v = (self.position - circle.center).horizontal();
        let m = v.norm();
        if m < DIRECTION_EPS || self.direction == Vector3::ZERO {
            return circle.radius;
        }

        let cos = self.direction.dot(v) / m;
        let chord = circle.radius * circle.radius - m * m * (1.0 - cos * cos);
        m * cos + chord.max(0.0).sqrt()
    }
}
