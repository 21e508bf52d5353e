// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Gait scheduler.
//!
//! Runs once per control period. Turns the latest command into a small body motion, drives all
//! four [`LegController`]s through it, and decides which leg (at most one) may step.
//!
//! Stability of a leg is measured as the signed distance from the body origin to the line
//! through two feet of the opposite side of the support pattern (legs A, B, C, D are front-right,
//! rear-left, front-left, rear-right). A leg may only lift while that margin is positive enough.
//! Two thresholds keep the decision from chattering:
//!
//! - above `stability_high` the closest-to-boundary leg may step early
//! - above `stability_low` a leg may step when it must (or when it is the next candidate and no
//!   other leg is in the air)
//! - below `stability_low` no leg lifts
//!
//! Homing sequences (all legs at once after power-up, or one leg after another on the reset
//! button) run as a separate [`Mode`] with no body motion.

use embedded_hal::pwm::SetDutyCycle;

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::control::leg::{LegController, MoveError};
use crate::math::{Transform4, Vector3};
use crate::protocol::{Axes, CommandWord};
use crate::time::Instant;
use core::time::Duration;

pub const LEG_COUNT: usize = 4;

/// Leg names in index order.
pub const LEG_NAMES: [char; LEG_COUNT] = ['A', 'B', 'C', 'D'];

/// Feet spanning the stability line of each leg, as `(from, to)` leg indices.
pub const STABILITY_LINES: [(usize, usize); LEG_COUNT] = [(2, 3), (3, 2), (1, 0), (0, 1)];

const LINE_EPS: f32 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GaitConfig {
    pub period: Duration,
    /// Body speed at full stick (m/s).
    pub max_speed: f32,
    /// Body turn rate at full stick (rad/s).
    pub max_turn: f32,
    pub stability_high: f32,
    pub stability_low: f32,
    /// Where a gait step lands, as a fraction of the step radius along the direction of travel.
    pub step_fraction: f32,
    pub homing_fractions: [f32; LEG_COUNT],
    pub initial_directions: [Vector3; LEG_COUNT],
    pub initial_target: Vector3,
}

/// Fixed hip mount of one leg.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegMount {
    /// Leg frame to body frame.
    pub to_body: Transform4,
    /// Body frame to leg frame.
    pub to_leg: Transform4,
}

impl LegMount {
    /// Hip at `hip` (body frame) with the leg frame mirrored along x and/or y. Signs must be ±1.
    pub fn mirrored(sx: f32, sy: f32, hip: Vector3) -> Self {
        let scale = Vector3::new(sx, sy, 1.0);
        Self {
            to_body: Transform4::from_scale_translation(scale, hip),
            to_leg: Transform4::from_scale_translation(
                scale,
                Vector3::new(-sx * hip.x, -sy * hip.y, -hip.z),
            ),
        }
    }

    /// Express a body-frame motion in the leg frame.
    #[inline]
    pub fn local(&self, body: &Transform4) -> Transform4 {
        self.to_leg * *body * self.to_body
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Homing {
    /// Every leg steps at once. Only used right after bring-up.
    Concurrent,
    /// Legs step one at a time; `next` is the next leg to start.
    Sequential { next: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Walking,
    Homing(Homing),
}

/// What a call to [`GaitScheduler::cycle`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Motion committed for all legs.
    Applied,
    /// Body motion withheld this cycle to keep a single leg in the air.
    Held,
    /// A homing sequence advanced.
    Homing,
}

/// Signed distance of the origin from the line `p1 → p2` (x/y only). Positive on the right.
pub fn stability_margin(p1: Vector3, p2: Vector3) -> f32 {
    let (lx, ly) = (p2.x - p1.x, p2.y - p1.y);
    let (vx, vy) = (-p1.x, -p1.y);
    let len = (lx * lx + ly * ly).sqrt();
    if len < LINE_EPS {
        return 0.0;
    }
    (ly * vx - lx * vy) / len
}

pub struct GaitScheduler<P> {
    legs: [LegController<P>; LEG_COUNT],
    mounts: [LegMount; LEG_COUNT],
    config: GaitConfig,
    mode: Mode,
    margins: [f32; LEG_COUNT],
    stable: [bool; LEG_COUNT],
    body_delta: Transform4,
    reset_latched: bool,
}

impl<P: SetDutyCycle> GaitScheduler<P> {
    pub fn new(legs: [LegController<P>; LEG_COUNT], mounts: [LegMount; LEG_COUNT], config: GaitConfig) -> Self {
        Self {
            legs,
            mounts,
            config,
            mode: Mode::Walking,
            margins: [0.0; LEG_COUNT],
            stable: [false; LEG_COUNT],
            body_delta: Transform4::IDENTITY,
            reset_latched: false,
        }
    }

    #[inline]
    pub fn legs(&self) -> &[LegController<P>; LEG_COUNT] {
        &self.legs
    }

    #[inline]
    pub fn legs_mut(&mut self) -> &mut [LegController<P>; LEG_COUNT] {
        &mut self.legs
    }

    #[inline]
    pub fn mounts(&self) -> &[LegMount; LEG_COUNT] {
        &self.mounts
    }

    #[inline]
    pub fn config(&self) -> &GaitConfig {
        &self.config
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Per-leg stability pass/fail from the last walking cycle.
    #[inline]
    pub fn stable(&self) -> [bool; LEG_COUNT] {
        self.stable
    }

    /// Per-leg stability margins (m) from the last walking cycle.
    #[inline]
    pub fn margins(&self) -> [f32; LEG_COUNT] {
        self.margins
    }

    /// Body motion applied in the last walking cycle (body frame). Identity after a held cycle.
    #[inline]
    pub fn last_body_delta(&self) -> Transform4 {
        self.body_delta
    }

    pub fn stepping_count(&self) -> usize {
        self.legs.iter().filter(|l| l.is_stepping()).count()
    }

    /// Seed each leg's direction of travel and move every foot to the initial target.
    pub fn park(&mut self) -> Result<(), MoveError> {
        for (leg, dir) in self.legs.iter_mut().zip(self.config.initial_directions) {
            leg.set_direction(dir);
            leg.move_to(self.config.initial_target)?;
        }
        Ok(())
    }

    /// Step every leg to its homing point at once.
    pub fn home_all(&mut self, now: Instant) {
        for (leg, f) in self.legs.iter_mut().zip(self.config.homing_fractions) {
            leg.reset(f, now);
        }
        self.mode = Mode::Homing(Homing::Concurrent);
        info!("homing all legs");
    }

    /// [`park`](Self::park) then [`home_all`](Self::home_all).
    pub fn bring_up(&mut self, now: Instant) -> Result<(), MoveError> {
        self.park()?;
        self.home_all(now);
        Ok(())
    }

    /// Home the legs one after another, starting with A. Any step in flight finishes first.
    pub fn start_sequential_homing(&mut self) {
        self.mode = Mode::Homing(Homing::Sequential { next: 0 });
        info!("homing legs in sequence");
    }

    /// Run one control period.
    pub fn cycle(&mut self, command: CommandWord, now: Instant) -> CycleOutcome {
        let reset = command.buttons().reset();
        let pressed = reset && !self.reset_latched;
        self.reset_latched = reset;

        match self.mode {
            Mode::Homing(homing) => {
                self.advance_homing(homing, now);
                CycleOutcome::Homing
            }
            Mode::Walking if pressed => {
                self.start_sequential_homing();
                self.advance_homing(Homing::Sequential { next: 0 }, now);
                CycleOutcome::Homing
            }
            Mode::Walking => {
                let axes = Axes::decode(command);
                self.body_delta = self.body_motion(&axes);
                let feet = self.body_delta.inverse().unwrap_or(Transform4::IDENTITY);
                let outcome = self.process_movement(&feet, now);
                if outcome == CycleOutcome::Held {
                    self.body_delta = Transform4::IDENTITY;
                }
                outcome
            }
        }
    }

    /// Body-frame motion over one period: rotate by the turn rate, then translate by the velocity.
    pub fn body_motion(&self, axes: &Axes) -> Transform4 {
        let dt = self.config.period.as_secs_f32();
        let v = Vector3::new(axes.x, axes.y, 0.0) * (self.config.max_speed * dt);
        Transform4::IDENTITY
            .rotate_z(axes.turn * self.config.max_turn * dt)
            .translate(v)
    }

    /// Move the feet by `feet` (body frame) while keeping at most one leg in the air.
    pub fn process_movement(&mut self, feet: &Transform4, now: Instant) -> CycleOutcome {
        let cfg = self.config;

        let body: [Vector3; LEG_COUNT] =
            core::array::from_fn(|i| self.mounts[i].to_body * self.legs[i].target());
        let margins: [f32; LEG_COUNT] =
            core::array::from_fn(|i| stability_margin(body[STABILITY_LINES[i].0], body[STABILITY_LINES[i].1]));
        self.margins = margins;
        self.stable = margins.map(|m| m > cfg.stability_low);

        let mut free = [true; LEG_COUNT];
        let mut distance = [0.0f32; LEG_COUNT];
        for (i, leg) in self.legs.iter_mut().enumerate() {
            free[i] = leg.update(&self.mounts[i].local(feet), now);
            distance[i] = leg.step_distance();
        }

        let mut stepping = self.legs.iter().any(|l| l.is_stepping());

        for i in 0..LEG_COUNT {
            if free[i] {
                continue;
            }
            if stepping {
                debug!("leg {} blocked while another steps, holding", LEG_NAMES[i]);
                return CycleOutcome::Held;
            }
            if margins[i] > cfg.stability_low {
                debug!("leg {} must step, margin {}", LEG_NAMES[i], margins[i]);
                self.legs[i].reset(cfg.step_fraction, now);
                stepping = true;
            }
        }

        let next = (0..LEG_COUNT)
            .min_by(|&a, &b| distance[a].total_cmp(&distance[b]))
            .unwrap_or(0);
        let margin = margins[next];

        if margin > cfg.stability_high {
            if !stepping {
                debug!("leg {} steps early, margin {}", LEG_NAMES[next], margin);
                self.legs[next].reset(cfg.step_fraction, now);
            }
        } else if margin > cfg.stability_low {
            if stepping {
                return CycleOutcome::Held;
            }
            debug!("leg {} steps, margin {}", LEG_NAMES[next], margin);
            self.legs[next].reset(cfg.step_fraction, now);
        }

        for leg in self.legs.iter_mut() {
            if let Err(e) = leg.apply() {
                trace!("move rejected: {}", e);
            }
        }
        CycleOutcome::Applied
    }

    fn advance_homing(&mut self, homing: Homing, now: Instant) {
        for leg in self.legs.iter_mut() {
            leg.update(&Transform4::IDENTITY, now);
            if let Err(e) = leg.apply() {
                trace!("homing move rejected: {}", e);
            }
        }
        if self.legs.iter().any(|l| l.is_stepping()) {
            return;
        }

        match homing {
            Homing::Sequential { next } if next < LEG_COUNT => {
                self.legs[next].reset(self.config.homing_fractions[next], now);
                self.mode = Mode::Homing(Homing::Sequential { next: next + 1 });
            }
            _ => {
                self.mode = Mode::Walking;
                info!("homing done");
            }
        }
    }
}
