// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Design-time parameters of the robot.
//!
//! Leg layout, step geometry, and stability thresholds are fixed at build time. The stability
//! thresholds and the gait step fraction were tuned on the robot.

use core::f32::consts::FRAC_PI_4;
use core::time::Duration;

use embedded_hal::pwm::SetDutyCycle;

use crate::control::gait::{GaitConfig, LegMount};
use crate::control::leg::{AngleOffsets, LegConfig, LegController, LegGeometry, StepCircle, StepProfile};
use crate::math::Vector3;
use crate::motors::{Calibration, Servo};

/// Control loop period.
pub const PERIOD: Duration = Duration::from_millis(5);

/// Body speed at full stick (m/s).
pub const MAX_SPEED: f32 = 0.1;

/// Body turn rate at full stick (rad/s).
pub const MAX_TURN: f32 = 1.0;

/// Radio link watchdog.
pub const LINK_WATCHDOG: Duration = Duration::from_millis(500);

/// Controller channel this robot listens on.
pub const CONTROLLER_ID: u8 = 0;

/// Controller transmit period.
pub const CONTROLLER_PERIOD: Duration = Duration::from_millis(20);

pub const GEOMETRY: LegGeometry = LegGeometry {
    a: 0.125,
    b: 0.11,
    c: 0.0025,
    d: 0.0275,
};

pub const OFFSETS: AngleOffsets = AngleOffsets {
    theta: FRAC_PI_4,
    phi: 0.0,
    psi: 0.0,
};

pub const STEP_CIRCLE: StepCircle = StepCircle {
    center: Vector3::new(0.095, 0.095, -0.12),
    radius: 0.09,
};

pub const STEP_PROFILE: StepProfile = StepProfile {
    duration: Duration::from_millis(400),
    height: 0.05,
};

pub const LEG: LegConfig = LegConfig {
    geometry: GEOMETRY,
    offsets: OFFSETS,
    circle: STEP_CIRCLE,
    profile: STEP_PROFILE,
};

/// Hip distance from the body center along x and y (m).
pub const HIP_OFFSET: f32 = 0.0508;

/// Per-leg mirror signs `(x, y)` of the hip mounts, legs A to D.
pub const MOUNT_SIGNS: [(f32, f32); 4] = [(1.0, 1.0), (-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0)];

/// Servo calibrations, legs A to D, joints `theta`, `phi`, `psi`.
pub const CALIBRATIONS: [[Calibration; 3]; 4] = [
    [
        Calibration::new(1130, 45.0, 2080, -45.0),
        Calibration::new(1150, 70.0, 2080, -45.0),
        Calibration::new(1985, 70.0, 1055, -60.0),
    ],
    [
        Calibration::new(990, 45.0, 1940, -45.0),
        Calibration::new(1105, 70.0, 2055, -45.0),
        Calibration::new(2090, 70.0, 1150, -60.0),
    ],
    [
        Calibration::new(1930, 45.0, 860, -45.0),
        Calibration::new(1945, 70.0, 1000, -45.0),
        Calibration::new(1085, 70.0, 2005, -60.0),
    ],
    [
        Calibration::new(2020, 45.0, 1080, -45.0),
        Calibration::new(2085, 70.0, 1145, -45.0),
        Calibration::new(1070, 70.0, 2010, -60.0),
    ],
];

pub const GAIT: GaitConfig = GaitConfig {
    period: PERIOD,
    max_speed: MAX_SPEED,
    max_turn: MAX_TURN,
    stability_high: 0.015,
    stability_low: 0.007,
    step_fraction: 0.8,
    homing_fractions: [-0.6, -0.1, 0.4, 0.9],
    initial_directions: [
        Vector3::new(0.0, 0.01, 0.0),
        Vector3::new(0.0, -0.01, 0.0),
        Vector3::new(0.0, 0.01, 0.0),
        Vector3::new(0.0, -0.01, 0.0),
    ],
    initial_target: INITIAL_TARGET,
};

/// Foot position every leg is parked at before homing.
pub const INITIAL_TARGET: Vector3 = Vector3::new(0.15, 0.15, 0.05);

/// Hip mounts, legs A to D.
pub fn mounts() -> [LegMount; 4] {
    MOUNT_SIGNS.map(|(sx, sy)| LegMount::mirrored(sx, sy, Vector3::new(sx * HIP_OFFSET, sy * HIP_OFFSET, 0.0)))
}

/// One leg with the shared geometry and the given calibrations.
pub fn leg<P: SetDutyCycle>(calibration: &[Calibration; 3], outputs: [P; 3]) -> LegController<P> {
    let [theta, phi, psi] = outputs;
    LegController::new(
        LEG,
        [
            Servo::new(theta, calibration[0]),
            Servo::new(phi, calibration[1]),
            Servo::new(psi, calibration[2]),
        ],
    )
}

/// All four legs, outputs in leg order A to D.
pub fn legs<P: SetDutyCycle>(outputs: [[P; 3]; 4]) -> [LegController<P>; 4] {
    let [a, b, c, d] = outputs;
    [
        leg(&CALIBRATIONS[0], a),
        leg(&CALIBRATIONS[1], b),
        leg(&CALIBRATIONS[2], c),
        leg(&CALIBRATIONS[3], d),
    ]
}
