// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Whole-robot walking runs against null servo outputs.

use core::convert::Infallible;
use std::collections::BTreeSet;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use walkbot::config;
use walkbot::control::{CycleOutcome, GaitScheduler, Mode};
use walkbot::protocol::{Buttons, CommandWord};
use walkbot::radio::Mailbox;
use walkbot::time::Instant;

#[derive(Default)]
struct NullPwm;

impl ErrorType for NullPwm {
    type Error = Infallible;
}

impl SetDutyCycle for NullPwm {
    fn max_duty_cycle(&self) -> u16 {
        20_000
    }

    fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Infallible> {
        Ok(())
    }
}

struct Robot {
    gait: GaitScheduler<NullPwm>,
    now: Instant,
}

impl Robot {
    fn homed() -> Self {
        let mut gait = GaitScheduler::new(config::legs(Default::default()), config::mounts(), config::GAIT);
        let mut now = Instant::ZERO;
        gait.bring_up(now).unwrap();
        while gait.mode() != Mode::Walking {
            now = now + config::PERIOD;
            gait.cycle(CommandWord::STOP, now);
        }
        Self { gait, now }
    }

    fn stepping(&self) -> [bool; 4] {
        self.gait.legs().each_ref().map(|l| l.is_stepping())
    }

    fn tick(&mut self) -> Instant {
        self.now = self.now + config::PERIOD;
        self.now
    }

    /// Run one period and return the legs that started a step in it.
    fn cycle(&mut self, word: CommandWord) -> Vec<usize> {
        let before = self.stepping();
        let now = self.tick();
        self.gait.cycle(word, now);
        let after = self.stepping();
        (0..4).filter(|&i| after[i] && !before[i]).collect()
    }
}

#[test]
fn steady_walk_alternates_legs() {
    let mut robot = Robot::homed();
    let forward = CommandWord::new(64, 0, 0, Buttons::NONE);
    let swing = (config::STEP_PROFILE.duration.as_millis() / config::PERIOD.as_millis()) as u32;

    let mut airborne = [0u32; 4];
    let mut completed = [0u32; 4];
    let mut held = 0;
    let mut advance = 0.0f32;
    for _ in 0..4000 {
        let now = robot.tick();
        let outcome = robot.gait.cycle(forward, now);
        if outcome == CycleOutcome::Held {
            held += 1;
        }
        advance += robot.gait.last_body_delta().translation().x;

        let stepping = robot.stepping();
        assert!(stepping.iter().filter(|&&s| s).count() <= 1, "{stepping:?}");
        for (i, &s) in stepping.iter().enumerate() {
            if s {
                airborne[i] += 1;
            } else if airborne[i] > 0 {
                // Neutral again after exactly one swing.
                assert_eq!(airborne[i], swing, "leg {i}");
                completed[i] += 1;
                airborne[i] = 0;
            }
        }
    }

    for (i, n) in completed.iter().enumerate() {
        assert!(*n >= 4, "leg {i} stepped {n} times");
    }
    // Roughly one cycle in seven waits for a swing to finish.
    assert!(held < 800, "{held} held cycles");
    let commanded = 4000.0 * 0.5 * config::MAX_SPEED * config::PERIOD.as_secs_f32();
    assert!(advance > 0.75 * commanded && advance <= commanded + 1e-4, "advanced {advance}");
}

#[test]
fn turning_in_place_steps_every_leg() {
    let mut robot = Robot::homed();
    let turn = CommandWord::new(0, 0, 64, Buttons::NONE);

    let mut legs = BTreeSet::new();
    for _ in 0..2000 {
        legs.extend(robot.cycle(turn));
        assert!(robot.gait.stepping_count() <= 1);
    }
    assert_eq!(legs.len(), 4);
}

#[test]
fn random_driving_keeps_one_leg_in_the_air() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut robot = Robot::homed();

    let mut word = CommandWord::STOP;
    for i in 0..6000 {
        if i % 100 == 0 {
            let buttons = if rng.gen_ratio(1, 20) { Buttons::RESET } else { Buttons::NONE };
            word = CommandWord::new(rng.gen(), rng.gen(), rng.gen(), buttons);
        }
        robot.cycle(word);
        assert!(robot.gait.stepping_count() <= 1, "cycle {i}: {:?}", robot.stepping());
        for leg in robot.gait.legs() {
            assert!(leg.position().is_finite());
        }
    }
}

#[test]
fn lost_link_stops_the_body() {
    let mailbox = Mailbox::new(config::LINK_WATCHDOG);
    let mut robot = Robot::homed();
    mailbox.post_command(CommandWord::new(0, 100, 0, Buttons::NONE), robot.now);

    robot.cycle(mailbox.command(robot.now));
    assert!(!robot.gait.last_body_delta().is_identity());

    let silence = config::LINK_WATCHDOG.as_millis() / config::PERIOD.as_millis() + 2;
    for _ in 0..silence {
        let word = mailbox.command(robot.now);
        robot.cycle(word);
    }
    assert_eq!(mailbox.command(robot.now), CommandWord::STOP);
    assert!(robot.gait.last_body_delta().is_identity());
}
