// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debug terminal.
//!
//! Feeds received bytes through a [`LineParser`] and renders the reply of each completed
//! command into any [`core::fmt::Write`] sink (the USART on the board, a `String` in tests).

use core::fmt::{self, Write};

use embedded_hal::pwm::SetDutyCycle;

use crate::control::gait::{GaitScheduler, LEG_NAMES};
use crate::diag::data_log::DataLog;
use crate::protocol::{DebugCommand, LineParser};

pub struct Terminal {
    parser: LineParser,
}

impl Terminal {
    pub const fn new() -> Self {
        Self {
            parser: LineParser::new(),
        }
    }

    /// Take one received byte and answer if it completed a command.
    pub fn push_byte<P: SetDutyCycle, W: Write>(
        &mut self,
        byte: u8,
        gait: &GaitScheduler<P>,
        log: &DataLog,
        out: &mut W,
    ) -> fmt::Result {
        match self.parser.push(byte) {
            Some(cmd) => Self::execute(cmd, gait, log, out),
            None => Ok(()),
        }
    }

    /// Render the reply to `cmd`.
    pub fn execute<P: SetDutyCycle, W: Write>(
        cmd: DebugCommand,
        gait: &GaitScheduler<P>,
        log: &DataLog,
        out: &mut W,
    ) -> fmt::Result {
        match cmd {
            DebugCommand::Legs => {
                for (name, leg) in LEG_NAMES.iter().zip(gait.legs()) {
                    let p = leg.target();
                    write!(out, "{} = [{:.4}\t{:.4}\t{:.4}]\r\n", name, p.x, p.y, p.z)?;
                }
            }
            DebugCommand::Log { start, end } => {
                for i in start..=end {
                    // Entries past the fill level have nothing to show.
                    let Some(sample) = log.get(i) else { break };
                    write!(out, "{:4}: {:.6}\r\n", i, sample)?;
                }
            }
            DebugCommand::Unknown => out.write_str("unknown command\r\n")?,
        }
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::motors::servo::testing::RecordingPwm;
    use std::string::String;

    fn gait() -> GaitScheduler<RecordingPwm> {
        GaitScheduler::new(config::legs(Default::default()), config::mounts(), config::GAIT)
    }

    fn type_line(term: &mut Terminal, line: &str, gait: &GaitScheduler<RecordingPwm>, log: &DataLog) -> String {
        let mut out = String::new();
        for b in line.bytes() {
            term.push_byte(b, gait, log, &mut out).unwrap();
        }
        out
    }

    #[test]
    fn leg_lists_every_foot() {
        let mut g = gait();
        g.park().unwrap();
        let out = type_line(&mut Terminal::new(), "leg\r", &g, &DataLog::new());

        let lines: std::vec::Vec<&str> = out.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "A = [0.1500\t0.1500\t0.0500]");
        assert!(lines[3].starts_with("D = "));
    }

    #[test]
    fn log_range_stops_at_fill_level() {
        let mut log = DataLog::new();
        log.push(0.25);
        log.push(0.5);
        let g = gait();
        let mut term = Terminal::new();

        assert_eq!(type_line(&mut term, "log 1\n", &g, &log), "   1: 0.500000\r\n");
        assert_eq!(
            type_line(&mut term, "log\n", &g, &log),
            "   0: 0.250000\r\n   1: 0.500000\r\n"
        );
        assert_eq!(type_line(&mut term, "log 5 9\n", &g, &log), "");
    }

    #[test]
    fn unknown_and_partial_lines() {
        let g = gait();
        let log = DataLog::new();
        let mut term = Terminal::new();

        assert_eq!(type_line(&mut term, "lgo", &g, &log), "");
        assert_eq!(type_line(&mut term, "\r", &g, &log), "unknown command\r\n");
        assert_eq!(type_line(&mut term, "legx\x08\n", &g, &log).lines().count(), 4);
    }
}
