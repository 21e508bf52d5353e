// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Debug terminal commands.
//!
//! | Line | Command |
//! | ---- | ------- |
//! | `leg` | foot position of every leg |
//! | `log` | whole data log |
//! | `log N` | data log entry `N` |
//! | `log N M` | data log entries `N..=M` |

use crate::diag::data_log::CAPACITY as LOG_CAPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    Legs,
    Log { start: usize, end: usize },
    Unknown,
}

impl DebugCommand {
    /// Parse one line, surrounding whitespace ignored.
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        match words.next() {
            Some("leg") if words.next().is_none() => Self::Legs,
            Some("log") => {
                let args = (words.next(), words.next(), words.next());
                match args {
                    (None, _, _) => Self::Log {
                        start: 0,
                        end: LOG_CAPACITY - 1,
                    },
                    (Some(n), None, _) => match n.parse() {
                        Ok(n) => Self::Log { start: n, end: n },
                        Err(_) => Self::Unknown,
                    },
                    (Some(n), Some(m), None) => match (n.parse(), m.parse()) {
                        (Ok(start), Ok(end)) => Self::Log { start, end },
                        _ => Self::Unknown,
                    },
                    _ => Self::Unknown,
                }
            }
            _ => Self::Unknown,
        }
    }
}
