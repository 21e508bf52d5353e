// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line accumulator for the debug terminal.
//!
//! Bytes arrive one at a time from the USART. CR or LF ends a line, backspace (BS or DEL)
//! removes the last character, and a line longer than the buffer is discarded whole.

use heapless::String;

use crate::protocol::messages::DebugCommand;

pub const LINE_CAPACITY: usize = 32;

const BS: u8 = 0x08;
const DEL: u8 = 0x7F;

pub struct LineParser {
    line: String<LINE_CAPACITY>,
    overflow: bool,
}

impl LineParser {
    pub const fn new() -> Self {
        Self {
            line: String::new(),
            overflow: false,
        }
    }

    /// Process a single incoming byte. Returns `Some(DebugCommand)` when a non-empty line ends.
    pub fn push(&mut self, byte: u8) -> Option<DebugCommand> {
        match byte {
            b'\r' | b'\n' => {
                let overflow = core::mem::replace(&mut self.overflow, false);
                let done = (!overflow && !self.line.trim().is_empty())
                    .then(|| DebugCommand::parse(&self.line));
                self.line.clear();
                done
            }
            BS | DEL => {
                self.line.pop();
                None
            }
            b' '..=b'~' => {
                if self.line.push(byte as char).is_err() {
                    self.overflow = true;
                }
                None
            }
            _ => None,
        }
    }

    /// Text of the line so far.
    pub fn pending(&self) -> &str {
        &self.line
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(p: &mut LineParser, bytes: &[u8]) -> Option<DebugCommand> {
        bytes.iter().fold(None, |last, &b| p.push(b).or(last))
    }

    #[test]
    fn crlf_yields_one_command() {
        let mut p = LineParser::new();
        assert_eq!(feed(&mut p, b"log 1 4\r"), Some(DebugCommand::Log { start: 1, end: 4 }));
        assert_eq!(p.push(b'\n'), None);
        assert_eq!(p.pending(), "");
    }

    #[test]
    fn backspace_edits() {
        let mut p = LineParser::new();
        assert_eq!(feed(&mut p, b"lex\x08g\n"), Some(DebugCommand::Legs));
        assert_eq!(feed(&mut p, b"\x7f\x7fleg\n"), Some(DebugCommand::Legs));
    }

    #[test]
    fn overlong_line_is_dropped() {
        let mut p = LineParser::new();
        let long = [b'a'; LINE_CAPACITY + 4];
        assert_eq!(feed(&mut p, &long), None);
        assert_eq!(p.push(b'\r'), None);
        assert_eq!(feed(&mut p, b"leg\r"), Some(DebugCommand::Legs));
    }

    #[test]
    fn unknown_lines_are_reported() {
        let mut p = LineParser::new();
        assert_eq!(feed(&mut p, b"help\n"), Some(DebugCommand::Unknown));
        assert_eq!(feed(&mut p, b"   \n"), None);
    }
}
