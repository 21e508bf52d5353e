// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hand-off between the radio interrupt and the control loop.
//!
//! The receive interrupt is the only producer. The control loop reads without blocking: the
//! latest command word (single slot, overwritten) and a small ring of peer packets (oldest
//! dropped on overflow). The link watchdog is a deadline rearmed on every command packet and
//! checked whenever the loop reads the command.

use core::cell::RefCell;
use core::time::Duration;

use critical_section::Mutex;
use heapless::HistoryBuffer;

use crate::protocol::CommandWord;
use crate::time::Instant;

/// Peer packets retained between reads.
pub const PEER_CAPACITY: usize = 4;

pub type PeerMessages = heapless::Vec<u32, PEER_CAPACITY>;

struct State {
    command: CommandWord,
    deadline: Option<Instant>,
    peers: HistoryBuffer<u32, PEER_CAPACITY>,
}

pub struct Mailbox {
    watchdog: Duration,
    state: Mutex<RefCell<State>>,
}

impl Mailbox {
    pub const fn new(watchdog: Duration) -> Self {
        Self {
            watchdog,
            state: Mutex::new(RefCell::new(State {
                command: CommandWord::STOP,
                deadline: None,
                peers: HistoryBuffer::new(),
            })),
        }
    }

    #[inline]
    pub fn watchdog(&self) -> Duration {
        self.watchdog
    }

    /// Replace the latest command and rearm the watchdog.
    pub fn post_command(&self, word: CommandWord, now: Instant) {
        critical_section::with(|cs| {
            let mut s = self.state.borrow_ref_mut(cs);
            s.command = word;
            s.deadline = Some(now + self.watchdog);
        });
    }

    /// Append a peer packet, overwriting the oldest when full.
    pub fn push_peer(&self, word: u32) {
        critical_section::with(|cs| self.state.borrow_ref_mut(cs).peers.write(word));
    }

    /// Latest command, or [`CommandWord::STOP`] once the watchdog has expired.
    pub fn command(&self, now: Instant) -> CommandWord {
        critical_section::with(|cs| {
            let mut s = self.state.borrow_ref_mut(cs);
            match s.deadline {
                Some(deadline) if now > deadline => {
                    warn!("link watchdog expired, stopping");
                    s.command = CommandWord::STOP;
                    s.deadline = None;
                }
                _ => {}
            }
            s.command
        })
    }

    /// No command packet within the watchdog window (or none ever received).
    pub fn is_stale(&self, now: Instant) -> bool {
        critical_section::with(|cs| match self.state.borrow_ref(cs).deadline {
            Some(deadline) => now > deadline,
            None => true,
        })
    }

    /// Buffered peer packets, oldest first.
    pub fn peer_messages(&self) -> PeerMessages {
        critical_section::with(|cs| self.state.borrow_ref(cs).peers.oldest_ordered().copied().collect())
    }

    /// Buffered peer packets, oldest first, emptying the ring.
    pub fn take_peer_messages(&self) -> PeerMessages {
        critical_section::with(|cs| {
            let mut s = self.state.borrow_ref_mut(cs);
            let out = s.peers.oldest_ordered().copied().collect();
            s.peers.clear();
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATCHDOG: Duration = Duration::from_millis(500);

    #[test]
    fn starts_stopped_and_stale() {
        let mb = Mailbox::new(WATCHDOG);
        assert_eq!(mb.command(Instant::ZERO), CommandWord::STOP);
        assert!(mb.is_stale(Instant::ZERO));
    }

    #[test]
    fn command_zeroes_after_watchdog() {
        let mb = Mailbox::new(WATCHDOG);
        let word = CommandWord(0x0000_0040);
        mb.post_command(word, Instant::from_millis(10));

        assert_eq!(mb.command(Instant::from_millis(510)), word);
        assert!(!mb.is_stale(Instant::from_millis(510)));
        assert_eq!(mb.command(Instant::from_millis(511)), CommandWord::STOP);
        assert!(mb.is_stale(Instant::from_millis(511)));
    }

    #[test]
    fn new_packet_rearms_deadline() {
        let mb = Mailbox::new(WATCHDOG);
        let word = CommandWord(0x0000_4000);
        mb.post_command(CommandWord(1), Instant::from_millis(0));
        mb.post_command(word, Instant::from_millis(400));
        assert_eq!(mb.command(Instant::from_millis(800)), word);
        assert_eq!(mb.command(Instant::from_millis(901)), CommandWord::STOP);
    }

    #[test]
    fn peer_ring_drops_oldest() {
        let mb = Mailbox::new(WATCHDOG);
        for word in 1..=6 {
            mb.push_peer(word);
        }
        assert_eq!(mb.peer_messages().as_slice(), &[3, 4, 5, 6]);
        assert_eq!(mb.take_peer_messages().as_slice(), &[3, 4, 5, 6]);
        assert!(mb.peer_messages().is_empty());
    }
}
