//! Step index with debounced transitions
//!
//! A transition is requested now and applied later, once its delay has passed.
//! Only one transition may be pending at a time. Every request captures the
//! navigator's epoch in a [`TransitionTicket`]; completing a ticket whose epoch
//! is no longer current (because of a reset) does nothing.

use std::time::{Duration, Instant};

/// Which way a transition moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Handle for a scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTicket {
    epoch: u64,
    target: usize,
    direction: Direction,
    due: Instant,
}

impl TransitionTicket {
    /// When the transition should be applied
    pub fn due(&self) -> Instant {
        self.due
    }

    /// Index the transition moves to
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Result of asking the navigator to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Accepted; the index changes once the ticket completes
    Scheduled(TransitionTicket),
    /// Another transition is still pending
    Busy,
    /// Already at the first or terminal index
    OutOfRange,
    /// The current step has not been answered correctly yet
    Blocked,
}

impl TransitionOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, TransitionOutcome::Scheduled(_))
    }
}

/// An applied index change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepChange {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

/// Holds the authoritative step index for one exercise view
#[derive(Debug, Clone)]
pub struct StepNavigator {
    current: usize,
    total: usize,
    epoch: u64,
    pending: Option<TransitionTicket>,
    transition_delay: Duration,
}

impl StepNavigator {
    /// Start at step 0 of an exercise with `total_steps` steps
    pub fn new(total_steps: usize, transition_delay: Duration) -> Self {
        Self { current: 0, total: total_steps, epoch: 0, pending: None, transition_delay }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_steps(&self) -> usize {
        self.total
    }

    /// The index has moved past the last step
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }

    /// A transition is pending
    pub fn is_animating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<TransitionTicket> {
        self.pending
    }

    /// Request a move to the next index
    pub fn advance(&mut self, now: Instant) -> TransitionOutcome {
        if self.current >= self.total {
            return TransitionOutcome::OutOfRange;
        }
        self.schedule(self.current + 1, Direction::Forward, now)
    }

    /// Request a move to the previous index
    pub fn retreat(&mut self, now: Instant) -> TransitionOutcome {
        if self.current == 0 {
            return TransitionOutcome::OutOfRange;
        }
        self.schedule(self.current - 1, Direction::Backward, now)
    }

    fn schedule(&mut self, target: usize, direction: Direction, now: Instant) -> TransitionOutcome {
        if self.pending.is_some() {
            tracing::debug!("Ignoring {:?} transition while another is pending", direction);
            return TransitionOutcome::Busy;
        }

        self.epoch += 1;
        let ticket =
            TransitionTicket { epoch: self.epoch, target, direction, due: now + self.transition_delay };
        self.pending = Some(ticket);
        tracing::debug!("Scheduled transition {} -> {}", self.current, target);
        TransitionOutcome::Scheduled(ticket)
    }

    /// Apply a scheduled transition; stale tickets are dropped
    pub fn complete(&mut self, ticket: TransitionTicket) -> Option<StepChange> {
        if ticket.epoch != self.epoch || self.pending != Some(ticket) {
            tracing::debug!("Dropping stale transition ticket (epoch {})", ticket.epoch);
            return None;
        }

        self.pending = None;
        let change = StepChange { from: self.current, to: ticket.target, direction: ticket.direction };
        self.current = ticket.target;
        Some(change)
    }

    /// Complete the pending transition if its delay has passed
    pub fn tick(&mut self, now: Instant) -> Option<StepChange> {
        let ticket = self.pending.filter(|t| now >= t.due)?;
        self.complete(ticket)
    }

    /// Jump back to step 0 immediately, discarding any pending transition
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.pending = None;
        self.current = 0;
    }
}
