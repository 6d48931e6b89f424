// ABOUTME: Phase debouncing: a candidate phase commits only after persisting N frames
// ABOUTME: Suppresses single-frame noise from flipping a grader's state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// A committed phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition<P> {
    /// Phase before the change
    pub from: P,
    /// Phase after the change
    pub to: P,
}

/// Commits a candidate phase once it has recurred for `required` consecutive frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStabilizer<P> {
    initial: P,
    committed: P,
    pending: Option<(P, u32)>,
    required: u32,
}

impl<P: Copy + PartialEq> PhaseStabilizer<P> {
    /// Start committed to `initial`; `required` below 1 is treated as 1
    #[must_use]
    pub fn new(initial: P, required: u32) -> Self {
        Self {
            initial,
            committed: initial,
            pending: None,
            required: required.max(1),
        }
    }

    /// Feed this frame's candidate
    ///
    /// `commit_immediately` skips the stability count, used when leaving an
    /// initial or invalid phase. A candidate equal to the committed phase
    /// cancels any pending change.
    pub fn observe(&mut self, candidate: P, commit_immediately: bool) -> Option<PhaseTransition<P>> {
        if candidate == self.committed {
            self.pending = None;
            return None;
        }

        let count = match self.pending {
            Some((pending, count)) if pending == candidate => count + 1,
            _ => 1,
        };
        if commit_immediately || count >= self.required {
            return Some(self.force(candidate));
        }
        self.pending = Some((candidate, count));
        None
    }

    /// Commit `phase` now, bypassing the stability count
    pub fn force(&mut self, phase: P) -> PhaseTransition<P> {
        let transition = PhaseTransition {
            from: self.committed,
            to: phase,
        };
        self.committed = phase;
        self.pending = None;
        transition
    }

    /// Return to the initial phase with nothing pending
    pub fn reset(&mut self) {
        self.committed = self.initial;
        self.pending = None;
    }

    /// Currently committed phase
    #[must_use]
    pub const fn committed(&self) -> P {
        self.committed
    }

    /// Candidate awaiting commitment and how many frames it has persisted
    #[must_use]
    pub const fn pending(&self) -> Option<(P, u32)> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Toy {
        Start,
        A,
        B,
    }

    #[test]
    fn test_commits_after_required_frames() {
        let mut stabilizer = PhaseStabilizer::new(Toy::A, 3);
        assert_eq!(stabilizer.observe(Toy::B, false), None);
        assert_eq!(stabilizer.observe(Toy::B, false), None);
        assert_eq!(
            stabilizer.observe(Toy::B, false),
            Some(PhaseTransition { from: Toy::A, to: Toy::B })
        );
        assert_eq!(stabilizer.committed(), Toy::B);
    }

    #[test]
    fn test_single_frame_spike_is_ignored() {
        let mut stabilizer = PhaseStabilizer::new(Toy::A, 2);
        assert_eq!(stabilizer.observe(Toy::B, false), None);
        assert_eq!(stabilizer.observe(Toy::A, false), None);
        assert_eq!(stabilizer.pending(), None);
        assert_eq!(stabilizer.observe(Toy::B, false), None);
        assert_eq!(stabilizer.committed(), Toy::A);
    }

    #[test]
    fn test_immediate_commit() {
        let mut stabilizer = PhaseStabilizer::new(Toy::Start, 5);
        let transition = stabilizer.observe(Toy::A, true);
        assert_eq!(transition, Some(PhaseTransition { from: Toy::Start, to: Toy::A }));
    }

    #[test]
    fn test_reset_returns_to_initial() {
        let mut stabilizer = PhaseStabilizer::new(Toy::Start, 1);
        stabilizer.observe(Toy::A, false);
        stabilizer.observe(Toy::B, false);
        stabilizer.reset();
        assert_eq!(stabilizer.committed(), Toy::Start);
        assert_eq!(stabilizer.pending(), None);
    }
}
