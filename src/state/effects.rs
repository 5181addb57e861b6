// Hands out effects queued on the puzzle state, each exactly once.
use crate::model::{Effect, PuzzleState};

/// Position in `PuzzleState::outbox` up to which effects have been taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectCursor {
    taken: usize,
}

impl EffectCursor {
    /// Effects queued since the last call, oldest first.
    pub fn take_pending(&mut self, state: &PuzzleState) -> Vec<Effect> {
        let pending = state.outbox.get(self.taken..).map(<[Effect]>::to_vec).unwrap_or_default();
        self.taken = state.outbox.len();
        pending
    }
}
