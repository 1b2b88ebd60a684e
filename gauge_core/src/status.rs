//! Outcomes reported by the homing sequence and the run loop.

use std::fmt;

/// Stages of the homing sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingStage {
    OffsetForward,
    CoarseSeek,
    FineForward,
    FineSeek,
    MoveToInitial,
    Done,
}

impl fmt::Display for HomingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OffsetForward => "offset-forward",
            Self::CoarseSeek => "coarse-seek",
            Self::FineForward => "fine-forward",
            Self::FineSeek => "fine-seek",
            Self::MoveToInitial => "move-to-initial",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Summary of one homing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomingReport {
    /// False when the gauge is not zeroable and nothing was done.
    pub performed: bool,
    /// Steps travelled backward before the sensor fired, per seek.
    pub coarse_seek_steps: u64,
    pub fine_seek_steps: u64,
    pub final_position_steps: i64,
}

impl HomingReport {
    pub(crate) fn skipped(position: i64) -> Self {
        Self {
            performed: false,
            coarse_seek_steps: 0,
            fine_seek_steps: 0,
            final_position_steps: position,
        }
    }
}

/// Result of one run-loop tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Motor is at its target.
    Idle,
    /// Motor still has distance to go.
    Moving,
    /// The zero sensor fired outside the debounce window and the position
    /// reference was reset; `drift_steps` is how far off the old reference was.
    Rezeroed { drift_steps: i64 },
}
