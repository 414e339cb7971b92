//! Play outcomes and the event log.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::runner::BaseState;
use crate::engine::collision::ContactEvent;
use crate::engine::integrator::TrajectorySummary;

/// Every way a ball in play can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayOutcome {
    FlyOut,
    LineOut,
    PopOut,
    GroundOut,
    ForceOut,
    DoublePlay,
    TriplePlay,
    InfieldFly,
    SacrificeFly,
    Single,
    Double,
    Triple,
    HomeRun,
    Error,
    FieldersChoice,
    FoulBall,
}

impl PlayOutcome {
    pub fn is_hit(self) -> bool {
        matches!(self, PlayOutcome::Single | PlayOutcome::Double | PlayOutcome::Triple | PlayOutcome::HomeRun)
    }

    /// Bases the batter is credited with on a hit.
    pub fn total_bases(self) -> u8 {
        match self {
            PlayOutcome::Single => 1,
            PlayOutcome::Double => 2,
            PlayOutcome::Triple => 3,
            PlayOutcome::HomeRun => 4,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayEventKind {
    BallHit,
    BallLanded,
    FielderAssigned,
    CatchAttempt,
    BallCaught,
    BallDropped,
    BallFielded,
    ThrowReleased,
    ThrowArrived,
    RunnerAdvanced,
    RunnerOut,
    RunScored,
    TagUp,
    HomeRun,
    FoulBall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// Seconds after contact
    pub time_s: f64,
    pub kind: PlayEventKind,
    pub payload: Value,
}

/// Append-only list of play events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayLog {
    events: Vec<PlayEvent>,
}

impl PlayLog {
    pub fn push(&mut self, time_s: f64, kind: PlayEventKind, payload: Value) {
        self.events.push(PlayEvent { time_s, kind, payload });
    }

    pub fn events(&self) -> &[PlayEvent] {
        &self.events
    }

    pub fn count(&self, kind: PlayEventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn into_events(self) -> Vec<PlayEvent> {
        self.events
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    pub outcome: PlayOutcome,
    pub runs_scored: u8,
    pub outs_recorded: u8,
    /// Occupancy after the play
    pub bases: BaseState,
    pub events: Vec<PlayEvent>,
    pub batted_ball: TrajectorySummary,
    pub contact: ContactEvent,
}
