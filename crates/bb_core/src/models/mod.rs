pub mod attributes;
pub mod field;
pub mod fielder;
pub mod play;
pub mod runner;
pub mod spin;

pub use attributes::{
    FielderAttributes, FielderProfile, HitterAttributes, HitterProfile, PitcherAttributes, PitcherProfile,
    RunnerAttributes, RunnerProfile,
};
pub use field::{Base, DefensivePosition, FieldPoint};
pub use fielder::{Defense, Fielder};
pub use play::{PlayEvent, PlayEventKind, PlayLog, PlayOutcome, PlayResult};
pub use runner::{BaseRunner, BaseState};
pub use spin::SpinVector;
