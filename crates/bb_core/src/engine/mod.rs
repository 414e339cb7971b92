//! Physics and play resolution.
//!
//! Flight is integrated in the trajectory frame (metres, x toward centre
//! field, z up). Everything on the ground (fielders, bases, roll paths) lives
//! in the field frame in feet; `coordinates` converts between the two.

pub mod aerodynamics;
pub mod attribute_mapping;
pub mod baserunning;
pub mod batted_ball;
pub mod collision;
pub mod config;
pub mod coordinates;
pub mod environment;
pub mod fielding;
pub mod ground_ball;
pub mod integrator;
pub mod physics_constants;
pub mod pitch;
pub mod play_resolution;
pub mod swing;
pub mod throwing;

pub use aerodynamics::{BallAerodynamics, SpinState};
pub use attribute_mapping::{AttributeCurve, Rating};
pub use baserunning::{is_safe, time_to_base, time_to_return, RunType};
pub use batted_ball::{simulate_batted_ball, simulate_trajectory, BattedBall, BattedBallType};
pub use collision::{collide, ContactEvent, ContactOffset, ContactQuality, SwingInput};
pub use config::{IntegrationConfig, IntegrationMode, SampleRetention, SimConfig};
pub use environment::Environment;
pub use fielding::{catch_probability, Intercept, MoveDirection};
pub use ground_ball::{simulate_ground_ball, GroundBallPath};
pub use integrator::{integrate, ForceModel, State, TrajectoryResult, TrajectorySummary};
pub use pitch::{
    simulate_pitch, simulate_pitch_on_target, Handedness, PitchResult, PitchSpec, PitchType, PlateLocation,
    ReleasePoint,
};
pub use play_resolution::{resolve_play, simulate_at_bat_contact, AtBatSetup, PlayContext, PlayPhase};
pub use swing::{sample_swing, SwingSample};
pub use throwing::Throw;
