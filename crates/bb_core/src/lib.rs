//! # bb_core - Deterministic Physics-First Baseball Simulation
//!
//! Pitch flight, bat-ball collision, batted-ball trajectories and play
//! resolution, driven by player ratings on a 0-100k scale.
//!
//! ## Features
//! - RK4 ball flight with drag crisis, Magnus lift and wind
//! - Ratings mapped to physical capabilities through logistic curves
//! - Fielding, throwing and baserunning timed on one clock
//! - Same seed, same play, byte for byte in JSON

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]
// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]

pub mod engine;
pub mod error;
pub mod models;

pub use engine::{resolve_play, simulate_at_bat_contact, AtBatSetup, PlayContext, SimConfig};
pub use error::{Result, SimError};
pub use models::{PlayOutcome, PlayResult};
