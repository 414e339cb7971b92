//! Physics constants for the baseball simulation.
//!
//! All values are SI (m, kg, s) unless the name carries a unit suffix
//! (`_FT`, `_MPH`, `_IN`, `_RPM`). The calibration anchors here are tuned so
//! that the reference hit (100 mph, 28°, 1800 rpm backspin, sea level)
//! carries roughly 395 ft.

// ============================================================
// Unit conversions
// ============================================================
pub mod units {
    pub const MPH_TO_MS: f64 = 0.44704;
    pub const MS_TO_MPH: f64 = 1.0 / MPH_TO_MS;
    pub const FT_TO_M: f64 = 0.3048;
    pub const M_TO_FT: f64 = 1.0 / FT_TO_M;
    pub const MPH_TO_FPS: f64 = 5280.0 / 3600.0;
    pub const IN_TO_M: f64 = 0.0254;
    pub const M_TO_IN: f64 = 1.0 / IN_TO_M;
    pub const MM_TO_IN: f64 = 1.0 / 25.4;
    pub const RPM_TO_RAD_S: f64 = std::f64::consts::TAU / 60.0;
}

// ============================================================
// Baseball
// ============================================================
pub mod ball {
    /// Regulation mass (kg), 5.0–5.25 oz
    pub const MASS: f64 = 0.145;

    /// Regulation diameter (m), ~2.9 in
    pub const DIAMETER: f64 = 0.074;

    pub const RADIUS: f64 = DIAMETER / 2.0;

    /// Cross-sectional area (m²)
    pub const AREA: f64 = std::f64::consts::PI * RADIUS * RADIUS;

    pub const GRAVITY: f64 = 9.81;

    /// Contact height above the ground (m)
    pub const CONTACT_HEIGHT_M: f64 = 3.0 * super::units::FT_TO_M;
}

// ============================================================
// Atmosphere
// ============================================================
pub mod air {
    /// Sea-level standard pressure (Pa)
    pub const SEA_LEVEL_PRESSURE: f64 = 101_325.0;

    /// Barometric scale height (m)
    pub const SCALE_HEIGHT: f64 = 8_400.0;

    /// Specific gas constant, dry air (J/(kg·K))
    pub const R_DRY: f64 = 287.05;

    /// Specific gas constant, water vapour (J/(kg·K))
    pub const R_VAPOR: f64 = 461.5;

    pub const DEFAULT_TEMPERATURE_F: f64 = 70.0;
    pub const DEFAULT_HUMIDITY: f64 = 0.5;
}

// ============================================================
// Aerodynamic coefficients
// ============================================================
pub mod aero {
    /// Drag coefficient in the laminar (slow) regime
    pub const CD_LOW_SPEED: f64 = 0.42;

    /// Drag coefficient past the drag crisis (fast)
    pub const CD_HIGH_SPEED: f64 = 0.33;

    /// Centre of the drag-crisis transition (m/s)
    pub const CD_TRANSITION_SPEED: f64 = 20.0;

    /// Width of the drag-crisis logistic (m/s)
    pub const CD_TRANSITION_WIDTH: f64 = 4.0;

    /// Extra Cd per rpm of total spin
    pub const SPIN_DRAG_PER_RPM: f64 = 0.00002;
    pub const SPIN_DRAG_MAX: f64 = 0.15;

    /// Extra Cd per rpm scaled by the horizontal share of the Magnus direction
    pub const TILT_DRAG_PER_RPM: f64 = 0.00001;
    pub const TILT_DRAG_MIN_FRACTION: f64 = 0.1;
    pub const TILT_DRAG_MIN_RPM: f64 = 100.0;

    /// Lift coefficient per rpm of transverse spin
    pub const CL_PER_RPM: f64 = 0.00023;

    /// Transverse spin above which lift grows at the reduced slope
    pub const CL_SATURATION_RPM: f64 = 1500.0;
    pub const CL_SATURATION_SLOPE_FACTOR: f64 = 0.1;

    /// Below these the Magnus force is zero
    pub const MIN_SPEED: f64 = 1e-6;
    pub const MIN_SPIN_RPM: f64 = 1.0;
}

// ============================================================
// Ground balls
// ============================================================
pub mod ground {
    /// Drag coefficient of the skipping flight phase
    pub const FLIGHT_CD: f64 = 0.08;

    /// Share of horizontal speed kept through the first bounce
    pub const BOUNCE_RETENTION: f64 = 0.85;

    /// Rolling deceleration on grass (ft/s²)
    pub const ROLL_DECELERATION: f64 = 12.0;
}

// ============================================================
// Integration
// ============================================================
pub mod integration {
    pub const DEFAULT_DT: f64 = 0.001;
    pub const FAST_DT: f64 = 0.002;
    pub const FINE_DT: f64 = 0.0005;
    pub const MAX_FLIGHT_TIME: f64 = 10.0;
}

// ============================================================
// Bat-ball collision
// ============================================================
pub mod collision {
    /// Collision efficiency at the sweet spot (wood bat)
    pub const Q_WOOD: f64 = 0.20;

    pub const SWEET_SPOT_PENALTY: f64 = 0.08;
    pub const SWEET_SPOT_SCALE_IN: f64 = 8.0;

    /// Linear q loss per inch of offset
    pub const OFFSET_PENALTY_PER_IN: f64 = 0.04;

    pub const VIBRATION_LOSS: f64 = 0.10;
    pub const VIBRATION_SCALE_IN: f64 = 5.0;

    /// Softplus scale for the exit-velocity floor (mph)
    pub const EV_SOFTPLUS_SCALE_MPH: f64 = 5.0;

    /// Launch-angle change per inch below centre
    pub const LAUNCH_DEG_PER_IN: f64 = 2.0;
    pub const PITCH_ANGLE_TRANSFER: f64 = 0.15;

    pub const BASE_BACKSPIN_RPM: f64 = 800.0;
    pub const BACKSPIN_PER_LAUNCH_DEG: f64 = 40.0;
    pub const BACKSPIN_REFERENCE_BAT_MPH: f64 = 70.0;
    pub const BACKSPIN_PER_IN: f64 = 200.0;
    pub const SIDESPIN_PER_IN: f64 = 300.0;
    pub const SIDESPIN_EV_FACTOR_CAP: f64 = 1.2;

    pub const BARREL_MAX_IN: f64 = 0.5;
    pub const SOLID_MAX_IN: f64 = 1.25;
    pub const FAIR_MAX_IN: f64 = 2.5;
}

// ============================================================
// Swing sampling
// ============================================================
pub mod swing {
    /// Base launch spread (deg) before the hitter's attack-angle variance
    pub const LAUNCH_SPREAD_BASE_DEG: f64 = 15.0;
    pub const LAUNCH_SPREAD_PER_VARIANCE: f64 = 2.0;

    /// Launch noise is truncated at this many sigmas
    pub const LAUNCH_SPREAD_CLAMP_SIGMA: f64 = 2.5;

    pub const TIMING_VELOCITY_REFERENCE_MPH: f64 = 80.0;
    pub const TIMING_VELOCITY_FACTOR: f64 = 0.3;

    /// Spray shift per ms of timing error (early = pull)
    pub const SPRAY_DEG_PER_MS: f64 = 1.5;
    pub const SPRAY_NOISE_DEG: f64 = 18.0;
    pub const SPRAY_LIMIT_DEG: f64 = 45.0;

    /// Bat speed loss on a badly mistimed swing, per ms beyond the window
    pub const LATE_SWING_SPEED_LOSS_PER_MS: f64 = 0.004;
    pub const TIMING_WINDOW_MS: f64 = 10.0;
}

// ============================================================
// Pitching
// ============================================================
pub mod pitch {
    pub const RUBBER_TO_PLATE_FT: f64 = 60.5;
    pub const DEFAULT_EXTENSION_FT: f64 = 6.0;
    pub const DEFAULT_RELEASE_HEIGHT_FT: f64 = 6.0 + 10.0 / 12.0;

    /// Strike zone (ft / in)
    pub const PLATE_WIDTH_IN: f64 = 17.0;
    pub const ZONE_BOTTOM_FT: f64 = 1.5;
    pub const ZONE_TOP_FT: f64 = 3.5;
    pub const ZONE_CENTER_FT: f64 = 2.5;

    pub const AIM_ITERATIONS: usize = 5;
    pub const AIM_CORRECTION: f64 = 0.9;

    /// League reference used to scale archetypes by pitcher ability
    pub const REFERENCE_VELOCITY_MPH: f64 = 93.0;
    pub const REFERENCE_SPIN_RPM: f64 = 2300.0;
    pub const REFERENCE_SPIN_EFFICIENCY: f64 = 0.88;
}

// ============================================================
// Field geometry (field frame, ft)
// ============================================================
pub mod field {
    pub const BASE_PATH_FT: f64 = 90.0;

    /// Foul lines are ±45° from straight-away centre
    pub const FOUL_LINE_DEG: f64 = 45.0;

    pub const FENCE_LINE_FT: f64 = 330.0;
    pub const FENCE_GAP_FT: f64 = 375.0;
    pub const FENCE_CENTER_FT: f64 = 400.0;

    /// Minimum apex for a ball to clear the fence
    pub const HOME_RUN_MIN_PEAK_FT: f64 = 15.0;

    /// Landing distance inside which a pop-up counts as an infield fly
    pub const INFIELD_RADIUS_FT: f64 = 150.0;
}

// ============================================================
// Fielding
// ============================================================
pub mod fielding {
    /// Fielders cruise at this share of their top speed
    pub const CRUISE_FRACTION: f64 = 0.80;

    pub const FORWARD_MAX_DEG: f64 = 45.0;
    pub const LATERAL_MAX_DEG: f64 = 135.0;
    pub const FORWARD_SPEED_FACTOR: f64 = 1.0;
    pub const LATERAL_SPEED_FACTOR: f64 = 0.88;
    pub const BACKWARD_SPEED_FACTOR: f64 = 0.75;

    /// Time to secure a ball after arrival (s)
    pub const PICKUP_TIME: f64 = 0.35;

    /// Sampling step along a ground-ball roll path (s)
    pub const INTERCEPT_SAMPLE_DT: f64 = 0.05;

    /// Pivot transfer on a relay at a middle base (s)
    pub const PIVOT_TRANSFER: f64 = 0.25;

    /// A fielder this close to a bag steps on it instead of throwing
    pub const STEP_ON_BAG_FT: f64 = 10.0;

    /// Infielders play grounders no deeper than this from home (ft)
    pub const INFIELD_REACH_FT: f64 = 165.0;
}

// ============================================================
// Catch probability
// ============================================================
pub mod catch {
    /// Logistic scale on the time margin (s)
    pub const MARGIN_SCALE: f64 = 0.2;

    pub const BACKWARD_SHIFT: f64 = 0.15;
    pub const DISTANCE_THRESHOLD_FT: f64 = 60.0;
    pub const DISTANCE_SHIFT_PER_FT: f64 = 0.004;
    pub const DISTANCE_SHIFT_MAX: f64 = 0.15;

    /// A miss with this much spare time is charged as an error
    pub const ERROR_MARGIN: f64 = 0.5;

    /// Margin credited for picking up a ball that has stopped rolling (s)
    pub const RESTING_BALL_MARGIN: f64 = 1.0;
}

// ============================================================
// Throwing
// ============================================================
pub mod throwing {
    /// Flight-time multiplier for the arc of a thrown ball
    pub const ARC_FACTOR: f64 = 1.05;

    /// Distance over which drag bleeds a thrown ball's speed by a factor of e
    /// (2m / ρ·Cd·A at sea level, ft)
    pub const DRAG_LENGTH_FT: f64 = 530.0;

    /// Throws under this many feet are lobbed at reduced speed
    pub const SHORT_THROW_FT: f64 = 40.0;
    pub const SHORT_THROW_SPEED_FACTOR: f64 = 0.7;

    /// Angular error beyond which the receiver must come off the bag (deg)
    pub const OFF_TARGET_DEG: f64 = 6.0;
    pub const OFF_TARGET_DELAY: f64 = 0.4;
}

// ============================================================
// Baserunning
// ============================================================
pub mod baserunning {
    pub const LEAD_FIRST_FT: f64 = 12.0;
    pub const LEAD_SECOND_FT: f64 = 18.0;
    pub const LEAD_THIRD_FT: f64 = 12.0;

    /// Batter drops the bat and leaves the box
    pub const BATTER_FOLLOW_THROUGH: f64 = 0.15;

    pub const SLIDE_DISTANCE_FT: f64 = 10.0;
    pub const SLIDE_DECELERATION: f64 = 30.0;

    /// Runners only try for a base if they beat the throw by this much (s)
    pub const ADVANCE_SAFETY_MARGIN: f64 = 0.3;

    /// Ties go to the runner
    pub const CLOSE_PLAY_TOLERANCE: f64 = 0.0;
}
