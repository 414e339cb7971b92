//! Atmospheric conditions for a single game.
//!
//! Air density is derived once at construction from temperature, altitude and
//! humidity and is read-only afterwards. Wind is a field-frame vector in mph.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::coordinates;
use super::physics_constants::air;
use crate::error::{ensure_finite, Result, SimError};

/// Serialized form; the derived density is recomputed on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentParams {
    pub temperature_f: f64,
    pub altitude_ft: f64,
    pub relative_humidity: f64,
    #[serde(default)]
    pub wind_mph: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnvironmentParams", into = "EnvironmentParams")]
pub struct Environment {
    temperature_f: f64,
    altitude_ft: f64,
    relative_humidity: f64,
    wind_mph: Vector3<f64>,
    air_density: f64,
}

impl Environment {
    /// Still air at the given conditions.
    ///
    /// Fails with `SimError::Configuration` for non-finite inputs, humidity
    /// outside `[0, 1]`, temperatures below absolute zero, or any combination
    /// that yields a non-positive density.
    pub fn new(temperature_f: f64, altitude_ft: f64, relative_humidity: f64) -> Result<Self> {
        ensure_finite("temperature_f", temperature_f)?;
        ensure_finite("altitude_ft", altitude_ft)?;
        ensure_finite("relative_humidity", relative_humidity)?;
        if !(0.0..=1.0).contains(&relative_humidity) {
            return Err(SimError::config(
                "relative_humidity",
                format!("must be in [0, 1], got {relative_humidity}"),
            ));
        }

        let air_density = air_density(temperature_f, altitude_ft, relative_humidity)?;
        Ok(Self {
            temperature_f,
            altitude_ft,
            relative_humidity,
            wind_mph: Vector3::zeros(),
            air_density,
        })
    }

    pub fn with_wind(mut self, wind_mph: Vector3<f64>) -> Result<Self> {
        for c in wind_mph.iter() {
            ensure_finite("wind_mph", *c)?;
        }
        self.wind_mph = wind_mph;
        Ok(self)
    }

    /// Sea level, 70°F, 50% RH, no wind
    pub fn standard() -> Self {
        Self::fixed(air::DEFAULT_TEMPERATURE_F, 0.0, air::DEFAULT_HUMIDITY)
    }

    /// Denver, 5200 ft
    pub fn coors_field() -> Self {
        Self::fixed(air::DEFAULT_TEMPERATURE_F, 5200.0, 0.3)
    }

    /// Boston, near sea level and humid
    pub fn fenway_park() -> Self {
        Self::fixed(air::DEFAULT_TEMPERATURE_F, 20.0, 0.6)
    }

    // Presets use constants known to produce a valid density.
    fn fixed(temperature_f: f64, altitude_ft: f64, relative_humidity: f64) -> Self {
        let air_density = density_unchecked(temperature_f, altitude_ft, relative_humidity);
        Self {
            temperature_f,
            altitude_ft,
            relative_humidity,
            wind_mph: Vector3::zeros(),
            air_density,
        }
    }

    pub fn air_density(&self) -> f64 {
        self.air_density
    }

    pub fn temperature_f(&self) -> f64 {
        self.temperature_f
    }

    pub fn altitude_ft(&self) -> f64 {
        self.altitude_ft
    }

    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity
    }

    pub fn wind_mph(&self) -> &Vector3<f64> {
        &self.wind_mph
    }

    /// Wind in the trajectory frame (m/s).
    pub fn wind_trajectory_ms(&self) -> Vector3<f64> {
        coordinates::field_mph_to_trajectory_ms(&self.wind_mph)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<EnvironmentParams> for Environment {
    type Error = SimError;

    fn try_from(p: EnvironmentParams) -> Result<Self> {
        Environment::new(p.temperature_f, p.altitude_ft, p.relative_humidity)?
            .with_wind(Vector3::from(p.wind_mph))
    }
}

impl From<Environment> for EnvironmentParams {
    fn from(e: Environment) -> Self {
        Self {
            temperature_f: e.temperature_f,
            altitude_ft: e.altitude_ft,
            relative_humidity: e.relative_humidity,
            wind_mph: [e.wind_mph.x, e.wind_mph.y, e.wind_mph.z],
        }
    }
}

/// Moist-air density (kg/m³).
pub fn air_density(temperature_f: f64, altitude_ft: f64, relative_humidity: f64) -> Result<f64> {
    let rho = density_unchecked(temperature_f, altitude_ft, relative_humidity);
    if !rho.is_finite() || rho <= 0.0 {
        return Err(SimError::config(
            "air_density",
            format!(
                "non-physical density {rho} (T={temperature_f}°F, alt={altitude_ft}ft, RH={relative_humidity})"
            ),
        ));
    }
    Ok(rho)
}

fn density_unchecked(temperature_f: f64, altitude_ft: f64, relative_humidity: f64) -> f64 {
    let t_c = (temperature_f - 32.0) * 5.0 / 9.0;
    let t_k = t_c + 273.15;
    let altitude_m = altitude_ft * 0.3048;

    let pressure = air::SEA_LEVEL_PRESSURE * (-altitude_m / air::SCALE_HEIGHT).exp();
    let e_sat = 611.2 * (17.67 * t_c / (t_c + 243.5)).exp();
    let e = relative_humidity * e_sat;

    (pressure - e) / (air::R_DRY * t_k) + e / (air::R_VAPOR * t_k)
}
