//! Apparent horizon coordinates of sky positions.
//!
//! The visibility filters do not compute apparent positions themselves; they
//! call an [`Observe`] implementation that captures the observer's location
//! and the time model. A full ephemeris service (light time, aberration,
//! precession) is expected to implement this trait outside the crate.
//! [`HorizonObserver`] is a geometric implementation that treats catalog
//! coordinates as of-date, which is enough for plotting bright stars.

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

use crate::star::EquatorialPosition;

/// Apparent horizon coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltAz {
    /// Elevation above the horizon, degrees.
    pub altitude_deg: f64,
    /// Degrees clockwise from geographic north, in `[0, 360)`.
    pub azimuth_deg: f64,
    /// Distance to the object; `f64::INFINITY` for fixed stars.
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObserveError {
    #[error("apparent position is undefined: {0}")]
    UndefinedPosition(String),

    #[error("observation failed: {0}")]
    Failed(String),
}

/// Source of apparent positions for one observer.
pub trait Observe {
    /// Time representation understood by the implementation.
    type Instant;

    fn observe(
        &self,
        target: &EquatorialPosition,
        instant: &Self::Instant,
    ) -> Result<AltAz, ObserveError>;

    /// Observe many targets at one instant.
    ///
    /// Returns one result per target, in order. Implementations with a
    /// per-call setup cost should override this.
    fn observe_many(
        &self,
        targets: &[&EquatorialPosition],
        instant: &Self::Instant,
    ) -> Vec<Result<AltAz, ObserveError>> {
        targets.iter().map(|t| self.observe(t, instant)).collect()
    }
}

/// Greenwich sidereal time, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiderealTime {
    pub gst_rad: f64,
}

/// Observer on the Earth's surface; longitude positive east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonObserver {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl HorizonObserver {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Rotation from the hour-angle frame (x: meridian, y: west, z: pole)
    /// to the horizon frame (x: south, y: west, z: zenith).
    fn horizon_rotation(&self) -> Matrix3<f64> {
        let (sin_lat, cos_lat) = self.latitude_deg.to_radians().sin_cos();
        Matrix3::new(
            sin_lat, 0.0, -cos_lat, //
            0.0, 1.0, 0.0, //
            cos_lat, 0.0, sin_lat,
        )
    }

    fn local_sidereal_rad(&self, instant: &SiderealTime) -> f64 {
        instant.gst_rad + self.longitude_deg.to_radians()
    }

    fn project(&self, rotation: &Matrix3<f64>, lst: f64, target: &EquatorialPosition) -> AltAz {
        let hour_angle = lst - target.ra_rad();
        let (sin_ha, cos_ha) = hour_angle.sin_cos();
        let (sin_dec, cos_dec) = target.dec_rad().sin_cos();
        let v = rotation * Vector3::new(cos_dec * cos_ha, cos_dec * sin_ha, sin_dec);

        AltAz {
            altitude_deg: v.z.clamp(-1.0, 1.0).asin().to_degrees(),
            azimuth_deg: (-v.y).atan2(-v.x).to_degrees().rem_euclid(360.0),
            distance: f64::INFINITY,
        }
    }

    fn check_finite(
        &self,
        target: &EquatorialPosition,
        instant: &SiderealTime,
    ) -> Result<(), ObserveError> {
        if !self.latitude_deg.is_finite() || !self.longitude_deg.is_finite() {
            return Err(ObserveError::UndefinedPosition(format!(
                "non-finite observer location lat={} lon={}",
                self.latitude_deg, self.longitude_deg
            )));
        }
        check_finite_target(target, instant)
    }
}

fn check_finite_target(
    target: &EquatorialPosition,
    instant: &SiderealTime,
) -> Result<(), ObserveError> {
    if !target.ra_rad().is_finite() || !target.dec_rad().is_finite() {
        return Err(ObserveError::UndefinedPosition(format!(
            "non-finite coordinates ra={} dec={}",
            target.ra, target.dec
        )));
    }
    if !instant.gst_rad.is_finite() {
        return Err(ObserveError::UndefinedPosition(
            "non-finite sidereal time".to_string(),
        ));
    }
    Ok(())
}

impl Observe for HorizonObserver {
    type Instant = SiderealTime;

    fn observe(
        &self,
        target: &EquatorialPosition,
        instant: &SiderealTime,
    ) -> Result<AltAz, ObserveError> {
        self.check_finite(target, instant)?;
        Ok(self.project(&self.horizon_rotation(), self.local_sidereal_rad(instant), target))
    }

    fn observe_many(
        &self,
        targets: &[&EquatorialPosition],
        instant: &SiderealTime,
    ) -> Vec<Result<AltAz, ObserveError>> {
        let rotation = self.horizon_rotation();
        let lst = self.local_sidereal_rad(instant);
        targets
            .iter()
            .map(|t| -> Result<AltAz, ObserveError> {
                self.check_finite(t, instant)?;
                Ok(self.project(&rotation, lst, t))
            })
            .collect()
    }
}
