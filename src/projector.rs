//! Horizon coordinates to polar-plot coordinates.
//!
//! The plot radius is the zenith distance (`90 - elevation`), so the zenith
//! is at the center and the horizon on the ring at 90. The plot angle is the
//! azimuth in radians; the renderer must put angle zero at north and
//! increase clockwise.

use thiserror::Error;

/// Magnitude → marker size control points.
const SIZE_CONTROL_POINTS: [(f64, f64); 6] = [
    (-1.0, 128.0),
    (0.0, 64.0),
    (1.0, 32.0),
    (2.0, 16.0),
    (3.0, 8.0),
    (4.0, 4.0),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("{azimuths} azimuths but {elevations} elevations")]
    LengthMismatch { azimuths: usize, elevations: usize },
}

/// A point on the polar plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub angle_rad: f64,
    pub radius: f64,
}

/// Plot radius for an elevation in degrees.
pub fn map_radius(elevation_deg: f64) -> f64 {
    90.0 - elevation_deg
}

pub fn project(azimuth_deg: f64, elevation_deg: f64) -> PolarPoint {
    PolarPoint {
        angle_rad: azimuth_deg.to_radians(),
        radius: map_radius(elevation_deg),
    }
}

/// Project paired azimuth/elevation sequences (degrees), preserving order.
pub fn project_many(
    azimuths_deg: &[f64],
    elevations_deg: &[f64],
) -> Result<Vec<PolarPoint>, ProjectionError> {
    if azimuths_deg.len() != elevations_deg.len() {
        return Err(ProjectionError::LengthMismatch {
            azimuths: azimuths_deg.len(),
            elevations: elevations_deg.len(),
        });
    }
    Ok(azimuths_deg
        .iter()
        .zip(elevations_deg)
        .map(|(&az, &el)| project(az, el))
        .collect())
}

/// Marker size for a star of magnitude `mag`.
///
/// Linear between the control points, each magnitude step halving the size.
/// Magnitudes outside `[-1, 4]` take the size of the nearest end point.
pub fn magnitude_to_size(mag: f64) -> f64 {
    let (first_mag, first_size) = SIZE_CONTROL_POINTS[0];
    let (last_mag, last_size) = SIZE_CONTROL_POINTS[SIZE_CONTROL_POINTS.len() - 1];
    if mag <= first_mag {
        return first_size;
    }
    if mag >= last_mag {
        return last_size;
    }
    for pair in SIZE_CONTROL_POINTS.windows(2) {
        let (m0, s0) = pair[0];
        let (m1, s1) = pair[1];
        if mag <= m1 {
            let t = (mag - m0) / (m1 - m0);
            return s0 + t * (s1 - s0);
        }
    }
    // NaN falls through every comparison.
    last_size
}

pub fn magnitudes_to_sizes(mags: &[f64]) -> Vec<f64> {
    mags.iter().copied().map(magnitude_to_size).collect()
}
