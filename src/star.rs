use rkyv::{Archive, Deserialize, Serialize};

use crate::angle::{Dms, Hms};
use crate::catalogs::yale::StarRecord;

/// Milliarcseconds per radian.
const MAS_PER_RAD: f64 = 180.0 / std::f64::consts::PI * 3600.0 * 1000.0;

/// A fixed point on the celestial sphere, in the units the observer expects.
///
/// Stars and constellation label anchors both reduce to this.
#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct EquatorialPosition {
    pub ra: Hms,
    pub dec: Dms,
    /// Proper motion in right ascension, milliarcseconds/year.
    pub pm_ra_mas_per_year: f64,
    /// Proper motion in declination, milliarcseconds/year.
    pub pm_dec_mas_per_year: f64,
}

impl EquatorialPosition {
    /// Position without proper motion.
    pub fn fixed(ra: Hms, dec: Dms) -> Self {
        Self {
            ra,
            dec,
            pm_ra_mas_per_year: 0.0,
            pm_dec_mas_per_year: 0.0,
        }
    }

    pub fn ra_rad(&self) -> f64 {
        self.ra.to_radians()
    }

    pub fn dec_rad(&self) -> f64 {
        self.dec.to_radians()
    }

    /// Unit vector pointing to the position on the celestial sphere.
    pub fn uvec(&self) -> nalgebra::Vector3<f64> {
        let (rasin, racos) = self.ra_rad().sin_cos();
        let (decsin, deccos) = self.dec_rad().sin_cos();
        nalgebra::Vector3::new(deccos * racos, deccos * rasin, decsin)
    }
}

/// A catalog star in catalog-independent units.
///
/// Coordinates are whatever epoch the source catalog used (B1950 for the
/// Yale catalog); no precession is applied.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Star {
    pub id: f32,
    pub position: EquatorialPosition,
    pub mag: f64,
}

/// Convert a raw catalog record to a [`Star`].
///
/// Radians become hours/degrees and radians/year become milliarcseconds/year.
pub fn star_from_record(record: &StarRecord) -> Star {
    Star {
        id: record.catalog_id,
        position: EquatorialPosition {
            ra: Hms::from_radians(record.ra_rad),
            dec: Dms::from_radians(record.dec_rad),
            pm_ra_mas_per_year: record.pm_ra as f64 * MAS_PER_RAD,
            pm_dec_mas_per_year: record.pm_dec as f64 * MAS_PER_RAD,
        },
        mag: record.magnitude(),
    }
}
