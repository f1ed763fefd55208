//! Sexagesimal angles used for equatorial coordinates.
//!
//! Right ascension is carried as hours/minutes/seconds ([`Hms`]) and
//! declination as degrees/arcminutes/arcseconds ([`Dms`]). Both convert to
//! and from radians without loss beyond floating-point rounding.
//!
//! Declination keeps its sign on the degrees component only. Minutes and
//! seconds are always non-negative, so a southern declination between 0°
//! and -1° is stored with `degrees == -0.0`; use [`Dms::is_negative`]
//! rather than comparing `degrees < 0.0`.

use std::f64::consts::PI;
use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

const HOURS_PER_RADIAN: f64 = 12.0 / PI;

/// Right ascension as hours, minutes and seconds of time.
#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct Hms {
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Hms {
    /// Build from the two-component "H M" form used by the constellation table.
    pub fn from_components(hours: f64, minutes: f64) -> Self {
        Self {
            hours,
            minutes,
            seconds: 0.0,
        }
    }

    /// Convert an angle in radians, wrapped into `[0h, 24h)`.
    pub fn from_radians(rad: f64) -> Self {
        let mut total = (rad * HOURS_PER_RADIAN).rem_euclid(24.0);
        // rem_euclid rounds tiny negative inputs up to exactly 24.
        if total >= 24.0 {
            total = 0.0;
        }
        let hours = total.floor();
        let rem_minutes = (total - hours) * 60.0;
        let minutes = rem_minutes.floor();
        let seconds = (rem_minutes - minutes) * 60.0;
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Decimal hours.
    pub fn to_hours(&self) -> f64 {
        self.hours + self.minutes / 60.0 + self.seconds / 3600.0
    }

    pub fn to_radians(&self) -> f64 {
        self.to_hours() / HOURS_PER_RADIAN
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}h {:02}m {:05.2}s",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Declination as signed degrees, arcminutes and arcseconds.
#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct Dms {
    /// Whole degrees; carries the sign of the whole angle (including `-0.0`).
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    /// Build from the two-component "D M" form used by the constellation table.
    ///
    /// The sign of `degrees` applies to the minutes as well, so
    /// `from_components(-0.0, 30.0)` is half a degree south.
    pub fn from_components(degrees: f64, minutes: f64) -> Self {
        Self {
            degrees,
            minutes: minutes.abs(),
            seconds: 0.0,
        }
    }

    pub fn from_radians(rad: f64) -> Self {
        let total = rad.to_degrees();
        let negative = total < 0.0;
        let abs = total.abs();
        let whole = abs.floor();
        let rem_minutes = (abs - whole) * 60.0;
        let minutes = rem_minutes.floor();
        let seconds = (rem_minutes - minutes) * 60.0;
        Self {
            degrees: if negative { -whole } else { whole },
            minutes,
            seconds,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.degrees.is_sign_negative()
    }

    /// Signed decimal degrees.
    pub fn to_degrees(&self) -> f64 {
        let magnitude = self.degrees.abs() + self.minutes / 60.0 + self.seconds / 3600.0;
        if self.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn to_radians(&self) -> f64 {
        self.to_degrees().to_radians()
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { '-' } else { '+' };
        write!(
            f,
            "{}{:02}° {:02}' {:04.1}\"",
            sign,
            self.degrees.abs(),
            self.minutes,
            self.seconds
        )
    }
}
