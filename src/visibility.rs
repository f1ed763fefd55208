//! Horizon and brightness filtering of catalog entries.
//!
//! An entry is visible when both predicates hold:
//!
//! - apparent elevation strictly above the horizon threshold (default 5°),
//! - magnitude at or below the limiting magnitude (default 4.0).
//!
//! Each predicate can be disabled independently. Positions for the whole
//! batch are requested from the observer in one call. An entry whose
//! position cannot be computed is left out and reported in
//! [`Visible::failures`]; the rest of the batch is unaffected.

use tracing::{debug, warn};

use crate::observe::{AltAz, Observe, ObserveError};
use crate::star::{EquatorialPosition, Star};
use crate::starcatalog::Catalog;

/// Thresholds for [`visible_stars`] and constellation visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityConfig {
    /// Entries must be strictly above this elevation (degrees). `None` keeps
    /// everything regardless of elevation.
    pub horizon_elevation_deg: Option<f64>,
    /// Faintest magnitude kept (inclusive). `None` disables the cut.
    pub limiting_magnitude: Option<f64>,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            horizon_elevation_deg: Some(5.0),
            limiting_magnitude: Some(4.0),
        }
    }
}

impl VisibilityConfig {
    pub fn with_limiting_magnitude(self, limiting_magnitude: f64) -> Self {
        Self {
            limiting_magnitude: Some(limiting_magnitude),
            ..self
        }
    }

    pub fn with_horizon_elevation(self, horizon_elevation_deg: f64) -> Self {
        Self {
            horizon_elevation_deg: Some(horizon_elevation_deg),
            ..self
        }
    }

    pub fn above_horizon(&self, altitude_deg: f64) -> bool {
        self.horizon_elevation_deg
            .map_or(true, |horizon| altitude_deg > horizon)
    }

    pub fn bright_enough(&self, mag: f64) -> bool {
        self.limiting_magnitude.map_or(true, |limit| mag <= limit)
    }
}

/// A catalog star that passed both predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleStar<'a> {
    /// Index into the catalog.
    pub index: usize,
    pub id: f32,
    pub star: &'a Star,
    pub mag: f64,
    pub altaz: AltAz,
}

/// An entry dropped because its position could not be observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserveFailure {
    /// Index into the source collection.
    pub index: usize,
    pub error: ObserveError,
}

/// Result of a visibility query, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Visible<T> {
    pub entries: Vec<T>,
    pub failures: Vec<ObserveFailure>,
}

impl<T> Visible<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }
}

/// Observe every position, padding a short reply from the observer with
/// failures so the result lines up with `positions`.
///
/// A reply with a non-finite altitude or azimuth is turned into
/// [`ObserveError::UndefinedPosition`].
pub(crate) fn observe_all<O: Observe + ?Sized>(
    observer: &O,
    positions: &[&EquatorialPosition],
    instant: &O::Instant,
) -> Vec<Result<AltAz, ObserveError>> {
    let mut results = observer.observe_many(positions, instant);
    if results.len() != positions.len() {
        warn!(
            "Observer returned {} results for {} positions",
            results.len(),
            positions.len()
        );
        results.resize_with(positions.len(), || {
            Err(ObserveError::Failed("no result returned".to_string()))
        });
    }
    results.into_iter().map(|r| r.and_then(defined)).collect()
}

fn defined(altaz: AltAz) -> Result<AltAz, ObserveError> {
    if altaz.altitude_deg.is_finite() && altaz.azimuth_deg.is_finite() {
        Ok(altaz)
    } else {
        Err(ObserveError::UndefinedPosition(format!(
            "observer returned alt={} az={}",
            altaz.altitude_deg, altaz.azimuth_deg
        )))
    }
}

/// Stars from `catalog` visible to `observer` at `instant`, in catalog order.
pub fn visible_stars<'a, O: Observe + ?Sized>(
    catalog: &'a Catalog,
    observer: &O,
    instant: &O::Instant,
    config: &VisibilityConfig,
) -> Visible<VisibleStar<'a>> {
    let positions: Vec<&EquatorialPosition> =
        catalog.stars().iter().map(|s| &s.position).collect();
    let observed = observe_all(observer, &positions, instant);

    let mut entries = Vec::new();
    let mut failures = Vec::new();
    for (index, ((id, star, mag), result)) in catalog.iter().zip(observed).enumerate() {
        let bright = config.bright_enough(mag);
        match result {
            Ok(altaz) => {
                if config.above_horizon(altaz.altitude_deg) && bright {
                    entries.push(VisibleStar {
                        index,
                        id,
                        star,
                        mag,
                        altaz,
                    });
                }
            }
            Err(error) => {
                warn!("Skipping star {}: {}", id, error);
                failures.push(ObserveFailure { index, error });
            }
        }
    }

    debug!(
        "{} of {} stars visible ({} could not be observed)",
        entries.len(),
        catalog.len(),
        failures.len()
    );
    Visible { entries, failures }
}

impl Catalog {
    /// Stars visible at `instant` with the default horizon and the given
    /// limiting magnitude.
    pub fn visible<O: Observe + ?Sized>(
        &self,
        observer: &O,
        instant: &O::Instant,
        limiting_magnitude: f64,
    ) -> Visible<VisibleStar<'_>> {
        let config = VisibilityConfig::default().with_limiting_magnitude(limiting_magnitude);
        visible_stars(self, observer, instant, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::yale::{CatalogHeader, StarRecord};

    /// Returns a fixed elevation per right ascension.
    struct Scripted(Vec<(f64, Result<f64, ObserveError>)>);

    impl Observe for Scripted {
        type Instant = ();

        fn observe(&self, target: &EquatorialPosition, _: &()) -> Result<AltAz, ObserveError> {
            let (_, elevation) = self
                .0
                .iter()
                .find(|(ra, _)| (ra - target.ra_rad()).abs() < 1e-9)
                .ok_or_else(|| ObserveError::Failed("unknown target".to_string()))?;
            elevation.clone().map(|altitude_deg| AltAz {
                altitude_deg,
                azimuth_deg: 180.0,
                distance: f64::INFINITY,
            })
        }
    }

    /// Answers with too few results.
    struct Truncating;

    impl Observe for Truncating {
        type Instant = ();

        fn observe(&self, _: &EquatorialPosition, _: &()) -> Result<AltAz, ObserveError> {
            Ok(AltAz {
                altitude_deg: 45.0,
                azimuth_deg: 0.0,
                distance: f64::INFINITY,
            })
        }

        fn observe_many(
            &self,
            targets: &[&EquatorialPosition],
            instant: &(),
        ) -> Vec<Result<AltAz, ObserveError>> {
            targets
                .iter()
                .take(1)
                .map(|t| self.observe(t, instant))
                .collect()
        }
    }

    fn catalog(entries: &[(f64, i16)]) -> Catalog {
        let records = entries
            .iter()
            .enumerate()
            .map(|(i, &(ra_rad, vmag))| StarRecord {
                catalog_id: (i + 1) as f32,
                ra_rad,
                dec_rad: 0.1,
                spectral_type: *b"G2",
                vmag,
                pm_ra: 0.0,
                pm_dec: 0.0,
            })
            .collect();
        let header = CatalogHeader {
            star0: 0,
            star1: 1,
            starn: entries.len() as i32,
            stnum: 1,
            mprop: [false; 4],
            nmag: 1,
            nbent: 32,
        };
        Catalog::from_records(header, records)
    }

    #[test]
    fn horizon_boundary_is_exclusive() {
        let cat = catalog(&[(0.1, 100), (0.2, 100), (0.3, 100)]);
        let obs = Scripted(vec![(0.1, Ok(5.0)), (0.2, Ok(5.000001)), (0.3, Ok(4.9))]);
        let visible = visible_stars(&cat, &obs, &(), &VisibilityConfig::default());
        let ids: Vec<f32> = visible.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2.0]);
        assert!(visible.failures.is_empty());
    }

    #[test]
    fn magnitude_boundary_is_inclusive() {
        let cat = catalog(&[(0.1, 400), (0.2, 401), (0.3, -100)]);
        let obs = Scripted(vec![(0.1, Ok(30.0)), (0.2, Ok(30.0)), (0.3, Ok(30.0))]);
        let visible = visible_stars(&cat, &obs, &(), &VisibilityConfig::default());
        let ids: Vec<f32> = visible.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1.0, 3.0]);
        assert_eq!(visible.entries[0].mag, 4.0);
    }

    #[test]
    fn predicates_apply_to_the_same_entries() {
        // Bright but below the horizon, and faint but high: neither is visible.
        let cat = catalog(&[(0.1, 0), (0.2, 550), (0.3, 200)]);
        let obs = Scripted(vec![(0.1, Ok(-20.0)), (0.2, Ok(60.0)), (0.3, Ok(60.0))]);
        let visible = visible_stars(&cat, &obs, &(), &VisibilityConfig::default());
        let ids: Vec<f32> = visible.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![3.0]);
        assert_eq!(visible.entries[0].index, 2);
        assert!(std::ptr::eq(visible.entries[0].star, &cat.stars()[2]));
    }

    #[test]
    fn disabled_predicates_keep_everything_observed() {
        let cat = catalog(&[(0.1, 900), (0.2, 100)]);
        let obs = Scripted(vec![(0.1, Ok(-45.0)), (0.2, Ok(10.0))]);
        let config = VisibilityConfig {
            horizon_elevation_deg: None,
            limiting_magnitude: None,
        };
        assert_eq!(visible_stars(&cat, &obs, &(), &config).len(), 2);

        let horizon_only = VisibilityConfig {
            limiting_magnitude: None,
            ..Default::default()
        };
        let ids: Vec<f32> = visible_stars(&cat, &obs, &(), &horizon_only)
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![2.0]);
    }

    #[test]
    fn observe_failure_skips_only_that_entry() {
        let cat = catalog(&[(0.1, 100), (0.2, 100), (0.3, 100)]);
        let obs = Scripted(vec![
            (0.1, Ok(20.0)),
            (
                0.2,
                Err(ObserveError::UndefinedPosition("below the Earth".to_string())),
            ),
            (0.3, Ok(20.0)),
        ]);
        let visible = visible_stars(&cat, &obs, &(), &VisibilityConfig::default());
        let ids: Vec<f32> = visible.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1.0, 3.0]);
        assert_eq!(visible.failures.len(), 1);
        assert_eq!(visible.failures[0].index, 1);
    }

    #[test]
    fn short_observer_reply_counts_as_failures() {
        let cat = catalog(&[(0.1, 100), (0.2, 100), (0.3, 100)]);
        let visible = visible_stars(&cat, &Truncating, &(), &VisibilityConfig::default());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.failures.len(), 2);
        assert_eq!(visible.failures[1].index, 2);
    }

    #[test]
    fn non_finite_elevation_is_recorded_as_failure() {
        let cat = catalog(&[(0.1, 100), (0.2, 100)]);
        let obs = Scripted(vec![(0.1, Ok(f64::NAN)), (0.2, Ok(30.0))]);
        let visible = visible_stars(&cat, &obs, &(), &VisibilityConfig::default());
        let ids: Vec<f32> = visible.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![2.0]);
        assert_eq!(visible.failures.len(), 1);
        assert_eq!(visible.failures[0].index, 0);
        assert!(matches!(
            visible.failures[0].error,
            ObserveError::UndefinedPosition(_)
        ));
    }

    #[test]
    fn observer_at_undefined_location_fails_every_star() {
        use crate::observe::{HorizonObserver, SiderealTime};

        let cat = catalog(&[(0.1, 100)]);
        let obs = HorizonObserver::new(f64::NAN, 0.0);
        let visible = cat.visible(&obs, &SiderealTime { gst_rad: 0.0 }, 4.0);
        assert!(visible.is_empty());
        assert_eq!(visible.failures.len(), 1);
        assert!(matches!(
            visible.failures[0].error,
            ObserveError::UndefinedPosition(_)
        ));
    }

    #[test]
    fn catalog_visible_uses_limit() {
        let cat = catalog(&[(0.1, 300)]);
        let obs = Scripted(vec![(0.1, Ok(10.0))]);
        assert_eq!(cat.visible(&obs, &(), 4.0).len(), 1);
        assert!(cat.visible(&obs, &(), 2.0).is_empty());
    }
}
