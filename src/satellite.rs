//! Satellite pass over an observer.
//!
//! Orbit propagation is delegated to a [`TrackObserver`]; this module only
//! reads the two-line element set and keeps the resulting horizon track.

use std::path::Path;

use anyhow::{bail, Context};
use tracing::info;

use crate::observe::{AltAz, ObserveError};

/// A three-line element set: name line plus the two TLE lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tle {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl Tle {
    /// Parse the first element set found in `text`.
    ///
    /// Accepts both the three-line form (name first) and bare two-line sets.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();

        let (name, line1, line2) = match lines.as_slice() {
            [l1, l2, ..] if is_tle_line(l1, '1') && is_tle_line(l2, '2') => ("", *l1, *l2),
            [name, l1, l2, ..] => (name.trim(), *l1, *l2),
            _ => bail!("expected a name line and two element lines"),
        };
        if !is_tle_line(line1, '1') {
            bail!("first element line does not start with '1 ': {line1:?}");
        }
        if !is_tle_line(line2, '2') {
            bail!("second element line does not start with '2 ': {line2:?}");
        }

        let name = name.strip_prefix("0 ").unwrap_or(name).trim().to_string();
        Ok(Self {
            name,
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }

    /// NORAD catalog number from columns 3-7 of line 1.
    pub fn norad_id(&self) -> Option<u32> {
        self.line1.get(2..7)?.trim().parse().ok()
    }
}

fn is_tle_line(line: &str, number: char) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(number) && chars.next() == Some(' ')
}

/// Propagates an element set to horizon coordinates for one observer.
pub trait TrackObserver {
    type Instant;

    /// One position per instant, in order.
    fn observe_track(
        &self,
        tle: &Tle,
        times: &[Self::Instant],
    ) -> Result<Vec<AltAz>, ObserveError>;
}

/// The path of a satellite through an observer's sky.
#[derive(Debug, Clone)]
pub struct SatellitePass<I> {
    times: Vec<I>,
    tle: Option<Tle>,
    track: Vec<AltAz>,
}

impl<I> SatellitePass<I> {
    pub fn new(times: Vec<I>) -> Self {
        Self {
            times,
            tle: None,
            track: Vec::new(),
        }
    }

    /// Load a TLE file of the satellite orbit.
    pub fn load_tle<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading TLE file {}", path.display()))?;
        let tle = Tle::parse(&text).with_context(|| format!("parsing {}", path.display()))?;
        info!("Loaded TLE for {:?} from {}", tle.name, path.display());
        self.set_tle(tle);
        Ok(())
    }

    pub fn set_tle(&mut self, tle: Tle) {
        self.tle = Some(tle);
        self.track.clear();
    }

    pub fn tle(&self) -> Option<&Tle> {
        self.tle.as_ref()
    }

    pub fn times(&self) -> &[I] {
        &self.times
    }

    /// Compute the track at every pass time.
    pub fn calc_pos<O>(&mut self, observer: &O) -> anyhow::Result<&[AltAz]>
    where
        O: TrackObserver<Instant = I> + ?Sized,
    {
        let Some(tle) = &self.tle else {
            bail!("no TLE loaded");
        };
        let track = observer.observe_track(tle, &self.times)?;
        if track.len() != self.times.len() {
            bail!(
                "observer returned {} positions for {} times",
                track.len(),
                self.times.len()
            );
        }
        self.track = track;
        Ok(&self.track)
    }

    /// Last computed track; empty until [`SatellitePass::calc_pos`] runs.
    pub fn track(&self) -> &[AltAz] {
        &self.track
    }

    /// Track points above `min_elevation_deg`, in time order.
    pub fn above(&self, min_elevation_deg: f64) -> Vec<AltAz> {
        self.track
            .iter()
            .filter(|p| p.altitude_deg > min_elevation_deg)
            .copied()
            .collect()
    }
}
