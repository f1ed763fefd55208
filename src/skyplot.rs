//! Sky plot composition on top of an external polar renderer.
//!
//! [`SkyPlot`] turns visible stars, constellations and satellite tracks into
//! polar coordinates with [`crate::projector`] and hands them to a
//! [`SkyRenderer`], which owns the actual drawing surface.

use std::f64::consts::PI;
use std::path::Path;

use tracing::debug;

use crate::constellation::VisibleConstellation;
use crate::observe::AltAz;
use crate::projector::{magnitude_to_size, project, PolarPoint};
use crate::visibility::VisibleStar;

/// Radius of the compass labels, just outside the horizon ring.
const CARDINAL_RADIUS: f64 = 95.0;

/// Spacing of the labeled elevation rings, degrees.
const RING_STEP_DEG: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const RED: Color = Color([255, 0, 0]);
    pub const BLUE: Color = Color([0, 0, 255]);
    pub const DARK_GRAY: Color = Color([169, 169, 169]);
    pub const GRAY: Color = Color([128, 128, 128]);
}

/// Whether the renderer may open a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Headless,
    Interactive,
}

/// Drawing surface for a polar sky plot.
///
/// Angles are radians from north, clockwise; radii are zenith distances in
/// degrees.
pub trait SkyRenderer {
    fn add_points(&mut self, points: &[PolarPoint], sizes: Option<&[f64]>, color: Color);

    fn add_track_line(&mut self, points: &[PolarPoint], width: f64, color: Color);

    fn add_labeled_point(&mut self, point: PolarPoint, text: &str);

    /// Label the rings at the given plot radii.
    fn set_radial_labels(&mut self, labels: &[(f64, String)]);

    fn save(&mut self, path: &Path) -> anyhow::Result<()>;

    fn show(&mut self) -> anyhow::Result<()>;

    /// Release the drawing surface.
    fn close(&mut self) -> anyhow::Result<()>;
}

pub struct SkyPlot<R> {
    name: String,
    mode: RenderMode,
    renderer: R,
}

impl<R: SkyRenderer> SkyPlot<R> {
    /// Create a plot, label the elevation rings and draw the N/E/S/W labels.
    pub fn new(name: impl Into<String>, mode: RenderMode, renderer: R) -> Self {
        let mut plot = Self {
            name: name.into(),
            mode,
            renderer,
        };
        plot.renderer.set_radial_labels(&elevation_ring_labels());
        for (i, label) in ["N", "E", "S", "W"].iter().enumerate() {
            let point = PolarPoint {
                angle_rad: i as f64 * PI / 2.0,
                radius: CARDINAL_RADIUS,
            };
            plot.renderer.add_labeled_point(point, label);
        }
        plot
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Plain points at fixed size.
    pub fn add_points(&mut self, positions: &[AltAz], size: f64, color: Color) {
        let points = to_polar(positions);
        let sizes = vec![size; points.len()];
        self.renderer.add_points(&points, Some(&sizes), color);
    }

    /// Stars sized by magnitude.
    pub fn add_stars(&mut self, stars: &[VisibleStar<'_>]) {
        let points: Vec<PolarPoint> = stars
            .iter()
            .map(|s| project(s.altaz.azimuth_deg, s.altaz.altitude_deg))
            .collect();
        let sizes: Vec<f64> = stars.iter().map(|s| magnitude_to_size(s.mag)).collect();
        debug!("Plotting {} stars on {}", points.len(), self.name);
        self.renderer
            .add_points(&points, Some(&sizes), Color::DARK_GRAY);
    }

    /// Satellite track as a line.
    pub fn add_sat(&mut self, track: &[AltAz], color: Color) {
        self.renderer.add_track_line(&to_polar(track), 1.5, color);
    }

    /// Thick line for emphasizing part of a track.
    pub fn add_sat_highlight(&mut self, track: &[AltAz], color: Color) {
        self.renderer.add_track_line(&to_polar(track), 6.0, color);
    }

    /// Constellation abbreviations at their anchors.
    pub fn add_constellations(&mut self, constellations: &[VisibleConstellation<'_>]) {
        for c in constellations {
            let point = project(c.altaz.azimuth_deg, c.altaz.altitude_deg);
            self.renderer
                .add_labeled_point(point, &c.entry.abbreviation);
        }
    }

    pub fn save_fig<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
        self.renderer.save(path.as_ref())
    }

    pub fn close_fig(&mut self) -> anyhow::Result<()> {
        debug!("Closing plot {}", self.name);
        self.renderer.close()
    }

    /// Display the plot; does nothing in headless mode.
    pub fn show(&mut self) -> anyhow::Result<()> {
        match self.mode {
            RenderMode::Headless => {
                debug!("Headless plot {}: show() skipped", self.name);
                Ok(())
            }
            RenderMode::Interactive => self.renderer.show(),
        }
    }
}

/// Rings at plot radius 0, 10, .., 80 labeled with their elevation.
fn elevation_ring_labels() -> Vec<(f64, String)> {
    (0..90)
        .step_by(RING_STEP_DEG as usize)
        .map(|radius| (f64::from(radius), (90 - radius).to_string()))
        .collect()
}

fn to_polar(positions: &[AltAz]) -> Vec<PolarPoint> {
    positions
        .iter()
        .map(|p| project(p.azimuth_deg, p.altitude_deg))
        .collect()
}
