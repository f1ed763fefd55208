//! # vispe
//!
//! Plot the sky track of a satellite pass over a ground observer against the
//! bright stars and constellation labels, for matching against photographs.
//!
//! The crate covers the data side of that plot:
//!
//! - **Catalog decoding** — the binary Yale Bright Star Catalog (28-byte
//!   header, 32-byte big-endian records) into co-indexed ids, stars and
//!   magnitudes, failing loudly on any structural problem
//! - **Visibility** — stars above the horizon threshold and at or brighter
//!   than the limiting magnitude, with per-star observation failures
//!   reported instead of aborting the batch
//! - **Constellations** — a comment-tolerant text table of label anchors
//! - **Projection** — azimuth/elevation to polar-plot angle/radius, and
//!   magnitude to marker size
//!
//! Apparent positions come from an [`Observe`] implementation and drawing
//! goes through a [`SkyRenderer`]; both are supplied by the caller.
//!
//! ## Example
//!
//! ```no_run
//! use vispe::{read_catalog, visible_stars, HorizonObserver, SiderealTime, VisibilityConfig};
//!
//! let catalog = read_catalog("data/BSC5").unwrap();
//! let observer = HorizonObserver::new(29.1879, -81.0483);
//! let now = SiderealTime { gst_rad: 1.234 };
//!
//! let visible = visible_stars(&catalog, &observer, &now, &VisibilityConfig::default());
//! for v in visible.iter() {
//!     println!("{} mag {:.2} alt {:.1} az {:.1}", v.id, v.mag, v.altaz.altitude_deg, v.altaz.azimuth_deg);
//! }
//! ```

pub mod angle;
/// Raw star catalogs; currently the Yale Bright Star Catalog
pub mod catalogs;
pub mod config;
pub mod constellation;
pub mod observe;
pub mod projector;
pub mod satellite;
pub mod skyplot;
pub mod star;
pub mod starcatalog;
pub mod visibility;

pub use angle::{Dms, Hms};
pub use catalogs::yale::{decode_record, CatalogHeader, DecodeError, StarRecord};
pub use config::SkyPassConfig;
pub use constellation::{
    ConstellationEntry, ConstellationError, ConstellationTable, VisibleConstellation,
};
pub use observe::{AltAz, HorizonObserver, Observe, ObserveError, SiderealTime};
pub use projector::{magnitude_to_size, project, project_many, PolarPoint, ProjectionError};
pub use satellite::{SatellitePass, Tle, TrackObserver};
pub use skyplot::{Color, RenderMode, SkyPlot, SkyRenderer};
pub use star::*;
pub use starcatalog::*;
pub use visibility::{visible_stars, ObserveFailure, Visible, VisibilityConfig, VisibleStar};
