//! Inputs for one sky-plot run.

use std::path::PathBuf;

use crate::constellation::{ConstellationError, ConstellationTable};
use crate::starcatalog::{read_catalog, Catalog, CatalogError};
use crate::visibility::VisibilityConfig;

/// Where the catalogs live and how visibility is decided.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyPassConfig {
    /// Binary Yale Bright Star Catalog.
    pub catalog_path: PathBuf,
    /// Constellation label table; no labels are drawn when `None`.
    pub constellation_path: Option<PathBuf>,
    pub visibility: VisibilityConfig,
}

impl Default for SkyPassConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/BSC5"),
            constellation_path: None,
            visibility: VisibilityConfig::default(),
        }
    }
}

impl SkyPassConfig {
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        read_catalog(&self.catalog_path)
    }

    pub fn load_constellations(&self) -> Result<ConstellationTable, ConstellationError> {
        match &self.constellation_path {
            Some(path) => ConstellationTable::load(path),
            None => Ok(ConstellationTable::default()),
        }
    }
}
