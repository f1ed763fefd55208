//! In-memory Bright Star Catalog built from the binary file.
//!
//! Loading is all-or-nothing: a short header, a body that is not a whole
//! number of records, or any record that fails to decode aborts the load
//! with a [`FormatError`] naming the offending offset or record index.
//!
//! The catalog keeps ids, converted stars, magnitudes and raw records in
//! co-indexed vectors in file order. Entry `i` of every accessor refers to
//! the same star.

use std::path::Path;

use rkyv::{Archive, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalogs::yale::{
    decode_record, CatalogHeader, DecodeError, StarRecord, HEADER_LEN, RECORD_LEN,
};
use crate::star::{star_from_record, Star};

/// The catalog file is structurally invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("file is {len} bytes, shorter than the 28-byte header")]
    BadHeader { len: usize },

    #[error("record region of {body_len} bytes is not a multiple of 32 ({remainder} trailing bytes)")]
    Misaligned { body_len: usize, remainder: usize },

    #[error("record {index} at byte offset {offset} is corrupt: {source}")]
    CorruptRecord {
        index: usize,
        offset: usize,
        #[source]
        source: DecodeError,
    },
}

/// Failure to load a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct Catalog {
    header: CatalogHeader,
    ids: Vec<f32>,
    stars: Vec<Star>,
    magnitudes: Vec<f64>,
    records: Vec<StarRecord>,
}

impl Catalog {
    /// Build the co-indexed collections from decoded records, in order.
    pub fn from_records(header: CatalogHeader, records: Vec<StarRecord>) -> Self {
        let stars: Vec<Star> = records.iter().map(star_from_record).collect();
        let ids = records.iter().map(|r| r.catalog_id).collect();
        let magnitudes = stars.iter().map(|s| s.mag).collect();
        Self {
            header,
            ids,
            stars,
            magnitudes,
            records,
        }
    }

    /// Decode a complete catalog image: header followed by records.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let header =
            CatalogHeader::decode(bytes).map_err(|_| FormatError::BadHeader { len: bytes.len() })?;
        debug!("Catalog header: {:?}", header);

        let body = &bytes[HEADER_LEN..];
        let remainder = body.len() % RECORD_LEN;
        if remainder != 0 {
            return Err(FormatError::Misaligned {
                body_len: body.len(),
                remainder,
            });
        }

        let records = decode_body(body)?;
        Ok(Self::from_records(header, records))
    }

    pub fn header(&self) -> &CatalogHeader {
        &self.header
    }

    /// Return the total number of stars in the catalog.
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Return `true` when the catalog contains no stars.
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn ids(&self) -> &[f32] {
        &self.ids
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn records(&self) -> &[StarRecord] {
        &self.records
    }

    /// Iterate `(id, star, magnitude)` in file order.
    pub fn iter(&self) -> impl Iterator<Item = (f32, &Star, f64)> + '_ {
        self.ids
            .iter()
            .zip(&self.stars)
            .zip(&self.magnitudes)
            .map(|((&id, star), &mag)| (id, star, mag))
    }
}

/// Decode every record of an aligned body, stopping at the first bad one.
fn decode_body(body: &[u8]) -> Result<Vec<StarRecord>, FormatError> {
    #[cfg(feature = "parallel")]
    let decoded: Vec<Result<StarRecord, DecodeError>> = {
        use rayon::prelude::*;
        body.par_chunks_exact(RECORD_LEN).map(decode_record).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let decoded: Vec<Result<StarRecord, DecodeError>> =
        body.chunks_exact(RECORD_LEN).map(decode_record).collect();

    decoded
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            result.map_err(|source| FormatError::CorruptRecord {
                index,
                offset: HEADER_LEN + index * RECORD_LEN,
                source,
            })
        })
        .collect()
}

/// Read and decode a binary Bright Star Catalog file.
pub fn read_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    info!("Loading star catalog from {}", path.display());
    let bytes = std::fs::read(path)?;
    let catalog = Catalog::from_bytes(&bytes)?;
    info!(
        "Loaded {} stars (header declares {})",
        catalog.len(),
        catalog.header.starn
    );
    Ok(catalog)
}

// ── Serialization ───────────────────────────────────────────────────────────

impl Catalog {
    /// Serialize the decoded catalog to bytes using rkyv.
    pub fn to_rkyv_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map_err(|e| anyhow::anyhow!("rkyv serialization failed: {}", e))?;
        Ok(bytes.to_vec())
    }

    /// Cache the decoded catalog to a file using rkyv.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let bytes = self.to_rkyv_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            "Saved catalog cache to {} ({} bytes)",
            path.as_ref().display(),
            bytes.len()
        );
        Ok(())
    }

    /// Load a catalog previously written by [`Catalog::save_to_file`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(&bytes);
        let catalog = rkyv::from_bytes::<Self, rkyv::rancor::Error>(&aligned)
            .map_err(|e| anyhow::anyhow!("rkyv deserialization failed: {}", e))?;
        info!("Loaded catalog cache: {} stars", catalog.len());
        Ok(catalog)
    }
}
