//! Types and decoders for the binary Yale Bright Star Catalog.
//!
//! The file is a 28-byte header followed by fixed 32-byte star records, all
//! big-endian. See <http://tdc-www.harvard.edu/catalogs/bsc5.html> for the
//! layout. Positions are B1950 radians and proper motions radians/year; no
//! frame conversion is applied here.

use byteorder::{BigEndian, ByteOrder};
use rkyv::{Archive, Deserialize, Serialize};
use thiserror::Error;

/// Size of the catalog header in bytes.
pub const HEADER_LEN: usize = 28;
/// Size of one star record in bytes.
pub const RECORD_LEN: usize = 32;

/// Visual magnitudes are stored as hundredths.
const MAGNITUDE_SCALE: f64 = 100.0;

/// Failure to decode a single fixed-size block.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("block truncated: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("field `{field}` is not a finite number")]
    NonFinite { field: &'static str },
}

/// Catalog file header.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct CatalogHeader {
    /// Subtract from star number to get sequence number.
    pub star0: i32,
    /// First star number in file.
    pub star1: i32,
    /// Number of stars in file.
    pub starn: i32,
    /// Star id encoding flag.
    pub stnum: i32,
    pub mprop: [bool; 4],
    /// Number of magnitudes present.
    pub nmag: i32,
    /// Number of bytes per star entry.
    pub nbent: i32,
}

impl CatalogHeader {
    /// Decode the header from the first [`HEADER_LEN`] bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            star0: BigEndian::read_i32(&bytes[0..4]),
            star1: BigEndian::read_i32(&bytes[4..8]),
            starn: BigEndian::read_i32(&bytes[8..12]),
            stnum: BigEndian::read_i32(&bytes[12..16]),
            mprop: [bytes[16] != 0, bytes[17] != 0, bytes[18] != 0, bytes[19] != 0],
            nmag: BigEndian::read_i32(&bytes[20..24]),
            nbent: BigEndian::read_i32(&bytes[24..28]),
        })
    }

    /// Encode back to the on-disk layout.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        BigEndian::write_i32(&mut bytes[0..4], self.star0);
        BigEndian::write_i32(&mut bytes[4..8], self.star1);
        BigEndian::write_i32(&mut bytes[8..12], self.starn);
        BigEndian::write_i32(&mut bytes[12..16], self.stnum);
        for (dst, flag) in bytes[16..20].iter_mut().zip(self.mprop) {
            *dst = flag as u8;
        }
        BigEndian::write_i32(&mut bytes[20..24], self.nmag);
        BigEndian::write_i32(&mut bytes[24..28], self.nbent);
        bytes
    }
}

/// One catalog entry exactly as stored on disk.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct StarRecord {
    pub catalog_id: f32,
    /// B1950 right ascension, radians.
    pub ra_rad: f64,
    /// B1950 declination, radians.
    pub dec_rad: f64,
    pub spectral_type: [u8; 2],
    /// Visual magnitude times 100.
    pub vmag: i16,
    /// Radians per year.
    pub pm_ra: f32,
    /// Radians per year.
    pub pm_dec: f32,
}

impl StarRecord {
    /// Visual magnitude.
    pub fn magnitude(&self) -> f64 {
        self.vmag as f64 / MAGNITUDE_SCALE
    }

    /// Two-letter spectral class, e.g. `"A0"`.
    pub fn spectral_type(&self) -> String {
        String::from_utf8_lossy(&self.spectral_type).into_owned()
    }

    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut bytes = [0u8; RECORD_LEN];
        BigEndian::write_f32(&mut bytes[0..4], self.catalog_id);
        BigEndian::write_f64(&mut bytes[4..12], self.ra_rad);
        BigEndian::write_f64(&mut bytes[12..20], self.dec_rad);
        bytes[20] = self.spectral_type[0];
        bytes[21] = self.spectral_type[1];
        BigEndian::write_i16(&mut bytes[22..24], self.vmag);
        BigEndian::write_f32(&mut bytes[24..28], self.pm_ra);
        BigEndian::write_f32(&mut bytes[28..32], self.pm_dec);
        bytes
    }
}

/// Decode one star record from the first [`RECORD_LEN`] bytes of `bytes`.
///
/// Field order: f32 id, f64 RA, f64 Dec, 2 × char spectral type,
/// i16 magnitude×100, f32 RA proper motion, f32 Dec proper motion.
pub fn decode_record(bytes: &[u8]) -> Result<StarRecord, DecodeError> {
    if bytes.len() < RECORD_LEN {
        return Err(DecodeError::Truncated {
            expected: RECORD_LEN,
            actual: bytes.len(),
        });
    }

    let record = StarRecord {
        catalog_id: BigEndian::read_f32(&bytes[0..4]),
        ra_rad: BigEndian::read_f64(&bytes[4..12]),
        dec_rad: BigEndian::read_f64(&bytes[12..20]),
        spectral_type: [bytes[20], bytes[21]],
        vmag: BigEndian::read_i16(&bytes[22..24]),
        pm_ra: BigEndian::read_f32(&bytes[24..28]),
        pm_dec: BigEndian::read_f32(&bytes[28..32]),
    };

    let checks = [
        ("catalog_id", record.catalog_id.is_finite()),
        ("ra_rad", record.ra_rad.is_finite()),
        ("dec_rad", record.dec_rad.is_finite()),
        ("pm_ra", record.pm_ra.is_finite()),
        ("pm_dec", record.pm_dec.is_finite()),
    ];
    if let Some(&(field, _)) = checks.iter().find(|(_, finite)| !*finite) {
        return Err(DecodeError::NonFinite { field });
    }

    Ok(record)
}
