//! Binary diagnostic decoding.
//!
//! Two record shapes are written by the simulation: 1-D binned diagnostics
//! (`diag_*.bin`, e.g. a weighted gamma spectrum) and particle-cloud
//! snapshots (`cloud_*.bin`). The caller picks the entry point from the
//! file name; content is never sniffed.
//!
//! # Layout
//!
//! Little-endian throughout, 8-byte array elements, no magic or version.
//!
//! 1-D diagnostic:
//!
//! ```text
//! u32 axis_name_len, axis_name (UTF-8)
//! f64 axis_min, f64 axis_max
//! u64 n, n x f64 axis samples
//! u32 data_name_len, data_name (UTF-8)
//! n x f64 data values
//! ```
//!
//! Particle cloud:
//!
//! ```text
//! u64 particle_count, u32 field_count (>= 8)
//! field_count blocks of particle_count elements:
//!   id (u64), weight, x, y, z, px, py, pz (f64), extra f64 channels
//! ```
//!
//! Every declared length is checked against the bytes that remain before
//! anything is read or allocated, so a bad header fails fast instead of
//! over-reading.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::error::{Error, Result};
use crate::sum::{abs_sum, pairwise_sum_by};

/// Width of every array element on disk.
pub const ELEMENT_SIZE: usize = 8;

/// Fixed per-particle fields: id, weight, x, y, z, px, py, pz.
pub const CLOUD_BASE_FIELDS: u32 = 8;

/// Upper bound on per-particle fields. An empty cloud carries no bytes to
/// back its field count, so the header alone must be bounded.
pub const MAX_CLOUD_FIELDS: u32 = 256;

const CLOUD_HEADER_SIZE: usize = 8 + 4;

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Why a binary payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("truncated {what}: needs {needed} bytes at offset {offset}, {available} left")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{what}: declared size is {expected} bytes but {actual} bytes are present")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{what} is not valid UTF-8")]
    InvalidName { what: &'static str },

    #[error("field count {0} outside the supported range 8..=256")]
    FieldCount(u32),

    #[error("axis sample {index} ({value}) lies outside [{min}, {max}]")]
    AxisOutOfBounds {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("particle id {0} appears more than once")]
    DuplicateId(u64),

    #[error("{what} has {actual} elements, expected {expected}")]
    Inconsistent {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Which record shape a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Spectrum,
    ParticleCloud,
}

impl DiagKind {
    /// Infer the shape from the simulation's naming convention.
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if !name.ends_with(".bin") {
            return None;
        }
        if name.starts_with("cloud_") {
            Some(DiagKind::ParticleCloud)
        } else if name.starts_with("diag_") {
            Some(DiagKind::Spectrum)
        } else {
            None
        }
    }
}

/// A data channel sampled over an ordered axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRecord1D {
    pub axis_name: String,
    pub axis_min: f64,
    pub axis_max: f64,
    pub axis: Vec<f64>,
    pub data_name: String,
    pub data: Vec<f64>,
}

impl DiagnosticRecord1D {
    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Check the record invariants: equal lengths, samples within bounds.
    pub fn validate(&self) -> DecodeResult<()> {
        if self.data.len() != self.axis.len() {
            return Err(DecodeError::Inconsistent {
                what: "data values",
                expected: self.axis.len(),
                actual: self.data.len(),
            });
        }
        for (index, &value) in self.axis.iter().enumerate() {
            if !(self.axis_min <= value && value <= self.axis_max) {
                return Err(DecodeError::AxisOutOfBounds {
                    index,
                    value,
                    min: self.axis_min,
                    max: self.axis_max,
                });
            }
        }
        Ok(())
    }

    /// Sum of `|data[i] * axis[i]|` over all bins.
    pub fn weighted_abs_sum(&self) -> f64 {
        let n = self.axis.len().min(self.data.len());
        pairwise_sum_by(n, |i| (self.data[i] * self.axis[i]).abs())
    }
}

/// Per-particle channels that hold floating-point values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Weight,
    X,
    Y,
    Z,
    Px,
    Py,
    Pz,
}

impl Component {
    pub const POSITIONS: [Component; 3] = [Component::X, Component::Y, Component::Z];
    pub const MOMENTA: [Component; 3] = [Component::Px, Component::Py, Component::Pz];

    pub fn name(self) -> &'static str {
        match self {
            Component::Weight => "weight",
            Component::X => "x",
            Component::Y => "y",
            Component::Z => "z",
            Component::Px => "px",
            Component::Py => "py",
            Component::Pz => "pz",
        }
    }
}

/// All particles of one species at one timestep.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleCloudRecord {
    pub id: Vec<u64>,
    pub weight: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub pz: Vec<f64>,
    /// Channels beyond the eight fixed fields, in file order.
    pub extra: Vec<Vec<f64>>,
}

impl ParticleCloudRecord {
    pub fn particle_count(&self) -> usize {
        self.id.len()
    }

    pub fn field_count(&self) -> usize {
        CLOUD_BASE_FIELDS as usize + self.extra.len()
    }

    pub fn component(&self, component: Component) -> &[f64] {
        match component {
            Component::Weight => &self.weight,
            Component::X => &self.x,
            Component::Y => &self.y,
            Component::Z => &self.z,
            Component::Px => &self.px,
            Component::Py => &self.py,
            Component::Pz => &self.pz,
        }
    }

    /// Sum of `|value|` of one component across all particles.
    pub fn abs_sum(&self, component: Component) -> f64 {
        abs_sum(self.component(component))
    }

    /// Check the record invariants: equal lengths, unique ids.
    pub fn validate(&self) -> DecodeResult<()> {
        let expected = self.id.len();
        let channels = [
            ("weight", &self.weight),
            ("x", &self.x),
            ("y", &self.y),
            ("z", &self.z),
            ("px", &self.px),
            ("py", &self.py),
            ("pz", &self.pz),
        ];
        for (what, values) in channels {
            if values.len() != expected {
                return Err(DecodeError::Inconsistent {
                    what,
                    expected,
                    actual: values.len(),
                });
            }
        }
        for values in &self.extra {
            if values.len() != expected {
                return Err(DecodeError::Inconsistent {
                    what: "extra channel",
                    expected,
                    actual: values.len(),
                });
            }
        }
        let mut seen = HashSet::with_capacity(expected);
        for &id in &self.id {
            if !seen.insert(id) {
                return Err(DecodeError::DuplicateId(id));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Bounded little-endian cursor over an immutable payload.
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, needed: usize, what: &'static str) -> DecodeResult<&'a [u8]> {
        if needed > self.remaining() {
            return Err(DecodeError::Truncated {
                what,
                offset: self.offset,
                needed,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, what: &'static str) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn u32(&mut self, what: &'static str) -> DecodeResult<u32> {
        self.array::<4>(what).map(u32::from_le_bytes)
    }

    fn u64(&mut self, what: &'static str) -> DecodeResult<u64> {
        self.array::<8>(what).map(u64::from_le_bytes)
    }

    fn f64(&mut self, what: &'static str) -> DecodeResult<f64> {
        self.array::<8>(what).map(f64::from_le_bytes)
    }

    fn name(&mut self, what: &'static str) -> DecodeResult<String> {
        let len = self.u32(what)? as usize;
        let bytes = self.take(len, what)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidName { what })
    }

    /// Byte length of `count` elements, or a truncation error if it cannot fit.
    fn array_len(&self, count: u64, what: &'static str) -> DecodeResult<usize> {
        usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(ELEMENT_SIZE))
            .filter(|&bytes| bytes <= self.remaining())
            .ok_or(DecodeError::Truncated {
                what,
                offset: self.offset,
                needed: usize::try_from(count)
                    .unwrap_or(usize::MAX)
                    .saturating_mul(ELEMENT_SIZE),
                available: self.remaining(),
            })
    }

    fn f64_vec(&mut self, count: usize, what: &'static str) -> DecodeResult<Vec<f64>> {
        let bytes = self.take(count * ELEMENT_SIZE, what)?;
        Ok(bytes
            .chunks_exact(ELEMENT_SIZE)
            .map(|chunk| {
                let mut word = [0u8; ELEMENT_SIZE];
                word.copy_from_slice(chunk);
                f64::from_le_bytes(word)
            })
            .collect())
    }

    fn u64_vec(&mut self, count: usize, what: &'static str) -> DecodeResult<Vec<u64>> {
        let bytes = self.take(count * ELEMENT_SIZE, what)?;
        Ok(bytes
            .chunks_exact(ELEMENT_SIZE)
            .map(|chunk| {
                let mut word = [0u8; ELEMENT_SIZE];
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect())
    }

    fn finish(&self, what: &'static str) -> DecodeResult<()> {
        if self.remaining() != 0 {
            return Err(DecodeError::LengthMismatch {
                what,
                expected: self.offset,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// Decode a 1-D binned diagnostic.
pub fn decode_1d(bytes: &[u8]) -> DecodeResult<DiagnosticRecord1D> {
    let mut reader = Reader::new(bytes);

    let axis_name = reader.name("axis name")?;
    let axis_min = reader.f64("axis bounds")?;
    let axis_max = reader.f64("axis bounds")?;
    let declared = reader.u64("sample count")?;

    // Axis and data arrays share the declared count.
    let axis_bytes = reader.array_len(declared, "axis samples")?;
    let n = axis_bytes / ELEMENT_SIZE;
    let axis = reader.f64_vec(n, "axis samples")?;
    let data_name = reader.name("data name")?;
    if reader.remaining() != axis_bytes {
        return Err(DecodeError::LengthMismatch {
            what: "data values",
            expected: axis_bytes,
            actual: reader.remaining(),
        });
    }
    let data = reader.f64_vec(n, "data values")?;
    reader.finish("1-D diagnostic")?;

    let record = DiagnosticRecord1D {
        axis_name,
        axis_min,
        axis_max,
        axis,
        data_name,
        data,
    };
    record.validate()?;
    Ok(record)
}

/// Decode a particle-cloud snapshot.
pub fn decode_particle_cloud(bytes: &[u8]) -> DecodeResult<ParticleCloudRecord> {
    let mut reader = Reader::new(bytes);

    let declared = reader.u64("particle count")?;
    let field_count = reader.u32("field count")?;
    if !(CLOUD_BASE_FIELDS..=MAX_CLOUD_FIELDS).contains(&field_count) {
        return Err(DecodeError::FieldCount(field_count));
    }

    let expected = usize::try_from(declared)
        .ok()
        .and_then(|n| n.checked_mul(field_count as usize))
        .and_then(|n| n.checked_mul(ELEMENT_SIZE));
    let actual = reader.remaining();
    if expected != Some(actual) {
        return Err(DecodeError::LengthMismatch {
            what: "particle arrays",
            expected: expected.unwrap_or(usize::MAX),
            actual,
        });
    }
    let count = actual / ELEMENT_SIZE / field_count as usize;

    let id = reader.u64_vec(count, "id")?;
    let weight = reader.f64_vec(count, "weight")?;
    let x = reader.f64_vec(count, "x")?;
    let y = reader.f64_vec(count, "y")?;
    let z = reader.f64_vec(count, "z")?;
    let px = reader.f64_vec(count, "px")?;
    let py = reader.f64_vec(count, "py")?;
    let pz = reader.f64_vec(count, "pz")?;
    let extra = (CLOUD_BASE_FIELDS..field_count)
        .map(|_| reader.f64_vec(count, "extra channel"))
        .collect::<DecodeResult<Vec<_>>>()?;
    reader.finish("particle cloud")?;

    let record = ParticleCloudRecord {
        id,
        weight,
        x,
        y,
        z,
        px,
        py,
        pz,
        extra,
    };
    record.validate()?;
    Ok(record)
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a 1-D diagnostic in the layout [`decode_1d`] reads.
pub fn encode_1d(record: &DiagnosticRecord1D) -> DecodeResult<Vec<u8>> {
    record.validate()?;
    let n = record.len();
    let mut out = Vec::with_capacity(
        4 + record.axis_name.len() + 16 + 8 + 4 + record.data_name.len() + 2 * n * ELEMENT_SIZE,
    );
    push_name(&mut out, &record.axis_name, "axis name")?;
    out.extend_from_slice(&record.axis_min.to_le_bytes());
    out.extend_from_slice(&record.axis_max.to_le_bytes());
    out.extend_from_slice(&(n as u64).to_le_bytes());
    record
        .axis
        .iter()
        .for_each(|v| out.extend_from_slice(&v.to_le_bytes()));
    push_name(&mut out, &record.data_name, "data name")?;
    record
        .data
        .iter()
        .for_each(|v| out.extend_from_slice(&v.to_le_bytes()));
    Ok(out)
}

/// Encode a particle cloud in the layout [`decode_particle_cloud`] reads.
pub fn encode_particle_cloud(record: &ParticleCloudRecord) -> DecodeResult<Vec<u8>> {
    record.validate()?;
    let count = record.particle_count();
    let fields = record.field_count();
    let field_count = u32::try_from(fields).unwrap_or(u32::MAX);
    if field_count > MAX_CLOUD_FIELDS {
        return Err(DecodeError::FieldCount(field_count));
    }

    let mut out = Vec::with_capacity(CLOUD_HEADER_SIZE + count * fields * ELEMENT_SIZE);
    out.extend_from_slice(&(count as u64).to_le_bytes());
    out.extend_from_slice(&field_count.to_le_bytes());
    record
        .id
        .iter()
        .for_each(|v| out.extend_from_slice(&v.to_le_bytes()));
    let channels = [
        &record.weight,
        &record.x,
        &record.y,
        &record.z,
        &record.px,
        &record.py,
        &record.pz,
    ];
    for values in channels.into_iter().chain(record.extra.iter()) {
        values
            .iter()
            .for_each(|v| out.extend_from_slice(&v.to_le_bytes()));
    }
    Ok(out)
}

fn push_name(out: &mut Vec<u8>, name: &str, what: &'static str) -> DecodeResult<()> {
    let len = u32::try_from(name.len()).map_err(|_| DecodeError::Inconsistent {
        what,
        expected: u32::MAX as usize,
        actual: name.len(),
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

// ============================================================================
// Files
// ============================================================================

/// Read and decode a 1-D diagnostic file.
pub fn read_1d_diag(path: &Path) -> Result<DiagnosticRecord1D> {
    let bytes = read_file(path)?;
    let record = decode_1d(&bytes).map_err(|source| Error::CorruptData {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bins = record.len(), "decoded 1-D diagnostic");
    Ok(record)
}

/// Read and decode a particle-cloud file.
pub fn read_particle_cloud(path: &Path) -> Result<ParticleCloudRecord> {
    let bytes = read_file(path)?;
    let record = decode_particle_cloud(&bytes).map_err(|source| Error::CorruptData {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        particles = record.particle_count(),
        fields = record.field_count(),
        "decoded particle cloud"
    );
    Ok(record)
}

/// Read a whole file, mapping absence to [`Error::MissingFile`].
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::MissingFile {
            path: path.to_path_buf(),
        },
        _ => Error::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}
