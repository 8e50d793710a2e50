//! Decode a single diagnostic file and summarize it.

pub mod helpers;
pub mod types;

use std::path::Path;

use clap::ValueEnum;
use minipic_validation::diag::{
    Component, DiagKind, DiagnosticRecord1D, ParticleCloudRecord, read_1d_diag,
    read_particle_cloud,
};
use minipic_validation::{Error, Result};

use helpers::fingerprint;
use types::{ChannelSummary, FileSummary, Statistics};

/// How to interpret the file passed to `inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum KindArg {
    /// Infer from the file name (`diag_*.bin` or `cloud_*.bin`)
    #[default]
    Auto,
    Spectrum,
    Cloud,
}

impl KindArg {
    fn resolve(self, path: &Path) -> Result<DiagKind> {
        match self {
            KindArg::Spectrum => Ok(DiagKind::Spectrum),
            KindArg::Cloud => Ok(DiagKind::ParticleCloud),
            KindArg::Auto => DiagKind::from_file_name(path).ok_or_else(|| {
                Error::precondition(format!(
                    "cannot infer the diagnostic kind of {}; pass --kind",
                    path.display()
                ))
            }),
        }
    }
}

/// Decode `path` as `kind` and build its summary.
pub fn summarize(path: &Path, kind: KindArg) -> Result<FileSummary> {
    match kind.resolve(path)? {
        DiagKind::Spectrum => Ok(summarize_spectrum(&read_1d_diag(path)?)),
        DiagKind::ParticleCloud => Ok(summarize_cloud(&read_particle_cloud(path)?)),
    }
}

fn channel(name: impl Into<String>, values: &[f64]) -> ChannelSummary {
    ChannelSummary {
        name: name.into(),
        stats: Statistics::compute(values),
    }
}

pub fn summarize_spectrum(record: &DiagnosticRecord1D) -> FileSummary {
    FileSummary {
        kind: "spectrum",
        shape: vec![("bins", record.len())],
        channels: vec![
            channel(&record.axis_name, &record.axis),
            channel(&record.data_name, &record.data),
        ],
        derived: vec![("weighted_abs_sum".to_string(), record.weighted_abs_sum())],
        sha256: fingerprint(&[], [record.axis.as_slice(), record.data.as_slice()]),
    }
}

pub fn summarize_cloud(cloud: &ParticleCloudRecord) -> FileSummary {
    let components = [
        Component::Weight,
        Component::X,
        Component::Y,
        Component::Z,
        Component::Px,
        Component::Py,
        Component::Pz,
    ];

    let mut channels: Vec<ChannelSummary> = components
        .iter()
        .map(|&c| channel(c.name(), cloud.component(c)))
        .collect();
    channels.extend(
        cloud
            .extra
            .iter()
            .enumerate()
            .map(|(i, values)| channel(format!("extra_{i}"), values)),
    );

    let derived = components[1..]
        .iter()
        .map(|&c| (format!("abs_sum_{}", c.name()), cloud.abs_sum(c)))
        .collect();

    let hashed = components
        .iter()
        .map(|&c| cloud.component(c))
        .chain(cloud.extra.iter().map(Vec::as_slice));

    FileSummary {
        kind: "particle_cloud",
        shape: vec![
            ("particles", cloud.particle_count()),
            ("fields", cloud.field_count()),
        ],
        channels,
        derived,
        sha256: fingerprint(&cloud.id, hashed),
    }
}
