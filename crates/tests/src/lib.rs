//! Integration test harness for miniPIC validation.
//!
//! [`DiagsFixture`] writes a synthetic simulation output directory into a
//! temporary working directory. The files are byte-compatible with the
//! decoder and, as written by [`DiagsFixture::thermal_heavy`], reproduce the
//! `thermal_heavy` golden values exactly, so a test can start from a passing
//! run and break one thing at a time.

use std::fs;
use std::path::{Path, PathBuf};

use minipic_validation::config::DEFAULT_OUTPUT_DIR;
use minipic_validation::diag::{
    DiagnosticRecord1D, ParticleCloudRecord, encode_1d, encode_particle_cloud,
};
use minipic_validation::scenarios::thermal_heavy::{
    CloudSums, FINAL_ITERATION, FieldScalars, GOLDEN, OUTPUT_ITERATIONS, SPECIES, SpeciesScalars,
    ThermalHeavy, cloud_file, species_file, spectrum_file,
};
use minipic_validation::scenario::ValidationScenario;
use tempfile::TempDir;

/// A temporary working directory holding a `diags` output directory.
pub struct DiagsFixture {
    dir: TempDir,
}

impl DiagsFixture {
    /// Working directory with an empty `diags`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::create_dir(dir.path().join(DEFAULT_OUTPUT_DIR)).expect("failed to create diags");
        Self { dir }
    }

    /// Working directory whose `diags` passes `thermal_heavy` at any threshold.
    pub fn thermal_heavy() -> Self {
        let fixture = Self::empty();

        // Placeholders first; the scenario only checks that they exist.
        for name in ThermalHeavy::default().manifest().files() {
            fixture.write_text(name, "");
        }

        for species in 0..SPECIES {
            fixture.write_text(
                &species_file(species),
                &species_table(
                    &GOLDEN.initial_species[species],
                    &GOLDEN.final_species[species],
                ),
            );

            for (i, &iteration) in OUTPUT_ITERATIONS.iter().enumerate() {
                fixture.write_spectrum(
                    &spectrum_file(species, iteration),
                    &spectrum(GOLDEN.gamma_spectrum[species][i]),
                );
                fixture.write_cloud(
                    &cloud_file(species, iteration),
                    &cloud(&GOLDEN.initial_clouds[species]),
                );
            }
            fixture.write_cloud(
                &cloud_file(species, FINAL_ITERATION),
                &cloud(&GOLDEN.final_clouds[species]),
            );
        }

        fixture.write_text("fields.txt", &fields_table(&GOLDEN.final_fields));
        fixture
    }

    /// The working directory to hand to the dispatcher.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn diags(&self) -> PathBuf {
        self.dir.path().join(DEFAULT_OUTPUT_DIR)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.diags().join(name)
    }

    pub fn write_text(&self, name: &str, contents: &str) {
        fs::write(self.path(name), contents).expect("failed to write text file");
    }

    pub fn write_bytes(&self, name: &str, bytes: &[u8]) {
        fs::write(self.path(name), bytes).expect("failed to write binary file");
    }

    pub fn write_spectrum(&self, name: &str, record: &DiagnosticRecord1D) {
        let bytes = encode_1d(record).expect("invalid spectrum record");
        self.write_bytes(name, &bytes);
    }

    pub fn write_cloud(&self, name: &str, record: &ParticleCloudRecord) {
        let bytes = encode_particle_cloud(record).expect("invalid cloud record");
        self.write_bytes(name, &bytes);
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.path(name)).expect("failed to remove file");
    }

    /// Remove the whole `diags` directory.
    pub fn remove_diags(&self) {
        fs::remove_dir_all(self.diags()).expect("failed to remove diags");
    }
}

/// Single-bin spectrum whose weighted sum is exactly `value` (`value >= 0`).
pub fn spectrum(value: f64) -> DiagnosticRecord1D {
    DiagnosticRecord1D {
        axis_name: "gamma".to_string(),
        axis_min: 0.0,
        axis_max: 2.0,
        axis: vec![1.0],
        data_name: "weight".to_string(),
        data: vec![value],
    }
}

/// Single-particle cloud whose component sums are exactly `sums`.
pub fn cloud(sums: &CloudSums) -> ParticleCloudRecord {
    let [x, y, z] = sums.positions;
    let [px, py, pz] = sums.momenta;
    ParticleCloudRecord {
        id: vec![0],
        weight: vec![1.0],
        x: vec![x],
        y: vec![y],
        z: vec![z],
        px: vec![px],
        py: vec![py],
        pz: vec![pz],
        extra: Vec::new(),
    }
}

/// A species summary file with a header, the given first and last rows,
/// and one row in between.
pub fn species_table(first: &SpeciesScalars, last: &SpeciesScalars) -> String {
    let middle = (first.iteration + last.iteration) / 2;
    format!(
        "it npart kinetic_energy\n{} {} {}\n{} {} {}\n{} {} {}\n",
        first.iteration,
        first.particles,
        first.energy,
        middle,
        first.particles,
        (first.energy + last.energy) / 2.0,
        last.iteration,
        last.particles,
        last.energy,
    )
}

/// A field energy file with a header, a zero first row, and `last` as the
/// final row.
pub fn fields_table(last: &FieldScalars) -> String {
    let values: Vec<String> = last.components.iter().map(f64::to_string).collect();
    format!(
        "it Ex Ey Ez Bx By Bz\n0 0 0 0 0 0 0\n\n{} {}\n",
        last.iteration,
        values.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_contains_manifest() {
        let fixture = DiagsFixture::thermal_heavy();
        let manifest = ThermalHeavy::default().manifest();
        assert!(manifest.verify(&fixture.diags()).is_ok());
    }

    #[test]
    fn test_species_table_round_trips_values() {
        let table = species_table(&GOLDEN.initial_species[0], &GOLDEN.final_species[0]);
        let last = table.lines().last().unwrap();
        let energy: f64 = last.split_whitespace().nth(2).unwrap().parse().unwrap();
        assert_eq!(energy, GOLDEN.final_species[0].energy);
    }

    #[test]
    fn test_helpers_reproduce_sums() {
        assert_eq!(spectrum(2.5).weighted_abs_sum(), 2.5);
        let sums = &GOLDEN.final_clouds[1];
        assert_eq!(
            cloud(sums).abs_sum(minipic_validation::diag::Component::Pz),
            sums.momenta[2]
        );
    }
}
