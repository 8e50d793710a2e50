//! `thermal_heavy`: two species in a thermal plasma, 200 iterations,
//! diagnostics every 50 iterations.

use linkme::distributed_slice;
use tracing::info;

use crate::compare::Operator;
use crate::diag::Component;
use crate::error::Result;
use crate::manifest::{Manifest, iteration_file};
use crate::registry::{SCENARIOS, ScenarioDescriptor};
use crate::scenario::{ScenarioContext, ValidationScenario};

pub const NAME: &str = "thermal_heavy";

pub const SPECIES: usize = 2;

/// Iterations with field, spectrum, and cloud output.
pub const OUTPUT_ITERATIONS: [u32; 4] = [0, 50, 100, 150];

pub const FINAL_ITERATION: u32 = 200;

const FIELD_NAMES: [&str; 6] = ["Ex", "Ey", "Ez", "Bx", "By", "Bz"];

/// Species summary columns: iteration, particle count, kinetic energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesScalars {
    pub iteration: u64,
    pub particles: f64,
    pub energy: f64,
}

/// `fields.txt` at the final iteration; components in Ex, Ey, Ez, Bx, By, Bz order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScalars {
    pub iteration: u64,
    pub components: [f64; 6],
}

/// Sums of `|value|` over one cloud snapshot, x, y, z then px, py, pz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudSums {
    pub positions: [f64; 3],
    pub momenta: [f64; 3],
}

/// Reference values recorded from a trusted run.
#[derive(Debug, Clone, PartialEq)]
pub struct Golden {
    pub initial_species: [SpeciesScalars; SPECIES],
    pub final_species: [SpeciesScalars; SPECIES],
    pub final_fields: FieldScalars,
    /// Weighted gamma spectrum sums, per species and output iteration
    pub gamma_spectrum: [[f64; OUTPUT_ITERATIONS.len()]; SPECIES],
    /// Spectra are compared tighter than the user threshold
    pub spectrum_tolerance: f64,
    pub initial_clouds: [CloudSums; SPECIES],
    pub final_clouds: [CloudSums; SPECIES],
}

pub const GOLDEN: Golden = Golden {
    initial_species: [
        SpeciesScalars {
            iteration: 0,
            particles: 16777216.0,
            energy: 1.499952252449287e-07,
        },
        SpeciesScalars {
            iteration: 0,
            particles: 16777216.0,
            energy: 1.499979783958965e-07,
        },
    ],
    final_species: [
        SpeciesScalars {
            iteration: 200,
            particles: 16777216.0,
            energy: 1.499958286027602e-07,
        },
        SpeciesScalars {
            iteration: 200,
            particles: 16777216.0,
            energy: 1.499977885488740e-07,
        },
    ],
    final_fields: FieldScalars {
        iteration: 200,
        components: [
            2.661456444853063e-17,
            2.494703374240188e-17,
            2.660089866321201e-17,
            4.000475322163436e-18,
            2.515068854661692e-18,
            1.968836182669220e-18,
        ],
    },
    gamma_spectrum: [
        [
            1.0150597401850308e-05,
            1.0150597529179078e-05,
            1.0150598273792077e-05,
            1.0150598116635371e-05,
        ],
        [
            1.0001580020106392e-05,
            1.0001580020341790e-05,
            1.0001580020415498e-05,
            1.0001580020473257e-05,
        ],
    ],
    spectrum_tolerance: 1e-13,
    initial_clouds: [
        CloudSums {
            positions: [8388609.273422275, 8388608.223742893, 8388607.295782689],
            momenta: [1345277.1638367819, 1345287.6357619246, 1345276.2842692742],
        },
        CloudSums {
            positions: [8388609.273422275, 8388608.223742893, 8388607.295782689],
            momenta: [31239.48867078933, 31240.339148407398, 31239.83530535533],
        },
    ],
    final_clouds: [
        CloudSums {
            positions: [8388690.182898799, 8388869.37299231, 8388436.356830236],
            momenta: [1345284.9369570762, 1345278.656959498, 1345277.0503750877],
        },
        CloudSums {
            positions: [8387715.472760824, 8387134.949183166, 8388681.588967344],
            momenta: [31239.5389402392, 31240.227334379924, 31239.731722495122],
        },
    ],
};

pub fn species_file(species: usize) -> String {
    format!("species_{species:02}.txt")
}

pub fn spectrum_file(species: usize, iteration: u32) -> String {
    iteration_file(&format!("diag_w_gamma_s{species:02}"), iteration, "bin")
}

pub fn cloud_file(species: usize, iteration: u32) -> String {
    iteration_file(&format!("cloud_s{species:02}"), iteration, "bin")
}

/// The `thermal_heavy` scenario.
#[derive(Debug, Clone)]
pub struct ThermalHeavy {
    golden: Golden,
}

impl Default for ThermalHeavy {
    fn default() -> Self {
        Self::new(GOLDEN)
    }
}

impl ThermalHeavy {
    pub fn new(golden: Golden) -> Self {
        Self { golden }
    }

    pub fn golden(&self) -> &Golden {
        &self.golden
    }

    fn check_species(&self, ctx: &mut ScenarioContext) -> Result<()> {
        info!("checking scalars");

        for species in 0..SPECIES {
            let file = species_file(species);
            let table = ctx.read_scalars(&file)?;

            let passes = [
                (
                    "First",
                    "Initial",
                    table.first_row()?,
                    &self.golden.initial_species[species],
                ),
                (
                    "Last",
                    "Final",
                    table.last_row()?,
                    &self.golden.final_species[species],
                ),
            ];
            for (position, stage, row, reference) in passes {
                let particles = table.value(row, 0)?;
                let energy = table.value(row, 1)?;
                info!(
                    species,
                    iteration = row.iteration,
                    particles,
                    energy,
                    "{stage} scalars for species"
                );

                ctx.check_equal(
                    row.iteration as f64,
                    reference.iteration as f64,
                    format!("{position} iteration in species_{species}.txt is not correct"),
                )?;
                ctx.check_equal(
                    particles,
                    reference.particles,
                    format!("Number of particles in {file} is not correct"),
                )?;
                ctx.check_relative(
                    energy,
                    reference.energy,
                    format!("Kinetic energy in {file} is not correct"),
                )?;
            }
        }
        Ok(())
    }

    fn check_fields(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let table = ctx.read_scalars("fields.txt")?;
        let row = table.last_row()?;
        let reference = &self.golden.final_fields;

        let mut components = [0.0; 6];
        for (column, slot) in components.iter_mut().enumerate() {
            *slot = table.value(row, column)?;
        }
        info!(
            iteration = row.iteration,
            ?components,
            "field values at final iteration"
        );

        ctx.check_equal(
            row.iteration as f64,
            reference.iteration as f64,
            "Last iteration in fields.txt is not correct",
        )?;

        // Catches numerical instability: exploding fields.
        for ((name, value), expected) in FIELD_NAMES
            .iter()
            .zip(components)
            .zip(reference.components)
        {
            ctx.check_relative(
                value,
                expected,
                format!("{name} value at it {} in fields.txt is not correct", row.iteration),
            )?;
        }
        Ok(())
    }

    fn check_spectra(&self, ctx: &mut ScenarioContext) -> Result<()> {
        info!("checking gamma spectrums");

        for species in 0..SPECIES {
            let mut sums = Vec::with_capacity(OUTPUT_ITERATIONS.len());
            for &iteration in &OUTPUT_ITERATIONS {
                let record = ctx.read_spectrum(&spectrum_file(species, iteration))?;
                sums.push(record.weighted_abs_sum());
            }
            info!(species, ?sums, "gamma spectrum sums");

            for ((iteration, sum), reference) in OUTPUT_ITERATIONS
                .iter()
                .zip(sums)
                .zip(self.golden.gamma_spectrum[species])
            {
                ctx.check(
                    sum,
                    reference,
                    self.golden.spectrum_tolerance,
                    Operator::Relative,
                    format!(
                        "Gamma spectrum for species {species} at iteration {iteration} not similar"
                    ),
                )?;
            }
        }
        Ok(())
    }

    fn check_clouds(
        &self,
        ctx: &mut ScenarioContext,
        iteration: u32,
        golden: &[CloudSums; SPECIES],
    ) -> Result<()> {
        info!(iteration, "checking cloud files");

        for (species, reference) in golden.iter().enumerate() {
            let file = cloud_file(species, iteration);
            let cloud = ctx.read_cloud(&file)?;

            let positions = Component::POSITIONS.map(|c| cloud.abs_sum(c));
            let momenta = Component::MOMENTA.map(|c| cloud.abs_sum(c));
            info!(species, ?positions, ?momenta, "cloud sums");

            for ((component, sum), expected) in Component::POSITIONS
                .iter()
                .zip(positions)
                .zip(reference.positions)
            {
                ctx.check_relative(
                    sum,
                    expected,
                    format!("Sum over {} positions not similar in {file}", component.name()),
                )?;
            }
            for ((component, sum), expected) in Component::MOMENTA
                .iter()
                .zip(momenta)
                .zip(reference.momenta)
            {
                ctx.check_relative(
                    sum,
                    expected,
                    format!("Sum over {} not similar in {file}", component.name()),
                )?;
            }
        }
        Ok(())
    }
}

impl ValidationScenario for ThermalHeavy {
    fn name(&self) -> &str {
        NAME
    }

    fn manifest(&self) -> Manifest {
        let mut manifest = Manifest::new()
            .series(
                &[
                    "Ex",
                    "Ey",
                    "Ez",
                    "Bx",
                    "By",
                    "Bz",
                    "diag_x_y_z_d_s00",
                    "diag_x_y_z_d_s01",
                    "diag_px_py_pz_d_s00",
                    "diag_px_py_pz_d_s01",
                ],
                &OUTPUT_ITERATIONS,
                "vtk",
            )
            .series(
                &["cloud_s00", "cloud_s01", "diag_w_gamma_s00", "diag_w_gamma_s01"],
                &OUTPUT_ITERATIONS,
                "bin",
            );
        // The cloud phase also reads the final snapshot.
        for species in 0..SPECIES {
            manifest = manifest.file(cloud_file(species, FINAL_ITERATION));
        }
        manifest
            .file("fields.txt")
            .file(species_file(0))
            .file(species_file(1))
    }

    fn validate(&self, ctx: &mut ScenarioContext) -> Result<()> {
        self.check_species(ctx)?;
        self.check_fields(ctx)?;
        self.check_spectra(ctx)?;
        self.check_clouds(ctx, 0, &self.golden.initial_clouds)?;
        self.check_clouds(ctx, FINAL_ITERATION, &self.golden.final_clouds)
    }
}

fn build() -> Box<dyn ValidationScenario> {
    Box::new(ThermalHeavy::default())
}

#[distributed_slice(SCENARIOS)]
static THERMAL_HEAVY: ScenarioDescriptor = ScenarioDescriptor {
    name: NAME,
    summary: "Two-species thermal plasma, 200 iterations",
    build,
};
