//! End-to-end tests of the validation dispatcher against synthetic output.
//!
//! Each test starts from a `diags` directory that passes `thermal_heavy`
//! and breaks exactly one thing.

use linkme::distributed_slice;
use minipic_tests::{DiagsFixture, cloud, spectrum, species_table};
use minipic_validation::compare::Operator;
use minipic_validation::manifest::Manifest;
use minipic_validation::registry::{self, SCENARIOS, ScenarioDescriptor};
use minipic_validation::report::ValidationReport;
use minipic_validation::scenarios::thermal_heavy::{GOLDEN, SpeciesScalars};
use minipic_validation::{
    Error, EvaluationMode, Result, ScenarioContext, ValidationConfig, ValidationScenario,
    exit_code, run,
};

fn config() -> ValidationConfig {
    ValidationConfig::default()
}

/// Two species, two rows each, three checks per row; fields; four spectra
/// per species; two cloud snapshots per species with six sums each.
const THERMAL_HEAVY_CHECKS: usize = 2 * 2 * 3 + 7 + 2 * 4 + 2 * 2 * 6;

fn perturbed_energy(species: usize, factor: f64) -> String {
    let last = SpeciesScalars {
        energy: GOLDEN.final_species[species].energy * factor,
        ..GOLDEN.final_species[species]
    };
    species_table(&GOLDEN.initial_species[species], &last)
}

#[test]
fn test_thermal_heavy_passes() {
    let fixture = DiagsFixture::thermal_heavy();
    let result = run("thermal_heavy", Some(fixture.root()), &config());
    assert_eq!(exit_code(&result), 0);

    let report = result.unwrap();
    assert!(report.passed);
    assert!(report.failure.is_none());
    assert_eq!(report.checks.len(), THERMAL_HEAVY_CHECKS);
    assert!(report.checks.iter().all(|c| c.error == Some(0.0)));

    let spectra: Vec<_> = report
        .checks
        .iter()
        .filter(|c| c.label.starts_with("Gamma spectrum"))
        .collect();
    assert_eq!(spectra.len(), 8);
    assert!(spectra.iter().all(|c| c.threshold == 1e-13));
}

#[test]
fn test_checks_run_in_phase_order() {
    let fixture = DiagsFixture::thermal_heavy();
    let report = run("thermal_heavy", Some(fixture.root()), &config()).unwrap();

    let labels: Vec<&str> = report.checks.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels[0], "First iteration in species_0.txt is not correct");
    assert_eq!(report.checks[0].operator, Operator::Equal);
    let fields = labels
        .iter()
        .position(|l| l.starts_with("Last iteration in fields.txt"))
        .unwrap();
    let spectra = labels
        .iter()
        .position(|l| l.starts_with("Gamma spectrum"))
        .unwrap();
    let clouds = labels.iter().position(|l| l.starts_with("Sum over")).unwrap();
    assert!(fields < spectra && spectra < clouds);
    assert!(labels.last().unwrap().ends_with("cloud_s01_200.bin"));
}

#[test]
fn test_energy_drift_fails_relative_check() {
    let fixture = DiagsFixture::thermal_heavy();
    fixture.write_text("species_00.txt", &perturbed_energy(0, 1.0 + 1e-6));

    let err = run("thermal_heavy", Some(fixture.root()), &config()).unwrap_err();
    match &err {
        Error::ThresholdExceeded {
            label, operator, ..
        } => {
            assert_eq!(label, "Kinetic energy in species_00.txt is not correct");
            assert_eq!(*operator, Operator::Relative);
        }
        other => panic!("expected threshold failure, got {other:?}"),
    }
    assert!(err.is_comparison_failure());
}

#[test]
fn test_looser_threshold_accepts_drift() {
    let fixture = DiagsFixture::thermal_heavy();
    fixture.write_text("species_01.txt", &perturbed_energy(1, 1.0 + 1e-6));

    let config = config().with_threshold(1e-5);
    assert!(run("thermal_heavy", Some(fixture.root()), &config).is_ok());
}

#[test]
fn test_particle_count_must_match_exactly() {
    let fixture = DiagsFixture::thermal_heavy();
    let last = SpeciesScalars {
        particles: GOLDEN.final_species[1].particles - 1.0,
        ..GOLDEN.final_species[1]
    };
    fixture.write_text(
        "species_01.txt",
        &species_table(&GOLDEN.initial_species[1], &last),
    );

    // A huge threshold does not loosen an exact check.
    let config = config().with_threshold(1.0);
    let err = run("thermal_heavy", Some(fixture.root()), &config).unwrap_err();
    match err {
        Error::ExactMismatch { label, error, .. } => {
            assert_eq!(label, "Number of particles in species_01.txt is not correct");
            assert_eq!(error, 1.0);
        }
        other => panic!("expected exact mismatch, got {other:?}"),
    }
}

#[test]
fn test_spectrum_uses_fixed_tolerance() {
    let fixture = DiagsFixture::thermal_heavy();
    let drifted = GOLDEN.gamma_spectrum[1][2] * (1.0 + 1e-11);
    fixture.write_spectrum("diag_w_gamma_s01_100.bin", &spectrum(drifted));

    let config = config().with_threshold(1e-6);
    let err = run("thermal_heavy", Some(fixture.root()), &config).unwrap_err();
    match err {
        Error::ThresholdExceeded {
            label, threshold, ..
        } => {
            assert_eq!(
                label,
                "Gamma spectrum for species 1 at iteration 100 not similar"
            );
            assert_eq!(threshold, 1e-13);
        }
        other => panic!("expected threshold failure, got {other:?}"),
    }
}

#[test]
fn test_final_cloud_momentum_drift() {
    let fixture = DiagsFixture::thermal_heavy();
    let mut sums = GOLDEN.final_clouds[0];
    sums.momenta[0] += 1.0;
    fixture.write_cloud("cloud_s00_200.bin", &cloud(&sums));

    let err = run("thermal_heavy", Some(fixture.root()), &config()).unwrap_err();
    match err {
        Error::ThresholdExceeded { label, .. } => {
            assert_eq!(label, "Sum over px not similar in cloud_s00_200.bin");
        }
        other => panic!("expected threshold failure, got {other:?}"),
    }
}

#[test]
fn test_missing_file_reported_before_any_comparison() {
    let fixture = DiagsFixture::thermal_heavy();
    // Would fail the very first comparison if it were reached.
    fixture.write_text("species_00.txt", &perturbed_energy(0, 2.0));
    fixture.remove("diag_px_py_pz_d_s01_150.vtk");

    let err = run("thermal_heavy", Some(fixture.root()), &config()).unwrap_err();
    match &err {
        Error::MissingFile { path } => assert!(path.ends_with("diag_px_py_pz_d_s01_150.vtk")),
        other => panic!("expected missing file, got {other:?}"),
    }
    assert_eq!(err.kind(), "missing_resource");
}

#[test]
fn test_missing_final_cloud_is_an_existence_failure() {
    let fixture = DiagsFixture::thermal_heavy();
    fixture.remove("cloud_s01_200.bin");

    let err = run("thermal_heavy", Some(fixture.root()), &config()).unwrap_err();
    assert!(matches!(err, Error::MissingFile { .. }));
}

#[test]
fn test_truncated_cloud_is_corrupt() {
    let fixture = DiagsFixture::thermal_heavy();
    let path = fixture.path("cloud_s00_000.bin");
    let bytes = std::fs::read(&path).unwrap();
    fixture.write_bytes("cloud_s00_000.bin", &bytes[..bytes.len() - 3]);

    let err = run("thermal_heavy", Some(fixture.root()), &config()).unwrap_err();
    match &err {
        Error::CorruptData { path, .. } => assert!(path.ends_with("cloud_s00_000.bin")),
        other => panic!("expected corrupt data, got {other:?}"),
    }
    assert_eq!(err.kind(), "corrupt_data");
}

#[test]
fn test_empty_placeholder_spectrum_is_corrupt() {
    let fixture = DiagsFixture::thermal_heavy();
    fixture.write_bytes("diag_w_gamma_s00_050.bin", &[]);

    let err = run("thermal_heavy", Some(fixture.root()), &config()).unwrap_err();
    assert!(matches!(err, Error::CorruptData { .. }));
}

#[test]
fn test_malformed_fields_file() {
    let fixture = DiagsFixture::thermal_heavy();
    fixture.write_text("fields.txt", "it Ex Ey Ez Bx By Bz\n0 0 0 0 0 0 0\n200 oops\n");

    let err = run("thermal_heavy", Some(fixture.root()), &config()).unwrap_err();
    match err {
        Error::MalformedScalars { line, .. } => assert_eq!(line, 3),
        other => panic!("expected malformed scalars, got {other:?}"),
    }
}

#[test]
fn test_report_only_skips_comparisons() {
    let fixture = DiagsFixture::thermal_heavy();
    fixture.write_text("species_00.txt", &perturbed_energy(0, 2.0));

    let config = config().with_mode(EvaluationMode::ReportOnly);
    let report = run("thermal_heavy", Some(fixture.root()), &config).unwrap();
    assert!(report.passed);
    assert_eq!(report.checks.len(), THERMAL_HEAVY_CHECKS);
    assert!(report.checks.iter().all(|c| c.error.is_none()));

    let energy = report
        .checks
        .iter()
        .find(|c| {
            c.label == "Kinetic energy in species_00.txt is not correct"
                && c.measured != c.reference
        })
        .unwrap();
    assert_eq!(energy.measured, GOLDEN.final_species[0].energy * 2.0);
}

#[test]
fn test_report_only_still_requires_files() {
    let fixture = DiagsFixture::thermal_heavy();
    fixture.remove("fields.txt");

    let config = config().with_mode(EvaluationMode::ReportOnly);
    let err = run("thermal_heavy", Some(fixture.root()), &config).unwrap_err();
    assert!(matches!(err, Error::MissingFile { .. }));
}

#[test]
fn test_missing_diags_directory() {
    let fixture = DiagsFixture::thermal_heavy();
    fixture.remove_diags();

    let result = run("thermal_heavy", Some(fixture.root()), &config());
    assert_eq!(exit_code(&result), 1);
    assert!(matches!(result, Err(Error::MissingOutputDir { .. })));
}

#[test]
fn test_unknown_scenario() {
    let fixture = DiagsFixture::thermal_heavy();
    let err = run("thermal_light", Some(fixture.root()), &config()).unwrap_err();
    assert_eq!(err.kind(), "unknown_scenario");
    assert!(err.to_string().contains("thermal_heavy"));
}

#[test]
fn test_report_json_round_trip() {
    let fixture = DiagsFixture::thermal_heavy();
    let report = run("thermal_heavy", Some(fixture.root()), &config()).unwrap();

    let path = fixture.root().join("out/report.json");
    report.write_json(&path).unwrap();
    let parsed: ValidationReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, report);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["schema"], "minipic.validation/v1");
    assert_eq!(raw["config"]["mode"], "evaluate");
    assert_eq!(raw["checks"][0]["operator"], "equal");
}

// ============================================================================
// Scenarios registered outside the library
// ============================================================================

struct Probe;

impl ValidationScenario for Probe {
    fn name(&self) -> &str {
        "integration_probe"
    }

    fn manifest(&self) -> Manifest {
        Manifest::new().file("probe.txt")
    }

    fn validate(&self, ctx: &mut ScenarioContext) -> Result<()> {
        let table = ctx.read_scalars("probe.txt")?;
        let row = table.last_row()?;
        let value = table.value(row, 0)?;
        ctx.check(value, 1.0, 0.5, Operator::Absolute, "probe value")
    }
}

fn build_probe() -> Box<dyn ValidationScenario> {
    Box::new(Probe)
}

#[distributed_slice(SCENARIOS)]
static INTEGRATION_PROBE: ScenarioDescriptor = ScenarioDescriptor {
    name: "integration_probe",
    summary: "Reads probe.txt",
    build: build_probe,
};

#[test]
fn test_external_scenario_is_dispatched() {
    assert!(registry::is_known("integration_probe"));
    assert!(registry::all_names().contains(&"thermal_heavy"));

    let fixture = DiagsFixture::empty();
    fixture.write_text("probe.txt", "1 1.25\n");
    let report = run("integration_probe", Some(fixture.root()), &config()).unwrap();
    assert_eq!(report.checks.len(), 1);
    assert_eq!(report.checks[0].error, Some(0.25));

    fixture.write_text("probe.txt", "1 1.75\n");
    let err = run("integration_probe", Some(fixture.root()), &config()).unwrap_err();
    assert!(matches!(err, Error::ThresholdExceeded { .. }));
}
