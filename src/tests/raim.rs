use rstest::*;

use crate::{
    prelude::{
        Config, Constellation, Error, InvalidationCause, IonosphereOption, Resolution,
        SolutionStatus, Solver, TroposphereOption, SV,
    },
    tests::{init_logger, NullBiases, NullEnvironment, Scenario},
};

/// G11 pseudo range is off by 50m.
/// Ionosphere is left to a downstream process, which keeps
/// the measurement errors small.
#[fixture]
fn faulty() -> Scenario {
    Scenario::new()
        .gps()
        .galileo()
        .with_atmosphere(IonosphereOption::Estimated, TroposphereOption::Saastamoinen)
        .with_fault(SV::new(Constellation::GPS, 11), 50.0)
}

fn config(raim: bool) -> Config {
    Config::default()
        .with_ionosphere(IonosphereOption::Estimated)
        .with_raim(raim)
}

#[rstest]
fn fault_detection(faulty: Scenario) {
    init_logger();

    let cfg = config(false);
    let solver = Solver::new(&cfg, faulty.clone(), NullBiases, NullEnvironment);

    let output = solver.resolve(&faulty.observations(), None);

    match &output.resolution {
        Resolution::Rejected { solution, cause } => {
            match cause {
                Error::InvalidSolution(InvalidationCause::ChiSquare { nv, vv, critical }) => {
                    // 12 measurements and 3 constraints
                    assert_eq!(*nv, 15);
                    assert!(vv > critical);
                },
                other => panic!("expecting chi-square rejection, got {}", other),
            }
            assert_eq!(solution.status, SolutionStatus::None);
            assert_eq!(solution.satellites, 12);

            let err = (solution.position - faulty.truth.ecef()).norm();
            assert!(err > 0.5, "fault should bias the solution");
        },
        other => panic!("expecting a rejected solution, got {:?}", other),
    }

    assert!(output.message().starts_with("chi-square error nv=15"));

    // the fault is still used
    let g11 = SV::new(Constellation::GPS, 11);
    assert!(output.satellites[&g11].valid);
}

#[rstest]
fn fault_exclusion(faulty: Scenario) {
    init_logger();

    let g11 = SV::new(Constellation::GPS, 11);

    let cfg = config(true);
    let solver = Solver::new(&cfg, faulty.clone(), NullBiases, NullEnvironment);

    let output = solver.resolve(&faulty.observations(), None);

    let solution = match &output.resolution {
        Resolution::Fix(solution) => solution,
        other => panic!("expecting a fix, got {:?}", other),
    };

    assert_eq!(solution.status, SolutionStatus::Single);
    assert_eq!(solution.satellites, 11);

    let err = (solution.position - faulty.truth.ecef()).norm();
    assert!(err < 1.0E-3, "position error {:.6}m", err);

    let status = output.satellites[&g11];
    assert!(!status.valid);
    assert!(status.elevation_rad > 0.0);

    for (sv, status) in output.satellites.iter() {
        if *sv != g11 {
            assert!(status.valid, "{} should be valid", sv);
            assert!(status.residual_m.abs() < 1.0E-3);
        }
    }

    assert!(output.message().is_empty());
}

#[rstest]
fn exclusion_requires_redundancy(faulty: Scenario) {
    init_logger();

    // 5 satellites: exclusion is not attempted
    let scenario = faulty.truncated(5);
    let observations = scenario.observations();

    let outputs = [false, true].map(|raim| {
        let cfg = config(raim);
        Solver::new(&cfg, scenario.clone(), NullBiases, NullEnvironment)
            .resolve(&observations, None)
    });

    assert_eq!(outputs[0], outputs[1]);
}

#[rstest]
fn healthy_epoch_untouched(faulty: Scenario) {
    init_logger();

    // fault free: RAIM has nothing to do
    let scenario = faulty.with_fault(SV::new(Constellation::GPS, 11), 0.0);

    let cfg = config(true);
    let solver = Solver::new(&cfg, scenario.clone(), NullBiases, NullEnvironment);

    let output = solver.resolve(&scenario.observations(), None);
    let solution = output.resolution.fix().expect("expecting a fix");

    assert_eq!(solution.satellites, 12);
    assert!(output.satellites.values().all(|status| status.valid));
}
