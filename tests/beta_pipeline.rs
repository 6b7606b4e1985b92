//! Integration tests for the bootstrap and permutation analyses.

use approx::assert_abs_diff_eq;
use composable_beta::bootstrap::{LOWER_FILE, MEAN_FILE, UPPER_FILE};
use composable_beta::distance::pairs;
use composable_beta::prelude::*;
use composable_beta::resample::rng_for;
use composable_beta::test::null_distribution;
use std::io::Write;
use tempfile::NamedTempFile;

/// Long-format MAG table: 30 MAGs over 5 orders and 6 samples.
///
/// M24-M26 share a Bacillales-heavy community, M27-M29 an
/// Enterobacterales-heavy one.
fn create_mag_table() -> AbundanceTable {
    let orders = [
        "Bacillales",
        "Enterobacterales",
        "Lactobacillales",
        "Pseudomonadales",
        "unclassified",
    ];
    let mut rng_seed = 42u64;
    let simple_rand = |seed: &mut u64| -> f64 {
        *seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        ((*seed >> 16) & 0x7FFF) as f64 / 32768.0
    };

    let mut csv = String::from("MAG,Order,M24,M25,M26,M27,M28,M29\n");
    for mag in 0..30 {
        let order = orders[mag % orders.len()];
        csv.push_str(&format!("mag_{},{}", mag, order));
        for sample in 0..6 {
            let first_cluster = sample < 3;
            let base = match (order, first_cluster) {
                ("Bacillales", true) | ("Enterobacterales", false) => 200.0,
                ("Lactobacillales", _) => 40.0,
                ("Pseudomonadales", true) => 0.0,
                ("unclassified", _) => 15.0,
                _ => 10.0,
            };
            let count = (base * (0.8 + 0.4 * simple_rand(&mut rng_seed))).round();
            csv.push_str(&format!(",{}", count));
        }
        csv.push('\n');
    }
    AbundanceTable::from_reader(csv.as_bytes()).unwrap()
}

const SAMPLES: [&str; 6] = ["M24", "M25", "M26", "M27", "M28", "M29"];

fn scenario_matrix() -> AbundanceMatrix {
    AbundanceMatrix::from_rows(
        &[vec![10.0, 0.0], vec![5.0, 5.0], vec![0.0, 10.0]],
        vec!["A".into(), "B".into(), "C".into()],
        vec!["g1".into(), "g2".into()],
    )
    .unwrap()
}

#[test]
fn test_bray_curtis_scenario() {
    let observed = Metric::BrayCurtis.distance_matrix(&scenario_matrix()).unwrap();
    assert_abs_diff_eq!(observed.get_by_id("A", "B").unwrap(), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(observed.get_by_id("A", "C").unwrap(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(observed.get_by_id("B", "C").unwrap(), 0.5, epsilon = 1e-12);

    let result = bootstrap_bray_curtis(&scenario_matrix(), &BootstrapConfig::default()).unwrap();
    let lower = result.lower_matrix().unwrap();
    let upper = result.upper_matrix().unwrap();
    for (a, b) in [("A", "B"), ("A", "C"), ("B", "C")] {
        let exact = observed.get_by_id(a, b).unwrap();
        assert!(lower.get_by_id(a, b).unwrap() <= exact);
        assert!(exact <= upper.get_by_id(a, b).unwrap());
    }
    // Both samples of (A, C) are always fully disjoint.
    assert_eq!(result.mean_matrix().unwrap().get_by_id("A", "C"), Some(1.0));
}

#[test]
fn test_sorensen_scenario_null_support() {
    let a = [1u8, 1, 0];
    let b = [1u8, 0, 0];
    assert_abs_diff_eq!(sorensen_similarity(&a, &b), 2.0 / 3.0, epsilon = 1e-12);

    let mut rng = rng_for(42, 0);
    let null = null_distribution(&a, &b, 1000, &mut rng);
    for s in &null {
        assert!(*s == 0.0 || (*s - 2.0 / 3.0).abs() < 1e-12, "unreachable similarity {}", s);
    }
    // Both support points are hit.
    assert!(null.iter().any(|&s| s == 0.0));
    assert!(null.iter().any(|&s| s > 0.0));

    let matrix = AbundanceMatrix::from_rows(
        &[vec![3.0, 9.0, 0.0], vec![4.0, 0.0, 0.0]],
        vec!["A".into(), "B".into()],
        vec!["g1".into(), "g2".into(), "g3".into()],
    )
    .unwrap();
    let results = test_sorensen_permutation(&matrix, &PermutationConfig::default()).unwrap();
    let pair = results.pair("A", "B").unwrap();
    assert!((0.0..=1.0).contains(&pair.p_value));
    assert_abs_diff_eq!(pair.p_value, 2.0 / 3.0, epsilon = 0.05);
}

#[test]
fn test_full_analysis_on_table() {
    let table = create_mag_table();
    let output = Analysis::new("Order", &SAMPLES)
        .name("mags")
        .bootstrap(BootstrapConfig::quick())
        .permutation(PermutationConfig::quick())
        .run(&table)
        .unwrap();

    let bootstrap = output.bootstrap.as_ref().unwrap();
    let mean = bootstrap.mean_matrix().unwrap();
    assert_eq!(mean.n(), 6);
    assert!(mean.validate_distance().is_ok());

    // Within-cluster pairs are closer than between-cluster pairs.
    let within = mean.get_by_id("M24", "M25").unwrap();
    let between = mean.get_by_id("M24", "M28").unwrap();
    assert!(within < between, "within {} between {}", within, between);

    let permutation = output.permutation.as_ref().unwrap();
    assert_eq!(permutation.len(), 15);
    let sim = permutation.similarity_matrix().unwrap();
    assert!(sim.is_unit_bounded());
    for i in 0..6 {
        assert_eq!(sim.get(i, i), 1.0);
    }
}

#[test]
fn test_outputs_written_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let output = Analysis::new("Order", &SAMPLES)
        .bootstrap(BootstrapConfig::quick())
        .permutation(PermutationConfig::quick())
        .run(&create_mag_table())
        .unwrap();
    output.write_csv(dir.path()).unwrap();

    for file in [
        MEAN_FILE,
        LOWER_FILE,
        UPPER_FILE,
        "sorensen_similarity.csv",
        "sorensen_pvalues.csv",
        "sorensen_dissimilarity.csv",
    ] {
        let loaded = SymmetricMatrix::from_csv(dir.path().join(file)).unwrap();
        assert_eq!(loaded.ids(), &SAMPLES);
    }

    // Full precision survives the file.
    let mean = SymmetricMatrix::from_csv(dir.path().join(MEAN_FILE)).unwrap();
    assert_eq!(mean, output.bootstrap.unwrap().mean_matrix().unwrap());
}

#[test]
fn test_serial_and_parallel_identical() {
    let table = create_mag_table();
    let run = |parallel: bool| {
        Analysis::new("Order", &SAMPLES)
            .bootstrap(BootstrapConfig { parallel, ..BootstrapConfig::quick() })
            .permutation(PermutationConfig { parallel, ..PermutationConfig::quick() })
            .run(&table)
            .unwrap()
    };
    let p = run(true);
    let s = run(false);

    let (pb, sb) = (p.bootstrap.unwrap(), s.bootstrap.unwrap());
    assert_eq!(pb.mean, sb.mean);
    assert_eq!(pb.lower, sb.lower);
    assert_eq!(pb.upper, sb.upper);
    assert_eq!(p.permutation.unwrap().pairs, s.permutation.unwrap().pairs);
}

#[test]
fn test_invalid_groups_by_phase() {
    let table = create_mag_table();
    let analysis = Analysis::new("Order", &SAMPLES);
    let kept = analysis.aggregate(&table, false).unwrap();
    let dropped = analysis.aggregate(&table, true).unwrap();
    assert_eq!(kept.n_groups(), 5);
    assert_eq!(dropped.n_groups(), 4);
    assert!(dropped.group_position("unclassified").is_none());
    // Group order is sorted, independent of row order.
    assert_eq!(kept.group_ids()[0], "Bacillales");
}

#[test]
fn test_missing_sample_column() {
    let err = Analysis::new("Order", &["M24", "M99"])
        .permutation(PermutationConfig::quick())
        .run(&create_mag_table())
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("M99"));
}

#[test]
fn test_run_from_yaml_config() {
    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        "\
name: yaml-run
group_column: Order
sample_columns: [M24, M25, M27]
bootstrap:
  n_bootstrap: 50
  seed: 7
permutation:
  n_permutations: 50
"
    )
    .unwrap();
    config_file.flush().unwrap();

    let config = AnalysisConfig::from_file(config_file.path()).unwrap();
    let output = Analysis::from_config(&config).run(&create_mag_table()).unwrap();
    let bootstrap = output.bootstrap.unwrap();
    assert_eq!(bootstrap.config.n_bootstrap, 50);
    assert_eq!(bootstrap.sample_ids, vec!["M24", "M25", "M27"]);
    assert_eq!(output.permutation.unwrap().config.n_permutations, 50);
}

#[test]
fn test_profile_before_analysis() {
    let table = create_mag_table();
    let matrix = Analysis::new("Order", &SAMPLES).aggregate(&table, true).unwrap();
    let profile = profile_matrix(&matrix);
    assert_eq!(profile.n_samples, 6);
    assert_eq!(profile.n_groups, 4);
    assert!(profile.zero_samples.is_empty());
    // Pseudomonadales is absent from the first cluster.
    let pseudo = matrix.group_position("Pseudomonadales").unwrap();
    assert_abs_diff_eq!(profile.group_prevalence[pseudo], 0.5, epsilon = 1e-12);
}

#[test]
fn test_q_values_cover_all_pairs() {
    let output = Analysis::new("Order", &SAMPLES)
        .permutation(PermutationConfig::quick())
        .run(&create_mag_table())
        .unwrap();
    let perm = output.permutation.unwrap();
    let q = perm.q_value_matrix().unwrap();
    let p = perm.p_value_matrix().unwrap();
    for (i, j) in pairs(6) {
        assert!(q.get(i, j) >= p.get(i, j) - 1e-12);
    }
    assert_eq!(perm.bh_correction().n_tests, 15);
}
