//! Calibration tests for retest-core.
//!
//! These exercise the full pipeline — sampling → reliability injection →
//! pooled kappa → bootstrap aggregation — against known statistical
//! behavior. Everything runs seeded so the assertions are deterministic.

use retest_core::{
    CiConfig, Item, ResponseMatrix, SampleSizeConfig, WeightScheme, confidence_interval,
    make_reliable, pooled_kappa, sample_questionnaire, sample_size_search,
};

fn uniform_questionnaire(n_items: usize, n_choices: usize) -> Vec<Item> {
    (0..n_items)
        .map(|_| Item::uniform_choices(n_choices).unwrap())
        .collect()
}

#[test]
fn independent_samples_have_near_zero_kappa() {
    for n_choices in 2..=5 {
        let questions = uniform_questionnaire(4, n_choices);
        let a = sample_questionnaire(&questions, 1000, Some(100 + n_choices as u64)).unwrap();
        let b = sample_questionnaire(&questions, 1000, Some(200 + n_choices as u64)).unwrap();
        let kappa = pooled_kappa(&a, &b, WeightScheme::None, None).unwrap();
        assert!(
            kappa.abs() < 0.1,
            "c={n_choices}: expected near-zero kappa, got {kappa}"
        );
    }
}

#[test]
fn skewed_marginals_still_give_near_zero_kappa() {
    let item = Item::new(
        vec!["yes".into(), "no".into()],
        vec![0.1, 0.9],
    )
    .unwrap();
    let questions = vec![item.clone(), item.clone(), item];
    let a = sample_questionnaire(&questions, 1000, Some(7)).unwrap();
    let b = sample_questionnaire(&questions, 1000, Some(8)).unwrap();
    let kappa = pooled_kappa(&a, &b, WeightScheme::None, None).unwrap();
    assert!(kappa.abs() < 0.1, "got {kappa}");
}

#[test]
fn injected_reliability_recovers_as_kappa() {
    let questions = uniform_questionnaire(4, 5);
    for reliability in [0.2, 0.5, 0.8] {
        let mut retest = sample_questionnaire(&questions, 1000, Some(31)).unwrap();
        let test = sample_questionnaire(&questions, 1000, Some(32)).unwrap();
        make_reliable(&mut retest, &test, reliability).unwrap();
        let kappa = pooled_kappa(&retest, &test, WeightScheme::None, None).unwrap();
        assert!(
            (kappa - reliability).abs() < 0.05,
            "r={reliability}: got kappa {kappa}"
        );
    }
}

#[test]
fn weighting_is_unbiased_under_pure_chance() {
    let questions = uniform_questionnaire(4, 5);
    let a = sample_questionnaire(&questions, 1000, Some(51)).unwrap();
    let b = sample_questionnaire(&questions, 1000, Some(52)).unwrap();

    let unweighted = pooled_kappa(&a, &b, WeightScheme::None, None).unwrap();
    let linear = pooled_kappa(&a, &b, WeightScheme::Linear, Some(&questions)).unwrap();
    let quadratic = pooled_kappa(&a, &b, WeightScheme::Quadratic, Some(&questions)).unwrap();

    assert!(unweighted.abs() < 0.1);
    assert!((linear - unweighted).abs() < 0.1, "{linear} vs {unweighted}");
    assert!(
        (quadratic - unweighted).abs() < 0.15,
        "{quadratic} vs {unweighted}"
    );
}

#[test]
fn near_miss_disagreements_reward_weighting() {
    // Retest answers sit one ordinal step away from the test answers, so
    // disagreements are all near misses and ordinal weighting should credit
    // them: |weighted| well above |unweighted|.
    let questions = uniform_questionnaire(1, 5);
    let test = sample_questionnaire(&questions, 1000, Some(61)).unwrap();
    let c = 5usize;
    let shifted: Vec<usize> = (0..test.n_rows())
        .map(|row| {
            let v = test.get(row, 0);
            if row % 2 == 0 { (v + 1).min(c - 1) } else { v.saturating_sub(1) }
        })
        .collect();
    let retest = ResponseMatrix::from_cells(test.n_rows(), 1, shifted).unwrap();

    let unweighted = pooled_kappa(&test, &retest, WeightScheme::None, Some(&questions)).unwrap();
    let linear = pooled_kappa(&test, &retest, WeightScheme::Linear, Some(&questions)).unwrap();
    let quadratic =
        pooled_kappa(&test, &retest, WeightScheme::Quadratic, Some(&questions)).unwrap();

    assert!(linear > unweighted + 0.1, "{linear} vs {unweighted}");
    assert!(quadratic > linear, "{quadratic} vs {linear}");
}

#[test]
fn confidence_interval_calibration() {
    // The canonical fixture: 4 items, 5 uniform choices, n = 100. The null
    // kappa distribution is centered on zero with bounds near ±0.05 and a
    // standard deviation near 0.025.
    let questions = uniform_questionnaire(4, 5);
    let config = CiConfig {
        n_bootstrap: 1000,
        alpha: 0.05,
        seed: Some(71),
        ..CiConfig::default()
    };
    let info = confidence_interval(&questions, 100, &config).unwrap();

    assert!(info.mean.abs() < 0.01, "mean {}", info.mean);
    assert!(
        (info.lower_bound.abs() - 0.05).abs() < 0.01,
        "lower {}",
        info.lower_bound
    );
    assert!(
        (info.upper_bound.abs() - 0.05).abs() < 0.01,
        "upper {}",
        info.upper_bound
    );
    assert!(
        (info.std_dev - 0.025).abs() < 0.01,
        "std {}",
        info.std_dev
    );
    assert!(info.lower_bound < 0.0 && info.upper_bound > 0.0);
}

#[test]
fn sample_size_calibration() {
    // Detecting 10% reliability on the 4-item/5-choice questionnaire at 80%
    // power needs roughly 40-50 respondents.
    let questions = uniform_questionnaire(4, 5);
    let config = SampleSizeConfig {
        reliability: 0.1,
        start_n: 10,
        n_step: 10,
        n_bootstrap: 1000,
        alpha: 0.05,
        beta: 0.8,
        seed: Some(81),
        ..SampleSizeConfig::default()
    };
    let info = sample_size_search(&questions, 100, &config).unwrap();

    assert_eq!(info.sweep.len(), 1 + (100 - 10) / 10);
    let selected = info.sample_size.expect("power should be reached by n=100");
    assert!(
        selected == 40 || selected == 50,
        "selected {selected}, sweep {:?}",
        info.sweep
    );
    // Sizes are the arithmetic progression, in order.
    for (i, row) in info.sweep.iter().enumerate() {
        assert_eq!(row.n, 10 + i * 10);
    }
}

#[test]
fn linear_weighting_never_needs_fewer_respondents_here() {
    // On the uniform fixture, ordinal weighting inflates the null variance
    // without adding signal, so the weighted search needs at least as many
    // respondents as the unweighted one.
    let questions = uniform_questionnaire(4, 5);
    let base = SampleSizeConfig {
        reliability: 0.1,
        n_bootstrap: 1000,
        seed: Some(91),
        ..SampleSizeConfig::default()
    };
    let unweighted = sample_size_search(&questions, 100, &base).unwrap();

    let weighted_config = SampleSizeConfig {
        weight: WeightScheme::Linear,
        ..base
    };
    let weighted = sample_size_search(&questions, 100, &weighted_config).unwrap();

    let unweighted_n = unweighted.sample_size.expect("unweighted power reached");
    // Treat an exhausted weighted sweep as "needs more than max_n".
    let weighted_n = weighted.sample_size.unwrap_or(usize::MAX);
    assert!(
        unweighted_n <= weighted_n,
        "unweighted {unweighted_n} vs weighted {:?}",
        weighted.sample_size
    );
}
