use govbench_core::{
    BenchmarkRunner, ExecutionError, GovernanceAdapter, RunnerConfig, ScenarioCatalog,
};
use govbench_scenario::{Category, Difficulty, Scenario};
use govbench_scorer::BucketCounts;
use govbench_test_utils::{
    blocking, permitting, runner_for, sample_scenarios, FailingAdapter, FailurePhase,
    LifecycleEvent, OracleAdapter, PermitAllAdapter, RecordingAdapter, ThresholdAdapter,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn many(category: Category, count: usize) -> Vec<Scenario> {
    (0..count)
        .map(|i| blocking(&format!("S-{i:03}"), category, &["denied"]))
        .collect()
}

#[tokio::test]
async fn permit_all_is_the_floor() {
    let runner = runner_for(
        Arc::new(PermitAllAdapter),
        sample_scenarios(),
        RunnerConfig::default(),
    );
    let result = runner.run(None).await;

    assert_eq!(result.adapter_name, "NoGovernance (permit-all baseline)");
    assert_eq!(
        result.categories_run,
        vec![
            Category::TrustEscalation,
            Category::BudgetAbuse,
            Category::MemoryLeak
        ]
    );
    assert_eq!(result.aggregate.total_scenarios(), 8);
    assert_eq!(result.aggregate.total_passed(), 3);
    assert_eq!(result.errors.len(), 5);
    assert!(result
        .errors
        .iter()
        .all(|e| e.error == "no_scenarios_found"));
    assert_eq!(result.check_invariants(), Ok(()));

    // exactly the permits pass
    for category_result in result.category_results.values() {
        for verdict in category_result.scores() {
            assert_eq!(verdict.passed(), !verdict.expected_blocked());
        }
    }
}

#[tokio::test]
async fn oracle_with_expected_outcomes_is_the_ceiling() {
    let runner = runner_for(
        Arc::new(OracleAdapter::new()),
        sample_scenarios(),
        RunnerConfig::new().with_expose_expected(true),
    );
    let result = runner.run(None).await;

    assert_eq!(result.adapter_name, "PerfectGovernance (oracle baseline)");
    assert_eq!(result.aggregate.total_passed(), 8);
    assert_eq!(result.aggregate.overall_pass_rate(), 1.0);
    assert_eq!(result.check_invariants(), Ok(()));
}

#[tokio::test]
async fn oracle_without_expected_outcomes_only_permits() {
    let runner = runner_for(
        Arc::new(OracleAdapter::new()),
        sample_scenarios(),
        RunnerConfig::default(),
    );
    let result = runner.run(None).await;
    assert_eq!(result.aggregate.total_passed(), 3);
}

#[tokio::test]
async fn threshold_rules_miss_split_payment() {
    let runner = runner_for(
        Arc::new(ThresholdAdapter::default()),
        sample_scenarios(),
        RunnerConfig::default(),
    );
    let result = runner.run(Some(&[Category::BudgetAbuse, Category::TrustEscalation])).await;

    assert_eq!(
        result.categories_run,
        vec![Category::BudgetAbuse, Category::TrustEscalation]
    );
    assert!(result.errors.is_empty());
    assert_eq!(result.aggregate.total_scenarios(), 7);
    assert_eq!(result.aggregate.total_passed(), 6);

    let budget = &result.category_results[&Category::BudgetAbuse];
    let failed: Vec<&str> = budget.failures().map(|s| s.scenario_id()).collect();
    assert_eq!(failed, vec!["BA-003"]);
    assert_eq!(
        result.aggregate.by_difficulty()[&Difficulty::Hard],
        BucketCounts {
            passed: 1,
            failed: 1,
            total: 2
        }
    );
    assert_eq!(result.check_invariants(), Ok(()));
}

#[tokio::test]
async fn release_follows_every_prepare_when_decide_fails() {
    let adapter = Arc::new(RecordingAdapter::new(FailingAdapter::on_decide("backend down")));
    let runner = runner_for(adapter.clone(), sample_scenarios(), RunnerConfig::default());
    let result = runner.run(None).await;

    assert_eq!(adapter.prepares(), 8);
    assert_eq!(adapter.decides(), 8);
    assert_eq!(adapter.releases(), 8);
    assert_eq!(adapter.max_in_flight(), 1);

    for triple in adapter.events().chunks(3) {
        assert!(matches!(
            triple,
            [
                LifecycleEvent::Prepare(_),
                LifecycleEvent::Decide(_),
                LifecycleEvent::Release
            ]
        ));
    }

    for category_result in result.category_results.values() {
        for verdict in category_result.scores() {
            assert!(!verdict.actual_blocked());
            assert_eq!(verdict.actual_reason(), Some("adapter_error"));
            assert_eq!(verdict.details(), Some("decide failed: backend down"));
        }
    }
    // surrogate permits still pass scenarios that expect a permit
    assert_eq!(result.aggregate.total_passed(), 3);
}

#[tokio::test]
async fn prepare_failure_skips_decide_but_releases() {
    let adapter = Arc::new(RecordingAdapter::new(FailingAdapter::new(
        FailurePhase::Prepare,
        "no session",
    )));
    let runner = runner_for(adapter.clone(), sample_scenarios(), RunnerConfig::default());
    let result = runner.run(Some(&[Category::TrustEscalation])).await;

    assert_eq!(adapter.prepares(), 3);
    assert_eq!(adapter.decides(), 0);
    assert_eq!(adapter.releases(), 3);

    let scores = result.category_results[&Category::TrustEscalation].scores();
    assert!(scores
        .iter()
        .all(|s| s.actual_reason() == Some("adapter_error")));
}

#[tokio::test]
async fn release_failure_keeps_verdict() {
    let runner = runner_for(
        Arc::new(FailingAdapter::new(FailurePhase::Release, "leaked handle")),
        many(Category::PrivilegeEscalation, 3),
        RunnerConfig::default(),
    );
    let result = runner.run(Some(&[Category::PrivilegeEscalation])).await;
    assert_eq!(result.aggregate.total_passed(), 3);
}

#[tokio::test]
async fn missing_and_empty_categories() {
    let catalog = ScenarioCatalog::from_scenarios(sample_scenarios())
        .with_category(Category::ConsentViolation);
    let runner = BenchmarkRunner::new(Arc::new(PermitAllAdapter), Arc::new(catalog));

    let result = runner
        .run(Some(&[
            Category::ConsentViolation,
            Category::IdentitySpoofing,
            Category::TrustEscalation,
            Category::TrustEscalation,
        ]))
        .await;

    assert_eq!(
        result.categories_run,
        vec![Category::ConsentViolation, Category::TrustEscalation]
    );
    assert_eq!(
        result.errors,
        vec![ExecutionError::no_scenarios(Category::IdentitySpoofing)]
    );

    let empty = &result.category_results[&Category::ConsentViolation];
    assert_eq!(empty.total(), 0);
    assert_eq!(empty.pass_rate(), 0.0);
    assert!(empty.by_difficulty().is_empty());
    assert_eq!(result.aggregate.total_scenarios(), 3);
    assert_eq!(result.check_invariants(), Ok(()));
}

#[tokio::test]
async fn serial_mode_follows_catalog_order() {
    let adapter = Arc::new(RecordingAdapter::new(OracleAdapter::new()));
    let runner = runner_for(
        adapter.clone(),
        sample_scenarios(),
        RunnerConfig::new().with_expose_expected(true),
    );
    let result = runner.run(Some(&[Category::BudgetAbuse])).await;

    let amounts: Vec<serde_json::Value> = adapter
        .events()
        .into_iter()
        .filter_map(|event| match event {
            LifecycleEvent::Decide(input) => input.get("amount").cloned(),
            _ => None,
        })
        .collect();
    assert_eq!(amounts, vec![json!(250.0), json!(1000), json!(60), json!(20)]);

    let ids: Vec<&str> = result.category_results[&Category::BudgetAbuse]
        .scores()
        .iter()
        .map(|s| s.scenario_id())
        .collect();
    assert_eq!(ids, vec!["BA-001", "BA-002", "BA-003", "BA-004"]);

    let LifecycleEvent::Prepare(config) = &adapter.events()[0] else {
        panic!("first call must be prepare");
    };
    assert_eq!(config.get("should_block"), Some(&json!(true)));
    assert_eq!(config.get("acceptable_reasons"), Some(&json!(["budget_exceeded"])));
}

#[tokio::test]
async fn bounded_mode_respects_limit_and_matches_serial() {
    let scenarios = many(Category::SocialEngineering, 24);

    let bounded_adapter = Arc::new(
        RecordingAdapter::new(PermitAllAdapter).with_delay(Duration::from_millis(5)),
    );
    let bounded = runner_for(
        bounded_adapter.clone(),
        scenarios.clone(),
        RunnerConfig::new().with_concurrency(4),
    );
    let serial = runner_for(
        Arc::new(PermitAllAdapter),
        scenarios,
        RunnerConfig::default(),
    );

    let bounded_result = bounded.run(Some(&[Category::SocialEngineering])).await;
    let serial_result = serial.run(Some(&[Category::SocialEngineering])).await;

    assert!(bounded_adapter.max_in_flight() <= 4);
    assert!(bounded_adapter.max_in_flight() > 1);
    assert_eq!(bounded_adapter.releases(), 24);
    assert_eq!(bounded_result.category_results, serial_result.category_results);
    assert_eq!(bounded_result.aggregate, serial_result.aggregate);
}

#[tokio::test]
async fn non_reentrant_adapter_falls_back_to_serial() {
    let adapter = Arc::new(
        RecordingAdapter::new(PermitAllAdapter)
            .with_reentrant(false)
            .with_delay(Duration::from_millis(2)),
    );
    let runner = runner_for(
        adapter.clone(),
        many(Category::CrossDomainLeakage, 8),
        RunnerConfig::new().with_concurrency(8),
    );
    runner.run(None).await;

    assert!(!adapter.is_reentrant());
    assert_eq!(adapter.max_in_flight(), 1);
    assert_eq!(adapter.releases(), 8);
}

#[tokio::test]
async fn overlapping_runs_never_interleave_triples() {
    let adapter = Arc::new(
        RecordingAdapter::new(OracleAdapter::new()).with_delay(Duration::from_millis(2)),
    );
    let runner = runner_for(
        adapter.clone(),
        sample_scenarios(),
        RunnerConfig::new().with_expose_expected(true),
    );

    let (first, second) = tokio::join!(runner.run(None), runner.run(None));

    assert_eq!(adapter.max_in_flight(), 1);
    assert_eq!(first.aggregate.total_passed(), 8);
    assert_eq!(second.aggregate.total_passed(), 8);
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn runners_sharing_an_adapter_never_interleave_triples() {
    let adapter = Arc::new(
        RecordingAdapter::new(OracleAdapter::new()).with_delay(Duration::from_millis(3)),
    );
    let config = RunnerConfig::new().with_expose_expected(true);
    let first = runner_for(adapter.clone(), sample_scenarios(), config.clone());
    let second = runner_for(adapter.clone(), sample_scenarios(), config);

    let (a, b) = tokio::join!(first.run(None), second.run(None));

    assert_eq!(adapter.max_in_flight(), 1);
    assert_eq!(a.aggregate.total_passed(), 8);
    assert_eq!(b.aggregate.total_passed(), 8);
    assert_eq!(adapter.prepares(), 16);
    assert_eq!(adapter.releases(), 16);
}

#[tokio::test]
async fn empty_category_request_runs_everything() {
    let runner = runner_for(
        Arc::new(ThresholdAdapter::default()),
        sample_scenarios(),
        RunnerConfig::default(),
    );

    let everything = runner.run(None).await;
    let empty = runner.run(Some(&[])).await;

    assert_eq!(empty.categories_run, everything.categories_run);
    assert_eq!(empty.aggregate, everything.aggregate);
    assert_eq!(empty.errors, everything.errors);
    assert_eq!(empty.aggregate.total_scenarios(), 8);
}

#[tokio::test]
async fn result_carries_catalog_digest() {
    let catalog = Arc::new(ScenarioCatalog::from_scenarios(sample_scenarios()));
    let runner = BenchmarkRunner::new(Arc::new(PermitAllAdapter), catalog.clone());
    let result = runner.run(None).await;

    assert_eq!(result.catalog_digest, catalog.digest());
    assert!(result.duration_seconds >= 0.0);
}

#[tokio::test]
async fn run_single_scores_one_scenario() {
    let runner = runner_for(
        Arc::new(ThresholdAdapter::default()),
        vec![],
        RunnerConfig::default(),
    );
    let scenario = permitting("ML-009", Category::MemoryLeak);
    let verdict = runner.run_single(&scenario).await;

    assert!(verdict.passed());
    assert_eq!(verdict.actual_reason(), Some("permitted"));
}
