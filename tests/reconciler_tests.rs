use ftrace_callstats::aggregator::{Analysis, StackReconciler};
use ftrace_callstats::parser::{ContextKey, TraceRecord};
use ftrace_callstats::utils::config::TraceConfig;

const EPS: f64 = 1e-6;

fn call(ts: f64, caller: &str, callee: &str) -> TraceRecord {
    TraceRecord::call(100, 0, ts, caller, callee)
}

fn ret(ts: f64, returning: &str, target: &str) -> TraceRecord {
    TraceRecord::ret(100, 0, ts, returning, target)
}

fn pid_key(pid: u32) -> ContextKey {
    ContextKey { pid, cpu: None }
}

#[test]
fn test_nested_scenario() {
    let records = vec![
        call(1.000000000, "A", "B"),
        call(1.000010000, "B", "C"),
        ret(1.000030000, "C", "B"),
        ret(1.000050000, "B", "A"),
    ];

    let analysis = Analysis::run(&records, TraceConfig::default());

    assert_eq!(analysis.spans.len(), 2);

    let inner = &analysis.spans[0];
    assert_eq!((inner.caller.as_str(), inner.callee.as_str()), ("B", "C"));
    assert_eq!(inner.depth, 1);
    assert!((inner.duration_micros - 20.0).abs() < EPS);

    let outer = &analysis.spans[1];
    assert_eq!((outer.caller.as_str(), outer.callee.as_str()), ("A", "B"));
    assert_eq!(outer.depth, 0);
    assert!((outer.duration_micros - 50.0).abs() < EPS);

    let b = analysis.aggregator.function("B").unwrap();
    assert_eq!(b.count, 1);
    assert!((b.total_micros - 50.0).abs() < EPS);
    let c = analysis.aggregator.function("C").unwrap();
    assert_eq!(c.count, 1);
    assert!((c.total_micros - 20.0).abs() < EPS);

    assert_eq!(analysis.unclosed_frames, 0);
}

#[test]
fn test_well_nested_pairs_depth_and_count() {
    // f0 -> f1 -> ... -> f4, then unwind
    let names: Vec<String> = (0..5).map(|i| format!("f{}", i)).collect();
    let mut records = Vec::new();
    let mut ts = 10.0;
    for i in 1..names.len() {
        records.push(call(ts, &names[i - 1], &names[i]));
        ts += 0.001;
    }
    for i in (1..names.len()).rev() {
        records.push(ret(ts, &names[i], &names[i - 1]));
        ts += 0.001;
    }

    let analysis = Analysis::run(&records, TraceConfig::default());

    assert_eq!(analysis.spans.len(), 4);
    for span in &analysis.spans {
        let level: usize = span.callee[1..].parse().unwrap();
        assert_eq!(span.depth, level - 1);
    }
    assert_eq!(analysis.unclosed_frames, 0);
}

#[test]
fn test_skipped_return_discards_frames_above() {
    let records = vec![
        call(1.0, "A", "B"),
        call(1.1, "B", "C"),
        ret(1.2, "B", "A"),
    ];

    let mut reconciler = StackReconciler::new(TraceConfig::default());
    let spans: Vec<_> = records
        .iter()
        .filter_map(|r| reconciler.on_record(r))
        .collect();

    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].caller, "A");
    assert_eq!(spans[0].callee, "B");
    assert_eq!(spans[0].depth, 0);
    assert_eq!(reconciler.stats().discarded_frames, 1);
    assert_eq!(reconciler.end_of_stream(), 0);
}

#[test]
fn test_unmatched_return_leaves_stack_unchanged() {
    let mut reconciler = StackReconciler::new(TraceConfig::default());
    reconciler.on_record(&call(1.0, "A", "B"));
    reconciler.on_record(&call(1.1, "B", "C"));

    assert!(reconciler.on_record(&ret(1.2, "Z", "Y")).is_none());
    assert_eq!(reconciler.stack_depth(&pid_key(100)), 2);

    // the pending frames still match afterwards
    let span = reconciler.on_record(&ret(1.3, "C", "B")).unwrap();
    assert_eq!(span.depth, 1);
}

#[test]
fn test_bare_return_is_ignored() {
    let records = vec![ret(1.0, "X", "Y")];

    let analysis = Analysis::run(&records, TraceConfig::default());

    assert!(analysis.spans.is_empty());
    assert_eq!(analysis.aggregator.function_count(), 0);
    assert_eq!(analysis.stats.orphan_returns, 1);
    assert_eq!(analysis.unclosed_frames, 0);
}

#[test]
fn test_return_target_mismatch_is_tolerated() {
    let records = vec![call(1.0, "A", "B"), ret(1.5, "B", "somewhere_else")];

    let analysis = Analysis::run(&records, TraceConfig::default());

    assert_eq!(analysis.spans.len(), 1);
    assert_eq!(analysis.spans[0].caller, "A");
}

#[test]
fn test_unclosed_frames_counted_across_contexts() {
    let records = vec![
        TraceRecord::call(1, 0, 1.0, "A", "B"),
        TraceRecord::call(2, 0, 1.0, "A", "B"),
        TraceRecord::call(2, 0, 1.1, "B", "C"),
        TraceRecord::ret(2, 0, 1.2, "C", "B"),
    ];

    let analysis = Analysis::run(&records, TraceConfig::default());

    assert_eq!(analysis.spans.len(), 1);
    assert_eq!(analysis.unclosed_frames, 2);
}

#[test]
fn test_contexts_are_independent() {
    // pid 2's return must not close pid 1's frame
    let records = vec![
        TraceRecord::call(1, 0, 1.0, "A", "B"),
        TraceRecord::ret(2, 0, 1.1, "B", "A"),
    ];

    let analysis = Analysis::run(&records, TraceConfig::default());

    assert!(analysis.spans.is_empty());
    assert_eq!(analysis.unclosed_frames, 1);
}

#[test]
fn test_key_by_cpu_separates_stacks() {
    let records = vec![
        TraceRecord::call(7, 0, 1.0, "A", "B"),
        TraceRecord::ret(7, 1, 1.5, "B", "A"),
    ];

    let merged = Analysis::run(&records, TraceConfig::default());
    assert_eq!(merged.spans.len(), 1);
    assert_eq!(merged.spans[0].cpu, 1);

    let split = Analysis::run(&records, TraceConfig::new().with_key_by_cpu(true));
    assert!(split.spans.is_empty());
    assert_eq!(split.stats.orphan_returns, 1);
    assert_eq!(split.unclosed_frames, 1);
}

#[test]
fn test_out_of_order_timestamps_tolerated() {
    let records = vec![call(2.0, "A", "B"), ret(1.0, "B", "A")];

    let analysis = Analysis::run(&records, TraceConfig::default());

    assert_eq!(analysis.spans.len(), 1);
    assert!((analysis.spans[0].duration_micros + 1e6).abs() < EPS);
}

#[test]
fn test_duration_formula() {
    let records = vec![call(154939.925854842, "A", "B"), ret(154939.925854981, "B", "A")];

    let analysis = Analysis::run(&records, TraceConfig::default());
    let span = &analysis.spans[0];

    let expected = (span.exit_timestamp - span.enter_timestamp) * 1_000_000.0;
    assert_eq!(span.duration_micros, expected);
    assert!((span.duration_micros - 0.139).abs() < 1e-3);
}

#[test]
fn test_rerun_is_identical() {
    let records = vec![
        call(1.0, "A", "B"),
        call(1.1, "B", "C"),
        ret(1.2, "B", "A"),
        call(1.3, "A", "D"),
        ret(1.4, "D", "A"),
        ret(1.5, "X", "Y"),
    ];

    let first = Analysis::run(&records, TraceConfig::default());
    let second = Analysis::run(&records, TraceConfig::default());

    assert_eq!(first.spans, second.spans);
    assert_eq!(
        first.aggregator.snapshot_functions(),
        second.aggregator.snapshot_functions()
    );
    assert_eq!(
        first.aggregator.snapshot_edges(),
        second.aggregator.snapshot_edges()
    );
    assert_eq!(first.stats, second.stats);
}
