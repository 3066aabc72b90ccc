// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the minifilter pipeline: discovery through apply.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use osubot_core::{DataRecord, HookState, OsuBotError, ProcessorHandle};
use osubot_filter::{FilterManager, FilterManagerBuilder, FilterManifest, FnFactory};
use osubot_test_utils::{record, MockAsyncTransformer, MockTransformer};
use serde_json::json;

fn manifest(name: &str, hooks: &[&str], depends: &[&str]) -> FilterManifest {
    FilterManifest::new(name)
        .with_hooks(hooks.iter().copied())
        .with_depends(depends.iter().copied())
}

/// Registers each `(name, hooks, depends)` with a trail-appending processor.
fn trail_builder(defs: &[(&str, &[&str], &[&str])]) -> FilterManagerBuilder {
    defs.iter().fold(FilterManager::builder(), |builder, (name, hooks, depends)| {
        builder
            .manifest(manifest(name, hooks, depends))
            .processor(*name, MockTransformer::trail(*name).handle())
    })
}

fn write_unit(root: &Path, dir: &str, body: &str) {
    let unit = root.join(dir);
    std::fs::create_dir_all(&unit).unwrap();
    std::fs::write(unit.join("minifilter.toml"), body).unwrap();
}

// ---- Ordering ----

#[test]
fn linear_dependencies_compile_in_order() {
    let manager = trail_builder(&[
        ("A", &["h"], &[]),
        ("B", &["h"], &["A"]),
        ("C", &["h"], &["B"]),
    ])
    .build()
    .unwrap();

    assert_eq!(manager.chain("h"), ["A", "B", "C"]);
    assert_eq!(manager.hook_state("h"), HookState::Ready);
    let out = manager.apply("h", &DataRecord::new());
    assert_eq!(out["trail"], json!(["A", "B", "C"]));
}

#[test]
fn dependencies_win_over_registration_order() {
    let manager = trail_builder(&[
        ("C", &["h"], &["B"]),
        ("B", &["h"], &["A"]),
        ("A", &["h"], &[]),
    ])
    .build()
    .unwrap();
    assert_eq!(manager.chain("h"), ["A", "B", "C"]);
}

#[test]
fn cross_hook_dependency_is_ignored() {
    let manager = trail_builder(&[
        ("P", &["a"], &["Q"]),
        ("R", &["a"], &[]),
        ("Q", &["b"], &[]),
    ])
    .build()
    .unwrap();

    assert_eq!(manager.chain("a"), ["P", "R"]);
    assert_eq!(manager.chain("b"), ["Q"]);
    assert_eq!(manager.hook_state("a"), HookState::Ready);
}

#[test]
fn unknown_dependency_is_ignored() {
    let manager = trail_builder(&[("P", &["a"], &["does_not_exist"])])
        .build()
        .unwrap();
    assert_eq!(manager.chain("a"), ["P"]);
}

#[test]
fn shared_plugin_is_ordered_per_hook() {
    let manager = trail_builder(&[
        ("late", &["x", "y"], &["early"]),
        ("early", &["x"], &[]),
    ])
    .build()
    .unwrap();
    assert_eq!(manager.chain("x"), ["early", "late"]);
    assert_eq!(manager.chain("y"), ["late"]);
}

#[test]
fn hook_listed_twice_runs_once() {
    let mut m = FilterManifest::new("a");
    m.hooks = vec!["h".to_string(), "h".to_string()];

    let manager = FilterManager::builder()
        .manifest(m)
        .processor("a", MockTransformer::trail("a").handle())
        .build()
        .unwrap();

    assert_eq!(manager.chain("h"), ["a"]);
    let out = manager.apply("h", &DataRecord::new());
    assert_eq!(out["trail"], json!(["a"]));
}

// ---- Cycles ----

#[test]
fn cycle_disables_hook_and_apply_is_identity() {
    let manager = trail_builder(&[
        ("A", &["h"], &["D"]),
        ("B", &["h"], &["A"]),
        ("C", &["h"], &["B"]),
        ("D", &["h"], &["C"]),
    ])
    .build()
    .unwrap();

    assert_eq!(manager.hook_state("h"), HookState::Disabled);
    assert!(manager.chain("h").is_empty());

    let input = record(json!({"x": 1}));
    assert_eq!(manager.apply("h", &input), record(json!({"x": 1})));
}

#[test]
fn cycle_in_subset_still_disables_whole_hook() {
    let manager = trail_builder(&[
        ("free", &["h"], &[]),
        ("A", &["h"], &["B"]),
        ("B", &["h"], &["A"]),
    ])
    .build()
    .unwrap();
    assert_eq!(manager.hook_state("h"), HookState::Disabled);
    assert_eq!(manager.apply("h", &DataRecord::new()), DataRecord::new());
}

// ---- Processor loading ----

#[test]
fn load_failure_drops_only_that_plugin_everywhere() {
    let manager = FilterManager::builder()
        .manifest(manifest("ok", &["h", "g"], &[]))
        .manifest(manifest("broken", &["h", "g"], &["ok"]))
        .manifest(manifest("after", &["h"], &["broken"]))
        .processor("ok", MockTransformer::trail("ok").handle())
        .processor(
            "broken",
            FnFactory(|m: &FilterManifest| -> Result<ProcessorHandle, OsuBotError> {
                Err(OsuBotError::ProcessorLoad {
                    name: m.name.clone(),
                    message: "entry point missing".into(),
                })
            }),
        )
        .processor("after", MockTransformer::trail("after").handle())
        .build()
        .unwrap();

    // Ordering still accounts for the broken plugin.
    assert_eq!(manager.chain("h"), ["ok", "broken", "after"]);
    assert_eq!(manager.compiled_chain("h").unwrap().names(), ["ok", "after"]);
    assert_eq!(manager.compiled_chain("g").unwrap().names(), ["ok"]);

    let out = manager.apply("h", &DataRecord::new());
    assert_eq!(out["trail"], json!(["ok", "after"]));
}

// ---- Execution ----

#[test]
fn failing_step_equals_chain_without_it() {
    let defs: &[(&str, &[&str], &[&str])] = &[
        ("A", &["h"], &[]),
        ("B", &["h"], &["A"]),
        ("C", &["h"], &["B"]),
    ];

    let with_failure = defs
        .iter()
        .fold(FilterManager::builder(), |b, (name, hooks, deps)| {
            let handle = if *name == "B" {
                MockTransformer::failing("B").handle()
            } else {
                MockTransformer::trail(*name).handle()
            };
            b.manifest(manifest(name, hooks, deps)).processor(*name, handle)
        })
        .build()
        .unwrap();

    let without = trail_builder(&[("A", &["h"], &[]), ("C", &["h"], &[])])
        .build()
        .unwrap();

    let input = record(json!({"user": "peppy"}));
    let outcome = with_failure.run("h", &input);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].filter, "B");
    assert_eq!(outcome.record, without.apply("h", &input));
}

#[test]
fn panicking_step_does_not_escape() {
    let manager = FilterManager::builder()
        .manifest(manifest("boom", &["h"], &[]))
        .manifest(manifest("tail", &["h"], &["boom"]))
        .processor("boom", MockTransformer::panicking("boom").handle())
        .processor("tail", MockTransformer::trail("tail").handle())
        .build()
        .unwrap();

    let out = manager.apply("h", &DataRecord::new());
    assert_eq!(out["trail"], json!(["tail"]));
}

#[test]
fn caller_record_is_untouched() {
    let manager = FilterManager::builder()
        .manifest(manifest("set", &["h"], &[]))
        .processor("set", MockTransformer::setting("set", "x", json!(99)).handle())
        .build()
        .unwrap();

    let input = record(json!({"x": 1}));
    let out = manager.apply("h", &input);
    assert_eq!(out["x"], json!(99));
    assert_eq!(input["x"], json!(1));
}

#[test]
fn unregistered_hook_is_identity() {
    let manager = trail_builder(&[("A", &["h"], &[])]).build().unwrap();
    let input = record(json!({"statistics": {"pp": 1234}}));
    assert_eq!(manager.apply("unregistered_hook", &input), input);
    assert_eq!(manager.hook_state("unregistered_hook"), HookState::Empty);
}

#[tokio::test]
async fn async_steps_run_strictly_in_sequence() {
    // The slow first step must finish before the fast second one starts.
    let slow = MockAsyncTransformer::new(MockTransformer::trail("slow"), Duration::from_millis(30));
    let fast = MockAsyncTransformer::new(MockTransformer::trail("fast"), Duration::from_millis(0));

    let manager = FilterManager::builder()
        .manifest(manifest("slow", &["h"], &[]))
        .manifest(manifest("fast", &["h"], &["slow"]))
        .processor("slow", slow.handle())
        .processor("fast", fast.handle())
        .build()
        .unwrap();

    let out = manager.apply_async("h", &DataRecord::new()).await;
    assert_eq!(out["trail"], json!(["slow", "fast"]));
}

#[tokio::test]
async fn mixed_sync_and_async_chain() {
    let manager = FilterManager::builder()
        .manifest(manifest("sync", &["h"], &[]))
        .manifest(manifest("async", &["h"], &["sync"]))
        .processor("sync", MockTransformer::trail("sync").handle())
        .processor(
            "async",
            MockAsyncTransformer::new(MockTransformer::trail("async"), Duration::from_millis(1))
                .handle(),
        )
        .build()
        .unwrap();

    let out = manager.apply_async("h", &DataRecord::new()).await;
    assert_eq!(out["trail"], json!(["sync", "async"]));

    // The synchronous apply cannot await; the async step is skipped.
    let outcome = manager.run("h", &DataRecord::new());
    assert_eq!(outcome.record["trail"], json!(["sync"]));
    assert_eq!(outcome.failures.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_applies_share_one_manager() {
    let counter = MockTransformer::trail("count");
    let calls = counter.calls();
    let manager = Arc::new(
        FilterManager::builder()
            .manifest(manifest("count", &["h"], &[]))
            .processor(
                "count",
                MockAsyncTransformer::new(counter, Duration::from_millis(5)).handle(),
            )
            .build()
            .unwrap(),
    );

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move {
                let input = record(json!({ "id": i }));
                manager.apply_async("h", &input).await
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let out = task.await.unwrap();
        assert_eq!(out["id"], json!(i));
        assert_eq!(out["trail"], json!(["count"]));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 16);
}

// ---- Discovery ----

#[test]
fn directory_discovery_builds_chains() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(
        tmp.path(),
        "user_card_extra",
        "[minifilter]\nname = \"user_card_extra\"\nhooks = [\"user_card\"]\ndepends = [\"user_card_basic\"]\n",
    );
    write_unit(
        tmp.path(),
        "user_card_basic",
        "[minifilter]\nname = \"user_card_basic\"\nhooks = [\"user_card\"]\n",
    );
    write_unit(tmp.path(), "broken", "[minifilter]\nversion = \"1.0.0\"\n");

    let manager = FilterManager::builder()
        .root(tmp.path())
        .processor("user_card_basic", MockTransformer::trail("basic").handle())
        .processor("user_card_extra", MockTransformer::trail("extra").handle())
        .build()
        .unwrap();

    assert_eq!(manager.registry().len(), 2);
    assert_eq!(manager.chain("user_card"), ["user_card_basic", "user_card_extra"]);
    let out = manager.apply("user_card", &DataRecord::new());
    assert_eq!(out["trail"], json!(["basic", "extra"]));
}

#[test]
fn repeated_builds_from_same_root_are_identical() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["d", "b", "a", "c", "e"] {
        write_unit(
            tmp.path(),
            name,
            &format!("[minifilter]\nname = \"{name}\"\nhooks = [\"h\"]\n"),
        );
    }
    write_unit(
        tmp.path(),
        "z",
        "[minifilter]\nname = \"z\"\nhooks = [\"h\"]\ndepends = [\"e\"]\n",
    );

    let build = || {
        FilterManager::builder()
            .root(tmp.path())
            .build()
            .unwrap()
            .chain("h")
            .to_vec()
    };
    let first = build();
    assert_eq!(first, ["a", "b", "c", "d", "e", "z"]);
    for _ in 0..5 {
        assert_eq!(build(), first);
    }
}

#[test]
fn static_manifests_take_precedence_over_disk() {
    let tmp = tempfile::tempdir().unwrap();
    write_unit(
        tmp.path(),
        "dup",
        "[minifilter]\nname = \"dup\"\nhooks = [\"disk_hook\"]\n",
    );

    let manager = FilterManager::builder()
        .manifest(manifest("dup", &["static_hook"], &[]))
        .root(tmp.path())
        .build()
        .unwrap();

    assert_eq!(manager.chain("static_hook"), ["dup"]);
    assert!(manager.chain("disk_hook").is_empty());
}
