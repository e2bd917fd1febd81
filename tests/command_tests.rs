mod common;

use execlog::commands::{
    execute_flame, execute_graph, execute_readable, execute_replay, execute_tree, parse_script,
    validate_log_args, FlameArgs, GraphArgs, LogArgs, ReplayArgs, TreeArgs,
};
use execlog::output::read_flame_chart;
use execlog::utils::config::UnderflowPolicy;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_log_file(dir: &TempDir) -> LogArgs {
    let path = dir.path().join("trace.log");
    fs::write(&path, common::sample_log()).unwrap();
    LogArgs {
        log_path: path,
        policy: UnderflowPolicy::Ignore,
    }
}

#[test]
fn test_flame_command_writes_chart() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out").join("flame.json");

    execute_flame(&FlameArgs {
        log: sample_log_file(&dir),
        max_depth: 1,
        output: Some(output.clone()),
    })
    .unwrap();

    let chart = read_flame_chart(&output).unwrap();
    let names: Vec<&str> = chart.calls.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["main", "somefunc", "someotherfunc"]);
    assert_eq!(chart.total_seconds, 86400.0);
}

#[test]
fn test_tree_command_writes_nested_json() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("tree.json");

    execute_tree(&TreeArgs {
        log: sample_log_file(&dir),
        max_depth: None,
        output: Some(output.clone()),
    })
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let func3 = &value[0]["sub_events"][0]["sub_events"][0];
    assert_eq!(func3["call_event"]["function_name"], "func3");
    assert_eq!(func3["return_event"]["timestamp"], "2015-01-20T14:30:35.001000");
}

#[test]
fn test_graph_command_json_and_dot() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("graph.json");
    let dot_path = dir.path().join("graph.dot");

    execute_graph(&GraphArgs {
        log: sample_log_file(&dir),
        dot: false,
        output: Some(json_path.clone()),
    })
    .unwrap();
    execute_graph(&GraphArgs {
        log: sample_log_file(&dir),
        dot: true,
        output: Some(dot_path.clone()),
    })
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);
    assert!(fs::read_to_string(&dot_path).unwrap().starts_with("digraph"));
}

#[test]
fn test_readable_command() {
    let dir = TempDir::new().unwrap();
    let mut out = Vec::new();

    execute_readable(&sample_log_file(&dir), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text.lines().nth(2).unwrap(),
        "2015-01-20T14:30:34.501000\tbaz.py:27\tcall\tfunc3"
    );
}

#[test]
fn test_replay_command_with_script() {
    let dir = TempDir::new().unwrap();
    let mut out = Vec::new();

    execute_replay(
        &ReplayArgs {
            log: sample_log_file(&dir),
            script: Some(parse_script("f, f, out, b").unwrap()),
        },
        &mut out,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "[1] forward: [foo.py:8]",
            "[2] forward: [foo.py:8, bar.py:22]",
            "[5] out: [foo.py:8]",
            "[4] backward: [foo.py:8, bar.py:22]",
        ]
    );
}

#[test]
fn test_replay_command_without_script_walks_whole_trace() {
    let dir = TempDir::new().unwrap();
    let mut out = Vec::new();

    execute_replay(
        &ReplayArgs {
            log: sample_log_file(&dir),
            script: None,
        },
        &mut out,
    )
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 8);
    assert_eq!(text.lines().last().unwrap(), "[8] forward: []");
}

#[test]
fn test_strict_policy_fails_on_stray_return() {
    let dir = TempDir::new().unwrap();
    let mut log = sample_log_file(&dir);
    let last_line = common::sample_log().lines().last().unwrap().to_string();
    fs::write(&log.log_path, common::sample_log() + &last_line + "\n").unwrap();

    let args = |policy| TreeArgs {
        log: LogArgs {
            log_path: log.log_path.clone(),
            policy,
        },
        max_depth: None,
        output: Some(dir.path().join("tree.json")),
    };

    assert!(execute_tree(&args(UnderflowPolicy::Ignore)).is_ok());
    assert!(execute_tree(&args(UnderflowPolicy::Fail)).is_err());

    log.policy = UnderflowPolicy::Fail;
    assert!(execute_flame(&FlameArgs {
        log,
        max_depth: 100,
        output: Some(dir.path().join("flame.json")),
    })
    .is_err());
}

#[test]
fn test_malformed_log_reports_line() {
    let dir = TempDir::new().unwrap();
    let log = sample_log_file(&dir);
    fs::write(&log.log_path, "\n{\"type\": \"line\"}\n").unwrap();

    let err = execute_tree(&TreeArgs {
        log,
        max_depth: None,
        output: None,
    })
    .unwrap_err();

    assert!(format!("{:#}", err).contains("line 2"));
}

#[test]
fn test_validate_log_args() {
    let dir = TempDir::new().unwrap();

    assert!(validate_log_args(&LogArgs::default()).is_err());
    assert!(validate_log_args(&LogArgs {
        log_path: PathBuf::from("/nonexistent/trace.log"),
        policy: UnderflowPolicy::Ignore,
    })
    .is_err());
    assert!(validate_log_args(&LogArgs {
        log_path: dir.path().to_path_buf(),
        policy: UnderflowPolicy::Ignore,
    })
    .is_err());
    assert!(validate_log_args(&sample_log_file(&dir)).is_ok());
}
