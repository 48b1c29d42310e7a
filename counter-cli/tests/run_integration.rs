/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Runs the built `magic-number` binary end to end.

use pretty_assertions::assert_eq;
use subprocess::Popen;
use subprocess::PopenConfig;
use subprocess::Redirection;

const BIN: &str = env!("CARGO_BIN_EXE_magic-number");

struct Outcome {
    success: bool,
    stdout: String,
    stderr: String,
}

fn raw_exec(args: &[&str]) -> Outcome {
    let mut argv = vec![BIN];
    argv.extend_from_slice(args);

    let mut p = Popen::create(
        argv.as_slice(),
        PopenConfig {
            stdout: Redirection::Pipe,
            stderr: Redirection::Pipe,
            env: Some(clean_env()),
            ..Default::default()
        },
    )
    .unwrap();

    let (out, err) = p.communicate(None).unwrap();
    let status = p.wait().unwrap();
    let stdout = out.unwrap_or_default();
    let stderr = err.unwrap_or_default();
    println!(
        "Guest output:\n----------------------------------------\n{}{}",
        stdout, stderr
    );
    Outcome {
        success: status.success(),
        stdout,
        stderr,
    }
}

/// The parent environment minus anything that would change the defaults.
fn clean_env() -> Vec<(std::ffi::OsString, std::ffi::OsString)> {
    std::env::vars_os()
        .filter(|(k, _)| !k.to_string_lossy().starts_with("MAGIC_") && k != "RUST_LOG")
        .collect()
}

fn parse_value(line: &str) -> i64 {
    line.strip_prefix("The magic number is: ")
        .unwrap_or_else(|| panic!("unexpected report line {:?}", line))
        .parse()
        .unwrap()
}

#[test]
fn no_arguments_prints_exactly_one_line() {
    let out = raw_exec(&[]);
    assert!(out.success);
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let value = parse_value(lines[0]);
    assert!((-1_000_000..=1_000_000).contains(&value));
}

#[test]
fn single_worker_prints_zero() {
    for _ in 0..3 {
        let out = raw_exec(&["--parallelism", "1", "--settle-ms", "1000"]);
        assert!(out.success);
        assert_eq!(out.stdout, "The magic number is: 0\n");
    }
}

#[test]
fn four_workers_print_an_integer() {
    let out = raw_exec(&["--parallelism", "4", "run"]);
    assert!(out.success);
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let value = parse_value(lines[0]);
    assert!((-1_000_000..=1_000_000).contains(&value));
}

#[test]
fn locked_join_matches_asymmetric_counts() {
    let out = raw_exec(&[
        "-p",
        "4",
        "--mode",
        "locked",
        "--wait",
        "join",
        "--decrements",
        "1000001",
    ]);
    assert!(out.success);
    assert_eq!(out.stdout, "The magic number is: -1\n");
}

#[test]
fn serialized_trials_are_deterministic() {
    let out = raw_exec(&[
        "-p",
        "1",
        "--wait",
        "join",
        "trials",
        "--count",
        "3",
        "--expect-deterministic",
    ]);
    assert!(out.success);
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "The magic number is: 0",
            "The magic number is: 0",
            "The magic number is: 0",
            "3 trials, parallelism 1, mode racy (unsynchronized): 1 distinct values, min 0, max 0",
        ]
    );
}

#[test]
fn trials_json_summary() {
    let out = raw_exec(&[
        "-p", "2", "--mode", "atomic", "--wait", "join", "trials", "-n", "2", "--json",
    ]);
    assert!(out.success);
    assert!(out.stdout.contains("\"deterministic\": true"));
    assert!(out.stdout.contains("\"values\": ["));
    assert!(!out.stdout.contains("The magic number is"));
}

#[test]
fn invalid_parallelism_is_rejected() {
    let out = raw_exec(&["--parallelism", "0"]);
    assert!(!out.success);
    assert_eq!(out.stdout, "");
    assert!(!out.stderr.is_empty());
}

#[test]
fn counts_beyond_i64_are_rejected_not_panicking() {
    let out = raw_exec(&[
        "-p",
        "1",
        "--settle-ms",
        "0",
        "--increments",
        "1",
        "--decrements",
        "9223372036854775808",
        "trials",
        "-n",
        "1",
    ]);
    assert!(!out.success);
    assert_eq!(out.stdout, "");
    assert!(out.stderr.contains("--decrements"));
    assert!(!out.stderr.contains("panicked"));
}

#[test]
fn logs_stay_off_stdout() {
    let out = raw_exec(&["--log", "debug", "-p", "1", "--wait", "join"]);
    assert!(out.success);
    assert_eq!(out.stdout, "The magic number is: 0\n");
    assert!(out.stderr.contains("launched mutation tasks"));
}
