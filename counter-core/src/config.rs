/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Run configuration and the small enums it is built from.

use std::fmt;
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use serde::Serialize;

/// Number of unit operations each mutation task performs by default.
pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

/// Largest accepted increment or decrement count. The counter is an `i64`.
pub const MAX_ITERATIONS: u64 = i64::MAX as u64;

/// How long the sleep strategy waits before reading the counter, in milliseconds.
pub const DEFAULT_SETTLE_MS: u64 = 100;

/// Configuration for one coordinator run.
#[derive(Debug, Serialize, Deserialize, Clone, Parser, PartialEq, Eq)]
pub struct Config {
    /// Number of executor worker threads allowed to run tasks at the same
    /// time. Defaults to one per available CPU. With a value of 1 the two
    /// tasks run one after the other.
    #[clap(long, short = 'p', env = "MAGIC_PARALLELISM", value_name = "N")]
    pub parallelism: Option<NonZeroUsize>,

    /// How the shared counter is mutated: racy|atomic|locked.
    #[clap(long, env = "MAGIC_MODE", default_value = "racy", value_name = "MODE")]
    pub mode: CounterMode,

    /// How the coordinator waits for the tasks: sleep|join.
    #[clap(long, env = "MAGIC_WAIT", default_value = "sleep", value_name = "STRATEGY")]
    pub wait: WaitStrategy,

    /// Milliseconds to sleep before reading the counter under `--wait sleep`.
    #[clap(long, default_value_t = DEFAULT_SETTLE_MS, value_name = "MS")]
    pub settle_ms: u64,

    /// Number of increments performed by the incrementing task.
    #[clap(
        long,
        default_value_t = DEFAULT_ITERATIONS,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(..=MAX_ITERATIONS)
    )]
    pub increments: u64,

    /// Number of decrements performed by the decrementing task.
    #[clap(
        long,
        default_value_t = DEFAULT_ITERATIONS,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(..=MAX_ITERATIONS)
    )]
    pub decrements: u64,
}

impl Config {
    /// Effective worker count, resolving the CPU-count default.
    pub fn parallelism(&self) -> usize {
        self.parallelism
            .map(NonZeroUsize::get)
            .unwrap_or_else(num_cpus::get)
            .max(1)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// The value the counter ends at when no update is lost.
    pub fn expected_total(&self) -> i64 {
        clamp_count(self.increments) - clamp_count(self.decrements)
    }

    /// Every value the counter can hold at any point of a run, in any mode.
    pub fn bounds(&self) -> RangeInclusive<i64> {
        -clamp_count(self.decrements)..=clamp_count(self.increments)
    }
}

/// Counts past `MAX_ITERATIONS` are rejected by clap, but a deserialized or
/// hand-built `Config` can still carry one.
fn clamp_count(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// The defaults clap applies when no flag and no `MAGIC_*` variable is set.
impl Default for Config {
    fn default() -> Self {
        Config {
            parallelism: None,
            mode: CounterMode::Racy,
            wait: WaitStrategy::Sleep,
            settle_ms: DEFAULT_SETTLE_MS,
            increments: DEFAULT_ITERATIONS,
            decrements: DEFAULT_ITERATIONS,
        }
    }
}

/// How the shared counter applies each +1/-1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CounterMode {
    /// Separate load and store. Concurrent updates can overwrite each other.
    Racy,
    /// A single atomic read-modify-write per update.
    Atomic,
    /// Every update happens while holding a mutex.
    Locked,
}

impl CounterMode {
    /// Whether the final value is `increments - decrements` once both tasks
    /// have completed, independent of scheduling.
    pub fn is_synchronized(self) -> bool {
        !matches!(self, CounterMode::Racy)
    }
}

impl FromStr for CounterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "racy" | "unsafe" => Ok(CounterMode::Racy),
            "atomic" => Ok(CounterMode::Atomic),
            "locked" | "mutex" => Ok(CounterMode::Locked),
            _ => Err(format!(
                "Expected Racy|Atomic|Locked, could not parse: {:?}",
                s
            )),
        }
    }
}

impl fmt::Display for CounterMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            CounterMode::Racy => "racy",
            CounterMode::Atomic => "atomic",
            CounterMode::Locked => "locked",
        };
        f.write_str(s)
    }
}

/// How the coordinator decides the tasks are done.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WaitStrategy {
    /// Drop the completion handles and sleep for the settle duration. The
    /// tasks may still be running when the counter is read.
    Sleep,
    /// Block on both completion handles.
    Join,
}

impl FromStr for WaitStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sleep" => Ok(WaitStrategy::Sleep),
            "join" => Ok(WaitStrategy::Join),
            _ => Err(format!("Expected Sleep|Join, could not parse: {:?}", s)),
        }
    }
}

impl fmt::Display for WaitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WaitStrategy::Sleep => f.write_str("sleep"),
            WaitStrategy::Join => f.write_str("join"),
        }
    }
}
