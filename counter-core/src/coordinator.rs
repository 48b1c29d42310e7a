/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Launches the two mutation tasks and reports the counter.
//!
//! A run moves through three states, each its own type:
//!
//! * [`Coordinator`]: NotStarted. The executor and the counter exist, no task
//!   has been spawned.
//! * [`Launched`]: Running. Both tasks are spawned and their completion
//!   handles are held.
//! * [`Report`]: Reported. The counter was read.
//!
//! The executor is a multi-threaded tokio runtime with exactly
//! `parallelism` workers. The tasks never yield, so a worker that picks one
//! up runs it to the end. With a single worker the second task cannot start
//! until the first has finished.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::Config;
use crate::config::CounterMode;
use crate::config::WaitStrategy;
use crate::counter::SharedCounter;
use crate::task::Direction;
use crate::task::MutationTask;
use crate::Context;
use crate::Result;

/// The value read at the end of a run, with the settings that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub value: i64,
    pub parallelism: usize,
    pub mode: CounterMode,
    pub wait: WaitStrategy,
    /// Tasks that had not finished when the counter was read. Always zero for
    /// the join strategy.
    pub unfinished_tasks: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "The magic number is: {}", self.value)
    }
}

/// A run that has not launched its tasks yet.
pub struct Coordinator {
    config: Config,
    counter: Arc<SharedCounter>,
    runtime: Runtime,
}

impl Coordinator {
    /// Builds the executor with `config.parallelism()` workers and a fresh
    /// counter.
    pub fn new(config: Config) -> Result<Self> {
        let parallelism = config.parallelism();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(parallelism)
            .thread_name("counter-worker")
            .build()
            .with_context(|| format!("Failed to start executor with {} workers", parallelism))?;
        let counter = Arc::new(SharedCounter::new(config.mode));
        debug!(parallelism, mode = %counter.mode(), "executor ready");
        Ok(Coordinator {
            config,
            counter,
            runtime,
        })
    }

    /// Spawns the incrementing task, then the decrementing task. Does not
    /// block on either.
    pub fn launch(self) -> Launched {
        let Coordinator {
            config,
            counter,
            runtime,
        } = self;

        let tasks = [
            MutationTask::incrementing(config.increments),
            MutationTask::decrementing(config.decrements),
        ];
        let handles = tasks
            .into_iter()
            .map(|task| {
                let counter = Arc::clone(&counter);
                let handle = runtime.spawn(async move { task.run(&counter) });
                (task.direction, handle)
            })
            .collect();

        info!(
            parallelism = config.parallelism(),
            mode = %config.mode,
            increments = config.increments,
            decrements = config.decrements,
            "launched mutation tasks"
        );

        Launched {
            config,
            counter,
            runtime,
            handles,
        }
    }
}

/// A run whose tasks are (or were) executing.
pub struct Launched {
    config: Config,
    counter: Arc<SharedCounter>,
    runtime: Runtime,
    handles: Vec<(Direction, JoinHandle<()>)>,
}

impl Launched {
    /// Completion handles, in launch order.
    pub fn handles(&self) -> impl Iterator<Item = (Direction, &JoinHandle<()>)> {
        self.handles.iter().map(|(d, h)| (*d, h))
    }

    /// Number of tasks that have not completed yet.
    pub fn running(&self) -> usize {
        self.handles.iter().filter(|(_, h)| !h.is_finished()).count()
    }

    /// Waits the way the configuration asks for.
    pub fn wait(self) -> Result<Report> {
        match self.config.wait {
            WaitStrategy::Sleep => {
                let settle = self.config.settle();
                Ok(self.sleep(settle))
            }
            WaitStrategy::Join => self.join(),
        }
    }

    /// Discards the completion handles, blocks the calling thread for
    /// `settle`, then reads whatever the counter holds.
    pub fn sleep(self, settle: std::time::Duration) -> Report {
        debug!(?settle, "sleeping instead of joining");
        std::thread::sleep(settle);

        let unfinished = self.running();
        if unfinished > 0 {
            warn!(
                unfinished,
                "reading the counter while mutation tasks are still running"
            );
        }
        let Launched {
            config,
            counter,
            runtime,
            handles,
        } = self;
        drop(handles);
        report(&config, &counter, runtime, unfinished)
    }

    /// Blocks until both tasks have completed, then reads the counter.
    pub fn join(self) -> Result<Report> {
        let Launched {
            config,
            counter,
            runtime,
            handles,
        } = self;
        for (direction, handle) in handles {
            runtime
                .block_on(handle)
                .with_context(|| format!("The {} task did not complete", direction))?;
            debug!(%direction, "task joined");
        }
        Ok(report(&config, &counter, runtime, 0))
    }
}

fn report(config: &Config, counter: &SharedCounter, runtime: Runtime, unfinished: usize) -> Report {
    let value = counter.get();
    // Tasks still running keep their worker threads; do not wait on them.
    runtime.shutdown_background();
    let report = Report {
        value,
        parallelism: config.parallelism(),
        mode: counter.mode(),
        wait: config.wait,
        unfinished_tasks: unfinished,
    };
    info!(value, unfinished, "counter read");
    report
}

/// Runs one full NotStarted -> Running -> Reported cycle.
pub fn run(config: Config) -> Result<Report> {
    Coordinator::new(config)?.launch().wait()
}
