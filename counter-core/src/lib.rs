/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Two tasks, one counter.
//!
//! An incrementing task and a decrementing task each apply one million unit
//! updates to the same [`SharedCounter`]. With the default
//! [`CounterMode::Racy`] the updates are plain read-then-write sequences, so
//! once the tasks actually run side by side some updates are lost and the
//! reported value is unpredictable. Limiting the executor to one worker
//! serializes the tasks and brings the result back to zero; the `atomic`
//! and `locked` modes do the same under any parallelism.

pub mod config;
pub mod coordinator;
pub mod counter;
pub mod task;
pub mod trials;

pub use anyhow::Context;

pub use crate::config::Config;
pub use crate::config::CounterMode;
pub use crate::config::WaitStrategy;
pub use crate::coordinator::run;
pub use crate::coordinator::Coordinator;
pub use crate::coordinator::Launched;
pub use crate::coordinator::Report;
pub use crate::counter::SharedCounter;
pub use crate::task::Direction;
pub use crate::task::MutationTask;
pub use crate::trials::run_trials;
pub use crate::trials::TrialSummary;

pub type Error = anyhow::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
