/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Repeated runs under one configuration, to tell a deterministic result
//! from a racy one.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::coordinator;
use crate::coordinator::Report;
use crate::Result;

/// What a batch of trials produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrialSummary {
    pub config: Config,
    pub values: Vec<i64>,
    pub distinct: usize,
    pub min: i64,
    pub max: i64,
    /// True when every trial reported the same value.
    pub deterministic: bool,
    /// True when every value was the net total of a run with no lost update.
    pub all_expected: bool,
}

impl TrialSummary {
    pub fn from_reports(config: Config, reports: &[Report]) -> Self {
        let values: Vec<i64> = reports.iter().map(|r| r.value).collect();
        let distinct = values.iter().collect::<BTreeSet<_>>().len();
        let expected = config.expected_total();
        TrialSummary {
            min: values.iter().copied().min().unwrap_or(0),
            max: values.iter().copied().max().unwrap_or(0),
            deterministic: distinct <= 1,
            all_expected: values.iter().all(|v| *v == expected),
            distinct,
            values,
            config,
        }
    }

    pub fn trials(&self) -> usize {
        self.values.len()
    }
}

/// Runs `count` independent coordinator cycles, each with a fresh counter and
/// executor. `on_report` sees every report as it is produced.
pub fn run_trials<F>(config: &Config, count: NonZeroUsize, mut on_report: F) -> Result<TrialSummary>
where
    F: FnMut(usize, &Report),
{
    let mut reports = Vec::with_capacity(count.get());
    for trial in 0..count.get() {
        let report = coordinator::run(config.clone())?;
        debug!(trial, value = report.value, "trial complete");
        on_report(trial, &report);
        reports.push(report);
    }
    Ok(TrialSummary::from_reports(config.clone(), &reports))
}
