/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::num::NonZeroUsize;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use counter_core::Config;
use counter_core::TrialSummary;

/// Command-line options for the "trials" subcommand.
#[derive(Debug, Parser)]
pub struct TrialsOpts {
    /// Number of runs.
    #[clap(long, short = 'n', default_value = "10", value_name = "N")]
    count: NonZeroUsize,

    /// Print the summary as JSON instead of text.
    #[clap(long)]
    json: bool,

    /// Fail unless every run printed the same value.
    #[clap(long)]
    expect_deterministic: bool,
}

impl TrialsOpts {
    pub fn main(&self, config: &Config) -> Result<()> {
        let summary = counter_core::run_trials(config, self.count, |_, report| {
            if !self.json {
                println!("{}", report);
            }
        })?;

        if self.json {
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize the trial summary")?;
            println!("{}", json);
        } else {
            print_summary(&summary);
        }

        if summary.deterministic {
            eprintln!("{}", "Deterministic.".green().bold());
        } else {
            eprintln!(
                "{}",
                format!("Not deterministic: {} distinct values.", summary.distinct)
                    .yellow()
                    .bold()
            );
            if self.expect_deterministic {
                anyhow::bail!(
                    "{} trials produced {} distinct values between {} and {}",
                    summary.trials(),
                    summary.distinct,
                    summary.min,
                    summary.max
                );
            }
        }
        Ok(())
    }
}

fn print_summary(summary: &TrialSummary) {
    println!(
        "{} trials, parallelism {}, mode {} ({}): {} distinct values, min {}, max {}",
        summary.trials(),
        summary.config.parallelism(),
        summary.config.mode,
        if summary.config.mode.is_synchronized() {
            "synchronized"
        } else {
            "unsynchronized"
        },
        summary.distinct,
        summary.min,
        summary.max
    );
}
