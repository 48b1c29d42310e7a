/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

// Treat all Clippy warnings as errors.
#![deny(clippy::all)]

mod global_opts;
mod run;
mod tracing;
mod trials;

use anyhow::Error;
use clap::Parser;
use colored::*;
use counter_core::Config;

use self::global_opts::GlobalOpts;
use self::trials::TrialsOpts;

/// Two tasks increment and decrement one shared counter a million times each,
/// then the value is printed. Without synchronization, and with more than one
/// worker, the printed value is rarely zero.
///
/// Run options go before the subcommand, e.g. `magic-number -p 1 trials`.
#[derive(Debug, Parser)]
#[clap(name = "magic-number", version)]
struct Args {
    #[clap(flatten)]
    global: GlobalOpts,

    #[clap(flatten)]
    config: Config,

    #[clap(subcommand)]
    command: Option<Subcommand>,
}

#[derive(Debug, Parser)]
enum Subcommand {
    /// Run the race once and print the counter (the default).
    #[clap(name = "run")]
    Run,

    /// Run the race several times and report whether the value changed.
    #[clap(name = "trials")]
    Trials(TrialsOpts),
}

impl Args {
    fn main(&self) -> Result<(), Error> {
        let _guard = self.global.init_tracing()?;
        match &self.command {
            None | Some(Subcommand::Run) => run::main(&self.config),
            Some(Subcommand::Trials(x)) => x.main(&self.config),
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(err) = args.main() {
        display_error(err);
        std::process::exit(1);
    }
}

fn display_error(error: Error) {
    let mut chain = error.chain();

    if let Some(error) = chain.next() {
        eprintln!("{}: {}", "Error".red().bold(), error);
    }

    for cause in chain {
        eprintln!("     {} {}", ">".dimmed().bold(), cause);
    }
}
