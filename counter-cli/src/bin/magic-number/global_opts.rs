/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::metadata::LevelFilter;

use super::tracing::init_file_tracing;
use super::tracing::init_stderr_tracing;

/// Options common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct GlobalOpts {
    /// The verbosity level of log output.
    #[clap(short, long, value_name = "LEVEL", env = "MAGIC_LOG")]
    pub log: Option<LevelFilter>,

    /// Log to a file instead of the terminal.
    #[clap(long, value_name = "FILE", env = "MAGIC_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOpts {
    /// Initializes tracing. The returned guard, if any, must outlive every
    /// event that should reach the log file.
    pub fn init_tracing(&self) -> anyhow::Result<Option<impl Drop>> {
        if let Some(path) = &self.log_file {
            let file_writer = File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Ok(Some(init_file_tracing(self.log, file_writer)?))
        } else {
            init_stderr_tracing(self.log)?;
            Ok(None)
        }
    }
}
