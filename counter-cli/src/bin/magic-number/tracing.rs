/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fs::File;
use std::io;
use std::io::stderr;
use std::io::IsTerminal;

use anyhow::Context;
use tracing::metadata::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_TRACE_LEVEL: LevelFilter = LevelFilter::WARN;

fn env_filter(level: Option<LevelFilter>) -> EnvFilter {
    let level = level.unwrap_or(DEFAULT_TRACE_LEVEL);
    EnvFilter::from_default_env().add_directive(level.into())
}

/// Returns a non-blocking subscriber for logging to a file.
fn file_subscriber(level: Option<LevelFilter>, f: File) -> (impl Subscriber, impl Drop) {
    let (writer, guard) = tracing_appender::non_blocking(f);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(writer)
        .with_ansi(false)
        .finish();

    (subscriber, guard)
}

/// Initializes tracing to the given file `f`. Events are flushed when the
/// returned guard is dropped.
pub fn init_file_tracing(level: Option<LevelFilter>, f: File) -> anyhow::Result<impl Drop> {
    let (subscriber, guard) = file_subscriber(level, f);

    subscriber
        .try_init()
        .context("Failed to install the global tracing subscriber")?;

    Ok(guard)
}

/// Returns a tracing subscriber that logs to `stderr`. Stdout is reserved for
/// the report.
pub fn stderr_subscriber(level: Option<LevelFilter>) -> impl Subscriber {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(io::stderr)
        .with_ansi(stderr().is_terminal())
        .finish()
}

/// Initializes tracing to `stderr`.
pub fn init_stderr_tracing(level: Option<LevelFilter>) -> anyhow::Result<()> {
    stderr_subscriber(level)
        .try_init()
        .context("Failed to install the global tracing subscriber")
}
