/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use anyhow::Result;
use counter_core::Config;

/// Runs the race once and prints the single report line.
pub fn main(config: &Config) -> Result<()> {
    let report = counter_core::run(config.clone())?;
    println!("{}", report);
    Ok(())
}
