/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;

use crate::counter::SharedCounter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Increment,
    Decrement,
}

impl Direction {
    fn delta(self) -> i64 {
        match self {
            Direction::Increment => 1,
            Direction::Decrement => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Increment => f.write_str("incrementing"),
            Direction::Decrement => f.write_str("decrementing"),
        }
    }
}

/// A unit of concurrent work: `iterations` read-modify-write cycles on the
/// shared counter, all in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationTask {
    pub direction: Direction,
    pub iterations: u64,
}

impl MutationTask {
    pub fn incrementing(iterations: u64) -> Self {
        MutationTask {
            direction: Direction::Increment,
            iterations,
        }
    }

    pub fn decrementing(iterations: u64) -> Self {
        MutationTask {
            direction: Direction::Decrement,
            iterations,
        }
    }

    /// Runs the whole loop without yielding. The only effect is on `counter`.
    #[inline(never)]
    pub fn run(&self, counter: &SharedCounter) {
        let delta = self.direction.delta();
        for _ in 0..self.iterations {
            counter.add(delta);
        }
    }
}
