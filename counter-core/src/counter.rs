/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The one shared integer both mutation tasks fight over.
//!
//! Ownership: a single `SharedCounter` is created per coordinator run and
//! handed to both tasks behind an `Arc`. It lives until the last of the
//! coordinator and the two tasks drops its reference, which, for the sleep
//! strategy, may be after the value has already been reported.

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::config::CounterMode;

/// A signed counter, starting at zero, mutated according to its mode.
#[derive(Debug)]
pub enum SharedCounter {
    /// Read-modify-write as two separate steps.
    Racy(AtomicI64),
    Atomic(AtomicI64),
    Locked(Mutex<i64>),
}

impl SharedCounter {
    pub fn new(mode: CounterMode) -> Self {
        match mode {
            CounterMode::Racy => SharedCounter::Racy(AtomicI64::new(0)),
            CounterMode::Atomic => SharedCounter::Atomic(AtomicI64::new(0)),
            CounterMode::Locked => SharedCounter::Locked(Mutex::new(0)),
        }
    }

    pub fn mode(&self) -> CounterMode {
        match self {
            SharedCounter::Racy(_) => CounterMode::Racy,
            SharedCounter::Atomic(_) => CounterMode::Atomic,
            SharedCounter::Locked(_) => CounterMode::Locked,
        }
    }

    /// Apply `delta` once.
    #[inline]
    pub fn add(&self, delta: i64) {
        match self {
            SharedCounter::Racy(cell) => {
                // Another task can store between these two lines; its update is
                // then overwritten by ours.
                let current = cell.load(Ordering::Relaxed);
                cell.store(current.wrapping_add(delta), Ordering::Relaxed);
            }
            SharedCounter::Atomic(cell) => {
                cell.fetch_add(delta, Ordering::SeqCst);
            }
            SharedCounter::Locked(cell) => {
                let mut guard = cell.lock().unwrap_or_else(PoisonError::into_inner);
                *guard += delta;
            }
        }
    }

    /// Current value. Under the sleep strategy this may be read while the
    /// tasks are still mutating.
    pub fn get(&self) -> i64 {
        match self {
            SharedCounter::Racy(cell) | SharedCounter::Atomic(cell) => cell.load(Ordering::SeqCst),
            SharedCounter::Locked(cell) => *cell.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}
