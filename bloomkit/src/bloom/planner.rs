// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Sizing of Bloom filters from a target capacity and false positive rate.
//!
//! The planner starts from the classical optimum `m = -n ln(p) / ln(2)^2`,
//! `k = ceil((m / n) ln(2))` and then grows `m` one bit at a time until the Goel-Gupta upper
//! bound [`fpr_bound`] honors the requested rate. Honoring the bound rather than the asymptotic
//! [`approx_fpr`] costs a handful of extra bits.

use std::f64::consts::LN_2;

use log::debug;
use log::trace;

use crate::error::Error;

/// Smallest bit count a filter may have.
pub const MIN_NUM_BITS: u64 = 1;
/// Largest bit count a filter may have.
pub const MAX_NUM_BITS: u64 = i32::MAX as u64 * 64;
/// Smallest number of hash functions a filter may have.
pub const MIN_NUM_HASHES: u16 = 1;
/// Largest number of hash functions a filter may have.
pub const MAX_NUM_HASHES: u16 = i16::MAX as u16;
/// Most single-bit increments [`plan`] performs before giving up.
pub const MAX_SIZING_STEPS: u64 = 1 << 28;

/// Bit count and hash function count of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterParams {
    /// Number of bits (m).
    pub num_bits: u64,
    /// Number of hash functions (k).
    pub num_hashes: u16,
}

/// Goel-Gupta upper bound on the false positive probability of a filter with `k` hash functions
/// and `m` bits after `n` insertions.
///
/// Formula: `(1 - exp(-(k (n + 0.5)) / (m - 1)))^k`
///
/// This is a theoretical bound; observed rates on a concrete filter may exceed it.
///
/// # Examples
///
/// ```
/// # use bloomkit::bloom::planner::fpr_bound;
/// assert_eq!(fpr_bound(7, 0, 1000), (1.0 - (-3.5_f64 / 999.0).exp()).powf(7.0));
/// assert_eq!(fpr_bound(3, 10, 1), 1.0);
/// ```
pub fn fpr_bound(k: u16, n: u64, m: u64) -> f64 {
    let k = f64::from(k);
    let n = n as f64;
    let m = m as f64;
    // m = 1 divides by zero: exp(-inf) = 0, which gives a bound of 1.
    (1.0 - (-(k * (n + 0.5)) / (m - 1.0)).exp()).powf(k)
}

/// Standard asymptotic approximation of the false positive probability.
///
/// Formula: `(1 - exp(-(k n) / m))^k`
///
/// Secondary estimate only; [`plan`] sizes filters against [`fpr_bound`].
pub fn approx_fpr(k: u16, n: u64, m: u64) -> f64 {
    let k = f64::from(k);
    let n = n as f64;
    let m = m as f64;
    (1.0 - (-(k * n) / m).exp()).powf(k)
}

/// Suggests the optimal number of bits given a capacity and target false positive rate.
///
/// Formula: `m = ceil(-n ln(p) / ln(2)^2)`, clamped to
/// [`MIN_NUM_BITS`]..=[`MAX_NUM_BITS`].
///
/// # Examples
///
/// ```
/// # use bloomkit::bloom::planner::suggest_num_bits;
/// assert_eq!(suggest_num_bits(1000, 0.01), 9586);
/// ```
pub fn suggest_num_bits(capacity: u64, fpr: f64) -> u64 {
    let n = capacity as f64;
    let bits = (-n * fpr.ln() / (LN_2 * LN_2)).ceil() as u64;
    bits.clamp(MIN_NUM_BITS, MAX_NUM_BITS)
}

/// Suggests the optimal number of hash functions given a capacity and bit count.
///
/// Formula: `k = ceil((m / n) ln(2))`, clamped to
/// [`MIN_NUM_HASHES`]..=[`MAX_NUM_HASHES`].
///
/// # Examples
///
/// ```
/// # use bloomkit::bloom::planner::suggest_num_hashes;
/// assert_eq!(suggest_num_hashes(1000, 10000), 7);
/// ```
pub fn suggest_num_hashes(capacity: u64, num_bits: u64) -> u16 {
    let m = num_bits as f64;
    let n = capacity as f64;

    // Ceil to avoid selecting too few hashes.
    let k = (m / n * LN_2).ceil();
    k.clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u16
}

/// Derives the filter parameters that keep [`fpr_bound`] at or below `fpr` once `capacity`
/// items have been inserted.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
/// `capacity` is 0, if `fpr` is not strictly between 0 and 1, or if no filter within
/// [`MAX_NUM_BITS`] is found in [`MAX_SIZING_STEPS`] increments.
///
/// # Examples
///
/// ```
/// # use bloomkit::bloom::planner::{fpr_bound, plan};
/// let params = plan(100, 0.05).unwrap();
/// assert!(fpr_bound(params.num_hashes, 100, params.num_bits) <= 0.05);
/// assert!(plan(100, 1.0).is_err());
/// ```
pub fn plan(capacity: u64, fpr: f64) -> Result<FilterParams, Error> {
    if capacity == 0 {
        return Err(Error::invalid_argument("capacity must be greater than 0")
            .with_context("capacity", capacity));
    }
    // written this way so that NaN is rejected too
    if !(fpr > 0.0 && fpr < 1.0) {
        return Err(
            Error::invalid_argument("false positive rate must be between 0 and 1 (exclusive)")
                .with_context("fpr", fpr),
        );
    }

    let mut num_bits = suggest_num_bits(capacity, fpr);
    let mut num_hashes = suggest_num_hashes(capacity, num_bits);
    debug!(
        "initial bloom filter estimate for capacity {capacity} and fpr {fpr}: m={num_bits}, k={num_hashes}"
    );

    let mut steps = 0;
    while fpr_bound(num_hashes, capacity, num_bits) > fpr {
        if steps == MAX_SIZING_STEPS || num_bits == MAX_NUM_BITS {
            return Err(
                Error::invalid_argument("no filter size satisfies the false positive bound")
                    .with_context("capacity", capacity)
                    .with_context("fpr", fpr)
                    .with_context("num_bits", num_bits)
                    .with_context("steps", steps),
            );
        }
        num_bits += 1;
        num_hashes = suggest_num_hashes(capacity, num_bits);
        steps += 1;
        trace!("sizing step {steps}: m={num_bits}, k={num_hashes}");
    }

    debug!(
        "planned bloom filter for capacity {capacity} and fpr {fpr}: m={num_bits}, k={num_hashes} after {steps} steps"
    );
    Ok(FilterParams {
        num_bits,
        num_hashes,
    })
}

#[cfg(test)]
mod tests {
    use googletest::assert_that;
    use googletest::prelude::ge;
    use googletest::prelude::le;
    use googletest::prelude::near;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_bound_dominates_approximation() {
        for (k, n, m) in [(7, 1000, 9586), (3, 10, 64), (1, 1, 2), (12, 500, 8000)] {
            assert_that!(fpr_bound(k, n, m), ge(approx_fpr(k, n, m)));
        }
    }

    #[test]
    fn test_empty_filter_approximation_is_zero() {
        assert_eq!(approx_fpr(5, 0, 100), 0.0);
        assert!(fpr_bound(5, 0, 100) > 0.0);
    }

    #[test]
    fn test_approx_fpr_known_value() {
        // 10 bits per item with 7 hashes is the textbook ~0.82% configuration
        assert_that!(approx_fpr(7, 1000, 10000), near(0.00819, 0.00001));
    }

    #[test]
    fn test_suggestions() {
        assert_eq!(suggest_num_bits(100, 0.05), 624);
        assert_eq!(suggest_num_hashes(100, 624), 5);
        assert_eq!(suggest_num_bits(1, 0.99), 1);
        assert_eq!(suggest_num_hashes(1_000_000, 1), MIN_NUM_HASHES);
    }

    #[test]
    fn test_plan_honors_bound() {
        for (capacity, fpr) in [(100, 0.05), (1000, 0.01), (1, 0.5), (1, 0.99), (10, 1e-9)] {
            let params = plan(capacity, fpr).unwrap();
            assert_that!(fpr_bound(params.num_hashes, capacity, params.num_bits), le(fpr));
            assert!(params.num_bits >= suggest_num_bits(capacity, fpr));
        }
    }

    #[test]
    fn test_plan_is_minimal_increment() {
        let params = plan(100, 0.05).unwrap();
        let previous = params.num_bits - 1;
        if previous >= suggest_num_bits(100, 0.05) {
            let k = suggest_num_hashes(100, previous);
            assert!(fpr_bound(k, 100, previous) > 0.05);
        }
    }

    #[test]
    fn test_plan_rejects_invalid_arguments() {
        for fpr in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = plan(100, fpr).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        let err = plan(0, 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.context("capacity"), Some("0"));
    }

    #[test]
    fn test_plan_tiny_capacity_tiny_rate() {
        let params = plan(1, 1e-300).unwrap();
        assert!(fpr_bound(params.num_hashes, 1, params.num_bits) <= 1e-300);
    }
}
