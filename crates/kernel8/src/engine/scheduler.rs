//! Single-threaded scheduling backends.
//!
//! ## Purpose
//!
//! This module provides the two backends the core crate ships with:
//! [`Sequential`], an ascending loop, and [`Vectorized`], which hands block
//! bodies runs of [`LANES`] elements at a time. Kernels that override
//! `Kernel::call_block` then process a whole run per call, on `wide` vector
//! lanes where the math layer provides them. Thread-parallel backends live
//! in extension crates and implement the same [`Scheduler`] trait.
//!
//! ## Invariants
//!
//! * Both backends visit elements in ascending index order.
//! * `body` is called exactly once per element, or once per run for the
//!   block entry points.

// Internal dependencies
use crate::primitives::backend::{BlockFn, ElementFn, Policy, Scheduler, ZipBlockFn, ZipFn};

/// Elements per run in the vectorized backend.
pub const LANES: usize = 8;

// ============================================================================
// Sequential
// ============================================================================

/// Plain ascending loop on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Scheduler for Sequential {
    fn policy(&self) -> Policy {
        Policy::Sequential
    }

    fn run(&self, elements: &mut [u8], stride: usize, first_index: usize, body: &ElementFn<'_>) {
        log::trace!("sequential run: {} elements", elements.len() / stride);
        for (k, element) in elements.chunks_exact_mut(stride).enumerate() {
            body(first_index + k, element);
        }
    }

    fn run_zip(
        &self,
        a: &mut [u8],
        b: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &ZipFn<'_>,
    ) {
        log::trace!("sequential zip: {} elements", a.len() / stride);
        let pairs = a.chunks_exact_mut(stride).zip(b.chunks_exact_mut(stride));
        for (k, (x, y)) in pairs.enumerate() {
            body(first_index + k, x, y);
        }
    }
}

// ============================================================================
// Vectorized
// ============================================================================

/// Lane-blocked loop on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vectorized;

impl Scheduler for Vectorized {
    fn policy(&self) -> Policy {
        Policy::Vectorized
    }

    fn run(&self, elements: &mut [u8], stride: usize, first_index: usize, body: &ElementFn<'_>) {
        log::trace!("vectorized run: {} elements", elements.len() / stride);
        for (b, block) in elements.chunks_mut(stride * LANES).enumerate() {
            let base = first_index + b * LANES;
            for (k, element) in block.chunks_exact_mut(stride).enumerate() {
                body(base + k, element);
            }
        }
    }

    fn run_zip(
        &self,
        a: &mut [u8],
        b: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &ZipFn<'_>,
    ) {
        log::trace!("vectorized zip: {} elements", a.len() / stride);
        let blocks = a
            .chunks_mut(stride * LANES)
            .zip(b.chunks_mut(stride * LANES));
        for (n, (xs, ys)) in blocks.enumerate() {
            let base = first_index + n * LANES;
            let pairs = xs.chunks_exact_mut(stride).zip(ys.chunks_exact_mut(stride));
            for (k, (x, y)) in pairs.enumerate() {
                body(base + k, x, y);
            }
        }
    }

    fn run_blocks(
        &self,
        elements: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &BlockFn<'_>,
    ) {
        log::trace!("vectorized blocks: {} elements", elements.len() / stride);
        for (b, block) in elements.chunks_mut(stride * LANES).enumerate() {
            body(first_index + b * LANES, block);
        }
    }

    fn run_zip_blocks(
        &self,
        a: &mut [u8],
        b: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &ZipBlockFn<'_>,
    ) {
        log::trace!("vectorized zip blocks: {} elements", a.len() / stride);
        let blocks = a
            .chunks_mut(stride * LANES)
            .zip(b.chunks_mut(stride * LANES));
        for (n, (xs, ys)) in blocks.enumerate() {
            body(first_index + n * LANES, xs, ys);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn visited(s: &dyn Scheduler, count: usize, first: usize) -> Vec<usize> {
        let seen = Mutex::new(Vec::new());
        let mut data = vec![0u8; count * 2];
        s.run(&mut data, 2, first, &|i, e| {
            e[0] = i as u8;
            seen.lock().unwrap().push(i);
        });
        seen.into_inner().unwrap()
    }

    #[test]
    fn backends_visit_every_index_once_in_order() {
        let expected: Vec<usize> = (3..3 + 19).collect();
        assert_eq!(visited(&Sequential, 19, 3), expected);
        assert_eq!(visited(&Vectorized, 19, 3), expected);
        assert!(visited(&Vectorized, 0, 0).is_empty());
    }

    #[test]
    fn zip_pairs_aligned_elements() {
        let mut a: Vec<u8> = (0..20).collect();
        let mut b: Vec<u8> = (100..120).collect();
        Vectorized.run_zip(&mut a, &mut b, 2, 0, &|_, x, y| x.swap_with_slice(y));
        assert_eq!(a[19], 119);
        assert_eq!(b[0], 0);
    }

    fn runs(s: &dyn Scheduler, count: usize, first: usize) -> Vec<(usize, usize)> {
        let seen = Mutex::new(Vec::new());
        let mut data = vec![0u8; count * 2];
        s.run_blocks(&mut data, 2, first, &|i, run| {
            seen.lock().unwrap().push((i, run.len() / 2));
        });
        seen.into_inner().unwrap()
    }

    #[test]
    fn block_runs_follow_backend() {
        let singles: Vec<(usize, usize)> = (4..4 + 19).map(|i| (i, 1)).collect();
        assert_eq!(runs(&Sequential, 19, 4), singles);
        assert_eq!(runs(&Vectorized, 19, 4), vec![(4, 8), (12, 8), (20, 3)]);

        let mut a = vec![1u8; 20];
        let mut b = vec![2u8; 20];
        let seen = Mutex::new(Vec::new());
        Vectorized.run_zip_blocks(&mut a, &mut b, 2, 0, &|i, xs, ys| {
            assert_eq!(xs.len(), ys.len());
            xs.swap_with_slice(ys);
            seen.lock().unwrap().push(i);
        });
        assert_eq!(seen.into_inner().unwrap(), vec![0, 8]);
        assert!(a.iter().all(|&x| x == 2));
        assert!(b.iter().all(|&x| x == 1));
    }
}
