//! Pairing and extraction.
//!
//! ## Purpose
//!
//! A `Pair(k)` is a `Buffer(k+1)` formed by concatenating a first ("high")
//! and a second ("low") `Buffer(k)`. The functions here are the only
//! operations that change the order of a buffer.
//!
//! ## Invariants
//!
//! * `high(combine(a, b)) == a` and `low(combine(a, b)) == b`.
//! * `duplicate(a) == combine(a, a)`.

// Internal dependencies
use crate::primitives::errors::KernelError;
use crate::primitives::state::State;

/// Concatenate two same-order states into one of the next order up.
pub fn combine(a: &State, b: &State) -> Result<State, KernelError> {
    let mut out = State::zero(a.order().double()?);
    combine_into(a, b, &mut out)?;
    Ok(out)
}

/// Concatenate `a` and `b` into an existing pair buffer.
pub fn combine_into(a: &State, b: &State, out: &mut State) -> Result<(), KernelError> {
    if a.order() != b.order() {
        return Err(KernelError::OrderMismatch {
            role: "pair half",
            expected: a.order().get(),
            got: b.order().get(),
        });
    }
    let pair = a.order().double()?;
    if out.order() != pair {
        return Err(KernelError::OrderMismatch {
            role: "pair",
            expected: pair.get(),
            got: out.order().get(),
        });
    }
    let (high, low) = halves_mut(out.as_bytes_mut());
    high.copy_from_slice(a.as_bytes());
    low.copy_from_slice(b.as_bytes());
    Ok(())
}

/// `combine(a, a)`.
pub fn duplicate(a: &State) -> Result<State, KernelError> {
    combine(a, a)
}

/// Copy out the first half of a pair.
pub fn high(pair: &State) -> Result<State, KernelError> {
    State::from_bytes(pair.order().half()?, high_ref(pair.as_bytes()))
}

/// Copy out the second half of a pair.
pub fn low(pair: &State) -> Result<State, KernelError> {
    State::from_bytes(pair.order().half()?, low_ref(pair.as_bytes()))
}

/// Borrow the first half of a pair's bytes.
#[inline]
pub fn high_ref(pair: &[u8]) -> &[u8] {
    &pair[..pair.len() / 2]
}

/// Borrow the second half of a pair's bytes.
#[inline]
pub fn low_ref(pair: &[u8]) -> &[u8] {
    &pair[pair.len() / 2..]
}

/// Split a pair's bytes into its two mutable halves.
#[inline]
pub fn halves_mut(pair: &mut [u8]) -> (&mut [u8], &mut [u8]) {
    let half = pair.len() / 2;
    pair.split_at_mut(half)
}

/// Write `high` and `low` into a pair buffer; both must be half its size.
#[inline]
pub(crate) fn fill_pair(pair: &mut [u8], high: &[u8], low: &[u8]) {
    let (h, l) = halves_mut(pair);
    h.copy_from_slice(high);
    l.copy_from_slice(low);
}
