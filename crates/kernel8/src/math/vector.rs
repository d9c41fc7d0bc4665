//! Lane-blocked opcode bodies on `wide` vectors.
//!
//! ## Purpose
//!
//! Block bodies for the binary opcodes whose lanes fit a `wide` vector:
//! 32-bit integers on `i32x8`, `f32` on `f32x8` and `f64` on `f64x4`. A run
//! is a sequence of pairs `[high, low]`; full groups of pairs go through the
//! vector unit and the remaining pairs are evaluated one at a time.
//!
//! ## Design notes
//!
//! * **Bit-exact**: Every lane equals the scalar opcode. Wrapping add, sub and
//!   mul and the bitwise opcodes do not depend on signedness, so one `i32x8`
//!   body serves both `u32` and `i32` lanes.
//! * **Checked floats**: The arithmetic runs on vectors; lanes whose operands
//!   are out of domain are cleared to zero afterwards.
//! * **Opt-in**: Opcodes without a vector form (division and shifts on
//!   integers, rem and atan2 on floats) report `false` and the caller keeps
//!   the per-pair path.

// External dependencies
use core::any::TypeId;
use wide::{f32x8, f64x4, i32x8};

// Internal dependencies
use crate::math::float::{FloatMode, FloatOp};
use crate::math::int::IntOp;
use crate::primitives::lane::Lane;

/// Run `vector` over full groups of `N` pairs of `T` lanes and `scalar` over the rest.
#[inline]
fn drive<T, const N: usize>(
    pairs: &mut [u8],
    vector: impl Fn([T; N], [T; N]) -> [T; N],
    scalar: impl Fn(T, T) -> T,
) where
    T: Lane,
{
    let pair = 2 * T::WIDTH;
    let mut groups = pairs.chunks_exact_mut(N * pair);
    for group in &mut groups {
        let highs: [T; N] = core::array::from_fn(|k| T::read(&group[k * pair..]));
        let lows: [T; N] = core::array::from_fn(|k| T::read(&group[k * pair + T::WIDTH..]));
        for (k, value) in vector(highs, lows).into_iter().enumerate() {
            value.write(&mut group[k * pair..]);
        }
    }
    for rest in groups.into_remainder().chunks_exact_mut(pair) {
        let (high, low) = rest.split_at_mut(T::WIDTH);
        scalar(T::read(high), T::read(low)).write(high);
    }
}

/// Whether `T` is one of the types in `types`.
#[inline]
pub(crate) fn is_one_of<T: Lane>(types: &[TypeId]) -> bool {
    types.contains(&TypeId::of::<T>())
}

// ============================================================================
// Integers
// ============================================================================

/// Evaluate `op` over a run of 32-bit integer pairs.
///
/// Returns `false`, leaving `pairs` untouched, when `op` has no vector form.
pub fn int32_block(op: IntOp, pairs: &mut [u8]) -> bool {
    let f: fn(i32x8, i32x8) -> i32x8 = match op {
        IntOp::Add => |a, b| a + b,
        IntOp::Sub => |a, b| a - b,
        IntOp::Mul => |a, b| a * b,
        IntOp::And => |a, b| a & b,
        IntOp::Or => |a, b| a | b,
        IntOp::Xor => |a, b| a ^ b,
        IntOp::Div | IntOp::Rem | IntOp::Shl | IntOp::Shr => return false,
    };
    drive::<i32, 8>(
        pairs,
        |a, b| f(i32x8::new(a), i32x8::new(b)).to_array(),
        |a, b| op.apply(a, b),
    );
    true
}

// ============================================================================
// Floats
// ============================================================================

/// Vector form of a float opcode, if it has one.
fn float_vector<V>(op: FloatOp) -> Option<fn(V, V) -> V>
where
    V: core::ops::Add<Output = V>
        + core::ops::Sub<Output = V>
        + core::ops::Mul<Output = V>
        + core::ops::Div<Output = V>,
{
    let f: fn(V, V) -> V = match op {
        FloatOp::Add => |a, b| a + b,
        FloatOp::Sub => |a, b| a - b,
        FloatOp::Mul => |a, b| a * b,
        FloatOp::Div => |a, b| a / b,
        FloatOp::Rem | FloatOp::Atan2 => return None,
    };
    Some(f)
}

/// Zero the lanes of `out` whose operands are outside the domain of `op`.
#[inline]
fn clear_out_of_domain<T: crate::math::float::FloatLane, const N: usize>(
    op: FloatOp,
    a: &[T; N],
    b: &[T; N],
    out: &mut [T; N],
) {
    for k in 0..N {
        if !op.in_domain(a[k], b[k]) {
            out[k] = T::zero();
        }
    }
}

/// Evaluate `op` over a run of `f32` pairs.
///
/// Returns `false`, leaving `pairs` untouched, when `op` has no vector form.
pub fn f32_block(op: FloatOp, mode: FloatMode, pairs: &mut [u8]) -> bool {
    let Some(f) = float_vector::<f32x8>(op) else {
        return false;
    };
    drive::<f32, 8>(
        pairs,
        |a, b| {
            let mut out = f(f32x8::new(a), f32x8::new(b)).to_array();
            if mode == FloatMode::Checked {
                clear_out_of_domain(op, &a, &b, &mut out);
            }
            out
        },
        |a, b| op.apply(a, b, mode),
    );
    true
}

/// Evaluate `op` over a run of `f64` pairs.
///
/// Returns `false`, leaving `pairs` untouched, when `op` has no vector form.
pub fn f64_block(op: FloatOp, mode: FloatMode, pairs: &mut [u8]) -> bool {
    let Some(f) = float_vector::<f64x4>(op) else {
        return false;
    };
    drive::<f64, 4>(
        pairs,
        |a, b| {
            let mut out = f(f64x4::new(a), f64x4::new(b)).to_array();
            if mode == FloatMode::Checked {
                clear_out_of_domain(op, &a, &b, &mut out);
            }
            out
        },
        |a, b| op.apply(a, b, mode),
    );
    true
}
