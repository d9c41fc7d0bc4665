//! Floating point opcodes.
//!
//! ## Purpose
//!
//! Binary and unary kernels over `f32` and `f64` lanes.
//!
//! ## Design notes
//!
//! * **Clamp to zero**: In `Checked` mode a domain error replaces the result
//!   with `0.0`. Add, sub, mul and atan2 need finite operands; div and rem
//!   additionally need a normal (non-zero, non-subnormal) divisor; unary
//!   opcodes need a finite operand.
//! * **Fast mode**: `Fast` skips every check and returns whatever IEEE
//!   arithmetic produces, including infinities and NaN.
//! * **No-std**: Transcendentals come from `num-traits` (backed by `libm`
//!   without the standard library).

// External dependencies
use core::any::TypeId;
use num_traits::Float;

// Internal dependencies
use crate::kernels::transform::Transform;
use crate::math::vector::{self, is_one_of};
use crate::primitives::lane::Lane;
use crate::primitives::order::Order;

/// Float types usable as opcode lanes.
pub trait FloatLane: Lane + Float {}

impl<T: Lane + Float> FloatLane for T {}

/// Domain checking policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatMode {
    /// Replace results of out-of-domain operations with zero.
    #[default]
    Checked,

    /// Skip domain checks.
    Fast,
}

/// Binary float opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// Truncated remainder (`fmod`).
    Rem,
    /// `atan2(a, b)`
    Atan2,
}

impl FloatOp {
    /// Whether `(a, b)` is inside the domain `Checked` mode accepts.
    pub fn in_domain<T: FloatLane>(self, a: T, b: T) -> bool {
        match self {
            Self::Div | Self::Rem => a.is_finite() && b.is_normal(),
            _ => a.is_finite() && b.is_finite(),
        }
    }

    /// Evaluate the opcode under `mode`.
    pub fn apply<T: FloatLane>(self, a: T, b: T, mode: FloatMode) -> T {
        if mode == FloatMode::Checked && !self.in_domain(a, b) {
            return T::zero();
        }
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
            Self::Rem => a % b,
            Self::Atan2 => a.atan2(b),
        }
    }
}

/// Unary float opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatUnary {
    /// Round up.
    Ceil,
    /// Round down.
    Floor,
    /// Absolute value.
    Abs,
    /// Negation.
    Neg,
    /// `sqrt(|a|)`
    Sqrt,
    /// `a * a`
    Sqr,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Arc tangent.
    Atan,
}

impl FloatUnary {
    /// Evaluate the opcode under `mode`.
    pub fn apply<T: FloatLane>(self, a: T, mode: FloatMode) -> T {
        if mode == FloatMode::Checked && !a.is_finite() {
            return T::zero();
        }
        match self {
            Self::Ceil => a.ceil(),
            Self::Floor => a.floor(),
            Self::Abs => a.abs(),
            Self::Neg => -a,
            Self::Sqrt => a.abs().sqrt(),
            Self::Sqr => FloatOp::Mul.apply(a, a, mode),
            Self::Sin => a.sin(),
            Self::Cos => a.cos(),
            Self::Tan => a.tan(),
            Self::Atan => a.atan(),
        }
    }
}

/// Pair kernel computing `high = op(high, low)` on `T` lanes.
///
/// Runs of `f32` or `f64` pairs are evaluated on `wide` vectors for the
/// opcodes that have a vector form.
pub fn binary<T: FloatLane>(op: FloatOp, mode: FloatMode) -> Transform {
    let pair = move |bytes: &mut [u8]| {
        let (high, low) = bytes.split_at_mut(T::WIDTH);
        op.apply(T::read(high), T::read(low), mode).write(high);
    };
    let vectorized = if is_one_of::<T>(&[TypeId::of::<f32>()]) {
        Some(vector::f32_block as fn(FloatOp, FloatMode, &mut [u8]) -> bool)
    } else if is_one_of::<T>(&[TypeId::of::<f64>()]) {
        Some(vector::f64_block as fn(FloatOp, FloatMode, &mut [u8]) -> bool)
    } else {
        None
    };
    let kernel = Transform::by_reference(Order::pair_of_lane::<T>(), pair);
    match vectorized {
        Some(block) => kernel.with_block(move |pairs: &mut [u8]| {
            if !block(op, mode, pairs) {
                pairs.chunks_exact_mut(2 * T::WIDTH).for_each(pair);
            }
        }),
        None => kernel,
    }
}

/// Kernel computing `a = op(a)` on a single `T` lane.
pub fn unary<T: FloatLane>(op: FloatUnary, mode: FloatMode) -> Transform {
    Transform::by_reference(Order::of_lane::<T>(), move |bytes: &mut [u8]| {
        op.apply(T::read(bytes), mode).write(bytes);
    })
}
