//! Integer opcodes.
//!
//! ## Purpose
//!
//! Binary and unary integer kernels over 1 to 16 byte lanes, signed and
//! unsigned. Binary kernels operate on a pair of lanes; the result is
//! stored in the first (high) lane.
//!
//! ## Design notes
//!
//! * **Wrapping**: Addition, subtraction, multiplication and negation wrap.
//! * **Total division**: Division or remainder by zero yields 0. For signed
//!   lanes `MIN / -1` wraps to `MIN` and `MIN % -1` is 0.
//! * **Masked shifts**: The shift amount is reduced modulo the lane width
//!   in bits. Right shifts are arithmetic for signed lanes.
//!
//! ## Key concepts
//!
//! * **Lane**: The integer type the pair halves are read as; the kernel order
//!   is one above the lane order (e.g. order 4 for two `u32` lanes).

// External dependencies
use core::any::TypeId;
use num_traits::{CheckedRem, PrimInt, WrappingAdd, WrappingMul, WrappingShl, WrappingShr, WrappingSub};

// Internal dependencies
use crate::kernels::transform::Transform;
use crate::math::vector::{self, is_one_of};
use crate::primitives::lane::Lane;
use crate::primitives::order::Order;

// ============================================================================
// Lane Bound
// ============================================================================

/// Integer types usable as opcode lanes.
pub trait IntLane:
    Lane + PrimInt + CheckedRem + WrappingAdd + WrappingSub + WrappingMul + WrappingShl + WrappingShr
{
}

impl<T> IntLane for T where
    T: Lane
        + PrimInt
        + CheckedRem
        + WrappingAdd
        + WrappingSub
        + WrappingMul
        + WrappingShl
        + WrappingShr
{
}

// ============================================================================
// Opcodes
// ============================================================================

/// Binary integer opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`, 0 when `b == 0`
    Div,
    /// `a % b`, 0 when `b == 0`
    Rem,
    /// `a << (b mod bits)`
    Shl,
    /// `a >> (b mod bits)`
    Shr,
    /// `a & b`
    And,
    /// `a | b`
    Or,
    /// `a ^ b`
    Xor,
}

impl IntOp {
    /// Evaluate the opcode.
    pub fn apply<T: IntLane>(self, a: T, b: T) -> T {
        match self {
            Self::Add => a.wrapping_add(&b),
            Self::Sub => a.wrapping_sub(&b),
            Self::Mul => a.wrapping_mul(&b),
            Self::Div => {
                if b.is_zero() {
                    T::zero()
                } else {
                    // Only MIN / -1 overflows; it wraps back to MIN.
                    a.checked_div(&b).unwrap_or(a)
                }
            }
            Self::Rem => {
                if b.is_zero() {
                    T::zero()
                } else {
                    a.checked_rem(&b).unwrap_or_else(T::zero)
                }
            }
            Self::Shl => a.wrapping_shl(shift_amount(b)),
            Self::Shr => a.wrapping_shr(shift_amount(b)),
            Self::And => a & b,
            Self::Or => a | b,
            Self::Xor => a ^ b,
        }
    }
}

/// Unary integer opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntUnary {
    /// Bitwise complement.
    Not,
    /// Two's complement negation, wrapping.
    Neg,
    /// Absolute value, wrapping (`abs(MIN) == MIN`).
    Abs,
    /// `a + 1`, wrapping.
    Incr,
    /// `a - 1`, wrapping.
    Decr,
}

impl IntUnary {
    /// Evaluate the opcode.
    pub fn apply<T: IntLane>(self, a: T) -> T {
        match self {
            Self::Not => !a,
            Self::Neg => T::zero().wrapping_sub(&a),
            Self::Abs => {
                if a < T::zero() {
                    T::zero().wrapping_sub(&a)
                } else {
                    a
                }
            }
            Self::Incr => a.wrapping_add(&T::one()),
            Self::Decr => a.wrapping_sub(&T::one()),
        }
    }
}

#[inline]
fn shift_amount<T: IntLane>(b: T) -> u32 {
    let bits = T::zero().count_zeros();
    // `b & (bits - 1)` is non-negative for signed lanes too.
    let mask = T::from(bits - 1).unwrap_or_else(T::zero);
    (b & mask).to_u32().unwrap_or(0)
}

// ============================================================================
// Kernels
// ============================================================================

/// Pair kernel computing `high = op(high, low)` on `T` lanes.
///
/// Runs of `u32` or `i32` pairs are evaluated on `wide` vectors for the
/// wrapping and bitwise opcodes.
pub fn binary<T: IntLane>(op: IntOp) -> Transform {
    let pair = move |bytes: &mut [u8]| {
        let (high, low) = bytes.split_at_mut(T::WIDTH);
        op.apply(T::read(high), T::read(low)).write(high);
    };
    let kernel = Transform::by_reference(Order::pair_of_lane::<T>(), pair);
    if !is_one_of::<T>(&[TypeId::of::<u32>(), TypeId::of::<i32>()]) {
        return kernel;
    }
    kernel.with_block(move |pairs: &mut [u8]| {
        if !vector::int32_block(op, pairs) {
            pairs.chunks_exact_mut(2 * T::WIDTH).for_each(pair);
        }
    })
}

/// Kernel computing `a = op(a)` on a single `T` lane.
pub fn unary<T: IntLane>(op: IntUnary) -> Transform {
    Transform::by_reference(Order::of_lane::<T>(), move |bytes: &mut [u8]| {
        op.apply(T::read(bytes)).write(bytes);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_is_total() {
        assert_eq!(IntOp::Div.apply(12u32, 0), 0);
        assert_eq!(IntOp::Rem.apply(12u32, 0), 0);
        assert_eq!(IntOp::Div.apply(-7i32, 2), -3);
        assert_eq!(IntOp::Rem.apply(-7i32, 2), -1);
        assert_eq!(IntOp::Div.apply(i8::MIN, -1), i8::MIN);
        assert_eq!(IntOp::Rem.apply(i8::MIN, -1), 0);
    }

    #[test]
    fn shifts_are_masked() {
        assert_eq!(IntOp::Shl.apply(1u8, 9), 2);
        assert_eq!(IntOp::Shr.apply(0x80u8, 15), 1);
        assert_eq!(IntOp::Shr.apply(-8i16, 1), -4);
        assert_eq!(IntOp::Shl.apply(1u64, 64), 1);
    }

    #[test]
    fn wrapping_arithmetic() {
        assert_eq!(IntOp::Add.apply(250u8, 10), 4);
        assert_eq!(IntOp::Sub.apply(0u16, 1), u16::MAX);
        assert_eq!(IntOp::Mul.apply(i32::MAX, 2), -2);
        assert_eq!(IntUnary::Neg.apply(5i32), -5);
        assert_eq!(IntUnary::Neg.apply(1u8), 255);
        assert_eq!(IntUnary::Abs.apply(i16::MIN), i16::MIN);
        assert_eq!(IntUnary::Not.apply(0u8), 255);
        assert_eq!(IntUnary::Decr.apply(0u32), u32::MAX);
    }

    #[test]
    fn binary_kernel_writes_high_lane() {
        let k = binary::<u16>(IntOp::Sub);
        let mut bytes = [0u8; 4];
        10u16.write(&mut bytes[..2]);
        3u16.write(&mut bytes[2..]);
        crate::kernels::Kernel::call(&k, &mut bytes);
        assert_eq!(u16::read(&bytes[..2]), 7);
        assert_eq!(u16::read(&bytes[2..]), 3);
    }
}
