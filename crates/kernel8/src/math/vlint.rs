//! Very large integer opcodes.
//!
//! Arithmetic on unsigned integers as wide as a whole buffer, byte 0 being
//! the least significant. Binary opcodes run on a pair and store the result
//! in the first half. Carries out of the top byte are discarded.

// Internal dependencies
use crate::kernels::transform::Transform;
use crate::primitives::errors::KernelError;
use crate::primitives::order::Order;
use crate::primitives::pair::halves_mut;

/// `high += low`, modulo `2^(8 * half size)`.
pub fn add(pair: &mut [u8]) {
    let (high, low) = halves_mut(pair);
    let mut carry = 0u16;
    for (h, l) in high.iter_mut().zip(low.iter()) {
        let sum = *h as u16 + *l as u16 + carry;
        *h = sum as u8;
        carry = sum >> 8;
    }
}

/// `high -= low`. The second half is left holding its own two's complement.
pub fn sub(pair: &mut [u8]) {
    let (_, low) = halves_mut(pair);
    twos_complement(low);
    add(pair);
}

/// Negate in place.
pub fn twos_complement(bytes: &mut [u8]) {
    let mut carry = 1u16;
    for b in bytes.iter_mut() {
        let v = (!*b) as u16 + carry;
        *b = v as u8;
        carry = v >> 8;
    }
}

/// Shift left by one bit.
pub fn shl1(bytes: &mut [u8]) {
    let mut carry = 0u8;
    for b in bytes.iter_mut() {
        let next = *b >> 7;
        *b = (*b << 1) | carry;
        carry = next;
    }
}

/// Logical shift right by one bit.
pub fn shr1(bytes: &mut [u8]) {
    let mut carry = 0u8;
    for b in bytes.iter_mut().rev() {
        let next = *b << 7;
        *b = (*b >> 1) | carry;
        carry = next;
    }
}

/// Binary very large integer opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VlintOp {
    /// `high + low`
    Add,
    /// `high - low`
    Sub,
}

/// Unary very large integer opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VlintUnary {
    /// Two's complement negation.
    Negate,
    /// Shift left by one bit.
    Shl1,
    /// Shift right by one bit.
    Shr1,
}

/// Pair kernel for operands of order `operand`.
pub fn binary(op: VlintOp, operand: Order) -> Result<Transform, KernelError> {
    let f: fn(&mut [u8]) = match op {
        VlintOp::Add => add,
        VlintOp::Sub => sub,
    };
    Ok(Transform::by_reference(operand.double()?, f))
}

/// Kernel over a single operand of order `operand`.
pub fn unary(op: VlintUnary, operand: Order) -> Transform {
    let f: fn(&mut [u8]) = match op {
        VlintUnary::Negate => twos_complement,
        VlintUnary::Shl1 => shl1,
        VlintUnary::Shr1 => shr1,
    };
    Transform::by_reference(operand, f)
}
