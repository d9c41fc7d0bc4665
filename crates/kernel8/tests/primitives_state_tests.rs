//! Tests for orders, states, views and pairing.
//!
//! These tests verify the buffer hierarchy that every lift is built on:
//! - Orders double in size and reinterpret exactly
//! - Pairing and extraction round-trip for every order
//! - Whole-buffer operations (half swaps, bitwise folds, byte reversal)
//! - Checked element access through views
//!
//! ## Test Organization
//!
//! 1. **Orders** - Sizes, bounds, element counts
//! 2. **Pairing** - combine/high/low/duplicate round trips
//! 3. **State Operations** - In-place whole-buffer operations
//! 4. **Views** - Element access, offsets and traversal

use kernel8::prelude::*;

fn order(k: u32) -> Order {
    Order::new(k).unwrap()
}

fn patterned(k: u32, seed: u8) -> State {
    let o = order(k);
    let bytes: Vec<u8> = (0..o.size())
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect();
    State::from_bytes(o, &bytes).unwrap()
}

// ============================================================================
// Order Tests
// ============================================================================

/// Test that every order is exactly twice the size of the one below.
#[test]
fn test_order_sizes_double() {
    assert_eq!(order(1).size(), 1);
    assert_eq!(order(3).size(), 4);
    for k in 1..35 {
        assert_eq!(order(k + 1).size(), 2 * order(k).size());
    }
}

/// Test that orders outside 1..=35 are rejected.
#[test]
fn test_order_bounds() {
    assert_eq!(Order::new(0), Err(KernelError::InvalidOrder(0)));
    assert_eq!(Order::new(36), Err(KernelError::InvalidOrder(36)));
    assert!(order(1).half().is_err());
    assert!(order(35).double().is_err());
    assert_eq!(order(4).half().unwrap(), order(3));
}

/// Test element counts for reinterpretation without slack.
#[test]
fn test_order_elements_in() {
    assert_eq!(order(3).elements_in(order(6)), 8);
    assert_eq!(order(1).elements_in(order(11)), 1024);
    assert_eq!(order(5).elements_in(order(5)), 1);
    assert_eq!(Order::from_size(16).unwrap(), order(5));
    assert!(Order::from_size(12).is_err());
}

// ============================================================================
// Pairing Tests
// ============================================================================

/// Test the pair round trip: high(combine(a, b)) == a and low(...) == b.
#[test]
fn test_pair_round_trip_all_small_orders() {
    for k in 1..=12 {
        let a = patterned(k, 1);
        let b = patterned(k, 200);
        let pair = combine(&a, &b).unwrap();

        assert_eq!(pair.order(), order(k + 1));
        assert_eq!(high(&pair).unwrap(), a, "high half at order {k}");
        assert_eq!(low(&pair).unwrap(), b, "low half at order {k}");

        let twin = duplicate(&a).unwrap();
        assert_eq!(high(&twin).unwrap(), a);
        assert_eq!(low(&twin).unwrap(), a);
    }
}

/// Test that the first buffer lands in the leading bytes of the pair.
#[test]
fn test_pair_byte_layout() {
    let a = State::from_lanes(&[0x11u8, 0x22]).unwrap();
    let b = State::from_lanes(&[0x33u8, 0x44]).unwrap();
    let pair = combine(&a, &b).unwrap();
    assert_eq!(pair.as_bytes(), &[0x11, 0x22, 0x33, 0x44]);
}

/// Test that pairing states of different orders fails.
#[test]
fn test_pair_order_mismatch() {
    let a = State::zero(order(3));
    let b = State::zero(order(2));
    assert!(combine(&a, &b).is_err());
    assert!(high(&State::zero(order(1))).is_err());
}

// ============================================================================
// State Operation Tests
// ============================================================================

/// Test half swaps and bitwise folds into the first half.
#[test]
fn test_state_half_operations() {
    let mut s = State::from_bytes(order(3), &[0b1100, 0b1010, 0b0110, 0b0011]).unwrap();
    s.swap_halves();
    assert_eq!(s.as_bytes(), &[0b0110, 0b0011, 0b1100, 0b1010]);

    let mut x = s.clone();
    x.xor_halves();
    assert_eq!(x.as_bytes(), &[0b1010, 0b1001, 0b1100, 0b1010]);

    let mut a = s.clone();
    a.and_halves();
    assert_eq!(a.as_bytes(), &[0b0100, 0b0010, 0b1100, 0b1010]);

    let mut o = s;
    o.or_halves();
    assert_eq!(o.as_bytes(), &[0b1110, 0b1011, 0b1100, 0b1010]);
}

/// Test byte reversal and the host-dependent byteswap.
#[test]
fn test_state_byte_order() {
    let mut s = State::from_lane(0x0102_0304u32);
    s.reverse_bytes();
    assert_eq!(s.lane::<u32>(0), 0x0403_0201);

    let mut be = State::from_bytes(order(3), &0xdead_beefu32.to_be_bytes()).unwrap();
    be.conditional_byteswap();
    if cfg!(target_endian = "little") {
        assert_eq!(be.lane::<u32>(0), 0xdead_beef);
    } else {
        assert_eq!(be.as_bytes(), &0xdead_beefu32.to_be_bytes());
    }
}

/// Test swapping the contents of two states.
#[test]
fn test_state_swap_with() {
    let mut a = State::from_lane(1u16);
    let mut b = State::from_lane(2u16);
    a.swap_with(&mut b).unwrap();
    assert_eq!(a.lane::<u16>(0), 2);
    assert_eq!(b.lane::<u16>(0), 1);

    let mut c = State::zero(order(1));
    assert!(a.swap_with(&mut c).is_err());
}

/// Test that numeric views alias the same bytes.
#[test]
fn test_state_lane_aliasing() {
    let mut s = State::zero(order(4));
    s.set_lane(0, 1.0f64);
    assert_eq!(s.lane::<u64>(0), 1.0f64.to_bits());
    assert_eq!(s.to_lanes::<u32>(), vec![0, 0x3ff0_0000]);
}

// ============================================================================
// View Tests
// ============================================================================

/// Test checked element access, copies in and out, and wrapping access.
#[test]
fn test_view_access() {
    let mut s = State::from_lanes(&[10u32, 20, 30, 40]).unwrap();
    {
        let view = s.view(order(3)).unwrap();
        assert_eq!(view.len(), 4);
        assert_eq!(view.lane::<u32>(2).unwrap(), 30);
        assert_eq!(view.get_wrapping(5), &20u32.to_le_bytes());
        assert_eq!(
            view.get(4),
            Err(KernelError::IndexOutOfBounds { index: 4, len: 4 })
        );
        assert_eq!(view.get_state(3).unwrap(), State::from_lane(40u32));
    }

    let mut view = s.view_mut(order(3)).unwrap();
    view.insert(0, &State::from_lane(7u32)).unwrap();
    view.set_lane(1, 8u32).unwrap();
    assert!(view.insert(0, &State::from_lane(7u8)).is_err());
    assert_eq!(s.to_lanes::<u32>(), vec![7, 8, 30, 40]);
}

/// Test raw byte-offset access.
#[test]
fn test_view_offsets() {
    let mut bytes: Vec<u8> = (0..8).collect();
    {
        let view = StateView::new(&bytes, order(2)).unwrap();
        assert_eq!(view.get_at_offset(3).unwrap(), &[3, 4]);
        assert!(view.get_at_offset(7).is_err());
    }
    let mut view = StateViewMut::new(&mut bytes, order(2)).unwrap();
    view.insert_at_offset(1, &[9, 9]).unwrap();
    assert_eq!(bytes, vec![0, 9, 9, 3, 4, 5, 6, 7]);
}

/// Test that a view rejects buffers that are not an exact element multiple.
#[test]
fn test_view_rejects_slack() {
    let bytes = [0u8; 6];
    assert!(StateView::new(&bytes, order(2)).is_err());
    assert!(StateView::new(&bytes[..4], order(2)).is_ok());
}

/// Test forward and backward stepped traversal, and ill-formed ranges.
#[test]
fn test_view_traversal() {
    let s = State::from_lanes(&[0u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();
    let view = s.view(order(1)).unwrap();

    let forward: Vec<usize> = view.traverse(1, 7, 2).map(|(i, _)| i).collect();
    assert_eq!(forward, vec![1, 3, 5]);

    let backward: Vec<u8> = view.traverse_back(2, 6, 1).map(|(_, e)| e[0]).collect();
    assert_eq!(backward, vec![5, 4, 3, 2]);

    assert_eq!(view.traverse(5, 3, 1).count(), 0);
    assert_eq!(view.traverse(0, 9, 1).count(), 0);
    assert_eq!(view.traverse(0, 8, 0).count(), 0);
}
