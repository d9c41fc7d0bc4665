//! Tests for lifted algorithms built through the fluent API.
//!
//! These tests verify each lifting combinator end to end:
//! - Map, indexed map and indexed emplace
//! - Shared-state reduce and read-only broadcast (with index windows)
//! - All-pairs under both policies
//! - Halves-zip, shuffle, multi-kernel dispatch and extraction
//! - Composition (chains and lift-of-lift)
//!
//! ## Test Organization
//!
//! 1. **Map Family** - Map, indexed map, indexed emplace
//! 2. **Shared State** - Reduce, broadcast, index windows
//! 3. **All-Pairs** - Read-only and write-back policies
//! 4. **Halves-Zip** - Elementwise arithmetic between halves
//! 5. **Shuffle** - Identity, permutation, collisions
//! 6. **Dispatch and Extract** - Per-position kernels, byte windows
//! 7. **Composition** - Chains, calling shapes, lift-of-lift
//! 8. **Policies** - Backend selection, run lengths and determinism

use approx::assert_relative_eq;
use std::sync::{Arc, Mutex};

use kernel8::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn order(k: u32) -> Order {
    Order::new(k).unwrap()
}

fn words(values: &[u32]) -> State {
    State::from_lanes(values).unwrap()
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn write_u32(bytes: &mut [u8], value: u32) {
    bytes[..4].copy_from_slice(&value.to_le_bytes());
}

// ============================================================================
// Map Family Tests
// ============================================================================

/// Test map on a 4-element array: [1, 2, 3, 4] times 5.
#[test]
fn test_map_scales_every_element() {
    let lift = Lift::new()
        .algorithm(Map)
        .container_order(5)
        .kernel(lane_map::<u32, _>(|x| x.wrapping_mul(5)))
        .build()
        .unwrap();

    let mut state = words(&[1, 2, 3, 4]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![5, 10, 15, 20]);
    assert_eq!(lift.algorithm(), Map);
}

/// Test that map leaves elements outside the range untouched.
#[test]
fn test_map_respects_range() {
    let lift = Lift::new()
        .container_order(4)
        .kernel(lane_map::<u8, _>(|x| x + 100))
        .range(2..5)
        .build()
        .unwrap();

    let mut bytes: Vec<u8> = (0..8).collect();
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes, vec![0, 1, 102, 103, 104, 5, 6, 7]);
}

/// Test indexed map: each element learns its position but cannot move.
#[test]
fn test_indexed_map_fills_positions() {
    let lift = Lift::new()
        .algorithm(IndexedMap)
        .container_order(6)
        .kernel(lane_zip::<u32, _>(|index, value| (0, value + 10 * index)))
        .build()
        .unwrap();

    let mut state = words(&[1; 8]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(
        state.to_lanes::<u32>(),
        vec![1, 11, 21, 31, 41, 51, 61, 71]
    );
}

/// Test the index encoding for narrow elements (8-bit indices wrap).
#[test]
fn test_indexed_map_narrow_index() {
    let lift = Lift::new()
        .algorithm(IndexedMap)
        .container_order(10)
        .kernel(lane_zip::<u8, _>(|index, _| (index, index)))
        .build()
        .unwrap();

    let mut bytes = vec![0u8; 512];
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes[255], 255);
    assert_eq!(bytes[256], 0);
    assert_eq!(bytes[300], 44);
}

/// Test the fill / reverse / sort round trip through indexed emplace.
///
/// Filling element_i = i, scattering to 7 - value, then scattering to
/// destination = value reproduces the identity array.
#[test]
fn test_indexed_emplace_modsort() {
    let fill = Lift::new()
        .algorithm(IndexedMap)
        .container_order(6)
        .kernel(lane_zip::<u32, _>(|index, _| (index, index)))
        .build()
        .unwrap();
    let reverse = Lift::new()
        .algorithm(IndexedEmplace)
        .container_order(6)
        .kernel(lane_zip::<u32, _>(|_, value| (7 - value, value)))
        .build()
        .unwrap();
    let sort = Lift::new()
        .algorithm(IndexedEmplace)
        .container_order(6)
        .kernel(lane_zip::<u32, _>(|_, value| (value, value)))
        .build()
        .unwrap();

    let mut state = State::zero(order(6));
    fill.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), (0..8).collect::<Vec<u32>>());

    reverse.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), (0..8).rev().collect::<Vec<u32>>());

    sort.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), (0..8).collect::<Vec<u32>>());
}

/// Test that emplace destinations are taken modulo the element count.
#[test]
fn test_indexed_emplace_masks_destination() {
    let lift = Lift::new()
        .algorithm(IndexedEmplace)
        .container_order(5)
        .kernel(lane_zip::<u32, _>(|index, value| (index + 5, value)))
        .build()
        .unwrap();

    let mut state = words(&[10, 20, 30, 40]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![40, 10, 20, 30]);
}

/// Test that emplace collisions keep the later source.
#[test]
fn test_indexed_emplace_collision() {
    let lift = Lift::new()
        .algorithm(IndexedEmplace)
        .container_order(5)
        .kernel(lane_zip::<u32, _>(|_, value| (0, value)))
        .build()
        .unwrap();

    let mut state = words(&[10, 20, 30, 40]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![40, 20, 30, 40]);
}

// ============================================================================
// Shared State Tests
// ============================================================================

/// Test that reduce produces the left fold of the kernel over elements 1..end.
#[test]
fn test_shared_reduce_is_left_fold() {
    let values = [5u32, 1, 2, 3, 4, 9, 7, 6];
    let step = |acc: u32, x: u32| acc.wrapping_mul(3).wrapping_add(x);

    let lift = Lift::new()
        .algorithm(SharedReduce)
        .container_order(6)
        .kernel(lane_zip::<u32, _>(move |acc, x| (step(acc, x), x)))
        .build()
        .unwrap();

    let mut state = words(&values);
    lift.apply_state(&mut state).unwrap();

    let expected = values[1..].iter().fold(values[0], |acc, &x| step(acc, x));
    let out = state.to_lanes::<u32>();
    assert_eq!(out[0], expected);
    assert_eq!(&out[1..], &values[1..]);
}

/// Test a running prefix sum written back into each element.
#[test]
fn test_shared_reduce_prefix_sum() {
    let lift = Lift::new()
        .algorithm(SharedReduce)
        .container_order(6)
        .kernel(lane_zip::<u32, _>(|acc, x| (acc + x, acc + x)))
        .build()
        .unwrap();

    let mut state = words(&[0, 1, 2, 3, 4, 5, 6, 7]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(
        state.to_lanes::<u32>(),
        vec![28, 1, 3, 6, 10, 15, 21, 28]
    );
}

/// Test a shared slot at the end of the array with the default range.
#[test]
fn test_shared_reduce_last_slot() {
    let lift = Lift::new()
        .algorithm(SharedReduce)
        .container_order(5)
        .shared_slot(3)
        .kernel(lane_zip::<u32, _>(|acc, x| (acc + x, 0)))
        .build()
        .unwrap();

    let mut state = words(&[1, 2, 3, 100]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![0, 0, 0, 106]);
}

/// Test the running-index window: injected for each call, restored afterwards.
#[test]
fn test_shared_reduce_index_window_restored() {
    // Elements are 8 bytes: field 0 is a value, field 1 the index scratch.
    let kernel = Transform::by_reference(order(5), |pair: &mut [u8]| {
        let acc = read_u32(&pair[0..4]);
        let index = read_u32(&pair[4..8]);
        write_u32(&mut pair[0..4], acc + index);
        write_u32(&mut pair[8..12], index);
    });
    let lift = Lift::new()
        .algorithm(SharedReduce)
        .container_order(6)
        .index_window(3, 1)
        .kernel(kernel)
        .build()
        .unwrap();

    let mut state = words(&[0, 99, 0, 0, 0, 0, 0, 0]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![6, 99, 1, 0, 2, 0, 3, 0]);
}

/// Test that broadcast reads the original shared value in every iteration.
#[test]
fn test_shared_broadcast_reads_original() {
    let lift = Lift::new()
        .algorithm(SharedBroadcast)
        .container_order(5)
        .kernel(lane_zip::<u32, _>(|shared, x| (shared + 100, x + shared)))
        .build()
        .unwrap();

    let mut state = words(&[10, 1, 2, 3]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![10, 11, 12, 13]);
}

/// Test broadcast with an index window: the shared element is never written.
#[test]
fn test_shared_broadcast_index_window() {
    let kernel = Transform::by_reference(order(5), |pair: &mut [u8]| {
        let scale = read_u32(&pair[0..4]);
        let index = read_u32(&pair[4..8]);
        write_u32(&mut pair[8..12], scale * index);
    });
    let lift = Lift::new()
        .algorithm(SharedBroadcast)
        .container_order(6)
        .index_window(3, 1)
        .policy(Vectorized)
        .kernel(kernel)
        .build()
        .unwrap();

    let mut state = words(&[3, 7, 0, 0, 0, 0, 0, 0]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![3, 7, 3, 0, 6, 0, 9, 0]);
}

// ============================================================================
// All-Pairs Tests
// ============================================================================

/// Test read-only all-pairs increment: element k is a `j` in k pairings.
#[test]
fn test_all_pairs_read_only_increment() {
    let lift = Lift::new()
        .algorithm(AllPairs)
        .pair_policy(ReadOnly)
        .container_order(5)
        .kernel(lane_zip::<u32, _>(|a, b| (a + 1, b + 1)))
        .build()
        .unwrap();

    let mut state = words(&[0, 0, 0, 0]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![0, 1, 2, 3]);
}

/// Test write-back all-pairs: element i carries its updates through its inner loop.
#[test]
fn test_all_pairs_write_back_increment() {
    let lift = Lift::new()
        .algorithm(AllPairs)
        .container_order(5)
        .kernel(lane_zip::<u32, _>(|a, b| (a + 1, b + 1)))
        .build()
        .unwrap();

    let mut state = words(&[0, 0, 0, 0]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![3, 3, 3, 3]);
}

/// Test that a compare-exchange kernel under write-back sorts the array.
#[test]
fn test_all_pairs_write_back_sorts() {
    let lift = Lift::new()
        .algorithm(AllPairs)
        .pair_policy(WriteBack)
        .container_order(6)
        .kernel(lane_zip::<u32, _>(|a, b| (a.min(b), a.max(b))))
        .build()
        .unwrap();

    let mut state = words(&[5, 3, 8, 1, 9, 2, 7, 4]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![1, 2, 3, 4, 5, 7, 8, 9]);
}

// ============================================================================
// Halves-Zip Tests
// ============================================================================

/// Test 32-bit unsigned division between halves; division by zero gives 0.
#[test]
fn test_halves_zip_unsigned_division() {
    let lift = Lift::new()
        .algorithm(HalvesZip)
        .container_order(6)
        .kernel(int::binary::<u32>(IntOp::Div))
        .build()
        .unwrap();

    let mut state = words(&[12, 12, 9, 100, 0, 4, 3, 7]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![0, 3, 3, 14, 0, 4, 3, 7]);
}

/// Test float division between halves under checked and fast modes.
#[test]
fn test_halves_zip_float_clamp() {
    let checked = Lift::new()
        .algorithm(HalvesZip)
        .container_order(5)
        .kernel(float::binary::<f32>(FloatOp::Div, FloatMode::Checked))
        .build()
        .unwrap();
    let fast = Lift::new()
        .algorithm(HalvesZip)
        .container_order(5)
        .kernel(float::binary::<f32>(FloatOp::Div, FloatMode::Fast))
        .build()
        .unwrap();

    let mut a = State::from_lanes(&[1.0f32, 3.0, 0.0, 2.0]).unwrap();
    checked.apply_state(&mut a).unwrap();
    let out = a.to_lanes::<f32>();
    assert_relative_eq!(out[0], 0.0);
    assert_relative_eq!(out[1], 1.5);

    let mut b = State::from_lanes(&[1.0f32, 3.0, 0.0, 2.0]).unwrap();
    fast.apply_state(&mut b).unwrap();
    assert!(b.to_lanes::<f32>()[0].is_infinite());
}

/// Test that the halves-zip range counts positions within one half.
#[test]
fn test_halves_zip_partial_range() {
    let lift = Lift::new()
        .algorithm(HalvesZip)
        .container_order(4)
        .range(1..3)
        .kernel(lane_zip::<u8, _>(|a, b| (b, a)))
        .build()
        .unwrap();

    let mut bytes: Vec<u8> = (0..8).collect();
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes, vec![0, 5, 6, 3, 4, 1, 2, 7]);
}

// ============================================================================
// Shuffle Tests
// ============================================================================

/// Test that an identity index kernel reproduces the array.
#[test]
fn test_shuffle_identity() {
    let lift = Lift::new()
        .algorithm(Shuffle)
        .element_order(3)
        .container_order(6)
        .kernel(Transform::identity(order(3)))
        .build()
        .unwrap();

    let values = [9u32, 4, 7, 1, 0, 3, 8, 2];
    let mut state = words(&values);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), values.to_vec());
}

/// Test a reversing permutation with 8-bit indices.
#[test]
fn test_shuffle_reverse_narrow_index() {
    let lift = Lift::new()
        .algorithm(Shuffle)
        .element_order(1)
        .container_order(4)
        .index_order(1)
        .kernel(lane_map::<u8, _>(|i| 7 - i))
        .build()
        .unwrap();

    let mut bytes: Vec<u8> = (10..18).collect();
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes, vec![17, 16, 15, 14, 13, 12, 11, 10]);
}

/// Test non-bijective mappings: the later source wins, unreached slots are zero.
#[test]
fn test_shuffle_collision_drops_elements() {
    let lift = Lift::new()
        .algorithm(Shuffle)
        .element_order(3)
        .container_order(5)
        .kernel(lane_map::<u32, _>(|i| i / 2))
        .build()
        .unwrap();

    let mut state = words(&[10, 20, 30, 40]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![20, 40, 0, 0]);
}

// ============================================================================
// Dispatch and Extract Tests
// ============================================================================

/// Test that each position runs its own kernel.
#[test]
fn test_dispatch_per_position() {
    let table: Vec<KernelRef> = vec![
        Arc::new(lane_map::<u32, _>(|x| x + 1)),
        Arc::new(lane_map::<u32, _>(|x| x * 2)),
        Arc::new(Transform::identity(order(3))),
        Arc::new(lane_map::<u32, _>(|_| 42)),
    ];
    let lift = Lift::new()
        .algorithm(Dispatch)
        .container_order(5)
        .kernels(table)
        .build()
        .unwrap();

    let mut state = words(&[1, 2, 3, 4]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![2, 4, 3, 42]);
}

/// Test that a short table is accepted when the range stays inside it.
#[test]
fn test_dispatch_short_table_with_range() {
    let table: Vec<KernelRef> = vec![
        Arc::new(lane_map::<u8, _>(|x| x + 1)),
        Arc::new(lane_map::<u8, _>(|x| x + 2)),
    ];
    let lift = Lift::new()
        .algorithm(Dispatch)
        .container_order(3)
        .range(0..2)
        .kernels(table)
        .build()
        .unwrap();

    let mut bytes = vec![0u8; 4];
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes, vec![1, 2, 0, 0]);
}

/// Test extraction of 3-byte records into a 4-byte kernel state.
#[test]
fn test_extract_odd_width_windows() {
    let lift = Lift::new()
        .algorithm(Extract)
        .container_order(4)
        .extract_width(3)
        .kernel(lane_map::<u32, _>(|x| x + 1))
        .build()
        .unwrap();

    let mut bytes: Vec<u8> = (1..=8).collect();
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes, vec![2, 2, 3, 5, 5, 6, 7, 8]);
}

/// Test that the padding byte of an extraction window is zero and discarded.
#[test]
fn test_extract_zero_padding() {
    let lift = Lift::new()
        .algorithm(Extract)
        .container_order(3)
        .extract_width(2)
        .range(1..3)
        .kernel(lane_map::<u32, _>(|x| x.rotate_left(8)))
        .build()
        .unwrap();

    // One window at byte 1: [0x22, 0x33, 0, 0] rotated -> [0, 0x22, 0x33, 0].
    let mut bytes = vec![0x11, 0x22, 0x33, 0x44];
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes, vec![0x11, 0x00, 0x22, 0x44]);
}

// ============================================================================
// Composition Tests
// ============================================================================

/// Test that a chain applies its kernels in order.
#[test]
fn test_chain_order() {
    let add: KernelRef = Arc::new(lane_map::<u32, _>(|x| x + 1));
    let double: KernelRef = Arc::new(lane_map::<u32, _>(|x| x * 2));

    let lift = Lift::new()
        .container_order(5)
        .kernel(Chain::new(add.clone(), double.clone()).unwrap())
        .build()
        .unwrap();
    let mut state = words(&[0, 1, 2, 3]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![2, 4, 6, 8]);

    let lift = Lift::new()
        .container_order(5)
        .kernel(Chain::new(double, add).unwrap())
        .build()
        .unwrap();
    let mut state = words(&[0, 1, 2, 3]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![1, 3, 5, 7]);
}

/// Test that by-value and by-reference kernels behave identically.
#[test]
fn test_calling_shapes_agree() {
    let by_value = Transform::by_value(order(3), |mut s: State| {
        let x = s.lane::<u32>(0);
        s.set_lane(0, x.wrapping_mul(7) ^ 0x55);
        s
    });
    let by_reference = lane_map::<u32, _>(|x| x.wrapping_mul(7) ^ 0x55);
    assert_eq!(by_value.shape(), CallShape::ByValue);
    assert_eq!(by_reference.shape(), CallShape::ByReference);

    let values: Vec<u32> = (0..64u32).map(|i| i.wrapping_mul(2_654_435_761).wrapping_add(i)).collect();
    let mut a = words(&values);
    let mut b = a.clone();

    Lift::new()
        .container_order(9)
        .kernel(by_value)
        .build()
        .unwrap()
        .apply_state(&mut a)
        .unwrap();
    Lift::new()
        .container_order(9)
        .kernel(by_reference)
        .build()
        .unwrap()
        .apply_state(&mut b)
        .unwrap();
    assert_eq!(a, b);
}

/// Test lifting an already lifted algorithm.
#[test]
fn test_lift_of_lift() {
    let inner = Lift::new()
        .container_order(3)
        .kernel(lane_map::<u8, _>(|x| x + 1))
        .build()
        .unwrap();
    assert_eq!(inner.order(), order(3));

    let outer = Lift::new()
        .container_order(6)
        .kernel(inner)
        .build()
        .unwrap();
    assert_eq!(outer.layout().element, order(3));

    let mut bytes = vec![7u8; 32];
    outer.apply(&mut bytes).unwrap();
    assert!(bytes.iter().all(|&b| b == 8));
}

// ============================================================================
// Policy Tests
// ============================================================================

/// Kernel that increments each byte and records the length of every run it is handed.
#[derive(Debug, Default)]
struct RunRecorder {
    runs: Mutex<Vec<usize>>,
}

impl Kernel for RunRecorder {
    fn order(&self) -> Order {
        order(1)
    }

    fn call(&self, state: &mut [u8]) {
        self.call_block(state);
    }

    fn call_block(&self, states: &mut [u8]) {
        self.runs.lock().unwrap().push(states.len());
        for b in states.iter_mut() {
            *b = b.wrapping_add(1);
        }
    }
}

/// Test that the vectorized policy hands a block kernel runs of eight elements.
#[test]
fn test_vectorized_map_passes_runs() {
    init_logging();
    let input: Vec<u8> = (0..32).collect();
    let expected: Vec<u8> = (1..33).collect();

    let sequential = Arc::new(RunRecorder::default());
    let lift = Lift::new()
        .container_order(6)
        .policy(Sequential)
        .kernel(sequential.clone())
        .build()
        .unwrap();
    let mut bytes = input.clone();
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes, expected);
    assert_eq!(*sequential.runs.lock().unwrap(), vec![1; 32]);

    let vectorized = Arc::new(RunRecorder::default());
    let lift = Lift::new()
        .container_order(6)
        .policy(Vectorized)
        .kernel(vectorized.clone())
        .build()
        .unwrap();
    let mut bytes = input.clone();
    lift.apply(&mut bytes).unwrap();
    assert_eq!(bytes, expected);
    assert_eq!(*vectorized.runs.lock().unwrap(), vec![8; 4]);

    let ranged = Arc::new(RunRecorder::default());
    let lift = Lift::new()
        .container_order(6)
        .range(3..30)
        .policy(Vectorized)
        .kernel(ranged.clone())
        .build()
        .unwrap();
    let mut bytes = input;
    lift.apply(&mut bytes).unwrap();
    assert_eq!(*ranged.runs.lock().unwrap(), vec![8, 8, 8, 3]);
    assert_eq!(bytes[2], 2);
    assert_eq!(bytes[3], 4);
    assert_eq!(bytes[30], 30);
}

/// Test that vector opcode bodies under halves-zip match the sequential result.
#[test]
fn test_vectorized_halves_zip_matches_sequential() {
    init_logging();
    let ints: Vec<u32> = (0..64u32).map(|i| i.wrapping_mul(0x9e37_79b9) ^ (i << 3)).collect();
    let floats: Vec<f64> = (0..32)
        .map(|i| match i % 7 {
            0 => 0.0,
            1 => f64::INFINITY,
            _ => (i as f64 - 15.5) * 0.75,
        })
        .collect();

    for op in [IntOp::Add, IntOp::Mul, IntOp::Xor, IntOp::Div] {
        let mut outputs = Vec::new();
        for policy in [Sequential, Vectorized] {
            let lift = Lift::new()
                .algorithm(HalvesZip)
                .container_order(9)
                .policy(policy)
                .kernel(int::binary::<i32>(op))
                .build()
                .unwrap();
            let mut state = words(&ints);
            lift.apply_state(&mut state).unwrap();
            outputs.push(state);
        }
        assert_eq!(outputs[0], outputs[1], "{op:?}");
    }

    let mut outputs = Vec::new();
    for policy in [Sequential, Vectorized] {
        let lift = Lift::new()
            .algorithm(HalvesZip)
            .container_order(9)
            .policy(policy)
            .kernel(float::binary::<f64>(FloatOp::Div, FloatMode::Checked))
            .build()
            .unwrap();
        let mut state = State::from_lanes(&floats).unwrap();
        lift.apply_state(&mut state).unwrap();
        outputs.push(state.to_lanes::<f64>());
    }
    for (k, (s, v)) in outputs[0].iter().zip(&outputs[1]).enumerate() {
        assert_relative_eq!(*s, *v);
        if k < 16 {
            let quotient = FloatOp::Div.apply(floats[k], floats[k + 16], FloatMode::Checked);
            assert_relative_eq!(*v, quotient);
        }
    }
}

/// Test that every single-threaded policy gives the same map result.
#[test]
fn test_policies_agree_on_map() {
    init_logging();
    let values: Vec<u32> = (0..256).map(|i| i * 31 + 7).collect();
    let mut results = Vec::new();
    for policy in [Sequential, Vectorized] {
        let lift = Lift::new()
            .container_order(11)
            .policy(policy)
            .kernel(lane_map::<u32, _>(|x| x.rotate_left(3) ^ 0xa5a5))
            .build()
            .unwrap();
        assert_eq!(lift.policy(), policy);
        let mut state = words(&values);
        lift.apply_state(&mut state).unwrap();
        results.push(state);
    }
    assert_eq!(results[0], results[1]);
}

/// Test that a parallel policy without a parallel backend runs sequentially.
#[test]
fn test_parallel_policy_falls_back() {
    init_logging();
    let lift = Lift::new()
        .container_order(5)
        .policy(ThreadParallel)
        .kernel(lane_map::<u32, _>(|x| x + 1))
        .build()
        .unwrap();
    assert_eq!(lift.policy(), Sequential);

    let mut state = words(&[1, 2, 3, 4]);
    lift.apply_state(&mut state).unwrap();
    assert_eq!(state.to_lanes::<u32>(), vec![2, 3, 4, 5]);
}

/// Test determinism: two runs on independent copies give identical results.
#[test]
fn test_lift_is_deterministic() {
    init_logging();
    let lift = Lift::new()
        .algorithm(IndexedEmplace)
        .container_order(8)
        .policy(Vectorized)
        .kernel(lane_zip::<u32, _>(|i, v| (v.wrapping_mul(13) ^ i, v ^ i)))
        .build()
        .unwrap();

    let values: Vec<u32> = (0..32).map(|i| i * 7 + 3).collect();
    let mut a = words(&values);
    let mut b = a.clone();
    lift.apply_state(&mut a).unwrap();
    lift.apply_state(&mut b).unwrap();
    assert_eq!(a, b);
}
