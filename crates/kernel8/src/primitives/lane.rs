//! Numeric reinterpretation of small buffers.
//!
//! ## Purpose
//!
//! Buffers of order 1..=5 (1 to 16 bytes) can be read as machine numbers.
//! A [`Lane`] is a numeric type whose width is exactly one such order; reads
//! and writes are bit reinterpretations with no conversion.
//!
//! ## Design notes
//!
//! * **Fixed byte order**: Lanes are little-endian on every host, so results
//!   do not depend on the machine the lift runs on.
//! * **No aliasing union**: Values are decoded from and encoded into byte
//!   slices; all lane types over the same bytes observe the same bits.
//!
//! ## Non-goals
//!
//! * 16-byte floats (no stable primitive).

/// A numeric type that exactly fills a buffer of order [`Lane::ORDER`].
pub trait Lane: Copy + Send + Sync + PartialEq + core::fmt::Debug + 'static {
    /// Order whose size equals `size_of::<Self>()`.
    const ORDER: u8;

    /// Width in bytes.
    const WIDTH: usize = 1 << (Self::ORDER - 1);

    /// Decode from the first `WIDTH` bytes of `src`.
    fn read(src: &[u8]) -> Self;

    /// Encode into the first `WIDTH` bytes of `dst`.
    fn write(self, dst: &mut [u8]);
}

macro_rules! impl_lane {
    ($order:expr => $($t:ty),+) => {
        $(
            impl Lane for $t {
                const ORDER: u8 = $order;

                #[inline]
                fn read(src: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$t>()];
                    raw.copy_from_slice(&src[..core::mem::size_of::<$t>()]);
                    <$t>::from_le_bytes(raw)
                }

                #[inline]
                fn write(self, dst: &mut [u8]) {
                    dst[..core::mem::size_of::<$t>()].copy_from_slice(&self.to_le_bytes());
                }
            }
        )+
    };
}

impl_lane!(1 => u8, i8);
impl_lane!(2 => u16, i16);
impl_lane!(3 => u32, i32, f32);
impl_lane!(4 => u64, i64, f64);
impl_lane!(5 => u128, i128);
