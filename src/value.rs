//! Byte transcoding for fixed-size values.
//!
//! Values are laid out in host-native byte order, so the bytes written by
//! [`Stream::write_value`] on one architecture may not read back as the same
//! value on another.
//!
//! [`Stream::write_value`]: crate::Stream::write_value

/// A value with a fixed-size byte representation.
///
/// `decode(encode(v))` reproduces the exact byte pattern of `v`.
pub trait FixedSize: Sized {
    /// The number of bytes in the encoded form.
    const SIZE: usize;

    /// Writes the encoded form of `self` into `out`, which is exactly
    /// [`Self::SIZE`] bytes long.
    fn encode(&self, out: &mut [u8]);

    /// Reads a value back from `bytes`, which is exactly [`Self::SIZE`]
    /// bytes long.
    fn decode(bytes: &[u8]) -> Self;
}

macro_rules! impl_fixed_size {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedSize for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn encode(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                #[inline]
                fn decode(bytes: &[u8]) -> Self {
                    let mut raw = [0_u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_ne_bytes(raw)
                }
            }
        )*
    };
}

impl_fixed_size!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

impl<T: FixedSize, const N: usize> FixedSize for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn encode(&self, out: &mut [u8]) {
        // `chunks_exact_mut` rejects a chunk size of zero.
        if T::SIZE == 0 {
            return;
        }
        for (item, chunk) in self.iter().zip(out.chunks_exact_mut(T::SIZE)) {
            item.encode(chunk);
        }
    }

    fn decode(bytes: &[u8]) -> Self {
        if T::SIZE == 0 {
            return std::array::from_fn(|_| T::decode(&[]));
        }
        std::array::from_fn(|i| T::decode(&bytes[i * T::SIZE..(i + 1) * T::SIZE]))
    }
}

/// Encodes `value` into a freshly allocated buffer.
pub(crate) fn to_bytes<T: FixedSize>(value: &T) -> Vec<u8> {
    let mut bytes = vec![0_u8; T::SIZE];
    value.encode(&mut bytes);
    bytes
}
