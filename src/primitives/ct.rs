/// Constant-time comparison utilities.
///
/// This trait provides the equality test used wherever secret-derived
/// values are compared, most importantly Poly1305 tags. Implementations
/// accumulate differences over the whole input and never exit early, so
/// execution time does not depend on where the first mismatch occurs.
///
/// The byte-level work is delegated to `subtle`, which keeps the compiler
/// from turning the accumulation back into a short-circuiting loop.
pub trait ConstantTimeEq {
    /// Returns `true` if `self == other`, in constant time.
    fn ct_eq(&self, other: &Self) -> bool;
}

impl<const N: usize> ConstantTimeEq for [u8; N] {
    #[inline(always)]
    fn ct_eq(&self, other: &Self) -> bool {
        subtle::ConstantTimeEq::ct_eq(&self[..], &other[..]).into()
    }
}

impl ConstantTimeEq for [u8] {
    /// Slices of different lengths compare unequal.
    ///
    /// Lengths are treated as public: only the contents are compared in
    /// constant time.
    #[inline(always)]
    fn ct_eq(&self, other: &Self) -> bool {
        subtle::ConstantTimeEq::ct_eq(self, other).into()
    }
}

/// Constant-time equality of two byte sequences.
///
/// Returns `false` for sequences of different length.
#[inline]
pub fn equal(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b)
}

/// Selects `a` when `choice` is `1` and `b` when it is `0`, without branching.
///
/// `choice` must be `0` or `1`.
#[inline(always)]
pub fn select_u32(choice: u32, a: u32, b: u32) -> u32 {
    let mask = 0u32.wrapping_sub(choice);
    (a & mask) | (b & !mask)
}
