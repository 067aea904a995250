//! Alignment quanta for guarded line layouts.

/// The byte boundary that line payloads are padded to.
///
/// Guard columns span one alignment unit on each side of a payload, so any
/// vector store overshooting a row end lands inside a guard region rather
/// than in the next line's payload.
pub const ALIGNMENT: usize = 64;

/// Round `x` up to a multiple of `n`.
///
/// `n` must be a power of two.
///
/// ```
/// use line_window::alignment::ceil_n;
///
/// assert_eq!(ceil_n(0, 64), 0);
/// assert_eq!(ceil_n(1, 64), 64);
/// assert_eq!(ceil_n(64, 64), 64);
/// assert_eq!(ceil_n(65, 64), 128);
/// ```
pub const fn ceil_n(x: usize, n: usize) -> usize {
    debug_assert!(n.is_power_of_two());
    (x + n - 1) & !(n - 1)
}

/// Number of elements of `T` in one alignment unit.
///
/// This is the guard column count and the padding quantum, in element units,
/// for a plane storing elements of type `T`.
pub const fn guard_len<T>() -> usize {
    ALIGNMENT / core::mem::size_of::<T>()
}

#[test]
fn rounding() {
    assert_eq!(ceil_n(15, 16), 16);
    assert_eq!(ceil_n(16, 16), 16);
    assert_eq!(ceil_n(17, 16), 32);
}

#[test]
fn element_quanta() {
    assert_eq!(guard_len::<u8>(), 64);
    assert_eq!(guard_len::<u16>(), 32);
    assert_eq!(guard_len::<f32>(), 16);
}
