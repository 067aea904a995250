// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `line-window` developers
//! Reproducible per-row sample sequences.
//!
//! Buffers under audit are filled with pseudo-random content that can be
//! regenerated at verification time. The generator is seeded per (plane, row)
//! from its own private engine, so two instances with the same key produce
//! identical sequences in every process and run, and fills never depend on
//! global random state.
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::format::{quantize, ElementKind, PixelFormat, Sample, SampleKind};

/// A deterministic sample sequence for one row of one plane.
///
/// The sequence is keyed by (plane, row): the two indices are packed into a
/// single seed word, plane in the high bits, row in the low bits. Constructing
/// the generator at a starting column `left` discards exactly `left` draws
/// first, so a fill that starts mid-row produces the same values on every
/// column it shares with a full-row fill.
///
/// The iterator is infinite and yields samples quantized to the row's
/// [`PixelFormat`]; chroma rows get float content recentered to
/// `[-0.5, 0.5)`.
///
/// ```
/// use line_window::{PixelFormat, RowPattern};
///
/// let full: Vec<_> = RowPattern::new(0, 3, 0, PixelFormat::uint(8), false)
///     .take(16)
///     .collect();
/// let tail: Vec<_> = RowPattern::new(0, 3, 4, PixelFormat::uint(8), false)
///     .take(12)
///     .collect();
/// assert_eq!(full[4..], tail[..]);
/// ```
pub struct RowPattern {
    rng: StdRng,
    format: PixelFormat,
    chroma: bool,
}

impl RowPattern {
    /// Construct the sequence for `row` of `plane`, starting at column `left`.
    pub fn new(plane: u32, row: u32, left: u32, format: PixelFormat, chroma: bool) -> Self {
        let mut rng = StdRng::from_seed(seed_bytes(plane, row));

        // Discard exactly `left` draws so any suffix of the row agrees with
        // the full-row sequence.
        for _ in 0..left {
            rng.next_u32();
        }

        RowPattern {
            rng,
            format,
            chroma,
        }
    }
}

impl Iterator for RowPattern {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let raw = self.rng.next_u32();

        Some(match self.format.kind {
            SampleKind::Uint => {
                let element = self.format.element_kind();
                let max = (1u32 << self.format.depth) - 1;
                match element {
                    ElementKind::U8 => Sample::U8((raw & max) as u8),
                    _ => Sample::U16((raw & max) as u16),
                }
            }
            _ => {
                // Map the draw linearly onto [0, 1).
                let unit = raw as f64 / (u32::MAX as f64 + 1.0);
                let x = unit as f32;
                quantize(if self.chroma { x - 0.5 } else { x }, &self.format)
            }
        })
    }
}

/// Expand the (plane, row) key into a seed array.
///
/// Plane occupies the top two bits of the seed word; rows stay far below
/// 2^30 for any geometry these buffers are used with.
fn seed_bytes(plane: u32, row: u32) -> [u8; 32] {
    let packed = (plane << 30) | row;
    let mut seed = [0u8; 32];
    seed[..4].copy_from_slice(&packed.to_le_bytes());
    seed
}
