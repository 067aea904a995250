// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `line-window` developers
//! # Line windows
//!
//! Bounded line-window buffers for streaming image pipelines, with a
//! guard-byte audit harness.
//!
//! A streaming pipeline that processes arbitrarily tall images cannot afford
//! one buffer line per image row. Instead, each filter stage is granted a
//! *window*: a small power-of-two ring of physical line slots per plane, and
//! an addressing rule that maps any logical row index onto its slot with a
//! single bitwise AND. This crate provides that addressing core, composes it
//! into single-plane and chroma-subsampled three-plane buffers, and wraps the
//! backing storage in sentinel guard bytes so a test harness can prove that a
//! filter never read or wrote outside the rows and columns it was assigned:
//!
//! - [`WindowMask`] maps unbounded logical rows to bounded physical slots.
//! - [`PlaneWindows`] composes one or three masked window planes, applying
//!   horizontal/vertical subsampling to the chroma-like planes.
//! - Every plane's storage is fenced: a guard line above, one below, and
//!   guard columns on both sides of every stored line.
//! - [`RowPattern`] produces reproducible pseudo-random row content keyed by
//!   (plane, row), quantized to the plane's [`PixelFormat`].
//! - [`AuditBuffer`] ties it together: fill windows with known content, hand
//!   them to filter code, then verify guard integrity and content deltas.
//!
//! ## Usage
//!
//! ```
//! use line_window::{AuditBuffer, BufferKind, PixelFormat};
//!
//! // An 8-bit plane, 16×8, windowed to four lines.
//! let mut buffer = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 4, 0, 0);
//! buffer.default_fill();
//! buffer.random_fill(0..8, 0..16);
//!
//! // Rows four apart share one physical slot.
//! let window = buffer.as_ref().raw::<u8>(0);
//! assert_eq!(window.line_offset(5), window.line_offset(1));
//!
//! buffer.assert_guards_intact();
//! ```
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
#![deny(unsafe_code)]
extern crate alloc;

mod align;
mod audit;
mod format;
mod guard;
mod pattern;
mod plane;
#[cfg(test)]
mod tests;
mod window;

pub use self::audit::{AuditBuffer, Mismatch};
pub use self::format::{quantize, ElementKind, PixelFormat, Sample, SampleKind};
pub use self::guard::{Element, GuardRegion, GuardViolation, DEFAULT_FILL_BYTE, GUARD_BYTE};
pub use self::pattern::RowPattern;
pub use self::plane::{BufferKind, PlaneWindows, WindowMut, WindowRef};
pub use self::window::{LineWindow, LineWindowMut, WindowMask};

/// Alignment quanta shared with collaborating allocation utilities.
///
/// A stored line's payload always starts and ends on an [`ALIGNMENT`] byte
/// boundary within its plane's arena, and the guard columns on either side of
/// it span at least one alignment unit each. Filter code that computes its
/// own line padding should use the same quanta.
///
/// [`ALIGNMENT`]: alignment::ALIGNMENT
pub mod alignment {
    pub use crate::align::{ceil_n, guard_len, ALIGNMENT};
}
