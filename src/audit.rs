// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `line-window` developers
//! The audit harness.
//!
//! An [`AuditBuffer`] owns a guard-fenced multi-plane window for one audit
//! scenario: it is constructed with fixed geometry, filled with known
//! content, handed to external filter code through its views, then
//! interrogated for guard integrity and content deltas, and discarded.
//! Everything here is synchronous and single-threaded; verification always
//! runs after external mutation has fully completed.
//!
//! Failures are diagnostics for the current scenario, not recoverable
//! errors: the `assert_*` operations panic with a message naming the plane,
//! row, and column involved, and the inspection variants
//! ([`verify_guards`](AuditBuffer::verify_guards),
//! [`find_mismatch`](AuditBuffer::find_mismatch)) return the same findings
//! as data.
use core::fmt;
use core::fmt::Write as _;
use core::ops::Range;

use alloc::string::String;
use alloc::vec::Vec;

use crate::format::{PixelFormat, Sample};
use crate::guard::GuardViolation;
use crate::pattern::RowPattern;
use crate::plane::{BufferKind, PlaneWindows, WindowMut, WindowRef};

/// The first differing element found by a content comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mismatch {
    /// Index of the differing plane.
    pub plane: usize,
    /// Row in the plane's own coordinate space.
    pub row: u32,
    /// Column in the plane's own coordinate space.
    pub col: u32,
    /// The value held by the buffer compared against.
    pub expected: Sample,
    /// The value held by the buffer the comparison was invoked on.
    pub actual: Sample,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mismatch at plane {} ({}, {}): expected {:?}, got {:?}",
            self.plane, self.row, self.col, self.expected, self.actual
        )
    }
}

/// A guard-fenced multi-plane window buffer with known-content filling.
///
/// ```
/// use line_window::{AuditBuffer, BufferKind, PixelFormat};
///
/// let mut buffer = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 4, 0, 0);
/// buffer.default_fill();
/// assert!(!buffer.detect_write(3, 0, 16));
///
/// buffer.random_fill(0..8, 0..16);
/// assert!(buffer.detect_write(3, 0, 16));
/// buffer.assert_guards_intact();
/// ```
pub struct AuditBuffer {
    inner: PlaneWindows,
}

impl AuditBuffer {
    /// Allocate a guarded buffer; see [`PlaneWindows::new`].
    pub fn new(
        kind: BufferKind,
        width: u32,
        height: u32,
        format: PixelFormat,
        lines: u32,
        subsample_w: u32,
        subsample_h: u32,
    ) -> Self {
        AuditBuffer {
            inner: PlaneWindows::new(kind, width, height, format, lines, subsample_w, subsample_h),
        }
    }

    /// Number of planes: 1 or 3.
    pub fn plane_count(&self) -> usize {
        self.inner.plane_count()
    }

    /// The composed planes.
    pub fn windows(&self) -> &PlaneWindows {
        &self.inner
    }

    /// Replace every plane's "not yet written" marker.
    pub fn set_fill_value(&mut self, byte: u8) {
        for plane in 0..self.inner.plane_count() {
            self.inner.storage_mut(plane).set_fill(byte);
        }
    }

    /// Replace one plane's "not yet written" marker.
    pub fn set_fill_value_on(&mut self, plane: usize, byte: u8) {
        self.inner.storage_mut(plane).set_fill(byte);
    }

    /// Populate a luma-space region with reproducible pseudo-random content.
    ///
    /// The ranges are translated into each plane's coordinate space. Every
    /// row in range is generated by a fresh [`RowPattern`] keyed at (plane,
    /// row) and starting at the range's first column, so overlapping fills
    /// agree on shared columns. Columns outside the range keep whatever they
    /// held before.
    pub fn random_fill(&mut self, rows: Range<u32>, cols: Range<u32>) {
        let format = self.inner.format();

        for plane in 0..self.inner.plane_count() {
            let chroma = self.inner.is_chroma(plane);
            let plane_rows =
                self.inner.row_to_plane(plane, rows.start)..self.inner.row_to_plane(plane, rows.end);
            let plane_cols =
                self.inner.col_to_plane(plane, cols.start)..self.inner.col_to_plane(plane, cols.end);

            for row in plane_rows {
                let pattern = RowPattern::new(plane as u32, row, plane_cols.start, format, chroma);
                self.inner
                    .storage_mut(plane)
                    .generate(row, plane_cols.clone(), pattern);
            }
        }
    }

    /// Set every physical line of every plane to the plane's fill marker,
    /// across the full logical width.
    pub fn default_fill(&mut self) {
        for plane in 0..self.inner.plane_count() {
            self.inner.storage_mut(plane).default_fill();
        }
    }

    /// Whether external code wrote anything into the region.
    ///
    /// True iff, for every plane, the translated span does not consist
    /// solely of the plane's fill marker. This is a coarse "was anything
    /// written here" oracle, not a content check.
    pub fn detect_write(&self, row: u32, left: u32, right: u32) -> bool {
        (0..self.inner.plane_count()).all(|plane| {
            let row = self.inner.row_to_plane(plane, row);
            let cols =
                self.inner.col_to_plane(plane, left)..self.inner.col_to_plane(plane, right);
            self.inner.storage(plane).any_written(row, cols)
        })
    }

    /// Compare a region against `other`, returning the first difference.
    ///
    /// The row and columns are luma-space and translated per plane; the
    /// reported coordinates are in the differing plane's own space.
    pub fn find_mismatch(
        &self,
        other: &AuditBuffer,
        row: u32,
        left: u32,
        right: u32,
    ) -> Option<Mismatch> {
        debug_assert_eq!(self.inner.plane_count(), other.inner.plane_count());

        (0..self.inner.plane_count()).find_map(|plane| {
            let row = self.inner.row_to_plane(plane, row);
            let cols =
                self.inner.col_to_plane(plane, left)..self.inner.col_to_plane(plane, right);
            self.inner
                .storage(plane)
                .first_mismatch(other.inner.storage(plane), row, cols)
                .map(|(col, ours, theirs)| Mismatch {
                    plane,
                    row,
                    col,
                    expected: theirs,
                    actual: ours,
                })
        })
    }

    /// Panic on the first differing element, naming plane, row, and column.
    pub fn assert_eq(&self, other: &AuditBuffer, row: u32, left: u32, right: u32) {
        if let Some(mismatch) = self.find_mismatch(other, row, left, right) {
            panic!("{}", mismatch);
        }
    }

    /// Check every guard region of every plane.
    ///
    /// Returns all violations found, not just the first.
    pub fn verify_guards(&self) -> Vec<GuardViolation> {
        let mut report = Vec::new();
        for plane in 0..self.inner.plane_count() {
            self.inner.storage(plane).verify_guards(plane, &mut report);
        }
        report
    }

    /// Panic listing every violated guard region.
    pub fn assert_guards_intact(&self) {
        let report = self.verify_guards();
        if report.is_empty() {
            return;
        }

        let mut message = String::from("guard bytes corrupted:");
        for violation in &report {
            let _ = write!(message, "\n  {}", violation);
        }
        panic!("{}", message);
    }

    /// A read-only logical view for filter code.
    pub fn as_ref(&self) -> WindowRef<'_> {
        self.inner.as_ref()
    }

    /// A mutable logical view for filter code.
    pub fn as_mut(&mut self) -> WindowMut<'_> {
        self.inner.as_mut()
    }
}
