// Distributed under The MIT License (MIT)
//
// Copyright (c) 2026 The `line-window` developers
//! Guard-fenced plane storage.
//!
//! Each plane owns a flat element arena laid out as a header guard line, one
//! guarded line per physical window slot, and a footer guard line. Every
//! guarded line carries guard columns spanning one alignment unit on each
//! side of its payload. Guards are stamped with a byte-replicated sentinel
//! exactly once, at construction; any later change to a guard region is, by
//! definition, an out-of-bounds write by whatever code held the window in
//! between. Verification compares guard regions byte for byte and reports
//! every violated region, never stopping at the first.
use core::fmt;
use core::mem;
use core::ops::Range;

use alloc::vec;
use alloc::vec::Vec;

use bytemuck::Zeroable;

use crate::align::{ceil_n, guard_len};
use crate::format::{ElementKind, Sample};
use crate::pattern::RowPattern;
use crate::window::{LineWindow, LineWindowMut, WindowMask};

/// Byte replicated into every guard element.
pub const GUARD_BYTE: u8 = 0xFE;

/// Byte replicated into the fill marker planes start out with.
///
/// The marker means "not yet written"; it is distinct from [`GUARD_BYTE`]
/// and can be changed per plane after construction.
pub const DEFAULT_FILL_BYTE: u8 = 0xCD;

pub(crate) mod sealed {
    use super::{GuardedPlane, PlaneStorage};

    /// Seals [`Element`](super::Element) and carries the storage dispatch.
    pub trait Sealed: Sized {
        fn plane(storage: &PlaneStorage) -> Option<&GuardedPlane<Self>>;
        fn plane_mut(storage: &mut PlaneStorage) -> Option<&mut GuardedPlane<Self>>;
    }

    impl Sealed for u8 {
        fn plane(storage: &PlaneStorage) -> Option<&GuardedPlane<u8>> {
            match storage {
                PlaneStorage::U8(plane) => Some(plane),
                _ => None,
            }
        }

        fn plane_mut(storage: &mut PlaneStorage) -> Option<&mut GuardedPlane<u8>> {
            match storage {
                PlaneStorage::U8(plane) => Some(plane),
                _ => None,
            }
        }
    }

    impl Sealed for u16 {
        fn plane(storage: &PlaneStorage) -> Option<&GuardedPlane<u16>> {
            match storage {
                PlaneStorage::U16(plane) => Some(plane),
                _ => None,
            }
        }

        fn plane_mut(storage: &mut PlaneStorage) -> Option<&mut GuardedPlane<u16>> {
            match storage {
                PlaneStorage::U16(plane) => Some(plane),
                _ => None,
            }
        }
    }

    impl Sealed for f32 {
        fn plane(storage: &PlaneStorage) -> Option<&GuardedPlane<f32>> {
            match storage {
                PlaneStorage::F32(plane) => Some(plane),
                _ => None,
            }
        }

        fn plane_mut(storage: &mut PlaneStorage) -> Option<&mut GuardedPlane<f32>> {
            match storage {
                PlaneStorage::F32(plane) => Some(plane),
                _ => None,
            }
        }
    }
}

/// A storage element of a guarded plane.
///
/// The set is closed: `u8` for 8-bit integer samples, `u16` for wider
/// integers and half-float bit patterns, `f32` for float samples. The
/// variant is selected from a [`PixelFormat`](crate::PixelFormat) when the
/// buffer is constructed.
pub trait Element: bytemuck::Pod + PartialEq + fmt::Debug + sealed::Sealed {
    /// The variant tag for this element type.
    const KIND: ElementKind;

    /// The value with every byte set to `byte`.
    fn splat(byte: u8) -> Self {
        let mut value = Self::zeroed();
        bytemuck::bytes_of_mut(&mut value).fill(byte);
        value
    }

    /// Unwrap a generated sample of this element kind.
    ///
    /// # Panics
    ///
    /// A sample of any other kind is a contract violation.
    fn from_sample(sample: Sample) -> Self;

    /// Wrap a stored value back into a sample.
    fn into_sample(self) -> Sample;
}

impl Element for u8 {
    const KIND: ElementKind = ElementKind::U8;

    fn from_sample(sample: Sample) -> u8 {
        match sample {
            Sample::U8(value) => value,
            other => panic!("sample {:?} does not fit byte storage", other),
        }
    }

    fn into_sample(self) -> Sample {
        Sample::U8(self)
    }
}

impl Element for u16 {
    const KIND: ElementKind = ElementKind::U16;

    fn from_sample(sample: Sample) -> u16 {
        match sample {
            Sample::U16(value) => value,
            other => panic!("sample {:?} does not fit word storage", other),
        }
    }

    fn into_sample(self) -> Sample {
        Sample::U16(self)
    }
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::F32;

    fn from_sample(sample: Sample) -> f32 {
        match sample {
            Sample::F32(value) => value,
            other => panic!("sample {:?} does not fit float storage", other),
        }
    }

    fn into_sample(self) -> Sample {
        Sample::F32(self)
    }
}

/// One guard region of one plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardRegion {
    /// The guard line before the first physical line.
    Header,
    /// The guard line after the last physical line.
    Footer,
    /// The guard columns left of physical line `i`'s payload.
    RowLeft(u32),
    /// The guard columns right of physical line `i`'s payload.
    RowRight(u32),
}

/// A guard region that no longer holds the sentinel pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuardViolation {
    /// Index of the violated plane.
    pub plane: usize,
    /// Which of the plane's guard regions was written.
    pub region: GuardRegion,
}

impl fmt::Display for GuardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            GuardRegion::Header => {
                write!(f, "plane {}: header guard bytes corrupted", self.plane)
            }
            GuardRegion::Footer => {
                write!(f, "plane {}: footer guard bytes corrupted", self.plane)
            }
            GuardRegion::RowLeft(row) => {
                write!(f, "plane {}: guard corrupted left of line {}", self.plane, row)
            }
            GuardRegion::RowRight(row) => {
                write!(f, "plane {}: guard corrupted right of line {}", self.plane, row)
            }
        }
    }
}

/// The storage variant carrier for one plane.
pub(crate) enum PlaneStorage {
    U8(GuardedPlane<u8>),
    U16(GuardedPlane<u16>),
    F32(GuardedPlane<f32>),
}

macro_rules! each_plane {
    ($storage:expr, $plane:ident => $body:expr) => {
        match $storage {
            PlaneStorage::U8($plane) => $body,
            PlaneStorage::U16($plane) => $body,
            PlaneStorage::F32($plane) => $body,
        }
    };
}

impl PlaneStorage {
    pub fn new(kind: ElementKind, width: u32, height: u32, mask: WindowMask) -> Option<Self> {
        Some(match kind {
            ElementKind::U8 => PlaneStorage::U8(GuardedPlane::new(width, height, mask)?),
            ElementKind::U16 => PlaneStorage::U16(GuardedPlane::new(width, height, mask)?),
            ElementKind::F32 => PlaneStorage::F32(GuardedPlane::new(width, height, mask)?),
        })
    }

    pub fn width(&self) -> u32 {
        each_plane!(self, plane => plane.width())
    }

    pub fn window_lines(&self) -> u32 {
        each_plane!(self, plane => plane.window_lines())
    }

    pub fn mask(&self) -> WindowMask {
        each_plane!(self, plane => plane.mask())
    }

    pub fn byte_stride(&self) -> usize {
        each_plane!(self, plane => plane.byte_stride())
    }

    pub fn set_fill(&mut self, byte: u8) {
        each_plane!(self, plane => plane.set_fill(byte))
    }

    pub fn default_fill(&mut self) {
        each_plane!(self, plane => plane.default_fill())
    }

    pub fn generate(&mut self, row: u32, cols: Range<u32>, pattern: RowPattern) {
        each_plane!(self, plane => plane.generate(row, cols, pattern))
    }

    pub fn any_written(&self, row: u32, cols: Range<u32>) -> bool {
        each_plane!(self, plane => plane.any_written(row, cols))
    }

    pub fn verify_guards(&self, plane_index: usize, report: &mut Vec<GuardViolation>) {
        each_plane!(self, plane => plane.verify_guards(plane_index, report))
    }

    /// First differing element between two planes over the same span.
    ///
    /// # Panics
    ///
    /// Comparing planes of different element kinds is a contract violation.
    pub fn first_mismatch(
        &self,
        other: &Self,
        row: u32,
        cols: Range<u32>,
    ) -> Option<(u32, Sample, Sample)> {
        match (self, other) {
            (PlaneStorage::U8(a), PlaneStorage::U8(b)) => a.first_mismatch(b, row, cols),
            (PlaneStorage::U16(a), PlaneStorage::U16(b)) => a.first_mismatch(b, row, cols),
            (PlaneStorage::F32(a), PlaneStorage::F32(b)) => a.first_mismatch(b, row, cols),
            _ => panic!("comparing planes with different element kinds"),
        }
    }
}

/// One plane's guard-fenced window storage.
///
/// Owns its arena exclusively for its own lifetime. The payload of physical
/// line `i` starts at element `(i + 1) * stride + guard_len::<T>()`; see the
/// module documentation for the full layout.
pub(crate) struct GuardedPlane<T> {
    store: Vec<T>,
    width: u32,
    lines: u32,
    stride: usize,
    mask: WindowMask,
    fill: T,
}

impl<T: Element> GuardedPlane<T> {
    /// Allocate and stamp the guards.
    ///
    /// `None` if the layout does not fit in memory.
    pub fn new(width: u32, height: u32, mask: WindowMask) -> Option<Self> {
        let pad = guard_len::<T>();
        let stride = ceil_n(width as usize, pad).checked_add(2 * pad)?;
        let lines = mask.window_height(height);
        let total = stride.checked_mul((lines as usize).checked_add(2)?)?;

        let mut plane = GuardedPlane {
            store: vec![T::zeroed(); total],
            width,
            lines,
            stride,
            mask,
            fill: T::splat(DEFAULT_FILL_BYTE),
        };
        plane.stamp_guards();
        Some(plane)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn window_lines(&self) -> u32 {
        self.lines
    }

    pub fn mask(&self) -> WindowMask {
        self.mask
    }

    pub fn byte_stride(&self) -> usize {
        self.stride * mem::size_of::<T>()
    }

    fn payload_offset(&self, slot: u32) -> usize {
        (slot as usize + 1) * self.stride + guard_len::<T>()
    }

    /// One logical row's payload.
    pub fn line(&self, row: u32) -> &[T] {
        let start = self.payload_offset(self.mask.slot(row));
        &self.store[start..start + self.width as usize]
    }

    /// One logical row's payload, mutably.
    pub fn line_mut(&mut self, row: u32) -> &mut [T] {
        let start = self.payload_offset(self.mask.slot(row));
        &mut self.store[start..start + self.width as usize]
    }

    fn slot_line_mut(&mut self, slot: u32) -> &mut [T] {
        let start = self.payload_offset(slot);
        &mut self.store[start..start + self.width as usize]
    }

    /// Replace the plane's "not yet written" marker.
    pub fn set_fill(&mut self, byte: u8) {
        self.fill = T::splat(byte);
    }

    /// Set every physical line's payload to the fill marker.
    pub fn default_fill(&mut self) {
        let fill = self.fill;
        for slot in 0..self.lines {
            self.slot_line_mut(slot).fill(fill);
        }
    }

    /// Populate a column span of one logical row from a sample sequence.
    pub fn generate(&mut self, row: u32, cols: Range<u32>, pattern: RowPattern) {
        let line = self.line_mut(row);
        let span = &mut line[cols.start as usize..cols.end as usize];
        for (element, sample) in span.iter_mut().zip(pattern) {
            *element = T::from_sample(sample);
        }
    }

    /// Whether anything other than the fill marker occupies the span.
    pub fn any_written(&self, row: u32, cols: Range<u32>) -> bool {
        let span = &self.line(row)[cols.start as usize..cols.end as usize];
        span.iter().any(|element| *element != self.fill)
    }

    /// First differing element against `other` over the same span.
    pub fn first_mismatch(
        &self,
        other: &Self,
        row: u32,
        cols: Range<u32>,
    ) -> Option<(u32, Sample, Sample)> {
        debug_assert_eq!(self.width, other.width);
        let ours = &self.line(row)[cols.start as usize..cols.end as usize];
        let theirs = &other.line(row)[cols.start as usize..cols.end as usize];

        ours.iter()
            .zip(theirs)
            .enumerate()
            .find_map(|(index, (a, b))| {
                (a != b).then(|| (cols.start + index as u32, (*a).into_sample(), (*b).into_sample()))
            })
    }

    /// Runs exactly once, at construction. No other code path writes the
    /// guard regions.
    fn stamp_guards(&mut self) {
        let guard = T::splat(GUARD_BYTE);
        let pad = guard_len::<T>();
        let stride = self.stride;
        let width = self.width as usize;

        self.store[..stride].fill(guard);
        for slot in 0..self.lines as usize {
            let line = (slot + 1) * stride;
            self.store[line..line + pad].fill(guard);
            self.store[line + pad + width..line + stride].fill(guard);
        }
        let footer = (self.lines as usize + 1) * stride;
        self.store[footer..].fill(guard);
    }

    /// Append a violation for every guard region not holding the sentinel.
    pub fn verify_guards(&self, plane_index: usize, report: &mut Vec<GuardViolation>) {
        let pad = guard_len::<T>();
        let stride = self.stride;
        let width = self.width as usize;

        if !all_guard(&self.store[..stride]) {
            report.push(GuardViolation {
                plane: plane_index,
                region: GuardRegion::Header,
            });
        }

        for slot in 0..self.lines {
            let line = (slot as usize + 1) * stride;
            if !all_guard(&self.store[line..line + pad]) {
                report.push(GuardViolation {
                    plane: plane_index,
                    region: GuardRegion::RowLeft(slot),
                });
            }
            if !all_guard(&self.store[line + pad + width..line + stride]) {
                report.push(GuardViolation {
                    plane: plane_index,
                    region: GuardRegion::RowRight(slot),
                });
            }
        }

        let footer = (self.lines as usize + 1) * stride;
        if !all_guard(&self.store[footer..]) {
            report.push(GuardViolation {
                plane: plane_index,
                region: GuardRegion::Footer,
            });
        }
    }

    /// Borrow the arena as a read-only masked window.
    pub fn as_window(&self) -> LineWindow<'_, T> {
        LineWindow::new(
            &self.store,
            self.stride + guard_len::<T>(),
            self.stride,
            self.width,
            self.mask,
        )
    }

    /// Borrow the arena as a mutable masked window.
    pub fn as_window_mut(&mut self) -> LineWindowMut<'_, T> {
        LineWindowMut::new(
            &mut self.store,
            self.stride + guard_len::<T>(),
            self.stride,
            self.width,
            self.mask,
        )
    }
}

/// Guard comparison is byte-exact regardless of the element type.
fn all_guard<T: Element>(region: &[T]) -> bool {
    bytemuck::cast_slice::<T, u8>(region)
        .iter()
        .all(|byte| *byte == GUARD_BYTE)
}
