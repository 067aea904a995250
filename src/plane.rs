//! Multi-plane window composition.
//!
//! A buffer is one plane, or a color triple in which planes 1 and 2 store
//! chroma-like content at reduced resolution. Plane 0 always has the full
//! width and height; the other planes have their width, height, and window
//! mask right-shifted by the subsampling factors. All operations that take
//! coordinates take them in plane 0's (luma) space and translate per plane.
use alloc::vec::Vec;

use crate::format::PixelFormat;
use crate::guard::sealed::Sealed;
use crate::guard::{Element, PlaneStorage};
use crate::window::{LineWindow, LineWindowMut, WindowMask};

/// Whether a buffer carries a single plane or a color triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferKind {
    /// One plane.
    Plane,
    /// A primary plane and two subsampled chroma-like planes.
    Color,
}

/// One or three guard-fenced window planes with shared subsampling geometry.
pub struct PlaneWindows {
    kind: BufferKind,
    format: PixelFormat,
    planes: Vec<PlaneStorage>,
    width: u32,
    height: u32,
    subsample_w: u32,
    subsample_h: u32,
}

impl PlaneWindows {
    /// Allocate guarded storage for every plane and stamp the guards.
    ///
    /// `lines` is the requested window height before masking; zero requests
    /// the full buffer. Subsampled planes receive a proportionally smaller
    /// window unless the full buffer was requested.
    ///
    /// # Panics
    ///
    /// Panics if a plane's layout would not fit in memory.
    pub fn new(
        kind: BufferKind,
        width: u32,
        height: u32,
        format: PixelFormat,
        lines: u32,
        subsample_w: u32,
        subsample_h: u32,
    ) -> Self {
        let mask = WindowMask::for_lines(lines);
        let element = format.element_kind();
        let count = match kind {
            BufferKind::Plane => 1,
            BufferKind::Color => 3,
        };

        let mut planes = Vec::with_capacity(count);
        for index in 0..count {
            let (plane_width, plane_height, plane_mask) = if index == 0 {
                (width, height, mask)
            } else {
                (
                    width >> subsample_w,
                    height >> subsample_h,
                    mask.subsample(subsample_h),
                )
            };

            let plane = PlaneStorage::new(element, plane_width, plane_height, plane_mask)
                .expect("layout too large");
            planes.push(plane);
        }

        PlaneWindows {
            kind,
            format,
            planes,
            width,
            height,
            subsample_w,
            subsample_h,
        }
    }

    /// The buffer kind.
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// The sample format shared by all planes.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Number of planes: 1 or 3.
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Full-resolution width.
    pub fn full_width(&self) -> u32 {
        self.width
    }

    /// Full-resolution height.
    pub fn full_height(&self) -> u32 {
        self.height
    }

    /// Logical width of `plane`, in elements.
    pub fn width(&self, plane: usize) -> u32 {
        self.storage(plane).width()
    }

    /// Logical height of `plane`, in rows.
    pub fn height(&self, plane: usize) -> u32 {
        if plane == 0 {
            self.height
        } else {
            self.height >> self.subsample_h
        }
    }

    /// Physical lines in `plane`'s window.
    pub fn window_lines(&self, plane: usize) -> u32 {
        self.storage(plane).window_lines()
    }

    /// The window mask applied to `plane`'s logical rows.
    pub fn mask(&self, plane: usize) -> WindowMask {
        self.storage(plane).mask()
    }

    /// Bytes from one of `plane`'s lines to the next.
    pub fn byte_stride(&self, plane: usize) -> usize {
        self.storage(plane).byte_stride()
    }

    /// Translate a luma-space row into `plane`'s coordinate space.
    pub fn row_to_plane(&self, plane: usize, row: u32) -> u32 {
        if plane == 0 {
            row
        } else {
            row >> self.subsample_h
        }
    }

    /// Translate a luma-space column into `plane`'s coordinate space.
    pub fn col_to_plane(&self, plane: usize, col: u32) -> u32 {
        if plane == 0 {
            col
        } else {
            col >> self.subsample_w
        }
    }

    /// Whether `plane` carries zero-centered content.
    pub fn is_chroma(&self, plane: usize) -> bool {
        match self.kind {
            BufferKind::Plane => self.format.chroma,
            BufferKind::Color => plane > 0,
        }
    }

    pub(crate) fn storage(&self, plane: usize) -> &PlaneStorage {
        &self.planes[plane]
    }

    pub(crate) fn storage_mut(&mut self, plane: usize) -> &mut PlaneStorage {
        &mut self.planes[plane]
    }

    /// A read-only logical view over all planes.
    pub fn as_ref(&self) -> WindowRef<'_> {
        WindowRef { buf: self }
    }

    /// A mutable logical view over all planes.
    pub fn as_mut(&mut self) -> WindowMut<'_> {
        WindowMut { buf: self }
    }
}

/// A read-only, row-addressable view over a buffer's planes.
#[derive(Clone, Copy)]
pub struct WindowRef<'buf> {
    buf: &'buf PlaneWindows,
}

/// A mutable, row-addressable view over a buffer's planes.
///
/// A read-only view of the same storage can be taken at any time with
/// [`as_ref`](Self::as_ref); no copy is involved.
pub struct WindowMut<'buf> {
    buf: &'buf mut PlaneWindows,
}

impl<'buf> WindowRef<'buf> {
    /// Number of planes: 1 or 3.
    pub fn plane_count(&self) -> usize {
        self.buf.plane_count()
    }

    /// Logical width of `plane`, in elements.
    pub fn width(&self, plane: usize) -> u32 {
        self.buf.width(plane)
    }

    /// The window mask applied to `plane`'s logical rows.
    pub fn mask(&self, plane: usize) -> WindowMask {
        self.buf.mask(plane)
    }

    /// Bytes from one of `plane`'s lines to the next.
    pub fn byte_stride(&self, plane: usize) -> usize {
        self.buf.byte_stride(plane)
    }

    /// One logical row of `plane`, exactly the logical width.
    ///
    /// # Panics
    ///
    /// Requesting a plane that does not exist, or an element type other than
    /// the plane's storage element, is a contract violation.
    pub fn row<T: Element>(&self, plane: usize, row: u32) -> &'buf [T] {
        self.raw::<T>(plane).line(row)
    }

    /// The masked window over `plane`'s whole arena.
    ///
    /// # Panics
    ///
    /// Same contract as [`row`](Self::row).
    pub fn raw<T: Element>(&self, plane: usize) -> LineWindow<'buf, T> {
        let buf: &'buf PlaneWindows = self.buf;
        match T::plane(buf.storage(plane)) {
            Some(storage) => storage.as_window(),
            None => panic!("plane {} does not store this element type", plane),
        }
    }
}

impl WindowMut<'_> {
    /// Number of planes: 1 or 3.
    pub fn plane_count(&self) -> usize {
        self.buf.plane_count()
    }

    /// Logical width of `plane`, in elements.
    pub fn width(&self, plane: usize) -> u32 {
        self.buf.width(plane)
    }

    /// The window mask applied to `plane`'s logical rows.
    pub fn mask(&self, plane: usize) -> WindowMask {
        self.buf.mask(plane)
    }

    /// Bytes from one of `plane`'s lines to the next.
    pub fn byte_stride(&self, plane: usize) -> usize {
        self.buf.byte_stride(plane)
    }

    /// One logical row of `plane`, exactly the logical width.
    ///
    /// # Panics
    ///
    /// Same contract as [`WindowRef::row`].
    pub fn row<T: Element>(&self, plane: usize, row: u32) -> &[T] {
        match T::plane(self.buf.storage(plane)) {
            Some(storage) => storage.line(row),
            None => panic!("plane {} does not store this element type", plane),
        }
    }

    /// One logical row of `plane`, mutably.
    ///
    /// # Panics
    ///
    /// Same contract as [`WindowRef::row`].
    pub fn row_mut<T: Element>(&mut self, plane: usize, row: u32) -> &mut [T] {
        match T::plane_mut(self.buf.storage_mut(plane)) {
            Some(storage) => storage.line_mut(row),
            None => panic!("plane {} does not store this element type", plane),
        }
    }

    /// The masked window over `plane`'s whole arena, mutably.
    ///
    /// # Panics
    ///
    /// Same contract as [`WindowRef::row`].
    pub fn raw_mut<T: Element>(&mut self, plane: usize) -> LineWindowMut<'_, T> {
        match T::plane_mut(self.buf.storage_mut(plane)) {
            Some(storage) => storage.as_window_mut(),
            None => panic!("plane {} does not store this element type", plane),
        }
    }

    /// Borrow this as a read-only view of the same storage.
    pub fn as_ref(&self) -> WindowRef<'_> {
        WindowRef { buf: self.buf }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;

    #[test]
    fn color_geometry_is_subsampled() {
        let buf = PlaneWindows::new(BufferKind::Color, 16, 16, PixelFormat::uint(8), 4, 1, 1);

        assert_eq!(buf.plane_count(), 3);
        assert_eq!(buf.width(0), 16);
        assert_eq!(buf.width(1), 8);
        assert_eq!(buf.height(2), 8);
        assert_eq!(buf.mask(0).get(), 3);
        assert_eq!(buf.mask(1).get(), 1);
        assert_eq!(buf.window_lines(2), 2);
    }

    #[test]
    fn full_windows_stay_full_after_subsampling() {
        let buf = PlaneWindows::new(BufferKind::Color, 16, 16, PixelFormat::uint(8), 0, 1, 1);

        assert!(buf.mask(1).is_full());
        assert_eq!(buf.window_lines(0), 16);
        assert_eq!(buf.window_lines(1), 8);
    }

    #[test]
    fn coordinate_translation() {
        let buf = PlaneWindows::new(BufferKind::Color, 16, 16, PixelFormat::uint(8), 4, 1, 1);

        assert_eq!(buf.row_to_plane(0, 5), 5);
        assert_eq!(buf.row_to_plane(1, 5), 2);
        assert_eq!(buf.col_to_plane(2, 15), 7);
    }

    #[test]
    fn chroma_flags() {
        let color = PlaneWindows::new(BufferKind::Color, 16, 16, PixelFormat::uint(8), 4, 1, 1);
        assert!(!color.is_chroma(0));
        assert!(color.is_chroma(1));
        assert!(color.is_chroma(2));

        let plane = PlaneWindows::new(BufferKind::Plane, 16, 16, PixelFormat::float(), 4, 0, 0);
        assert!(!plane.is_chroma(0));

        let chroma =
            PlaneWindows::new(BufferKind::Plane, 16, 16, PixelFormat::float().with_chroma(), 4, 0, 0);
        assert!(chroma.is_chroma(0));
    }

    #[test]
    fn views_share_storage() {
        let mut buf = PlaneWindows::new(BufferKind::Plane, 8, 4, PixelFormat::uint(8), 2, 0, 0);

        let mut view = buf.as_mut();
        view.row_mut::<u8>(0, 1)[3] = 0xAB;
        assert_eq!(view.as_ref().row::<u8>(0, 1)[3], 0xAB);

        assert_eq!(buf.as_ref().row::<u8>(0, 1)[3], 0xAB);
    }

    #[test]
    #[should_panic(expected = "does not store this element type")]
    fn mismatched_element_type_is_a_contract_violation() {
        let buf = PlaneWindows::new(BufferKind::Plane, 8, 4, PixelFormat::uint(8), 2, 0, 0);
        let _ = buf.as_ref().row::<f32>(0, 0);
    }
}
