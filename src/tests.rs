use crate::{
    AuditBuffer, BufferKind, GuardRegion, GuardViolation, Mismatch, PixelFormat, Sample,
};

use alloc::vec::Vec;
use half::f16;

#[test]
fn windowed_rows_alias_physical_slots() {
    let mut buffer = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 4, 0, 0);
    buffer.random_fill(0..8, 0..16);

    let window = buffer.as_ref().raw::<u8>(0);
    assert_eq!(window.mask().get(), 3);

    // Rows 5 and 1 select the identical physical address.
    assert_eq!(window.line_offset(5), window.line_offset(1));
    assert_eq!(window.line(5), window.line(1));
}

#[test]
fn full_buffers_keep_rows_distinct() {
    let buffer = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 0, 0, 0);

    let window = buffer.as_ref().raw::<u8>(0);
    assert!(window.mask().is_full());

    let offsets: Vec<_> = (0..8).map(|row| window.line_offset(row)).collect();
    for (row, offset) in offsets.iter().enumerate() {
        assert_eq!(*offset, window.line_offset(0) + row * window.stride());
    }
}

#[test]
fn chroma_planes_follow_subsampling() {
    let mut buffer = AuditBuffer::new(BufferKind::Color, 16, 16, PixelFormat::uint(8), 4, 1, 1);
    buffer.default_fill();
    buffer.random_fill(0..2, 0..16);

    // Two luma rows map onto chroma row 0 only.
    let view = buffer.as_ref();
    assert!(view.row::<u8>(1, 0).iter().any(|value| *value != 0xCD));
    assert!(view.row::<u8>(1, 1).iter().all(|value| *value == 0xCD));
    assert!(view.row::<u8>(2, 1).iter().all(|value| *value == 0xCD));

    assert!(buffer.detect_write(0, 0, 16));
    assert!(!buffer.detect_write(2, 0, 16));
}

#[test]
fn corrupting_one_footer_element_is_reported_alone() {
    let mut buffer = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 4, 0, 0);
    buffer.default_fill();

    {
        let mut view = buffer.as_mut();
        let mut window = view.raw_mut::<u8>(0);
        let arena = window.data_mut();
        let last = arena.len() - 1;
        arena[last] = 0;
    }

    assert_eq!(
        buffer.verify_guards(),
        [GuardViolation {
            plane: 0,
            region: GuardRegion::Footer,
        }]
    );
}

#[test]
#[should_panic(expected = "footer guard bytes corrupted")]
fn corrupted_guards_fail_the_assertion() {
    let mut buffer = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 4, 0, 0);

    {
        let mut view = buffer.as_mut();
        let mut window = view.raw_mut::<u8>(0);
        let arena = window.data_mut();
        let last = arena.len() - 1;
        arena[last] = 0;
    }

    buffer.assert_guards_intact();
}

#[test]
fn line_guards_are_attributed_to_their_line() {
    let mut buffer = AuditBuffer::new(BufferKind::Plane, 12, 4, PixelFormat::uint(10), 2, 0, 0);

    {
        let mut view = buffer.as_mut();
        let mut window = view.raw_mut::<u16>(0);
        let left = window.line_offset(1) - 1;
        let right = window.line_offset(1) + 12;
        let arena = window.data_mut();
        arena[left] = 0;
        arena[right] = 0;
    }

    assert_eq!(
        buffer.verify_guards(),
        [
            GuardViolation {
                plane: 0,
                region: GuardRegion::RowLeft(1),
            },
            GuardViolation {
                plane: 0,
                region: GuardRegion::RowRight(1),
            },
        ]
    );
}

#[test]
fn in_window_writes_leave_guards_intact() {
    let mut buffer = AuditBuffer::new(BufferKind::Color, 16, 16, PixelFormat::uint(8), 4, 1, 1);
    buffer.default_fill();
    buffer.random_fill(0..16, 0..16);

    {
        let mut view = buffer.as_mut();
        for plane in 0..view.plane_count() {
            let height = if plane == 0 { 16 } else { 8 };
            for row in 0..height {
                view.row_mut::<u8>(plane, row).fill(0x5A);
            }
        }
    }

    buffer.assert_guards_intact();
}

#[test]
fn float_planes_audit_cleanly() {
    let mut buffer = AuditBuffer::new(BufferKind::Plane, 20, 6, PixelFormat::float(), 2, 0, 0);
    buffer.default_fill();
    buffer.random_fill(0..6, 0..20);
    buffer.assert_guards_intact();
    assert!(buffer.detect_write(3, 0, 20));
}

#[test]
fn write_detection_soundness() {
    let mut buffer = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 4, 0, 0);
    buffer.default_fill();

    for row in 0..8 {
        assert!(!buffer.detect_write(row, 0, 16), "row {}", row);
    }

    buffer.as_mut().row_mut::<u8>(0, 3)[5] = 0;

    assert!(buffer.detect_write(3, 0, 16));
    assert!(buffer.detect_write(3, 5, 6));
    assert!(!buffer.detect_write(3, 0, 5));
    assert!(!buffer.detect_write(3, 6, 16));
    // Row 4 occupies a different slot of the four-line window.
    assert!(!buffer.detect_write(4, 0, 16));
    // Row 7 aliases row 3 and sees its write.
    assert!(buffer.detect_write(7, 0, 16));
}

#[test]
fn fill_markers_are_per_plane() {
    let mut buffer = AuditBuffer::new(BufferKind::Color, 8, 8, PixelFormat::uint(8), 2, 1, 1);
    buffer.set_fill_value(0x11);
    buffer.set_fill_value_on(2, 0x22);
    buffer.default_fill();

    let view = buffer.as_ref();
    assert!(view.row::<u8>(0, 0).iter().all(|value| *value == 0x11));
    assert!(view.row::<u8>(2, 0).iter().all(|value| *value == 0x22));
}

#[test]
fn identical_fills_compare_equal() {
    let mut a = AuditBuffer::new(BufferKind::Color, 16, 16, PixelFormat::uint(10), 4, 1, 1);
    let mut b = AuditBuffer::new(BufferKind::Color, 16, 16, PixelFormat::uint(10), 4, 1, 1);
    a.default_fill();
    b.default_fill();
    a.random_fill(0..16, 0..16);
    b.random_fill(0..16, 0..16);

    for row in 0..16 {
        a.assert_eq(&b, row, 0, 16);
    }
}

#[test]
fn partial_refill_agrees_with_full_fill() {
    let mut full = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 0, 0, 0);
    let mut partial = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 0, 0, 0);

    full.random_fill(0..8, 0..16);
    partial.default_fill();
    partial.random_fill(0..8, 4..16);

    for row in 0..8 {
        assert_eq!(full.find_mismatch(&partial, row, 4, 16), None, "row {}", row);
    }
}

#[test]
fn mismatches_name_the_plane_space_location() {
    let mut a = AuditBuffer::new(BufferKind::Color, 16, 16, PixelFormat::uint(8), 4, 1, 1);
    let mut b = AuditBuffer::new(BufferKind::Color, 16, 16, PixelFormat::uint(8), 4, 1, 1);
    a.random_fill(0..16, 0..16);
    b.random_fill(0..16, 0..16);

    // Corrupt chroma plane 1 at its own row 1, column 2.
    b.as_mut().row_mut::<u8>(1, 1)[2] ^= 0xFF;

    let mismatch = a.find_mismatch(&b, 2, 0, 16).expect("one element differs");
    assert_eq!(mismatch.plane, 1);
    assert_eq!(mismatch.row, 1);
    assert_eq!(mismatch.col, 2);
    assert_ne!(mismatch.expected, mismatch.actual);

    // Luma row 4 maps onto chroma slot 0, which was not touched.
    assert_eq!(a.find_mismatch(&b, 4, 0, 16), None);
}

#[test]
#[should_panic(expected = "mismatch at plane 0")]
fn differing_content_fails_the_assertion() {
    let mut a = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 4, 0, 0);
    let mut b = AuditBuffer::new(BufferKind::Plane, 16, 8, PixelFormat::uint(8), 4, 0, 0);
    a.random_fill(0..8, 0..16);
    b.random_fill(0..8, 0..16);

    b.as_mut().row_mut::<u8>(0, 2)[7] ^= 0xFF;
    a.assert_eq(&b, 2, 0, 16);
}

#[test]
fn half_float_rows_hold_recentered_content() {
    let mut buffer = AuditBuffer::new(BufferKind::Color, 16, 8, PixelFormat::half(), 4, 1, 1);
    buffer.random_fill(0..8, 0..16);

    let view = buffer.as_ref();
    for value in view.row::<u16>(0, 1) {
        let decoded = f16::from_bits(*value).to_f32();
        // Half rounding may land exactly on 1.0.
        assert!((0.0..=1.0).contains(&decoded), "luma sample {}", decoded);
    }
    for value in view.row::<u16>(1, 1) {
        let decoded = f16::from_bits(*value).to_f32();
        assert!((-0.51..0.51).contains(&decoded), "chroma sample {}", decoded);
    }
}

#[test]
fn mismatch_reports_both_values() {
    let mismatch = Mismatch {
        plane: 0,
        row: 4,
        col: 9,
        expected: Sample::U8(3),
        actual: Sample::U8(7),
    };
    let rendered = alloc::format!("{}", mismatch);
    assert!(rendered.contains("plane 0"));
    assert!(rendered.contains("(4, 9)"));
}
