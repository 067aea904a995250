//! Pixel format metadata and sample quantization.
//!
//! A [`PixelFormat`] describes how one sample of a plane is stored: its bit
//! depth, whether it is an integer or a (half-)float, and whether the plane
//! carries chroma-like content. The format selects one of a closed set of
//! storage element variants ([`ElementKind`]) at buffer construction time;
//! [`quantize`] converts a normalized float into the stored value.
use half::f16;

/// Describes the stored representation of one sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    /// Number of significant low bits in an integer sample.
    ///
    /// 16 for half floats and 32 for full floats, by convention.
    pub depth: u32,
    /// Integer, half-float, or float samples.
    pub kind: SampleKind,
    /// Whether samples of this format are centered around zero.
    pub chroma: bool,
}

/// The numeric interpretation of a stored sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// Unsigned integer samples of up to 16 bits.
    Uint,
    /// IEEE half-precision floats, stored as their 16-bit pattern.
    Half,
    /// IEEE single-precision floats.
    Float,
}

/// The closed set of storage element variants.
///
/// Selected from a [`PixelFormat`] once, at buffer construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// One byte per sample.
    U8,
    /// Two bytes per sample: 9–16 bit integers and half floats.
    U16,
    /// Four bytes per sample.
    F32,
}

/// One quantized stored value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    U8(u8),
    U16(u16),
    F32(f32),
}

impl PixelFormat {
    /// An unsigned integer format of the given bit depth.
    pub const fn uint(depth: u32) -> Self {
        PixelFormat {
            depth,
            kind: SampleKind::Uint,
            chroma: false,
        }
    }

    /// The IEEE half-precision float format.
    pub const fn half() -> Self {
        PixelFormat {
            depth: 16,
            kind: SampleKind::Half,
            chroma: false,
        }
    }

    /// The IEEE single-precision float format.
    pub const fn float() -> Self {
        PixelFormat {
            depth: 32,
            kind: SampleKind::Float,
            chroma: false,
        }
    }

    /// Mark the format as carrying chroma-like, zero-centered content.
    #[must_use]
    pub const fn with_chroma(self) -> Self {
        PixelFormat {
            chroma: true,
            ..self
        }
    }

    /// Whether samples are floating-point.
    pub const fn is_float(&self) -> bool {
        matches!(self.kind, SampleKind::Half | SampleKind::Float)
    }

    /// The storage element variant for this format.
    ///
    /// # Panics
    ///
    /// An integer depth of 0 or more than 16 bits has no storage element and
    /// is a contract violation, not a recoverable error.
    pub fn element_kind(&self) -> ElementKind {
        match self.kind {
            SampleKind::Uint => match self.depth {
                1..=8 => ElementKind::U8,
                9..=16 => ElementKind::U16,
                _ => panic!("no storage element for {}-bit integer samples", self.depth),
            },
            SampleKind::Half => ElementKind::U16,
            SampleKind::Float => ElementKind::F32,
        }
    }
}

/// Convert a normalized sample into the value stored for `format`.
///
/// Integer formats scale into `[0, 2^depth − 1]`, truncate, and mask to the
/// low `depth` bits. Half floats are encoded to their 16-bit pattern; full
/// floats pass through unchanged.
///
/// ```
/// use line_window::{quantize, PixelFormat, Sample};
///
/// assert_eq!(quantize(1.0, &PixelFormat::uint(8)), Sample::U8(255));
/// assert_eq!(quantize(0.25, &PixelFormat::float()), Sample::F32(0.25));
/// ```
pub fn quantize(x: f32, format: &PixelFormat) -> Sample {
    match (format.kind, format.element_kind()) {
        (SampleKind::Uint, element) => {
            let max = (1u32 << format.depth) - 1;
            let value = (x * max as f32) as u32 & max;
            match element {
                ElementKind::U8 => Sample::U8(value as u8),
                _ => Sample::U16(value as u16),
            }
        }
        (SampleKind::Half, _) => Sample::U16(f16::from_f32(x).to_bits()),
        (SampleKind::Float, _) => Sample::F32(x),
    }
}

#[test]
fn element_selection() {
    assert_eq!(PixelFormat::uint(8).element_kind(), ElementKind::U8);
    assert_eq!(PixelFormat::uint(10).element_kind(), ElementKind::U16);
    assert_eq!(PixelFormat::uint(16).element_kind(), ElementKind::U16);
    assert_eq!(PixelFormat::half().element_kind(), ElementKind::U16);
    assert_eq!(PixelFormat::float().element_kind(), ElementKind::F32);
}

#[test]
#[should_panic(expected = "no storage element")]
fn element_selection_rejects_wide_integers() {
    let _ = PixelFormat::uint(17).element_kind();
}

#[test]
fn integer_quantization_truncates_and_masks() {
    assert_eq!(quantize(0.0, &PixelFormat::uint(8)), Sample::U8(0));
    assert_eq!(quantize(0.5, &PixelFormat::uint(8)), Sample::U8(127));
    assert_eq!(quantize(1.0, &PixelFormat::uint(10)), Sample::U16(1023));
}

#[test]
fn half_quantization_matches_the_codec() {
    let expected = f16::from_f32(0.5).to_bits();
    assert_eq!(quantize(0.5, &PixelFormat::half()), Sample::U16(expected));
}

#[test]
fn float_quantization_is_passthrough() {
    assert_eq!(quantize(-0.25, &PixelFormat::float()), Sample::F32(-0.25));
}
