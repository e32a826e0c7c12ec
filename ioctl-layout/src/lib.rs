//! C memory layout of ioctl argument types, see
//! [the C representation](https://doc.rust-lang.org/reference/type-layout.html#the-c-representation)
//!
//! Field offsets are rounded up to each field's alignment, and the total size
//! is rounded up to the largest field alignment.

mod numbers;

/// Size and alignment of a type. `align` is always a power of two, so only
/// `new`, `of` and `array` build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    size: usize,
    align: usize,
}

impl Layout {
    /// `align` must be a power of two.
    pub const fn new(size: usize, align: usize) -> Option<Self> {
        if !align.is_power_of_two() {
            return None;
        }

        Some(Layout { size, align })
    }

    pub const fn of<T>() -> Self {
        Layout {
            size: std::mem::size_of::<T>(),
            align: std::mem::align_of::<T>(),
        }
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub const fn align(&self) -> usize {
        self.align
    }

    /// Layout of `[self; count]`.
    pub const fn array(self, count: usize) -> Option<Self> {
        match self.size.checked_mul(count) {
            Some(size) => Some(Layout {
                size,
                align: self.align,
            }),
            None => None,
        }
    }
}

pub trait CType: Sized {
    const LAYOUT: Layout;
}

impl<E: CType, const N: usize> CType for [E; N] {
    const LAYOUT: Layout = Layout {
        size: E::LAYOUT.size * N,
        align: E::LAYOUT.align,
    };
}

/// Field-by-field description of a `struct`, the way a C compiler would lay
/// it out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructLayout {
    fields: Vec<Layout>,
    packed: bool,
}

impl StructLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as `__attribute__((packed))`: no padding at all.
    pub fn packed() -> Self {
        StructLayout {
            fields: Vec::new(),
            packed: true,
        }
    }

    pub fn field(mut self, layout: Layout) -> Self {
        self.fields.push(layout);
        self
    }

    pub fn field_of<T: CType>(self) -> Self {
        self.field(T::LAYOUT)
    }

    pub fn fields(&self) -> &[Layout] {
        &self.fields[..]
    }

    pub fn is_packed(&self) -> bool {
        self.packed
    }

    pub fn align(&self) -> usize {
        if self.packed {
            return 1;
        }

        self.fields.iter().map(|f| f.align).max().unwrap_or(1)
    }

    /// Byte offset of every field, `None` if the struct does not fit in `usize`.
    pub fn offsets(&self) -> Option<Vec<usize>> {
        let mut offsets = Vec::with_capacity(self.fields.len());
        self.walk(|offset| offsets.push(offset))?;
        Some(offsets)
    }

    /// Total footprint including trailing padding, `None` on overflow.
    pub fn size(&self) -> Option<usize> {
        let end = self.walk(|_| {})?;
        align_up(end, self.align())
    }

    /// Layout of the whole struct, usable as a field of an enclosing struct.
    pub fn layout(&self) -> Option<Layout> {
        Some(Layout {
            size: self.size()?,
            align: self.align(),
        })
    }

    fn walk(&self, mut visit: impl FnMut(usize)) -> Option<usize> {
        let mut cursor = 0usize;
        for f in &self.fields[..] {
            if !self.packed {
                cursor = align_up(cursor, f.align)?;
            }

            visit(cursor);
            cursor = cursor.checked_add(f.size)?;
        }

        Some(cursor)
    }
}

fn align_up(v: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    v.checked_add(align - 1).map(|v| v & !(align - 1))
}

pub mod preclude {
    pub use super::{CType, Layout, StructLayout};
}
