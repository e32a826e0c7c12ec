use ioctl_layout::{CType, Layout, StructLayout};

use crate::{codec::IOC_SIZEMASK, Error, Result};

/// What an ioctl argument looks like, from which the size field of the
/// request number is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeDescriptor<'a> {
    ByteCount(usize),
    Struct(StructLayout),
    BufferView(&'a [u8]),
    Array {
        element: Box<SizeDescriptor<'a>>,
        count: usize,
    },
}

impl<'a> SizeDescriptor<'a> {
    /// Footprint of a `#[repr(C)]` Rust type.
    pub const fn of<T>() -> Self {
        SizeDescriptor::ByteCount(std::mem::size_of::<T>())
    }

    pub fn ctype<T: CType>() -> Self {
        SizeDescriptor::ByteCount(T::LAYOUT.size())
    }

    pub fn array(element: impl Into<SizeDescriptor<'a>>, count: usize) -> Self {
        SizeDescriptor::Array {
            element: Box::new(element.into()),
            count,
        }
    }

    /// Raw byte size, saturating at `usize::MAX` when it does not fit.
    pub fn byte_size(&self) -> usize {
        match self {
            SizeDescriptor::ByteCount(n) => *n,
            SizeDescriptor::Struct(layout) => layout.size().unwrap_or(usize::MAX),
            SizeDescriptor::BufferView(buf) => buf.len(),
            SizeDescriptor::Array { element, count } => {
                element.byte_size().saturating_mul(*count)
            }
        }
    }

    /// Byte size, checked against the 14-bit size field.
    pub fn checked_size(&self) -> Result<u32> {
        let size = self.byte_size();
        if size > IOC_SIZEMASK as usize {
            return Err(Error::SizeTooLarge { size });
        }

        Ok(size as u32)
    }
}

impl From<usize> for SizeDescriptor<'_> {
    fn from(n: usize) -> Self {
        SizeDescriptor::ByteCount(n)
    }
}

impl From<StructLayout> for SizeDescriptor<'_> {
    fn from(layout: StructLayout) -> Self {
        SizeDescriptor::Struct(layout)
    }
}

impl From<Layout> for SizeDescriptor<'_> {
    fn from(layout: Layout) -> Self {
        SizeDescriptor::ByteCount(layout.size())
    }
}

impl<'a> From<&'a [u8]> for SizeDescriptor<'a> {
    fn from(buf: &'a [u8]) -> Self {
        SizeDescriptor::BufferView(buf)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for SizeDescriptor<'a> {
    fn from(buf: &'a [u8; N]) -> Self {
        SizeDescriptor::BufferView(&buf[..])
    }
}

/// Mirrors `_IOC_TYPECHECK`.
pub fn size_of<'a>(payload: impl Into<SizeDescriptor<'a>>) -> Result<u32> {
    payload.into().checked_size()
}

#[cfg(test)]
mod tests {
    use std::os::raw::{c_int, c_short, c_uint};

    use ioctl_layout::StructLayout;

    use super::*;

    #[test]
    fn variants() {
        assert_eq!(size_of(12usize).unwrap(), 12);
        assert_eq!(size_of(SizeDescriptor::of::<c_int>()).unwrap(), 4);
        assert_eq!(size_of(SizeDescriptor::ctype::<[u16; 5]>()).unwrap(), 10);

        let buf = [0u8; 256];
        assert_eq!(size_of(&buf).unwrap(), 256);
        assert_eq!(size_of(&buf[..17]).unwrap(), 17);

        let devinfo = StructLayout::new()
            .field_of::<c_uint>()
            .field_of::<c_short>()
            .field_of::<c_short>();
        assert_eq!(size_of(devinfo.clone()).unwrap(), 8);

        assert_eq!(size_of(SizeDescriptor::array(devinfo, 3)).unwrap(), 24);
        assert_eq!(
            size_of(SizeDescriptor::array(SizeDescriptor::of::<u32>(), 0)).unwrap(),
            0
        );
    }

    #[test]
    fn too_large() {
        assert_eq!(size_of(0x3FFFusize).unwrap(), 0x3FFF);
        assert!(matches!(
            size_of(0x4000usize),
            Err(Error::SizeTooLarge { size: 0x4000 })
        ));

        let buf = vec![0u8; 0x4001];
        assert!(matches!(
            size_of(&buf[..]),
            Err(Error::SizeTooLarge { size: 0x4001 })
        ));

        let report = StructLayout::new()
            .field_of::<u32>()
            .field_of::<[u8; 4096]>();
        assert!(matches!(
            size_of(SizeDescriptor::array(report, 4)),
            Err(Error::SizeTooLarge { size: 16400 })
        ));

        assert!(matches!(
            size_of(SizeDescriptor::array(usize::MAX, 2)),
            Err(Error::SizeTooLarge { size: usize::MAX })
        ));
    }
}
