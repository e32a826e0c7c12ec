//! Request number layout, following `include/uapi/asm-generic/ioctl.h`.
//!
//! ```text
//!  31 30 29          16 15       8 7        0
//! +-----+--------------+----------+----------+
//! | dir |     size     |   type   |  number  |
//! +-----+--------------+----------+----------+
//! ```
//!
//! `IOC_WRITE` means userland is writing and the driver is reading, `IOC_READ`
//! means userland is reading and the driver is writing.

use tracing::trace;

use crate::{
    payload::SizeDescriptor,
    res::ensure_fits,
    util::impl_num_enums,
    Field, Result,
};

pub type RequestNumber = u32;

pub const IOC_NRBITS: u32 = 8;
pub const IOC_TYPEBITS: u32 = 8;
pub const IOC_SIZEBITS: u32 = 14;
pub const IOC_DIRBITS: u32 = 2;

pub const IOC_NRMASK: u32 = (1 << IOC_NRBITS) - 1;
pub const IOC_TYPEMASK: u32 = (1 << IOC_TYPEBITS) - 1;
pub const IOC_SIZEMASK: u32 = (1 << IOC_SIZEBITS) - 1;
pub const IOC_DIRMASK: u32 = (1 << IOC_DIRBITS) - 1;

pub const IOC_NRSHIFT: u32 = 0;
pub const IOC_TYPESHIFT: u32 = IOC_NRSHIFT + IOC_NRBITS;
pub const IOC_SIZESHIFT: u32 = IOC_TYPESHIFT + IOC_TYPEBITS;
pub const IOC_DIRSHIFT: u32 = IOC_SIZESHIFT + IOC_SIZEBITS;

pub const IOC_NONE: u32 = 0;
pub const IOC_WRITE: u32 = 1;
pub const IOC_READ: u32 = 2;

pub const IOC_IN: u32 = IOC_WRITE << IOC_DIRSHIFT;
pub const IOC_OUT: u32 = IOC_READ << IOC_DIRSHIFT;
pub const IOC_INOUT: u32 = (IOC_WRITE | IOC_READ) << IOC_DIRSHIFT;
pub const IOCSIZE_MASK: u32 = IOC_SIZEMASK << IOC_SIZESHIFT;
pub const IOCSIZE_SHIFT: u32 = IOC_SIZESHIFT;

impl_num_enums!(
    Direction,
    u32,
    None = 0,
    Write = 1,
    Read = 2,
    ReadWrite = 3,
);

impl Direction {
    /// Decodes the direction bits of `n`. All four 2-bit patterns are valid.
    pub const fn of(n: RequestNumber) -> Self {
        match direction(n) {
            IOC_NONE => Direction::None,
            IOC_WRITE => Direction::Write,
            IOC_READ => Direction::Read,
            _ => Direction::ReadWrite,
        }
    }

    /// Userland passes data to the driver.
    pub fn is_write(&self) -> bool {
        (*self as u32) & IOC_WRITE != 0
    }

    /// The driver passes data back to userland.
    pub fn is_read(&self) -> bool {
        (*self as u32) & IOC_READ != 0
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::None => "NONE",
            Direction::Write => "W",
            Direction::Read => "R",
            Direction::ReadWrite => "RW",
        }
    }
}

/// Packs the four fields, checking each against its bit width.
pub fn pack(dir: u32, ty: u32, nr: u32, size: u32) -> Result<RequestNumber> {
    ensure_fits!(Field::Direction, dir, IOC_DIRMASK);
    ensure_fits!(Field::Type, ty, IOC_TYPEMASK);
    ensure_fits!(Field::Number, nr, IOC_NRMASK);
    ensure_fits!(Field::Size, size, IOC_SIZEMASK);

    let req = ioc(dir, ty, nr, size);
    trace!(dir, ty, nr, size, req, "request packed");
    Ok(req)
}

pub fn none(ty: u32, nr: u32) -> Result<RequestNumber> {
    pack(IOC_NONE, ty, nr, 0)
}

pub fn read<'a>(ty: u32, nr: u32, payload: impl Into<SizeDescriptor<'a>>) -> Result<RequestNumber> {
    pack(IOC_READ, ty, nr, payload.into().checked_size()?)
}

pub fn write<'a>(ty: u32, nr: u32, payload: impl Into<SizeDescriptor<'a>>) -> Result<RequestNumber> {
    pack(IOC_WRITE, ty, nr, payload.into().checked_size()?)
}

pub fn read_write<'a>(
    ty: u32,
    nr: u32,
    payload: impl Into<SizeDescriptor<'a>>,
) -> Result<RequestNumber> {
    pack(IOC_READ | IOC_WRITE, ty, nr, payload.into().checked_size()?)
}

#[inline]
pub const fn direction(n: RequestNumber) -> u32 {
    (n >> IOC_DIRSHIFT) & IOC_DIRMASK
}

#[inline]
pub const fn ty(n: RequestNumber) -> u32 {
    (n >> IOC_TYPESHIFT) & IOC_TYPEMASK
}

#[inline]
pub const fn number(n: RequestNumber) -> u32 {
    (n >> IOC_NRSHIFT) & IOC_NRMASK
}

#[inline]
pub const fn size(n: RequestNumber) -> u32 {
    (n >> IOC_SIZESHIFT) & IOC_SIZEMASK
}

/*
 * Const builders, meant for `const` items:
 *
 *     const HIDIOCGRAWINFO: u32 = ior::<HidrawDevinfo>(b'H' as u32, 0x03);
 *
 * A field that does not fit fails const evaluation, or panics when called at
 * runtime.
 */

pub const fn ioc(dir: u32, ty: u32, nr: u32, size: u32) -> RequestNumber {
    assert!(dir <= IOC_DIRMASK, "ioctl direction out of range");
    assert!(ty <= IOC_TYPEMASK, "ioctl type out of range");
    assert!(nr <= IOC_NRMASK, "ioctl number out of range");
    assert!(size <= IOC_SIZEMASK, "ioctl size out of range");

    (dir << IOC_DIRSHIFT) | (ty << IOC_TYPESHIFT) | (nr << IOC_NRSHIFT) | (size << IOC_SIZESHIFT)
}

#[inline]
pub const fn io(ty: u32, nr: u32) -> RequestNumber {
    ioc(IOC_NONE, ty, nr, 0)
}

#[inline]
pub const fn ior<T>(ty: u32, nr: u32) -> RequestNumber {
    ioc(IOC_READ, ty, nr, typecheck::<T>())
}

#[inline]
pub const fn iow<T>(ty: u32, nr: u32) -> RequestNumber {
    ioc(IOC_WRITE, ty, nr, typecheck::<T>())
}

#[inline]
pub const fn iowr<T>(ty: u32, nr: u32) -> RequestNumber {
    ioc(IOC_READ | IOC_WRITE, ty, nr, typecheck::<T>())
}

const fn typecheck<T>() -> u32 {
    let size = std::mem::size_of::<T>();
    assert!(size <= IOC_SIZEMASK as usize, "ioctl argument type too large");
    size as u32
}

#[cfg(test)]
mod tests {
    use std::os::raw::c_int;

    use super::*;
    use crate::Error;

    #[test]
    fn header_constants() {
        assert_eq!(IOC_NRSHIFT, 0);
        assert_eq!(IOC_TYPESHIFT, 8);
        assert_eq!(IOC_SIZESHIFT, 16);
        assert_eq!(IOC_DIRSHIFT, 30);

        assert_eq!(IOC_IN, 0x4000_0000);
        assert_eq!(IOC_OUT, 0x8000_0000);
        assert_eq!(IOC_INOUT, 0xC000_0000);
        assert_eq!(IOCSIZE_MASK, 0x3FFF_0000);
        assert_eq!(IOCSIZE_SHIFT, 16);
    }

    #[test]
    fn known_values() {
        assert_eq!(pack(0, 0, 0, 0).unwrap(), 0);
        assert_eq!(pack(3, 0xFF, 0xFF, 0x3FFF).unwrap(), 0xFFFF_FFFF);
        assert_eq!(read(b'H' as u32, 0x01, 4usize).unwrap(), 0x8004_4801);
        assert_eq!(
            read(b'H' as u32, 0x01, SizeDescriptor::of::<c_int>()).unwrap(),
            0x8004_4801
        );
    }

    #[test]
    fn derived_encoders() {
        assert_eq!(none(0x12, 0x34).unwrap(), pack(0, 0x12, 0x34, 0).unwrap());
        assert_eq!(read(7, 9, 4usize).unwrap(), pack(2, 7, 9, 4).unwrap());
        assert_eq!(write(7, 9, 4usize).unwrap(), pack(1, 7, 9, 4).unwrap());
        assert_eq!(read_write(7, 9, 4usize).unwrap(), pack(3, 7, 9, 4).unwrap());
    }

    #[test]
    fn out_of_range_names_the_field() {
        let cases = [
            ((4, 0, 0, 0), Field::Direction, 4),
            ((0, 256, 0, 0), Field::Type, 256),
            ((0, 0, 256, 0), Field::Number, 256),
            ((0, 0, 0, 0x4000), Field::Size, 0x4000),
        ];

        for ((d, t, n, s), want_field, want_value) in cases {
            match pack(d, t, n, s) {
                Err(Error::OutOfRange { field, value }) => {
                    assert_eq!(field, want_field);
                    assert_eq!(value, want_value);
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        // first offending field wins
        match pack(9, 9999, 0, 0) {
            Err(Error::OutOfRange { field, .. }) => assert_eq!(field, Field::Direction),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn derived_size_too_large() {
        assert!(matches!(
            read(1, 1, 0x4000usize),
            Err(Error::SizeTooLarge { size: 0x4000 })
        ));
        assert!(read(1, 1, 0x3FFFusize).is_ok());
        assert!(matches!(
            write(256, 1, 4usize),
            Err(Error::OutOfRange {
                field: Field::Type,
                value: 256
            })
        ));
    }

    #[test]
    fn round_trip() {
        for d in 0..=IOC_DIRMASK {
            for t in [0, 1, 0x48, 0x7F, 0x80, 0xFF] {
                for n in [0, 1, 0x55, 0xAA, 0xFF] {
                    for s in [0, 1, 4, 0x100, 0x2AAA, 0x3FFF] {
                        let req = pack(d, t, n, s).unwrap();
                        assert_eq!(direction(req), d);
                        assert_eq!(ty(req), t);
                        assert_eq!(number(req), n);
                        assert_eq!(size(req), s);
                        assert_eq!(
                            pack(direction(req), ty(req), number(req), size(req)).unwrap(),
                            req
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn decode_is_permissive() {
        for req in [0u32, 1, 0xDEAD_BEEF, u32::MAX, 0x1234_5678] {
            let repacked = pack(direction(req), ty(req), number(req), size(req)).unwrap();
            assert_eq!(repacked, req);
        }

        assert_eq!(direction(0xDEAD_BEEF), 3);
        assert_eq!(size(0xDEAD_BEEF), 0x1EAD);
        assert_eq!(ty(0xDEAD_BEEF), 0xBE);
        assert_eq!(number(0xDEAD_BEEF), 0xEF);
    }

    #[repr(C)]
    #[allow(dead_code)]
    struct Winsize {
        ws_row: u16,
        ws_col: u16,
        ws_xpixel: u16,
        ws_ypixel: u16,
    }

    const RTC_RD_TIME: u32 = ior::<[c_int; 9]>(b'p' as u32, 0x09);
    const RTC_SET_TIME: u32 = iow::<[c_int; 9]>(b'p' as u32, 0x0A);
    const RTC_AIE_ON: u32 = io(b'p' as u32, 0x01);

    #[test]
    fn const_builders() {
        assert_eq!(RTC_RD_TIME, 0x8024_7009);
        assert_eq!(RTC_SET_TIME, 0x4024_700A);
        assert_eq!(RTC_AIE_ON, 0x7001);

        assert_eq!(
            iowr::<Winsize>(b'T' as u32, 0x99),
            read_write(b'T' as u32, 0x99, SizeDescriptor::of::<Winsize>()).unwrap()
        );
        assert_eq!(ioc(3, 0xFF, 0xFF, 0x3FFF), 0xFFFF_FFFF);
    }

    #[test]
    #[should_panic(expected = "ioctl size out of range")]
    fn const_builder_panics_at_runtime() {
        let size = std::hint::black_box(0x4000);
        ioc(IOC_READ, 0, 0, size);
    }

    #[test]
    fn direction_enum() {
        assert_eq!(Direction::of(IOC_OUT), Direction::Read);
        assert_eq!(Direction::of(IOC_IN), Direction::Write);
        assert_eq!(Direction::of(IOC_INOUT), Direction::ReadWrite);
        assert_eq!(Direction::of(0x1234), Direction::None);

        assert!(Direction::ReadWrite.is_read() && Direction::ReadWrite.is_write());
        assert!(!Direction::None.is_read() && !Direction::None.is_write());

        assert_eq!(Direction::try_from(2u32).unwrap(), Direction::Read);
        assert!(matches!(
            Direction::try_from(4u32),
            Err(Error::InvalidData(_))
        ));
        assert_eq!(u32::from(Direction::Write), IOC_WRITE);
    }
}
