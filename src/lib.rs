//! ioctl request numbers, bit for bit as `include/uapi/asm-generic/ioctl.h`
//! builds them.

pub mod codec;
pub mod payload;
pub mod request;
mod res;
pub mod util;

pub use codec::{
    direction, io, ioc, ior, iow, iowr, none, number, pack, read, read_write, size, ty, write,
    Direction, RequestNumber, IOCSIZE_MASK, IOCSIZE_SHIFT, IOC_DIRBITS, IOC_DIRMASK,
    IOC_DIRSHIFT, IOC_IN, IOC_INOUT, IOC_NONE, IOC_NRBITS, IOC_NRMASK, IOC_NRSHIFT, IOC_OUT,
    IOC_READ, IOC_SIZEBITS, IOC_SIZEMASK, IOC_SIZESHIFT, IOC_TYPEBITS, IOC_TYPEMASK,
    IOC_TYPESHIFT, IOC_WRITE,
};
pub use ioctl_layout::{CType, Layout, StructLayout};
pub use payload::{size_of, SizeDescriptor};
pub use request::{read_request, write_request, Request};
pub use res::*;
