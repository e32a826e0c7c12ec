use std::{
    fmt,
    io::{Read, Write},
};

use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};

use crate::{
    codec::{self, Direction, RequestNumber},
    Result,
};

/// A request number split into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub dir: Direction,
    pub ty: u32,
    pub nr: u32,
    pub size: u32,
}

impl Request {
    /// Never fails: every bit pattern decodes to some field values.
    pub const fn decode(n: RequestNumber) -> Self {
        Request {
            dir: Direction::of(n),
            ty: codec::ty(n),
            nr: codec::number(n),
            size: codec::size(n),
        }
    }

    pub fn encode(&self) -> Result<RequestNumber> {
        codec::pack(self.dir as u32, self.ty, self.nr, self.size)
    }
}

impl From<RequestNumber> for Request {
    fn from(n: RequestNumber) -> Self {
        Request::decode(n)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dir={} type={:#04x}", self.dir.as_str(), self.ty)?;
        if let Some(c) = char::from_u32(self.ty).filter(|c| c.is_ascii_graphic()) {
            write!(f, " ('{}')", c)?;
        }

        write!(f, " nr={:#04x} size={}", self.nr, self.size)
    }
}

/// Reads one raw request word, e.g. from a captured syscall trace.
pub fn read_request<B: ByteOrder>(r: &mut impl Read) -> Result<Request> {
    let n = r.read_u32::<B>()?;
    Ok(Request::decode(n))
}

pub fn write_request<B: ByteOrder>(w: &mut impl Write, req: &Request) -> Result<()> {
    let n = req.encode()?;
    w.write_u32::<B>(n)?;
    Ok(())
}
