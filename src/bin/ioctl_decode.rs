use std::{env, io, process};

use byteorder::NativeEndian;
use ioctl_opt::{read_request, util::parse_number, Error, Request, Result};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let res = if args.is_empty() {
        decode_stdin()
    } else {
        decode_args(&args)
    };

    if let Err(e) = res {
        error!("{}", e);
        process::exit(1);
    }
}

fn decode_args(args: &[String]) -> Result<()> {
    for arg in args {
        let n = parse_number(arg)?;
        println!("{:#010x} {}", n, Request::decode(n));
    }

    Ok(())
}

fn decode_stdin() -> Result<()> {
    let stdin = io::stdin();
    let mut r = stdin.lock();
    let mut count = 0usize;
    loop {
        let req = match read_request::<NativeEndian>(&mut r) {
            Ok(req) => req,
            // a trailing partial word is dropped
            Err(Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e),
        };

        count += 1;
        println!("{:#010x} {}", req.encode()?, req);
    }

    debug!(count, "stdin drained");
    Ok(())
}
