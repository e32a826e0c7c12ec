mod macros;

pub(crate) use macros::impl_num_enums;

use crate::{Error, Result};

/// Parses a request number written as `0x`-prefixed hex, `0o` octal, `0b`
/// binary or plain decimal.
pub fn parse_number(s: &str) -> Result<u32> {
    let s = s.trim();
    let (digits, radix) = match s.get(..2) {
        Some("0x") | Some("0X") => (&s[2..], 16),
        Some("0o") | Some("0O") => (&s[2..], 8),
        Some("0b") | Some("0B") => (&s[2..], 2),
        _ => (s, 10),
    };

    let invalid =
        |why: &dyn std::fmt::Display| Error::InvalidData(format!("{:?}: {}", s, why).into());

    // `_` only separates digits, signs are never accepted
    if digits.starts_with(['+', '-']) {
        return Err(invalid(&"unexpected sign"));
    }

    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return Err(invalid(&"misplaced digit separator"));
    }

    u32::from_str_radix(&digits.replace('_', ""), radix).map_err(|e| invalid(&e))
}
