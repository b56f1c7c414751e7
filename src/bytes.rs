//! Byte-level helpers for reading delimited token tables

use atoi::FromRadix10Checked;
use bstr::ByteSlice;
use memchr::memchr;

/// Iterator over the fields of one delimited line
pub struct Fields<'a> {
    rest: Option<&'a [u8]>,
    delim: u8,
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a [u8];

    #[inline]
    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = self.rest?;
        match memchr(self.delim, rest) {
            Some(pos) => {
                self.rest = Some(&rest[pos + 1..]);
                Some(&rest[..pos])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

/// Split a line into fields at every `delim`
#[inline]
pub fn bs_fields(line: &[u8], delim: u8) -> Fields<'_> {
    Fields {
        rest: Some(line),
        delim,
    }
}

// Divide a bytestring into two at delim
#[inline]
pub fn bs_split_once(bytes: &[u8], delim: u8) -> Option<(&[u8], &[u8])> {
    let pos = memchr(delim, bytes)?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

/// Parse a non-negative integer cell
///
/// Surrounding whitespace is ignored and a zero fraction (`3.0`, as written by
/// spreadsheet exports) is accepted. `Ok(None)` for a blank cell, `Err(())` for
/// anything that is not a whole number.
#[inline]
pub fn bs_number(bytes: &[u8]) -> Result<Option<usize>, ()> {
    let bytes = bytes.trim();
    if bytes.is_empty() {
        return Ok(None);
    }

    let digits = match bs_split_once(bytes, b'.') {
        Some((whole, frac)) if !whole.is_empty() && frac.iter().all(|&b| b == b'0') => whole,
        Some(_) => return Err(()),
        None => bytes,
    };

    match usize::from_radix_10_checked(digits) {
        (Some(n), used) if used == digits.len() => Ok(Some(n)),
        _ => Err(()),
    }
}

/// Cell text with surrounding whitespace removed, invalid UTF-8 replaced
#[inline]
pub fn bs_text(bytes: &[u8]) -> String {
    bytes.trim().to_str_lossy().into_owned()
}
