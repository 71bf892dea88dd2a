//! Hand-written encoders used by the unrolled renderer.
//!
//! These write straight into a byte buffer and never go through the general
//! purpose number or time formatting machinery.

use chrono::{DateTime, Datelike, Timelike, Utc};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Two least significant decimal digits of `value`, zero padded.
pub fn write_2digits(buf: &mut Vec<u8>, value: u32) {
    buf.push(b'0' + ((value / 10) % 10) as u8);
    buf.push(b'0' + (value % 10) as u8);
}

/// Four least significant decimal digits of `value`, zero padded.
pub fn write_4digits(buf: &mut Vec<u8>, value: u32) {
    buf.push(b'0' + ((value / 1000) % 10) as u8);
    buf.push(b'0' + ((value / 100) % 10) as u8);
    buf.push(b'0' + ((value / 10) % 10) as u8);
    buf.push(b'0' + (value % 10) as u8);
}

/// Fractional seconds followed by `Z`.
///
/// Nine digits with trailing zeros trimmed; at least one digit is kept, so
/// zero nanoseconds is written as `0Z`.
pub fn write_nanos(buf: &mut Vec<u8>, nanos: u32) {
    let mut digits = [b'0'; 9];
    let mut n = nanos;
    for digit in digits.iter_mut().rev() {
        *digit = b'0' + (n % 10) as u8;
        n /= 10;
    }

    let last = digits.iter().rposition(|&d| d != b'0').unwrap_or(0);
    buf.extend_from_slice(&digits[..=last]);
    buf.push(b'Z');
}

/// `YYYY-MM-DDTHH:MM:SS.fffffffffZ`, see [`write_nanos`] for the fraction.
///
/// Years outside `0..=9999` carry a sign and as many digits as they need
/// (`+12345`, `-0001`), the same as chrono's RFC 3339 output.
pub fn write_timestamp(buf: &mut Vec<u8>, value: &DateTime<Utc>) {
    // chrono reports a leap second as second 59 with nanoseconds >= 1e9.
    let mut second = value.second();
    let mut nanos = value.nanosecond();
    if nanos >= 1_000_000_000 {
        second += 1;
        nanos -= 1_000_000_000;
    }

    write_year(buf, value.year());
    buf.push(b'-');
    write_2digits(buf, value.month());
    buf.push(b'-');
    write_2digits(buf, value.day());
    buf.push(b'T');
    write_2digits(buf, value.hour());
    buf.push(b':');
    write_2digits(buf, value.minute());
    buf.push(b':');
    write_2digits(buf, second);
    buf.push(b'.');
    write_nanos(buf, nanos);
}

fn write_year(buf: &mut Vec<u8>, year: i32) {
    if !(0..=9999).contains(&year) {
        buf.push(if year < 0 { b'-' } else { b'+' });
    }
    let abs = year.unsigned_abs();
    if abs > 9999 {
        write_u64(buf, u64::from(abs));
    } else {
        write_4digits(buf, abs);
    }
}

pub fn write_u64(buf: &mut Vec<u8>, mut n: u64) {
    let mut out = [0u8; 20];
    let mut pos = out.len();
    loop {
        pos -= 1;
        out[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    buf.extend_from_slice(&out[pos..]);
}

pub fn write_i64(buf: &mut Vec<u8>, n: i64) {
    if n < 0 {
        buf.push(b'-');
    }
    write_u64(buf, n.unsigned_abs());
}

/// A JSON string literal, escaped the same way `serde_json` escapes it.
pub fn write_str(buf: &mut Vec<u8>, value: &str) {
    buf.push(b'"');

    let bytes = value.as_bytes();
    let mut start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let escape: &[u8] = match byte {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0C => b"\\f",
            0x00..=0x1F => b"",
            _ => continue,
        };

        buf.extend_from_slice(&bytes[start..i]);
        if escape.is_empty() {
            buf.extend_from_slice(b"\\u00");
            buf.push(HEX_DIGITS[(byte >> 4) as usize]);
            buf.push(HEX_DIGITS[(byte & 0xF) as usize]);
        } else {
            buf.extend_from_slice(escape);
        }
        start = i + 1;
    }
    buf.extend_from_slice(&bytes[start..]);

    buf.push(b'"');
}

/// Writes the members of one JSON object, adding separators only between
/// members that were actually written.
pub struct ObjectWriter<'a> {
    buf: &'a mut Vec<u8>,
    written: bool,
}

impl<'a> ObjectWriter<'a> {
    pub fn begin(buf: &'a mut Vec<u8>) -> Self {
        buf.push(b'{');
        ObjectWriter { buf, written: false }
    }

    /// Write the separator and `"key":`, returning the buffer for the value.
    pub fn key(&mut self, key: &str) -> &mut Vec<u8> {
        if self.written {
            self.buf.push(b',');
        }
        self.written = true;
        write_str(self.buf, key);
        self.buf.push(b':');
        &mut *self.buf
    }

    pub fn str(&mut self, key: &str, value: &str) {
        let buf = self.key(key);
        write_str(buf, value);
    }

    pub fn i64(&mut self, key: &str, value: i64) {
        let buf = self.key(key);
        write_i64(buf, value);
    }

    pub fn u64(&mut self, key: &str, value: u64) {
        let buf = self.key(key);
        write_u64(buf, value);
    }

    pub fn timestamp(&mut self, key: &str, value: &DateTime<Utc>) {
        let buf = self.key(key);
        buf.push(b'"');
        write_timestamp(buf, value);
        buf.push(b'"');
    }

    pub fn end(self) {
        self.buf.push(b'}');
    }
}
