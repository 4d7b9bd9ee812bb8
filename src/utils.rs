use core::convert::Infallible;

use heapless::String;

/// Helper trait to resolve Infallible Results
pub trait InfallibleResult<T> {
    fn infallible(self) -> T;
}

impl<T> InfallibleResult<T> for Result<T, Infallible> {
    fn infallible(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => match e {},
        }
    }
}

/// Enough for any `u32` in decimal
pub const NUMBER_LEN: usize = 10;

/// Decimal representation of a number
pub type NumberString = String<NUMBER_LEN>;

/// Format number as decimal ASCII without leading zeros
///
/// Digits are produced least significant first and then flipped in place.
pub fn format_number(mut number: u32) -> NumberString {
    let mut buf = [0u8; NUMBER_LEN];
    let mut len = 0;

    if number == 0 {
        buf[0] = b'0';
        len = 1;
    }
    while number != 0 {
        buf[len] = b'0' + (number % 10) as u8;
        number /= 10;
        len += 1;
    }
    reverse(&mut buf[..len]);

    let mut s = String::new();
    for &c in &buf[..len] {
        // Capacity covers u32::MAX
        s.push(c as char).ok();
    }
    s
}

/// Reverse bytes in place by swapping from both ends
fn reverse(buf: &mut [u8]) {
    if buf.is_empty() {
        return;
    }
    let (mut start, mut end) = (0, buf.len() - 1);
    while start < end {
        buf.swap(start, end);
        start += 1;
        end -= 1;
    }
}
