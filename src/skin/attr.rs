// Attribute value coercion
//
//  This file is part of Wasabi.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Coercion of attribute values.
//!
//! Attribute values never fail to parse.
//! A value that cannot be interpreted is coerced to a default instead,
//!   since skins in the wild are full of values that the original host
//!   tolerated and a single sloppy attribute must not render a skin
//!   unusable.

/// Interpret a boolean attribute value.
///
/// The values `1`, `true` and `yes` are true,
///   compared case-insensitively after trimming surrounding whitespace;
///   everything else is false.
///
/// ```
/// use wasabi::skin::attr::parse_bool;
///
/// assert!(parse_bool("1"));
/// assert!(parse_bool(" TRUE "));
/// assert!(parse_bool("Yes"));
/// assert!(!parse_bool("0"));
/// assert!(!parse_bool("on"));
/// assert!(!parse_bool(""));
/// ```
pub fn parse_bool(value: &str) -> bool {
    let value = value.trim();

    ["1", "true", "yes"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

/// Interpret a numeric attribute value.
///
/// The longest leading prefix that forms a decimal number
///   (optional sign, digits, optional fraction, optional exponent)
///   is parsed after skipping leading whitespace,
///     and anything following it is ignored.
/// If there is no such prefix,
///   the result is [`f64::NAN`].
///
/// ```
/// use wasabi::skin::attr::parse_number;
///
/// assert_eq!(42.0, parse_number("42"));
/// assert_eq!(-3.5, parse_number(" -3.5px"));
/// assert_eq!(1200.0, parse_number("1.2e3"));
/// assert_eq!(7.0, parse_number("7e"));
/// assert!(parse_number("wide").is_nan());
/// ```
pub fn parse_number(value: &str) -> f64 {
    let value = value.trim_start();
    let bytes = value.as_bytes();

    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };

    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);

        // A lone `.` is not part of the number unless digits surround it.
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if let Some(b'e' | b'E') = bytes.get(end) {
        let sign = match bytes.get(end + 1) {
            Some(b'+' | b'-') => 1,
            _ => 0,
        };

        let exp_digits = digits_from(end + 1 + sign);

        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    value[..end].parse().unwrap_or(f64::NAN)
}
