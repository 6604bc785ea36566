//! Arbitrary-precision decimal values
//!
//! Document leaves declared as decimal must survive the trip from source text
//! to serialized JSON without rounding through f64. The representation here
//! is exact: sign, significant digits, and a base-10 exponent.

use crate::error::{JoutError, Result};

/// Maximum number of significant digits accepted in a decimal literal.
pub const MAX_DECIMAL_DIGITS: usize = 65536;

/// Decimal number with exact representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    /// Sign: false = non-negative, true = negative
    sign: bool,
    /// ASCII digits '0'..'9', MSB-first, no leading zeros
    digits: Vec<u8>,
    /// Base-10 exponent
    exponent: i32,
}

impl Decimal {
    /// Parse from a JSON number literal
    ///
    /// Significant digits are kept exactly; trailing zeros fold into the
    /// exponent so that numerically equal inputs parse to the same value.
    pub fn from_str_exact(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(JoutError::InvalidDecimal(s.to_string()));
        }

        let (sign, rest) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        // Split off a scientific-notation exponent if present
        let (mantissa, exponent) = if let Some(e_pos) = rest.find(['e', 'E']) {
            let exp: i32 = rest[e_pos + 1..]
                .parse()
                .map_err(|_| JoutError::InvalidDecimal(s.to_string()))?;
            (&rest[..e_pos], exp)
        } else {
            (rest, 0)
        };

        let (digits, decimal_places) =
            parse_mantissa(mantissa).ok_or_else(|| JoutError::InvalidDecimal(s.to_string()))?;

        let digits = strip_leading_zeros(digits);
        if digits.len() > MAX_DECIMAL_DIGITS {
            return Err(JoutError::InvalidDecimal(format!(
                "too many digits in '{}'",
                s
            )));
        }

        // Canonical zero is non-negative with exponent 0
        if digits == [b'0'] {
            return Ok(Self {
                sign: false,
                digits,
                exponent: 0,
            });
        }

        // Fold trailing zeros into the exponent: "1.50" and "1.5" are the
        // same value and must have the same representation
        let mut digits = digits;
        let mut exponent = exponent - decimal_places as i32;
        while digits.len() > 1 && digits.last() == Some(&b'0') {
            digits.pop();
            exponent += 1;
        }

        Ok(Self {
            sign,
            digits,
            exponent,
        })
    }

    /// True when the value is negative
    pub fn is_negative(&self) -> bool {
        self.sign
    }

    /// True when the value is zero
    pub fn is_zero(&self) -> bool {
        self.digits == [b'0']
    }

    /// Render as a JSON number literal
    ///
    /// Plain decimal notation when the value needs little zero padding,
    /// scientific otherwise. The rendering is canonical: equal decimals
    /// render identically.
    pub fn to_json_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }

        let mut out = String::new();
        if self.sign {
            out.push('-');
        }

        // Position of the decimal point relative to the digit string; plain
        // notation only pads with zeros when this falls outside the digits
        let point = self.digits.len() as i64 + self.exponent as i64;
        if self.exponent > 6 || point < -6 {
            // Scientific: d.ddd e<adjusted exponent>
            out.push_str(&String::from_utf8_lossy(&self.digits));
            let mut exponent = self.exponent as i64;
            if self.digits.len() > 1 {
                let insert_pos = if self.sign { 2 } else { 1 };
                out.insert(insert_pos, '.');
                exponent += (self.digits.len() as i64) - 1;
            }
            out.push('e');
            out.push_str(&exponent.to_string());
        } else if self.exponent >= 0 {
            out.push_str(&String::from_utf8_lossy(&self.digits));
            for _ in 0..self.exponent {
                out.push('0');
            }
        } else {
            let frac_len = (-self.exponent) as usize;
            if frac_len < self.digits.len() {
                let (int_part, frac_part) = self.digits.split_at(self.digits.len() - frac_len);
                out.push_str(&String::from_utf8_lossy(int_part));
                out.push('.');
                out.push_str(&String::from_utf8_lossy(frac_part));
            } else {
                out.push_str("0.");
                for _ in 0..(frac_len - self.digits.len()) {
                    out.push('0');
                }
                out.push_str(&String::from_utf8_lossy(&self.digits));
            }
        }

        out
    }

    /// Convert to a `serde_json::Number` without losing digits
    ///
    /// Relies on serde_json's `arbitrary_precision` feature: the literal is
    /// stored verbatim instead of being squeezed through f64.
    pub fn to_json_number(&self) -> Result<serde_json::Number> {
        let literal = self.to_json_string();
        serde_json::from_str(&literal).map_err(JoutError::Json)
    }

    /// Compare two decimals numerically
    pub fn compare(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return if other.sign { Ordering::Greater } else { Ordering::Less },
            (false, true) => return if self.sign { Ordering::Less } else { Ordering::Greater },
            (false, false) => {}
        }

        match (self.sign, other.sign) {
            (false, true) => return Ordering::Greater,
            (true, false) => return Ordering::Less,
            _ => {}
        }

        let magnitude = self.compare_magnitude(other);
        if self.sign {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    fn compare_magnitude(&self, other: &Self) -> std::cmp::Ordering {
        // Position of the most significant digit: digits.len() + exponent
        let self_msd = self.digits.len() as i64 + self.exponent as i64;
        let other_msd = other.digits.len() as i64 + other.exponent as i64;
        if self_msd != other_msd {
            return self_msd.cmp(&other_msd);
        }

        // Same magnitude order: compare digit strings, shorter one padded
        // with implicit trailing zeros
        let max_len = self.digits.len().max(other.digits.len());
        for i in 0..max_len {
            let a = self.digits.get(i).copied().unwrap_or(b'0');
            let b = other.digits.get(i).copied().unwrap_or(b'0');
            if a != b {
                return a.cmp(&b);
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_json_string())
    }
}

impl std::str::FromStr for Decimal {
    type Err = JoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_exact(s)
    }
}

/// Parse mantissa digits, returning (digits, count of fractional places)
fn parse_mantissa(s: &str) -> Option<(Vec<u8>, usize)> {
    let mut digits = Vec::new();
    let mut decimal_places = 0;
    let mut found_dot = false;

    for ch in s.chars() {
        match ch {
            '0'..='9' => {
                digits.push(ch as u8);
                if found_dot {
                    decimal_places += 1;
                }
            }
            '.' => {
                if found_dot {
                    return None;
                }
                found_dot = true;
            }
            _ => return None,
        }
    }

    if digits.is_empty() {
        return None;
    }

    Some((digits, decimal_places))
}

fn strip_leading_zeros(mut digits: Vec<u8>) -> Vec<u8> {
    while digits.len() > 1 && digits[0] == b'0' {
        digits.remove(0);
    }
    digits
}
