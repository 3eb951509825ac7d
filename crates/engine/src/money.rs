use std::{fmt, ops::SubAssign, str::FromStr};

use crate::EngineError;

/// An amount of dollars held as whole cents.
///
/// Balances may go negative after a permissive transfer, so the value is
/// signed. Amounts typed at the teller parse through [`FromStr`]:
///
/// ```rust
/// use engine::Money;
///
/// let typed: Money = "$120,50".parse().unwrap();
/// assert_eq!(typed, Money::new(12_050));
/// assert_eq!(typed.to_string(), "$120.50");
/// assert!("120.505".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// `units` whole dollars.
    #[must_use]
    pub const fn from_major(units: i64) -> Self {
        Self(units * 100)
    }

    /// Whole dollars, `None` if the amount carries cents.
    #[must_use]
    pub const fn whole_units(self) -> Option<i64> {
        if self.0 % 100 == 0 {
            Some(self.0 / 100)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Reads an amount as a customer types it: `120`, `120.5`, `120,50` or
    /// `$120`, optionally signed. At most two decimals.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let reject =
            |reason: &str| EngineError::InvalidAmount(format!("{reason}: \"{}\"", input.trim()));

        let text = input.trim();
        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let text = text.trim_start();
        let text = text.strip_prefix('$').unwrap_or(text);

        let (whole, fraction) = text.split_once(['.', ',']).unwrap_or((text, ""));
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return Err(reject("not an amount"));
        }
        if fraction.len() > 2 {
            return Err(reject("more than two decimals"));
        }

        let cents = fraction
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(2)
            .fold(0, |acc, digit| acc * 10 + i64::from(digit - b'0'));
        let total = whole
            .parse::<i64>()
            .ok()
            .and_then(|dollars| dollars.checked_mul(100))
            .and_then(|dollars| dollars.checked_add(cents))
            .ok_or_else(|| reject("amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_dollars() {
        assert_eq!(Money::ZERO.to_string(), "$0.00");
        assert_eq!(Money::new(10).to_string(), "$0.10");
        assert_eq!(Money::new(540_005).to_string(), "$5400.05");
        assert_eq!(Money::new(-1200).to_string(), "-$12.00");
    }

    #[test]
    fn parse_accepts_dot_comma_and_dollar_sign() {
        assert_eq!("20".parse::<Money>().unwrap(), Money::from_major(20));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::new(1050));
        assert_eq!("10,50".parse::<Money>().unwrap(), Money::new(1050));
        assert_eq!("$70".parse::<Money>().unwrap(), Money::new(7000));
        assert_eq!("-0.01".parse::<Money>().unwrap(), Money::new(-1));
        assert_eq!("  2.30 ".parse::<Money>().unwrap(), Money::new(230));
        assert_eq!("15.".parse::<Money>().unwrap(), Money::from_major(15));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("$".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert_eq!(
            "12.345".parse::<Money>(),
            Err(EngineError::InvalidAmount(
                "more than two decimals: \"12.345\"".to_string()
            ))
        );
        assert_eq!(
            "99999999999999999999".parse::<Money>(),
            Err(EngineError::InvalidAmount(
                "amount too large: \"99999999999999999999\"".to_string()
            ))
        );
    }

    #[test]
    fn whole_units_only_for_round_amounts() {
        assert_eq!(Money::from_major(70).whole_units(), Some(70));
        assert_eq!(Money::new(7001).whole_units(), None);
        assert_eq!(Money::from_major(-20).whole_units(), Some(-20));
    }
}
