use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// Discount applied to every listing, in percent
pub const DISCOUNT_PERCENT: u64 = 10;

lazy_static! {
    // First number in the text, allowing thousands separators: "$1,234.56", "Market: 3.10"
    static ref AMOUNT_RE: Regex = Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").unwrap();
}

/// A non-negative money amount in whole cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    cents: u64,
}

impl Price {
    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Parse a displayed currency string such as `$1,234.56`.
    ///
    /// More than two fractional digits are rounded half-up to the cent.
    pub fn parse_currency(text: &str) -> Result<Self> {
        let amount = AMOUNT_RE
            .find(text)
            .ok_or_else(|| Error::Apply(format!("no amount in price text '{}'", text.trim())))?
            .as_str()
            .replace(',', "");

        let (whole, fraction) = amount.split_once('.').unwrap_or((&amount, ""));
        let too_large = || Error::Apply(format!("price out of range '{}'", text.trim()));
        let whole: u64 = whole.parse().map_err(|_| too_large())?;

        let digits: Vec<u64> = fraction.bytes().map(|b| u64::from(b - b'0')).collect();
        let mut fraction_cents = digits.first().copied().unwrap_or(0) * 10
            + digits.get(1).copied().unwrap_or(0);
        if digits.get(2).copied().unwrap_or(0) >= 5 {
            fraction_cents += 1;
        }

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(too_large)?;

        Ok(Self { cents })
    }

    /// Price reduced by `percent`, rounded half-up to the cent
    pub fn percent_off(&self, percent: u64) -> Self {
        let percent = u128::from(percent.min(100));
        let scaled = u128::from(self.cents) * (100 - percent);
        // The result never exceeds the original amount
        Self {
            cents: ((scaled + 50) / 100) as u64,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}
