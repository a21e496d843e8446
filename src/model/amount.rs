//! Amount type for whole-peso monetary values.
//!
//! Amounts are integers; there are no cents. They are written with a `$` prefix and `.` as the
//! thousands separator, e.g. `$4.000`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Represents a whole-peso amount.
///
/// Serializes as a bare integer so that stored and structured output carries raw numbers. Use
/// `Display` for the human format.
///
/// # Examples
///
/// ```
/// # use mototaxi_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$4.000").unwrap();
/// assert_eq!(amount.value(), 4000);
/// assert_eq!(amount.to_string(), "$4.000");
/// ```
///
/// ```
/// # use mototaxi_ledger::model::Amount;
/// assert_eq!(Amount::new(-2500).to_string(), "-$2.500");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds `rhs`, returning `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Subtracts `rhs`, returning `None` on overflow.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Sums `amounts`, returning `None` if the total overflows.
    ///
    /// ```
    /// # use mototaxi_ledger::model::Amount;
    /// let total = Amount::checked_sum([Amount::new(5000), Amount::new(3000)]);
    /// assert_eq!(total, Some(Amount::new(8000)));
    /// assert_eq!(Amount::checked_sum([Amount::new(i64::MAX), Amount::new(1)]), None);
    /// ```
    pub fn checked_sum<I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |total, amount| total.checked_add(amount))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AmountError(String);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a whole amount", self.0)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AmountError(s.to_string());
        let trimmed = s.trim();

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let digits_and_dots = unsigned.strip_prefix('$').unwrap_or(unsigned);

        // Thousands separators must sit between groups of exactly three digits
        let mut groups = digits_and_dots.split('.');
        let first = groups.next().ok_or_else(err)?;
        if first.is_empty() || (first.len() > 3 && digits_and_dots.contains('.')) {
            return Err(err());
        }
        let mut digits = first.to_string();
        for group in groups {
            if group.len() != 3 {
                return Err(err());
            }
            digits.push_str(group);
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        let value: i64 = digits.parse().map_err(|_| err())?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "{sign}${grouped}")
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
