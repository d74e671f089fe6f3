//! Exact decimal money representation and arithmetic.
//!
//! An amount is a currency code plus whole `units` and a `nanos` fraction
//! in billionths of a unit, so `-1.75 USD` is `units: -1, nanos:
//! -750_000_000`. Both fields carry the sign and must agree on it. All
//! operations are pure and return new values; the fallible ones report
//! [`MoneyError`] instead of panicking.

pub mod error;

pub use error::MoneyError;

use serde::{Deserialize, Serialize};

/// Smallest valid `nanos` value.
pub const NANOS_MIN: i32 = -999_999_999;

/// Largest valid `nanos` value.
pub const NANOS_MAX: i32 = 999_999_999;

/// Number of nano units in one whole unit.
const NANOS_PER_UNIT: i64 = 1_000_000_000;

/// An exact decimal amount of a single currency.
///
/// Field names match the wire format used by the collaborator services,
/// so the type serializes directly as
/// `{"currency_code": "USD", "units": 8, "nanos": 990000000}`. Fields
/// absent from a payload deserialize as zero, since some emitters omit
/// empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Three-letter currency code as defined in ISO 4217.
    #[serde(default)]
    pub currency_code: String,

    /// Whole units of the amount.
    #[serde(default)]
    pub units: i64,

    /// Fractional amount in nano units, in `NANOS_MIN..=NANOS_MAX`.
    /// Must share the sign of `units` unless either is zero.
    #[serde(default)]
    pub nanos: i32,
}

impl Money {
    /// Creates a new money value. The fields are not validated; call
    /// [`Money::is_valid`] to check them.
    pub fn new(currency_code: impl Into<String>, units: i64, nanos: i32) -> Self {
        Self {
            currency_code: currency_code.into(),
            units,
            nanos,
        }
    }

    /// Returns zero in the given currency.
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(currency_code, 0, 0)
    }

    /// Returns true if `nanos` is within range and its sign matches the
    /// sign of `units` (or either is zero).
    pub fn is_valid(&self) -> bool {
        self.sign_matches() && (NANOS_MIN..=NANOS_MAX).contains(&self.nanos)
    }

    fn sign_matches(&self) -> bool {
        self.nanos == 0 || self.units == 0 || (self.nanos < 0) == (self.units < 0)
    }

    /// Returns true if the amount is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.units == 0 && self.nanos == 0
    }

    /// Returns true if the amount is valid and greater than zero. An
    /// invalid value is never positive.
    pub fn is_positive(&self) -> bool {
        self.is_valid() && (self.units > 0 || (self.units == 0 && self.nanos > 0))
    }

    /// Returns true if the amount is valid and less than zero. An
    /// invalid value is never negative.
    pub fn is_negative(&self) -> bool {
        self.is_valid() && (self.units < 0 || (self.units == 0 && self.nanos < 0))
    }

    /// Returns true if both values carry the same, non-empty currency code.
    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency_code == other.currency_code && !self.currency_code.is_empty()
    }

    /// Returns the same amount with the sign flipped on both fields.
    pub fn negate(&self) -> Money {
        Money {
            currency_code: self.currency_code.clone(),
            units: -self.units,
            nanos: -self.nanos,
        }
    }

    /// Adds two amounts of the same currency.
    ///
    /// Fails with [`MoneyError::InvalidValue`] if either input is invalid
    /// and with [`MoneyError::CurrencyMismatch`] if the codes differ. Two
    /// empty codes compare equal and are accepted.
    pub fn sum(&self, other: &Money) -> Result<Money, MoneyError> {
        if !self.is_valid() || !other.is_valid() {
            return Err(MoneyError::InvalidValue);
        }
        if self.currency_code != other.currency_code {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency_code.clone(),
                right: other.currency_code.clone(),
            });
        }

        let mut units = self.units + other.units;
        let mut nanos = i64::from(self.nanos) + i64::from(other.nanos);

        if (units >= 0 && nanos >= 0) || (units <= 0 && nanos <= 0) {
            // Signs agree: fold whole units out of the nanos overflow.
            units += nanos / NANOS_PER_UNIT;
            nanos %= NANOS_PER_UNIT;
        } else if units > 0 {
            // Signs disagree: borrow one whole unit into the fraction.
            // Valid inputs keep the raw fraction within one unit here,
            // so a single borrow settles it.
            units -= 1;
            nanos += NANOS_PER_UNIT;
        } else {
            units += 1;
            nanos -= NANOS_PER_UNIT;
        }

        Ok(Money {
            currency_code: self.currency_code.clone(),
            units,
            nanos: nanos as i32,
        })
    }

    /// Multiplies the amount by a non-negative quantity, as `quantity - 1`
    /// additions of the amount to itself.
    ///
    /// A quantity of zero yields zero in the same currency; a quantity of
    /// one returns the amount unchanged. Fails with
    /// [`MoneyError::InvalidValue`] if the input is invalid, whatever the
    /// quantity.
    pub fn multiply(&self, quantity: u32) -> Result<Money, MoneyError> {
        if !self.is_valid() {
            return Err(MoneyError::InvalidValue);
        }
        if quantity == 0 {
            return Ok(Money::zero(self.currency_code.clone()));
        }

        let mut out = self.clone();
        for _ in 1..quantity {
            out = out.sum(self)?;
        }
        Ok(out)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.units < 0 || self.nanos < 0 {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{}{}.{:09} {}",
            sign,
            self.units.abs(),
            self.nanos.abs(),
            self.currency_code
        )
    }
}
