//! Equity/debt percentage pairs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::error::InvestmentError;

/// Allowed deviation of `debt + equity` from 100.
pub const SPLIT_TOLERANCE: Decimal = dec!(0.01);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A validated equity/debt split.
///
/// Both sides lie in `[0, 100]` and sum to 100 within [`SPLIT_TOLERANCE`].
/// The only ways to build one are the checked constructors below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Split {
    percentage_debt: Decimal,
    percentage_equity: Decimal,
}

impl Split {
    /// Checks both sides and their sum.
    ///
    /// # Errors
    ///
    /// Returns `DebtOutOfRange`, `EquityOutOfRange` or `SumMismatch`.
    pub fn validated(debt: Decimal, equity: Decimal) -> Result<Self, InvestmentError> {
        check_debt(debt)?;
        check_equity(equity)?;
        if (debt + equity - HUNDRED).abs() > SPLIT_TOLERANCE {
            return Err(InvestmentError::SumMismatch);
        }
        Ok(Self {
            percentage_debt: debt,
            percentage_equity: equity,
        })
    }

    /// Builds a split from the debt side, giving equity the remainder.
    ///
    /// # Errors
    ///
    /// Returns `DebtOutOfRange` if `debt` is outside `[0, 100]`.
    pub fn from_debt(debt: Decimal) -> Result<Self, InvestmentError> {
        check_debt(debt)?;
        Ok(Self {
            percentage_debt: debt,
            percentage_equity: HUNDRED - debt,
        })
    }

    /// Builds a split from the equity side, giving debt the remainder.
    ///
    /// # Errors
    ///
    /// Returns `EquityOutOfRange` if `equity` is outside `[0, 100]`.
    pub fn from_equity(equity: Decimal) -> Result<Self, InvestmentError> {
        check_equity(equity)?;
        Ok(Self {
            percentage_debt: HUNDRED - equity,
            percentage_equity: equity,
        })
    }

    /// The 60 % equity / 40 % debt split used whenever no better advice exists.
    #[must_use]
    pub const fn fallback() -> Self {
        Self {
            percentage_debt: dec!(40),
            percentage_equity: dec!(60),
        }
    }

    /// Debt percentage.
    #[must_use]
    pub const fn percentage_debt(&self) -> Decimal {
        self.percentage_debt
    }

    /// Equity percentage.
    #[must_use]
    pub const fn percentage_equity(&self) -> Decimal {
        self.percentage_equity
    }

    /// Equity share as a fraction in `[0, 1]`.
    #[must_use]
    pub fn equity_fraction(&self) -> Decimal {
        self.percentage_equity / HUNDRED
    }

    /// Debt share as a fraction in `[0, 1]`.
    #[must_use]
    pub fn debt_fraction(&self) -> Decimal {
        self.percentage_debt / HUNDRED
    }
}

fn in_range(value: Decimal) -> bool {
    (Decimal::ZERO..=HUNDRED).contains(&value)
}

fn check_debt(debt: Decimal) -> Result<(), InvestmentError> {
    if in_range(debt) {
        Ok(())
    } else {
        Err(InvestmentError::DebtOutOfRange)
    }
}

fn check_equity(equity: Decimal) -> Result<(), InvestmentError> {
    if in_range(equity) {
        Ok(())
    } else {
        Err(InvestmentError::EquityOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(dec!(40), dec!(60))]
    #[case(dec!(0), dec!(100))]
    #[case(dec!(100), dec!(0))]
    #[case(dec!(33.33), dec!(66.67))]
    #[case(dec!(33.33), dec!(66.66))]
    fn test_validated_accepts(#[case] debt: Decimal, #[case] equity: Decimal) {
        let split = Split::validated(debt, equity).unwrap();
        assert_eq!(split.percentage_debt(), debt);
        assert_eq!(split.percentage_equity(), equity);
    }

    #[test]
    fn test_validated_rejects() {
        assert!(matches!(
            Split::validated(dec!(-1), dec!(101)),
            Err(InvestmentError::DebtOutOfRange)
        ));
        assert!(matches!(
            Split::validated(dec!(1), dec!(100.5)),
            Err(InvestmentError::EquityOutOfRange)
        ));
        assert!(matches!(
            Split::validated(dec!(30), dec!(60)),
            Err(InvestmentError::SumMismatch)
        ));
        assert!(matches!(
            Split::validated(dec!(40), dec!(60.02)),
            Err(InvestmentError::SumMismatch)
        ));
    }

    #[test]
    fn test_one_sided_constructors() {
        let split = Split::from_debt(dec!(30)).unwrap();
        assert_eq!(split.percentage_equity(), dec!(70));

        let split = Split::from_equity(dec!(12.5)).unwrap();
        assert_eq!(split.percentage_debt(), dec!(87.5));

        assert!(Split::from_debt(dec!(100.01)).is_err());
        assert!(Split::from_equity(dec!(-0.5)).is_err());
    }

    #[test]
    fn test_fallback_is_sixty_forty() {
        let split = Split::fallback();
        assert_eq!(split.percentage_equity(), dec!(60));
        assert_eq!(split.percentage_debt(), dec!(40));
        assert_eq!(split.equity_fraction() + split.debt_fraction(), Decimal::ONE);
    }

    proptest! {
        #[test]
        fn prop_one_sided_split_sums_to_hundred(hundredths in 0i64..=10_000i64) {
            let given = Decimal::new(hundredths, 2);
            for split in [Split::from_debt(given).unwrap(), Split::from_equity(given).unwrap()] {
                prop_assert_eq!(split.percentage_debt() + split.percentage_equity(), HUNDRED);
            }
        }
    }
}
