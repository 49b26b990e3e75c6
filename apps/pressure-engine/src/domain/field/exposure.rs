//! Per-contract dollar exposures.
//!
//! Each exposure is signed by the dealer position: a dealer-short contract
//! contributes negative exposure.

use crate::config::ExposureConfig;
use crate::domain::chain::ChainRow;

/// Dollar exposures of one contract, `S` being the row's own underlying price.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DollarExposure {
    /// `gamma × S² × OI × multiplier × sign`.
    pub gamma: f64,
    /// `vanna × S × OI × multiplier × sign`.
    pub vanna: f64,
    /// `charm_per_minute × S × OI × multiplier × sign`.
    pub charm: f64,
}

/// Signed dollar exposures of `row`.
///
/// Rows without a dealer sign contribute nothing.
#[must_use]
pub fn dollar_exposure(row: &ChainRow, units: &ExposureConfig) -> DollarExposure {
    let sign = row.dealer_sign().map_or(0.0, |s| s.value());
    let notional = row.open_interest() * row.multiplier() * sign;
    let charm_per_minute = row.charm() / units.minutes_per_year();
    let underlying = row.underlying_price();

    DollarExposure {
        gamma: row.gamma() * underlying * underlying * notional,
        vanna: row.vanna() * underlying * notional,
        charm: charm_per_minute * underlying * notional,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain::row::fixtures::{input, row};
    use crate::domain::chain::OptionType;
    use crate::domain::dealer_sign::DealerSign;

    #[test]
    fn dealer_short_call_has_negative_gamma_exposure() {
        let r = row(OptionType::Call, 460.0).with_dealer_sign(DealerSign::Short);
        let e = dollar_exposure(&r, &ExposureConfig::default());
        // 0.01 × 450² × 1000 × 100
        assert!((e.gamma + 202_500_000.0).abs() < 1e-3);
        // 0.05 × 450 × 1000 × 100
        assert!((e.vanna + 2_250_000.0).abs() < 1e-6);
        // (-0.5 / 98280) × 450 × 1000 × 100, dealer short flips the sign
        let expected_charm = 0.5 / 98_280.0 * 450.0 * 100_000.0;
        assert!((e.charm - expected_charm).abs() < 1e-9);
    }

    #[test]
    fn unsigned_row_contributes_nothing() {
        let r = row(OptionType::Put, 440.0);
        assert_eq!(
            dollar_exposure(&r, &ExposureConfig::default()),
            DollarExposure::default()
        );
    }

    #[test]
    fn flat_sign_contributes_nothing() {
        let r = row(OptionType::Put, 440.0).with_dealer_sign(DealerSign::Flat);
        let e = dollar_exposure(&r, &ExposureConfig::default());
        assert_eq!(e.gamma, 0.0);
    }

    #[test]
    fn exposure_uses_each_rows_underlying_price() {
        let units = ExposureConfig::default();
        let at = |underlying: f64| {
            let mut i = input(OptionType::Call, 520.0);
            i.underlying_price = underlying;
            ChainRow::new(i).unwrap().with_dealer_sign(DealerSign::Short)
        };

        let low = dollar_exposure(&at(400.0), &units);
        let high = dollar_exposure(&at(500.0), &units);
        // 0.01 × S² × 1000 × 100
        assert!((low.gamma + 160_000_000.0).abs() < 1e-3);
        assert!((high.gamma + 250_000_000.0).abs() < 1e-3);
        assert!((low.gamma + high.gamma + 410_000_000.0).abs() < 1e-3);
        assert!((high.vanna / low.vanna - 1.25).abs() < 1e-12);
    }
}
