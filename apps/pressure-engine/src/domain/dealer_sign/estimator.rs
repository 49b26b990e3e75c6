use crate::domain::chain::{ChainRow, OptionType};

use super::{DealerSign, DealerSignConvention};

/// Counts of explicit versus convention-assigned dealer signs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DealerSignStats {
    /// Rows that arrived with a dealer sign.
    pub explicit: usize,
    /// Rows signed by the convention.
    pub estimated: usize,
}

/// Assigns a dealer sign to every row lacking one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DealerSignEstimator {
    convention: DealerSignConvention,
}

/// Mean open interest per option type (0 when the type is absent).
#[derive(Debug, Clone, Copy, Default)]
struct OpenInterestMeans {
    call: f64,
    put: f64,
}

impl OpenInterestMeans {
    fn from_rows(rows: &[ChainRow]) -> Self {
        let (mut call_sum, mut call_n, mut put_sum, mut put_n) = (0.0, 0usize, 0.0, 0usize);
        for row in rows {
            match row.option_type() {
                OptionType::Call => {
                    call_sum += row.open_interest();
                    call_n += 1;
                }
                OptionType::Put => {
                    put_sum += row.open_interest();
                    put_n += 1;
                }
            }
        }
        let mean = |sum: f64, n: usize| if n == 0 { 0.0 } else { sum / n as f64 };
        Self {
            call: mean(call_sum, call_n),
            put: mean(put_sum, put_n),
        }
    }

    const fn for_type(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call,
            OptionType::Put => self.put,
        }
    }
}

impl DealerSignEstimator {
    /// Create an estimator for the given convention.
    #[must_use]
    pub const fn new(convention: DealerSignConvention) -> Self {
        Self { convention }
    }

    /// Convention in use.
    #[must_use]
    pub const fn convention(&self) -> DealerSignConvention {
        self.convention
    }

    /// Sign every row that does not already carry one.
    #[must_use]
    pub fn assign(&self, rows: Vec<ChainRow>, spot: f64) -> (Vec<ChainRow>, DealerSignStats) {
        let means = match self.convention {
            DealerSignConvention::OpenInterestConcentration => OpenInterestMeans::from_rows(&rows),
            _ => OpenInterestMeans::default(),
        };

        let mut stats = DealerSignStats::default();
        let signed = rows
            .into_iter()
            .map(|row| {
                if row.dealer_sign().is_some() {
                    stats.explicit += 1;
                    row
                } else {
                    stats.estimated += 1;
                    let sign = self.estimate(&row, spot, &means);
                    row.with_dealer_sign(sign)
                }
            })
            .collect();

        (signed, stats)
    }

    fn estimate(&self, row: &ChainRow, spot: f64, means: &OpenInterestMeans) -> DealerSign {
        match self.convention {
            DealerSignConvention::ShortOtm => {
                if row.is_otm(spot) {
                    DealerSign::Short
                } else {
                    DealerSign::Long
                }
            }
            DealerSignConvention::LongCallsShortPuts => match row.option_type() {
                OptionType::Call => DealerSign::Long,
                OptionType::Put => DealerSign::Short,
            },
            DealerSignConvention::AllShort => DealerSign::Short,
            DealerSignConvention::AllLong => DealerSign::Long,
            DealerSignConvention::OpenInterestConcentration => {
                if row.open_interest() >= means.for_type(row.option_type()) {
                    DealerSign::Short
                } else {
                    DealerSign::Long
                }
            }
        }
    }
}
