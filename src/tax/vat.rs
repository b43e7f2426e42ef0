//! VAT calculation engine
//!
//! Standard-rated prices are tax-inclusive. Aggregation converts each
//! standard-rated subtotal to its net amount before summing, then applies the
//! rate once, so tax on the sum matches the sum of per-line tax up to rounding.

use bigdecimal::BigDecimal;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{SettingsHandle, TaxSettings};
use crate::tax::rounding::RoundingPolicy;
use crate::types::*;
use crate::utils::validation::{
    validate_non_negative_amount, validate_quantity, validate_rate, validate_scale,
};

/// VAT embedded in a tax-inclusive amount: `gross - gross / (1 + rate)`
pub fn tax_from_gross(gross: &BigDecimal, rate: &BigDecimal) -> VatResult<BigDecimal> {
    let net = net_from_gross(gross, rate)?;
    Ok(gross - net)
}

/// VAT on a tax-exclusive amount: `net * rate`
pub fn tax_from_net(net: &BigDecimal, rate: &BigDecimal) -> VatResult<BigDecimal> {
    validate_non_negative_amount("Net amount", net)?;
    validate_rate(rate)?;
    Ok(net * rate)
}

/// Tax-inclusive amount for a net amount: `net * (1 + rate)`
pub fn gross_from_net(net: &BigDecimal, rate: &BigDecimal) -> VatResult<BigDecimal> {
    validate_non_negative_amount("Net amount", net)?;
    validate_rate(rate)?;
    Ok(net * (BigDecimal::from(1) + rate))
}

/// Net amount inside a tax-inclusive amount: `gross / (1 + rate)`
pub fn net_from_gross(gross: &BigDecimal, rate: &BigDecimal) -> VatResult<BigDecimal> {
    validate_non_negative_amount("Gross amount", gross)?;
    validate_rate(rate)?;
    Ok(gross / (BigDecimal::from(1) + rate))
}

/// Line subtotal: `price * quantity`
pub fn line_subtotal(price: &BigDecimal, quantity: i64) -> VatResult<BigDecimal> {
    validate_non_negative_amount("Unit price", price)?;
    validate_quantity(quantity)?;
    Ok(price * BigDecimal::from(quantity))
}

/// Aggregate line items into a VAT breakdown, rounding to two decimals
/// half-to-even
pub fn aggregate_breakdown(items: &[LineItem], rate: &BigDecimal) -> VatResult<VatBreakdown> {
    aggregate_breakdown_with(items, rate, &RoundingPolicy::default())
}

/// Aggregate line items into a VAT breakdown with an explicit rounding policy
///
/// Every line is validated before anything is accumulated. A batch with a
/// single malformed line yields an error and no breakdown.
pub fn aggregate_breakdown_with(
    items: &[LineItem],
    rate: &BigDecimal,
    rounding: &RoundingPolicy,
) -> VatResult<VatBreakdown> {
    validate_rate(rate)?;
    validate_scale(rounding.scale)?;
    debug!(items = items.len(), rate = %rate, "Aggregating VAT breakdown");

    let subtotals = items
        .iter()
        .map(|item| item.subtotal().map(|subtotal| (item.category, subtotal)))
        .collect::<VatResult<Vec<_>>>()
        .inspect_err(|e| warn!(error = %e, "Rejected line item batch"))?;

    let mut accumulator = CategoryAccumulator::default();
    for (category, subtotal) in subtotals {
        accumulator.add(category, subtotal, rate);
    }

    Ok(accumulator.finalize(rate, rounding))
}

/// Full-precision running totals per category
#[derive(Debug)]
struct CategoryAccumulator {
    standard_net: BigDecimal,
    exempt: BigDecimal,
    zero_rated: BigDecimal,
}

impl Default for CategoryAccumulator {
    fn default() -> Self {
        Self {
            standard_net: BigDecimal::from(0),
            exempt: BigDecimal::from(0),
            zero_rated: BigDecimal::from(0),
        }
    }
}

impl CategoryAccumulator {
    /// Route a validated, non-negative subtotal into its category
    fn add(&mut self, category: TaxCategory, subtotal: BigDecimal, rate: &BigDecimal) {
        match category {
            TaxCategory::Standard => {
                self.standard_net += subtotal / (BigDecimal::from(1) + rate);
            }
            TaxCategory::Exempt => self.exempt += subtotal,
            TaxCategory::ZeroRated => self.zero_rated += subtotal,
        }
    }

    fn finalize(self, rate: &BigDecimal, rounding: &RoundingPolicy) -> VatBreakdown {
        let tax_amount = &self.standard_net * rate;
        let total_sales = &self.standard_net * (BigDecimal::from(1) + rate)
            + &self.exempt
            + &self.zero_rated;

        VatBreakdown {
            rate: rate.clone(),
            standard_sales_net: rounding.round(&self.standard_net),
            exempt_sales: rounding.round(&self.exempt),
            zero_rated_sales: rounding.round(&self.zero_rated),
            tax_amount: rounding.round(&tax_amount),
            total_sales: rounding.round(&total_sales),
        }
    }
}

/// VAT calculator bound to one settings snapshot
///
/// The snapshot is taken when the calculator is built. Later updates to the
/// published settings are not seen by this calculator, so every line of a
/// batch is taxed at the same rate.
#[derive(Debug, Clone)]
pub struct VatCalculator {
    settings: Arc<TaxSettings>,
}

impl VatCalculator {
    /// Create a calculator from a settings snapshot
    pub fn new(settings: Arc<TaxSettings>) -> VatResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Create a calculator from the currently published settings
    ///
    /// A handle only ever publishes validated settings.
    pub fn from_handle(handle: &SettingsHandle) -> Self {
        Self {
            settings: handle.snapshot(),
        }
    }

    /// Create a calculator with an explicit rate and default rounding
    pub fn with_rate(rate: BigDecimal) -> VatResult<Self> {
        validate_rate(&rate)?;
        Ok(Self {
            settings: Arc::new(TaxSettings {
                rate,
                ..TaxSettings::default()
            }),
        })
    }

    /// Rate this calculator applies
    pub fn rate(&self) -> &BigDecimal {
        &self.settings.rate
    }

    /// Rounding policy for finalized amounts
    pub fn rounding(&self) -> RoundingPolicy {
        self.settings.rounding_policy()
    }

    /// Round an amount to the configured minor unit
    pub fn round(&self, amount: &BigDecimal) -> BigDecimal {
        self.rounding().round(amount)
    }

    /// VAT embedded in a tax-inclusive amount, at full precision
    pub fn tax_from_gross(&self, gross: &BigDecimal) -> VatResult<BigDecimal> {
        tax_from_gross(gross, self.rate())
    }

    /// VAT on a tax-exclusive amount, at full precision
    pub fn tax_from_net(&self, net: &BigDecimal) -> VatResult<BigDecimal> {
        tax_from_net(net, self.rate())
    }

    /// Tax-inclusive amount for a net amount, at full precision
    pub fn gross_from_net(&self, net: &BigDecimal) -> VatResult<BigDecimal> {
        gross_from_net(net, self.rate())
    }

    /// Net amount inside a tax-inclusive amount, at full precision
    pub fn net_from_gross(&self, gross: &BigDecimal) -> VatResult<BigDecimal> {
        net_from_gross(gross, self.rate())
    }

    /// Aggregate line items at this calculator's rate and rounding
    pub fn aggregate(&self, items: &[LineItem]) -> VatResult<VatBreakdown> {
        aggregate_breakdown_with(items, self.rate(), &self.rounding())
    }

    /// Breakdown for pre-summed category totals
    pub fn breakdown_from_totals(&self, totals: &CategoryTotals) -> VatResult<VatBreakdown> {
        validate_non_negative_amount("Standard-rated total", &totals.standard_gross)?;
        validate_non_negative_amount("Exempt total", &totals.exempt)?;
        validate_non_negative_amount("Zero-rated total", &totals.zero_rated)?;

        let mut accumulator = CategoryAccumulator::default();
        accumulator.add(TaxCategory::Standard, totals.standard_gross.clone(), self.rate());
        accumulator.add(TaxCategory::Exempt, totals.exempt.clone(), self.rate());
        accumulator.add(TaxCategory::ZeroRated, totals.zero_rated.clone(), self.rate());

        Ok(accumulator.finalize(self.rate(), &self.rounding()))
    }
}

impl Default for VatCalculator {
    fn default() -> Self {
        Self {
            settings: Arc::new(TaxSettings::default()),
        }
    }
}
