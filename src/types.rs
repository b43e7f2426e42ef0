//! Core types and data structures for the VAT engine

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::tax::vat::line_subtotal;

/// Tax treatment of a sale line
///
/// The wire codes (`vatable`, `exempt`, `zero-rated`) are the ones used by the
/// receipt entry forms. Anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// Priced tax-inclusive at the configured rate
    #[serde(rename = "vatable", alias = "standard")]
    Standard,
    /// Legally outside the scope of VAT
    #[serde(rename = "exempt")]
    Exempt,
    /// Taxable at 0%, reported on its own statutory line
    #[serde(rename = "zero-rated", alias = "zero_rated")]
    ZeroRated,
}

impl TaxCategory {
    /// All categories in reporting order
    pub const ALL: [TaxCategory; 3] = [
        TaxCategory::Standard,
        TaxCategory::Exempt,
        TaxCategory::ZeroRated,
    ];

    /// Wire code for this category
    pub fn code(&self) -> &'static str {
        match self {
            TaxCategory::Standard => "vatable",
            TaxCategory::Exempt => "exempt",
            TaxCategory::ZeroRated => "zero-rated",
        }
    }

    /// Whether sales in this category are within the scope of VAT.
    /// Zero-rated sales are taxable, just at 0%.
    pub fn is_taxable(&self) -> bool {
        matches!(self, TaxCategory::Standard | TaxCategory::ZeroRated)
    }
}

impl fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for TaxCategory {
    type Err = VatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vatable" | "standard" => Ok(TaxCategory::Standard),
            "exempt" => Ok(TaxCategory::Exempt),
            "zero-rated" | "zero_rated" => Ok(TaxCategory::ZeroRated),
            other => Err(VatError::InvalidArgument(format!(
                "Unrecognized tax category: '{}'",
                other
            ))),
        }
    }
}

/// A single line on a sale
///
/// The subtotal is never stored; it is always recomputed from price and quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Identifier of the line (or the catalog item it was rung up from)
    pub id: String,
    /// Optional item name printed on the receipt
    pub description: Option<String>,
    /// Unit price, tax-inclusive for standard-rated items
    pub unit_price: BigDecimal,
    /// Quantity sold; zero marks a voided or placeholder line
    pub quantity: i64,
    /// Tax treatment of this line
    pub category: TaxCategory,
}

impl LineItem {
    /// Create a new line item
    pub fn new(id: String, unit_price: BigDecimal, quantity: i64, category: TaxCategory) -> Self {
        Self {
            id,
            description: None,
            unit_price,
            quantity,
            category,
        }
    }

    /// Attach a description to the line
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Price × quantity, failing on negative inputs
    pub fn subtotal(&self) -> VatResult<BigDecimal> {
        line_subtotal(&self.unit_price, self.quantity).map_err(|e| match e {
            VatError::InvalidArgument(msg) => {
                VatError::InvalidArgument(format!("Line item '{}': {}", self.id, msg))
            }
            other => other,
        })
    }
}

/// Catalog entry that sale lines are rung up from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub sku: String,
    /// Shelf price, tax-inclusive for standard-rated items
    pub unit_price: BigDecimal,
    pub category: TaxCategory,
    pub stock: i64,
}

impl Item {
    /// Create a new catalog item with no stock on hand
    pub fn new(
        id: String,
        name: String,
        sku: String,
        unit_price: BigDecimal,
        category: TaxCategory,
    ) -> Self {
        Self {
            id,
            name,
            sku,
            unit_price,
            category,
            stock: 0,
        }
    }

    /// Build a sale line for `quantity` units of this item
    pub fn line(&self, quantity: i64) -> LineItem {
        LineItem::new(
            self.id.clone(),
            self.unit_price.clone(),
            quantity,
            self.category,
        )
        .with_description(self.name.clone())
    }
}

/// VAT breakdown of a batch of line items
///
/// All amounts are rounded to the currency's minor unit. The rate the
/// breakdown was computed with is kept so the value stays meaningful after the
/// configured rate changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatBreakdown {
    /// Rate applied to standard-rated sales
    pub rate: BigDecimal,
    /// Standard-rated sales, net of VAT
    pub standard_sales_net: BigDecimal,
    /// VAT-exempt sales
    pub exempt_sales: BigDecimal,
    /// Zero-rated sales
    pub zero_rated_sales: BigDecimal,
    /// Output VAT due on standard-rated sales
    pub tax_amount: BigDecimal,
    /// Gross total of all sales
    pub total_sales: BigDecimal,
}

impl VatBreakdown {
    /// An all-zero breakdown at the given rate
    pub fn zero(rate: BigDecimal) -> Self {
        Self {
            rate,
            standard_sales_net: BigDecimal::from(0),
            exempt_sales: BigDecimal::from(0),
            zero_rated_sales: BigDecimal::from(0),
            tax_amount: BigDecimal::from(0),
            total_sales: BigDecimal::from(0),
        }
    }

    /// Check if every amount is zero
    pub fn is_zero(&self) -> bool {
        let zero = BigDecimal::from(0);
        self.standard_sales_net == zero
            && self.exempt_sales == zero
            && self.zero_rated_sales == zero
            && self.tax_amount == zero
            && self.total_sales == zero
    }

    /// Standard-rated sales including VAT
    pub fn standard_sales_gross(&self) -> BigDecimal {
        &self.standard_sales_net + &self.tax_amount
    }
}

/// Pre-summed sales per category, as kept by a reporting store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    /// Standard-rated sales, tax-inclusive
    pub standard_gross: BigDecimal,
    pub exempt: BigDecimal,
    pub zero_rated: BigDecimal,
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self {
            standard_gross: BigDecimal::from(0),
            exempt: BigDecimal::from(0),
            zero_rated: BigDecimal::from(0),
        }
    }
}

/// Customer printed on a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    /// Tax Identification Number
    pub tin: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Customer {
    /// Create a customer with a name and optional TIN
    pub fn new(name: String, tin: Option<String>) -> Self {
        Self {
            name,
            tin,
            email: None,
            phone: None,
            address: None,
        }
    }

    /// Attach contact details
    pub fn with_contact(
        mut self,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> Self {
        self.email = email;
        self.phone = phone;
        self.address = address;
        self
    }
}

/// Lifecycle state of a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    /// Still being rung up; no breakdown yet
    Draft,
    /// Issued to the customer with a frozen breakdown
    Completed,
    /// Cancelled after issue; excluded from reporting
    Voided,
}

/// A sale receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier for the receipt
    pub id: Uuid,
    /// Human-facing receipt number (e.g. "OR-0001")
    pub receipt_number: String,
    pub customer: Option<Customer>,
    pub items: Vec<LineItem>,
    pub payment_method: String,
    pub status: ReceiptStatus,
    /// Breakdown frozen when the receipt was completed
    pub breakdown: Option<VatBreakdown>,
    /// When the receipt was opened
    pub created_at: NaiveDateTime,
    /// When the receipt was completed
    pub completed_at: Option<NaiveDateTime>,
}

impl Receipt {
    /// Create a new draft receipt
    pub fn new(receipt_number: String, payment_method: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_number,
            customer: None,
            items: Vec::new(),
            payment_method,
            status: ReceiptStatus::Draft,
            breakdown: None,
            created_at: chrono::Utc::now().naive_utc(),
            completed_at: None,
        }
    }

    /// Date the sale counts towards for reporting
    pub fn issued_on(&self) -> NaiveDate {
        self.completed_at.unwrap_or(self.created_at).date()
    }

    /// Check if the receipt is a completed sale
    pub fn is_completed(&self) -> bool {
        self.status == ReceiptStatus::Completed
    }
}

/// Sales summary over a reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Number of completed receipts in the period
    pub receipt_count: usize,
    pub standard_sales_net: BigDecimal,
    pub exempt_sales: BigDecimal,
    pub zero_rated_sales: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total_sales: BigDecimal,
}

impl SalesSummary {
    /// An empty summary for the given period
    pub fn empty(period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            period_start,
            period_end,
            receipt_count: 0,
            standard_sales_net: BigDecimal::from(0),
            exempt_sales: BigDecimal::from(0),
            zero_rated_sales: BigDecimal::from(0),
            tax_amount: BigDecimal::from(0),
            total_sales: BigDecimal::from(0),
        }
    }

    /// Fold a receipt's breakdown into the summary
    pub fn add_breakdown(&mut self, breakdown: &VatBreakdown) {
        self.receipt_count += 1;
        self.standard_sales_net += &breakdown.standard_sales_net;
        self.exempt_sales += &breakdown.exempt_sales;
        self.zero_rated_sales += &breakdown.zero_rated_sales;
        self.tax_amount += &breakdown.tax_amount;
        self.total_sales += &breakdown.total_sales;
    }
}

/// Errors that can occur in the VAT engine
#[derive(Debug, thiserror::Error)]
pub enum VatError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid receipt: {0}")]
    InvalidReceipt(String),
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for VAT engine operations
pub type VatResult<T> = Result<T, VatError>;
