//! VAT breakdown walkthrough

use bigdecimal::BigDecimal;
use tracing_subscriber::EnvFilter;
use vat_core::{
    summarize_totals, tax_from_gross, CategoryTotals, Item, ReceiptBuilder, SettingsHandle,
    TaxCategory, VatCalculator, VatConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = VatConfig::load_or_default(None);
    let settings = SettingsHandle::try_from(&config)?;
    let calculator = VatCalculator::from_handle(&settings);

    println!("VAT Core - Receipt Breakdown Examples\n");

    // 1. Tax categories
    println!("Tax categories (rate {}):", calculator.rate());
    for category in TaxCategory::ALL {
        println!("  {:<11} taxable: {}", category, category.is_taxable());
    }
    println!();

    // 2. Backing VAT out of a shelf price
    let shelf_price = BigDecimal::from(1120);
    let vat = tax_from_gross(&shelf_price, calculator.rate())?;
    println!("Shelf price ₱{} contains ₱{} VAT", shelf_price, calculator.round(&vat));
    println!();

    // 3. A mixed receipt
    let catalog = [
        Item::new(
            "itm-001".to_string(),
            "USB charger".to_string(),
            "USB-C-20W".to_string(),
            BigDecimal::from(1000),
            TaxCategory::Standard,
        ),
        Item::new(
            "itm-002".to_string(),
            "Rice 5kg".to_string(),
            "RICE-5".to_string(),
            BigDecimal::from(500),
            TaxCategory::Exempt,
        ),
        Item::new(
            "itm-003".to_string(),
            "Export crate".to_string(),
            "EXP-CR".to_string(),
            BigDecimal::from(200),
            TaxCategory::ZeroRated,
        ),
    ];

    let mut receipt = ReceiptBuilder::new("OR-0001")
        .customer("Walk-in", None)
        .add_catalog_item(&catalog[0], 1)
        .add_catalog_item(&catalog[1], 2)
        .add_catalog_item(&catalog[2], 1)
        .build();

    let breakdown = receipt.complete(&calculator)?.clone();
    println!("Receipt {}:", receipt.receipt_number);
    println!("  VATable sales (net): ₱{}", breakdown.standard_sales_net);
    println!("  VAT-exempt sales:    ₱{}", breakdown.exempt_sales);
    println!("  Zero-rated sales:    ₱{}", breakdown.zero_rated_sales);
    println!("  VAT amount:          ₱{}", breakdown.tax_amount);
    println!("  Total:               ₱{}", breakdown.total_sales);
    println!();

    // 4. Monthly summary from pre-summed totals
    let totals = CategoryTotals {
        standard_gross: BigDecimal::from(230_384),
        exempt: BigDecimal::from(35_200),
        zero_rated: BigDecimal::from(25_800),
    };
    let monthly = summarize_totals(&calculator, &totals)?;
    println!("Monthly VAT summary:");
    println!("  VATable sales: ₱{}", monthly.standard_sales_net);
    println!("  Output VAT:    ₱{}", monthly.tax_amount);
    println!("  Total sales:   ₱{}", monthly.total_sales);

    Ok(())
}
