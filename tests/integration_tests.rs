//! Integration tests for vat-core

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use vat_core::{
    aggregate_breakdown,
    utils::{EnhancedReceiptValidator, MemoryStorage},
    Customer, Item, LineItem, ReceiptBuilder, ReceiptManager, ReceiptStatus, ReceiptStorage,
    SalesReporter, SettingsHandle, TaxCategory, TaxSettings, VatCalculator, VatConfig, VatError,
};

fn dec(s: &str) -> BigDecimal {
    s.parse().unwrap()
}

fn catalog() -> Vec<Item> {
    vec![
        Item::new(
            "itm-001".to_string(),
            "Laptop sleeve".to_string(),
            "LS-14".to_string(),
            BigDecimal::from(1000),
            TaxCategory::Standard,
        ),
        Item::new(
            "itm-002".to_string(),
            "Fresh vegetables".to_string(),
            "VEG-1KG".to_string(),
            BigDecimal::from(500),
            TaxCategory::Exempt,
        ),
        Item::new(
            "itm-003".to_string(),
            "Export order".to_string(),
            "EXP-01".to_string(),
            BigDecimal::from(200),
            TaxCategory::ZeroRated,
        ),
    ]
}

#[tokio::test]
async fn test_complete_receipt_workflow() {
    let storage = MemoryStorage::new();
    let settings = SettingsHandle::default();
    let mut manager = ReceiptManager::with_validator(
        storage.clone(),
        settings.clone(),
        Box::new(EnhancedReceiptValidator),
    );

    let items = catalog();
    let draft = ReceiptBuilder::new("OR-2024-0001")
        .customer("Maria Santos", Some("123-456-789-000".to_string()))
        .payment_method("card")
        .add_catalog_item(&items[0], 1)
        .add_catalog_item(&items[1], 2)
        .build();

    let draft = manager.open_receipt(draft).await.unwrap();
    let draft = manager
        .add_item(&draft.id, items[2].line(1))
        .await
        .unwrap();
    assert_eq!(draft.items.len(), 3);

    let completed = manager.complete_receipt(&draft.id).await.unwrap();
    let breakdown = completed.breakdown.as_ref().unwrap();

    assert_eq!(completed.status, ReceiptStatus::Completed);
    assert_eq!(breakdown.standard_sales_net, dec("892.86"));
    assert_eq!(breakdown.tax_amount, dec("107.14"));
    assert_eq!(breakdown.exempt_sales, dec("1000"));
    assert_eq!(breakdown.zero_rated_sales, dec("200"));
    assert_eq!(breakdown.total_sales, dec("2200.00"));

    // Stored copy matches
    let stored = storage.get_receipt(&draft.id).await.unwrap().unwrap();
    assert_eq!(stored, completed);

    // Completed receipts are closed for edits
    assert!(matches!(
        manager.add_item(&draft.id, items[0].line(1)).await,
        Err(VatError::InvalidReceipt(_))
    ));
}

#[tokio::test]
async fn test_malformed_receipt_is_not_completed() {
    let storage = MemoryStorage::new();
    let mut manager = ReceiptManager::new(storage.clone(), SettingsHandle::default());

    let draft = ReceiptBuilder::new("OR-2024-0002")
        .line("ok", BigDecimal::from(100), 1, TaxCategory::Standard)
        .line("bad", BigDecimal::from(-100), 1, TaxCategory::Standard)
        .build();
    let draft = manager.open_receipt(draft).await.unwrap();

    let result = manager.complete_receipt(&draft.id).await;
    assert!(matches!(result, Err(VatError::InvalidArgument(_))));

    let stored = storage.get_receipt(&draft.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ReceiptStatus::Draft);
    assert!(stored.breakdown.is_none());
}

#[tokio::test]
async fn test_unknown_receipt() {
    let mut manager = ReceiptManager::new(MemoryStorage::new(), SettingsHandle::default());
    let missing = uuid::Uuid::new_v4();

    assert!(manager.get_receipt(&missing).await.unwrap().is_none());
    assert!(matches!(
        manager.complete_receipt(&missing).await,
        Err(VatError::ReceiptNotFound(_))
    ));
}

#[tokio::test]
async fn test_rate_change_does_not_touch_completed_receipts() {
    let storage = MemoryStorage::new();
    let settings = SettingsHandle::default();
    let mut manager = ReceiptManager::new(storage.clone(), settings.clone());

    let first = manager
        .open_receipt(
            ReceiptBuilder::new("OR-1")
                .line("a", BigDecimal::from(1120), 1, TaxCategory::Standard)
                .build(),
        )
        .await
        .unwrap();
    let first = manager.complete_receipt(&first.id).await.unwrap();

    settings.set_rate(dec("0.10")).unwrap();

    let second = manager
        .open_receipt(
            ReceiptBuilder::new("OR-2")
                .line("a", BigDecimal::from(1100), 1, TaxCategory::Standard)
                .build(),
        )
        .await
        .unwrap();
    let second = manager.complete_receipt(&second.id).await.unwrap();

    let stored_first = storage.get_receipt(&first.id).await.unwrap().unwrap();
    let first_breakdown = stored_first.breakdown.unwrap();
    assert_eq!(first_breakdown.rate, dec("0.12"));
    assert_eq!(first_breakdown.tax_amount, BigDecimal::from(120));

    let second_breakdown = second.breakdown.unwrap();
    assert_eq!(second_breakdown.rate, dec("0.10"));
    assert_eq!(second_breakdown.tax_amount, BigDecimal::from(100));

    // Period summary adds up what was printed
    let today = second.completed_at.unwrap().date();
    let start = first.issued_on().min(today);
    let summary = SalesReporter::new(storage)
        .summarize_period(start, today)
        .await
        .unwrap();
    assert_eq!(summary.receipt_count, 2);
    assert_eq!(summary.tax_amount, BigDecimal::from(220));
    assert_eq!(summary.standard_sales_net, BigDecimal::from(2000));
    assert_eq!(summary.total_sales, BigDecimal::from(2220));
}

#[tokio::test]
async fn test_voided_receipts_excluded_from_summary() {
    let storage = MemoryStorage::new();
    let mut manager = ReceiptManager::new(storage.clone(), SettingsHandle::default());

    let mut ids = Vec::new();
    for (number, amount) in [("OR-10", 100), ("OR-11", 250), ("OR-12", 400)] {
        let receipt = manager
            .open_receipt(
                ReceiptBuilder::new(number)
                    .line("x", BigDecimal::from(amount), 1, TaxCategory::Exempt)
                    .build(),
            )
            .await
            .unwrap();
        manager.complete_receipt(&receipt.id).await.unwrap();
        ids.push(receipt.id);
    }

    let voided = manager.void_receipt(&ids[1]).await.unwrap();
    assert_eq!(voided.status, ReceiptStatus::Voided);

    let today = voided.issued_on();
    let summary = SalesReporter::new(storage)
        .summarize_period(today, today)
        .await
        .unwrap();

    assert_eq!(summary.receipt_count, 2);
    assert_eq!(summary.exempt_sales, BigDecimal::from(500));
    assert_eq!(summary.total_sales, BigDecimal::from(500));
}

#[tokio::test]
async fn test_summary_respects_period_bounds() {
    let mut storage = MemoryStorage::new();
    let calculator = VatCalculator::default();

    for (number, day) in [("OR-A", 5), ("OR-B", 20), ("OR-C", 28)] {
        let mut receipt = ReceiptBuilder::new(number)
            .line("svc", BigDecimal::from(1120), 1, TaxCategory::Standard)
            .build();
        receipt.complete(&calculator).unwrap();
        receipt.completed_at = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(10, 0, 0);
        storage.save_receipt(&receipt).await.unwrap();
    }

    let summary = SalesReporter::new(storage)
        .summarize_period(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(summary.receipt_count, 2);
    assert_eq!(summary.tax_amount, BigDecimal::from(240));
    assert_eq!(summary.total_sales, BigDecimal::from(2240));
}

#[test]
fn test_line_items_from_json() {
    let json = r#"[
        {"id": "a", "description": null, "unit_price": "1000", "quantity": 1, "category": "vatable"},
        {"id": "b", "description": "Rice", "unit_price": "500", "quantity": 2, "category": "exempt"},
        {"id": "c", "description": null, "unit_price": "200", "quantity": 1, "category": "zero-rated"}
    ]"#;

    let items: Vec<LineItem> = serde_json::from_str(json).unwrap();
    let breakdown = aggregate_breakdown(&items, &dec("0.12")).unwrap();
    assert_eq!(breakdown.total_sales, BigDecimal::from(2200));
}

#[test]
fn test_customer_contact_is_optional_in_json() {
    let bare: Customer = serde_json::from_str(r#"{"name": "Walk-in", "tin": null}"#).unwrap();
    assert_eq!(bare, Customer::new("Walk-in".to_string(), None));

    let full: Customer = serde_json::from_str(
        r#"{"name": "Ana Reyes", "tin": "123-456-789-000", "email": "ana@example.ph", "phone": null, "address": "Quezon City"}"#,
    )
    .unwrap();
    assert_eq!(full.email.as_deref(), Some("ana@example.ph"));
    assert_eq!(full.address.as_deref(), Some("Quezon City"));
    assert!(full.phone.is_none());
}

#[test]
fn test_unknown_category_in_json_rejected() {
    let json = r#"{"id": "a", "description": null, "unit_price": "10", "quantity": 1, "category": "luxury"}"#;
    assert!(serde_json::from_str::<LineItem>(json).is_err());
}

#[test]
fn test_config_with_bad_scale_is_never_published() {
    let config = VatConfig::from_toml("[tax]\ncurrency_decimals = -2\n").unwrap();
    assert!(matches!(
        SettingsHandle::try_from(&config),
        Err(VatError::Config(_))
    ));

    // A rejected update leaves the scenario totals at centavo precision
    let handle = SettingsHandle::default();
    let bad = TaxSettings {
        currency_decimals: -2,
        ..TaxSettings::default()
    };
    assert!(handle.update(bad).is_err());

    let breakdown = VatCalculator::from_handle(&handle)
        .aggregate(&[
            LineItem::new("a".to_string(), BigDecimal::from(1000), 1, TaxCategory::Standard),
            LineItem::new("b".to_string(), BigDecimal::from(500), 2, TaxCategory::Exempt),
            LineItem::new("c".to_string(), BigDecimal::from(200), 1, TaxCategory::ZeroRated),
        ])
        .unwrap();
    assert_eq!(breakdown.tax_amount, dec("107.14"));
    assert_eq!(breakdown.standard_sales_net, dec("892.86"));
}

#[test]
fn test_calculator_from_config() {
    let config = VatConfig::from_toml("[tax]\nrate = \"0.05\"\nrounding = \"half-up\"\n").unwrap();
    let handle = SettingsHandle::try_from(&config).unwrap();
    let calculator = VatCalculator::from_handle(&handle);

    // 0.525 rounds half-up to 0.53
    let tax = calculator.tax_from_net(&dec("10.50")).unwrap();
    assert_eq!(calculator.round(&tax), dec("0.53"));

    let settings = TaxSettings {
        rate: dec("0.05"),
        ..TaxSettings::default()
    };
    // Half-even keeps 0.52
    assert_eq!(settings.rounding_policy().round(&tax), dec("0.52"));
}

#[test]
fn test_concurrent_aggregation_sees_one_rate() {
    let handle = SettingsHandle::default();
    let items: Vec<LineItem> = (0..200)
        .map(|i| {
            LineItem::new(
                format!("line-{i}"),
                BigDecimal::from(112),
                1,
                TaxCategory::Standard,
            )
        })
        .collect();

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                let items = &items;
                scope.spawn(move || {
                    let calculator = VatCalculator::from_handle(&handle);
                    calculator.aggregate(items).unwrap()
                })
            })
            .collect();

        handle.set_rate(dec("0.10")).unwrap();

        for worker in workers {
            let breakdown = worker.join().unwrap();
            // Every line taxed at whichever single rate the snapshot held
            let expected_net = BigDecimal::from(200 * 112) / (BigDecimal::from(1) + &breakdown.rate);
            assert_eq!(
                breakdown.standard_sales_net,
                expected_net.with_scale_round(2, bigdecimal::RoundingMode::HalfEven)
            );
        }
    });
}
