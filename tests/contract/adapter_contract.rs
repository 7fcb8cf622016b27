use std::sync::Arc;

use sectormap_core::{
    adapter_for, extract, validate, ExtractionStrategy, PlausibilityBounds, SecurityId,
    SourceAdapter, SourceId, Trend,
};

struct AdapterCase {
    id: SourceId,
    strategy: ExtractionStrategy,
    adapter: Arc<dyn SourceAdapter>,
    fixture: &'static str,
    expected_name: &'static str,
}

fn adapter_cases() -> Vec<AdapterCase> {
    let build = |id| adapter_for(id, None).expect("bundled adapter");
    vec![
        AdapterCase {
            id: SourceId::Kabutan,
            strategy: ExtractionStrategy::Table,
            adapter: build(SourceId::Kabutan),
            fixture: include_str!("../fixtures/kabutan_1928.html"),
            expected_name: "積水ハウス",
        },
        AdapterCase {
            id: SourceId::Minkabu,
            strategy: ExtractionStrategy::PatternScan,
            adapter: build(SourceId::Minkabu),
            fixture: include_str!("../fixtures/minkabu_1928.html"),
            expected_name: "積水ハウス",
        },
        AdapterCase {
            id: SourceId::YahooJapan,
            strategy: ExtractionStrategy::RawText,
            adapter: build(SourceId::YahooJapan),
            fixture: include_str!("../fixtures/yahoo_japan_1928.html"),
            expected_name: "積水ハウス(株)",
        },
    ]
}

fn security() -> SecurityId {
    SecurityId::parse("1928").expect("valid code")
}

#[test]
fn every_adapter_reports_its_identity_and_strategy() {
    for case in adapter_cases() {
        assert_eq!(case.adapter.id(), case.id, "adapter '{}': id", case.id);
        assert_eq!(
            case.adapter.strategy(),
            case.strategy,
            "adapter '{}': strategy",
            case.id
        );

        let url = case.adapter.url_for(&security());
        assert!(url.starts_with("https://"), "adapter '{}': url {url}", case.id);
        assert!(url.contains("1928"), "adapter '{}': url {url}", case.id);
    }
}

#[test]
fn every_adapter_extracts_all_metrics_from_its_fixture() {
    for case in adapter_cases() {
        let record = extract(case.adapter.as_ref(), case.fixture);

        assert_eq!(record.pbr, Some(1.10), "adapter '{}': pbr", case.id);
        assert_eq!(record.per, Some(12.3), "adapter '{}': per", case.id);
        assert_eq!(record.dividend_yield, Some(2.5), "adapter '{}': yield", case.id);
        assert_eq!(record.trend, Some(Trend::Up), "adapter '{}': trend", case.id);

        let stock = validate(&security(), record, &PlausibilityBounds::default());
        assert_eq!(stock.name, case.expected_name, "adapter '{}': name", case.id);
    }
}

#[test]
fn extraction_is_idempotent() {
    for case in adapter_cases() {
        let first = extract(case.adapter.as_ref(), case.fixture);
        let second = extract(case.adapter.as_ref(), case.fixture);

        assert_eq!(first, second, "adapter '{}': repeated extraction", case.id);
    }
}

#[test]
fn empty_or_foreign_documents_yield_nothing() {
    let foreign = "<html><body><p>メンテナンス中です</p></body></html>";

    for case in adapter_cases() {
        for document in ["", foreign] {
            let record = extract(case.adapter.as_ref(), document);
            assert!(
                record.is_empty(),
                "adapter '{}': expected empty record, got {record:?}",
                case.id
            );
        }
    }
}

#[test]
fn adapters_do_not_read_each_others_markup_as_values() {
    let cases = adapter_cases();

    for case in &cases {
        for other in cases.iter().filter(|other| other.id != case.id) {
            let record = extract(case.adapter.as_ref(), other.fixture);
            for value in [record.pbr, record.per, record.dividend_yield].into_iter().flatten() {
                assert!(
                    [1.10, 12.3, 2.5].contains(&value),
                    "adapter '{}' on '{}' fixture invented value {value}",
                    case.id,
                    other.id
                );
            }
        }
    }
}
