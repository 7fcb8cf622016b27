//! Behavior-driven tests for the catalog sweep.
//!
//! These tests run the whole fetch → extract → validate → append pipeline
//! against canned pages, without network access or request delays.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sectormap_core::{
    adapter_for, Aggregator, Catalog, CatalogSector, FetchClient, FetchPolicy, PipelineConfig,
    RequestGate, SectorCode, SecurityId, SourceId, StaticHttpClient, Stock, TableAdapter, Trend,
};

const CONSTRUCTION_PAGE: &str = r#"
<html><body>
  <table>
    <tr><th>PBR</th><td>1.10倍</td></tr>
    <tr><th>PER</th><td>12.3倍</td></tr>
    <tr><th>dividend yield</th><td>2.5%</td></tr>
    <tr><th>Change</th><td>+5</td></tr>
  </table>
</body></html>"#;

const KABUTAN_1928: &str = "https://kabutan.jp/stock/?code=1928";

fn construction_catalog() -> Catalog {
    Catalog::new(vec![CatalogSector {
        code: SectorCode::parse("0254").expect("valid sector"),
        name: String::from("Construction"),
        leaders: vec![SecurityId::parse("1928").expect("valid code")],
    }])
    .expect("valid catalog")
}

fn kabutan_aggregator(catalog: Catalog, http: StaticHttpClient) -> Aggregator {
    let fetcher = FetchClient::new(Arc::new(http), FetchPolicy::kabutan_default())
        .with_gate(RequestGate::unthrottled());
    let adapter = Arc::new(TableAdapter::kabutan().expect("bundled layout"));
    Aggregator::new(catalog, adapter, fetcher)
}

// =============================================================================
// Sweep: Success and Failure Paths
// =============================================================================

#[tokio::test]
async fn when_page_has_all_labels_stock_carries_every_metric() {
    // Given: A one-sector catalog and a page labelling every metric
    let http = StaticHttpClient::new().with_page(KABUTAN_1928, CONSTRUCTION_PAGE);
    let aggregator = kabutan_aggregator(construction_catalog(), http);

    // When: The sweep runs
    let outcome = aggregator.run().await;

    // Then: The record carries the parsed values and an upward trend
    assert_eq!(outcome.snapshot.sectors.len(), 1);
    let sector = &outcome.snapshot.sectors[0];
    assert_eq!(sector.code.as_str(), "0254");
    assert_eq!(sector.name, "Construction");

    let stock = &sector.stocks[0];
    assert_eq!(stock.code.as_str(), "1928");
    assert_eq!(stock.name, "1928", "no heading on the page, name falls back to code");
    assert_eq!(stock.pbr, Some(1.10));
    assert_eq!(stock.per, Some(12.3));
    assert_eq!(stock.dividend_yield, Some(2.5));
    assert_eq!(stock.trend, Trend::Up);

    assert_eq!(outcome.report.fetched, 1);
    assert!(outcome.report.is_complete());
}

#[tokio::test]
async fn when_fetch_fails_stock_degrades_and_sweep_completes() {
    // Given: The only page in the catalog cannot be fetched
    let http = StaticHttpClient::new().with_error(KABUTAN_1928, "request timeout");
    let aggregator = kabutan_aggregator(construction_catalog(), http);

    // When: The sweep runs
    let outcome = aggregator.run().await;

    // Then: The snapshot is complete and the record is the degraded form
    let stock = &outcome.snapshot.sectors[0].stocks[0];
    assert_eq!(stock.code.as_str(), "1928");
    assert_eq!(stock.name, "1928");
    assert_eq!(stock.pbr, None);
    assert_eq!(stock.per, None);
    assert_eq!(stock.dividend_yield, None);
    assert_eq!(stock.trend, Trend::Flat);

    let json = serde_json::to_value(&outcome.snapshot).expect("snapshot serializes");
    assert_eq!(
        json[0]["stocks"][0],
        serde_json::json!({
            "code": "1928", "name": "1928", "pbr": null, "per": null, "yield": null, "trend": "flat"
        })
    );
    assert_eq!(outcome.report.failed, 1);
}

#[tokio::test]
async fn when_upstream_answers_error_status_stock_degrades() {
    // Given: The upstream answers 503 for the page
    let http = StaticHttpClient::new().with_status(KABUTAN_1928, 503);
    let aggregator = kabutan_aggregator(construction_catalog(), http);

    // When: The sweep runs
    let outcome = aggregator.run().await;

    // Then: The status is treated as a fetch failure
    assert_eq!(
        outcome.snapshot.sectors[0].stocks[0],
        Stock::unavailable(SecurityId::parse("1928").expect("valid code"))
    );
    assert_eq!(outcome.report.failed, 1);
}

#[tokio::test]
async fn when_pbr_is_implausible_value_is_kept_and_counted() {
    // Given: A page reporting PBR 150
    let page = "<table><tr><th>PBR</th><td>150.0倍</td></tr></table>";
    let http = StaticHttpClient::new().with_page(KABUTAN_1928, page);
    let aggregator = kabutan_aggregator(construction_catalog(), http);

    // When: The sweep runs
    let outcome = aggregator.run().await;

    // Then: The value survives and a warning is recorded
    assert_eq!(outcome.snapshot.sectors[0].stocks[0].pbr, Some(150.0));
    assert_eq!(outcome.report.warnings, 1);
}

#[tokio::test]
async fn when_change_is_a_placeholder_trend_is_flat() {
    // Given: A page whose change cell holds no number
    let page = r#"
        <table>
          <tr><th>PBR</th><td>1.10倍</td></tr>
          <tr><th>前日比</th><td>---</td></tr>
        </table>"#;
    let http = StaticHttpClient::new().with_page(KABUTAN_1928, page);
    let aggregator = kabutan_aggregator(construction_catalog(), http);

    // When: The sweep runs
    let outcome = aggregator.run().await;

    // Then: The record keeps its metric and reports no direction
    let stock = &outcome.snapshot.sectors[0].stocks[0];
    assert_eq!(stock.pbr, Some(1.10));
    assert_eq!(stock.trend, Trend::Flat);
}

// =============================================================================
// Sweep: Ordering and Shape
// =============================================================================

#[tokio::test]
async fn snapshot_follows_catalog_order() {
    // Given: A catalog whose order differs from code order
    let catalog = Catalog::from_json_str(
        r#"[
            {"code": "0283", "name": "不動産業", "leaders": ["8801", "8802"]},
            {"code": "0251", "name": "水産・農林業", "leaders": ["1332"]},
            {"code": "0256", "name": "食料品", "leaders": ["2914", "2802", "2502"]}
        ]"#,
    )
    .expect("valid catalog");
    let aggregator = kabutan_aggregator(catalog, StaticHttpClient::new());

    // When: The sweep runs and every page is missing
    let outcome = aggregator.run().await;

    // Then: Sectors and stocks appear exactly as listed
    let sector_codes: Vec<&str> = outcome
        .snapshot
        .sectors
        .iter()
        .map(|sector| sector.code.as_str())
        .collect();
    assert_eq!(sector_codes, ["0283", "0251", "0256"]);

    let stock_codes: Vec<&str> = outcome
        .snapshot
        .stocks()
        .map(|stock| stock.code.as_str())
        .collect();
    assert_eq!(stock_codes, ["8801", "8802", "1332", "2914", "2802", "2502"]);
}

#[tokio::test]
async fn built_in_catalog_produces_a_schema_complete_snapshot_when_everything_fails() {
    // Given: The built-in catalog and an upstream that knows no page
    let catalog = Catalog::tse33();
    let expected_securities = catalog.security_count();
    let aggregator = kabutan_aggregator(catalog, StaticHttpClient::new());

    // When: The sweep runs
    let outcome = aggregator.run().await;

    // Then: Every sector and every leader is present in degraded form
    assert_eq!(outcome.snapshot.sectors.len(), 33);
    assert_eq!(outcome.snapshot.stock_count(), expected_securities);
    assert_eq!(outcome.report.failed, expected_securities);
    assert!(outcome
        .snapshot
        .stocks()
        .all(|stock| !stock.has_metrics() && stock.trend == Trend::Flat));
}

// =============================================================================
// Source Selection and Request Spacing
// =============================================================================

#[tokio::test]
async fn configured_source_and_base_url_drive_the_sweep() {
    // Given: A configuration selecting minkabu behind a local mirror
    let config = PipelineConfig {
        source: SourceId::Minkabu,
        base_url: Some(String::from("http://127.0.0.1:9000/")),
        min_interval: Some(Duration::ZERO),
        ..PipelineConfig::default()
    };
    let http = Arc::new(StaticHttpClient::new().with_page(
        "http://127.0.0.1:9000/stock/1928",
        include_str!("fixtures/minkabu_1928.html"),
    ));
    let adapter = adapter_for(config.source, config.base_url.as_deref()).expect("valid adapter");
    let fetcher = FetchClient::new(http.clone(), config.fetch_policy());
    let aggregator = Aggregator::new(construction_catalog(), adapter, fetcher);

    // When: The sweep runs
    let outcome = aggregator.run().await;

    // Then: The mirror was asked once and its page was scanned
    assert_eq!(http.requests().len(), 1);
    let stock = &outcome.snapshot.sectors[0].stocks[0];
    assert_eq!(stock.name, "積水ハウス");
    assert_eq!(stock.per, Some(12.3));
    assert_eq!(stock.trend, Trend::Up);
}

#[tokio::test]
async fn requests_are_spaced_by_the_gate_interval() {
    // Given: Three securities and a 50ms gate
    let catalog = Catalog::from_json_str(
        r#"[{"code": "0254", "name": "建設業", "leaders": ["1801", "1928", "1925"]}]"#,
    )
    .expect("valid catalog");
    let fetcher = FetchClient::new(
        Arc::new(StaticHttpClient::new()),
        FetchPolicy::kabutan_default(),
    )
    .with_gate(RequestGate::fixed_interval(Duration::from_millis(50)));
    let adapter = Arc::new(TableAdapter::kabutan().expect("bundled layout"));
    let aggregator = Aggregator::new(catalog, adapter, fetcher);

    // When: The sweep runs
    let started = Instant::now();
    let outcome = aggregator.run().await;

    // Then: The second and third requests each waited for the gate
    assert_eq!(outcome.report.securities, 3);
    assert!(
        started.elapsed() >= Duration::from_millis(90),
        "sweep finished after {:?}",
        started.elapsed()
    );
}
