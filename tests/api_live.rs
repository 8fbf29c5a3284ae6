//! Live API tests. Run with: `cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use macroview::{Client, CountryResolver, Indicator, YearRange};

#[test]
fn country_table_fits_one_page() {
    let client = Client::default();
    let records = client.list_countries().unwrap();
    assert!(records.len() >= 200);
    assert!(records.iter().any(|r| r.id == "DEU"));
}

#[test]
fn resolves_germany_by_name() {
    let client = Client::default();
    let mut resolver = CountryResolver::new();
    resolver.refresh(&client).unwrap();
    let record = resolver.resolve("germany").unwrap();
    assert_eq!(record.id, "DEU");
}

#[test]
fn fetch_small_gdp_range() {
    let client = Client::default();
    let series = client
        .fetch_series("DEU", Indicator::Gdp, YearRange::new(2019, 2021))
        .unwrap();
    assert!(!series.is_empty());
    assert_eq!(series.years.len(), series.values.len());
    assert!(series.years.windows(2).all(|w| w[0] < w[1]));
    assert!(series.years.iter().all(|y| (2019..=2021).contains(y)));
}

#[test]
fn unknown_country_code_yields_empty_series() {
    let client = Client::default();
    let series = client
        .fetch_series("ZZZ", Indicator::Gdp, YearRange::new(1990, 2000))
        .unwrap();
    assert!(series.is_empty());
}

#[test]
fn fetch_is_idempotent_against_stable_upstream() {
    let client = Client::default();
    let range = YearRange::new(2000, 2005);
    let a = client
        .fetch_series("FRA", Indicator::Cpi, range)
        .unwrap();
    let b = client
        .fetch_series("FRA", Indicator::Cpi, range)
        .unwrap();
    assert_eq!(a, b);
}
