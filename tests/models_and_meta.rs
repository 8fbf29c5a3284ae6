use macroview::models::{CountryRecord, Meta};
use macroview::{Indicator, YearRange};

#[test]
fn meta_per_page_accepts_string_or_number() {
    // per_page as string
    let m: Meta =
        serde_json::from_str(r#"{"page":1,"pages":2,"per_page":"300","total":296}"#).unwrap();
    assert_eq!(m.per_page, 300);
    // per_page as number
    let m: Meta =
        serde_json::from_str(r#"{"page":1,"pages":2,"per_page":100,"total":150}"#).unwrap();
    assert_eq!(m.per_page, 100);
}

#[test]
fn country_record_parses_api_shape() {
    // The country endpoint carries far more fields; unknown ones are ignored.
    let r: CountryRecord = serde_json::from_str(
        r#"
    {
      "id": "CHN",
      "iso2Code": "CN",
      "name": "China",
      "region": {"id": "EAS", "iso2code": "Z4", "value": "East Asia & Pacific"},
      "capitalCity": "Beijing"
    }"#,
    )
    .unwrap();
    assert_eq!(r.id, "CHN");
    assert_eq!(r.iso2_code, "CN");
    assert_eq!(r.name, "China");
}

#[test]
fn indicator_codes_are_fixed() {
    assert_eq!(Indicator::Gdp.code(), "NY.GDP.MKTP.CD");
    assert_eq!(Indicator::GdpPerCapita.code(), "NY.GDP.PCAP.CD");
    assert_eq!(Indicator::Cpi.code(), "FP.CPI.TOTL.ZG");
    // Distinct by construction; the fetch contract is identical across them.
    assert_eq!(
        Indicator::ALL
            .iter()
            .map(|i| i.code())
            .collect::<std::collections::BTreeSet<_>>()
            .len(),
        3
    );
}

#[test]
fn indicator_labels_and_units() {
    assert_eq!(Indicator::Gdp.unit(), "current US$");
    assert_eq!(Indicator::Cpi.unit(), "annual %");
    assert_eq!(Indicator::GdpPerCapita.to_string(), Indicator::GdpPerCapita.label());
}

#[test]
fn year_range_query_param() {
    assert_eq!(YearRange::new(1990, 2022).to_query_param(), "1990:2022");
}
