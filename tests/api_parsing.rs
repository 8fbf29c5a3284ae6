use macroview::api::normalize_series_response;
use macroview::models::{Entry, Meta, Series};

const SAMPLE: &str = r#"
[
  {"page":1,"pages":1,"per_page":"100","total":2},
  [
    {
      "indicator":{"id":"NY.GDP.MKTP.CD","value":"GDP (current US$)"},
      "country":{"id":"CN","value":"China"},
      "countryiso3code":"CHN",
      "date":"2020",
      "value":14687744162801.1,
      "unit":"",
      "obs_status":"",
      "decimal":0
    },
    {
      "indicator":{"id":"NY.GDP.MKTP.CD","value":"GDP (current US$)"},
      "country":{"id":"CN","value":"China"},
      "countryiso3code":"CHN",
      "date":"2019",
      "value":14279937467431.0,
      "unit":"",
      "obs_status":"",
      "decimal":0
    }
  ]
]
"#;

#[test]
fn parse_sample_envelope() {
    let v: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    let arr = v.as_array().unwrap();
    let meta: Meta = serde_json::from_value(arr[0].clone()).unwrap();
    assert_eq!(meta.page, 1);
    assert_eq!(meta.pages, 1);
    assert_eq!(meta.per_page, 100);
    assert_eq!(meta.total, 2);

    let entries: Vec<Entry> = serde_json::from_value(arr[1].clone()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].country.id, "CN");
    assert_eq!(entries[0].countryiso3code, "CHN");

    let series = Series::from_entries(entries);
    assert_eq!(series.years, vec![2019, 2020]);
    assert_eq!(series.values[1], 14687744162801.1);
}

#[test]
fn descending_input_is_sorted_ascending() {
    let entries: Vec<Entry> = serde_json::from_str(
        r#"[
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2000","value":5.0},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"1995","value":3.0}
        ]"#,
    )
    .unwrap();
    let series = Series::from_entries(entries);
    assert_eq!(series.years, vec![1995, 2000]);
    assert_eq!(series.values, vec![3.0, 5.0]);
}

#[test]
fn null_values_are_dropped() {
    let entries: Vec<Entry> = serde_json::from_str(
        r#"[
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2003","value":null},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2002","value":2.5},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2001","value":null},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2000","value":1.5}
        ]"#,
    )
    .unwrap();
    let series = Series::from_entries(entries);
    assert_eq!(series.years, vec![2000, 2002]);
    assert_eq!(series.values, vec![1.5, 2.5]);
}

#[test]
fn non_empty_series_has_strictly_increasing_parallel_sequences() {
    let entries: Vec<Entry> = serde_json::from_str(
        r#"[
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2010","value":10.0},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2006","value":null},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2008","value":8.0},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2004","value":4.0},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2012","value":null}
        ]"#,
    )
    .unwrap();
    let series = Series::from_entries(entries);
    assert_eq!(series.years.len(), series.values.len());
    assert!(series.years.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn empty_records_yield_empty_series() {
    // An unknown country code still gets a well-formed envelope with no rows.
    let v: serde_json::Value =
        serde_json::from_str(r#"[{"page":1,"pages":0,"per_page":100,"total":0},[]]"#).unwrap();
    let series = normalize_series_response(v);
    assert!(series.is_empty());
    assert_eq!(series.years, Vec::<i32>::new());
    assert_eq!(series.values, Vec::<f64>::new());
}

#[test]
fn malformed_envelopes_fail_soft_to_empty() {
    for body in [
        "3",
        "{}",
        "\"nope\"",
        r#"[{"message":[{"id":"120","value":"Invalid value"}]}]"#,
        r#"[{"page":1,"pages":1,"per_page":100,"total":0}]"#,
        r#"[{"page":1,"pages":1,"per_page":100,"total":0}, 42]"#,
    ] {
        let v: serde_json::Value = serde_json::from_str(body).unwrap();
        assert!(normalize_series_response(v).is_empty(), "body: {body}");
    }
}

#[test]
fn entries_with_non_year_dates_are_dropped() {
    let entries: Vec<Entry> = serde_json::from_str(
        r#"[
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"","value":1.0},
          {"indicator":{"id":"I","value":"i"},"country":{"id":"C","value":"c"},"countryiso3code":"CCC","date":"2015","value":2.0}
        ]"#,
    )
    .unwrap();
    let series = Series::from_entries(entries);
    assert_eq!(series.years, vec![2015]);
    assert_eq!(series.values, vec![2.0]);
}

#[test]
fn normalization_is_deterministic() {
    let v: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    let a = normalize_series_response(v.clone());
    let b = normalize_series_response(v);
    assert_eq!(a, b);
}
