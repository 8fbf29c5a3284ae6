use macroview::{CountryRecord, CountryResolver};

fn record(id: &str, iso2: &str, name: &str) -> CountryRecord {
    CountryRecord {
        id: id.into(),
        iso2_code: iso2.into(),
        name: name.into(),
    }
}

#[test]
fn resolves_full_name_case_insensitively() {
    let resolver = CountryResolver::from_records(vec![
        record("CN", "CN", "China"),
        record("CHL", "CL", "Chile"),
    ]);
    assert_eq!(resolver.resolve("china").unwrap().id, "CN");
    assert_eq!(resolver.resolve("CHINA").unwrap().id, "CN");
    assert_eq!(resolver.resolve("ChIna").unwrap().id, "CN");
}

#[test]
fn ambiguous_input_takes_first_match_in_list_order() {
    // "chi" is a substring of both names; the API's ordering decides, not
    // any scoring.
    let resolver = CountryResolver::from_records(vec![
        record("CN", "CN", "China"),
        record("CHL", "CL", "Chile"),
    ]);
    assert_eq!(resolver.resolve("chi").unwrap().id, "CN");

    let reversed = CountryResolver::from_records(vec![
        record("CHL", "CL", "Chile"),
        record("CN", "CN", "China"),
    ]);
    assert_eq!(reversed.resolve("chi").unwrap().id, "CHL");
}

#[test]
fn matches_inner_substrings_not_just_prefixes() {
    let resolver = CountryResolver::from_records(vec![
        record("DEU", "DE", "Germany"),
        record("USA", "US", "United States"),
    ]);
    assert_eq!(resolver.resolve("state").unwrap().id, "USA");
}

#[test]
fn unknown_name_returns_none() {
    let resolver = CountryResolver::from_records(vec![record("DEU", "DE", "Germany")]);
    assert!(resolver.resolve("atlantis").is_none());
}

#[test]
fn empty_list_resolves_nothing() {
    let resolver = CountryResolver::new();
    assert!(resolver.resolve("germany").is_none());
    assert!(resolver.records().is_empty());
}
