use crate::models::{CountryRecord, Indicator, Series};
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One exported observation: a series row flattened with its country and
/// indicator context.
#[derive(Debug, Serialize)]
struct Row<'a> {
    country_id: &'a str,
    country_name: &'a str,
    indicator_id: &'static str,
    indicator_name: &'static str,
    year: i32,
    value: f64,
}

fn rows<'a>(sets: &'a [(&'a CountryRecord, Indicator, &'a Series)]) -> Vec<Row<'a>> {
    let mut out = Vec::new();
    for (country, indicator, series) in sets {
        for (year, value) in series.points() {
            out.push(Row {
                country_id: &country.id,
                country_name: &country.name,
                indicator_id: indicator.code(),
                indicator_name: indicator.label(),
                year,
                value,
            });
        }
    }
    out
}

/// Save fetched series as CSV with header.
pub fn save_csv<P: AsRef<Path>>(
    sets: &[(&CountryRecord, Indicator, &Series)],
    path: P,
) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for row in rows(sets) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save fetched series as a pretty JSON array of rows.
pub fn save_json<P: AsRef<Path>>(
    sets: &[(&CountryRecord, Indicator, &Series)],
    path: P,
) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&rows(sets))?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let country = CountryRecord {
            id: "DEU".into(),
            iso2_code: "DE".into(),
            name: "Germany".into(),
        };
        let series = Series {
            years: vec![2019, 2020],
            values: vec![3.9e12, 3.8e12],
        };
        let sets = [(&country, Indicator::Gdp, &series)];
        save_csv(&sets, &csvp).unwrap();
        save_json(&sets, &jsonp).unwrap();

        let csv_text = std::fs::read_to_string(&csvp).unwrap();
        assert!(csv_text.starts_with("country_id,country_name,indicator_id"));
        assert!(csv_text.contains("NY.GDP.MKTP.CD"));

        let json_text = std::fs::read_to_string(&jsonp).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json_text).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }
}
