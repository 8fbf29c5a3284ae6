use serde::{Deserialize, Serialize};

/// The indicators this crate fetches. Each maps to a fixed id recognized by
/// the World Bank API; treat the ids as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    /// GDP (current US$)
    Gdp,
    /// GDP per capita (current US$)
    GdpPerCapita,
    /// Inflation, consumer prices (annual %)
    Cpi,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Gdp, Indicator::GdpPerCapita, Indicator::Cpi];

    /// Upstream indicator id, e.g. `NY.GDP.MKTP.CD`.
    pub fn code(self) -> &'static str {
        match self {
            Indicator::Gdp => "NY.GDP.MKTP.CD",
            Indicator::GdpPerCapita => "NY.GDP.PCAP.CD",
            Indicator::Cpi => "FP.CPI.TOTL.ZG",
        }
    }

    /// Human-readable name, used for chart titles and export rows.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Gdp => "GDP (current US$)",
            Indicator::GdpPerCapita => "GDP per capita (current US$)",
            Indicator::Cpi => "CPI inflation (annual %)",
        }
    }

    /// Unit shown on the Y axis.
    pub fn unit(self) -> &'static str {
        match self {
            Indicator::Gdp | Indicator::GdpPerCapita => "current US$",
            Indicator::Cpi => "annual %",
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive year range for a series query, sent as `date=start:end`.
/// Callers keep `start < end`; the pipeline does not enforce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn to_query_param(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

/// Metadata section returned by the API (position 0 of the envelope).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub page: u32,
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    /// Accept both and normalize to `u32`.
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    pub total: u32,
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as u32)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("negative value for u32"));
            }
            Ok(v as u32)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

/// `{id, value}` pair the API uses for nested indicator/country references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeName {
    pub id: String,
    pub value: String,
}

/// One row of the country-list endpoint. The API returns more fields
/// (region, income level, …); only the ones the resolver needs are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryRecord {
    /// Stable code used in series URLs (usually ISO3, e.g. `CHN`).
    pub id: String,
    #[serde(rename = "iso2Code", default)]
    pub iso2_code: String,
    /// Display name matched against user input.
    pub name: String,
}

/// Raw observation from the series endpoint (position 1 of the envelope).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub indicator: CodeName,
    pub country: CodeName,
    #[serde(default)]
    pub countryiso3code: String,
    pub date: String,
    pub value: Option<f64>,
}

/// Normalized time series for one (country, indicator) pair: parallel
/// `years`/`values` of equal length, years strictly increasing.
///
/// Produced fresh on every fetch and owned by the caller. Observations with a
/// missing value never appear here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub years: Vec<i32>,
    pub values: Vec<f64>,
}

impl Series {
    /// Normalize raw entries: drop rows with a null value or a date that is
    /// not a year, then sort ascending by year. The API returns observations
    /// in descending year order; the sort is stable, so equal years (which
    /// well-formed responses do not contain) keep their relative order.
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let mut rows: Vec<(i32, f64)> = entries
            .into_iter()
            .filter_map(|e| match (e.date.trim().parse::<i32>(), e.value) {
                (Ok(year), Some(value)) => Some((year, value)),
                _ => None,
            })
            .collect();
        rows.sort_by_key(|&(year, _)| year);

        let mut years = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for (year, value) in rows {
            years.push(year);
            values.push(value);
        }
        Series { years, values }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Paired (year, value) points, ascending by year.
    pub fn points(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }
}
