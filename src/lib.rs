//! macroview
//!
//! A lightweight Rust library for fetching macroeconomic indicators (GDP,
//! GDP per capita, CPI) from the World Bank API and rendering them as line
//! charts. Pairs with the `macroview` CLI and the `macroview-gui` desktop app.
//!
//! ### Features
//! - Resolve free-text country names to stable API codes
//! - Fetch an indicator series for a year range, normalized to ascending
//!   years with missing observations dropped
//! - Save results as CSV or JSON
//! - Quick summary statistics (min, max, mean, median)
//! - SVG/PNG line charts, including a two-country comparison view
//!
//! ### Example
//! ```no_run
//! use macroview::{Client, CountryResolver, Indicator, YearRange};
//!
//! let client = Client::default();
//! let mut resolver = CountryResolver::new();
//! resolver.refresh(&client)?;
//!
//! let country = resolver.resolve("china").expect("unknown country");
//! let gdp = client.fetch_series(&country.id, Indicator::Gdp, YearRange::new(1990, 2022))?;
//! macroview::viz::plot_lines(
//!     &[macroview::viz::Line { label: country.name.clone(), series: &gdp }],
//!     "GDP of China",
//!     Indicator::Gdp.unit(),
//!     "gdp.svg",
//!     1000,
//!     600,
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::{Client, CountryResolver};
pub use error::{Error, Result};
pub use models::{CountryRecord, Indicator, Series, YearRange};
