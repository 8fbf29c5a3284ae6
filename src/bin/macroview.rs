use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use macroview::viz::{Line, Panel};
use macroview::{Client, CountryRecord, CountryResolver, Indicator, Series, YearRange};
use macroview::{stats, storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "macroview",
    version,
    about = "Fetch & chart World Bank macro indicators (GDP, GDP per capita, CPI)"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known countries, optionally filtered by a name substring.
    Countries(CountriesArgs),
    /// Fetch one indicator for a country, optionally comparing a second one.
    Get(GetArgs),
    /// Render the GDP + GDP per capita overview chart for one country.
    Overview(OverviewArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum IndicatorArg {
    Gdp,
    GdpPerCapita,
    Cpi,
}

impl From<IndicatorArg> for Indicator {
    fn from(a: IndicatorArg) -> Self {
        match a {
            IndicatorArg::Gdp => Indicator::Gdp,
            IndicatorArg::GdpPerCapita => Indicator::GdpPerCapita,
            IndicatorArg::Cpi => Indicator::Cpi,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Show only countries whose name contains this text (case-insensitive).
    #[arg(short, long)]
    filter: Option<String>,
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Country name, matched case-insensitively as a substring (e.g. "china").
    #[arg(short, long)]
    country: String,
    /// Second country name to compare against.
    #[arg(long)]
    compare: Option<String>,
    /// Indicator to fetch.
    #[arg(short, long, value_enum, default_value_t = IndicatorArg::Gdp)]
    indicator: IndicatorArg,
    /// Year range as YYYY:YYYY (start must be before end).
    #[arg(short = 'd', long, default_value = "1990:2022", value_parser = parse_range)]
    date: YearRange,
    /// Save observations to a file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Locale for chart tick labels (e.g. "en" or "de").
    #[arg(long, default_value = "en")]
    locale: String,
    /// Print summary statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct OverviewArgs {
    /// Country name, matched case-insensitively as a substring.
    #[arg(short, long)]
    country: String,
    /// Year range as YYYY:YYYY (start must be before end).
    #[arg(short = 'd', long, default_value = "1990:2022", value_parser = parse_range)]
    date: YearRange,
    /// Chart output path (.svg or .png).
    #[arg(long, default_value = "overview.png")]
    plot: PathBuf,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 800).
    #[arg(long, default_value_t = 800)]
    height: u32,
    /// Locale for chart tick labels (e.g. "en" or "de").
    #[arg(long, default_value = "en")]
    locale: String,
}

fn parse_range(s: &str) -> Result<YearRange, String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| "expected YYYY:YYYY".to_string())?;
    let start = a
        .trim()
        .parse::<i32>()
        .map_err(|_| "invalid start year".to_string())?;
    let end = b
        .trim()
        .parse::<i32>()
        .map_err(|_| "invalid end year".to_string())?;
    if start >= end {
        return Err("start year must be before end year".to_string());
    }
    Ok(YearRange { start, end })
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Countries(args) => cmd_countries(args),
        Command::Get(args) => cmd_get(args),
        Command::Overview(args) => cmd_overview(args),
    }
}

fn cmd_countries(args: CountriesArgs) -> Result<()> {
    let client = Client::default();
    let records = client.list_countries()?;
    let needle = args.filter.unwrap_or_default().to_lowercase();
    let mut shown = 0usize;
    for r in &records {
        if needle.is_empty() || r.name.to_lowercase().contains(&needle) {
            println!("{}\t{}\t{}", r.id, r.iso2_code, r.name);
            shown += 1;
        }
    }
    eprintln!("{} of {} countries", shown, records.len());
    Ok(())
}

fn resolve_or_bail<'a>(resolver: &'a CountryResolver, name: &str) -> Result<&'a CountryRecord> {
    resolver
        .resolve(name)
        .ok_or_else(|| anyhow::anyhow!("country not found: {}", name))
}

fn cmd_get(args: GetArgs) -> Result<()> {
    let client = Client::default();
    let mut resolver = CountryResolver::new();
    resolver.refresh(&client)?;

    let indicator: Indicator = args.indicator.into();
    let country = resolve_or_bail(&resolver, &args.country)?.clone();
    let mut sets: Vec<(CountryRecord, Series)> = Vec::new();

    let series = client.fetch_series(&country.id, indicator, args.date)?;
    sets.push((country, series));

    if let Some(other) = args.compare.as_deref() {
        let other = resolve_or_bail(&resolver, other)?.clone();
        let series = client.fetch_series(&other.id, indicator, args.date)?;
        sets.push((other, series));
    }

    if sets.iter().all(|(_, s)| s.is_empty()) {
        eprintln!(
            "No data for {} in {}",
            indicator.label(),
            args.date.to_query_param()
        );
        return Ok(());
    }

    for (country, series) in &sets {
        println!("# {} [{}] • {}", country.name, country.id, indicator.label());
        for (year, value) in series.points() {
            println!("{}\t{}", year, fmt_opt(Some(value)));
        }
    }

    if let Some(path) = args.out.as_ref() {
        let export: Vec<(&CountryRecord, Indicator, &Series)> =
            sets.iter().map(|(c, s)| (c, indicator, s)).collect();
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&export, path)?,
            "json" => storage::save_json(&export, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        let rows: usize = sets.iter().map(|(_, s)| s.len()).sum();
        eprintln!("Saved {} rows to {}", rows, path.display());
    }

    if let Some(plot_path) = args.plot.as_ref() {
        let lines: Vec<Line<'_>> = sets
            .iter()
            .map(|(c, s)| Line {
                label: c.name.clone(),
                series: s,
            })
            .collect();
        viz::plot_lines_locale(
            &lines,
            indicator.label(),
            indicator.unit(),
            plot_path,
            args.width,
            args.height,
            &args.locale,
        )?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }

    if args.stats {
        for (country, series) in &sets {
            let s = stats::summarize(series);
            println!(
                "{} • {}  count={}  min={} max={} mean={} median={}",
                country.id,
                indicator.code(),
                s.count,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }

    Ok(())
}

fn cmd_overview(args: OverviewArgs) -> Result<()> {
    let client = Client::default();
    let mut resolver = CountryResolver::new();
    resolver.refresh(&client)?;

    let country = resolve_or_bail(&resolver, &args.country)?.clone();
    let gdp = client.fetch_series(&country.id, Indicator::Gdp, args.date)?;
    let per_capita = client.fetch_series(&country.id, Indicator::GdpPerCapita, args.date)?;

    if gdp.is_empty() && per_capita.is_empty() {
        eprintln!(
            "No GDP data for {} in {}",
            country.name,
            args.date.to_query_param()
        );
        return Ok(());
    }

    let mut panels = Vec::new();
    if !gdp.is_empty() {
        panels.push(Panel {
            title: format!("GDP of {}", country.name),
            y_desc: Indicator::Gdp.unit().to_string(),
            lines: vec![Line {
                label: country.name.clone(),
                series: &gdp,
            }],
        });
    }
    if !per_capita.is_empty() {
        panels.push(Panel {
            title: format!("GDP per capita of {}", country.name),
            y_desc: Indicator::GdpPerCapita.unit().to_string(),
            lines: vec![Line {
                label: country.name.clone(),
                series: &per_capita,
            }],
        });
    }

    viz::plot_panels_locale(&panels, &args.plot, args.width, args.height, &args.locale)?;
    eprintln!("Wrote plot to {}", args.plot.display());
    Ok(())
}
