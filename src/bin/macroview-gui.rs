/*!
 * Desktop application for macroview: look up a country by name, fetch GDP,
 * GDP per capita, or CPI over a year range, and render a line chart,
 * optionally comparing a second country.
 *
 * The fetch runs on a background thread so the UI stays responsive; results
 * come back over an mpsc channel and are picked up during repaint.
 */

use anyhow::Result;
use eframe::egui;
use macroview::viz::Line;
use macroview::{Client, CountryResolver, Indicator, Series, YearRange, storage, viz};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([560.0, 400.0])
            .with_title("Macroview"),
        ..Default::default()
    };

    eframe::run_native(
        "Macroview",
        options,
        Box::new(|_cc| Ok(Box::new(MacroviewApp::new()))),
    )
}

/// Main application state
struct MacroviewApp {
    // Input fields
    country: String,
    compare: String,
    indicator: Indicator,
    date_from: i32,
    date_until: i32,

    // Output options
    output_path: String,
    chart_format: ChartFormat,
    chart_width: u32,
    chart_height: u32,
    export_data: bool,
    export_format: ExportFormat,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background operation
    operation_receiver: Option<mpsc::Receiver<OperationResult>>,
}

#[derive(Debug, Clone, PartialEq)]
enum ChartFormat {
    Png,
    Svg,
}

#[derive(Debug, Clone, PartialEq)]
enum ExportFormat {
    Csv,
    Json,
    Both,
}

#[derive(Debug)]
enum OperationResult {
    Success(String),
    Error(String),
}

impl MacroviewApp {
    fn new() -> Self {
        // Default to user's home directory for output
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        Self {
            country: "China".to_string(),
            compare: String::new(),
            indicator: Indicator::Gdp,
            date_from: 1990,
            date_until: 2022,

            output_path: home_dir,
            chart_format: ChartFormat::Png,
            chart_width: 1000,
            chart_height: 600,
            export_data: false,
            export_format: ExportFormat::Csv,

            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            operation_receiver: None,
        }
    }

    fn validate_inputs(&self) -> Result<()> {
        if self.country.trim().is_empty() {
            anyhow::bail!("Please enter a country name (e.g. China)");
        }

        if self.date_from >= self.date_until {
            anyhow::bail!("Start year must be before end year");
        }

        if self.date_from < 1960 || self.date_until > 2030 {
            anyhow::bail!("Years should be between 1960 and 2030");
        }

        if self.output_path.trim().is_empty() {
            anyhow::bail!("Please specify an output directory");
        }

        if self.chart_width < 200 || self.chart_width > 3000 {
            anyhow::bail!("Chart width must be between 200 and 3000 pixels");
        }
        if self.chart_height < 200 || self.chart_height > 3000 {
            anyhow::bail!("Chart height must be between 200 and 3000 pixels");
        }

        Ok(())
    }

    fn start_operation(&mut self) {
        if let Err(err) = self.validate_inputs() {
            self.error_message = format!("Validation error: {}", err);
            return;
        }

        self.is_loading = true;
        self.error_message.clear();
        self.status_message = format!("Fetching {} data...", self.indicator.label());

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some(receiver);

        // Clone the data we need for the background thread
        let config = OperationConfig {
            country: self.country.trim().to_string(),
            compare: {
                let c = self.compare.trim().to_string();
                if c.is_empty() { None } else { Some(c) }
            },
            indicator: self.indicator,
            range: YearRange::new(self.date_from, self.date_until),
            output_path: self.output_path.clone(),
            chart_format: self.chart_format.clone(),
            chart_width: self.chart_width,
            chart_height: self.chart_height,
            export_format: if self.export_data {
                Some(self.export_format.clone())
            } else {
                None
            },
        };

        // Spawn background thread for the fetch + render
        thread::spawn(move || {
            let result = perform_operation(config);
            let _ = sender.send(result);
        });
    }

    fn check_operation_result(&mut self) {
        if let Some(receiver) = &self.operation_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.operation_receiver = None;

            match result {
                OperationResult::Success(message) => {
                    self.status_message = message;
                    self.error_message.clear();
                }
                OperationResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }
}

impl eframe::App for MacroviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background operations
        self.check_operation_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Macroview");
                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.label("Data Selection");
                    ui.add_space(5.0);

                    ui.horizontal(|ui| {
                        ui.label("Country:");
                        ui.text_edit_singleline(&mut self.country)
                            .on_hover_text("Country name, matched as a substring (e.g. china)");
                    });

                    ui.horizontal(|ui| {
                        ui.label("Compare with:");
                        ui.text_edit_singleline(&mut self.compare)
                            .on_hover_text("Optional second country to draw on the same chart");
                    });

                    ui.horizontal(|ui| {
                        ui.label("Indicator:");
                        ui.radio_value(&mut self.indicator, Indicator::Gdp, "GDP");
                        ui.radio_value(&mut self.indicator, Indicator::GdpPerCapita, "GDP per capita");
                        ui.radio_value(&mut self.indicator, Indicator::Cpi, "CPI");
                    });

                    ui.horizontal(|ui| {
                        ui.label("Year range:");
                        ui.add(egui::DragValue::new(&mut self.date_from).range(1960..=2030));
                        ui.label("to");
                        ui.add(egui::DragValue::new(&mut self.date_until).range(1960..=2030));
                    });
                });

                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.label("Output");
                    ui.add_space(5.0);

                    ui.horizontal(|ui| {
                        ui.label("Output path:");
                        ui.text_edit_singleline(&mut self.output_path);
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_folder() {
                            self.output_path = path.to_string_lossy().to_string();
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Chart format:");
                        ui.radio_value(&mut self.chart_format, ChartFormat::Png, "PNG");
                        ui.radio_value(&mut self.chart_format, ChartFormat::Svg, "SVG");
                    });

                    ui.horizontal(|ui| {
                        ui.label("Dimensions:");
                        ui.add(egui::DragValue::new(&mut self.chart_width).range(200..=3000));
                        ui.label("×");
                        ui.add(egui::DragValue::new(&mut self.chart_height).range(200..=3000));
                        ui.label("pixels");
                    });

                    ui.checkbox(&mut self.export_data, "Export observations");

                    if self.export_data {
                        ui.horizontal(|ui| {
                            ui.label("Format:");
                            ui.radio_value(&mut self.export_format, ExportFormat::Csv, "CSV");
                            ui.radio_value(&mut self.export_format, ExportFormat::Json, "JSON");
                            ui.radio_value(&mut self.export_format, ExportFormat::Both, "Both");
                        });
                    }
                });

                ui.add_space(15.0);

                ui.horizontal(|ui| {
                    if ui.add_enabled(!self.is_loading, egui::Button::new("Fetch & Chart")).clicked() {
                        self.start_operation();
                    }

                    if self.is_loading {
                        ui.spinner();
                        ui.label("Working...");
                    }
                });

                ui.add_space(10.0);

                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }

                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }
            });
        });
    }
}

#[derive(Debug)]
struct OperationConfig {
    country: String,
    compare: Option<String>,
    indicator: Indicator,
    range: YearRange,
    output_path: String,
    chart_format: ChartFormat,
    chart_width: u32,
    chart_height: u32,
    export_format: Option<ExportFormat>,
}

fn perform_operation(config: OperationConfig) -> OperationResult {
    let client = Client::default();
    let mut resolver = CountryResolver::new();
    if let Err(err) = resolver.refresh(&client) {
        return OperationResult::Error(format!("Failed to load country list: {}", err));
    }

    let mut names = vec![config.country.clone()];
    if let Some(other) = &config.compare {
        names.push(other.clone());
    }

    let mut sets: Vec<(macroview::CountryRecord, Series)> = Vec::new();
    for name in &names {
        let Some(record) = resolver.resolve(name) else {
            return OperationResult::Error(format!("Country not found: {}", name));
        };
        let record = record.clone();
        match client.fetch_series(&record.id, config.indicator, config.range) {
            Ok(series) => sets.push((record, series)),
            Err(err) => {
                return OperationResult::Error(format!(
                    "Failed to fetch data for {}: {}",
                    record.name, err
                ));
            }
        }
    }

    if sets.iter().all(|(_, s)| s.is_empty()) {
        return OperationResult::Error(format!(
            "No {} data found for {} in {}",
            config.indicator.label(),
            names.join(" / "),
            config.range.to_query_param()
        ));
    }

    let output_dir = PathBuf::from(&config.output_path);
    let mut output_files = Vec::new();

    // Chart
    let lines: Vec<Line<'_>> = sets
        .iter()
        .map(|(c, s)| Line {
            label: c.name.clone(),
            series: s,
        })
        .collect();
    let extension = match config.chart_format {
        ChartFormat::Png => "png",
        ChartFormat::Svg => "svg",
    };
    let chart_path = output_dir.join(format!("macroview_chart.{}", extension));
    if let Err(err) = viz::plot_lines(
        &lines,
        config.indicator.label(),
        config.indicator.unit(),
        &chart_path,
        config.chart_width,
        config.chart_height,
    ) {
        return OperationResult::Error(format!("Failed to create chart: {}", err));
    }
    output_files.push(chart_path.to_string_lossy().to_string());

    // Data export
    if let Some(format) = &config.export_format {
        let export: Vec<(&macroview::CountryRecord, Indicator, &Series)> = sets
            .iter()
            .map(|(c, s)| (c, config.indicator, s))
            .collect();

        if matches!(format, ExportFormat::Csv | ExportFormat::Both) {
            let csv_path = output_dir.join("macroview_data.csv");
            if let Err(err) = storage::save_csv(&export, &csv_path) {
                return OperationResult::Error(format!("Failed to save CSV: {}", err));
            }
            output_files.push(csv_path.to_string_lossy().to_string());
        }

        if matches!(format, ExportFormat::Json | ExportFormat::Both) {
            let json_path = output_dir.join("macroview_data.json");
            if let Err(err) = storage::save_json(&export, &json_path) {
                return OperationResult::Error(format!("Failed to save JSON: {}", err));
            }
            output_files.push(json_path.to_string_lossy().to_string());
        }
    }

    let observations: usize = sets.iter().map(|(_, s)| s.len()).sum();
    let mut message = format!("Fetched {} observations.", observations);
    if !output_files.is_empty() {
        message.push_str(&format!("\n\nFiles created:\n{}", output_files.join("\n")));
    }

    OperationResult::Success(message)
}
