//! Glue between the command line and the backend: registry setup and
//! plain-text rendering of backend payloads.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pension_core::{
    AnalysisReport, AssistantProfile, BackendRegistry, CalculationDetail, CalculationPage,
    ExportFormat, Statistics, YearValue,
};
use pension_http::HttpBackendFactory;

/// Registry with every backend this binary ships.
pub fn build_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register(Box::new(HttpBackendFactory));
    registry
}

/// Where a downloaded document lands when the user gives no path.
pub fn default_output_path(stem: &str, format: ExportFormat) -> PathBuf {
    PathBuf::from(format!("{stem}.{}", format.extension()))
}

pub fn write_document(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("cannot write '{}'", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "document saved");
    Ok(())
}

fn latest_line(out: &mut String, label: &str, series: &[YearValue], unit: &str) {
    match Statistics::latest(series) {
        Some(point) => {
            let _ = writeln!(out, "{label:<22}{:>10.2}{unit} ({})", point.value, point.year);
        }
        None => {
            let _ = writeln!(out, "{label:<22}{:>10}", "n/a");
        }
    }
}

/// Most recent value of each series.
pub fn render_statistics(stats: &Statistics) -> String {
    let mut out = String::new();
    latest_line(&mut out, "Wage growth", &stats.growth_rate, "%");
    latest_line(&mut out, "Average wage", &stats.average_wage, " PLN");
    latest_line(&mut out, "Valorization", &stats.valorization, "%");
    latest_line(&mut out, "Inflation", &stats.inflation, "%");
    latest_line(&mut out, "Life expectancy (M)", &stats.life_expectancy.male, " y");
    latest_line(&mut out, "Life expectancy (F)", &stats.life_expectancy.female, " y");
    if let Some(meta) = &stats.meta {
        for (key, value) in meta {
            let _ = writeln!(out, "{key}: {value}");
        }
    }
    out
}

pub fn render_detail(detail: &CalculationDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Calculation {} ({} {})",
        detail.calculation_id, detail.calculation_date, detail.calculation_time
    );
    let _ = writeln!(out, "Sex / age:        {} / {}", detail.sex, detail.age);
    let _ = writeln!(out, "Salary:           {} PLN", detail.salary);
    let _ = writeln!(out, "Expected pension: {} PLN", detail.expected_pension);
    let _ = writeln!(
        out,
        "Sick leave:       {}",
        if detail.is_sick_leave_included { "included" } else { "not included" }
    );
    if let Some(nominal) = &detail.nominal_pension {
        let _ = writeln!(out, "Nominal pension:  {nominal} PLN");
    }
    if let Some(real) = &detail.real_pension {
        let _ = writeln!(out, "Real pension:     {real} PLN");
    }
    if let (Some(start), Some(end)) = (detail.year_work_start, detail.year_desired_retirement) {
        let _ = writeln!(out, "Career:           {start} - {end}");
    }
    if let Some(code) = &detail.postal_code {
        let _ = writeln!(out, "Postal code:      {code}");
    }
    out
}

/// One line per stored calculation plus a paging footer.
pub fn render_calculation_page(page: &CalculationPage) -> String {
    let mut out = String::new();
    if page.submissions.is_empty() {
        let _ = writeln!(out, "No calculations.");
    }
    for item in &page.submissions {
        let _ = writeln!(
            out,
            "{:<38} {} {}  {:<6} {:>3}  {:>10} PLN",
            item.calculation_id,
            item.calculation_date,
            item.calculation_time,
            item.sex.as_str(),
            item.age,
            item.salary
        );
    }
    let _ = writeln!(
        out,
        "Page {} of {} ({} total)",
        page.page, page.total_pages, page.total_items
    );
    out
}

pub fn render_profile(profile: &AssistantProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {}", profile.name, profile.description);
    let _ = writeln!(out, "Personality: {}", profile.personality);
    for capability in &profile.capabilities {
        let _ = writeln!(out, "  - {capability}");
    }
    let _ = writeln!(out, "{}", profile.greeting);
    out
}

pub fn render_analysis(report: &AnalysisReport) -> String {
    format!("{}\n\n{}\n", report.basic_summary, report.detailed_analysis)
}
