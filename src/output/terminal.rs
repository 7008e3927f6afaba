use crate::core::ModuleStatus;
use crate::orchestrator::RunReport;
use colored::{ColoredString, Colorize};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

fn colored_status(status: ModuleStatus) -> ColoredString {
    match status {
        ModuleStatus::Success => status.label().green(),
        ModuleStatus::PartialSuccess => status.label().yellow(),
        ModuleStatus::Skipped => status.label().dimmed(),
        ModuleStatus::Failed | ModuleStatus::TimedOut => status.label().red().bold(),
    }
}

fn truncate(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let kept: String = message.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Per-module status table followed by a totals line.
pub fn render_summary_table(report: &RunReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Module", "Status", "Tests", "Correlated", "Time", "Detail"]);

    for result in report.sorted_by_name() {
        table.add_row(vec![
            Cell::new(result.name()),
            Cell::new(colored_status(result.status())),
            Cell::new(result.tests().len()).set_alignment(CellAlignment::Right),
            Cell::new(result.correlated_count()).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}s", result.elapsed().as_secs_f64())).set_alignment(CellAlignment::Right),
            Cell::new(truncate(result.error().unwrap_or(""), 60)),
        ]);
    }

    let totals = format!(
        "{} modules: {} ok, {} failed, {} skipped | {} tests, {} correlated | {:.1}s",
        report.results.len(),
        report.successful(),
        report.failed(),
        report.skipped(),
        report.total_tests(),
        report.aggregate.correlated_tests(),
        report.elapsed.as_secs_f64()
    );
    let totals = if report.has_failures() {
        totals.red().to_string()
    } else {
        totals.green().to_string()
    };

    format!("{table}\n{totals}")
}
