//! Summary report generator for shell output.

use super::{ReportFormat, ReportGenerator};
use crate::diff::{DiffResult, DiffSummary};
use crate::error::Result;
use crate::model::{Change, ChangeType, Impact};
use crate::pipeline::{BatchResult, UnitOutcome};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn impact_color(impact: Impact) -> &'static str {
    match impact {
        Impact::BreakingPublicApi => "red",
        Impact::BreakingInternalApi => "yellow",
        Impact::NonBreaking => "green",
        Impact::FormattingOnly => "dim",
    }
}

const fn type_symbol(change_type: ChangeType) -> &'static str {
    match change_type {
        ChangeType::Added => "+",
        ChangeType::Removed => "-",
        ChangeType::Modified => "~",
        ChangeType::Moved => ">",
        ChangeType::Renamed => "=",
        ChangeType::Unchanged => " ",
    }
}

/// Summary reporter for shell output
#[derive(Debug, Clone, Copy)]
pub struct SummaryReporter {
    colored: bool,
}

impl SummaryReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn push_counts(&self, lines: &mut Vec<String>, summary: &DiffSummary) {
        if summary.total_changes == 0 {
            lines.push(format!("  {}", self.color("No changes", "dim")));
            return;
        }
        let by_type: Vec<String> = ChangeType::ALL
            .iter()
            .filter(|t| **t != ChangeType::Unchanged)
            .filter_map(|t| {
                let count = summary.count_for_type(*t);
                (count > 0).then(|| format!("{count} {}", t.as_str().to_lowercase()))
            })
            .collect();
        lines.push(format!("  {} ({})", summary.total_changes, by_type.join(", ")));

        for impact in Impact::ALL.iter().rev() {
            let count = summary.count_for_impact(*impact);
            if count > 0 {
                lines.push(format!(
                    "  {:<22}{}",
                    self.color(impact.as_str(), impact_color(*impact)),
                    count
                ));
            }
        }
    }

    fn push_change(&self, lines: &mut Vec<String>, change: &Change, depth: usize) {
        let indent = "  ".repeat(depth + 1);
        let name = match (&change.old_name, change.change_type) {
            (Some(old), ChangeType::Renamed) => format!("{old} -> {}", change.display_name()),
            _ => change.display_name().to_string(),
        };
        let mut line = format!(
            "{indent}{} [{}] {} {} {}",
            type_symbol(change.change_type),
            self.color(change.impact.as_str(), impact_color(change.impact)),
            change.change_type,
            change.kind,
            name
        );
        if !change.applicable_configurations.is_empty() {
            line.push_str(&self.color(&format!("  ({})", change.applicable_configurations.join(", ")), "cyan"));
        }
        lines.push(line);

        for caveat in &change.caveats {
            lines.push(format!("{indent}    ! {caveat}"));
        }
        if !change.whitespace_issues.is_empty() {
            let issues: Vec<String> = change.whitespace_issues.iter().map(|i| format!("{i:?}")).collect();
            lines.push(format!("{indent}    whitespace: {}", issues.join(", ")));
        }
        for child in &change.children {
            self.push_change(lines, child, depth + 1);
        }
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_diff_report(&self, result: &DiffResult) -> Result<String> {
        let mut lines = Vec::new();
        lines.push(self.color("Structural Diff Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if let Some(path) = &result.path {
            lines.push(format!("{}  {}", self.color("File:", "cyan"), path));
        }
        if !result.analyzed_configurations.is_empty() {
            lines.push(format!(
                "{}  {}",
                self.color("Configurations:", "cyan"),
                result.analyzed_configurations.join(", ")
            ));
        }

        lines.push(String::new());
        lines.push(self.color("Changes:", "bold"));
        self.push_counts(&mut lines, &result.summary);

        if !result.changes.is_empty() {
            lines.push(String::new());
            for change in &result.changes {
                self.push_change(&mut lines, change, 0);
            }
        }

        Ok(lines.join("\n"))
    }

    fn generate_batch_report(&self, batch: &BatchResult) -> Result<String> {
        let mut lines = Vec::new();
        lines.push(self.color("Batch Diff Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        lines.push(format!(
            "{}  {} compared, {} failed",
            self.color("Files:", "cyan"),
            batch.summary.succeeded,
            batch.summary.failed
        ));
        lines.push(String::new());
        lines.push(self.color("Changes:", "bold"));
        self.push_counts(&mut lines, &batch.summary.changes);

        for unit in &batch.units {
            lines.push(String::new());
            match &unit.outcome {
                UnitOutcome::Compared { result } => {
                    lines.push(format!(
                        "{} ({} changes)",
                        self.color(&unit.path, "bold"),
                        result.summary.total_changes
                    ));
                    for change in &result.changes {
                        self.push_change(&mut lines, change, 0);
                    }
                }
                UnitOutcome::Failed { error } => {
                    lines.push(format!("{} {}", self.color(&unit.path, "bold"), self.color("failed", "red")));
                    lines.push(format!("  {error}"));
                }
            }
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
