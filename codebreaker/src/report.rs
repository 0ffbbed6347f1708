//! Boxed text tables for analysis reports

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Pass,
    Warn,
    Fail,
}

impl Severity {
    fn indicator(&self) -> &'static str {
        match self {
            Severity::Pass => "✔",
            Severity::Warn => "⚠",
            Severity::Fail => "✖",
        }
    }

    fn worst(a: Severity, b: Severity) -> Severity {
        match (a, b) {
            (Severity::Fail, _) | (_, Severity::Fail) => Severity::Fail,
            (Severity::Warn, _) | (_, Severity::Warn) => Severity::Warn,
            _ => Severity::Pass,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Severity::Pass => "PASS",
            Severity::Warn => "WARN",
            Severity::Fail => "FAIL",
        };
        write!(f, "{}", text)
    }
}

struct Row {
    section: String,
    metric: String,
    value: String,
    notes: String,
    severity: Severity,
}

/// Titled table of metrics grouped into sections
///
/// The overall status is the worst severity of any row.
pub struct Dashboard {
    title: String,
    rows: Vec<Row>,
    status: Severity,
    current_section: Option<String>,
}

impl Dashboard {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
            status: Severity::Pass,
            current_section: None,
        }
    }

    /// Start a section; following metrics belong to it
    pub fn section(&mut self, name: &str) -> &mut Self {
        self.current_section = Some(name.to_string());
        self
    }

    pub fn metric(
        &mut self,
        label: &str,
        value: impl Into<String>,
        notes: impl Into<String>,
        severity: Severity,
    ) -> &mut Self {
        let section = self.current_section.take().unwrap_or_default();
        self.status = Severity::worst(self.status, severity);
        self.rows.push(Row {
            section,
            metric: label.to_string(),
            value: value.into(),
            notes: notes.into(),
            severity,
        });
        self
    }

    pub fn status(&self) -> Severity {
        self.status
    }

    pub fn render(&self) -> String {
        let headers = ["Section", "Metric", "Value", "Notes", "Status"];
        let mut widths = headers.map(|h| h.chars().count());
        for row in &self.rows {
            let cells = [
                row.section.chars().count(),
                row.metric.chars().count(),
                row.value.chars().count(),
                row.notes.chars().count(),
                status_text(row.severity).chars().count(),
            ];
            for (w, c) in widths.iter_mut().zip(cells) {
                *w = (*w).max(c);
            }
        }

        let mut output = format!(
            "{} {} {}\n\n",
            self.status.indicator(),
            self.title,
            match self.status {
                Severity::Pass => "(looks like plain language)",
                Severity::Warn => "(some structure remains)",
                Severity::Fail => "(flat, machine-like distribution)",
            }
        );
        output.push_str(&rule(&widths));
        output.push_str(&line(&headers, &widths));
        output.push_str(&rule(&widths));
        for row in &self.rows {
            let status = status_text(row.severity);
            output.push_str(&line(
                &[
                    row.section.as_str(),
                    row.metric.as_str(),
                    row.value.as_str(),
                    row.notes.as_str(),
                    status.as_str(),
                ],
                &widths,
            ));
        }
        output.push_str(&rule(&widths));
        output
    }
}

fn status_text(severity: Severity) -> String {
    format!("{} {}", severity.indicator(), severity)
}

fn rule(widths: &[usize; 5]) -> String {
    let mut out = String::from("+");
    for &w in widths {
        out.push_str(&"-".repeat(w + 2));
        out.push('+');
    }
    out.push('\n');
    out
}

fn line(cells: &[&str; 5], widths: &[usize; 5]) -> String {
    let mut out = String::from("|");
    for (cell, &w) in cells.iter().zip(widths) {
        let fill = w - cell.chars().count();
        out.push_str(&format!(" {}{} |", cell, " ".repeat(fill)));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_worst_row() {
        let mut dashboard = Dashboard::new("Test");
        dashboard
            .section("One")
            .metric("a", "1", "", Severity::Pass)
            .metric("b", "2", "", Severity::Warn);
        assert_eq!(dashboard.status(), Severity::Warn);
        dashboard.section("Two").metric("c", "3", "", Severity::Fail);
        assert_eq!(dashboard.status(), Severity::Fail);
    }

    #[test]
    fn test_render_aligns_columns() {
        let mut dashboard = Dashboard::new("Letters");
        dashboard
            .section("Freq")
            .metric("IoC", "0.0667", "English ≈ 0.066", Severity::Pass)
            .metric("Letters", "12", "", Severity::Pass);
        let text = dashboard.render();
        assert!(text.starts_with("✔ Letters"));
        let widths: Vec<usize> = text
            .lines()
            .filter(|l| l.starts_with('|') || l.starts_with('+'))
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        // Section name only on the first row of its group
        assert_eq!(text.matches("Freq").count(), 1);
    }
}
