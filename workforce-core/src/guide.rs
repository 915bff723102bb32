//! Static user guide shown by the help page.
//!
//! Definitions match how the aggregates are computed, so the wording here
//! changes together with the backend queries.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub term: &'static str,
    pub meaning: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub symptom: &'static str,
    pub remedy: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuideLink {
    pub label: &'static str,
    pub path: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Guide {
    pub title: &'static str,
    pub intro: &'static str,
    pub definitions: &'static [Definition],
    pub setup: &'static [&'static str],
    pub problems: &'static [Problem],
    pub downloads: &'static [GuideLink],
    pub access: &'static str,
}

pub const GUIDE: Guide = Guide {
    title: "Saudization Dashboard Guide",
    intro: "Basic setup, how to read the reports and what each indicator means.",
    definitions: &[
        Definition {
            term: "Total employees",
            meaning: "Active employees only (status = Active).",
        },
        Definition {
            term: "Saudi employees",
            meaning: "Employees whose nationality is the country Saudi Arabia.",
        },
        Definition {
            term: "Saudization %",
            meaning: "Saudi employees / total employees x 100.",
        },
        Definition {
            term: "Target %",
            meaning: "From the Saudization Policy in effect on the selected date.",
        },
        Definition {
            term: "Variance",
            meaning: "Actual % minus target %.",
        },
    ],
    setup: &[
        "Open Saudization Settings and select Saudi Arabia plus the GCC countries.",
        "Create a Saudization Policy per company with its target % and dates.",
        "Run the reports (search for Saudization).",
    ],
    problems: &[
        Problem {
            symptom: "0 Saudi employees",
            remedy: "Check that nationality is linked to the country \"Saudi Arabia\".",
        },
        Problem {
            symptom: "Dashboard pages do not appear",
            remedy: "They are restricted to the HR Manager or System Manager role.",
        },
    ],
    downloads: &[
        GuideLink {
            label: "Setup and usage guide (DOCX)",
            path: "/assets/saudization_dashboard/docs/AlphaX_Saudization_Dashboard_Guide.docx",
        },
        GuideLink {
            label: "Setup and usage guide (PDF)",
            path: "/assets/saudization_dashboard/docs/AlphaX_Saudization_Dashboard_Guide.pdf",
        },
    ],
    access: "HR Manager or System Manager",
};

impl Guide {
    /// Plain-text rendering, one section per block.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![self.title.to_string(), self.intro.to_string(), String::new()];
        out.push("Indicators".to_string());
        out.extend(self.definitions.iter().map(|d| format!("  {}: {}", d.term, d.meaning)));
        out.push(String::new());
        out.push("Quick setup".to_string());
        out.extend(self.setup.iter().enumerate().map(|(i, s)| format!("  {}. {s}", i + 1)));
        out.push(String::new());
        out.push("Common problems".to_string());
        out.extend(self.problems.iter().map(|p| format!("  {}: {}", p.symptom, p.remedy)));
        out.push(String::new());
        out.push("Downloads".to_string());
        out.extend(self.downloads.iter().map(|l| format!("  {} {}", l.label, l.path)));
        out.push(String::new());
        out.push(format!("Access: {}", self.access));
        out
    }

    pub fn definition(&self, term: &str) -> Option<&'static str> {
        self.definitions
            .iter()
            .find(|d| d.term.eq_ignore_ascii_case(term))
            .map(|d| d.meaning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_steps_are_numbered() {
        let lines = GUIDE.lines();
        assert_eq!(lines[0], GUIDE.title);
        assert!(lines.iter().any(|l| l.starts_with("  1. Open Saudization Settings")));
        assert!(lines.iter().any(|l| l.starts_with("  3. Run the reports")));
        assert_eq!(lines.last().map(String::as_str), Some("Access: HR Manager or System Manager"));
    }

    #[test]
    fn variance_is_actual_minus_target() {
        assert_eq!(GUIDE.definition("variance"), Some("Actual % minus target %."));
        assert_eq!(GUIDE.definition("unknown"), None);
    }

    #[test]
    fn downloads_point_at_both_formats() {
        let exts: Vec<_> = GUIDE.downloads.iter().filter_map(|l| l.path.rsplit('.').next()).collect();
        assert_eq!(exts, vec!["docx", "pdf"]);
    }
}
