//! Rendering an [`AnalysisResult`] for people.
//!
//! Pure and stateless: a result goes in, a string comes out. Two forms:
//!
//! * [`render_text`]: terminal dashboard with score gauges, optional ANSI
//!   colour
//! * [`render_markdown`]: the same sections as a Markdown document
//!
//! The layout follows the dashboard: overall rating, job match, strengths
//! and weaknesses, keyword gaps, spelling corrections, then the improvement
//! plan. An absent result renders as the empty string.

use crate::model::{AnalysisResult, Impact, Percentage};
use std::fmt::Write as _;

/// Width in cells of the score gauges.
const GAUGE_WIDTH: usize = 20;

/// Text rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Emit ANSI colour codes.
    pub color: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { color: true }
    }
}

impl TextStyle {
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.color {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        self.paint("1", s)
    }

    fn dim(&self, s: &str) -> String {
        self.paint("2", s)
    }

    fn green(&self, s: &str) -> String {
        self.paint("32", s)
    }

    fn red(&self, s: &str) -> String {
        self.paint("31", s)
    }

    fn yellow(&self, s: &str) -> String {
        self.paint("33", s)
    }

    fn cyan(&self, s: &str) -> String {
        self.paint("36", s)
    }

    fn impact_badge(&self, impact: Impact) -> String {
        let label = format!("[{impact} Impact]");
        match impact {
            Impact::High => self.green(&label),
            Impact::Medium => self.yellow(&label),
            Impact::Low => self.dim(&label),
        }
    }
}

/// Render an optional result; `None` renders nothing.
pub fn render_optional(result: Option<&AnalysisResult>, style: TextStyle) -> String {
    result.map(|r| render_text(r, style)).unwrap_or_default()
}

/// Horizontal gauge, e.g. `████████████████░░░░ 82%`.
pub fn gauge(value: Percentage) -> String {
    let filled = (value.value() as usize * GAUGE_WIDTH + 50) / 100;
    format!(
        "{}{} {}",
        "█".repeat(filled),
        "░".repeat(GAUGE_WIDTH - filled),
        value
    )
}

/// Terminal dashboard.
pub fn render_text(result: &AnalysisResult, style: TextStyle) -> String {
    let mut out = String::new();
    let s = &style;

    let _ = writeln!(out, "{}", s.bold("Resume Analysis"));
    let _ = writeln!(out, "{}", s.dim("Comprehensive review of your application"));
    out.push('\n');

    let _ = writeln!(
        out,
        "{}  {}",
        s.bold("Overall Rating     "),
        s.cyan(&gauge(result.overall_score))
    );
    let _ = writeln!(
        out,
        "{}  {}",
        s.bold("Job Match Alignment"),
        s.green(&gauge(result.job_alignment.match_percentage))
    );
    let _ = writeln!(
        out,
        "  {}",
        s.dim(&format!("\"{}\"", result.job_alignment.role_fit_summary))
    );
    out.push('\n');

    if !result.summary.trim().is_empty() {
        let _ = writeln!(out, "{}", s.bold("Summary"));
        let _ = writeln!(out, "  {}", result.summary);
        out.push('\n');
    }

    let _ = writeln!(out, "{} {}", s.green("✓"), s.bold("Strengths"));
    write_bullets(&mut out, &result.strengths, "None identified.");
    out.push('\n');

    let _ = writeln!(out, "{} {}", s.red("✗"), s.bold("Areas to Improve"));
    write_bullets(&mut out, &result.weaknesses, "None identified.");
    out.push('\n');

    let _ = writeln!(out, "{}", s.bold("Keywords Analysis"));
    let missing = if result.job_alignment.missing_keywords.is_empty() {
        "No key words missing!".to_string()
    } else {
        s.red(&result.job_alignment.missing_keywords.join(", "))
    };
    let _ = writeln!(out, "  Missing from Resume:    {missing}");
    let suggested = if result.job_alignment.suggested_keywords.is_empty() {
        s.dim("-")
    } else {
        s.green(&result.job_alignment.suggested_keywords.join(", "))
    };
    let _ = writeln!(out, "  Recommended Additions:  {suggested}");
    out.push('\n');

    let _ = writeln!(out, "{}", s.bold("Errors & Corrections"));
    if result.spelling_errors.is_empty() {
        let _ = writeln!(out, "  No spelling mistakes found! Great job.");
    }
    for err in &result.spelling_errors {
        let _ = writeln!(
            out,
            "  {} {}",
            s.red(&format!("\"{}\"", err.original)),
            s.green(&format!("→ \"{}\"", err.suggestion))
        );
        let _ = writeln!(out, "    {}", s.dim(&format!("...{}...", err.context)));
    }
    out.push('\n');

    let _ = writeln!(out, "{}", s.bold("Detailed Improvement Plan"));
    if result.improvements.is_empty() {
        let _ = writeln!(out, "  Nothing to change.");
    }
    for imp in &result.improvements {
        let _ = writeln!(out, "  {} {}", s.impact_badge(imp.impact), s.bold(&imp.category));
        let _ = writeln!(out, "    {}", imp.description);
    }

    out
}

/// Markdown report with the same sections as [`render_text`].
pub fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let align = &result.job_alignment;

    let _ = writeln!(out, "# Resume Analysis\n");
    let _ = writeln!(out, "| Metric | Score |");
    let _ = writeln!(out, "|:--|--:|");
    let _ = writeln!(out, "| Overall Rating | {} |", result.overall_score);
    let _ = writeln!(out, "| Job Match Alignment | {} |\n", align.match_percentage);
    let _ = writeln!(out, "> {}\n", align.role_fit_summary);

    if !result.summary.trim().is_empty() {
        let _ = writeln!(out, "## Summary\n\n{}\n", result.summary);
    }

    let _ = writeln!(out, "## Strengths\n");
    write_md_list(&mut out, &result.strengths, "_None identified._");
    let _ = writeln!(out, "## Areas to Improve\n");
    write_md_list(&mut out, &result.weaknesses, "_None identified._");

    let _ = writeln!(out, "## Keywords Analysis\n");
    let missing = if align.missing_keywords.is_empty() {
        "No key words missing!".to_string()
    } else {
        code_list(&align.missing_keywords)
    };
    let _ = writeln!(out, "- **Missing from Resume:** {missing}");
    let _ = writeln!(
        out,
        "- **Recommended Additions:** {}\n",
        code_list(&align.suggested_keywords)
    );

    let _ = writeln!(out, "## Errors & Corrections\n");
    if result.spelling_errors.is_empty() {
        let _ = writeln!(out, "No spelling mistakes found! Great job.\n");
    } else {
        for err in &result.spelling_errors {
            let _ = writeln!(
                out,
                "- ~~{}~~ → **{}** _(...{}...)_",
                err.original, err.suggestion, err.context
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Detailed Improvement Plan\n");
    for impact in Impact::ALL {
        let items: Vec<_> = result.improvements_by_impact(impact).collect();
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "### {impact} Impact\n");
        for imp in items {
            let _ = writeln!(out, "- **{}:** {}", imp.category, imp.description);
        }
        out.push('\n');
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

fn write_bullets(out: &mut String, items: &[String], empty: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "  {empty}");
    }
    for item in items {
        let _ = writeln!(out, "  • {item}");
    }
}

fn write_md_list(out: &mut String, items: &[String], empty: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "{empty}");
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}

fn code_list(items: &[String]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(|k| format!("`{k}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Improvement, JobAlignment, SpellingError};

    fn sample() -> AnalysisResult {
        AnalysisResult {
            overall_score: Percentage::new(82).unwrap(),
            summary: "Strong backend profile.".into(),
            strengths: vec!["Go".into(), "Distributed systems".into()],
            weaknesses: vec!["No metrics".into()],
            improvements: vec![
                Improvement {
                    category: "Format".into(),
                    description: "Shorter bullets".into(),
                    impact: Impact::Low,
                },
                Improvement {
                    category: "Impact".into(),
                    description: "Quantify results".into(),
                    impact: Impact::High,
                },
            ],
            spelling_errors: vec![SpellingError {
                original: "recieve".into(),
                suggestion: "receive".into(),
                context: "to recieve traffic".into(),
            }],
            job_alignment: JobAlignment {
                match_percentage: Percentage::new(74).unwrap(),
                missing_keywords: vec!["Kubernetes".into()],
                suggested_keywords: vec!["gRPC".into()],
                role_fit_summary: "Good fit.".into(),
            },
        }
    }

    #[test]
    fn gauge_fills_proportionally() {
        assert_eq!(gauge(Percentage::new(0).unwrap()), format!("{} 0%", "░".repeat(20)));
        assert_eq!(gauge(Percentage::new(100).unwrap()), format!("{} 100%", "█".repeat(20)));
        let g = gauge(Percentage::new(82).unwrap());
        assert!(g.ends_with(" 82%"));
        assert_eq!(g.chars().filter(|&c| c == '█').count(), 16);
    }

    #[test]
    fn text_shows_score_and_lists_verbatim() {
        let text = render_text(&sample(), TextStyle::plain());
        assert!(text.contains("82%"));
        assert!(text.contains("74%"));
        assert!(text.contains("• Go"));
        assert!(text.contains("• Distributed systems"));
        assert!(text.contains("• No metrics"));
        assert!(text.contains("\"recieve\" → \"receive\""));
        assert!(text.contains("[High Impact] Impact"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn colour_codes_only_when_asked() {
        let text = render_text(&sample(), TextStyle::default());
        assert!(text.contains("\x1b[1m"));
    }

    #[test]
    fn empty_sections_have_friendly_text() {
        let mut r = sample();
        r.spelling_errors.clear();
        r.job_alignment.missing_keywords.clear();
        let text = render_text(&r, TextStyle::plain());
        assert!(text.contains("No spelling mistakes found! Great job."));
        assert!(text.contains("No key words missing!"));
    }

    #[test]
    fn markdown_groups_plan_by_impact() {
        let md = render_markdown(&sample());
        assert!(md.starts_with("# Resume Analysis\n"));
        assert!(md.contains("| Overall Rating | 82% |"));
        let high = md.find("### High Impact").unwrap();
        let low = md.find("### Low Impact").unwrap();
        assert!(high < low);
        assert!(!md.contains("### Medium Impact"));
        assert!(md.contains("- ~~recieve~~ → **receive**"));
        assert!(md.ends_with("Shorter bullets\n"));
    }

    #[test]
    fn absent_result_renders_nothing() {
        assert_eq!(render_optional(None, TextStyle::plain()), "");
        assert!(!render_optional(Some(&sample()), TextStyle::plain()).is_empty());
    }
}
