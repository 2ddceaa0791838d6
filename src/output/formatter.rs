//! Output formatters for ranking and skill gap reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{score_percentage, MatchReport, SkillGapReport};
use crate::processing::catalog::RequirementSource;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String>;
    fn format_gap(&self, report: &SkillGapReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured output
pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn score_color(percentage: u8) -> Color {
        match percentage {
            70..=100 => Color::Green,
            40..=69 => Color::Yellow,
            _ => Color::Red,
        }
    }

    fn format_percentage(&self, percentage: u8) -> String {
        self.colorize(&format!("{:>3}%", percentage), Self::score_color(percentage))
    }

    fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
            format!("{}…", cut)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("🔎 BEST-FIT JOBS", 1));
        output.push_str(&format!(
            "Query: {} | Corpus: {} jobs, {} terms{}\n",
            report.query_source,
            report.index.corpus_size,
            report.index.vocabulary_size,
            if report.index.from_cache { " (cached index)" } else { "" }
        ));

        if report.ranking.is_empty() {
            output.push_str(&self.colorize(
                "\nNo matching jobs: the query shares no indexed terms with the corpus.\n",
                Color::Yellow,
            ));
            return Ok(output);
        }

        output.push_str(&self.format_header("Ranking", 2));
        output.push_str(&format!(
            "{:>4}  {:>5}  {:<36} {:<24} {}\n",
            "#", "Score", "Job", "Location", "Link"
        ));

        for job in &report.ranking.jobs {
            let title = if job.title.is_empty() { job.id.as_str() } else { job.title.as_str() };
            let job_label = match &job.company_name {
                Some(company) => format!("{} @ {}", title, company),
                None => title.to_string(),
            };

            output.push_str(&format!(
                "{:>4}  {}  {:<36} {:<24} {}\n",
                job.rank,
                self.format_percentage(score_percentage(job.score)),
                Self::truncate(&job_label, 36),
                Self::truncate(job.location.as_deref().unwrap_or("-"), 24),
                self.colorize(job.job_posting_url.as_deref().unwrap_or("-"), Color::BrightBlack)
            ));
        }

        if self.detailed {
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!("Matched terms: {}\n", report.matched_terms.join(", ")));
            for job in &report.ranking.jobs {
                output.push_str(&format!("  {} → {:.4}\n", job.id, job.score));
            }
            output.push_str(&format!("Index: {}\n", report.index.corpus_hash));
        }

        output.push_str(&format!(
            "\n{} Career Matcher v{} | {}ms\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.matcher_version,
            report.metadata.processing_time_ms
        ));

        Ok(output)
    }

    fn format_gap(&self, report: &SkillGapReport) -> Result<String> {
        let gap = &report.gap;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 SKILL GAP ANALYSIS", 1));
        output.push_str(&format!("Job title: {}", gap.job_title));
        if gap.requirement_source == RequirementSource::Default {
            output.push_str(&self.colorize(" (not in catalog, using default requirements)", Color::Yellow));
        }
        output.push_str(&format!("\nCandidate: {}\n", report.candidate_source));

        output.push_str(&self.format_header("Scores", 2));
        output.push_str(&format!(
            "Skill match:  {}\n",
            self.format_percentage(score_percentage(gap.skill_similarity))
        ));
        output.push_str(&format!(
            "ATS keywords: {}  ({} of {})\n",
            self.format_percentage(gap.ats.score.round().clamp(0.0, 100.0) as u8),
            gap.ats.matched_keywords.len(),
            gap.ats.checklist_size
        ));

        output.push_str(&self.format_header("Skills", 2));
        output.push_str(&format!("Required: {}\n", gap.required_skills.join(", ")));
        output.push_str(&format!(
            "Have:     {}\n",
            if gap.possessed_skills.is_empty() { "-".to_string() } else { gap.possessed_skills.join(", ") }
        ));

        if gap.missing_skills.is_empty() {
            output.push_str(&self.colorize("\n✅ No missing skills for this role\n", Color::Green));
        } else {
            output.push_str(&self.format_header("🎯 Missing Skills", 3));
            for rec in &gap.course_recommendations {
                output.push_str(&format!(
                    "  • {}  {}\n",
                    self.colorize(&rec.skill, Color::Red),
                    self.colorize(&rec.url, Color::BrightBlack)
                ));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("ATS Checklist", 3));
            for keyword in &gap.ats.matched_keywords {
                output.push_str(&format!("  {} {}\n", self.colorize("✓", Color::Green), keyword));
            }
            for keyword in &gap.ats.missing_keywords {
                output.push_str(&format!("  {} {}\n", self.colorize("✗", Color::Red), keyword));
            }
        }

        output.push_str(&format!(
            "\n{} Career Matcher v{} | {}ms\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.matcher_version,
            report.metadata.processing_time_ms
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_gap(&self, report: &SkillGapReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Picks the formatter for an output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
        }
    }

    pub fn match_report(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_match(report)
    }

    pub fn gap_report(&self, report: &SkillGapReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_gap(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::output::report::{IndexSummary, ReportMetadata};
    use crate::processing::analyzer::{CandidateProfile, GapAnalyzer};
    use crate::processing::catalog::JobSkillCatalog;
    use crate::processing::document::JobRecord;
    use crate::processing::index::CorpusIndex;
    use crate::processing::ranker::SimilarityRanker;

    fn match_report(query: &str) -> MatchReport {
        let index = CorpusIndex::build(&[
            JobRecord::new("1", "Data Scientist", "Python SQL machine learning", "")
                .with_company("Acme")
                .with_location("Remote")
                .with_posting_url("https://jobs.example.com/1"),
            JobRecord::new("2", "Web Developer", "JavaScript React", ""),
        ]);
        MatchReport {
            metadata: ReportMetadata::new(3),
            query_source: "profile text".to_string(),
            matched_terms: vec!["python".to_string()],
            index: IndexSummary::from_index(&index, false),
            ranking: SimilarityRanker::new(&index).rank_text(query),
        }
    }

    fn gap_report(title: &str) -> SkillGapReport {
        let analyzer = GapAnalyzer::from_config(&Config::default().skills, JobSkillCatalog::default()).unwrap();
        SkillGapReport {
            metadata: ReportMetadata::new(1),
            candidate_source: "typed skills".to_string(),
            gap: analyzer.analyze(title, &CandidateProfile::TypedSkills("Leadership".to_string())),
        }
    }

    #[test]
    fn test_console_match_report() {
        let output = ConsoleFormatter::new(false, true)
            .format_match(&match_report("python sql"))
            .unwrap();

        assert!(output.contains("BEST-FIT JOBS"));
        assert!(output.contains("Data Scientist @ Acme"));
        assert!(output.contains("https://jobs.example.com/1"));
        assert!(output.contains("Matched terms: python"));
    }

    #[test]
    fn test_console_empty_ranking() {
        let output = ConsoleFormatter::new(false, false)
            .format_match(&match_report("the and of"))
            .unwrap();

        assert!(output.contains("No matching jobs"));
    }

    #[test]
    fn test_console_gap_report() {
        let output = ConsoleFormatter::new(false, true)
            .format_gap(&gap_report("Underwater Basket Weaver"))
            .unwrap();

        assert!(output.contains("using default requirements"));
        assert!(output.contains("Communication"));
        assert!(output.contains("https://www.coursera.org"));
        assert!(output.contains("✓ Leadership"));
    }

    #[test]
    fn test_json_reports_parse_back() {
        let generator = ReportGenerator::with_options(false, false);

        let json = generator.match_report(&match_report("python"), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["ranking"]["jobs"][0]["id"], "1");

        let json = generator.gap_report(&gap_report("Underwater Basket Weaver"), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["gap"]["requirement_source"], "Default");
        assert_eq!(value["gap"]["missing_skills"][0], "Communication");
    }

    #[test]
    fn test_save_report_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports").join("match.json");

        save_report_to_file("{}", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
