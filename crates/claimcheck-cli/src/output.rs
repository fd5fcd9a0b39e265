//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use claimcheck_domain::{Health, Verdict, VerificationResult};
use colored::*;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const EXCERPT_CHARS: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a verification result.
    pub fn format_result(&self, result: &VerificationResult, show_trace: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_result_json(result),
            OutputFormat::Table => Ok(self.format_result_table(result, show_trace)),
        }
    }

    fn format_result_json(&self, result: &VerificationResult) -> Result<String> {
        let evidence: Vec<serde_json::Value> = result
            .evidence
            .iter()
            .enumerate()
            .map(|(i, c)| {
                json!({
                    "index": i + 1,
                    "text": c.text,
                    "source_url": c.source_url,
                    "domain": c.domain,
                    "source_type": c.source_type.as_str(),
                    "origin": c.origin.as_str(),
                    "credibility": c.credibility,
                    "relevance": c.relevance,
                    "final_score": c.final_score,
                })
            })
            .collect();

        let value = json!({
            "session_id": result.session_id.to_string(),
            "claim": result.claim,
            "original_claim": result.original_claim,
            "classification": result.classification.as_str(),
            "verdict": result.verdict.label(),
            "confidence": result.confidence,
            "reasoning": result.reasoning,
            "evidence": evidence,
            "trace": result.trace,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_result_table(&self, result: &VerificationResult, show_trace: bool) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{} {}  (confidence {:.2})\n",
            self.bold("Verdict:"),
            self.verdict(result.verdict),
            result.confidence
        ));
        out.push_str(&format!(
            "{} {} [{}]\n",
            self.bold("Claim:"),
            result.claim,
            result.classification
        ));
        if result.claim != result.original_claim {
            out.push_str(&format!(
                "{} {}\n",
                self.bold("Original:"),
                result.original_claim
            ));
        }
        out.push('\n');
        out.push_str(&result.reasoning);
        out.push('\n');

        if !result.evidence.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["#", "Source", "Origin", "Relevance", "Credibility", "Excerpt"]);
            for (i, candidate) in result.evidence.iter().enumerate() {
                let relevance = candidate
                    .relevance
                    .map(|r| format!("{:.2}", r))
                    .unwrap_or_else(|| "-".to_string());
                builder.push_record([
                    (i + 1).to_string(),
                    candidate.domain.clone(),
                    candidate.origin.to_string(),
                    relevance,
                    format!("{:.2}", candidate.credibility),
                    excerpt(&candidate.text),
                ]);
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));

            out.push('\n');
            out.push_str(&table.to_string());
            out.push('\n');
        }

        if show_trace {
            out.push('\n');
            out.push_str(&self.bold("Trace:"));
            out.push('\n');
            for entry in &result.trace {
                out.push_str(&format!("  {}\n", entry));
            }
        }

        out
    }

    /// Format store statistics.
    pub fn format_health(&self, health: &Health, db_path: &str) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "status": "ok",
                "database": db_path,
                "document_count": health.document_count,
            }))?),
            OutputFormat::Table => Ok(self.success(&format!(
                "Store at {} holds {} document(s)",
                db_path, health.document_count
            ))),
        }
    }

    /// Format a count-style operation result (seed, reset).
    pub fn format_count(&self, operation: &str, count: usize) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "operation": operation.to_lowercase(),
                "count": count,
            }))?),
            OutputFormat::Table => Ok(self.success(&format!(
                "{} {} document(s)",
                operation, count
            ))),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn verdict(&self, verdict: Verdict) -> String {
        let color = match verdict {
            Verdict::True => "green",
            Verdict::False => "red",
            Verdict::PartiallyTrue | Verdict::Misleading => "yellow",
            Verdict::NotEnoughEvidence | Verdict::NotVerifiable => "cyan",
        };
        self.colorize(verdict.label(), color)
    }

    fn bold(&self, text: &str) -> String {
        if self.color_enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS - 1).collect();
    format!("{}…", cut.trim_end())
}
