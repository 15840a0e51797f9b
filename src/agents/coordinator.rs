//! Multi-agent coordination.
//!
//! The coordinator plans with `classify_all`, then runs up to three
//! specialists in a fixed order: math, text analysis, formatting. The
//! formatter sees the earlier specialists' output. Sections are concatenated
//! in the same order.

use super::OperationRecord;
use crate::extract::Params;
use crate::intent::{Intent, RuleTable};
use crate::tools::{self, calculator, ToolContext};
use crate::types::{AppError, Result};
use regex::Regex;
use serde_json::json;
use tracing::{debug, info};

/// Most expressions the math specialist evaluates per request.
pub const MAX_EXPRESSIONS: usize = 3;

const EXPRESSION: &str = r"(?i)sqrt\(\s*\d+(?:\.\d+)?\s*\)|square\s+root\s+of\s+\d+(?:\.\d+)?|\d+(?:\.\d+)?(?:\s*[-+*/^%]\s*\d+(?:\.\d+)?)+";
const SQUARE_ROOT: &str = r"(?i)square\s+root\s+of\s+(\d+(?:\.\d+)?)";
const QUOTED: &str = r#""([^"]+)""#;

/// Result of a coordinated run
#[derive(Debug, Clone)]
pub struct Coordination {
    pub response: String,
    pub operations: Vec<OperationRecord>,
}

/// Runs the math, text and formatting specialists
pub struct Coordinator {
    expression: Regex,
    square_root: Regex,
    quoted: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| AppError::Config(format!("Invalid coordinator pattern: {}", e)))
}

fn specialist_name(intent: Intent) -> &'static str {
    match intent {
        Intent::Calculate => "Math Specialist",
        Intent::AnalyzeText => "Text Analysis Specialist",
        _ => "Data Formatting Specialist",
    }
}

fn complexity(specialists: usize) -> &'static str {
    match specialists {
        0 | 1 => "Moderate",
        _ => "Complex",
    }
}

impl Coordinator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            expression: compile(EXPRESSION)?,
            square_root: compile(SQUARE_ROOT)?,
            quoted: compile(QUOTED)?,
        })
    }

    /// Specialists to run for `utterance`, in execution order.
    pub fn plan(&self, table: &RuleTable<Intent>, utterance: &str) -> Vec<Intent> {
        let matched = table.classify_all(utterance);
        [Intent::Calculate, Intent::AnalyzeText, Intent::FormatData]
            .into_iter()
            .filter(|intent| matched.contains(intent))
            .collect()
    }

    /// Arithmetic expressions found in `utterance`, at most [`MAX_EXPRESSIONS`].
    pub fn expressions(&self, utterance: &str) -> Vec<String> {
        self.expression
            .find_iter(utterance)
            .take(MAX_EXPRESSIONS)
            .map(|m| {
                self.square_root
                    .replace(m.as_str().trim(), "sqrt($1)")
                    .into_owned()
            })
            .collect()
    }

    /// Text the text specialist analyzes: the first quoted span, or the
    /// whole utterance.
    pub fn text_subject<'a>(&self, utterance: &'a str) -> &'a str {
        self.quoted
            .captures(utterance)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(utterance)
    }

    /// Run the plan. `None` when no specialist applies.
    pub fn run(
        &self,
        table: &RuleTable<Intent>,
        ctx: &ToolContext,
        utterance: &str,
    ) -> Option<Coordination> {
        let plan = self.plan(table, utterance);
        if plan.is_empty() {
            return None;
        }
        debug!(plan = ?plan, "coordinating specialists");

        let mut operations = Vec::new();
        let mut outputs: Vec<String> = Vec::new();
        let mut sections = Vec::new();

        for intent in &plan {
            let (icon, body) = match intent {
                Intent::Calculate => ("🧮", self.math(ctx, utterance, &mut operations)),
                Intent::AnalyzeText => ("📊", self.text(ctx, utterance, &mut operations)),
                _ => ("📋", self.format(ctx, utterance, &outputs, &mut operations)),
            };
            sections.push(format!(
                "{} **{} Results:**\n{}",
                icon,
                specialist_name(*intent),
                body
            ));
            if *intent != Intent::FormatData {
                outputs.push(body);
            }
        }

        let names: Vec<&str> = plan.iter().map(|i| specialist_name(*i)).collect();
        let level = complexity(plan.len());
        info!(specialists = plan.len(), "multi-agent task complete");

        let response = format!(
            "🤖 **Multi-Agent System Response**\n\n\
             **Task:** {}\n\
             **Analysis:** {} task requiring {} specialist(s)\n\
             **Agents Deployed:** {}\n\n\
             ---\n\n\
             {}\n\n\
             ---\n\n\
             **🎯 Task Summary:**\n\
             • **Agents Used:** {}\n\
             • **Complexity Level:** {}\n\
             • **Processing Status:** ✅ Complete\n\
             • **Results Generated:** {} specialist outputs",
            utterance,
            level,
            plan.len(),
            names.join(", "),
            sections.join("\n\n"),
            plan.len(),
            level,
            outputs.len()
        );

        Some(Coordination {
            response,
            operations,
        })
    }

    fn math(&self, ctx: &ToolContext, utterance: &str, ops: &mut Vec<OperationRecord>) -> String {
        let expressions = self.expressions(utterance);
        if expressions.is_empty() {
            return "Mathematical analysis requested - please provide specific numbers or expressions to calculate."
                .to_string();
        }

        expressions
            .iter()
            .map(|expr| {
                let params = Params::new().with_text("expression", expr.as_str());
                let result = tools::dispatch(ctx, Intent::Calculate, &params);
                ops.push(OperationRecord::new(Intent::Calculate, &params, &result));
                match result.value.as_ref().and_then(|v| v["result"].as_f64()) {
                    Some(value) if result.is_success() => {
                        format!("• {} = **{}**", expr, calculator::format_number(value))
                    }
                    _ => format!("• {}: {}", expr, result.message.trim_start_matches("❌ ")),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn text(&self, ctx: &ToolContext, utterance: &str, ops: &mut Vec<OperationRecord>) -> String {
        let params = Params::new().with_text("text", self.text_subject(utterance));
        let result = tools::dispatch(ctx, Intent::AnalyzeText, &params);
        ops.push(OperationRecord::new(Intent::AnalyzeText, &params, &result));
        result.message
    }

    fn format(
        &self,
        ctx: &ToolContext,
        utterance: &str,
        previous: &[String],
        ops: &mut Vec<OperationRecord>,
    ) -> String {
        let data = if previous.is_empty() {
            json!({ "user_request": utterance })
        } else {
            json!({ "task": utterance, "results": previous })
        };

        let lowered = utterance.to_lowercase();
        let format = if lowered.contains("table") {
            "table"
        } else if lowered.contains("list") {
            "list"
        } else {
            "json"
        };

        let params = Params::new()
            .with_text("data", data.to_string())
            .with_text("format", format);
        let result = tools::dispatch(ctx, Intent::FormatData, &params);
        ops.push(OperationRecord::new(Intent::FormatData, &params, &result));

        match result.value.as_ref().and_then(|v| v["formatted"].as_str()) {
            Some(formatted) => format!(
                "**Formatted Output ({}):**\n```{}\n{}\n```",
                format.to_uppercase(),
                format,
                formatted
            ),
            None => result.message,
        }
    }
}
