use crate::extract::Params;
use crate::intent::Intent;
use crate::tools::{calculator, files, format, search, text, weather};
use crate::tools::{ToolContext, ToolOutput, ToolResult};
use crate::types::{ErrorKind, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Signature every tool function shares
pub type ToolFn = fn(&ToolContext, &Params) -> Result<ToolOutput>;

/// One row of the intent to tool table
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Parameters that must be present before the tool runs
    pub required: &'static [&'static str],
    /// Shown instead of running the tool when a required parameter is missing
    pub clarification: &'static str,
    pub run: ToolFn,
}

/// Serializable summary of a tool, for status output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub required: &'static [&'static str],
}

impl ToolSpec {
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name,
            description: self.description,
            required: self.required,
        }
    }
}

static CALCULATE: ToolSpec = ToolSpec {
    name: "calculator",
    description: "Evaluate an arithmetic expression with a fixed set of functions",
    required: &["expression"],
    clarification: "🧮 I can help with calculations! Try:\n\
                    • Simple math: `2 + 2`, `10 * 5`, `(15 + 3) / 2`\n\
                    • Advanced: `square root of 16`, `2 power 3`\n\
                    • Functions: `sin`, `cos`, `log`, `sqrt`, `pow`",
    run: calculator::run,
};

static WEB_SEARCH: ToolSpec = ToolSpec {
    name: "web_search",
    description: "Search the web (mock results)",
    required: &["query"],
    clarification: "🔍 What would you like me to search for?",
    run: search::web_search,
};

static WEATHER: ToolSpec = ToolSpec {
    name: "weather",
    description: "Current conditions and forecast for a location (mock data)",
    required: &[],
    clarification: "🌤️ Which location would you like the weather for?",
    run: weather::get_weather,
};

static LIST_DIRECTORY: ToolSpec = ToolSpec {
    name: "list_directory",
    description: "List directory contents, optionally detailed or recursive",
    required: &[],
    clarification: "📁 Which directory would you like me to list?",
    run: files::list_directory,
};

static READ_FILE: ToolSpec = ToolSpec {
    name: "read_file",
    description: "Show the contents of a text file",
    required: &["path"],
    clarification: "📄 Please specify which file you'd like me to read.",
    run: files::read_file,
};

static FILE_INFO: ToolSpec = ToolSpec {
    name: "file_info",
    description: "Size, timestamps, type and checksum of a file or directory",
    required: &["path"],
    clarification: "ℹ️ Please specify which file or directory you'd like info about.",
    run: files::file_info,
};

static SEARCH_FILES: ToolSpec = ToolSpec {
    name: "search_files",
    description: "Find files by name pattern and optional content",
    required: &[],
    clarification: "🔍 What files should I look for? Try `find files \"*.rs\"`.",
    run: files::search_files,
};

static CURRENT_DIRECTORY: ToolSpec = ToolSpec {
    name: "current_directory",
    description: "Show the working directory",
    required: &[],
    clarification: "",
    run: files::current_directory,
};

static ANALYZE_TEXT: ToolSpec = ToolSpec {
    name: "analyze_text",
    description: "Word, sentence and readability metrics with sentiment",
    required: &["text"],
    clarification: "📊 Please provide text to analyze. Use quotes or 'analyze: your text here'",
    run: text::analyze_text,
};

static EXTRACT_KEYWORDS: ToolSpec = ToolSpec {
    name: "extract_keywords",
    description: "Most frequent meaningful words in a text",
    required: &["text"],
    clarification: "🔑 Please provide text in quotes for keyword extraction",
    run: text::extract_keywords,
};

static PROCESS_CSV: ToolSpec = ToolSpec {
    name: "process_csv",
    description: "Structure and numeric column summary of CSV data",
    required: &["csv"],
    clarification: "📈 Please provide CSV data with headers and at least one row",
    run: text::process_csv,
};

static SUMMARY_STATS: ToolSpec = ToolSpec {
    name: "summary_stats",
    description: "Mean, median, spread and deviation of a list of numbers",
    required: &["numbers"],
    clarification: "📊 Please provide numbers for statistical analysis",
    run: text::summary_stats,
};

static GENERATE_HASH: ToolSpec = ToolSpec {
    name: "generate_hash",
    description: "MD5, SHA-1 and SHA-256 digests of a text",
    required: &["text"],
    clarification: "🔐 Please provide text to hash in quotes or use 'hash: your text'",
    run: text::generate_hash,
};

static RESEARCH: ToolSpec = ToolSpec {
    name: "research",
    description: "Gather, analyze and synthesize sources on a topic (mock)",
    required: &["topic"],
    clarification: "🔍 What would you like me to research? Please specify a topic.",
    run: search::research,
};

static COMPARE: ToolSpec = ToolSpec {
    name: "compare",
    description: "Side-by-side research on two topics (mock)",
    required: &["first", "second"],
    clarification: "⚖️ Please specify what you'd like me to compare (e.g., 'compare Python vs JavaScript')",
    run: search::compare,
};

static TRENDS: ToolSpec = ToolSpec {
    name: "trends",
    description: "Current trends and coverage for a topic (mock)",
    required: &["topic"],
    clarification: "📈 What trends would you like me to analyze?",
    run: search::trends,
};

static FORMAT_DATA: ToolSpec = ToolSpec {
    name: "format_data",
    description: "Render data as JSON, a Markdown table or a bullet list",
    required: &["data"],
    clarification: "📋 Please provide the data to format in quotes, as JSON or plain text",
    run: format::format_data,
};

/// The tool bound to `intent`.
pub fn spec(intent: Intent) -> &'static ToolSpec {
    match intent {
        Intent::Calculate => &CALCULATE,
        Intent::WebSearch => &WEB_SEARCH,
        Intent::Weather => &WEATHER,
        Intent::ListDirectory => &LIST_DIRECTORY,
        Intent::ReadFile => &READ_FILE,
        Intent::FileInfo => &FILE_INFO,
        Intent::SearchFiles => &SEARCH_FILES,
        Intent::CurrentDirectory => &CURRENT_DIRECTORY,
        Intent::AnalyzeText => &ANALYZE_TEXT,
        Intent::ExtractKeywords => &EXTRACT_KEYWORDS,
        Intent::ProcessCsv => &PROCESS_CSV,
        Intent::SummaryStats => &SUMMARY_STATS,
        Intent::GenerateHash => &GENERATE_HASH,
        Intent::Research => &RESEARCH,
        Intent::Compare => &COMPARE,
        Intent::Trends => &TRENDS,
        Intent::FormatData => &FORMAT_DATA,
    }
}

/// The clarification prompt returned when `intent` is missing input.
pub fn clarification(intent: Intent) -> &'static str {
    spec(intent).clarification
}

/// Run the tool for `intent`.
///
/// Missing required parameters short-circuit to the tool's clarification
/// prompt. Tool errors become failed results; security failures are
/// logged at warn level.
pub fn dispatch(ctx: &ToolContext, intent: Intent, params: &Params) -> ToolResult {
    let spec = spec(intent);

    if let Some(missing) = spec.required.iter().find(|name| !params.contains(name)) {
        debug!(intent = %intent, missing = *missing, "required parameter missing");
        return ToolResult::failure(ErrorKind::Parameter, spec.clarification);
    }

    match (spec.run)(ctx, params) {
        Ok(output) => {
            info!(intent = %intent, tool = spec.name, "tool succeeded");
            output.into()
        }
        Err(err) => {
            let result = ToolResult::from_error(&err);
            match result.error {
                Some(ErrorKind::Security) => warn!(
                    intent = %intent,
                    params = %params.to_json(),
                    error_kind = "security",
                    error = %err,
                    "tool rejected input"
                ),
                kind => info!(
                    intent = %intent,
                    params = %params.to_json(),
                    error_kind = ?kind,
                    error = %err,
                    "tool failed"
                ),
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolStatus;

    #[test]
    fn test_every_intent_has_a_named_tool() {
        let mut names: Vec<&str> = Intent::ALL.iter().map(|i| spec(*i).name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Intent::ALL.len());
    }

    #[test]
    fn test_missing_required_parameter_returns_clarification() {
        let ctx = ToolContext::new(".");
        let result = dispatch(&ctx, Intent::ReadFile, &Params::new());
        assert_eq!(result.status, ToolStatus::Failure);
        assert_eq!(result.error, Some(ErrorKind::Parameter));
        assert_eq!(result.message, clarification(Intent::ReadFile));
    }

    #[test]
    fn test_dispatch_calculate() {
        let ctx = ToolContext::new(".");
        let params = Params::new().with_text("expression", "2 + 3 * 4");
        let result = dispatch(&ctx, Intent::Calculate, &params);
        assert!(result.is_success());
        assert_eq!(result.value.unwrap()["result"], 14.0);
    }

    #[test]
    fn test_dispatch_division_by_zero_is_failure() {
        let ctx = ToolContext::new(".");
        let params = Params::new().with_text("expression", "1/0");
        let result = dispatch(&ctx, Intent::Calculate, &params);
        assert_eq!(result.status, ToolStatus::Failure);
        assert_eq!(result.error, Some(ErrorKind::ToolExecution));
    }

    #[test]
    fn test_definitions_expose_required_params() {
        let def = spec(Intent::Compare).definition();
        assert_eq!(def.required, &["first", "second"]);
    }
}
