//! Per-intent extraction rule tables.

use super::RuleKind;
use crate::intent::Intent;

type Spec = (&'static str, RuleKind);

const QUOTED_PATH: Spec = (r#""(?P<path>[^"]+)""#, RuleKind::Verbatim);
const EXTENSION_PATH: Spec = (r"(?P<path>[\w\-./~]+\.[A-Za-z0-9]+)\b", RuleKind::Capture);
const SLASHED_PATH: Spec = (r"(?P<path>[\w\-.~]*/[\w\-./~]*)", RuleKind::Capture);

const QUOTED_TEXT: Spec = (r#""(?P<text>[^"]+)""#, RuleKind::Verbatim);

static CALCULATE: &[Spec] = &[(
    r"(?i)(?:\b(?:sqrt|sin|cos|tan|asin|acos|atan|log10|log|ln|exp|abs|floor|ceil|round|pow|min|max|pi|tau|e)\b|\d+(?:\.\d+)?|\.\d+|[-+*/^%(),]|\s)+",
    RuleKind::Longest("expression"),
)];

static WEB_SEARCH: &[Spec] = &[
    (r#""(?P<query>[^"]+)""#, RuleKind::Verbatim),
    (
        r"(?i)\b(?:search\s+for|search|find|look\s*up|google)\s+(?P<query>.+)",
        RuleKind::Capture,
    ),
];

static WEATHER: &[Spec] = &[(r"(?i)\b(?:in|for|at)\s+(?P<location>.+)", RuleKind::Capture)];

static LIST_DIRECTORY: &[Spec] = &[
    (r"(?i)\bdetailed\b|(?:^|\s)-l\b", RuleKind::Flag("detailed")),
    (r"(?i)\brecursive(?:ly)?\b|(?:^|\s)-r\b", RuleKind::Flag("recursive")),
    QUOTED_PATH,
    EXTENSION_PATH,
    SLASHED_PATH,
    (r#"(?i)\bin\s+(?P<path>[^\s"]+)"#, RuleKind::Capture),
    (
        r#"(?i)\b(?:ls|dir)(?:\s+-\w+)*\s+(?P<path>[^\s\-"][^\s"]*)"#,
        RuleKind::Capture,
    ),
];

static READ_FILE: &[Spec] = &[
    (r"(?i)\ball\b", RuleKind::Flag("all")),
    (
        r"(?i)\b(?:first|top|head)\s+(\d+)\s+lines?\b",
        RuleKind::Number("max_lines"),
    ),
    QUOTED_PATH,
    EXTENSION_PATH,
    SLASHED_PATH,
    (
        r#"(?i)\b(?:read|show|open)\s+file\s+(?P<path>[^\s"]+)"#,
        RuleKind::Capture,
    ),
    (r#"(?i)\bcat\s+(?P<path>[^\s"]+)"#, RuleKind::Capture),
];

static FILE_INFO: &[Spec] = &[
    QUOTED_PATH,
    EXTENSION_PATH,
    SLASHED_PATH,
    (
        r#"(?i)\b(?:info\s+about|details\s+of|file\s+info(?:\s+(?:for|on|about))?)\s+(?P<path>[^\s"]+)"#,
        RuleKind::Capture,
    ),
];

static SEARCH_FILES: &[Spec] = &[
    (
        r#"(?i)\b(?:content|containing|contains)\b[^"]*"(?P<content>[^"]+)""#,
        RuleKind::Verbatim,
    ),
    (r"(?P<pattern>[\w\-.]*\*[\w\-.*]*)", RuleKind::Capture),
    (
        r#"(?i)\b(?:for|named|matching|files)\s+"(?P<pattern>[^"]+)""#,
        RuleKind::Verbatim,
    ),
    (r#"(?i)\bin\s+"?(?P<directory>[^\s"]+)"?"#, RuleKind::Capture),
];

static ANALYZE_TEXT: &[Spec] = &[
    QUOTED_TEXT,
    (r"(?is)\banalyze:\s*(?P<text>.+)", RuleKind::Capture),
];

static EXTRACT_KEYWORDS: &[Spec] = &[
    QUOTED_TEXT,
    (r"(?is)\bkeywords(?:\s+from)?:\s*(?P<text>.+)", RuleKind::Capture),
];

static PROCESS_CSV: &[Spec] = &[(
    r"(?m)^(?:[^\n:]*:[ \t]*)?([^\n:]*,[^\n]*)$",
    RuleKind::JoinLines("csv"),
)];

static SUMMARY_STATS: &[Spec] = &[(r"-?\d[\d.]*", RuleKind::Numbers("numbers"))];

static GENERATE_HASH: &[Spec] = &[
    QUOTED_TEXT,
    (r"(?is)\bhash:\s*(?P<text>.+)", RuleKind::Verbatim),
    (
        r"(?is)\b(?:hash\s+of|checksum\s+(?:of|for))\s+(?P<text>.+)",
        RuleKind::Capture,
    ),
];

static RESEARCH: &[Spec] = &[(
    r"(?i)\b(?:research(?:\s+(?:on|about|into))?|find\s+information(?:\s+(?:about|on))?|search\s+for|look\s+up|tell\s+me\s+about)\s+(?P<topic>.{3,})",
    RuleKind::Capture,
)];

static COMPARE: &[Spec] = &[
    (
        r"(?i)\b(?:compare|difference\s+between)\s+(?P<first>.+?)\s+(?:vs\.?|versus|and|with|to|or)\s+(?P<second>.+)",
        RuleKind::Capture,
    ),
    (
        r"(?i)(?P<first>[\w.+#-]+(?:\s+[\w.+#-]+)?)\s+(?:vs\.?|versus)\s+(?P<second>.+)",
        RuleKind::Capture,
    ),
];

static TRENDS: &[Spec] = &[(
    r"(?i)\b(?:trends|latest|recent\s+developments)\s+(?:in|on|for|of)\s+(?P<topic>.+)",
    RuleKind::Capture,
)];

static FORMAT_DATA: &[Spec] = &[
    (r"(?i)\b(?P<format>json|table|list)\b", RuleKind::Capture),
    (r#""(?P<data>[^"]+)""#, RuleKind::Verbatim),
];

/// Spoken arithmetic rewritten before the expression rule runs.
pub(super) static CALC_REWRITES: &[(&str, &str)] = &[
    (
        r"(?i)\bsquare\s+root\s+(?:of\s+)?(?P<n>\d+(?:\.\d+)?)",
        "sqrt(${n})",
    ),
    (r"(?i)\bsqrt\s+of\s+(?P<n>\d+(?:\.\d+)?)", "sqrt(${n})"),
    (
        r"(?i)(?P<a>\d+(?:\.\d+)?)\s+(?:to\s+the\s+)?power\s+(?:of\s+)?(?P<b>\d+(?:\.\d+)?)",
        "${a}^${b}",
    ),
    (r"(?i)\b(?:times|multiplied\s+by)\b", "*"),
    (r"(?i)\bdivided\s+by\b", "/"),
    (r"(?i)\bplus\b", "+"),
    (r"(?i)\bminus\b", "-"),
];

pub(super) fn specs_for(intent: Intent) -> &'static [Spec] {
    match intent {
        Intent::Calculate => CALCULATE,
        Intent::WebSearch => WEB_SEARCH,
        Intent::Weather => WEATHER,
        Intent::ListDirectory => LIST_DIRECTORY,
        Intent::ReadFile => READ_FILE,
        Intent::FileInfo => FILE_INFO,
        Intent::SearchFiles => SEARCH_FILES,
        Intent::CurrentDirectory => &[],
        Intent::AnalyzeText => ANALYZE_TEXT,
        Intent::ExtractKeywords => EXTRACT_KEYWORDS,
        Intent::ProcessCsv => PROCESS_CSV,
        Intent::SummaryStats => SUMMARY_STATS,
        Intent::GenerateHash => GENERATE_HASH,
        Intent::Research => RESEARCH,
        Intent::Compare => COMPARE,
        Intent::Trends => TRENDS,
        Intent::FormatData => FORMAT_DATA,
    }
}
