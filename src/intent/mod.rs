//! Intent classification
//!
//! Maps a free-text utterance onto a closed set of capability tags using an
//! ordered table of phrase rules. Tables are plain data: each [`IntentRule`]
//! pairs one tag with the phrases that trigger it, and the first rule in
//! declaration order with any matching phrase wins.
//!
//! ```
//! use switchboard::intent::{Intent, IntentRule, Phrase, RuleTable};
//!
//! static RULES: &[IntentRule<Intent>] = &[
//!     IntentRule::new(Intent::Calculate, &[Phrase::Sub("calculate")]),
//!     IntentRule::new(Intent::ListDirectory, &[Phrase::Word("ls")]),
//! ];
//!
//! let table = RuleTable::new(RULES);
//! assert_eq!(table.classify("Calculate 2 + 2"), Some(Intent::Calculate));
//! assert_eq!(table.classify("also"), None);
//! ```
//!
//! Classification reads only the utterance. Conversation history is never
//! consulted, so the same input always yields the same tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability tags a tool can be dispatched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Calculate,
    WebSearch,
    Weather,
    ListDirectory,
    ReadFile,
    FileInfo,
    SearchFiles,
    CurrentDirectory,
    AnalyzeText,
    ExtractKeywords,
    ProcessCsv,
    SummaryStats,
    GenerateHash,
    Research,
    Compare,
    Trends,
    FormatData,
}

impl Intent {
    pub const ALL: [Intent; 17] = [
        Intent::Calculate,
        Intent::WebSearch,
        Intent::Weather,
        Intent::ListDirectory,
        Intent::ReadFile,
        Intent::FileInfo,
        Intent::SearchFiles,
        Intent::CurrentDirectory,
        Intent::AnalyzeText,
        Intent::ExtractKeywords,
        Intent::ProcessCsv,
        Intent::SummaryStats,
        Intent::GenerateHash,
        Intent::Research,
        Intent::Compare,
        Intent::Trends,
        Intent::FormatData,
    ];

    /// Stable snake_case name, used in logs and operation records.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Calculate => "calculate",
            Intent::WebSearch => "web_search",
            Intent::Weather => "weather",
            Intent::ListDirectory => "list_directory",
            Intent::ReadFile => "read_file",
            Intent::FileInfo => "file_info",
            Intent::SearchFiles => "search_files",
            Intent::CurrentDirectory => "current_directory",
            Intent::AnalyzeText => "analyze_text",
            Intent::ExtractKeywords => "extract_keywords",
            Intent::ProcessCsv => "process_csv",
            Intent::SummaryStats => "summary_stats",
            Intent::GenerateHash => "generate_hash",
            Intent::Research => "research",
            Intent::Compare => "compare",
            Intent::Trends => "trends",
            Intent::FormatData => "format_data",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversational categories recognised by the fallback responder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmallTalk {
    Greeting,
    Wellbeing,
    Help,
    Farewell,
}

/// A trigger phrase, matched against the lower-cased utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    /// Matches anywhere, including inside longer words.
    Sub(&'static str),
    /// Matches only between word boundaries ("ls" does not fire on "tools").
    Word(&'static str),
}

impl Phrase {
    pub fn text(&self) -> &'static str {
        match self {
            Phrase::Sub(s) | Phrase::Word(s) => s,
        }
    }

    /// `lowered` must already be lower-cased.
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Phrase::Sub(needle) => lowered.contains(needle),
            Phrase::Word(needle) => contains_word(lowered, needle),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

/// One row of a rule table
#[derive(Debug, Clone, Copy)]
pub struct IntentRule<T: 'static> {
    pub tag: T,
    pub phrases: &'static [Phrase],
}

impl<T> IntentRule<T> {
    pub const fn new(tag: T, phrases: &'static [Phrase]) -> Self {
        Self { tag, phrases }
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.phrases.iter().any(|p| p.matches(lowered))
    }
}

/// Prioritized phrase-set table. Declaration order is priority order.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<T: 'static> {
    rules: &'static [IntentRule<T>],
}

impl<T: Copy + PartialEq> RuleTable<T> {
    pub const fn new(rules: &'static [IntentRule<T>]) -> Self {
        Self { rules }
    }

    pub const fn empty() -> Self {
        Self { rules: &[] }
    }

    pub fn rules(&self) -> &'static [IntentRule<T>] {
        self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching tag in declaration order, or `None` when nothing matches.
    pub fn classify(&self, utterance: &str) -> Option<T> {
        let lowered = utterance.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.tag)
    }

    /// Every matching tag, deduplicated, in declaration order.
    pub fn classify_all(&self, utterance: &str) -> Vec<T> {
        let lowered = utterance.to_lowercase();
        let mut tags: Vec<T> = Vec::new();
        for rule in self.rules.iter().filter(|r| r.matches(&lowered)) {
            if !tags.contains(&rule.tag) {
                tags.push(rule.tag);
            }
        }
        tags
    }

    /// Distinct tags the table can produce.
    pub fn tags(&self) -> Vec<T> {
        let mut tags: Vec<T> = Vec::new();
        for rule in self.rules {
            if !tags.contains(&rule.tag) {
                tags.push(rule.tag);
            }
        }
        tags
    }
}

static SMALL_TALK_RULES: &[IntentRule<SmallTalk>] = &[
    IntentRule::new(
        SmallTalk::Greeting,
        &[
            Phrase::Word("hello"),
            Phrase::Word("hi"),
            Phrase::Word("hey"),
            Phrase::Word("greetings"),
        ],
    ),
    IntentRule::new(
        SmallTalk::Wellbeing,
        &[
            Phrase::Sub("how are you"),
            Phrase::Sub("how do you do"),
            Phrase::Sub("what's up"),
        ],
    ),
    IntentRule::new(
        SmallTalk::Help,
        &[
            Phrase::Sub("what can you do"),
            Phrase::Sub("capabilities"),
            Phrase::Word("help"),
            Phrase::Sub("abilities"),
        ],
    ),
    IntentRule::new(
        SmallTalk::Farewell,
        &[
            Phrase::Sub("goodbye"),
            Phrase::Word("bye"),
            Phrase::Sub("see you"),
            Phrase::Sub("farewell"),
            Phrase::Word("thanks"),
        ],
    ),
];

/// Small-talk table shared by every agent profile.
pub const SMALL_TALK: RuleTable<SmallTalk> = RuleTable::new(SMALL_TALK_RULES);
