//! Static agent profiles.
//!
//! Every agent is the same [`Agent`](super::Agent) type; what differs is the
//! profile it is built from: the intent table it routes with, the replies it
//! falls back on, the system prompt sent to a completion service and the
//! default sampling parameters.

use crate::intent::{Intent, IntentRule, Phrase, RuleTable};
use crate::llm::{ModelParams, Templates};
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six agent flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Simple,
    Tools,
    CustomTools,
    WebResearch,
    FileManager,
    MultiAgent,
}

impl AgentKind {
    pub const ALL: [AgentKind; 6] = [
        AgentKind::Simple,
        AgentKind::Tools,
        AgentKind::CustomTools,
        AgentKind::WebResearch,
        AgentKind::FileManager,
        AgentKind::MultiAgent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Simple => "simple",
            AgentKind::Tools => "tools",
            AgentKind::CustomTools => "custom_tools",
            AgentKind::WebResearch => "web_research",
            AgentKind::FileManager => "file_manager",
            AgentKind::MultiAgent => "multi_agent",
        }
    }

    pub fn profile(&self) -> &'static AgentProfile {
        match self {
            AgentKind::Simple => &SIMPLE,
            AgentKind::Tools => &TOOLS,
            AgentKind::CustomTools => &CUSTOM_TOOLS,
            AgentKind::WebResearch => &WEB_RESEARCH,
            AgentKind::FileManager => &FILE_MANAGER,
            AgentKind::MultiAgent => &MULTI_AGENT,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| {
                AppError::Config(format!(
                    "Unknown agent kind '{}' (expected one of: {})",
                    s,
                    AgentKind::ALL.map(|k| k.name()).join(", ")
                ))
            })
    }
}

/// How an agent turns an utterance into tool calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// First matching intent runs one tool
    Single,
    /// Every matching intent runs, in declaration order
    Coordinated,
}

/// Everything that distinguishes one agent kind from another
pub struct AgentProfile {
    pub kind: AgentKind,
    pub display_name: &'static str,
    pub intents: RuleTable<Intent>,
    pub routing: Routing,
    pub templates: Templates,
    pub system_prompt: &'static str,
    pub params: ModelParams,
}

impl AgentProfile {
    /// Number of distinct tools this profile can dispatch to.
    pub fn tool_count(&self) -> usize {
        self.intents.tags().len()
    }
}

// ============= Simple =============

static SIMPLE: AgentProfile = AgentProfile {
    kind: AgentKind::Simple,
    display_name: "Simple Agent",
    intents: RuleTable::empty(),
    routing: Routing::Single,
    templates: Templates {
        greeting: "Hello! I'm a Simple Agent.\n\n\
                   I'm designed for natural conversation and can help with:\n\
                   • General questions and discussions\n\
                   • Basic information requests\n\
                   • Casual conversation\n\n\
                   How can I assist you today?",
        wellbeing: "I'm doing well, thank you for asking!\n\n\
                    I'm running properly and ready to help. \
                    Is there anything specific you'd like to talk about?",
        help: "As a Simple Agent, I have a few capabilities:\n\n\
               **Conversation:**\n\
               • Natural language replies when a language model is configured\n\
               • Conversation history tracking\n\n\
               **Limitations:**\n\
               • No real-time information\n\
               • No calculations (try the tools agent for that!)\n\
               • No web or file access\n\n\
               What would you like to explore together?",
        farewell: "Goodbye! It was great chatting with you.\n\n\
                   Feel free to come back anytime or try out the other agents. 👋",
        capabilities: "Thanks for your message!\n\n\
                       As a Simple Agent I aim to be helpful and conversational. \
                       I don't have specialized tools or real-time data, but I can:\n\
                       • Engage in conversation\n\
                       • Provide general information and explanations\n\
                       • Help you explore ideas\n\n\
                       **For more advanced capabilities, try:**\n\
                       • **tools**: calculations, web search, weather and files\n\
                       • **web_research**: research, comparisons and trends\n\
                       • **file_manager**: browsing and reading files\n\n\
                       What would you like to explore together?",
    },
    system_prompt: "You are a helpful, friendly conversational assistant. \
                    Answer clearly and concisely. You have no tools and no access \
                    to real-time information.",
    params: ModelParams {
        temperature: 0.7,
        max_tokens: 1000,
    },
};

// ============= Tools =============

static TOOLS_RULES: &[IntentRule<Intent>] = &[
    IntentRule::new(
        Intent::Calculate,
        &[
            Phrase::Sub("calculate"),
            Phrase::Sub("compute"),
            Phrase::Sub("math"),
            Phrase::Sub("solve"),
        ],
    ),
    IntentRule::new(
        Intent::WebSearch,
        &[
            Phrase::Sub("search"),
            Phrase::Sub("find"),
            Phrase::Sub("lookup"),
            Phrase::Sub("google"),
        ],
    ),
    IntentRule::new(
        Intent::Weather,
        &[
            Phrase::Sub("weather"),
            Phrase::Sub("temperature"),
            Phrase::Sub("forecast"),
        ],
    ),
    IntentRule::new(
        Intent::ListDirectory,
        &[
            Phrase::Sub("list files"),
            Phrase::Sub("show files"),
            Phrase::Sub("directory"),
        ],
    ),
    IntentRule::new(
        Intent::ReadFile,
        &[
            Phrase::Sub("read file"),
            Phrase::Sub("show file"),
            Phrase::Sub("open file"),
        ],
    ),
];

static TOOLS: AgentProfile = AgentProfile {
    kind: AgentKind::Tools,
    display_name: "Agent with Tools",
    intents: RuleTable::new(TOOLS_RULES),
    routing: Routing::Single,
    templates: Templates {
        greeting: "Hello! I'm an Agent with Tools.\n\n\
                   I can calculate, search the web, check the weather and work with files. \
                   What would you like to do?",
        wellbeing: "I'm doing great, thanks! All my tools are loaded and ready. \
                    Want to try a calculation or a search?",
        help: "I'm an agent with access to several tools:\n\n\
               🧮 **Calculator**: `calculate 15 * 8`, `calculate square root of 16`\n\
               🔍 **Web Search**: `search rust async runtimes`\n\
               🌤️ **Weather**: `weather in Oslo`\n\
               📁 **Files**: `list files in src`, `read file Cargo.toml`\n\n\
               Just ask naturally and I'll pick the right tool!",
        farewell: "You're welcome! It was great helping you. Come back anytime. 👋",
        capabilities: "I'm not sure which tool fits that request.\n\n\
                       **Try one of these:**\n\
                       • `calculate (15 + 3) / 2`\n\
                       • `search for machine learning`\n\
                       • `weather in London`\n\
                       • `list files`\n\
                       • `read file README.md`",
    },
    system_prompt: "You are an AI assistant with access to a calculator, web search, \
                    weather data and file operations. Those requests are handled by tools \
                    before they reach you; for general conversation respond naturally and helpfully.",
    params: ModelParams {
        temperature: 0.7,
        max_tokens: 1000,
    },
};

// ============= Custom tools =============

static CUSTOM_TOOLS_RULES: &[IntentRule<Intent>] = &[
    IntentRule::new(
        Intent::AnalyzeText,
        &[
            Phrase::Sub("analyze text"),
            Phrase::Sub("text analysis"),
            Phrase::Sub("analyze this text"),
            Phrase::Sub("analyze:"),
        ],
    ),
    IntentRule::new(
        Intent::ExtractKeywords,
        &[
            Phrase::Sub("extract keywords"),
            Phrase::Sub("find keywords"),
            Phrase::Sub("keywords from"),
            Phrase::Sub("keywords:"),
        ],
    ),
    IntentRule::new(
        Intent::ProcessCsv,
        &[
            Phrase::Sub("process csv"),
            Phrase::Sub("analyze csv"),
            Phrase::Sub("csv data"),
        ],
    ),
    IntentRule::new(
        Intent::SummaryStats,
        &[
            Phrase::Sub("statistics for"),
            Phrase::Sub("stats for"),
            Phrase::Sub("summarize numbers"),
        ],
    ),
    IntentRule::new(
        Intent::GenerateHash,
        &[
            Phrase::Sub("generate hash"),
            Phrase::Sub("hash of"),
            Phrase::Sub("hash:"),
            Phrase::Sub("checksum"),
        ],
    ),
];

static CUSTOM_TOOLS: AgentProfile = AgentProfile {
    kind: AgentKind::CustomTools,
    display_name: "Custom Tool Agent",
    intents: RuleTable::new(CUSTOM_TOOLS_RULES),
    routing: Routing::Single,
    templates: Templates {
        greeting: "Hello! I'm a Custom Tool Agent with specialized data tools.\n\n\
                   I can analyze text, extract keywords, process CSV data, \
                   summarize numbers and generate hashes.",
        wellbeing: "I'm running smoothly, thanks for asking! My data tools are ready.",
        help: "🛠️ **My custom tools:**\n\n\
               📊 **Text analysis**: `analyze text \"Your text here\"`\n\
               🔑 **Keywords**: `extract keywords from \"Your text here\"`\n\
               📈 **CSV**: `process csv data:` followed by comma-separated lines\n\
               🔢 **Statistics**: `stats for 1, 2, 3, 4, 5`\n\
               🔐 **Hashing**: `generate hash \"hello\"`",
        farewell: "Thanks for trying the custom tools! Goodbye. 👋",
        capabilities: "That doesn't match one of my tools.\n\n\
                       **Try:**\n\
                       • `analyze text \"I love this product\"`\n\
                       • `extract keywords from \"Rust makes systems programming safer\"`\n\
                       • `stats for 10, 20, 30`\n\
                       • `hash: hello world`",
    },
    system_prompt: "You are a data assistant with text analysis, keyword extraction, CSV \
                    processing, statistics and hashing tools. Those requests are handled by \
                    tools; for anything else answer helpfully and briefly.",
    params: ModelParams {
        temperature: 0.7,
        max_tokens: 1000,
    },
};

// ============= Web research =============

static WEB_RESEARCH_RULES: &[IntentRule<Intent>] = &[
    IntentRule::new(
        Intent::Research,
        &[
            Phrase::Sub("research"),
            Phrase::Sub("find information"),
            Phrase::Sub("search for"),
            Phrase::Sub("look up"),
        ],
    ),
    IntentRule::new(
        Intent::Compare,
        &[
            Phrase::Sub("compare"),
            Phrase::Sub("versus"),
            Phrase::Word("vs"),
            Phrase::Sub("difference between"),
        ],
    ),
    IntentRule::new(
        Intent::Trends,
        &[
            Phrase::Sub("trends in"),
            Phrase::Sub("latest in"),
            Phrase::Sub("recent developments"),
        ],
    ),
];

static WEB_RESEARCH: AgentProfile = AgentProfile {
    kind: AgentKind::WebResearch,
    display_name: "Web Research Agent",
    intents: RuleTable::new(WEB_RESEARCH_RULES),
    routing: Routing::Single,
    templates: Templates {
        greeting: "Hello! I'm a Web Research Agent.\n\n\
                   I gather sources, analyze them and synthesize a report. \
                   What would you like me to research?",
        wellbeing: "I'm doing well and ready to dig into a topic for you!",
        help: "🔍 **Research capabilities:**\n\n\
               • **Research**: `research quantum computing`\n\
               • **Compare**: `compare Python vs JavaScript`\n\
               • **Trends**: `trends in artificial intelligence`\n\n\
               Results are gathered from mock sources and summarized.",
        farewell: "Happy researching! Goodbye. 👋",
        capabilities: "I specialize in research tasks.\n\n\
                       **Try:**\n\
                       • `research renewable energy`\n\
                       • `compare Rust vs Go`\n\
                       • `latest in machine learning`",
    },
    system_prompt: "You are a careful research assistant. Summarize what is known, \
                    separate facts from speculation and suggest where to verify claims.",
    params: ModelParams {
        temperature: 0.3,
        max_tokens: 1500,
    },
};

// ============= File manager =============

static FILE_MANAGER_RULES: &[IntentRule<Intent>] = &[
    IntentRule::new(
        Intent::ListDirectory,
        &[
            Phrase::Sub("list files"),
            Phrase::Sub("show files"),
            Phrase::Word("ls"),
            Phrase::Word("dir"),
        ],
    ),
    IntentRule::new(
        Intent::ReadFile,
        &[
            Phrase::Sub("read file"),
            Phrase::Sub("show file"),
            Phrase::Word("cat"),
            Phrase::Sub("open file"),
        ],
    ),
    IntentRule::new(
        Intent::FileInfo,
        &[
            Phrase::Sub("file info"),
            Phrase::Sub("info about"),
            Phrase::Sub("details of"),
        ],
    ),
    IntentRule::new(
        Intent::SearchFiles,
        &[
            Phrase::Sub("search for"),
            Phrase::Sub("find files"),
            Phrase::Sub("search files"),
        ],
    ),
    IntentRule::new(
        Intent::CurrentDirectory,
        &[
            Phrase::Sub("current directory"),
            Phrase::Sub("where am i"),
            Phrase::Word("pwd"),
        ],
    ),
];

static FILE_MANAGER: AgentProfile = AgentProfile {
    kind: AgentKind::FileManager,
    display_name: "File Manager Agent",
    intents: RuleTable::new(FILE_MANAGER_RULES),
    routing: Routing::Single,
    templates: Templates {
        greeting: "Hello! I'm a File Manager Agent.\n\n\
                   I can list, read, inspect and search files inside my sandbox. \
                   Where should we start?",
        wellbeing: "I'm doing well, thanks! The file system is ready to explore.",
        help: "📁 **File operations:**\n\n\
               • **List**: `ls`, `list files in src`, `list files detailed`\n\
               • **Read**: `cat notes.txt`, `read file \"src/main.rs\" first 20 lines`\n\
               • **Info**: `file info Cargo.toml`\n\
               • **Search**: `find files \"*.rs\"`, `find files \"*.md\" containing \"todo\"`\n\
               • **Location**: `pwd`\n\n\
               Paths are resolved inside the sandbox root.",
        farewell: "Goodbye! Your files are right where you left them. 👋",
        capabilities: "I couldn't map that to a file operation.\n\n\
                       **Try:**\n\
                       • `ls`\n\
                       • `cat README.md`\n\
                       • `file info Cargo.toml`\n\
                       • `find files \"*.toml\"`\n\
                       • `where am i`",
    },
    system_prompt: "You are a file management assistant. File operations are handled by \
                    tools inside a sandbox; for other questions give short, practical answers \
                    about organizing and working with files.",
    params: ModelParams {
        temperature: 0.5,
        max_tokens: 1200,
    },
};

// ============= Multi-agent =============

static MULTI_AGENT_RULES: &[IntentRule<Intent>] = &[
    IntentRule::new(
        Intent::Calculate,
        &[
            Phrase::Sub("calculate"),
            Phrase::Sub("compute"),
            Phrase::Sub("math"),
            Phrase::Sub("equation"),
            Phrase::Sub("formula"),
            Phrase::Sub("sqrt"),
            Phrase::Sub("square"),
            Phrase::Sub("root"),
            Phrase::Sub("power"),
            Phrase::Sub("+"),
            Phrase::Sub("-"),
            Phrase::Sub("*"),
            Phrase::Sub("/"),
            Phrase::Sub("sum"),
            Phrase::Sub("average"),
        ],
    ),
    IntentRule::new(
        Intent::AnalyzeText,
        &[
            Phrase::Sub("analyze"),
            Phrase::Sub("sentiment"),
            Phrase::Sub("text"),
            Phrase::Sub("content"),
            Phrase::Sub("words"),
            Phrase::Sub("readability"),
            Phrase::Sub("writing"),
            Phrase::Sub("review"),
            Phrase::Sub("feedback"),
        ],
    ),
    IntentRule::new(
        Intent::FormatData,
        &[
            Phrase::Sub("format"),
            Phrase::Sub("json"),
            Phrase::Sub("table"),
            Phrase::Sub("list"),
            Phrase::Sub("structure"),
            Phrase::Sub("organize"),
            Phrase::Sub("present"),
        ],
    ),
];

static MULTI_AGENT: AgentProfile = AgentProfile {
    kind: AgentKind::MultiAgent,
    display_name: "Multi-Agent System",
    intents: RuleTable::new(MULTI_AGENT_RULES),
    routing: Routing::Coordinated,
    templates: Templates {
        greeting: "Hello! I'm a Multi-Agent System.\n\n\
                   I coordinate a math specialist, a text analysis specialist and a \
                   formatting specialist. Give me a task that needs one or more of them!",
        wellbeing: "All specialists are online and ready to collaborate!",
        help: "🎭 **Specialists I can deploy:**\n\n\
               • **🧮 Math**: calculations, equations, formulas\n\
               • **📊 Text analysis**: sentiment, readability, word counts\n\
               • **📋 Formatting**: JSON, tables, lists\n\n\
               Combine them: `calculate 12 * 4 and format the result as a table`.",
        farewell: "The specialists say goodbye! 👋",
        capabilities: "🎭 **General Coordination Response:**\n\n\
                       As a multi-agent coordinator, I can deploy specialized agents for:\n\
                       • **🧮 Mathematical Operations**: calculations, equations, formulas\n\
                       • **📊 Text Analysis**: content analysis, sentiment, readability\n\
                       • **📋 Data Formatting**: JSON, tables, structured output\n\n\
                       Try requests like:\n\
                       - \"Calculate 250 * 1.05 and format the results\"\n\
                       - \"Analyze this text and present findings in a table\"\n\n\
                       *Provide more specific instructions to activate specialized agents.*",
    },
    system_prompt: "You coordinate math, text analysis and formatting specialists. When no \
                    specialist applies, explain briefly how the user could phrase the task.",
    params: ModelParams {
        temperature: 0.7,
        max_tokens: 1200,
    },
};
