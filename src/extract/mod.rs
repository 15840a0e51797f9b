//! Parameter extraction
//!
//! Each intent owns an ordered list of [`ExtractionRule`]s. A rule is a
//! compiled regex plus a [`RuleKind`] describing how matches become
//! [`ParamValue`]s. Rules run in order and the first rule to produce a value
//! for a parameter name keeps it; later rules only fill names still missing.
//!
//! Rule order within an intent follows one convention: quoted strings first,
//! then tokens that look like file names, then tokens that look like paths,
//! then bare-word heuristics.

mod rules;

use crate::intent::Intent;
use crate::types::{AppError, Result};
use regex::{Captures, Regex};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// A single extracted value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    Numbers(Vec<f64>),
    Flag(bool),
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Number(n) => serializer.serialize_f64(*n),
            ParamValue::Numbers(ns) => ns.serialize(serializer),
            ParamValue::Flag(b) => serializer.serialize_bool(*b),
        }
    }
}

/// Ordered parameter map produced by [`extract`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when calling tools directly.
    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_text(self, name: &str, value: impl Into<String>) -> Self {
        self.with(name, ParamValue::Text(value.into()))
    }

    pub fn insert(&mut self, name: &str, value: ParamValue) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(ParamValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name) {
            Some(ParamValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn numbers(&self, name: &str) -> Option<&[f64]> {
        match self.0.get(name) {
            Some(ParamValue::Numbers(ns)) => Some(ns.as_slice()),
            _ => None,
        }
    }

    /// Missing flags read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(ParamValue::Flag(true)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// How a rule's matches turn into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Every participating named group sets its parameter, with surrounding
    /// whitespace and trailing punctuation removed.
    Capture,
    /// Like `Capture` but keeps the text exactly as matched (quoted strings).
    Verbatim,
    /// Parses the first match as a number.
    Number(&'static str),
    /// Parses every match as a number.
    Numbers(&'static str),
    /// Sets `true` when the pattern matches anywhere.
    Flag(&'static str),
    /// Joins every match with newlines.
    JoinLines(&'static str),
    /// Keeps the longest match that contains a digit.
    Longest(&'static str),
}

/// A compiled extraction rule
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pattern: Regex,
    kind: RuleKind,
}

impl ExtractionRule {
    pub fn new(pattern: &str, kind: RuleKind) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| AppError::Config(format!("invalid extraction pattern {pattern:?}: {e}")))?;
        Ok(Self { pattern, kind })
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    fn apply(&self, utterance: &str, params: &mut Params) -> Result<()> {
        match self.kind {
            RuleKind::Capture | RuleKind::Verbatim => {
                let Some(caps) = self.pattern.captures(utterance) else {
                    return Ok(());
                };
                for name in self.pattern.capture_names().flatten() {
                    if params.contains(name) {
                        continue;
                    }
                    if let Some(m) = caps.name(name) {
                        let value = if self.kind == RuleKind::Capture {
                            clean(m.as_str())
                        } else {
                            m.as_str()
                        };
                        if !value.is_empty() {
                            params.insert(name, ParamValue::Text(value.to_string()));
                        }
                    }
                }
            }
            RuleKind::Number(name) => {
                if params.contains(name) {
                    return Ok(());
                }
                if let Some(caps) = self.pattern.captures(utterance) {
                    params.insert(name, ParamValue::Number(parse_number(primary(&caps))?));
                }
            }
            RuleKind::Numbers(name) => {
                if params.contains(name) {
                    return Ok(());
                }
                let numbers = self
                    .pattern
                    .captures_iter(utterance)
                    .map(|caps| parse_number(primary(&caps)))
                    .collect::<Result<Vec<f64>>>()?;
                if !numbers.is_empty() {
                    params.insert(name, ParamValue::Numbers(numbers));
                }
            }
            RuleKind::Flag(name) => {
                if !params.contains(name) && self.pattern.is_match(utterance) {
                    params.insert(name, ParamValue::Flag(true));
                }
            }
            RuleKind::JoinLines(name) => {
                if params.contains(name) {
                    return Ok(());
                }
                let lines: Vec<&str> = self
                    .pattern
                    .captures_iter(utterance)
                    .map(|caps| primary(&caps).trim())
                    .filter(|line| !line.is_empty())
                    .collect();
                if !lines.is_empty() {
                    params.insert(name, ParamValue::Text(lines.join("\n")));
                }
            }
            RuleKind::Longest(name) => {
                if params.contains(name) {
                    return Ok(());
                }
                let best = self
                    .pattern
                    .captures_iter(utterance)
                    .map(|caps| primary(&caps).trim())
                    .filter(|m| m.chars().any(|c| c.is_ascii_digit()))
                    .max_by_key(|m| m.len());
                if let Some(best) = best {
                    params.insert(name, ParamValue::Text(best.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Group 1 when the pattern has one, otherwise the whole match.
fn primary<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(1)
        .or_else(|| caps.get(0))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

fn parse_number(raw: &str) -> Result<f64> {
    let trimmed = raw.trim().trim_end_matches('.');
    trimmed
        .parse::<f64>()
        .map_err(|_| AppError::Parameter(format!("could not read '{}' as a number", raw.trim())))
}

/// Strip surrounding whitespace and sentence punctuation, leaving `..` and `/.` intact.
fn clean(raw: &str) -> &str {
    let mut s = raw.trim().trim_end_matches(['?', '!', ',', ';']);
    while s.ends_with('.') && !s.ends_with("..") && !s.ends_with("/.") && s != "." {
        s = &s[..s.len() - 1];
    }
    s.trim()
}

/// Apply `rules` in order to `utterance`.
///
/// Returns an empty map when nothing matches. A numeric match that fails to
/// parse yields `AppError::Parameter`.
pub fn extract(utterance: &str, rules: &[ExtractionRule]) -> Result<Params> {
    let mut params = Params::new();
    for rule in rules {
        rule.apply(utterance, &mut params)?;
    }
    Ok(params)
}

/// Compiled rule sets for every intent, plus the calculator's phrase rewrites.
#[derive(Debug, Clone)]
pub struct Extractor {
    rules: HashMap<Intent, Vec<ExtractionRule>>,
    rewrites: Vec<(Regex, &'static str)>,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        let mut compiled = HashMap::new();
        for intent in Intent::ALL {
            let set = rules::specs_for(intent)
                .iter()
                .map(|(pattern, kind)| ExtractionRule::new(pattern, *kind))
                .collect::<Result<Vec<_>>>()?;
            compiled.insert(intent, set);
        }

        let rewrites = rules::CALC_REWRITES
            .iter()
            .map(|(pattern, replacement)| {
                Regex::new(pattern)
                    .map(|re| (re, *replacement))
                    .map_err(|e| AppError::Config(format!("invalid rewrite {pattern:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules: compiled,
            rewrites,
        })
    }

    pub fn rules_for(&self, intent: Intent) -> &[ExtractionRule] {
        self.rules.get(&intent).map(Vec::as_slice).unwrap_or_default()
    }

    /// Rewrite spoken arithmetic ("square root of 16", "2 power 3", "6 times 7")
    /// into operator form.
    pub fn normalize_math(&self, utterance: &str) -> String {
        self.rewrites
            .iter()
            .fold(utterance.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, *replacement).into_owned()
            })
    }

    /// Extract parameters for `intent`, normalizing arithmetic phrasing first
    /// when the intent is `Calculate`.
    pub fn extract_for(&self, intent: Intent, utterance: &str) -> Result<Params> {
        match intent {
            Intent::Calculate => extract(&self.normalize_math(utterance), self.rules_for(intent)),
            _ => extract(utterance, self.rules_for(intent)),
        }
    }
}
