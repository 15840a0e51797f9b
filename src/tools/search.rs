//! Mock research tools.
//!
//! Results are generated locally from the query so they are deterministic
//! and need no network access. The topic family (programming, weather,
//! anything else) decides which canned sources appear.

use crate::extract::Params;
use crate::tools::{ToolContext, ToolOutput};
use crate::types::{AppError, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

const DEFAULT_RESULTS: usize = 5;

/// A single mock search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub relevance: u8,
}

fn hit(title: String, url: String, summary: String, relevance: u8) -> SearchHit {
    SearchHit {
        title,
        url,
        summary,
        relevance,
    }
}

fn slug(query: &str, sep: char) -> String {
    query
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(&sep.to_string())
}

fn family_contains(query: &str, words: &[&str]) -> bool {
    let lowered = query.to_lowercase();
    words.iter().any(|w| lowered.contains(w))
}

/// Deterministic results for `query`, at most `limit` of them.
pub fn mock_results(query: &str, limit: usize) -> Vec<SearchHit> {
    let hits = if family_contains(query, &["python", "programming", "code", "rust"]) {
        vec![
            hit(
                format!("Programming Guide - {query}"),
                "https://doc.rust-lang.org/book/".to_string(),
                format!("Comprehensive guide covering {query} with examples and best practices."),
                9,
            ),
            hit(
                format!("Stack Overflow - {query} Questions"),
                "https://stackoverflow.com/questions".to_string(),
                format!("Community Q&A about {query} with practical solutions."),
                8,
            ),
            hit(
                format!("{query} Tutorial"),
                format!("https://tutorials.example.com/{}", slug(query, '-')),
                format!("In-depth tutorial on {query} for developers."),
                9,
            ),
        ]
    } else if family_contains(query, &["weather", "climate", "temperature"]) {
        vec![
            hit(
                format!("Weather Forecast - {query}"),
                "https://weather.example.com/".to_string(),
                format!("Current weather conditions and forecast for {query}."),
                10,
            ),
            hit(
                format!("Climate Data - {query}"),
                "https://climate.example.gov/".to_string(),
                format!("Historical climate data and trends for {query}."),
                8,
            ),
        ]
    } else {
        vec![
            hit(
                format!("Complete Guide to {query}"),
                format!("https://example.com/{}", slug(query, '-')),
                format!(
                    "Comprehensive information about {query} including key concepts and applications."
                ),
                8,
            ),
            hit(
                format!("{query} - Wikipedia"),
                format!("https://en.wikipedia.org/wiki/{}", slug(query, '_')),
                format!("Encyclopedia entry covering the basics and history of {query}."),
                7,
            ),
            hit(
                format!("Latest News about {query}"),
                format!("https://news.example.com/{}", slug(query, '-')),
                format!("Recent developments and news articles related to {query}."),
                6,
            ),
        ]
    };
    hits.into_iter().take(limit).collect()
}

fn render_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, h)| {
            format!(
                "{}. **{}**\n   🔗 {}\n   📝 {}\n   🕒 Relevance: {}/10",
                i + 1,
                h.title,
                h.url,
                h.summary,
                h.relevance
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn required<'p>(params: &'p Params, name: &str, what: &str) -> Result<&'p str> {
    params
        .text(name)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Parameter(format!("No {what} given")))
}

pub fn web_search(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let query = required(params, "query", "search query")?;
    let hits = mock_results(query, DEFAULT_RESULTS);
    let message = format!(
        "🔍 **Web Search Results for:** \"{query}\"\n\n{}\n\n*Note: these are mock results generated locally.*",
        render_hits(&hits)
    );
    Ok(ToolOutput::new(json!({ "query": query, "results": hits }), message))
}

pub fn research(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let topic = required(params, "topic", "research topic")?;
    let hits = mock_results(topic, DEFAULT_RESULTS);
    let avg_relevance =
        hits.iter().map(|h| f64::from(h.relevance)).sum::<f64>() / hits.len().max(1) as f64;

    let message = format!(
        "📋 **Research Report: {topic}**\n\n\
         **Sources Found:**\n{}\n\n\
         **Content Analysis:**\n\
         • Sources analyzed: {}\n\
         • Average relevance: {:.1}/10\n\
         • Content style: Informational\n\n\
         **Synthesis:**\n\
         Based on the sources gathered, {topic} is a well-documented subject with both \
         introductory and advanced material available.\n\n\
         **Recommendations for Further Research:**\n\
         • Explore specialized academic sources\n\
         • Check for recent developments or updates\n\
         • Verify information with primary sources\n\n\
         *Synthesized {}*",
        render_hits(&hits),
        hits.len(),
        avg_relevance,
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    );

    Ok(ToolOutput::new(
        json!({
            "topic": topic,
            "sources": hits,
            "average_relevance": avg_relevance,
        }),
        message,
    ))
}

pub fn compare(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let first = required(params, "first", "first topic to compare")?;
    let second = required(params, "second", "second topic to compare")?;
    let first_hits = mock_results(first, 2);
    let second_hits = mock_results(second, 2);

    let message = format!(
        "⚖️ **Comparison: {first} vs {second}**\n\n\
         **{first}:**\n{}\n\n\
         **{second}:**\n{}\n\n\
         **Comparison Points:**\n\
         • Documentation: both topics have established reference material\n\
         • Community: see the Q&A and news sources above\n\
         • Recommendation: choose based on your specific requirements",
        render_hits(&first_hits),
        render_hits(&second_hits)
    );

    Ok(ToolOutput::new(
        json!({
            "topics": [first, second],
            "results": [
                { "topic": first, "sources": first_hits },
                { "topic": second, "sources": second_hits },
            ],
        }),
        message,
    ))
}

pub fn trends(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let topic = required(params, "topic", "trend topic")?;
    let recent = mock_results(&format!("latest {topic}"), 3);
    let points = [
        format!("Growing adoption of {topic} in production systems"),
        format!("Tooling and ecosystem around {topic} maturing quickly"),
        format!("Increasing community discussion of {topic} best practices"),
    ];

    let message = format!(
        "📈 **Trend Analysis: {topic}**\n\n\
         **Current Trends:**\n{}\n\n\
         **Recent Coverage:**\n{}",
        points
            .iter()
            .map(|p| format!("• {p}"))
            .collect::<Vec<_>>()
            .join("\n"),
        render_hits(&recent)
    );

    Ok(ToolOutput::new(
        json!({ "topic": topic, "trends": points, "sources": recent }),
        message,
    ))
}
