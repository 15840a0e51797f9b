//! Text and data analysis tools.

use crate::extract::Params;
use crate::tools::{ToolContext, ToolOutput};
use crate::types::{AppError, Result};
use serde::Serialize;
use serde_json::json;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

const WORDS_PER_MINUTE: usize = 200;
const TOP_WORDS: usize = 5;
const TOP_KEYWORDS: usize = 10;
/// Share of cells that must parse as numbers for a CSV column to count as numeric
const NUMERIC_COLUMN_RATIO: f64 = 0.7;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "love", "like", "happy",
    "joy",
];
const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "dislike",
    "sad",
    "angry",
    "frustrated",
    "disappointed",
];

const STOP_WORDS: &[&str] = &[
    "that", "this", "with", "have", "will", "from", "they", "been", "were", "said", "each",
    "which", "their", "time", "would", "there", "could", "other", "more", "very", "what", "know",
    "just", "first", "into", "over", "think", "also", "your", "work", "life", "only", "still",
    "should", "after", "being", "made", "before", "about", "when", "them", "than", "then",
];

/// Metrics computed by `analyze_text`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    pub characters: usize,
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub reading_minutes: usize,
    pub top_words: Vec<(String, usize)>,
    pub avg_word_length: f64,
    pub avg_sentence_length: f64,
    pub unique_words: usize,
    pub vocabulary_diversity: f64,
    pub sentiment: String,
    pub sentiment_score: i64,
    pub readability: String,
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Word counts sorted by frequency, ties broken alphabetically.
fn ranked(words: impl IntoIterator<Item = String>) -> Vec<(String, usize)> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for w in words {
        *freq.entry(w).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub fn analyze(text: &str) -> TextAnalysis {
    let words = tokens(text);
    let word_count = text.split_whitespace().count();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    let paragraphs = text
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count();

    let positive = words
        .iter()
        .filter(|w| POSITIVE_WORDS.contains(&w.as_str()))
        .count() as i64;
    let negative = words
        .iter()
        .filter(|w| NEGATIVE_WORDS.contains(&w.as_str()))
        .count() as i64;
    let score = positive - negative;
    let sentiment = match score {
        s if s > 0 => "positive",
        s if s < 0 => "negative",
        _ => "neutral",
    };

    let avg_word_length = if words.is_empty() {
        0.0
    } else {
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
    };
    let avg_sentence_length = if sentences == 0 {
        0.0
    } else {
        word_count as f64 / sentences as f64
    };
    let readability = if avg_sentence_length < 15.0 {
        "easy"
    } else if avg_sentence_length < 25.0 {
        "moderate"
    } else {
        "difficult"
    };

    let ranked_words = ranked(words.iter().cloned());
    let unique_words = ranked_words.len();

    TextAnalysis {
        characters: text.chars().count(),
        words: word_count,
        sentences,
        paragraphs,
        reading_minutes: (word_count / WORDS_PER_MINUTE).max(1),
        top_words: ranked_words.into_iter().take(TOP_WORDS).collect(),
        avg_word_length,
        avg_sentence_length,
        unique_words,
        vocabulary_diversity: if word_count == 0 {
            0.0
        } else {
            unique_words as f64 / word_count as f64 * 100.0
        },
        sentiment: sentiment.to_string(),
        sentiment_score: score,
        readability: readability.to_string(),
    }
}

fn required_text<'p>(params: &'p Params, what: &str) -> Result<&'p str> {
    params
        .text("text")
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Parameter(format!("No text given for {what}")))
}

pub fn render_analysis(a: &TextAnalysis) -> String {
    let mut out = format!(
        "📊 **Text Analysis Results:**\n\n\
         **Basic Metrics:**\n\
         • Characters: {}\n\
         • Words: {}\n\
         • Sentences: {}\n\
         • Paragraphs: {}\n\
         • Estimated reading time: {} minute(s)\n\n\
         **Most Common Words:**",
        a.characters, a.words, a.sentences, a.paragraphs, a.reading_minutes
    );
    for (word, count) in &a.top_words {
        out.push_str(&format!("\n• '{word}': {count} times"));
    }
    out.push_str(&format!(
        "\n\n**Complexity Indicators:**\n\
         • Average word length: {:.1} characters\n\
         • Average sentence length: {:.1} words\n\
         • Vocabulary diversity: {}/{} ({:.1}%)\n\
         • Readability: {}\n\
         • Sentiment: {} (score: {})",
        a.avg_word_length,
        a.avg_sentence_length,
        a.unique_words,
        a.words,
        a.vocabulary_diversity,
        a.readability,
        a.sentiment,
        a.sentiment_score
    ));
    out
}

pub fn analyze_text(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let text = required_text(params, "analysis")?;
    let analysis = analyze(text);
    let value = serde_json::to_value(&analysis)
        .map_err(|e| AppError::ToolExecution(format!("Could not encode analysis: {e}")))?;
    Ok(ToolOutput::new(value, render_analysis(&analysis)))
}

pub fn extract_keywords(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let text = required_text(params, "keyword extraction")?;
    let keywords: Vec<(String, usize)> = ranked(
        tokens(text)
            .into_iter()
            .filter(|w| w.chars().count() >= 4 && !STOP_WORDS.contains(&w.as_str())),
    )
    .into_iter()
    .take(TOP_KEYWORDS)
    .collect();

    if keywords.is_empty() {
        return Err(AppError::ToolExecution(
            "No keywords found (words need at least 4 letters)".to_string(),
        ));
    }

    let mut message = format!("🔑 **Top {} Keywords:**\n", keywords.len());
    for (i, (word, freq)) in keywords.iter().enumerate() {
        message.push_str(&format!("{}. **{}** (appears {} times)\n", i + 1, word, freq));
    }

    Ok(ToolOutput::new(
        json!({
            "keywords": keywords
                .iter()
                .map(|(w, n)| json!({ "word": w, "count": n }))
                .collect::<Vec<_>>()
        }),
        message.trim_end().to_string(),
    ))
}

/// Count, sum, mean, median, min, max, range, population variance and deviation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub variance: f64,
    pub std_dev: f64,
}

pub fn stats(numbers: &[f64]) -> Option<SummaryStats> {
    if numbers.is_empty() {
        return None;
    }
    let n = numbers.len();
    let sum: f64 = numbers.iter().sum();
    let mean = sum / n as f64;
    let mut sorted = numbers.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let variance = numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    let min = sorted[0];
    let max = sorted[n - 1];
    Some(SummaryStats {
        count: n,
        sum,
        mean,
        median,
        min,
        max,
        range: max - min,
        variance,
        std_dev: variance.sqrt(),
    })
}

pub fn summary_stats(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let numbers = params
        .numbers("numbers")
        .ok_or_else(|| AppError::Parameter("No numbers given".to_string()))?;
    let s = stats(numbers).ok_or_else(|| AppError::Parameter("No numbers given".to_string()))?;

    let message = format!(
        "📊 **Summary Statistics:**\n\n\
         **Basic Stats:**\n\
         • Count: {}\n\
         • Sum: {:.2}\n\
         • Mean: {:.2}\n\
         • Median: {:.2}\n\n\
         **Spread:**\n\
         • Min: {:.2}\n\
         • Max: {:.2}\n\
         • Range: {:.2}\n\
         • Standard Deviation: {:.2}\n\
         • Variance: {:.2}",
        s.count, s.sum, s.mean, s.median, s.min, s.max, s.range, s.std_dev, s.variance
    );
    let value = serde_json::to_value(&s)
        .map_err(|e| AppError::ToolExecution(format!("Could not encode statistics: {e}")))?;
    Ok(ToolOutput::new(value, message))
}

/// Header and records, with quoted fields and surrounding whitespace handled.
fn parse_csv(data: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let invalid = |e: csv::Error| AppError::Parameter(format!("Invalid CSV: {e}"));
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data.as_bytes());

    let header = reader
        .headers()
        .map_err(invalid)?
        .iter()
        .map(str::to_string)
        .collect();
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(invalid)?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok((header, records))
}

pub fn process_csv(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let data = params
        .text("csv")
        .ok_or_else(|| AppError::Parameter("No CSV data given".to_string()))?;
    let (header, records) = parse_csv(data)?;
    if header.is_empty() || records.is_empty() {
        return Err(AppError::Parameter(
            "Need a header line and at least one data row".to_string(),
        ));
    }
    // Rows with the wrong number of fields are dropped.
    let rows: Vec<Vec<String>> = records
        .into_iter()
        .filter(|row| row.len() == header.len())
        .collect();

    let mut message = format!(
        "📈 **CSV Data Analysis:**\n\n\
         **Structure:**\n\
         • Columns: {}\n\
         • Rows: {}\n\
         • Total cells: {}\n\n\
         **Columns:**",
        header.len(),
        rows.len(),
        header.len() * rows.len()
    );
    for (i, col) in header.iter().enumerate() {
        message.push_str(&format!("\n{}. {}", i + 1, col));
    }

    let mut numeric = Vec::new();
    for (idx, name) in header.iter().enumerate() {
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|row| row[idx].parse::<f64>().ok())
            .collect();
        if !rows.is_empty() && values.len() as f64 > rows.len() as f64 * NUMERIC_COLUMN_RATIO {
            if let Some(s) = stats(&values) {
                numeric.push(json!({
                    "column": name,
                    "avg": s.mean,
                    "min": s.min,
                    "max": s.max,
                }));
            }
        }
    }

    if !numeric.is_empty() {
        message.push_str("\n\n**Numeric Columns Detected:**");
        for col in &numeric {
            message.push_str(&format!(
                "\n• **{}**: Avg={:.2}, Min={}, Max={}",
                col["column"].as_str().unwrap_or_default(),
                col["avg"].as_f64().unwrap_or_default(),
                col["min"],
                col["max"]
            ));
        }
    }

    Ok(ToolOutput::new(
        json!({
            "columns": header,
            "rows": rows.len(),
            "numeric_columns": numeric,
        }),
        message,
    ))
}

pub fn generate_hash(_ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let text = params
        .text("text")
        .ok_or_else(|| AppError::Parameter("No text given to hash".to_string()))?;
    let bytes = text.as_bytes();
    let md5 = format!("{:x}", md5::compute(bytes));
    let sha1 = hex::encode(Sha1::digest(bytes));
    let sha256 = hex::encode(Sha256::digest(bytes));

    let preview: String = text.chars().take(50).collect();
    let ellipsis = if text.chars().count() > 50 { "..." } else { "" };
    let message = format!(
        "🔐 **Hash Values for:** \"{preview}{ellipsis}\"\n\n\
         • **MD5:** `{md5}`\n\
         • **SHA-1:** `{sha1}`\n\
         • **SHA-256:** `{sha256}`"
    );

    Ok(ToolOutput::new(
        json!({ "md5": md5, "sha1": sha1, "sha256": sha256, "length": bytes.len() }),
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ToolContext {
        ToolContext::new(".")
    }

    #[test]
    fn test_analyze_counts() {
        let a = analyze("I love Rust. Rust is great!\n\nIt is fast.");
        assert_eq!(a.words, 9);
        assert_eq!(a.sentences, 3);
        assert_eq!(a.paragraphs, 2);
        assert_eq!(a.top_words[0], ("is".to_string(), 2));
        assert_eq!(a.sentiment, "positive");
        assert_eq!(a.readability, "easy");
    }

    #[test]
    fn test_analyze_empty_is_safe() {
        let a = analyze("");
        assert_eq!(a.words, 0);
        assert_eq!(a.vocabulary_diversity, 0.0);
    }

    #[test]
    fn test_keywords_skip_stop_words() {
        let params = Params::new().with_text("text", "this rust compiler makes rust programs safe");
        let out = extract_keywords(&ctx(), &params).unwrap();
        assert_eq!(out.value["keywords"][0]["word"], "rust");
        assert!(!out.message.contains("**this**"));
    }

    #[test]
    fn test_stats() {
        let s = stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.mean, 5.0);
        assert_eq!(s.median, 4.5);
        assert_eq!(s.std_dev, 2.0);
        assert_eq!(s.range, 7.0);
        assert!(stats(&[]).is_none());
    }

    #[test]
    fn test_csv_numeric_columns() {
        let params = Params::new().with_text("csv", "name,age,city\nann,31,Oslo\nbob,27,Rome");
        let out = process_csv(&ctx(), &params).unwrap();
        assert_eq!(out.value["rows"], 2);
        let numeric = out.value["numeric_columns"].as_array().unwrap();
        assert_eq!(numeric.len(), 1);
        assert_eq!(numeric[0]["column"], "age");
        assert_eq!(numeric[0]["avg"], 29.0);
    }

    #[test]
    fn test_csv_quoted_fields_keep_commas() {
        let data = "name,address,score\n\"Doe, Jane\",\"1 Main St, Oslo\",90\nbob,Rome,70\n";
        let out = process_csv(&ctx(), &Params::new().with_text("csv", data)).unwrap();
        assert_eq!(out.value["columns"], json!(["name", "address", "score"]));
        assert_eq!(out.value["rows"], 2);
        assert_eq!(out.value["numeric_columns"][0]["column"], "score");
        assert_eq!(out.value["numeric_columns"][0]["avg"], 80.0);
    }

    #[test]
    fn test_csv_needs_two_lines() {
        let params = Params::new().with_text("csv", "a,b");
        assert!(matches!(
            process_csv(&ctx(), &params).unwrap_err(),
            AppError::Parameter(_)
        ));
    }

    #[test]
    fn test_hashes_match_known_digests() {
        let out = generate_hash(&ctx(), &Params::new().with_text("text", "hello")).unwrap();
        assert_eq!(out.value["md5"], "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(out.value["sha1"], "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
        assert_eq!(
            out.value["sha256"],
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
