//! Sandboxed file system tools.
//!
//! Every path a user supplies goes through [`Sandbox::resolve`] before any
//! file system call. Resolution is lexical first (so `..` can never climb
//! above the root) and then canonical for paths that exist (so a symlink
//! inside the root cannot point outside it). Listings and searches never
//! follow symlinks found inside the root.

use crate::extract::Params;
use crate::tools::{ToolContext, ToolOutput};
use crate::types::{AppError, Result};
use chrono::{DateTime, Local};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Recursive listings stop at this depth
const MAX_LIST_DEPTH: usize = 3;
/// File search stops at this depth
const MAX_SEARCH_DEPTH: usize = 10;
const MAX_SEARCH_RESULTS: usize = 50;
const MAX_CONTENT_HITS_PER_FILE: usize = 3;
/// Bytes inspected when sniffing for binary content
const BINARY_SNIFF_BYTES: usize = 8192;

/// Directory that file tools are confined to
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn canonical_root(&self) -> Result<PathBuf> {
        fs::canonicalize(&self.root).map_err(|e| {
            AppError::ToolExecution(format!(
                "Sandbox root {} is not accessible: {e}",
                self.root.display()
            ))
        })
    }

    /// Resolve a user-supplied path to an absolute path inside the sandbox.
    ///
    /// Fails with `AppError::Security` when the path escapes the root,
    /// lexically or through a symlink.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf> {
        let root = self.canonical_root()?;
        let requested = requested.trim();
        let requested = if requested.is_empty() { "." } else { requested };
        let candidate = Path::new(requested);

        let relative: PathBuf = if candidate.is_absolute() {
            let normalized = normalize(candidate).ok_or_else(|| escape(requested))?;
            match normalized.strip_prefix(&root) {
                Ok(rest) => rest.to_path_buf(),
                Err(_) => match normalized.strip_prefix(&self.root) {
                    Ok(rest) => rest.to_path_buf(),
                    Err(_) => return Err(escape(requested)),
                },
            }
        } else {
            candidate.to_path_buf()
        };

        let mut resolved = root.clone();
        for component in relative.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if resolved == root || !resolved.pop() {
                        return Err(escape(requested));
                    }
                }
                Component::Normal(part) => resolved.push(part),
                Component::RootDir | Component::Prefix(_) => return Err(escape(requested)),
            }
        }

        if resolved.exists() {
            let canonical = fs::canonicalize(&resolved)?;
            if !canonical.starts_with(&root) {
                return Err(escape(requested));
            }
            return Ok(canonical);
        }

        Ok(resolved)
    }

    /// Path relative to the root for display, `.` for the root itself.
    pub fn display(&self, path: &Path) -> String {
        let root = self.canonical_root().unwrap_or_else(|_| self.root.clone());
        match path.strip_prefix(&root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.display().to_string(),
            Err(_) => path.display().to_string(),
        }
    }
}

fn escape(requested: &str) -> AppError {
    AppError::Security(format!("Access denied: '{requested}' is outside the sandbox"))
}

/// Lexically normalize an absolute path. `None` if `..` climbs past `/`.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

fn format_time(time: std::io::Result<SystemTime>) -> Option<String> {
    time.ok()
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string())
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn not_found(display: &str) -> AppError {
    AppError::NotFound(format!("Path not found: {display}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
    Link,
}

impl EntryKind {
    fn of(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Link
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Link => "link",
        }
    }
}

struct Entry {
    name: String,
    depth: usize,
    kind: EntryKind,
    size: u64,
    modified: Option<String>,
    mime: Option<String>,
}

impl Entry {
    fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "kind": self.kind.as_str(),
            "size": self.size,
            "modified": self.modified,
            "mime": self.mime,
        })
    }

    fn render(&self, detailed: bool) -> String {
        let indent = "  ".repeat(self.depth);
        let (marker, name) = match self.kind {
            EntryKind::Directory => ("📁", format!("{}/", self.name)),
            EntryKind::Link => ("🔗", format!("{}@", self.name)),
            EntryKind::File => ("📄", self.name.clone()),
        };
        if !detailed {
            return match self.kind {
                EntryKind::File => format!("{indent}{marker} {name} ({})", human_size(self.size)),
                _ => format!("{indent}{marker} {name}"),
            };
        }
        format!(
            "{indent}{marker} {name:<30} {:>10}  {}  {}",
            match self.kind {
                EntryKind::File => human_size(self.size),
                _ => "-".to_string(),
            },
            self.modified.as_deref().unwrap_or("-"),
            self.mime.as_deref().unwrap_or("-"),
        )
    }
}

/// Describe a directory entry without following symlinks, so a link never
/// reveals anything about its target. `None` when the entry vanished or its
/// metadata is unreadable.
fn entry_for(path: &Path, name: String, depth: usize) -> Option<Entry> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable entry");
            return None;
        }
    };
    let kind = EntryKind::of(meta.file_type());
    Some(Entry {
        name,
        depth,
        kind,
        size: if kind == EntryKind::File { meta.len() } else { 0 },
        modified: format_time(meta.modified()),
        mime: (kind == EntryKind::File).then(|| guess_mime(path)),
    })
}

/// `list_directory`: directory contents with 📁/📄 markers.
pub fn list_directory(ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let requested = params.text("path").unwrap_or(".");
    let detailed = params.flag("detailed");
    let recursive = params.flag("recursive");

    let dir = ctx.sandbox.resolve(requested)?;
    let shown = ctx.sandbox.display(&dir);
    if !dir.exists() {
        return Err(AppError::NotFound(format!("Directory not found: {shown}")));
    }
    if !dir.is_dir() {
        return Err(AppError::ToolExecution(format!("Not a directory: {shown}")));
    }

    let mut entries = Vec::new();
    if recursive {
        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(MAX_LIST_DEPTH)
            .sort_by(|a, b| {
                b.file_type()
                    .is_dir()
                    .cmp(&a.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            });
        for item in walker {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let name = item.file_name().to_string_lossy().into_owned();
            entries.extend(entry_for(item.path(), name, item.depth() - 1));
        }
    } else {
        let mut items: Vec<(bool, PathBuf)> = fs::read_dir(&dir)?
            .filter_map(|item| item.ok())
            .map(|item| {
                let is_dir = item.file_type().map(|t| t.is_dir()).unwrap_or(false);
                (is_dir, item.path())
            })
            .collect();
        items.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        for (_, path) in items {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.extend(entry_for(&path, name, 0));
        }
    }

    let mut message = format!("📁 **Contents of {shown}:**\n\n");
    if entries.is_empty() {
        message.push_str("*Directory is empty*");
    } else {
        let dirs = entries.iter().filter(|e| e.is_dir()).count();
        let links = entries.iter().filter(|e| e.kind == EntryKind::Link).count();
        let lines: Vec<String> = entries.iter().map(|e| e.render(detailed)).collect();
        message.push_str(&lines.join("\n"));
        message.push_str(&format!(
            "\n\n{} directories, {} files",
            dirs,
            entries.len() - dirs - links
        ));
        if links > 0 {
            message.push_str(&format!(", {links} links"));
        }
    }

    Ok(ToolOutput::new(
        json!({
            "path": shown,
            "recursive": recursive,
            "entries": entries.iter().map(Entry::to_json).collect::<Vec<_>>(),
        }),
        message,
    ))
}

/// `read_file`: text content, capped by size and line count.
pub fn read_file(ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let requested = params
        .text("path")
        .ok_or_else(|| AppError::Parameter("No file given".to_string()))?;
    let path = ctx.sandbox.resolve(requested)?;
    let shown = ctx.sandbox.display(&path);

    if !path.exists() {
        return Err(AppError::NotFound(format!("File not found: {shown}")));
    }
    if !path.is_file() {
        return Err(AppError::ToolExecution(format!("Not a file: {shown}")));
    }

    let size = fs::metadata(&path)?.len();
    if size > ctx.max_file_bytes {
        return Err(AppError::ToolExecution(format!(
            "File too large to display: {shown} is {} (limit {})",
            human_size(size),
            human_size(ctx.max_file_bytes)
        )));
    }

    let bytes = fs::read(&path)?;
    if bytes.iter().take(BINARY_SNIFF_BYTES).any(|b| *b == 0) {
        return Err(AppError::ToolExecution(format!(
            "Cannot read binary file: {shown} ({})",
            guess_mime(&path)
        )));
    }
    let text = String::from_utf8(bytes).map_err(|_| {
        AppError::ToolExecution(format!("Cannot read file (not valid UTF-8): {shown}"))
    })?;

    let limit = if params.flag("all") {
        usize::MAX
    } else {
        params
            .number("max_lines")
            .filter(|n| *n >= 1.0)
            .map(|n| n as usize)
            .unwrap_or(ctx.read_max_lines)
    };

    let lines: Vec<&str> = text.lines().collect();
    let total = lines.len();
    let shown_lines = &lines[..total.min(limit)];
    let truncated = total > shown_lines.len();

    let mut message = format!(
        "📄 **Contents of {shown}:**\n\n```\n{}\n```",
        shown_lines.join("\n")
    );
    if truncated {
        message.push_str(&format!(
            "\n... (showing first {} lines of {} total, say \"all\" to see everything)",
            shown_lines.len(),
            total
        ));
    }

    Ok(ToolOutput::new(
        json!({
            "path": shown,
            "size": size,
            "total_lines": total,
            "shown_lines": shown_lines.len(),
            "truncated": truncated,
            "content": shown_lines.join("\n"),
        }),
        message,
    ))
}

/// `file_info`: metadata, type guess and SHA-256 of a file or directory.
pub fn file_info(ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let requested = params
        .text("path")
        .ok_or_else(|| AppError::Parameter("No path given".to_string()))?;
    let path = ctx.sandbox.resolve(requested)?;
    let shown = ctx.sandbox.display(&path);
    if !path.exists() {
        return Err(not_found(&shown));
    }

    let meta = fs::metadata(&path)?;
    let is_dir = meta.is_dir();
    let kind = if is_dir { "directory" } else { "file" };
    let mime = if is_dir {
        "inode/directory".to_string()
    } else {
        guess_mime(&path)
    };
    let readonly = meta.permissions().readonly();
    let mode = permission_bits(&meta);
    let sha256 = if !is_dir && meta.len() <= ctx.max_file_bytes {
        Some(hex::encode(Sha256::digest(fs::read(&path)?)))
    } else {
        None
    };

    let created = format_time(meta.created());
    let modified = format_time(meta.modified());
    let accessed = format_time(meta.accessed());

    let mut message = format!("ℹ️ **File Information: {shown}**\n\n");
    message.push_str(&format!("• **Type:** {kind}\n"));
    message.push_str(&format!("• **MIME type:** {mime}\n"));
    if !is_dir {
        message.push_str(&format!(
            "• **Size:** {} ({} bytes)\n",
            human_size(meta.len()),
            meta.len()
        ));
    }
    for (label, value) in [
        ("Created", &created),
        ("Modified", &modified),
        ("Accessed", &accessed),
    ] {
        if let Some(v) = value {
            message.push_str(&format!("• **{label}:** {v}\n"));
        }
    }
    message.push_str(&format!(
        "• **Permissions:** {}{}\n",
        mode.as_deref().unwrap_or(""),
        if readonly { " (read-only)" } else { "" }
    ));
    if let Some(ref digest) = sha256 {
        message.push_str(&format!("• **SHA-256:** {digest}\n"));
    }

    Ok(ToolOutput::new(
        json!({
            "path": shown,
            "kind": kind,
            "mime": mime,
            "size": meta.len(),
            "created": created,
            "modified": modified,
            "accessed": accessed,
            "readonly": readonly,
            "mode": mode,
            "sha256": sha256,
        }),
        message.trim_end().to_string(),
    ))
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> Option<String> {
    use std::os::unix::fs::PermissionsExt;
    Some(format!("{:o}", meta.permissions().mode() & 0o777))
}

#[cfg(not(unix))]
fn permission_bits(_meta: &fs::Metadata) -> Option<String> {
    None
}

/// `search_files`: glob on file names, optionally filtered by a content substring.
pub fn search_files(ctx: &ToolContext, params: &Params) -> Result<ToolOutput> {
    let directory = params.text("directory").unwrap_or(".");
    let pattern_text = params.text("pattern").unwrap_or("*");
    let content = params.text("content");

    let pattern = glob::Pattern::new(pattern_text)
        .map_err(|e| AppError::Parameter(format!("Invalid file pattern '{pattern_text}': {e}")))?;
    let dir = ctx.sandbox.resolve(directory)?;
    let shown = ctx.sandbox.display(&dir);
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!("Directory not found: {shown}")));
    }

    let needle = content.map(str::to_lowercase);
    let mut matches = Vec::new();
    let mut truncated = false;

    for item in WalkDir::new(&dir).min_depth(1).max_depth(MAX_SEARCH_DEPTH) {
        let Ok(item) = item else { continue };
        if !item.file_type().is_file() {
            continue;
        }
        let name = item.file_name().to_string_lossy();
        if !pattern.matches(&name) {
            continue;
        }

        let mut hits = Vec::new();
        if let Some(ref needle) = needle {
            let too_big = item
                .metadata()
                .map(|m| m.len() > ctx.max_file_bytes)
                .unwrap_or(true);
            if too_big {
                continue;
            }
            let Ok(text) = fs::read_to_string(item.path()) else {
                continue;
            };
            hits = text
                .lines()
                .enumerate()
                .filter(|(_, line)| line.to_lowercase().contains(needle.as_str()))
                .take(MAX_CONTENT_HITS_PER_FILE)
                .map(|(n, line)| json!({ "line": n + 1, "text": line.trim() }))
                .collect();
            if hits.is_empty() {
                continue;
            }
        }

        if matches.len() == MAX_SEARCH_RESULTS {
            truncated = true;
            break;
        }
        matches.push(json!({
            "path": ctx.sandbox.display(item.path()),
            "matches": hits,
        }));
    }

    let mut message = match content {
        Some(c) => format!("🔍 **Files in {shown} matching '{pattern_text}' containing \"{c}\":**\n\n"),
        None => format!("🔍 **Files in {shown} matching '{pattern_text}':**\n\n"),
    };
    if matches.is_empty() {
        message.push_str("*No matching files found*");
    } else {
        for m in &matches {
            message.push_str(&format!("📄 {}\n", m["path"].as_str().unwrap_or_default()));
            if let Some(hits) = m["matches"].as_array() {
                for hit in hits {
                    message.push_str(&format!(
                        "    {}: {}\n",
                        hit["line"],
                        hit["text"].as_str().unwrap_or_default()
                    ));
                }
            }
        }
        message.push_str(&format!("\nFound {} file(s)", matches.len()));
        if truncated {
            message.push_str(&format!(" (stopped at {MAX_SEARCH_RESULTS})"));
        }
    }

    Ok(ToolOutput::new(
        json!({
            "directory": shown,
            "pattern": pattern_text,
            "content": content,
            "results": matches,
            "truncated": truncated,
        }),
        message,
    ))
}

/// `current_directory`: the sandbox root.
pub fn current_directory(ctx: &ToolContext, _params: &Params) -> Result<ToolOutput> {
    let root = ctx.sandbox.canonical_root()?;
    Ok(ToolOutput::new(
        json!({ "path": root.display().to_string() }),
        format!("📍 **Current Directory:** {}", root.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, ToolContext) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha\nbeta\ngamma\n").unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b").join("inner.rs"), "fn main() {}\n// TODO\n").unwrap();
        let ctx = ToolContext::new(dir.path());
        (dir, ctx)
    }

    #[test]
    fn test_resolve_inside_root() {
        let (dir, ctx) = fixture();
        let resolved = ctx.sandbox.resolve("b/../a.txt").unwrap();
        assert_eq!(resolved, fs::canonicalize(dir.path().join("a.txt")).unwrap());
    }

    #[test]
    fn test_resolve_rejects_parent_escape() {
        let (_dir, ctx) = fixture();
        assert!(matches!(
            ctx.sandbox.resolve("../../etc/passwd"),
            Err(AppError::Security(_))
        ));
        assert!(matches!(ctx.sandbox.resolve(".."), Err(AppError::Security(_))));
    }

    #[test]
    fn test_resolve_rejects_foreign_absolute_path() {
        let (_dir, ctx) = fixture();
        assert!(matches!(
            ctx.sandbox.resolve("/etc/passwd"),
            Err(AppError::Security(_))
        ));
    }

    #[test]
    fn test_resolve_accepts_absolute_path_inside_root() {
        let (dir, ctx) = fixture();
        let inside = dir.path().join("a.txt");
        assert!(ctx.sandbox.resolve(&inside.to_string_lossy()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_symlink_escape() {
        let (dir, ctx) = fixture();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret"), "s3cret").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();
        assert!(matches!(
            ctx.sandbox.resolve("link/secret"),
            Err(AppError::Security(_))
        ));
    }

    #[test]
    fn test_list_directory_markers() {
        let (_dir, ctx) = fixture();
        let out = list_directory(&ctx, &Params::new()).unwrap();
        assert!(out.message.contains("📁 b/"));
        assert!(out.message.contains("📄 a.txt"));
        assert_eq!(out.value["entries"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_list_directory_recursive() {
        let (_dir, ctx) = fixture();
        let params = Params::new().with("recursive", crate::extract::ParamValue::Flag(true));
        let out = list_directory(&ctx, &params).unwrap();
        assert!(out.message.contains("inner.rs"));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_directory_survives_dangling_symlink() {
        let (dir, ctx) = fixture();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("stale")).unwrap();

        let out = list_directory(&ctx, &Params::new()).unwrap();
        assert!(out.message.contains("📄 a.txt"));
        assert!(out.message.contains("🔗 stale@"));
        assert_eq!(out.value["entries"].as_array().unwrap().len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_directory_does_not_follow_links_out_of_root() {
        let (dir, ctx) = fixture();
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("secret.json");
        fs::write(&target, "x".repeat(5000)).unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link")).unwrap();

        for recursive in [false, true] {
            let params = Params::new()
                .with("recursive", crate::extract::ParamValue::Flag(recursive))
                .with("detailed", crate::extract::ParamValue::Flag(true));
            let out = list_directory(&ctx, &params).unwrap();
            let entries = out.value["entries"].as_array().unwrap();
            let link = entries.iter().find(|e| e["name"] == "link").unwrap();
            assert_eq!(link["kind"], "link");
            assert_eq!(link["size"], 0);
            assert!(link["mime"].is_null());
            assert!(!out.message.contains("4.9 KB"));
            assert!(!out.message.contains("application/json"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_search_skips_links_out_of_root() {
        let (dir, ctx) = fixture();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("secret.rs"), "// TODO leak\n").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.rs"), dir.path().join("leak.rs"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("elsewhere")).unwrap();

        let out = search_files(&ctx, &Params::new().with_text("pattern", "*.rs")).unwrap();
        assert_eq!(out.value["results"].as_array().unwrap().len(), 1);

        let out = search_files(&ctx, &Params::new().with_text("content", "leak")).unwrap();
        assert!(out.value["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_read_file_line_limit() {
        let (_dir, ctx) = fixture();
        let ctx = ctx.with_read_max_lines(2);
        let out = read_file(&ctx, &Params::new().with_text("path", "a.txt")).unwrap();
        assert_eq!(out.value["shown_lines"], 2);
        assert_eq!(out.value["truncated"], true);
        assert!(!out.message.contains("gamma"));
    }

    #[test]
    fn test_read_file_rejects_large_and_binary() {
        let (dir, ctx) = fixture();
        fs::write(dir.path().join("big.txt"), "x".repeat(64)).unwrap();
        fs::write(dir.path().join("blob.bin"), [0u8, 159, 146, 150]).unwrap();
        let ctx = ctx.with_max_file_bytes(32);

        let err = read_file(&ctx, &Params::new().with_text("path", "big.txt")).unwrap_err();
        assert!(err.to_string().contains("too large"));

        let err = read_file(&ctx, &Params::new().with_text("path", "blob.bin")).unwrap_err();
        assert!(err.to_string().contains("binary"));
    }

    #[test]
    fn test_read_missing_file() {
        let (_dir, ctx) = fixture();
        let err = read_file(&ctx, &Params::new().with_text("path", "nope.txt")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_file_info_reports_metadata() {
        let (_dir, ctx) = fixture();
        let out = file_info(&ctx, &Params::new().with_text("path", "a.txt")).unwrap();
        assert_eq!(out.value["kind"], "file");
        assert_eq!(out.value["mime"], "text/plain");
        assert_eq!(out.value["size"], 17);
        assert_eq!(out.value["sha256"].as_str().unwrap().len(), 64);
        assert!(out.value["modified"].is_string());
    }

    #[test]
    fn test_search_by_pattern_and_content() {
        let (_dir, ctx) = fixture();
        let out = search_files(&ctx, &Params::new().with_text("pattern", "*.rs")).unwrap();
        assert_eq!(out.value["results"].as_array().unwrap().len(), 1);

        let out = search_files(&ctx, &Params::new().with_text("content", "todo")).unwrap();
        let results = out.value["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["matches"][0]["line"], 2);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(12), "12 B");
        assert_eq!(human_size(2048), "2.0 KB");
    }
}
