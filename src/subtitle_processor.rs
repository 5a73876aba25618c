use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::debug;
use crate::errors::SubtitleError;

// @module: Subtitle parsing, model and serialization

// @const: Block separator (a blank line, possibly several)
static BLOCK_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\n+").unwrap()
});

// @const: Blank lines inside a caption
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n{2,}").unwrap()
});

/// Minimum number of lines in a block: index, timestamp, one content line
const MIN_BLOCK_LINES: usize = 3;

/// Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    /// 1-based sequence number as found in the file
    pub index: usize,

    /// Time range, kept verbatim
    pub timestamp: String,

    /// Caption text, lines joined with '\n'
    pub content: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(index: usize, timestamp: impl Into<String>, content: impl Into<String>) -> Self {
        SubtitleEntry {
            index,
            timestamp: timestamp.into(),
            content: content.into(),
        }
    }

    /// Parse one raw block into an entry.
    ///
    /// Returns the reason as an error when the block is malformed.
    pub fn parse_block(block: &str) -> Result<Self, String> {
        let lines: Vec<&str> = block.split('\n').collect();
        if lines.len() < MIN_BLOCK_LINES {
            return Err(format!(
                "expected at least {} lines, found {}",
                MIN_BLOCK_LINES,
                lines.len()
            ));
        }

        let index = lines[0]
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid index '{}': {}", lines[0], e))?;

        Ok(SubtitleEntry {
            index,
            timestamp: lines[1].to_string(),
            content: lines[2..].join("\n"),
        })
    }
}

/// Make caption text safe to write back as one block.
///
/// Blank lines would end the block early and an empty caption would leave a
/// block with too few lines, so runs of line breaks are collapsed and
/// `None` is returned when nothing but whitespace remains.
pub fn normalize_content(text: &str) -> Option<String> {
    let text = text.replace("\r\n", "\n");
    let text = text.trim_matches(|c: char| c == '\n' || c == '\r');
    if text.trim().is_empty() {
        return None;
    }
    Some(BLANK_LINES.replace_all(text, "\n").into_owned())
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}", self.timestamp)?;
        writeln!(f, "{}", self.content)?;
        writeln!(f)
    }
}

/// What to do with a block that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Drop the block and keep going
    #[default]
    Lenient,
    /// Fail on the first malformed block
    Strict,
}

/// Collection of subtitle entries with their source file
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries, in file order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection for the given file
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Read and parse a subtitle file
    pub fn from_srt_file<P: AsRef<Path>>(path: P, policy: ParsePolicy) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SubtitleError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let entries = Self::parse_srt_string_with_policy(&content, policy)?;
        debug!("Parsed {} subtitle entries from {}", entries.len(), path.display());

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Parse SRT content, silently dropping malformed blocks
    pub fn parse_srt_string(content: &str) -> Vec<SubtitleEntry> {
        let mut entries = Vec::new();
        for (position, block) in Self::blocks(content).iter().enumerate() {
            match SubtitleEntry::parse_block(block) {
                Ok(entry) => entries.push(entry),
                Err(reason) => debug!("Skipping subtitle block {}: {}", position + 1, reason),
            }
        }
        entries
    }

    /// Parse SRT content under the given policy
    pub fn parse_srt_string_with_policy(content: &str, policy: ParsePolicy) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        match policy {
            ParsePolicy::Lenient => Ok(Self::parse_srt_string(content)),
            ParsePolicy::Strict => Self::blocks(content)
                .iter()
                .enumerate()
                .map(|(position, block)| {
                    SubtitleEntry::parse_block(block).map_err(|reason| SubtitleError::MalformedBlock {
                        block: position + 1,
                        reason,
                    })
                })
                .collect(),
        }
    }

    /// Split raw file text into candidate blocks
    fn blocks(content: &str) -> Vec<String> {
        let normalized = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        BLOCK_SEPARATOR.split(trimmed).map(str::to_string).collect()
    }

    /// Render all entries in SRT form
    pub fn to_srt_string(&self) -> String {
        self.to_string()
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        let write_error = |e: std::io::Error| SubtitleError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_error)?;
            }
        }

        fs::write(path, self.to_srt_string()).map_err(write_error)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}
