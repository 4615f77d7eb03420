use std::fmt;
use crate::errors::SubtitleError;

// @module: Subtitle decomposition and reassembly

/// Classification of one physical line of a subtitle file.
///
/// The kind is determined purely from the line's own content, never from
/// surrounding lines, so classification cannot fail on malformed cue blocks:
/// anything unrecognized is translatable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Cue sequence number (trimmed content is all digits)
    Index,
    /// Timing cue (contains `-->`)
    Timecode,
    /// Translatable caption text
    Text,
    /// Empty separator line between cues
    Blank,
}

// @struct: One physical line, with its verbatim content
#[derive(Debug, Clone)]
pub struct StructuralLine {
    // @field: Line classification
    pub kind: LineKind,

    // @field: Verbatim content without the line terminator
    pub raw: String,

    // @field: 0-based position in the file
    pub position: usize,
}

/// One Text-kind line extracted for translation.
///
/// The `text_position` is the 0-based index among all Text-kind lines in file
/// order. That ordering is the contract passed to and returned from the
/// translation backend, and the single invariant reassembly depends on.
#[derive(Debug, Clone)]
pub struct TranslatableUnit {
    /// Trimmed source text
    pub source_text: String,

    /// 0-based index among all Text-kind lines
    pub text_position: usize,

    /// True when the original Text line trimmed to an empty string.
    /// Such units are tracked through the pipeline but never sent to the
    /// backend; reassembly emits an empty line for them.
    pub empty_after_trim: bool,
}

impl TranslatableUnit {
    /// Character length that counts against batch size limits
    pub fn char_len(&self) -> usize {
        self.source_text.chars().count()
    }
}

/// A subtitle file decomposed into structural lines and translatable units
#[derive(Debug)]
pub struct SubtitleDocument {
    /// Every physical line, in file order
    pub lines: Vec<StructuralLine>,

    /// Every Text-kind line, in file order
    pub units: Vec<TranslatableUnit>,
}

impl SubtitleDocument {
    /// Decompose file content into structural lines and translatable units.
    ///
    /// Every Text-kind line produces exactly one unit, in matching relative
    /// order, including lines that trim to nothing (whitespace-only lines are
    /// Text, not Blank; only a fully empty line is Blank). Decomposition never
    /// fails: unknown line shapes default to Text.
    pub fn decompose(content: &str) -> Self {
        let mut lines = Vec::new();
        let mut units = Vec::new();

        for (position, raw) in split_physical_lines(content).into_iter().enumerate() {
            let kind = classify_line(&raw);

            if kind == LineKind::Text {
                let trimmed = raw.trim();
                units.push(TranslatableUnit {
                    source_text: trimmed.to_string(),
                    text_position: units.len(),
                    empty_after_trim: trimmed.is_empty(),
                });
            }

            lines.push(StructuralLine { kind, raw, position });
        }

        SubtitleDocument { lines, units }
    }

    /// Number of units with actual text to translate
    pub fn translatable_count(&self) -> usize {
        self.units.iter().filter(|u| !u.empty_after_trim).count()
    }

    /// Merge the structural lines with translated text into output content.
    ///
    /// `translations` is indexed by `text_position`: `Some(text)` is a
    /// translated string, `None` marks a unit whose batch failed and degrades
    /// to the original source text. Index/Timecode/Blank lines are emitted
    /// verbatim; units flagged `empty_after_trim` become empty lines without
    /// consulting `translations`.
    ///
    /// The output always has exactly one line per input line.
    pub fn reassemble(&self, translations: &[Option<String>]) -> Result<String, SubtitleError> {
        if translations.len() != self.units.len() {
            return Err(SubtitleError::UnitMismatch {
                translations: translations.len(),
                units: self.units.len(),
            });
        }

        let mut output = String::new();
        let mut next_unit = 0;

        for line in &self.lines {
            match line.kind {
                LineKind::Index | LineKind::Timecode | LineKind::Blank => {
                    output.push_str(&line.raw);
                }
                LineKind::Text => {
                    let unit = &self.units[next_unit];
                    if !unit.empty_after_trim {
                        match &translations[next_unit] {
                            Some(translated) => output.push_str(translated),
                            None => output.push_str(&unit.source_text),
                        }
                    }
                    next_unit += 1;
                }
            }
            output.push('\n');
        }

        Ok(output)
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Document")?;
        writeln!(f, "Lines: {}", self.lines.len())?;
        writeln!(f, "Translatable units: {}", self.units.len())?;
        Ok(())
    }
}

/// Split content into physical lines, dropping the phantom element a trailing
/// newline produces. A `\r` from CRLF input stays on the line so structural
/// lines round-trip byte-for-byte.
fn split_physical_lines(content: &str) -> Vec<String> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<String> = content.split('\n').map(|l| l.to_string()).collect();
    if content.ends_with('\n') {
        lines.pop();
    }
    lines
}

/// Classify a single line from its own content
fn classify_line(raw: &str) -> LineKind {
    if raw.contains("-->") {
        return LineKind::Timecode;
    }

    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return LineKind::Index;
    }

    if raw.is_empty() || raw == "\r" {
        return LineKind::Blank;
    }

    LineKind::Text
}
