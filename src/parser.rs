//! Block parser for ECS documents
//!
//! One linear scan over the input lines drives a small state machine. At the
//! top level only three things are legal: blank lines, separators, and
//! heading lines that open a block. A heading whose text mentions the file
//! format opens the header block; `FILESET` / `SOURCECAL` / `LOCALCAL`
//! headings open parameter blocks. Each block body is read until the next
//! separator, which is left unconsumed for the top level to observe. The scan
//! is atomic: either it yields a complete [`ParsedDocument`] or it fails with
//! the first defect found.

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::document::{ParsedDocument, RawMap, RawTree};
use crate::error::ParseError;
use crate::matchers::{self, CalKind};

/// The parameter block currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    FileSet,
    SourceCal,
    LocalCal,
}

impl Block {
    /// The cal-block keyword that opens a named sub-section, if any.
    fn cal_kind(self) -> Option<CalKind> {
        match self {
            Block::FileSet => None,
            Block::SourceCal => Some(CalKind::SourceCal),
            Block::LocalCal => Some(CalKind::LocalCal),
        }
    }
}

/// Read cursor over the input lines. Line numbers are 1-based; `backtrack`
/// undoes exactly one read and exists so a block body can leave its closing
/// separator for the top-level loop.
struct Cursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { lines: input.lines().collect(), pos: 0 }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos, line))
    }

    fn backtrack(&mut self) {
        self.pos -= 1;
    }

    /// Line number just past the last read, for errors at end of input.
    fn eof_line(&self) -> usize {
        self.pos + 1
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Parse a complete ECS document from text.
///
/// The input may carry a leading byte-order marker; line terminators may be
/// LF or CRLF. The parse either runs to completion or fails fast with the
/// first format or type error; no partial tree is ever returned.
pub fn parse(input: &str) -> Result<ParsedDocument, ParseError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut cursor = Cursor::new(input);

    let mut raw = RawTree::default();
    let mut header: Option<(String, NaiveDateTime, String)> = None;
    let mut fileset_seen = false;

    while let Some((no, line)) = cursor.next() {
        if is_blank(line) || matchers::is_separator(line) {
            continue;
        }
        let status = matchers::status_crude(line).ok_or_else(|| ParseError::MalformedLine {
            line: no,
            text: line.to_string(),
        })?;
        let status_lc = status.to_lowercase();
        if status_lc.contains("ecs") {
            let data_type = matchers::header_data_type(line)
                .ok_or_else(|| ParseError::MalformedLine { line: no, text: line.to_string() })?
                .to_string();
            let (creation_time, version) = parse_header(&mut cursor)?;
            header = Some((data_type, creation_time, version));
        } else if status_lc.contains("fileset")
            || status_lc.contains("sourcecal")
            || status_lc.contains("localcal")
        {
            let keyword = matchers::status_fine(line)
                .ok_or_else(|| ParseError::MalformedLine { line: no, text: line.to_string() })?
                .to_lowercase();
            let block = match keyword.as_str() {
                "fileset" => Block::FileSet,
                "sourcecal" => Block::SourceCal,
                "localcal" => Block::LocalCal,
                _ => {
                    return Err(ParseError::UnexpectedBlock { line: no, status: status.to_string() })
                }
            };
            let sections = parse_block(&mut cursor, block)?;
            match block {
                Block::FileSet => {
                    // The block's single implicit sub-section is unwrapped so
                    // fileset is stored flat.
                    raw.fileset = sections.into_values().next().unwrap_or_default();
                    fileset_seen = true;
                }
                Block::SourceCal => raw.sourcecal = sections,
                Block::LocalCal => raw.localcal = sections,
            }
        } else {
            return Err(ParseError::UnexpectedBlock { line: no, status: status.to_string() });
        }
    }

    let (data_type, file_creation_time, version) = header.ok_or(ParseError::MissingHeader)?;
    if !fileset_seen || raw.fileset.is_empty() {
        return Err(ParseError::MissingFileSet);
    }

    Ok(ParsedDocument {
        data_type,
        version,
        file_creation_time,
        parameter_tree: raw.into_typed()?,
    })
}

/// Parse the header block body: timestamp, separator, six lines of vendor
/// boilerplate (skipped unconditionally), separator, then blank lines until
/// the version line.
fn parse_header(cursor: &mut Cursor) -> Result<(NaiveDateTime, String), ParseError> {
    let (no, line) = cursor.next().ok_or(ParseError::UnexpectedEof)?;
    let ts = matchers::timestamp(line).ok_or_else(|| ParseError::BadTimestamp {
        line: no,
        text: line.to_string(),
    })?;
    let stamp = NaiveDateTime::parse_from_str(
        &format!("{} {}", ts.date, ts.time),
        "%m/%d/%Y %H:%M:%S",
    )
    .map_err(|_| ParseError::BadTimestamp { line: no, text: line.to_string() })?;

    expect_separator(cursor)?;
    for _ in 0..6 {
        cursor.next();
    }
    expect_separator(cursor)?;

    loop {
        let (_, line) = cursor.next().ok_or(ParseError::MissingVersion)?;
        if is_blank(line) {
            continue;
        }
        return match matchers::version(line) {
            Some(version) => Ok((stamp, version.to_string())),
            None => Err(ParseError::MissingVersion),
        };
    }
}

fn expect_separator(cursor: &mut Cursor) -> Result<(), ParseError> {
    let eof_line = cursor.eof_line();
    match cursor.next() {
        Some((_, line)) if matchers::is_separator(line) => Ok(()),
        Some((no, _)) => Err(ParseError::ExpectedSeparator { line: no }),
        None => Err(ParseError::ExpectedSeparator { line: eof_line }),
    }
}

/// Parse one parameter block body into its named sub-sections.
///
/// The body starts after one required separator and runs until the next
/// separator (left unconsumed) or end of input. In a FileSet block the first
/// non-blank line establishes the single implicit `fileset` sub-section; in
/// SourceCal/LocalCal blocks a matching cal-name line starts a new named
/// sub-section. While a sub-section is active every other non-blank line must
/// be a parameter assignment; commented-out assignments are dropped unless
/// the parameter is `Frequency`, which Echoview always retains.
fn parse_block(
    cursor: &mut Cursor,
    block: Block,
) -> Result<IndexMap<String, RawMap>, ParseError> {
    expect_separator(cursor)?;

    let mut sections: IndexMap<String, RawMap> = IndexMap::new();
    let mut current: Option<String> = None;

    while let Some((no, line)) = cursor.next() {
        if matchers::is_separator(line) {
            cursor.backtrack();
            break;
        }
        if is_blank(line) {
            continue;
        }
        if block == Block::FileSet && current.is_none() {
            sections.insert("fileset".to_string(), RawMap::new());
            current = Some("fileset".to_string());
        } else if let Some(kind) = block.cal_kind() {
            if let Some(cal) = matchers::cal_block(line) {
                if cal.kind == kind {
                    sections.insert(cal.name.to_string(), RawMap::new());
                    current = Some(cal.name.to_string());
                    continue;
                }
            }
        }
        let Some(current) = current.as_deref() else {
            // No sub-section opened yet; Echoview ignores stray lines here.
            continue;
        };
        let assignment = matchers::param(line).ok_or_else(|| ParseError::MalformedLine {
            line: no,
            text: line.to_string(),
        })?;
        if !assignment.skipped || assignment.name == "Frequency" {
            sections[current].insert(assignment.name.to_string(), assignment.value.to_string());
        }
    }

    Ok(sections)
}
