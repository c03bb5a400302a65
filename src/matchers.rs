//! Line matchers for the ECS grammar
//!
//! An ECS file is line-oriented: every line the parser cares about belongs to
//! one of a small, fixed set of shapes (separators, block headings, the
//! creation timestamp, the version line, parameter assignments, cal block
//! names). Each shape gets one matcher here: a pure function from a single
//! line (without its terminator) to either `None` or a struct of named
//! captures. The regexes are compiled once as module statics; the functions
//! themselves hold no state.

use once_cell::sync::Lazy;
use regex::Regex;

/// `#=====#` lines that frame block headings and close block bodies.
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#=+#$").unwrap());

/// Any `# free text #` heading line; the free text decides which block opens.
static STATUS_CRUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s+(?P<status>.+)\s+#$").unwrap());

/// `# <WORD> SETTINGS #` heading line; the keyword names the block.
static STATUS_FINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s+(?P<status>\w+) SETTINGS\s*#$").unwrap());

/// The file heading, which also carries the instrument/model tag.
static ECS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^#\s+ECHOVIEW CALIBRATION SUPPLEMENT \(\.ECS\) FILE \((?P<data_type>\w+)\)\s+#$",
    )
    .unwrap()
});

/// Creation timestamp, `# M/D/YYYY H:M:S[.fraction] #`. The fraction, if
/// present, is matched but never captured; Echoview timestamps are read at
/// second precision.
static ECS_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^#\s+(?P<date>\d{1,2}/\d{1,2}/\d{4}) (?P<time>\d{1,2}:\d{1,2}:\d{1,2})(?:\.\d+)?\s+#$",
    )
    .unwrap()
});

/// `Version <major>.<minor>`, kept verbatim as text.
static ECS_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Version (?P<version>\d+\.\d+)\s*$").unwrap());

/// A parameter assignment. A leading `#` marks the line as commented out.
/// The value token is a signed decimal, a bare word, or empty; anything after
/// it (usually a `#`-prefixed unit/range note) is ignored. A negative integer
/// deliberately fails the value token and is caught later as a type error,
/// matching the producing software's grammar.
static PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<skip>#?)\s*(?P<param>\w+)\s*=\s*(?P<val>(?:-?\d+\.\d+|\w+)?)\s*#?.*$")
        .unwrap()
});

/// `SourceCal <name>` / `LocalCal <name>`, keyword case-insensitive.
static CAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?P<kind>SourceCal|LocalCal) (?P<name>\w+)\s*$").unwrap());

/// Whether a line is a `#=====#` separator.
pub fn is_separator(line: &str) -> bool {
    SEPARATOR.is_match(line)
}

/// Capture the free text of a `# ... #` heading line.
pub fn status_crude(line: &str) -> Option<&str> {
    let caps = STATUS_CRUDE.captures(line)?;
    Some(caps.name("status")?.as_str())
}

/// Capture the keyword of a `# <WORD> SETTINGS #` heading line.
pub fn status_fine(line: &str) -> Option<&str> {
    let caps = STATUS_FINE.captures(line)?;
    Some(caps.name("status")?.as_str())
}

/// Capture the instrument/model tag from the file heading.
pub fn header_data_type(line: &str) -> Option<&str> {
    let caps = ECS_HEADER.captures(line)?;
    Some(caps.name("data_type")?.as_str())
}

/// Date and time substrings of a creation-timestamp line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampLine<'a> {
    pub date: &'a str,
    pub time: &'a str,
}

/// Capture the date and time of the creation-timestamp line. Fractional
/// seconds are discarded.
pub fn timestamp(line: &str) -> Option<TimestampLine<'_>> {
    let caps = ECS_TIME.captures(line)?;
    Some(TimestampLine {
        date: caps.name("date")?.as_str(),
        time: caps.name("time")?.as_str(),
    })
}

/// Capture the `major.minor` version string, verbatim.
pub fn version(line: &str) -> Option<&str> {
    let caps = ECS_VERSION.captures(line)?;
    Some(caps.name("version")?.as_str())
}

/// A matched parameter-assignment line.
///
/// `skipped` means the line was commented out with a leading `#`; the block
/// parser drops such entries unless the parameter is `Frequency`. `value` may
/// be empty, which is structurally valid and only rejected by the typed
/// coercion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamLine<'a> {
    pub skipped: bool,
    pub name: &'a str,
    pub value: &'a str,
}

/// Match a parameter-assignment line.
pub fn param(line: &str) -> Option<ParamLine<'_>> {
    let caps = PARAM.captures(line)?;
    Some(ParamLine {
        skipped: !caps.name("skip")?.as_str().is_empty(),
        name: caps.name("param")?.as_str(),
        value: caps.name("val").map_or("", |m| m.as_str()),
    })
}

/// Which cal block a `SourceCal`/`LocalCal` name line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalKind {
    SourceCal,
    LocalCal,
}

/// A matched cal-block name line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalBlockLine<'a> {
    pub kind: CalKind,
    pub name: &'a str,
}

/// Match a `SourceCal <name>` or `LocalCal <name>` line.
pub fn cal_block(line: &str) -> Option<CalBlockLine<'_>> {
    let caps = CAL.captures(line)?;
    let kind = if caps.name("kind")?.as_str().eq_ignore_ascii_case("sourcecal") {
        CalKind::SourceCal
    } else {
        CalKind::LocalCal
    };
    Some(CalBlockLine {
        kind,
        name: caps.name("name")?.as_str(),
    })
}
