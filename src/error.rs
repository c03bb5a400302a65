//! Errors for parsing, hierarchy resolution and projection
//!
//! Parsing is strict and atomic: any format or type defect aborts the whole
//! parse, because a malformed calibration file cannot be safely guessed at.
//! Format errors (a line violating the grammar at the current parser state)
//! always surface before type errors (a value failing typed coercion), since
//! coercion runs only after the full tree has been built structurally.
//! Projection is the one lenient spot, and its gaps are warnings, not errors;
//! see [`crate::project`].

use std::fmt;

/// A fatal defect found while parsing an ECS document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A heading line opened a block the grammar does not know.
    UnexpectedBlock { line: usize, status: String },
    /// A `#=====#` separator was required but something else was read.
    ExpectedSeparator { line: usize },
    /// A non-blank line matched nothing the current state admits.
    MalformedLine { line: usize, text: String },
    /// The creation-timestamp line of the header could not be read.
    BadTimestamp { line: usize, text: String },
    /// The input ended inside the header block.
    UnexpectedEof,
    /// The header block carried no `Version <major>.<minor>` line.
    MissingVersion,
    /// The document carried no ECS header block.
    MissingHeader,
    /// The document carried no FileSet settings.
    MissingFileSet,
    /// A parameter value could not be coerced to a number.
    NonNumericValue { param: String, value: String },
    /// `TvgRangeCorrection` held a value outside its fixed literal set.
    InvalidTvgSetting { value: String },
}

impl ParseError {
    /// Whether this error came from the typed coercion pass rather than from
    /// the line grammar or block structure.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            ParseError::NonNumericValue { .. } | ParseError::InvalidTvgSetting { .. }
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedBlock { line, status } => {
                write!(f, "line {line}: expected a new block but got \"{status}\"")
            }
            ParseError::ExpectedSeparator { line } => {
                write!(f, "line {line}: expected a separator line")
            }
            ParseError::MalformedLine { line, text } => {
                write!(f, "line {line}: unexpected line in ECS file: \"{text}\"")
            }
            ParseError::BadTimestamp { line, text } => {
                write!(f, "line {line}: malformed creation timestamp: \"{text}\"")
            }
            ParseError::UnexpectedEof => write!(f, "unexpected end of input in header block"),
            ParseError::MissingVersion => write!(f, "no version line found in header block"),
            ParseError::MissingHeader => write!(f, "no ECS header block found"),
            ParseError::MissingFileSet => write!(f, "no FileSet settings found"),
            ParseError::NonNumericValue { param, value } => {
                write!(f, "parameter \"{param}\" has non-numeric value \"{value}\"")
            }
            ParseError::InvalidTvgSetting { value } => {
                write!(f, "TvgRangeCorrection contains unexpected setting \"{value}\"")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Caller-side misuse of the hierarchy resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The named LocalCal setting does not exist in the document.
    UnknownLocalCal { name: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnknownLocalCal { name } => {
                write!(f, "no LocalCal setting named \"{name}\" in the document")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Caller-side misuse of the projection entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// The channel id sequence does not line up 1:1 with the sources.
    ChannelCountMismatch { channels: usize, sources: usize },
    /// The table lacks the `frequency_nominal` field needed for the check.
    MissingFrequency,
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectError::ChannelCountMismatch { channels, sources } => write!(
                f,
                "{channels} channel ids supplied for {sources} sources; they must line up 1:1"
            ),
            ProjectError::MissingFrequency => {
                write!(f, "table does not contain \"frequency_nominal\" needed for the check")
            }
        }
    }
}

impl std::error::Error for ProjectError {}
