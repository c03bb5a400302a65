//! # ecs
//!
//! A parser for the Echoview calibration supplement (ECS) format.
//!
//! ECS files are line-oriented text documents carrying the calibration and
//! environmental settings Echoview applies to raw echosounder data. A
//! document holds three levels of settings with a fixed override precedence:
//! FileSet defaults, per-source SourceCal overrides, and named LocalCal
//! override sets that apply uniformly to all sources.
//!
//! The crate is split along that pipeline:
//!
//! - [`matchers`] — pure line-pattern recognizers for the grammar
//! - [`parser`] — the block state machine building a [`ParsedDocument`]
//! - [`hierarchy`] — FileSet → SourceCal → LocalCal resolution
//! - [`project`] — vendor-name to generic-name projection into per-channel
//!   calibration and environmental tables
//!
//! Parsing is strict and atomic (a malformed file is a hard error, never a
//! partial tree); projection is lenient (unrecognized names are dropped with
//! a warning).

pub mod document;
pub mod error;
pub mod hierarchy;
pub mod matchers;
pub mod parser;
pub mod project;

pub use document::{ParamMap, ParamValue, ParameterTree, ParsedDocument};
pub use error::{ParseError, ProjectError, ResolveError};
pub use hierarchy::{resolve, ResolvedParameters};
pub use parser::parse;
pub use project::{channels_match, project, ChannelTable};
