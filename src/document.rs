//! Data model for parsed ECS documents
//!
//! Parsing is two-phase. The block parser first builds a [`RawTree`] whose
//! leaves are the untouched value substrings, so structural problems always
//! surface before typing problems. A separate coercion pass then produces the
//! strongly typed [`ParameterTree`]: every value becomes a float, except the
//! reserved `TvgRangeCorrection` key, which must be one of eight fixed
//! literals and is preserved as an exact string.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ParseError;

/// The eight settings Echoview accepts for `TvgRangeCorrection`.
pub const TVG_RANGE_CORRECTION_SETTINGS: [&str; 8] = [
    "None",
    "BySamples",
    "SimradEx500",
    "SimradEx60",
    "BioSonics",
    "Kaijo",
    "PulseLength",
    "Ex500Forced",
];

/// The one parameter whose value is an enumerated string rather than a number.
pub const TVG_RANGE_CORRECTION: &str = "TvgRangeCorrection";

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    /// One of [`TVG_RANGE_CORRECTION_SETTINGS`], kept as the exact string
    /// from the file.
    Setting(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            ParamValue::Setting(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Number(_) => None,
            ParamValue::Setting(s) => Some(s),
        }
    }
}

/// A flat parameter map. Insertion order follows the file.
pub type ParamMap = IndexMap<String, ParamValue>;

/// The three named sections of an ECS document.
///
/// `fileset` holds the document-wide defaults, `sourcecal` one override map
/// per acoustic source, `localcal` zero or more named override sets layered
/// on top of everything. The shape distinction is load-bearing: `fileset` is
/// flat, the other two are keyed by source id / setting name in order of
/// appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterTree {
    pub fileset: ParamMap,
    pub sourcecal: IndexMap<String, ParamMap>,
    pub localcal: IndexMap<String, ParamMap>,
}

/// The result of one full parse pass over an ECS file. Immutable afterward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDocument {
    /// Instrument/model tag from the file heading, e.g. `SimradEK60Raw`.
    pub data_type: String,
    /// `major.minor` version string, verbatim.
    pub version: String,
    /// File creation time at second precision.
    pub file_creation_time: NaiveDateTime,
    pub parameter_tree: ParameterTree,
}

/// Untyped intermediate map: parameter name to raw value substring.
pub(crate) type RawMap = IndexMap<String, String>;

/// The structurally complete but untyped parameter tree built by the block
/// parser. An explicit type rather than a convention, so the coercion pass
/// has a single, honest input shape.
#[derive(Debug, Default)]
pub(crate) struct RawTree {
    pub fileset: RawMap,
    pub sourcecal: IndexMap<String, RawMap>,
    pub localcal: IndexMap<String, RawMap>,
}

impl RawTree {
    /// Coerce every value, producing the typed tree or the first type error.
    pub(crate) fn into_typed(self) -> Result<ParameterTree, ParseError> {
        Ok(ParameterTree {
            fileset: coerce_map(self.fileset)?,
            sourcecal: coerce_sections(self.sourcecal)?,
            localcal: coerce_sections(self.localcal)?,
        })
    }
}

fn coerce_sections(
    sections: IndexMap<String, RawMap>,
) -> Result<IndexMap<String, ParamMap>, ParseError> {
    sections
        .into_iter()
        .map(|(name, map)| Ok((name, coerce_map(map)?)))
        .collect()
}

fn coerce_map(map: RawMap) -> Result<ParamMap, ParseError> {
    map.into_iter()
        .map(|(param, value)| {
            let typed = coerce_value(&param, value)?;
            Ok((param, typed))
        })
        .collect()
}

fn coerce_value(param: &str, value: String) -> Result<ParamValue, ParseError> {
    if param == TVG_RANGE_CORRECTION {
        if TVG_RANGE_CORRECTION_SETTINGS.contains(&value.as_str()) {
            Ok(ParamValue::Setting(value))
        } else {
            Err(ParseError::InvalidTvgSetting { value })
        }
    } else {
        match value.parse::<f64>() {
            Ok(number) => Ok(ParamValue::Number(number)),
            Err(_) => Err(ParseError::NonNumericValue {
                param: param.to_string(),
                value,
            }),
        }
    }
}
