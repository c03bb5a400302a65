//! Domain projection
//!
//! Echoview names its parameters after the vendor's conventions; downstream
//! consumers want generic calibration and environmental parameter names, one
//! value per channel. The translation table below is fixed, and its domain is
//! partitioned into an environmental subset (sound speed, absorption) and a
//! calibration subset (everything else). Unlike the parser, projection is
//! lenient: a resolved parameter the table does not know is dropped with a
//! warning, since an unrecognized name is assumed immaterial to the caller
//! rather than a document-level defect.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::document::ParamValue;
use crate::error::ProjectError;
use crate::hierarchy::ResolvedParameters;

/// Vendor parameter name to generic name. Declaration order fixes the column
/// order of the output tables.
const EV_EP_MAP: &[(&str, &str)] = &[
    ("AbsorptionCoefficient", "sound_absorption"),
    ("EK60SaCorrection", "sa_correction"),
    ("Ek60TransducerGain", "gain_correction"),
    ("Frequency", "frequency_nominal"),
    ("MajorAxis3dbBeamAngle", "beamwidth_athwartship"),
    ("MajorAxisAngleOffset", "angle_offset_athwartship"),
    ("MajorAxisAngleSensitivity", "angle_sensitivity_athwartship"),
    ("MinorAxis3dbBeamAngle", "beamwidth_alongship"),
    ("MinorAxisAngleOffset", "angle_offset_alongship"),
    ("MinorAxisAngleSensitivity", "angle_sensitivity_alongship"),
    ("SoundSpeed", "sound_speed"),
    ("TwoWayBeamAngle", "equivalent_beam_angle"),
];

/// Vendor names that project into the environmental table; every other
/// mapped name projects into the calibration table.
const ENV_PARAMS: &[&str] = &["AbsorptionCoefficient", "SoundSpeed"];

/// Generic name of the nominal frequency, carried in both tables because it
/// validates channel order downstream.
pub const FREQUENCY_NOMINAL: &str = "frequency_nominal";

fn translate(name: &str) -> Option<&'static str> {
    EV_EP_MAP.iter().find(|(ev, _)| *ev == name).map(|(_, ep)| *ep)
}

fn is_env(name: &str) -> bool {
    ENV_PARAMS.contains(&name)
}

/// A channel-indexed table: one ordered sequence of values per generic
/// parameter name, aligned with `channels`. This is the flat shape the
/// downstream array adapter wraps into labeled arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelTable {
    pub channels: Vec<String>,
    pub values: IndexMap<String, Vec<f64>>,
}

impl ChannelTable {
    fn new(channels: &[String]) -> Self {
        Self { channels: channels.to_vec(), values: IndexMap::new() }
    }

    fn push(&mut self, name: &'static str, value: f64) {
        self.values.entry(name.to_string()).or_default().push(value);
    }

    /// The value sequence for a generic parameter name, if present.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.values.get(name).map(Vec::as_slice)
    }
}

/// Project resolved per-source parameters onto generic names, split into
/// `(calibration, environmental)` tables.
///
/// `channels` supplies the channel id for each source, in the iteration order
/// of `resolved` (the order sources appeared in the file); its length must
/// match the source count. Parameter names outside the translation table are
/// dropped with one warning per occurrence. The nominal frequency sequence is
/// copied into the environmental table as well.
pub fn project(
    resolved: &ResolvedParameters,
    channels: &[String],
) -> Result<(ChannelTable, ChannelTable), ProjectError> {
    if channels.len() != resolved.len() {
        return Err(ProjectError::ChannelCountMismatch {
            channels: channels.len(),
            sources: resolved.len(),
        });
    }

    let mut cal = ChannelTable::new(channels);
    let mut env = ChannelTable::new(channels);

    for (source, params) in resolved {
        for (name, value) in params {
            let Some(target) = translate(name) else {
                warn!(
                    source = %source,
                    param = %name,
                    "not an allowable calibration or environmental parameter"
                );
                continue;
            };
            match value {
                ParamValue::Number(v) => {
                    if is_env(name) {
                        env.push(target, *v);
                    } else {
                        cal.push(target, *v);
                    }
                }
                ParamValue::Setting(s) => {
                    warn!(source = %source, param = %name, value = %s, "expected a numeric value");
                }
            }
        }
    }

    if let Some(freq) = cal.values.get(FREQUENCY_NOMINAL).cloned() {
        env.values.insert(FREQUENCY_NOMINAL.to_string(), freq);
    }

    Ok((cal, env))
}

/// Check a table's nominal-frequency sequence against an externally sourced
/// reference, element for element with no tolerance. Callers use this to
/// confirm per-channel values line up with an independent channel list before
/// reassigning channel ids.
pub fn channels_match(table: &ChannelTable, reference: &[f64]) -> Result<bool, ProjectError> {
    let freq = table.get(FREQUENCY_NOMINAL).ok_or(ProjectError::MissingFrequency)?;
    Ok(freq.len() == reference.len() && freq.iter().zip(reference).all(|(a, b)| a == b))
}
