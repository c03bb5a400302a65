//! Hierarchy resolver
//!
//! Echoview applies calibration settings with a fixed override precedence:
//! FileSet defaults first, then each source's SourceCal entries, then the
//! selected LocalCal setting on top. LocalCal is not source-scoped; it
//! overwrites every source identically. Keys are only ever overwritten, never
//! deleted, so the order of application is the tie-break and is load-bearing.

use indexmap::IndexMap;

use crate::document::{ParamMap, ParsedDocument};
use crate::error::ResolveError;

/// One fully resolved parameter map per acoustic source, in SourceCal order.
pub type ResolvedParameters = IndexMap<String, ParamMap>;

/// Resolve the effective parameter set for every source in the document.
///
/// `localcal_name` selects which LocalCal setting to layer on top; `None`
/// selects the first one in file order. If the document has no LocalCal
/// settings at all, no LocalCal layer is applied. Naming a LocalCal setting
/// that does not exist is an error.
pub fn resolve(
    document: &ParsedDocument,
    localcal_name: Option<&str>,
) -> Result<ResolvedParameters, ResolveError> {
    let tree = &document.parameter_tree;

    let mut resolved: ResolvedParameters = IndexMap::new();
    for (source, overrides) in &tree.sourcecal {
        let mut params = tree.fileset.clone();
        for (key, value) in overrides {
            params.insert(key.clone(), value.clone());
        }
        resolved.insert(source.clone(), params);
    }

    if !tree.localcal.is_empty() {
        let selected = match localcal_name {
            Some(name) => tree.localcal.get(name).ok_or_else(|| {
                ResolveError::UnknownLocalCal { name: name.to_string() }
            })?,
            None => &tree.localcal[0],
        };
        for (key, value) in selected {
            for params in resolved.values_mut() {
                params.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ParamValue, ParameterTree};
    use chrono::NaiveDate;

    fn number(v: f64) -> ParamValue {
        ParamValue::Number(v)
    }

    fn document(tree: ParameterTree) -> ParsedDocument {
        ParsedDocument {
            data_type: "SimradEK60Raw".to_string(),
            version: "1.00".to_string(),
            file_creation_time: NaiveDate::from_ymd_opt(2015, 6, 19)
                .unwrap()
                .and_hms_opt(23, 26, 4)
                .unwrap(),
            parameter_tree: tree,
        }
    }

    fn map(entries: &[(&str, f64)]) -> ParamMap {
        entries.iter().map(|(k, v)| (k.to_string(), number(*v))).collect()
    }

    #[test]
    fn unknown_localcal_name_is_an_error() {
        let mut tree = ParameterTree::default();
        tree.fileset = map(&[("SoundSpeed", 1496.0)]);
        tree.sourcecal.insert("T1".to_string(), map(&[]));
        tree.localcal.insert("MyCal".to_string(), map(&[("SoundSpeed", 1500.0)]));
        let doc = document(tree);

        let err = resolve(&doc, Some("NoSuchCal")).unwrap_err();
        assert_eq!(err, ResolveError::UnknownLocalCal { name: "NoSuchCal".to_string() });
    }

    #[test]
    fn empty_localcal_section_applies_no_layer() {
        let mut tree = ParameterTree::default();
        tree.fileset = map(&[("SoundSpeed", 1496.0)]);
        tree.sourcecal.insert("T1".to_string(), map(&[]));
        let doc = document(tree);

        let resolved = resolve(&doc, None).unwrap();
        assert_eq!(resolved["T1"]["SoundSpeed"], number(1496.0));
    }

    #[test]
    fn sources_keep_file_order() {
        let mut tree = ParameterTree::default();
        tree.fileset = map(&[("SoundSpeed", 1496.0)]);
        for source in ["T3", "T1", "T2"] {
            tree.sourcecal.insert(source.to_string(), map(&[]));
        }
        let doc = document(tree);

        let resolved = resolve(&doc, None).unwrap();
        let order: Vec<&str> = resolved.keys().map(String::as_str).collect();
        assert_eq!(order, ["T3", "T1", "T2"]);
    }
}
