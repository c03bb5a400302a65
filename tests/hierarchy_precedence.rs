//! Override-precedence tests for the FileSet/SourceCal/LocalCal hierarchy.

use chrono::NaiveDate;
use ecs::{parse, resolve, ParamMap, ParamValue, ParameterTree, ParsedDocument, ResolveError};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn number(v: f64) -> ParamValue {
    ParamValue::Number(v)
}

fn map(entries: &[(&str, f64)]) -> ParamMap {
    entries.iter().map(|(k, v)| (k.to_string(), number(*v))).collect()
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

fn scenario_tree() -> ParameterTree {
    let mut tree = ParameterTree::default();
    tree.fileset = map(&[("SoundSpeed", 1496.0), ("TvgRangeCorrectionOffset", 2.0)]);
    tree.fileset.insert(
        "TvgRangeCorrection".to_string(),
        ParamValue::Setting("BySamples".to_string()),
    );
    tree.sourcecal.insert(
        "T1".to_string(),
        map(&[("SoundSpeed", 1480.6), ("Frequency", 18.0), ("TwoWayBeamAngle", -17.37)]),
    );
    tree.sourcecal.insert(
        "T2".to_string(),
        map(&[("SoundSpeed", 1480.6), ("Frequency", 38.0), ("TwoWayBeamAngle", -21.01)]),
    );
    tree.sourcecal.insert(
        "T3".to_string(),
        map(&[("SoundSpeed", 1480.6), ("Frequency", 120.0), ("TwoWayBeamAngle", -20.47)]),
    );
    tree.localcal
        .insert("MyCal".to_string(), map(&[("TwoWayBeamAngle", -17.37)]));
    tree
}

#[test]
fn sourcecal_overrides_fileset() {
    let resolved = resolve(&document(scenario_tree()), None).unwrap();
    assert_eq!(resolved["T1"]["SoundSpeed"], number(1480.6));
}

#[test]
fn localcal_overrides_sourcecal_for_all_sources() {
    let resolved = resolve(&document(scenario_tree()), None).unwrap();
    // T2's own SourceCal entry says -21.01; MyCal wins everywhere.
    assert_eq!(resolved["T2"]["TwoWayBeamAngle"], number(-17.37));
    assert_eq!(resolved["T3"]["TwoWayBeamAngle"], number(-17.37));
}

#[test]
fn fileset_values_fall_through_untouched() {
    let resolved = resolve(&document(scenario_tree()), None).unwrap();
    for source in ["T1", "T2", "T3"] {
        assert_eq!(resolved[source]["TvgRangeCorrectionOffset"], number(2.0));
        assert_eq!(
            resolved[source]["TvgRangeCorrection"],
            ParamValue::Setting("BySamples".to_string())
        );
    }
}

#[test]
fn default_localcal_is_the_first_in_file_order() {
    let mut tree = scenario_tree();
    tree.localcal
        .insert("SecondCal".to_string(), map(&[("TwoWayBeamAngle", -99.0)]));
    let resolved = resolve(&document(tree), None).unwrap();
    assert_eq!(resolved["T1"]["TwoWayBeamAngle"], number(-17.37));
}

#[test]
fn explicit_localcal_name_is_honored() {
    let mut tree = scenario_tree();
    tree.localcal
        .insert("SecondCal".to_string(), map(&[("TwoWayBeamAngle", -99.0)]));
    let resolved = resolve(&document(tree), Some("SecondCal")).unwrap();
    assert_eq!(resolved["T2"]["TwoWayBeamAngle"], number(-99.0));
}

#[test]
fn unknown_localcal_name_is_rejected() {
    let err = resolve(&document(scenario_tree()), Some("NoSuchCal")).unwrap_err();
    assert_eq!(err, ResolveError::UnknownLocalCal { name: "NoSuchCal".to_string() });
}

#[test]
fn resolved_keys_are_the_union_of_all_levels() {
    let resolved = resolve(&document(scenario_tree()), None).unwrap();
    let t1 = &resolved["T1"];
    assert_eq!(t1.len(), 5);
    for key in [
        "SoundSpeed",
        "TvgRangeCorrection",
        "TvgRangeCorrectionOffset",
        "Frequency",
        "TwoWayBeamAngle",
    ] {
        assert!(t1.contains_key(key), "missing {key}");
    }
}

#[test]
fn end_to_end_scenario_from_text() {
    let text = r"#====#
# ECHOVIEW CALIBRATION SUPPLEMENT (.ECS) FILE (SimradEK60Raw) #
# 6/19/2015 23:26:04 #
#====#
# boilerplate #
# boilerplate #
# boilerplate #
# boilerplate #
# boilerplate #
# boilerplate #
#====#

Version 1.00

#====#
# FILESET SETTINGS #
#====#

SoundSpeed = 1496.00
TvgRangeCorrection = BySamples
TvgRangeCorrectionOffset = 2.00

#====#
# SOURCECAL SETTINGS #
#====#

SourceCal T1
    SoundSpeed = 1480.60
    Frequency = 18.00

SourceCal T2
    Frequency = 38.00
    TwoWayBeamAngle = -21.01

#====#
# LOCALCAL SETTINGS #
#====#

LocalCal MyCal
    TwoWayBeamAngle = -17.37
";
    let document = parse(text).unwrap();
    let resolved = resolve(&document, None).unwrap();
    assert_eq!(resolved["T1"]["SoundSpeed"], number(1480.6));
    assert_eq!(resolved["T2"]["TwoWayBeamAngle"], number(-17.37));
    assert_eq!(resolved["T2"]["SoundSpeed"], number(1496.0));
}

fn value() -> impl Strategy<Value = f64> {
    -1.0e6..1.0e6f64
}

fn param_map() -> impl Strategy<Value = BTreeMap<String, f64>> {
    prop::collection::btree_map("[A-Z][a-z]{1,4}", value(), 0..6)
}

fn to_params(map: BTreeMap<String, f64>) -> ParamMap {
    map.into_iter().map(|(k, v)| (k, ParamValue::Number(v))).collect()
}

proptest! {
    // For every key, the resolved value comes from the highest level that
    // defines it: localcal, then the source's sourcecal entry, then fileset.
    #[test]
    fn precedence_holds_for_arbitrary_maps(
        fileset in param_map(),
        sourcecal in prop::collection::btree_map("T[0-9]", param_map(), 1..4),
        localcal in param_map(),
    ) {
        let mut tree = ParameterTree::default();
        tree.fileset = to_params(fileset.clone());
        for (source, params) in &sourcecal {
            tree.sourcecal.insert(source.clone(), to_params(params.clone()));
        }
        tree.localcal.insert("LC".to_string(), to_params(localcal.clone()));

        let resolved = resolve(&document(tree), None).unwrap();
        prop_assert_eq!(resolved.len(), sourcecal.len());

        for (source, params) in &sourcecal {
            let out = &resolved[source];
            for (key, expected) in &localcal {
                prop_assert_eq!(&out[key.as_str()], &ParamValue::Number(*expected));
            }
            for (key, expected) in params {
                if !localcal.contains_key(key) {
                    prop_assert_eq!(&out[key.as_str()], &ParamValue::Number(*expected));
                }
            }
            for (key, expected) in &fileset {
                if !localcal.contains_key(key) && !params.contains_key(key) {
                    prop_assert_eq!(&out[key.as_str()], &ParamValue::Number(*expected));
                }
            }
            // No key is ever deleted, only overwritten.
            for key in fileset.keys().chain(params.keys()).chain(localcal.keys()) {
                prop_assert!(out.contains_key(key));
            }
        }
    }
}
