// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

#[test]
fn test_registry_creation() {
    let registry = ProcessRegistry::new();
    // Registry registers every default processor on creation
    assert!(registry.is_complete());
    assert_eq!(registry.processors().count(), ProcessKind::ALL.len());
}

#[test]
fn test_type_name_is_capitalized_name_plus_suffix() {
    for name in ["buffer", "within", "intersects", "difference", "union", "centroid", "distance"] {
        let process = create_process(name).unwrap();
        let mut expected = name[..1].to_uppercase();
        expected.push_str(&name[1..]);
        expected.push_str("Process");
        assert_eq!(process.type_name(), expected);
    }
}

#[test]
fn test_subset_type_names_are_camel_cased() {
    assert_eq!(ProcessKind::SubsetVector.type_name(), "SubsetVectorProcess");
    assert_eq!(ProcessKind::SubsetRaster.type_name(), "SubsetRasterProcess");
    // Lowercasing the identifier still gives back the operation name
    for kind in [ProcessKind::SubsetVector, ProcessKind::SubsetRaster] {
        let stem = kind.type_name().trim_end_matches("Process").to_lowercase();
        assert_eq!(stem, kind.name());
    }
}

#[test]
fn test_names_are_case_insensitive() {
    assert_eq!("BUFFER".parse::<ProcessKind>().unwrap(), ProcessKind::Buffer);
    assert_eq!("SubsetVector".parse::<ProcessKind>().unwrap(), ProcessKind::SubsetVector);
    assert_eq!("subset_raster".parse::<ProcessKind>().unwrap(), ProcessKind::SubsetRaster);
    assert_eq!(
        create_process("subset-vector").unwrap().type_name(),
        "SubsetVectorProcess"
    );
}

#[test]
fn test_unknown_name_fails() {
    match create_process("reproject") {
        Err(Error::UnknownProcess { name }) => assert_eq!(name, "reproject"),
        other => panic!("expected UnknownProcess, got {:?}", other),
    }
    assert!(create_process("").is_err());
}

#[test]
fn test_every_kind_round_trips_through_its_name() {
    for kind in ProcessKind::ALL {
        assert_eq!(kind.name().parse::<ProcessKind>().unwrap(), kind);
        assert!(kind.type_name().ends_with("Process"));
    }
}

#[test]
fn test_each_create_returns_fresh_process() {
    let mut a = create_process("union").unwrap();
    a.set_arg("marker", 1);
    let b = create_process("union").unwrap();
    assert!(b.args.is_empty());
    assert!(b.inputs.is_empty());
    assert!(b.output().is_none());
}

#[test]
fn test_empty_registry_reports_missing() {
    let mut registry = ProcessRegistry::empty();
    assert_eq!(registry.missing().len(), ProcessKind::ALL.len());
    assert!(matches!(
        registry.create("buffer"),
        Err(Error::UnknownProcess { .. })
    ));

    registry.register(Box::new(BufferProcessor::new()));
    assert!(registry.create("buffer").is_ok());
    assert!(!registry.is_complete());
}

#[test]
fn test_declared_contracts() {
    let registry = ProcessRegistry::new();
    let buffer = registry.get(ProcessKind::Buffer).unwrap();
    assert_eq!(buffer.required_args(), &["buffer_size"]);
    assert_eq!(buffer.required_inputs()[0].format, Format::Vector);

    let subset = registry.get(ProcessKind::SubsetRaster).unwrap();
    assert_eq!(subset.default_output(), Format::Raster);
    assert_eq!(subset.required_inputs()[0].format, Format::All);

    for kind in [ProcessKind::Within, ProcessKind::Union, ProcessKind::Centroid] {
        let roles: Vec<_> = registry
            .get(kind)
            .unwrap()
            .required_inputs()
            .iter()
            .map(|s| s.role)
            .collect();
        assert_eq!(roles, vec!["first", "second"]);
    }
}
