//! End-to-end table generation into a scratch directory.

#![allow(clippy::unwrap_used)]

use std::fs;

use proptest::prelude::*;
use relay_codegen::{generate, render, Decimation, Dependency, Format, TableConfig};

/// Parses `{b0, ..., bN}, // state <n> -> GID <i>` back into its parts.
fn parse_line(line: &str) -> (Vec<bool>, u32, u32) {
    let (vector, comment) = line.split_once(", // state ").unwrap();
    let (state, gid) = comment.split_once(" -> GID ").unwrap();
    let bits = vector
        .trim_start_matches('{')
        .trim_end_matches('}')
        .split(", ")
        .map(|b| match b {
            "0" => false,
            "1" => true,
            other => panic!("unexpected bit {other:?}"),
        })
        .collect();
    (bits, state.parse().unwrap(), gid.parse().unwrap())
}

fn expansion(gid: u32, width: u32) -> Vec<bool> {
    (0..width).map(|pos| (gid >> (width - 1 - pos)) & 1 == 1).collect()
}

#[test]
fn default_table_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("OutputStateArray.txt");

    let report = generate(&TableConfig::default(), &path).unwrap();
    assert_eq!(report.retained, 192);
    assert_eq!(report.path.as_deref(), Some(path.as_path()));

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 192);
    assert!(text.ends_with('\n'));
    for (n, line) in text.lines().enumerate() {
        let (bits, state, gid) = parse_line(line);
        assert_eq!(state as usize, n);
        assert_eq!(gid % 2, 0);
        assert!(!(bits[0] && bits[1]), "linked relays both on in {line}");
        assert_eq!(bits[8], bits[7], "R01 does not follow R02 in {line}");
        assert_eq!(bits[..8], expansion(gid, 9)[..8]);
    }
}

#[test]
fn unfiltered_table_reconstructs_every_gid() {
    let text = render(&TableConfig::unfiltered(9)).unwrap().text;
    assert_eq!(text.lines().count(), 512);
    for line in text.lines() {
        let (bits, state, gid) = parse_line(line);
        assert_eq!(state, gid);
        assert_eq!(bits, expansion(gid, 9));
    }
}

#[test]
fn header_declares_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("include").join("OutputStates.h");
    let config = TableConfig {
        format: Format::Header,
        ..TableConfig::default()
    };

    let report = generate(&config, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(&format!("#define NUM_STATES {}\n", report.retained)));
    assert!(text.contains("#define NUM_OUTPUTS 9\n"));
    let rows = text.lines().filter(|l| l.trim_start().starts_with('{')).count();
    assert_eq!(rows as u64, report.retained);
}

#[test]
fn invalid_config_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.txt");
    let config = TableConfig {
        exclude: vec![512],
        ..TableConfig::default()
    };
    assert!(generate(&config, &path).is_err());
    assert!(!path.exists());
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.toml");
    fs::write(
        &path,
        "width = 5\nexclude = [4]\ndecimation = \"none\"\nconflicts = [[3, 4]]\ndependencies = []\n",
    )
    .unwrap();

    let config = TableConfig::load(&path).unwrap();
    let report = render(&config).unwrap().report;
    // 32 candidates, GID 4 excluded, the 8 GIDs with bits 3 and 4 set conflict.
    assert_eq!(report.excluded, 1);
    assert_eq!(report.conflicts, 8);
    assert_eq!(report.retained, 23);
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TableConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

fn arb_config() -> impl Strategy<Value = TableConfig> {
    (2u32..=8).prop_flat_map(|width| {
        let pos = 0..width;
        (
            Just(width),
            prop::collection::vec(0..(1u32 << width), 0..6),
            prop::collection::vec(
                (pos.clone(), pos.clone()).prop_filter("distinct", |(a, b)| a != b),
                0..3,
            ),
            prop::option::of(
                (pos.clone(), pos).prop_filter("distinct", |(s, t)| s != t),
            ),
            prop_oneof![
                Just(Decimation::None),
                Just(Decimation::KeepEven),
                Just(Decimation::KeepOdd)
            ],
        )
            .prop_map(|(width, exclude, conflicts, dependency, decimation)| TableConfig {
                width,
                exclude,
                conflicts: conflicts.into_iter().map(|(a, b)| [a, b]).collect(),
                dependencies: dependency
                    .map(|(source, target)| Dependency { source, target })
                    .into_iter()
                    .collect(),
                decimation,
                format: Format::Array,
            })
    })
}

proptest! {
    #[test]
    fn rows_match_post_filter_cardinality(config in arb_config()) {
        let table = render(&config).unwrap();
        let expected = (0..(1u32 << config.width))
            .filter(|gid| !config.exclude.contains(gid))
            .filter(|gid| {
                let bits = expansion(*gid, config.width);
                !config
                    .conflicts
                    .iter()
                    .any(|[a, b]| bits[*a as usize] && bits[*b as usize])
            })
            .filter(|gid| !config.decimation.drops(*gid))
            .count();
        prop_assert_eq!(table.text.lines().count(), expected);
        prop_assert_eq!(table.report.retained as usize, expected);
    }

    #[test]
    fn untouched_positions_equal_gid_expansion(config in arb_config()) {
        let table = render(&config).unwrap();
        let targets: Vec<u32> = config.dependencies.iter().map(|d| d.target).collect();
        for (n, line) in table.text.lines().enumerate() {
            let (bits, state, gid) = parse_line(line);
            prop_assert_eq!(state as usize, n);
            let expected = expansion(gid, config.width);
            for pos in 0..config.width {
                if !targets.contains(&pos) {
                    prop_assert_eq!(bits[pos as usize], expected[pos as usize]);
                }
            }
        }
    }
}
