//! Integration tests for ssz-static-core.
//!
//! These tests run the full pipeline (catalog, generator, encoder) over real
//! catalogs and check the properties the emitted vectors must have.

use std::collections::BTreeMap;
use std::sync::Arc;

use ssz_static_core::codec::{Ssz, SszBackend};
use ssz_static_core::{
    Encoder, Fork, GenerationLimits, GenerationSetting, RandomizationMode, RunConfig,
    RunCoordinator, SeedStream, TypeCatalog, ValueGenerator,
};
use ssz_static_types::{ConfigContext, TypeDescriptor, Uint, Value, MINIMAL};

fn minimal_catalog(fork: Fork) -> TypeCatalog {
    let ctx = ConfigContext::builtin(MINIMAL).expect("minimal preset");
    TypeCatalog::for_fork(fork, &ctx).expect("catalog")
}

fn generate(ty: &Arc<TypeDescriptor>, seed: u64, mode: RandomizationMode, chaos: bool) -> Value {
    ValueGenerator::default()
        .generate(&mut SeedStream::new(seed), ty.clone(), mode, chaos)
        .expect("generate")
        .value
}

/// Walk `value` alongside `ty`, calling `check(ty, len, bound)` for every
/// bounded collection.
fn walk_bounded(
    ty: &TypeDescriptor,
    value: &Value,
    limits: GenerationLimits,
    check: &mut dyn FnMut(&TypeDescriptor, u64, u64),
) {
    match (ty, value) {
        (TypeDescriptor::ByteList { limit }, Value::Bytes(bytes)) => {
            check(ty, bytes.len() as u64, (*limit).min(limits.max_bytes_length));
        }
        (TypeDescriptor::BitList { limit }, Value::Bits(bits)) => {
            check(ty, bits.len() as u64, (*limit).min(limits.max_list_length));
        }
        (TypeDescriptor::List { element, limit }, Value::Sequence(items)) => {
            check(ty, items.len() as u64, (*limit).min(limits.max_list_length));
            for item in items {
                walk_bounded(element, item, limits, check);
            }
        }
        (TypeDescriptor::Vector { element, length }, Value::Sequence(items)) => {
            assert_eq!(items.len() as u64, *length, "vector {} length", ty);
            for item in items {
                walk_bounded(element, item, limits, check);
            }
        }
        (TypeDescriptor::ByteVector { length }, Value::Bytes(bytes)) => {
            assert_eq!(bytes.len() as u64, *length, "{} length", ty);
        }
        (TypeDescriptor::BitVector { length }, Value::Bits(bits)) => {
            assert_eq!(bits.len() as u64, *length, "{} length", ty);
        }
        (TypeDescriptor::Record(record), Value::Record(fields)) => {
            for ((_, field_ty), field) in record.fields.iter().zip(fields) {
                walk_bounded(field_ty, field, limits, check);
            }
        }
        _ => {}
    }
}

/// Test that identical inputs give byte-identical serialization and roots.
#[test]
fn test_determinism_across_runs() {
    let run = || {
        let coordinator = RunCoordinator::new(
            RunConfig::default()
                .with_forks(vec![Fork::Altair])
                .with_settings(vec![GenerationSetting::new(
                    11,
                    MINIMAL,
                    RandomizationMode::Random,
                    true,
                    2,
                )]),
        );
        coordinator
            .cases()
            .expect("cases")
            .map(|case| {
                let encoded = case.produce().expect("produce");
                (case.id(), encoded.serialized, encoded.root)
            })
            .collect::<Vec<_>>()
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

/// Test length bounds and vector exactness for every type and mode.
#[test]
fn test_length_bounds_per_mode() {
    let catalog = minimal_catalog(Fork::Altair);
    let limits = GenerationLimits::default();
    for mode in RandomizationMode::ALL {
        for (name, ty) in catalog.iter() {
            let value = generate(ty, 5, mode, false);
            walk_bounded(ty, &value, limits, &mut |node, len, bound| {
                assert!(len <= bound, "{}: {} {} exceeds {}", name, node, len, bound);
                match mode {
                    RandomizationMode::Max | RandomizationMode::Lengthy => {
                        assert_eq!(len, bound, "{}: {} in {} mode", name, node, mode)
                    }
                    RandomizationMode::Nil => assert_eq!(len, 0, "{}: {} in nil mode", name, node),
                    _ => {}
                }
            });
        }
    }
}

/// Test that chaos never breaks declared bounds either.
#[test]
fn test_chaos_respects_bounds() {
    let catalog = minimal_catalog(Fork::Phase0);
    let limits = GenerationLimits::default();
    for seed in 0..5 {
        for (name, ty) in catalog.iter() {
            let value = generate(ty, seed, RandomizationMode::Random, true);
            walk_bounded(ty, &value, limits, &mut |node, len, bound| {
                assert!(len <= bound, "{}: {} {} exceeds {}", name, node, len, bound);
            });
        }
    }
}

/// Test the count policy over the default settings for one fork.
#[test]
fn test_count_policy_over_default_settings() {
    let coordinator = RunCoordinator::new(
        RunConfig::default()
            .with_forks(vec![Fork::Phase0])
            .with_presets(vec![MINIMAL.to_string()]),
    );
    let types = minimal_catalog(Fork::Phase0).len();

    let mut per_suite: BTreeMap<String, usize> = BTreeMap::new();
    for case in coordinator.cases().expect("cases") {
        *per_suite.entry(case.suite.clone()).or_default() += 1;
    }
    for fixed in ["ssz_zero", "ssz_max", "ssz_nil", "ssz_one"] {
        assert_eq!(per_suite[fixed], types, "{}", fixed);
    }
    for changing in ["ssz_random", "ssz_lengthy", "ssz_random_chaos"] {
        assert_eq!(per_suite[changing], types * 30, "{}", changing);
    }
}

/// Test that decoding the serialized bytes gives a value with the same root.
#[test]
fn test_roundtrip_every_type() {
    let backend = Ssz;
    for fork in Fork::ALL {
        let catalog = minimal_catalog(fork);
        for (name, ty) in catalog.iter() {
            for mode in [RandomizationMode::Random, RandomizationMode::Nil, RandomizationMode::Max] {
                let value = generate(ty, 17, mode, false);
                let bytes = backend.serialize(ty, &value).expect("serialize");
                let decoded = backend.deserialize(ty, &bytes).expect("deserialize");
                assert_eq!(decoded, value, "{} {}", name, mode);
                assert_eq!(
                    backend.hash_tree_root(ty, &decoded).unwrap(),
                    backend.hash_tree_root(ty, &value).unwrap(),
                    "{} {}",
                    name,
                    mode
                );
            }
        }
    }
}

/// Test that `uint8` in max mode is 255 and serializes to `0xff`.
#[test]
fn test_uint8_max_value() {
    let ty = Arc::new(TypeDescriptor::uint(8));
    let generated = ValueGenerator::default()
        .generate(&mut SeedStream::new(0), ty, RandomizationMode::Max, false)
        .unwrap();
    assert_eq!(generated.value, Value::Uint(Uint::from_u64(8, 255)));

    let encoded = Encoder::new(Ssz).encode(&generated).unwrap();
    assert_eq!(encoded.serialized, vec![0xff]);
    assert_eq!(encoded.value, serde_json::json!(255));
}

/// Test that an empty `List[uint8, 10]` has the root `sha256(0^64)`.
#[test]
fn test_empty_list_root() {
    let ty = Arc::new(TypeDescriptor::list(TypeDescriptor::uint(8), 10));
    let generated = ValueGenerator::default()
        .generate(&mut SeedStream::new(0), ty, RandomizationMode::Nil, false)
        .unwrap();
    let encoded = Encoder::new(Ssz).encode(&generated).unwrap();
    assert!(encoded.serialized.is_empty());
    assert_eq!(
        encoded.root_hex(),
        "0xf5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a92759fb4b"
    );
    let parsed = ssz_static_types::encoding::parse_root(encoded.roots()["root"].as_str().unwrap())
        .unwrap();
    assert_eq!(parsed, encoded.root);
}

/// Test that a record generated from seed 42 in random mode is reproducible.
#[test]
fn test_seeded_record_reproducible() {
    let ty = Arc::new(TypeDescriptor::record(
        "Sample",
        [
            ("a", TypeDescriptor::uint(64)),
            ("b", TypeDescriptor::list(TypeDescriptor::uint(16), 8)),
            ("c", TypeDescriptor::byte_list(32)),
            ("d", TypeDescriptor::bitvector(12)),
        ],
    ));
    let encode = || {
        let generated = ValueGenerator::default()
            .generate(&mut SeedStream::new(42), ty.clone(), RandomizationMode::Random, false)
            .unwrap();
        Encoder::new(Ssz).encode(&generated).unwrap()
    };
    let first = encode();
    let second = encode();
    assert_eq!(first.serialized, second.serialized);
    assert_eq!(first.root, second.root);
    assert_eq!(first.value, second.value);
}

/// Test that under chaos the fields of one record draw their modes independently.
#[test]
fn test_chaos_field_independence() {
    let ty = Arc::new(TypeDescriptor::record(
        "Pair",
        [
            ("bytes", TypeDescriptor::bytes(4)),
            ("flags", TypeDescriptor::list(TypeDescriptor::boolean(), 4)),
        ],
    ));
    let mut max_bytes_empty_list = false;
    let mut zero_bytes_full_list = false;
    for seed in 0..400 {
        let Value::Record(fields) = generate(&ty, seed, RandomizationMode::Random, true) else {
            panic!("record expected");
        };
        let (Value::Bytes(bytes), Value::Sequence(flags)) = (&fields[0], &fields[1]) else {
            panic!("unexpected field shapes");
        };
        assert!(flags.len() <= 4);
        max_bytes_empty_list |= bytes == &vec![0xff; 4] && flags.is_empty();
        zero_bytes_full_list |= bytes == &vec![0x00; 4] && flags.len() == 4;
    }
    assert!(max_bytes_empty_list, "no seed paired max bytes with an empty list");
    assert!(zero_bytes_full_list, "no seed paired zero bytes with a full list");
}

/// Test that the type seed depends on the catalog position only.
#[test]
fn test_type_seed_follows_catalog_order() {
    let catalog = minimal_catalog(Fork::Phase0);
    let setting = GenerationSetting::new(3, MINIMAL, RandomizationMode::Random, false, 1);
    let coordinator = RunCoordinator::new(
        RunConfig::default()
            .with_forks(vec![Fork::Phase0])
            .with_settings(vec![setting]),
    );
    let case = coordinator
        .cases()
        .unwrap()
        .find(|case| case.handler == "Checkpoint")
        .unwrap();
    let index = catalog.index_of("Checkpoint").unwrap();

    let ty = catalog.get("Checkpoint").unwrap().clone();
    let mut stream = SeedStream::for_type(3, index).fork(0);
    let expected = ValueGenerator::default()
        .generate(&mut stream, ty, RandomizationMode::Random, false)
        .unwrap();
    assert_eq!(case.producer().generate().unwrap(), expected);
}

/// Test that external limits are honored end to end.
#[test]
fn test_custom_limits() {
    let limits = GenerationLimits {
        max_bytes_length: 3,
        max_list_length: 2,
    };
    let catalog = minimal_catalog(Fork::Altair);
    let ty = catalog.get("BeaconState").unwrap();
    let value = ValueGenerator::new(limits)
        .generate(&mut SeedStream::new(1), ty.clone(), RandomizationMode::Max, false)
        .unwrap()
        .value;
    let mut seen = 0;
    walk_bounded(ty, &value, limits, &mut |_, len, bound| {
        assert_eq!(len, bound);
        seen += 1;
    });
    assert!(seen > 0);
}
