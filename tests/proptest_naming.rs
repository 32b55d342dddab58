//! Property-based tests using proptest
//!
//! These tests verify name normalization, collision handling and schema
//! field path lookups using randomized inputs.

use atlas_k8s::capability::{CapabilitySet, StaticSchemaProvider};
use atlas_k8s::naming::{normalize_name, NameDictionary, MAX_NAME_LENGTH};
use atlas_k8s::resources::ResourceKind;
use proptest::prelude::*;
use std::collections::HashSet;

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
}

/// Atlas display names: mostly printable, with the punctuation Atlas allows
fn arb_display_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9 _.@()&+:,<>/!-]{0,80}",
        ".{0,40}",
    ]
}

/// A CRD document whose `spec` holds exactly one dotted path
fn crd_with_path(path: &[String]) -> String {
    let mut yaml = String::from(
        "spec:\n  versions:\n  - schema:\n      openAPIV3Schema:\n        properties:\n          spec:\n",
    );
    let mut indent = 12;
    for segment in path {
        yaml.push_str(&format!("{}properties:\n", " ".repeat(indent)));
        yaml.push_str(&format!("{}{}:\n", " ".repeat(indent + 2), segment));
        indent += 4;
    }
    yaml.push_str(&format!("{}type: string\n", " ".repeat(indent)));
    yaml
}

fn all_kinds(deployment_crd: String) -> StaticSchemaProvider {
    let plain = crd_with_path(&["name".to_string()]);
    ResourceKind::ALL
        .into_iter()
        .filter(|k| *k != ResourceKind::Secret)
        .fold(StaticSchemaProvider::new(), |p, kind| {
            if kind == ResourceKind::Deployment {
                p.with_document(kind, deployment_crd.clone())
            } else {
                p.with_document(kind, plain.clone())
            }
        })
}

proptest! {
    /// Normalized names are always valid Kubernetes object names
    #[test]
    fn prop_normalized_names_are_valid(raw in arb_display_name()) {
        let name = normalize_name(&raw);
        prop_assert!(is_valid_name(&name), "invalid name {:?} from {:?}", name, raw);
    }

    /// Normalization is a pure function of its input
    #[test]
    fn prop_normalization_is_deterministic(raw in arb_display_name()) {
        prop_assert_eq!(normalize_name(&raw), normalize_name(&raw));
    }

    /// Already valid short names pass through unchanged
    #[test]
    fn prop_valid_names_are_fixed_points(raw in "[a-z0-9]([a-z0-9-]{0,40}[a-z0-9])?") {
        prop_assert_eq!(normalize_name(&raw), raw);
    }

    /// Distinct raw names never share an assigned name within a kind
    #[test]
    fn prop_assigned_names_are_unique(raws in prop::collection::hash_set(arb_display_name(), 1..30)) {
        let mut names = NameDictionary::new();
        let mut seen = HashSet::new();
        for raw in &raws {
            let name = names.assign(ResourceKind::DatabaseUser, raw);
            prop_assert!(is_valid_name(&name), "invalid name {:?}", name);
            prop_assert!(seen.insert(name.clone()), "{:?} assigned twice", name);
            prop_assert_eq!(names.assign(ResourceKind::DatabaseUser, raw), name);
        }
        prop_assert_eq!(names.len(), raws.len());
    }

    /// Colliding names keep the normalized base and add a suffix
    #[test]
    fn prop_collisions_get_suffix(base in "[a-z]{1,70}") {
        let mut names = NameDictionary::new();
        let first = names.assign(ResourceKind::Team, &base);
        let second = names.assign(ResourceKind::Team, &base.to_uppercase());

        prop_assert_ne!(&first, &second);
        prop_assert!(is_valid_name(&second));
        let (stem, suffix) = second.rsplit_once('-').unwrap();
        prop_assert_eq!(suffix.len(), 5);
        prop_assert!(first.starts_with(stem));
    }

    /// A path is supported exactly when the version's schema declares it
    #[test]
    fn prop_field_path_follows_schema(
        path in prop::collection::vec("x[a-zA-Z]{0,8}", 1..5),
        other in "z[a-z]{0,8}",
    ) {
        let dotted = path.join(".");
        let with_path = tokio_test::block_on(
            CapabilitySet::load(&all_kinds(crd_with_path(&path)), "2.5.0"),
        )
        .unwrap();
        let without_path = tokio_test::block_on(
            CapabilitySet::load(&all_kinds(crd_with_path(&[other.clone()])), "2.6.0"),
        )
        .unwrap();

        prop_assert!(with_path.is_field_path_supported(ResourceKind::Deployment, &dotted));
        prop_assert!(!without_path.is_field_path_supported(ResourceKind::Deployment, &dotted));
        prop_assert!(without_path.is_field_path_supported(ResourceKind::Deployment, &other));
        let extended = format!("{}.{}", dotted, other);
        prop_assert!(!with_path.is_field_path_supported(ResourceKind::Deployment, &extended));
    }
}
