//! Kubernetes name normalization
//!
//! Atlas display names allow characters that are not valid in a Kubernetes
//! object name. [`normalize_name`] maps them onto a DNS-label compatible
//! identifier; [`NameDictionary`] keeps names unique within one export run.

use crate::resources::ResourceKind;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Maximum length of a DNS label
pub const MAX_NAME_LENGTH: usize = 63;

/// Name used when nothing survives normalization
pub const FALLBACK_NAME: &str = "unnamed";

/// Characters used by Kubernetes' generate-name suffixes (no vowels, no 0/1/3)
const SUFFIX_ALPHABET: &[u8] = b"bcdfghjklmnpqrstvwxz2456789";
const SUFFIX_LENGTH: usize = 5;

/// Letter substituted for a dash left dangling by truncation
const TRAILING_DASH_REPLACEMENT: char = 'x';

const REPLACEMENTS: &[(char, &str)] = &[
    (' ', "-"),
    ('_', "-"),
    ('.', "dot"),
    ('@', "at"),
    ('(', "left-parenthesis"),
    (')', "right-parenthesis"),
    ('&', "and"),
    ('+', "plus"),
    (':', "colon"),
    (',', "comma"),
    ('<', "less-than"),
    ('>', "greater-than"),
    ('/', "slash"),
];

/// Normalize an Atlas display name into a valid Kubernetes object name.
///
/// Pure: the same input always yields the same output.
pub fn normalize_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    for c in raw.chars() {
        match REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, word)) => name.push_str(word),
            None if c.is_ascii_alphanumeric() || c == '-' => name.push(c),
            None => {}
        }
    }

    if name.starts_with('-') {
        name.replace_range(..1, "dash");
    }
    if name.ends_with('-') {
        let last = name.len() - 1;
        name.replace_range(last.., "dash");
    }

    let mut name = truncate(name, MAX_NAME_LENGTH);
    if name.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    name.make_ascii_lowercase();
    name
}

/// Truncate to `max` bytes, replacing a trailing dash with a letter.
/// The input only holds ASCII at this point.
fn truncate(mut name: String, max: usize) -> String {
    if name.len() > max {
        name.truncate(max);
        if name.ends_with('-') {
            name.pop();
            name.push(TRAILING_DASH_REPLACEMENT);
        }
    }
    name
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LENGTH)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// Per-run registry of assigned object names.
///
/// Uniqueness is tracked per resource kind, matching how Kubernetes scopes
/// names. Asking twice for the same raw name returns the same assignment;
/// a different raw name that normalizes onto an already-taken name gets a
/// random `-xxxxx` suffix, so collisions resolve differently across runs.
#[derive(Debug, Default)]
pub struct NameDictionary {
    assigned: HashMap<(ResourceKind, String), String>,
    taken: HashMap<ResourceKind, HashSet<String>>,
}

impl NameDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign (or recall) the object name for `raw` within `kind`
    pub fn assign(&mut self, kind: ResourceKind, raw: &str) -> String {
        if let Some(name) = self.assigned.get(&(kind, raw.to_string())) {
            return name.clone();
        }

        let taken = self.taken.entry(kind).or_default();
        let normalized = normalize_name(raw);
        let name = if taken.contains(&normalized) {
            let base = truncate(
                normalized.clone(),
                MAX_NAME_LENGTH - SUFFIX_LENGTH - 1,
            );
            loop {
                let candidate = format!("{}-{}", base, random_suffix());
                if !taken.contains(&candidate) {
                    tracing::debug!(
                        "{} name {:?} collides on {:?}, using {:?}",
                        kind.kind_name(),
                        raw,
                        normalized,
                        candidate
                    );
                    break candidate;
                }
            }
        } else {
            normalized
        };

        taken.insert(name.clone());
        self.assigned.insert((kind, raw.to_string()), name.clone());
        name
    }

    /// Previously assigned name, if any
    pub fn lookup(&self, kind: ResourceKind, raw: &str) -> Option<&str> {
        self.assigned
            .get(&(kind, raw.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize_name("Prod Cluster!!"), "prod-cluster");
        assert_eq!(normalize_name("svc_reader"), "svc-reader");
        assert_eq!(normalize_name("c0"), "c0");
    }

    #[test]
    fn test_normalize_words() {
        assert_eq!(normalize_name("user@corp.io"), "useratcorpdotio");
        assert_eq!(normalize_name("a+b"), "aplusb");
        assert_eq!(normalize_name("dev (eu)"), "dev-left-parenthesiseuright-parenthesis");
    }

    #[test]
    fn test_normalize_edge_dash() {
        assert_eq!(normalize_name("-abc"), "dashabc");
        assert_eq!(normalize_name("abc-"), "abcdash");
        assert_eq!(normalize_name("_abc_"), "dashabcdash");
        // only the edge occurrence is replaced
        assert_eq!(normalize_name("-a-b-"), "dasha-bdash");
    }

    #[test]
    fn test_normalize_truncates() {
        let long = "a".repeat(100);
        assert_eq!(normalize_name(&long).len(), MAX_NAME_LENGTH);

        let dash_at_cut = format!("{}-tail", "b".repeat(62));
        let name = normalize_name(&dash_at_cut);
        assert_eq!(name.len(), MAX_NAME_LENGTH);
        assert!(name.ends_with('x'));
    }

    #[test]
    fn test_normalize_empty_falls_back() {
        assert_eq!(normalize_name(""), FALLBACK_NAME);
        assert_eq!(normalize_name("!!!"), FALLBACK_NAME);
    }

    #[test]
    fn test_dictionary_memoizes() {
        let mut dict = NameDictionary::new();
        let a = dict.assign(ResourceKind::Project, "My Project");
        let b = dict.assign(ResourceKind::Project, "My Project");
        assert_eq!(a, "my-project");
        assert_eq!(a, b);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_dictionary_disambiguates_collisions() {
        let mut dict = NameDictionary::new();
        let first = dict.assign(ResourceKind::Deployment, "Cluster 0");
        let second = dict.assign(ResourceKind::Deployment, "cluster-0");
        assert_eq!(first, "cluster-0");
        assert_ne!(first, second);
        assert!(second.starts_with("cluster-0-"));
        assert_eq!(second.len(), "cluster-0".len() + 1 + SUFFIX_LENGTH);
    }

    #[test]
    fn test_dictionary_scopes_by_kind() {
        let mut dict = NameDictionary::new();
        let secret = dict.assign(ResourceKind::Secret, "prod");
        let project = dict.assign(ResourceKind::Project, "Prod");
        assert_eq!(secret, "prod");
        assert_eq!(project, "prod");
    }

    #[test]
    fn test_dictionary_collision_stays_bounded() {
        let mut dict = NameDictionary::new();
        let long_a = "x".repeat(80);
        let long_b = format!("{}y", "x".repeat(80));
        dict.assign(ResourceKind::Team, &long_a);
        let second = dict.assign(ResourceKind::Team, &long_b);
        assert!(second.len() <= MAX_NAME_LENGTH);
        assert_eq!(dict.lookup(ResourceKind::Team, &long_b), Some(second.as_str()));
    }
}
