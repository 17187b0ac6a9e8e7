//! Manifest list merging.
//!
//! Merges two ordered lists of Kubernetes-style manifests by the
//! (apiVersion, kind, metadata.name) triple. Matching manifests are combined
//! with a recursive deep merge where nested mappings merge field by field and
//! sequences are replaced wholesale; manifests without a match in the base
//! list are appended in order.
//!
//! The merge never mutates its inputs. The runtime may reuse the same values
//! across calls, so every element placed in the result is a fresh copy.
//!
//! Requires serde_json's `preserve_order` feature: manifests are ordered
//! mappings and merged output keeps the base element's key order.

use serde_json::Value;
use std::collections::HashMap;

/// A single keyed record describing one resource.
pub type Manifest = serde_json::Map<String, Value>;

/// The identity triple used to decide whether two manifests denote the same
/// resource.
///
/// Missing or non-string components coerce to the empty string, so two
/// manifests that both lack `metadata.name` compare equal under the same
/// apiVersion and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestIdentity {
    /// The `apiVersion` field, or `""`.
    pub api_version: String,
    /// The `kind` field, or `""`.
    pub kind: String,
    /// The `metadata.name` field, or `""`.
    pub name: String,
}

impl ManifestIdentity {
    /// Derive the identity of a manifest. Total: malformed manifests degrade
    /// to empty-string components rather than erroring.
    pub fn of(manifest: &Manifest) -> Self {
        let name = manifest
            .get("metadata")
            .and_then(Value::as_object)
            .and_then(|metadata| metadata.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        Self {
            api_version: string_field(manifest, "apiVersion"),
            kind: string_field(manifest, "kind"),
            name,
        }
    }
}

fn string_field(manifest: &Manifest, key: &str) -> String {
    manifest
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Merge `overlay` onto `base`, producing a new list.
///
/// Elements of `base` keep their relative order. Each overlay element is
/// merged into the base element with the same identity via [`deep_merge`];
/// overlay elements with no match are appended, deep-copied, after all
/// base-derived elements in overlay order.
///
/// Duplicate identities within `base` keep all their elements in the result,
/// but only the last occurrence is recorded in the lookup, so overlay matches
/// target that position. Appended overlay elements are never added to the
/// lookup: a later overlay element with the same identity is appended again
/// rather than merged into it.
pub fn merge(base: &[Manifest], overlay: &[Manifest]) -> Vec<Manifest> {
    let mut merged: Vec<Manifest> = Vec::with_capacity(base.len() + overlay.len());
    let mut index: HashMap<ManifestIdentity, usize> = HashMap::with_capacity(base.len());

    for (i, manifest) in base.iter().enumerate() {
        merged.push(manifest.clone());
        index.insert(ManifestIdentity::of(manifest), i);
    }

    for manifest in overlay {
        match index.get(&ManifestIdentity::of(manifest)) {
            Some(&i) => deep_merge(&mut merged[i], manifest),
            None => merged.push(manifest.clone()),
        }
    }

    merged
}

/// Recursively merge `src` into `dst`.
///
/// For every key in `src`: nested mappings merge recursively, everything else
/// (sequences included) overwrites the destination with a copy of the source
/// value. Sequences are atomic configuration units, never merged element-wise.
/// Keys present only in `dst` are left untouched.
pub fn deep_merge(dst: &mut Manifest, src: &Manifest) {
    for (key, value) in src {
        match value {
            Value::Object(src_map) => {
                if let Some(Value::Object(dst_map)) = dst.get_mut(key) {
                    deep_merge(dst_map, src_map);
                } else {
                    dst.insert(key.clone(), Value::Object(src_map.clone()));
                }
            }
            other => {
                dst.insert(key.clone(), other.clone());
            }
        }
    }
}
