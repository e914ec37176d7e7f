//! Key/value tag handling shared by tagged resources
//!
//! Tags configured on a resource are merged with the provider's
//! `default_tags`, filtered through `ignore_tags`, and reconciled against
//! the service with add/remove calls.

use crate::api::{ApiError, NeptuneApi, Tag};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Keys with this prefix are reserved by AWS and never managed
pub const AWS_TAG_KEY_PREFIX: &str = "aws:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueTags(BTreeMap<String, String>);

impl KeyValueTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    /// Entries of `other` win over entries of `self`
    pub fn merge(&self, other: &KeyValueTags) -> KeyValueTags {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        KeyValueTags(merged)
    }

    pub fn ignore_aws(self) -> KeyValueTags {
        self.ignore_prefixes(&[AWS_TAG_KEY_PREFIX])
    }

    pub fn ignore_config(self, config: &IgnoreTagsConfig) -> KeyValueTags {
        let stripped = self.ignore_prefixes(config.key_prefixes.as_slice());
        KeyValueTags(
            stripped
                .0
                .into_iter()
                .filter(|(k, _)| !config.keys.contains(k))
                .collect(),
        )
    }

    /// Drops entries whose key and value both come from the provider defaults
    pub fn remove_default_config(self, config: &DefaultTagsConfig) -> KeyValueTags {
        KeyValueTags(
            self.0
                .into_iter()
                .filter(|(k, v)| config.tags.get(k) != Some(v.as_str()))
                .collect(),
        )
    }

    /// Entries of `self` whose keys are missing from `new`
    pub fn removed(&self, new: &KeyValueTags) -> KeyValueTags {
        KeyValueTags(
            self.0
                .iter()
                .filter(|(k, _)| !new.0.contains_key(*k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Entries of `new` that are absent from or differ in `self`
    pub fn updated(&self, new: &KeyValueTags) -> KeyValueTags {
        KeyValueTags(
            new.0
                .iter()
                .filter(|(k, v)| self.0.get(*k) != Some(*v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn to_tags(&self) -> Vec<Tag> {
        self.0.iter().map(|(k, v)| Tag::new(k, v)).collect()
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    fn ignore_prefixes<S: AsRef<str>>(self, prefixes: &[S]) -> KeyValueTags {
        KeyValueTags(
            self.0
                .into_iter()
                .filter(|(k, _)| !prefixes.iter().any(|p| k.starts_with(p.as_ref())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        KeyValueTags(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, String>> for KeyValueTags {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Vec<Tag>> for KeyValueTags {
    fn from(tags: Vec<Tag>) -> Self {
        tags.into_iter().map(|tag| (tag.key, tag.value)).collect()
    }
}

/// Provider-level `default_tags`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultTagsConfig {
    pub tags: KeyValueTags,
}

impl DefaultTagsConfig {
    pub fn merge_tags(&self, tags: &KeyValueTags) -> KeyValueTags {
        self.tags.merge(tags)
    }
}

/// Provider-level `ignore_tags`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreTagsConfig {
    pub keys: BTreeSet<String>,
    pub key_prefixes: Vec<String>,
}

/// Brings the tags on `arn` from `old` to `new`
pub async fn update_tags(
    conn: &dyn NeptuneApi,
    arn: &str,
    old: &KeyValueTags,
    new: &KeyValueTags,
) -> Result<(), ApiError> {
    let old = old.clone().ignore_aws();
    let new = new.clone().ignore_aws();

    let removed = old.removed(&new);
    if !removed.is_empty() {
        conn.remove_tags_from_resource(arn, removed.keys()).await?;
    }

    let updated = old.updated(&new);
    if !updated.is_empty() {
        conn.add_tags_to_resource(arn, updated.to_tags()).await?;
    }

    Ok(())
}
