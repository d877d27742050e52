//! Bucket identifiers and the per-bucket naming policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical partitions of the object store.
///
/// The set is closed and known at compile time. Adding a bucket means
/// deciding its naming policy in [`Bucket::owner_scoped`] as well; the
/// exhaustive matches below make skipping that decision a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Translated documents, keyed under the owning file record.
    Translation,
    /// User avatars.
    Avatar,
    /// Generated exports (reports, archives).
    Export,
}

impl Bucket {
    /// Physical bucket name on the storage backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Translation => "translation",
            Bucket::Avatar => "avatar",
            Bucket::Export => "export",
        }
    }

    /// Whether object keys in this bucket are namespaced under the owning
    /// entity identifier as `{owner}/{file_name}`.
    ///
    /// Only translated documents carry an owner namespace today; avatars
    /// and exports keep flat keys.
    pub fn owner_scoped(&self) -> bool {
        match self {
            Bucket::Translation => true,
            Bucket::Avatar | Bucket::Export => false,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_names() {
        assert_eq!(Bucket::Translation.as_str(), "translation");
        assert_eq!(Bucket::Avatar.as_str(), "avatar");
        assert_eq!(Bucket::Export.as_str(), "export");
    }

    #[test]
    fn test_owner_scoping_policy() {
        assert!(Bucket::Translation.owner_scoped());
        assert!(!Bucket::Avatar.owner_scoped());
        assert!(!Bucket::Export.owner_scoped());
    }

    #[test]
    fn test_display_matches_physical_name() {
        assert_eq!(Bucket::Translation.to_string(), "translation");
    }
}
