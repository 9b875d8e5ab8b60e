//! Runtime switches for index validation.
//!
//! The containers never read global state. A host application loads a
//! [`ListConfig`] from its own settings (it is `serde`-deserializable) and
//! hands it to `Sequence::get_with` or `PackedBoolList::with_config`.

use serde::{Deserialize, Serialize};

/// Whether an accessor validates its index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsCheck {
    /// Always validate and report `IndexOutOfRange`.
    #[default]
    Checked,
    /// Skip validation outside debug builds. Accessors taking this mode are
    /// `unsafe` and the caller guarantees the index is in range.
    Unchecked,
}

impl BoundsCheck {
    pub fn is_checked(self) -> bool {
        matches!(self, BoundsCheck::Checked)
    }
}

/// What `PackedBoolList::unset` does with an index past the end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsetPolicy {
    /// Treat it as a no-op; the bit is already logically false.
    #[default]
    Ignore,
    /// Report `IndexOutOfRange`.
    Strict,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub bounds_check: BoundsCheck,
    pub unset_policy: UnsetPolicy,
}

impl ListConfig {
    /// Validation everywhere, strict bit unsetting.
    pub const fn strict() -> Self {
        Self {
            bounds_check: BoundsCheck::Checked,
            unset_policy: UnsetPolicy::Strict,
        }
    }

    /// No index validation, lenient bit unsetting.
    pub const fn fast() -> Self {
        Self {
            bounds_check: BoundsCheck::Unchecked,
            unset_policy: UnsetPolicy::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ListConfig::default();
        assert_eq!(config.bounds_check, BoundsCheck::Checked);
        assert_eq!(config.unset_policy, UnsetPolicy::Ignore);
        assert!(config.bounds_check.is_checked());
        assert!(!ListConfig::fast().bounds_check.is_checked());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ListConfig = serde_json::from_str(r#"{"unset_policy":"strict"}"#).unwrap();
        assert_eq!(config.bounds_check, BoundsCheck::Checked);
        assert_eq!(config.unset_policy, UnsetPolicy::Strict);

        let config: ListConfig =
            serde_json::from_str(r#"{"bounds_check":"unchecked","unset_policy":"ignore"}"#)
                .unwrap();
        assert_eq!(config, ListConfig::fast());
    }
}
