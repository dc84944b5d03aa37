use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identity of a mailbox as understood by the remote service.
///
/// Unique within a snapshot and the only key used to address mutations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            Err("principal id should not be empty")
        } else {
            Ok(Self(value))
        }
    }
}

impl TryFrom<&str> for PrincipalId {
    type Error = <Self as TryFrom<String>>::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_string())
    }
}

impl FromStr for PrincipalId {
    type Err = <Self as TryFrom<String>>::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}

impl From<PrincipalId> for String {
    fn from(value: PrincipalId) -> Self {
        value.0
    }
}

impl Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn test_principal_id_displays_raw_id() {
        let id = assert_ok!(PrincipalId::try_from("5f1c2b7e-aaaa-bbbb-cccc-0123456789ab"));
        assert_eq!("5f1c2b7e-aaaa-bbbb-cccc-0123456789ab", id.to_string());
        assert_eq!("5f1c2b7e-aaaa-bbbb-cccc-0123456789ab", id.as_str());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_principal_id_rejects_blank_ids(#[case] value: &str) {
        assert_err!(PrincipalId::try_from(value));
    }

    #[rstest]
    fn test_principal_id_deserializes_from_plain_string() {
        let id: PrincipalId = assert_ok!(serde_json::from_str(r#""abc""#));
        assert_eq!("abc", id.as_str());
        assert_err!(serde_json::from_str::<PrincipalId>(r#""""#));
    }
}
