use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// Which side should own the Exchange attributes of a mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    SetCloudManaged,
    SetOnPremManaged,
}

impl Intent {
    /// Value written to the cloud-managed attribute.
    pub fn value(self) -> bool {
        match self {
            Intent::SetCloudManaged => true,
            Intent::SetOnPremManaged => false,
        }
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::SetCloudManaged => write!(f, "cloud"),
            Intent::SetOnPremManaged => write!(f, "on-prem"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown target {target}. Expected cloud or onprem")]
pub struct UnknownIntentError {
    target: String,
}

impl FromStr for Intent {
    type Err = UnknownIntentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "cloud" => Ok(Intent::SetCloudManaged),
            "onprem" | "on-prem" | "onpremises" => Ok(Intent::SetOnPremManaged),
            _ => Err(UnknownIntentError {
                target: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    #[rstest]
    #[case("cloud", Intent::SetCloudManaged)]
    #[case("Cloud", Intent::SetCloudManaged)]
    #[case("onprem", Intent::SetOnPremManaged)]
    #[case("on-prem", Intent::SetOnPremManaged)]
    #[case("OnPremises", Intent::SetOnPremManaged)]
    fn test_intent_parses_known_targets(#[case] input: &str, #[case] expected: Intent) {
        assert_eq!(expected, assert_ok!(input.parse::<Intent>()));
    }

    #[rstest]
    #[case(Intent::SetCloudManaged, true, "cloud")]
    #[case(Intent::SetOnPremManaged, false, "on-prem")]
    fn test_intent_value_and_display(
        #[case] intent: Intent,
        #[case] value: bool,
        #[case] shown: &str,
    ) {
        assert_eq!(value, intent.value());
        assert_eq!(shown, intent.to_string());
    }

    #[rstest]
    fn test_intent_rejects_unknown_target() {
        let error = assert_err!("hybrid".parse::<Intent>());
        assert_eq!("unknown target hybrid. Expected cloud or onprem", error.to_string());
    }
}
