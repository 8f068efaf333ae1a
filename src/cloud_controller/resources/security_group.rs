//! Application security groups.

use std::fmt;
use std::str::FromStr;

use crate::error::ActionError;

/// The phase of an application's life a security group applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    /// Applies to running instances.
    Running,
    /// Applies to staging containers.
    Staging,
}

impl Lifecycle {
    /// Returns the lowercase name used on the command line and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Staging => "staging",
        }
    }

    /// Returns the other lifecycle.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Running => Self::Staging,
            Self::Staging => Self::Running,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifecycle {
    type Err = ActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "running" => Ok(Self::Running),
            "staging" => Ok(Self::Staging),
            other => Err(ActionError::invalid_argument(
                "lifecycle",
                format!("'{other}' must be 'running' or 'staging'"),
            )),
        }
    }
}

/// One egress rule of a security group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityGroupRule {
    /// `tcp`, `udp`, `icmp` or `all`.
    pub protocol: String,
    /// Destination address, range or CIDR.
    pub destination: String,
    /// Ports or port ranges, comma separated.
    pub ports: String,
    /// Free-form description.
    pub description: String,
}

/// A named set of egress rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityGroup {
    /// Server-assigned GUID.
    pub guid: String,
    /// Security group name.
    pub name: String,
    /// Egress rules.
    pub rules: Vec<SecurityGroupRule>,
    /// Applied to every running application.
    pub running_default: bool,
    /// Applied to every staging container.
    pub staging_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("running", Lifecycle::Running)]
    #[case("staging", Lifecycle::Staging)]
    fn lifecycle_parses_known_names(#[case] input: &str, #[case] expected: Lifecycle) {
        assert_eq!(input.parse::<Lifecycle>().ok(), Some(expected));
        assert_eq!(expected.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("Running")]
    #[case("building")]
    fn lifecycle_rejects_other_names(#[case] input: &str) {
        let error = input.parse::<Lifecycle>().expect_err("parse should fail");
        assert!(matches!(error, ActionError::InvalidArgument { ref argument, .. } if argument == "lifecycle"));
    }

    #[rstest]
    fn other_lifecycle_flips() {
        assert_eq!(Lifecycle::Running.other(), Lifecycle::Staging);
        assert_eq!(Lifecycle::Staging.other(), Lifecycle::Running);
    }
}
