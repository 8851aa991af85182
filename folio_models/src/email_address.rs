use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Strictly parsed mailbox (`Display Name <local@domain>` or a bare address),
/// used for the configured sender and recipient of contact emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressWithName(pub lettre::message::Mailbox);

impl EmailAddressWithName {
    pub fn address(&self) -> &str {
        self.0.email.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }
}

impl std::fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EmailAddressWithName {
    type Err = <lettre::message::Mailbox as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl TryFrom<&str> for EmailAddressWithName {
    type Error = <Self as FromStr>::Err;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_name() {
        let mailbox = "Portfolio Contact <onboarding@resend.dev>"
            .parse::<EmailAddressWithName>()
            .unwrap();
        assert_eq!(mailbox.name(), Some("Portfolio Contact"));
        assert_eq!(mailbox.address(), "onboarding@resend.dev");
    }

    #[test]
    fn parse_bare_address() {
        let mailbox = "me@example.com".parse::<EmailAddressWithName>().unwrap();
        assert_eq!(mailbox.name(), None);
        assert_eq!(mailbox.to_string(), "me@example.com");
    }

    #[test]
    fn deserialize_from_string() {
        let mailbox: EmailAddressWithName =
            serde_json::from_value(serde_json::json!("Me <me@example.com>")).unwrap();
        assert_eq!(mailbox.address(), "me@example.com");
    }

    #[test]
    fn reject_invalid() {
        assert!("not an address".parse::<EmailAddressWithName>().is_err());
    }
}
