/// Value objects for the scan domain
use serde::{Deserialize, Serialize};

/// Audit action matching the `scan_action` database type
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[ExistingTypePath = "crate::schema::sql_types::ScanAction"]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    ScanGroup,
    ScanComment,
    ScanProfile,
}

impl std::fmt::Display for ScanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanAction::ScanGroup => write!(f, "scan_group"),
            ScanAction::ScanComment => write!(f, "scan_comment"),
            ScanAction::ScanProfile => write!(f, "scan_profile"),
        }
    }
}

impl std::str::FromStr for ScanAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scan_group" => Ok(ScanAction::ScanGroup),
            "scan_comment" => Ok(ScanAction::ScanComment),
            "scan_profile" => Ok(ScanAction::ScanProfile),
            _ => Err(format!("Invalid scan action: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_action_text_form() {
        for action in [
            ScanAction::ScanGroup,
            ScanAction::ScanComment,
            ScanAction::ScanProfile,
        ] {
            assert_eq!(action.to_string().parse::<ScanAction>(), Ok(action));
        }
        assert!("scan_everything".parse::<ScanAction>().is_err());
    }
}
