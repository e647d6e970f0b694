use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity kinds served by the platform's list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Application,
    Contact,
    Article,
    Sector,
    Notice,
    TeamMember,
    #[serde(untagged)]
    Custom(String),
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Application => write!(f, "Application"),
            EntityKind::Contact => write!(f, "Contact"),
            EntityKind::Article => write!(f, "Article"),
            EntityKind::Sector => write!(f, "Sector"),
            EntityKind::Notice => write!(f, "Notice"),
            EntityKind::TeamMember => write!(f, "TeamMember"),
            EntityKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Application" => Ok(EntityKind::Application),
            "Contact" => Ok(EntityKind::Contact),
            "Article" => Ok(EntityKind::Article),
            "Sector" => Ok(EntityKind::Sector),
            "Notice" => Ok(EntityKind::Notice),
            "TeamMember" => Ok(EntityKind::TeamMember),
            other if !other.is_empty() && other.chars().all(|c| c.is_ascii_alphanumeric()) => {
                Ok(EntityKind::Custom(other.to_string()))
            }
            other => Err(CoreError::invalid_entity_kind(other)),
        }
    }
}
