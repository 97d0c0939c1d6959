//! Campaign records

use crate::error::Result;
use crate::validate::{self, MAX_DESCRIPTION_LEN};
use crate::{RecordId, ValueMap};
use serde::{Deserialize, Serialize};

/// A campaign: the top-level container characters are created in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: RecordId,
    /// Unique across all campaigns
    pub name: String,
    pub description: String,
    /// Free-form auxiliary data
    #[serde(default)]
    pub data: ValueMap,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for creating a campaign
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub data: ValueMap,
}

impl NewCampaign {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            data: ValueMap::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate::name("name", &self.name)?;
        validate_description(&self.description)
    }
}

/// Partial update of a campaign; only `Some` fields change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CampaignUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate::name("name", name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

fn validate_description(description: &str) -> Result<()> {
    validate::non_empty("description", description)?;
    validate::max_len("description", description, MAX_DESCRIPTION_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_new_campaign_validation() {
        assert!(NewCampaign::new("Lost Mines", "Goblins and caves").validate().is_ok());
        assert_eq!(
            NewCampaign::new("", "desc").validate(),
            Err(Error::EmptyField { field: "name" })
        );
        assert_eq!(
            NewCampaign::new("name", "").validate(),
            Err(Error::EmptyField {
                field: "description"
            })
        );

        let long = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(matches!(
            NewCampaign::new("name", long).validate(),
            Err(Error::FieldTooLong {
                field: "description",
                ..
            })
        ));
    }

    #[test]
    fn test_update_only_validates_provided_fields() {
        let update = CampaignUpdate::default().description("New hook");
        assert!(update.validate().is_ok());
        assert!(!update.is_empty());
        assert!(CampaignUpdate::default().is_empty());

        let bad = CampaignUpdate::default().name("");
        assert!(bad.validate().is_err());
    }
}
