//! Text search and exact-match filters.

use crate::error::Result;
use crate::models::{StoredCharacter, StoredSetting};
use lorekeeper_core::RecordId;
use regex::{Regex, RegexBuilder};

/// Case-insensitive substring matcher.
///
/// The query is matched literally. An empty query matches every record.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    pattern: Option<Regex>,
}

impl TextMatcher {
    pub fn new(query: &str) -> Result<Self> {
        if query.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|e| lorekeeper_core::Error::InvalidValue {
                field: "query".into(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// True if the query occurs in any of `fields`; absent fields never match.
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        match &self.pattern {
            None => true,
            Some(pattern) => fields
                .into_iter()
                .flatten()
                .any(|text| pattern.is_match(text)),
        }
    }
}

/// A query paired with the matcher compiled from its own text.
#[derive(Debug)]
pub(crate) struct QueryFilter<'a, Q> {
    query: &'a Q,
    text: TextMatcher,
}

/// Character search: text over name and player name, plus exact filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterQuery {
    pub text: String,
    pub campaign_id: Option<RecordId>,
    pub character_class: Option<String>,
    pub race: Option<String>,
}

impl CharacterQuery {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            text: query.into(),
            ..Default::default()
        }
    }

    pub fn campaign(mut self, campaign_id: impl Into<RecordId>) -> Self {
        self.campaign_id = Some(campaign_id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.character_class = Some(class.into());
        self
    }

    pub fn race(mut self, race: impl Into<String>) -> Self {
        self.race = Some(race.into());
        self
    }

    pub(crate) fn filter(&self) -> Result<QueryFilter<'_, Self>> {
        Ok(QueryFilter {
            query: self,
            text: TextMatcher::new(&self.text)?,
        })
    }
}

impl QueryFilter<'_, CharacterQuery> {
    pub(crate) fn accepts(&self, stored: &StoredCharacter) -> bool {
        let query = self.query;
        if let Some(campaign_id) = &query.campaign_id {
            if stored.campaign_id != campaign_id.as_str() {
                return false;
            }
        }
        if let Some(class) = &query.character_class {
            if stored.class.as_deref() != Some(class.as_str()) {
                return false;
            }
        }
        if let Some(race) = &query.race {
            if stored.race.as_deref() != Some(race.as_str()) {
                return false;
            }
        }
        self.text
            .matches_any([Some(stored.name.as_str()), stored.player_name.as_deref()])
    }
}

impl From<&str> for CharacterQuery {
    fn from(query: &str) -> Self {
        Self::text(query)
    }
}

/// Setting search: text over name, region and description, plus exact filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingQuery {
    pub text: String,
    pub setting_type: Option<String>,
    pub parent_id: Option<RecordId>,
}

impl SettingQuery {
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            text: query.into(),
            ..Default::default()
        }
    }

    pub fn setting_type(mut self, setting_type: impl Into<String>) -> Self {
        self.setting_type = Some(setting_type.into());
        self
    }

    pub fn parent(mut self, parent_id: impl Into<RecordId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub(crate) fn filter(&self) -> Result<QueryFilter<'_, Self>> {
        Ok(QueryFilter {
            query: self,
            text: TextMatcher::new(&self.text)?,
        })
    }
}

impl QueryFilter<'_, SettingQuery> {
    pub(crate) fn accepts(&self, stored: &StoredSetting) -> bool {
        let query = self.query;
        if let Some(setting_type) = &query.setting_type {
            if stored.setting_type != *setting_type {
                return false;
            }
        }
        if let Some(parent_id) = &query.parent_id {
            if stored.parent_id() != Some(parent_id.as_str()) {
                return false;
            }
        }
        self.text.matches_any([
            Some(stored.name.as_str()),
            Some(stored.region.as_str()),
            stored.details.description.as_deref(),
        ])
    }
}

impl From<&str> for SettingQuery {
    fn from(query: &str) -> Self {
        Self::text(query)
    }
}
