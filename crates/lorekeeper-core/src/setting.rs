//! Setting records: places in the world, nested through `parent_id`

use crate::error::Result;
use crate::fields::{self, expect_string, expect_string_list};
use crate::validate;
use crate::{RecordId, Value, ValueMap};
use serde::{Deserialize, Serialize};

/// Field names that exist on a setting but can never be written by an update
const IMMUTABLE_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Optional descriptive attributes of a setting
///
/// Shared by records, creation input and updates. In an update, `None`
/// means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDetails {
    #[serde(default)]
    pub description: Option<String>,
    /// Read-aloud text for the first approach
    #[serde(default)]
    pub first_impression: Option<String>,
    #[serde(default)]
    pub distinctive_features: Option<Vec<String>>,
    /// Mood, activity level, sensory details
    #[serde(default)]
    pub atmosphere: Option<String>,
    #[serde(default)]
    pub key_locations: Option<Vec<String>>,
    #[serde(default)]
    pub points_of_interest: Option<Vec<String>>,
    #[serde(default)]
    pub travel_routes: Option<Vec<String>>,
    #[serde(default)]
    pub factions: Option<Vec<String>>,
    #[serde(default)]
    pub power_structure: Option<String>,
    #[serde(default)]
    pub local_customs: Option<String>,
    #[serde(default)]
    pub economic_basis: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub recent_history: Option<String>,
    #[serde(default)]
    pub hidden_past: Option<String>,
    /// Connections to campaign arcs
    #[serde(default)]
    pub integration_notes: Option<String>,
    #[serde(default)]
    pub encounter_recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub dramatic_element_opportunities: Option<Vec<String>>,
    /// Enclosing setting, if any; not checked for existence
    #[serde(default)]
    pub parent_id: Option<RecordId>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Sparse change to the optional setting attributes
///
/// `None` leaves a field unchanged, `Some(None)` clears it and
/// `Some(Some(value))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingDetailsPatch {
    #[serde(default, deserialize_with = "fields::clearable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub first_impression: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub distinctive_features: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub atmosphere: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub key_locations: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub points_of_interest: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub travel_routes: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub factions: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub power_structure: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub local_customs: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub economic_basis: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub origin: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub recent_history: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub hidden_past: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub integration_notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub encounter_recommendations: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub dramatic_element_opportunities: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub parent_id: Option<Option<RecordId>>,
    #[serde(default, deserialize_with = "fields::clearable")]
    pub notes: Option<Option<String>>,
}

macro_rules! apply_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

impl SettingDetails {
    /// Apply every provided slot of `patch`, clearing where it says so
    pub fn apply(&mut self, patch: SettingDetailsPatch) {
        apply_fields!(self, patch;
            description,
            first_impression,
            distinctive_features,
            atmosphere,
            key_locations,
            points_of_interest,
            travel_routes,
            factions,
            power_structure,
            local_customs,
            economic_basis,
            origin,
            recent_history,
            hidden_past,
            integration_notes,
            encounter_recommendations,
            dramatic_element_opportunities,
            parent_id,
            notes,
        );
    }
}

impl SettingDetailsPatch {
    /// Assign a field by name; returns `false` if the name is not a detail field
    fn assign(&mut self, key: &str, value: &Value) -> Result<bool> {
        let text = |v: &Value| fields::nullable(v, |v| expect_string(key, v));
        let list = |v: &Value| fields::nullable(v, |v| expect_string_list(key, v));
        match key {
            "description" => self.description = Some(text(value)?),
            "first_impression" => self.first_impression = Some(text(value)?),
            "distinctive_features" => self.distinctive_features = Some(list(value)?),
            "atmosphere" => self.atmosphere = Some(text(value)?),
            "key_locations" => self.key_locations = Some(list(value)?),
            "points_of_interest" => self.points_of_interest = Some(list(value)?),
            "travel_routes" => self.travel_routes = Some(list(value)?),
            "factions" => self.factions = Some(list(value)?),
            "power_structure" => self.power_structure = Some(text(value)?),
            "local_customs" => self.local_customs = Some(text(value)?),
            "economic_basis" => self.economic_basis = Some(text(value)?),
            "origin" => self.origin = Some(text(value)?),
            "recent_history" => self.recent_history = Some(text(value)?),
            "hidden_past" => self.hidden_past = Some(text(value)?),
            "integration_notes" => self.integration_notes = Some(text(value)?),
            "encounter_recommendations" => self.encounter_recommendations = Some(list(value)?),
            "dramatic_element_opportunities" => {
                self.dramatic_element_opportunities = Some(list(value)?)
            }
            "parent_id" => self.parent_id = Some(text(value)?.map(RecordId::from)),
            "notes" => self.notes = Some(text(value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// A location in the campaign world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub id: RecordId,
    /// Village, Town, City, Fortress, Forest, ...
    pub setting_type: String,
    /// Unique across all settings
    pub name: String,
    pub region: String,
    pub scale: String,
    pub population: String,
    #[serde(flatten)]
    pub details: SettingDetails,
    pub created_at: String,
    pub updated_at: String,
}

impl Setting {
    pub fn parent_id(&self) -> Option<&RecordId> {
        self.details.parent_id.as_ref()
    }
}

/// Input for creating a setting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSetting {
    pub setting_type: String,
    pub name: String,
    pub region: String,
    pub scale: String,
    pub population: String,
    #[serde(flatten)]
    pub details: SettingDetails,
}

impl NewSetting {
    pub fn new(
        setting_type: impl Into<String>,
        name: impl Into<String>,
        region: impl Into<String>,
        scale: impl Into<String>,
        population: impl Into<String>,
    ) -> Self {
        Self {
            setting_type: setting_type.into(),
            name: name.into(),
            region: region.into(),
            scale: scale.into(),
            population: population.into(),
            details: SettingDetails::default(),
        }
    }

    pub fn with_details(mut self, details: SettingDetails) -> Self {
        self.details = details;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<RecordId>) -> Self {
        self.details.parent_id = Some(parent_id.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate::non_empty("setting_type", &self.setting_type)?;
        validate::name("name", &self.name)?;
        validate::non_empty("region", &self.region)?;
        validate::non_empty("scale", &self.scale)?;
        validate::non_empty("population", &self.population)
    }
}

/// Partial update of a setting; only `Some` fields change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingUpdate {
    #[serde(default)]
    pub setting_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub scale: Option<String>,
    #[serde(default)]
    pub population: Option<String>,
    #[serde(flatten)]
    pub details: SettingDetailsPatch,
}

/// A setting update parsed from an open field map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingFieldReport {
    pub update: SettingUpdate,
    /// Field names that were dropped, in input order
    pub ignored: Vec<String>,
}

impl SettingFieldReport {
    /// Human-readable notice listing the dropped fields, if any
    pub fn warning(&self) -> Option<String> {
        if self.ignored.is_empty() {
            None
        } else {
            Some(format!("Ignored unknown fields: {}", self.ignored.join(", ")))
        }
    }
}

impl SettingUpdate {
    pub fn parent(mut self, parent_id: impl Into<RecordId>) -> Self {
        self.details.parent_id = Some(Some(parent_id.into()));
        self
    }

    /// Detach from the current parent, making this a top-level setting
    pub fn detach(mut self) -> Self {
        self.details.parent_id = Some(None);
        self
    }

    /// Parse an open field map
    ///
    /// Unknown names, and the immutable `id`/timestamp fields, are collected
    /// in the report instead of failing. `null` clears an optional field and
    /// is rejected for a required one. A recognized field with a value of the
    /// wrong type is an error.
    pub fn from_fields(fields: &ValueMap) -> Result<SettingFieldReport> {
        let mut report = SettingFieldReport::default();
        for (key, value) in fields {
            if IMMUTABLE_FIELDS.contains(&key.as_str()) {
                report.ignored.push(key.clone());
                continue;
            }
            let update = &mut report.update;
            let required = |v: &Value| fields::required(key, v).and_then(|v| expect_string(key, v));
            match key.as_str() {
                "setting_type" => update.setting_type = Some(required(value)?),
                "name" => update.name = Some(required(value)?),
                "region" => update.region = Some(required(value)?),
                "scale" => update.scale = Some(required(value)?),
                "population" => update.population = Some(required(value)?),
                other => {
                    if !update.details.assign(other, value)? {
                        report.ignored.push(key.clone());
                    }
                }
            }
        }
        Ok(report)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(setting_type) = &self.setting_type {
            validate::non_empty("setting_type", setting_type)?;
        }
        if let Some(name) = &self.name {
            validate::name("name", name)?;
        }
        if let Some(region) = &self.region {
            validate::non_empty("region", region)?;
        }
        if let Some(scale) = &self.scale {
            validate::non_empty("scale", scale)?;
        }
        if let Some(population) = &self.population {
            validate::non_empty("population", population)?;
        }
        Ok(())
    }
}
