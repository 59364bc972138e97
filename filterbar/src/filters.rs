//! Filter categories shown in the scrolling row.
//!
//! Turns a filter-data record into the ordered category list the renderer
//! draws. Empty lists are omitted; "Flash" is always present.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::FilterDataError;

/// Message shown when the provider fails.
pub const ERROR_NOTICE: &str = "Error :(";

/// A named tag (object, location, person, color, style) or lens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Camera {
    pub id: String,
    pub make: String,
    pub model: String,
}

impl Camera {
    pub fn new(id: impl Into<String>, make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            make: make.into(),
            model: model.into(),
        }
    }
}

/// A raw photo setting value such as an aperture or a drive mode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// The provider's record. Missing lists are treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterData {
    pub all_object_tags: Vec<Tag>,
    pub all_location_tags: Vec<Tag>,
    pub all_person_tags: Vec<Tag>,
    pub all_color_tags: Vec<Tag>,
    pub all_style_tags: Vec<Tag>,
    pub all_cameras: Vec<Camera>,
    pub all_lenses: Vec<Tag>,
    pub all_apertures: Vec<SettingValue>,
    pub all_exposures: Vec<SettingValue>,
    pub all_iso_speeds: Vec<SettingValue>,
    pub all_focal_lengths: Vec<SettingValue>,
    pub all_metering_modes: Vec<SettingValue>,
    pub all_drive_modes: Vec<SettingValue>,
    pub all_shooting_modes: Vec<SettingValue>,
}

impl FilterData {
    /// Keys a provider record is expected to carry.
    pub const FIELDS: [&'static str; 14] = [
        "allObjectTags",
        "allLocationTags",
        "allPersonTags",
        "allColorTags",
        "allStyleTags",
        "allCameras",
        "allLenses",
        "allApertures",
        "allExposures",
        "allIsoSpeeds",
        "allFocalLengths",
        "allMeteringModes",
        "allDriveModes",
        "allShootingModes",
    ];

    /// Parse a record, accepting either the bare object or a `{"data": ...}` envelope.
    ///
    /// A response carrying `errors`, a null `data`, or none of the known
    /// lists is rejected.
    pub fn from_json_str(json: &str) -> Result<Self, FilterDataError> {
        let value: Value = serde_json::from_str(json)?;

        if let Some(errors) = value.get("errors") {
            return Err(FilterDataError::Provider(errors.to_string()));
        }

        let record = match value {
            Value::Object(mut object) if object.contains_key("data") => {
                object.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };

        let has_fields = record
            .as_object()
            .is_some_and(|object| Self::FIELDS.iter().any(|key| object.contains_key(*key)));
        if !has_fields {
            return Err(FilterDataError::MissingData);
        }

        Ok(serde_json::from_value(record)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    pub id: String,
    pub name: String,
}

impl FilterItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: Vec<FilterItem>,
}

fn tag_category(name: &str, tags: &[Tag], prefix: &str) -> Category {
    Category {
        name: name.to_string(),
        items: tags
            .iter()
            .map(|tag| FilterItem::new(format!("{prefix}:{}", tag.id), tag.name.clone()))
            .collect(),
    }
}

fn setting_category(name: &str, values: &[SettingValue], prefix: &str) -> Category {
    Category {
        name: name.to_string(),
        items: values
            .iter()
            .map(|value| FilterItem::new(format!("{prefix}:{value}"), value.to_string()))
            .collect(),
    }
}

fn flash_category() -> Category {
    Category {
        name: "Flash".to_string(),
        items: vec![
            FilterItem::new("flash:on", "On"),
            FilterItem::new("flash:off", "Off"),
        ],
    }
}

/// Build the ordered category list.
pub fn build_categories(data: &FilterData) -> Vec<Category> {
    let tags = [
        ("Objects", &data.all_object_tags),
        ("Locations", &data.all_location_tags),
        ("People", &data.all_person_tags),
        ("Colors", &data.all_color_tags),
        ("Styles", &data.all_style_tags),
    ];

    let mut categories: Vec<Category> = tags
        .into_iter()
        .filter(|(_, tags)| !tags.is_empty())
        .map(|(name, tags)| tag_category(name, tags, "tag"))
        .collect();

    if !data.all_cameras.is_empty() {
        categories.push(Category {
            name: "Cameras".to_string(),
            items: data
                .all_cameras
                .iter()
                .map(|camera| {
                    FilterItem::new(
                        format!("camera:{}", camera.id),
                        format!("{} {}", camera.make, camera.model),
                    )
                })
                .collect(),
        });
    }

    if !data.all_lenses.is_empty() {
        categories.push(tag_category("Lenses", &data.all_lenses, "lens"));
    }

    let before_flash = [
        ("Aperture", &data.all_apertures, "aperture"),
        ("Exposure", &data.all_exposures, "exposure"),
        ("ISO Speed", &data.all_iso_speeds, "isoSpeed"),
        ("Focal Length", &data.all_focal_lengths, "focalLength"),
    ];
    // The search backend parses the metering prefix with this spelling.
    let after_flash = [
        ("Metering Mode", &data.all_metering_modes, "meeteringMode"),
        ("Drive Mode", &data.all_drive_modes, "driveMode"),
        ("Shooting Mode", &data.all_shooting_modes, "shootingMode"),
    ];

    categories.extend(
        before_flash
            .into_iter()
            .filter(|(_, values, _)| !values.is_empty())
            .map(|(name, values, prefix)| setting_category(name, values, prefix)),
    );
    categories.push(flash_category());
    categories.extend(
        after_flash
            .into_iter()
            .filter(|(_, values, _)| !values.is_empty())
            .map(|(name, values, prefix)| setting_category(name, values, prefix)),
    );

    categories
}

/// Provider result.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterQuery {
    Loading,
    Failed(String),
    Ready(FilterData),
}

/// What the renderer should draw for a provider result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterView {
    Spinner,
    ErrorNotice(&'static str),
    Categories(Vec<Category>),
}

impl FilterView {
    pub fn from_query(query: &FilterQuery) -> Self {
        match query {
            FilterQuery::Loading => Self::Spinner,
            FilterQuery::Failed(_) => Self::ErrorNotice(ERROR_NOTICE),
            FilterQuery::Ready(data) => Self::Categories(build_categories(data)),
        }
    }
}

/// Selected filter ids, toggled by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip an id. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
