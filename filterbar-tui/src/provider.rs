//! Filter data provider.
//!
//! Reads the provider record from a JSON file, or serves a built-in sample.

use std::path::PathBuf;

use filterbar::{FilterData, FilterQuery};
use log::{info, warn};

const SAMPLE: &str = r#"{
  "data": {
    "allObjectTags": [
      {"id": "o1", "name": "Mountain"},
      {"id": "o2", "name": "Bicycle"},
      {"id": "o3", "name": "Dog"}
    ],
    "allLocationTags": [
      {"id": "l1", "name": "Lisbon"},
      {"id": "l2", "name": "Reykjavik"}
    ],
    "allPersonTags": [],
    "allColorTags": [
      {"id": "c1", "name": "Teal"},
      {"id": "c2", "name": "Amber"}
    ],
    "allStyleTags": [
      {"id": "s1", "name": "Minimal"}
    ],
    "allCameras": [
      {"id": "cam1", "make": "Fujifilm", "model": "X-T4"},
      {"id": "cam2", "make": "Sony", "model": "A7 III"}
    ],
    "allLenses": [
      {"id": "lens1", "name": "XF 23mm f/2"},
      {"id": "lens2", "name": "FE 85mm f/1.8"}
    ],
    "allApertures": [1.8, 2.8, 8],
    "allExposures": ["1/60", "1/250", "1/1000"],
    "allIsoSpeeds": [100, 400, 3200],
    "allFocalLengths": [23, 85],
    "allMeteringModes": ["Pattern", "Spot"],
    "allDriveModes": ["Single", "Continuous"],
    "allShootingModes": ["Aperture Priority", "Manual"]
  }
}"#;

/// Where filter data comes from.
#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Sample,
}

pub async fn fetch(source: Source) -> FilterQuery {
    let json = match &source {
        Source::File(path) => match tokio::fs::read_to_string(path).await {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return FilterQuery::Failed(e.to_string());
            }
        },
        Source::Sample => SAMPLE.to_string(),
    };

    match FilterData::from_json_str(&json) {
        Ok(data) => {
            info!("Loaded filter data from {source:?}");
            FilterQuery::Ready(data)
        }
        Err(e) => {
            warn!("Failed to parse filter data from {source:?}: {e}");
            FilterQuery::Failed(e.to_string())
        }
    }
}
