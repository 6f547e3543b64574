use anyhow::{Context, Result};
use geo_types::{Geometry, MultiPolygon};
use geojson::{FeatureCollection, GeoJson, JsonObject};
use serde_json::Value;
use std::{fs, path::Path};
use tracing::debug;

/// One country from the world atlas.
#[derive(Debug, Clone)]
pub struct Country {
    pub name: String,
    pub continent: String,
    pub geometry: MultiPolygon<f64>,
}

/// Load the Natural Earth admin-0 GeoJSON into a country table.
///
/// Dataset revisions disagree on property key case (`name` vs `NAME`), so
/// both spellings are accepted. Features without a usable name, continent,
/// or areal geometry are skipped.
pub fn load_world_atlas(path: &Path) -> Result<Vec<Country>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading world atlas {:?}", path))?;
    let geojson: GeoJson = raw
        .parse()
        .with_context(|| format!("parsing world atlas {:?}", path))?;
    let collection = FeatureCollection::try_from(geojson)
        .with_context(|| format!("world atlas {:?} is not a FeatureCollection", path))?;

    let mut countries = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let props = feature.properties.as_ref();
        let (Some(name), Some(continent)) = (
            property(props, ["name", "NAME"]),
            property(props, ["continent", "CONTINENT"]),
        ) else {
            debug!("skipping feature without name/continent properties");
            continue;
        };
        let name = name.to_string();
        let continent = continent.to_string();

        let Some(geometry) = feature.geometry else {
            debug!(country = %name, "skipping feature without geometry");
            continue;
        };
        let geometry = match Geometry::<f64>::try_from(geometry) {
            Ok(Geometry::Polygon(poly)) => MultiPolygon(vec![poly]),
            Ok(Geometry::MultiPolygon(mp)) => mp,
            Ok(_) | Err(_) => {
                debug!(country = %name, "skipping feature with non-areal geometry");
                continue;
            }
        };

        countries.push(Country {
            name,
            continent,
            geometry,
        });
    }

    Ok(countries)
}

fn property<'a>(props: Option<&'a JsonObject>, keys: [&str; 2]) -> Option<&'a str> {
    let map = props?;
    keys.iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
}
