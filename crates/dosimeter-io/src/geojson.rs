//! GeoJSON FeatureCollection to CSV conversion.
//!
//! Each feature becomes one row: the sorted union of every feature's
//! property keys, then a [`GEOMETRY_COLUMN`] holding the geometry as WKT.
//! A feature without a geometry gets an empty cell; a geometry that cannot
//! be converted gets `Error: <reason>` and the row is still written.

use crate::csv::{CsvTable, write_csv};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;

/// Name of the WKT column appended after the property columns.
pub const GEOMETRY_COLUMN: &str = "geometry_wkt";

/// Convert a GeoJSON file to CSV. Returns the number of rows written.
///
/// An empty feature list writes no file and returns zero.
pub fn geojson_to_csv(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<usize> {
    let (input, output) = (input.as_ref(), output.as_ref());
    tracing::info!(input = %input.display(), output = %output.display(), "converting GeoJSON");

    let text = std::fs::read_to_string(input)?;
    let doc: Value = serde_json::from_str(&text)?;
    let table = geojson_to_table(&doc)?;

    if table.is_empty() {
        tracing::warn!("no features to convert");
        return Ok(0);
    }

    write_csv(output, &table)?;
    tracing::info!(rows = table.len(), path = %output.display(), "CSV written");
    Ok(table.len())
}

/// Flatten a parsed FeatureCollection into a table.
pub fn geojson_to_table(doc: &Value) -> Result<CsvTable> {
    let features = doc
        .get("features")
        .ok_or_else(|| Error::InvalidGeoJson("missing 'features'".to_string()))?
        .as_array()
        .ok_or_else(|| Error::InvalidGeoJson("'features' is not an array".to_string()))?;
    tracing::info!(count = features.len(), "features found");

    let mut keys = BTreeSet::new();
    for (i, feature) in features.iter().enumerate() {
        match feature.get("properties") {
            None | Some(Value::Null) => {}
            Some(Value::Object(props)) => keys.extend(props.keys().cloned()),
            Some(_) => tracing::warn!(feature = i, "properties is not an object, ignored"),
        }
    }
    let keys: Vec<String> = keys.into_iter().collect();
    tracing::debug!(?keys, "property columns");

    let mut rows = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let Some(feature) = feature.as_object() else {
            tracing::error!(feature = i, "feature is not an object, skipped");
            continue;
        };
        let props = feature.get("properties").and_then(Value::as_object);

        let mut row: Vec<String> = keys
            .iter()
            .map(|k| props.and_then(|p| p.get(k)).map(property_cell).unwrap_or_default())
            .collect();

        let wkt = match feature.get("geometry") {
            None | Some(Value::Null) => String::new(),
            Some(geometry) => geometry_to_wkt(geometry).unwrap_or_else(|reason| {
                tracing::warn!(feature = i, %reason, "geometry conversion failed");
                format!("Error: {reason}")
            }),
        };
        row.push(wkt);
        rows.push(row);
    }

    let mut headers = keys;
    headers.push(GEOMETRY_COLUMN.to_string());
    CsvTable::new(headers, rows)
}

fn property_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert a GeoJSON geometry object to WKT.
///
/// Supports every GeoJSON geometry type; coordinates with a third value are
/// written with a `Z` tag. All positions of one geometry must share the same
/// dimension.
pub fn geometry_to_wkt(geometry: &Value) -> std::result::Result<String, String> {
    let object = geometry
        .as_object()
        .ok_or_else(|| "geometry is not an object".to_string())?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "geometry has no 'type'".to_string())?;

    if kind == "GeometryCollection" {
        let members = object
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| "GeometryCollection has no 'geometries' array".to_string())?;
        if members.is_empty() {
            return Ok("GEOMETRYCOLLECTION EMPTY".to_string());
        }
        let parts = members
            .iter()
            .map(geometry_to_wkt)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        return Ok(format!("GEOMETRYCOLLECTION ({})", parts.join(", ")));
    }

    let coords = coordinates(object)?;
    let (tag, body) = match kind {
        "Point" => ("POINT", point_body(coords)?),
        "MultiPoint" => ("MULTIPOINT", nested(coords, point_body)?),
        "LineString" => ("LINESTRING", line_body(coords, 2)?),
        "MultiLineString" => ("MULTILINESTRING", nested(coords, |l| line_body(l, 2))?),
        "Polygon" => ("POLYGON", polygon_body(coords)?),
        "MultiPolygon" => ("MULTIPOLYGON", nested(coords, polygon_body)?),
        other => return Err(format!("unknown geometry type '{other}'")),
    };

    let has_z = body.is_some() && dimension(coords)? == Some(3);
    let z = if has_z { " Z" } else { "" };
    Ok(match body {
        Some(body) => format!("{tag}{z} {body}"),
        None => format!("{tag} EMPTY"),
    })
}

fn coordinates(object: &Map<String, Value>) -> std::result::Result<&Value, String> {
    object
        .get("coordinates")
        .ok_or_else(|| "geometry has no 'coordinates'".to_string())
}

fn as_array(value: &Value) -> std::result::Result<&Vec<Value>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("expected an array, found {value}"))
}

/// Common dimension of every position under `value`, `None` when there are
/// no positions.
fn dimension(value: &Value) -> std::result::Result<Option<usize>, String> {
    let Some(items) = value.as_array() else {
        return Ok(None);
    };
    if items.first().is_some_and(Value::is_number) {
        return Ok(Some(items.len()));
    }
    let mut found = None;
    for item in items {
        match (found, dimension(item)?) {
            (Some(a), Some(b)) if a != b => {
                return Err(format!("mixed coordinate dimensions ({a} and {b})"));
            }
            (None, d) => found = d,
            _ => {}
        }
    }
    Ok(found)
}

/// `x y` or `x y z` of one position.
fn position(value: &Value) -> std::result::Result<String, String> {
    let items = as_array(value)?;
    if !(2..=3).contains(&items.len()) {
        return Err(format!(
            "position must have 2 or 3 values, found {}",
            items.len()
        ));
    }
    let numbers = items
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|n| n.to_string())
                .ok_or_else(|| format!("coordinate {v} is not a number"))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(numbers.join(" "))
}

fn point_body(value: &Value) -> std::result::Result<Option<String>, String> {
    if as_array(value)?.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!("({})", position(value)?)))
}

fn line_body(value: &Value, min_points: usize) -> std::result::Result<Option<String>, String> {
    let points = as_array(value)?;
    if points.is_empty() {
        return Ok(None);
    }
    if points.len() < min_points {
        return Err(format!(
            "line needs at least {min_points} positions, found {}",
            points.len()
        ));
    }
    let parts = points
        .iter()
        .map(position)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Some(format!("({})", parts.join(", "))))
}

fn ring_body(value: &Value) -> std::result::Result<Option<String>, String> {
    let points = as_array(value)?;
    if let (Some(first), Some(last)) = (points.first(), points.last())
        && first != last
    {
        return Err("polygon ring is not closed".to_string());
    }
    line_body(value, 4)
}

fn polygon_body(value: &Value) -> std::result::Result<Option<String>, String> {
    nested(value, ring_body)
}

/// Parenthesised, comma-separated bodies of the members of `value`.
///
/// Empty members are only allowed when every member is empty.
fn nested<F>(value: &Value, body: F) -> std::result::Result<Option<String>, String>
where
    F: Fn(&Value) -> std::result::Result<Option<String>, String>,
{
    let members = as_array(value)?;
    if members.is_empty() {
        return Ok(None);
    }
    let mut parts = Vec::with_capacity(members.len());
    for member in members {
        match body(member)? {
            Some(part) => parts.push(part),
            None => return Err("empty member in a non-empty geometry".to_string()),
        }
    }
    Ok(Some(format!("({})", parts.join(", "))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wkt(value: Value) -> String {
        geometry_to_wkt(&value).unwrap()
    }

    #[test]
    fn simple_geometries() {
        assert_eq!(
            wkt(json!({"type": "Point", "coordinates": [1.5, 2]})),
            "POINT (1.5 2)"
        );
        assert_eq!(
            wkt(json!({"type": "LineString", "coordinates": [[0, 0], [1, 1], [2, 0]]})),
            "LINESTRING (0 0, 1 1, 2 0)"
        );
        assert_eq!(
            wkt(json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]})),
            "POLYGON ((0 0, 1 0, 1 1, 0 0))"
        );
    }

    #[test]
    fn multi_geometries() {
        assert_eq!(
            wkt(json!({"type": "MultiPoint", "coordinates": [[0, 0], [1, 2]]})),
            "MULTIPOINT ((0 0), (1 2))"
        );
        assert_eq!(
            wkt(json!({"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]], [[2, 2], [3, 3]]]})),
            "MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))"
        );
        assert_eq!(
            wkt(json!({
                "type": "MultiPolygon",
                "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]]]
            })),
            "MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)))"
        );
    }

    #[test]
    fn third_dimension_and_empty() {
        assert_eq!(
            wkt(json!({"type": "Point", "coordinates": [1, 2, 3]})),
            "POINT Z (1 2 3)"
        );
        assert_eq!(
            wkt(json!({"type": "LineString", "coordinates": []})),
            "LINESTRING EMPTY"
        );
        assert_eq!(
            wkt(json!({"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [0, 0]}
            ]})),
            "GEOMETRYCOLLECTION (POINT (0 0))"
        );
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let err = geometry_to_wkt(&json!({
            "type": "LineString",
            "coordinates": [[1, 2], [3, 4, 5]]
        }))
        .unwrap_err();
        assert!(err.contains("mixed coordinate dimensions"), "{err}");

        assert!(
            geometry_to_wkt(&json!({"type": "MultiPoint", "coordinates": [[1, 2], [3, 4, 5]]}))
                .is_err()
        );
        assert_eq!(
            wkt(json!({"type": "MultiPoint", "coordinates": [[1, 2, 0], [3, 4, 5]]})),
            "MULTIPOINT Z ((1 2 0), (3 4 5))"
        );
    }

    #[test]
    fn mixed_dimension_feature_gets_error_cell() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"id": 1},
                 "geometry": {"type": "LineString", "coordinates": [[1, 2], [3, 4, 5]]}}
            ]
        });
        let table = geojson_to_table(&doc).unwrap();
        assert!(table.rows()[0][1].starts_with("Error: mixed"));
    }

    #[test]
    fn invalid_geometries() {
        assert!(geometry_to_wkt(&json!({"type": "Circle", "coordinates": [0, 0]})).is_err());
        assert!(geometry_to_wkt(&json!({"type": "Point"})).is_err());
        assert!(geometry_to_wkt(&json!({"type": "Point", "coordinates": [1]})).is_err());
        assert!(
            geometry_to_wkt(&json!({"type": "LineString", "coordinates": [[0, 0]]})).is_err()
        );
        assert!(
            geometry_to_wkt(&json!({
                "type": "Polygon",
                "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]
            }))
            .is_err()
        );
    }

    #[test]
    fn table_has_sorted_keys_and_wkt_column() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "a", "leq_mean": 81.2},
                 "geometry": {"type": "Point", "coordinates": [1, 2]}},
                {"type": "Feature", "properties": {"elev": 10, "name": "b"},
                 "geometry": null},
                {"type": "Feature", "properties": null,
                 "geometry": {"type": "Blob", "coordinates": []}}
            ]
        });
        let table = geojson_to_table(&doc).unwrap();
        assert_eq!(table.headers(), &["elev", "leq_mean", "name", "geometry_wkt"]);
        assert_eq!(table.rows()[0], vec!["", "81.2", "a", "POINT (1 2)"]);
        assert_eq!(table.rows()[1], vec!["10", "", "b", ""]);
        assert!(table.rows()[2][3].starts_with("Error: "));
    }

    #[test]
    fn missing_features_is_an_error() {
        let err = geojson_to_table(&json!({"type": "FeatureCollection"})).unwrap_err();
        assert!(matches!(err, Error::InvalidGeoJson(_)));
    }

    #[test]
    fn empty_features_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("track.geojson");
        let output = dir.path().join("datos.csv");
        std::fs::write(&input, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();

        assert_eq!(geojson_to_csv(&input, &output).unwrap(), 0);
        assert!(!output.exists());
    }
}
