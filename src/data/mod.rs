use std::fs;
use std::path::Path;

use geojson::{GeoJson, Geometry, Value};

use crate::error::{GlobeError, Result};
use crate::geo::GeoPoint;
use crate::map::LineString;

/// Destinations shown when no destination file is given.
pub fn builtin_destinations() -> Vec<GeoPoint> {
    [
        (48.86, 2.35, "Paris"),
        (51.51, -0.13, "London"),
        (41.90, 12.50, "Rome"),
        (40.42, -3.70, "Madrid"),
        (37.98, 23.73, "Athens"),
        (41.01, 28.98, "Istanbul"),
        (30.04, 31.24, "Cairo"),
        (-1.29, 36.82, "Nairobi"),
        (-33.92, 18.42, "Cape Town"),
        (25.20, 55.27, "Dubai"),
        (28.61, 77.21, "New Delhi"),
        (13.76, 100.50, "Bangkok"),
        (1.35, 103.82, "Singapore"),
        (39.90, 116.41, "Beijing"),
        (35.68, 139.69, "Tokyo"),
        (-33.87, 151.21, "Sydney"),
        (-36.85, 174.76, "Auckland"),
        (21.31, -157.86, "Honolulu"),
        (49.28, -123.12, "Vancouver"),
        (40.71, -74.01, "New York"),
        (19.43, -99.13, "Mexico City"),
        (-12.05, -77.04, "Lima"),
        (-22.91, -43.17, "Rio de Janeiro"),
        (64.15, -21.94, "Reykjavik"),
    ]
    .into_iter()
    .map(|(lat, lon, name)| GeoPoint::known(lat, lon, name))
    .collect()
}

/// Load destinations from a GeoJSON file of Point features.
/// Features without a usable point or with out-of-range coordinates are
/// skipped with a warning.
pub fn load_destinations(path: &Path) -> Result<Vec<GeoPoint>> {
    let geojson = read_geojson(path)?;
    let mut points = Vec::new();

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            log::warn!("{}: bare geometry has no names, expected features", path.display());
            Vec::new()
        }
    };

    for (idx, feature) in features.into_iter().enumerate() {
        let props = feature.properties.as_ref();
        let label = props
            .and_then(|p| p.get("name").or_else(|| p.get("label")))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Destination {}", idx + 1));

        let coords = match feature.geometry.map(|g| g.value) {
            Some(Value::Point(coords)) if coords.len() >= 2 => coords,
            _ => {
                log::warn!("{}: feature {:?} is not a point, skipping", path.display(), label);
                continue;
            }
        };

        // GeoJSON positions are [lon, lat]
        match GeoPoint::new(coords[1], coords[0], label) {
            Ok(point) => points.push(point),
            Err(e) => log::warn!("{}: {}, skipping", path.display(), e),
        }
    }

    log::info!("Loaded {} destinations from {}", points.len(), path.display());
    Ok(points)
}

/// Load outline lines (coastlines, borders) from GeoJSON. Polygons
/// contribute their exterior ring.
pub fn load_outlines(path: &Path) -> Result<Vec<LineString>> {
    let geojson = read_geojson(path)?;
    let mut lines = Vec::new();
    collect_lines(&geojson, &mut |line| lines.push(line));
    log::info!("Loaded {} outline lines from {}", lines.len(), path.display());
    Ok(lines)
}

fn read_geojson(path: &Path) -> Result<GeoJson> {
    let content = fs::read_to_string(path).map_err(|source| GlobeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.parse::<GeoJson>()?)
}

fn collect_lines<F>(geojson: &GeoJson, add_line: &mut F)
where
    F: FnMut(LineString),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                collect_geometry_lines(geometry, add_line);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_geometry_lines(geometry, add_line);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry_lines(geometry, add_line),
    }
}

fn collect_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    let to_line = |coords: &Vec<Vec<f64>>| -> LineString {
        coords.iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])).collect()
    };

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => lines.iter().for_each(|l| add_line(to_line(l))),
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for exterior in polygons.iter().filter_map(|rings| rings.first()) {
                add_line(to_line(exterior));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// Coarse continent blobs for the outline overlay when no outline file is
/// loaded. Closed rings of (lon, lat).
pub fn builtin_outlines() -> Vec<LineString> {
    let blobs: [&[(f64, f64)]; 7] = [
        // North America
        &[
            (-165.0, 62.0), (-150.0, 59.0), (-135.0, 57.0), (-124.0, 46.0),
            (-118.0, 33.0), (-106.0, 22.0), (-95.0, 17.0), (-83.0, 9.0),
            (-79.0, 9.0), (-90.0, 20.0), (-97.0, 27.0), (-84.0, 29.0),
            (-80.0, 26.0), (-76.0, 36.0), (-70.0, 42.0), (-60.0, 46.0),
            (-56.0, 52.0), (-64.0, 59.0), (-78.0, 62.0), (-94.0, 60.0),
            (-95.0, 70.0), (-125.0, 70.0), (-156.0, 71.0), (-165.0, 62.0),
        ],
        // South America
        &[
            (-78.0, 8.0), (-62.0, 10.0), (-51.0, 4.0), (-35.0, -6.0),
            (-39.0, -14.0), (-42.0, -23.0), (-53.0, -34.0), (-63.0, -41.0),
            (-67.0, -55.0), (-74.0, -50.0), (-73.0, -37.0), (-71.0, -18.0),
            (-81.0, -5.0), (-78.0, 8.0),
        ],
        // Europe
        &[
            (-9.0, 37.0), (-9.0, 43.0), (-2.0, 44.0), (-4.0, 48.0),
            (2.0, 51.0), (8.0, 54.0), (11.0, 59.0), (5.0, 61.0),
            (15.0, 69.0), (28.0, 71.0), (40.0, 66.0), (40.0, 48.0),
            (29.0, 41.0), (23.0, 36.0), (16.0, 40.0), (12.0, 44.0),
            (3.0, 43.0), (-5.0, 36.0), (-9.0, 37.0),
        ],
        // Africa
        &[
            (-17.0, 21.0), (-10.0, 32.0), (10.0, 37.0), (20.0, 31.0),
            (32.0, 31.0), (43.0, 12.0), (51.0, 11.0), (40.0, -3.0),
            (40.0, -15.0), (33.0, -26.0), (20.0, -35.0), (12.0, -18.0),
            (9.0, -1.0), (9.0, 4.0), (-8.0, 4.0), (-17.0, 14.0),
            (-17.0, 21.0),
        ],
        // Asia
        &[
            (40.0, 48.0), (50.0, 45.0), (57.0, 25.0), (67.0, 24.0),
            (73.0, 21.0), (78.0, 8.0), (88.0, 21.0), (98.0, 16.0),
            (103.0, 1.0), (109.0, 12.0), (108.0, 21.0), (121.0, 31.0),
            (122.0, 40.0), (129.0, 42.0), (141.0, 53.0), (160.0, 61.0),
            (180.0, 66.0), (140.0, 73.0), (100.0, 77.0), (70.0, 73.0),
            (40.0, 66.0), (40.0, 48.0),
        ],
        // Australia
        &[
            (114.0, -22.0), (122.0, -17.0), (131.0, -12.0), (137.0, -12.0),
            (142.0, -11.0), (146.0, -19.0), (153.0, -28.0), (150.0, -37.0),
            (141.0, -38.0), (132.0, -32.0), (115.0, -34.0), (114.0, -22.0),
        ],
        // Antarctica coast, roughly a parallel
        &[
            (-180.0, -70.0), (-120.0, -73.0), (-60.0, -64.0), (0.0, -70.0),
            (60.0, -67.0), (120.0, -66.0), (180.0, -70.0),
        ],
    ];

    blobs.iter().map(|blob| blob.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("globe-tour-{}-{}", std::process::id(), name));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_builtin_destinations_valid() {
        let points = builtin_destinations();
        assert!(points.len() >= 20);
        for p in &points {
            assert!(GeoPoint::new(p.latitude, p.longitude, p.label.clone()).is_ok());
        }
    }

    #[test]
    fn test_load_destinations() {
        let path = write_temp(
            "dest.json",
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"name":"Lisbon"},
                 "geometry":{"type":"Point","coordinates":[-9.14,38.72]}},
                {"type":"Feature","properties":{"label":"Oslo"},
                 "geometry":{"type":"Point","coordinates":[10.75,59.91]}},
                {"type":"Feature","properties":{"name":"Bad"},
                 "geometry":{"type":"Point","coordinates":[10.0,95.0]}},
                {"type":"Feature","properties":{"name":"Road"},
                 "geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}}
            ]}"#,
        );

        let points = load_destinations(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "Lisbon");
        assert!((points[0].latitude - 38.72).abs() < 1e-9);
        assert!((points[0].longitude + 9.14).abs() < 1e-9);
        assert_eq!(points[1].label, "Oslo");
    }

    #[test]
    fn test_load_outlines() {
        let path = write_temp(
            "outline.json",
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,0]]]}},
                {"type":"Feature","properties":{},
                 "geometry":{"type":"MultiLineString","coordinates":[[[0,0],[1,1]],[[2,2],[3,3]]]}}
            ]}"#,
        );

        let lines = load_outlines(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 4);
        assert_eq!(lines[2], vec![(2.0, 2.0), (3.0, 3.0)]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_destinations(Path::new("/nonexistent/globe-tour.json")).unwrap_err();
        assert!(matches!(err, GlobeError::Io { .. }));
    }

    #[test]
    fn test_malformed_geojson() {
        let path = write_temp("bad.json", "{ not json");
        let err = load_outlines(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, GlobeError::GeoJson(_)));
    }

    #[test]
    fn test_builtin_outlines_in_range() {
        for line in builtin_outlines() {
            assert!(line.len() >= 2);
            assert!(line.iter().all(|&(lon, lat)| lon.abs() <= 180.0 && lat.abs() <= 90.0));
        }
    }
}
