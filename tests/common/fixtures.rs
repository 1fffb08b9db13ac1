use serde_json::{json, Value};

/// RAW dataset: a 2x2 grid of 100-unit plots in projected space, with a
/// GeoPandas-style `crs` member that must be ignored.
pub fn raw_plots() -> Value {
    let mut features = Vec::new();
    for row in 0..2 {
        for col in 0..2 {
            let x0 = col as f64 * 100.0;
            let y0 = row as f64 * 100.0;
            features.push(json!({
                "type": "Feature",
                "properties": { "plot_id": format!("R{row}{col}"), "area": 10000.0 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [x0, y0], [x0 + 100.0, y0], [x0 + 100.0, y0 + 100.0],
                        [x0, y0 + 100.0], [x0, y0]
                    ]]
                }
            }));
        }
    }
    json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::4326" } },
        "features": features
    })
}

pub const RAW_BOUNDS: [f64; 4] = [0.0, 0.0, 200.0, 200.0];

/// REF dataset: two point landmarks and a road in lon/lat.
pub fn ref_landmarks() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "PLOT": "north" },
                "geometry": { "type": "Point", "coordinates": [-93.20, 45.01] }
            },
            {
                "type": "Feature",
                "properties": { "PLOT": "south" },
                "geometry": { "type": "Point", "coordinates": [-93.20, 44.99] }
            },
            {
                "type": "Feature",
                "properties": { "PLOT": "road" },
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-93.22, 45.00], [-93.18, 45.00]]
                }
            }
        ]
    })
}

pub const REF_BOUNDS: [f64; 4] = [-93.22, 44.99, -93.18, 45.01];
