// End-to-end runs of the pipeline stages on a small synthetic archive in LV95.
//
//   A | B      C        three cantons; A and B share the edge x = 2_610_000,
//  [lake]               C stands alone; the lake straddles the A/B edge.

use geo::{Area, Geometry};
use serde_json::{json, Value};

use swiss_admin::config::{CANTON_LAYER, LAKE_LAYER, MUNICIPALITY_LAYER, VOTING_DISTRICT_LAYER};
use swiss_admin::{line_length, write_layers, DerivedLayers, SourceLayers, Topology};

const X0: f64 = 2_600_000.0;
const Y0: f64 = 1_200_000.0;
const KM: f64 = 1_000.0;

fn pt(x_km: f64, y_km: f64) -> [f64; 2] { [X0 + x_km * KM, Y0 + y_km * KM] }

fn archive() -> Topology {
    let doc = json!({
        "type": "Topology",
        "arcs": [
            // 0: shared A/B edge, south to north
            [pt(10., 0.), pt(10., 10.)],
            // 1: rest of A
            [pt(10., 10.), pt(0., 10.), pt(0., 0.), pt(10., 0.)],
            // 2: rest of B
            [pt(10., 0.), pt(20., 0.), pt(20., 10.), pt(10., 10.)],
            // 3: C
            [pt(30., 0.), pt(40., 0.), pt(40., 10.), pt(30., 10.), pt(30., 0.)],
            // 4: lake, 4 km x 2 km centred on the A/B edge
            [pt(8., 2.), pt(12., 2.), pt(12., 4.), pt(8., 4.), pt(8., 2.)]
        ],
        "objects": {
            LAKE_LAYER: { "type": "GeometryCollection", "geometries": [
                { "type": "Polygon", "arcs": [[4]], "properties": { "seeId": 9 } }
            ]},
            CANTON_LAYER: { "type": "GeometryCollection", "geometries": [
                { "type": "Polygon", "arcs": [[0, 1]], "id": 100, "properties": { "kantId": 1 } },
                { "type": "Polygon", "arcs": [[2, -1]], "id": 101, "properties": { "kantId": 2 } },
                { "type": "Polygon", "arcs": [[3]], "id": 102, "properties": { "kantId": 3 } }
            ]},
            MUNICIPALITY_LAYER: { "type": "GeometryCollection", "geometries": [
                { "type": "Polygon", "arcs": [[0, 1]], "properties": { "vogeId": 261, "kantId": 1, "name": "A-Stadt" } },
                { "type": "Polygon", "arcs": [[3]], "properties": { "vogeId": 5001, "kantId": 3 } }
            ]},
            VOTING_DISTRICT_LAYER: { "type": "GeometryCollection", "geometries": [
                { "type": "Polygon", "arcs": [[2, -1]], "id": 26101, "properties": { "bezkId": 110 } }
            ]}
        }
    });
    Topology::from_slice(doc.to_string().as_bytes()).unwrap()
}

fn area(geometry: &Geometry<f64>) -> f64 { geometry.unsigned_area() }

#[test]
fn lake_straddling_shared_edge() {
    let derived = DerivedLayers::derive(SourceLayers::load(&archive()).unwrap()).unwrap();

    // One border feature: the A/B edge, cut in two by the lake.
    assert_eq!(derived.canton_borders.len(), 1);
    let border = &derived.canton_borders.features()[0];
    assert!(border.properties.is_empty());
    let Geometry::MultiLineString(parts) = &border.geometry else { panic!("expected a cut border") };
    assert_eq!(parts.0.len(), 2);
    let length: f64 = parts.0.iter().map(line_length).sum();
    assert!((length - 8.0 * KM).abs() < 1e-2, "border length {length}");

    // A and B each lose their 2 km x 2 km share of the lake; C is untouched.
    let full = 10.0 * KM * 10.0 * KM;
    let overlap = 2.0 * KM * 2.0 * KM;
    let cantons = derived.cantons.features();
    assert_eq!(cantons.len(), 3);
    for (feature, expected) in cantons.iter().zip([full - overlap, full - overlap, full]) {
        let got = area(&feature.geometry);
        assert!((got - expected).abs() < 1e-6 * full, "area {got} != {expected}");
    }
    assert_eq!(cantons[0].properties, *json!({ "id": 1 }).as_object().unwrap());
    assert_eq!(cantons[2].properties, *json!({ "id": 3 }).as_object().unwrap());
}

#[test]
fn derivation_is_repeatable() {
    let totals = || {
        let derived = DerivedLayers::derive(SourceLayers::load(&archive()).unwrap()).unwrap();
        let length: f64 = derived.canton_borders.lines().iter()
            .flat_map(|mls| mls.0.iter())
            .map(line_length)
            .sum();
        let area: f64 = derived.cantons.features().iter().map(|f| area(&f.geometry)).sum();
        (length, area)
    };
    let (l1, a1) = totals();
    let (l2, a2) = totals();
    assert_eq!(l1, l2);
    assert_eq!(a1, a2);
}

#[test]
fn missing_layer_aborts_load() {
    let doc = json!({ "type": "Topology", "arcs": [], "objects": {
        // no trailing space: not the layer the pipeline asks for
        "zaehlkreise_ZH_Wint": { "type": "GeometryCollection", "geometries": [] }
    }});
    let topology = Topology::from_slice(doc.to_string().as_bytes()).unwrap();
    let err = SourceLayers::load(&topology).unwrap_err();
    assert!(format!("{err:#}").contains("K4seen_yyymmdd11"));
}

#[test]
fn writes_four_wgs84_geojson_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tmp");

    let written = write_layers(&archive(), &out).unwrap();
    let names: Vec<&str> = written.iter().map(|w| w.name).collect();
    assert_eq!(names, vec!["canton-borders", "cantons", "municipalities", "voting-districts"]);

    let read = |file: &str| -> Value {
        serde_json::from_slice(&std::fs::read(out.join(file)).unwrap()).unwrap()
    };

    let borders = read("canton-borders.geojson");
    assert_eq!(borders["features"].as_array().unwrap().len(), 1);

    let municipalities = read("municipalities.geojson");
    let features = municipalities["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    assert_eq!(features[0]["properties"], json!({ "id": 261, "parentId": 1 }));

    let districts = read("voting-districts.geojson");
    assert_eq!(districts["features"][0]["properties"], json!({ "id": 26101, "parentId": 110 }));

    // coordinates are lon/lat around Bern
    let cantons = read("cantons.geojson");
    assert_eq!(cantons["features"].as_array().unwrap().len(), 3);
    let first = &cantons["features"][2]["geometry"]["coordinates"][0][0];
    let (lon, lat) = (first[0].as_f64().unwrap(), first[1].as_f64().unwrap());
    assert!((7.0..8.5).contains(&lon), "lon {lon}");
    assert!((46.5..47.5).contains(&lat), "lat {lat}");

    assert!(written.iter().all(|w| w.path.starts_with(&out)));
}
