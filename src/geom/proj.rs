use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, Geometry, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use tracing::debug;

use crate::layer::{Feature, Layer};

/// PROJ.4 definition for the EPSG codes this pipeline handles.
fn epsg_proj4(epsg: u32) -> Result<&'static str> {
    Ok(match epsg {
        // CH1903+ / LV95
        2056 => "+proj=somerc +lat_0=46.9524055555556 +lon_0=7.43958333333333 +k_0=1 \
                 +x_0=2600000 +y_0=1200000 +ellps=bessel \
                 +towgs84=674.374,15.056,405.346,0,0,0,0 +units=m +no_defs +type=crs",
        4326 => "+proj=longlat +datum=WGS84 +no_defs +type=crs",
        other => bail!("no projection definition for EPSG:{other}"),
    })
}

#[inline]
fn is_geographic(epsg: u32) -> bool { epsg == 4326 }

/// Coordinate transform between two EPSG codes.
/// Geographic coordinates are degrees on both sides; radians are handled internally.
pub struct Reprojector {
    from: Proj4,
    to: Proj4,
    from_degrees: bool,
    to_degrees: bool,
}

impl Reprojector {
    pub fn new(from_epsg: u32, to_epsg: u32) -> Result<Self> {
        let build = |epsg: u32| -> Result<Proj4> {
            let proj_string = epsg_proj4(epsg)?;
            Proj4::from_proj_string(proj_string)
                .map_err(|e| anyhow!("{e:?}"))
                .with_context(|| format!("failed to build PROJ.4 for EPSG:{epsg}: {proj_string}"))
        };

        Ok(Self {
            from: build(from_epsg)?,
            to: build(to_epsg)?,
            from_degrees: is_geographic(from_epsg),
            to_degrees: is_geographic(to_epsg),
        })
    }

    /// Transform a single coordinate.
    pub fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = if self.from_degrees {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };

        transform(&self.from, &self.to, &mut point)
            .map_err(|e| anyhow!("CRS transform failed at ({}, {}): {e:?}", coord.x, coord.y))?;

        Ok(if self.to_degrees {
            Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
        } else {
            Coord { x: point.0, y: point.1 }
        })
    }

    /// Transform every coordinate of a geometry.
    pub fn project_geometry(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>> {
        geometry.try_map_coords(|coord| self.project(coord))
    }
}

impl Layer {
    /// Re-project every row into `to_epsg`. The layer must declare its source CRS.
    pub fn to_crs(&self, to_epsg: u32) -> Result<Layer> {
        let Some(from_epsg) = self.epsg() else {
            bail!("[to_crs] layer {} has no CRS; set one before re-projecting", self.name());
        };
        if from_epsg == to_epsg { return Ok(self.clone()) }

        let reprojector = Reprojector::new(from_epsg, to_epsg)?;
        let features = self.features().iter()
            .map(|feature| Ok(Feature {
                geometry: reprojector.project_geometry(&feature.geometry)
                    .with_context(|| format!("re-project {} to EPSG:{to_epsg}", self.name()))?,
                properties: feature.properties.clone(),
            }))
            .collect::<Result<Vec<_>>>()?;

        debug!(layer = self.name(), from = from_epsg, to = to_epsg, rows = features.len(), "re-projected");
        Ok(self.with_features(features).with_epsg(to_epsg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::point;

    #[test]
    fn lv95_origin_lands_in_bern() {
        let to_wgs84 = Reprojector::new(2056, 4326).unwrap();
        let bern = to_wgs84.project(Coord { x: 2_600_000.0, y: 1_200_000.0 }).unwrap();
        assert!((bern.x - 7.4386).abs() < 0.002, "lon {}", bern.x);
        assert!((bern.y - 46.9511).abs() < 0.002, "lat {}", bern.y);
    }

    #[test]
    fn round_trip_error_is_below_one_metre() {
        let forward = Reprojector::new(2056, 4326).unwrap();
        let inverse = Reprojector::new(4326, 2056).unwrap();

        // Geneva, Zurich, Lugano, Chur
        for (x, y) in [(2_500_000.0, 1_118_000.0), (2_683_000.0, 1_248_000.0), (2_717_000.0, 1_096_000.0), (2_759_000.0, 1_190_000.0)] {
            let lonlat = forward.project(Coord { x, y }).unwrap();
            let back = inverse.project(lonlat).unwrap();
            let err = (back.x - x).hypot(back.y - y);
            assert!(err < 1.0, "round trip error {err} m at ({x}, {y})");
        }
    }

    #[test]
    fn layer_without_crs_is_rejected() {
        let layer = Layer::new("nocrs", vec![Feature::bare(point!(x: 2_600_000.0, y: 1_200_000.0))]);
        assert!(layer.to_crs(4326).is_err());
    }

    #[test]
    fn layer_records_target_crs() {
        let layer = Layer::new("pts", vec![Feature::bare(point!(x: 2_600_000.0, y: 1_200_000.0))]).with_epsg(2056);
        let out = layer.to_crs(4326).unwrap();
        assert_eq!(out.epsg(), Some(4326));
        let Geometry::Point(p) = &out.features()[0].geometry else { panic!("expected point") };
        assert!(p.x() > 7.0 && p.x() < 8.0 && p.y() > 46.0 && p.y() < 47.5);
    }

    #[test]
    fn unknown_epsg_is_an_error() {
        assert!(Reprojector::new(2056, 3857).is_err());
    }
}
