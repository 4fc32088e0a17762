use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::common::ensure_dir_exists;
use crate::config::{
    OutputLayer, PipelineConfig, CANTONS, CANTON_BORDERS, CANTON_LAYER, LAKE_LAYER, MUNICIPALITIES,
    MUNICIPALITY_LAYER, SOURCE_EPSG, TARGET_EPSG, VOTING_DISTRICTS, VOTING_DISTRICT_LAYER,
};
use crate::geom::{internal_borders, line_length};
use crate::io::write_geojson;
use crate::layer::{Feature, Layer};
use crate::tiles::TileJob;
use crate::topology::Topology;

/// The four layers read from the archive, in the source CRS.
#[derive(Debug, Clone)]
pub struct SourceLayers {
    pub lakes: Layer,
    pub cantons: Layer,
    pub municipalities: Layer,
    pub voting_districts: Layer,
}

impl SourceLayers {
    /// Decode the named layers; the archive carries no CRS so LV95 is assigned.
    /// Lakes come first since the other derivations depend on them.
    pub fn load(topology: &Topology) -> Result<Self> {
        let load = |name: &str| -> Result<Layer> {
            let layer = topology.layer(name)
                .with_context(|| format!("load layer {name:?}"))?
                .with_epsg(SOURCE_EPSG);
            info!(layer = name, features = layer.len(), "loaded layer");
            Ok(layer)
        };

        Ok(Self {
            lakes: load(LAKE_LAYER)?,
            cantons: load(CANTON_LAYER)?,
            municipalities: load(MUNICIPALITY_LAYER)?,
            voting_districts: load(VOTING_DISTRICT_LAYER)?,
        })
    }
}

/// Output layers, column-projected, in whatever CRS the last step left them.
#[derive(Debug, Clone)]
pub struct DerivedLayers {
    pub canton_borders: Layer,
    pub cantons: Layer,
    pub municipalities: Layer,
    pub voting_districts: Layer,
}

/// Internal canton borders as their own layer, one row per merged line,
/// with lake shorelines removed.
pub fn canton_borders(cantons: &Layer, lakes: &Layer) -> Result<Layer> {
    let lines = internal_borders(&cantons.polygons());
    let features = lines.into_iter().map(Feature::bare).collect();

    let borders = Layer::new(CANTON_BORDERS.name, features);
    let borders = match cantons.epsg() {
        Some(epsg) => borders.with_epsg(epsg),
        None => borders,
    };
    borders.difference(lakes).context("subtract lakes from canton borders")
}

impl DerivedLayers {
    /// Derive borders, subtract lakes from cantons and project columns.
    /// Coordinates stay in the source CRS.
    pub fn derive(source: SourceLayers) -> Result<Self> {
        let SourceLayers { lakes, cantons, municipalities, voting_districts } = source;

        let borders = canton_borders(&cantons, &lakes)?;
        let length: f64 = borders.lines().iter().flat_map(|parts| &parts.0).map(line_length).sum();
        info!(lines = borders.len(), length, "derived canton borders");

        let cantons = cantons.difference(&lakes).context("subtract lakes from cantons")?;

        Ok(Self {
            canton_borders: borders.select_columns(&CANTON_BORDERS),
            cantons: cantons.select_columns(&CANTONS),
            municipalities: municipalities.select_columns(&MUNICIPALITIES),
            voting_districts: voting_districts.select_columns(&VOTING_DISTRICTS),
        })
    }

    /// Re-project every layer into `epsg`.
    pub fn to_crs(&self, epsg: u32) -> Result<Self> {
        Ok(Self {
            canton_borders: self.canton_borders.to_crs(epsg)?,
            cantons: self.cantons.to_crs(epsg)?,
            municipalities: self.municipalities.to_crs(epsg)?,
            voting_districts: self.voting_districts.to_crs(epsg)?,
        })
    }

    /// Layers paired with their output definition, in write order.
    pub fn outputs(&self) -> [(&OutputLayer, &Layer); 4] {
        [
            (&CANTON_BORDERS, &self.canton_borders),
            (&CANTONS, &self.cantons),
            (&MUNICIPALITIES, &self.municipalities),
            (&VOTING_DISTRICTS, &self.voting_districts),
        ]
    }

    /// Write one GeoJSON file per layer into `out_dir`.
    pub fn write(&self, out_dir: &Path) -> Result<Vec<WrittenLayer>> {
        ensure_dir_exists(out_dir)?;
        self.outputs().into_iter()
            .map(|(output, layer)| {
                let path = out_dir.join(output.file_name());
                write_geojson(layer, &path)?;
                Ok(WrittenLayer { name: output.name, path, features: layer.len() })
            })
            .collect()
    }
}

/// One GeoJSON file produced by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenLayer {
    pub name: &'static str,
    pub path: PathBuf,
    pub features: usize,
}

/// Read the archive from a URL or a local file.
pub fn fetch_topology(config: &PipelineConfig) -> Result<Topology> {
    let bytes = if config.source_is_remote() {
        fetch_remote(&config.source)?
    } else {
        std::fs::read(&config.source).with_context(|| format!("read {}", config.source))?
    };
    info!(source = %config.source, bytes = bytes.len(), "fetched topology");
    Topology::from_slice(&bytes).with_context(|| format!("decode topology from {}", config.source))
}

#[cfg(feature = "download")]
fn fetch_remote(url: &str) -> Result<Vec<u8>> { crate::common::fetch_bytes(url) }

#[cfg(not(feature = "download"))]
fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    anyhow::bail!("cannot fetch {url}: built without the `download` feature")
}

/// Run everything up to and including the GeoJSON files.
pub fn write_layers(topology: &Topology, out_dir: &Path) -> Result<Vec<WrittenLayer>> {
    let source = SourceLayers::load(topology)?;
    let derived = DerivedLayers::derive(source)?.to_crs(TARGET_EPSG)?;
    derived.write(out_dir)
}

/// Full refresh: fetch, derive, write, then convert to tiles in a container.
pub fn run(config: &PipelineConfig) -> Result<Vec<WrittenLayer>> {
    ensure_dir_exists(&config.out_dir)?;

    let topology = fetch_topology(config)?;
    let written = write_layers(&topology, &config.out_dir)?;
    for layer in &written {
        info!(layer = layer.name, features = layer.features, path = %layer.path.display(), "output");
    }

    if config.skip_tiles {
        info!("skipping tile conversion");
        return Ok(written);
    }

    let job = TileJob::new(config.image_tag.clone(), config.build_context.clone(), &config.out_dir)?;
    let output = job.execute()?;
    println!("{output}");
    Ok(written)
}
