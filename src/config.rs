use std::path::PathBuf;

/// Swiss Federal Statistical Office topology archive (generalized boundaries).
pub const BFS_URL: &str = "https://dam-api.bfs.admin.ch/hub/api/dam/assets/35130777/master";

pub const LAKE_LAYER: &str = "K4seen_yyymmdd11";
pub const CANTON_LAYER: &str = "K4kant_20220101_gf_ohne_Seen";
pub const MUNICIPALITY_LAYER: &str = "K4voge_20250604_gf";
/// The archive really names this object with a trailing space.
pub const VOTING_DISTRICT_LAYER: &str = "zaehlkreise_ZH_Wint ";

/// Swiss CH1903+ / LV95.
pub const SOURCE_EPSG: u32 = 2056;
/// WGS84 lon/lat.
pub const TARGET_EPSG: u32 = 4326;

pub const IMAGE_TAG: &str = "watson-ddj/geo:latest";
pub const CONTAINER_DATA_DIR: &str = "/data";

/// Static rename/select map for one output layer.
/// `columns` is the output column order; each entry is `(output_name, source_name)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayer {
    pub name: &'static str,
    pub columns: &'static [(&'static str, &'static str)],
}

impl OutputLayer {
    /// File name of the GeoJSON written for this layer.
    pub fn file_name(&self) -> String { format!("{}.geojson", self.name) }
}

pub const CANTON_BORDERS: OutputLayer = OutputLayer {
    name: "canton-borders",
    columns: &[],
};

pub const CANTONS: OutputLayer = OutputLayer {
    name: "cantons",
    columns: &[("id", "kantId")],
};

pub const MUNICIPALITIES: OutputLayer = OutputLayer {
    name: "municipalities",
    columns: &[("id", "vogeId"), ("parentId", "kantId")],
};

pub const VOTING_DISTRICTS: OutputLayer = OutputLayer {
    name: "voting-districts",
    columns: &[("id", "id"), ("parentId", "bezkId")],
};

/// Every knob of a pipeline run. `Default` reproduces the production constants.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// URL or local path of the topology archive.
    pub source: String,
    pub out_dir: PathBuf,
    /// Container build context (directory holding the Dockerfile).
    pub build_context: PathBuf,
    pub image_tag: String,
    pub skip_tiles: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: BFS_URL.to_string(),
            out_dir: PathBuf::from("./tmp"),
            build_context: PathBuf::from("./docker"),
            image_tag: IMAGE_TAG.to_string(),
            skip_tiles: false,
        }
    }
}

impl PipelineConfig {
    /// True if `source` should be fetched over HTTP rather than read from disk.
    pub fn source_is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_production_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.source, BFS_URL);
        assert!(config.source_is_remote());
        assert_eq!(config.out_dir, PathBuf::from("./tmp"));
        assert_eq!(config.image_tag, "watson-ddj/geo:latest");
        assert!(!config.skip_tiles);
    }

    #[test]
    fn voting_district_layer_keeps_trailing_space() {
        assert!(VOTING_DISTRICT_LAYER.ends_with(' '));
    }

    #[test]
    fn local_paths_are_not_remote() {
        let config = PipelineConfig { source: "fixtures/ch.topojson".into(), ..Default::default() };
        assert!(!config.source_is_remote());
    }

    #[test]
    fn output_file_names() {
        assert_eq!(CANTON_BORDERS.file_name(), "canton-borders.geojson");
        assert_eq!(VOTING_DISTRICTS.file_name(), "voting-districts.geojson");
    }
}
