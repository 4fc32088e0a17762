use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::config::{CANTONS, CANTON_BORDERS, CONTAINER_DATA_DIR, MUNICIPALITIES, VOTING_DISTRICTS};

/// Container job converting the written GeoJSON into MBTiles (tippecanoe)
/// and then VersaTiles (versatiles convert).
#[derive(Debug, Clone)]
pub struct TileJob {
    image_tag: String,
    build_context: PathBuf,
    data_dir: PathBuf,
}

impl TileJob {
    /// `data_dir` is made absolute, as bind mounts require.
    pub fn new(image_tag: impl Into<String>, build_context: impl Into<PathBuf>, data_dir: &Path) -> Result<Self> {
        let data_dir = std::path::absolute(data_dir)
            .with_context(|| format!("resolve {}", data_dir.display()))?;
        Ok(Self { image_tag: image_tag.into(), build_context: build_context.into(), data_dir })
    }

    /// The shell chain run inside the container; `&&` aborts at the first failing tool.
    pub fn command_chain(&self) -> String {
        let data = |file: String| format!("{CONTAINER_DATA_DIR}/{file}");
        let mbtiles = |name: &str| data(format!("{name}.mbtiles"));
        let versatiles = |name: &str| data(format!("{name}.versatiles"));

        let extra_layer = |name: &str| format!(
            r#"-L'{{"layer":"{name}", "file":"{}"}}'"#,
            data(format!("{name}.geojson")),
        );

        let steps = [
            format!("tippecanoe -o {} {} --force",
                mbtiles(CANTONS.name), data(CANTONS.file_name())),
            format!("tippecanoe -o {} {} --force",
                mbtiles(VOTING_DISTRICTS.name), extra_layer(VOTING_DISTRICTS.name)),
            format!("tippecanoe -o {} {} {} --force",
                mbtiles(MUNICIPALITIES.name), data(MUNICIPALITIES.file_name()), extra_layer(CANTON_BORDERS.name)),
            format!("versatiles convert {} {}", mbtiles(CANTONS.name), versatiles(CANTONS.name)),
            format!("versatiles convert {} {}", mbtiles(MUNICIPALITIES.name), versatiles(MUNICIPALITIES.name)),
            format!("versatiles convert {} {}", mbtiles(VOTING_DISTRICTS.name), versatiles(VOTING_DISTRICTS.name)),
        ];
        steps.join(" && ")
    }

    pub fn build_args(&self) -> Vec<String> {
        vec![
            "build".into(),
            "--rm".into(),
            "-t".into(),
            self.image_tag.clone(),
            self.build_context.display().to_string(),
        ]
    }

    pub fn run_args(&self) -> Vec<String> {
        vec![
            "run".into(),
            "--rm".into(),
            "-t".into(),
            "-v".into(),
            format!("{}:{CONTAINER_DATA_DIR}:rw", self.data_dir.display()),
            self.image_tag.clone(),
            "bash".into(),
            "-c".into(),
            self.command_chain(),
        ]
    }

    /// Build the image, then run the chain. Blocks until both finish and
    /// returns the captured output of the run.
    pub fn execute(&self) -> Result<String> {
        info!(tag = %self.image_tag, context = %self.build_context.display(), "building container image");
        docker(&self.build_args()).context("container image build")?;

        info!(tag = %self.image_tag, data = %self.data_dir.display(), "running tile conversion");
        docker(&self.run_args()).context("tile conversion container run")
    }
}

/// Run `docker` with `args`; stdout and stderr are returned together.
fn docker(args: &[String]) -> Result<String> {
    let Output { status, stdout, stderr } = Command::new("docker")
        .args(args)
        .output()
        .context("failed to start docker")?;

    let mut text = String::from_utf8_lossy(&stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&stderr));

    if !status.success() {
        bail!("docker {} exited with {status}:\n{text}", args.first().map(String::as_str).unwrap_or(""));
    }
    Ok(text)
}
