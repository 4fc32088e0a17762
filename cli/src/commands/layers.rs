use anyhow::{Context, Result};
use swiss_admin::{fetch_topology, PipelineConfig};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::LayersArgs) -> Result<()> {
    let config = PipelineConfig { source: args.source.clone(), ..PipelineConfig::default() };
    let topology = fetch_topology(&config)?;

    if cli.verbose > 0 {
        eprintln!("[layers] {} arcs", topology.arc_count());
    }

    for name in topology.object_names() {
        let layer = topology.layer(name).with_context(|| format!("decode {name:?}"))?;
        // quoted so trailing whitespace in names stays visible
        println!("{:?}: {} features", name, layer.len());
    }
    Ok(())
}
