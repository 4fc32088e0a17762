use anyhow::Result;
use swiss_admin::PipelineConfig;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::RefreshArgs) -> Result<()> {
    let config = PipelineConfig {
        source: args.source.clone(),
        out_dir: args.out.clone(),
        build_context: args.context.clone(),
        skip_tiles: args.skip_tiles,
        ..PipelineConfig::default()
    };

    let written = swiss_admin::run(&config)?;
    for layer in &written {
        println!("{:<18} {:>6} features  {}", layer.name, layer.features, layer.path.display());
    }
    Ok(())
}
