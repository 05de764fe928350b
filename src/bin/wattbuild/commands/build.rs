//! `wattbuild` build command

use anyhow::Result;

use crate::cli::Cli;
use wattbuild::ops::build;
use wattbuild::util::config::{default_workdir, CollectPolicy, Config, ScratchDir};
use wattbuild::BuildDependency;

pub fn execute(cli: Cli) -> Result<()> {
    let collect = cli
        .collect
        .parse::<CollectPolicy>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let scratch = if cli.temp_workdir {
        ScratchDir::Temporary
    } else if let Some(dir) = cli.workdir {
        ScratchDir::Persistent(dir)
    } else {
        ScratchDir::Persistent(default_workdir(&|name: &str| std::env::var_os(name))?)
    };

    let config = Config::new(cli.out_dir, scratch)
        .with_cargo(cli.cargo)
        .with_toolchain(cli.toolchain)
        .with_proc_macro2_rev(cli.proc_macro2_rev)
        .with_sccache(cli.sccache)
        .with_collect(collect);

    let dependencies: Vec<BuildDependency> = cli
        .build_dependencies
        .into_iter()
        .map(BuildDependency::new)
        .collect();

    let result = build(&config, &dependencies)?;

    for artifact in &result.artifacts {
        eprintln!("    Finished {}", artifact.display());
    }

    Ok(())
}
