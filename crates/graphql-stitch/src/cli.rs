use clap::CommandFactory;
use crate::commands;

/// Applies GraphQL schema-stitching transforms to operation documents.
#[derive(clap::Parser, Debug)]
#[command(name = "graphql-stitch", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<commands::CommandEnum>,

    /// Log at `DEBUG` level, regardless of `LOG_LEVEL`.
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,
}
impl Cli {
    /// Without a subcommand there is nothing to run; show usage instead.
    pub(crate) async fn run_default(self) -> anyhow::Result<()> {
        Self::command().print_long_help()?;
        Ok(())
    }
}
