mod transform;

use crate::Cli;
use crate::CommandOutput;
use transform::TransformCmd;

pub(crate) trait RunnableCommand: std::fmt::Debug {
    async fn run(self, cli: Cli) -> CommandOutput;
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum CommandEnum {
    /// Rewrites an operation document through a pipeline of stitch
    /// transforms, optionally reshaping a delegated JSON result back.
    Transform(Box<TransformCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandOutput {
        match self {
            Self::Transform(cmd) => cmd.run(cli).await,
        }
    }
}
