use crate::Cli;
use crate::CommandOutput;
use crate::RunnableCommand;
use anyhow::Context;
use libgraphql_stitch::file_reader;
use libgraphql_stitch::Document;
use libgraphql_stitch::FieldPath;
use libgraphql_stitch::FragmentRegistry;
use libgraphql_stitch::StitchPipelineConfig;
use libgraphql_stitch::StitchQuery;
use libgraphql_stitch::StitchQueryOptions;
use libgraphql_stitch::StitchSpec;
use libgraphql_stitch::Transform;
use libgraphql_stitch::TransformedOperation;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, clap::Args)]
pub(crate) struct TransformCmd {
    #[arg(
        help="Path to the GraphQL operation document to transform.",
        name="DOCUMENT",
    )]
    document_path: PathBuf,

    #[arg(
        help="JSON file listing the transforms to apply, in order \
             (`{\"transforms\": [{\"path\": [...], \"fromStitch\": {...}}]}`). \
             Transforms given with flags run after these.",
        long,
    )]
    config: Option<PathBuf>,

    #[arg(
        help="Dot-separated response path of the field to transform, e.g. \
             `customerById.address`.",
        long,
    )]
    path: Option<String>,

    #[arg(
        conflicts_with="from_stitch_selection_set",
        help="Dot-separated path below --path whose selection set replaces \
             the one at --path.",
        long,
    )]
    from_stitch_path: Option<String>,

    #[arg(
        help="Selection set literal merged into the selection set at --path.",
        long,
    )]
    from_stitch_selection_set: Option<String>,

    #[arg(
        help="Selection set literal merged in after any fromStitch rewrite.",
        long,
    )]
    to_stitch_selection_set: Option<String>,

    #[arg(
        help="Name of the operation to transform when the document holds \
             more than one.",
        long,
    )]
    operation_name: Option<String>,

    #[arg(
        help="JSON file holding a delegated result to map back into the \
             shape the untransformed document asked for.",
        long,
    )]
    result: Option<PathBuf>,
}

impl TransformCmd {
    fn flag_options(&self) -> Option<StitchQueryOptions> {
        let from_stitch = match (&self.from_stitch_path, &self.from_stitch_selection_set) {
            (Some(path), _) => StitchSpec::path(FieldPath::from_dotted(path)),
            (None, Some(literal)) => StitchSpec::selection_set(literal.as_str()),
            (None, None) => StitchSpec::Noop,
        };
        let to_stitch = match &self.to_stitch_selection_set {
            Some(literal) => StitchSpec::selection_set(literal.as_str()),
            None => StitchSpec::Noop,
        };
        if self.path.is_none() && from_stitch.is_noop() && to_stitch.is_noop() {
            return None;
        }

        let path = self.path.as_deref().map(FieldPath::from_dotted).unwrap_or_default();
        Some(
            StitchQueryOptions::new(path)
                .from_stitch(from_stitch)
                .to_stitch(to_stitch),
        )
    }

    fn build_pipeline(&self, document: &Document) -> anyhow::Result<Vec<StitchQuery>> {
        let mut config = match &self.config {
            Some(config_path) => StitchPipelineConfig::from_file(config_path)
                .with_context(|| format!("loading stitch config {config_path:?}"))?,
            None => StitchPipelineConfig::default(),
        };
        config.transforms.extend(self.flag_options());
        let operation_name = self.operation_name.clone().or(config.operation_name);

        let fragments = Arc::new(FragmentRegistry::from_document(document));
        config.transforms.into_iter()
            .enumerate()
            .map(|(idx, options)| {
                let query = StitchQuery::new(options.fragments(fragments.clone()))
                    .with_context(|| format!("building transform #{idx}"))?;
                Ok(query.with_operation_name(operation_name.clone()))
            })
            .collect()
    }

    fn transform(&self) -> anyhow::Result<String> {
        let document = Document::from_file(&self.document_path)
            .with_context(|| format!("loading document {:?}", self.document_path))?;
        let pipeline = self.build_pipeline(&document)?;
        log::debug!("Applying {} transforms.", pipeline.len());

        let mut operation = TransformedOperation::without_variables(document);
        for (idx, transform) in pipeline.iter().enumerate() {
            operation = transform.transform_request(operation)
                .with_context(|| format!("applying transform #{idx}"))?;
        }

        let Some(result_path) = &self.result else {
            return Ok(operation.document.to_string());
        };

        let content = file_reader::read_content(result_path)
            .with_context(|| format!("loading result {result_path:?}"))?;
        let delegated: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing result {result_path:?}"))?;
        let result = pipeline.iter().rev().fold(delegated, |value, transform| {
            transform.transform_result(value)
        });
        log::debug!("Mapped result through {} transforms.", pipeline.len());

        Ok(format!(
            "{}\n{}",
            operation.document,
            serde_json::to_string_pretty(&result)?,
        ))
    }
}

#[inherent::inherent]
impl RunnableCommand for TransformCmd {
    pub async fn run(self, _cli: Cli) -> CommandOutput {
        CommandOutput::from(self.transform())
    }
}

#[cfg(test)]
mod tests {
    use super::TransformCmd;
    use clap::Parser;
    use libgraphql_stitch::FieldPath;
    use libgraphql_stitch::StitchSpec;

    #[derive(Debug, clap::Parser)]
    struct TestCli {
        #[command(flatten)]
        cmd: TransformCmd,
    }

    #[test]
    fn flags_build_a_single_transform() {
        let cli = TestCli::parse_from([
            "test",
            "query.graphql",
            "--path",
            "customerById",
            "--from-stitch-path",
            "address",
        ]);
        let options = cli.cmd.flag_options().unwrap();

        assert_eq!(options.path, FieldPath::from(["customerById"]));
        assert_eq!(options.from_stitch, StitchSpec::path(["address"]));
        assert!(options.to_stitch.is_noop());
    }

    #[test]
    fn no_flags_means_no_flag_transform() {
        let cli = TestCli::parse_from(["test", "query.graphql"]);
        assert!(cli.cmd.flag_options().is_none());
    }

    #[test]
    fn from_stitch_flags_conflict() {
        let result = TestCli::try_parse_from([
            "test",
            "query.graphql",
            "--from-stitch-path",
            "address",
            "--from-stitch-selection-set",
            "{ id }",
        ]);
        assert!(result.is_err());
    }
}
