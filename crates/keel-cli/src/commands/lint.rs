//! `keel lint`: load a graph snapshot, lint it, render the report.

use tracing::{info, instrument};

use keel_adapters::{FixedXcodeController, JsonGraphLoader, LocalFilesystem, XcodeBuildController};
use keel_core::application::{LintOptions, LintReport, LintService, ports::XcodeController};
use keel_core::domain::Version;
use keel_core::error::KeelError;

use crate::{
    cli::{LintArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(graph = %args.graph.display()))]
pub async fn execute(args: LintArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if !args.graph.exists() {
        return Err(CliError::GraphNotFound { path: args.graph });
    }
    if args.graph.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is a directory, expected a graph JSON file", args.graph.display()),
            source: None,
        });
    }

    let graph = JsonGraphLoader::new()
        .load(&args.graph)
        .await
        .map_err(KeelError::from)?;

    let service = LintService::new(
        Box::new(LocalFilesystem::new()),
        xcode_controller(args.xcode_version, &config)?,
    );
    let options = LintOptions {
        manifests: args.manifests || config.lint.manifests,
    };
    let report = service.lint(&graph, options).await?;

    render(&report, &output)?;

    let fail_on_warnings = args.fail_on_warnings || config.lint.fail_on_warnings;
    verdict(&report, fail_on_warnings)
}

/// The flag beats the config file; with neither, ask `xcodebuild`.
fn xcode_controller(
    flag: Option<Version>,
    config: &AppConfig,
) -> CliResult<Box<dyn XcodeController>> {
    let pinned = match (flag, config.lint.xcode_version.as_deref()) {
        (Some(version), _) => Some(version),
        (None, Some(raw)) => Some(raw.parse::<Version>().map_err(|e| CliError::ConfigError {
            message: format!("lint.xcode_version '{raw}' is not a version"),
            source: Some(Box::new(e)),
        })?),
        (None, None) => None,
    };

    Ok(match pinned {
        Some(version) => {
            info!(%version, "Using pinned Xcode version");
            Box::new(FixedXcodeController::new(version))
        }
        None => Box::new(XcodeBuildController::new()),
    })
}

fn render(report: &LintReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(report).map_err(|e| KeelError::Internal {
            message: format!("could not serialise the report: {e}"),
        })?;
        return output.data(&json).with_cli_context(|| "writing the lint report");
    }

    if report.is_clean() {
        output.success(&format!("No linting issues found in {}", report.graph))?;
        return Ok(());
    }

    output.header("The following issues have been found:")?;
    for issue in &report.issues {
        output.issue(issue)?;
    }
    output.print(&format!(
        "{} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    ))?;
    Ok(())
}

fn verdict(report: &LintReport, fail_on_warnings: bool) -> CliResult<()> {
    let warnings = report.warning_count();
    if report.has_errors() || (fail_on_warnings && warnings > 0) {
        return Err(CliError::LintFailed {
            errors: report.error_count(),
            warnings,
        });
    }
    Ok(())
}
