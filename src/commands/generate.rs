use crate::RunContext;
use crate::approval::Approver;
use crate::diagnostics::FailureReport;
use crate::diff::{DiffStyle, write_unified_diff};
use crate::filters::{FiltersSummary, filters_path, write_filters_file};
use crate::output;
use crate::preview::PreviewTree;
use crate::error::FilterError;
use crate::project::{
    MergeOutcome, backup_path, plan_merge, project_path, update_project_file,
};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Question put to the approver after the preview.
pub const APPROVAL_QUESTION: &str = "Generate filters and update the project file?";

/// Options for a `generate` run
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Directory to scan; also where both manifests live
    pub root: PathBuf,
    /// Explicit project name, skipping detection
    pub project: Option<String>,
    /// Show what would change and touch nothing
    pub dry_run: bool,
}

/// What a completed `generate` run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Both manifests were written.
    Applied {
        /// Filter manifest summary
        filters: FiltersSummary,
        /// Item manifest merge result
        merge: MergeOutcome,
    },
    /// The operator declined; nothing was written.
    Cancelled,
    /// `--dry-run`; nothing was written.
    DryRun {
        /// Declarations the merge would add
        additions: usize,
    },
}

/// How far a run got, for failure reports.
#[derive(Debug, Default)]
struct Progress {
    operation: &'static str,
    project_name: Option<String>,
    files: usize,
    groups: usize,
}

/// Scan, preview, approve, then write the filter manifest and merge the
/// item manifest.
///
/// Any failure is reported with a [`FailureReport`] before being returned.
///
/// # Errors
///
/// Returns an error if the root is invalid, no project name can be resolved,
/// the item manifest cannot be read, or either write fails.
pub fn execute(
    ctx: &RunContext,
    opts: &GenerateOptions,
    approver: &mut dyn Approver,
) -> Result<GenerateOutcome> {
    let mut progress = Progress::default();

    match run(ctx, opts, approver, &mut progress) {
        Ok(outcome) => Ok(outcome),
        Err(err) => {
            FailureReport::capture(
                progress.operation,
                &opts.root,
                progress.project_name.as_deref(),
                &err,
            )
            .with_counts(progress.files, progress.groups)
            .emit(ctx.config.diagnostics.error_log.as_deref());
            Err(err)
        }
    }
}

fn run(
    ctx: &RunContext,
    opts: &GenerateOptions,
    approver: &mut dyn Approver,
    progress: &mut Progress,
) -> Result<GenerateOutcome> {
    let root = opts.root.as_path();

    progress.operation = "validate root";
    crate::scanner::tree::validate_root(root)?;

    progress.operation = "resolve project name";
    let name = super::resolve_project_name(root, opts.project.as_deref())?;
    progress.project_name = Some(name.clone());

    progress.operation = "scan";
    let discovery = super::discover(ctx, root)?;
    progress.files = discovery.entries.len();
    progress.groups = discovery.groups.len();

    progress.operation = "read item manifest";
    let project_file = project_path(root, &name);
    let pending = plan_merge(&project_file, &discovery.entries)
        .with_context(|| format!("Failed to read project file {}", project_file.display()))?;

    progress.operation = "check backup";
    let backup = backup_path(&project_file);
    if backup.exists() {
        let err = FilterError::BackupExists {
            path: project_file.clone(),
            backup,
        };
        if !opts.dry_run {
            return Err(err.into());
        }
        output::warning(&err.to_string());
    }

    if ctx.config.output.preview || opts.dry_run {
        let label = super::root_label(root);
        let tree = PreviewTree::project(&label, &discovery.groups, &discovery.entries);
        print!("{}", tree.render());
    }
    output::info(&format!(
        "{} files in {} groups; {} new declarations for {}",
        discovery.entries.len(),
        discovery.groups.len(),
        pending.plan.len(),
        display_name(&project_file)
    ));

    if opts.dry_run {
        output::info(&format!(
            "Would write {}",
            display_name(&filters_path(root, &name))
        ));
        let style = DiffStyle {
            context_lines: ctx.config.output.diff_context,
            colorize: ctx.config.output.color,
        };
        let mut stdout = std::io::stdout().lock();
        write_unified_diff(
            &pending.before,
            &pending.after,
            Path::new(display_name(&project_file)),
            style,
            &mut stdout,
        )?;
        return Ok(GenerateOutcome::DryRun {
            additions: pending.plan.len(),
        });
    }

    progress.operation = "approval";
    if !approver.approve(APPROVAL_QUESTION)? {
        output::info("Filter generation cancelled.");
        return Ok(GenerateOutcome::Cancelled);
    }

    progress.operation = "write filter manifest";
    let filters_file = filters_path(root, &name);
    let filters = write_filters_file(&filters_file, &discovery.groups, &discovery.entries)
        .with_context(|| format!("Failed to write {}", filters_file.display()))?;
    output::action(
        "Wrote",
        &format!(
            "{} ({} groups, {} files)",
            display_name(&filters.path),
            filters.groups,
            filters.files
        ),
    );

    progress.operation = "merge item manifest";
    let merge = update_project_file(&project_file, &discovery.entries)
        .with_context(|| format!("Failed to update {}", project_file.display()))?;
    if merge.is_noop() {
        output::action("Unchanged", display_name(&merge.path));
    } else {
        output::action(
            "Updated",
            &format!("{} (+{} declarations)", display_name(&merge.path), merge.added),
        );
    }

    super::print_success(&format!(
        "Filters generated and project file updated: {} groups, {} files, {} added",
        filters.groups.to_string().bold(),
        filters.files.to_string().bold(),
        merge.added.to_string().bold()
    ));

    Ok(GenerateOutcome::Applied { filters, merge })
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
}
