use crate::RunContext;
use crate::preview::PreviewTree;
use anyhow::Result;
use std::path::Path;

/// Print the group tree that `generate` would write for `root`.
///
/// # Errors
///
/// Returns an error if the root is invalid or cannot be listed.
pub fn execute(ctx: &RunContext, root: &Path) -> Result<PreviewTree> {
    let discovery = super::discover(ctx, root)?;
    let label = super::root_label(root);
    let tree = PreviewTree::project(&label, &discovery.groups, &discovery.entries);

    print!("{}", tree.render());
    crate::output::info(&format!(
        "{} files in {} groups",
        tree.file_count(),
        tree.group_count()
    ));

    Ok(tree)
}
