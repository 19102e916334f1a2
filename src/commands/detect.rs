use crate::RunContext;
use crate::project::{DetectedProject, detect_project};
use anyhow::Result;
use std::path::Path;

/// Print the manifest base name found in `root`, and the declared
/// `<ProjectName>` when it differs.
///
/// # Errors
///
/// Returns an error if `root` holds no `.vcxproj` file.
pub fn execute(_ctx: &RunContext, root: &Path) -> Result<DetectedProject> {
    crate::scanner::tree::validate_root(root)?;
    let detected = detect_project(root)?;

    println!("{}", detected.base_name);
    if detected.display_name != detected.base_name {
        crate::output::info(&format!("Declared project name: {}", detected.display_name));
    }
    Ok(detected)
}
