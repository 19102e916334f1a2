#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Minimal item manifest declaring one source.
pub const PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project DefaultTargets="Build" ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup Label="Globals">
    <ProjectName>Demo</ProjectName>
  </PropertyGroup>
  <ItemGroup>
    <ClCompile Include="src\a.cpp" />
  </ItemGroup>
  <Import Project="$(VCTargetsPath)\Microsoft.Cpp.targets" />
</Project>
"#;

/// Source tree fixture: `Demo/{src/a.cpp, src/util/b.h, main.cpp, README.md}`
/// plus `Demo/Demo.vcxproj`.
pub struct TestProject {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub config_path: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("Demo");
        let config_path = temp_dir.path().join(".config/vsfilters/config");

        let project = Self {
            temp_dir,
            root,
            config_path,
        };
        for rel in ["src/a.cpp", "src/util/b.h", "main.cpp", "README.md"] {
            project.write(rel, "// content\n")?;
        }
        project.write("Demo.vcxproj", PROJECT)?;
        Ok(project)
    }

    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn project_file(&self) -> PathBuf {
        self.root.join("Demo.vcxproj")
    }

    pub fn filters_file(&self) -> PathBuf {
        self.root.join("Demo.vcxproj.filters")
    }

    pub fn backup_file(&self) -> PathBuf {
        self.root.join("Demo_backup.vcxproj")
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }

    /// `vsf` with an isolated config file and logging silenced.
    pub fn cmd(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("vsf")?;
        cmd.env("VSF_CONFIG_PATH", &self.config_path)
            .env("VSF_LOG", "off")
            .env("HOME", self.temp_dir.path())
            .env("NO_COLOR", "1");
        Ok(cmd)
    }
}
