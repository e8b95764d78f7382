use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

/// Two-record catalog: a control-plane entry followed by a worker entry.
pub const UBUNTU_CATALOG: &str = r#"items:
- os: ubuntu-1710
  roles:
  - Master
  versions:
  - kubelet: 1.9.3
    controlPlane: 1.9.3
    containerRuntime:
      name: docker
      version: 1.12.0
  - kubelet: 1.9.4
    controlPlane: 1.9.4
    containerRuntime:
      name: docker
      version: 1.12.0
  image: projects/ubuntu-os-cloud/global/images/family/ubuntu-1710
  metadata:
    startupScript: |
      #!/bin/bash
      echo this is the master config.
- os: ubuntu-1710
  roles:
  - Node
  versions:
  - kubelet: 1.9.3
    containerRuntime:
      name: docker
      version: 1.12.0
  - kubelet: 1.9.4
    containerRuntime:
      name: docker
      version: 1.12.0
  image: projects/ubuntu-os-cloud/global/images/family/ubuntu-1710
  metadata:
    startupScript: |
      #!/bin/bash
      echo this is the node config.
"#;

pub fn write_catalog(contents: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate catalog file")?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Catalog written into a fresh directory, for tests that rewrite or remove it.
pub fn catalog_in_dir(contents: &str) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new().context("failed to allocate temp dir")?;
    let path = dir.path().join("installation.yaml");
    std::fs::write(&path, contents)?;
    Ok((dir, path))
}

pub fn lookup_binary() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_installation-lookup"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
