//! UPM packaging through the Unity editor

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, info, instrument};

use upm_release_core::error::PackagingError;
use upm_release_core::platform::{Packager, PackagingCredentials};

const TOOL_NAME: &str = "Unity";

/// Packs a UPM package into a signed `.tgz` with the Unity editor
pub struct UnityPackager {
    editor: PathBuf,
    credentials: PackagingCredentials,
    extra_args: Vec<String>,
}

impl UnityPackager {
    /// Create a packager for an editor executable
    pub fn new(editor: impl Into<PathBuf>, credentials: PackagingCredentials) -> Self {
        Self {
            editor: editor.into(),
            credentials,
            extra_args: Vec::new(),
        }
    }

    /// Append extra editor arguments
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// Editor executable in use
    pub fn editor(&self) -> &Path {
        &self.editor
    }

    /// Batch-mode argument list for packing `package_dir` into `output_dir`
    pub fn command_args(&self, package_dir: &Path, output_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "-batchmode".to_string(),
            "-username".to_string(),
            self.credentials.username.clone(),
            "-password".to_string(),
            self.credentials.password.clone(),
            "-cloudOrganization".to_string(),
            self.credentials.organization_id.clone(),
            "-upmPack".to_string(),
            package_dir.display().to_string(),
            output_dir.display().to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Argument list with the password masked, for logs
    fn redacted_args(&self, args: &[String]) -> Vec<String> {
        args.iter()
            .map(|arg| {
                if !self.credentials.password.is_empty() && *arg == self.credentials.password {
                    "***".to_string()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }

    async fn run_editor(&self, args: &[String]) -> Result<String, PackagingError> {
        debug!("Running {} with args: {:?}", TOOL_NAME, self.redacted_args(args));

        let output = Command::new(&self.editor)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| PackagingError::ToolFailed {
                tool: TOOL_NAME.to_string(),
                reason: format!("failed to start {}: {e}", self.editor.display()),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let reason = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(PackagingError::ToolFailed {
                tool: TOOL_NAME.to_string(),
                reason: format!("{} ({})", reason.trim(), output.status),
            });
        }

        Ok(stdout)
    }
}

/// The single `.tgz` archive in `dir`
pub fn find_archive(dir: &Path) -> Result<PathBuf, PackagingError> {
    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join("*.tgz");
    let mut archives: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .map_err(|e| PackagingError::ToolFailed {
            tool: TOOL_NAME.to_string(),
            reason: format!("invalid output directory pattern: {e}"),
        })?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();

    match archives.len() {
        0 => Err(PackagingError::NoArtifact(dir.to_path_buf())),
        1 => Ok(archives.remove(0)),
        count => Err(PackagingError::MultipleArtifacts {
            dir: dir.to_path_buf(),
            count,
        }),
    }
}

#[async_trait::async_trait]
impl Packager for UnityPackager {
    #[instrument(skip(self), fields(editor = %self.editor.display()))]
    async fn pack(&self, package_dir: &Path, output_dir: &Path) -> Result<PathBuf, PackagingError> {
        let start = Instant::now();
        let args = self.command_args(package_dir, output_dir);
        self.run_editor(&args).await?;

        let archive = find_archive(output_dir)?;
        info!(
            archive = %archive.display(),
            duration_ms = start.elapsed().as_millis(),
            "Signed package created"
        );
        Ok(archive)
    }
}
