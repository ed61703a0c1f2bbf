//! Backend that shells out to an operator-configured command.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use seidra_core::error::DomainError;
use serde_json::json;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{GenerationBackend, artifact_path, ensure_base_dir, file_uri};
use crate::config::MediaConfig;
use crate::models::{MediaAsset, SceneSpec};
use crate::template::CommandTemplate;
use crate::validation::validate_max_size;

/// Runs a [`CommandTemplate`] through the platform shell and collects the
/// file it is expected to write at `{output_path}`.
///
/// Waits for the command to finish; there is no timeout.
#[derive(Debug, Clone)]
pub struct LocalCommandBackend {
    base_path: PathBuf,
    template: CommandTemplate,
}

impl LocalCommandBackend {
    /// Creates a backend writing under `base_path`.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>, template: CommandTemplate) -> Self {
        Self {
            base_path: base_path.into(),
            template,
        }
    }

    fn variables<C: MediaConfig>(
        scene: &SceneSpec,
        prompt: &str,
        config: &C,
        output_path: &Path,
    ) -> BTreeMap<String, String> {
        let resolution = config.resolution();
        let mut vars = BTreeMap::new();
        vars.insert("prompt".to_owned(), prompt.to_owned());
        vars.insert("output_path".to_owned(), output_path.display().to_string());
        vars.insert("width".to_owned(), resolution.width().to_string());
        vars.insert("height".to_owned(), resolution.height().to_string());
        for (name, value) in config.parameters() {
            vars.insert(name.to_owned(), value);
        }
        vars.insert(
            "seed".to_owned(),
            config.seed().map(|s| s.to_string()).unwrap_or_default(),
        );
        vars.insert("scene_identifier".to_owned(), scene.identifier.clone());
        let (style_name, style_tags) = config
            .style()
            .map(|s| (s.name.clone(), s.tags.join(",")))
            .unwrap_or_default();
        vars.insert("style_name".to_owned(), style_name);
        vars.insert("style_tags".to_owned(), style_tags);
        vars
    }
}

fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

#[async_trait]
impl<C: MediaConfig> GenerationBackend<C> for LocalCommandBackend {
    async fn generate(
        &self,
        scene: &SceneSpec,
        prompt: &str,
        config: &C,
    ) -> Result<MediaAsset, DomainError> {
        ensure_base_dir(&self.base_path).await?;
        let output_path =
            artifact_path(&self.base_path, C::KIND, &scene.identifier, config.extension())?;

        // A leftover file from an earlier run must not count as output.
        match tokio::fs::remove_file(&output_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(DomainError::Infrastructure(format!(
                    "failed to clear {}: {e}",
                    output_path.display()
                )));
            }
        }

        let command = self
            .template
            .render(&Self::variables(scene, prompt, config, &output_path));
        debug!(media_kind = %C::KIND, %command, "running local generation command");

        let output = shell_command(&command)
            .output()
            .await
            .map_err(|e| DomainError::Execution {
                command: command.clone(),
                exit_code: None,
                stderr: e.to_string(),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            warn!(
                media_kind = %C::KIND,
                exit_code = ?output.status.code(),
                %stderr,
                "local generation command failed"
            );
            return Err(DomainError::Execution {
                command,
                exit_code: output.status.code(),
                stderr,
            });
        }

        let size_bytes = match tokio::fs::metadata(&output_path).await {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => {
                return Err(DomainError::OutputMissing {
                    path: output_path,
                    command,
                });
            }
        };
        validate_max_size(size_bytes, config.max_size_bytes(), C::KIND, &output_path)?;
        info!(
            media_kind = %C::KIND,
            path = %output_path.display(),
            size_bytes,
            "local generation command produced artifact"
        );

        let mut metadata = BTreeMap::new();
        metadata.insert("mode".to_owned(), json!("local_command"));
        metadata.insert("command".to_owned(), json!(command));
        metadata.insert("format".to_owned(), json!(config.extension()));
        metadata.insert("size_bytes".to_owned(), json!(size_bytes));
        metadata.insert("path".to_owned(), json!(output_path.display().to_string()));
        Ok(MediaAsset {
            uri: file_uri(&output_path)?,
            mime_type: config.mime_type().to_owned(),
            metadata,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::config::{ImageConfigParams, ImageGenerationConfig, VideoConfigParams, VideoGenerationConfig};
    use crate::models::{MediaResolution, StyleProfile};

    use super::*;

    fn image_config(max_size_bytes: u64) -> ImageGenerationConfig {
        let mut params = ImageConfigParams::new(MediaResolution::new(640, 480).unwrap());
        params.max_size_bytes = max_size_bytes;
        params.seed = Some(11);
        params.style = Some(StyleProfile {
            name: "ink".to_owned(),
            description: None,
            tags: vec!["mono".to_owned(), "sketch".to_owned()],
        });
        ImageGenerationConfig::try_from(params).unwrap()
    }

    fn backend(dir: &Path, template: &str) -> LocalCommandBackend {
        LocalCommandBackend::new(dir, CommandTemplate::new(template).unwrap())
    }

    #[tokio::test]
    async fn test_successful_command_returns_asset_with_metadata() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(
            dir.path(),
            "printf '%s' '{prompt} {width}x{height} {steps} {seed} {style_name} {style_tags}' > {output_path}",
        );
        let scene = SceneSpec::new("s1", "Harbor");

        // Act
        let asset = backend
            .generate(&scene, "gulls", &image_config(1024))
            .await
            .unwrap();

        // Assert
        let path = dir.path().join("image_s1.png");
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "gulls 640x480 30 11 ink mono,sketch");
        assert_eq!(asset.mime_type, "image/png");
        assert_eq!(asset.metadata["mode"], "local_command");
        assert_eq!(asset.metadata["format"], "png");
        assert_eq!(asset.metadata["size_bytes"], written.len() as u64);
        let command = asset.metadata["command"].as_str().unwrap();
        assert!(command.contains(&path.display().to_string()));
    }

    #[tokio::test]
    async fn test_zero_exit_without_file_is_output_missing() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), "true");

        let result = backend
            .generate(&SceneSpec::new("s2", "x"), "p", &image_config(1024))
            .await;

        match result {
            Err(DomainError::OutputMissing { path, command }) => {
                assert_eq!(path, dir.path().join("image_s2.png"));
                assert_eq!(command, "true");
            }
            other => panic!("expected OutputMissing, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stale_file_does_not_count_as_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("image_s3.png"), b"old").unwrap();
        let backend = backend(dir.path(), "true");

        let result = backend
            .generate(&SceneSpec::new("s3", "x"), "p", &image_config(1024))
            .await;

        assert!(matches!(result, Err(DomainError::OutputMissing { .. })));
    }

    #[tokio::test]
    async fn test_oversized_output_is_rejected_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), "head -c 2048 /dev/zero > {output_path}");

        let result = backend
            .generate(&SceneSpec::new("s4", "x"), "p", &image_config(1024))
            .await;

        match result {
            Err(DomainError::SizeExceeded { size_bytes, max_size_bytes, media_kind, .. }) => {
                assert_eq!(size_bytes, 2048);
                assert_eq!(max_size_bytes, 1024);
                assert_eq!(media_kind, "image");
            }
            other => panic!("expected SizeExceeded, got {other:?}"),
        }
        assert!(dir.path().join("image_s4.png").exists());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), "echo boom >&2; exit 3");

        let result = backend
            .generate(&SceneSpec::new("s5", "x"), "p", &image_config(1024))
            .await;

        match result {
            Err(DomainError::Execution { exit_code, stderr, .. }) => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected Execution, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_video_variables_include_duration_and_fps() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(dir.path(), "printf '%s' '{duration_seconds}@{fps}' > {output_path}");
        let config = VideoGenerationConfig::try_from(VideoConfigParams::new(
            MediaResolution::new(320, 240).unwrap(),
            2.5,
        ))
        .unwrap();

        let asset = backend
            .generate(&SceneSpec::new("s6", "x"), "p", &config)
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("video_s6.mp4")).unwrap();
        assert_eq!(written, "2.5@24");
        assert_eq!(asset.mime_type, "video/mp4");
    }
}
