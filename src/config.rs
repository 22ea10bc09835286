use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub trending_region: String,
    pub output_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub videos_per_day: i64,
    pub youtube_category_id: String,
    pub tags: Vec<String>,
    pub video_title_template: String,
    pub video_description_template: String,
    pub youtube_privacy_status: String,
    pub youtube_client_secrets_file: PathBuf,
    pub youtube_token_file: PathBuf,
    pub background_music_file: Option<PathBuf>,
    pub tts_voice: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trending_region: "US".to_string(),
            output_dir: PathBuf::from("output"),
            assets_dir: PathBuf::from("assets"),
            videos_per_day: 4,
            // 23 = Comedy
            youtube_category_id: "23".to_string(),
            tags: vec![
                "shorts".to_string(),
                "cartoon".to_string(),
                "comedy".to_string(),
            ],
            video_title_template: "{topic} - Cartoon Comedy Short".to_string(),
            video_description_template: "A quick cartoon short riffing on {topic}.\n\
                Automated script: {script}\n\n\
                Created automatically with the trendtoons pipeline."
                .to_string(),
            youtube_privacy_status: "private".to_string(),
            youtube_client_secrets_file: PathBuf::from("credentials/client_secret.json"),
            youtube_token_file: PathBuf::from("credentials/token.json"),
            background_music_file: None,
            tts_voice: PathBuf::from("tts/en_US-amy-medium.onnx"),
        }
    }
}

impl Settings {
    /// Create the directories the settings point at. Kept separate from
    /// loading so parsing a config file has no filesystem side effects.
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        fs::create_dir_all(&self.assets_dir)?;
        if let Some(parent) = self.youtube_token_file.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        anyhow::bail!(
            "Configuration file '{}' does not exist. Create it from config.sample.json.",
            path.display()
        );
    }
    let data = fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&data)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file '{}': {}", path.display(), e))?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(&dir.path().join("config.json")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn invalid_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        let err = load_settings(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration file"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"trending_region": "GB", "videos_per_day": 2}"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.trending_region, "GB");
        assert_eq!(settings.videos_per_day, 2);
        assert_eq!(settings.youtube_privacy_status, "private");
        assert_eq!(settings.output_dir, PathBuf::from("output"));
        assert!(settings.background_music_file.is_none());
    }

    #[test]
    fn ensure_directories_creates_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().join("out"),
            assets_dir: dir.path().join("assets"),
            youtube_token_file: dir.path().join("creds/token.json"),
            ..Settings::default()
        };
        settings.ensure_directories().unwrap();
        assert!(settings.output_dir.is_dir());
        assert!(settings.assets_dir.is_dir());
        assert!(dir.path().join("creds").is_dir());
    }
}
