use chrono::Local;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::audio;
use crate::config::Settings;
use crate::history;
use crate::script;
use crate::topics;
use crate::trends::TrendSource;
use crate::uploader::{UploadMeta, VideoHost};
use crate::video;
use crate::visuals;

pub struct RenderedVideo {
    pub video_path: PathBuf,
    pub script_lines: Vec<String>,
}

/// Produces all assets for one topic inside its video directory.
pub trait Renderer {
    fn render(
        &self,
        topic: &str,
        video_dir: &Path,
        settings: &Settings,
    ) -> anyhow::Result<RenderedVideo>;
}

/// The real renderer: script lines, one frame and one narration snippet per
/// line, then a single assembled short.
pub struct CartoonRenderer;

impl Renderer for CartoonRenderer {
    fn render(
        &self,
        topic: &str,
        video_dir: &Path,
        settings: &Settings,
    ) -> anyhow::Result<RenderedVideo> {
        let frame_dir = video_dir.join("frames");
        let audio_dir = video_dir.join("audio");
        fs::create_dir_all(video_dir)?;

        let script_lines = script::generate_script(topic);
        info!(
            "Generated script with {} lines for topic '{}'",
            script_lines.len(),
            topic
        );

        let frame_paths =
            visuals::create_frames(topic, &script_lines, &frame_dir, &settings.assets_dir)?;
        let audio_paths =
            audio::synthesize_lines(&script_lines, &audio_dir, &settings.tts_voice)?;
        info!(
            "Created {} frames and audio snippets for topic '{}'",
            frame_paths.len(),
            topic
        );

        let video_path = video::build_video(
            &frame_paths,
            &audio_paths,
            &video_dir.join("cartoon_short.mp4"),
            settings.background_music_file.as_deref(),
        )?;
        info!("Video exported to {}", video_path.display());

        Ok(RenderedVideo {
            video_path,
            script_lines,
        })
    }
}

/// Drive one batch: select topics, render each video in its own directory,
/// upload unless dry-running, and record the used topics once at the end.
pub async fn run<T, R, H>(
    settings: &Settings,
    trends: &T,
    renderer: &R,
    host: &H,
    explicit_topic: Option<&str>,
    dry_run: bool,
    count: Option<i64>,
) -> anyhow::Result<Vec<PathBuf>>
where
    T: TrendSource,
    R: Renderer,
    H: VideoHost,
{
    let mut desired_count = count.unwrap_or(settings.videos_per_day);
    if desired_count < 1 {
        warn!("Invalid video count {} provided; defaulting to 1", desired_count);
        desired_count = 1;
    }
    let desired_count = desired_count as usize;

    settings.ensure_directories()?;

    let history_path = settings.output_dir.join("history.json");
    let mut used_topics = history::load_used_topics(&history_path);
    info!("Loaded {} previously used topics", used_topics.len());

    let batch_topics =
        topics::select_topics(trends, settings, explicit_topic, &used_topics, desired_count).await;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let batch_dir = settings.output_dir.join(&timestamp);
    if batch_dir.exists() {
        anyhow::bail!(
            "Batch directory {} already exists; refusing to reuse it",
            batch_dir.display()
        );
    }
    fs::create_dir_all(&batch_dir)?;

    // authenticate before any rendering, so a credential problem surfaces
    // before the expensive work
    let client = if dry_run {
        None
    } else {
        Some(
            host.authenticate(
                &settings.youtube_client_secrets_file,
                &settings.youtube_token_file,
            )
            .await?,
        )
    };

    let mut video_paths = Vec::with_capacity(batch_topics.len());
    for (index, topic) in batch_topics.iter().enumerate() {
        let index = index + 1;
        let video_dir = batch_dir.join(format!("video_{:02}", index));
        info!(
            "Producing video {}/{} for topic '{}'",
            index,
            batch_topics.len(),
            topic
        );
        let rendered = renderer.render(topic, &video_dir, settings)?;

        // a topic counts as used once we attempted it, published or not
        used_topics.insert(topic.clone());

        if dry_run {
            info!("Dry run enabled; skipping upload for topic '{}'", topic);
        } else if let Some(client) = client.as_ref() {
            let meta = UploadMeta {
                title: render_template(&settings.video_title_template, topic, None),
                description: render_template(
                    &settings.video_description_template,
                    topic,
                    Some(&rendered.script_lines.join(" ")),
                ),
                tags: settings
                    .tags
                    .iter()
                    .cloned()
                    .chain([topic.clone()])
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
                category_id: settings.youtube_category_id.clone(),
                privacy_status: settings.youtube_privacy_status.clone(),
            };
            info!(
                "Uploading video {}/{} titled '{}'",
                index,
                batch_topics.len(),
                meta.title
            );
            let response = host.upload(client, &rendered.video_path, &meta).await?;
            info!("YouTube response for '{}': {}", meta.title, response);
        }

        video_paths.push(rendered.video_path);
    }

    history::save_used_topics(&history_path, &used_topics)?;
    info!(
        "Recorded {} total topics to {}",
        used_topics.len(),
        history_path.display()
    );

    Ok(video_paths)
}

fn render_template(template: &str, topic: &str, script: Option<&str>) -> String {
    let mut rendered = template.replace("{topic}", topic);
    if let Some(script) = script {
        rendered = rendered.replace("{script}", script);
    }
    rendered
}
