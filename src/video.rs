use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{error, info, warn};

use crate::audio::wav_duration_seconds;

const MIN_SEGMENT_SECONDS: f64 = 2.5;
const SEGMENT_TAIL_SECONDS: f64 = 0.4;
const MUSIC_VOLUME: f64 = 0.2;
const FPS: u32 = 24;

/// Assemble one still frame per narration snippet into a single video.
/// Fails when the frame and audio counts differ.
pub fn build_video(
    image_paths: &[PathBuf],
    audio_paths: &[PathBuf],
    output_path: &Path,
    background_music: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    if image_paths.len() != audio_paths.len() {
        anyhow::bail!(
            "Number of images ({}) must match number of audio files ({})",
            image_paths.len(),
            audio_paths.len()
        );
    }

    let work_dir = output_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Output path {} has no parent", output_path.display()))?;
    fs::create_dir_all(work_dir)?;

    let mut segments = Vec::with_capacity(image_paths.len());
    for (index, (image, audio)) in image_paths.iter().zip(audio_paths).enumerate() {
        let duration = segment_duration(wav_duration_seconds(audio)?);
        let segment = work_dir.join(format!("segment_{:03}.mp4", index));
        let status = Command::new("ffmpeg")
            .args(["-y", "-loop", "1", "-i"])
            .arg(image)
            .arg("-i")
            .arg(audio)
            .args(["-af", "apad", "-t"])
            .arg(format!("{:.3}", duration))
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .arg("-r")
            .arg(FPS.to_string())
            .args(["-c:a", "aac"])
            .arg(&segment)
            .status()?;
        if !status.success() {
            error!("ffmpeg failed to build segment for {}", image.display());
            anyhow::bail!("ffmpeg failed to build segment for {}", image.display());
        }
        segments.push(segment);
    }

    // the concat demuxer resolves entries relative to the list file
    let concat_list = work_dir.join("files.txt");
    {
        let mut f = File::create(&concat_list)?;
        for segment in &segments {
            let name = segment
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid segment filename"))?;
            writeln!(f, "file '{}'", name)?;
        }
    }

    let combined = work_dir.join("combined.mp4");
    let status = Command::new("ffmpeg")
        .current_dir(work_dir)
        .args([
            "-y", "-f", "concat", "-safe", "0", "-i", "files.txt", "-c", "copy", "combined.mp4",
        ])
        .status()?;
    if !status.success() {
        warn!("ffmpeg concat with stream copy failed; retrying with re-encode");
        let status2 = Command::new("ffmpeg")
            .current_dir(work_dir)
            .args([
                "-y", "-f", "concat", "-safe", "0", "-i", "files.txt", "-c:v", "libx264", "-c:a",
                "aac", "combined.mp4",
            ])
            .status()?;
        if !status2.success() {
            error!("ffmpeg failed to concatenate video segments");
            anyhow::bail!("ffmpeg failed to concatenate video segments");
        }
    }

    match background_music {
        Some(music) if music.exists() => {
            info!("Mixing background music from {}", music.display());
            let status = Command::new("ffmpeg")
                .arg("-y")
                .arg("-i")
                .arg(&combined)
                .arg("-i")
                .arg(music)
                .arg("-filter_complex")
                .arg(format!(
                    "[1:a]volume={}[bg];[0:a][bg]amix=inputs=2:duration=first[mix]",
                    MUSIC_VOLUME
                ))
                .args([
                    "-map", "0:v", "-map", "[mix]", "-c:v", "copy", "-c:a", "aac",
                ])
                .arg(output_path)
                .status()?;
            if !status.success() {
                error!("ffmpeg failed to mix background music");
                anyhow::bail!("ffmpeg failed to mix background music");
            }
        }
        _ => {
            fs::rename(&combined, output_path)?;
        }
    }

    Ok(output_path.to_path_buf())
}

fn segment_duration(audio_seconds: f64) -> f64 {
    (audio_seconds + SEGMENT_TAIL_SECONDS).max(MIN_SEGMENT_SECONDS)
}
