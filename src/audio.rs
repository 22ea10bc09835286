use hound::WavReader;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, error};

/// Synthesize one narration WAV per script line with piper and return the
/// file paths in line order.
pub fn synthesize_lines(
    lines: &[String],
    output_dir: &Path,
    voice: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut paths = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let path = output_dir.join(format!("line_{:02}.wav", index));
        debug!("Synthesizing line {} to {}", index, path.display());
        synthesize_line(voice, line, &path)?;
        paths.push(path);
    }
    Ok(paths)
}

fn synthesize_line(voice: &Path, text: &str, out_path: &Path) -> anyhow::Result<()> {
    let mut child = Command::new("piper")
        .arg("--model")
        .arg(voice)
        .arg("--output_file")
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()?;

    {
        let stdin = child
            .stdin
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Failed to open piper stdin"))?;
        // wrapped display lines read as one utterance
        stdin.write_all(text.replace('\n', " ").as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        error!("Piper TTS command failed for {}", out_path.display());
        anyhow::bail!("TTS engine failed for line, command returned non-zero");
    }
    Ok(())
}

pub fn wav_duration_seconds(path: &Path) -> anyhow::Result<f64> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let samples = reader.len();
    let frames = samples as f64 / spec.channels as f64;
    Ok(frames / spec.sample_rate as f64)
}
