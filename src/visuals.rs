use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, error};

use crate::script::fnv1a_64;

const FRAME_WIDTH: u32 = 1080;
const FRAME_HEIGHT: u32 = 1920;
const CAPTION_MAX_CHARS: usize = 60;

/// Draw one portrait frame per script line and return the paths in order.
/// Backgrounds are pastel shades seeded from the topic and line index, so a
/// rerun for the same topic draws the same frames.
pub fn create_frames(
    topic: &str,
    script_lines: &[String],
    output_dir: &Path,
    assets_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let custom_font = assets_dir.join("cartoon.ttf");
    let font_file = custom_font.exists().then_some(custom_font);

    let mut frames = Vec::with_capacity(script_lines.len());
    for (index, line) in script_lines.iter().enumerate() {
        let path = output_dir.join(format!("frame_{:02}.png", index));
        let colour = pastel_colour(fnv1a_64(&format!("{topic}:{index}")));
        debug!("Drawing frame {} with background {}", path.display(), colour);
        render_frame(topic, line, &colour, &path, font_file.as_deref())?;
        frames.push(path);
    }
    Ok(frames)
}

fn render_frame(
    topic: &str,
    line: &str,
    colour: &str,
    out_path: &Path,
    font_file: Option<&Path>,
) -> anyhow::Result<()> {
    let caption: String = format!("Trending: {}", topic)
        .chars()
        .take(CAPTION_MAX_CHARS)
        .collect();
    let filter = format!(
        "{},{}",
        drawtext(&caption, 70, "40", font_file),
        drawtext(line, 64, "(h-text_h)/2", font_file),
    );

    let status = Command::new("ffmpeg")
        .args(["-y", "-f", "lavfi", "-i"])
        .arg(format!(
            "color=c={}:s={}x{}",
            colour, FRAME_WIDTH, FRAME_HEIGHT
        ))
        .arg("-vf")
        .arg(&filter)
        .args(["-frames:v", "1"])
        .arg(out_path)
        .status()?;
    if !status.success() {
        error!("ffmpeg failed to draw frame {}", out_path.display());
        anyhow::bail!("ffmpeg failed to draw frame {}", out_path.display());
    }
    Ok(())
}

fn drawtext(text: &str, fontsize: u32, y_expr: &str, font_file: Option<&Path>) -> String {
    let mut filter = format!(
        "drawtext=text='{}':fontsize={}:fontcolor=0x141414:box=1:boxcolor=white@0.9:boxborderw=28:x=(w-text_w)/2:y={}",
        escape_drawtext(text),
        fontsize,
        y_expr
    );
    if let Some(font) = font_file {
        filter.push_str(&format!(":fontfile={}", font.display()));
    }
    filter
}

/// Escape for a single-quoted drawtext argument. Quotes use the close-quote
/// dance, percent signs would otherwise start an expansion sequence.
fn escape_drawtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str(r"'\''"),
            '\\' => out.push_str(r"\\"),
            '%' => out.push_str(r"\%"),
            _ => out.push(ch),
        }
    }
    out
}

fn pastel_colour(seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let r: u8 = rng.gen_range(120..=220);
    let g: u8 = rng.gen_range(120..=220);
    let b: u8 = rng.gen_range(120..=220);
    format!("0x{:02X}{:02X}{:02X}", r, g, b)
}
