use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load previously used topics. Missing, unreadable or corrupt history is
/// treated as empty: the history only exists to avoid repeats and is not
/// worth failing a run over.
pub fn load_used_topics(path: &Path) -> HashSet<String> {
    if !path.exists() {
        return HashSet::new();
    }
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            debug!("Could not read history file {}: {}", path.display(), e);
            return HashSet::new();
        }
    };
    match serde_json::from_str::<Vec<String>>(&data) {
        Ok(topics) => topics.into_iter().collect(),
        Err(e) => {
            debug!("Ignoring corrupt history file {}: {}", path.display(), e);
            HashSet::new()
        }
    }
}

/// Persist the used-topic set as a sorted JSON array, replacing any prior
/// content. Entries are trimmed and empties dropped before writing.
pub fn save_used_topics(path: &Path, topics: &HashSet<String>) -> anyhow::Result<()> {
    let mut sorted: Vec<String> = topics
        .iter()
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty())
        .collect();
    sorted.sort();
    sorted.dedup();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&sorted)?)?;
    Ok(())
}
