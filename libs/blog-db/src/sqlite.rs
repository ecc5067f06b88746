//! SQLite DSN handling: pragma extraction, in-memory detection, path preparation.

use std::collections::HashMap;

/// DSN query keys consumed here; SQLx does not understand them.
const PRAGMA_KEYS: &[&str] = &["wal", "synchronous", "busy_timeout", "journal_mode"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JournalMode {
    Delete,
    Wal,
    Memory,
    Truncate,
    Persist,
    Off,
}

impl JournalMode {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Wal => "WAL",
            JournalMode::Memory => "MEMORY",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Off => "OFF",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DELETE" => Some(JournalMode::Delete),
            "WAL" => Some(JournalMode::Wal),
            "MEMORY" => Some(JournalMode::Memory),
            "TRUNCATE" => Some(JournalMode::Truncate),
            "PERSIST" => Some(JournalMode::Persist),
            "OFF" => Some(JournalMode::Off),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    Off,
    Normal,
    Full,
    Extra,
}

impl SyncMode {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SyncMode::Off => "OFF",
            SyncMode::Normal => "NORMAL",
            SyncMode::Full => "FULL",
            SyncMode::Extra => "EXTRA",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OFF" => Some(SyncMode::Off),
            "NORMAL" => Some(SyncMode::Normal),
            "FULL" => Some(SyncMode::Full),
            "EXTRA" => Some(SyncMode::Extra),
            _ => None,
        }
    }
}

/// Whitelisted PRAGMA settings taken from the DSN query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pragmas {
    pub journal_mode: Option<JournalMode>,
    pub synchronous: Option<SyncMode>,
    pub busy_timeout_ms: Option<i64>,
}

impl Pragmas {
    /// Invalid values are logged and ignored.
    pub fn from_pairs(pairs: &HashMap<String, String>) -> Self {
        let mut pragmas = Pragmas::default();
        for (key, value) in pairs {
            match key.as_str() {
                "journal_mode" => match JournalMode::parse(value) {
                    Some(mode) => pragmas.journal_mode = Some(mode),
                    None => tracing::warn!("Invalid 'journal_mode' PRAGMA value '{}', ignoring", value),
                },
                // Legacy toggle; an explicit journal_mode wins.
                "wal" => match value.to_ascii_lowercase().as_str() {
                    "true" | "1" => {
                        pragmas.journal_mode.get_or_insert(JournalMode::Wal);
                    }
                    "false" | "0" => {
                        pragmas.journal_mode.get_or_insert(JournalMode::Delete);
                    }
                    _ => tracing::warn!("Invalid 'wal' PRAGMA value '{}', ignoring", value),
                },
                "synchronous" => match SyncMode::parse(value) {
                    Some(mode) => pragmas.synchronous = Some(mode),
                    None => tracing::warn!("Invalid 'synchronous' PRAGMA value '{}', ignoring", value),
                },
                "busy_timeout" => match value.parse::<i64>() {
                    Ok(ms) if ms >= 0 => pragmas.busy_timeout_ms = Some(ms),
                    _ => tracing::warn!("Invalid 'busy_timeout' PRAGMA value '{}', ignoring", value),
                },
                other => tracing::debug!("Unknown SQLite parameter '{}', ignoring", other),
            }
        }
        if let Some(explicit) = pairs.get("journal_mode").and_then(|v| JournalMode::parse(v)) {
            pragmas.journal_mode = Some(explicit);
        }
        pragmas
    }

    /// PRAGMA statements to run on every new connection.
    ///
    /// In-memory databases stay on the DELETE journal and skip the busy timeout.
    pub fn statements(&self, in_memory: bool) -> Vec<String> {
        let journal = match (in_memory, self.journal_mode) {
            (true, _) => JournalMode::Delete,
            (false, Some(mode)) => mode,
            (false, None) => JournalMode::Wal,
        };
        let sync = self.synchronous.unwrap_or(SyncMode::Normal);

        let mut out = vec![
            format!("PRAGMA journal_mode = {}", journal.as_sql()),
            format!("PRAGMA synchronous = {}", sync.as_sql()),
        ];
        if !in_memory {
            if let Some(ms) = self.busy_timeout_ms {
                out.push(format!("PRAGMA busy_timeout = {ms}"));
            }
        }
        out
    }
}

/// Split whitelisted pragma parameters out of the DSN.
///
/// Returns the cleaned DSN and the extracted pairs with lowercase keys. A DSN
/// that does not parse as a URL is returned unchanged.
pub fn extract_pragmas(dsn: &str) -> (String, HashMap<String, String>) {
    let Ok(mut url) = url::Url::parse(dsn) else {
        return (dsn.to_string(), HashMap::new());
    };

    let mut extracted = HashMap::new();
    let mut remaining = Vec::new();
    for (key, value) in url.query_pairs() {
        let key_lower = key.to_lowercase();
        if PRAGMA_KEYS.contains(&key_lower.as_str()) {
            extracted.insert(key_lower, value.into_owned());
        } else {
            remaining.push(format!("{key}={value}"));
        }
    }

    url.set_query(None);
    if !remaining.is_empty() {
        url.set_query(Some(&remaining.join("&")));
    }
    (url.to_string(), extracted)
}

pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

/// Create the parent directory of a file-backed SQLite DSN.
pub fn prepare_path(dsn: &str, create_dirs: bool) -> std::io::Result<()> {
    if !create_dirs || is_memory_dsn(dsn) {
        return Ok(());
    }
    let raw = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);
    let path = raw.split('?').next().unwrap_or(raw);
    if path.starts_with("file:") {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
