//! Tracing subscriber setup driven by [`LoggingConfig`].
//!
//! Console output is human readable; file output is JSON, routed to a
//! rotating file per configured subsystem (target prefix), with the
//! "default" section catching every target not listed explicitly.

use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt;

use crate::config::{LoggingConfig, Section};

const DEFAULT_SECTION: &str = "default";

/// `None` means the sink is switched off. Unknown strings fall back to INFO.
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

fn level_filter(s: &str) -> LevelFilter {
    parse_tracing_level(s)
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::OFF)
}

/// True if `target` is `prefix` itself or a module below it.
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    target == prefix
        || (target.starts_with(prefix) && target[prefix.len()..].starts_with("::"))
}

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

// -------- rotating file sink --------

type SharedRotate = Arc<Mutex<FileRotate<AppendTimestamp>>>;

#[derive(Clone)]
struct RotatingFile(SharedRotate);

impl RotatingFile {
    fn open(path: &Path, section: &Section) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
        let limit = match section.max_backups {
            Some(n) => FileLimit::MaxFiles(n),
            None => FileLimit::Age(chrono::Duration::days(1)),
        };
        let rot = FileRotate::new(
            path,
            AppendTimestamp::default(limit),
            ContentLimit::BytesSurpassed(max_bytes as usize),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rot))))
    }
}

/// Writer handed out per event; `None` drops the bytes.
struct FileHandle(Option<SharedRotate>);

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(rot) => rot
                .lock()
                .map_err(|_| std::io::Error::other("log file lock poisoned"))?
                .write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(rot) => rot
                .lock()
                .map_err(|_| std::io::Error::other("log file lock poisoned"))?
                .flush(),
            None => Ok(()),
        }
    }
}

/// Picks the file of the longest matching subsystem prefix, else the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_prefix: Vec<(String, RotatingFile)>,
}

impl FileRouter {
    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }

    fn route(&self, target: &str) -> Option<SharedRotate> {
        self.by_prefix
            .iter()
            .filter(|(prefix, _)| matches_target_prefix(target, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, f)| f.0.clone())
            .or_else(|| self.default.as_ref().map(|f| f.0.clone()))
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = FileHandle;

    fn make_writer(&'a self) -> Self::Writer {
        FileHandle(self.default.as_ref().map(|f| f.0.clone()))
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        FileHandle(self.route(meta.target()))
    }
}

// -------- filters --------

fn console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .map(|s| level_filter(&s.console_level))
        .unwrap_or(LevelFilter::OFF);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |t, (name, s)| {
            t.with_target(name.clone(), level_filter(&s.console_level))
        })
}

/// Sections without a file log nothing to disk, even if their target is
/// otherwise caught by the default file.
fn file_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .filter(|s| !s.file.trim().is_empty())
        .map(|s| level_filter(&s.file_level))
        .unwrap_or(LevelFilter::OFF);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |t, (name, s)| {
            let level = if s.file.trim().is_empty() {
                LevelFilter::OFF
            } else {
                level_filter(&s.file_level)
            };
            t.with_target(name.clone(), level)
        })
}

fn build_file_router(cfg: &LoggingConfig, base_dir: &Path) -> FileRouter {
    let mut router = FileRouter::default();
    let mut opened: HashMap<PathBuf, RotatingFile> = HashMap::new();

    for (name, section) in cfg {
        if section.file.trim().is_empty() {
            continue;
        }
        let path = resolve_log_path(&section.file, base_dir);
        let file = match opened.get(&path) {
            Some(f) => f.clone(),
            None => match RotatingFile::open(&path, section) {
                Ok(f) => {
                    opened.insert(path.clone(), f.clone());
                    f
                }
                Err(e) => {
                    eprintln!(
                        "Failed to open log file '{}' for '{}': {}",
                        path.display(),
                        name,
                        e
                    );
                    continue;
                }
            },
        };
        if name == DEFAULT_SECTION {
            router.default = Some(file);
        } else {
            router.by_prefix.push((name.clone(), file));
        }
    }
    router
}

// -------- public init --------

/// Install the global subscriber.
///
/// Relative log file paths are resolved against `base_dir` (the home dir).
/// Calling this twice is harmless; the second install is ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` records before the subscriber goes in.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    // stdout is reserved for command output.
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg));

    let router = build_file_router(cfg, base_dir);
    let file = (!router.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router)
            .with_filter(file_targets(cfg))
    });

    let _ = Registry::default().with(console).with(file).try_init();
}
