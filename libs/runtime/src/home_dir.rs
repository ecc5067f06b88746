use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Resolve the application home directory.
///
/// `None` (or blank) means `<user home>/<default_subdir>`. A leading `~` is
/// expanded against the user home; relative paths are made absolute against
/// the current directory. With `create` the directory is created.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let user_home = || dirs::home_dir().ok_or_else(|| anyhow!("cannot determine user home"));

    let path = match configured.as_deref().map(str::trim) {
        None | Some("") => user_home()?.join(default_subdir),
        Some("~") => user_home()?,
        Some(p) if p.starts_with("~/") || p.starts_with("~\\") => user_home()?.join(&p[2..]),
        Some(p) => {
            let pb = PathBuf::from(p);
            if pb.is_absolute() {
                pb
            } else {
                std::env::current_dir()
                    .context("cannot read current directory")?
                    .join(pb)
            }
        }
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home dir {}", path.display()))?;
    }
    Ok(path)
}
