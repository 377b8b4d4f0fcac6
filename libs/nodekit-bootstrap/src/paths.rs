use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Errors for resolving the local state directory
#[derive(Debug, thiserror::Error)]
pub enum StateDirError {
    #[error("HOME environment variable is not set")]
    HomeMissing,
    #[error("local_state_dir must not be empty")]
    Empty,
    #[error("local_state_dir must be an absolute path (after ~ expansion): {0}")]
    AbsoluteRequired(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expand `~` prefix to user home directory.
///
/// Returns the path unchanged if no tilde prefix is present.
/// On Windows, uses `USERPROFILE` or `HOME` environment variable.
/// On Unix, uses `HOME` environment variable.
///
/// # Errors
/// Returns [`StateDirError::HomeMissing`] if the home variable is unset.
pub fn expand_tilde(raw: &str) -> Result<PathBuf, StateDirError> {
    let home = || {
        #[cfg(target_os = "windows")]
        let var = env::var("USERPROFILE").or_else(|_| env::var("HOME"));
        #[cfg(not(target_os = "windows"))]
        let var = env::var("HOME");
        var.map_err(|_| StateDirError::HomeMissing)
    };

    if raw == "~" {
        return Ok(PathBuf::from(home()?));
    }
    let rest = raw
        .strip_prefix("~/")
        .or_else(|| cfg!(target_os = "windows").then(|| raw.strip_prefix("~\\")).flatten());
    match rest {
        Some(rest) => Ok(Path::new(&home()?).join(rest)),
        None => Ok(PathBuf::from(raw)),
    }
}

/// Normalize the configured local state directory.
///
/// `~` is expanded and the result must be absolute. If `create` is true,
/// the directory is created if missing.
///
/// # Errors
/// Returns [`StateDirError`] if the path is empty, relative, or cannot be
/// created.
pub fn resolve_state_dir(raw: &str, create: bool) -> Result<PathBuf, StateDirError> {
    if raw.trim().is_empty() {
        return Err(StateDirError::Empty);
    }

    let path = expand_tilde(raw)?;
    if !path.is_absolute() {
        return Err(StateDirError::AbsoluteRequired(
            path.to_string_lossy().into(),
        ));
    }

    if create {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}
