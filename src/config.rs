use std::env;
use std::path::PathBuf;

/// Root folder under which all task names created by this tool live.
pub const TASK_ROOT: &str = "crontask";

/// Template used to seed a crontab file that does not exist yet.
pub const DEFAULT_CRONTAB: &str = include_str!("../assets/default.crontab");

/// Task-name prefix owned by the current user: `\crontask\<user>\`, lowercased.
///
/// Both registration and enumeration go through this prefix, so the tool
/// only ever touches its own tasks.
pub fn task_prefix() -> String {
    let user = env::var("USERNAME")
        .or_else(|_| env::var("USER"))
        .unwrap_or_default();
    format!(r"\{TASK_ROOT}\{user}\").to_lowercase()
}

/// Resolve the crontab file path.
///
/// An explicit path (flag or `CRONTASK_FILE`, resolved by the CLI) wins;
/// otherwise the file is named `crontask` in the platform config directory.
pub fn crontab_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(TASK_ROOT)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = crontab_path(Some(PathBuf::from("/tmp/tab")));
        assert_eq!(PathBuf::from("/tmp/tab"), path);
    }

    #[test]
    fn prefix_is_lowercased_and_delimited() {
        let prefix = task_prefix();
        assert!(prefix.starts_with(r"\crontask\"));
        assert!(prefix.ends_with('\\'));
        assert_eq!(prefix.to_lowercase(), prefix);
    }
}
