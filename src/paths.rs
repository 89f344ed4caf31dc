use std::path::{Path, PathBuf};

use crate::config_file::{ConfigStore, ConfigValue, Preferences, KEY_PHOTO_PATH, PREFERENCES_GROUP};
use crate::utils::verbose_println;

pub const CONFIG_FILE_NAME: &str = "gframe.conf";

/// Something that can ask the user for a photo, e.g. a native file dialog
pub trait PhotoPicker {
    /// `None` when the user dismisses the dialog
    fn pick_photo(&mut self) -> Option<PathBuf>;
}

/// Per-user configuration directory, falling back to `~/.config` and
/// finally to the temporary directory
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(std::env::temp_dir)
}

/// Location of the key file: an explicit override or
/// `<user-config-dir>/gframe.conf`
pub fn config_path(override_path: Option<&Path>) -> PathBuf {
    match override_path {
        Some(path) => path.to_path_buf(),
        None => user_config_dir().join(CONFIG_FILE_NAME),
    }
}

/// Text form of `path` for the key file. Key files are UTF-8, so a path
/// that is not valid UTF-8 could not be found again after a restart and is
/// refused.
pub fn config_string(path: &Path, verbose: bool) -> Option<String> {
    let text = path.to_str().map(str::to_owned);
    if text.is_none() {
        verbose_println(
            verbose,
            &format!("Path is not valid UTF-8, ignoring: {}", path.display()),
        );
    }
    text
}

/// Establish which photo to display.
///
/// The configured `photo_path` wins. When the config file is missing or has
/// no photo configured the picker is asked, and an accepted choice is written
/// back before it is returned; a path that cannot be stored is refused and the
/// picker asked again. `None` means the user cancelled the picker.
pub fn resolve_photo_path(
    store: &ConfigStore,
    picker: &mut dyn PhotoPicker,
    verbose: bool,
) -> Option<PathBuf> {
    verbose_println(verbose, &format!("Config path: {}", store.path().display()));

    if store.exists() {
        if let Some(path) = Preferences::load(store).photo_path {
            return Some(path);
        }
        verbose_println(verbose, "No photo configured, asking for one");
    }

    loop {
        let photo_path = picker.pick_photo()?;
        verbose_println(verbose, &format!("File: {}", photo_path.display()));

        if let Some(stored) = config_string(&photo_path, verbose) {
            store.set(PREFERENCES_GROUP, KEY_PHOTO_PATH, ConfigValue::String(stored));
            return Some(photo_path);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedPicker;
    use super::*;
    use crate::config_file::ValueKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_path_override() {
        let path = config_path(Some(Path::new("/tmp/custom.conf")));
        assert_eq!(path, PathBuf::from("/tmp/custom.conf"));
    }

    #[test]
    fn test_default_config_path_uses_file_name() {
        let path = config_path(None);
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
        assert_eq!(path.parent().unwrap(), user_config_dir());
    }

    #[test]
    fn test_configured_photo_skips_picker() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);
        fs::write(store.path(), "[preferences]\nphoto_path=/home/u/pic.png\n").unwrap();

        let mut picker = ScriptedPicker::answering([Some(PathBuf::from("/other.png"))]);
        let photo = resolve_photo_path(&store, &mut picker, false);

        assert_eq!(photo, Some(PathBuf::from("/home/u/pic.png")));
        assert_eq!(picker.calls, 0);
    }

    #[test]
    fn test_first_run_persists_choice() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);

        let mut picker = ScriptedPicker::answering([Some(PathBuf::from("/home/u/pic.png"))]);
        let photo = resolve_photo_path(&store, &mut picker, false);

        assert_eq!(photo, Some(PathBuf::from("/home/u/pic.png")));
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "[preferences]\nphoto_path=/home/u/pic.png\n"
        );
    }

    #[test]
    fn test_first_run_cancel_creates_nothing() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);

        let mut picker = ScriptedPicker::answering([None]);

        assert_eq!(resolve_photo_path(&store, &mut picker, false), None);
        assert_eq!(picker.calls, 1);
        assert!(!store.exists());
    }

    #[test]
    fn test_existing_config_without_photo_asks_and_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);
        fs::write(store.path(), "[preferences]\nx=7\nmax_size=150\n").unwrap();

        let mut picker = ScriptedPicker::answering([Some(PathBuf::from("/p.jpg"))]);
        let photo = resolve_photo_path(&store, &mut picker, false);

        assert_eq!(photo, Some(PathBuf::from("/p.jpg")));
        assert_eq!(
            store.get(PREFERENCES_GROUP, "max_size", ValueKind::Integer),
            ConfigValue::Integer(150)
        );
        assert_eq!(
            store.get(PREFERENCES_GROUP, KEY_PHOTO_PATH, ValueKind::String),
            ConfigValue::String("/p.jpg".to_string())
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_choice_is_refused_and_asked_again() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);
        let odd = PathBuf::from(OsStr::from_bytes(b"/home/u/caf\xe9.png"));
        assert_eq!(config_string(&odd, false), None);

        let mut picker =
            ScriptedPicker::answering([Some(odd), Some(PathBuf::from("/home/u/cafe.png"))]);
        let photo = resolve_photo_path(&store, &mut picker, false);

        assert_eq!(photo, Some(PathBuf::from("/home/u/cafe.png")));
        assert_eq!(picker.calls, 2);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "[preferences]\nphoto_path=/home/u/cafe.png\n"
        );
    }
}
