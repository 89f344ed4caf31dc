use gframe::config_file::{KEY_MAX_SIZE, PREFERENCES_GROUP};
use gframe::frame::{MenuAction, MenuOutcome, WindowCommand};
use gframe::paths::{resolve_photo_path, CONFIG_FILE_NAME};
use gframe::{
    scaled_image, ConfigStore, ConfigValue, FrameState, PhotoFrame, PhotoPicker, Preferences,
    ShutdownSignal, ValueKind,
};
use image::{ImageBuffer, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

struct CannedPicker(Option<PathBuf>);

impl PhotoPicker for CannedPicker {
    fn pick_photo(&mut self) -> Option<PathBuf> {
        self.0.take()
    }
}

fn write_photo(path: &Path, width: u32, height: u32) {
    let img: RgbImage = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    });
    img.save(path).unwrap();
}

#[test]
fn first_run_stores_picked_photo_and_sizes_window() {
    let dir = tempdir().unwrap();
    let photo = dir.path().join("pic.png");
    write_photo(&photo, 900, 600);
    let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);

    let resolved = resolve_photo_path(&store, &mut CannedPicker(Some(photo.clone())), false)
        .expect("photo should be resolved");
    assert_eq!(resolved, photo);
    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        format!("[preferences]\nphoto_path={}\n", photo.display())
    );

    let expected = scaled_image(&photo, 300).unwrap().unwrap();
    let mut frame = PhotoFrame::new(store, resolved, false);
    let commands = frame.show();

    assert!(commands.contains(&WindowCommand::Resize {
        width: expected.width(),
        height: expected.height(),
    }));
    assert_eq!(frame.window_size(), (300, 200));
}

#[test]
fn first_run_cancel_leaves_no_config() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);

    assert!(resolve_photo_path(&store, &mut CannedPicker(None), false).is_none());
    assert!(!store.path().exists());
}

#[test]
fn preferences_change_rescales_with_new_bound() {
    let dir = tempdir().unwrap();
    let photo = dir.path().join("pic.png");
    write_photo(&photo, 2000, 1000);
    let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);
    fs::write(
        store.path(),
        format!("[preferences]\nphoto_path={}\nmax_size=150\n", photo.display()),
    )
    .unwrap();

    let photo_path = resolve_photo_path(&store, &mut CannedPicker(None), false).unwrap();
    let mut frame = PhotoFrame::new(store.clone(), photo_path, false);
    frame.show();
    assert_eq!(frame.window_size(), (150, 75));

    let outcome = frame.on_menu_select(MenuAction::Preferences, &mut CannedPicker(None));
    assert_eq!(outcome, MenuOutcome::EditPreferences { max_size: 150 });

    let commands = frame.apply_max_size(500);
    assert!(commands.contains(&WindowCommand::Resize {
        width: 500,
        height: 250
    }));
    assert_eq!(
        store.get(PREFERENCES_GROUP, KEY_MAX_SIZE, ValueKind::Integer),
        ConfigValue::Integer(500)
    );
}

#[test]
fn cancelled_preferences_change_nothing() {
    let dir = tempdir().unwrap();
    let photo = dir.path().join("pic.png");
    write_photo(&photo, 50, 50);
    let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);

    let mut frame = PhotoFrame::new(store.clone(), photo, false);
    frame.show();
    let outcome = frame.on_menu_select(MenuAction::Preferences, &mut CannedPicker(None));

    // The dialog was dismissed: nothing is applied
    assert_eq!(outcome, MenuOutcome::EditPreferences { max_size: 300 });
    assert_eq!(frame.max_size(), 300);
    assert!(!store.path().exists());
}

#[test]
fn termination_signal_persists_dragged_position() {
    let dir = tempdir().unwrap();
    let photo = dir.path().join("pic.png");
    write_photo(&photo, 40, 30);
    let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);
    store.set(
        PREFERENCES_GROUP,
        "photo_path",
        ConfigValue::String(photo.display().to_string()),
    );

    let signal = ShutdownSignal::new();
    let mut frame = PhotoFrame::new(store.clone(), photo, false);
    frame.show();
    frame.on_move(120, 45);

    // Each UI frame polls the flag; nothing happens until it is raised
    assert!(frame.poll_shutdown(&signal).is_empty());
    assert_eq!(Preferences::load(&store).x, 0);

    signal.clone().trigger();
    assert_eq!(frame.poll_shutdown(&signal), vec![WindowCommand::Close]);
    assert_eq!(frame.state(), FrameState::Destroyed);

    let prefs = Preferences::load(&store);
    assert_eq!((prefs.x, prefs.y), (120, 45));
    assert!(prefs.photo_path.is_some());

    // Written exactly once, however often the flag is seen afterwards
    let written = fs::read_to_string(store.path()).unwrap();
    frame.on_move(1, 1);
    assert!(frame.poll_shutdown(&signal).is_empty());
    assert!(frame.on_close().is_empty());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), written);
}

#[test]
fn restart_restores_everything_that_was_saved() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    write_photo(&first, 100, 100);
    write_photo(&second, 640, 480);
    let store = ConfigStore::new(dir.path().join(CONFIG_FILE_NAME), false);

    let photo = resolve_photo_path(&store, &mut CannedPicker(Some(first)), false).unwrap();
    let mut frame = PhotoFrame::new(store.clone(), photo, false);
    frame.show();
    frame.on_move(10, 20);
    frame.on_menu_select(MenuAction::Open, &mut CannedPicker(Some(second.clone())));
    frame.apply_max_size(320);
    frame.on_move(30, 40);
    frame.on_menu_select(MenuAction::Quit, &mut CannedPicker(None));

    let photo = resolve_photo_path(&store, &mut CannedPicker(None), false).unwrap();
    assert_eq!(photo, second);

    let mut restarted = PhotoFrame::new(store, photo, false);
    let commands = restarted.show();
    assert!(commands.contains(&WindowCommand::MoveTo { x: 30, y: 40 }));
    assert_eq!(restarted.max_size(), 320);
    assert_eq!(restarted.window_size(), (320, 240));
}
