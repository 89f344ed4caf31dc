//! Toolkit-independent photo frame controller.
//!
//! [`PhotoFrame`] owns the displayed image, the tracked window position and
//! the config store. Event handlers return [`WindowCommand`]s; the GUI layer
//! turns them into real window operations.

use std::path::{Path, PathBuf};

use crate::config_file::{
    ConfigStore, ConfigValue, Preferences, KEY_MAX_SIZE, KEY_PHOTO_PATH, KEY_X, KEY_Y,
    PREFERENCES_GROUP,
};
use crate::image_processing::{scaled_image, ScaledImage, SUPPORTED_EXTENSIONS};
use crate::paths::{config_string, PhotoPicker};
use crate::shutdown::ShutdownSignal;
use crate::utils::{has_valid_extension, verbose_println};

/// Upper bound offered by the preferences dialog
pub const MAX_SIZE_LIMIT: u32 = 3000;

/// Window size used while no image could be loaded
pub const EMPTY_FRAME_SIZE: u32 = 100;

/// X11 numbering, as delivered by button press events
pub const SECONDARY_BUTTON: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Uninitialized,
    Shown,
    Reconfiguring,
    Destroyed,
}

/// Entries of the context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Preferences,
    Open,
    Quit,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Preferences => "Preferences",
            MenuAction::Open => "Open",
            MenuAction::Quit => "Quit",
        }
    }
}

/// Window manager hints the frame keeps asserting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHints {
    pub decorated: bool,
    pub skip_taskbar: bool,
    pub skip_pager: bool,
    pub keep_below: bool,
    pub sticky: bool,
}

pub const FRAME_HINTS: WindowHints = WindowHints {
    decorated: false,
    skip_taskbar: true,
    skip_pager: true,
    keep_below: true,
    sticky: true,
};

impl WindowHints {
    /// EWMH `_NET_WM_STATE` atoms for the hints winit has no setting for
    /// (taskbar and level are repeated so they are reasserted too)
    pub fn net_wm_states(&self) -> Vec<&'static str> {
        let mut states = Vec::new();
        if self.skip_taskbar {
            states.push("_NET_WM_STATE_SKIP_TASKBAR");
        }
        if self.skip_pager {
            states.push("_NET_WM_STATE_SKIP_PAGER");
        }
        if self.keep_below {
            states.push("_NET_WM_STATE_BELOW");
        }
        if self.sticky {
            states.push("_NET_WM_STATE_STICKY");
        }
        states
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Hide,
    Resize { width: u32, height: u32 },
    ApplyHints(WindowHints),
    MoveTo { x: i32, y: i32 },
    Show,
    Close,
}

/// Result of picking a context menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Nothing to do, e.g. the file dialog was cancelled
    Nothing,
    Commands(Vec<WindowCommand>),
    /// Open the preferences dialog pre-filled with this bound
    EditPreferences { max_size: u32 },
}

pub struct PhotoFrame {
    store: ConfigStore,
    state: FrameState,
    photo_path: PathBuf,
    max_size: u32,
    x: i32,
    y: i32,
    image: Option<ScaledImage>,
    revision: u64,
    verbose: bool,
}

impl PhotoFrame {
    /// Build the frame for `photo_path`, restoring position and bound from
    /// the config store
    pub fn new(store: ConfigStore, photo_path: PathBuf, verbose: bool) -> Self {
        let prefs = Preferences::load(&store);
        Self {
            store,
            state: FrameState::Uninitialized,
            photo_path,
            max_size: prefs.max_size,
            x: prefs.x,
            y: prefs.y,
            image: None,
            revision: 0,
            verbose,
        }
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn photo_path(&self) -> &Path {
        &self.photo_path
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn image(&self) -> Option<&ScaledImage> {
        self.image.as_ref()
    }

    /// Bumped every time the displayed image is replaced
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &ConfigStore {
        &self.store
    }

    /// Current window size: the image size, or a placeholder without one
    pub fn window_size(&self) -> (u32, u32) {
        self.image
            .as_ref()
            .map(ScaledImage::dimensions)
            .unwrap_or((EMPTY_FRAME_SIZE, EMPTY_FRAME_SIZE))
    }

    /// First show of the window. Later calls return no commands since there
    /// is only ever one frame window.
    pub fn show(&mut self) -> Vec<WindowCommand> {
        if self.state != FrameState::Uninitialized {
            return Vec::new();
        }

        if let Some(image) = self.load(&self.photo_path, self.max_size) {
            self.replace_image(image);
        }
        self.state = FrameState::Shown;

        let (width, height) = self.window_size();
        vec![
            WindowCommand::ApplyHints(FRAME_HINTS),
            WindowCommand::Resize { width, height },
            WindowCommand::MoveTo {
                x: self.x,
                y: self.y,
            },
            WindowCommand::Show,
        ]
    }

    /// Button press inside the window. Only the secondary button opens the
    /// context menu; `true` means the event was consumed.
    pub fn on_button_press(&self, button: u32) -> bool {
        self.state == FrameState::Shown && button == SECONDARY_BUTTON
    }

    /// Track the window position. Nothing is written until the next resize
    /// or shutdown.
    pub fn on_move(&mut self, x: i32, y: i32) {
        if self.state == FrameState::Destroyed {
            return;
        }
        self.x = x;
        self.y = y;
    }

    pub fn on_menu_select(
        &mut self,
        action: MenuAction,
        picker: &mut dyn PhotoPicker,
    ) -> MenuOutcome {
        if self.state != FrameState::Shown {
            return MenuOutcome::Nothing;
        }

        match action {
            MenuAction::Open => match picker.pick_photo() {
                Some(path) => self.change_photo(path),
                None => MenuOutcome::Nothing,
            },
            MenuAction::Preferences => MenuOutcome::EditPreferences {
                max_size: self.max_size,
            },
            MenuAction::Quit => MenuOutcome::Commands(self.on_close()),
        }
    }

    fn change_photo(&mut self, path: PathBuf) -> MenuOutcome {
        verbose_println(self.verbose, &format!("File: {}", path.display()));
        if !has_valid_extension(&path, SUPPORTED_EXTENSIONS) {
            verbose_println(
                self.verbose,
                &format!("Unrecognised extension, trying anyway: {}", path.display()),
            );
        }

        // An unusable file leaves the current photo and config untouched
        let Some(stored) = config_string(&path, self.verbose) else {
            return MenuOutcome::Nothing;
        };
        let Some(image) = self.load(&path, self.max_size) else {
            return MenuOutcome::Nothing;
        };

        self.store
            .set(PREFERENCES_GROUP, KEY_PHOTO_PATH, ConfigValue::String(stored));
        self.photo_path = path;
        MenuOutcome::Commands(self.reconfigure(image))
    }

    /// Confirmed preferences dialog: persist the new bound and rescale
    pub fn apply_max_size(&mut self, max_size: u32) -> Vec<WindowCommand> {
        if self.state != FrameState::Shown {
            return Vec::new();
        }

        let max_size = max_size.min(MAX_SIZE_LIMIT);
        self.max_size = max_size;
        self.store.set(
            PREFERENCES_GROUP,
            KEY_MAX_SIZE,
            ConfigValue::Integer(max_size as i32),
        );

        match self.load(&self.photo_path, max_size) {
            Some(image) => self.reconfigure(image),
            None => Vec::new(),
        }
    }

    /// Quit, window-manager close or termination signal. Persists the
    /// tracked position the first time only.
    pub fn on_close(&mut self) -> Vec<WindowCommand> {
        if self.state == FrameState::Destroyed {
            return Vec::new();
        }

        self.persist_position();
        self.state = FrameState::Destroyed;
        self.image = None;
        vec![WindowCommand::Close]
    }

    /// Run the shutdown path once a termination signal has been received
    pub fn poll_shutdown(&mut self, signal: &ShutdownSignal) -> Vec<WindowCommand> {
        if !signal.is_requested() {
            return Vec::new();
        }
        verbose_println(self.verbose, "Shutting down on signal");
        self.on_close()
    }

    fn reconfigure(&mut self, image: ScaledImage) -> Vec<WindowCommand> {
        self.state = FrameState::Reconfiguring;
        self.replace_image(image);

        let (width, height) = self.window_size();
        let commands = vec![
            WindowCommand::Hide,
            WindowCommand::Resize { width, height },
            // Some window managers drop hints when the window is remapped
            WindowCommand::ApplyHints(FRAME_HINTS),
            WindowCommand::MoveTo {
                x: self.x,
                y: self.y,
            },
            WindowCommand::Show,
        ];

        self.persist_position();
        self.state = FrameState::Shown;
        commands
    }

    fn replace_image(&mut self, image: ScaledImage) {
        self.image = Some(image);
        self.revision += 1;
    }

    fn persist_position(&self) {
        self.store.set_many(
            PREFERENCES_GROUP,
            &[
                (KEY_X, ConfigValue::Integer(self.x)),
                (KEY_Y, ConfigValue::Integer(self.y)),
            ],
        );
    }

    fn load(&self, path: &Path, max_size: u32) -> Option<ScaledImage> {
        match scaled_image(path, max_size) {
            Ok(Some(image)) => Some(image),
            Ok(None) => {
                verbose_println(
                    self.verbose,
                    &format!("Image has no usable size: {}", path.display()),
                );
                None
            }
            Err(e) => {
                verbose_println(self.verbose, &format!("{:#}", e));
                None
            }
        }
    }
}
