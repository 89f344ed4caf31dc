// Library exports for the gframe binary and the integration tests
pub mod cli;
pub mod config_file;
pub mod frame;
pub mod image_processing;
pub mod paths;
pub mod shutdown;
pub mod utils;

// Re-export commonly used types
pub use config_file::{ConfigStore, ConfigValue, Preferences, ValueKind};
pub use frame::{FrameState, MenuAction, MenuOutcome, PhotoFrame, WindowCommand, WindowHints};
pub use image_processing::{scaled_image, ScaledImage};
pub use paths::PhotoPicker;
pub use shutdown::ShutdownSignal;
