use clap::Parser;
use std::path::PathBuf;

use crate::paths;
use crate::utils::diagnostics_enabled;

#[derive(Parser, Debug)]
#[command(
    name = "gframe",
    version,
    about = "Simple photo frame for your desktop",
    long_about = "
gframe - Simple photo frame for your desktop

Shows one picture in a borderless window that stays below other windows
and out of the taskbar. On X11 it is also pinned to every workspace and
kept off the pager. Right-click the picture for the menu:

• Preferences  set the largest width/height the picture is shown at
• Open         pick another picture
• Quit         remember the window position and exit

Drag the picture with the left mouse button to move it. The picture, its
position and the size limit are kept in <config dir>/gframe.conf.

Example Usage:
  # First run asks for a picture
  gframe

  # Keep a second frame with its own settings
  gframe --config ~/.config/gframe-kitchen.conf"
)]
pub struct Args {
    /// Key file to use instead of <config dir>/gframe.conf
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print diagnostic messages (always on in debug builds)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    pub fn config_path(&self) -> PathBuf {
        paths::config_path(self.config.as_deref())
    }

    pub fn diagnostics(&self) -> bool {
        diagnostics_enabled(self.verbose)
    }
}
