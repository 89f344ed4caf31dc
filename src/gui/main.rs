// GUI entry point for gframe
// Resolves the photo, builds the frame and hands it to the eframe event loop

use clap::Parser;
use std::process::ExitCode;

use gframe::cli::Args;
use gframe::paths::resolve_photo_path;
use gframe::utils::{error_println, verbose_println};
use gframe::{ConfigStore, PhotoFrame, ShutdownSignal};

mod app;
use app::{FrameApp, RfdPicker};

fn main() -> ExitCode {
    let args = Args::parse();
    let verbose = args.diagnostics();
    let store = ConfigStore::new(args.config_path(), verbose);

    let Some(photo_path) = resolve_photo_path(&store, &mut RfdPicker, verbose) else {
        verbose_println(verbose, "No photo selected");
        return ExitCode::from(1);
    };

    let mut frame = PhotoFrame::new(store, photo_path, verbose);
    let startup = frame.show();

    let options = eframe::NativeOptions {
        viewport: app::initial_viewport(&startup),
        ..Default::default()
    };
    let signal = ShutdownSignal::new();

    let result = eframe::run_native(
        "gframe",
        options,
        Box::new(move |cc| Ok(Box::new(FrameApp::new(cc, frame, signal, verbose)))),
    );

    match result {
        Ok(()) => {
            verbose_println(verbose, "Bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error_println(&format!("Failed to open the frame window: {}", e));
            ExitCode::from(1)
        }
    }
}
