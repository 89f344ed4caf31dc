use console::style;
use std::io::{self, Write};
use std::path::Path;

/// Diagnostics are always on in debug builds; release builds need `--verbose`.
pub fn diagnostics_enabled(verbose_flag: bool) -> bool {
    cfg!(debug_assertions) || verbose_flag
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    write_verbose(&mut io::stdout(), verbose, message);
}

fn write_verbose(out: &mut impl Write, verbose: bool, message: &str) {
    if verbose {
        // Diagnostics never fail the caller
        let _ = writeln!(out, "{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file has one of the specified extensions
pub fn has_valid_extension(path: &Path, extensions: &[&str]) -> bool {
    if let Some(ext) = get_file_extension(path) {
        extensions.contains(&ext.as_str())
    } else {
        false
    }
}
