use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

// Standard output carries tool data (paths, reports, packed documents), so
// every diagnostic helper below writes to standard error.

/// Create a styled spinner on standard error
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Split a comma-separated extension list, dropping empty items and leading dots
pub fn parse_extension_list(extensions: &str) -> Vec<String> {
    extensions
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Check whether a file name ends in `.<ext>` for one of `extensions`.
///
/// The match is on the raw name, so a bare `.mbi` qualifies too.
pub fn has_settings_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    extensions.iter().any(|ext| {
        name.len() > ext.len()
            && name.ends_with(ext.as_str())
            && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
    })
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        eprintln!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
pub fn warn_println(message: &str) {
    eprintln!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}
