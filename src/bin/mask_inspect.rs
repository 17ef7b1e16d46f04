use anyhow::Result;
use console::style;
use indicatif::ProgressBar;
use std::time::Instant;

use mask_tools::cli::{parse_or_exit, InspectArgs};
use mask_tools::inspect::{inspect_tree, InspectEvent, InspectOptions};
use mask_tools::json_output::JsonMessage;
use mask_tools::report::InspectReport;
use mask_tools::utils::{
    create_spinner, error_println, format_duration, verbose_println, warn_println,
};

fn print_event(event: &InspectEvent) {
    match event {
        InspectEvent::Document { path, .. } => println!("{}", path.display()),
        InspectEvent::Mask {
            index, detection, ..
        } => println!("  mask {}: {}", index, detection.description()),
        InspectEvent::Failed {
            path,
            index: Some(index),
            error,
        } => warn_println(&format!("{} (mask {}): {}", path.display(), index, error)),
        InspectEvent::Failed {
            path,
            index: None,
            error,
        } => warn_println(&format!("{}: {}", path.display(), error)),
    }
}

fn run() -> Result<()> {
    let start_time = Instant::now();
    let mut args: InspectArgs = parse_or_exit();
    args.load_and_merge_config()?;

    let options = InspectOptions {
        extensions: args.extensions(),
        strict: args.strict,
    };
    if options.extensions.is_empty() {
        return Err(anyhow::anyhow!("No valid extensions specified"));
    }

    verbose_println(
        args.verbose,
        &format!(
            "Scanning {} for {:?} (strict: {})",
            args.search_path.display(),
            options.extensions,
            options.strict
        ),
    );

    if args.search_path.is_file() {
        warn_println(&format!(
            "{} is not a directory; nothing to scan",
            args.search_path.display()
        ));
    }

    let spinner = if args.json {
        ProgressBar::hidden()
    } else {
        create_spinner("Scanning for settings files...")
    };
    let mut report = InspectReport::new();

    let result = inspect_tree(&args.search_path, &options, |event| {
        if args.report {
            report.record(&event);
        }

        if args.json {
            JsonMessage::from(&event).emit();
            return;
        }

        if let InspectEvent::Document { path, .. } = &event {
            spinner.set_message(path.display().to_string());
        }
        spinner.suspend(|| print_event(&event));
    });
    spinner.finish_and_clear();
    let summary = result?;

    let elapsed = start_time.elapsed();
    if args.json {
        JsonMessage::summary(&summary, elapsed.as_secs_f64()).emit();
        return Ok(());
    }

    if args.report {
        report.print();
    }

    let failures = if summary.failures > 0 {
        style(format!("{} failed", summary.failures)).red().bold()
    } else {
        style("0 failed".to_string()).dim()
    };
    eprintln!(
        "{} {} documents scanned, {} with masks, {} masks inspected, {} in {}",
        style("Done:").bold().green(),
        summary.documents_scanned,
        summary.documents_with_masks,
        summary.masks_inspected,
        failures,
        format_duration(elapsed)
    );

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        error_println(&format!("{:#}", err));
        std::process::exit(1);
    }
}
