use anyhow::Result;

use mask_tools::cli::{parse_or_exit, ExtractArgs};
use mask_tools::extract::{extract_masks, ExtractOptions};
use mask_tools::utils::{error_println, verbose_println};

fn run() -> Result<()> {
    let mut args: ExtractArgs = parse_or_exit();
    args.load_and_merge_config()?;

    let options = ExtractOptions {
        output_dir: args.output_dir.clone(),
        dry_run: args.dry_run,
    };

    verbose_println(
        args.verbose,
        &format!("Extracting masks from {}", args.settings_file.display()),
    );
    if options.dry_run {
        verbose_println(args.verbose, "Dry run mode: no files will be written");
    }

    let written = extract_masks(&args.settings_file, &options, |path| {
        println!("{}", path.display());
    })?;

    verbose_println(args.verbose, &format!("{} masks extracted", written.len()));
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        error_println(&format!("{:#}", err));
        std::process::exit(1);
    }
}
