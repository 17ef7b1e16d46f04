use anyhow::{Context, Result};
use std::io::{self, Write};

use mask_tools::cli::{parse_or_exit, PackArgs};
use mask_tools::pack::pack_masks;
use mask_tools::utils::{error_println, verbose_println};

fn run() -> Result<()> {
    let mut args: PackArgs = parse_or_exit();
    args.load_and_merge_config()?;

    if args.images.is_empty() {
        verbose_println(args.verbose, "No images given; image_settings is left unchanged");
    }
    for (index, image) in args.images.iter().enumerate() {
        verbose_println(
            args.verbose,
            &format!("mask {} <- {}", index, image.display()),
        );
    }

    let output = pack_masks(&args.settings_file, &args.images)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output).context("Failed to write packed document")?;
    stdout.flush().context("Failed to write packed document")?;

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        error_println(&format!("{:#}", err));
        std::process::exit(1);
    }
}
