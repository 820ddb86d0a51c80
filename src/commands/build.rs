use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use fs_err as fs;
use indicatif::{ProgressBar, ProgressStyle};
use shelfpack::ShelfPacker;
use walkdir::WalkDir;

use crate::{
    data::{SheetIndex, SheetRecord, SHEETS_FILENAME},
    frames::collect_frames,
    options::BuildOptions,
    sequence::group_frames,
    sheet::Sheet,
};

/// Builds one sheet per subfolder of the input folder, then writes the index
/// of all of them.
///
/// Folders are processed one at a time, in name order. The first failure
/// aborts the whole run; outputs already written are left where they are.
pub fn build_sprite_sheets(options: BuildOptions) -> anyhow::Result<()> {
    log::info!("Building sprite sheets...");

    let packer = ShelfPacker::new().max_width(options.max_width.get());
    let folders = sheet_folders(&options.input)?;

    fs::create_dir_all(&options.output)?;

    let progress = ProgressBar::new(folders.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:30}] {pos}/{len} {msg}")
            .progress_chars("=> "),
    );

    let mut index = SheetIndex::default();

    for folder in &folders {
        let name = folder_name(folder);
        progress.set_message(name.clone());

        let record = build_sheet(folder, &name, &options.output, &packer)
            .with_context(|| format!("Failed to build sheet from {}", folder.display()))?;

        if let Some(record) = record {
            index.push(record);
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    index.write_to_folder(&options.output).with_context(|| {
        format!(
            "Failed to write {}",
            options.output.join(SHEETS_FILENAME).display()
        )
    })?;

    log::info!(
        "Completed successfully: {} sheets written to {}",
        index.len(),
        options.output.display()
    );

    Ok(())
}

/// Runs one folder through decoding, grouping, packing and drawing, and writes
/// the resulting image. Folders without any frames produce nothing.
fn build_sheet(
    folder: &Path,
    name: &str,
    output_folder: &Path,
    packer: &ShelfPacker,
) -> anyhow::Result<Option<SheetRecord>> {
    let frames = collect_frames(folder)?;

    if frames.is_empty() {
        log::warn!(
            "Skipping {} because it contains no PNG or GIF frames",
            folder.display()
        );
        return Ok(None);
    }

    let sequences = group_frames(frames);
    let sheet = Sheet::build(name, sequences, packer)?;

    log::trace!("{:?}", sheet);

    let image_path = output_folder.join(format!("{}.png", name));
    let mut file = BufWriter::new(fs::File::create(&image_path)?);
    sheet
        .image
        .encode_png(&mut file)
        .with_context(|| format!("Failed to encode {}", image_path.display()))?;
    file.flush()?;

    let (width, height) = sheet.image.size();
    log::info!(
        "Wrote {} ({}x{}, {} frames)",
        image_path.display(),
        width,
        height,
        sheet.frame_count()
    );

    Ok(Some(SheetRecord::from(&sheet)))
}

/// The immediate subfolders of `input`, sorted by name.
fn sheet_folders(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));

    let mut folders = Vec::new();

    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to list sheet folders in {}", input.display()))?;

        if entry.file_type().is_dir() {
            folders.push(entry.into_path());
        } else {
            log::debug!("Ignoring {}, it isn't a folder", entry.path().display());
        }
    }

    Ok(folders)
}

fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
