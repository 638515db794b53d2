//! File intake, classification and output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clip::{Classification, Clipper, OwnedImage, Rect, compose::Collage};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{cli::Args, config::Config};

/// Decode a screenshot from disk.
pub fn load(path: &Path) -> Result<OwnedImage> {
    let img = image::open(path).with_context(|| format!("decode {:?}", path))?;
    Ok(OwnedImage::from_rgba_image(&img.into_rgba8()))
}

/// Decode and classify every file. Results keep input order; failures are
/// returned per file.
pub fn classify_files(clipper: &Clipper, paths: &[PathBuf]) -> Vec<Result<(OwnedImage, Classification)>> {
    paths
        .par_iter()
        .map(|path| {
            let img = load(path)?;
            let result = clipper.classify(&img);
            Ok((img, result))
        })
        .collect()
}

/// Rectangles worth drawing on a debug overlay.
fn overlay_rects(result: &Classification) -> Vec<Rect> {
    let mut rects = Vec::new();
    if let Some(layout) = result.weapon.layout {
        if result.weapon.is_weapon {
            rects.push(layout.weapon_pos1);
            if result.weapon.is_additional {
                rects.push(layout.weapon_pos2);
            }
        } else if result.weapon.is_summon {
            rects.extend([layout.summon_pos1, layout.summon_pos2]);
        }
    }
    if let Some(character) = &result.character {
        rects.extend(character.candidates.iter().copied());
    }
    rects
}

fn write_overlay(dir: &Path, source: &Path, img: &OwnedImage, result: &Classification) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {:?}", dir))?;
    let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    let path = dir.join(format!("{stem}.overlay.png"));
    let mask = result.character.as_ref().map(|c| &c.mask);
    clip::overlay::draw(img, mask, &overlay_rects(result))
        .save(&path)
        .with_context(|| format!("write {:?}", path))
}

/// Output path: explicit `-o`, else `<unix-millis>.png` in the configured directory.
pub fn output_path(args: &Args, config: &Config) -> PathBuf {
    if let Some(out) = &args.output {
        return out.clone();
    }
    let name = format!("{}.png", chrono::Utc::now().timestamp_millis());
    match &config.output_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Classify the inputs and write the collage. Returns the written path, or
/// `None` when nothing was classified.
pub fn run(args: &Args, config: &Config) -> Result<Option<PathBuf>> {
    let clipper = Clipper::new(config.settings);
    let mut collage = Collage::new();

    for (path, res) in args.files.iter().zip(classify_files(&clipper, &args.files)) {
        let (img, result) = match res {
            Ok(v) => v,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
                continue;
            }
        };

        info!(
            path = %path.display(),
            kind = result.image.kind(),
            ratio = ?result.weapon.ratio(),
            is_dual = result.weapon.is_dual,
            is_additional = result.weapon.is_additional,
            "classified"
        );

        if let Some(dir) = &args.overlay_dir {
            if let Err(err) = write_overlay(dir, path, &img, &result) {
                warn!(path = %path.display(), error = %err, "overlay failed");
            }
        }

        collage.push(result.image);
    }

    debug!(images = collage.len(), rows = ?clipper.settings().rows, "composing");
    let Some(out) = clipper.compose(&collage).context("compose collage")? else {
        return Ok(None);
    };

    let path = output_path(args, config);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {:?}", parent))?;
    }
    out.to_rgba_image()
        .save(&path)
        .with_context(|| format!("write {:?}", path))?;
    Ok(Some(path))
}
