// src/export/package.rs

use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

/// Deflate `files` into a new archive at `archive`, each stored under its
/// own file name.
pub fn package(files: &[&Path], archive: &Path) -> Result<()> {
    let out = File::create(archive).with_context(|| format!("creating {}", archive.display()))?;
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("no file name in {}", path.display()))?;
        let mut src = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        zip.start_file(name, options)?;
        io::copy(&mut src, &mut zip).with_context(|| format!("compressing {}", name))?;
    }
    zip.finish()?;
    Ok(())
}
