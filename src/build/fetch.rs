//! Source archive download, verification, and extraction.

use std::fs::File;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use tar::Archive;

use crate::recipe::data::SourceEntry;
use crate::util::fs::ensure_dir;
use crate::util::hash::verify_sha256;

/// Fetch a source archive into the cache and extract it into `dest`.
///
/// The cached tarball is reused when its checksum still matches; the
/// archive's single root directory is stripped on extraction so `dest`
/// holds the source tree directly.
pub fn fetch_source(entry: &SourceEntry, cache_dir: &Path, dest: &Path) -> Result<()> {
    ensure_dir(cache_dir)?;

    let archive_path = cache_dir.join(archive_file_name(entry));
    if archive_path.exists() && verify_sha256(&archive_path, &entry.sha256).is_ok() {
        tracing::info!("using cached {}", archive_path.display());
    } else {
        download(entry, &archive_path)?;
        verify_sha256(&archive_path, &entry.sha256)?;
    }

    ensure_dir(dest)?;
    extract_stripped(&archive_path, dest)
        .with_context(|| format!("failed to extract {}", archive_path.display()))
}

/// Cache file name for a source entry, keyed by checksum so different
/// versions never collide.
fn archive_file_name(entry: &SourceEntry) -> String {
    let base = entry
        .url
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("source.tar.gz");
    format!("{}-{}", &entry.sha256[..12], base)
}

fn download(entry: &SourceEntry, archive_path: &Path) -> Result<()> {
    tracing::info!("downloading {}", entry.url);

    let response = reqwest::blocking::Client::new()
        .get(&entry.url)
        .send()
        .with_context(|| format!("failed to request {}", entry.url))?
        .error_for_status()
        .with_context(|| format!("server rejected {}", entry.url))?;

    let pb = match response.content_length() {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let mut temp = tempfile::NamedTempFile::new_in(
        archive_path
            .parent()
            .context("archive path has no parent directory")?,
    )?;
    let mut reader = pb.wrap_read(response);
    std::io::copy(&mut reader, &mut temp)
        .with_context(|| format!("failed to download {}", entry.url))?;
    pb.finish_and_clear();

    temp.persist(archive_path)
        .with_context(|| format!("failed to store {}", archive_path.display()))?;
    Ok(())
}

/// Extract a gzipped tarball, stripping the leading path component of
/// every entry.
fn extract_stripped(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .with_context(|| format!("failed to open {}", archive_path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        let stripped: PathBuf = path.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }
        // Entries must stay under dest; the checksum does not guarantee a
        // well-formed archive.
        if stripped
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("archive entry escapes the destination: {}", path.display());
        }

        let out = dest.join(&stripped);
        if let Some(parent) = out.parent() {
            ensure_dir(parent)?;
        }
        entry
            .unpack(&out)
            .with_context(|| format!("failed to unpack {}", out.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn make_archive(dir: &Path, entry_name: &str) -> PathBuf {
        let archive_path = dir.join("src.tar.gz");
        let file = File::create(&archive_path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        let content = b"project(OpenImageIO)";
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        // Write the name bytes directly: `set_path`/`append_data` refuse
        // entries containing `..`, which this helper must be able to build.
        let name = entry_name.as_bytes();
        header.as_old_mut().name[..name.len()].copy_from_slice(name);
        header.set_cksum();
        builder.append(&header, &content[..]).unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        archive_path
    }

    #[test]
    fn test_extract_strips_root_directory() {
        let tmp = TempDir::new().unwrap();
        let archive = make_archive(tmp.path(), "OpenImageIO-2.5.10.1/CMakeLists.txt");
        let dest = tmp.path().join("src");

        extract_stripped(&archive, &dest).unwrap();
        assert!(dest.join("CMakeLists.txt").is_file());
        assert!(!dest.join("OpenImageIO-2.5.10.1").exists());
    }

    #[test]
    fn test_extract_rejects_escaping_entries() {
        let tmp = TempDir::new().unwrap();
        let archive = make_archive(tmp.path(), "OpenImageIO-2.5.10.1/../../escaped.txt");
        let dest = tmp.path().join("nested").join("src");
        std::fs::create_dir_all(&dest).unwrap();

        let err = extract_stripped(&archive, &dest).unwrap_err();
        assert!(err.to_string().contains("escapes the destination"));
        assert!(!tmp.path().join("escaped.txt").exists());
    }

    #[test]
    fn test_archive_file_name_is_checksum_keyed() {
        let entry = SourceEntry {
            url: "https://example.com/v2.5.10.1.tar.gz".to_string(),
            sha256: "ab".repeat(32),
        };
        let name = archive_file_name(&entry);
        assert!(name.starts_with("abababababab-"));
        assert!(name.ends_with("v2.5.10.1.tar.gz"));
    }
}
