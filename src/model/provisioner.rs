// One-time model artifact download

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::log_info;

/// Fixed artifact filename, resolved against the working directory.
pub const MODEL_FILE: &str = "WheatDiseasesDetection.onnx";
/// Google Drive file id of the published artifact.
pub const DRIVE_FILE_ID: &str = "1uvabWaPKnBuX7ND3POH6-ZlgOnufdSxJ";

/// Guarantee the model file exists locally before the server starts.
///
/// Presence of the file is the whole cache check; the download happens at
/// most once per deployment. There is no retry and no content verification:
/// a corrupt artifact surfaces as a model load failure, not here. The stream
/// goes to a `.part` file that is renamed into place only on a clean finish,
/// so an interrupted fetch never leaves a truncated file under the final name.
pub fn ensure_model(model_file: &str, drive_file_id: &str) -> anyhow::Result<PathBuf> {
    let dest = PathBuf::from(model_file);
    if dest.exists() {
        log_info!("[MODEL] Found {} on disk, skipping download", model_file);
        return Ok(dest);
    }

    let url = format!("https://drive.google.com/uc?export=download&id={drive_file_id}");
    println!("Model not found. Downloading...");
    log_info!("[MODEL] {} not found, fetching {}", model_file, url);

    let part_file = PathBuf::from(format!("{model_file}.part"));
    download_to(&url, &part_file).with_context(|| format!("downloading {url}"))?;
    fs::rename(&part_file, &dest)
        .with_context(|| format!("renaming {} into place", part_file.display()))?;

    println!("Model downloaded.");
    Ok(dest)
}

fn download_to(url: &str, part_file: &Path) -> anyhow::Result<()> {
    let resp = ureq::get(url)
        .set("User-Agent", "Mozilla/5.0 (compatible; WheatDiseaseWeb/1.0)")
        .call()
        .context("download request failed")?;

    let mut file = fs::File::create(part_file)
        .with_context(|| format!("creating {}", part_file.display()))?;

    // Stream in 64KB chunks
    let mut reader = resp.into_reader();
    let mut buf = [0u8; 65536];
    let mut downloaded: u64 = 0;
    loop {
        let n = reader.read(&mut buf).context("read error during download")?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).context("write error during download")?;
        downloaded += n as u64;
    }

    log_info!("[MODEL] Downloaded {} bytes", downloaded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_file_skips_download() {
        let path = std::env::temp_dir().join("wheat_model_present.onnx");
        fs::write(&path, b"artifact").unwrap();

        // The drive id is never dereferenced when the file is already there
        let result = ensure_model(path.to_str().unwrap(), "unused-id").unwrap();
        assert_eq!(result, path);
        assert!(!path.with_extension("onnx.part").exists());

        fs::remove_file(&path).unwrap();
    }
}
