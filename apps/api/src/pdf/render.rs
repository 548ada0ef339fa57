use std::path::Path;
use std::process::Stdio;

use tempfile::TempDir;
use tokio::process::Command;

use crate::pdf::ConversionError;

const INPUT_FILE: &str = "input.pdf";
const OUTPUT_PREFIX: &str = "page";

/// Rasterizes page one of `pdf` to PNG bytes with `pdftoppm`.
///
/// Only page one is requested (`-f 1 -l 1`), so later pages are never rendered.
/// Work happens in a private temporary directory removed on return.
pub async fn render_first_page(
    binary: &Path,
    dpi: u32,
    pdf: &[u8],
) -> Result<Vec<u8>, ConversionError> {
    let workdir = TempDir::new()?;
    let input = workdir.path().join(INPUT_FILE);
    let output_prefix = workdir.path().join(OUTPUT_PREFIX);

    tokio::fs::write(&input, pdf).await?;

    let output = Command::new(binary)
        .args(first_page_args(dpi))
        .arg(&input)
        .arg(&output_prefix)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| ConversionError::Spawn {
            binary: binary.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(ConversionError::Rasterizer {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    // -singlefile drops the page-number suffix from the output name.
    let rendered = output_prefix.with_extension("png");
    match tokio::fs::read(&rendered).await {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        Ok(_) => Err(ConversionError::MissingOutput),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConversionError::MissingOutput),
        Err(e) => Err(ConversionError::Io(e)),
    }
}

fn first_page_args(dpi: u32) -> Vec<String> {
    vec![
        "-png".to_string(),
        "-r".to_string(),
        dpi.to_string(),
        "-f".to_string(),
        "1".to_string(),
        "-l".to_string(),
        "1".to_string(),
        "-singlefile".to_string(),
    ]
}
