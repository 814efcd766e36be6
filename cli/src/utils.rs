use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use base64::Engine as _;
use seija_shared::{forms::FieldErrors, wire::UploadRequest};

/// MIME type guessed from the file extension.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("txt" | "md") => "text/plain",
        _ => "application/octet-stream",
    }
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Read `path` into the `{file, filename}` body of `POST /upload`.
pub fn load_upload(path: &Path) -> Result<UploadRequest> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid file name: {}", path.display()))?
        .to_string();
    Ok(UploadRequest {
        file: data_url(guess_mime(path), &bytes),
        filename,
    })
}

/// Body text given inline or through a file; exactly one must be present.
pub fn read_content(inline: Option<String>, file: Option<&Path>) -> Result<String> {
    match (inline, file) {
        (Some(content), None) => Ok(content),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read content file {}", path.display())),
        (Some(_), Some(_)) => bail!("pass either --content or --content-file, not both"),
        (None, None) => bail!("missing article content: pass --content or --content-file"),
    }
}

/// One `field: message` line per invalid field.
pub fn describe_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {message}", field.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}
