use std::path::Path;

use anyhow::{bail, Context, Result};
use seija_client::AppContext;
use seija_shared::wire::NewCategory;

use super::print_json;
use crate::utils;

pub async fn create_category(app: &AppContext, category: &NewCategory) -> Result<()> {
    if !app.auth.is_admin() {
        bail!("creating categories requires an admin session");
    }
    let response = app
        .client
        .create_category(category)
        .await
        .context("failed to create category")?;
    print_json(&response)
}

pub async fn stats(app: &mut AppContext) -> Result<()> {
    let AppContext {
        auth,
        admin,
        ..
    } = app;
    if admin.fetch_statistics(auth).await.is_none() {
        bail!("statistics unavailable: {:?}", admin.state());
    }
    match admin.stats() {
        Some(stats) => print_json(stats),
        None => bail!("statistics unavailable"),
    }
}

pub async fn upload(app: &AppContext, file: &Path) -> Result<()> {
    if app.client.token().is_none() {
        bail!("please login to upload files (run `seija login`)");
    }
    let upload = utils::load_upload(file)?;
    tracing::info!("uploading {} ({} bytes encoded)", upload.filename, upload.file.len());
    let response = app
        .client
        .upload_file(&upload)
        .await
        .with_context(|| format!("failed to upload {}", file.display()))?;
    print_json(&response)
}
