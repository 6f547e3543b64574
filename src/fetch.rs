use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::{fs, path::Path, thread, time::Duration};
use tracing::{debug, info};

/// Natural Earth 1:110m admin-0 countries, the polygon dataset the figures
/// are drawn from.
pub const WORLD_ATLAS_URL: &str =
    "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_admin_0_countries.geojson";

const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Make sure the world atlas GeoJSON exists at `dest`, downloading it on
/// first run. A file that is already present is never re-fetched.
pub fn ensure_world_atlas(client: &Client, dest: &Path) -> Result<()> {
    if dest.exists() {
        debug!(path = %dest.display(), "world atlas already cached");
        return Ok(());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {:?}", parent))?;
    }

    info!(url = WORLD_ATLAS_URL, "downloading world atlas");
    let body = fetch_with_retries(client, WORLD_ATLAS_URL)?;
    fs::write(dest, &body).with_context(|| format!("writing world atlas to {:?}", dest))?;
    info!(bytes = body.len(), path = %dest.display(), "world atlas cached");
    Ok(())
}

fn fetch_with_retries(client: &Client, url: &str) -> Result<Vec<u8>> {
    let mut attempt = 0;

    // retry loop
    loop {
        attempt += 1;
        let resp = client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes());
        match resp {
            Ok(bytes) => return Ok(bytes.to_vec()),
            Err(_) if attempt < MAX_RETRIES => thread::sleep(RETRY_DELAY),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("downloading {} ({} attempts)", url, attempt))
            }
        }
    }
}
