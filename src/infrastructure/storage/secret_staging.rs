//! One-off staging file for freshly generated private keys

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::shared::errors::SwapError;
use crate::shared::utils::SECRET_STAGING_FILE;

fn staging_content(private_key: &str, chain: &str) -> String {
    let chain = chain.to_uppercase();
    [
        format!("# {} PRIVATE KEY", chain),
        "# KEEP THIS SECURE - DO NOT SHARE".to_string(),
        "# Copy this key to your .env file and then DELETE this file".to_string(),
        String::new(),
        format!("{}_PRIVATE_KEY={}", chain, private_key),
        String::new(),
        "# Instructions:".to_string(),
        "# 1. Copy the line above".to_string(),
        "# 2. Add it to ~/.occ/.env".to_string(),
        "# 3. Delete this file immediately".to_string(),
        String::new(),
    ]
    .join("\n")
}

/// Write `private_key` to `<dir>/.env.temp`, readable by the owner only.
pub fn stage_private_key(dir: &Path, private_key: &str, chain: &str) -> Result<PathBuf, SwapError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SECRET_STAGING_FILE);

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&path)?;
    file.write_all(staging_content(private_key, chain).as_bytes())?;

    // mode() only applies on creation; tighten a pre-existing file too
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(path)
}
