//! Host network interface discovery for the localhost provider.

use std::path::Path;

use anyhow::{Context, Result};

const SYS_CLASS_NET: &str = "/sys/class/net";

/// Names of physical network interfaces, sorted.
///
/// An interface is physical when its sysfs entry has a `device` link;
/// bridges, veths and loopback do not.
///
/// # Errors
///
/// Returns an error if the sysfs directory cannot be listed.
pub fn physical_interfaces() -> Result<Vec<String>> {
    interfaces_under(Path::new(SYS_CLASS_NET))
}

fn interfaces_under(root: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = std::fs::read_dir(root)
        .with_context(|| format!("listing {}", root.display()))?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().join("device").exists())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Ok(names)
}
