use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Agent defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_OUTPUT_FILE: &str = "/data/update-status.json";
pub const DEFAULT_TRIGGER_FILE: &str = "/data/trigger-refresh";
pub const DEFAULT_HOST_ROOT: &str = "/host";

// ---------------------------------------------------------------------------
// Host locations, relative to the host root mount
// ---------------------------------------------------------------------------

pub const APT_STATE_DIR: &str = "var/lib/apt";
pub const DPKG_STATUS_FILE: &str = "var/lib/dpkg/status";
pub const APT_ETC_DIR: &str = "etc/apt";
pub const APT_CACHE_DIR: &str = "var/cache/apt";

pub const REBOOT_REQUIRED_FILE: &str = "var/run/reboot-required";
pub const REBOOT_REQUIRED_PKGS_FILE: &str = "var/run/reboot-required.pkgs";

/// Index-freshness proxies, most to least preferred.
pub const FRESHNESS_CANDIDATES: &[&str] = &[
    "var/lib/apt/periodic/update-success-stamp",
    "var/cache/apt/pkgcache.bin",
    "var/lib/apt/lists",
];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn reboot_required_path(host_root: &Path) -> PathBuf {
    host_root.join(REBOOT_REQUIRED_FILE)
}

pub fn reboot_required_pkgs_path(host_root: &Path) -> PathBuf {
    host_root.join(REBOOT_REQUIRED_PKGS_FILE)
}

pub fn freshness_candidates(host_root: &Path) -> Vec<PathBuf> {
    FRESHNESS_CANDIDATES
        .iter()
        .map(|rel| host_root.join(rel))
        .collect()
}

/// The dry-run upgrade listing, pointed at the host's apt state instead of the
/// container's own.
pub fn default_upgrade_command(host_root: &Path) -> String {
    let root = host_root.display();
    format!(
        "apt-get \
         -o Dir::State={root}/{APT_STATE_DIR} \
         -o Dir::State::status={root}/{DPKG_STATUS_FILE} \
         -o Dir::Etc={root}/{APT_ETC_DIR} \
         -o Dir::Cache={root}/{APT_CACHE_DIR} \
         upgrade --dry-run 2>/dev/null | grep \"^Inst\""
    )
}
