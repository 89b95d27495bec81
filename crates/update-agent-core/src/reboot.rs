use crate::io::read_trimmed_lines;
use crate::status::RebootInfo;
use std::path::Path;

/// Report whether the host is waiting for a reboot, and which packages asked
/// for it.
///
/// The flag file alone decides `required`; the package list is best-effort
/// detail and an unreadable list just means no names.
pub fn inspect_reboot(flag_file: &Path, pkgs_file: &Path) -> RebootInfo {
    if !flag_file.exists() {
        return RebootInfo::default();
    }

    let packages = match read_trimmed_lines(pkgs_file) {
        Ok(packages) => packages,
        Err(e) => {
            tracing::debug!(path = %pkgs_file.display(), error = %e, "reboot package list unavailable");
            Vec::new()
        }
    };

    RebootInfo {
        required: true,
        packages,
    }
}
