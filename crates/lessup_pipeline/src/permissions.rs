//! Permission changes on written output files.

use std::io;
use std::path::Path;

/// Applies a numeric permission mode to a written file.
pub trait PermissionSetter: Send + Sync {
    /// Sets the permission bits of `path` to `mode`.
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()>;
}

/// Sets Unix permission bits; does nothing on other platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixPermissions;

impl PermissionSetter for UnixPermissions {
    #[cfg(unix)]
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        tracing::debug!(path = %path.display(), mode = format_args!("{mode:o}"), "permission modes are not supported on this platform");
        Ok(())
    }
}
