//! Spatial-reference sidecar handling.
//!
//! The shapefile format cannot embed spatial-reference metadata; it travels
//! in a `.prj` sidecar next to the geometry file. Derived datasets share the
//! base dataset's reference system, so the sidecar is copied verbatim.

use std::fs;
use std::path::Path;

use crate::error::{Result, ShpError};
use crate::paths::member_path;

/// Copy the `.prj` sidecar from the base dataset to the destination.
///
/// Both paths may carry any member-file extension (or none); the sidecar
/// extension is substituted. A missing source sidecar is a hard error: a
/// geometry dataset must not be produced without its reference system.
pub fn copy_projection(base: &Path, dest: &Path) -> Result<()> {
    let src = member_path(base, "prj");
    if !src.is_file() {
        return Err(ShpError::MissingSidecar { path: src });
    }
    fs::copy(&src, member_path(dest, "prj"))?;
    Ok(())
}
