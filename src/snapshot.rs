//! JSON dump of the in-memory model.
//!
//! Written next to the UPPAAL XML for inspection. The dump cannot be loaded
//! by UPPAAL and is not read back by this crate.

use crate::error::NtaResult;
use crate::model::Nta;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension of model snapshot files.
pub const SNAPSHOT_EXTENSION: &str = "uppaal";

/// Write `nta` as pretty JSON to `path` with its extension replaced by
/// `.uppaal`, returning the written path.
pub fn save_model_snapshot(nta: &Nta, path: &Path) -> NtaResult<PathBuf> {
    let snapshot_path = path.with_extension(SNAPSHOT_EXTENSION);
    let file = std::fs::File::create(&snapshot_path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, nta)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %snapshot_path.display(), "Wrote model snapshot");
    Ok(snapshot_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModelBuilder;

    #[test]
    fn snapshot_replaces_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = ModelBuilder::new();
        b.new_automaton("m");
        let t = b.new_template("T");
        let l = b.new_location("", t).unwrap();
        b.set_initial_location(l, t).unwrap();
        b.set_location_comment(l, "start").unwrap();

        let path = save_model_snapshot(b.nta(), &dir.path().join("model.alf")).unwrap();
        assert_eq!(path, dir.path().join("model.uppaal"));

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["name"], "m");
        let locations = value["locations"].to_string();
        assert!(locations.contains("Location_0"));
        assert!(locations.contains("start"));
    }
}
