use std::fs;
use std::io::{BufReader, BufWriter, Write};

use camino::Utf8Path;
use tempfile::Builder;
use tracing::{debug, info};

use crate::error::ClusterError;
use crate::session::Session;

pub fn read_session(path: &Utf8Path) -> Result<Session, ClusterError> {
    debug!(path = %path, "reading session");
    let file = fs::File::open(path.as_std_path())
        .map_err(|err| ClusterError::Filesystem(format!("open {path}: {err}")))?;
    Session::from_json(BufReader::new(file))
}

/// Write `session` as JSON, indented by `indent` spaces or compact when
/// `None`. The file is written next to the destination and then moved over
/// it, so readers never see a partial session.
pub fn write_session(
    path: &Utf8Path,
    session: &Session,
    indent: Option<usize>,
) -> Result<(), ClusterError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| ClusterError::Filesystem(err.to_string()))?;
    let mut temp = Builder::new()
        .prefix(".session")
        .suffix(".json.tmp")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| ClusterError::Filesystem(err.to_string()))?;
    let mut writer = BufWriter::new(temp.as_file_mut());
    session.to_json(&mut writer, indent)?;
    writer
        .flush()
        .map_err(|err| ClusterError::Filesystem(err.to_string()))?;
    drop(writer);
    temp.persist(path.as_std_path())
        .map_err(|err| ClusterError::Filesystem(format!("write {path}: {err}")))?;
    info!(path = %path, organisms = session.organisms.len(), "wrote session");
    Ok(())
}
