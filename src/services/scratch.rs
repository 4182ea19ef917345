use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// An uploaded file parked on disk for the duration of one request.
///
/// The file is named `{uuid}.{extension}` inside the scratch directory and is
/// created exclusively. It is removed on [`ScratchFile::close`] or, failing
/// that, when the value is dropped.
#[derive(Debug)]
pub struct ScratchFile {
    id: Uuid,
    file: NamedTempFile,
}

impl ScratchFile {
    pub fn create(dir: &Path, extension: &str, contents: &[u8]) -> io::Result<Self> {
        let id = Uuid::new_v4();
        let prefix = id.to_string();
        let suffix = format!(".{}", extension);

        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .rand_bytes(0)
            .tempfile_in(dir)?;

        file.write_all(contents)?;
        file.flush()?;

        Ok(Self { id, file })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Removes the file now, reporting any error instead of ignoring it.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}
