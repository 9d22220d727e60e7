//! Metadata handle for the CAD file the user picked.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Extensions offered by the file picker. Anything else is accepted with a warning.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["stl", "step", "stp", "iges", "igs", "obj", "3mf"];

pub const SUPPORTED_FORMATS_LABEL: &str = "STL, STEP, IGES, OBJ, 3MF";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CadFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime: Option<String>,
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("{0} is not a regular file")]
    NotAFile(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CadFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name).map(str::to_string);
        Self {
            name,
            size_bytes,
            mime,
            path: path.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, FileError> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if !metadata.is_file() {
            return Err(FileError::NotAFile(name));
        }
        Ok(Self::new(name, metadata.len(), path))
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    pub fn is_supported(&self) -> bool {
        self.extension()
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

fn guess_mime(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_string_lossy().to_ascii_lowercase();
    let mime = match ext.as_str() {
        "stl" => "model/stl",
        "step" | "stp" => "model/step",
        "iges" | "igs" => "model/iges",
        "obj" => "model/obj",
        "3mf" => "model/3mf",
        _ => return None,
    };
    Some(mime)
}
