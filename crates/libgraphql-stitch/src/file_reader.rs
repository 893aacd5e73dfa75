use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Reads a UTF-8 text file (an executable document, a pipeline config, a
/// JSON response) into memory.
pub fn read_content<P: AsRef<Path>>(
    file_path: P,
) -> Result<String, ReadContentError> {
    let file_path = file_path.as_ref();
    if !file_path.is_file() {
        return Err(ReadContentError::PathIsNotAFile(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path).map_err(|err| {
        ReadContentError::FileReadError {
            file_path: file_path.to_path_buf(),
            err: err.kind(),
        }
    })?;

    String::from_utf8(bytes).map_err(|err| ReadContentError::FileDecodeError {
        file_path: file_path.to_path_buf(),
        valid_up_to: err.utf8_error().valid_up_to(),
    })
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ReadContentError {
    #[error(
        "File at {file_path:?} is not valid UTF-8 (valid up to byte \
        {valid_up_to})"
    )]
    FileDecodeError {
        file_path: PathBuf,
        valid_up_to: usize,
    },

    #[error("Failed to read file at {file_path:?}: {err}")]
    FileReadError {
        file_path: PathBuf,
        err: std::io::ErrorKind,
    },

    #[error("Path is not a file: {0:?}")]
    PathIsNotAFile(PathBuf),
}
