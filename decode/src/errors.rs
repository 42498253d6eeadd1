use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Unable to read the reference metadata")]
    FileError(#[from] io::Error),

    #[error("line {line}, column {column}: expected an integer, found {value:?}")]
    InvalidField {
        line: usize,
        column: usize,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum DecodingError {
    #[error("File path not recognized: {}", .0.display())]
    UnrecognizedFilePath(PathBuf),

    #[error("An error occurred when opening the file")]
    FileError(#[from] io::Error),
}
