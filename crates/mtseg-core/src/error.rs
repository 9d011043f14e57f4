use thiserror::Error;

#[derive(Error, Debug)]
pub enum MtsegError {
    #[error("Invalid grid dimensions: {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("Non-finite pixel value at ({row}, {col})")]
    NonFinitePixel { row: usize, col: usize },

    #[error("Background model is {model_width}x{model_height} but grid is {width}x{height}")]
    ModelDimensionMismatch {
        model_width: usize,
        model_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Invalid background model: {0}")]
    InvalidModel(String),

    #[error("Tree attributes must be computed before filtering")]
    MissingAttributes,
}

pub type Result<T> = std::result::Result<T, MtsegError>;
