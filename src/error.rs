use thiserror::Error;

/// Errors raised while preparing shapes for intersection.
///
/// Intersection itself never fails; a miss is reported through the
/// `NO_HIT` distance instead.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("transform is not invertible (determinant {determinant})")]
    SingularTransform { determinant: f64 },
}

/// Errors raised while loading scenes and ray batches.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error(transparent)]
    Transform(#[from] KernelError),
}

pub type Result<T> = std::result::Result<T, SceneError>;
