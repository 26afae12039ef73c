// specbridge/src/data/errors.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("component {0:?} has shape {1:?} but the data has shape {2:?}")]
    ShapeMismatch(String, Vec<usize>, Vec<usize>),
    #[error("a component labelled {0:?} already exists")]
    DuplicateComponent(String),
    #[error("no component labelled {0:?}")]
    UnknownComponent(String),
    #[error("component id {0} does not belong to this data object")]
    UnknownComponentId(usize),
    #[error("unknown statistic {0:?}")]
    UnknownStatistic(String),
    #[error("axis {0} is out of range for {1}-dimensional data")]
    InvalidAxis(usize, usize),
    #[error("subset mask has shape {0:?} but the data has shape {1:?}")]
    SubsetShapeMismatch(Vec<usize>, Vec<usize>),
}
