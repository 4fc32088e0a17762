use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("topology is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("topology could not be parsed: {0}")]
    Parse(String),

    #[error("expected a Topology document, found a bare geometry")]
    NotATopology,

    #[error("topology has no object named {0:?}")]
    UnknownLayer(String),

    #[error("object {layer:?} could not be converted to features: {message}")]
    Convert { layer: String, message: String },

    #[error("feature geometry could not be converted: {0}")]
    Geometry(String),
}
