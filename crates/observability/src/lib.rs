//! Process-wide logging setup shared by the binaries.

/// Install the JSON log subscriber. Later calls are no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_DIRECTIVES);
}

pub mod tracing;
