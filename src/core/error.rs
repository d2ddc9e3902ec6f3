//=========================================================================
// Scene Errors
//=========================================================================
//
// Failure modes of scene construction.
//
// Scene construction is the only fallible step the core knows about. A
// failed construction propagates out of the push call site and leaves the
// scene stack untouched. Failures inside running scene phases are not
// represented here: they panic and end the process.
//
//=========================================================================

//=== SceneError ==========================================================

/// Errors raised while constructing a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A collaborator the scene needs was never registered in
    /// [`Resources`](crate::core::Resources). Carries the type name.
    MissingResource(&'static str),

    /// An asset could not be loaded.
    Asset {
        path: String,
        reason: String,
    },

    /// Any other construction failure.
    Construction(String),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingResource(name) => write!(f, "Missing resource: {}", name),
            Self::Asset { path, reason } => write!(f, "Failed to load asset '{}': {}", path, reason),
            Self::Construction(msg) => write!(f, "Scene construction failed: {}", msg),
        }
    }
}

impl std::error::Error for SceneError {}

//=========================================================================
// Unit Tests
//=========================================================================
