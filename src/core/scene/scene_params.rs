use crate::core::error::*;
use std::fmt;

/// Which shading back end surface programs were compiled for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ShadingSystem {
    #[default]
    Svm,
    Osl,
}

impl ShadingSystem {
    pub fn from_name(name: &str) -> Result<Self, RenderError> {
        match name.to_ascii_lowercase().as_str() {
            "svm" => Ok(ShadingSystem::Svm),
            "osl" => Ok(ShadingSystem::Osl),
            _ => Err(RenderError::Config(format!(
                "Unknown shading system: {}",
                name
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShadingSystem::Svm => "svm",
            ShadingSystem::Osl => "osl",
        }
    }
}

impl fmt::Display for ShadingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneParams {
    pub shading_system: ShadingSystem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_001() {
        assert_eq!(ShadingSystem::from_name("OSL").unwrap(), ShadingSystem::Osl);
        assert_eq!(ShadingSystem::from_name("svm").unwrap(), ShadingSystem::Svm);
        assert!(ShadingSystem::from_name("glsl").is_err());
    }
}
