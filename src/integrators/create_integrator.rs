use super::path::*;
use crate::core::integrator::*;
use crate::core::scene::*;

use std::sync::Arc;

/// Integrator a device uses for a scene. Both shading systems run the same
/// path tracer; surface programs arrive already compiled.
pub fn create_integrator(scene: &Scene) -> Arc<dyn Integrator> {
    return Arc::new(create_path_integrator(&scene.integrator));
}
