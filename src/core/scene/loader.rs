use super::camera::Camera;
use super::light::*;
use super::scene::Scene;
use super::scene_params::SceneParams;
use super::sphere::Sphere;
use crate::core::prelude::*;

use log::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

fn default_fov() -> Float {
    45.0
}

fn default_up() -> Vector3f {
    Vector3f::new(0.0, 1.0, 0.0)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CameraDesc {
    width: u32,
    height: u32,
    position: Point3f,
    look_at: Point3f,
    #[serde(default = "default_up")]
    up: Vector3f,
    #[serde(default = "default_fov")]
    fov: Float,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShaderDesc {
    name: String,
    #[serde(default)]
    albedo: Spectrum,
    #[serde(default)]
    emission: Spectrum,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
enum ObjectDesc {
    Sphere {
        center: Point3f,
        radius: Float,
        shader: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
enum LightDesc {
    Background {
        color: Spectrum,
    },
    Point {
        position: Point3f,
        intensity: Spectrum,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IntegratorDesc {
    #[serde(default)]
    max_bounces: Option<u32>,
    #[serde(default)]
    sample_clamp: Option<Float>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneDesc {
    camera: CameraDesc,
    #[serde(default)]
    shaders: Vec<ShaderDesc>,
    #[serde(default)]
    objects: Vec<ObjectDesc>,
    #[serde(default)]
    lights: Vec<LightDesc>,
    #[serde(default)]
    integrator: Option<IntegratorDesc>,
}

/// Builds a scene from its JSON description.
pub fn parse_scene(json: &str, params: &SceneParams) -> Result<Scene, RenderError> {
    let desc: SceneDesc = serde_json::from_str(json)?;

    let c = &desc.camera;
    if c.width == 0 || c.height == 0 {
        return Err(RenderError::scene("camera resolution must be positive"));
    }
    if !(c.fov > 0.0 && c.fov < 180.0) {
        let msg = format!("camera fov {} out of range (0, 180)", c.fov);
        return Err(RenderError::Scene(msg));
    }
    let camera = Camera::new(c.width, c.height, &c.position, &c.look_at, &c.up, c.fov);

    let mut shader_index: HashMap<&str, usize> = HashMap::new();
    let mut shaders = Vec::with_capacity(desc.shaders.len());
    for s in desc.shaders.iter() {
        if shader_index.insert(s.name.as_str(), shaders.len()).is_some() {
            let msg = format!("duplicate shader \"{}\"", s.name);
            return Err(RenderError::Scene(msg));
        }
        shaders.push(Shader {
            name: s.name.clone(),
            albedo: s.albedo,
            emission: s.emission,
        });
    }

    let mut objects = Vec::with_capacity(desc.objects.len());
    for o in desc.objects.iter() {
        match o {
            ObjectDesc::Sphere {
                center,
                radius,
                shader,
            } => {
                let index = shader_index.get(shader.as_str()).ok_or_else(|| {
                    RenderError::Scene(format!("unknown shader \"{}\"", shader))
                })?;
                if *radius <= 0.0 {
                    let msg = format!("sphere radius must be positive, got {}", radius);
                    return Err(RenderError::Scene(msg));
                }
                objects.push(Sphere::new(center, *radius, *index));
            }
        }
    }

    let lights: Vec<Light> = desc
        .lights
        .iter()
        .map(|l| match l {
            LightDesc::Background { color } => Light::Background { color: *color },
            LightDesc::Point {
                position,
                intensity,
            } => Light::Point {
                position: *position,
                intensity: *intensity,
            },
        })
        .collect();

    let mut integrator = IntegratorSettings::default();
    if let Some(i) = desc.integrator.as_ref() {
        if let Some(max_bounces) = i.max_bounces {
            integrator.max_bounces = max_bounces;
        }
        if let Some(sample_clamp) = i.sample_clamp {
            integrator.sample_clamp = Float::max(sample_clamp, 0.0);
        }
    }

    if lights.is_empty() && shaders.iter().all(|s| s.emission.is_black()) {
        warn!("Scene has no lights and no emissive shaders; the image will be black.");
    }

    return Scene::new(&camera, &objects, &shaders, &lights, &integrator, params);
}

/// Reads and parses a JSON scene file. Every failure is a configuration
/// error so it can be reported before a session starts.
pub fn load_scene(path: &Path, params: &SceneParams) -> Result<Scene, RenderError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        RenderError::Config(format!("Failed to read scene file {:?}: {}", path, e))
    })?;
    let scene = parse_scene(&json, params)?;
    info!(
        "Loaded scene {:?}: {} objects, {} shaders, {} lights, {}x{} camera",
        path,
        scene.objects.len(),
        scene.shaders.len(),
        scene.lights.len(),
        scene.camera.width,
        scene.camera.height
    );
    return Ok(scene);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "camera": { "width": 32, "height": 16, "position": [0, 0, 0], "look_at": [0, 0, -1] },
        "shaders": [ { "name": "white", "albedo": [0.8, 0.8, 0.8] } ],
        "objects": [ { "type": "sphere", "center": [0, 0, -3], "radius": 1, "shader": "white" } ],
        "lights": [ { "type": "background", "color": [1, 1, 1] } ]
    }"#;

    #[test]
    fn test_001() {
        let scene = parse_scene(SCENE, &SceneParams::default()).unwrap();
        assert_eq!(scene.camera.width, 32);
        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.objects[0].shader, 0);
        assert_eq!(scene.integrator.max_bounces, 4);
        assert_eq!(scene.background(), Spectrum::one());
    }

    #[test]
    fn test_002() {
        let bad = SCENE.replace("\"shader\": \"white\"", "\"shader\": \"red\"");
        let err = parse_scene(&bad, &SceneParams::default()).err().unwrap();
        assert!(matches!(err, RenderError::Scene(_)));
        assert!(err.is_configuration());

        let err = parse_scene("{ not json", &SceneParams::default()).err().unwrap();
        assert!(matches!(err, RenderError::Json(_)));
        assert!(err.is_configuration());
    }
}
