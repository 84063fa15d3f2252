use log::info;
use tinyjson::JsonValue;

use crate::{
    Real,
    camera::CameraPerspective,
    constants::AUTO_CYCLE,
    json::{JsonObject, json_to_object, json_to_real, json_to_u32, json_to_vec2u},
    params::ParameterBlock,
    sdf::FractalFamily,
};

/// Frame schedule of an animated scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub frames: u32,
    pub fps: Real,
}

impl Default for Animation {
    fn default() -> Self {
        Self { frames: 1, fps: 30.0 }
    }
}

/// Everything needed to produce the [`ParameterBlock`] of each frame.
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: CameraPerspective,
    /// Block for frame 0, camera transforms included
    pub params: ParameterBlock,
    pub animation: Animation,
}

/// Accepts an index (`0..=5`, or 99 for auto-cycling), a family name, or `"auto"`.
pub fn json_to_fractal_type(value: &JsonValue) -> crate::Result<u32> {
    match value {
        JsonValue::Number(v) => {
            let index = *v as u32;
            #[allow(clippy::float_cmp)]
            let integral = *v >= 0.0 && f64::from(index) == *v;
            if integral && (index < 6 || index == AUTO_CYCLE) {
                Ok(index)
            } else {
                Err(crate::Error::UnknownFractal(v.to_string()))
            }
        }
        JsonValue::String(name) => match name.trim().to_ascii_lowercase().as_str() {
            "auto" | "auto-cycle" | "cycle" => Ok(AUTO_CYCLE),
            _ => FractalFamily::from_name(name)
                .map(FractalFamily::index)
                .ok_or_else(|| crate::Error::UnknownFractal(name.clone())),
        },
        _ => Err(crate::Error::UncoveredCaseJson("fractal type", value.clone())),
    }
}

impl Scene {
    pub fn from_json(json: &JsonObject) -> crate::Result<Self> {
        let mut camera = match json_to_object(json, "camera")? {
            Some(camera) => CameraPerspective::from_json(camera)?,
            None => CameraPerspective::default(),
        };
        // A top-level resolution overrides the camera's own
        camera.resolution = json_to_vec2u(json, "resolution", camera.resolution)?;

        let mut params = ParameterBlock::new().at_time(json_to_real(json, "time", 0.0));
        if let Some(fractal) = json_to_object(json, "fractal")? {
            if let Some(t) = fractal.get("type") {
                params = params.with_fractal_type(json_to_fractal_type(t)?);
            }
            params = params
                .with_power(json_to_real(fractal, "power", params.fractal_power))
                .with_iterations(json_to_u32(fractal, "iterations", params.fractal_iterations));
        }
        let params = camera.apply(params);

        let default = Animation::default();
        let animation = match json_to_object(json, "animation")? {
            Some(a) => Animation {
                frames: json_to_u32(a, "frames", default.frames).max(1),
                fps: json_to_real(a, "fps", default.fps).max(Real::EPSILON),
            },
            None => default,
        };

        info!(
            "Scene: {} (power {}, {} iterations), {}x{}, {} frame(s) from t={:.2}s",
            params.fractal_name(),
            params.fractal_power,
            params.fractal_iterations,
            camera.resolution.x,
            camera.resolution.y,
            animation.frames,
            params.time
        );

        Ok(Self {
            camera,
            params,
            animation,
        })
    }

    #[must_use]
    pub fn frame_time(&self, frame: u32) -> Real {
        self.params.time + frame as Real / self.animation.fps
    }

    /// Block for `frame`: same camera and fractal settings, time advanced
    #[must_use]
    pub fn frame_parameters(&self, frame: u32) -> ParameterBlock {
        self.params.at_time(self.frame_time(frame))
    }

    /// Change the output resolution and refresh the projection accordingly
    pub fn scale(&mut self, factor: f32) {
        self.camera.scale(factor);
        self.params = self.camera.apply(self.params);
    }
}

/////////////////////////
// Example scenes
fn fractal_scene(fractal: &str, position: [Real; 3], power: Real, extra: &str) -> String {
    format!(
        r#"{{
        "resolution": [640, 480],
        "camera": {{
            "position": [{}, {}, {}],
            "target": [0, 0, 0],
            "up": [0, 1, 0],
            "vfov": 45
        }},
        "fractal": {{
            "type": "{fractal}",
            "power": {power},
            "iterations": 64
        }},
        "time": 0{extra}
    }}"#,
        position[0], position[1], position[2]
    )
}

/// Built-in scenes: one per family (0..=5), then the auto-cycle (6).
pub fn create_example_scene(id: u32) -> crate::Result<JsonValue> {
    let s = match id {
        0 => fractal_scene("mandelbulb", [0.0, 0.0, -3.0], 8.0, ""),
        1 => fractal_scene("julia", [0.0, 0.0, -3.0], 8.0, ""),
        2 => fractal_scene("menger", [1.8, 1.6, -2.6], 8.0, ""),
        3 => fractal_scene("kleinian", [0.0, 0.0, -3.0], 8.0, ""),
        4 => fractal_scene("apollonian", [0.0, 0.0, -3.0], 3.0, ""),
        5 => fractal_scene("mandelbox", [0.0, 0.0, -3.0], 8.0, ""),
        6 => fractal_scene(
            "auto",
            [0.0, 0.0, -3.0],
            8.0,
            r#",
        "animation": { "frames": 150, "fps": 2 }"#,
        ),
        _ => {
            return Err(crate::Error::InvalidType(format!(
                "example_scene{id} (need to be between 0 and 6)"
            )));
        }
    };
    s.parse().map_err(|err| crate::Error::Other(Box::new(err)))
}
