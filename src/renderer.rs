use std::{fmt::Write, ops::AddAssign};

use cgmath::Zero;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;

use crate::{
    array2d::Array2d,
    camera::CameraPerspective,
    params::ParameterBlock,
    sdf::{RaymarchStatus, SDFObject},
    shader::Shader,
    vec::{Color3, Vec2u},
};

/// Edge length of the square tiles scheduled on the thread pool
pub const BLOCKSIZE: u32 = 32;

/// Marching statistics accumulated over a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub pixels: u64,
    pub hits: u64,
    pub escaped: u64,
    pub exhausted: u64,
    /// Sum of the step counts of every pixel
    pub steps: u64,
    /// Pixels whose color had to be replaced
    pub non_finite: u64,
}

impl RenderStats {
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        self.hits as f64 / self.pixels.max(1) as f64
    }

    #[must_use]
    pub fn mean_steps(&self) -> f64 {
        self.steps as f64 / self.pixels.max(1) as f64
    }

    pub fn log(&self) {
        info!("Stats: ");
        info!(" - #pixels    : {}", self.pixels);
        info!(" - #hits      : {} ({:.1}%)", self.hits, 100.0 * self.hit_ratio());
        info!(" - #escaped   : {}", self.escaped);
        info!(" - #exhausted : {}", self.exhausted);
        info!(" - #steps/pixel: {:.2}", self.mean_steps());
        if self.non_finite > 0 {
            warn!(" - #non-finite: {}", self.non_finite);
        }
    }
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, rhs: Self) {
        self.pixels += rhs.pixels;
        self.hits += rhs.hits;
        self.escaped += rhs.escaped;
        self.exhausted += rhs.exhausted;
        self.steps += rhs.steps;
        self.non_finite += rhs.non_finite;
    }
}

/// A rendered frame and how it was obtained.
pub struct RenderedFrame {
    pub image: Array2d<Color3>,
    pub stats: RenderStats,
}

struct RenderBlock {
    pos: Vec2u,
    size: Vec2u,
    im: Array2d<Color3>,
    stats: RenderStats,
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    let progress = ProgressBar::new(len);
    if !visible {
        progress.set_draw_target(ProgressDrawTarget::hidden());
        return progress;
    }
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar}] {pos:>7}/{len:7} ({eta})",
    ) {
        progress.set_style(
            style
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                })
                .progress_chars("#>-"),
        );
    }
    progress
}

/// Render one frame of the fractal selected by `params`.
#[must_use]
pub fn render_frame(camera: &CameraPerspective, params: &ParameterBlock) -> RenderedFrame {
    info!(
        "Rendering {} at t={:.2}s ({}x{})",
        params.active_family().name(),
        params.time,
        camera.resolution.x,
        camera.resolution.y
    );
    render(&Shader::new(params), camera, true)
}

/// Evaluate `shader` for every pixel of `camera`, tile by tile in parallel.
pub fn render<S: SDFObject>(
    shader: &Shader<S>,
    camera: &CameraPerspective,
    show_progress: bool,
) -> RenderedFrame {
    let resolution = camera.resolution;

    let mut tasks = vec![];
    for x in (0..resolution.x).step_by(BLOCKSIZE as usize) {
        for y in (0..resolution.y).step_by(BLOCKSIZE as usize) {
            let size = Vec2u::new(
                (resolution.x - x).min(BLOCKSIZE),
                (resolution.y - y).min(BLOCKSIZE),
            );
            tasks.push(RenderBlock {
                pos: Vec2u::new(x, y),
                size,
                im: Array2d::with_size(size.x, size.y, Color3::zero()),
                stats: RenderStats::default(),
            });
        }
    }

    let progress = progress_bar(tasks.len() as u64, show_progress);
    tasks.par_iter_mut().for_each(|task| {
        for lx in 0..task.size.x {
            for ly in 0..task.size.y {
                let ndc = camera.pixel_to_ndc(lx + task.pos.x, ly + task.pos.y);
                let fragment = shader.fragment(ndc);

                let stats = &mut task.stats;
                stats.pixels += 1;
                stats.steps += u64::from(fragment.march.steps);
                match fragment.march.status {
                    RaymarchStatus::Hit => stats.hits += 1,
                    RaymarchStatus::Escaped => stats.escaped += 1,
                    RaymarchStatus::Exhausted => stats.exhausted += 1,
                }

                let color = fragment.color.truncate();
                *task.im.at_mut(lx, ly) = if color.x.is_finite()
                    && color.y.is_finite()
                    && color.z.is_finite()
                {
                    color
                } else {
                    stats.non_finite += 1;
                    Color3::zero()
                };
            }
        }
        progress.inc(1);
    });
    progress.finish_and_clear();

    // Assemble the final image
    let mut image = Array2d::with_size(resolution.x, resolution.y, Color3::zero());
    let mut stats = RenderStats::default();
    for task in tasks {
        stats += task.stats;
        image.blit(&task.im, task.pos.x, task.pos.y);
    }

    if stats.non_finite > 0 {
        warn!("{} pixels produced non-finite colors", stats.non_finite);
    }

    RenderedFrame { image, stats }
}

#[cfg(test)]
mod tests {
    use cgmath::EuclideanSpace;

    use super::*;
    use crate::{
        sdf::SdfSphere,
        shader::background,
        vec::{Point3, Vec2u},
    };

    fn small_camera(x: u32, y: u32) -> CameraPerspective {
        CameraPerspective {
            resolution: Vec2u::new(x, y),
            ..CameraPerspective::default()
        }
    }

    #[test]
    fn tiles_cover_odd_resolutions() {
        let camera = small_camera(45, 33);
        let params = camera.apply(ParameterBlock::new());
        let shader = Shader::with_field(&params, SdfSphere::unit());
        let frame = render(&shader, &camera, false);

        assert_eq!(frame.image.width(), 45);
        assert_eq!(frame.image.height(), 33);
        assert_eq!(frame.stats.pixels, 45 * 33);
        assert_eq!(
            frame.stats.hits + frame.stats.escaped + frame.stats.exhausted,
            frame.stats.pixels
        );
        assert!(frame.image.is_finite());
    }

    #[test]
    fn sphere_is_centered_and_corners_show_background() {
        let camera = small_camera(40, 40);
        let params = camera.apply(ParameterBlock::new());
        let shader = Shader::with_field(&params, SdfSphere::unit());
        let frame = render(&shader, &camera, false);

        assert_eq!(*frame.image.at(0, 0), background(0.0));
        assert_eq!(*frame.image.at(39, 39), background(0.0));
        assert_ne!(*frame.image.at(20, 20), background(0.0));
        assert!(frame.stats.hits > 0 && frame.stats.escaped > 0);
    }

    #[test]
    fn pixels_match_the_fragment_stage() {
        let camera = small_camera(8, 6);
        let params = camera.apply(ParameterBlock::new());
        let shader = Shader::with_field(&params, SdfSphere::new(Point3::origin(), 0.8));
        let frame = render(&shader, &camera, false);

        for (x, y) in [(0, 0), (4, 3), (7, 5)] {
            let expected = shader.fragment(camera.pixel_to_ndc(x, y)).color.truncate();
            assert_eq!(*frame.image.at(x, y), expected);
        }
    }

    #[test]
    fn fractal_frame_renders() {
        let camera = small_camera(16, 12);
        let params = camera.apply(ParameterBlock::new().with_fractal_type(2));
        let frame = render(&Shader::new(&params), &camera, false);
        assert_eq!(frame.stats.pixels, 16 * 12);
        assert!(frame.stats.hits > 0);
        assert!(frame.image.is_finite());
    }

    #[test]
    fn stats_accumulate() {
        let mut a = RenderStats {
            pixels: 2,
            hits: 1,
            escaped: 1,
            steps: 10,
            ..RenderStats::default()
        };
        let b = a;
        a += b;
        assert_eq!(a.pixels, 4);
        assert!((a.mean_steps() - 5.0).abs() < 1e-12);
        assert!((a.hit_ratio() - 0.5).abs() < 1e-12);
    }
}
