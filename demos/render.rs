use std::time::Instant;

use clap::Parser;
use fractal_march::{
    Result,
    constants::AUTO_CYCLE,
    image::image_save,
    json::{JsonObject, merge_json},
    renderer::render_frame,
    scene::{Scene, create_example_scene, json_to_fractal_type},
};
use log::{error, info};
use tinyjson::JsonValue;

#[macro_use]
extern crate scan_fmt;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene file or `example_scene%d`
    #[arg(short, long, default_value = "example_scene0")]
    input: String,

    /// Inline JSON patched over the scene
    #[arg(short = 'A', long)]
    additional_inline: Option<String>,

    /// Output image, `{}` is replaced by the frame index when animating
    #[arg(short, long, default_value = "out.png")]
    output: String,

    /// Override the scene time (seconds)
    #[arg(long)]
    time: Option<f32>,

    /// Override the fractal: index, name or `auto`
    #[arg(short, long)]
    fractal: Option<String>,

    /// Render only this many frames of an animated scene
    #[arg(long)]
    frames: Option<u32>,

    /// Log ouput
    #[arg(short, long)]
    log: Option<String>,

    /// Number of threads (0 = all cores, -N = all cores - N, N = number of threads)
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    threads: i32,

    /// Factor for image resolution
    #[arg(short, long, default_value_t = 1.0)]
    scale: f32,
}

fn frame_path(output: &str, frame: u32, frames: u32) -> String {
    if output.contains("{}") {
        output.replace("{}", &format!("{frame:04}"))
    } else if frames > 1 {
        let path = std::path::Path::new(output);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("png");
        path.with_file_name(format!("{stem}_{frame:04}.{ext}"))
            .display()
            .to_string()
    } else {
        output.to_string()
    }
}

fn parse_json(s: &str) -> Result<JsonValue> {
    s.parse()
        .map_err(|err| fractal_march::Error::Other(Box::new(err)))
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(log_out) = &args.log {
        let target = Box::new(
            std::fs::File::create(log_out).map_err(|e| fractal_march::Error::Other(Box::new(e)))?,
        );
        pretty_env_logger::formatted_builder()
            .filter_level(log::LevelFilter::Info)
            .target(env_logger::Target::Pipe(target))
            .init();
    } else {
        pretty_env_logger::formatted_builder()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    // Set number of threads
    if args.threads != 0 {
        let nbthreads = if args.threads < 0 {
            #[allow(clippy::cast_possible_wrap)]
            (num_cpus::get() as i32 + args.threads).max(1)
        } else {
            args.threads
        };
        info!("Number threads set at : {nbthreads}");
        rayon::ThreadPoolBuilder::new()
            .num_threads(nbthreads as usize)
            .build_global()
            .map_err(|e| fractal_march::Error::Other(Box::new(e)))?;
    }

    // Load scene
    let start = Instant::now();
    let mut json: JsonValue =
        if let Some(id) = scan_fmt_some!(&args.input, "example_scene{d}", u32) {
            create_example_scene(id)?
        } else {
            let contents = std::fs::read_to_string(&args.input)
                .map_err(|e| fractal_march::Error::Other(Box::new(e)))?;
            parse_json(&contents)?
        };
    let Some(json) = json.get_mut::<JsonObject>() else {
        return Err(fractal_march::Error::InvalidType(format!(
            "{} is not a JSON object",
            args.input
        )));
    };
    if let Some(add) = &args.additional_inline {
        let add = parse_json(add)?;
        let Some(add) = add.get::<JsonObject>() else {
            return Err(fractal_march::Error::InvalidType(
                "inline patch is not a JSON object".to_string(),
            ));
        };
        merge_json(json, add)?;
    }

    let mut scene = Scene::from_json(json)?;
    if let Some(time) = args.time {
        scene.params = scene.params.at_time(time);
    }
    if let Some(fractal) = &args.fractal {
        // Plain numbers are indices, anything else is a name
        let value = fractal
            .parse::<f64>()
            .map_or_else(|_| JsonValue::String(fractal.clone()), JsonValue::Number);
        scene.params = scene.params.with_fractal_type(json_to_fractal_type(&value)?);
    }
    #[allow(clippy::float_cmp)]
    if args.scale != 1.0 {
        info!("Scale image resolution by factor: {}", args.scale);
        scene.scale(args.scale);
    }
    info!("Load scene time: {:?}", start.elapsed());

    let frames = args
        .frames
        .map_or(scene.animation.frames, |f| f.clamp(1, scene.animation.frames));
    for frame in 0..frames {
        let params = scene.frame_parameters(frame);
        if params.fractal_type == AUTO_CYCLE {
            info!("Auto-cycle: {}", params.active_family().name());
        }

        let start = Instant::now();
        let rendered = render_frame(&scene.camera, &params);
        if !rendered.image.is_finite() {
            error!("Image contains INFs/NaNs");
        }
        rendered.stats.log();
        info!("Rendering time: {:?}", start.elapsed());

        image_save(&frame_path(&args.output, frame, frames), &rendered.image)?;
    }

    Ok(())
}
