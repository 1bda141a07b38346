#![warn(unused_extern_crates)]
use anyhow::{Error, Result};
use clap::{Args, Parser};
use emojify::batch::{self, Job};
use emojify::detection::recorded::RecordedDetector;
use emojify::{
    AssetLookup, Composition, Compositor, Detector, EmojiAsset, EmojiAssets, EmojiCategory, Outcome,
};
use image::DynamicImage;
use num_cpus::get as get_cpu_count;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, debug, info, span, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CmdArgs {
    /// Images to emojify
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Recorded face detections, one per input. Defaults to <input>.faces.json
    #[arg(short, long, num_args = 1..)]
    faces: Vec<PathBuf>,

    #[command(flatten)]
    out: Out,

    /// Directory holding one PNG per emoji category
    #[arg(short, long, value_name = "DIR", default_value = "assets")]
    assets: PathBuf,

    /// Emoji drawn when a face is missing expression signals. Defaults to the smile asset
    #[arg(long, value_name = "FILE")]
    fallback: Option<PathBuf>,

    /// Emoji size relative to the face bounding box
    #[arg(short, long, default_value = "1.0")]
    scale: f32,

    /// Outline detected faces
    #[arg(long)]
    trace: bool,

    #[arg(short, long)]
    max_threads: Option<usize>,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
struct Out {
    /// Write the single input's result to this path
    #[arg(group = "dest", short, long)]
    output: Option<PathBuf>,

    /// Write every result into this directory. Defaults to alongside each input
    #[arg(group = "dest", short = 'd', long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env();
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let args = CmdArgs::parse();

    if args.out.output.is_some() && args.input.len() != 1 {
        return Err(Error::msg("--output requires exactly one input, use --out-dir"));
    }
    if !args.faces.is_empty() && args.faces.len() != args.input.len() {
        return Err(Error::msg(format!(
            "Got {} face recordings for {} inputs",
            args.faces.len(),
            args.input.len()
        )));
    }

    let assets = EmojiAssets::load_dir(&args.assets)?;
    let fallback = match &args.fallback {
        Some(path) => EmojiAsset::open(path)?,
        None => assets.lookup(EmojiCategory::Smile).clone(),
    };
    let compositor = Compositor::new(&assets, &fallback)
        .with_scale(args.scale)?
        .with_trace(args.trace);

    let start = Instant::now();
    let mut jobs = Vec::with_capacity(args.input.len());
    for (idx, input) in args.input.iter().enumerate() {
        let faces_path = match args.faces.get(idx) {
            Some(p) => p.clone(),
            None => default_faces_path(input),
        };
        jobs.push(load_job(input, &faces_path)?);
    }
    debug!("Loaded {} images in {:?}", jobs.len(), start.elapsed());

    let results: Vec<Composition<DynamicImage>> = if jobs.len() == 1 {
        jobs.into_iter()
            .map(|job| compositor.compose_dynamic(&job.image, &job.faces))
            .collect()
    } else {
        let total_threads = get_cpu_count();
        let threads = args.max_threads.unwrap_or(total_threads).min(total_threads);
        batch::compose_all(&compositor, jobs, threads)
    };
    debug!("Composed in {:?}", start.elapsed());

    for (input, result) in args.input.iter().zip(results) {
        let dest = output_path(input, &args.out);
        save(input, &dest, result)?;
    }

    Ok(())
}

fn load_job(input: &Path, faces_path: &Path) -> Result<Job> {
    let span = span!(Level::DEBUG, "load_job");
    let _guard = span.enter();

    let image = image::open(input)?;
    let detector = RecordedDetector::open(faces_path)?;
    let faces = detector.detect(&image)?;
    debug!("{} faces on {input:?}", faces.len());

    Ok(Job { image, faces })
}

fn save(input: &Path, dest: &Path, result: Composition<DynamicImage>) -> Result<()> {
    match result.outcome {
        Outcome::NoFaceDetected => warn!("No face detected on {input:?}"),
        Outcome::Composed { drawn, fallbacks } => {
            info!("Drew {drawn} emoji on {input:?} ({fallbacks} fallbacks)")
        }
    }

    result.image.save(dest)?;
    info!("Result at {dest:?}");
    Ok(())
}

fn default_faces_path(input: &Path) -> PathBuf {
    let mut path = OsString::from(input.as_os_str());
    path.push(".faces.json");
    path.into()
}

fn output_path(input: &Path, out: &Out) -> PathBuf {
    if let Some(output) = &out.output {
        return output.clone();
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let name = format!("{stem}.emojified.png");

    match &out.out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_faces_path() {
        assert_eq!(
            default_faces_path(Path::new("photos/group.jpg")),
            PathBuf::from("photos/group.jpg.faces.json")
        );
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("photos/group.jpg");

        let beside = Out {
            output: None,
            out_dir: None,
        };
        assert_eq!(
            output_path(input, &beside),
            PathBuf::from("photos/group.emojified.png")
        );

        let in_dir = Out {
            output: None,
            out_dir: Some(PathBuf::from("out")),
        };
        assert_eq!(
            output_path(input, &in_dir),
            PathBuf::from("out/group.emojified.png")
        );

        let explicit = Out {
            output: Some(PathBuf::from("result.png")),
            out_dir: None,
        };
        assert_eq!(output_path(input, &explicit), PathBuf::from("result.png"));
    }

    #[test]
    fn test_args() {
        use clap::CommandFactory;
        CmdArgs::command().debug_assert();
    }
}
