// depth2stereo - Render a random-dot autostereogram from a depth map
//
// Pipeline:
//   1. Load depth map (grayscale image, or MiDaS estimate with --photo)
//   2. Draw a random pattern tile, synthesize the stereogram
//   3. Colormap and save
//
// Usage: depth2stereo <image> [--out FILE] [--density N] [--levels N] [--focal F]
//                     [--seed N] [--no-center] [--config FILE] [--photo]
//                     [--colormap reds|gray] [--depth-out FILE]

mod colormap;
mod midas;
mod source;

use anyhow::{Context, Result, bail};
use colormap::Colormap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::env;
use std::path::PathBuf;
use stereogram_engine::StereoConfig;

const USAGE: &str = "Usage: depth2stereo <image> [--out FILE] [--density N] [--levels N] [--focal F] \
[--seed N] [--no-center] [--config FILE] [--photo] [--colormap reds|gray] [--depth-out FILE]";

#[derive(Debug)]
struct Args {
    input: PathBuf,
    out: PathBuf,
    depth_out: Option<PathBuf>,
    photo: bool,
    colormap: Colormap,
    config: StereoConfig,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let argv: Vec<String> = env::args().collect();
    if let Err(e) = parse_args(&argv).and_then(|args| run(&args)) {
        log::error!("{:#}", e);
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let depth = source::load(&args.input, args.photo)?;
    log::info!("Depth map {}x{}", depth.ncols(), depth.nrows());

    if let Some(path) = &args.depth_out {
        source::depth_to_image(&depth)
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote depth preview to {}", path.display());
    }

    let mut rng = match args.config.seed {
        Some(seed) => stereogram_engine::seeded_rng(seed),
        None => StdRng::from_os_rng(),
    };

    log::info!(
        "Synthesizing (density {}, levels {}, focal {})...",
        args.config.tile_density,
        args.config.quant_levels,
        args.config.focal_length
    );
    let stereo = stereogram_engine::generate(depth.view(), &args.config, &mut rng)?;

    args.colormap
        .render(&stereo)
        .save(&args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    log::info!("Wrote {}x{} stereogram to {}", stereo.ncols(), stereo.nrows(), args.out.display());
    Ok(())
}

fn parse_args(argv: &[String]) -> Result<Args> {
    let Some(input) = argv.get(1).filter(|a| !a.starts_with("--")) else {
        bail!("missing input image");
    };

    // --config is applied first so flags override it
    let mut config = match argv.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = PathBuf::from(value(argv, i)?);
            StereoConfig::load(&path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => StereoConfig::default(),
    };

    let mut args = Args {
        input: PathBuf::from(input),
        out: PathBuf::from("stereogram.png"),
        depth_out: None,
        photo: false,
        colormap: Colormap::Reds,
        config: StereoConfig::default(),
    };

    let mut i = 2;
    while i < argv.len() {
        match argv[i].as_str() {
            "--out" => { args.out = PathBuf::from(value(argv, i)?); i += 2; }
            "--depth-out" => { args.depth_out = Some(PathBuf::from(value(argv, i)?)); i += 2; }
            "--density" => { config.tile_density = number(argv, i)?; i += 2; }
            "--levels" => { config.quant_levels = number(argv, i)?; i += 2; }
            "--focal" => { config.focal_length = number(argv, i)?; i += 2; }
            "--seed" => { config.seed = Some(number(argv, i)?); i += 2; }
            "--colormap" => { args.colormap = value(argv, i)?.parse().map_err(anyhow::Error::msg)?; i += 2; }
            "--config" => i += 2,
            "--no-center" => { config.center = false; i += 1; }
            "--photo" => { args.photo = true; i += 1; }
            other => bail!("unknown argument '{}'", other),
        }
    }

    config.validate()?;
    args.config = config;
    Ok(args)
}

fn value(argv: &[String], i: usize) -> Result<&str> {
    argv.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{} expects a value", argv[i]))
}

fn number<T>(argv: &[String], i: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value(argv, i)?;
    raw.parse()
        .with_context(|| format!("{} expects a number, got '{}'", argv[i], raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> Vec<String> {
        std::iter::once("depth2stereo").chain(s.split_whitespace()).map(String::from).collect()
    }

    #[test]
    fn test_defaults() {
        let a = parse_args(&argv("depth.png")).unwrap();
        assert_eq!(a.input, PathBuf::from("depth.png"));
        assert_eq!(a.out, PathBuf::from("stereogram.png"));
        assert_eq!(a.config, StereoConfig::default());
        assert_eq!(a.colormap, Colormap::Reds);
        assert!(!a.photo);
    }

    #[test]
    fn test_flags_override() {
        let a = parse_args(&argv(
            "d.png --density 4 --levels 8 --focal 0.3 --seed 9 --no-center --photo --colormap gray --out s.png",
        ))
        .unwrap();
        assert_eq!(a.config.tile_density, 4);
        assert_eq!(a.config.quant_levels, 8);
        assert_eq!(a.config.focal_length, 0.3);
        assert_eq!(a.config.seed, Some(9));
        assert!(!a.config.center);
        assert!(a.photo);
        assert_eq!(a.colormap, Colormap::Gray);
        assert_eq!(a.out, PathBuf::from("s.png"));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_args(&argv("")).is_err());
        assert!(parse_args(&argv("d.png --density")).is_err());
        assert!(parse_args(&argv("d.png --density five")).is_err());
        assert!(parse_args(&argv("d.png --density 0")).is_err());
        assert!(parse_args(&argv("d.png --bogus")).is_err());
    }
}
