use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use pixel_mosaic::{DeviceProfile, PortraitConfig, RunOptions, Theme};

const USAGE: &str = "Usage: pixel-mosaic <image> [--touch] [--config <file.json>] [--theme day|night]";

#[derive(Debug, PartialEq)]
struct Args {
    image: PathBuf,
    touch: bool,
    config: Option<PathBuf>,
    theme: Theme,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, String> {
    let mut image = None;
    let mut touch = false;
    let mut config = None;
    let mut theme = Theme::default();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--touch" => touch = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a file path")?;
                config = Some(PathBuf::from(path));
            }
            "--theme" => {
                let name = args.next().ok_or("--theme needs day or night")?;
                theme = name.parse()?;
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
            path => {
                if image.replace(PathBuf::from(path)).is_some() {
                    return Err("Only one image may be given".to_string());
                }
            }
        }
    }

    Ok(Args {
        image: image.ok_or("No image given")?,
        touch,
        config,
        theme,
    })
}

fn build_config(args: &Args) -> Result<PortraitConfig, pixel_mosaic::ConfigError> {
    let mut config = match &args.config {
        Some(path) => PortraitConfig::load(path)?,
        None => PortraitConfig::default(),
    };
    if args.touch && config.profile != DeviceProfile::Touch {
        let (radius, force, friction) = DeviceProfile::Touch.repulsion_tuning();
        config.profile = DeviceProfile::Touch;
        config = config
            .with_repulsion_radius(radius)
            .with_repulsion_force(force)
            .with_friction(friction);
    }
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Starting with {:?} profile, {} theme",
        config.profile,
        args.theme.name()
    );

    let options = RunOptions::new(args.image)
        .with_config(config)
        .with_theme(args.theme);

    match pixel_mosaic::run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_image_only() {
        let parsed = args(&["me.png"]).unwrap();
        assert_eq!(parsed.image, PathBuf::from("me.png"));
        assert!(!parsed.touch);
        assert_eq!(parsed.config, None);
        assert_eq!(parsed.theme, Theme::Night);
    }

    #[test]
    fn test_parse_all_options() {
        let parsed = args(&["--touch", "me.png", "--theme", "day", "--config", "c.json"]).unwrap();
        assert!(parsed.touch);
        assert_eq!(parsed.theme, Theme::Day);
        assert_eq!(parsed.config, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["a.png", "b.png"]).is_err());
        assert!(args(&["a.png", "--theme"]).is_err());
        assert!(args(&["a.png", "--theme", "dusk"]).is_err());
        assert!(args(&["a.png", "--bogus"]).is_err());
    }

    #[test]
    fn test_touch_flag_switches_tuning() {
        let parsed = args(&["me.png", "--touch"]).unwrap();
        let config = build_config(&parsed).unwrap();
        assert_eq!(config, PortraitConfig::for_profile(DeviceProfile::Touch));
    }
}
