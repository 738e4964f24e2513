//! Entry point for ObjView.
//! Logging + CLI flags, then parse the model and hand it to the viewer loop.

use std::path::PathBuf;

use anyhow::{Context, Result};
use asset::{Geometry, ObjOptions};
use platform::ViewerConfig;

/// Shown when no model is given on the command line.
const BUILTIN_CUBE: &str = include_str!("../../../assets/cube.obj");

fn parse_backend_arg(args: &[String]) -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in args {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{}', falling back to auto.", other);
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_show_fps_arg(args: &[String]) -> bool {
    // --show-fps[=on|off], off by default
    for arg in args {
        if arg == "--show-fps" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--show-fps=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn parse_size_args(args: &[String]) -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(1280).max(1);
    let hh = h.unwrap_or(720).max(1);
    (ww, hh)
}

fn parse_rotation_speed_arg(args: &[String]) -> f32 {
    let default = ViewerConfig::default().rotation_speed;
    args.iter()
        .filter_map(|arg| arg.strip_prefix("--rotation-speed="))
        .filter_map(|v| v.parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .last()
        .unwrap_or(default)
}

fn parse_obj_options(args: &[String]) -> ObjOptions {
    args.iter()
        .filter_map(|arg| arg.strip_prefix("--tex-components="))
        .filter_map(|v| v.parse::<usize>().ok())
        .last()
        .map(ObjOptions::with_texture_components)
        .unwrap_or_default()
}

/// `--model=<path>` or the first bare argument.
fn parse_model_arg(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .find_map(|arg| arg.strip_prefix("--model="))
        .or_else(|| args.iter().map(String::as_str).find(|a| !a.starts_with("--")))
        .map(PathBuf::from)
}

fn load_model(model: Option<&PathBuf>, options: &ObjOptions) -> Result<Geometry> {
    match model {
        Some(path) => asset::load_obj_from_path_with(path, options),
        None => {
            log::info!("No model given; showing the built-in cube.");
            asset::load_obj_from_str_with(BUILTIN_CUBE, options).context("Built-in cube failed to parse")
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (width, height) = parse_size_args(&args);
    let config = ViewerConfig {
        backends: parse_backend_arg(&args),
        show_fps: parse_show_fps_arg(&args),
        width,
        height,
        rotation_speed: parse_rotation_speed_arg(&args),
        ..ViewerConfig::default()
    };
    let model = parse_model_arg(&args);
    log::info!(
        "Starting ObjView. Backend: {:?}, show_fps={}, window_size={}x{}",
        config.backends,
        config.show_fps,
        config.width,
        config.height
    );

    // A parse failure ends here, before any window exists.
    let geometry = load_model(model.as_ref(), &parse_obj_options(&args))?;
    if geometry.is_empty() {
        log::warn!("Model has no faces; nothing will be drawn.");
    }

    platform::run_viewer(config, geometry)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn backend_flag_is_case_insensitive() {
        assert_eq!(
            parse_backend_arg(&args(&["--gpu-backend=Vulkan"])),
            wgpu::Backends::VULKAN
        );
        assert_eq!(
            parse_backend_arg(&args(&["--gpu-backend=nope"])),
            wgpu::Backends::all()
        );
    }

    #[test]
    fn size_flags() {
        assert_eq!(parse_size_args(&args(&[])), (1280, 720));
        assert_eq!(parse_size_args(&args(&["--size=800X600"])), (800, 600));
        assert_eq!(
            parse_size_args(&args(&["--width=0", "--height=300"])),
            (1, 300)
        );
    }

    #[test]
    fn show_fps_flag() {
        assert!(!parse_show_fps_arg(&args(&[])));
        assert!(parse_show_fps_arg(&args(&["--show-fps"])));
        assert!(!parse_show_fps_arg(&args(&["--show-fps=off"])));
    }

    #[test]
    fn rotation_speed_flag() {
        assert_eq!(parse_rotation_speed_arg(&args(&["--rotation-speed=1.5"])), 1.5);
        assert_eq!(
            parse_rotation_speed_arg(&args(&["--rotation-speed=fast"])),
            ViewerConfig::default().rotation_speed
        );
    }

    #[test]
    fn texture_components_flag() {
        assert_eq!(parse_obj_options(&args(&[])), ObjOptions::default());
        assert_eq!(
            parse_obj_options(&args(&["--tex-components=2"])).max_texture_components,
            2
        );
    }

    #[test]
    fn model_flag_or_positional() {
        assert_eq!(parse_model_arg(&args(&["--show-fps"])), None);
        assert_eq!(
            parse_model_arg(&args(&["--show-fps", "teapot.obj"])),
            Some(PathBuf::from("teapot.obj"))
        );
        assert_eq!(
            parse_model_arg(&args(&["a.obj", "--model=b.obj"])),
            Some(PathBuf::from("b.obj"))
        );
    }

    #[test]
    fn builtin_cube_parses_with_normals() {
        let g = load_model(None, &ObjOptions::default()).expect("cube");
        assert_eq!(g.triangle_count(), 12);
        assert!(g.normals_aligned());
        assert_eq!(g.texcoords.len(), g.vertices.len());
    }

    #[test]
    fn missing_model_file_is_an_error() {
        let path = PathBuf::from("/no/such/model.obj");
        let err = load_model(Some(&path), &ObjOptions::default()).unwrap_err();
        assert!(err.to_string().contains("model.obj"));
    }
}
