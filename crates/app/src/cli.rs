//! Command line parsing in the plain `std::env::args` style.

use anyhow::{Result, bail};

pub const USAGE: &str =
    "usage: veles3d [--size=WxH] [--gpu-backend=auto|vulkan|dx12|metal|gl] <mesh.obj>...";

#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Positional OBJ paths, in the order given.
    pub paths: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub backends: wgpu::Backends,
}

pub fn parse(args: impl Iterator<Item = String>) -> Result<Options> {
    let mut paths = Vec::new();
    let mut width = 800u32;
    let mut height = 800u32;
    let mut backends = wgpu::Backends::all();

    for arg in args {
        if let Some(val) = arg.strip_prefix("--size=") {
            match parse_size(val) {
                Some((w, h)) => {
                    width = w;
                    height = h;
                }
                None => bail!("invalid --size value '{val}': expected WxH"),
            }
        } else if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = parse_backend(val);
        } else if arg.starts_with("--") {
            log::warn!("unknown flag '{arg}', ignoring");
        } else {
            paths.push(arg);
        }
    }

    if paths.is_empty() {
        bail!("no mesh files given\n{USAGE}");
    }

    Ok(Options {
        paths,
        width,
        height,
        backends,
    })
}

fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once('x').or_else(|| value.split_once('X'))?;
    let w = w.parse().ok()?;
    let h = h.parse().ok()?;
    (w >= 1 && h >= 1).then_some((w, h))
}

fn parse_backend(value: &str) -> wgpu::Backends {
    match value.to_ascii_lowercase().as_str() {
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        other => {
            log::warn!("unknown backend '{other}', falling back to auto");
            wgpu::Backends::all()
        }
    }
}
