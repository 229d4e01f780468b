use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{debug, info, warn};
use nalgebra::Vector3;

use silhouette::mesh::{Contourer, DenseSize, Frame, Mesh};

/// Builds a silhouette mesh from a mask image or a synthetic frame
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mesh a grayscale image, treating bright pixels as foreground
    Mask {
        /// Input image
        #[clap(short, long)]
        input: PathBuf,

        /// Luminance at or above which a pixel is foreground
        #[clap(short, long, default_value_t = 128)]
        threshold: u8,

        /// Depth assigned to every pixel
        #[clap(long, default_value_t = 2.0)]
        depth: f32,

        #[clap(flatten)]
        settings: MeshSettings,
    },

    /// Mesh a synthetic hemisphere, as a depth camera would see it
    Disk {
        /// Frame width, in pixels
        #[clap(long, default_value_t = 512)]
        width: usize,

        /// Frame height, in pixels
        #[clap(long, default_value_t = 424)]
        height: usize,

        /// Disk radius, in pixels
        #[clap(short, long, default_value_t = 150.0)]
        radius: f32,

        #[clap(flatten)]
        settings: MeshSettings,
    },
}

#[derive(ValueEnum, Clone, Copy)]
enum CenterTest {
    Foreground,
    Inside,
}

#[derive(ValueEnum, Clone, Copy)]
enum Fitting {
    March,
    Snap,
}

#[derive(Parser)]
struct MeshSettings {
    /// Lattice stride, in pixels
    #[clap(short, long, default_value_t = 10)]
    step: usize,

    /// Near clipping depth (exclusive)
    #[clap(long, default_value_t = 0.6)]
    depth_min: f32,

    /// Far clipping depth (exclusive)
    #[clap(long, default_value_t = 4.0)]
    depth_max: f32,

    /// Test used to split ambiguous cells
    #[clap(long, value_enum, default_value_t = CenterTest::Foreground)]
    center_test: CenterTest,

    /// Boundary triangulation strategy
    #[clap(short, long, value_enum, default_value_t = Fitting::March)]
    fitting: Fitting,

    /// Name of a `.stl` or `.obj` file to write
    #[clap(short, long)]
    out: Option<PathBuf>,

    /// Number of times to mesh (for benchmarking)
    #[clap(short = 'N', default_value_t = 1)]
    n: usize,
}

impl From<&MeshSettings> for silhouette::mesh::Settings {
    fn from(s: &MeshSettings) -> Self {
        Self {
            step: s.step,
            depth_min: s.depth_min,
            depth_max: s.depth_max,
            center_test: match s.center_test {
                CenterTest::Foreground => {
                    silhouette::mesh::CenterTest::Foreground
                }
                CenterTest::Inside => silhouette::mesh::CenterTest::Inside,
            },
            fitting: match s.fitting {
                Fitting::March => silhouette::mesh::Fitting::March,
                Fitting::Snap => silhouette::mesh::Fitting::Snap,
            },
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Per-pixel input data, owned by the CLI
struct Input {
    size: DenseSize,
    foreground: Vec<bool>,
    positions: Vec<Vector3<f32>>,
}

fn load_mask(path: &Path, threshold: u8, depth: f32) -> Result<Input> {
    let img = image::open(path)
        .with_context(|| format!("could not open {path:?}"))?
        .to_luma8();
    let size = DenseSize::new(img.width() as usize, img.height() as usize);
    let mut foreground = Vec::with_capacity(size.len());
    let mut positions = Vec::with_capacity(size.len());
    for (x, y, p) in img.enumerate_pixels() {
        foreground.push(p.0[0] >= threshold);
        positions.push(Vector3::new(
            x as f32 / size.width as f32 - 0.5,
            y as f32 / size.height as f32 - 0.5,
            depth,
        ));
    }
    Ok(Input {
        size,
        foreground,
        positions,
    })
}

fn build_disk(width: usize, height: usize, radius: f32) -> Input {
    let size = DenseSize::new(width, height);
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let mut foreground = Vec::with_capacity(size.len());
    let mut positions = Vec::with_capacity(size.len());
    for y in 0..height {
        for x in 0..width {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let r2 = dx * dx + dy * dy;
            let inside = r2 < radius * radius;
            foreground.push(inside);
            positions.push(if inside {
                let dz = (radius * radius - r2).sqrt() / radius;
                Vector3::new(dx / radius, dy / radius, 2.5 - dz)
            } else {
                // Depth cameras report nothing for unmeasured pixels
                Vector3::repeat(f32::INFINITY)
            });
        }
    }
    Input {
        size,
        foreground,
        positions,
    }
}

fn run_mesh(input: &Input, settings: &MeshSettings) -> Result<Mesh> {
    let frame = Frame::new(input.size, &input.foreground, &input.positions)?;
    let mut contourer = Contourer::new(input.size, settings.into())?;
    debug!("Meshing with {:?}", contourer.settings());
    for _ in 0..settings.n {
        contourer.update(Some(&frame))?;
    }
    let stats = contourer.stats();
    if stats.unresolved > 0 {
        warn!("{} cells had unresolved crossings", stats.unresolved);
    }
    Ok(contourer.mesh().clone())
}

fn write_mesh(mesh: &Mesh, out: &Path) -> Result<()> {
    let mut file = std::fs::File::create(out)?;
    match out.extension().and_then(|e| e.to_str()) {
        Some("stl") => {
            info!("Writing STL to {out:?}");
            mesh.write_stl(&mut file)?;
        }
        Some("obj") => {
            info!("Writing OBJ to {out:?}");
            mesh.write_obj(&mut file)?;
        }
        _ => bail!("unknown mesh format for {out:?} (expected .stl or .obj)"),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();

    let args = Args::parse();
    let now = Instant::now();
    let (input, settings) = match args.cmd {
        Command::Mask {
            input,
            threshold,
            depth,
            settings,
        } => (load_mask(&input, threshold, depth)?, settings),
        Command::Disk {
            width,
            height,
            radius,
            settings,
        } => (build_disk(width, height, radius), settings),
    };
    info!(
        "Loaded {}x{} frame in {:?}",
        input.size.width,
        input.size.height,
        now.elapsed()
    );

    let start = Instant::now();
    let mesh = run_mesh(&input, &settings)?;
    info!(
        "Meshed {}x at {:?} ms/iter",
        settings.n,
        start.elapsed().as_micros() as f64 / 1000.0 / (settings.n as f64)
    );
    info!(
        "Mesh has {} vertices and {} triangles",
        mesh.vertices.len(),
        mesh.triangles.len()
    );

    if let Some(out) = &settings.out {
        write_mesh(&mesh, out)?;
    }
    Ok(())
}
