// ============================================
// voxel-save - Утилита для директорий сохранений
// ============================================

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use ultraviolet::Vec3;

use voxel_save::core::{SaveSettings, DEFAULT_CHUNK_HEIGHT, DEFAULT_CHUNK_WIDTH};
use voxel_save::save::{GameFile, SaveError, Screenshot};
use voxel_save::world::SimulationState;

#[derive(Parser)]
#[command(about = "Create and inspect voxel world save directories")]
struct Cli {
    /// Write/read plain (uncompressed) sub-documents
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a small flat world and save it
    Demo {
        dir: PathBuf,
        /// Radius of the generated area in chunks
        #[arg(long, default_value_t = 1)]
        radius: i32,
        /// Also write a preview.png next to the save
        #[arg(long)]
        screenshot: bool,
    },
    /// Load a save and print a summary
    Inspect { dir: PathBuf },
    /// List saves under a root directory (defaults to VOXEL_SAVE_DIR)
    List { root: Option<PathBuf> },
}

fn demo(dir: &Path, radius: i32, screenshot: bool, compressed: bool) -> Result<(), SaveError> {
    let mut state = SimulationState::flat(DEFAULT_CHUNK_WIDTH, DEFAULT_CHUNK_HEIGHT, radius, 60);
    state.camera.look_at(Vec3::new(0.0, 80.0, -20.0), Vec3::new(0.0, 60.0, 0.0));

    let miner = state.components.spawn("miner");
    state.components.insert_component(miner, "position", json!([0.5, 61.0, 0.5]));
    state.components.insert_component(miner, "health", json!({ "hp": 20, "max": 20 }));

    let file = GameFile::capture("demo_overworld", &state)?;
    file.save(dir, compressed)?;

    if screenshot {
        // превью пишет внешний код, ядро его только читает
        let (w, h) = (64u32, 36u32);
        let rgba = (0..w * h)
            .flat_map(|i| {
                let y = (i / w) as u8;
                [90, 150u8.saturating_add(y), 255u8.saturating_sub(y * 2), 255]
            })
            .collect();
        if let Some(shot) = Screenshot::from_rgba(w, h, rgba) {
            shot.save_png(&dir.join("preview.png"))?;
        }
    }

    println!("saved {} chunks to {}", state.chunk_count(), dir.display());
    Ok(())
}

fn inspect(dir: &Path, compressed: bool) -> Result<(), SaveError> {
    let file = GameFile::open(dir, compressed)?;
    let Some(data) = file.data() else {
        return Err(SaveError::EmptyContainer);
    };

    let meta = &data.metadata;
    let origin = meta.world_origin();
    println!("save:        {}", dir.display());
    println!("format:      v{}", meta.format_version());
    println!("overworld:   {}", meta.overworld_file());
    println!("origin:      ({}, {}) scale {}", origin.x, origin.y, meta.world_scale());
    println!("chunk size:  {}x{}x{}", meta.chunk_width(), meta.chunk_height(), meta.chunk_width());
    println!("time of day: {:.3}", meta.time_of_day());
    println!("camera:      {:?} at {:?}", data.camera.mode, data.camera.position);
    println!("entities:    {}", data.components.len());
    println!("chunks:      {}", data.chunks.len());
    for chunk in data.chunks.iter() {
        println!("  {} - {} non-empty sections", chunk.id(), chunk.sections().len());
    }
    match &data.screenshot {
        Some(shot) => println!("screenshot:  {}x{} ({})", shot.width, shot.height, shot.source.display()),
        None => println!("screenshot:  none"),
    }
    Ok(())
}

fn list(root: Option<PathBuf>) -> Result<(), SaveError> {
    let root = root.unwrap_or_else(|| SaveSettings::from_env().saves_root);
    for save in GameFile::list_saves(&root)? {
        println!("{}", save.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let compressed = !cli.plain;

    let result = match cli.cmd {
        Command::Demo { dir, radius, screenshot } => demo(&dir, radius, screenshot, compressed),
        Command::Inspect { dir } => inspect(&dir, compressed),
        Command::List { root } => list(root),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("[SAVE] {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
