use clap::Parser;
use std::fs;
use std::process;

use island_generator::biomes::BiomePolicy;
use island_generator::generator::{generate_island, IslandParams};
use island_generator::{export, mask, noise_field, voronoi};

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate procedural island maps with Voronoi regions and biomes")]
struct Args {
    /// Width of the map in cells
    #[arg(short = 'W', long, default_value = "300")]
    width: usize,

    /// Height of the map in cells
    #[arg(short = 'H', long, default_value = "300")]
    height: usize,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Voronoi block size, tuned per 100 cells of width
    #[arg(long, default_value = "22")]
    block_size: usize,

    /// Noise offset, x component
    #[arg(long, default_value = "5.46")]
    offset_x: f64,

    /// Noise offset, y component
    #[arg(long, default_value = "54.89")]
    offset_y: f64,

    /// Land threshold applied to the masked noise field
    #[arg(long, default_value = "0.061")]
    noise_limit: f32,

    /// Noise scale, tuned per 100 cells of width
    #[arg(long, default_value = "36.8")]
    scale: f64,

    /// Number of noise octaves
    #[arg(long, default_value = "4")]
    octaves: u32,

    /// Amplitude decay per octave
    #[arg(long, default_value = "-0.5")]
    persistence: f64,

    /// Frequency growth per octave
    #[arg(long, default_value = "2.42")]
    lacunarity: f64,

    /// Biome policy: "climate" or "random"
    #[arg(long, default_value = "climate")]
    biomes: String,

    /// Output PNG path
    #[arg(short, long, default_value = "island.png")]
    out: String,

    /// Also export the raw noise field (specify output path)
    #[arg(long)]
    export_perlin: Option<String>,

    /// Also export the radial falloff mask (specify output path)
    #[arg(long)]
    export_mask: Option<String>,

    /// Also export the raw Voronoi partition (specify output path)
    #[arg(long)]
    export_voronoi: Option<String>,

    /// Also export the final region labels (specify output path)
    #[arg(long)]
    export_labels: Option<String>,

    /// Load parameters from a JSON file (command line flags are ignored)
    #[arg(long)]
    params: Option<String>,

    /// Write the effective parameters to a JSON file and exit
    #[arg(long)]
    write_params: Option<String>,
}

fn params_from_args(args: &Args) -> Result<IslandParams, String> {
    if let Some(path) = &args.params {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path, e))?;
        return serde_json::from_str(&text)
            .map_err(|e| format!("failed to parse {}: {}", path, e));
    }

    let biome_policy = match args.biomes.as_str() {
        "climate" => BiomePolicy::Climate,
        "random" => BiomePolicy::Random,
        other => return Err(format!("unknown biome policy \"{}\"", other)),
    };

    Ok(IslandParams {
        width: args.width,
        height: args.height,
        seed: args.seed.unwrap_or(0),
        offset: (args.offset_x, args.offset_y),
        noise_limit: args.noise_limit,
        scale: args.scale,
        octaves: args.octaves,
        persistence: args.persistence,
        lacunarity: args.lacunarity,
        block_size: args.block_size,
        biome_policy,
    })
}

fn main() {
    let args = Args::parse();

    let params = match params_from_args(&args) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Some(path) = &args.write_params {
        match serde_json::to_string_pretty(&params) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    eprintln!("Failed to write parameters: {}", e);
                    process::exit(1);
                }
                println!("Parameters saved to: {}", path);
            }
            Err(e) => {
                eprintln!("Failed to serialize parameters: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("Map size: {}x{}", params.width, params.height);

    println!("Generating island...");
    let map = match generate_island(&params) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            process::exit(1);
        }
    };

    // Debug exports come after generation so they can be rendered from the
    // seed of the accepted pass; with a random or retried seed the fields
    // would otherwise not match the saved island.
    if let Some(path) = &args.export_mask {
        let field = mask::radial_mask(params.width, params.height);
        if let Err(e) = export::export_scalar(&field, path) {
            eprintln!("Failed to export mask: {}", e);
        } else {
            println!("Mask saved to: {}", path);
        }
    }

    if let Some(path) = &args.export_perlin {
        let field = noise_field::generate_perlin_noise(
            params.width,
            params.height,
            map.seed,
            params.offset,
            params.resolved_scale(),
            params.octaves,
            params.persistence,
            params.lacunarity,
        );
        if let Err(e) = export::export_scalar(&field, path) {
            eprintln!("Failed to export noise: {}", e);
        } else {
            println!("Noise field saved to: {}", path);
        }
    }

    if let Some(path) = &args.export_voronoi {
        let field = voronoi::generate_voronoi_noise(
            params.width,
            params.height,
            params.resolved_block_size(),
            map.seed,
        );
        if let Err(e) = export::export_scalar(&field, path) {
            eprintln!("Failed to export voronoi partition: {}", e);
        } else {
            println!("Voronoi partition saved to: {}", path);
        }
    }

    let land = map.labels.iter().filter(|(_, _, l)| l.is_land()).count();
    println!("Accepted landmass on pass {} with seed {}", map.passes, map.seed);
    println!(
        "Land: {} cells ({:.1}%)",
        land,
        100.0 * land as f64 / (params.width * params.height) as f64
    );
    println!("Regions: {}", map.regions.len());
    for region in map.regions.values() {
        println!(
            "  Region {}: {} cells, centroid ({}, {})",
            region.label.0,
            region.size(),
            region.centroid.0,
            region.centroid.1
        );
    }

    if let Some(path) = &args.export_labels {
        if let Err(e) = export::export_labels(&map.labels, path) {
            eprintln!("Failed to export labels: {}", e);
        } else {
            println!("Region labels saved to: {}", path);
        }
    }

    match export::export_biomes(&map.biomes, &args.out) {
        Ok(()) => println!("Island saved to: {}", args.out),
        Err(e) => {
            eprintln!("Failed to save island: {}", e);
            process::exit(1);
        }
    }
}
