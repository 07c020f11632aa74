//! Sequence Builder CLI
//!
//! 시퀀스 카탈로그 패킹 / 검증 / 시뮬레이션 도구

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use sequence_builder::{CatalogMetadata, SchemaKind};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "sequence_builder")]
#[command(about = "Pack, inspect and simulate bot command sequences", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Pack a JSON/YAML catalog into MsgPack+LZ4
    Build {
        /// Input catalog (.json / .yaml / .yml)
        #[arg(long)]
        r#in: PathBuf,

        /// Output MsgPack+LZ4 file path
        #[arg(long)]
        out: PathBuf,

        /// Schema version (e.g., "v1")
        #[arg(long, default_value = "v1")]
        schema_version: String,

        /// Verify pack after building
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Check a pack against its checksum and decode it
    Verify {
        /// Pack file path
        #[arg(long)]
        file: PathBuf,

        /// Expected SHA256 checksum
        #[arg(long, conflicts_with = "metadata")]
        checksum: Option<String>,

        /// Metadata JSON written by `build`
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Print the built-in presets
    Presets {
        /// Single preset to print
        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Print a JSON schema for authored files
    Schema {
        #[arg(long, value_enum, default_value = "template")]
        kind: SchemaKind,
    },

    /// Run a sequence against a frame trace and print the inputs per tick
    Simulate {
        /// Preset name
        #[arg(long, conflicts_with = "template")]
        preset: Option<String>,

        /// Template file (.json / .yaml / .yml)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Extra presets layered over the built-ins
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Per-tick game state; default is a quiet frame every tick
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Scheduler config file
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "600")]
        max_ticks: u64,

        /// Print the report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { r#in, out, schema_version, verify, metadata } => {
            println!("🔨 Building sequence pack...");
            println!("   Input:  {}", r#in.display());
            println!("   Output: {}", out.display());
            println!("   Schema: {}", schema_version);

            let meta = sequence_builder::build_catalog(&r#in, &out, &schema_version)?;

            print_metadata(&meta);

            if verify {
                verify_pack_integrity(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }

        Commands::Verify { file, checksum, metadata } => {
            let expected = match (checksum, metadata) {
                (Some(checksum), _) => checksum,
                (None, Some(path)) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
                    let meta: CatalogMetadata =
                        serde_json::from_str(&text).context("Failed to parse metadata")?;
                    meta.checksum
                }
                (None, None) => anyhow::bail!("Pass --checksum or --metadata"),
            };

            verify_pack_integrity(&file, &expected)?;
            let catalog = sequence_builder::load_catalog(&file, Some(&expected))?;
            println!("   Presets: {}", catalog.len());
            for name in catalog.names() {
                println!("   - {}", name);
            }
        }

        Commands::Presets { name, format } => {
            let catalog = bc_core::SequenceCatalog::builtin();
            let text = match name {
                Some(name) => render(catalog.require(&name)?, format)?,
                None => render(catalog, format)?,
            };
            println!("{}", text);
        }

        Commands::Schema { kind } => {
            println!("{}", sequence_builder::schema_json(kind)?);
        }

        Commands::Simulate { preset, template, catalog, trace, config, max_ticks, json } => {
            let template = sequence_builder::resolve_template(
                preset.as_deref(),
                template.as_deref(),
                catalog.as_deref(),
            )?;
            let trace = match trace {
                Some(path) => bc_core::FrameTrace::from_path(&path)
                    .with_context(|| format!("Failed to load trace: {}", path.display()))?,
                None => bc_core::FrameTrace::default(),
            };
            let config = match config {
                Some(path) => bc_core::SchedulerConfig::from_path(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?,
                None => bc_core::SchedulerConfig::default(),
            };

            let report = bc_core::simulate(&template, &trace, &config, max_ticks);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for input in &report.events {
                    println!("{}", input);
                }
                match (report.completed_at, report.clear_reason) {
                    (Some(tick), _) => println!("\n✅ Completed at tick {}", tick),
                    (None, Some(reason)) => {
                        println!("\n⚠️  Cleared: {:?} after {} ticks", reason, report.ticks_run)
                    }
                    (None, None) => {
                        println!("\n⏱️  Still running after {} ticks", report.ticks_run)
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn render<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &CatalogMetadata) {
    println!("\n✅ Pack built successfully!");
    println!("   Presets:         {}", meta.preset_count);
    println!(
        "   Original size:   {} bytes ({:.2} KB)",
        meta.original_size,
        meta.original_size as f64 / 1024.0
    );
    println!(
        "   Compressed size: {} bytes ({:.2} KB)",
        meta.compressed_size,
        meta.compressed_size as f64 / 1024.0
    );
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn verify_pack_integrity(pack_path: &Path, checksum: &str) -> Result<()> {
    println!("\n🔍 Verifying pack integrity...");
    if sequence_builder::verify_catalog(pack_path, checksum)? {
        println!("✅ Pack verification passed");
        Ok(())
    } else {
        anyhow::bail!("❌ Pack verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn save_metadata(path: &Path, meta: &CatalogMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)
        .with_context(|| format!("Failed to write metadata: {}", path.display()))?;
    println!("\n📄 Metadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("sequence_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
