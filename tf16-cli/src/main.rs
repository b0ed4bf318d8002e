//! # tf16-cli
//!
//! Command-line tool for working with TF16 packed tensor buffers.
//!
//! Floats are exchanged as JSON arrays, packed buffers as raw big-endian
//! bytes and encodings as JSON objects.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tf16_codec::prelude::*;
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "tf16-cli",
    version,
    about = "Command-line tool for TF16 tensor buffers",
    long_about = "Quantize float tensors into packed big-endian 16-bit buffers, decode them back, and inspect layouts and encodings."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Codec configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print byte strides and total size of a TF16 tensor
    Layout {
        /// Tensor dimensions, outermost first
        #[arg(required = true)]
        dims: Vec<u64>,
    },

    /// Quantize a JSON array of floats into a packed buffer
    Encode {
        /// JSON file holding the float values
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the packed buffer
        #[arg(short, long)]
        output: PathBuf,

        /// Where to write the encoding (JSON)
        #[arg(short, long)]
        encoding: PathBuf,

        /// Tensor dimensions the values must fill
        #[arg(short, long, value_delimiter = ',')]
        dims: Option<Vec<u64>>,
    },

    /// Decode a packed buffer into a JSON array of floats
    Decode {
        /// Packed buffer file
        #[arg(short, long)]
        input: PathBuf,

        /// Encoding file produced by `encode`
        #[arg(short, long)]
        encoding: PathBuf,

        /// Tensor dimensions the buffer must match
        #[arg(short, long, value_delimiter = ',')]
        dims: Option<Vec<u64>>,
    },

    /// Show the encoding that would be derived for a JSON array of floats
    Inspect {
        /// JSON file holding the float values
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Layout { dims } => layout_command(&dims),
        Commands::Encode { input, output, encoding, dims } => {
            encode_command(&config, &input, &output, &encoding, dims.as_deref())
        }
        Commands::Decode { input, encoding, dims } => {
            let values = decode_command(&input, &encoding, dims.as_deref())?;
            println!("{}", serde_json::to_string(&values)?);
            Ok(())
        }
        Commands::Inspect { input } => inspect_command(&config, &input),
    }
}

fn load_config(path: Option<&Path>) -> Result<CodecConfig> {
    let Some(path) = path else {
        return Ok(CodecConfig::default());
    };

    let file =
        File::open(path).with_context(|| format!("Failed to open config: {}", path.display()))?;
    let config: CodecConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    config.validate().with_context(|| "Invalid codec configuration")?;
    debug!(?config, "loaded configuration");
    Ok(config)
}

fn read_values(path: &Path) -> Result<Vec<f32>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Expected a JSON array of numbers in {}", path.display()))
}

fn layout_command(dims: &[u64]) -> Result<()> {
    let layout = TensorLayout::tf16(dims).with_context(|| "Failed to resolve layout")?;

    println!("TF16 Tensor Layout");
    println!("==================");
    println!("Dimensions: {:?}", dims);
    println!("Strides (bytes): {:?}", layout.strides());
    println!("Elements: {}", layout.element_count());
    println!("Total bytes: {}", layout.total_bytes());
    Ok(())
}

fn encode_command(
    config: &CodecConfig,
    input: &Path,
    output: &Path,
    encoding_path: &Path,
    dims: Option<&[u64]>,
) -> Result<()> {
    let values = read_values(input)?;
    let encoder = Encoder::new(*config)?;

    let (encoding, packed) = match dims {
        Some(dims) => {
            let shape = TensorShape::new(dims.to_vec())?;
            let tensor = encoder.encode_tensor(&shape, &values)?;
            info!(shape = %shape, strides = ?tensor.params.strides, "encoded with layout");
            (tensor.encoding, tensor.packed)
        }
        None => encoder.encode(&values)?,
    };

    let file = File::create(output)
        .with_context(|| format!("Failed to create file: {}", output.display()))?;
    let mut writer = PackedWriter::new(BufWriter::new(file));
    writer.write_packed(&packed)?;
    writer.flush()?;

    let file = File::create(encoding_path)
        .with_context(|| format!("Failed to create file: {}", encoding_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &encoding)?;

    info!(elements = values.len(), bytes = packed.len(), "wrote {}", output.display());
    Ok(())
}

fn decode_command(input: &Path, encoding_path: &Path, dims: Option<&[u64]>) -> Result<Vec<f32>> {
    let file = File::open(encoding_path)
        .with_context(|| format!("Failed to open file: {}", encoding_path.display()))?;
    let encoding: QuantizationEncoding = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse encoding: {}", encoding_path.display()))?;

    let file = File::open(input).with_context(|| format!("Failed to open file: {}", input.display()))?;
    let mut reader = PackedReader::new(BufReader::new(file));
    let packed = reader.read_to_end()?;

    let values = match dims {
        Some(dims) => {
            let layout = TensorLayout::tf16(dims)?;
            decode_tensor(packed.as_bytes(), &layout, &encoding)?
        }
        None => decode(packed.as_bytes(), &encoding)?,
    };

    Ok(values)
}

fn inspect_command(config: &CodecConfig, input: &Path) -> Result<()> {
    let values = read_values(input)?;
    let encoding = QuantizationEncoding::derive_with(&values, config.bitwidth, config.min_range)
        .with_context(|| format!("Cannot derive an encoding for {}", input.display()))?;

    println!("TF16 Encoding");
    println!("=============");
    println!("Elements: {}", values.len());
    println!("Bitwidth: {}", encoding.bitwidth());
    println!("Scale: {:e}", encoding.scale());
    println!("Offset: {}", encoding.offset());
    println!("Step exactly 0: {}", encoding.step_exactly_0());
    println!("Min: {}", encoding.min());
    println!("Max: {}", encoding.max());
    Ok(())
}
