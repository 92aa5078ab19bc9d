use anyhow::Context;
use clap::{Parser, Subcommand};
use simple_icons::{
    decode, inspect, Fill, FillOverrides, Generator, IconMatrix, Logo, Platform,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// -v for progress, -vv for encoder details
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write every icon in the matrix
    Generate {
        #[clap(flatten)]
        matrix: MatrixArgs,
        /// Source logo for logo fills
        #[clap(long, default_value = "assets/AppLogo.jpg")]
        source: PathBuf,
        /// Directory the target paths are relative to
        #[clap(long, default_value = ".")]
        out: PathBuf,
        /// Write a JSON summary of the run
        #[clap(long)]
        report: Option<PathBuf>,
    },
    /// Print the resolved matrix
    List {
        #[clap(flatten)]
        matrix: MatrixArgs,
    },
    /// Verify a PNG and print its chunks
    Inspect { file: PathBuf },
}

#[derive(clap::Args, Debug)]
struct MatrixArgs {
    /// JSON icon matrix to use instead of the built-in one
    #[clap(long)]
    manifest: Option<PathBuf>,
    /// Only generate these platforms
    #[clap(long = "platform", value_enum)]
    platforms: Vec<Platform>,
    #[clap(flatten)]
    fill: FillOverrides,
}

impl MatrixArgs {
    fn load(&self) -> anyhow::Result<IconMatrix> {
        let mut matrix = match &self.manifest {
            Some(path) => IconMatrix::load(path)?,
            None => IconMatrix::standard(Fill::default()),
        };
        matrix.retain_platforms(&self.platforms);
        matrix.fill = self.fill.apply(matrix.fill);
        Ok(matrix)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let verbosity = match args.verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();

    match args.command {
        Command::Generate {
            matrix,
            source,
            out,
            report,
        } => {
            let matrix = matrix.load()?;
            if matrix.is_empty() {
                anyhow::bail!("the icon matrix has no targets");
            }
            let mut generator = Generator::new(out);
            if matrix.needs_logo() {
                generator = generator.with_logo(Logo::open(&source)?);
                println!("Using source logo: {}", source.display());
            }

            let summary = generator.run_with(&matrix, |outcome| match &outcome.error {
                None => println!(
                    "created {} ({}x{})",
                    outcome.path.display(),
                    outcome.size,
                    outcome.size
                ),
                Some(error) => println!("failed {}: {error}", outcome.path.display()),
            });
            println!();
            println!("Icons created: {}/{}", summary.succeeded(), summary.total());
            if summary.failed() > 0 {
                println!("{} icons failed to create.", summary.failed());
            }
            if let Some(path) = report {
                summary.write_json(&path)?;
            }
        }
        Command::List { matrix } => {
            println!("{}", matrix.load()?.listing());
        }
        Command::Inspect { file } => {
            let bytes =
                std::fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            for chunk in inspect(&bytes)? {
                println!("{} {}", chunk.chunk_type, chunk.length);
            }
            let png = decode(&bytes)?;
            println!(
                "{}x{} {:?}, bit depth {}",
                png.header.width, png.header.height, png.header.color_type, png.header.bit_depth
            );
        }
    }
    Ok(())
}
