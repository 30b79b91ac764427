use clap::{Parser, Subcommand};
use compare_gal::config::{self, CliOverrides, GalleryConfig};
use compare_gal::imaging::RustBackend;
use compare_gal::template::{STOCK_TEMPLATE, TemplateSource};
use compare_gal::{output, pipeline};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "compare-gal")]
#[command(about = "Static comparison gallery for parallel image folders")]
#[command(long_about = "\
Static comparison gallery for parallel image folders

Each subdirectory of the gallery root is a category holding the same relative
files. The first category is the reference: its files become the rows.

Gallery structure:

  gallery/
  ├── compare.toml        # Config (optional)
  ├── comp.html           # Viewer template (optional, built-in fallback)
  ├── real/               # Category
  │   ├── img1.png
  │   └── scenes/002.png
  ├── fake/               # Category with the same relative paths
  │   ├── img1.png
  │   └── scenes/002.png
  └── thumb/              # Thumbnail cache (--thumb)

Outputs, written into the gallery root:
  index.html          grid, one row per file, one column per category
  toggle_index.html   viewer switching between categories for one file

Run 'compare-gal gen-config' to generate a documented compare.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Gallery root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Categories to use, in column order (default: every subdirectory, sorted)
    #[arg(short = 'o', long = "order", num_args = 1.., global = true)]
    order: Option<Vec<String>>,

    /// Display labels, one per category
    #[arg(long, num_args = 1.., global = true)]
    labels: Option<Vec<String>>,

    /// Show precomputed thumbnails in the grid instead of full-size files
    #[arg(long, global = true)]
    thumb: bool,

    /// Thumbnail cache directory, relative to the gallery root
    #[arg(long, global = true)]
    thumb_dir: Option<String>,

    /// Ignore the thumbnail cache and re-encode every thumbnail
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Write the grid and the viewer (default)
    Build,
    /// Write the grid page only
    Grid,
    /// Write the viewer page only
    Viewer,
    /// Print the resolved categories and files without writing anything
    Check,
    /// Print a stock compare.toml with all options documented
    GenConfig,
    /// Print the built-in viewer template
    GenTemplate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Build);

    match command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::GenTemplate => {
            print!("{}", STOCK_TEMPLATE);
            return Ok(());
        }
        _ => {}
    }

    let overrides = CliOverrides {
        categories: cli.order.clone(),
        labels: cli.labels.clone(),
        thumb: cli.thumb,
        thumb_dir: cli.thumb_dir.clone(),
    };
    let config = config::load_config(&cli.root)?.with_overrides(&overrides)?;

    println!("==> Cataloging {}", cli.root.display());
    let catalog = pipeline::load_catalog(&cli.root, &config)?;
    output::print_catalog(&catalog);

    match command {
        Command::Check => println!("==> Catalog is valid"),
        Command::Grid => run_grid(&cli.root, &config, &catalog, !cli.no_cache)?,
        Command::Viewer => run_viewer(&cli.root, &config, &catalog)?,
        Command::Build => {
            run_grid(&cli.root, &config, &catalog, !cli.no_cache)?;
            run_viewer(&cli.root, &config, &catalog)?;
            println!("==> Build complete: {}", cli.root.display());
        }
        Command::GenConfig | Command::GenTemplate => unreachable!("handled above"),
    }

    Ok(())
}

fn run_grid(
    root: &Path,
    config: &GalleryConfig,
    catalog: &compare_gal::catalog::Catalog,
    use_cache: bool,
) -> Result<(), pipeline::BuildError> {
    println!("==> Grid");
    if config.thumbnails.enabled {
        println!("Thumbnails → {}", config.thumbnails.dir);
        init_thread_pool(&config.processing);
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_thumb_event(&event));
        }
    });
    let result = pipeline::build_grid(root, config, catalog, &RustBackend::new(), use_cache, Some(tx));
    // The sender is gone once build_grid returns, so the printer drains and exits
    let _ = printer.join();
    output::print_grid_output(&result?);
    Ok(())
}

fn run_viewer(
    root: &Path,
    config: &GalleryConfig,
    catalog: &compare_gal::catalog::Catalog,
) -> Result<(), pipeline::BuildError> {
    println!("==> Viewer");
    let result = pipeline::build_viewer(root, config, catalog)?;
    if result.template == TemplateSource::BuiltIn {
        println!(
            "Note: {} not found in {}, using the built-in template",
            config.template,
            root.display()
        );
    }
    output::print_viewer_output(&result);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Never more threads than CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
