use clap::{Parser, Subcommand};
use framematch::io::decode_image;
use framematch::{
    FrameCollection, ImageLibrary, MatchConfig, MatchContext, MatchData, RenderConfig, SortKey,
    Template, TemplateShape, TemplateSpec,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "framematch CLI (edge-silhouette frame matching)")]
struct Cli {
    /// Print an example `match` config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long, global = true)]
    trace: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract edges for every photo in a directory and write its store.
    Generate { dir: PathBuf },
    /// Add photos that are missing from an existing store.
    Sync { dir: PathBuf },
    /// List the stored images of a directory by path.
    List { dir: PathBuf },
    /// Search a library for a template (JSON config driven).
    Match {
        /// Path to the JSON configuration file.
        #[arg(short, long, value_name = "FILE", default_value = "config.json")]
        config: PathBuf,
    },
    /// Render a named frame collection to numbered JPEGs.
    Render {
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        name: String,
        /// Output directory; defaults to `<root>/<name>`.
        #[arg(long)]
        out: Option<PathBuf>,
        /// The `match` config the frames were built with; its template sets
        /// the canvas the placements are mapped through.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ShapeConfig {
    Rectangle { width: u32, height: u32 },
    Circle { diameter: u32 },
}

impl From<ShapeConfig> for TemplateShape {
    fn from(value: ShapeConfig) -> Self {
        match value {
            ShapeConfig::Rectangle { width, height } => TemplateShape::Rectangle { width, height },
            ShapeConfig::Circle { diameter } => TemplateShape::Circle { diameter },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TemplateConfigJson {
    /// Single-channel template image; when set, `shape` is ignored.
    path: Option<String>,
    shape: ShapeConfig,
    canvas_width: u32,
    canvas_height: u32,
    offset_x: i32,
    offset_y: i32,
    line_width: u32,
    /// Keep the canvas around the displaced shape inside the photo.
    use_context: bool,
}

impl Default for TemplateConfigJson {
    fn default() -> Self {
        let spec = TemplateSpec::default();
        let shape = match spec.shape {
            TemplateShape::Rectangle { width, height } => ShapeConfig::Rectangle { width, height },
            TemplateShape::Circle { diameter } => ShapeConfig::Circle { diameter },
        };
        Self {
            path: None,
            shape,
            canvas_width: spec.canvas_width,
            canvas_height: spec.canvas_height,
            offset_x: spec.offset_x,
            offset_y: spec.offset_y,
            line_width: spec.line_width,
            use_context: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchConfigJson {
    offset_scale_step: f32,
    offset_x_step: usize,
    offset_y_step: usize,
    min_offset_scale: f32,
    max_offset: usize,
    white_bias: f32,
    coarse_row_step: usize,
    output_width: u32,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            offset_scale_step: cfg.offset_scale_step,
            offset_x_step: cfg.offset_x_step,
            offset_y_step: cfg.offset_y_step,
            min_offset_scale: cfg.min_offset_scale,
            max_offset: cfg.max_offset,
            white_bias: cfg.white_bias,
            coarse_row_step: cfg.coarse_row_step,
            output_width: cfg.output_width,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CollectionConfig {
    root: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    library_dir: String,
    template: TemplateConfigJson,
    search: SearchConfigJson,
    /// Named collection the ranking is appended to as a new frame.
    collection: Option<CollectionConfig>,
    top_n: usize,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_dir: String::new(),
            template: TemplateConfigJson::default(),
            search: SearchConfigJson::default(),
            collection: None,
            top_n: 5,
            output_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    path: String,
    percentage: f32,
    scale: f32,
    origin_x: i32,
    origin_y: i32,
}

impl From<&MatchData> for MatchRecord {
    fn from(value: &MatchData) -> Self {
        Self {
            path: value.path.display().to_string(),
            percentage: value.percentage,
            scale: value.scale,
            origin_x: value.origin_x,
            origin_y: value.origin_y,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    best: Option<MatchRecord>,
    runs: usize,
    ranking: Vec<MatchRecord>,
    /// Index of the frame appended to the collection, if any.
    frame: Option<usize>,
}

fn build_template(cfg: &TemplateConfigJson) -> Result<Template, Box<dyn std::error::Error>> {
    if let Some(path) = &cfg.path {
        return Ok(Template::from_dynamic(&decode_image(path)?)?);
    }
    Ok(Template::draw(&TemplateSpec {
        shape: cfg.shape.into(),
        canvas_width: cfg.canvas_width,
        canvas_height: cfg.canvas_height,
        offset_x: cfg.offset_x,
        offset_y: cfg.offset_y,
        line_width: cfg.line_width,
    })?)
}

/// Frames are rendered through the canvas of the template they were
/// matched with.
fn render_config(template: &Template) -> RenderConfig {
    RenderConfig {
        canvas_width: template.width() as u32,
        canvas_height: template.height() as u32,
        ..RenderConfig::default()
    }
}

fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config_text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&config_text)?)
}

fn run_render(
    root: &Path,
    name: &str,
    out: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let template = match config {
        Some(path) => build_template(&load_config(path)?.template)?,
        None => build_template(&TemplateConfigJson::default())?,
    };
    let mut frames = FrameCollection::load_named(root, name, render_config(&template))?;
    let out = out.unwrap_or_else(|| root.join(name));
    let written = frames.write_images(&out)?;
    tracing::info!(frames = written, "frames rendered");
    println!("{written} frames written to {}", out.display());
    Ok(())
}

fn run_match(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    if config.library_dir.is_empty() {
        return Err("library_dir must be set in the config".into());
    }

    let template = build_template(&config.template)?;
    let context = config.template.use_context.then_some(MatchContext {
        offset_x: config.template.offset_x,
        offset_y: config.template.offset_y,
    });
    let search = MatchConfig {
        offset_scale_step: config.search.offset_scale_step,
        offset_x_step: config.search.offset_x_step,
        offset_y_step: config.search.offset_y_step,
        min_offset_scale: config.search.min_offset_scale,
        max_offset: config.search.max_offset,
        white_bias: config.search.white_bias,
        coarse_row_step: config.search.coarse_row_step,
        output_width: config.search.output_width,
    };

    let mut library = ImageLibrary::load(&config.library_dir)?;
    let result = library.match_to(&template, &search, context)?;
    let ranked = library.ranked_matches();
    let best = result
        .image
        .and_then(|index| library.get(index))
        .map(|image| MatchRecord::from(&MatchData::new(image.path(), &result.best)));

    let frame = match &config.collection {
        Some(collection) => {
            let dir = PathBuf::from(&collection.root).join(&collection.name);
            let render = render_config(&template);
            let mut frames = if dir.exists() {
                FrameCollection::load_named(&collection.root, &collection.name, render)?
            } else {
                FrameCollection::new(render)
            };
            frames.add_frame(ranked.clone());
            frames.save_named(&collection.root, &collection.name)?;
            Some(frames.len() - 1)
        }
        None => None,
    };

    let output = Output {
        best,
        runs: result.runs,
        ranking: ranked.iter().take(config.top_n).map(MatchRecord::from).collect(),
        frame,
    };
    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("framematch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let Some(command) = cli.command else {
        return Err("a command is required (see --help)".into());
    };
    match command {
        Command::Generate { dir } => {
            let library = ImageLibrary::generate(&dir)?;
            tracing::info!(images = library.len(), "store generated");
            println!("{} images stored in {}", library.len(), library.store_path().display());
        }
        Command::Sync { dir } => {
            let mut library = ImageLibrary::load(&dir)?;
            let added = library.sync()?;
            println!("{added} images added ({} total)", library.len());
        }
        Command::List { dir } => {
            let mut library = ImageLibrary::load(&dir)?;
            library.sort_by(SortKey::Path);
            for image in library.iter() {
                println!(
                    "{}\t{}x{}\tmode {}\tedges {}",
                    image.path().display(),
                    image.width(),
                    image.height(),
                    image.settings().mode.code(),
                    image.edges().count_edges()
                );
            }
        }
        Command::Match { config } => run_match(&config)?,
        Command::Render {
            root,
            name,
            out,
            config,
        } => run_render(&root, &name, out, config.as_deref())?,
    }

    Ok(())
}
