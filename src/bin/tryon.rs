//! CLI for tryon - virtual try-on image generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tryon::console::Console;
use tryon::image::providers::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL};
use tryon::session::{render, Uploader};
use tryon::{
    build_prompt, Event, GeminiModel, GeminiProvider, ImageFormat, SelectedImage, Slot,
    TryOnSession, UiState,
};

#[derive(Parser)]
#[command(name = "tryon")]
#[command(about = "Dress a person photo in an outfit photo via Gemini image generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Gemini model to use
    #[arg(long, global = true, value_enum, env = "TRYON_MODEL", default_value = "nano-banana")]
    model: ModelArg,

    /// API base URL
    #[arg(long, global = true, env = "TRYON_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Environment variable holding the API key
    #[arg(long, global = true, default_value = DEFAULT_API_KEY_ENV)]
    api_key_env: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one try-on image
    Generate(GenerateArgs),

    /// Print the prompt that would be sent
    Prompt(PromptArgs),

    /// Pick images and generate interactively
    Interactive,
}

#[derive(Args)]
struct GenerateArgs {
    /// Photo of the person (face and body reference)
    #[arg(long)]
    person: PathBuf,

    /// Photo of the outfit (clothes, style, accessories)
    #[arg(long)]
    outfit: PathBuf,

    /// Extra details appended to the prompt
    #[arg(short, long, default_value = "")]
    details: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct PromptArgs {
    /// Extra details appended to the prompt
    #[arg(short, long, default_value = "")]
    details: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    NanoBanana,
    NanoBananaPro,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::NanoBanana => GeminiModel::NanoBanana,
            ModelArg::NanoBananaPro => GeminiModel::NanoBananaPro,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(ref args) => {
            generate(&cli, args).await?;
        }
        Commands::Prompt(ref args) => {
            print_prompt(args, cli.json)?;
        }
        Commands::Interactive => {
            run_console(&cli).await?;
        }
    }

    Ok(())
}

fn build_provider(cli: &Cli) -> anyhow::Result<GeminiProvider> {
    Ok(GeminiProvider::builder()
        .model(cli.model.into())
        .base_url(&cli.base_url)
        .api_key_env(&cli.api_key_env)
        .build()?)
}

async fn generate(cli: &Cli, args: &GenerateArgs) -> anyhow::Result<()> {
    let provider = build_provider(cli)?;
    let mut session = TryOnSession::new();

    for (slot, path) in [(Slot::Person, &args.person), (Slot::Outfit, &args.outfit)] {
        let image = SelectedImage::from_path(path)
            .map_err(|e| anyhow::anyhow!("could not read {}: {e}", path.display()))?;
        Uploader::for_slot(slot).select([image], &mut session.slot(slot));
    }
    session.dispatch(Event::DetailsChanged(args.details.clone()));

    let image = match session.generate(&provider).await {
        UiState::Success(image) => image.clone(),
        UiState::Failed(message) => anyhow::bail!("{message}"),
        state => anyhow::bail!("generation did not complete: {state:?}"),
    };

    if let (Some(want), Some(got)) = (
        args.output
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension),
        image.format(),
    ) {
        if want != got {
            tracing::warn!(
                "model returned {} but output path suggests {}; writing bytes unchanged",
                got.mime_type(),
                want.mime_type()
            );
        }
    }

    let size = image.save(&args.output)?;

    if cli.json {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": size,
            "mime_type": image.mime_type(),
            "model": provider.model().as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render(&session));
        println!(
            "Generated image: {} ({} bytes) via {}",
            args.output.display(),
            size,
            provider.model().as_str()
        );
    }

    Ok(())
}

fn print_prompt(args: &PromptArgs, json_output: bool) -> anyhow::Result<()> {
    let prompt = build_prompt(&args.details);
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "prompt": prompt }))?
        );
    } else {
        println!("{prompt}");
    }
    Ok(())
}

async fn run_console(cli: &Cli) -> anyhow::Result<()> {
    let provider = build_provider(cli)?;
    let mut console = Console::new(provider);
    let stdin = std::io::stdin();
    console.run(stdin.lock(), std::io::stdout()).await?;
    Ok(())
}
