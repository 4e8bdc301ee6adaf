use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use dotenvy::dotenv;
use serde_json::json;
use tracing::{debug, error, warn};

mod catalog;
mod config;
mod generation;
mod llm;
mod prompt;
mod settings;
mod utils;

use catalog::{load_catalog, Catalog};
use config::CONFIG;
use generation::{generate, HistoryItem};
use llm::GeminiClient;
use prompt::compile;
use settings::Settings;
use utils::data_url::{data_url_mime_type, decode_data_url, encode_data_url, extension_for_mime};
use utils::logging::init_logging;

#[derive(Debug, Default, PartialEq, Eq)]
struct RunArgs {
    settings_path: Option<PathBuf>,
    prompt_file: Option<PathBuf>,
    character: Option<PathBuf>,
    background: Option<PathBuf>,
    additional: Vec<PathBuf>,
    output: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    Prompt(RunArgs),
    Generate(RunArgs),
    Categories,
}

fn usage() -> &'static str {
    "Usage:\n  \
     nano_banana_studio prompt [--settings <file>] [--character <img>] [--background <img>] [--additional <img>]...\n  \
     nano_banana_studio generate [--settings <file>] [--prompt-file <file>] [--character <img>] [--background <img>] [--additional <img>]... [--output <file>]\n  \
     nano_banana_studio categories"
}

fn next_value<'a>(args: &'a [String], index: &mut usize, flag: &str) -> Result<&'a str> {
    *index += 1;
    args.get(*index)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing value for {flag}"))
}

fn parse_args(args: &[String]) -> Result<CliCommand> {
    let Some(command) = args.get(1).map(String::as_str) else {
        bail!("{}", usage());
    };
    let generate = match command {
        "categories" => return Ok(CliCommand::Categories),
        "prompt" => false,
        "generate" => true,
        other => bail!("Unknown command '{other}'\n{}", usage()),
    };

    let mut run = RunArgs::default();
    let mut index = 2;
    while index < args.len() {
        let flag = args[index].as_str();
        match flag {
            "--settings" => run.settings_path = Some(next_value(args, &mut index, flag)?.into()),
            "--character" => run.character = Some(next_value(args, &mut index, flag)?.into()),
            "--background" => run.background = Some(next_value(args, &mut index, flag)?.into()),
            "--additional" => run
                .additional
                .push(next_value(args, &mut index, flag)?.into()),
            "--prompt-file" if generate => {
                run.prompt_file = Some(next_value(args, &mut index, flag)?.into())
            }
            "--output" if generate => run.output = Some(next_value(args, &mut index, flag)?.into()),
            other => bail!("Unknown option '{other}' for {command}\n{}", usage()),
        }
        index += 1;
    }

    Ok(if generate {
        CliCommand::Generate(run)
    } else {
        CliCommand::Prompt(run)
    })
}

fn open_catalog() -> Result<Catalog> {
    let path = &CONFIG.style_catalog_path;
    if !path.exists() {
        warn!(
            "Style catalog not found at {}; style selections will be rejected",
            path.display()
        );
        return Ok(Catalog::default());
    }
    let catalog = load_catalog(path)?;
    if catalog.is_empty() {
        warn!(
            "Style catalog at {} has no usable categories",
            path.display()
        );
    }
    Ok(catalog)
}

async fn read_image(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read reference image {}", path.display()))?;
    Ok(encode_data_url(&bytes))
}

async fn load_settings(run: &RunArgs, catalog: &Catalog) -> Result<Settings> {
    let mut settings = match &run.settings_path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read settings {}", path.display()))?;
            serde_json::from_str::<Settings>(&raw)
                .with_context(|| format!("invalid settings in {}", path.display()))?
        }
        None => Settings::default(),
    };

    if let Some(path) = &run.character {
        settings.reference_images.character = Some(read_image(path).await?);
    }
    if let Some(path) = &run.background {
        settings.reference_images.background = Some(read_image(path).await?);
    }
    for path in &run.additional {
        let image = read_image(path).await?;
        settings.reference_images.push_additional(image)?;
    }

    settings.validate(catalog)?;
    Ok(settings)
}

fn print_categories(catalog: &Catalog) {
    for category in catalog.iter() {
        println!("{} ({})", category.id, category.name);
        for option in &category.options {
            match option.group.as_deref() {
                Some(group) => println!("  {:<24} {} [{}]", option.id, option.name, group),
                None => println!("  {:<24} {}", option.id, option.name),
            }
        }
    }
}

async fn run_generate(run: RunArgs, catalog: &Catalog) -> Result<()> {
    let settings = load_settings(&run, catalog).await?;
    let prompt_override = match &run.prompt_file {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read prompt file {}", path.display()))?,
        ),
        None => None,
    };

    debug!(overridden = prompt_override.is_some(), "Prompt override loaded");

    if CONFIG.gemini_api_key.is_empty() {
        warn!("GEMINI_API_KEY is empty; the provider will reject the request");
    }

    let client = GeminiClient::from_config();
    let result = match generate(&client, &settings, catalog, prompt_override.as_deref()).await {
        Ok(result) => result,
        Err(err) => {
            error!("Image generation failed: {err}");
            if err.is_api_key_required() {
                eprintln!(
                    "The selected model ({}) needs an API key with access to it. Set GEMINI_API_KEY and try again.",
                    settings.model.as_str()
                );
            }
            return Err(err.into());
        }
    };

    let bytes = decode_data_url(&result.image_url).context("generated image is not valid base64")?;
    let mime_type = data_url_mime_type(&result.image_url)
        .unwrap_or("image/png")
        .to_string();
    let item = HistoryItem::from_result(result, settings);
    let output = run.output.unwrap_or_else(|| {
        PathBuf::from(format!("studio-{}.{}", item.id, extension_for_mime(&mime_type)))
    });
    tokio::fs::write(&output, &bytes)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    let summary = json!({
        "id": item.id,
        "timestamp": item.timestamp,
        "model": item.settings.model.as_str(),
        "output": output.display().to_string(),
        "prompt": item.prompt,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let _guards = init_logging();

    let args: Vec<String> = std::env::args().collect();
    let command = parse_args(&args)?;
    let catalog = open_catalog()?;

    match command {
        CliCommand::Categories => print_categories(&catalog),
        CliCommand::Prompt(run) => {
            let settings = load_settings(&run, &catalog).await?;
            let prompt = compile(&settings, &catalog);
            debug!(clauses = prompt.clauses().len(), "Compiled prompt");
            println!("{prompt}");
        }
        CliCommand::Generate(run) => run_generate(run, &catalog).await?,
    }
    Ok(())
}
