use clap::Parser;
use gmb_sanitizer::{cli, client, config, error, orchestrator, render, sanitize, scanner};
use cli::{Cli, Commands};
use client::{HttpClient, SanitizerApi};
use config::Config;
use error::{Result, SanitizerError};
use gmb_sanitizer_common::{Session, SessionEvent, SubmissionOutcome, UiState};
use orchestrator::{DirectorySink, Orchestrator};
use render::TerminalRenderer;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn new_orchestrator(config: &Config, output: Option<PathBuf>) -> Result<Orchestrator<HttpClient>> {
    let api = HttpClient::from_config(config)?;
    let output_dir = output
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(Orchestrator::new(
        api,
        Session::new(config.form_defaults()),
        Box::new(DirectorySink::new(output_dir)),
        Box::new(TerminalRenderer::new()),
    ))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(url) = &cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    tracing::debug!(base_url = %config.base_url, "configuration loaded");

    match cli.command {
        Commands::Sanitize(args) => {
            println!("🧼 gmb-sanitizer - Sanitización\n");

            // 1. 写真の収集
            println!("[1/2] Leyendo fotos...");
            let files = scanner::collect_files(&args.paths)?;
            if files.is_empty() && !args.paths.is_empty() {
                return Err(SanitizerError::NoImagesFound(
                    args.paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                ));
            }

            let orchestrator = new_orchestrator(&config, args.output.clone())?;

            let city = if args.pick_city {
                Some(sanitize::pick_city(&HttpClient::from_config(&config)?).await?)
            } else {
                args.city.clone()
            };

            // 2. 送信
            println!("[2/2] Enviando al servicio {}...", config.base_url);
            let view = sanitize::run(&orchestrator, files, city, &args).await?;

            return Ok(match view.state {
                UiState::Done(SubmissionOutcome::Success(_)) => ExitCode::SUCCESS,
                UiState::Done(SubmissionOutcome::PartialFailure(_)) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            });
        }

        Commands::Verify { file } => {
            println!("🔍 gmb-sanitizer - Verificación EXIF\n");

            let file = scanner::load_file(&file)?;
            let orchestrator = new_orchestrator(&config, None)?;
            orchestrator.verify_file(Some(file)).await;

            if !orchestrator.verify_state().is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Cities => {
            let api = HttpClient::from_config(&config)?;
            let directory = api.fetch_cities().await?;

            println!("Ciudades ({}):", directory.len());
            for city in directory.records() {
                println!(
                    "  {} ({}) — {:.4}°, {:.4}° — Alt: {}m",
                    city.name, city.department, city.latitude, city.longitude, city.altitude
                );
            }
        }

        Commands::Preview { keyword, city } => {
            let orchestrator = new_orchestrator(&config, None)?;
            orchestrator.dispatch(SessionEvent::KeywordChanged(keyword)).await;
            if city.is_some() {
                orchestrator.change_city(city).await;
            }

            let view = orchestrator.view();
            if view.location_preview.is_none() && view.filename_preview.is_none() {
                println!("(sin vista previa)");
            }
        }

        Commands::Geocode { address, city } => {
            if address.trim().is_empty() && city.trim().is_empty() {
                return Err(SanitizerError::Config("Envía dirección o ciudad.".into()));
            }

            let api = HttpClient::from_config(&config)?;
            let location = api.geocode(&address, &city).await?;

            println!("📍 {:.6}°, {:.6}°", location.lat, location.lon);
            println!("  Alt: {}m", location.altitude);
            if !location.department.is_empty() {
                println!("  Departamento: {}", location.department);
            }
            if !location.postal_code.is_empty() {
                println!("  Código postal: {}", location.postal_code);
            }
            println!("  Fuente: {}", location.source);
        }

        Commands::Config { set_base_url, show } => {
            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ URL guardada: {}", config.base_url);
            }

            if show {
                println!("Configuración:");
                println!("  Archivo: {}", Config::config_path()?.display());
                println!("  URL: {}", config.base_url);
                println!(
                    "  Timeout: {}",
                    config
                        .timeout_seconds
                        .map(|s| format!("{}s", s))
                        .unwrap_or_else(|| "por defecto".into())
                );
                println!(
                    "  Carpeta de salida: {}",
                    config
                        .output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| ".".into())
                );
                println!("  Dispositivo: {}", config.device_id);
                println!("  Intensidad: {}", config.intensity);
                println!("  Radio de jitter: {}m", config.jitter_radius);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
