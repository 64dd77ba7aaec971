//! Headless entry point: fetch one document, open it, report what a shell would render.

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(name = "docview")]
#[command(about = "Fetch a document and report how the viewer would render it")]
struct Args {
    /// Id of the case/backlog document
    #[arg(allow_negative_numbers = true)]
    document_id: i64,

    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    use std::process::ExitCode;
    use std::sync::Arc;
    use std::time::Duration;

    use clap::Parser;
    use docview::{
        DocumentFetcher, DocumentReference, DocumentViewer, EnvCredentials, MemoryResourceStore,
        OpenOutcome, ReqwestTransport, ResourceLifecycleManager, ThreadTimer, ViewerConfig,
    };

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path),
        None => ViewerConfig::load_from_default_path(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    // Respects RUST_LOG if set
    let default_level = config.preferences.log_level.to_level_filter().to_string();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .filter_module("reqwest", log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();

    let transport = match ReqwestTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = Arc::new(MemoryResourceStore::new());
    let resources = ResourceLifecycleManager::new(store.clone(), Arc::new(ThreadTimer))
        .with_fallback_after(Duration::from_secs(config.preferences.fallback_release_secs));
    let fetcher = DocumentFetcher::new(Arc::new(transport), config.endpoint.clone());
    let mut viewer =
        match DocumentViewer::from_config(&config, fetcher, Arc::new(EnvCredentials), resources) {
            Ok(viewer) => viewer,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::from(2);
            }
        };

    let document = DocumentReference::new(args.document_id);
    let code = match viewer.open(document).await {
        OpenOutcome::Opened(kind) => {
            if let Some(view) = viewer.render() {
                println!("kind: {}", kind.name());
                if view.is_local {
                    let size = store
                        .get(&docview::ResourceUrl::new(view.url.as_str()))
                        .map_or(0, |resource| resource.data.len());
                    println!("location: {} ({} bytes held locally)", view.url, size);
                } else if !view.url.is_empty() {
                    println!("location: {}", view.url);
                }
                if let Some(placeholder) = view.placeholder {
                    println!("{}", placeholder);
                }
            }
            ExitCode::SUCCESS
        }
        OpenOutcome::Failed(kind) => {
            let message = viewer
                .notification()
                .map_or_else(|| kind.user_message().to_string(), |n| n.message.clone());
            eprintln!("{} ({})", message, kind.name());
            ExitCode::FAILURE
        }
        OpenOutcome::Discarded => ExitCode::FAILURE,
    };

    viewer.close();
    code
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
