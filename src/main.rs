use bablic_core::{
    config,
    context::{MissingTranslationParams, TranslateStore},
    storage::{self, FileStorage},
    traits::{HttpClient, MissingTranslationHandler, TranslateLoader},
};
use bablic_http::ReqwestHttp;
use bablic_ngx::NgxSetup;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "bablic",
    version,
    about = "Bablic ngx adapter — fetch translations and report missing keys"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Site identifier, overriding `bablic.site_id`.
    #[arg(long)]
    site: Option<String>,

    /// Use the debug CDN path and staging report backend.
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the translation table for a language.
    Fetch {
        /// Language code, e.g. `fr`.
        #[arg(short, long)]
        lang: String,
    },
    /// Report keys as missing, printing the fallback rendered for each.
    Report {
        /// Language the keys are missing from.
        #[arg(short, long)]
        lang: String,
        /// Page location sent with the report.
        #[arg(long)]
        uri: Option<String>,
        /// Keys to report.
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Show the effective configuration and stored revision.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load(&cli.config)?;
    if let Some(site) = cli.site.clone() {
        cfg.bablic.site_id = site;
    }
    if cli.debug {
        cfg.bablic.is_debug = true;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.bablic.log_level)),
        )
        .init();

    let file_storage = Arc::new(FileStorage::in_dir(&cfg.bablic.data_dir_path()));

    match cli.command {
        Commands::Fetch { lang } => {
            let setup = NgxSetup::from_config(cfg)?.with_storage(file_storage);
            let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttp::new());
            let loader = setup.loader(http);

            tracing::info!("fetching {}", loader.translation_url(&lang));
            let mut tables = loader.get_translation(&lang);
            while let Some(table) = tables.next().await {
                println!("{}", serde_json::to_string_pretty(&table?)?);
            }
        }
        Commands::Report { lang, uri, keys } => {
            if let Some(uri) = uri {
                cfg.reporter.page_url = uri;
            }
            let setup = NgxSetup::from_config(cfg)?.with_storage(file_storage);
            let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttp::new());
            let handler = setup.missing_translation_handler(http)?;

            let mut store = TranslateStore::new();
            store.use_lang(lang);
            for key in &keys {
                let fallback = handler.handle(&MissingTranslationParams::new(key, None, &store));
                println!("{key} => {fallback}");
            }

            let outcome = handler.flush().await?;
            println!(
                "reported {} key(s){}",
                outcome.sent,
                if outcome.updated {
                    ", translations updated"
                } else {
                    ""
                }
            );
        }
        Commands::Status => {
            println!("Bablic ngx — Status\n");
            println!("Config: {}", cli.config);
            println!(
                "Site: {}",
                if cfg.bablic.site_id.is_empty() {
                    "(not set)"
                } else {
                    cfg.bablic.site_id.as_str()
                }
            );
            println!("Debug: {}", cfg.bablic.is_debug);
            println!("CDN host: {}", cfg.endpoints.cdn_host);
            println!("Report host: {}", cfg.report_host());
            println!("Quiet period: {:?}", cfg.reporter.quiet_period());
            println!("Storage: {}", file_storage.path().display());
            match storage::load_revision(file_storage.as_ref()) {
                Some(rev) => println!("Revision: {rev}"),
                None => println!("Revision: none"),
            }
        }
    }

    Ok(())
}
