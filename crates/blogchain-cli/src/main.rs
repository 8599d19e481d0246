use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use blogchain_core::app::{App, AppBuilder};
use blogchain_core::config::BlogchainConfig;
use blogchain_core::domain::{Blog, BlogEntryField, BlogField};
use blogchain_core::impls::InMemoryLedger;
use blogchain_core::ports::{Clock, IdGenerator, SystemClock, UlidGenerator};

#[derive(Debug, Parser)]
#[command(name = "blogchain", about = "Blog CRUD with ledger mirroring")]
struct Cli {
    /// TOML config file. BLOGCHAIN_* env vars override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Force JSON log output.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a blog and an entry, delete the entry, and report counts.
    Scenario,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config, cli.log_json);

    match cli.command {
        Command::Scenario => scenario(config).await,
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<BlogchainConfig> {
    let config = match path {
        Some(path) => BlogchainConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BlogchainConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn init_tracing(config: &BlogchainConfig, force_json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.filter.as_str()));
    if force_json || config.log.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn scenario(config: BlogchainConfig) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ids: Arc<dyn IdGenerator> = Arc::new(UlidGenerator::new(clock.clone()));
    let ledger = Arc::new(InMemoryLedger::new(
        config.ledger.channel_name.clone(),
        ids.clone(),
        clock.clone(),
    ));

    let app = AppBuilder::new()
        .config(config)
        .clock(clock)
        .id_generator(ids)
        .ledger(ledger.clone())
        .build()?;

    // (A) 記事の紐付け先になる blog を 1 件用意
    let mut blogs = app.blog_list();
    blogs.load().await?;
    let mut form = blogs.click_create();
    form.set_fields([
        BlogField::Name("blogchain notes".into()),
        BlogField::Handle("bc".into()),
    ])?;
    let blog = blogs.save_form(&mut form).await?;
    info!(id = %blog.id, "blog created");

    // (B) blog entry の作成
    let before = create_entry(&app, &blog.fields).await?;

    // (C) 最後の行を削除
    let mut entries = app.blog_entry_list();
    entries.load().await?;
    let Some(mut dialog) = entries.click_last_delete() else {
        bail!("no blog entry to delete");
    };
    println!("{}", dialog.title());
    let deleted = entries.confirm_delete(&mut dialog).await?;
    let after = entries.count_delete_affordances();
    if after != before {
        bail!("expected {before} entries after delete, found {after}");
    }
    info!(id = %deleted, "blog entry deleted");

    for alert in blogs.take_alerts().into_iter().chain(entries.take_alerts()) {
        println!("[{:?}] {} {}", alert.level, alert.key, alert.param.unwrap_or_default());
    }

    let counts = app.counts().await?;
    println!("counts: {}", serde_json::to_string(&counts)?);
    if app.config().ledger.enabled {
        let txs = ledger.transactions().await;
        println!("ledger {}: {} transactions", ledger.channel(), txs.len());
        for tx in txs {
            println!("  {} {:?} {}", tx.id, tx.op, tx.entity);
        }
    }
    Ok(())
}

/// Create one entry through the list and return the row count before it.
async fn create_entry(app: &App, blog: &Blog) -> Result<usize> {
    let mut entries = app.blog_entry_list();
    entries.load().await?;
    let before = entries.count_delete_affordances();

    let mut form = entries.click_create();
    println!("{}", form.title());

    let last_blog = app.blogs().list().await?.pop().map(|record| record.id);
    form.set_fields([
        BlogEntryField::Title(format!("first post on {}", blog.name)),
        BlogEntryField::Content("hello ledger".into()),
        BlogEntryField::date_input("2001-01-01T02:30")?,
        BlogEntryField::Blog(last_blog),
    ])?;
    let entry = entries.save_form(&mut form).await?;

    let after = entries.count_delete_affordances();
    if after != before + 1 {
        bail!("expected {} entries after save, found {after}", before + 1);
    }
    info!(
        id = %entry.id,
        date = %entry.fields.date_input().unwrap_or_default(),
        save_present = form.is_save_present(),
        "blog entry created"
    );
    Ok(before)
}
