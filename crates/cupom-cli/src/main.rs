//! Command line front end for the coupon storefront.
//!
//! Stands in for the mobile presentation layer: lists the coupon collection
//! grouped by expiration month, shows a single coupon (recording the view in
//! the history), and drives the mocked authentication session.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cupom_client::CouponClient;
use cupom_core::{group_by_month, AppConfig, Coupon, FilterDays};
use cupom_store::{
    AuthStatus, AuthStore, CouponStore, Credentials, FileKv, HistoryStore, KeyValueStore,
    MockAuthService,
};

#[derive(Debug, Parser)]
#[command(name = "cupom")]
#[command(about = "Navegue pelos cupons de desconto")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List coupons grouped by expiration month.
    List {
        /// Only show coupons expiring within this many days (7, 15, 30 or 90).
        #[arg(long)]
        days: Option<FilterDays>,
    },
    /// Show one coupon by code and record the view in the history.
    Show { code: String },
    /// List previously viewed coupons.
    History,
    /// Wipe the viewing history.
    ClearHistory,
    /// Log in with the mock credentials backend.
    Login { email: String, password: String },
    /// End the current session.
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cupom_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let cli = Cli::parse();
    let storage: Arc<dyn KeyValueStore> = Arc::new(
        FileKv::open(&config.storage_path)
            .with_context(|| format!("abrindo armazenamento em {}", config.storage_path.display()))?,
    );

    match cli.command {
        Commands::List { days } => list(&config, days).await,
        Commands::Show { code } => show(&config, storage, &code).await,
        Commands::History => history(storage),
        Commands::ClearHistory => clear_history(storage),
        Commands::Login { email, password } => login(storage, email, password),
        Commands::Logout => logout(storage),
    }
}

async fn fetch_store(config: &AppConfig, days: Option<FilterDays>) -> anyhow::Result<CouponStore> {
    let client = CouponClient::new(&config.api_base_url, config.request_timeout_secs)?;
    let mut store = CouponStore::new();
    store.set_filter_days(days);
    store.fetch_coupons(&client).await;

    if let Some(message) = store.error() {
        anyhow::bail!("{message}");
    }
    Ok(store)
}

async fn list(config: &AppConfig, days: Option<FilterDays>) -> anyhow::Result<()> {
    let store = fetch_store(config, days).await?;

    if let Some(days) = days {
        println!("Filtro: {}", days.label());
    }

    let buckets = group_by_month(store.filtered_coupons());
    if buckets.is_empty() {
        println!("Nenhum cupom encontrado.");
        return Ok(());
    }

    for bucket in buckets {
        println!("\n== {} ==", bucket.label());
        for coupon in &bucket.coupons {
            println!("  {}", coupon_line(coupon));
        }
    }
    Ok(())
}

async fn show(
    config: &AppConfig,
    storage: Arc<dyn KeyValueStore>,
    code: &str,
) -> anyhow::Result<()> {
    let store = fetch_store(config, None).await?;
    let coupon = store
        .coupons()
        .iter()
        .find(|c| c.code == code)
        .with_context(|| format!("cupom '{code}' não encontrado"))?;

    let now = Utc::now();
    println!("Código:       {}", coupon.code);
    println!("Desconto:     {} ({})", coupon.discount_label(), coupon.coupon_type);
    println!("Expira em:    {}", coupon.expire_at.format("%d/%m/%Y %H:%M"));
    println!("Dias restantes: {}", coupon.days_until_expiry(now));
    println!("Ativo:        {}", if coupon.is_active { "sim" } else { "não" });
    println!("Expirado:     {}", if coupon.is_expired(now) { "sim" } else { "não" });
    println!("Usos:         {}/{}", coupon.used, coupon.max_use);
    if let Some(limit) = coupon.max_apply_date {
        println!("Aplicável até: {}", limit.format("%d/%m/%Y"));
    }

    let mut history = HistoryStore::new(storage);
    history.load();
    history.add_to_history(coupon.clone())?;
    Ok(())
}

fn history(storage: Arc<dyn KeyValueStore>) -> anyhow::Result<()> {
    let mut store = HistoryStore::new(storage);
    store.load();
    if let Some(message) = store.error() {
        anyhow::bail!("{message}");
    }

    if store.viewed_coupons().is_empty() {
        println!("Histórico vazio.");
        return Ok(());
    }

    println!("Cupons visualizados (mais recentes primeiro):");
    for coupon in store.viewed_coupons() {
        println!("  {}", coupon_line(coupon));
    }
    Ok(())
}

fn clear_history(storage: Arc<dyn KeyValueStore>) -> anyhow::Result<()> {
    let mut store = HistoryStore::new(storage);
    store.load();
    store.clear_history()?;
    println!("Histórico limpo.");
    Ok(())
}

fn login(storage: Arc<dyn KeyValueStore>, email: String, password: String) -> anyhow::Result<()> {
    let mut store = AuthStore::new(storage, Arc::new(MockAuthService));
    store.login(&Credentials { email, password });

    match store.status() {
        AuthStatus::Authenticated => {
            let user = store.user().context("usuário ausente após login")?;
            println!("Bem-vindo, {}!", user.name);
            Ok(())
        }
        _ => anyhow::bail!("{}", store.error().unwrap_or("falha ao realizar login")),
    }
}

fn logout(storage: Arc<dyn KeyValueStore>) -> anyhow::Result<()> {
    let mut store = AuthStore::new(storage, Arc::new(MockAuthService));
    store.logout();
    println!("Sessão encerrada.");
    Ok(())
}

fn coupon_line(coupon: &Coupon) -> String {
    let status = if coupon.is_active { "ativo" } else { "inativo" };
    format!(
        "{:<12} {:>8}  expira {}  {}",
        coupon.code,
        coupon.discount_label(),
        coupon.expire_at.format("%d/%m/%Y"),
        status
    )
}
