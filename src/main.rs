//! Memo Cache - demo and diagnostics server
//!
//! Runs a memoized product price calculation against a shared store, then
//! serves the store's stats over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::api::create_router;
use memo_cache::cache::SystemClock;
use memo_cache::{args, spawn_sweep_task, AppState, CacheStore, Config, MemoizeOptions, Memoizer};

/// Price calculator whose steps are memoized per member.
struct PriceCalculator {
    subtotal: Memoizer,
    discount: Memoizer,
    shipping: Memoizer,
}

impl PriceCalculator {
    fn new(store: Arc<CacheStore>, config: &Config) -> memo_cache::Result<Self> {
        let member = |name: &'static str| {
            MemoizeOptions::from_config(config)
                .debug_label(name)
                .on_cache_hit(move |key| info!("Cache HIT: {} for {}", name, key))
                .on_cache_miss(move |key| info!("Cache MISS: computing {} for {}", name, key))
        };

        let step = |name: &'static str| {
            Memoizer::for_member(store.clone(), "PriceCalculator", name, member(name))
        };

        Ok(Self {
            subtotal: step("subtotal")?,
            discount: step("discount")?,
            shipping: step("shipping")?,
        })
    }

    fn subtotal(&self, price: f64, quantity: u32) -> f64 {
        self.subtotal.invoke(args![price, quantity], |args| {
            let price = args[0].as_f64().unwrap_or_default();
            let quantity = args[1].as_f64().unwrap_or_default();
            (price * quantity * 100.0).round() / 100.0
        })
    }

    fn discount(&self, subtotal: f64, code: Option<&str>, quantity: u32) -> f64 {
        self.discount.invoke(args![subtotal, code, quantity], |args: &[Value]| {
            let subtotal = args[0].as_f64().unwrap_or_default();
            // Nulls are filtered, so a missing code shifts the quantity forward
            let (code, quantity) = match args {
                [_, Value::String(code), quantity] => {
                    (code.as_str(), quantity.as_u64().unwrap_or(0))
                }
                [_, quantity] => ("", quantity.as_u64().unwrap_or(0)),
                _ => ("", 0),
            };
            let rate = match code {
                "SAVE10" => 0.10,
                "SAVE20" => 0.20,
                _ if quantity >= 10 => 0.05,
                _ => 0.0,
            };
            (subtotal * rate * 100.0).round() / 100.0
        })
    }

    fn shipping(&self, method: &str, subtotal: f64) -> f64 {
        self.shipping.invoke(args![method, subtotal], |args| {
            let subtotal = args[1].as_f64().unwrap_or_default();
            match args[0].as_str() {
                _ if subtotal >= 100.0 => 0.0,
                Some("express") => 15.0,
                _ => 5.0,
            }
        })
    }

    fn total(&self, price: f64, quantity: u32, code: Option<&str>, method: &str) -> f64 {
        let subtotal = self.subtotal(price, quantity);
        let discount = self.discount(subtotal, code, quantity);
        let shipping = self.shipping(method, subtotal);
        subtotal - discount + shipping
    }
}

/// Main entry point for the demo and diagnostics server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache store and run the price demo against it
/// 4. Start background sweep task
/// 5. Serve the diagnostics router on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Memo Cache demo");

    let config = Config::from_env();
    info!(
        max_age_ms = ?config.default_max_age_ms,
        max_size = ?config.default_max_size,
        key_strategy = %config.key_strategy,
        port = config.server_port,
        sweep_interval_secs = config.sweep_interval,
        "Configuration loaded"
    );

    let store = CacheStore::shared();
    let calculator = PriceCalculator::new(store.clone(), &config)?;

    for (price, quantity, code, method) in [
        (19.99, 2, None, "standard"),
        (19.99, 2, Some("SAVE10"), "standard"),
        (19.99, 2, None, "standard"),
        (12.50, 10, None, "express"),
    ] {
        let total = calculator.total(price, quantity, code, method);
        info!("Total for {} x {:.2} ({:?}, {}): {:.2}", quantity, price, code, method, total);
    }

    let stats = serde_json::to_string_pretty(&store.stats()).context("Failed to render stats")?;
    info!("Cache stats:\n{}", stats);

    let sweep_handle =
        spawn_sweep_task(store.clone(), Arc::new(SystemClock), config.sweep_interval);
    info!("Background sweep task started");

    let app = create_router(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Diagnostics listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweep_handle.abort();
    warn!("Sweep task aborted");
}
