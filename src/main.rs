//! Multicache command line
//!
//! Runs single cache operations against the backend selected by the
//! environment (see [`Config::from_env`]). Values are strings.
//!
//! ```text
//! multicache get <key>
//! multicache put <key> <value> [ttl-seconds]
//! multicache invalidate <key>
//! multicache keys
//! multicache sweep
//! ```

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use multicache::{Backend, CacheBackend, Config};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "multicache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={}, path={}, default_ttl={}s, namespace={}",
        config.backend,
        config.path.display(),
        config.default_ttl,
        config.namespace
    );

    let cache: Backend<String> = Backend::from_config(&config).context("failed to open cache")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["get", key] => match cache.get(key)? {
            Some(value) => println!("{}", value),
            None => bail!("no fresh entry for '{}'", key),
        },
        ["put", key, value] => cache.put(key, value.to_string())?,
        ["put", key, value, ttl] => {
            let ttl: u64 = ttl.parse().with_context(|| format!("invalid ttl '{}'", ttl))?;
            cache.put_ttl(key, value.to_string(), ttl)?;
        }
        ["invalidate", key] => cache.invalidate(key)?,
        ["keys"] => {
            for key in cache.list_keys()? {
                println!("{}", key);
            }
        }
        ["sweep"] => {
            let removed = cache.sweep_expired()?;
            println!("{}", removed);
        }
        _ => bail!("usage: multicache <get KEY | put KEY VALUE [TTL] | invalidate KEY | keys | sweep>"),
    }

    Ok(())
}
