//! # ReadLog Entry Point
//!
//! ```text
//! main()
//!   ├── init_tracing()      RUST_LOG or "info,readlog=debug,sqlx=warn"
//!   ├── WebConfig::load()   READLOG_BIND / READLOG_DATA_DIR / ...
//!   └── serve(config)       data dir → database + schema → axum
//! ```

use readlog_web::config::WebConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    readlog_web::init_tracing();

    let config = WebConfig::load()?;

    readlog_web::serve(config).await
}
