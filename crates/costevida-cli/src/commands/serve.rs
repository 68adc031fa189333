//! Server command implementation

use std::path::Path;

use anyhow::Result;

use costevida_server::ServerConfig;

use super::core::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    no_encrypt: bool,
    host: &str,
    port: u16,
    no_auth: bool,
    mut api_keys: Vec<String>,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Coste de Vida Digital web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Keys from the environment (comma-separated) join the --api-key flags
    let env_keys: Vec<String> = std::env::var("COSTEVIDA_API_KEYS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    api_keys.extend(env_keys);

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!();
        println!("   🔒 Authentication: enabled, but no API keys configured");
        println!("      Pass --api-key or set COSTEVIDA_API_KEYS, or use --no-auth locally");
    } else {
        println!("   🔑 API keys: {} configured", api_keys.len());
    }

    // Allowed CORS origins (comma-separated; empty = same-origin only)
    let allowed_origins: Vec<String> = std::env::var("COSTEVIDA_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let db = open_db(db_path, no_encrypt)?;

    let config = ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
    };

    let static_dir_str = static_dir.and_then(|p| p.to_str());
    costevida_server::serve(db, host, port, static_dir_str, config).await
}
