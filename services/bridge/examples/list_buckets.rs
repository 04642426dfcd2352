//! Query a Bridge with an optional signing key.
//!
//! ```shell
//! STORJ_BRIDGE=http://localhost:6382 BRIDGE_PRIVATE_KEY=<hex> \
//!     RUST_LOG=debug cargo run --example list_buckets
//! ```

use bridge_client::{Client, Config, Secp256k1KeyPair};
use bridge_core::{Context, KeyPair, OsEnv, Result};
use bridge_http_send_reqwest::ReqwestHttpSend;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let client = match ctx.env_var("BRIDGE_PRIVATE_KEY") {
        Some(private_key) => {
            let key_pair = Secp256k1KeyPair::from_private_key(&private_key)?;
            info!("signing requests as node {}", key_pair.node_id());
            info!("public key: {}", key_pair.public_key());
            Client::new(ctx, None, Config::default().with_key_pair(key_pair))?
        }
        None => Client::new(ctx, None, Config::default())?,
    };

    let api = client.get_info().await?;
    println!("bridge {}: {}", client.config().base_uri(), api["info"]["title"]);

    if client.config().credential().is_none() {
        info!("no credential configured, skipping bucket listing");
        return Ok(());
    }

    let buckets = client.get_buckets().await?;
    for bucket in buckets.as_array().into_iter().flatten() {
        println!("{}\t{}", bucket["id"], bucket["name"]);
    }

    Ok(())
}
