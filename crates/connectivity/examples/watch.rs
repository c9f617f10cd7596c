//! Watch connectivity changes from the command line.
//!
//! Run with:
//!
//! ```sh
//! RUST_LOG=connectivity=debug cargo run -p connectivity --example watch -- http
//! cargo run -p connectivity --example watch -- device
//! ```

use connectivity::prelude::*;
use futures_util::StreamExt;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("connectivity=info")),
        )
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "device".to_string());
    let connectivity = match mode.as_str() {
        "http" => {
            let options = HttpConnectivityOptions::builder()
                .polling_interval_ms(10_000)
                .on_poll_result(|result| tracing::info!(?result, "Poll result"))
                .build();
            HttpConnectivity::new(options, Handle::current())?
        }
        "device" => DeviceConnectivity::with_defaults(Handle::current()),
        other => return Err(format!("unknown provider '{other}', expected 'http' or 'device'").into()),
    };

    println!("Checking connectivity: {}", connectivity.status().await);

    let mut updates = connectivity.status_updates();
    loop {
        tokio::select! {
            Some(status) = updates.next() => println!("Connectivity changed: {status}"),
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    connectivity.stop();
    Ok(())
}
