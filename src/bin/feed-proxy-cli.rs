use clap::{Parser, Subcommand};
use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE};
use serde_json::Value;

use feed_proxy::forwarder::{inspect_target, Allowlist, TargetVerdict};
use feed_proxy::resilience::TimeoutPolicy;

#[derive(Parser)]
#[command(name = "feed-proxy-cli")]
#[command(about = "Inspection CLI for the feed proxy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the compiled-in source allowlist
    Domains,
    /// Check offline whether a feed URL would be forwarded
    Check {
        /// Target feed URL
        url: String,
    },
    /// Fetch a feed through a running proxy
    Fetch {
        /// Target feed URL
        url: String,

        /// Proxy endpoint
        #[arg(short, long, default_value = "http://localhost:8080/api/rss-proxy")]
        proxy: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Domains => {
            for host in Allowlist::builtin().sorted() {
                println!("{}", host);
            }
        }
        Commands::Check { url } => {
            match inspect_target(&Allowlist::builtin(), TimeoutPolicy::default(), &url) {
                TargetVerdict::Malformed(e) => {
                    println!("invalid url: {} (proxy answers 502)", e);
                }
                TargetVerdict::Forbidden { domain } => {
                    println!("hostname: {}", domain);
                    println!("allowed:  false");
                }
                TargetVerdict::Allowed { target, timeout } => {
                    println!("hostname: {}", target.host_str().unwrap_or_default());
                    println!("allowed:  true");
                    println!("timeout:  {}ms", timeout.as_millis());
                }
            }
        }
        Commands::Fetch { url, proxy } => {
            let client = reqwest::Client::new();
            let res = client.get(&proxy).query(&[("url", url.as_str())]).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    println!("Status: {}", status);
    for name in [CONTENT_TYPE, CACHE_CONTROL, ACCESS_CONTROL_ALLOW_ORIGIN] {
        if let Some(value) = res.headers().get(&name) {
            println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
    }
    println!();

    let is_json = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if is_json {
        let json: Value = res.json().await?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", res.text().await?);
    }
    Ok(())
}
