use openworkers_http_client::{FileType, RequestClient, RequestOptions};
use serde_json::Value;

const USAGE: &str = "usage: openworkers-http-client <url> [json|text|image|video|audio|file]";

#[tokio::main]
async fn main() {
    // Initialize logger
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    let kind = args.next().unwrap_or_else(|| "json".to_string());

    // Optional defaults file layered over the baseline
    let client = match std::env::var("HTTP_CLIENT_DEFAULTS") {
        Ok(path) => match RequestOptions::load(&path) {
            Ok(options) => {
                log::info!("Loaded default options from {}", path);
                RequestClient::with_options(options)
            }
            Err(e) => {
                eprintln!("Failed to load defaults: {}", e);
                std::process::exit(1);
            }
        },
        Err(_) => RequestClient::default(),
    };

    let result = if kind == "json" {
        client
            .get::<Value>(&url, "", RequestOptions::new())
            .await
            .map(|value| serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    } else {
        let file_type = FileType::from_tag(&kind);
        client.fetch_file(&url, file_type, RequestOptions::new()).await.map(|out| {
            match client.object_urls().get(&out) {
                Some(blob) => format!("{} ({} bytes, type '{}')", out, blob.size(), blob.mime()),
                None => out,
            }
        })
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Request failed: {}", e);
            std::process::exit(1);
        }
    }
}
