use crate::config::Config;
use crate::server;
use crate::services::{ApodService, HealthStats};

pub async fn run(host: Option<String>, port: Option<u16>) {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    println!("🚀 Starting apod-proxy on {}:{}", config.host, config.port);
    println!("   🔭 Upstream API:   {}", config.api_url);
    println!("   📄 APOD pages:     {}", config.page_base_url);
    println!("   ⏱️  Fetch timeout:  {}s", config.request_timeout.as_secs());
    if let Some(dir) = &config.static_dir {
        println!("   📁 Static files:   {}", dir.display());
    }
    if let Some(dir) = &config.log_dir {
        println!("   📝 Request log:    {}", dir.join("api_requests.log").display());
    }

    let service = match ApodService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::serve(config, service, HealthStats::shared()).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
