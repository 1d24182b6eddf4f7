pub mod api;
pub mod auth;
pub mod config;
pub mod database;

pub mod data_structs {
    pub mod subscription;

    pub mod responses {
        pub mod subscription_response;
    }
}

use std::process::exit;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;

use crate::auth::{HttpIdentityVerifier, IdentityVerifier};
use crate::config::AppConfig;
use crate::database::{DatabasePool, SubscriptionStore};

const CONFIG_PATH: &str = "config.yml";

/// Everything a request handler needs, built once at startup. Both
/// collaborators sit behind traits so tests can hand the handlers fakes.
#[derive(Clone)]
pub struct SharedResources {
    pub store: Arc<dyn SubscriptionStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

async fn load() -> Result<(AppConfig, SharedResources), String> {
    log::info!("Loading configuration...");
    let config = AppConfig::load(CONFIG_PATH).map_err(|err| err.to_string())?;

    log::info!("Connecting to the database...");
    let database = DatabasePool::new(&config.mysql)
        .await
        .map_err(|err| format!("Unable to connect to the database: {}", err))?;
    database
        .init()
        .await
        .map_err(|err| format!("Unable to initialize the database: {}", err))?;

    let verifier = HttpIdentityVerifier::new(config.auth.clone());

    let shared_resources = SharedResources {
        store: Arc::new(database),
        verifier: Arc::new(verifier),
    };

    Ok((config, shared_resources))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let (config, shared_resources) = match load().await {
        Ok(loaded) => loaded,
        Err(err) => {
            log::error!("Startup failed: {}", err);
            exit(1);
        }
    };

    log::info!(
        "Starting HTTP server on {}:{}...",
        config.http.bind,
        config.http.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(shared_resources.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(web::scope("/api/v1").configure(api::configure))
    })
    .bind((config.http.bind.as_str(), config.http.port))?
    .run()
    .await
}
