use crate::{api, setting::Setting, upload::FileStore, Result, Service};
use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest},
    http, middleware, web, App as WebApp, HttpServer,
};
use sea_orm::{ConnectOptions, Database, DbConn};
use std::path::Path;
use tracing::{debug, info};

pub struct AppState {
    pub service: Service,
    pub setting: Setting,
}

impl AppState {
    pub async fn create<P: AsRef<Path>>(
        setting_path: Option<P>,
        setting_env_prefix: Option<String>,
    ) -> Result<Self> {
        let env_notice = setting_env_prefix
            .as_ref()
            .map(|s| {
                format!(
                    ", config will be overrided by ENV seting with prefix `{}_`",
                    s
                )
            })
            .unwrap_or_default();

        let setting = if let Some(path) = setting_path {
            info!("Load config {:?}{}", path.as_ref(), env_notice);
            Setting::read(path.as_ref(), setting_env_prefix)?
        } else if let Some(prefix) = setting_env_prefix {
            info!("Load default config{}", env_notice);
            Setting::from_env(prefix)?
        } else {
            info!("Load default config");
            Setting::default()
        };

        debug!("{:?}", setting);

        Self::from_setting(setting).await
    }

    pub async fn from_setting(setting: Setting) -> Result<Self> {
        let mut options = ConnectOptions::from(&setting.db_url);
        options.sqlx_logging_level(tracing::log::LevelFilter::Trace);
        if let Some(size) = setting.db_pool_size {
            options.max_connections(size);
        }
        let conn = Database::connect(options).await?;
        Self::with_conn(setting, conn).await
    }

    /// Build the state around an existing connection.
    pub async fn with_conn(setting: Setting, conn: DbConn) -> Result<Self> {
        tokio::fs::create_dir_all(&setting.upload.dir).await?;
        let files = FileStore::new(&setting.upload);
        let service = Service::new(conn, files);
        Ok(Self { service, setting })
    }
}

fn cors(setting: &Setting) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            http::header::CONTENT_TYPE,
            http::header::AUTHORIZATION,
            http::header::HeaderName::from_static("x-user-role"),
        ])
        .supports_credentials()
        .max_age(86_400);
    if setting.cors.allowed_origins.is_empty() {
        cors.allow_any_origin()
    } else {
        setting
            .cors
            .allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

pub fn create_web_app(
    data: web::Data<AppState>,
) -> WebApp<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = cors(&data.setting);
    let upload = data.setting.upload.clone();
    WebApp::new()
        .app_data(data)
        .wrap(cors)
        .wrap(middleware::Logger::default()) // enable logger
        .service(api::scope())
        .service(actix_files::Files::new(&upload.url_prefix, upload.dir.clone()))
}

/// start http server
pub async fn start(state: AppState) -> Result<()> {
    let state = web::Data::new(state);

    let c_data = state.clone();
    let server = HttpServer::new(move || create_web_app(c_data.clone()));
    let num = if state.setting.thread.http == 0 {
        num_cpus::get()
    } else {
        state.setting.thread.http
    };
    let host = state.setting.network.host.clone();
    let port = state.setting.network.port;
    info!("Start http server {}:{}", host, port);
    server.workers(num).bind((host, port))?.run().await?;
    Ok(())
}
