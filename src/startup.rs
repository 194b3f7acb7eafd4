use crate::configuration::{Settings, TransportMode};
use crate::connectors;
use crate::helpers;
use crate::mcp::{
    self, Dispatcher, InMemorySessionStore, RequestProcessor, ServerInfo, SessionStore,
    SessionTransport, StartupError, StatefulTransport, StatelessTransport,
};
use crate::middleware;
use crate::routes;
use actix_web::{dev::Server, http::Method, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub async fn run(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let api_keys = connectors::init_api_keys(&settings.auth)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;

    let transport = build_transport(&settings)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))?;
    let exposed_headers = transport.exposed_headers();
    tracing::info!(
        mode = ?settings.transport.mode,
        path = %settings.mcp_path,
        "MCP endpoint ready"
    );

    let mcp_path = settings.mcp_path.clone();
    let settings = web::Data::new(settings);
    let transport = web::Data::new(transport);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(helpers::cors::default_headers(exposed_headers))
            .wrap(TracingLogger::default())
            .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
            .app_data(settings.clone())
            .app_data(transport.clone())
            .route("/health", web::get().to(routes::health_check))
            .service(
                web::scope("/.well-known")
                    .route(
                        "/oauth-protected-resource",
                        web::get().to(routes::discovery::protected_resource),
                    )
                    .route(
                        "/oauth-authorization-server",
                        web::get().to(routes::discovery::authorization_server),
                    ),
            )
            .route("/api/token", web::post().to(routes::discovery::token))
            .service(
                web::resource(mcp_path.clone())
                    .wrap(middleware::ApiKeyGate::new(api_keys.clone()))
                    .route(web::post().to(routes::mcp::post_handler))
                    .route(web::get().to(routes::mcp::get_handler))
                    .route(web::delete().to(routes::mcp::delete_handler))
                    .route(web::method(Method::OPTIONS).to(routes::mcp::options_handler))
                    .default_service(web::to(routes::mcp::method_not_allowed)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}

fn build_transport(settings: &Settings) -> Result<Arc<dyn SessionTransport>, StartupError> {
    let dispatcher = Dispatcher::with_design_catalogs(ServerInfo {
        name: settings.server.name.clone(),
        version: settings.server.version.clone(),
    })?;
    let processor = Arc::new(RequestProcessor::new(Arc::new(dispatcher)));

    let transport: Arc<dyn SessionTransport> = match settings.transport.mode {
        TransportMode::Stateless => Arc::new(StatelessTransport::new(
            processor,
            mcp::transport::ServerIdentity {
                name: settings.server.name.clone(),
                version: settings.server.version.clone(),
                description: settings.server.description.clone(),
            },
        )),
        TransportMode::Stateful => {
            let ttl = Duration::from_secs(settings.session.ttl_secs);
            let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
                ttl,
                settings.session.max_sessions,
            ));
            mcp::session::spawn_sweeper(store.clone(), ttl);
            let keep_alive = Duration::from_secs(settings.session.keep_alive_secs.max(1));
            Arc::new(StatefulTransport::new(processor, store, keep_alive))
        }
    };

    Ok(transport)
}
