use crate::renderer::MapRenderer;
use actix_web::dev::{Service, ServerHandle};
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, Weak};
use std::thread;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Handed out for every registered renderer. The renderer stays reachable
/// over HTTP until the token is dropped.
pub struct Token {
    id: Uuid,
    url_prefix: Arc<RwLock<String>>,
    registry: Weak<RwLock<HashMap<Uuid, Weak<Mutex<MapRenderer>>>>>,
}

impl Token {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Follows the server's current address, so tokens handed out before
    /// [`MapServer::start`] resolve too.
    pub fn url(&self) -> String {
        format!("{}/#{}", *self.url_prefix.read().unwrap(), self.id)
    }
}

impl Drop for Token {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            debug!("dropping entry: {} from registry", self.id);
            let mut items = registry.write().unwrap();
            items.remove(&self.id);
        }
    }
}

#[derive(Default, Clone)]
pub struct Registry {
    url_prefix: Arc<RwLock<String>>,
    items: Arc<RwLock<HashMap<Uuid, Weak<Mutex<MapRenderer>>>>>,
}

impl Registry {
    pub fn new(url_prefix: &str) -> Self {
        Self {
            url_prefix: Arc::new(RwLock::new(url_prefix.to_string())),
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn set_url_prefix(&self, url_prefix: &str) {
        let mut prefix = self.url_prefix.write().unwrap();
        *prefix = url_prefix.to_string();
    }

    pub fn register(&self, item: Weak<Mutex<MapRenderer>>) -> Token {
        let id = Uuid::new_v4();
        self.items.write().unwrap().insert(id, item);
        Token {
            id,
            url_prefix: self.url_prefix.clone(),
            registry: Arc::downgrade(&self.items),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<MapRenderer>>> {
        let items = self.items.read().unwrap();
        items.get(id).and_then(|item| item.upgrade())
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct AppState {
    registry: Registry,
}

async fn serve_view(
    id: web::Path<String>,
    req: HttpRequest,
    data: web::Data<AppState>,
) -> HttpResponse {
    let map_renderer = match Uuid::parse_str(&id)
        .ok()
        .and_then(|uuid| data.registry.get(&uuid))
    {
        Some(map_renderer) => map_renderer,
        None => return HttpResponse::NotFound().finish(),
    };

    let client_version = req
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|h| h.to_str().ok());

    let map_renderer = map_renderer.lock().unwrap();
    match map_renderer.get_latest_view_if_changed(client_version) {
        None => HttpResponse::NotModified().finish(),
        Some((map_view, version)) => HttpResponse::Ok()
            .insert_header((header::ETAG, version))
            .json(map_view),
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html")
        .body(MAP_VIEW_HTML)
}

const MAP_VIEW_HTML: &str = include_str!("../../static/map-view.html");

/// Routes of the map page, mounted under `/{prefix}`.
pub fn configure(registry: Registry, prefix: String) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(AppState {
            registry: registry.clone(),
        }))
        .route(&format!("/{prefix}/"), web::get().to(index))
        .route(
            &format!("/{prefix}/items/{{id}}/view.json"),
            web::get().to(serve_view),
        );
    }
}

/// Serves the latest map frame of every registered renderer to a Leaflet page.
pub struct MapServer {
    host: String,
    port: u16,
    handle: Option<thread::JoinHandle<()>>,
    server_handle: Option<ServerHandle>,
    registry: Registry,
}

impl MapServer {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            handle: None,
            server_handle: None,
            registry: Registry::new(&format!("http://{host}:{port}")),
        }
    }

    pub fn register(&self, item: Weak<Mutex<MapRenderer>>) -> Token {
        self.registry.register(item)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // Start the server in a separate thread
    pub fn start(&mut self) -> Result<()> {
        let host = self.host.clone();
        let port = self.port;
        let registry = self.registry.clone();
        let prefix = Uuid::new_v4().to_string();

        // Signals once the socket is bound (or failed to bind)
        let (tx, rx) = std::sync::mpsc::channel::<std::result::Result<(u16, ServerHandle), String>>();

        let handle = thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = tx.send(Err(format!("Failed to create Tokio runtime: {e}")));
                    return;
                }
            };
            runtime.block_on(async move {
                let routes = configure(registry.clone(), prefix.clone());
                let server = match HttpServer::new(move || {
                    App::new()
                        .wrap_fn(|req, srv| {
                            debug!("Incoming request: {} {}", req.method(), req.uri());
                            srv.call(req)
                        })
                        .configure(routes.clone())
                })
                .workers(1)
                .bind(format!("{host}:{port}"))
                {
                    Ok(server) => server,
                    Err(e) => {
                        let _ = tx.send(Err(format!("Failed to bind {host}:{port}: {e}")));
                        return;
                    }
                };

                // If port was 0, use the one the OS picked
                let port = server
                    .addrs()
                    .first()
                    .map(|addr| addr.port())
                    .unwrap_or(port);
                registry.set_url_prefix(&format!("http://{host}:{port}/{prefix}"));

                let server = server.run();
                let _ = tx.send(Ok((port, server.handle())));
                info!("Map server bound to {}:{}", host, port);
                if let Err(e) = server.await {
                    error!("Map server failed: {}", e);
                }
            });
        });

        match rx.recv() {
            Ok(Ok((port, server_handle))) => {
                self.port = port;
                self.server_handle = Some(server_handle);
                self.handle = Some(handle);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(anyhow!(e))
            }
            Err(_) => {
                let _ = handle.join();
                Err(anyhow!("map server thread exited before binding"))
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(server_handle) = self.server_handle.take() {
            match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime.block_on(server_handle.stop(true)),
                Err(e) => warn!("cannot stop map server gracefully: {}", e),
            }
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            info!("Map server stopped");
        }
    }
}

impl Drop for MapServer {
    fn drop(&mut self) {
        self.stop();
    }
}
