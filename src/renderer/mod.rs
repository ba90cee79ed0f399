pub mod map_renderer;
pub use map_renderer::MapRenderer;

pub mod map_server;
pub use map_server::MapServer;
