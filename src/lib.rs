pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod server;
pub mod studio;
pub mod upstream;

pub use config::{AppConfig, UpstreamConfig};
pub use history::{FileStorage, HistoryStore, MemoryStorage, Storage};
pub use model::{GeneratedImage, GenerationRequest, GenerationResponse, StyleCatalog};
pub use server::build_router;
pub use studio::{GeneratorClient, Studio};
pub use upstream::{ImageBackend, UpstreamClient};
