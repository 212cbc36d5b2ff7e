pub mod handle;
pub mod model;
pub mod repository;
pub mod route;
pub mod schema;
pub mod service;

pub use repository::FileRepository;
pub use service::FileService;
