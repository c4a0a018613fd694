pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod streams;

pub use routes::create_router;
