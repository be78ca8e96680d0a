//! Routes Module
//!
//! - **`router`** - top-level router, CORS and tracing layers
//! - **`api_routes`** - the `/api/v1` tree

pub mod router;

pub mod api_routes;

pub use router::create_router;
