pub mod audit;
pub mod handlers;
pub mod matches;
pub mod middleware;
pub mod postings;
pub mod profiles;
pub mod research;
pub mod routes;

pub use routes::create_router;
