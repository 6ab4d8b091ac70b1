pub mod assignments;

pub use assignments::configure_assignment_routes;
