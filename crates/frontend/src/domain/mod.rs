pub mod bus_routes;
pub mod emergency;
pub mod maintenance;
pub mod roles;
