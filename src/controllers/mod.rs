pub mod contact_controller;
pub mod vehicle_controller;

pub use contact_controller::ContactController;
pub use vehicle_controller::VehicleController;
