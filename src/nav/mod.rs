//! Navigation: the addressable location and the controller that keeps it in
//! step with the displayed view.

mod controller;
mod history;

pub use controller::{Activation, Display, NavError, NavRequest, Navigator};
pub use history::History;
