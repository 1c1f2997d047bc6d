pub mod remote_store;
pub mod replace_workflow;
pub mod single_flight;
