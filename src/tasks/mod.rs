//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Maintenance: Applies pending evictions and purges expired entries

mod maintenance;

pub use maintenance::spawn_maintenance_task;
