pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

// Re-export the core types and services for external use
pub use models::*;
pub use services::{
    AppointmentLifecycleService, AvailabilityService, BookingService,
    SchedulingServices, SlotGenerationService,
};
pub use store::{SchedulingStore, SupabaseSchedulingStore};
