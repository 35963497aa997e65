pub mod availability;
pub mod booking;
pub mod lifecycle;
pub mod slots;

pub use availability::AvailabilityService;
pub use booking::BookingService;
pub use lifecycle::AppointmentLifecycleService;
pub use slots::SlotGenerationService;

use std::sync::Arc;

use shared_config::AppConfig;

use crate::models::SchedulingConfig;
use crate::store::{SchedulingStore, SupabaseSchedulingStore};

/// The scheduling services bundled as router state. Built once at startup;
/// the booking service's per-staff locks only guard concurrent requests when
/// a single instance is shared.
pub struct SchedulingServices {
    pub availability: AvailabilityService,
    pub slots: SlotGenerationService,
    pub booking: BookingService,
}

impl SchedulingServices {
    pub fn from_config(config: &AppConfig) -> Self {
        let store: Arc<dyn SchedulingStore> = Arc::new(SupabaseSchedulingStore::new(config));
        Self::with_store(store, SchedulingConfig::default())
    }

    pub fn with_store(store: Arc<dyn SchedulingStore>, config: SchedulingConfig) -> Self {
        Self {
            availability: AvailabilityService::new(Arc::clone(&store)),
            slots: SlotGenerationService::with_config(Arc::clone(&store), config.clone()),
            booking: BookingService::with_config(store, config),
        }
    }
}
