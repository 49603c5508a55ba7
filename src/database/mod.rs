//! Database service layer.
//!
//! One service struct per resource, each owning a pool handle and the
//! SQL for its table. Services return `anyhow::Result`; route handlers
//! translate failures into the API error taxonomy.

pub mod accommodation_service;
pub mod artist_service;
pub mod category_service;
pub mod event_service;
pub mod merchandise_service;
pub mod registration_service;
pub mod sponsor_service;
pub mod user_service;

pub use accommodation_service::{
    AccommodationRow, AccommodationService, AccommodationUpdate, NewAccommodationFields,
};
pub use artist_service::{ArtistRow, ArtistService, ArtistWithConcert, NewArtistFields};
pub use category_service::{CategoryRow, CategoryService, CategoryUpdate, CategoryWithCount};
pub use event_service::{
    EventRow, EventService, EventUpdate, EventWithDetails, FeeRow, NewEventFields, NewFeeFields,
};
pub use merchandise_service::{
    MerchandiseService, NewProductFields, OrderRow, OrderUpdate, ProductRow, ProductUpdate,
};
pub use registration_service::{
    RegistrationFilter, RegistrationReportRow, RegistrationService, RegistrationSummary,
};
pub use sponsor_service::{NewSponsorFields, SponsorRow, SponsorService, SponsorUpdate};
pub use user_service::{NewUserFields, UserRow, UserService};
