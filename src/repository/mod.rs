pub mod address_mapping_repository;
pub mod database;
pub mod donation_repository;
pub mod models;
pub mod progress_repository;

pub use address_mapping_repository::AddressMappingRepository;
pub use database::Database;
pub use donation_repository::{DonationRepository, DonationStats};
pub use models::{AddressMapping, Donation, NewDonation};
pub use progress_repository::ProgressRepository;
