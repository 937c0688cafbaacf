//! Database entities module

pub mod account;
pub mod parking_session;
pub mod tariff;
pub mod tariff_window;
pub mod vehicle;

pub use account::Entity as Account;
pub use parking_session::Entity as ParkingSession;
pub use tariff::Entity as Tariff;
pub use tariff_window::Entity as TariffWindow;
pub use vehicle::Entity as Vehicle;
