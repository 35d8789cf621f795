//! Database entities module

pub mod artist;
pub mod concert;
pub mod parameter;
pub mod reservation;
pub mod stage;
pub mod user;

pub use artist::Entity as Artist;
pub use concert::Entity as Concert;
pub use parameter::Entity as Parameter;
pub use reservation::Entity as Reservation;
pub use stage::Entity as Stage;
pub use user::Entity as User;
