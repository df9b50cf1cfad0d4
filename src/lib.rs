use lazy_static::lazy_static;
use translations::Translations;

pub mod about;
pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod prepare;
pub mod save;
pub mod translations;

pub use maneloca_engine as engine;
pub use maneloca_protocol as protocol;

lazy_static! {
    // Interface translations
    pub static ref TRANSLATIONS: Translations = Translations::default();
}
