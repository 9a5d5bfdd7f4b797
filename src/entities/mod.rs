//! Entities module - Entità del dominio applicativo
//!
//! Ogni entity corrisponde a una tabella nel database e implementa
//! [`crate::store::Entity`], che descrive chiave e colonne.

pub mod numero_villa;
pub mod villa;

// Re-exports per facilitare l'import
pub use numero_villa::NumeroVilla;
pub use villa::Villa;
