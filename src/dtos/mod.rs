//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod numero_villa;
pub mod patch;
pub mod villa;

pub use numero_villa::{NumeroVillaCreateDTO, NumeroVillaDTO, NumeroVillaUpdateDTO};
pub use patch::{PatchError, PatchOp, PatchOperation, apply_patch};
pub use villa::{VillaCreateDTO, VillaDTO, VillaUpdateDTO};
