//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Ogni repository gestisce le operazioni di database per una specifica entità.
//! Le operazioni comuni (create, fetch, remove, persist) arrivano dal trait
//! generico [`Repository`]; ogni repository aggiunge il proprio [`Update`].

// ************************* NOTA SULLE QUERY ************************* //

/*
   Le query non usano query!/query_as! (che vogliono il db raggiungibile a
   compile time) ma query_as::<_, T> a runtime, con le entity che derivano
   sqlx::FromRow. I nomi di tabelle e colonne arrivano dal trait Entity.

   Filtri: fetch_all/fetch_one ricevono una closure Fn(&E) -> bool che viene
   valutata sulle righe lette in ordine di chiave primaria, es:
       repo.fetch_one_detached(Some(&|v: &Villa| v.id == id)).await?
   Tracciamento: fetch_one restituisce un Tracked<E> (modifiche salvate da
   persist_changes), fetch_one_detached una copia indipendente (usata per
   il patch, che poi chiama update).
*/

pub mod numero_villa;
pub mod traits;
pub mod villa;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Repository, Update};

pub use numero_villa::NumeroVillaRepository;
pub use villa::VillaRepository;
