//! Villa entity - Unità affittabile principale

use crate::store::{Entity, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Sqlite;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct Villa {
    pub id: i32,
    pub nombre: String,
    pub detalle: String,
    pub imagen_url: String,
    pub ocupantes: i32,
    pub tarifa: f64,
    pub metros_cuadrados: i32,
    pub amenidad: String,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl Villa {
    /// Confronto case-insensitive usato per l'unicità del nome
    pub fn has_nombre(&self, nombre: &str) -> bool {
        self.nombre.to_lowercase() == nombre.to_lowercase()
    }
}

impl Entity for Villa {
    type Key = i32;

    const TABLE: &'static str = "Villa";
    const KEY_COLUMN: &'static str = "Id";
    const GENERATED_KEY: bool = true;
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "Nombre",
        "Detalle",
        "ImagenUrl",
        "Ocupantes",
        "Tarifa",
        "MetrosCuadrados",
        "Amenidad",
        "FechaCreacion",
        "FechaActualizacion",
    ];
    // FechaCreacion non si tocca mai dopo l'insert
    const UPDATE_COLUMNS: &'static [&'static str] = &[
        "Nombre",
        "Detalle",
        "ImagenUrl",
        "Ocupantes",
        "Tarifa",
        "MetrosCuadrados",
        "Amenidad",
        "FechaActualizacion",
    ];

    fn key(&self) -> i32 {
        self.id
    }

    fn assign_key(&mut self, rowid: i64) -> Result<(), StoreError> {
        self.id = i32::try_from(rowid).map_err(|_| StoreError::KeyOutOfRange {
            table: Self::TABLE,
            rowid,
        })?;
        Ok(())
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.fecha_actualizacion
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.fecha_actualizacion = at;
    }

    fn push_insert_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.nombre.clone())
            .push_bind(self.detalle.clone())
            .push_bind(self.imagen_url.clone())
            .push_bind(self.ocupantes)
            .push_bind(self.tarifa)
            .push_bind(self.metros_cuadrados)
            .push_bind(self.amenidad.clone())
            .push_bind(self.fecha_creacion)
            .push_bind(self.fecha_actualizacion);
    }

    fn push_update_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.nombre.clone())
            .push_bind(self.detalle.clone())
            .push_bind(self.imagen_url.clone())
            .push_bind(self.ocupantes)
            .push_bind(self.tarifa)
            .push_bind(self.metros_cuadrados)
            .push_bind(self.amenidad.clone())
            .push_bind(self.fecha_actualizacion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_nombre_ignores_case() {
        let now = Utc::now();
        let villa = Villa {
            id: 1,
            nombre: "Villa Real".to_string(),
            detalle: String::new(),
            imagen_url: String::new(),
            ocupantes: 5,
            tarifa: 200.0,
            metros_cuadrados: 50,
            amenidad: String::new(),
            fecha_creacion: now,
            fecha_actualizacion: now,
        };

        assert!(villa.has_nombre("Villa Real"));
        assert!(villa.has_nombre("VILLA REAL"));
        assert!(villa.has_nombre("vIlLa rEaL"));
        assert!(!villa.has_nombre("Villa Reale"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let now = Utc::now();
        let villa = Villa {
            id: 7,
            nombre: "Test".to_string(),
            detalle: String::new(),
            imagen_url: "img.png".to_string(),
            ocupantes: 2,
            tarifa: 10.0,
            metros_cuadrados: 20,
            amenidad: String::new(),
            fecha_creacion: now,
            fecha_actualizacion: now,
        };

        let json = serde_json::to_value(&villa).unwrap();
        assert_eq!(json["imagenUrl"], "img.png");
        assert_eq!(json["metrosCuadrados"], 20);
        assert!(json.get("fechaCreacion").is_some());
    }

    #[test]
    fn test_assign_key_rejects_rowid_out_of_range() {
        let now = Utc::now();
        let mut villa = Villa {
            id: 0,
            nombre: "Test".to_string(),
            detalle: String::new(),
            imagen_url: String::new(),
            ocupantes: 2,
            tarifa: 10.0,
            metros_cuadrados: 20,
            amenidad: String::new(),
            fecha_creacion: now,
            fecha_actualizacion: now,
        };

        villa.assign_key(7).unwrap();
        assert_eq!(villa.id, 7);

        let err = villa.assign_key(i64::from(i32::MAX) + 1).unwrap_err();
        assert!(matches!(err, StoreError::KeyOutOfRange { table: "Villa", rowid: 2_147_483_648 }));
        // la chiave precedente resta quella assegnata
        assert_eq!(villa.id, 7);
    }
}
