//! NumeroVilla entity - Numero (stanza) appartenente a una villa

use crate::store::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Sqlite;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct NumeroVilla {
    /// chiave primaria scelta dal client (es. 101, 102)
    pub villa_no: i32,
    pub villa_id: i32,
    pub detalle_especial: String,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl Entity for NumeroVilla {
    type Key = i32;

    const TABLE: &'static str = "NumeroVilla";
    const KEY_COLUMN: &'static str = "VillaNo";
    const GENERATED_KEY: bool = false;
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "VillaId",
        "DetalleEspecial",
        "FechaCreacion",
        "FechaActualizacion",
    ];
    const UPDATE_COLUMNS: &'static [&'static str] =
        &["VillaId", "DetalleEspecial", "FechaActualizacion"];

    fn key(&self) -> i32 {
        self.villa_no
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.fecha_actualizacion
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.fecha_actualizacion = at;
    }

    fn push_insert_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.villa_id)
            .push_bind(self.detalle_especial.clone())
            .push_bind(self.fecha_creacion)
            .push_bind(self.fecha_actualizacion);
    }

    fn push_update_values<'args>(&self, row: &mut Separated<'_, 'args, Sqlite, &'static str>) {
        row.push_bind(self.villa_id)
            .push_bind(self.detalle_especial.clone())
            .push_bind(self.fecha_actualizacion);
    }
}
