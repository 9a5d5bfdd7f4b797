//! NumeroVilla DTOs - Data Transfer Objects per numeri di villa

use crate::entities::NumeroVilla;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client (lettura)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumeroVillaDTO {
    pub villa_no: i32,
    pub villa_id: i32,
    pub detalle_especial: String,
}

impl From<NumeroVilla> for NumeroVillaDTO {
    fn from(value: NumeroVilla) -> Self {
        Self {
            villa_no: value.villa_no,
            villa_id: value.villa_id,
            detalle_especial: value.detalle_especial,
        }
    }
}

/// DTO per creare un numero di villa: il numero lo sceglie il client
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NumeroVillaCreateDTO {
    #[validate(range(min = 1, message = "VillaNo must be a positive number"))]
    pub villa_no: i32,

    #[validate(range(min = 1, message = "VillaId must be a positive number"))]
    pub villa_id: i32,

    #[serde(default)]
    pub detalle_especial: String,
}

impl NumeroVillaCreateDTO {
    pub fn into_entity(self, now: DateTime<Utc>) -> NumeroVilla {
        NumeroVilla {
            villa_no: self.villa_no,
            villa_id: self.villa_id,
            detalle_especial: self.detalle_especial,
            fecha_creacion: now,
            fecha_actualizacion: now,
        }
    }
}

/// DTO per aggiornare un numero di villa (villa_no deve coincidere con il path)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NumeroVillaUpdateDTO {
    #[validate(range(min = 1, message = "VillaNo must be a positive number"))]
    pub villa_no: i32,

    #[validate(range(min = 1, message = "VillaId must be a positive number"))]
    pub villa_id: i32,

    #[serde(default)]
    pub detalle_especial: String,
}

impl From<NumeroVilla> for NumeroVillaUpdateDTO {
    fn from(value: NumeroVilla) -> Self {
        Self {
            villa_no: value.villa_no,
            villa_id: value.villa_id,
            detalle_especial: value.detalle_especial,
        }
    }
}

impl NumeroVillaUpdateDTO {
    pub fn apply_to(self, numero: NumeroVilla) -> NumeroVilla {
        NumeroVilla {
            villa_no: self.villa_no,
            villa_id: self.villa_id,
            detalle_especial: self.detalle_especial,
            ..numero
        }
    }
}
