//! Villa DTOs - Data Transfer Objects per ville

use crate::entities::Villa;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client (lettura)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VillaDTO {
    pub id: i32,
    pub nombre: String,
    pub detalle: String,
    pub imagen_url: String,
    pub ocupantes: i32,
    pub tarifa: f64,
    pub metros_cuadrados: i32,
    pub amenidad: String,
}

impl From<Villa> for VillaDTO {
    fn from(value: Villa) -> Self {
        Self {
            id: value.id,
            nombre: value.nombre,
            detalle: value.detalle,
            imagen_url: value.imagen_url,
            ocupantes: value.ocupantes,
            tarifa: value.tarifa,
            metros_cuadrados: value.metros_cuadrados,
            amenidad: value.amenidad,
        }
    }
}

/// DTO per creare una nuova villa (senza id né timestamp)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VillaCreateDTO {
    #[validate(length(min = 1, max = 30, message = "Nombre must be between 1 and 30 characters"))]
    pub nombre: String,

    #[serde(default)]
    pub detalle: String,

    #[serde(default)]
    pub imagen_url: String,

    #[validate(range(min = 0, message = "Ocupantes cannot be negative"))]
    #[serde(default)]
    pub ocupantes: i32,

    #[validate(range(min = 0.0, message = "Tarifa cannot be negative"))]
    pub tarifa: f64,

    #[validate(range(min = 0, message = "MetrosCuadrados cannot be negative"))]
    #[serde(default)]
    pub metros_cuadrados: i32,

    #[serde(default)]
    pub amenidad: String,
}

impl VillaCreateDTO {
    /// Entity nuova con creazione e aggiornamento allo stesso istante
    pub fn into_entity(self, now: DateTime<Utc>) -> Villa {
        Villa {
            id: 0,
            nombre: self.nombre,
            detalle: self.detalle,
            imagen_url: self.imagen_url,
            ocupantes: self.ocupantes,
            tarifa: self.tarifa,
            metros_cuadrados: self.metros_cuadrados,
            amenidad: self.amenidad,
            fecha_creacion: now,
            fecha_actualizacion: now,
        }
    }
}

/// DTO per aggiornare una villa: sostituisce tutti i campi modificabili
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VillaUpdateDTO {
    pub id: i32,

    #[validate(length(min = 1, max = 30, message = "Nombre must be between 1 and 30 characters"))]
    pub nombre: String,

    #[serde(default)]
    pub detalle: String,

    #[serde(default)]
    pub imagen_url: String,

    #[validate(range(min = 0, message = "Ocupantes cannot be negative"))]
    #[serde(default)]
    pub ocupantes: i32,

    #[validate(range(min = 0.0, message = "Tarifa cannot be negative"))]
    pub tarifa: f64,

    #[validate(range(min = 0, message = "MetrosCuadrados cannot be negative"))]
    #[serde(default)]
    pub metros_cuadrados: i32,

    #[serde(default)]
    pub amenidad: String,
}

impl From<Villa> for VillaUpdateDTO {
    fn from(value: Villa) -> Self {
        Self {
            id: value.id,
            nombre: value.nombre,
            detalle: value.detalle,
            imagen_url: value.imagen_url,
            ocupantes: value.ocupantes,
            tarifa: value.tarifa,
            metros_cuadrados: value.metros_cuadrados,
            amenidad: value.amenidad,
        }
    }
}

impl VillaUpdateDTO {
    /// Applica i campi del DTO alla villa esistente, timestamp inclusi
    /// (li rinfresca il repository)
    pub fn apply_to(self, villa: Villa) -> Villa {
        Villa {
            id: self.id,
            nombre: self.nombre,
            detalle: self.detalle,
            imagen_url: self.imagen_url,
            ocupantes: self.ocupantes,
            tarifa: self.tarifa,
            metros_cuadrados: self.metros_cuadrados,
            amenidad: self.amenidad,
            ..villa
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_dto_defaults_and_validation() {
        let dto: VillaCreateDTO = serde_json::from_value(json!({
            "nombre": "Test Villa",
            "ocupantes": 4,
            "tarifa": 100
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.detalle, "");
        assert_eq!(dto.metros_cuadrados, 0);

        let now = Utc::now();
        let villa = dto.into_entity(now);
        assert_eq!(villa.fecha_creacion, villa.fecha_actualizacion);
    }

    #[test]
    fn test_create_dto_rejects_bad_values() {
        let dto: VillaCreateDTO = serde_json::from_value(json!({
            "nombre": "",
            "tarifa": -1.0
        }))
        .unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("nombre"));
        assert!(fields.contains_key("tarifa"));

        let too_long = VillaCreateDTO {
            nombre: "x".repeat(31),
            ..dto
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_update_dto_keeps_creation_date() {
        let created = Utc::now();
        let villa = VillaCreateDTO {
            nombre: "Vecchia".to_string(),
            detalle: String::new(),
            imagen_url: String::new(),
            ocupantes: 2,
            tarifa: 50.0,
            metros_cuadrados: 20,
            amenidad: String::new(),
        }
        .into_entity(created);

        let mut dto = VillaUpdateDTO::from(villa.clone());
        dto.nombre = "Nuova".to_string();
        let updated = dto.apply_to(villa);

        assert_eq!(updated.nombre, "Nuova");
        assert_eq!(updated.fecha_creacion, created);
    }
}
