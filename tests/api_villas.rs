//! Integration tests per gli endpoints delle ville

mod common;

#[cfg(test)]
mod villa_tests {
    use super::common::{assert_envelope, create_test_server};
    use magic_villa::entities::Villa;
    use magic_villa::repositories::{Repository, VillaRepository};
    use serde_json::json;
    use sqlx::SqlitePool;

    async fn stored_villa(pool: &SqlitePool, id: i32) -> Option<Villa> {
        let same_id = |v: &Villa| v.id == id;
        VillaRepository::new(pool.clone())
            .fetch_one_detached(Some(&same_id))
            .await
            .expect("fetch should succeed")
    }

    fn new_villa_body(nombre: &str) -> serde_json::Value {
        json!({
            "nombre": nombre,
            "detalle": "Villa con giardino",
            "imagenUrl": "",
            "ocupantes": 4,
            "tarifa": 120.0,
            "metrosCuadrados": 45,
            "amenidad": "Piscina"
        })
    }

    #[sqlx::test]
    async fn test_root_health_check(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text("Server is running!");
        Ok(())
    }

    // ============================================================
    // Test per GET /api/Villa - get_villas
    // ============================================================

    #[sqlx::test]
    async fn test_get_villas_returns_seed(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.get("/api/Villa").await;

        response.assert_status_ok();
        let body = assert_envelope(&response, 200, true);
        let villas = body["resultado"].as_array().expect("resultado should be a list");
        assert_eq!(villas.len(), 2);
        assert_eq!(villas[0]["id"], 1);
        assert_eq!(villas[0]["nombre"], "Villa Real");
        assert_eq!(villas[1]["nombre"], "Premium vista a la piscina");
        assert!(villas[0].get("fechaCreacion").is_none(), "read shape has no timestamps");
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("villas")))]
    async fn test_get_villas_in_key_order(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.get("/api/Villa").await;

        let body = assert_envelope(&response, 200, true);
        let nombres: Vec<&str> = body["resultado"]
            .as_array()
            .expect("resultado should be a list")
            .iter()
            .filter_map(|v| v["nombre"].as_str())
            .collect();
        assert_eq!(nombres, vec!["Villa Real", "Premium vista a la piscina", "Casa del Lago"]);

        // il nome della fixture è già occupato, anche in minuscolo
        let response = server
            .post("/api/Villa")
            .json(&new_villa_body("casa del lago"))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    // ============================================================
    // Test per GET /api/Villa/{id} - get_villa
    // ============================================================

    #[sqlx::test]
    async fn test_get_villa_success(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.get("/api/Villa/2").await;

        response.assert_status_ok();
        let body = assert_envelope(&response, 200, true);
        assert_eq!(body["resultado"]["ocupantes"], 4);
        assert_eq!(body["resultado"]["metrosCuadrados"], 40);
        assert_eq!(body["resultado"]["tarifa"], 150.0);
        Ok(())
    }

    #[sqlx::test]
    async fn test_get_villa_zero_id(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.get("/api/Villa/0").await;

        response.assert_status_bad_request();
        assert_envelope(&response, 400, false);
        Ok(())
    }

    #[sqlx::test]
    async fn test_get_villa_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.get("/api/Villa/99").await;

        response.assert_status_not_found();
        assert_envelope(&response, 404, false);
        Ok(())
    }

    #[sqlx::test]
    async fn test_get_villa_non_numeric_id(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.get("/api/Villa/abc").await;

        response.assert_status_bad_request();
        assert_envelope(&response, 400, false);
        Ok(())
    }

    // ============================================================
    // Test per POST /api/Villa - create_villa
    // ============================================================

    #[sqlx::test]
    async fn test_create_villa_success(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());

        let response = server
            .post("/api/Villa")
            .json(&new_villa_body("Villa Nuova"))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let body = assert_envelope(&response, 201, true);
        let villa = &body["resultado"];
        let id = villa["id"].as_i64().expect("id should be a number");
        assert!(id > 0);
        assert_eq!(villa["fechaCreacion"], villa["fechaActualizacion"]);

        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert_eq!(location, Some(format!("/api/Villa/{id}")));

        let stored = stored_villa(&pool, id as i32).await.expect("villa should be stored");
        assert_eq!(stored.nombre, "Villa Nuova");
        assert_eq!(stored.fecha_creacion, stored.fecha_actualizacion);
        Ok(())
    }

    #[sqlx::test]
    async fn test_create_villa_duplicate_name_any_case(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        for nombre in ["Villa Real", "VILLA REAL", "vIlLa ReAl"] {
            let response = server.post("/api/Villa").json(&new_villa_body(nombre)).await;

            response.assert_status_bad_request();
            assert_envelope(&response, 400, false);
        }

        let response = server.get("/api/Villa").await;
        let body = assert_envelope(&response, 200, true);
        assert_eq!(body["resultado"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[sqlx::test]
    async fn test_create_villa_validation(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let too_long = "x".repeat(31);
        let invalid_bodies = [
            new_villa_body(""),
            new_villa_body(&too_long),
            json!({ "nombre": "Senza tarifa" }),
            json!({ "nombre": "Tarifa negativa", "tarifa": -1.0 }),
            json!({ "nombre": "Ocupanti negativi", "tarifa": 10.0, "ocupantes": -3 }),
        ];

        for body in invalid_bodies {
            let response = server.post("/api/Villa").json(&body).await;
            response.assert_status_bad_request();
            assert_envelope(&response, 400, false);
        }
        Ok(())
    }

    #[sqlx::test]
    async fn test_create_villa_defaults_optional_fields(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server
            .post("/api/Villa")
            .json(&json!({ "nombre": "Minimal", "tarifa": 10.0 }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let body = assert_envelope(&response, 201, true);
        assert_eq!(body["resultado"]["detalle"], "");
        assert_eq!(body["resultado"]["amenidad"], "");
        assert_eq!(body["resultado"]["ocupantes"], 0);
        Ok(())
    }

    #[sqlx::test]
    async fn test_create_villa_malformed_json(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server
            .post("/api/Villa")
            .text("{ \"nombre\": ")
            .content_type("application/json")
            .await;

        response.assert_status_bad_request();
        assert_envelope(&response, 400, false);
        Ok(())
    }

    // ============================================================
    // Test per PUT /api/Villa/{id} - update_villa
    // ============================================================

    #[sqlx::test]
    async fn test_update_villa_success(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());
        let before = stored_villa(&pool, 1).await.expect("seed villa");

        let response = server
            .put("/api/Villa/1")
            .json(&json!({
                "id": 1,
                "nombre": "Villa Real",
                "detalle": "Ristrutturata",
                "imagenUrl": "https://example.com/villa.jpg",
                "ocupantes": 6,
                "tarifa": 250.0,
                "metrosCuadrados": 55,
                "amenidad": "Sauna"
            }))
            .await;

        // NoContent viaggia come 200 per non perdere l'envelope
        response.assert_status_ok();
        let body = assert_envelope(&response, 204, true);
        assert!(body["resultado"].is_null());

        let after = stored_villa(&pool, 1).await.expect("villa should still exist");
        assert_eq!(after.detalle, "Ristrutturata");
        assert_eq!(after.ocupantes, 6);
        assert_eq!(after.tarifa, 250.0);
        assert_eq!(after.fecha_creacion, before.fecha_creacion);
        assert!(after.fecha_actualizacion > before.fecha_actualizacion);
        Ok(())
    }

    #[sqlx::test]
    async fn test_update_villa_id_mismatch(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let mut body = new_villa_body("Villa Real");
        body["id"] = json!(2);
        let response = server.put("/api/Villa/1").json(&body).await;

        response.assert_status_bad_request();
        assert_envelope(&response, 400, false);
        Ok(())
    }

    #[sqlx::test]
    async fn test_update_villa_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let mut body = new_villa_body("Nessuna");
        body["id"] = json!(99);
        let response = server.put("/api/Villa/99").json(&body).await;

        response.assert_status_not_found();
        assert_envelope(&response, 404, false);
        Ok(())
    }

    // ============================================================
    // Test per PATCH /api/Villa/{id} - patch_villa
    // ============================================================

    #[sqlx::test]
    async fn test_patch_villa_success(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());
        let before = stored_villa(&pool, 2).await.expect("seed villa");

        let response = server
            .patch("/api/Villa/2")
            .json(&json!([
                { "op": "replace", "path": "/Nombre", "value": "Premium con terrazza" },
                { "op": "replace", "path": "/tarifa", "value": 175.0 }
            ]))
            .await;

        response.assert_status_ok();
        assert_envelope(&response, 204, true);

        let after = stored_villa(&pool, 2).await.expect("villa should still exist");
        assert_eq!(after.nombre, "Premium con terrazza");
        assert_eq!(after.tarifa, 175.0);
        assert_eq!(after.ocupantes, before.ocupantes);
        assert_eq!(after.fecha_creacion, before.fecha_creacion);
        assert!(after.fecha_actualizacion > before.fecha_actualizacion);
        Ok(())
    }

    #[sqlx::test]
    async fn test_patch_villa_rejected_documents(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());
        let before = stored_villa(&pool, 1).await.expect("seed villa");

        let rejected = [
            json!([]),
            json!([{ "op": "replace", "path": "/id", "value": 5 }]),
            json!([{ "op": "replace", "path": "/piscina", "value": true }]),
            json!([{ "op": "replace", "path": "/ocupantes", "value": "molti" }]),
            json!([{ "op": "replace", "path": "/tarifa", "value": -10.0 }]),
            json!([{ "op": "remove", "path": "/nombre" }]),
            json!([{ "op": "replace", "path": "/nombre", "value": "" }]),
        ];

        for document in rejected {
            let response = server.patch("/api/Villa/1").json(&document).await;
            response.assert_status_bad_request();
            assert_envelope(&response, 400, false);
        }

        // nessun patch rifiutato deve aver scritto qualcosa
        assert_eq!(stored_villa(&pool, 1).await, Some(before));
        Ok(())
    }

    #[sqlx::test]
    async fn test_patch_villa_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server
            .patch("/api/Villa/99")
            .json(&json!([{ "op": "replace", "path": "/nombre", "value": "x" }]))
            .await;

        response.assert_status_not_found();
        assert_envelope(&response, 404, false);
        Ok(())
    }

    // ============================================================
    // Test per DELETE /api/Villa/{id} - delete_villa
    // ============================================================

    #[sqlx::test]
    async fn test_delete_villa_then_not_found(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.delete("/api/Villa/2").await;
        response.assert_status_ok();
        assert_envelope(&response, 204, true);

        let response = server.get("/api/Villa/2").await;
        response.assert_status_not_found();

        let response = server.delete("/api/Villa/2").await;
        response.assert_status_not_found();
        assert_envelope(&response, 404, false);
        Ok(())
    }

    #[sqlx::test]
    async fn test_delete_villa_zero_id(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool);

        let response = server.delete("/api/Villa/0").await;

        response.assert_status_bad_request();
        assert_envelope(&response, 400, false);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("numero_villas")))]
    async fn test_delete_villa_with_numbers(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(pool.clone());

        let response = server.delete("/api/Villa/1").await;

        response.assert_status_bad_request();
        assert_envelope(&response, 400, false);
        assert!(stored_villa(&pool, 1).await.is_some());
        Ok(())
    }
}
