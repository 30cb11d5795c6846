use actix_web::{web, HttpResponse};

use crate::controllers::with_db;
use crate::error::ApiResult;
use crate::models::UpdateControlFileRequest;
use crate::AppState;

async fn list_control_files(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let files = with_db(&state, |db| db.list_control_files()).await?;
    Ok(HttpResponse::Ok().json(files))
}

async fn update_control_file(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateControlFileRequest>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let update = body.into_inner();
    let file = with_db(&state, move |db| db.update_control_file(id, &update)).await?;
    Ok(HttpResponse::Ok().json(file))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/control_files")
            .route("", web::get().to(list_control_files))
            .route("/{id}", web::put().to(update_control_file)),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    use crate::controllers::test_support::test_state;
    use crate::models::Section;

    #[actix_web::test]
    async fn test_move_between_buckets() {
        let (_dir, state) = test_state();
        let topic_id = state.db.create_topic("Work", "", None).unwrap().id;
        let plan = state.db.create_file(topic_id, "q3", Section::Plans).unwrap();
        let doc = state.db.create_file(topic_id, "notes", Section::Docs).unwrap();
        let plan_id = plan.control_file_id.unwrap();
        let doc_id = doc.control_file_id.unwrap();
        let app = crate::test_app!(state);

        let req = test::TestRequest::put()
            .uri(&format!("/control_files/{}", doc_id))
            .set_json(json!({"is_plan": true, "order_index": 0, "modification_alert": true}))
            .to_request();
        let updated: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["is_plan"], true);
        assert_eq!(updated["order_index"], 0);
        assert_eq!(updated["modification_alert"], true);

        let req = test::TestRequest::get().uri("/control_files").to_request();
        let files: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(files[0]["id"], doc_id);
        assert_eq!(files[1]["id"], plan_id);
        assert_eq!(files[1]["order_index"], 1);
    }

    #[actix_web::test]
    async fn test_missing_control_file_is_404() {
        let (_dir, state) = test_state();
        let app = crate::test_app!(state);

        let req = test::TestRequest::put()
            .uri("/control_files/5")
            .set_json(json!({"modification_alert": true}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
