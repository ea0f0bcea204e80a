pub mod list;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::behaviors::requests::{
    BehaviorListParams, CreateBehaviorRequest, UpdateBehaviorRequest,
};
use crate::models::{ApiResponse, ErrorCode};

crate::services::define_service!(
    /// 行为特点记录，修改与删除限撰写人或管理员
    BehaviorService
);

impl BehaviorService {
    pub async fn list_behaviors(
        &self,
        request: &HttpRequest,
        query: BehaviorListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_behaviors(self, request, query).await
    }

    pub async fn get_behavior(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        list::get_behavior(self, request, id).await
    }

    pub async fn create_behavior(
        &self,
        request: &HttpRequest,
        body: CreateBehaviorRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_behavior(self, request, body).await
    }

    pub async fn update_behavior(
        &self,
        request: &HttpRequest,
        id: i64,
        body: UpdateBehaviorRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_behavior(self, request, id, body).await
    }

    pub async fn delete_behavior(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        manage::delete_behavior(self, request, id).await
    }
}

fn behavior_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::BehaviorNotFound,
        "Behavior record not found",
    ))
}

pub(crate) fn record_forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::RecordPermissionDenied,
        "Only the author or an admin can modify this record",
    ))
}
