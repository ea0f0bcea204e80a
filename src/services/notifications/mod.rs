pub mod create;
pub mod dispatcher;
pub mod inbox;

pub use dispatcher::{NotificationPublisher, spawn_dispatcher};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::notifications::requests::{CreateNotificationRequest, NotificationListParams};
use crate::models::{ApiResponse, ErrorCode};

crate::services::define_service!(
    /// 站内通知与推送
    ///
    /// 收件箱操作只作用于当前账号自己的通知。
    NotificationService
);

impl NotificationService {
    // 发送公告
    pub async fn create_notification(
        &self,
        request: &HttpRequest,
        body: CreateNotificationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_notification(self, request, body).await
    }

    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        query: NotificationListParams,
    ) -> ActixResult<HttpResponse> {
        inbox::list_notifications(self, request, query).await
    }

    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        inbox::get_unread_count(self, request).await
    }

    pub async fn mark_as_read(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        inbox::mark_as_read(self, request, id).await
    }

    pub async fn mark_all_as_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        inbox::mark_all_as_read(self, request).await
    }

    pub async fn delete_notification(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        inbox::delete_notification(self, request, id).await
    }
}

fn notification_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotificationNotFound,
        "Notification not found",
    ))
}
