use std::collections::BTreeSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{NotificationPublisher, NotificationService};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse,
    notifications::{
        entities::{NewNotification, NotificationType},
        requests::CreateNotificationRequest,
        responses::CreateNotificationResponse,
    },
};
use crate::services::classrooms::classroom_not_found;
use crate::services::current_user;
use crate::services::users::user_not_found;
use crate::utils::validate::validate_text;

const TITLE_MAX_CHARS: usize = 200;
const CONTENT_MAX_CHARS: usize = 2000;

pub async fn create_notification(
    service: &NotificationService,
    request: &HttpRequest,
    body: CreateNotificationRequest,
) -> ActixResult<HttpResponse> {
    let sender = current_user(request)?;
    validate_text("title", &body.title, TITLE_MAX_CHARS).map_err(SchoolSystemError::validation)?;
    let content = match body.content.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(text) => {
            validate_text("content", text, CONTENT_MAX_CHARS)
                .map_err(SchoolSystemError::validation)?;
            Some(text.to_string())
        }
    };
    if body.user_ids.is_empty() && body.classroom_id.is_none() {
        return Err(
            SchoolSystemError::validation("Specify user_ids or classroom_id as recipients").into(),
        );
    }

    let storage = service.get_storage(request)?;

    let mut recipients: BTreeSet<i64> = BTreeSet::new();
    for user_id in &body.user_ids {
        if storage.get_user_by_id(*user_id).await?.is_none() {
            return Ok(user_not_found());
        }
        recipients.insert(*user_id);
    }

    if let Some(classroom_id) = body.classroom_id {
        let Some(classroom) = storage.get_classroom_by_id(classroom_id).await? else {
            return Ok(classroom_not_found());
        };
        if let Some(teacher_id) = classroom.homeroom_teacher_id
            && let Some(teacher) = storage.get_teacher_by_id(teacher_id).await?
        {
            recipients.insert(teacher.user_id);
        }
    }

    if recipients.is_empty() {
        return Err(SchoolSystemError::validation("No recipients resolved").into());
    }

    let title = body.title.trim().to_string();
    let rows = recipients
        .iter()
        .map(|user_id| NewNotification {
            user_id: *user_id,
            notification_type: NotificationType::Announcement,
            title: title.clone(),
            content: content.clone(),
            reference_type: None,
            reference_id: None,
        })
        .collect();
    let items = storage.create_notifications(rows).await?;

    NotificationPublisher::from_request(request).publish(&items);
    info!(
        "User {} sent announcement to {} recipients",
        sender.id,
        items.len()
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreateNotificationResponse {
            recipient_count: items.len() as i64,
            items,
        },
        "Notification sent successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::services::test_support::{admin, body_json, request_as, storage, user_of};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_recipients_are_union_of_users_and_homeroom() {
        let (raw, shared) = storage().await;
        let homeroom = fixtures::teacher(&raw, "teacher01").await;
        let other = fixtures::teacher(&raw, "teacher02").await;
        let classroom = fixtures::classroom(&raw, 2025, 1, Some(homeroom.id)).await;
        let service = NotificationService::with_storage(shared.clone());
        let request = request_as(admin(&shared).await);

        let resp = create_notification(
            &service,
            &request,
            CreateNotificationRequest {
                user_ids: vec![homeroom.user_id, other.user_id],
                classroom_id: Some(classroom.id),
                title: "Sports day".to_string(),
                content: Some("  Friday 9am  ".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["recipient_count"], 2);
        assert_eq!(body["data"]["items"][0]["content"], "Friday 9am");

        let other_user = user_of(&shared, &other).await;
        assert_eq!(
            shared.count_unread_notifications(other_user.id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_rejects_missing_recipients() {
        let (raw, shared) = storage().await;
        let service = NotificationService::with_storage(shared.clone());
        let request = request_as(admin(&shared).await);

        let err = create_notification(
            &service,
            &request,
            CreateNotificationRequest {
                user_ids: vec![],
                classroom_id: None,
                title: "Hello".to_string(),
                content: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);

        let resp = create_notification(
            &service,
            &request,
            CreateNotificationRequest {
                user_ids: vec![9999],
                classroom_id: None,
                title: "Hello".to_string(),
                content: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["code"], ErrorCode::UserNotFound as i32);

        // 没有班主任的班级解析不出接收人
        let classroom = fixtures::classroom(&raw, 2025, 2, None).await;
        let err = create_notification(
            &service,
            &request,
            CreateNotificationRequest {
                user_ids: vec![],
                classroom_id: Some(classroom.id),
                title: "Hello".to_string(),
                content: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
    }
}
