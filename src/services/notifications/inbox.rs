use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NotificationService, notification_not_found};
use crate::models::{
    ApiResponse,
    notifications::{
        requests::{NotificationListParams, NotificationListQuery},
        responses::{MarkAllReadResponse, UnreadCountResponse},
    },
};
use crate::services::current_user;

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    query: NotificationListParams,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let response = storage
        .list_notifications_with_pagination(user.id, NotificationListQuery::from(query))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Notifications retrieved successfully",
    )))
}

pub async fn get_unread_count(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let unread_count = storage.count_unread_notifications(user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UnreadCountResponse { unread_count },
        "Unread count retrieved successfully",
    )))
}

pub async fn mark_as_read(
    service: &NotificationService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if storage.mark_notification_read(user.id, id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notification marked as read")))
    } else {
        Ok(notification_not_found())
    }
}

pub async fn mark_all_as_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let marked_count = storage.mark_all_notifications_read(user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MarkAllReadResponse { marked_count },
        "All notifications marked as read",
    )))
}

pub async fn delete_notification(
    service: &NotificationService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if storage.delete_notification(user.id, id).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notification deleted")))
    } else {
        Ok(notification_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::entities::{NewNotification, NotificationType};
    use crate::models::common::PaginationQuery;
    use crate::services::test_support::{body_json, request_as, storage, user_of};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    fn announcement(user_id: i64, title: &str) -> NewNotification {
        NewNotification {
            user_id,
            notification_type: NotificationType::Announcement,
            title: title.to_string(),
            content: None,
            reference_type: None,
            reference_id: None,
        }
    }

    #[tokio::test]
    async fn test_inbox_is_scoped_to_recipient() {
        let (raw, shared) = storage().await;
        let owner = user_of(&shared, &fixtures::teacher(&raw, "teacher01").await).await;
        let stranger = user_of(&shared, &fixtures::teacher(&raw, "teacher02").await).await;
        let created = shared
            .create_notifications(vec![
                announcement(owner.id, "First"),
                announcement(owner.id, "Second"),
                announcement(stranger.id, "Other"),
            ])
            .await
            .unwrap();
        let service = NotificationService::with_storage(shared.clone());
        let owner_req = request_as(owner);
        let stranger_req = request_as(stranger);

        let resp = get_unread_count(&service, &owner_req).await.unwrap();
        assert_eq!(body_json(resp).await["data"]["unread_count"], 2);

        // 他人的通知不可操作
        let resp = mark_as_read(&service, &stranger_req, created[0].id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = delete_notification(&service, &stranger_req, created[0].id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = mark_as_read(&service, &owner_req, created[0].id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = list_notifications(
            &service,
            &owner_req,
            NotificationListParams {
                pagination: PaginationQuery::default(),
                unread_only: Some(true),
            },
        )
        .await
        .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["items"][0]["title"], "Second");

        let resp = mark_all_as_read(&service, &owner_req).await.unwrap();
        assert_eq!(body_json(resp).await["data"]["marked_count"], 1);

        let resp = delete_notification(&service, &owner_req, created[1].id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = get_unread_count(&service, &stranger_req).await.unwrap();
        assert_eq!(body_json(resp).await["data"]["unread_count"], 1);
    }
}
