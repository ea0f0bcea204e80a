use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{CounselService, Viewer, counsel_not_found};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    ApiResponse,
    counsels::{
        entities::Counsel,
        requests::{CreateCounselRequest, UpdateCounselRequest},
    },
    notifications::entities::{NewNotification, NotificationType},
    students::entities::Student,
    teachers::entities::Teacher,
};
use crate::services::behaviors::record_forbidden;
use crate::services::notifications::NotificationPublisher;
use crate::services::students::student_not_found;
use crate::services::{current_teacher, current_user};
use crate::storage::Storage;
use crate::utils::validate::validate_text;

const CONTENT_MAX_CHARS: usize = 4000;
const PLAN_MAX_CHARS: usize = 1000;

fn validate_next_date(
    counsel_date: chrono::NaiveDate,
    next: Option<chrono::NaiveDate>,
) -> std::result::Result<(), &'static str> {
    match next {
        Some(next) if next < counsel_date => {
            Err("next_counsel_date must not be before counsel_date")
        }
        _ => Ok(()),
    }
}

// 空白的后续计划视为未填写
fn normalize_plan(plan: Option<String>) -> std::result::Result<Option<String>, String> {
    match plan.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => {
            validate_text("next_plan", text, PLAN_MAX_CHARS)?;
            Ok(Some(text.to_string()))
        }
    }
}

/// 学生最近所在班级的班主任不是撰写人时，给班主任发通知
async fn notify_homeroom(
    storage: &Arc<dyn Storage>,
    publisher: &NotificationPublisher,
    counsel: &Counsel,
    student: &Student,
    author: &Teacher,
) -> Result<()> {
    let Some(classroom) = storage.get_classroom_of_student(student.id, None).await? else {
        return Ok(());
    };
    let Some(homeroom_id) = classroom.homeroom_teacher_id else {
        return Ok(());
    };
    if homeroom_id == author.id {
        return Ok(());
    }
    let Some(homeroom) = storage.get_teacher_by_id(homeroom_id).await? else {
        return Ok(());
    };

    let created = storage
        .create_notifications(vec![NewNotification {
            user_id: homeroom.user_id,
            notification_type: NotificationType::CounselCreated,
            title: format!("New counsel record for {}", student.name),
            content: Some(format!(
                "{} recorded a {} counsel on {}",
                author.name, counsel.category, counsel.counsel_date
            )),
            reference_type: Some("counsel".to_string()),
            reference_id: Some(counsel.id),
        }])
        .await?;
    publisher.publish(&created);
    Ok(())
}

pub async fn create_counsel(
    service: &CounselService,
    request: &HttpRequest,
    mut body: CreateCounselRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    validate_text("content", &body.content, CONTENT_MAX_CHARS)
        .map_err(SchoolSystemError::validation)?;
    body.content = body.content.trim().to_string();
    body.next_plan = normalize_plan(body.next_plan).map_err(SchoolSystemError::validation)?;
    validate_next_date(body.counsel_date, body.next_counsel_date)
        .map_err(SchoolSystemError::validation)?;

    let storage = service.get_storage(request)?;

    // 咨询记录必须由教师撰写
    let Some(author) = current_teacher(&storage, &user).await? else {
        return Ok(record_forbidden());
    };
    let Some(student) = storage.get_student_by_id(body.student_id).await? else {
        return Ok(student_not_found());
    };

    let counsel = storage.create_counsel(body, author.id).await?;
    info!(
        "Counsel {} written for student {} by teacher {}",
        counsel.id, student.id, author.id
    );

    let publisher = NotificationPublisher::from_request(request);
    if let Err(e) = notify_homeroom(&storage, &publisher, &counsel, &student, &author).await {
        warn!("Failed to notify homeroom teacher for counsel {}: {}", counsel.id, e);
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        counsel,
        "Counsel record created successfully",
    )))
}

pub async fn update_counsel(
    service: &CounselService,
    request: &HttpRequest,
    id: i64,
    mut body: UpdateCounselRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    if let Some(content) = body.content.as_mut() {
        validate_text("content", content, CONTENT_MAX_CHARS)
            .map_err(SchoolSystemError::validation)?;
        *content = content.trim().to_string();
    }
    if let Some(plan) = body.next_plan.take() {
        body.next_plan = Some(normalize_plan(plan).map_err(SchoolSystemError::validation)?);
    }

    let storage = service.get_storage(request)?;
    let viewer = Viewer::resolve(&storage, &user).await?;

    let Some(existing) = storage.get_counsel_by_id(id).await? else {
        return Ok(counsel_not_found());
    };
    if !viewer.can_view(&existing) {
        return Ok(counsel_not_found());
    }
    if !viewer.can_modify(&existing) {
        return Ok(record_forbidden());
    }

    let counsel_date = body.counsel_date.unwrap_or(existing.counsel_date);
    let next_date = match body.next_counsel_date {
        Some(next) => next,
        None => existing.next_counsel_date,
    };
    validate_next_date(counsel_date, next_date).map_err(SchoolSystemError::validation)?;

    match storage.update_counsel(id, body).await? {
        Some(counsel) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            counsel,
            "Counsel record updated successfully",
        ))),
        None => Ok(counsel_not_found()),
    }
}

pub async fn delete_counsel(
    service: &CounselService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;
    let viewer = Viewer::resolve(&storage, &user).await?;

    let Some(existing) = storage.get_counsel_by_id(id).await? else {
        return Ok(counsel_not_found());
    };
    if !viewer.can_view(&existing) {
        return Ok(counsel_not_found());
    }
    if !viewer.can_modify(&existing) {
        return Ok(record_forbidden());
    }

    if storage.delete_counsel(id).await? {
        info!("Counsel {} deleted by {}", id, user.id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Counsel record deleted successfully",
        )))
    } else {
        Ok(counsel_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorCode;
    use crate::models::common::PaginationQuery;
    use crate::models::counsels::{entities::CounselCategory, requests::CounselListParams};
    use crate::services::counsels::list::{get_counsel, list_counsels};
    use crate::services::test_support::{admin, body_json, request_as, storage, user_of};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
    }

    fn new_counsel(student_id: i64, is_shared: bool) -> CreateCounselRequest {
        CreateCounselRequest {
            student_id,
            counsel_date: date(10),
            category: CounselCategory::Career,
            content: "Discussed university options.".to_string(),
            next_plan: Some("   ".to_string()),
            next_counsel_date: Some(date(24)),
            is_shared,
        }
    }

    fn list_params() -> CounselListParams {
        CounselListParams {
            pagination: PaginationQuery::default(),
            student_id: None,
            teacher_id: None,
            category: None,
        }
    }

    #[tokio::test]
    async fn test_create_notifies_other_homeroom_teacher() {
        let (raw, shared) = storage().await;
        let homeroom = fixtures::teacher(&raw, "teacher01").await;
        let author = fixtures::teacher(&raw, "teacher02").await;
        let classroom = fixtures::classroom(&raw, 2025, 1, Some(homeroom.id)).await;
        let student = fixtures::student(&raw, "S001").await;
        shared
            .add_classroom_student(classroom.id, student.id, Some(1))
            .await
            .unwrap();
        let service = CounselService::with_storage(shared.clone());

        let resp = create_counsel(
            &service,
            &request_as(user_of(&shared, &author).await),
            new_counsel(student.id, true),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert!(body["data"]["next_plan"].is_null());
        assert_eq!(body["data"]["teacher_id"], author.id);

        assert_eq!(
            shared.count_unread_notifications(homeroom.user_id).await.unwrap(),
            1
        );

        // 班主任本人撰写时不通知
        let resp = create_counsel(
            &service,
            &request_as(user_of(&shared, &homeroom).await),
            new_counsel(student.id, true),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            shared.count_unread_notifications(homeroom.user_id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_create_requires_teacher_profile_and_valid_dates() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S001").await;
        let teacher = fixtures::teacher(&raw, "teacher01").await;
        let service = CounselService::with_storage(shared.clone());

        let resp = create_counsel(
            &service,
            &request_as(admin(&shared).await),
            new_counsel(student.id, true),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let mut body = new_counsel(student.id, true);
        body.next_counsel_date = Some(date(1));
        let err = create_counsel(&service, &request_as(user_of(&shared, &teacher).await), body)
            .await
            .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);

        let resp = create_counsel(
            &service,
            &request_as(user_of(&shared, &teacher).await),
            new_counsel(student.id + 100, true),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["code"], ErrorCode::StudentNotFound as i32);
    }

    #[tokio::test]
    async fn test_private_counsel_visibility() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S001").await;
        let author = fixtures::teacher(&raw, "teacher01").await;
        let other = fixtures::teacher(&raw, "teacher02").await;
        let service = CounselService::with_storage(shared.clone());
        let author_req = request_as(user_of(&shared, &author).await);
        let other_req = request_as(user_of(&shared, &other).await);
        let admin_req = request_as(admin(&shared).await);

        let resp = create_counsel(&service, &author_req, new_counsel(student.id, false))
            .await
            .unwrap();
        let private_id = body_json(resp).await["data"]["id"].as_i64().unwrap();
        create_counsel(&service, &author_req, new_counsel(student.id, true))
            .await
            .unwrap();

        let total = |resp: HttpResponse| async move {
            body_json(resp).await["data"]["pagination"]["total"]
                .as_i64()
                .unwrap()
        };
        assert_eq!(
            total(list_counsels(&service, &author_req, list_params()).await.unwrap()).await,
            2
        );
        assert_eq!(
            total(list_counsels(&service, &other_req, list_params()).await.unwrap()).await,
            1
        );
        assert_eq!(
            total(list_counsels(&service, &admin_req, list_params()).await.unwrap()).await,
            2
        );

        let resp = get_counsel(&service, &other_req, private_id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = get_counsel(&service, &admin_req, private_id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = delete_counsel(&service, &other_req, private_id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = delete_counsel(&service, &author_req, private_id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_only_author_or_admin_updates_shared_counsel() {
        let (raw, shared) = storage().await;
        let student = fixtures::student(&raw, "S001").await;
        let author = fixtures::teacher(&raw, "teacher01").await;
        let other = fixtures::teacher(&raw, "teacher02").await;
        let service = CounselService::with_storage(shared.clone());
        let author_req = request_as(user_of(&shared, &author).await);

        let resp = create_counsel(&service, &author_req, new_counsel(student.id, true))
            .await
            .unwrap();
        let id = body_json(resp).await["data"]["id"].as_i64().unwrap();

        let resp = update_counsel(
            &service,
            &request_as(user_of(&shared, &other).await),
            id,
            UpdateCounselRequest {
                content: Some("Edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // 改期后早于下次咨询日期的约束仍然生效
        let err = update_counsel(
            &service,
            &author_req,
            id,
            UpdateCounselRequest {
                counsel_date: Some(date(28)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);

        let resp = update_counsel(
            &service,
            &author_req,
            id,
            UpdateCounselRequest {
                next_counsel_date: Some(None),
                next_plan: Some(Some("Follow up with parents".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert!(body["data"]["next_counsel_date"].is_null());
        assert_eq!(body["data"]["next_plan"], "Follow up with parents");
    }
}
