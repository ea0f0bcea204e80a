//! 存储层测试数据

use super::SeaOrmStorage;
use crate::services::score_summaries::calculate::aggregate;
use crate::models::{
    classrooms::{entities::Classroom, requests::CreateClassroomRequest},
    evaluation_methods::{
        entities::{EvaluationMethod, ExamType, MethodWrite},
        requests::CreateEvaluationMethodRequest,
    },
    scores::entities::{Score, ScoreWrite},
    students::{
        entities::{Gender, Student},
        requests::CreateStudentRequest,
    },
    subjects::{entities::Subject, requests::CreateSubjectRequest},
    teachers::{entities::Teacher, requests::CreateTeacherRequest},
};

pub(crate) fn new_teacher(username: &str, name: &str) -> CreateTeacherRequest {
    CreateTeacherRequest {
        username: username.to_string(),
        email: format!("{username}@school.test"),
        password: "hashed".to_string(),
        name: name.to_string(),
        phone: None,
        subject_id: None,
    }
}

pub(crate) async fn teacher(storage: &SeaOrmStorage, username: &str) -> Teacher {
    storage
        .create_teacher_impl(new_teacher(username, username))
        .await
        .unwrap()
}

pub(crate) fn new_student(number: &str, name: &str) -> CreateStudentRequest {
    CreateStudentRequest {
        student_number: number.to_string(),
        name: name.to_string(),
        gender: Gender::Female,
        birth_date: None,
        phone: None,
        guardian_name: None,
        guardian_phone: None,
        address: None,
    }
}

pub(crate) async fn student(storage: &SeaOrmStorage, number: &str) -> Student {
    storage
        .create_student_impl(new_student(number, number))
        .await
        .unwrap()
}

pub(crate) async fn classroom(
    storage: &SeaOrmStorage,
    year: i32,
    class_number: i32,
    homeroom_teacher_id: Option<i64>,
) -> Classroom {
    storage
        .create_classroom_impl(CreateClassroomRequest {
            year,
            grade: 3,
            class_number,
            homeroom_teacher_id,
        })
        .await
        .unwrap()
}

pub(crate) async fn subject(storage: &SeaOrmStorage, name: &str) -> Subject {
    storage
        .create_subject_impl(CreateSubjectRequest {
            name: name.to_string(),
            description: None,
        })
        .await
        .unwrap()
}

/// 2025 学年第 1 学期 3 年级下的评价方式
pub(crate) async fn method(
    storage: &SeaOrmStorage,
    subject_id: i64,
    title: &str,
    weight: f64,
    full_score: f64,
) -> EvaluationMethod {
    match storage
        .create_evaluation_method_impl(
            CreateEvaluationMethodRequest {
                subject_id,
                year: 2025,
                semester: 1,
                grade: 3,
                exam_type: ExamType::Written,
                title: title.to_string(),
                weight,
                full_score,
            },
            aggregate,
        )
        .await
        .unwrap()
    {
        MethodWrite::Saved(method) => method,
        other => panic!("evaluation method fixture rejected: {other:?}"),
    }
}

/// 录入成绩（同时刷新汇总）
pub(crate) async fn scores(
    storage: &SeaOrmStorage,
    method: &EvaluationMethod,
    entries: &[(i64, f64)],
) -> Vec<Score> {
    match storage
        .save_scores_impl(method.id, entries, aggregate)
        .await
        .unwrap()
    {
        ScoreWrite::Saved(scores) => scores,
        other => panic!("score fixture rejected: {other:?}"),
    }
}
