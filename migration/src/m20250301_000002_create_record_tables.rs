use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 评价方式表 ====================
        manager
            .create_table(
                Table::create()
                    .table(EvaluationMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationMethods::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EvaluationMethods::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationMethods::Year).integer().not_null())
                    .col(
                        ColumnDef::new(EvaluationMethods::Semester)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationMethods::Grade).integer().not_null())
                    .col(
                        ColumnDef::new(EvaluationMethods::ExamType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EvaluationMethods::Title).string().not_null())
                    .col(ColumnDef::new(EvaluationMethods::Weight).double().not_null())
                    .col(
                        ColumnDef::new(EvaluationMethods::FullScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationMethods::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationMethods::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationMethods::Table, EvaluationMethods::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 成绩表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scores::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scores::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Scores::EvaluationMethodId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Scores::RawScore).double().not_null())
                    .col(ColumnDef::new(Scores::WeightedScore).double().not_null())
                    .col(ColumnDef::new(Scores::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Scores::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::EvaluationMethodId)
                            .to(EvaluationMethods::Table, EvaluationMethods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 成绩汇总表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ScoreSummaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScoreSummaries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScoreSummaries::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreSummaries::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScoreSummaries::Year).integer().not_null())
                    .col(ColumnDef::new(ScoreSummaries::Semester).integer().not_null())
                    .col(ColumnDef::new(ScoreSummaries::Grade).integer().not_null())
                    .col(
                        ColumnDef::new(ScoreSummaries::TotalScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreSummaries::SubjectAverage)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreSummaries::StandardDeviation)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScoreSummaries::Rank).integer().not_null())
                    .col(
                        ColumnDef::new(ScoreSummaries::StudentCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScoreSummaries::GradeBand).integer().not_null())
                    .col(
                        ColumnDef::new(ScoreSummaries::AchievementLevel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScoreSummaries::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScoreSummaries::Table, ScoreSummaries::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScoreSummaries::Table, ScoreSummaries::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 出勤表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendances::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::Date).date().not_null())
                    .col(
                        ColumnDef::new(Attendances::AttendanceType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendances::Reason).string().not_null())
                    .col(ColumnDef::new(Attendances::Note).text().null())
                    .col(ColumnDef::new(Attendances::RecordedBy).big_integer().null())
                    .col(ColumnDef::new(Attendances::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::RecordedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 行为记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Behaviors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Behaviors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Behaviors::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Behaviors::Year).integer().not_null())
                    .col(ColumnDef::new(Behaviors::Semester).integer().not_null())
                    .col(ColumnDef::new(Behaviors::Content).text().not_null())
                    .col(ColumnDef::new(Behaviors::WrittenBy).big_integer().null())
                    .col(ColumnDef::new(Behaviors::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Behaviors::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Behaviors::Table, Behaviors::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Behaviors::Table, Behaviors::WrittenBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 咨询记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Counsels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Counsels::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Counsels::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Counsels::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Counsels::CounselDate).date().not_null())
                    .col(ColumnDef::new(Counsels::Category).string().not_null())
                    .col(ColumnDef::new(Counsels::Content).text().not_null())
                    .col(ColumnDef::new(Counsels::NextPlan).text().null())
                    .col(ColumnDef::new(Counsels::NextCounselDate).date().null())
                    .col(
                        ColumnDef::new(Counsels::IsShared)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Counsels::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Counsels::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Counsels::Table, Counsels::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Counsels::Table, Counsels::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 通知表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Content).text().null())
                    .col(ColumnDef::new(Notifications::ReferenceType).string().null())
                    .col(
                        ColumnDef::new(Notifications::ReferenceId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 唯一约束 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_evaluation_methods_scope_title")
                    .table(EvaluationMethods::Table)
                    .col(EvaluationMethods::SubjectId)
                    .col(EvaluationMethods::Year)
                    .col(EvaluationMethods::Semester)
                    .col(EvaluationMethods::Grade)
                    .col(EvaluationMethods::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_scores_student_method")
                    .table(Scores::Table)
                    .col(Scores::StudentId)
                    .col(Scores::EvaluationMethodId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_score_summaries_student_subject_term")
                    .table(ScoreSummaries::Table)
                    .col(ScoreSummaries::StudentId)
                    .col(ScoreSummaries::SubjectId)
                    .col(ScoreSummaries::Year)
                    .col(ScoreSummaries::Semester)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_attendances_student_date")
                    .table(Attendances::Table)
                    .col(Attendances::StudentId)
                    .col(Attendances::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ==================== 查询索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scores_evaluation_method_id")
                    .table(Scores::Table)
                    .col(Scores::EvaluationMethodId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_behaviors_student_id")
                    .table(Behaviors::Table)
                    .col(Behaviors::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_counsels_student_id")
                    .table(Counsels::Table)
                    .col(Counsels::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_user_id")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Counsels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Behaviors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScoreSummaries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvaluationMethods::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Teachers {
    #[sea_orm(iden = "teachers")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum EvaluationMethods {
    #[sea_orm(iden = "evaluation_methods")]
    Table,
    Id,
    SubjectId,
    Year,
    Semester,
    Grade,
    ExamType,
    Title,
    Weight,
    FullScore,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Scores {
    #[sea_orm(iden = "scores")]
    Table,
    Id,
    StudentId,
    EvaluationMethodId,
    RawScore,
    WeightedScore,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScoreSummaries {
    #[sea_orm(iden = "score_summaries")]
    Table,
    Id,
    StudentId,
    SubjectId,
    Year,
    Semester,
    Grade,
    TotalScore,
    SubjectAverage,
    StandardDeviation,
    Rank,
    StudentCount,
    GradeBand,
    AchievementLevel,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attendances {
    #[sea_orm(iden = "attendances")]
    Table,
    Id,
    StudentId,
    Date,
    AttendanceType,
    Reason,
    Note,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Behaviors {
    #[sea_orm(iden = "behaviors")]
    Table,
    Id,
    StudentId,
    Year,
    Semester,
    Content,
    WrittenBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Counsels {
    #[sea_orm(iden = "counsels")]
    Table,
    Id,
    StudentId,
    TeacherId,
    CounselDate,
    Category,
    Content,
    NextPlan,
    NextCounselDate,
    IsShared,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    UserId,
    NotificationType,
    Title,
    Content,
    ReferenceType,
    ReferenceId,
    IsRead,
    CreatedAt,
}
