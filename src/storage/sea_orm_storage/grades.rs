//! 成绩存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::activities::{Column as ActivityColumn, Entity as Activities};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::subjects::{Column as SubjectColumn, Entity as Subjects};
use crate::errors::{EduManagerError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    common::normalize_page,
    grades::{
        entities::{Grade, GradeDetail, NewGrade},
        requests::GradeListQuery,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 通过 ID 获取成绩
    pub async fn get_grade_by_id_impl(&self, grade_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 通过 (学生, 活动) 获取成绩
    pub async fn get_grade_by_student_and_activity_impl(
        &self,
        student_id: i64,
        activity_id: i64,
    ) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ActivityId.eq(activity_id))
            .one(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 写入成绩
    ///
    /// 已有记录返回 `DuplicateGrade`。查询与写入不放在同一事务里：
    /// SQLite 的读事务升级为写事务时会直接返回 busy，而单条 INSERT 会在
    /// busy_timeout 内等待写锁。并发写入绕过查询时由唯一索引兜底，
    /// 返回 `ConstraintViolation`。
    pub async fn insert_grade_impl(&self, grade: NewGrade) -> Result<Grade> {
        if self
            .get_grade_by_student_and_activity_impl(grade.student_id, grade.activity_id)
            .await?
            .is_some()
        {
            return Err(EduManagerError::duplicate_grade(format!(
                "Student {} already has a grade for activity {}",
                grade.student_id, grade.activity_id
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            student_id: Set(grade.student_id),
            activity_id: Set(grade.activity_id),
            value: Set(grade.value),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduManagerError::from_db("写入成绩失败", e))?;

        Ok(result.into_grade())
    }

    /// 修改成绩分数
    pub async fn update_grade_value_impl(&self, grade_id: i64, value: f64) -> Result<Option<Grade>> {
        // 先检查成绩是否存在
        let existing = self.get_grade_by_id_impl(grade_id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(grade_id),
            value: Set(value),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("更新成绩失败: {e}")))?;

        self.get_grade_by_id_impl(grade_id).await
    }

    /// 删除成绩
    pub async fn delete_grade_impl(&self, grade_id: i64) -> Result<bool> {
        let result = Grades::delete_by_id(grade_id)
            .exec(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 分页列出教师本人科目下的成绩，最新录入在前
    pub async fn list_grades_with_pagination_impl(
        &self,
        teacher_id: i64,
        query: GradeListQuery,
    ) -> Result<PaginatedResponse<GradeDetail>> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut scope = self.list_subject_ids_by_teacher_impl(teacher_id).await?;
        if let Some(subject_id) = query.subject_id {
            scope.retain(|id| *id == subject_id);
        }

        if scope.is_empty() {
            return Ok(PaginatedResponse {
                items: Vec::new(),
                pagination: PaginationInfo::empty(page, size),
            });
        }

        let mut select = Grades::find()
            .inner_join(Activities)
            .filter(ActivityColumn::SubjectId.is_in(scope));

        // 活动筛选
        if let Some(activity_id) = query.activity_id {
            select = select.filter(Column::ActivityId.eq(activity_id));
        }

        // 学生筛选
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        select = select.order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询成绩总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询成绩页数失败: {e}")))?;

        let grades = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询成绩列表失败: {e}")))?;

        let items = self.attach_grade_details(grades).await?;

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    // 批量补全学生名、活动名与科目名
    async fn attach_grade_details(
        &self,
        grades: Vec<crate::entity::grades::Model>,
    ) -> Result<Vec<GradeDetail>> {
        if grades.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = grades.iter().map(|g| g.student_id).collect();
        let activity_ids: Vec<i64> = grades.iter().map(|g| g.activity_id).collect();

        let student_names: HashMap<i64, String> = Students::find()
            .select_only()
            .column(StudentColumn::Id)
            .column(StudentColumn::Name)
            .filter(StudentColumn::Id.is_in(student_ids))
            .into_tuple::<(i64, String)>()
            .all(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询学生失败: {e}")))?
            .into_iter()
            .collect();

        let activities: HashMap<i64, (String, i64)> = Activities::find()
            .select_only()
            .column(ActivityColumn::Id)
            .column(ActivityColumn::Name)
            .column(ActivityColumn::SubjectId)
            .filter(ActivityColumn::Id.is_in(activity_ids))
            .into_tuple::<(i64, String, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询活动失败: {e}")))?
            .into_iter()
            .map(|(id, name, subject_id)| (id, (name, subject_id)))
            .collect();

        let subject_ids: Vec<i64> = activities.values().map(|(_, id)| *id).collect();
        let subject_names: HashMap<i64, String> = Subjects::find()
            .select_only()
            .column(SubjectColumn::Id)
            .column(SubjectColumn::Name)
            .filter(SubjectColumn::Id.is_in(subject_ids))
            .into_tuple::<(i64, String)>()
            .all(&self.db)
            .await
            .map_err(|e| EduManagerError::database_operation(format!("查询科目失败: {e}")))?
            .into_iter()
            .collect();

        Ok(grades
            .into_iter()
            .map(|model| {
                let (activity_name, subject_id) = activities
                    .get(&model.activity_id)
                    .cloned()
                    .unwrap_or_default();
                GradeDetail {
                    student_name: student_names
                        .get(&model.student_id)
                        .cloned()
                        .unwrap_or_default(),
                    subject_name: subject_names.get(&subject_id).cloned().unwrap_or_default(),
                    activity_name,
                    subject_id,
                    grade: model.into_grade(),
                }
            })
            .collect())
    }
}
