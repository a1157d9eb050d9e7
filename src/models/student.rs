use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, JoinType, QueryFilter, QuerySelect, Select, Set};
use serde::{Deserialize, Serialize};

use super::course::course_exists;
use crate::domain::{DomainError, Resource, require, require_id, validate_email};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub course_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Course info embedded in student responses.
#[derive(Debug, Serialize)]
pub struct StudentCourse {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct StudentDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub course: Option<StudentCourse>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudent {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudent {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course: Option<String>,
}

pub struct Students;

#[async_trait]
impl Resource for Students {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Create = CreateStudent;
    type Update = UpdateStudent;
    type Filter = StudentFilter;
    type Dto = StudentDto;

    const NAME: &'static str = "student";

    fn validate_create(input: &CreateStudent) -> Result<(), DomainError> {
        require("name", &input.name)?;
        let email = require("email", &input.email)?;
        validate_email("email", &email)?;
        require_id("course_id", input.course_id)?;
        Ok(())
    }

    fn validate_update(patch: &UpdateStudent) -> Result<(), DomainError> {
        if patch.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::MissingField("name"));
        }
        if let Some(email) = &patch.email {
            if email.trim().is_empty() {
                return Err(DomainError::MissingField("email"));
            }
            validate_email("email", email)?;
        }
        Ok(())
    }

    async fn check_create_references(
        db: &DatabaseConnection,
        input: &CreateStudent,
    ) -> Result<(), DomainError> {
        if let Some(id) = input.course_id {
            course_exists(db, id).await?;
        }
        Ok(())
    }

    async fn check_update_references(
        db: &DatabaseConnection,
        patch: &UpdateStudent,
    ) -> Result<(), DomainError> {
        if let Some(id) = patch.course_id {
            course_exists(db, id).await?;
        }
        Ok(())
    }

    fn into_active_model(input: CreateStudent, now: &str) -> ActiveModel {
        ActiveModel {
            name: Set(input.name.unwrap_or_default()),
            email: Set(input.email.unwrap_or_default()),
            course_id: Set(input.course_id.unwrap_or_default()),
            created_at: Set(now.to_owned()),
            updated_at: Set(now.to_owned()),
            ..Default::default()
        }
    }

    fn apply_patch(model: Model, patch: UpdateStudent, now: &str) -> ActiveModel {
        let mut active: ActiveModel = model.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(course_id) = patch.course_id {
            active.course_id = Set(course_id);
        }
        active.updated_at = Set(now.to_owned());
        active
    }

    async fn to_dto(db: &DatabaseConnection, model: Model) -> Result<StudentDto, DomainError> {
        let course = model
            .find_related(super::course::Entity)
            .one(db)
            .await?
            .map(|c| StudentCourse {
                id: c.id,
                name: c.name,
            });

        Ok(StudentDto {
            id: model.id,
            name: model.name,
            email: model.email,
            course,
        })
    }

    fn apply_filter(mut query: Select<Entity>, filter: &StudentFilter) -> Select<Entity> {
        if let Some(name) = &filter.name
            && !name.is_empty()
        {
            query = query.filter(Column::Name.contains(name));
        }
        if let Some(email) = &filter.email
            && !email.is_empty()
        {
            query = query.filter(Column::Email.eq(email));
        }
        if let Some(course) = &filter.course
            && !course.is_empty()
        {
            query = query
                .join(JoinType::InnerJoin, Relation::Course.def())
                .filter(super::course::Column::Name.contains(course));
        }
        query
    }

    fn sort_column(key: &str) -> Option<Column> {
        match key {
            "id" => Some(Column::Id),
            "name" => Some(Column::Name),
            "email" => Some(Column::Email),
            _ => None,
        }
    }

    fn id_column() -> Column {
        Column::Id
    }
}
