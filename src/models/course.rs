use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Resource, require};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student::Entity")]
    Student,
    #[sea_orm(has_many = "super::teacher::Entity")]
    Teacher,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Foreign-key pre-check shared by the student and teacher resources.
pub(crate) async fn course_exists(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    match Entity::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::ForeignKeyNotFound {
            field: "course_id",
            id,
        }),
    }
}

#[derive(Debug, Serialize)]
pub struct CourseDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<Model> for CourseDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourse {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
    pub name: Option<String>,
}

pub struct Courses;

#[async_trait]
impl Resource for Courses {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Create = CreateCourse;
    type Update = UpdateCourse;
    type Filter = CourseFilter;
    type Dto = CourseDto;

    const NAME: &'static str = "course";

    fn validate_create(input: &CreateCourse) -> Result<(), DomainError> {
        require("name", &input.name)?;
        Ok(())
    }

    fn validate_update(patch: &UpdateCourse) -> Result<(), DomainError> {
        if patch.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::MissingField("name"));
        }
        Ok(())
    }

    fn into_active_model(input: CreateCourse, now: &str) -> ActiveModel {
        ActiveModel {
            name: Set(input.name.unwrap_or_default()),
            description: Set(input.description),
            created_at: Set(now.to_owned()),
            updated_at: Set(now.to_owned()),
            ..Default::default()
        }
    }

    fn apply_patch(model: Model, patch: UpdateCourse, now: &str) -> ActiveModel {
        let mut active: ActiveModel = model.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        active.updated_at = Set(now.to_owned());
        active
    }

    async fn to_dto(_db: &DatabaseConnection, model: Model) -> Result<CourseDto, DomainError> {
        Ok(CourseDto::from(model))
    }

    fn apply_filter(mut query: Select<Entity>, filter: &CourseFilter) -> Select<Entity> {
        if let Some(name) = &filter.name
            && !name.is_empty()
        {
            query = query.filter(Column::Name.contains(name));
        }
        query
    }

    fn sort_column(key: &str) -> Option<Column> {
        match key {
            "id" => Some(Column::Id),
            "name" => Some(Column::Name),
            _ => None,
        }
    }

    fn id_column() -> Column {
        Column::Id
    }
}
