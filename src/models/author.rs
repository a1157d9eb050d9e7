use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryFilter, Select, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Resource, require};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub bio: String,
    pub city: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book::Entity")]
    Book,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Serialize)]
pub struct AuthorDto {
    pub id: i32,
    pub name: String,
    pub bio: String,
    pub city: String,
}

impl From<Model> for AuthorDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            bio: model.bio,
            city: model.city,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAuthor {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAuthor {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorFilter {
    pub name: Option<String>,
    pub city: Option<String>,
}

pub struct Authors;

#[async_trait]
impl Resource for Authors {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Create = CreateAuthor;
    type Update = UpdateAuthor;
    type Filter = AuthorFilter;
    type Dto = AuthorDto;

    const NAME: &'static str = "author";

    fn validate_create(input: &CreateAuthor) -> Result<(), DomainError> {
        require("name", &input.name)?;
        require("bio", &input.bio)?;
        require("city", &input.city)?;
        Ok(())
    }

    fn validate_update(patch: &UpdateAuthor) -> Result<(), DomainError> {
        for (field, value) in [
            ("name", &patch.name),
            ("bio", &patch.bio),
            ("city", &patch.city),
        ] {
            if value.as_ref().is_some_and(|v| v.trim().is_empty()) {
                return Err(DomainError::MissingField(field));
            }
        }
        Ok(())
    }

    fn into_active_model(input: CreateAuthor, now: &str) -> ActiveModel {
        ActiveModel {
            name: Set(input.name.unwrap_or_default()),
            bio: Set(input.bio.unwrap_or_default()),
            city: Set(input.city.unwrap_or_default()),
            created_at: Set(now.to_owned()),
            updated_at: Set(now.to_owned()),
            ..Default::default()
        }
    }

    fn apply_patch(model: Model, patch: UpdateAuthor, now: &str) -> ActiveModel {
        let mut active: ActiveModel = model.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(bio) = patch.bio {
            active.bio = Set(bio);
        }
        if let Some(city) = patch.city {
            active.city = Set(city);
        }
        active.updated_at = Set(now.to_owned());
        active
    }

    async fn to_dto(_db: &DatabaseConnection, model: Model) -> Result<AuthorDto, DomainError> {
        Ok(AuthorDto::from(model))
    }

    fn apply_filter(mut query: Select<Entity>, filter: &AuthorFilter) -> Select<Entity> {
        if let Some(name) = &filter.name
            && !name.is_empty()
        {
            query = query.filter(Column::Name.contains(name));
        }
        if let Some(city) = &filter.city
            && !city.is_empty()
        {
            query = query.filter(Column::City.contains(city));
        }
        query
    }

    fn sort_column(key: &str) -> Option<Column> {
        match key {
            "id" => Some(Column::Id),
            "name" => Some(Column::Name),
            "city" => Some(Column::City),
            _ => None,
        }
    }

    fn id_column() -> Column {
        Column::Id
    }
}
