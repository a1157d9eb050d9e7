use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, JoinType, QueryFilter, QuerySelect, Select, Set};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Resource, require, require_id};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub author_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id"
    )]
    Author,
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Author info embedded in book responses.
#[derive(Debug, Serialize)]
pub struct BookAuthor {
    pub id: i32,
    pub name: String,
    pub city: String,
}

// DTO for API responses
#[derive(Debug, Serialize)]
pub struct BookDto {
    pub id: i32,
    pub title: String,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub created_at: String,
    pub author: Option<BookAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBook {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub isbn: Option<String>,
    pub author_id: Option<i32>,
}

/// Partial update. `year` and `isbn` are nullable columns, so the double
/// option distinguishes "absent" from an explicit null.
#[derive(Debug, Deserialize)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub year: Option<Option<i32>>,
    pub isbn: Option<Option<String>>,
    pub author_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookFilter {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
}

async fn author_exists(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    match super::author::Entity::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(DomainError::ForeignKeyNotFound {
            field: "author_id",
            id,
        }),
    }
}

pub struct Books;

#[async_trait]
impl Resource for Books {
    type Entity = Entity;
    type Model = Model;
    type ActiveModel = ActiveModel;
    type Create = CreateBook;
    type Update = UpdateBook;
    type Filter = BookFilter;
    type Dto = BookDto;

    const NAME: &'static str = "book";

    fn validate_create(input: &CreateBook) -> Result<(), DomainError> {
        require("title", &input.title)?;
        require_id("author_id", input.author_id)?;
        Ok(())
    }

    fn validate_update(patch: &UpdateBook) -> Result<(), DomainError> {
        if patch.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DomainError::MissingField("title"));
        }
        Ok(())
    }

    async fn check_create_references(
        db: &DatabaseConnection,
        input: &CreateBook,
    ) -> Result<(), DomainError> {
        if let Some(id) = input.author_id {
            author_exists(db, id).await?;
        }
        Ok(())
    }

    async fn check_update_references(
        db: &DatabaseConnection,
        patch: &UpdateBook,
    ) -> Result<(), DomainError> {
        if let Some(id) = patch.author_id {
            author_exists(db, id).await?;
        }
        Ok(())
    }

    fn into_active_model(input: CreateBook, now: &str) -> ActiveModel {
        ActiveModel {
            title: Set(input.title.unwrap_or_default()),
            year: Set(input.year),
            isbn: Set(input.isbn),
            author_id: Set(input.author_id.unwrap_or_default()),
            created_at: Set(now.to_owned()),
            updated_at: Set(now.to_owned()),
            ..Default::default()
        }
    }

    fn apply_patch(model: Model, patch: UpdateBook, now: &str) -> ActiveModel {
        let mut active: ActiveModel = model.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(year) = patch.year {
            active.year = Set(year);
        }
        if let Some(isbn) = patch.isbn {
            active.isbn = Set(isbn);
        }
        if let Some(author_id) = patch.author_id {
            active.author_id = Set(author_id);
        }
        active.updated_at = Set(now.to_owned());
        active
    }

    async fn to_dto(db: &DatabaseConnection, model: Model) -> Result<BookDto, DomainError> {
        let author = model
            .find_related(super::author::Entity)
            .one(db)
            .await?
            .map(|a| BookAuthor {
                id: a.id,
                name: a.name,
                city: a.city,
            });

        Ok(BookDto {
            id: model.id,
            title: model.title,
            year: model.year,
            isbn: model.isbn,
            created_at: model.created_at,
            author,
        })
    }

    fn apply_filter(mut query: Select<Entity>, filter: &BookFilter) -> Select<Entity> {
        if let Some(title) = &filter.title
            && !title.is_empty()
        {
            query = query.filter(Column::Title.contains(title));
        }
        if let Some(year) = filter.year {
            query = query.filter(Column::Year.eq(year));
        }
        if let Some(author) = &filter.author
            && !author.is_empty()
        {
            query = query
                .join(JoinType::InnerJoin, Relation::Author.def())
                .filter(super::author::Column::Name.contains(author));
        }
        query
    }

    fn sort_column(key: &str) -> Option<Column> {
        match key {
            "id" => Some(Column::Id),
            "title" => Some(Column::Title),
            "year" => Some(Column::Year),
            _ => None,
        }
    }

    fn id_column() -> Column {
        Column::Id
    }
}
