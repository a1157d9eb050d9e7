use crate::auth::hash_password;
use crate::models::{author, book, course, student, teacher, user};
use sea_orm::*;

/// Demo fixtures, inserted once on an empty database.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    // 1. Users
    let admin_password = hash_password("admin")
        .map_err(|e| DbErr::Custom(format!("Failed to hash seed password: {}", e)))?;

    let admin = user::ActiveModel {
        username: Set("admin".to_owned()),
        password_hash: Set(admin_password),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    };

    let inserted = user::Entity::insert(admin)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(user::Column::Username)
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await;
    match inserted {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }

    // 2. Authors and books
    if author::Entity::find().count(db).await? == 0 {
        let authors = [
            ("J.R.R. Tolkien", "Philologist and epic fantasist", "Oxford"),
            ("Isaac Asimov", "Biochemist turned prolific SF writer", "New York"),
            ("Frank Herbert", "Journalist and ecological SF author", "Tacoma"),
        ];

        for (name, bio, city) in authors {
            let row = author::ActiveModel {
                name: Set(name.to_owned()),
                bio: Set(bio.to_owned()),
                city: Set(city.to_owned()),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            };
            row.insert(db).await?;
        }
    }

    if book::Entity::find().count(db).await? == 0 {
        let books = [
            ("The Hobbit", 1937, "978-0547928227", "J.R.R. Tolkien"),
            ("Foundation", 1951, "978-0553293357", "Isaac Asimov"),
            ("Dune", 1965, "978-0441172719", "Frank Herbert"),
        ];

        for (title, year, isbn, author_name) in books {
            let Some(by) = author::Entity::find()
                .filter(author::Column::Name.eq(author_name))
                .one(db)
                .await?
            else {
                continue;
            };

            let row = book::ActiveModel {
                title: Set(title.to_owned()),
                year: Set(Some(year)),
                isbn: Set(Some(isbn.to_owned())),
                author_id: Set(by.id),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            };
            row.insert(db).await?;
        }
    }

    // 3. Campus fixtures
    if course::Entity::find().count(db).await? == 0 {
        let courses = [
            ("Literature 101", Some("Close reading of the classics")),
            ("Creative Writing", None),
        ];

        for (name, description) in courses {
            let row = course::ActiveModel {
                name: Set(name.to_owned()),
                description: Set(description.map(str::to_owned)),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            };
            row.insert(db).await?;
        }

        let Some(lit) = course::Entity::find()
            .filter(course::Column::Name.eq("Literature 101"))
            .one(db)
            .await?
        else {
            return Ok(());
        };

        let new_student = student::ActiveModel {
            name: Set("Ada Quinn".to_owned()),
            email: Set("ada.quinn@example.edu".to_owned()),
            course_id: Set(lit.id),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        new_student.insert(db).await?;

        let new_teacher = teacher::ActiveModel {
            name: Set("Miriam Hale".to_owned()),
            email: Set("m.hale@example.edu".to_owned()),
            course_id: Set(lit.id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_teacher.insert(db).await?;
    }

    Ok(())
}
