use chrono::{Duration, Utc};
use sea_orm::*;

use crate::auth::hash_password;
use crate::domain::DomainError;
use crate::models::product::ProductKind;
use crate::models::story::{Language, StoryKind, StoryStatus};
use crate::models::user::Role;
use crate::models::{chapter, genre, product, story, story_genre, subscription_plan, user};

pub const DEMO_PASSWORD: &str = "fabulis123";

struct DemoStory {
    author: usize,
    title: &'static str,
    synopsis: &'static str,
    language: Language,
    status: StoryStatus,
    kind: StoryKind,
    is_premium: bool,
    genres: &'static [usize],
    chapters: &'static [(&'static str, &'static str, bool)],
}

const USERS: &[(&str, &str, Role)] = &[
    ("Aline Reis", "aline@example.com", Role::Admin),
    ("Bruno Costa", "bruno@example.com", Role::Author),
    ("Carlos Silva", "carlos@example.com", Role::Author),
];

const GENRES: &[&str] = &[
    "Fantasy",
    "Adventure",
    "Romance",
    "Science Fiction",
    "Mystery",
    "Horror",
];

const STORIES: &[DemoStory] = &[
    DemoStory {
        author: 0,
        title: "As Crônicas de Eldoria",
        synopsis: "In a world where magic is dying, a young elf sets out to restore the balance.",
        language: Language::Pt,
        status: StoryStatus::Ongoing,
        kind: StoryKind::Book,
        is_premium: true,
        genres: &[0, 1],
        chapters: &[
            ("O Chamado da Floresta", "The wind whispered old secrets between the trees.", false),
            ("A Cidade Perdida", "Lyra found the ruins of Aethelgard, a city thought to be legend.", true),
            ("O Guardião de Pedra", "The artifact was guarded by an ancient golem.", true),
        ],
    },
    DemoStory {
        author: 1,
        title: "Echoes of the Void",
        synopsis: "The last human scavenger ship finds a derelict alien vessel calling for help.",
        language: Language::En,
        status: StoryStatus::Completed,
        kind: StoryKind::Book,
        is_premium: false,
        genres: &[3, 5],
        chapters: &[
            ("The Signal", "Captain Eva Rostova watched the spectral analysis flicker on her screen.", false),
            ("Ghost Ship", "Docking with the alien vessel was an eerie experience.", false),
        ],
    },
    DemoStory {
        author: 0,
        title: "O Segredo do Farol",
        synopsis: "An old lighthouse keeper guards a secret a curious journalist means to uncover.",
        language: Language::Pt,
        status: StoryStatus::Completed,
        kind: StoryKind::ShortStory,
        is_premium: false,
        genres: &[4],
        chapters: &[],
    },
    DemoStory {
        author: 2,
        title: "La Sombra del Pasado",
        synopsis: "A private detective in Madrid looks for a missing woman tied to his own past.",
        language: Language::Es,
        status: StoryStatus::Hiatus,
        kind: StoryKind::Book,
        is_premium: false,
        genres: &[4, 2],
        chapters: &[(
            "La Llamada",
            "The phone rang in the quiet of the night, waking Javier from a restless sleep.",
            false,
        )],
    },
    DemoStory {
        author: 1,
        title: "Heart of the Nebula",
        synopsis: "A starship captain and an android diplomat risk an interstellar war.",
        language: Language::En,
        status: StoryStatus::Ongoing,
        kind: StoryKind::Fanfic,
        is_premium: true,
        genres: &[3, 2],
        chapters: &[],
    },
];

const PLANS: &[(&str, f64, &str, i32)] = &[
    ("Monthly", 14.90, "Every premium chapter for one month.", 30),
    ("Annual", 149.90, "A full year of premium reading at a discount.", 365),
];

const PRODUCTS: &[(&str, &str, f64, ProductKind)] = &[
    (
        "As Crônicas de Eldoria - Collector's Edition",
        "Hardcover deluxe edition of Lyra's saga.",
        89.90,
        ProductKind::Book,
    ),
    (
        "Echoes of the Void - E-book",
        "Eva Rostova's adventure in digital form.",
        29.90,
        ProductKind::Ebook,
    ),
    (
        "O Segredo do Farol - Paperback",
        "The printed edition of the lighthouse mystery.",
        45.50,
        ProductKind::Book,
    ),
    (
        "Fabulis Artbook Vol. 1",
        "Concept art from your favourite stories.",
        120.00,
        ProductKind::Book,
    ),
];

/// Populate an empty database with a small demo catalog. Does nothing when
/// any account already exists.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    if user::Entity::find().count(db).await? > 0 {
        tracing::info!("Database already has users, skipping demo seed");
        return Ok(());
    }

    let password_hash = hash_password(DEMO_PASSWORD)?;
    let now = Utc::now();
    let txn = db.begin().await?;

    let mut user_ids = Vec::with_capacity(USERS.len());
    for (name, email, role) in USERS {
        let created = user::ActiveModel {
            display_name: Set(name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.clone()),
            avatar_url: Set(None),
            role: Set(*role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        user_ids.push(created.id);
    }

    let mut genre_ids = Vec::with_capacity(GENRES.len());
    for name in GENRES {
        let created = genre::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        genre_ids.push(created.id);
    }

    // Older stories first so the newest demo story tops the catalog.
    for (age, demo) in STORIES.iter().rev().enumerate() {
        let stamp = now - Duration::hours(age as i64);
        let created = story::ActiveModel {
            author_id: Set(user_ids[demo.author]),
            title: Set(demo.title.to_string()),
            synopsis: Set(Some(demo.synopsis.to_string())),
            cover_url: Set(None),
            language: Set(demo.language),
            status: Set(demo.status),
            kind: Set(demo.kind),
            is_premium: Set(demo.is_premium),
            published_at: Set(stamp),
            updated_at: Set(stamp),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for g in demo.genres {
            story_genre::Entity::insert(story_genre::ActiveModel {
                story_id: Set(created.id),
                genre_id: Set(genre_ids[*g]),
            })
            .exec_without_returning(&txn)
            .await?;
        }

        for (number, (title, content, is_premium)) in demo.chapters.iter().enumerate() {
            chapter::ActiveModel {
                story_id: Set(created.id),
                number: Set(number as i32 + 1),
                title: Set(title.to_string()),
                content: Set(content.to_string()),
                is_premium: Set(*is_premium),
                published_at: Set(stamp),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    for (name, price, description, duration_days) in PLANS {
        subscription_plan::ActiveModel {
            name: Set(name.to_string()),
            price: Set(*price),
            description: Set(Some(description.to_string())),
            duration_days: Set(*duration_days),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for (name, description, price, kind) in PRODUCTS {
        product::ActiveModel {
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            price: Set(*price),
            cover_url: Set(None),
            kind: Set(*kind),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    tracing::info!(
        "Seeded {} users, {} stories, {} plans and {} products",
        USERS.len(),
        STORIES.len(),
        PLANS.len(),
        PRODUCTS.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn seeding_twice_keeps_a_single_catalog() {
        let db = db::init_db("sqlite::memory:").await.unwrap();

        seed_demo_data(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 3);
        assert_eq!(story::Entity::find().count(&db).await.unwrap(), 5);
        assert_eq!(product::Entity::find().count(&db).await.unwrap(), 4);

        let first = product::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
        assert_eq!(first.price, 89.90);
    }
}
