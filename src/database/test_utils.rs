#[cfg(test)]
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

#[cfg(test)]
use crate::database::entities::{blocks, districts, divisions, grampanchayats};

#[cfg(test)]
pub async fn setup_test_db() -> DatabaseConnection {
    // Create an in-memory SQLite database for testing
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    crate::database::setup_database(&db)
        .await
        .expect("Failed to create tables");

    db
}

/// Seeded hierarchy:
///
/// ```text
/// Division 1 "Pune"
///   District 1 "Pune District"
///     Block 1 "Haveli"   -> GP 1001 "Wagholi", 1002 "Lohegaon", 1003 "Kesnand"
///     Block 2 "Mulshi"   -> GP 2001 "Paud"
/// Division 2 "Nashik"
///   District 2 "Nashik District"
///     Block 3 "Igatpuri" -> GP 3001 "Ghoti"
/// ```
#[cfg(test)]
pub async fn seed_geography(db: &DatabaseConnection) {
    for (id, name) in [(1, "Pune"), (2, "Nashik")] {
        divisions::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await
        .expect("Failed to seed division");
    }

    for (id, name, division_id) in [(1, "Pune District", 1), (2, "Nashik District", 2)] {
        districts::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            division_id: Set(division_id),
        }
        .insert(db)
        .await
        .expect("Failed to seed district");
    }

    for (id, name, district_id) in [(1, "Haveli", 1), (2, "Mulshi", 1), (3, "Igatpuri", 2)] {
        blocks::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            district_id: Set(district_id),
        }
        .insert(db)
        .await
        .expect("Failed to seed block");
    }

    for (lgd_code, name, block_id) in [
        ("1001", "Wagholi", 1),
        ("1002", "Lohegaon", 1),
        ("1003", "Kesnand", 1),
        ("2001", "Paud", 2),
        ("3001", "Ghoti", 3),
    ] {
        grampanchayats::ActiveModel {
            lgd_code: Set(lgd_code.to_string()),
            name: Set(name.to_string()),
            block_id: Set(block_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed grampanchayat");
    }
}
