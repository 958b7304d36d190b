#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use tempfile::NamedTempFile;

use vle_registry::database::entities::{blocks, districts, divisions, grampanchayats};
use vle_registry::database::setup_database;
use vle_registry::errors::NotificationError;
use vle_registry::services::{Mailer, OutboundEmail};

/// File-backed SQLite store; the file lives as long as the returned handle.
pub async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

/// Two divisions, each with one district:
/// Pune > Pune District > Haveli (1001 Wagholi, 1002 Lohegaon, 1003 Kesnand), Mulshi (2001 Paud)
/// Nashik > Nashik District > Igatpuri (3001 Ghoti)
pub async fn seed_geography(db: &DatabaseConnection) -> Result<()> {
    for (id, name) in [(1, "Pune"), (2, "Nashik")] {
        divisions::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(db)
        .await?;
    }

    for (id, name, division_id) in [(1, "Pune District", 1), (2, "Nashik District", 2)] {
        districts::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            division_id: Set(division_id),
        }
        .insert(db)
        .await?;
    }

    for (id, name, district_id) in [(1, "Haveli", 1), (2, "Mulshi", 1), (3, "Igatpuri", 2)] {
        blocks::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            district_id: Set(district_id),
        }
        .insert(db)
        .await?;
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
        .await?;
    }

    Ok(())
}

/// A complete individual registration for Wagholi (1001)
pub fn valid_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("employeeType", "individual"),
        ("grampanchayat", "1001"),
        ("division", "1"),
        ("district", "1"),
        ("block", "1"),
        ("cscId", "CSC1001"),
        ("firstName", "Asha"),
        ("fatherName", "Ramesh"),
        ("motherName", "Sunita"),
        ("surname", "Patil"),
        ("dob", "1990-04-12"),
        ("gender", "Female"),
        ("maritalStatus", "Married"),
        ("spouseName", "Vikas"),
        ("numChildren", "2"),
        ("anniversary_date", "2015-05-20"),
        ("blood_group", "B+"),
        ("religion", "Hindu"),
        ("category", "OBC"),
        ("caste", "Maratha"),
        ("education", "Graduate"),
        ("instituteName", "Pune University"),
        ("cibilScore", "750"),
        ("contactNumber", "9876543210"),
        ("whatsappNumber", "9123456780"),
        ("email", "asha@example.com"),
        ("permAddressLine1", "12 Main Road"),
        ("permAddressLine2", "Near Temple"),
        ("permCity", "Wagholi"),
        ("permPincode", "412207"),
        ("panNumber", "ABCDE1234F"),
        ("aadharNumber", "123456789012"),
        ("bankName", "State Bank"),
        ("ifsc", "SBIN0000001"),
        ("accountNumber", "00098765"),
        ("branchName", "Wagholi"),
    ]
}

/// `valid_form` with `key` replaced (or added) as the last pair
pub fn form_with(
    key: &'static str,
    value: &'static str,
) -> Vec<(&'static str, &'static str)> {
    let mut form: Vec<_> = valid_form().into_iter().filter(|(k, _)| *k != key).collect();
    form.push((key, value));
    form
}

/// Collects every message instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait for the detached notification task to deliver `count` messages.
    pub async fn wait_for(&self, count: usize) -> Vec<OutboundEmail> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Rejects every message, as an unreachable mail server would
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutboundEmail) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("connection refused".to_string()))
    }
}
