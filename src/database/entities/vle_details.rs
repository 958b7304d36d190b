use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registered VLE. Geography is stored denormalized: names rather than ids, and
/// the grampanchayat list as ", "-joined names and LGD codes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vle_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub csc_id: String,
    pub vle_type: String,
    pub division: String,
    pub district: String,
    pub block: String,
    #[sea_orm(column_type = "Text")]
    pub grampanchayat: String,
    #[sea_orm(column_type = "Text")]
    pub lgd_code: String,

    pub first_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub surname: String,
    pub dob: Date,
    pub blood_group: String,
    pub gender: String,
    pub marital_status: String,
    pub spouse_name: String,
    pub num_children: Option<i32>,
    pub anniversary_date: Option<Date>,
    pub religion: String,
    pub category: String,
    pub caste: String,
    pub education: String,
    pub institute_name: String,
    pub cibil_score: i32,

    pub contact_number: String,
    pub whatsapp_number: String,
    pub email: String,

    #[sea_orm(column_type = "Text")]
    pub permanent_address: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub current_address: Option<String>,

    pub pan_number: String,
    pub aadhar_number: String,

    pub bank_name: String,
    pub ifsc_code: String,
    pub account_number: String,
    pub branch_name: String,

    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
