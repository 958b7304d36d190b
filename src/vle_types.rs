//! Shared types for the VLE registration workflow.
//!
//! The raw submission ([`FormFields`]) is turned into a [`ValidatedSubmission`] by the
//! validator, combined with a [`ResolvedGeography`] by the normalizer, and persisted as a
//! [`VleRecord`]. The read path produces [`LocationIds`] and [`GrampanchayatDetail`] rows.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::database::entities::vle_details;

/// Separator used for the denormalized `grampanchayat` and `lgd_code` columns.
pub const LIST_SEPARATOR: &str = ", ";

/// Raw form submission: ordered key/value pairs, keys may repeat.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value submitted for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted for `key`, in submission order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Checkbox semantics: a key that is present at all counts as set.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// First value for `key`, or an empty string.
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// First value for `key` when it is present and not blank.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VleType {
    Individual,
    Cluster,
}

impl VleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VleType::Individual => "individual",
            VleType::Cluster => "cluster",
        }
    }
}

impl fmt::Display for VleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VleType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(VleType::Individual),
            "cluster" => Ok(VleType::Cluster),
            _ => Err(()),
        }
    }
}

/// Address parts as entered on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub pincode: String,
}

/// Output of the form validator. Geography ids are still unresolved and the
/// "Other" overrides have already been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub vle_type: VleType,
    pub grampanchayat_ids: Vec<String>,
    pub division_id: String,
    pub district_id: String,
    pub block_id: String,

    pub csc_id: String,
    pub first_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub surname: String,
    pub dob: NaiveDate,
    pub blood_group: String,
    pub gender: String,
    pub marital_status: String,
    pub spouse_name: String,
    pub num_children: Option<i32>,
    pub anniversary_date: Option<NaiveDate>,
    pub religion: String,
    pub category: String,
    pub caste: String,
    pub education: String,
    pub institute_name: String,
    pub cibil_score: i32,

    pub contact_number: String,
    pub whatsapp_number: String,
    pub same_whatsapp: bool,
    pub email: String,

    pub permanent: AddressInput,
    pub current: AddressInput,
    pub same_current_address: bool,

    pub pan_number: String,
    pub aadhar_number: String,

    pub bank_name: String,
    pub ifsc_code: String,
    pub account_number: String,
    pub branch_name: String,
}

/// Names and codes looked up for a submission, grampanchayats in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGeography {
    pub division: String,
    pub district: String,
    pub block: String,
    pub grampanchayat_names: Vec<String>,
    pub lgd_codes: Vec<String>,
}

/// Canonical persisted record, shared by create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VleRecord {
    pub vle_type: VleType,
    pub csc_id: String,
    pub division: String,
    pub district: String,
    pub block: String,
    pub grampanchayat: String,
    pub lgd_code: String,

    pub first_name: String,
    pub father_name: String,
    pub mother_name: String,
    pub surname: String,
    pub dob: NaiveDate,
    pub blood_group: String,
    pub gender: String,
    pub marital_status: String,
    pub spouse_name: String,
    pub num_children: Option<i32>,
    pub anniversary_date: Option<NaiveDate>,
    pub religion: String,
    pub category: String,
    pub caste: String,
    pub education: String,
    pub institute_name: String,
    pub cibil_score: i32,

    pub contact_number: String,
    pub whatsapp_number: String,
    pub email: String,

    pub permanent_address: String,
    pub current_address: Option<String>,

    pub pan_number: String,
    pub aadhar_number: String,

    pub bank_name: String,
    pub ifsc_code: String,
    pub account_number: String,
    pub branch_name: String,
}

/// Ancestor ids recovered for a stored record. Serializes to `{}` when the
/// location could not be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grampanchayat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grampanchayat_ids: Option<Vec<String>>,
}

impl LocationIds {
    pub fn is_empty(&self) -> bool {
        *self == LocationIds::default()
    }
}

/// A grampanchayat joined up to its division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct GrampanchayatDetail {
    pub lgd_code: String,
    pub name: String,
    pub block_id: i32,
    pub district_id: i32,
    pub division_id: i32,
}

/// Location data rebuilt from a stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationReconstruction {
    pub location_ids: LocationIds,
    pub grampanchayat_details: Vec<GrampanchayatDetail>,
}

/// A record found by search, with its rebuilt location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub record: vle_details::Model,
    pub location_ids: LocationIds,
    pub grampanchayat_details: Vec<GrampanchayatDetail>,
}

/// Split a stored ", "-joined list, ignoring blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
