use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::database::entities::vle_details;
use crate::errors::{RecordError, RecordResult, ValidationError};
use crate::services::geography_service::GeographyService;
use crate::services::notification_service::NotificationDispatcher;
use crate::services::record_normalizer::RecordNormalizer;
use crate::services::validation::ValidationService;
use crate::vle_types::{FormFields, SearchHit, ValidatedSubmission, VleRecord};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Form submitted successfully!";
pub const UPDATE_SUCCESS_MESSAGE: &str = "Record updated successfully!";
pub const RECORD_NOT_FOUND_MESSAGE: &str = "Record not found";

/// Result of a successful submit. The confirmation mail runs on its own
/// task; dropping the handle detaches it.
#[derive(Debug)]
pub struct SubmitReceipt {
    pub record: VleRecord,
    pub notification: JoinHandle<bool>,
}

/// Create, search and update VLE records
#[derive(Clone)]
pub struct VleRecordService {
    db: DatabaseConnection,
    notifier: Arc<NotificationDispatcher>,
}

impl VleRecordService {
    pub fn new(db: DatabaseConnection, notifier: Arc<NotificationDispatcher>) -> Self {
        Self { db, notifier }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Validate, then resolve and insert inside one transaction. The
    /// confirmation mail is handed to the dispatcher after commit.
    pub async fn submit(&self, fields: &FormFields) -> RecordResult<SubmitReceipt> {
        let validated = ValidationService::validate_submission(fields).inspect_err(|e| {
            warn!("Rejected submission: {}", e);
        })?;

        let txn = self.db.begin().await?;
        let record = Self::build_record(&txn, validated).await.inspect_err(|e| {
            warn!("Rejected submission: {}", e);
        })?;

        let now = Utc::now();
        let mut model = Self::active_model(&record);
        model.created_at = Set(now);
        model.updated_at = Set(now);

        vle_details::Entity::insert(model).exec(&txn).await?;
        txn.commit().await?;

        info!("Created VLE record {} ({})", record.csc_id, record.vle_type);

        let notification = self
            .notifier
            .dispatch(record.email.clone(), record.clone());

        Ok(SubmitReceipt {
            record,
            notification,
        })
    }

    /// First record whose trimmed CSC id, Aadhar number or contact number
    /// equals the trimmed term.
    pub async fn search(&self, term: &str) -> RecordResult<Option<SearchHit>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ValidationError::MissingSearchTerm.into());
        }

        let condition = Condition::any()
            .add(Self::trimmed(vle_details::Column::CscId).eq(term))
            .add(Self::trimmed(vle_details::Column::AadharNumber).eq(term))
            .add(Self::trimmed(vle_details::Column::ContactNumber).eq(term));

        let Some(record) = vle_details::Entity::find()
            .filter(condition)
            .one(&self.db)
            .await?
        else {
            debug!("No record matches search term");
            return Ok(None);
        };

        let location =
            GeographyService::reconstruct(&self.db, &record.lgd_code, &record.vle_type).await?;

        Ok(Some(SearchHit {
            record,
            location_ids: location.location_ids,
            grampanchayat_details: location.grampanchayat_details,
        }))
    }

    /// Overwrite every column of the record with the submitted CSC id.
    pub async fn update(&self, fields: &FormFields) -> RecordResult<VleRecord> {
        let validated = ValidationService::validate_submission(fields).inspect_err(|e| {
            warn!("Rejected update: {}", e);
        })?;

        let txn = self.db.begin().await?;
        let record = Self::build_record(&txn, validated).await.inspect_err(|e| {
            warn!("Rejected update: {}", e);
        })?;

        let mut model = Self::active_model(&record);
        model.updated_at = Set(Utc::now());

        let result = vle_details::Entity::update_many()
            .set(model)
            .filter(vle_details::Column::CscId.eq(record.csc_id.as_str()))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            warn!("Update for unknown CSC ID {}", record.csc_id);
            return Err(RecordError::NotFound(record.csc_id));
        }
        txn.commit().await?;

        info!("Updated VLE record {}", record.csc_id);
        Ok(record)
    }

    /// Resolve geography on `conn` and build the record to persist.
    pub async fn build_record<C: ConnectionTrait>(
        conn: &C,
        validated: ValidatedSubmission,
    ) -> RecordResult<VleRecord> {
        let geography = GeographyService::resolve(
            conn,
            &validated.grampanchayat_ids,
            &validated.division_id,
            &validated.district_id,
            &validated.block_id,
        )
        .await?;

        Ok(RecordNormalizer::normalize(validated, geography))
    }

    fn trimmed(column: vle_details::Column) -> Expr {
        Expr::expr(Func::cust(Alias::new("TRIM")).arg(Expr::col(column)))
    }

    /// Every record column except the key and timestamps.
    fn active_model(record: &VleRecord) -> vle_details::ActiveModel {
        vle_details::ActiveModel {
            id: NotSet,
            csc_id: Set(record.csc_id.clone()),
            vle_type: Set(record.vle_type.as_str().to_string()),
            division: Set(record.division.clone()),
            district: Set(record.district.clone()),
            block: Set(record.block.clone()),
            grampanchayat: Set(record.grampanchayat.clone()),
            lgd_code: Set(record.lgd_code.clone()),
            first_name: Set(record.first_name.clone()),
            father_name: Set(record.father_name.clone()),
            mother_name: Set(record.mother_name.clone()),
            surname: Set(record.surname.clone()),
            dob: Set(record.dob),
            blood_group: Set(record.blood_group.clone()),
            gender: Set(record.gender.clone()),
            marital_status: Set(record.marital_status.clone()),
            spouse_name: Set(record.spouse_name.clone()),
            num_children: Set(record.num_children),
            anniversary_date: Set(record.anniversary_date),
            religion: Set(record.religion.clone()),
            category: Set(record.category.clone()),
            caste: Set(record.caste.clone()),
            education: Set(record.education.clone()),
            institute_name: Set(record.institute_name.clone()),
            cibil_score: Set(record.cibil_score),
            contact_number: Set(record.contact_number.clone()),
            whatsapp_number: Set(record.whatsapp_number.clone()),
            email: Set(record.email.clone()),
            permanent_address: Set(record.permanent_address.clone()),
            current_address: Set(record.current_address.clone()),
            pan_number: Set(record.pan_number.clone()),
            aadhar_number: Set(record.aadhar_number.clone()),
            bank_name: Set(record.bank_name.clone()),
            ifsc_code: Set(record.ifsc_code.clone()),
            account_number: Set(record.account_number.clone()),
            branch_name: Set(record.branch_name.clone()),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::{seed_geography, setup_test_db};
    use crate::services::validation::tests::valid_pairs;
    use sea_orm::{ActiveModelTrait, PaginatorTrait};

    async fn service() -> VleRecordService {
        let db = setup_test_db().await;
        seed_geography(&db).await;
        VleRecordService::new(db, Arc::new(NotificationDispatcher::disabled()))
    }

    fn fields_with(overrides: &[(&str, &str)]) -> FormFields {
        let mut pairs = valid_pairs();
        for (key, value) in overrides {
            pairs.retain(|(k, _)| k != key);
            pairs.push((key.to_string(), value.to_string()));
        }
        FormFields::new(pairs)
    }

    async fn count(service: &VleRecordService) -> u64 {
        vle_details::Entity::find().count(service.db()).await.unwrap()
    }

    #[tokio::test]
    async fn test_submit_then_search_by_each_identifier() {
        let service = service().await;
        let receipt = service.submit(&fields_with(&[])).await.unwrap();
        assert!(!receipt.notification.await.unwrap());

        for term in ["CSC1001", " 123456789012 ", "9876543210"] {
            let hit = service.search(term).await.unwrap().expect("record found");
            assert_eq!(hit.record.csc_id, "CSC1001");
            assert_eq!(hit.record.division, "Pune");
            assert_eq!(hit.record.district, "Pune District");
            assert_eq!(hit.record.block, "Haveli");
            assert_eq!(hit.record.grampanchayat, "Wagholi");
            assert_eq!(hit.record.lgd_code, "1001");
            assert_eq!(hit.location_ids.division_id, Some(1));
            assert_eq!(hit.location_ids.block_id, Some(1));
            assert_eq!(hit.location_ids.grampanchayat_id.as_deref(), Some("1001"));
            assert!(hit.grampanchayat_details.is_empty());
        }
    }

    #[tokio::test]
    async fn test_search_miss_and_blank_term() {
        let service = service().await;
        assert!(service.search("nobody").await.unwrap().is_none());

        let err = service.search("   ").await.unwrap_err();
        assert_eq!(err.to_string(), "Search term is required");
        assert_eq!(err.http_status_code(), 400);
    }

    #[tokio::test]
    async fn test_cluster_round_trip() {
        let service = service().await;
        let mut pairs = valid_pairs();
        pairs.retain(|(k, _)| k != "employeeType");
        pairs.push(("employeeType".to_string(), "cluster".to_string()));
        pairs.push(("grampanchayat".to_string(), "1003".to_string()));
        service.submit(&FormFields::new(pairs)).await.unwrap();

        let hit = service.search("CSC1001").await.unwrap().unwrap();
        assert_eq!(hit.record.vle_type, "cluster");
        assert_eq!(hit.record.grampanchayat, "Wagholi, Kesnand");
        assert_eq!(hit.record.lgd_code, "1001, 1003");
        assert_eq!(
            hit.location_ids.grampanchayat_ids,
            Some(vec!["1001".to_string(), "1003".to_string()])
        );
        assert_eq!(hit.grampanchayat_details.len(), 2);
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let service = service().await;
        service
            .submit(&fields_with(&[
                ("sameCurrentAddress", "on"),
                ("spouseName", "Ravi"),
            ]))
            .await
            .unwrap();
        let before = service.search("CSC1001").await.unwrap().unwrap().record;

        service
            .update(&fields_with(&[
                ("grampanchayat", "2001"),
                ("block", "2"),
                ("firstName", "Meera"),
                ("spouseName", ""),
                ("numChildren", ""),
            ]))
            .await
            .unwrap();

        let after = service.search("CSC1001").await.unwrap().unwrap().record;
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.first_name, "Meera");
        assert_eq!(after.block, "Mulshi");
        assert_eq!(after.grampanchayat, "Paud");
        assert_eq!(after.lgd_code, "2001");
        assert_eq!(after.spouse_name, "");
        assert_eq!(after.num_children, None);
        assert_eq!(after.current_address, None);
        assert_eq!(count(&service).await, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_csc_id() {
        let service = service().await;
        let err = service
            .update(&fields_with(&[("cscId", "CSC9999")]))
            .await
            .unwrap_err();

        assert!(matches!(err, RecordError::NotFound(ref id) if id == "CSC9999"));
        assert_eq!(err.to_string(), "No record found for CSC ID CSC9999");
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_csc_id_is_a_store_error() {
        let service = service().await;
        service.submit(&fields_with(&[])).await.unwrap();

        let err = service
            .submit(&fields_with(&[("aadharNumber", "999988887777")]))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Database(_)));
        assert!(err.to_string().starts_with("Database error:"));
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(count(&service).await, 1);
    }

    #[tokio::test]
    async fn test_rejected_input_writes_nothing() {
        let service = service().await;

        let err = service
            .submit(&fields_with(&[("permPincode", "12345")]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("permanent address pincode"));

        let err = service
            .submit(&fields_with(&[("grampanchayat", "4242")]))
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::Geography(_)));
        assert_eq!(err.http_status_code(), 400);

        assert_eq!(count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_resolution_runs_on_the_write_transaction() {
        let service = service().await;
        let txn = service.db().begin().await.unwrap();

        // Only visible through the open transaction
        crate::database::entities::grampanchayats::ActiveModel {
            lgd_code: Set("1004".to_string()),
            name: Set("Wade Bolhai".to_string()),
            block_id: Set(1),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .unwrap();

        let validated =
            ValidationService::validate_submission(&fields_with(&[("grampanchayat", "1004")]))
                .unwrap();
        let record = VleRecordService::build_record(&txn, validated).await.unwrap();
        assert_eq!(record.grampanchayat, "Wade Bolhai");
        assert_eq!(record.lgd_code, "1004");

        txn.rollback().await.unwrap();
    }
}
