use chrono::NaiveDate;

use crate::errors::{ValidationError, ValidationResult};
use crate::vle_types::{AddressInput, FormFields, ValidatedSubmission, VleType};

pub const CIBIL_MIN: u32 = 300;
pub const CIBIL_MAX: u32 = 900;

/// Selected value that defers to a paired free-text field
const OTHER: &str = "Other";

/// Fields that must be present and non-blank, checked in this order after
/// the employee-type, grampanchayat, pincode and CIBIL rules.
const REQUIRED_FIELDS: [&str; 19] = [
    "cscId",
    "firstName",
    "fatherName",
    "motherName",
    "surname",
    "dob",
    "gender",
    "maritalStatus",
    "religion",
    "category",
    "education",
    "instituteName",
    "contactNumber",
    "email",
    "permAddressLine1",
    "permCity",
    "division",
    "district",
    "block",
];

/// Stateless rule set for raw form submissions
pub struct ValidationService;

impl ValidationService {
    /// Validate a raw submission. The first failing rule is reported.
    pub fn validate_submission(fields: &FormFields) -> ValidationResult<ValidatedSubmission> {
        let vle_type = Self::validate_employee_type(fields.get("employeeType"))?;
        let grampanchayat_ids =
            Self::validate_grampanchayat_selection(vle_type, &fields.get_all("grampanchayat"))?;

        let perm_pincode = fields.text("permPincode");
        if !Self::is_valid_pincode(&perm_pincode) {
            return Err(ValidationError::InvalidPermanentPincode);
        }

        let same_current_address = fields.contains("sameCurrentAddress");
        if !same_current_address {
            if let Some(curr_pincode) = fields.non_empty("currPincode") {
                if !Self::is_valid_pincode(curr_pincode) {
                    return Err(ValidationError::InvalidCurrentPincode);
                }
            }
        }

        let cibil_score = Self::validate_cibil_score(fields.get("cibilScore").unwrap_or_default())?;

        for field in REQUIRED_FIELDS {
            Self::required(fields, field)?;
        }

        let dob = Self::parse_date("dob", &fields.text("dob"))?;
        let anniversary_date = match fields.non_empty("anniversary_date") {
            Some(value) => Some(Self::parse_date("anniversary_date", value)?),
            None => None,
        };
        let num_children = match fields.non_empty("numChildren") {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u16>()
                    .map(i32::from)
                    .map_err(|_| ValidationError::InvalidNumber("numChildren".to_string()))?,
            ),
            None => None,
        };

        Ok(ValidatedSubmission {
            vle_type,
            grampanchayat_ids,
            division_id: fields.text("division"),
            district_id: fields.text("district"),
            block_id: fields.text("block"),

            csc_id: fields.text("cscId").trim().to_string(),
            first_name: fields.text("firstName"),
            father_name: fields.text("fatherName"),
            mother_name: fields.text("motherName"),
            surname: fields.text("surname"),
            dob,
            blood_group: fields.text("blood_group"),
            gender: fields.text("gender"),
            marital_status: fields.text("maritalStatus"),
            spouse_name: fields.text("spouseName"),
            num_children,
            anniversary_date,
            religion: Self::with_other_override(fields, "religion", "otherReligion"),
            category: Self::with_other_override(fields, "category", "otherCategory"),
            caste: fields.text("caste"),
            education: Self::with_other_override(fields, "education", "otherEducation"),
            institute_name: fields.text("instituteName"),
            cibil_score,

            contact_number: fields.text("contactNumber"),
            whatsapp_number: fields.text("whatsappNumber"),
            same_whatsapp: fields.contains("sameWhatsapp"),
            email: fields.text("email"),

            permanent: AddressInput {
                line1: fields.text("permAddressLine1"),
                line2: fields.text("permAddressLine2"),
                city: fields.text("permCity"),
                pincode: perm_pincode,
            },
            current: AddressInput {
                line1: fields.text("currAddressLine1"),
                line2: fields.text("currAddressLine2"),
                city: fields.text("currCity"),
                pincode: fields.text("currPincode"),
            },
            same_current_address,

            pan_number: fields.text("panNumber"),
            aadhar_number: fields.text("aadharNumber"),

            bank_name: Self::with_other_override(fields, "bankName", "otherBank"),
            ifsc_code: fields.text("ifsc"),
            account_number: fields.text("accountNumber"),
            branch_name: fields.text("branchName"),
        })
    }

    pub fn validate_employee_type(value: Option<&str>) -> ValidationResult<VleType> {
        value
            .and_then(|v| v.trim().parse::<VleType>().ok())
            .ok_or(ValidationError::InvalidEmployeeType)
    }

    /// Collapse duplicate and blank ids (first occurrence wins) and check the
    /// count against the employee type.
    pub fn validate_grampanchayat_selection(
        vle_type: VleType,
        submitted: &[&str],
    ) -> ValidationResult<Vec<String>> {
        let mut ids: Vec<String> = Vec::with_capacity(submitted.len());
        for id in submitted.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }

        match vle_type {
            VleType::Cluster if ids.len() < 2 => Err(ValidationError::ClusterNeedsTwoGrampanchayats),
            VleType::Individual if ids.len() != 1 => {
                Err(ValidationError::IndividualNeedsOneGrampanchayat)
            }
            _ => Ok(ids),
        }
    }

    /// Exactly six ASCII digits
    pub fn is_valid_pincode(pincode: &str) -> bool {
        pincode.len() == 6 && pincode.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn validate_cibil_score(value: &str) -> ValidationResult<i32> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidCibilScore);
        }

        value
            .parse::<u32>()
            .ok()
            .filter(|score| (CIBIL_MIN..=CIBIL_MAX).contains(score))
            .and_then(|score| i32::try_from(score).ok())
            .ok_or(ValidationError::InvalidCibilScore)
    }

    /// The free-text field replaces the selection when "Other" was chosen
    pub fn with_other_override(fields: &FormFields, selected: &str, other: &str) -> String {
        match fields.get(selected) {
            Some(OTHER) => fields.text(other),
            Some(value) => value.to_string(),
            None => String::new(),
        }
    }

    fn required(fields: &FormFields, field: &str) -> ValidationResult<()> {
        fields
            .non_empty(field)
            .map(|_| ())
            .ok_or_else(|| ValidationError::MissingField(field.to_string()))
    }

    fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(field.to_string()))
    }
}
