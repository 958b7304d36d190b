use crate::common::join_non_empty;
use crate::vle_types::{
    AddressInput, ResolvedGeography, ValidatedSubmission, VleRecord, LIST_SEPARATOR,
};

/// Builds the persisted record from validated input and resolved geography
pub struct RecordNormalizer;

impl RecordNormalizer {
    pub fn normalize(validated: ValidatedSubmission, geography: ResolvedGeography) -> VleRecord {
        let permanent_address = Self::permanent_address(&validated.permanent);
        let current_address = if validated.same_current_address {
            Some(permanent_address.clone())
        } else {
            Self::current_address(&validated.current)
        };

        let whatsapp_number = if validated.same_whatsapp {
            validated.contact_number.clone()
        } else {
            validated.whatsapp_number
        };

        VleRecord {
            vle_type: validated.vle_type,
            csc_id: validated.csc_id,
            division: geography.division,
            district: geography.district,
            block: geography.block,
            grampanchayat: geography.grampanchayat_names.join(LIST_SEPARATOR),
            lgd_code: geography.lgd_codes.join(LIST_SEPARATOR),

            first_name: validated.first_name,
            father_name: validated.father_name,
            mother_name: validated.mother_name,
            surname: validated.surname,
            dob: validated.dob,
            blood_group: validated.blood_group,
            gender: validated.gender,
            marital_status: validated.marital_status,
            spouse_name: validated.spouse_name,
            num_children: validated.num_children,
            anniversary_date: validated.anniversary_date,
            religion: validated.religion,
            category: validated.category,
            caste: validated.caste,
            education: validated.education,
            institute_name: validated.institute_name,
            cibil_score: validated.cibil_score,

            contact_number: validated.contact_number,
            whatsapp_number,
            email: validated.email,

            permanent_address,
            current_address,

            pan_number: validated.pan_number,
            aadhar_number: validated.aadhar_number,

            bank_name: validated.bank_name,
            ifsc_code: validated.ifsc_code,
            account_number: validated.account_number,
            branch_name: validated.branch_name,
        }
    }

    /// "line1, line2, city - pincode", skipping an empty second line
    pub fn permanent_address(address: &AddressInput) -> String {
        let locality = format!("{} - {}", address.city, address.pincode);
        join_non_empty([address.line1.as_str(), address.line2.as_str(), locality.as_str()])
    }

    /// Same layout as the permanent address; the "city - pincode" segment is
    /// only added when a city was given. `None` when nothing was entered.
    pub fn current_address(address: &AddressInput) -> Option<String> {
        let locality = if address.city.trim().is_empty() {
            String::new()
        } else {
            format!("{} - {}", address.city, address.pincode)
        };

        let joined = join_non_empty([address.line1.as_str(), address.line2.as_str(), locality.as_str()]);
        (!joined.is_empty()).then_some(joined)
    }
}
