use std::collections::{HashMap, HashSet};

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use tracing::{debug, warn};

use crate::database::entities::{blocks, districts, divisions, grampanchayats};
use crate::errors::{GeographyError, GeographyResult};
use crate::vle_types::{
    split_list, GrampanchayatDetail, LocationIds, LocationReconstruction, ResolvedGeography,
    VleType,
};

/// Resolves the division → district → block → grampanchayat hierarchy.
///
/// Every method takes the connection to run on, so that the write path can
/// resolve inside the same transaction it inserts with.
pub struct GeographyService;

impl GeographyService {
    pub async fn list_divisions<C: ConnectionTrait>(conn: &C) -> GeographyResult<Vec<divisions::Model>> {
        Ok(divisions::Entity::find()
            .order_by_asc(divisions::Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn list_districts<C: ConnectionTrait>(
        conn: &C,
        division_id: i32,
    ) -> GeographyResult<Vec<districts::Model>> {
        Ok(districts::Entity::find()
            .filter(districts::Column::DivisionId.eq(division_id))
            .order_by_asc(districts::Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn list_blocks<C: ConnectionTrait>(
        conn: &C,
        district_id: i32,
    ) -> GeographyResult<Vec<blocks::Model>> {
        Ok(blocks::Entity::find()
            .filter(blocks::Column::DistrictId.eq(district_id))
            .order_by_asc(blocks::Column::Id)
            .all(conn)
            .await?)
    }

    pub async fn list_grampanchayats<C: ConnectionTrait>(
        conn: &C,
        block_id: i32,
    ) -> GeographyResult<Vec<grampanchayats::Model>> {
        Ok(grampanchayats::Entity::find()
            .filter(grampanchayats::Column::BlockId.eq(block_id))
            .order_by_asc(grampanchayats::Column::Id)
            .all(conn)
            .await?)
    }

    /// Resolve the submitted location ids to names.
    ///
    /// Grampanchayats are looked up by LGD code in one query and returned in
    /// the order they were submitted. Division, district and block are
    /// independent point lookups.
    pub async fn resolve<C: ConnectionTrait>(
        conn: &C,
        grampanchayat_ids: &[String],
        division_id: &str,
        district_id: &str,
        block_id: &str,
    ) -> GeographyResult<ResolvedGeography> {
        let (grampanchayat_names, lgd_codes) =
            Self::resolve_grampanchayats(conn, grampanchayat_ids).await?;

        let division = Self::division_name(conn, division_id).await?;
        let district = Self::district_name(conn, district_id).await?;
        let block = Self::block_name(conn, block_id).await?;

        Ok(ResolvedGeography {
            division,
            district,
            block,
            grampanchayat_names,
            lgd_codes,
        })
    }

    /// Names and codes for `ids`, in the same order as `ids`.
    pub async fn resolve_grampanchayats<C: ConnectionTrait>(
        conn: &C,
        ids: &[String],
    ) -> GeographyResult<(Vec<String>, Vec<String>)> {
        let requested: HashSet<&str> = ids.iter().map(String::as_str).collect();
        if requested.is_empty() {
            return Err(GeographyError::GrampanchayatsNotFound);
        }

        let rows = grampanchayats::Entity::find()
            .filter(grampanchayats::Column::LgdCode.is_in(requested.iter().copied()))
            .all(conn)
            .await?;

        if rows.len() != requested.len() {
            warn!(
                "Grampanchayat lookup matched {} of {} requested codes",
                rows.len(),
                requested.len()
            );
            return Err(GeographyError::GrampanchayatsNotFound);
        }

        let by_code: HashMap<&str, &grampanchayats::Model> =
            rows.iter().map(|row| (row.lgd_code.as_str(), row)).collect();

        let mut names = Vec::with_capacity(ids.len());
        let mut codes = Vec::with_capacity(ids.len());
        for id in ids {
            let row = by_code
                .get(id.as_str())
                .ok_or(GeographyError::GrampanchayatsNotFound)?;
            names.push(row.name.clone());
            codes.push(row.lgd_code.clone());
        }

        Ok((names, codes))
    }

    pub async fn division_name<C: ConnectionTrait>(conn: &C, id: &str) -> GeographyResult<String> {
        let Some(id) = parse_id(id) else {
            return Err(GeographyError::DivisionNotFound);
        };
        divisions::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|division| division.name)
            .ok_or(GeographyError::DivisionNotFound)
    }

    pub async fn district_name<C: ConnectionTrait>(conn: &C, id: &str) -> GeographyResult<String> {
        let Some(id) = parse_id(id) else {
            return Err(GeographyError::DistrictNotFound);
        };
        districts::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|district| district.name)
            .ok_or(GeographyError::DistrictNotFound)
    }

    pub async fn block_name<C: ConnectionTrait>(conn: &C, id: &str) -> GeographyResult<String> {
        let Some(id) = parse_id(id) else {
            return Err(GeographyError::BlockNotFound);
        };
        blocks::Entity::find_by_id(id)
            .one(conn)
            .await?
            .map(|block| block.name)
            .ok_or(GeographyError::BlockNotFound)
    }

    /// Rebuild location ids for a stored record from its LGD code list.
    ///
    /// An individual with one code gets that grampanchayat's ancestor chain. A
    /// cluster with several codes gets every member's detail row, and ancestor
    /// ids only when all members sit in one block. Anything else yields an
    /// empty mapping rather than an error.
    pub async fn reconstruct<C: ConnectionTrait>(
        conn: &C,
        lgd_code_list: &str,
        vle_type: &str,
    ) -> GeographyResult<LocationReconstruction> {
        let codes = split_list(lgd_code_list);
        let vle_type = vle_type.parse::<VleType>().ok();

        match vle_type {
            Some(VleType::Individual) if codes.len() == 1 => {
                let details = Self::grampanchayat_details(conn, &codes).await?;
                let location_ids = details
                    .first()
                    .map(|gp| LocationIds {
                        division_id: Some(gp.division_id),
                        district_id: Some(gp.district_id),
                        block_id: Some(gp.block_id),
                        grampanchayat_id: Some(codes[0].clone()),
                        grampanchayat_ids: None,
                    })
                    .unwrap_or_default();

                Ok(LocationReconstruction {
                    location_ids,
                    grampanchayat_details: Vec::new(),
                })
            }
            Some(VleType::Cluster) if codes.len() > 1 => {
                let details = Self::grampanchayat_details(conn, &codes).await?;
                let block_ids: HashSet<i32> = details.iter().map(|gp| gp.block_id).collect();

                let location_ids = match details.first() {
                    Some(first) if block_ids.len() == 1 => LocationIds {
                        division_id: Some(first.division_id),
                        district_id: Some(first.district_id),
                        block_id: Some(first.block_id),
                        grampanchayat_id: None,
                        grampanchayat_ids: Some(
                            details.iter().map(|gp| gp.lgd_code.clone()).collect(),
                        ),
                    },
                    _ => {
                        debug!(
                            "Cluster spans {} blocks, leaving location ids empty",
                            block_ids.len()
                        );
                        LocationIds::default()
                    }
                };

                Ok(LocationReconstruction {
                    location_ids,
                    grampanchayat_details: details,
                })
            }
            _ => Ok(LocationReconstruction::default()),
        }
    }

    /// Detail rows joined up to the division, in the order of `codes`.
    /// Unknown codes are skipped.
    pub async fn grampanchayat_details<C: ConnectionTrait>(
        conn: &C,
        codes: &[String],
    ) -> GeographyResult<Vec<GrampanchayatDetail>> {
        let rows: Vec<GrampanchayatDetail> = grampanchayats::Entity::find()
            .select_only()
            .column(grampanchayats::Column::LgdCode)
            .column(grampanchayats::Column::Name)
            .column(grampanchayats::Column::BlockId)
            .column_as(blocks::Column::DistrictId, "district_id")
            .column_as(districts::Column::DivisionId, "division_id")
            .join(JoinType::InnerJoin, grampanchayats::Relation::Blocks.def())
            .join(JoinType::InnerJoin, blocks::Relation::Districts.def())
            .filter(grampanchayats::Column::LgdCode.is_in(codes.iter().cloned()))
            .into_model::<GrampanchayatDetail>()
            .all(conn)
            .await?;

        let mut by_code: HashMap<String, GrampanchayatDetail> = rows
            .into_iter()
            .map(|row| (row.lgd_code.clone(), row))
            .collect();

        Ok(codes.iter().filter_map(|code| by_code.remove(code)).collect())
    }
}

fn parse_id(id: &str) -> Option<i32> {
    id.trim().parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::{seed_geography, setup_test_db};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_listing_follows_parent_ids() {
        let db = setup_test_db().await;
        seed_geography(&db).await;

        let divisions = GeographyService::list_divisions(&db).await.unwrap();
        assert_eq!(divisions.len(), 2);
        assert_eq!(divisions[0].name, "Pune");

        let districts = GeographyService::list_districts(&db, 2).await.unwrap();
        assert_eq!(districts.len(), 1);
        assert_eq!(districts[0].name, "Nashik District");

        let blocks = GeographyService::list_blocks(&db, 1).await.unwrap();
        assert_eq!(blocks.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(), vec!["Haveli", "Mulshi"]);

        let gps = GeographyService::list_grampanchayats(&db, 1).await.unwrap();
        assert_eq!(gps.len(), 3);

        assert!(GeographyService::list_grampanchayats(&db, 99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_preserves_submission_order() {
        let db = setup_test_db().await;
        seed_geography(&db).await;

        let requested = ids(&["1003", "1001", "1002"]);
        let first = GeographyService::resolve(&db, &requested, "1", "1", "1").await.unwrap();
        assert_eq!(first.grampanchayat_names, vec!["Kesnand", "Wagholi", "Lohegaon"]);
        assert_eq!(first.lgd_codes, vec!["1003", "1001", "1002"]);
        assert_eq!(first.division, "Pune");
        assert_eq!(first.district, "Pune District");
        assert_eq!(first.block, "Haveli");

        let second = GeographyService::resolve(&db, &requested, "1", "1", "1").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_resolve_unknown_grampanchayat() {
        let db = setup_test_db().await;
        seed_geography(&db).await;

        let err = GeographyService::resolve(&db, &ids(&["1001", "9999"]), "1", "1", "1")
            .await
            .unwrap_err();
        assert!(matches!(err, GeographyError::GrampanchayatsNotFound));
        assert_eq!(err.to_string(), "One or more selected grampanchayats not found");
    }

    #[tokio::test]
    async fn test_resolve_tier_specific_not_found() {
        let db = setup_test_db().await;
        seed_geography(&db).await;
        let gp = ids(&["1001"]);

        let err = GeographyService::resolve(&db, &gp, "9", "1", "1").await.unwrap_err();
        assert!(matches!(err, GeographyError::DivisionNotFound));

        let err = GeographyService::resolve(&db, &gp, "1", "abc", "1").await.unwrap_err();
        assert!(matches!(err, GeographyError::DistrictNotFound));

        let err = GeographyService::resolve(&db, &gp, "1", "1", "42").await.unwrap_err();
        assert!(matches!(err, GeographyError::BlockNotFound));
    }

    #[tokio::test]
    async fn test_reconstruct_individual() {
        let db = setup_test_db().await;
        seed_geography(&db).await;

        let rebuilt = GeographyService::reconstruct(&db, "3001", "individual").await.unwrap();
        assert_eq!(
            rebuilt.location_ids,
            LocationIds {
                division_id: Some(2),
                district_id: Some(2),
                block_id: Some(3),
                grampanchayat_id: Some("3001".to_string()),
                grampanchayat_ids: None,
            }
        );
        assert!(rebuilt.grampanchayat_details.is_empty());
    }

    #[tokio::test]
    async fn test_reconstruct_cluster_in_one_block() {
        let db = setup_test_db().await;
        seed_geography(&db).await;

        let rebuilt = GeographyService::reconstruct(&db, "1002, 1001", "cluster").await.unwrap();
        assert_eq!(rebuilt.location_ids.block_id, Some(1));
        assert_eq!(rebuilt.location_ids.district_id, Some(1));
        assert_eq!(rebuilt.location_ids.division_id, Some(1));
        assert_eq!(
            rebuilt.location_ids.grampanchayat_ids,
            Some(ids(&["1002", "1001"]))
        );
        assert_eq!(rebuilt.grampanchayat_details.len(), 2);
        assert_eq!(rebuilt.grampanchayat_details[0].name, "Lohegaon");
    }

    #[tokio::test]
    async fn test_reconstruct_cluster_across_blocks_is_indeterminate() {
        let db = setup_test_db().await;
        seed_geography(&db).await;

        let rebuilt = GeographyService::reconstruct(&db, "1001, 2001", "cluster").await.unwrap();
        assert!(rebuilt.location_ids.is_empty());
        assert_eq!(rebuilt.grampanchayat_details.len(), 2);
    }

    #[tokio::test]
    async fn test_reconstruct_mismatched_shape_is_empty() {
        let db = setup_test_db().await;
        seed_geography(&db).await;

        let rebuilt = GeographyService::reconstruct(&db, "1001, 1002", "individual").await.unwrap();
        assert!(rebuilt.location_ids.is_empty());

        let rebuilt = GeographyService::reconstruct(&db, "1001", "cluster").await.unwrap();
        assert!(rebuilt.location_ids.is_empty());

        let rebuilt = GeographyService::reconstruct(&db, "", "individual").await.unwrap();
        assert_eq!(rebuilt, LocationReconstruction::default());

        let rebuilt = GeographyService::reconstruct(&db, "9999", "individual").await.unwrap();
        assert!(rebuilt.location_ids.is_empty());
    }
}
