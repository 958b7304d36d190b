use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Geography hierarchy
        manager
            .create_table(
                Table::create()
                    .table(Divisions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Divisions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Divisions::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Districts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Districts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Districts::Name).string().not_null())
                    .col(ColumnDef::new(Districts::DivisionId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_districts_division_id")
                            .from(Districts::Table, Districts::DivisionId)
                            .to(Divisions::Table, Divisions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Blocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blocks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Blocks::Name).string().not_null())
                    .col(ColumnDef::new(Blocks::DistrictId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blocks_district_id")
                            .from(Blocks::Table, Blocks::DistrictId)
                            .to(Districts::Table, Districts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Grampanchayats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grampanchayats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Grampanchayats::LgdCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Grampanchayats::Name).string().not_null())
                    .col(ColumnDef::new(Grampanchayats::BlockId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grampanchayats_block_id")
                            .from(Grampanchayats::Table, Grampanchayats::BlockId)
                            .to(Blocks::Table, Blocks::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Registered VLEs
        manager
            .create_table(
                Table::create()
                    .table(VleDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VleDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VleDetails::CscId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(VleDetails::VleType).string().not_null())
                    .col(ColumnDef::new(VleDetails::Division).string().not_null())
                    .col(ColumnDef::new(VleDetails::District).string().not_null())
                    .col(ColumnDef::new(VleDetails::Block).string().not_null())
                    .col(ColumnDef::new(VleDetails::Grampanchayat).text().not_null())
                    .col(ColumnDef::new(VleDetails::LgdCode).text().not_null())
                    .col(ColumnDef::new(VleDetails::FirstName).string().not_null())
                    .col(ColumnDef::new(VleDetails::FatherName).string().not_null())
                    .col(ColumnDef::new(VleDetails::MotherName).string().not_null())
                    .col(ColumnDef::new(VleDetails::Surname).string().not_null())
                    .col(ColumnDef::new(VleDetails::Dob).date().not_null())
                    .col(ColumnDef::new(VleDetails::BloodGroup).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::Gender).string().not_null())
                    .col(ColumnDef::new(VleDetails::MaritalStatus).string().not_null())
                    .col(ColumnDef::new(VleDetails::SpouseName).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::NumChildren).integer())
                    .col(ColumnDef::new(VleDetails::AnniversaryDate).date())
                    .col(ColumnDef::new(VleDetails::Religion).string().not_null())
                    .col(ColumnDef::new(VleDetails::Category).string().not_null())
                    .col(ColumnDef::new(VleDetails::Caste).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::Education).string().not_null())
                    .col(ColumnDef::new(VleDetails::InstituteName).string().not_null())
                    .col(ColumnDef::new(VleDetails::CibilScore).integer().not_null())
                    .col(ColumnDef::new(VleDetails::ContactNumber).string().not_null())
                    .col(ColumnDef::new(VleDetails::WhatsappNumber).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::Email).string().not_null())
                    .col(ColumnDef::new(VleDetails::PermanentAddress).text().not_null())
                    .col(ColumnDef::new(VleDetails::CurrentAddress).text())
                    .col(ColumnDef::new(VleDetails::PanNumber).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::AadharNumber).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::BankName).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::IfscCode).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::AccountNumber).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::BranchName).string().not_null().default(""))
                    .col(ColumnDef::new(VleDetails::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(VleDetails::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vle_details_aadhar_number")
                    .table(VleDetails::Table)
                    .col(VleDetails::AadharNumber)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vle_details_contact_number")
                    .table(VleDetails::Table)
                    .col(VleDetails::ContactNumber)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VleDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grampanchayats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blocks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Districts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Divisions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Divisions {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Districts {
    Table,
    Id,
    Name,
    DivisionId,
}

#[derive(Iden)]
enum Blocks {
    Table,
    Id,
    Name,
    DistrictId,
}

#[derive(Iden)]
enum Grampanchayats {
    Table,
    Id,
    LgdCode,
    Name,
    BlockId,
}

#[derive(Iden)]
enum VleDetails {
    Table,
    Id,
    CscId,
    VleType,
    Division,
    District,
    Block,
    Grampanchayat,
    LgdCode,
    FirstName,
    FatherName,
    MotherName,
    Surname,
    Dob,
    BloodGroup,
    Gender,
    MaritalStatus,
    SpouseName,
    NumChildren,
    AnniversaryDate,
    Religion,
    Category,
    Caste,
    Education,
    InstituteName,
    CibilScore,
    ContactNumber,
    WhatsappNumber,
    Email,
    PermanentAddress,
    CurrentAddress,
    PanNumber,
    AadharNumber,
    BankName,
    IfscCode,
    AccountNumber,
    BranchName,
    CreatedAt,
    UpdatedAt,
}
