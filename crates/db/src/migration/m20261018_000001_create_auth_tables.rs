//! Auth tables: users, provider accounts, sessions, verification tokens.
//!
//! Layout matches what the OAuth adapter reads and writes. Every foreign key
//! cascades on delete and gets a lookup index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).text().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).text().null())
                    .col(ColumnDef::new(Users::Image).text().null())
                    .col(
                        ColumnDef::new(Users::EmailVerified)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::Type).text().not_null())
                    .col(ColumnDef::new(Accounts::Provider).text().not_null())
                    .col(ColumnDef::new(Accounts::ProviderAccountId).text().not_null())
                    .col(ColumnDef::new(Accounts::RefreshToken).text().null())
                    .col(ColumnDef::new(Accounts::AccessToken).text().null())
                    .col(ColumnDef::new(Accounts::ExpiresAt).big_integer().null())
                    .col(ColumnDef::new(Accounts::TokenType).text().null())
                    .col(ColumnDef::new(Accounts::Scope).text().null())
                    .col(ColumnDef::new(Accounts::IdToken).text().null())
                    .col(ColumnDef::new(Accounts::SessionState).text().null())
                    .primary_key(
                        Index::create()
                            .name("accounts_pkey")
                            .col(Accounts::Provider)
                            .col(Accounts::ProviderAccountId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_user")
                            .from(Accounts::Table, Accounts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("accounts_user_id_idx")
                    .table(Accounts::Table)
                    .col(Accounts::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::SessionToken)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Sessions::Expires)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_user")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("sessions_user_id_idx")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VerificationTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerificationTokens::Identifier)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VerificationTokens::Token).text().not_null())
                    .col(
                        ColumnDef::new(VerificationTokens::Expires)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("verification_tokens_pkey")
                            .col(VerificationTokens::Identifier)
                            .col(VerificationTokens::Token),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Users {
    Table,
    Id,
    Email,
    Name,
    Image,
    EmailVerified,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    UserId,
    Type,
    Provider,
    ProviderAccountId,
    RefreshToken,
    AccessToken,
    ExpiresAt,
    TokenType,
    Scope,
    IdToken,
    SessionState,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    SessionToken,
    UserId,
    Expires,
}

#[derive(DeriveIden)]
enum VerificationTokens {
    Table,
    Identifier,
    Token,
    Expires,
}
